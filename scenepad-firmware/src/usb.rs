//! USB HID composite device: keyboard, mouse and consumer control
//!
//! Built once at startup on the RP2040 USB peripheral. The device runner
//! and the three report writers are handed to their own tasks.

use defmt::*;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_rp::Peri;
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, State};
use embassy_usb::{Builder, Config, UsbDevice};
use static_cell::StaticCell;

use scenepad_drivers::hid::consumer::CONSUMER_REPORT_DESCRIPTOR;
use scenepad_drivers::hid::keyboard::KEYBOARD_REPORT_DESCRIPTOR;
use scenepad_drivers::hid::mouse::MOUSE_REPORT_DESCRIPTOR;

use crate::config::board;
use crate::Irqs;

/// USB driver for the on-chip peripheral
pub type UsbDriver = Driver<'static, USB>;

/// Writer for one HID interface; every report fits in 8 bytes
pub type ReportWriter = HidWriter<'static, UsbDriver, 8>;

static KB_STATE: StaticCell<State> = StaticCell::new();
static MOUSE_STATE: StaticCell<State> = StaticCell::new();
static CONSUMER_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();

/// USB device runner and the three HID writers
pub struct UsbHid {
    pub device: UsbDevice<'static, UsbDriver>,
    pub keyboard: ReportWriter,
    pub mouse: ReportWriter,
    pub consumer: ReportWriter,
}

/// Initialise the USB stack and create the composite HID device
///
/// Must be called exactly once. All static buffers are consumed here.
pub fn init(usb: Peri<'static, USB>) -> UsbHid {
    let driver = Driver::new(usb, Irqs);

    let mut usb_config = Config::new(board::USB_VID, board::USB_PID);
    usb_config.manufacturer = Some(board::USB_MANUFACTURER);
    usb_config.product = Some(board::USB_PRODUCT);
    usb_config.serial_number = Some(board::USB_SERIAL_NUMBER);
    usb_config.max_power = board::USB_MAX_POWER_MA;
    usb_config.max_packet_size_0 = 64;

    let config_desc = USB_CONFIG_DESC.init([0u8; 256]);
    let bos_desc = USB_BOS_DESC.init([0u8; 256]);
    let msos_desc = USB_MSOS_DESC.init([0u8; 256]);
    let ctrl_buf = USB_CTRL_BUF.init([0u8; 128]);

    let mut builder = Builder::new(driver, usb_config, config_desc, bos_desc, msos_desc, ctrl_buf);

    let keyboard = HidWriter::new(
        &mut builder,
        KB_STATE.init(State::new()),
        hid_config(KEYBOARD_REPORT_DESCRIPTOR),
    );
    let mouse = HidWriter::new(
        &mut builder,
        MOUSE_STATE.init(State::new()),
        hid_config(MOUSE_REPORT_DESCRIPTOR),
    );
    let consumer = HidWriter::new(
        &mut builder,
        CONSUMER_STATE.init(State::new()),
        hid_config(CONSUMER_REPORT_DESCRIPTOR),
    );

    let device = builder.build();

    info!("USB HID composite device initialised (keyboard + mouse + consumer)");

    UsbHid {
        device,
        keyboard,
        mouse,
        consumer,
    }
}

fn hid_config(report_descriptor: &'static [u8]) -> HidConfig<'static> {
    HidConfig {
        report_descriptor,
        request_handler: None,
        poll_ms: board::USB_HID_POLL_MS,
        max_packet_size: 8,
    }
}
