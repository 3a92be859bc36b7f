//! Scenepad - Macro Keypad Firmware
//!
//! Main firmware binary for the Adafruit MacroPad RP2040. Scenes are
//! loaded from the TOML files embedded at build time; the dispatch loop
//! then turns key presses into USB HID output.
//!
//! Core 0 runs the async input, USB and pixel tasks. Core 1 runs the
//! blocking dispatch loop, which waits inside action sequences without
//! stalling USB or key scanning.

#![no_std]
#![no_main]

extern crate alloc;

use core::ptr::addr_of_mut;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::multicore::{spawn_core1, Stack};
use embassy_rp::peripherals::{PIO0, USB};
use embassy_rp::pio::Pio;
use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_time::{Delay, Timer};
use embedded_alloc::LlffHeap as Heap;
use embedded_hal::delay::DelayNs;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use scenepad_core::scene::KEY_COUNT;
use scenepad_core::traits::{InputSource, LabelDisplay, OutputError};
use scenepad_core::{DispatchLoop, Poll, SceneRegistry};
use scenepad_drivers::debounce::{DebouncedButton, KeyScanner, PadInput};
use scenepad_drivers::display::LabelScreen;
use scenepad_drivers::hid::HidOutput;
use scenepad_drivers::pixels::PixelBuffer;
use scenepad_drivers::tone::Speaker;

use crate::config::board::{
    CORE1_STACK_SIZE, DEBOUNCE_SAMPLES, DISPLAY_SPI_HZ, HEAP_SIZE, OUTPUT_FAULT_MESSAGE,
    PIXEL_BRIGHTNESS, POLL_INTERVAL_MS,
};
use crate::config::loader::embedded_scenes;
use crate::macropad::MacroPad;
use crate::outputs::{ChannelSink, PixelSink, PwmTone};
use crate::sh1106::Sh1106;

// Heap allocator for scene parsing and action sequences
#[global_allocator]
static HEAP: Heap = Heap::empty();

mod channels;
mod config;
mod macropad;
mod outputs;
mod sh1106;
mod tasks;
mod usb;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<PIO0>;
});

// Scenes are parsed once and borrowed by the dispatch loop forever
static REGISTRY: StaticCell<SceneRegistry> = StaticCell::new();

static mut CORE1_STACK: Stack<CORE1_STACK_SIZE> = Stack::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Scenepad firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Scenes
    let registry = REGISTRY.init(SceneRegistry::new());
    config::load_scenes(embedded_scenes(), registry);
    let registry: &'static SceneRegistry = registry;

    // USB HID on core 0
    let usb = usb::init(p.USB);
    spawner.spawn(tasks::usb_task(usb.device)).unwrap();
    spawner
        .spawn(tasks::hid_writer_task(usb.keyboard, usb.mouse, usb.consumer))
        .unwrap();

    // NeoPixels on PIO0, also driven from core 0
    let Pio { mut common, sm0, .. } = Pio::new(p.PIO0, Irqs);
    let program = PioWs2812Program::new(&mut common);
    let leds = PioWs2812::new(&mut common, sm0, p.DMA_CH0, p.PIN_19, &program);
    spawner.spawn(tasks::pixel_task(leds)).unwrap();

    // OLED on SPI1 (transmit only)
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = DISPLAY_SPI_HZ;
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_26, p.PIN_27, spi_config);
    let mut oled = Sh1106::new(
        spi,
        Output::new(p.PIN_22, Level::High),
        Output::new(p.PIN_24, Level::Low),
        Output::new(p.PIN_23, Level::High),
    );
    if let Err(e) = oled.init(&mut Delay) {
        warn!("OLED init failed: {}", e);
    }

    // Speaker: PWM on GPIO16, amplifier enable on GPIO14
    let pwm = Pwm::new_output_a(p.PWM_SLICE0, p.PIN_16, PwmConfig::default());
    let speaker = Speaker::new(PwmTone::new(pwm), Output::new(p.PIN_14, Level::Low));

    let board = MacroPad {
        hid: HidOutput::new(ChannelSink),
        pixels: PixelBuffer::new(PixelSink, PIXEL_BRIGHTNESS),
        screen: LabelScreen::new(oled),
        speaker,
        delay: Delay,
    };

    // Keys on GPIO1-12, encoder switch on GPIO0, all active low
    let keys = [
        Input::new(p.PIN_1, Pull::Up),
        Input::new(p.PIN_2, Pull::Up),
        Input::new(p.PIN_3, Pull::Up),
        Input::new(p.PIN_4, Pull::Up),
        Input::new(p.PIN_5, Pull::Up),
        Input::new(p.PIN_6, Pull::Up),
        Input::new(p.PIN_7, Pull::Up),
        Input::new(p.PIN_8, Pull::Up),
        Input::new(p.PIN_9, Pull::Up),
        Input::new(p.PIN_10, Pull::Up),
        Input::new(p.PIN_11, Pull::Up),
        Input::new(p.PIN_12, Pull::Up),
    ];
    let encoder = Input::new(p.PIN_0, Pull::Up);
    let pad = PadInput::new(
        KeyScanner::new(keys, DEBOUNCE_SAMPLES),
        DebouncedButton::new(encoder, DEBOUNCE_SAMPLES),
    );
    spawner.spawn(tasks::input_task(pad)).unwrap();

    spawn_core1(p.CORE1, unsafe { &mut *addr_of_mut!(CORE1_STACK) }, move || {
        run_dispatch(registry, board, tasks::QueuedInput)
    });

    info!("All tasks spawned, firmware running");

    // Nothing else to do on core 0 beyond the spawned tasks
    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Dispatch loop on core 1; never returns
fn run_dispatch<I: InputSource>(registry: &'static SceneRegistry, board: MacroPad, mut input: I) -> ! {
    let mut delay = Delay;

    let mut dispatch = match DispatchLoop::start(registry, board, &mut input) {
        Ok(dispatch) => dispatch,
        Err(e) => {
            error!("Output failure while starting: {}", e);
            park();
        }
    };

    loop {
        match dispatch.poll(&mut input) {
            Ok(Poll::Handled(event)) => trace!("Handled {}", event),
            Ok(Poll::Idle) => {}
            Ok(Poll::Halted) => {
                error!("Dispatch loop halted: {}", dispatch.state());
                park();
            }
            Err(e) => {
                show_fault(dispatch.board_mut(), e);
                park();
            }
        }

        delay.delay_ms(POLL_INTERVAL_MS);
    }
}

/// Put the failure on the display when the display still works
fn show_fault(board: &mut MacroPad, e: OutputError) {
    error!("Halting on output failure: {}", e);
    board.set_title(OUTPUT_FAULT_MESSAGE);
    for index in 0..KEY_COUNT {
        board.set_label(index, "");
    }
    if board.refresh_display().is_err() {
        warn!("Display unavailable, fault not shown");
    }
}

/// Halted for good; only a reset recovers
fn park() -> ! {
    loop {
        cortex_m::asm::wfe();
    }
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
