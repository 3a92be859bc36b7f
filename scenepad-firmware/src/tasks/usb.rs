//! USB tasks
//!
//! One task services the bus, the other drains the report queue filled by
//! the dispatch loop and writes each report to its interface.

use defmt::*;
use embassy_usb::UsbDevice;

use scenepad_drivers::hid::HidReport;

use crate::channels::HID_REPORTS;
use crate::usb::{ReportWriter, UsbDriver};

/// Run the USB device stack: enumeration, suspend/resume, endpoints
#[embassy_executor::task]
pub async fn usb_task(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}

/// Forward queued reports to the matching HID endpoint
#[embassy_executor::task]
pub async fn hid_writer_task(
    mut keyboard: ReportWriter,
    mut mouse: ReportWriter,
    mut consumer: ReportWriter,
) -> ! {
    info!("HID writer task started");

    let mut buf = [0u8; 8];

    loop {
        let report = HID_REPORTS.receive().await;

        // A write fails while the host has not configured the device; the
        // report is dropped and the next one carries the full state again
        let result = match &report {
            HidReport::Keyboard(kb) => {
                let n = kb.serialize(&mut buf);
                keyboard.write(&buf[..n]).await
            }
            HidReport::Mouse(m) => {
                let n = m.serialize(&mut buf);
                mouse.write(&buf[..n]).await
            }
            HidReport::Consumer(c) => {
                let n = c.serialize(&mut buf);
                consumer.write(&buf[..n]).await
            }
        };

        if result.is_err() {
            warn!("USB write failed for {}", report);
        }
    }
}
