//! Cross-core communication
//!
//! The dispatch loop runs on core 1. Its input comes from, and its output
//! goes to, the async tasks on core 0 through these statics.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use portable_atomic::AtomicBool;

use scenepad_core::traits::KeyEvent;
use scenepad_drivers::hid::HidReport;
use scenepad_drivers::pixels::Frame;

use crate::config::board::{HID_QUEUE_LEN, KEY_QUEUE_LEN};

/// HID reports from the dispatch loop to the USB writer, in order
pub static HID_REPORTS: Channel<CriticalSectionRawMutex, HidReport, HID_QUEUE_LEN> =
    Channel::new();

/// Latest pixel frame; an unread frame is replaced by a newer one
pub static PIXEL_FRAME: Signal<CriticalSectionRawMutex, Frame> = Signal::new();

/// Debounced key events from the input task, oldest first
pub static KEY_EVENTS: Channel<CriticalSectionRawMutex, KeyEvent, KEY_QUEUE_LEN> = Channel::new();

/// Debounced encoder switch level
pub static ENCODER_PRESSED: AtomicBool = AtomicBool::new(false);
