//! Input task
//!
//! Scans the switches on a fixed tick and forwards debounced key events to
//! the dispatch loop on core 1. Scanning continues while core 1 sits inside
//! a delay or a tone, so those taps are queued instead of missed.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Ticker};

use scenepad_core::scene::KEY_COUNT;
use scenepad_core::traits::{InputSource, KeyEvent};
use scenepad_drivers::debounce::PadInput;

use crate::channels::{ENCODER_PRESSED, KEY_EVENTS};
use crate::config::board::POLL_INTERVAL_MS;

/// Key switches plus the encoder push switch
pub type PadSwitches = PadInput<Input<'static>, Input<'static>, KEY_COUNT>;

#[embassy_executor::task]
pub async fn input_task(mut pad: PadSwitches) -> ! {
    info!("Input task started");

    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS as u64));

    loop {
        ticker.next().await;
        pad.scan();

        ENCODER_PRESSED.store(pad.encoder_pressed(), Ordering::Release);

        // Full channel: the newest events are lost, same as the scan queue
        let mut dropped = pad.take_dropped();
        while let Some(event) = pad.next_key_event() {
            if KEY_EVENTS.try_send(event).is_err() {
                dropped += 1;
            }
        }
        if dropped > 0 {
            warn!("Key event queue full, {} events dropped", dropped);
        }
    }
}

/// Core 1 view of the input task's output
pub struct QueuedInput;

impl InputSource for QueuedInput {
    fn encoder_pressed(&mut self) -> bool {
        ENCODER_PRESSED.load(Ordering::Acquire)
    }

    fn next_key_event(&mut self) -> Option<KeyEvent> {
        KEY_EVENTS.try_receive().ok()
    }
}
