//! Pixel task
//!
//! Latches the most recent frame from the dispatch loop onto the WS2812
//! chain under the keys.

use defmt::*;
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio_programs::ws2812::PioWs2812;
use smart_leds::RGB8;

use scenepad_core::scene::KEY_COUNT;

use crate::channels::PIXEL_FRAME;

/// WS2812 chain on PIO0 state machine 0, one LED per key
pub type KeyPixels = PioWs2812<'static, PIO0, 0, KEY_COUNT>;

#[embassy_executor::task]
pub async fn pixel_task(mut leds: KeyPixels) -> ! {
    info!("Pixel task started");

    let mut colors = [RGB8::default(); KEY_COUNT];
    leds.write(&colors).await;

    loop {
        let frame = PIXEL_FRAME.wait().await;
        for (led, &(r, g, b)) in colors.iter_mut().zip(frame.iter()) {
            *led = RGB8::new(r, g, b);
        }
        leds.write(&colors).await;
        trace!("Pixels updated");
    }
}
