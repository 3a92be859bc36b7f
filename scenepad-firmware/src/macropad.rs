//! The MacroPad as one board
//!
//! Bundles every output the dispatch loop drives. Each capability is
//! delegated to the driver that implements it.

use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI1;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::Delay;
use embedded_hal::delay::DelayNs;

use scenepad_core::scene::Color;
use scenepad_core::traits::{
    ConsumerControl, Keyboard, LabelDisplay, Mouse, OutputError, PixelStrip, TextTyper,
    ToneGenerator,
};
use scenepad_drivers::display::LabelScreen;
use scenepad_drivers::hid::HidOutput;
use scenepad_drivers::pixels::PixelBuffer;
use scenepad_drivers::tone::Speaker;

use crate::outputs::{ChannelSink, PixelSink, PwmTone};
use crate::sh1106::Sh1106;

/// OLED on SPI1 with chip select, data/command and reset lines
pub type Oled =
    Sh1106<Spi<'static, SPI1, Blocking>, Output<'static>, Output<'static>, Output<'static>>;

pub struct MacroPad {
    pub hid: HidOutput<ChannelSink>,
    pub pixels: PixelBuffer<PixelSink>,
    pub screen: LabelScreen<Oled>,
    pub speaker: Speaker<PwmTone, Output<'static>>,
    pub delay: Delay,
}

impl Keyboard for MacroPad {
    fn key_down(&mut self, code: u8) -> Result<(), OutputError> {
        self.hid.key_down(code)
    }

    fn key_up(&mut self, code: u8) -> Result<(), OutputError> {
        self.hid.key_up(code)
    }

    fn release_all_keys(&mut self) -> Result<(), OutputError> {
        self.hid.release_all_keys()
    }
}

impl ConsumerControl for MacroPad {
    fn consumer_send(&mut self, usage: u16) -> Result<(), OutputError> {
        self.hid.consumer_send(usage)
    }

    fn consumer_release(&mut self) -> Result<(), OutputError> {
        self.hid.consumer_release()
    }
}

impl Mouse for MacroPad {
    fn mouse_press(&mut self, mask: u8) -> Result<(), OutputError> {
        self.hid.mouse_press(mask)
    }

    fn mouse_release(&mut self, mask: u8) -> Result<(), OutputError> {
        self.hid.mouse_release(mask)
    }

    fn mouse_release_all(&mut self) -> Result<(), OutputError> {
        self.hid.mouse_release_all()
    }

    fn mouse_move(&mut self, x: i8, y: i8, wheel: i8) -> Result<(), OutputError> {
        self.hid.mouse_move(x, y, wheel)
    }
}

impl TextTyper for MacroPad {
    fn type_text(&mut self, text: &str) -> Result<(), OutputError> {
        self.hid.type_text(text)
    }
}

impl ToneGenerator for MacroPad {
    fn start_tone(&mut self, frequency: u16) -> Result<(), OutputError> {
        self.speaker.start_tone(frequency)
    }

    fn stop_tone(&mut self) -> Result<(), OutputError> {
        self.speaker.stop_tone()
    }
}

impl PixelStrip for MacroPad {
    fn set_pixel(&mut self, index: usize, color: Color) {
        self.pixels.set_pixel(index, color);
    }

    fn show_pixels(&mut self) -> Result<(), OutputError> {
        self.pixels.show_pixels()
    }
}

impl LabelDisplay for MacroPad {
    fn set_title(&mut self, text: &str) {
        self.screen.set_title(text);
    }

    fn set_label(&mut self, index: usize, text: &str) {
        self.screen.set_label(index, text);
    }

    fn refresh_display(&mut self) -> Result<(), OutputError> {
        self.screen.refresh_display()
    }
}

impl DelayNs for MacroPad {
    fn delay_ns(&mut self, ns: u32) {
        self.delay.delay_ns(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
