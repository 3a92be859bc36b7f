//! Key pixel buffer
//!
//! Buffers one color per key and writes the whole frame to the LED chain
//! on `show_pixels`, scaled by a global brightness.

use scenepad_core::scene::{Color, KEY_COUNT};
use scenepad_core::traits::{OutputError, PixelStrip};

/// One brightness-scaled `(r, g, b)` value per key, in key order
pub type Frame = [(u8, u8, u8); KEY_COUNT];

/// LED chain that can latch a whole frame
pub trait FrameWriter {
    fn write_frame(&mut self, frame: &Frame) -> Result<(), OutputError>;
}

/// Pixel buffer
pub struct PixelBuffer<W> {
    writer: W,
    colors: [Color; KEY_COUNT],
    /// 0 = dark, 255 = full
    brightness: u8,
}

impl<W: FrameWriter> PixelBuffer<W> {
    pub fn new(writer: W, brightness: u8) -> Self {
        Self {
            writer,
            colors: [Color::OFF; KEY_COUNT],
            brightness,
        }
    }

    /// Buffered color of a key
    pub fn color(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Frame as it would be written now
    pub fn frame(&self) -> Frame {
        let mut frame = [(0, 0, 0); KEY_COUNT];
        for (out, color) in frame.iter_mut().zip(self.colors.iter()) {
            *out = (
                scale(color.r(), self.brightness),
                scale(color.g(), self.brightness),
                scale(color.b(), self.brightness),
            );
        }
        frame
    }
}

impl<W: FrameWriter> PixelStrip for PixelBuffer<W> {
    fn set_pixel(&mut self, index: usize, color: Color) {
        if let Some(slot) = self.colors.get_mut(index) {
            *slot = color;
        }
    }

    fn show_pixels(&mut self) -> Result<(), OutputError> {
        let frame = self.frame();
        self.writer.write_frame(&frame)
    }
}

/// Scale a channel by brightness, rounding to nearest
fn scale(channel: u8, brightness: u8) -> u8 {
    ((u16::from(channel) * u16::from(brightness) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::vec::Vec;

    #[derive(Default)]
    struct MockChain {
        frames: Vec<Frame>,
    }

    impl FrameWriter for MockChain {
        fn write_frame(&mut self, frame: &Frame) -> Result<(), OutputError> {
            self.frames.push(*frame);
            Ok(())
        }
    }

    #[test]
    fn test_nothing_written_until_show() {
        let mut pixels = PixelBuffer::new(MockChain::default(), 255);
        pixels.set_pixel(0, Color(0x102030));
        pixels.set_pixel(11, Color::WHITE);
        assert!(pixels.writer().frames.is_empty());

        pixels.show_pixels().unwrap();
        let frames = &pixels.writer().frames;
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0][0], (0x10, 0x20, 0x30));
        assert_eq!(frames[0][11], (255, 255, 255));
        assert_eq!(frames[0][5], (0, 0, 0));
    }

    #[test]
    fn test_out_of_range_index_ignored() {
        let mut pixels = PixelBuffer::new(MockChain::default(), 255);
        pixels.set_pixel(12, Color::WHITE);
        pixels.set_pixel(usize::MAX, Color::WHITE);
        assert!(pixels.frame().iter().all(|&p| p == (0, 0, 0)));
    }

    #[test]
    fn test_brightness_scaling() {
        let mut pixels = PixelBuffer::new(MockChain::default(), 128);
        pixels.set_pixel(0, Color::WHITE);
        assert_eq!(pixels.frame()[0], (128, 128, 128));

        let mut dark = PixelBuffer::new(MockChain::default(), 0);
        dark.set_pixel(0, Color::WHITE);
        assert_eq!(dark.frame()[0], (0, 0, 0));
    }

    proptest! {
        #[test]
        fn scaled_channel_never_exceeds_input(channel: u8, brightness: u8) {
            let out = scale(channel, brightness);
            prop_assert!(out <= channel);
            prop_assert!(out <= brightness);
        }

        #[test]
        fn full_brightness_is_identity(channel: u8) {
            prop_assert_eq!(scale(channel, 255), channel);
        }
    }
}
