//! Visual output: key pixels and the label display
//!
//! Both are append-then-flush. Setters only touch a buffer; nothing is
//! visible until `show_pixels` / `refresh_display`.

use super::hid::OutputError;
use crate::scene::Color;

/// One RGB pixel under each physical key
pub trait PixelStrip {
    /// Buffer a color; out-of-range indices are ignored
    fn set_pixel(&mut self, index: usize, color: Color);

    /// Push the buffered colors to the LEDs in one update
    fn show_pixels(&mut self) -> Result<(), OutputError>;
}

/// Title line plus one text label per physical key
pub trait LabelDisplay {
    fn set_title(&mut self, text: &str);

    /// Buffer a key label; out-of-range indices are ignored
    fn set_label(&mut self, index: usize, text: &str);

    /// Redraw the panel from the buffered text in one update
    fn refresh_display(&mut self) -> Result<(), OutputError>;
}
