//! Device capability traits
//!
//! These traits define the interface between the dispatch logic and the
//! hardware-specific implementations. Every output method is fallible so a
//! broken device stops the dispatch loop instead of being silently ignored.

pub mod hid;
pub mod input;
pub mod render;

use embedded_hal::delay::DelayNs;

pub use hid::{ConsumerControl, Keyboard, Mouse, OutputError, TextTyper, ToneGenerator};
pub use input::{InputSource, KeyEvent};
pub use render::{LabelDisplay, PixelStrip};

/// Everything the dispatch loop drives
///
/// Blanket-implemented for any type providing all capabilities, so a board
/// only implements the individual traits.
pub trait Board:
    Keyboard + ConsumerControl + Mouse + ToneGenerator + TextTyper + PixelStrip + LabelDisplay + DelayNs
{
}

impl<T> Board for T where
    T: Keyboard
        + ConsumerControl
        + Mouse
        + ToneGenerator
        + TextTyper
        + PixelStrip
        + LabelDisplay
        + DelayNs
{
}
