//! Physical input

/// A key changing state
///
/// `key` 0-11 are the physical keys. The dispatch loop also uses slot 12
/// for encoder button edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub key: u8,
    pub pressed: bool,
}

impl KeyEvent {
    pub const fn pressed(key: u8) -> Self {
        Self { key, pressed: true }
    }

    pub const fn released(key: u8) -> Self {
        Self {
            key,
            pressed: false,
        }
    }
}

/// Polled input
pub trait InputSource {
    /// Current debounced level of the encoder push switch
    fn encoder_pressed(&mut self) -> bool;

    /// Oldest queued key event, in arrival order
    fn next_key_event(&mut self) -> Option<KeyEvent>;
}
