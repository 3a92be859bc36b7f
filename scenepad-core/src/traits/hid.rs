//! Host-facing output traits: keyboard, consumer control, mouse, tone

/// Errors raised by output capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// More simultaneous keys than the report can carry
    RolloverExceeded,
    /// Text contains a character the keyboard layout cannot produce
    UnsupportedCharacter,
    /// HID report could not be handed to the USB stack
    Transport,
    /// Display bus write failed
    Display,
    /// LED chain write failed
    Pixels,
    /// Speaker could not be driven
    Tone,
}

/// Keyboard key state by HID usage code
pub trait Keyboard {
    /// Hold a key down; modifier usages (0xE0-0xE7) set modifier bits
    fn key_down(&mut self, code: u8) -> Result<(), OutputError>;

    /// Release a key; releasing a key that is not held is not an error
    fn key_up(&mut self, code: u8) -> Result<(), OutputError>;

    /// Release every held key and modifier
    fn release_all_keys(&mut self) -> Result<(), OutputError>;
}

/// Consumer-control (media key) output, one usage at a time
pub trait ConsumerControl {
    fn consumer_send(&mut self, usage: u16) -> Result<(), OutputError>;

    fn consumer_release(&mut self) -> Result<(), OutputError>;
}

/// Relative mouse output
pub trait Mouse {
    /// Press the buttons in `mask` in addition to any already held
    fn mouse_press(&mut self, mask: u8) -> Result<(), OutputError>;

    /// Release the buttons in `mask`
    fn mouse_release(&mut self, mask: u8) -> Result<(), OutputError>;

    fn mouse_release_all(&mut self) -> Result<(), OutputError>;

    /// Move the pointer and scroll, keeping button state
    fn mouse_move(&mut self, x: i8, y: i8, wheel: i8) -> Result<(), OutputError>;
}

/// Speaker
pub trait ToneGenerator {
    fn start_tone(&mut self, frequency: u16) -> Result<(), OutputError>;

    /// Stop the tone; a no-op when silent
    fn stop_tone(&mut self) -> Result<(), OutputError>;
}

/// Layout-aware text typing
pub trait TextTyper {
    /// Type `text` character by character, leaving no key held
    fn type_text(&mut self, text: &str) -> Result<(), OutputError>;
}
