//! Recording mock board shared by the unit tests

use alloc::string::String;
use alloc::vec::Vec;
use embedded_hal::delay::DelayNs;

use crate::scene::{Color, KEY_COUNT};
use crate::traits::{
    ConsumerControl, InputSource, KeyEvent, Keyboard, LabelDisplay, Mouse, OutputError,
    PixelStrip, TextTyper, ToneGenerator,
};

/// One capability call, in the order it was made
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    KeyDown(u8),
    KeyUp(u8),
    ReleaseAllKeys,
    ConsumerSend(u16),
    ConsumerRelease,
    MousePress(u8),
    MouseRelease(u8),
    MouseReleaseAll,
    MouseMove(i8, i8, i8),
    StartTone(u16),
    StopTone,
    TypeText(String),
    SetTitle(String),
    ShowPixels,
    RefreshDisplay,
    DelayMs(u32),
}

pub struct MockBoard {
    pub calls: Vec<Call>,
    pub title: String,
    pub labels: [String; KEY_COUNT],
    pub pixels: [Color; KEY_COUNT],
    /// Pixel colors at the last `show_pixels`
    pub shown: [Color; KEY_COUNT],
    pub held_keys: Vec<u8>,
    pub consumer: Option<u16>,
    pub mouse_buttons: u8,
    pub tone: Option<u16>,
    /// Make `key_down` fail for this code
    pub fail_key: Option<u8>,
}

impl MockBoard {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            title: String::new(),
            labels: core::array::from_fn(|_| String::new()),
            pixels: [Color::OFF; KEY_COUNT],
            shown: [Color::OFF; KEY_COUNT],
            held_keys: Vec::new(),
            consumer: None,
            mouse_buttons: 0,
            tone: None,
            fail_key: None,
        }
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    /// Hold a key without recording a call
    pub fn key_down_raw(&mut self, code: u8) {
        if !self.held_keys.contains(&code) {
            self.held_keys.push(code);
        }
    }

    /// Calls made since the log was last cleared, then clear it
    pub fn take_calls(&mut self) -> Vec<Call> {
        core::mem::take(&mut self.calls)
    }

    /// Only the keyboard and consumer calls, in order
    pub fn hid_calls(&self) -> Vec<Call> {
        self.calls
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::KeyDown(_)
                        | Call::KeyUp(_)
                        | Call::ReleaseAllKeys
                        | Call::ConsumerSend(_)
                        | Call::ConsumerRelease
                        | Call::TypeText(_)
                )
            })
            .cloned()
            .collect()
    }
}

impl Keyboard for MockBoard {
    fn key_down(&mut self, code: u8) -> Result<(), OutputError> {
        if self.fail_key == Some(code) {
            return Err(OutputError::Transport);
        }
        self.calls.push(Call::KeyDown(code));
        self.key_down_raw(code);
        Ok(())
    }

    fn key_up(&mut self, code: u8) -> Result<(), OutputError> {
        self.calls.push(Call::KeyUp(code));
        self.held_keys.retain(|&k| k != code);
        Ok(())
    }

    fn release_all_keys(&mut self) -> Result<(), OutputError> {
        self.calls.push(Call::ReleaseAllKeys);
        self.held_keys.clear();
        Ok(())
    }
}

impl ConsumerControl for MockBoard {
    fn consumer_send(&mut self, usage: u16) -> Result<(), OutputError> {
        self.calls.push(Call::ConsumerSend(usage));
        self.consumer = Some(usage);
        Ok(())
    }

    fn consumer_release(&mut self) -> Result<(), OutputError> {
        self.calls.push(Call::ConsumerRelease);
        self.consumer = None;
        Ok(())
    }
}

impl Mouse for MockBoard {
    fn mouse_press(&mut self, mask: u8) -> Result<(), OutputError> {
        self.calls.push(Call::MousePress(mask));
        self.mouse_buttons |= mask;
        Ok(())
    }

    fn mouse_release(&mut self, mask: u8) -> Result<(), OutputError> {
        self.calls.push(Call::MouseRelease(mask));
        self.mouse_buttons &= !mask;
        Ok(())
    }

    fn mouse_release_all(&mut self) -> Result<(), OutputError> {
        self.calls.push(Call::MouseReleaseAll);
        self.mouse_buttons = 0;
        Ok(())
    }

    fn mouse_move(&mut self, x: i8, y: i8, wheel: i8) -> Result<(), OutputError> {
        self.calls.push(Call::MouseMove(x, y, wheel));
        Ok(())
    }
}

impl ToneGenerator for MockBoard {
    fn start_tone(&mut self, frequency: u16) -> Result<(), OutputError> {
        self.calls.push(Call::StartTone(frequency));
        self.tone = Some(frequency);
        Ok(())
    }

    fn stop_tone(&mut self) -> Result<(), OutputError> {
        self.calls.push(Call::StopTone);
        self.tone = None;
        Ok(())
    }
}

impl TextTyper for MockBoard {
    fn type_text(&mut self, text: &str) -> Result<(), OutputError> {
        self.calls.push(Call::TypeText(String::from(text)));
        Ok(())
    }
}

impl PixelStrip for MockBoard {
    fn set_pixel(&mut self, index: usize, color: Color) {
        if let Some(p) = self.pixels.get_mut(index) {
            *p = color;
        }
    }

    fn show_pixels(&mut self) -> Result<(), OutputError> {
        self.calls.push(Call::ShowPixels);
        self.shown = self.pixels;
        Ok(())
    }
}

impl LabelDisplay for MockBoard {
    fn set_title(&mut self, text: &str) {
        self.calls.push(Call::SetTitle(String::from(text)));
        self.title = String::from(text);
    }

    fn set_label(&mut self, index: usize, text: &str) {
        if let Some(l) = self.labels.get_mut(index) {
            *l = String::from(text);
        }
    }

    fn refresh_display(&mut self) -> Result<(), OutputError> {
        self.calls.push(Call::RefreshDisplay);
        Ok(())
    }
}

impl DelayNs for MockBoard {
    fn delay_ns(&mut self, ns: u32) {
        self.calls.push(Call::DelayMs(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.calls.push(Call::DelayMs(ms));
    }
}

/// Scripted input: an encoder level plus a queue of key events
pub struct MockInput {
    pub encoder: bool,
    pub keys: Vec<KeyEvent>,
}

impl MockInput {
    pub fn new() -> Self {
        Self {
            encoder: false,
            keys: Vec::new(),
        }
    }

    pub fn push(&mut self, event: KeyEvent) {
        self.keys.push(event);
    }
}

impl InputSource for MockInput {
    fn encoder_pressed(&mut self) -> bool {
        self.encoder
    }

    fn next_key_event(&mut self) -> Option<KeyEvent> {
        if self.keys.is_empty() {
            None
        } else {
            Some(self.keys.remove(0))
        }
    }
}
