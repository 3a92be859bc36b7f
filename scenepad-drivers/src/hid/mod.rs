//! HID output
//!
//! [`HidOutput`] keeps the current keyboard, mouse and consumer-control
//! state and sends a complete report to a [`ReportSink`] after every
//! change, so the host always sees the full state.

pub mod consumer;
pub mod keyboard;
pub mod mouse;

use scenepad_core::traits::{ConsumerControl, Keyboard, Mouse, OutputError, TextTyper};

use crate::layout;
use consumer::ConsumerReport;
use keyboard::KeyboardReport;
use mouse::MouseReport;

/// A report for one of the three HID interfaces
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidReport {
    Keyboard(KeyboardReport),
    Mouse(MouseReport),
    Consumer(ConsumerReport),
}

/// Destination for serialized-ready reports, normally the USB writer
pub trait ReportSink {
    /// Queue a report, waiting for room rather than dropping it
    fn send(&mut self, report: HidReport) -> Result<(), OutputError>;
}

/// Keyboard, mouse and consumer control over one report sink
pub struct HidOutput<S> {
    sink: S,
    keyboard: KeyboardReport,
    mouse_buttons: u8,
    consumer: ConsumerReport,
}

impl<S: ReportSink> HidOutput<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            keyboard: KeyboardReport::empty(),
            mouse_buttons: 0,
            consumer: ConsumerReport::empty(),
        }
    }

    /// Keyboard state as last sent
    pub fn keyboard_report(&self) -> &KeyboardReport {
        &self.keyboard
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn send_keyboard(&mut self) -> Result<(), OutputError> {
        self.sink.send(HidReport::Keyboard(self.keyboard))
    }

    fn send_mouse(&mut self, x: i8, y: i8, wheel: i8) -> Result<(), OutputError> {
        self.sink.send(HidReport::Mouse(MouseReport {
            buttons: self.mouse_buttons,
            x,
            y,
            wheel,
        }))
    }
}

impl<S: ReportSink> Keyboard for HidOutput<S> {
    fn key_down(&mut self, code: u8) -> Result<(), OutputError> {
        self.keyboard.press(code)?;
        self.send_keyboard()
    }

    fn key_up(&mut self, code: u8) -> Result<(), OutputError> {
        self.keyboard.release(code);
        self.send_keyboard()
    }

    fn release_all_keys(&mut self) -> Result<(), OutputError> {
        self.keyboard.clear();
        self.send_keyboard()
    }
}

impl<S: ReportSink> ConsumerControl for HidOutput<S> {
    fn consumer_send(&mut self, usage: u16) -> Result<(), OutputError> {
        self.consumer = ConsumerReport::new(usage);
        self.sink.send(HidReport::Consumer(self.consumer))
    }

    fn consumer_release(&mut self) -> Result<(), OutputError> {
        self.consumer = ConsumerReport::empty();
        self.sink.send(HidReport::Consumer(self.consumer))
    }
}

impl<S: ReportSink> Mouse for HidOutput<S> {
    fn mouse_press(&mut self, mask: u8) -> Result<(), OutputError> {
        self.mouse_buttons |= mask & mouse::BUTTON_MASK;
        self.send_mouse(0, 0, 0)
    }

    fn mouse_release(&mut self, mask: u8) -> Result<(), OutputError> {
        self.mouse_buttons &= !mask;
        self.send_mouse(0, 0, 0)
    }

    fn mouse_release_all(&mut self) -> Result<(), OutputError> {
        self.mouse_buttons = 0;
        self.send_mouse(0, 0, 0)
    }

    fn mouse_move(&mut self, x: i8, y: i8, wheel: i8) -> Result<(), OutputError> {
        self.send_mouse(x, y, wheel)
    }
}

impl<S: ReportSink> TextTyper for HidOutput<S> {
    /// Each character is pressed in one report and everything is released
    /// in the next, including keys held before typing started.
    fn type_text(&mut self, text: &str) -> Result<(), OutputError> {
        for ch in text.chars() {
            let stroke = layout::keystroke(ch).ok_or(OutputError::UnsupportedCharacter)?;
            for usage in stroke.usages() {
                self.keyboard.press(usage)?;
            }
            self.send_keyboard()?;
            self.release_all_keys()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::vec;
    use std::vec::Vec;

    use super::keyboard::LEFT_SHIFT;
    use super::*;

    /// Sink that records every report
    #[derive(Default)]
    struct RecordingSink {
        reports: Vec<HidReport>,
        fail: bool,
    }

    impl ReportSink for RecordingSink {
        fn send(&mut self, report: HidReport) -> Result<(), OutputError> {
            if self.fail {
                return Err(OutputError::Transport);
            }
            self.reports.push(report);
            Ok(())
        }
    }

    fn kb(modifier: u8, keycodes: [u8; 6]) -> HidReport {
        HidReport::Keyboard(KeyboardReport {
            modifier,
            reserved: 0,
            keycodes,
        })
    }

    #[test]
    fn test_chord_down_and_up() {
        let mut hid = HidOutput::new(RecordingSink::default());
        hid.key_down(0xE3).unwrap();
        hid.key_down(0x2C).unwrap();
        hid.key_up(0x2C).unwrap();
        hid.key_up(0xE3).unwrap();

        assert_eq!(
            hid.sink().reports,
            vec![
                kb(0x08, [0; 6]),
                kb(0x08, [0x2C, 0, 0, 0, 0, 0]),
                kb(0x08, [0; 6]),
                kb(0x00, [0; 6]),
            ]
        );
    }

    #[test]
    fn test_rollover_error_sends_nothing() {
        let mut hid = HidOutput::new(RecordingSink::default());
        for code in 0x04..0x0A {
            hid.key_down(code).unwrap();
        }
        let sent = hid.sink().reports.len();

        assert_eq!(hid.key_down(0x0A), Err(OutputError::RolloverExceeded));
        assert_eq!(hid.sink().reports.len(), sent);
    }

    #[test]
    fn test_type_text_press_then_release() {
        let mut hid = HidOutput::new(RecordingSink::default());
        hid.type_text("aB").unwrap();

        let shift = 1 << (LEFT_SHIFT - 0xE0);
        assert_eq!(
            hid.sink().reports,
            vec![
                kb(0, [0x04, 0, 0, 0, 0, 0]),
                kb(0, [0; 6]),
                kb(shift, [0x05, 0, 0, 0, 0, 0]),
                kb(0, [0; 6]),
            ]
        );
        assert!(hid.keyboard_report().is_empty());
    }

    #[test]
    fn test_type_text_unsupported_character() {
        let mut hid = HidOutput::new(RecordingSink::default());
        assert_eq!(hid.type_text("ok→"), Err(OutputError::UnsupportedCharacter));
        // The characters before the bad one were typed
        assert_eq!(hid.sink().reports.len(), 4);
    }

    #[test]
    fn test_consumer_send_and_release() {
        let mut hid = HidOutput::new(RecordingSink::default());
        hid.consumer_send(consumer::VOLUME_UP).unwrap();
        hid.consumer_release().unwrap();

        assert_eq!(
            hid.sink().reports,
            vec![
                HidReport::Consumer(ConsumerReport::new(0xE9)),
                HidReport::Consumer(ConsumerReport::empty()),
            ]
        );
    }

    #[test]
    fn test_mouse_move_keeps_buttons() {
        let mut hid = HidOutput::new(RecordingSink::default());
        hid.mouse_press(0x01).unwrap();
        hid.mouse_move(5, -5, 1).unwrap();
        hid.mouse_release_all().unwrap();

        assert_eq!(
            hid.sink().reports,
            vec![
                HidReport::Mouse(MouseReport::buttons(0x01)),
                HidReport::Mouse(MouseReport {
                    buttons: 0x01,
                    x: 5,
                    y: -5,
                    wheel: 1,
                }),
                HidReport::Mouse(MouseReport::buttons(0)),
            ]
        );
    }

    #[test]
    fn test_transport_failure_propagates() {
        let mut hid = HidOutput::new(RecordingSink {
            fail: true,
            ..Default::default()
        });
        assert_eq!(hid.key_down(0x04), Err(OutputError::Transport));
        assert_eq!(hid.consumer_release(), Err(OutputError::Transport));
    }
}
