//! USB HID keyboard report (boot protocol compatible).
//!
//! Layout (8 bytes):
//! ```text
//! Byte 0: Modifier keys (bitfield)
//!         Bit 0 = Left Ctrl,  Bit 1 = Left Shift,
//!         Bit 2 = Left Alt,   Bit 3 = Left GUI,
//!         Bit 4 = Right Ctrl, Bit 5 = Right Shift,
//!         Bit 6 = Right Alt,  Bit 7 = Right GUI
//! Byte 1: Reserved (0x00)
//! Byte 2-7: Up to 6 simultaneous key codes (USB HID usage codes)
//! ```

use scenepad_core::traits::OutputError;

/// Keyboard report size in bytes.
pub const KEYBOARD_REPORT_SIZE: usize = 8;

/// First modifier usage (Left Control).
pub const MODIFIER_FIRST: u8 = 0xE0;

/// Last modifier usage (Right GUI).
pub const MODIFIER_LAST: u8 = 0xE7;

/// Left Shift usage.
pub const LEFT_SHIFT: u8 = 0xE1;

/// Standard USB HID boot-protocol keyboard report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    /// Modifier key bitfield.
    pub modifier: u8,
    /// Reserved byte (always 0x00 per HID spec).
    pub reserved: u8,
    /// Up to 6 simultaneously pressed key codes.
    pub keycodes: [u8; 6],
}

impl KeyboardReport {
    /// Create an empty (all-keys-released) report.
    pub const fn empty() -> Self {
        Self {
            modifier: 0,
            reserved: 0,
            keycodes: [0; 6],
        }
    }

    /// Add a usage to the report.
    ///
    /// Modifier usages set their bit in the modifier byte. Other usages take
    /// the first free key slot; a key already held is left where it is.
    pub fn press(&mut self, code: u8) -> Result<(), OutputError> {
        if let Some(bit) = modifier_bit(code) {
            self.modifier |= bit;
            return Ok(());
        }
        // Usage 0 means "no event"
        if code == 0 || self.keycodes.contains(&code) {
            return Ok(());
        }
        let slot = self
            .keycodes
            .iter_mut()
            .find(|k| **k == 0)
            .ok_or(OutputError::RolloverExceeded)?;
        *slot = code;
        Ok(())
    }

    /// Remove a usage from the report. Releasing an unheld key is a no-op.
    pub fn release(&mut self, code: u8) {
        if let Some(bit) = modifier_bit(code) {
            self.modifier &= !bit;
            return;
        }
        for slot in self.keycodes.iter_mut().filter(|k| **k == code) {
            *slot = 0;
        }
    }

    /// Release every key and modifier.
    pub fn clear(&mut self) {
        *self = Self::empty();
    }

    /// Serialise into a byte slice for USB HID transmission.
    /// Returns the number of bytes written (always 8).
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < KEYBOARD_REPORT_SIZE {
            return 0;
        }
        buf[0] = self.modifier;
        buf[1] = self.reserved;
        buf[2..8].copy_from_slice(&self.keycodes);
        KEYBOARD_REPORT_SIZE
    }

    /// Returns `true` if no keys are pressed (release event).
    pub fn is_empty(&self) -> bool {
        self.modifier == 0 && self.keycodes.iter().all(|&k| k == 0)
    }
}

fn modifier_bit(code: u8) -> Option<u8> {
    (MODIFIER_FIRST..=MODIFIER_LAST)
        .contains(&code)
        .then(|| 1 << (code - MODIFIER_FIRST))
}

/// USB HID Report Descriptor for a standard keyboard.
///
/// This descriptor tells the USB host that we are a keyboard with:
///   - 8 modifier key bits (input)
///   - 1 reserved byte
///   - 5 LED indicators (output)
///   - 6 key code bytes (input)
pub const KEYBOARD_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x06, // Usage (Keyboard)
    0xA1, 0x01, // Collection (Application)
    //
    //   - Modifier keys (8 bits) -
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0xE0, //   Usage Minimum (Left Control)
    0x29, 0xE7, //   Usage Maximum (Right GUI)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x08, //   Report Count (8)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    //   - Reserved byte -
    0x95, 0x01, //   Report Count (1)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x01, //   Input (Constant) - padding
    //
    //   - LED output (5 bits + 3 padding) -
    0x05, 0x08, //   Usage Page (LEDs)
    0x19, 0x01, //   Usage Minimum (Num Lock)
    0x29, 0x05, //   Usage Maximum (Kana)
    0x95, 0x05, //   Report Count (5)
    0x75, 0x01, //   Report Size (1)
    0x91, 0x02, //   Output (Data, Variable, Absolute)
    0x95, 0x01, //   Report Count (1)
    0x75, 0x03, //   Report Size (3)
    0x91, 0x01, //   Output (Constant) - padding
    //
    //   - Key codes (6 bytes) -
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0x00, //   Usage Minimum (0)
    0x29, 0xFF, //   Usage Maximum (255)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x00, // Logical Maximum (255)
    0x95, 0x06, //   Report Count (6)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x00, //   Input (Data, Array)
    //
    0xC0, // End Collection
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_set_bits() {
        let mut report = KeyboardReport::empty();
        report.press(0xE3).unwrap(); // Left GUI
        report.press(LEFT_SHIFT).unwrap();
        assert_eq!(report.modifier, 0b0000_1010);
        assert_eq!(report.keycodes, [0; 6]);

        report.release(0xE3);
        assert_eq!(report.modifier, 0b0000_0010);
    }

    #[test]
    fn test_six_key_rollover() {
        let mut report = KeyboardReport::empty();
        for code in 0x04..0x0A {
            report.press(code).unwrap();
        }
        assert_eq!(report.keycodes, [0x04, 0x05, 0x06, 0x07, 0x08, 0x09]);

        // Modifiers never use a slot
        report.press(0xE0).unwrap();
        assert_eq!(report.press(0x0A), Err(OutputError::RolloverExceeded));

        // Pressing a held key again is fine
        report.press(0x05).unwrap();
    }

    #[test]
    fn test_release_frees_slot() {
        let mut report = KeyboardReport::empty();
        report.press(0x04).unwrap();
        report.press(0x05).unwrap();
        report.release(0x04);
        assert_eq!(report.keycodes, [0, 0x05, 0, 0, 0, 0]);

        report.press(0x06).unwrap();
        assert_eq!(report.keycodes, [0x06, 0x05, 0, 0, 0, 0]);

        report.release(0x30); // not held
        report.release(0x05);
        report.release(0x06);
        assert!(report.is_empty());
    }

    #[test]
    fn test_serialize() {
        let mut report = KeyboardReport::empty();
        report.press(0xE1).unwrap();
        report.press(0x04).unwrap();

        let mut buf = [0xAA; 8];
        assert_eq!(report.serialize(&mut buf), KEYBOARD_REPORT_SIZE);
        assert_eq!(buf, [0x02, 0x00, 0x04, 0, 0, 0, 0, 0]);

        let mut short = [0u8; 4];
        assert_eq!(report.serialize(&mut short), 0);
    }
}
