//! Consumer Control HID support - media keys, volume, etc.
//!
//! Consumer Control is a separate HID usage page (0x0C) that handles
//! volume, transport and browser keys. It is transmitted as its own USB
//! HID report alongside keyboard and mouse reports.

/// Consumer control report size (2 bytes for usage ID).
pub const CONSUMER_REPORT_SIZE: usize = 2;

/// Volume up usage.
pub const VOLUME_UP: u16 = 0x00E9;

/// Volume down usage.
pub const VOLUME_DOWN: u16 = 0x00EA;

/// Mute toggle usage.
pub const MUTE: u16 = 0x00E2;

/// Play/Pause toggle usage.
pub const PLAY_PAUSE: u16 = 0x00CD;

/// Consumer Control HID report.
///
/// Simple 2-byte report containing a single usage code.
/// Multiple simultaneous usages are not supported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsumerReport {
    /// Active consumer control usage (little-endian u16).
    pub usage: u16,
}

impl ConsumerReport {
    /// Create an empty (no keys pressed) report.
    pub const fn empty() -> Self {
        Self { usage: 0 }
    }

    /// Create a report with a single usage.
    pub const fn new(usage: u16) -> Self {
        Self { usage }
    }

    /// Serialize to USB HID report bytes.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < CONSUMER_REPORT_SIZE {
            return 0;
        }
        buf[..CONSUMER_REPORT_SIZE].copy_from_slice(&self.usage.to_le_bytes());
        CONSUMER_REPORT_SIZE
    }

    /// Check if any key is pressed.
    pub fn is_empty(&self) -> bool {
        self.usage == 0
    }
}

/// USB HID Report Descriptor for Consumer Control.
///
/// This is a minimal descriptor for a single 16-bit usage.
pub const CONSUMER_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x0C, // Usage Page (Consumer)
    0x09, 0x01, // Usage (Consumer Control)
    0xA1, 0x01, // Collection (Application)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x03, //   Logical Maximum (1023)
    0x19, 0x00, //   Usage Minimum (0)
    0x2A, 0xFF, 0x03, //   Usage Maximum (1023)
    0x75, 0x10, //   Report Size (16)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x00, //   Input (Data, Array, Absolute)
    0xC0, // End Collection
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumer_report_serialize_little_endian() {
        let report = ConsumerReport::new(0x0223);
        let mut buf = [0u8; 2];
        assert_eq!(report.serialize(&mut buf), 2);
        assert_eq!(buf, [0x23, 0x02]);
    }

    #[test]
    fn consumer_report_empty() {
        assert!(ConsumerReport::empty().is_empty());
        assert!(!ConsumerReport::new(VOLUME_UP).is_empty());
    }
}
