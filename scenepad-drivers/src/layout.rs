//! US-English keyboard layout
//!
//! Maps characters to the key usage (and shift state) that produces them
//! on a host configured for a US keyboard. Only printable ASCII plus a few
//! control characters are covered.

use crate::hid::keyboard::LEFT_SHIFT;

/// The keys needed to type one character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Keystroke {
    pub shift: bool,
    pub usage: u8,
}

impl Keystroke {
    const fn plain(usage: u8) -> Self {
        Self {
            shift: false,
            usage,
        }
    }

    const fn shifted(usage: u8) -> Self {
        Self { shift: true, usage }
    }

    /// Usages to press, modifier first
    pub fn usages(&self) -> impl Iterator<Item = u8> {
        self.shift
            .then_some(LEFT_SHIFT)
            .into_iter()
            .chain(core::iter::once(self.usage))
    }
}

/// Look up the keystroke for `ch`, or `None` if the layout cannot type it
pub fn keystroke(ch: char) -> Option<Keystroke> {
    let stroke = match ch {
        'a'..='z' => Keystroke::plain(0x04 + (ch as u8 - b'a')),
        'A'..='Z' => Keystroke::shifted(0x04 + (ch as u8 - b'A')),
        '1'..='9' => Keystroke::plain(0x1E + (ch as u8 - b'1')),
        '0' => Keystroke::plain(0x27),

        '\n' => Keystroke::plain(0x28),
        '\u{1b}' => Keystroke::plain(0x29),
        '\u{8}' => Keystroke::plain(0x2A),
        '\t' => Keystroke::plain(0x2B),
        ' ' => Keystroke::plain(0x2C),

        '-' => Keystroke::plain(0x2D),
        '=' => Keystroke::plain(0x2E),
        '[' => Keystroke::plain(0x2F),
        ']' => Keystroke::plain(0x30),
        '\\' => Keystroke::plain(0x31),
        ';' => Keystroke::plain(0x33),
        '\'' => Keystroke::plain(0x34),
        '`' => Keystroke::plain(0x35),
        ',' => Keystroke::plain(0x36),
        '.' => Keystroke::plain(0x37),
        '/' => Keystroke::plain(0x38),

        '!' => Keystroke::shifted(0x1E),
        '@' => Keystroke::shifted(0x1F),
        '#' => Keystroke::shifted(0x20),
        '$' => Keystroke::shifted(0x21),
        '%' => Keystroke::shifted(0x22),
        '^' => Keystroke::shifted(0x23),
        '&' => Keystroke::shifted(0x24),
        '*' => Keystroke::shifted(0x25),
        '(' => Keystroke::shifted(0x26),
        ')' => Keystroke::shifted(0x27),
        '_' => Keystroke::shifted(0x2D),
        '+' => Keystroke::shifted(0x2E),
        '{' => Keystroke::shifted(0x2F),
        '}' => Keystroke::shifted(0x30),
        '|' => Keystroke::shifted(0x31),
        ':' => Keystroke::shifted(0x33),
        '"' => Keystroke::shifted(0x34),
        '~' => Keystroke::shifted(0x35),
        '<' => Keystroke::shifted(0x36),
        '>' => Keystroke::shifted(0x37),
        '?' => Keystroke::shifted(0x38),

        _ => return None,
    };
    Some(stroke)
}
