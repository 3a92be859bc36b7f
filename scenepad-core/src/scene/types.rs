//! Scene data model
//!
//! Scenes are built once at startup from scene files and never mutated
//! afterwards. Text fields are fixed-capacity; action sequences are heap
//! allocated because their length varies wildly between bindings.

use alloc::string::String;
use alloc::vec::Vec;
use heapless::String as HString;

use super::limits::{KEY_COUNT, MAX_BINDINGS, MAX_ID_LEN, MAX_LABEL_LEN, MAX_NAME_LEN};

/// Scene identifier
pub type SceneId = HString<MAX_ID_LEN>;

/// 24-bit RGB color packed as `0xRRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color(pub u32);

impl Color {
    /// LED off; on a physical key this also marks the binding inactive
    pub const OFF: Color = Color(0x000000);

    /// Pressed-key feedback
    pub const WHITE: Color = Color(0xFFFFFF);

    /// Build from a raw value, dropping anything above 24 bits
    pub const fn new(rgb: u32) -> Self {
        Color(rgb & 0x00FF_FFFF)
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    pub const fn is_off(self) -> bool {
        self.0 == 0
    }
}

/// One element of a `PressKeys` action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyStep {
    /// Hold a HID keyboard usage down
    Down(u8),
    /// Release a HID keyboard usage
    Up(u8),
    /// Block the whole dispatch loop
    Delay { ms: u32 },
    /// Type literal text through the keyboard layout
    Type(String),
}

/// A momentary mouse gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseGesture {
    /// Button mask (bit 0 left, bit 1 right, bit 2 middle)
    pub buttons: u8,
    pub x: i8,
    pub y: i8,
    pub wheel: i8,
}

/// One instruction in a binding's action sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Make another scene active
    SwitchScene(SceneId),
    /// Run key downs, key ups, delays and text in order
    PressKeys(Vec<KeyStep>),
    /// Assert a consumer-control usage until the key is released
    Consumer(u16),
    /// Click and/or move the mouse
    Mouse(MouseGesture),
    /// Sound the speaker for a fixed time
    Tone { frequency: u16, ms: u32 },
}

/// A (color, label, action sequence) triple for one key or the encoder
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Binding {
    pub color: Color,
    pub label: HString<MAX_LABEL_LEN>,
    pub actions: Vec<Action>,
}

impl Binding {
    /// Build a binding, truncating the label to the display cell
    pub fn new(color: Color, label: &str, actions: Vec<Action>) -> Self {
        Self {
            color,
            label: truncate(label),
            actions,
        }
    }
}

/// An application profile
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scene {
    /// Missing on legacy files; such scenes load but are never registered
    pub id: Option<SceneId>,
    pub name: HString<MAX_NAME_LEN>,
    /// Indices 0-11 are keys, 12 is the encoder button
    pub bindings: heapless::Vec<Binding, MAX_BINDINGS>,
}

impl Scene {
    /// Create an empty scene
    pub fn new(id: Option<&str>, name: &str) -> Self {
        Self {
            id: id.map(truncate),
            name: truncate(name),
            bindings: heapless::Vec::new(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_ref().map(|id| id.as_str())
    }

    /// Binding for a slot, if the slot is within the bound list
    pub fn binding(&self, slot: usize) -> Option<&Binding> {
        self.bindings.get(slot)
    }

    /// Binding for a slot that input on that slot should act on
    ///
    /// Physical keys with an off color are inactive. The encoder slot has
    /// no pixel so its color is not consulted.
    pub fn active_binding(&self, slot: usize) -> Option<&Binding> {
        let binding = self.binding(slot)?;
        if slot < KEY_COUNT && binding.color.is_off() {
            None
        } else {
            Some(binding)
        }
    }

    /// Whether the encoder button is bound as a 13th key
    pub fn has_encoder_binding(&self) -> bool {
        self.bindings.len() == MAX_BINDINGS
    }
}

/// Copy as much of `text` as fits, never splitting a character
pub(crate) fn truncate<const N: usize>(text: &str) -> HString<N> {
    let mut out = HString::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
