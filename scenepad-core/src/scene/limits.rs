//! Compile-time capacities
//!
//! Every container in the scene model is fixed-capacity except the action
//! sequences themselves, which live on the heap.

/// Physical keys on the pad (indices 0-11)
pub const KEY_COUNT: usize = 12;

/// Binding slots per scene: 12 keys plus the encoder button
pub const MAX_BINDINGS: usize = KEY_COUNT + 1;

/// Slot index of the encoder button (virtual 13th key)
pub const ENCODER_SLOT: usize = KEY_COUNT;

/// Maximum scenes held by the registry
pub const MAX_SCENES: usize = 16;

/// Maximum scene id length
pub const MAX_ID_LEN: usize = 16;

/// Maximum scene name length (one display line)
pub const MAX_NAME_LEN: usize = 21;

/// Maximum key label length (one third of a display line)
pub const MAX_LABEL_LEN: usize = 10;

/// Id of the scene the encoder button returns to
pub const HOME_SCENE_ID: &str = "home";

/// Title shown when no scene could be loaded
pub const NO_SCENES_MESSAGE: &str = "NO MACRO FILES FOUND";
