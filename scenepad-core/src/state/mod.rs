//! Dispatch state machine
//!
//! The dispatch loop is explicit, finite, and deterministic: one event is
//! fully handled before the next is polled.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{HaltReason, State};
