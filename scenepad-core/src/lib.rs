//! Board-agnostic core logic for the Scenepad macro keypad firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Scene data model and the scene registry
//! - Scene file parsing
//! - Device capability traits (HID output, pixels, labels, input)
//! - Action interpreter (press and release passes)
//! - Dispatch state machine and the dispatch loop

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

// This must go first so the logging macros are visible to every module.
#[macro_use]
mod fmt;

pub mod config;
pub mod dispatch;
pub mod interpreter;
pub mod scene;
pub mod state;
pub mod traits;

#[cfg(test)]
mod testing;

pub use dispatch::{DispatchLoop, Poll};
pub use scene::{Action, Binding, Color, KeyStep, Scene, SceneRegistry};
