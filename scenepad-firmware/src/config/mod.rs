//! Firmware configuration
//!
//! Board constants plus loading of the scene files embedded at build time.

pub mod board;
pub mod loader;

pub use loader::load_scenes;
