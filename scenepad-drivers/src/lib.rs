//! Device implementations
//!
//! This crate provides concrete implementations of the capability traits
//! defined in scenepad-core. Everything here is pure logic over small
//! hardware traits, so it builds and tests on the host:
//!
//! - HID report builders (keyboard, mouse, consumer control)
//! - US keyboard layout for text typing
//! - Pixel buffer with brightness scaling
//! - Label screen (title bar plus key label grid)
//! - Key debouncing and the key event queue
//! - Speaker tone control

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod debounce;
pub mod display;
pub mod hid;
pub mod layout;
pub mod pixels;
pub mod tone;
