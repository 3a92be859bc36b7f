//! Embassy async tasks on core 0
//!
//! Each task runs independently and exchanges data with the dispatch loop
//! on core 1 through the statics in `channels`.

pub mod input;
pub mod pixels;
pub mod usb;

pub use input::{input_task, QueuedInput};
pub use pixels::pixel_task;
pub use usb::{hid_writer_task, usb_task};
