//! Board constants for the Adafruit MacroPad RP2040
//!
//! Pin assignments, USB identity and timing live here so they can be tuned
//! in one place.
//!
//! ```text
//!   Encoder switch  -> GPIO0
//!   Keys 0-11       -> GPIO1-GPIO12 (active low, pull-up)
//!   Speaker enable  -> GPIO14
//!   Speaker PWM     -> GPIO16 (PWM slice 0, channel A)
//!   NeoPixels       -> GPIO19 (PIO0, state machine 0)
//!   OLED CS / RST   -> GPIO22 / GPIO23
//!   OLED DC         -> GPIO24
//!   OLED SCK / MOSI -> GPIO26 / GPIO27 (SPI1)
//! ```

// USB

/// USB VID/PID from the pid.codes open-source test range.
/// Replace with an allocated pair for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0001;

pub const USB_MANUFACTURER: &str = "Scenepad";
pub const USB_PRODUCT: &str = "Scenepad Macro Keypad";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// Bus power draw in mA, including pixels at the default brightness
pub const USB_MAX_POWER_MA: u16 = 250;

/// HID polling interval (ms)
pub const USB_HID_POLL_MS: u8 = 1;

/// Reports queued between the dispatch loop and the USB writer
pub const HID_QUEUE_LEN: usize = 16;

// Input

/// Consecutive agreeing samples before a switch changes state
pub const DEBOUNCE_SAMPLES: u8 = 5;

/// Switch scan period (ms); with the sample count above, about 5 ms debounce
pub const POLL_INTERVAL_MS: u32 = 1;

/// Key events queued between the input task and the dispatch loop
pub const KEY_QUEUE_LEN: usize = 32;

// Output

/// Global pixel brightness, 0-255
pub const PIXEL_BRIGHTNESS: u8 = 51;

/// OLED SPI clock (Hz)
pub const DISPLAY_SPI_HZ: u32 = 1_000_000;

/// Title shown when the dispatch loop halts on an output failure
pub const OUTPUT_FAULT_MESSAGE: &str = "OUTPUT FAULT";

// Memory

/// Heap for scene parsing: 48KB
pub const HEAP_SIZE: usize = 48 * 1024;

/// Stack for the dispatch loop on core 1
pub const CORE1_STACK_SIZE: usize = 16 * 1024;
