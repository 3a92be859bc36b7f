//! Speaker tone output
//!
//! A square wave generator drives the speaker while a separate pin powers
//! the amplifier, which stays off between tones to avoid hiss.

use embedded_hal::digital::OutputPin;

use scenepad_core::traits::{OutputError, ToneGenerator};

/// Maximum PWM counter wrap value
const MAX_TOP: u32 = u16::MAX as u32;

/// Largest integer clock divider
const MAX_DIVIDER: u32 = 255;

/// Square wave source, normally a PWM slice at 50% duty
pub trait SquareWave {
    fn start(&mut self, frequency: u16) -> Result<(), OutputError>;

    fn stop(&mut self) -> Result<(), OutputError>;
}

/// Counter settings that produce a frequency from the system clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmTiming {
    /// Integer clock divider, 1-255
    pub divider: u8,
    /// Counter wraps after `top + 1` ticks
    pub top: u16,
}

impl PwmTiming {
    /// Smallest divider that fits the period in 16 bits, for the best
    /// resolution. Frequencies too low for the largest divider are clamped.
    pub fn for_frequency(clock_hz: u32, frequency: u16) -> Option<Self> {
        if frequency == 0 {
            return None;
        }
        let frequency = u32::from(frequency);
        let ticks = clock_hz / frequency;
        let divider = ticks.div_ceil(MAX_TOP + 1).clamp(1, MAX_DIVIDER);
        let top = (ticks / divider).saturating_sub(1).min(MAX_TOP);
        Some(Self {
            divider: divider as u8,
            top: top as u16,
        })
    }

    /// Compare value for a 50% duty cycle
    pub fn half_duty(&self) -> u16 {
        ((u32::from(self.top) + 1) / 2) as u16
    }
}

/// Speaker with amplifier enable
pub struct Speaker<W, E> {
    wave: W,
    enable: E,
    playing: Option<u16>,
}

impl<W: SquareWave, E: OutputPin> Speaker<W, E> {
    pub fn new(wave: W, mut enable: E) -> Self {
        // Amplifier starts off
        let _ = enable.set_low();
        Self {
            wave,
            enable,
            playing: None,
        }
    }

    /// Frequency currently sounding
    pub fn playing(&self) -> Option<u16> {
        self.playing
    }
}

impl<W: SquareWave, E: OutputPin> ToneGenerator for Speaker<W, E> {
    fn start_tone(&mut self, frequency: u16) -> Result<(), OutputError> {
        if frequency == 0 {
            return self.stop_tone();
        }
        self.enable.set_high().map_err(|_| OutputError::Tone)?;
        self.wave.start(frequency)?;
        self.playing = Some(frequency);
        Ok(())
    }

    fn stop_tone(&mut self) -> Result<(), OutputError> {
        if self.playing.take().is_none() {
            return Ok(());
        }
        self.wave.stop()?;
        self.enable.set_low().map_err(|_| OutputError::Tone)
    }
}
