//! Board glue between the driver traits and the RP2040 peripherals

use embassy_futures::block_on;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};

use scenepad_core::traits::OutputError;
use scenepad_drivers::hid::{HidReport, ReportSink};
use scenepad_drivers::pixels::{Frame, FrameWriter};
use scenepad_drivers::tone::{PwmTiming, SquareWave};

use crate::channels::{HID_REPORTS, PIXEL_FRAME};

/// Forwards reports to the USB writer task
///
/// Blocks the dispatch loop while the queue is full so no report is lost.
pub struct ChannelSink;

impl ReportSink for ChannelSink {
    fn send(&mut self, report: HidReport) -> Result<(), OutputError> {
        block_on(HID_REPORTS.send(report));
        Ok(())
    }
}

/// Hands frames to the pixel task
pub struct PixelSink;

impl FrameWriter for PixelSink {
    fn write_frame(&mut self, frame: &Frame) -> Result<(), OutputError> {
        PIXEL_FRAME.signal(*frame);
        Ok(())
    }
}

/// 50% duty square wave on one PWM channel
pub struct PwmTone {
    pwm: Pwm<'static>,
    config: PwmConfig,
}

impl PwmTone {
    /// Takes a PWM output with the counter stopped
    pub fn new(pwm: Pwm<'static>) -> Self {
        let mut config = PwmConfig::default();
        config.enable = false;
        let mut tone = Self { pwm, config };
        tone.pwm.set_config(&tone.config);
        tone
    }
}

impl SquareWave for PwmTone {
    fn start(&mut self, frequency: u16) -> Result<(), OutputError> {
        let clock = embassy_rp::clocks::clk_sys_freq();
        let timing = PwmTiming::for_frequency(clock, frequency).ok_or(OutputError::Tone)?;

        self.config.divider = timing.divider.into();
        self.config.top = timing.top;
        self.config.compare_a = timing.half_duty();
        self.config.enable = true;
        self.pwm.set_config(&self.config);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), OutputError> {
        self.config.compare_a = 0;
        self.config.enable = false;
        self.pwm.set_config(&self.config);
        Ok(())
    }
}
