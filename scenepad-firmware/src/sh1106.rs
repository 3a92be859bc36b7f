//! SH1106 OLED Display Driver
//!
//! Driver for the 128x64 SH1106 panel on the MacroPad, wired to SPI with
//! separate chip select, data/command and reset lines. Drawing goes to a
//! page-organized frame buffer; `flush` pushes it to the glass.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use scenepad_core::traits::OutputError;
use scenepad_drivers::display::Panel;

/// Display dimensions
const WIDTH: usize = 128;
const HEIGHT: usize = 64;
const PAGES: usize = HEIGHT / 8;

/// The SH1106 RAM is 132 columns wide; the glass starts at column 2
const COLUMN_OFFSET: u8 = 2;

/// SH1106 commands
#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// SH1106 OLED driver
pub struct Sh1106<SPI, CS, DC, RST> {
    spi: SPI,
    cs: CS,
    dc: DC,
    rst: RST,
    /// Frame buffer (1 bit per pixel, organized as pages)
    buffer: [[u8; WIDTH]; PAGES],
}

impl<SPI, CS, DC, RST> Sh1106<SPI, CS, DC, RST>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    pub fn new(spi: SPI, cs: CS, dc: DC, rst: RST) -> Self {
        Self {
            spi,
            cs,
            dc,
            rst,
            buffer: [[0; WIDTH]; PAGES],
        }
    }

    /// Pulse reset and send the initialization sequence
    pub fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), OutputError> {
        self.rst.set_low().map_err(|_| OutputError::Display)?;
        delay.delay_ms(1);
        self.rst.set_high().map_err(|_| OutputError::Display)?;
        delay.delay_ms(1);

        let init_cmds: &[u8] = &[
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80, // Default clock
            cmd::SET_MUX_RATIO,
            0x3F, // 64 lines
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_CHARGE_PUMP,
            0x14,                  // Enable charge pump
            cmd::SET_SEG_REMAP,    // Flip horizontally
            cmd::SET_COM_SCAN_DEC, // Flip vertically
            cmd::SET_COM_PINS,
            0x12, // Alternative COM config
            cmd::SET_CONTRAST,
            0xCF, // High contrast
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::SET_NORMAL,
        ];
        self.commands(init_cmds)?;

        // Blank the RAM before the panel turns on
        self.flush()?;
        self.commands(&[cmd::DISPLAY_ON])
    }

    fn commands(&mut self, cmds: &[u8]) -> Result<(), OutputError> {
        self.dc.set_low().map_err(|_| OutputError::Display)?;
        self.transfer(cmds)
    }

    fn data(&mut self, page: usize) -> Result<(), OutputError> {
        self.dc.set_high().map_err(|_| OutputError::Display)?;
        let bytes = self.buffer[page];
        self.transfer(&bytes)
    }

    fn transfer(&mut self, bytes: &[u8]) -> Result<(), OutputError> {
        self.cs.set_low().map_err(|_| OutputError::Display)?;
        let result = self.spi.write(bytes).and_then(|()| self.spi.flush());
        self.cs.set_high().map_err(|_| OutputError::Display)?;
        result.map_err(|_| OutputError::Display)
    }

    fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        let bit = 1 << (y % 8);
        let byte = &mut self.buffer[y / 8][x];
        if on {
            *byte |= bit;
        } else {
            *byte &= !bit;
        }
    }
}

impl<SPI, CS, DC, RST> OriginDimensions for Sh1106<SPI, CS, DC, RST> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl<SPI, CS, DC, RST> DrawTarget for Sh1106<SPI, CS, DC, RST>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x @ 0..WIDTH), Ok(y @ 0..HEIGHT)) = (usize::try_from(point.x), usize::try_from(point.y)) {
                self.set_pixel(x, y, color.is_on());
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = if color.is_on() { 0xFF } else { 0x00 };
        for page in self.buffer.iter_mut() {
            page.fill(fill);
        }
        Ok(())
    }
}

impl<SPI, CS, DC, RST> Panel for Sh1106<SPI, CS, DC, RST>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    fn flush(&mut self) -> Result<(), OutputError> {
        for page in 0..PAGES {
            self.commands(&[
                cmd::SET_PAGE_ADDR | page as u8,
                cmd::SET_LOW_COLUMN | COLUMN_OFFSET,
                cmd::SET_HIGH_COLUMN,
            ])?;
            self.data(page)?;
        }
        Ok(())
    }
}
