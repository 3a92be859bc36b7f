//! Label screen
//!
//! Title bar plus a 3 x 4 grid of key labels, drawn with embedded-graphics
//! onto any monochrome panel. Text setters only update the buffered
//! strings; the panel is redrawn and flushed on `refresh_display`.
//!
//! ```text
//! +--------------------------+
//! |##########Title###########|  12 px, inverse video
//! |Label0    Label1    Label2|
//! |Label3    Label4    Label5|
//! |Label6    Label7    Label8|
//! |Label9    Label10  Label11|
//! +--------------------------+
//! ```

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use heapless::String;

use scenepad_core::scene::{KEY_COUNT, MAX_LABEL_LEN, MAX_NAME_LEN};
use scenepad_core::traits::{LabelDisplay, OutputError};

/// Height of the inverse-video title bar in pixels
pub const TITLE_HEIGHT: u32 = 12;

/// Vertical pitch of the label rows
const ROW_PITCH: i32 = 12;

const COLUMNS: usize = 3;
const ROWS: usize = KEY_COUNT / COLUMNS;

/// A monochrome panel with an off-screen buffer
pub trait Panel: DrawTarget<Color = BinaryColor> {
    /// Push the buffer to the glass
    fn flush(&mut self) -> Result<(), OutputError>;
}

/// Title and key labels over a panel
pub struct LabelScreen<P> {
    panel: P,
    title: String<MAX_NAME_LEN>,
    labels: [String<MAX_LABEL_LEN>; KEY_COUNT],
}

impl<P: Panel> LabelScreen<P> {
    pub fn new(panel: P) -> Self {
        Self {
            panel,
            title: String::new(),
            labels: core::array::from_fn(|_| String::new()),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(|l| l.as_str())
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    fn draw(&mut self) -> Result<(), P::Error> {
        let size = self.panel.bounding_box().size;
        let width = size.width as i32;
        let height = size.height as i32;

        self.panel.clear(BinaryColor::Off)?;

        Rectangle::new(Point::zero(), Size::new(size.width, TITLE_HEIGHT))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut self.panel)?;

        let centered = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        Text::with_text_style(
            &self.title,
            Point::new(width / 2, TITLE_HEIGHT as i32 / 2),
            MonoTextStyle::new(&FONT_6X10, BinaryColor::Off),
            centered,
        )
        .draw(&mut self.panel)?;

        let ink = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        for (index, label) in self.labels.iter().enumerate() {
            if label.is_empty() {
                continue;
            }
            let (row, column) = (index / COLUMNS, index % COLUMNS);
            let (x, alignment) = match column {
                0 => (0, Alignment::Left),
                1 => (width / 2, Alignment::Center),
                _ => (width - 1, Alignment::Right),
            };
            // Rows are anchored to the bottom edge
            let y = height - 1 - (ROWS - 1 - row) as i32 * ROW_PITCH;
            let style = TextStyleBuilder::new()
                .alignment(alignment)
                .baseline(Baseline::Bottom)
                .build();
            Text::with_text_style(label, Point::new(x, y), ink, style).draw(&mut self.panel)?;
        }

        Ok(())
    }
}

impl<P: Panel> LabelDisplay for LabelScreen<P> {
    fn set_title(&mut self, text: &str) {
        self.title = truncate(text);
    }

    fn set_label(&mut self, index: usize, text: &str) {
        if let Some(label) = self.labels.get_mut(index) {
            *label = truncate(text);
        }
    }

    fn refresh_display(&mut self) -> Result<(), OutputError> {
        self.draw().map_err(|_| OutputError::Display)?;
        self.panel.flush()
    }
}

fn truncate<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    const WIDTH: usize = 128;
    const HEIGHT: usize = 64;

    /// Frame buffer panel that counts flushes
    struct MockPanel {
        pixels: [[bool; WIDTH]; HEIGHT],
        flushes: usize,
    }

    impl MockPanel {
        fn new() -> Self {
            Self {
                pixels: [[false; WIDTH]; HEIGHT],
                flushes: 0,
            }
        }

        fn lit_in(&self, x: core::ops::Range<usize>, y: core::ops::Range<usize>) -> usize {
            self.pixels[y]
                .iter()
                .map(|row| row[x.clone()].iter().filter(|&&p| p).count())
                .sum()
        }
    }

    impl OriginDimensions for MockPanel {
        fn size(&self) -> Size {
            Size::new(WIDTH as u32, HEIGHT as u32)
        }
    }

    impl DrawTarget for MockPanel {
        type Color = BinaryColor;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                if (0..WIDTH as i32).contains(&point.x) && (0..HEIGHT as i32).contains(&point.y) {
                    self.pixels[point.y as usize][point.x as usize] = color.is_on();
                }
            }
            Ok(())
        }
    }

    impl Panel for MockPanel {
        fn flush(&mut self) -> Result<(), OutputError> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_nothing_drawn_until_refresh() {
        let mut screen = LabelScreen::new(MockPanel::new());
        screen.set_title("Home");
        screen.set_label(0, "Safari");
        assert_eq!(screen.panel().flushes, 0);
        assert_eq!(screen.panel().lit_in(0..WIDTH, 0..HEIGHT), 0);

        screen.refresh_display().unwrap();
        assert_eq!(screen.panel().flushes, 1);
    }

    #[test]
    fn test_title_bar_is_inverse() {
        let mut screen = LabelScreen::new(MockPanel::new());
        screen.set_title("Home");
        screen.refresh_display().unwrap();

        let panel = screen.panel();
        // Bar corners are lit, text in the middle punches holes
        assert!(panel.pixels[0][0]);
        assert!(panel.pixels[11][127]);
        let bar = panel.lit_in(0..WIDTH, 0..TITLE_HEIGHT as usize);
        assert!(bar < WIDTH * TITLE_HEIGHT as usize);
        // Nothing below the bar without labels
        assert_eq!(panel.lit_in(0..WIDTH, TITLE_HEIGHT as usize..HEIGHT), 0);
    }

    #[test]
    fn test_label_grid_positions() {
        let mut screen = LabelScreen::new(MockPanel::new());
        screen.set_label(0, "TL");
        screen.set_label(11, "BR");
        screen.refresh_display().unwrap();

        let panel = screen.panel();
        // Top-left label sits in the first row, left third
        assert!(panel.lit_in(0..40, 13..28) > 0);
        // Bottom-right label sits in the last row, right third
        assert!(panel.lit_in(88..WIDTH, 52..HEIGHT) > 0);
        // Middle column is empty
        assert_eq!(panel.lit_in(44..84, 13..HEIGHT), 0);
    }

    #[test]
    fn test_blank_label_clears_cell() {
        let mut screen = LabelScreen::new(MockPanel::new());
        screen.set_label(4, "Mid");
        screen.refresh_display().unwrap();
        assert!(screen.panel().lit_in(44..84, 13..HEIGHT) > 0);

        screen.set_label(4, "");
        screen.refresh_display().unwrap();
        assert_eq!(screen.panel().lit_in(44..84, 13..HEIGHT), 0);
    }

    #[test]
    fn test_text_truncated_and_bounds_checked() {
        let mut screen = LabelScreen::new(MockPanel::new());
        screen.set_title("A very long scene name indeed");
        screen.set_label(1, "Zoom Meeting");
        screen.set_label(12, "nope");

        assert_eq!(screen.title().len(), MAX_NAME_LEN);
        assert_eq!(screen.label(1), Some("Zoom Meeti"));
        assert_eq!(screen.label(12), None);
    }
}
