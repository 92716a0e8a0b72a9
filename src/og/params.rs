//! Canvas geometry for the OG image.
//!
//! These types describe *where* things go, not how they are drawn. The
//! renderer in [`render`](super::render) consumes them; keeping the numbers
//! here makes the layout checkable without rasterizing anything.
//!
//! ```text
//! ┌──────────────────────────────────────────────── 1200 ─┐
//! │  80                                               80  │
//! │        title block, centered, 40px above middle       │
//! │                                                       │
//! │                     2026-01-27  |  example.org  (◯)   │ ← 55 from bottom
//! └───────────────────────────────────────────────────────┘ 630
//! ```

use image::Rgba;

pub const CANVAS_WIDTH: u32 = 1200;
pub const CANVAS_HEIGHT: u32 = 630;

/// Left and right padding around the title block.
pub const HORIZONTAL_PADDING: f32 = 80.0;

/// Baseline-to-baseline distance as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.4;

/// How far the title block is lifted above the vertical center, leaving
/// room for the footer.
pub const FOOTER_RESERVE: f32 = 40.0;

pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const TEXT_COLOR: Rgba<u8> = Rgba([45, 45, 45, 255]);

/// Widest a title line may be.
pub fn max_text_width() -> f32 {
    CANVAS_WIDTH as f32 - 2.0 * HORIZONTAL_PADDING
}

/// Vertical placement of a title block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TitleBlock {
    pub font_size: f32,
    pub line_count: usize,
}

impl TitleBlock {
    pub fn line_height(&self) -> f32 {
        self.font_size * LINE_HEIGHT_FACTOR
    }

    /// Y of the first line's top edge.
    pub fn start_y(&self) -> f32 {
        let total = self.line_count as f32 * self.line_height();
        (CANVAS_HEIGHT as f32 - total) / 2.0 - FOOTER_RESERVE
    }

    /// Y at which line `index` is vertically centered.
    pub fn line_y(&self, index: usize) -> f32 {
        self.start_y() + index as f32 * self.line_height() + self.font_size
    }

    pub fn center_x(&self) -> f32 {
        CANVAS_WIDTH as f32 / 2.0
    }
}

/// Footer geometry: `date | site [avatar]`, right aligned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footer {
    pub avatar_size: f32,
    pub right_margin: f32,
    /// Distance from the bottom edge to the footer's center line.
    pub bottom_offset: f32,
    pub text_size: f32,
    /// Text sits this far above the avatar center to line up optically.
    pub text_rise: f32,
    pub label_gap: f32,
    pub separator_offset: f32,
    pub date_gap: f32,
    pub label_color: Rgba<u8>,
    pub separator_color: Rgba<u8>,
    pub date_color: Rgba<u8>,
}

impl Default for Footer {
    fn default() -> Self {
        Self {
            avatar_size: 44.0,
            right_margin: 60.0,
            bottom_offset: 55.0,
            text_size: 20.0,
            text_rise: 8.0,
            label_gap: 20.0,
            separator_offset: 115.0,
            date_gap: 15.0,
            label_color: Rgba([45, 45, 45, 220]),
            separator_color: Rgba([45, 45, 45, 100]),
            date_color: Rgba([45, 45, 45, 180]),
        }
    }
}

impl Footer {
    /// Center of the avatar circle.
    pub fn avatar_center(&self) -> (f32, f32) {
        let x = CANVAS_WIDTH as f32 - self.right_margin - self.avatar_size / 2.0;
        let y = CANVAS_HEIGHT as f32 - self.bottom_offset;
        (x, y)
    }

    pub fn text_y(&self) -> f32 {
        self.avatar_center().1 - self.text_rise
    }

    /// Right edge of the site label.
    pub fn label_x(&self) -> f32 {
        self.avatar_center().0 - self.avatar_size / 2.0 - self.label_gap
    }

    /// Center of the separator glyph.
    pub fn separator_x(&self) -> f32 {
        self.label_x() - self.separator_offset
    }

    /// Right edge of the date.
    pub fn date_x(&self) -> f32 {
        self.separator_x() - self.date_gap
    }
}
