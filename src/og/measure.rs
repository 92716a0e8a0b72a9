//! Text measurement seam and the fontdue-backed font face.
//!
//! The layout engine only needs two things from the font subsystem:
//!
//! - [`FontSource::face`]: realize the typeface at a given pixel size.
//! - [`TextMeasurer::measure`]: the rendered width of a string in that face.
//!
//! Both must be deterministic, and widths must not shrink as a string grows.
//! The production implementation is [`OgFont`] / [`FontFace`], built on
//! `fontdue`. Tests use a mock font from this module's test suite, which
//! assigns fixed advances per character class so expected layouts can be
//! computed by hand.

use fontdue::{Font, FontSettings, LineMetrics};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OgError {
    #[error("failed to read asset {path}: {source}")]
    AssetRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse font: {0}")]
    FontParse(String),
    #[error("cannot build a font face at size {size}")]
    FaceConstruction { size: f32 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Width of a string in one concrete face.
///
/// Appending text must never make the width smaller. The split scorer stops
/// at the first prefix that is too wide and relies on this.
pub trait TextMeasurer {
    fn measure(&self, text: &str) -> f32;
}

/// A typeface that can be realized at arbitrary pixel sizes.
pub trait FontSource {
    type Face<'a>: TextMeasurer
    where
        Self: 'a;

    fn face(&self, size: f32) -> Result<Self::Face<'_>, OgError>;
}

/// A parsed font, immutable once loaded.
pub struct OgFont {
    font: Font,
}

impl OgFont {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, OgError> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| OgError::FontParse(e.to_string()))?;
        Ok(Self { font })
    }
}

impl FontSource for OgFont {
    type Face<'a>
        = FontFace<'a>
    where
        Self: 'a;

    fn face(&self, size: f32) -> Result<Self::Face<'_>, OgError> {
        if !(size.is_finite() && size > 0.0) {
            return Err(OgError::FaceConstruction { size });
        }
        let line = self
            .font
            .horizontal_line_metrics(size)
            .ok_or(OgError::FaceConstruction { size })?;
        Ok(FontFace {
            font: &self.font,
            size,
            line,
        })
    }
}

/// [`OgFont`] realized at one pixel size.
pub struct FontFace<'a> {
    font: &'a Font,
    size: f32,
    line: LineMetrics,
}

impl<'a> FontFace<'a> {
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Recommended distance between baselines.
    pub fn line_height(&self) -> f32 {
        self.line.new_line_size
    }

    pub(crate) fn font(&self) -> &'a Font {
        self.font
    }

    /// Kerning adjustment between two adjacent characters.
    pub(crate) fn kern(&self, left: char, right: char) -> f32 {
        self.font
            .horizontal_kern(left, right, self.size)
            .unwrap_or(0.0)
    }
}

impl TextMeasurer for FontFace<'_> {
    fn measure(&self, text: &str) -> f32 {
        let mut width = 0.0;
        let mut prev = None;
        for c in text.chars() {
            let kern = prev.map_or(0.0, |p| self.kern(p, c));
            // Kerning may pull a glyph back, but never past its own advance.
            width += (self.font.metrics(c, self.size).advance_width + kern).max(0.0);
            prev = Some(c);
        }
        width
    }
}
