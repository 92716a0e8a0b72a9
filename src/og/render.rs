//! Rasterizing the OG image.
//!
//! | Step | Crate / function |
//! |---|---|
//! | Canvas, blending, PNG encode | `image::RgbaImage` |
//! | Glyph coverage bitmaps | `fontdue::Font::rasterize` |
//! | Avatar decode + scale | `image::load_from_memory` + `imageops::resize` (Lanczos3) |
//!
//! Output is a pure function of the title, date, label and asset bytes, so
//! the same inputs give byte-identical PNGs.

use super::assets::OgAssets;
use super::layout::fit_title;
use super::measure::{FontFace, FontSource, OgError, TextMeasurer};
use super::params::{
    BACKGROUND, CANVAS_HEIGHT, CANVAS_WIDTH, Footer, TEXT_COLOR, TitleBlock, max_text_width,
};
use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use tracing::warn;

/// An RGBA drawing surface with the few primitives the card needs.
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, background),
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Draw `text` so that the point (`x`, `y`) sits at fraction (`ax`, `ay`)
    /// of its bounding box. `(0.5, 0.5)` centers, `(1.0, 0.5)` right-aligns.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_text_anchored(
        &mut self,
        face: &FontFace<'_>,
        text: &str,
        x: f32,
        y: f32,
        ax: f32,
        ay: f32,
        color: Rgba<u8>,
    ) {
        let width = face.measure(text);
        let mut pen = x - ax * width;
        let baseline = y + ay * face.line_height();

        let mut prev = None;
        for c in text.chars() {
            if let Some(p) = prev {
                pen += face.kern(p, c);
            }
            let (metrics, coverage) = face.font().rasterize(c, face.size());
            let left = (pen + metrics.xmin as f32).round() as i64;
            let top = (baseline - metrics.ymin as f32 - metrics.height as f32).round() as i64;
            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let alpha = coverage[row * metrics.width + col];
                    if alpha > 0 {
                        self.blend(
                            left + col as i64,
                            top + row as i64,
                            color,
                            alpha as f32 / 255.0,
                        );
                    }
                }
            }
            pen += metrics.advance_width;
            prev = Some(c);
        }
    }

    /// Draw a square image clipped to its inscribed circle, centered on `center`.
    pub fn draw_circular_image(&mut self, image: &RgbaImage, center: (f32, f32)) {
        let (w, h) = image.dimensions();
        let radius = w.min(h) as f32 / 2.0;
        let left = (center.0 - w as f32 / 2.0).round() as i64;
        let top = (center.1 - h as f32 / 2.0).round() as i64;

        for (col, row, pixel) in image.enumerate_pixels() {
            let dx = col as f32 + 0.5 - w as f32 / 2.0;
            let dy = row as f32 + 0.5 - h as f32 / 2.0;
            if dx * dx + dy * dy <= radius * radius {
                self.blend(left + col as i64, top + row as i64, *pixel, 1.0);
            }
        }
    }

    /// Source-over blend of `color` at `coverage` onto one pixel.
    fn blend(&mut self, x: i64, y: i64, color: Rgba<u8>, coverage: f32) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        let a = coverage * color[3] as f32 / 255.0;
        for i in 0..3 {
            let mixed = color[i] as f32 * a + dst[i] as f32 * (1.0 - a);
            dst[i] = mixed.round().clamp(0.0, 255.0) as u8;
        }
        let out_alpha = a * 255.0 + dst[3] as f32 * (1.0 - a);
        dst[3] = out_alpha.round().clamp(0.0, 255.0) as u8;
    }
}

/// Decode and scale the avatar. `None` (with a warning) if it cannot be decoded.
pub fn decode_avatar(bytes: &[u8], size: u32) -> Option<RgbaImage> {
    match image::load_from_memory(bytes) {
        Ok(img) => Some(image::imageops::resize(
            &img.to_rgba8(),
            size,
            size,
            FilterType::Lanczos3,
        )),
        Err(e) => {
            warn!(error = %e, "avatar could not be decoded, footer will omit it");
            None
        }
    }
}

/// Render the full card: fitted title plus footer.
pub fn render_card(
    assets: &OgAssets,
    site_label: &str,
    title: &str,
    date: &str,
) -> Result<RgbaImage, OgError> {
    let layout = fit_title(assets.font(), title, max_text_width())?;
    let face = assets.font().face(layout.font_size)?;

    let mut canvas = Canvas::new(CANVAS_WIDTH, CANVAS_HEIGHT, BACKGROUND);

    let block = TitleBlock {
        font_size: layout.font_size,
        line_count: layout.lines.len(),
    };
    for (i, line) in layout.lines.iter().enumerate() {
        canvas.draw_text_anchored(
            &face,
            line,
            block.center_x(),
            block.line_y(i),
            0.5,
            0.5,
            TEXT_COLOR,
        );
    }

    draw_footer(&mut canvas, assets, site_label, date)?;
    Ok(canvas.into_image())
}

fn draw_footer(
    canvas: &mut Canvas,
    assets: &OgAssets,
    site_label: &str,
    date: &str,
) -> Result<(), OgError> {
    let footer = Footer::default();

    let avatar = assets
        .avatar_bytes()
        .and_then(|bytes| decode_avatar(bytes, footer.avatar_size as u32));
    if let Some(avatar) = avatar {
        canvas.draw_circular_image(&avatar, footer.avatar_center());
    }

    let face = assets.font().face(footer.text_size)?;
    let y = footer.text_y();
    canvas.draw_text_anchored(
        &face,
        site_label,
        footer.label_x(),
        y,
        1.0,
        0.5,
        footer.label_color,
    );
    canvas.draw_text_anchored(
        &face,
        "|",
        footer.separator_x(),
        y,
        0.5,
        0.5,
        footer.separator_color,
    );
    canvas.draw_text_anchored(&face, date, footer.date_x(), y, 1.0, 0.5, footer.date_color);
    Ok(())
}
