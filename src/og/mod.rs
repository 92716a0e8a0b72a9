//! Social-preview ("OG") image generation.
//!
//! Each post gets a 1200×630 PNG showing its title, set as large as it will
//! go, with a small footer of date, site name and avatar. The interesting
//! part is fitting an arbitrary title, mixing Latin and Japanese script, onto
//! the canvas:
//!
//! ```text
//! title ─► segment ─► fit_title ─► wrap_lines ─► find_best_split
//!                        │              └──────────────┴─► TextMeasurer
//!                        ▼
//!                  Layout { font_size, lines } ─► render_card ─► ogp.png
//! ```
//!
//! | Module | Role |
//! |--------|------|
//! | [`script`] | CJK / kanji range tables and the particle set |
//! | [`segment`] | Splits a title into breakable units with space flags |
//! | [`measure`] | `FontSource` / `TextMeasurer` seam, fontdue-backed face |
//! | [`layout`] | Split scoring, line wrapping, font-size ladder search |
//! | [`params`] | Canvas and footer geometry |
//! | [`assets`] | Font and avatar bytes, loaded once |
//! | [`render`] | Rasterizes a layout onto an `RgbaImage` |

pub mod assets;
pub mod layout;
pub mod measure;
pub mod params;
pub mod render;
pub mod script;
pub mod segment;

pub use assets::OgAssets;
pub use layout::{Layout, fit_title};
pub use measure::OgError;

use chrono::NaiveDate;
use image::ImageFormat;
use std::path::{Path, PathBuf};

/// File name of the rendered image inside a post's output directory.
pub const OG_IMAGE_FILENAME: &str = "ogp.png";

/// Render the OG image for one post and write it to `output_dir/ogp.png`.
///
/// The directory is created if missing. Returns the written path.
pub fn generate_og_image(
    assets: &OgAssets,
    site_label: &str,
    title: &str,
    date: NaiveDate,
    output_dir: &Path,
) -> Result<PathBuf, OgError> {
    let image = render::render_card(
        assets,
        site_label,
        title,
        &date.format("%Y-%m-%d").to_string(),
    )?;
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(OG_IMAGE_FILENAME);
    image.save_with_format(&path, ImageFormat::Png)?;
    Ok(path)
}
