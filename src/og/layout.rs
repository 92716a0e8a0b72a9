//! Title fitting: font-size search, line breaking and split scoring.
//!
//! All functions here are pure. They only see the font through
//! [`TextMeasurer`] / [`FontSource`], so they are testable with a mock font.
//!
//! ## Font size
//!
//! Sizes are tried from [`FONT_SIZE_LADDER`], largest first. The first size at
//! which the title fits on one line wins. If none does, the smallest size is
//! used with as many lines as it takes. Titles are never rejected.
//!
//! ## Where to break
//!
//! Every segment boundary whose first line fits is a candidate. Its cost is
//! the distance from an even split, adjusted for Japanese typography:
//!
//! ```text
//! cost = |width(prefix) - total/2|
//!        - total/2 * PARTICLE_BONUS  if the prefix ends on a particle and
//!                                    width(prefix)/total is in [0.3, 0.7]
//!        + total/2 * KANJI_PENALTY   if the break falls between two kanji
//! ```
//!
//! The cheapest boundary wins; ties go to the earlier one. A second line that
//! is still too wide is broken again the same way.

use super::measure::{FontSource, OgError, TextMeasurer};
use super::script::{is_kanji, is_particle};
use super::segment::{Segments, segment};
use std::ops::RangeInclusive;
use tracing::debug;

/// Candidate font sizes in pixels, largest first.
pub const FONT_SIZE_LADDER: [f32; 9] = [72.0, 60.0, 48.0, 40.0, 32.0, 28.0, 24.0, 20.0, 18.0];

pub const SMALLEST_FONT_SIZE: f32 = FONT_SIZE_LADDER[FONT_SIZE_LADDER.len() - 1];

/// A size is accepted once the title fits in this many lines.
const MAX_LINES: usize = 1;

/// Fraction of the target width subtracted when breaking after a particle.
pub const PARTICLE_BONUS: f32 = 0.5;

/// Fraction of the target width added when breaking between two kanji.
pub const KANJI_PENALTY: f32 = 1.0;

/// Share of the total width a particle break must land in to earn the bonus.
const PARTICLE_BAND: RangeInclusive<f32> = 0.3..=0.7;

/// Chosen font size and the lines to draw at that size.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub font_size: f32,
    pub lines: Vec<String>,
}

/// One scored break position: the first `len` segments go on line one.
#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    len: usize,
    cost: f32,
}

/// Pick a font size and line breaks for `title`.
///
/// Face construction errors abort the search instead of skipping the size.
///
/// A title that is a single unbreakable run wider than `max_width` still
/// counts as one line, so it is accepted at the largest size and overflows
/// even if a smaller size would have fit.
pub fn fit_title<F: FontSource>(fonts: &F, title: &str, max_width: f32) -> Result<Layout, OgError> {
    let segments = segment(title);

    for size in FONT_SIZE_LADDER {
        let face = fonts.face(size)?;
        let lines = wrap_lines(&face, &segments, max_width);
        if lines.len() <= MAX_LINES {
            debug!(size, lines = lines.len(), "title fits");
            return Ok(Layout {
                font_size: size,
                lines,
            });
        }
    }

    let face = fonts.face(SMALLEST_FONT_SIZE)?;
    let lines = wrap_lines(&face, &segments, max_width);
    debug!(
        size = SMALLEST_FONT_SIZE,
        lines = lines.len(),
        "title needs several lines at the smallest size"
    );
    Ok(Layout {
        font_size: SMALLEST_FONT_SIZE,
        lines,
    })
}

/// Break `segments` into lines no wider than `max_width`.
///
/// Each pass either finishes or moves at least one segment onto a finished
/// line, so there are at most `segments.len()` passes. A segment that is
/// wider than `max_width` on its own ends up alone on an overflowing line.
pub fn wrap_lines(face: &impl TextMeasurer, segments: &Segments, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = segments.clone();

    for _ in 0..segments.len() {
        if rest.is_empty() {
            break;
        }
        let text = rest.join_all();
        if face.measure(&text) <= max_width {
            lines.push(text);
            return lines;
        }
        // 0 means not even the first segment fits: it overflows alone.
        let split = find_best_split(face, &rest, max_width).max(1);
        lines.push(rest.join(0..split));
        rest = rest.tail(split);
    }

    if !rest.is_empty() {
        lines.push(rest.join_all());
    }
    lines
}

/// Number of segments to put on the first line, in `0..=segments.len()`.
///
/// Returns 0 when no prefix fits in `max_width`.
pub fn find_best_split(face: &impl TextMeasurer, segments: &Segments, max_width: f32) -> usize {
    let total = face.measure(&segments.join_all());
    let target = total / 2.0;

    let mut best: Option<SplitCandidate> = None;
    let mut prefix = String::new();
    for i in 0..segments.len() {
        if i > 0 && segments.space_before()[i] {
            prefix.push(' ');
        }
        prefix.push_str(segments.text(i));

        let width = face.measure(&prefix);
        if width > max_width {
            // TextMeasurer requires widths that never shrink as text is
            // appended, so no longer prefix can fit either.
            break;
        }

        let cost = split_cost(segments, i, width, target, total);
        if best.is_none_or(|b| cost < b.cost) {
            best = Some(SplitCandidate { len: i + 1, cost });
        }
    }

    best.map_or(0, |b| b.len)
}

/// Cost of breaking right after segment `last`, with the prefix `width` wide.
fn split_cost(segments: &Segments, last: usize, width: f32, target: f32, total: f32) -> f32 {
    let mut cost = (width - target).abs();
    let word = segments.text(last);

    let ratio = if total > 0.0 { width / total } else { 0.0 };
    if is_particle(word) && PARTICLE_BAND.contains(&ratio) {
        cost -= target * PARTICLE_BONUS;
    }

    if let Some(next) = segments.texts().get(last + 1)
        && let (Some(a), Some(b)) = (word.chars().last(), next.chars().next())
        && is_kanji(a)
        && is_kanji(b)
    {
        cost += target * KANJI_PENALTY;
    }

    cost
}
