//! Script classification tables for title line breaking.
//!
//! Membership tests are range lookups over static tables rather than
//! per-character branches, so each class can be checked in isolation.
//!
//! | Class | Used by |
//! |---|---|
//! | CJK (ideographs, kana, CJK punctuation, fullwidth forms) | segmenter: one segment per character |
//! | Kanji (ideograph blocks only) | split scorer: adjacency penalty |
//! | Particle (closed set of Japanese function words) | split scorer: break bonus |

/// Inclusive code point ranges treated as CJK.
const CJK_RANGES: &[(u32, u32)] = &[
    (0x3000, 0x303F), // CJK Symbols and Punctuation
    (0x3040, 0x309F), // Hiragana
    (0x30A0, 0x30FF), // Katakana
    (0x3400, 0x4DBF), // CJK Unified Ideographs Extension A
    (0x4E00, 0x9FFF), // CJK Unified Ideographs
    (0xFF00, 0xFFEF), // Halfwidth and Fullwidth Forms
];

/// Inclusive code point ranges treated as kanji.
const KANJI_RANGES: &[(u32, u32)] = &[
    (0x3400, 0x4DBF), // CJK Unified Ideographs Extension A
    (0x4E00, 0x9FFF), // CJK Unified Ideographs
];

/// Japanese particles that make natural break points.
///
/// The multi-character entries never match a single CJK segment today, since
/// the segmenter emits one segment per CJK character. They stay in the set so
/// the table is complete if segmentation ever groups kana.
pub const PARTICLES: &[&str] = &[
    "に", "を", "は", "が", "で", "と", "へ", "の", "も", "や", "から", "まで", "より",
];

fn in_ranges(c: char, ranges: &[(u32, u32)]) -> bool {
    let cp = c as u32;
    ranges.iter().any(|&(lo, hi)| (lo..=hi).contains(&cp))
}

/// True for characters that are laid out one glyph per segment, with no word spaces.
pub fn is_cjk(c: char) -> bool {
    in_ranges(c, CJK_RANGES)
}

/// True for ideographs. Breaking between two of these splits a compound.
pub fn is_kanji(c: char) -> bool {
    in_ranges(c, KANJI_RANGES)
}

pub fn is_particle(segment: &str) -> bool {
    PARTICLES.contains(&segment)
}
