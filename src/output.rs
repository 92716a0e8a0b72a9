//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Output is a content inventory, not a file listing. Each post leads with
//! its positional index and title; the output path follows the arrow and
//! the source file and OG image status are indented context lines.
//!
//! ```text
//! 001 はじめての投稿 → blog/2026/01/01/1/index.html
//!     Source: posts/2026-01-01-hello.markdown
//!     OG: cached
//! 002 Rust 入門 → blog/2026/01/27/1/index.html
//!     Source: posts/2026-01-27-rust.markdown
//!     OG: rendered
//!
//! Home → index.html
//! Feed → atom.xml (2 entries)
//! Static: 3 files
//! OG images: 1 cached, 1 rendered (2 total)
//! Generated 2 posts in public
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::generate::{GenerateReport, OgStatus, PostReport};
use std::path::Path;

/// Titles longer than this are cut in the listing.
const MAX_TITLE_CHARS: usize = 60;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate to `max` characters, appending `...` if truncated.
fn truncate_title(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Show `path` relative to `root` when it lives inside it.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn og_status_label(status: OgStatus) -> &'static str {
    match status {
        OgStatus::Cached => "cached",
        OgStatus::Copied => "copied",
        OgStatus::Rendered => "rendered",
    }
}

fn post_lines(index: usize, post: &PostReport, root: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} \u{2192} {}/index.html",
        format_index(index),
        truncate_title(&post.title, MAX_TITLE_CHARS),
        post.permalink.trim_start_matches('/')
    )];
    lines.push(format!(
        "{}Source: {}",
        indent(1),
        display_path(&post.source, root)
    ));
    if let Some(status) = post.og {
        lines.push(format!("{}OG: {}", indent(1), og_status_label(status)));
    }
    lines
}

// ============================================================================
// generate
// ============================================================================

/// Format the result of a build.
pub fn format_generate_output(report: &GenerateReport, root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, post) in report.posts.iter().enumerate() {
        lines.extend(post_lines(i + 1, post, root));
    }

    lines.push(String::new());
    lines.push("Home \u{2192} index.html".to_string());
    lines.push(format!(
        "Feed \u{2192} atom.xml ({} {})",
        report.feed_entries,
        if report.feed_entries == 1 { "entry" } else { "entries" }
    ));
    if report.static_files > 0 {
        lines.push(format!("Static: {} files", report.static_files));
    }
    if let Some(stats) = &report.og_stats {
        lines.push(format!("OG images: {}", stats));
    }
    lines.push(format!(
        "Generated {} posts in {}",
        report.posts.len(),
        display_path(&report.output_dir, root)
    ));

    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(report: &GenerateReport, root: &Path) {
    for line in format_generate_output(report, root) {
        println!("{}", line);
    }
}

// ============================================================================
// new
// ============================================================================

pub fn format_new_post_output(path: &Path, root: &Path) -> Vec<String> {
    vec![format!("Created {}", display_path(path, root))]
}

pub fn print_new_post_output(path: &Path, root: &Path) {
    for line in format_new_post_output(path, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
