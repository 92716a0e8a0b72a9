//! Filename parsing for the `YYYY-MM-DD-title` post convention.
//!
//! Posts live in the posts directory as `2026-01-27-hello-world.markdown`.
//! The date prefix is a fallback when the front matter has no usable date;
//! the rest of the stem is only informational, titles come from front matter.
//!
//! - `2026-01-27-hello-world.markdown` → date 2026-01-27, name "hello-world"
//! - `2026-01-27.md` → date 2026-01-27, name ""
//! - `notes.md` → no date, name "notes"

use chrono::NaiveDate;
use std::path::Path;

/// Extensions recognized as posts.
pub const POST_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Extension used by `nebel new`.
pub const NEW_POST_EXTENSION: &str = "markdown";

/// Result of parsing a post file stem like `2026-01-27-hello-world`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPostName {
    /// Date prefix if present and a real calendar date.
    pub date: Option<NaiveDate>,
    /// Rest of the stem after `YYYY-MM-DD-`. The full stem when undated.
    pub name: String,
}

/// Parse a post file stem following the `YYYY-MM-DD-name` convention.
pub fn parse_post_name(stem: &str) -> ParsedPostName {
    if let Some(prefix) = stem.get(..10)
        && let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
    {
        let rest = &stem[10..];
        if rest.is_empty() || rest.starts_with('-') {
            return ParsedPostName {
                date: Some(date),
                name: rest.trim_start_matches('-').to_string(),
            };
        }
    }
    ParsedPostName {
        date: None,
        name: stem.to_string(),
    }
}

/// Whether `path` has a post extension.
pub fn is_post_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| POST_EXTENSIONS.contains(&ext))
}

/// File name for a new post: `YYYY-MM-DD-<title>.markdown`.
///
/// Path separators in the title are replaced with `-` so the file always
/// lands directly in the posts directory.
pub fn post_file_name(date: NaiveDate, title: &str) -> String {
    let safe: String = title
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();
    format!(
        "{}-{}.{}",
        date.format("%Y-%m-%d"),
        safe,
        NEW_POST_EXTENSION
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn dated_with_multi_word_name() {
        let p = parse_post_name("2026-01-27-hello-world");
        assert_eq!(p.date, Some(ymd(2026, 1, 27)));
        assert_eq!(p.name, "hello-world");
    }

    #[test]
    fn date_only() {
        let p = parse_post_name("2026-01-27");
        assert_eq!(p.date, Some(ymd(2026, 1, 27)));
        assert_eq!(p.name, "");
    }

    #[test]
    fn japanese_name_after_date() {
        let p = parse_post_name("2024-03-01-日記");
        assert_eq!(p.date, Some(ymd(2024, 3, 1)));
        assert_eq!(p.name, "日記");
    }

    #[test]
    fn undated_name() {
        let p = parse_post_name("notes");
        assert_eq!(p.date, None);
        assert_eq!(p.name, "notes");
    }

    #[test]
    fn impossible_date_is_not_a_date() {
        let p = parse_post_name("2026-02-30-oops");
        assert_eq!(p.date, None);
        assert_eq!(p.name, "2026-02-30-oops");
    }

    #[test]
    fn date_glued_to_name_is_not_a_date() {
        let p = parse_post_name("2026-01-27x");
        assert_eq!(p.date, None);
    }

    #[test]
    fn multibyte_stem_shorter_than_prefix() {
        // Byte 10 falls inside a character; must not panic.
        let p = parse_post_name("日本語のメモ");
        assert_eq!(p.date, None);
    }

    #[test]
    fn recognizes_post_extensions() {
        assert!(is_post_file(Path::new("posts/a.md")));
        assert!(is_post_file(Path::new("posts/a.markdown")));
        assert!(!is_post_file(Path::new("posts/a.txt")));
        assert!(!is_post_file(Path::new("posts/README")));
    }

    #[test]
    fn new_post_file_name() {
        assert_eq!(
            post_file_name(ymd(2026, 1, 27), "Hello World"),
            "2026-01-27-Hello World.markdown"
        );
    }

    #[test]
    fn new_post_file_name_replaces_separators() {
        assert_eq!(
            post_file_name(ymd(2026, 1, 27), "TCP/IP and C:\\"),
            "2026-01-27-TCP-IP and C:-.markdown"
        );
    }
}
