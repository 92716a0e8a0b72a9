//! Blog posts: front matter, dates, markdown, ordering.
//!
//! A post file looks like
//!
//! ```text
//! ---
//! title: Rustで書き直した
//! date: 2026-01-27 21:04:00 +0900
//! ---
//! Body in *markdown*.
//! ```
//!
//! Lines before the opening `---` are ignored. The header is YAML; only
//! `title` and `date` are read, other keys are skipped.
//!
//! After loading, posts are sorted oldest first and given positional
//! permalinks `/blog/YYYY/MM/DD/N`, where `N` counts posts sharing the day.

use crate::naming::{is_post_file, parse_post_name};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use pulldown_cmark::{Event, Options, Parser, html as md_html};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Problems with a post's contents, independent of where it was read from.
#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("no front matter (expected a `---` line)")]
    MissingFrontMatter,
    #[error("front matter is not closed by a `---` line")]
    UnterminatedFrontMatter,
    #[error("front matter has no `{0}`")]
    MissingField(&'static str),
    #[error("front matter is not valid YAML: {0}")]
    InvalidHeader(String),
    #[error("cannot parse date {0:?}")]
    InvalidDate(String),
}

#[derive(Error, Debug)]
pub enum PostError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Parse { path: PathBuf, source: ParseError },
}

/// Raw header values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrontMatter {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl FrontMatter {
    /// The header as a `---` delimited block, ready to start a post file.
    pub fn to_block(&self) -> Result<String, serde_yaml::Error> {
        Ok(format!("---\n{}---\n", serde_yaml::to_string(self)?))
    }
}

/// Link target for previous/next navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct PostLink {
    pub title: String,
    pub permalink: String,
}

#[derive(Debug, Clone)]
pub struct Post {
    pub title: String,
    pub date: DateTime<FixedOffset>,
    pub body_html: String,
    pub source: PathBuf,
    /// `/blog/YYYY/MM/DD/N`. Empty until [`assign_permalinks`] runs.
    pub permalink: String,
    pub prev: Option<PostLink>,
    pub next: Option<PostLink>,
}

impl Post {
    /// Directory the post's `index.html` and `ogp.png` are written to.
    pub fn output_dir(&self, output_root: &Path) -> PathBuf {
        output_root.join(self.permalink.trim_start_matches('/'))
    }

    pub fn link(&self) -> PostLink {
        PostLink {
            title: self.title.clone(),
            permalink: self.permalink.clone(),
        }
    }
}

// ============================================================================
// Front matter
// ============================================================================

/// Split a post into its header and body.
pub fn split_front_matter(content: &str) -> Result<(FrontMatter, &str), ParseError> {
    let mut offset = 0;
    let mut in_header = false;
    let mut header = Vec::new();

    for line in content.split_inclusive('\n') {
        offset += line.len();
        let bare = line.trim_end_matches(['\n', '\r']);
        if bare == "---" {
            if in_header {
                let front = parse_header(&header)?;
                return Ok((front, &content[offset..]));
            }
            in_header = true;
        } else if in_header {
            header.push(bare);
        }
    }

    Err(if in_header {
        ParseError::UnterminatedFrontMatter
    } else {
        ParseError::MissingFrontMatter
    })
}

fn parse_header(lines: &[&str]) -> Result<FrontMatter, ParseError> {
    let yaml = lines.join("\n");
    let FrontMatter { title, date } = if yaml.trim().is_empty() {
        FrontMatter::default()
    } else {
        serde_yaml::from_str(&yaml).map_err(|e| ParseError::InvalidHeader(e.to_string()))?
    };
    if title.trim().is_empty() {
        return Err(ParseError::MissingField("title"));
    }
    Ok(FrontMatter {
        title,
        date: date.filter(|d| !d.trim().is_empty()),
    })
}

// ============================================================================
// Dates
// ============================================================================

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Resolve a post's publish date.
///
/// The header date wins if it parses; an explicit offset is kept, naive
/// times are placed in `tz`. Otherwise midnight of `fallback` (the filename
/// date) is used.
pub fn parse_date(
    raw: Option<&str>,
    fallback: Option<NaiveDate>,
    tz: FixedOffset,
) -> Result<DateTime<FixedOffset>, ParseError> {
    if let Some(raw) = raw {
        if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %z") {
            return Ok(dt);
        }
        for format in NAIVE_DATE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format)
                && let Some(dt) = tz.from_local_datetime(&naive).single()
            {
                return Ok(dt);
            }
        }
    }

    fallback
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .and_then(|naive| tz.from_local_datetime(&naive).single())
        .ok_or_else(|| ParseError::InvalidDate(raw.unwrap_or_default().to_string()))
}

// ============================================================================
// Markdown
// ============================================================================

/// Render a post body to HTML.
///
/// Tables, strikethrough, task lists and footnotes are enabled. Single
/// newlines inside a paragraph become `<br />`. Raw HTML passes through.
pub fn render_markdown(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

// ============================================================================
// Loading and ordering
// ============================================================================

/// Read and parse one post file.
pub fn load_post(path: &Path, tz: FixedOffset) -> Result<Post, PostError> {
    let content = fs::read_to_string(path).map_err(|source| PostError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_error = |source| PostError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let (front, body) = split_front_matter(&content).map_err(parse_error)?;
    let stem_date = path
        .file_stem()
        .and_then(|s| s.to_str())
        .and_then(|stem| parse_post_name(stem).date);
    let date = parse_date(front.date.as_deref(), stem_date, tz).map_err(parse_error)?;

    Ok(Post {
        title: front.title,
        date,
        body_html: render_markdown(body),
        source: path.to_path_buf(),
        permalink: String::new(),
        prev: None,
        next: None,
    })
}

/// Load every post in `dir`, sorted oldest first with permalinks and
/// neighbour links assigned.
///
/// Posts with the same timestamp keep filename order.
pub fn load_posts(dir: &Path, tz: FixedOffset) -> Result<Vec<Post>, PostError> {
    let io_error = |source| PostError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && is_post_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut posts = paths
        .iter()
        .map(|path| load_post(path, tz))
        .collect::<Result<Vec<_>, _>>()?;
    posts.sort_by_key(|post| post.date);

    assign_permalinks(&mut posts);
    link_neighbours(&mut posts);
    Ok(posts)
}

/// `/blog/YYYY/MM/DD/N`, `N` counting from 1 among posts of the same day.
///
/// `posts` must already be sorted by date.
pub fn assign_permalinks(posts: &mut [Post]) {
    let mut previous_day = String::new();
    let mut count = 0;
    for post in posts.iter_mut() {
        let day = post.date.format("%Y/%m/%d").to_string();
        if day == previous_day {
            count += 1;
        } else {
            count = 1;
        }
        post.permalink = format!("/blog/{day}/{count}");
        previous_day = day;
    }
}

pub fn link_neighbours(posts: &mut [Post]) {
    let links: Vec<PostLink> = posts.iter().map(Post::link).collect();
    for (i, post) in posts.iter_mut().enumerate() {
        post.prev = i.checked_sub(1).map(|p| links[p].clone());
        post.next = links.get(i + 1).cloned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    // =========================================================================
    // Front matter
    // =========================================================================

    #[test]
    fn splits_header_and_body() {
        let src = "---\ntitle: Hello\ndate: 2026-01-27 10:00:00 +0900\n---\nBody line\n";
        let (front, body) = split_front_matter(src).unwrap();
        assert_eq!(front.title, "Hello");
        assert_eq!(front.date.as_deref(), Some("2026-01-27 10:00:00 +0900"));
        assert_eq!(body, "Body line\n");
    }

    #[test]
    fn strips_quotes_and_ignores_unknown_keys() {
        let src = "---\ntitle: \"Colons: fine\"\ntags: rust\ndate: '2026-01-27 10:00'\n---\n";
        let (front, body) = split_front_matter(src).unwrap();
        assert_eq!(front.title, "Colons: fine");
        assert_eq!(front.date.as_deref(), Some("2026-01-27 10:00"));
        assert_eq!(body, "");
    }

    #[test]
    fn header_is_parsed_as_yaml() {
        let cases = [
            (r#"title: "He said \"hi\"""#, r#"He said "hi""#),
            ("title: 'It''s here'", "It's here"),
            ("title: Plain title # draft", "Plain title"),
            ("title: 2024", "2024"),
            ("title: >-\n  folded\n  title", "folded title"),
        ];
        for (header, title) in cases {
            let src = format!("---\n{header}\n---\n");
            let (front, _) = split_front_matter(&src).unwrap();
            assert_eq!(front.title, title, "header {header:?}");
        }
    }

    #[test]
    fn comment_lines_and_empty_date_are_skipped() {
        let src = "---\n# draft\ntitle: T\ndate:\n---\n";
        let (front, _) = split_front_matter(src).unwrap();
        assert_eq!(front.title, "T");
        assert_eq!(front.date, None);
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let result = split_front_matter("---\ntitle: [unclosed\n---\n");
        assert!(matches!(result, Err(ParseError::InvalidHeader(_))));
    }

    #[test]
    fn block_round_trips_awkward_titles() {
        for title in [
            r#""A" and "B""#,
            "Ends with # x",
            "- leading dash",
            "key: value",
            "'single'",
            "yes",
        ] {
            let front = FrontMatter {
                title: title.to_string(),
                date: Some("2026-01-27 21:04:05 +0900".to_string()),
            };
            let block = front.to_block().unwrap();
            let (parsed, body) = split_front_matter(&block).unwrap();
            assert_eq!(parsed, front, "block {block:?}");
            assert_eq!(body, "");
        }
    }

    #[test]
    fn handles_crlf_line_endings() {
        let src = "---\r\ntitle: Windows\r\n---\r\nbody\r\n";
        let (front, body) = split_front_matter(src).unwrap();
        assert_eq!(front.title, "Windows");
        assert_eq!(body, "body\r\n");
    }

    #[test]
    fn lines_before_header_are_ignored() {
        let src = "junk\n---\ntitle: T\n---\nbody";
        let (front, body) = split_front_matter(src).unwrap();
        assert_eq!(front.title, "T");
        assert_eq!(body, "body");
    }

    #[test]
    fn front_matter_errors() {
        assert_eq!(
            split_front_matter("just text\n"),
            Err(ParseError::MissingFrontMatter)
        );
        assert_eq!(
            split_front_matter("---\ntitle: T\nbody\n"),
            Err(ParseError::UnterminatedFrontMatter)
        );
        assert_eq!(
            split_front_matter("---\ndate: 2026-01-27\n---\n"),
            Err(ParseError::MissingField("title"))
        );
    }

    // =========================================================================
    // Dates
    // =========================================================================

    #[test]
    fn date_with_explicit_offset_keeps_it() {
        let dt = parse_date(Some("2026-01-27 10:00:00 -0500"), None, jst()).unwrap();
        assert_eq!(dt.offset().local_minus_utc(), -5 * 3600);
        assert_eq!(dt.format("%H:%M").to_string(), "10:00");
    }

    #[test]
    fn naive_dates_use_configured_zone() {
        let dt = parse_date(Some("2026-01-27 10:00:30"), None, jst()).unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-01-27T10:00:30+09:00");

        let dt = parse_date(Some("2026-01-27 10:00"), None, jst()).unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-01-27T10:00:00+09:00");
    }

    #[test]
    fn unparsable_date_falls_back_to_filename() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1);
        let dt = parse_date(Some("yesterday"), day, jst()).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-01T00:00:00+09:00");

        let dt = parse_date(None, day, jst()).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-01T00:00:00+09:00");
    }

    #[test]
    fn no_usable_date_is_an_error() {
        assert_eq!(
            parse_date(Some("soon"), None, jst()),
            Err(ParseError::InvalidDate("soon".into()))
        );
        assert!(parse_date(None, None, jst()).is_err());
    }

    // =========================================================================
    // Markdown
    // =========================================================================

    #[test]
    fn markdown_hard_wraps_soft_breaks() {
        let html = render_markdown("line one\nline two\n");
        assert!(html.contains("line one<br />"));
    }

    #[test]
    fn markdown_extensions_enabled() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~\n\n- [x] done\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>old</del>"));
        assert!(html.contains("checkbox"));
    }

    #[test]
    fn markdown_passes_raw_html() {
        let html = render_markdown("<div class=\"note\">hi</div>\n");
        assert!(html.contains("<div class=\"note\">hi</div>"));
    }

    // =========================================================================
    // Loading and ordering
    // =========================================================================

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn load_posts_sorts_and_assigns_permalinks() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "2026-01-27-b.markdown",
            "---\ntitle: Second same day\ndate: 2026-01-27 20:00:00 +0900\n---\nb\n",
        );
        write(
            tmp.path(),
            "2026-01-27-a.markdown",
            "---\ntitle: First same day\ndate: 2026-01-27 08:00:00 +0900\n---\na\n",
        );
        write(
            tmp.path(),
            "2025-12-31-old.md",
            "---\ntitle: Old\n---\nold\n",
        );
        write(tmp.path(), "notes.txt", "not a post");

        let posts = load_posts(tmp.path(), jst()).unwrap();
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["Old", "First same day", "Second same day"]);

        let links: Vec<_> = posts.iter().map(|p| p.permalink.as_str()).collect();
        assert_eq!(
            links,
            ["/blog/2025/12/31/1", "/blog/2026/01/27/1", "/blog/2026/01/27/2"]
        );
    }

    #[test]
    fn neighbours_are_linked() {
        let tmp = TempDir::new().unwrap();
        for (name, day) in [("a", "01"), ("b", "02"), ("c", "03")] {
            write(
                tmp.path(),
                &format!("2026-01-{day}-{name}.md"),
                &format!("---\ntitle: {name}\n---\n"),
            );
        }
        let posts = load_posts(tmp.path(), jst()).unwrap();

        assert_eq!(posts[0].prev, None);
        assert_eq!(posts[0].next.as_ref().unwrap().title, "b");
        assert_eq!(posts[1].prev.as_ref().unwrap().permalink, "/blog/2026/01/01/1");
        assert_eq!(posts[1].next.as_ref().unwrap().permalink, "/blog/2026/01/03/1");
        assert_eq!(posts[2].next, None);
    }

    #[test]
    fn equal_dates_keep_filename_order() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "2026-01-01-z.md", "---\ntitle: Z\n---\n");
        write(tmp.path(), "2026-01-01-a.md", "---\ntitle: A\n---\n");
        let posts = load_posts(tmp.path(), jst()).unwrap();
        assert_eq!(posts[0].title, "A");
        assert_eq!(posts[1].title, "Z");
        assert_eq!(posts[1].permalink, "/blog/2026/01/01/2");
    }

    #[test]
    fn load_post_reports_path_on_error() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "broken.md", "no header here");
        let err = load_posts(tmp.path(), jst()).unwrap_err();
        assert!(matches!(
            &err,
            PostError::Parse { path, source: ParseError::MissingFrontMatter }
                if path.ends_with("broken.md")
        ));
    }

    #[test]
    fn output_dir_follows_permalink() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "2026-01-27-x.md", "---\ntitle: X\n---\n");
        let posts = load_posts(tmp.path(), jst()).unwrap();
        assert_eq!(
            posts[0].output_dir(Path::new("public")),
            Path::new("public/blog/2026/01/27/1")
        );
    }
}
