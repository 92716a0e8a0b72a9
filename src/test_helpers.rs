//! Shared test utilities: throwaway site directories and post files.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = setup_site();
//! write_post(site.path(), "2026-01-27-hello.markdown", "Hello", "2026-01-27 10:00", "Body");
//! let report = generate(site.path(), &SiteConfig::default(), &options).unwrap();
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =========================================================================
// Fixture setup
// =========================================================================

/// An empty site root with a `posts/` directory.
pub fn setup_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("posts")).unwrap();
    tmp
}

/// Write `posts/<file_name>` with the given front matter and body.
pub fn write_post(root: &Path, file_name: &str, title: &str, date: &str, body: &str) -> PathBuf {
    let path = root.join("posts").join(file_name);
    fs::write(
        &path,
        format!("---\ntitle: {title}\ndate: {date}\n---\n{body}\n"),
    )
    .unwrap();
    path
}

/// Names of the entries in `dir`, sorted.
pub fn dir_listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("cannot list {}: {e}", dir.display()))
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// =========================================================================
// Fonts
// =========================================================================

/// Bytes of the font named by `NEBEL_TEST_FONT`.
///
/// Tests that call this are `#[ignore]`d; run them with
/// `NEBEL_TEST_FONT=/path/to/font.otf cargo test -- --ignored`.
pub fn test_font_bytes() -> Vec<u8> {
    let path = std::env::var_os("NEBEL_TEST_FONT").expect("NEBEL_TEST_FONT must name a font");
    fs::read(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", Path::new(&path).display()))
}
