//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the site root next to the `posts/` directory and is optional: stock
//! defaults are used for anything it leaves out.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "nebel"
//! author = ""
//! base_url = "https://example.org"   # Absolute URL, used in the feed and og:url
//! og_label = "example.org"           # Site name drawn in the OG image footer
//! stylesheet = "/css/style.css"
//! utc_offset_hours = 9               # Zone for front-matter dates and `new`
//!
//! [paths]
//! posts = "posts"
//! static = "static"
//! output = "public"
//!
//! [feed]
//! entries = 9
//!
//! [og]
//! enabled = true
//! font = "assets/fonts/NotoSansCJKjp-Bold.otf"
//! avatar = "assets/avatar.png"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse, override just the values you want:
//!
//! ```toml
//! [site]
//! title = "Notes"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity: title, author, URLs.
    pub site: SiteSection,
    /// Where posts and static files are read from and output is written.
    pub paths: PathsConfig,
    /// Atom feed settings.
    pub feed: FeedConfig,
    /// Social-preview image settings.
    pub og: OgConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.base_url must not be empty".into(),
            ));
        }
        if !(-12..=14).contains(&self.site.utc_offset_hours) {
            return Err(ConfigError::Validation(
                "site.utc_offset_hours must be between -12 and 14".into(),
            ));
        }
        if self.feed.entries == 0 {
            return Err(ConfigError::Validation(
                "feed.entries must be at least 1".into(),
            ));
        }
        for (key, value) in [
            ("paths.posts", &self.paths.posts),
            ("paths.static", &self.paths.static_dir),
            ("paths.output", &self.paths.output),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }

    /// The zone naive front-matter dates are interpreted in.
    pub fn timezone(&self) -> Result<FixedOffset, ConfigError> {
        FixedOffset::east_opt(self.site.utc_offset_hours * 3600).ok_or_else(|| {
            ConfigError::Validation(format!(
                "site.utc_offset_hours {} is not a valid offset",
                self.site.utc_offset_hours
            ))
        })
    }

    /// Site name for the OG footer, falling back to the title.
    pub fn og_label(&self) -> &str {
        if self.site.og_label.is_empty() {
            &self.site.title
        } else {
            &self.site.og_label
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    pub title: String,
    pub author: String,
    /// Absolute site URL without trailing slash.
    pub base_url: String,
    pub og_label: String,
    /// Stylesheet href linked from every page.
    pub stylesheet: String,
    pub utc_offset_hours: i32,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "nebel".to_string(),
            author: String::new(),
            base_url: "https://example.org".to_string(),
            og_label: "example.org".to_string(),
            stylesheet: "/css/style.css".to_string(),
            utc_offset_hours: 9,
        }
    }
}

/// Directory layout, relative to the site root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub posts: String,
    #[serde(rename = "static")]
    pub static_dir: String,
    pub output: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            posts: "posts".to_string(),
            static_dir: "static".to_string(),
            output: "public".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// Number of newest posts in `atom.xml`.
    pub entries: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { entries: 9 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OgConfig {
    pub enabled: bool,
    /// Bold, CJK-capable font used for the title and footer.
    pub font: String,
    /// Optional avatar; a missing or broken file only drops the avatar circle.
    pub avatar: String,
}

impl Default for OgConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            font: "assets/fonts/NotoSansCJKjp-Bold.otf".to_string(),
            avatar: "assets/avatar.png".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# nebel Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the site root, next to the posts directory.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
title = "nebel"
author = ""

# Absolute URL of the site, without trailing slash.
# Used for feed entry links and og:url / og:image.
base_url = "https://example.org"

# Site name drawn in the footer of generated OG images.
og_label = "example.org"

# Stylesheet linked from every page.
stylesheet = "/css/style.css"

# Hours east of UTC. Front-matter dates without an explicit offset are read
# in this zone, and `nebel new` stamps posts with it.
utc_offset_hours = 9

# ---------------------------------------------------------------------------
# Paths (relative to the site root)
# ---------------------------------------------------------------------------
[paths]
posts = "posts"

# Copied verbatim into the output directory.
static = "static"

output = "public"

# ---------------------------------------------------------------------------
# Atom feed
# ---------------------------------------------------------------------------
[feed]
# Number of newest posts in atom.xml.
entries = 9

# ---------------------------------------------------------------------------
# OG images (ogp.png per post)
# ---------------------------------------------------------------------------
[og]
enabled = true

# Bold font with CJK coverage. Required when enabled.
font = "assets/fonts/NotoSansCJKjp-Bold.otf"

# Optional. If missing or undecodable the footer is drawn without it.
avatar = "assets/avatar.png"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.paths.posts, "posts");
        assert_eq!(config.paths.static_dir, "static");
        assert_eq!(config.paths.output, "public");
        assert_eq!(config.feed.entries, 9);
        assert_eq!(config.site.utc_offset_hours, 9);
        assert!(config.og.enabled);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[site]
title = "Notes"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.site.title, "Notes");
        // Defaults preserved
        assert_eq!(config.site.utc_offset_hours, 9);
        assert_eq!(config.feed.entries, 9);
    }

    #[test]
    fn static_path_uses_toml_key_static() {
        let toml = r#"
[paths]
static = "assets/public"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.paths.static_dir, "assets/public");
    }

    #[test]
    fn timezone_from_offset_hours() {
        let mut config = SiteConfig::default();
        assert_eq!(config.timezone().unwrap().local_minus_utc(), 9 * 3600);
        config.site.utc_offset_hours = -5;
        assert_eq!(config.timezone().unwrap().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn og_label_falls_back_to_title() {
        let mut config = SiteConfig::default();
        assert_eq!(config.og_label(), "example.org");
        config.site.og_label.clear();
        config.site.title = "Notes".into();
        assert_eq!(config.og_label(), "Notes");
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "nebel");
        assert_eq!(config.feed.entries, 9);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[site]
title = "mizzy.org"
base_url = "https://mizzy.org"

[feed]
entries = 3
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "mizzy.org");
        assert_eq!(config.site.base_url, "https://mizzy.org");
        assert_eq!(config.feed.entries, 3);
        // Unspecified values should be defaults
        assert_eq!(config.paths.output, "public");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not [valid toml").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[feed]
entries = 0
"#,
        )
        .unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"entries = 9"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"entries = 3"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("entries").unwrap().as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[og]
enabled = true
font = "a.otf"
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[og]
enabled = false
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let og = merged.get("og").unwrap();
        assert_eq!(og.get("enabled").unwrap().as_bool(), Some(false));
        // font preserved from base
        assert_eq!(og.get("font").unwrap().as_str(), Some("a.otf"));
    }

    #[test]
    fn merge_toml_preserves_base_keys() {
        let base: toml::Value = toml::from_str(
            r#"
a = 1
b = 2
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(r#"a = 10"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(10));
        assert_eq!(merged.get("b").unwrap().as_integer(), Some(2));
    }

    // =========================================================================
    // Validation and unknown keys
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[feed]
entris = 9
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml_str);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[images]\nquality = 90\n");
        assert!(result.is_err());
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_offset_out_of_range() {
        let mut config = SiteConfig::default();
        config.site.utc_offset_hours = 15;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_empty_path() {
        let mut config = SiteConfig::default();
        config.paths.output = " ".into();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("paths.output"));
    }

    #[test]
    fn resolve_config_with_overlay() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str("[og]\nenabled = false\n").unwrap();
        let config = resolve_config(base, Some(overlay)).unwrap();
        assert!(!config.og.enabled);
        assert_eq!(config.og.avatar, "assets/avatar.png");
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.site.title, defaults.site.title);
        assert_eq!(config.site.base_url, defaults.site.base_url);
        assert_eq!(config.paths.static_dir, defaults.paths.static_dir);
        assert_eq!(config.feed.entries, defaults.feed.entries);
        assert_eq!(config.og.font, defaults.og.font);
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value().unwrap();
        for section in ["site", "paths", "feed", "og"] {
            assert!(val.get(section).is_some(), "missing [{section}]");
        }
    }
}
