//! Scaffolding for `nebel new <title>`.
//!
//! Writes `posts/YYYY-MM-DD-<title>.markdown` containing only front matter,
//! stamped with the current time in the configured zone.

use crate::config::{ConfigError, SiteConfig};
use crate::naming::post_file_name;
use crate::post::FrontMatter;
use chrono::{DateTime, FixedOffset, Utc};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewPostError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("cannot write front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{0} already exists")]
    AlreadyExists(PathBuf),
    #[error("post title must not be empty")]
    EmptyTitle,
}

/// Front matter for a fresh post. The title is quoted as YAML needs.
pub fn front_matter(title: &str, now: DateTime<FixedOffset>) -> Result<String, NewPostError> {
    let front = FrontMatter {
        title: title.trim().to_string(),
        date: Some(now.format("%Y-%m-%d %H:%M:%S %z").to_string()),
    };
    Ok(front.to_block()?)
}

/// Create a post stamped with `now`. Never overwrites an existing file.
pub fn create_post(
    root: &Path,
    config: &SiteConfig,
    title: &str,
    now: DateTime<FixedOffset>,
) -> Result<PathBuf, NewPostError> {
    if title.trim().is_empty() {
        return Err(NewPostError::EmptyTitle);
    }
    let posts_dir = root.join(&config.paths.posts);
    fs::create_dir_all(&posts_dir)?;
    let path = posts_dir.join(post_file_name(now.date_naive(), title));

    let content = front_matter(title, now)?;
    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(NewPostError::AlreadyExists(path));
        }
        Err(e) => return Err(e.into()),
    };
    file.write_all(content.as_bytes())?;
    tracing::debug!(path = %path.display(), "created post");
    Ok(path)
}

/// [`create_post`] at the current time in the configured zone.
pub fn create_post_now(
    root: &Path,
    config: &SiteConfig,
    title: &str,
) -> Result<PathBuf, NewPostError> {
    let now = Utc::now().with_timezone(&config.timezone()?);
    create_post(root, config, title, now)
}
