//! OG image cache for incremental builds.
//!
//! Rasterizing a card means fitting the title against up to nine font sizes
//! and drawing every glyph. With a few hundred posts that dominates the
//! build, even though almost no card changes between builds. This module
//! lets `generate` skip rendering when nothing that feeds the image changed.
//!
//! # Cache keys
//!
//! Lookups are by content, not by output path:
//!
//! - **`source_hash`**: SHA-256 of what is printed on the card: title, date
//!   (`YYYY-MM-DD`) and site label.
//! - **`params_hash`**: SHA-256 of how it is printed: the asset fingerprint
//!   (font and avatar bytes) plus the canvas size.
//!
//! A hit requires a matching entry whose file is still on disk. Permalinks
//! are positional (`/blog/2026/01/27/2` depends on how many posts share the
//! day), so an unchanged card can move to a new directory. When the stored
//! path differs from the requested one, the file is copied instead of
//! re-rendered.
//!
//! The manifest is `<output>/.og-cache.json`. `--no-cache` starts from an
//! empty manifest, so every card is rendered and overwritten.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::Path;

const MANIFEST_FILENAME: &str = ".og-cache.json";

/// Bump to invalidate every existing cache when the key computation or the
/// card design changes.
const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct CacheEntry {
    pub source_hash: String,
    pub params_hash: String,
}

/// On-disk map from output path (relative to the output dir) to its entry.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CacheManifest {
    pub version: u32,
    pub entries: HashMap<String, CacheEntry>,
    /// `"{source_hash}:{params_hash}"` → output path. Rebuilt on load.
    #[serde(skip)]
    content_index: HashMap<String, String>,
}

impl CacheManifest {
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: HashMap::new(),
            content_index: HashMap::new(),
        }
    }

    /// Load from the output directory. Missing, corrupt or outdated
    /// manifests yield an empty one.
    pub fn load(output_dir: &Path) -> Self {
        let path = output_dir.join(MANIFEST_FILENAME);
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Self::empty();
        };
        let mut manifest: Self = match serde_json::from_str(&content) {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!(error = %e, "discarding unreadable OG cache manifest");
                return Self::empty();
            }
        };
        if manifest.version != MANIFEST_VERSION {
            return Self::empty();
        }
        manifest.content_index = build_content_index(&manifest.entries);
        manifest
    }

    pub fn save(&self, output_dir: &Path) -> io::Result<()> {
        let path = output_dir.join(MANIFEST_FILENAME);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    /// Stored output path for this content, if its file still exists.
    ///
    /// The path may differ from where the caller wants the image; copying
    /// it over is the caller's job.
    pub fn find_cached(
        &self,
        source_hash: &str,
        params_hash: &str,
        output_dir: &Path,
    ) -> Option<String> {
        let stored = self
            .content_index
            .get(&content_key(source_hash, params_hash))?;
        output_dir.join(stored).exists().then(|| stored.clone())
    }

    /// Record the image at `output_path`. An entry for the same content at
    /// another path is dropped.
    pub fn insert(&mut self, output_path: String, source_hash: String, params_hash: String) {
        let key = content_key(&source_hash, &params_hash);

        // Different content was written over this path earlier in the build.
        if let Some(previous) = self.entries.get(&output_path) {
            let previous_key = content_key(&previous.source_hash, &previous.params_hash);
            if previous_key != key {
                self.content_index.remove(&previous_key);
            }
        }

        if let Some(old_path) = self.content_index.get(&key)
            && *old_path != output_path
        {
            self.entries.remove(old_path.as_str());
        }

        self.content_index.insert(key, output_path.clone());
        self.entries.insert(
            output_path,
            CacheEntry {
                source_hash,
                params_hash,
            },
        );
    }
}

fn content_key(source_hash: &str, params_hash: &str) -> String {
    format!("{source_hash}:{params_hash}")
}

fn build_content_index(entries: &HashMap<String, CacheEntry>) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(path, entry)| {
            (
                content_key(&entry.source_hash, &entry.params_hash),
                path.clone(),
            )
        })
        .collect()
}

/// Hash of the text printed on a card.
pub fn hash_card_source(title: &str, date: &str, label: &str) -> String {
    let mut hasher = Sha256::new();
    for part in [title, date, label] {
        hasher.update(part.as_bytes());
        hasher.update(b"\0");
    }
    format!("{:x}", hasher.finalize())
}

/// Hash of the rendering inputs shared by every card.
pub fn hash_card_params(asset_fingerprint: &str, width: u32, height: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"og-card\0");
    hasher.update(asset_fingerprint.as_bytes());
    hasher.update(width.to_le_bytes());
    hasher.update(height.to_le_bytes());
    format!("{:x}", hasher.finalize())
}

/// How each card was produced during one build.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub copies: u32,
    pub misses: u32,
}

impl CacheStats {
    pub fn hit(&mut self) {
        self.hits += 1;
    }

    pub fn copy(&mut self) {
        self.copies += 1;
    }

    pub fn miss(&mut self) {
        self.misses += 1;
    }

    pub fn total(&self) -> u32 {
        self.hits + self.copies + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.hits, self.copies) {
            (0, 0) => write!(f, "{} rendered", self.misses),
            (hits, 0) => write!(
                f,
                "{hits} cached, {} rendered ({} total)",
                self.misses,
                self.total()
            ),
            (hits, copies) => write!(
                f,
                "{hits} cached, {copies} copied, {} rendered ({} total)",
                self.misses,
                self.total()
            ),
        }
    }
}
