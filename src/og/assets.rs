//! Font and avatar assets for OG images.
//!
//! Loaded once per build and then only read. The font is required. The
//! avatar is optional: if it cannot be read here, or cannot be decoded at
//! render time, the footer is drawn without it and a warning is logged.

use super::measure::{OgError, OgFont};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::warn;

pub struct OgAssets {
    font: OgFont,
    avatar: Option<Vec<u8>>,
    fingerprint: String,
}

impl OgAssets {
    /// Read and parse the assets from disk.
    pub fn load(font_path: &Path, avatar_path: &Path) -> Result<Self, OgError> {
        let font_bytes = std::fs::read(font_path).map_err(|source| OgError::AssetRead {
            path: font_path.to_path_buf(),
            source,
        })?;
        let avatar = match std::fs::read(avatar_path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(path = %avatar_path.display(), error = %e, "avatar unreadable, footer will omit it");
                None
            }
        };
        Self::from_bytes(&font_bytes, avatar)
    }

    pub fn from_bytes(font_bytes: &[u8], avatar: Option<Vec<u8>>) -> Result<Self, OgError> {
        let font = OgFont::from_bytes(font_bytes)?;

        let mut hasher = Sha256::new();
        hasher.update(font_bytes);
        hasher.update(b"\0avatar\0");
        if let Some(bytes) = &avatar {
            hasher.update(bytes);
        }
        let fingerprint = format!("{:x}", hasher.finalize());

        Ok(Self {
            font,
            avatar,
            fingerprint,
        })
    }

    pub fn font(&self) -> &OgFont {
        &self.font
    }

    pub fn avatar_bytes(&self) -> Option<&[u8]> {
        self.avatar.as_deref()
    }

    /// SHA-256 over the font and avatar bytes. Changes whenever either asset
    /// changes, so cached images rendered with old assets are invalidated.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}
