use crate::models::Listing;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// JSON snapshot of every listing collected so far.
///
/// Each save replaces the whole document through a temp file and a rename,
/// so a reader never sees a half-written array.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    path: PathBuf,
}

impl Checkpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn save(&self, listings: &[Listing]) -> Result<()> {
        let json = serde_json::to_string_pretty(listings).context("Failed to serialize listings")?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        debug!(path = %self.path.display(), count = listings.len(), "Checkpoint saved");
        Ok(())
    }

    /// Previously saved listings, or `None` when there is nothing usable
    /// (missing file or an empty array).
    pub async fn load(&self) -> Result<Option<Vec<Listing>>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        if raw.trim().is_empty() {
            return Ok(None);
        }

        let listings: Vec<Listing> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;

        Ok((!listings.is_empty()).then_some(listings))
    }
}
