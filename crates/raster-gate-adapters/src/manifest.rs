//! Manifest record source reading an exported attachment list.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use raster_gate_core::{ImageRecord, RecordSource};
use serde::Deserialize;
use tracing::{debug, info};

/// One attachment entry in a manifest file.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    /// Attachment id.
    pub id: u64,
    /// Display name. Defaults to the path's file name.
    #[serde(default)]
    pub name: Option<String>,
    /// File path, relative to the base directory or absolute.
    #[serde(default)]
    pub path: PathBuf,
    /// Id of the attachment this entry was derived from, if any.
    #[serde(default)]
    pub parent: Option<u64>,
}

/// Record source over a JSON array of attachment entries.
///
/// Entries with a parent are derived variants and are dropped. The rest are
/// served in ascending id order.
pub struct ManifestRecordSource {
    records: Vec<ImageRecord>,
    base_dir: PathBuf,
}

impl ManifestRecordSource {
    /// Loads a manifest file.
    ///
    /// Relative paths resolve against `base_dir`, or the manifest's own
    /// directory when none is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON array of
    /// entries.
    pub fn load(manifest: &Path, base_dir: Option<&Path>) -> Result<Self> {
        let content = std::fs::read_to_string(manifest)
            .with_context(|| format!("Failed to read manifest {}", manifest.display()))?;
        let entries: Vec<ManifestEntry> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse manifest {}", manifest.display()))?;

        let base_dir = base_dir.map_or_else(
            || {
                manifest
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_default()
            },
            Path::to_path_buf,
        );
        info!(
            "Loaded {} manifest entries from {}",
            entries.len(),
            manifest.display()
        );

        Ok(Self::from_entries(entries, base_dir))
    }

    /// Builds a source from already-parsed entries.
    #[must_use]
    pub fn from_entries(entries: Vec<ManifestEntry>, base_dir: PathBuf) -> Self {
        let total = entries.len();
        let mut records: Vec<ImageRecord> = entries
            .into_iter()
            .filter(|entry| entry.parent.is_none())
            .map(|entry| {
                let name = entry.name.unwrap_or_else(|| {
                    entry
                        .path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default()
                });
                ImageRecord::new(entry.id, name, entry.path)
            })
            .collect();
        records.sort_by_key(|record| record.id);
        debug!(
            "{} top-level records ({} derived skipped)",
            records.len(),
            total - records.len()
        );

        Self { records, base_dir }
    }
}

impl RecordSource for ManifestRecordSource {
    fn count_candidates(&self) -> Result<usize> {
        Ok(self.records.len())
    }

    fn fetch_page(&self, limit: usize, offset: usize) -> Result<Vec<ImageRecord>> {
        Ok(self
            .records
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn resolve_path(&self, record: &ImageRecord) -> Option<PathBuf> {
        if record.path.as_os_str().is_empty() {
            return None;
        }
        Some(self.base_dir.join(&record.path))
    }
}
