//! Filesystem record source scanning a media directory.

use std::path::{Path, PathBuf};

use anyhow::Result;
use raster_gate_core::{ImageRecord, RecordSource};
use tracing::{debug, warn};

/// Supported image extensions.
const RASTER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff", "tif", "webp", "bmp", "gif"];

/// Record source over the image files under a directory.
///
/// The directory is scanned once, at construction. Derived variants such as
/// `photo-150x150.jpg` are skipped when their original exists. Records are
/// sorted by path and numbered from 1.
pub struct FsRecordSource {
    records: Vec<ImageRecord>,
}

impl FsRecordSource {
    /// Scans `root` for images.
    ///
    /// # Arguments
    ///
    /// * `root` - Media directory, or a single image file
    /// * `recursive` - Whether to recurse into subdirectories
    #[must_use]
    pub fn scan(root: &Path, recursive: bool) -> Self {
        let mut files = Vec::new();

        if root.is_file() {
            if is_supported_image(root) {
                files.push(root.to_path_buf());
            } else {
                warn!("Unsupported file type: {}", root.display());
            }
        } else if root.is_dir() {
            collect_from_dir(root, recursive, &mut files);
        } else {
            warn!("Path does not exist: {}", root.display());
        }

        files.sort();
        let originals: Vec<PathBuf> = files
            .iter()
            .filter(|path| !is_derived_variant(path, &files))
            .cloned()
            .collect();
        debug!(
            "Found {} images ({} derived variants skipped)",
            originals.len(),
            files.len() - originals.len()
        );

        let records = originals
            .into_iter()
            .zip(1u64..)
            .map(|(path, id)| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                ImageRecord::new(id, name, path)
            })
            .collect();

        Self { records }
    }
}

impl RecordSource for FsRecordSource {
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
}

fn collect_from_dir(dir: &Path, recursive: bool, files: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            warn!("Failed to read directory {}: {e}", dir.display());
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() && is_supported_image(&path) {
            files.push(path);
        } else if path.is_dir() && recursive {
            collect_from_dir(&path, recursive, files);
        }
    }
}

/// Checks if a path has a supported image extension.
fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|e| RASTER_EXTENSIONS.contains(&e.as_str()))
}

/// Returns true for `<stem>-<w>x<h>.<ext>` when `<stem>.<ext>` is also present.
fn is_derived_variant(path: &Path, all: &[PathBuf]) -> bool {
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return false;
    };
    let Some((original, size)) = stem.rsplit_once('-') else {
        return false;
    };
    let Some((w, h)) = size.split_once('x') else {
        return false;
    };
    let is_number = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_number(w) || !is_number(h) {
        return false;
    }

    let mut original_path = path.with_file_name(original);
    if let Some(ext) = path.extension() {
        original_path.set_extension(ext);
    }
    all.binary_search(&original_path).is_ok()
}
