//! Record source port for enumerating stored images.

use std::path::PathBuf;

use crate::domain::ImageRecord;

/// Port for paging through top-level image records.
///
/// Derived variants (thumbnails, resized copies) are never returned.
/// Records are ordered by ascending id so paging with a growing offset
/// neither skips nor repeats records of an append-only set.
pub trait RecordSource: Send + Sync {
    /// Returns the number of candidate records.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be queried.
    fn count_candidates(&self) -> anyhow::Result<usize>;

    /// Returns up to `limit` records starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be queried.
    fn fetch_page(&self, limit: usize, offset: usize) -> anyhow::Result<Vec<ImageRecord>>;

    /// Resolves the on-disk path of a record, if it has one.
    fn resolve_path(&self, record: &ImageRecord) -> Option<PathBuf> {
        (!record.path.as_os_str().is_empty()).then(|| record.path.clone())
    }
}
