//! Mock implementations of core port traits.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use raster_gate_core::domain::ImageRecord;
use raster_gate_core::ports::{
    DecodedImage, DecodingBackend, Notice, NotificationSink, RecordSource,
};

/// Mock implementation of `DecodingBackend` for testing.
///
/// Returns canned properties per path and tracks which paths were opened.
/// Availability can be flipped at any time to simulate the capability
/// disappearing between calls.
pub struct MockDecodingBackend {
    available: AtomicBool,
    images: Mutex<HashMap<PathBuf, Result<DecodedImage, String>>>,
    fallback: Option<DecodedImage>,
    opened: Mutex<Vec<PathBuf>>,
}

impl MockDecodingBackend {
    /// Creates an available backend that knows no images.
    #[must_use]
    pub fn new() -> Self {
        Self {
            available: AtomicBool::new(true),
            images: Mutex::new(HashMap::new()),
            fallback: None,
            opened: Mutex::new(Vec::new()),
        }
    }

    /// Creates a backend that reports itself as not installed.
    #[must_use]
    pub fn unavailable() -> Self {
        let backend = Self::new();
        backend.set_available(false);
        backend
    }

    /// Creates a backend returning the same properties for every path.
    #[must_use]
    pub fn uniform(resolution: Option<&str>, color_space: Option<&str>) -> Self {
        Self {
            fallback: Some(decoded(resolution, color_space)),
            ..Self::new()
        }
    }

    /// Registers properties for a path.
    #[must_use]
    pub fn with_image(
        self,
        path: impl Into<PathBuf>,
        resolution: Option<&str>,
        color_space: Option<&str>,
    ) -> Self {
        self.images
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), Ok(decoded(resolution, color_space)));
        self
    }

    /// Registers a decode failure for a path.
    #[must_use]
    pub fn with_broken(self, path: impl Into<PathBuf>, reason: &str) -> Self {
        self.images
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), Err(reason.to_string()));
        self
    }

    /// Sets whether the backend reports itself as available.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Returns every path passed to `open`, in call order.
    #[must_use]
    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `open` calls.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.opened().len()
    }
}

impl Default for MockDecodingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodingBackend for MockDecodingBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn open(&self, path: &Path) -> anyhow::Result<DecodedImage> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_path_buf());

        let known = self
            .images
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned();

        match (known, &self.fallback) {
            (Some(Ok(image)), _) => Ok(image),
            (Some(Err(reason)), _) => Err(anyhow::anyhow!(reason)),
            (None, Some(image)) => Ok(image.clone()),
            (None, None) => anyhow::bail!("no such image: {}", path.display()),
        }
    }
}

fn decoded(resolution: Option<&str>, color_space: Option<&str>) -> DecodedImage {
    DecodedImage::new(
        resolution.map(str::to_string),
        color_space.map(str::to_string),
    )
}

/// Mock implementation of `RecordSource` for testing.
///
/// Serves records from memory and records every page request. The reported
/// candidate count can differ from the records held, to simulate a stale
/// count.
pub struct MockRecordSource {
    records: Vec<ImageRecord>,
    count: usize,
    fetches: Mutex<Vec<(usize, usize)>>,
}

impl MockRecordSource {
    /// Creates a source whose count matches its records.
    #[must_use]
    pub fn new(records: Vec<ImageRecord>) -> Self {
        let count = records.len();
        Self {
            records,
            count,
            fetches: Mutex::new(Vec::new()),
        }
    }

    /// Overrides the candidate count reported by `count_candidates`.
    #[must_use]
    pub const fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Returns every `(limit, offset)` passed to `fetch_page`.
    #[must_use]
    pub fn fetches(&self) -> Vec<(usize, usize)> {
        self.fetches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RecordSource for MockRecordSource {
    fn count_candidates(&self) -> anyhow::Result<usize> {
        Ok(self.count)
    }

    fn fetch_page(&self, limit: usize, offset: usize) -> anyhow::Result<Vec<ImageRecord>> {
        self.fetches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((limit, offset));
        Ok(self
            .records
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Mock implementation of `NotificationSink` for testing.
///
/// Captures notices for later assertions.
pub struct MockNotificationSink {
    notices: Mutex<Vec<Notice>>,
}

impl MockNotificationSink {
    /// Creates a new mock sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            notices: Mutex::new(Vec::new()),
        }
    }

    /// Returns all captured notices.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the plain-text messages of all captured notices.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.notices().iter().filter_map(Notice::message).collect()
    }

    /// Returns the number of `RuleFailed` notices.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.notices()
            .iter()
            .filter(|n| matches!(n, Notice::RuleFailed { .. }))
            .count()
    }

    /// Returns the number of `FileMissing` notices.
    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.notices()
            .iter()
            .filter(|n| matches!(n, Notice::FileMissing { .. }))
            .count()
    }

    /// Returns the number of `PageFetched` notices.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.notices()
            .iter()
            .filter(|n| matches!(n, Notice::PageFetched { .. }))
            .count()
    }

    /// Returns the counts from the `Summary` notice, if any.
    #[must_use]
    pub fn summary(&self) -> Option<(usize, usize, usize)> {
        self.notices().iter().find_map(|n| match n {
            Notice::Summary {
                checked,
                errors,
                missing,
            } => Some((*checked, *errors, *missing)),
            _ => None,
        })
    }
}

impl Default for MockNotificationSink {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for MockNotificationSink {
    fn on_notice(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}
