//! Record and error types for the annotation store.

use chrono::NaiveDateTime;
use labelbench_core::{BBox, Label, LabeledBox};
use serde::Serialize;
use thiserror::Error;

/// Error types for annotation store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be opened or configured.
    #[error("Failed to open annotation store: {0}")]
    Open(#[source] rusqlite::Error),

    /// A query against the store failed.
    #[error("Failed to read annotations: {0}")]
    Read(#[source] rusqlite::Error),

    /// An insert (or schema creation) failed. Nothing was committed.
    #[error("Failed to write annotations: {0}")]
    Write(#[source] rusqlite::Error),

    /// The database was created by a newer schema than this build knows.
    #[error("Annotation store schema version {found} is newer than supported version {supported}")]
    VersionMismatch { found: i64, supported: i64 },

    /// An annotation must reference an image.
    #[error("Image path must not be empty")]
    InvalidImagePath,

    /// A writer panicked while holding the connection.
    #[error("Annotation store connection lock poisoned")]
    Poisoned,

    /// I/O error while preparing the database location.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One persisted annotation row.
///
/// The label is kept as recorded; the store does not re-validate rows on the
/// way out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub id: i64,
    pub image_path: String,
    pub label: String,
    pub bbox: BBox,
    pub created_at: NaiveDateTime,
}

/// An annotation waiting to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAnnotation {
    pub image_path: String,
    pub label: Label,
    pub bbox: BBox,
}

impl NewAnnotation {
    pub fn new(image_path: impl Into<String>, label: Label, bbox: BBox) -> Self {
        Self {
            image_path: image_path.into(),
            label,
            bbox,
        }
    }

    /// Attach a labeled box to an image.
    pub fn from_labeled(image_path: impl Into<String>, labeled: &LabeledBox) -> Self {
        Self::new(image_path, labeled.label.clone(), labeled.bbox)
    }
}

/// Number of annotations carrying one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}
