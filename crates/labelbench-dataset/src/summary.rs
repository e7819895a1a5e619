//! Dataset overview for dashboards and progress reports.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::config::DatasetConfig;
use crate::sources::{discover_source_images, normalize_path};
use crate::store::{Annotation, AnnotationStore, LabelCount, StoreError};

/// Error types for building a [`DatasetSummary`].
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The processed directory exists but could not be listed.
    #[error("Failed to list source images: {0}")]
    Io(#[from] io::Error),
}

/// Snapshot of what the annotation store holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub total_annotations: usize,
    pub label_counts: Vec<LabelCount>,
    /// Distinct images with at least one annotation.
    pub annotated_images: usize,
    /// Source images in `processed_dir` nobody has annotated yet.
    pub unannotated_sources: Vec<PathBuf>,
    /// The first `max_fetch_annotations` rows, ordered by id.
    pub annotations: Vec<Annotation>,
}

/// Build a summary of the dataset described by `config`.
///
/// A missing `processed_dir` counts as having no source images.
pub fn summarize(
    config: &DatasetConfig,
    store: &AnnotationStore,
) -> Result<DatasetSummary, SummaryError> {
    let image_paths = store.image_paths()?;
    let annotated: HashSet<PathBuf> = image_paths
        .iter()
        .map(|p| normalize_path(Path::new(p)))
        .collect();

    let sources = match discover_source_images(&config.processed_dir) {
        Ok(sources) => sources,
        Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e.into()),
    };
    let unannotated_sources = sources
        .into_iter()
        .filter(|p| !annotated.contains(&normalize_path(p)))
        .collect();

    Ok(DatasetSummary {
        total_annotations: store.count()?,
        label_counts: store.label_counts()?,
        annotated_images: image_paths.len(),
        unannotated_sources,
        annotations: store.fetch_annotations(config.max_fetch_annotations)?,
    })
}
