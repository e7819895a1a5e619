//! Labelbench Dataset - annotation storage and augmentation
//!
//! This crate owns everything with side effects: the SQLite annotation
//! store, the augmentation engine that writes transformed images and their
//! boxes, configuration, a dataset summary, and the seams to the
//! surrounding tools (source image discovery and box-suggesting detectors).
//!
//! # Quick start
//!
//! ```ignore
//! use labelbench_dataset::{AnnotationStore, Augmenter, DatasetConfig};
//!
//! let config = DatasetConfig::from_env()?;
//! let store = AnnotationStore::open(&config.db_path)?;
//! let report = Augmenter::new(&config, &store).run()?;
//! println!("{} rows written", report.annotations_written);
//! ```

pub mod config;
pub mod detector;
pub mod engine;
pub mod sources;
pub mod store;
pub mod summary;

pub use config::{ConfigError, DatasetConfig};
pub use detector::{accepted_suggestions, Detector, DetectorError, Suggestion};
pub use engine::{AugmentError, AugmentReport, Augmenter};
pub use sources::discover_source_images;
pub use store::{Annotation, AnnotationStore, LabelCount, NewAnnotation, StoreError};
pub use summary::{summarize, DatasetSummary, SummaryError};

/// Augment the dataset described by the environment.
///
/// Loads [`DatasetConfig::from_env`], opens the store at its `db_path`, and
/// runs one [`Augmenter`] pass.
pub fn augment_dataset() -> Result<AugmentReport, AugmentError> {
    let config = DatasetConfig::from_env()?;
    let store = AnnotationStore::open(&config.db_path)?;
    Augmenter::new(&config, &store).run()
}
