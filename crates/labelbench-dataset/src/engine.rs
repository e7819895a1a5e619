//! Augmentation engine.
//!
//! Reads every stored annotation, groups the rows by source image, and for
//! each readable source writes one augmented JPEG per [`Augmentation`] plus
//! the matching transformed annotations.
//!
//! Per source image and transform the order is fixed: the image file is
//! written first, then its rows are inserted in one transaction. A failed
//! write leaves no rows behind for that transform.
//!
//! Derived rows carry the label in the vocabulary's canonical form (trimmed,
//! lower-case), so a legacy row labeled `Car` yields augmented rows labeled
//! `car`. Source rows are never rewritten.
//!
//! Augmented file names only keep the source stem. When two sources in
//! different directories share a stem, the first one augmented in a pass
//! owns the names and the others are skipped with a warning.

use std::collections::HashMap;
use std::io;
use std::path::Path;

use labelbench_core::{
    decode_file, encode_image, Augmentation, DecodedImage, EncodeError, LabeledBox,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use thiserror::Error;

use crate::config::{ConfigError, DatasetConfig};
use crate::sources::normalize_path;
use crate::store::{Annotation, AnnotationStore, NewAnnotation, StoreError};

/// Error types that abort an augmentation pass.
#[derive(Debug, Error)]
pub enum AugmentError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The augmented directory could not be created.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Counters for one augmentation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AugmentReport {
    /// Source images that were decoded and augmented.
    pub images_processed: usize,
    /// Annotation groups whose source image was missing, unreadable, or
    /// shared its file stem with a source augmented earlier in the pass.
    pub images_skipped: usize,
    /// Rows inserted for augmented images.
    pub annotations_written: usize,
    /// Derived boxes not written: clipped to nothing, or carrying a label
    /// outside the vocabulary.
    pub boxes_dropped: usize,
    /// Augmented images that could not be encoded or written.
    pub artifacts_failed: usize,
}

/// Annotations that share one source image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageGroup {
    pub image_path: String,
    pub annotations: Vec<Annotation>,
}

/// Group rows by image path, ordered by each path's first appearance.
pub fn group_by_image(rows: Vec<Annotation>) -> Vec<ImageGroup> {
    let mut groups: Vec<ImageGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        match index.get(&row.image_path) {
            Some(&i) => groups[i].annotations.push(row),
            None => {
                index.insert(row.image_path.clone(), groups.len());
                groups.push(ImageGroup {
                    image_path: row.image_path.clone(),
                    annotations: vec![row],
                });
            }
        }
    }

    groups
}

/// Runs the augmentation menu over an annotation store.
pub struct Augmenter<'a> {
    config: &'a DatasetConfig,
    store: &'a AnnotationStore,
    rng: StdRng,
}

impl<'a> Augmenter<'a> {
    /// Create an augmenter seeded from `config.seed`, or from OS entropy
    /// when unset.
    pub fn new(config: &'a DatasetConfig, store: &'a AnnotationStore) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, store, rng)
    }

    pub fn with_rng(config: &'a DatasetConfig, store: &'a AnnotationStore, rng: StdRng) -> Self {
        Self { config, store, rng }
    }

    /// Augment every annotated source image once.
    ///
    /// Store failures abort the pass. Unreadable sources and failed
    /// artifacts are logged, counted, and skipped.
    pub fn run(&mut self) -> Result<AugmentReport, AugmentError> {
        std::fs::create_dir_all(&self.config.augmented_dir)?;

        let groups = group_by_image(self.store.fetch_all()?);
        tracing::info!(
            groups = groups.len(),
            augmented_dir = %self.config.augmented_dir.display(),
            "Starting augmentation"
        );

        let augmented_root = normalize_path(&self.config.augmented_dir);
        let mut stems: HashMap<String, String> = HashMap::new();
        let mut report = AugmentReport::default();
        for group in &groups {
            if self.config.skip_augmented_sources
                && normalize_path(Path::new(&group.image_path)).starts_with(&augmented_root)
            {
                tracing::debug!(image_path = %group.image_path, "Skipping augmented image");
                continue;
            }
            self.augment_group(group, &mut stems, &mut report)?;
        }

        tracing::info!(
            images_processed = report.images_processed,
            images_skipped = report.images_skipped,
            annotations_written = report.annotations_written,
            boxes_dropped = report.boxes_dropped,
            artifacts_failed = report.artifacts_failed,
            "Augmentation complete"
        );
        Ok(report)
    }

    fn augment_group(
        &mut self,
        group: &ImageGroup,
        stems: &mut HashMap<String, String>,
        report: &mut AugmentReport,
    ) -> Result<(), AugmentError> {
        let source = Path::new(&group.image_path);
        let Some(stem) = source.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            tracing::warn!(image_path = %group.image_path, "Source path has no file name");
            report.images_skipped += 1;
            return Ok(());
        };

        let image = match decode_file(source) {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!(image_path = %group.image_path, error = %e, "Skipping unreadable source image");
                report.images_skipped += 1;
                return Ok(());
            }
        };

        if let Some(owner) = stems.get(&stem) {
            tracing::warn!(
                image_path = %group.image_path,
                owner = %owner,
                stem = %stem,
                "Skipping source whose augmented names are taken"
            );
            report.images_skipped += 1;
            return Ok(());
        }
        stems.insert(stem.clone(), group.image_path.clone());

        let mut boxes: Vec<LabeledBox> = Vec::with_capacity(group.annotations.len());
        let mut rejected = 0;
        for annotation in &group.annotations {
            match self.config.labels.validate(&annotation.label) {
                Ok(label) => boxes.push(LabeledBox::new(label, annotation.bbox)),
                Err(e) => {
                    tracing::warn!(id = annotation.id, error = %e, "Ignoring annotation");
                    rejected += 1;
                }
            }
        }

        for aug in Augmentation::ALL {
            let out_path = self.config.augmented_dir.join(aug.file_name(&stem));
            if let Err(e) = self.write_artifact(aug, &image, &out_path) {
                tracing::warn!(path = %out_path.display(), augmentation = %aug, error = %e, "Failed to write augmented image");
                report.artifacts_failed += 1;
                continue;
            }

            let out_path = out_path.to_string_lossy().into_owned();
            let mut rows = Vec::with_capacity(boxes.len());
            for labeled in &boxes {
                match aug.derive_bbox(labeled.bbox, image.width, image.height) {
                    Some(bbox) => rows.push(NewAnnotation::from_labeled(
                        out_path.clone(),
                        &labeled.with_bbox(bbox),
                    )),
                    None => {
                        tracing::debug!(
                            image_path = %out_path,
                            label = %labeled.label,
                            bbox = ?labeled.bbox,
                            "Dropping box outside augmented image"
                        );
                        report.boxes_dropped += 1;
                    }
                }
            }
            report.boxes_dropped += rejected;

            self.store.insert_many(&rows)?;
            report.annotations_written += rows.len();
            tracing::info!(path = %out_path, annotations = rows.len(), "Wrote augmented image");
        }

        report.images_processed += 1;
        Ok(())
    }

    fn write_artifact(
        &mut self,
        aug: Augmentation,
        image: &DecodedImage,
        out_path: &Path,
    ) -> Result<(), ArtifactError> {
        let augmented = aug.apply_image(image, &mut self.rng);
        let bytes = encode_image(&augmented, self.config.jpeg_quality)?;
        std::fs::write(out_path, bytes)?;
        Ok(())
    }
}

#[derive(Debug, Error)]
enum ArtifactError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use labelbench_core::BBox;

    fn row(id: i64, path: &str) -> Annotation {
        Annotation {
            id,
            image_path: path.to_string(),
            label: "car".to_string(),
            bbox: BBox::new(0, 0, 1, 1),
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_group_by_image_keeps_first_appearance_order() {
        let groups = group_by_image(vec![
            row(1, "b.jpg"),
            row(2, "a.jpg"),
            row(3, "b.jpg"),
            row(4, "c.jpg"),
        ]);
        let paths: Vec<_> = groups.iter().map(|g| g.image_path.as_str()).collect();
        assert_eq!(paths, vec!["b.jpg", "a.jpg", "c.jpg"]);
        let ids: Vec<_> = groups[0].annotations.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_group_by_image_empty() {
        assert!(group_by_image(Vec::new()).is_empty());
    }

    #[test]
    fn test_run_on_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatasetConfig {
            augmented_dir: dir.path().join("augmented"),
            seed: Some(7),
            ..DatasetConfig::default()
        };
        let store = AnnotationStore::open_in_memory().unwrap();

        let report = Augmenter::new(&config, &store).run().unwrap();
        assert_eq!(report, AugmentReport::default());
        assert!(config.augmented_dir.is_dir());
        assert_eq!(store.count().unwrap(), 0);
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbImage::from_pixel(width, height, image::Rgb([40, 80, 160]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_derived_labels_use_canonical_form() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatasetConfig {
            db_path: dir.path().join("annotations.db"),
            augmented_dir: dir.path().join("augmented"),
            seed: Some(7),
            ..DatasetConfig::default()
        };
        let source = dir.path().join("legacy.png");
        write_png(&source, 20, 20);

        let store = AnnotationStore::open(&config.db_path).unwrap();
        // Rows written by older tooling kept the casing the user typed
        let raw = rusqlite::Connection::open(&config.db_path).unwrap();
        raw.execute(
            "INSERT INTO annotations (image_path, label, x1, y1, x2, y2) VALUES (?1, 'Car', 2, 2, 8, 8)",
            [source.to_string_lossy()],
        )
        .unwrap();
        drop(raw);

        let report = Augmenter::new(&config, &store).run().unwrap();
        assert_eq!(report.annotations_written, 5);

        let rows = store.fetch_all().unwrap();
        assert_eq!(rows[0].label, "Car");
        assert!(rows[1..].iter().all(|r| r.label == "car"));
    }

    #[test]
    fn test_relative_augmented_paths_are_recognized() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatasetConfig {
            augmented_dir: dir.path().join("augmented"),
            seed: Some(7),
            ..DatasetConfig::default()
        };
        std::fs::create_dir_all(&config.augmented_dir).unwrap();
        let store = AnnotationStore::open_in_memory().unwrap();
        let label = config.labels.validate("car").unwrap();

        // Same file spelled with `.` and `..` segments
        let dotted = dir.path().join("augmented/./x_rot90.jpg");
        let parent = dir.path().join("other/../augmented/x_flipH.jpg");
        write_png(&dir.path().join("augmented/x_rot90.jpg"), 10, 10);
        write_png(&dir.path().join("augmented/x_flipH.jpg"), 10, 10);
        store
            .insert(&dotted.to_string_lossy(), &label, BBox::new(1, 1, 5, 5))
            .unwrap();
        store
            .insert(&parent.to_string_lossy(), &label, BBox::new(1, 1, 5, 5))
            .unwrap();

        let report = Augmenter::new(&config, &store).run().unwrap();
        assert_eq!(report, AugmentReport::default());
        assert!(!dir.path().join("augmented/x_rot90_rot90.jpg").exists());
    }

    #[test]
    fn test_missing_source_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatasetConfig {
            augmented_dir: dir.path().join("augmented"),
            seed: Some(7),
            ..DatasetConfig::default()
        };
        let store = AnnotationStore::open_in_memory().unwrap();
        let label = config.labels.validate("car").unwrap();
        let missing = dir.path().join("gone.jpg");
        store
            .insert(&missing.to_string_lossy(), &label, BBox::new(1, 1, 5, 5))
            .unwrap();

        let report = Augmenter::new(&config, &store).run().unwrap();
        assert_eq!(report.images_skipped, 1);
        assert_eq!(report.images_processed, 0);
        assert_eq!(store.count().unwrap(), 1);
    }
}
