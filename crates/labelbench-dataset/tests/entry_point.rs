//! `augment_dataset` reads its configuration from the environment.
//!
//! Kept in its own test binary so the environment is not shared with other
//! tests.

use image::{Rgb, RgbImage};
use labelbench_core::{BBox, LabelSet};
use labelbench_dataset::{augment_dataset, AnnotationStore, AugmentError, ConfigError};

#[test]
fn test_augment_dataset_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("annotations.db");
    let augmented_dir = dir.path().join("augmented");
    let source = dir.path().join("scene.png");
    RgbImage::from_pixel(40, 30, Rgb([10, 200, 30]))
        .save(&source)
        .unwrap();

    {
        let store = AnnotationStore::open(&db_path).unwrap();
        let label = LabelSet::default().validate("urban").unwrap();
        store
            .insert(&source.to_string_lossy(), &label, BBox::new(5, 5, 20, 20))
            .unwrap();
    }

    std::env::set_var("LABELBENCH_JPEG_QUALITY", "not-a-number");
    let err = augment_dataset().unwrap_err();
    assert!(matches!(err, AugmentError::Config(ConfigError::Invalid { .. })));

    std::env::set_var("LABELBENCH_DB_PATH", &db_path);
    std::env::set_var("LABELBENCH_AUGMENTED_DIR", &augmented_dir);
    std::env::set_var("LABELBENCH_JPEG_QUALITY", "85");
    std::env::set_var("LABELBENCH_SEED", "3");

    let report = augment_dataset().unwrap();
    assert_eq!(report.images_processed, 1);
    assert_eq!(report.annotations_written, 5);
    assert!(augmented_dir.join("scene_bright.jpg").exists());

    let store = AnnotationStore::open(&db_path).unwrap();
    assert_eq!(store.count().unwrap(), 6);
}
