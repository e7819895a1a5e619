//! Dataset locations and augmentation settings.

use std::path::PathBuf;

use labelbench_core::encode::DEFAULT_JPEG_QUALITY;
use labelbench_core::{LabelError, LabelSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// The label list does not form a usable vocabulary.
    #[error("LABELBENCH_LABELS: {0}")]
    Labels(#[from] LabelError),
}

/// Paths and knobs shared by the store and the augmentation engine.
///
/// All fields have defaults matching the conventional `data/` layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// SQLite database holding the annotations.
    pub db_path: PathBuf,
    /// Normalized source images.
    pub processed_dir: PathBuf,
    /// Output directory for augmented images.
    pub augmented_dir: PathBuf,
    /// Label vocabulary annotations must belong to.
    pub labels: LabelSet,
    /// JPEG quality for augmented images (1-100).
    pub jpeg_quality: u8,
    /// Row cap for summary listings.
    pub max_fetch_annotations: usize,
    /// Seed for the brightness jitter; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Ignore annotation groups whose image already lives in `augmented_dir`.
    pub skip_augmented_sources: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data/annotations.db"),
            processed_dir: PathBuf::from("data/processed"),
            augmented_dir: PathBuf::from("augmented"),
            labels: LabelSet::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            max_fetch_annotations: 1000,
            seed: None,
            skip_augmented_sources: true,
        }
    }
}

impl DatasetConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                    |
    /// |-----------------------------|----------------------------|
    /// | `LABELBENCH_DB_PATH`        | `data/annotations.db`      |
    /// | `LABELBENCH_PROCESSED_DIR`  | `data/processed`           |
    /// | `LABELBENCH_AUGMENTED_DIR`  | `augmented`                |
    /// | `LABELBENCH_LABELS`         | `car,traffic,pedestrian,urban` |
    /// | `LABELBENCH_JPEG_QUALITY`   | `95`                       |
    /// | `LABELBENCH_MAX_FETCH`      | `1000`                     |
    /// | `LABELBENCH_SEED`           | unset (random)             |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("LABELBENCH_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("LABELBENCH_PROCESSED_DIR") {
            config.processed_dir = PathBuf::from(path);
        }
        if let Some(path) = lookup("LABELBENCH_AUGMENTED_DIR") {
            config.augmented_dir = PathBuf::from(path);
        }
        if let Some(labels) = lookup("LABELBENCH_LABELS") {
            config.labels = LabelSet::new(labels.split(','))?;
        }
        if let Some(value) = lookup("LABELBENCH_JPEG_QUALITY") {
            let quality = parse_var::<u8>("LABELBENCH_JPEG_QUALITY", &value)?;
            if !(1..=100).contains(&quality) {
                return Err(ConfigError::Invalid {
                    var: "LABELBENCH_JPEG_QUALITY",
                    value,
                    reason: "must be between 1 and 100".to_string(),
                });
            }
            config.jpeg_quality = quality;
        }
        if let Some(value) = lookup("LABELBENCH_MAX_FETCH") {
            config.max_fetch_annotations = parse_var("LABELBENCH_MAX_FETCH", &value)?;
        }
        if let Some(value) = lookup("LABELBENCH_SEED") {
            config.seed = Some(parse_var("LABELBENCH_SEED", &value)?);
        }

        Ok(config)
    }
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DatasetConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, DatasetConfig::default());
        assert_eq!(config.db_path, PathBuf::from("data/annotations.db"));
        assert_eq!(config.augmented_dir, PathBuf::from("augmented"));
        assert_eq!(config.labels.len(), 4);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = DatasetConfig::from_lookup(lookup(&[
            ("LABELBENCH_DB_PATH", "/tmp/ann.db"),
            ("LABELBENCH_AUGMENTED_DIR", "/tmp/aug"),
            ("LABELBENCH_LABELS", "Dog, cat"),
            ("LABELBENCH_JPEG_QUALITY", "80"),
            ("LABELBENCH_SEED", "42"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/ann.db"));
        assert_eq!(config.augmented_dir, PathBuf::from("/tmp/aug"));
        assert_eq!(config.labels.iter().collect::<Vec<_>>(), vec!["dog", "cat"]);
        assert_eq!(config.jpeg_quality, 80);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_invalid_quality() {
        let err = DatasetConfig::from_lookup(lookup(&[("LABELBENCH_JPEG_QUALITY", "0")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "LABELBENCH_JPEG_QUALITY",
                ..
            }
        ));

        let err = DatasetConfig::from_lookup(lookup(&[("LABELBENCH_JPEG_QUALITY", "high")]))
            .unwrap_err();
        assert!(err.to_string().starts_with("LABELBENCH_JPEG_QUALITY has invalid value 'high'"));
    }

    #[test]
    fn test_empty_labels_rejected() {
        let err = DatasetConfig::from_lookup(lookup(&[("LABELBENCH_LABELS", " , ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Labels(LabelError::EmptyVocabulary)));
    }
}
