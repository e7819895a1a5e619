//! Closed label vocabulary.
//!
//! A [`Label`] can only be obtained through [`LabelSet::validate`], so any
//! value of that type is known to belong to the vocabulary it was checked
//! against.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Labels used when no vocabulary is configured.
pub const DEFAULT_LABELS: [&str; 4] = ["car", "traffic", "pedestrian", "urban"];

/// Error types for label validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    /// The label is not part of the vocabulary.
    #[error("Unknown label '{label}', expected one of: {allowed}")]
    Unknown { label: String, allowed: String },

    /// The vocabulary itself has no entries.
    #[error("Label vocabulary is empty")]
    EmptyVocabulary,
}

/// A label that has been checked against a [`LabelSet`].
///
/// Not `Deserialize`; construct through [`LabelSet::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The fixed set of labels an annotation may carry.
///
/// Entries are stored trimmed and lower-cased; [`LabelSet::validate`]
/// normalizes its input the same way before matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    /// Build a vocabulary from label names.
    ///
    /// Blank entries are ignored and duplicates collapse to one.
    pub fn new<I, S>(labels: I) -> Result<Self, LabelError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for label in labels {
            let label = normalize(label.as_ref());
            if !label.is_empty() && !normalized.contains(&label) {
                normalized.push(label);
            }
        }

        if normalized.is_empty() {
            return Err(LabelError::EmptyVocabulary);
        }

        Ok(Self { labels: normalized })
    }

    /// Check `label` against the vocabulary.
    pub fn validate(&self, label: &str) -> Result<Label, LabelError> {
        let label = normalize(label);
        if self.labels.contains(&label) {
            Ok(Label(label))
        } else {
            Err(LabelError::Unknown {
                label,
                allowed: self.labels.join(", "),
            })
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(&normalize(label))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for LabelSet {
    fn default() -> Self {
        Self {
            labels: DEFAULT_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for LabelSet {
    type Error = LabelError;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        LabelSet::new(labels)
    }
}

impl From<LabelSet> for Vec<String> {
    fn from(set: LabelSet) -> Self {
        set.labels
    }
}

fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vocabulary() {
        let labels = LabelSet::default();
        assert_eq!(labels.len(), 4);
        assert!(labels.contains("car"));
        assert!(labels.contains("urban"));
        assert!(!labels.contains("bicycle"));
    }

    #[test]
    fn test_validate_normalizes_input() {
        let labels = LabelSet::default();
        let label = labels.validate("  Pedestrian ").unwrap();
        assert_eq!(label.as_str(), "pedestrian");
    }

    #[test]
    fn test_validate_rejects_unknown() {
        let labels = LabelSet::default();
        let err = labels.validate("truck").unwrap_err();
        assert_eq!(
            err,
            LabelError::Unknown {
                label: "truck".to_string(),
                allowed: "car, traffic, pedestrian, urban".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "Unknown label 'truck', expected one of: car, traffic, pedestrian, urban"
        );
    }

    #[test]
    fn test_new_dedups_and_skips_blank() {
        let labels = LabelSet::new(["Dog", "dog", " ", "cat"]).unwrap();
        assert_eq!(labels.iter().collect::<Vec<_>>(), vec!["dog", "cat"]);
    }

    #[test]
    fn test_new_empty_fails() {
        assert_eq!(
            LabelSet::new(Vec::<String>::new()).unwrap_err(),
            LabelError::EmptyVocabulary
        );
        assert_eq!(
            LabelSet::new(["", "  "]).unwrap_err(),
            LabelError::EmptyVocabulary
        );
    }

    #[test]
    fn test_label_display() {
        let label = LabelSet::default().validate("car").unwrap();
        assert_eq!(label.to_string(), "car");
    }
}
