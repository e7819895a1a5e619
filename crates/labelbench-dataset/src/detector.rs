//! Seam for box-suggesting detectors.
//!
//! A detector proposes candidate boxes for an image; a human accepts or
//! discards them. Suggestions carry free-form labels from the model, so they
//! must pass through [`Suggestion::accept`] before they can be stored.

use labelbench_core::{BBox, LabelError, LabelSet, LabeledBox};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for detector backends.
#[derive(Debug, Error)]
pub enum DetectorError {
    /// The image could not be loaded by the detector.
    #[error("Detector could not read image {0}")]
    ImageUnavailable(String),

    /// The backend failed while running inference.
    #[error("Detector backend failed: {0}")]
    Backend(String),
}

/// A candidate box proposed by a detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub bbox: BBox,
    /// Confidence in `[0, 1]`.
    pub score: f32,
    pub label: String,
}

impl Suggestion {
    pub fn new(bbox: BBox, score: f32, label: impl Into<String>) -> Self {
        Self {
            bbox,
            score,
            label: label.into(),
        }
    }

    /// Turn the suggestion into a storable box, rejecting labels outside
    /// `labels`.
    pub fn accept(&self, labels: &LabelSet) -> Result<LabeledBox, LabelError> {
        let label = labels.validate(&self.label)?;
        Ok(LabeledBox::new(label, self.bbox))
    }
}

/// Proposes boxes for an image.
pub trait Detector {
    fn suggest_boxes(&self, image_path: &str) -> Result<Vec<Suggestion>, DetectorError>;
}

/// Keep suggestions scoring at least `min_score`, best first.
pub fn filter_suggestions(mut suggestions: Vec<Suggestion>, min_score: f32) -> Vec<Suggestion> {
    suggestions.retain(|s| s.score >= min_score);
    suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
    suggestions
}

/// Ask `detector` for boxes on `image_path` and keep the ones ready to offer
/// an annotator: confident enough, inside the vocabulary, and non-empty.
///
/// Suggestions with unknown labels are logged and left out rather than
/// failing the whole request. Boxes drawn corner-first in either order are
/// normalized.
pub fn accepted_suggestions(
    detector: &dyn Detector,
    image_path: &str,
    labels: &LabelSet,
    min_score: f32,
) -> Result<Vec<LabeledBox>, DetectorError> {
    let suggestions = filter_suggestions(detector.suggest_boxes(image_path)?, min_score);

    let mut accepted = Vec::with_capacity(suggestions.len());
    for suggestion in &suggestions {
        match suggestion.accept(labels) {
            Ok(labeled) => {
                let bbox = labeled.bbox.normalized();
                if bbox.is_degenerate() {
                    tracing::debug!(image_path, bbox = ?labeled.bbox, "Ignoring empty suggestion");
                    continue;
                }
                accepted.push(labeled.with_bbox(bbox));
            }
            Err(e) => {
                tracing::warn!(image_path, score = suggestion.score, error = %e, "Ignoring suggestion");
            }
        }
    }
    Ok(accepted)
}
