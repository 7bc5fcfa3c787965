//! Model loading and inference.
//!
//! - [`crop`]: tabular crop recommendation classifier
//! - [`disease`]: plant disease image classifier
//! - [`labels`]: label manifests shipped alongside the model artifacts

pub mod crop;
pub mod disease;
pub mod labels;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("Model artifact not found: {0}")]
    ArtifactNotFound(String),

    #[error("Invalid label manifest: {0}")]
    InvalidManifest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tensor error: {0}")]
    Tensor(#[from] candle_core::Error),

    #[error("Manifest parse error: {0}")]
    ManifestParse(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Image decode failed: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Tensor error: {0}")]
    Tensor(#[from] candle_core::Error),

    #[error("Classifier produced an empty score vector")]
    EmptyScores,

    #[error("Predicted class index {index} outside label catalog of {len} entries")]
    LabelOutOfRange { index: usize, len: usize },
}

/// A single classification outcome.
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Predicted label from the model's catalog.
    pub label: String,

    /// Softmax probability of the predicted class.
    pub confidence: f32,
}

/// Index and probability of the highest-scoring class.
pub(crate) fn best_class(probs: &[f32]) -> Option<(usize, f32)> {
    probs
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, &p)| (i, p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_class_picks_max() {
        let probs = vec![0.1, 0.7, 0.2];
        assert_eq!(best_class(&probs), Some((1, 0.7)));
    }

    #[test]
    fn test_best_class_empty() {
        assert_eq!(best_class(&[]), None);
    }
}
