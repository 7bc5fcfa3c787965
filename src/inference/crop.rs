//! Tabular crop recommendation classifier.
//!
//! A small MLP over seven agronomic features, loaded from a safetensors
//! export of the trained model. The feature order is fixed:
//! [N, P, K, temperature, humidity, ph, rainfall].

use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::{linear, Linear, Module, VarBuilder};

use super::labels::LabelCatalog;
use super::{best_class, InferenceError, ModelLoadError, Prediction};

/// Number of input features.
pub const NUM_FEATURES: usize = 7;

/// Hidden layer width of the exported MLP.
const HIDDEN: usize = 64;

/// Soil and weather features, in the order the model was trained with.
#[derive(Debug, Clone, Copy)]
pub struct CropFeatures {
    pub n: f64,
    pub p: f64,
    pub k: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
}

impl CropFeatures {
    /// Flatten into the fixed model input order.
    pub fn to_vec(&self) -> Vec<f32> {
        vec![
            self.n as f32,
            self.p as f32,
            self.k as f32,
            self.temperature as f32,
            self.humidity as f32,
            self.ph as f32,
            self.rainfall as f32,
        ]
    }
}

/// Crop recommendation model. Read-only after construction, safe to share
/// across concurrent requests.
pub struct CropClassifier {
    fc1: Linear,
    fc2: Linear,
    out: Linear,
    catalog: LabelCatalog,
    device: Device,
}

impl CropClassifier {
    /// Build the classifier from an already-populated variable store.
    pub fn new(
        vb: VarBuilder,
        catalog: LabelCatalog,
        device: Device,
    ) -> Result<Self, ModelLoadError> {
        let fc1 = linear(NUM_FEATURES, HIDDEN, vb.pp("fc1"))?;
        let fc2 = linear(HIDDEN, HIDDEN, vb.pp("fc2"))?;
        let out = linear(HIDDEN, catalog.len(), vb.pp("out"))?;
        Ok(Self {
            fc1,
            fc2,
            out,
            catalog,
            device,
        })
    }

    /// Load the exported artifact and its label manifest.
    pub fn load(weights: &Path, manifest: &Path, device: &Device) -> Result<Self, ModelLoadError> {
        if !weights.exists() {
            return Err(ModelLoadError::ArtifactNotFound(
                weights.display().to_string(),
            ));
        }
        let catalog = LabelCatalog::load(manifest)?;
        let tensors = candle_core::safetensors::load(weights, device)?;
        let vb = VarBuilder::from_tensors(tensors, DType::F32, device);
        Self::new(vb, catalog, device.clone())
    }

    /// Number of crop labels the model can predict.
    pub fn num_classes(&self) -> usize {
        self.catalog.len()
    }

    /// Predict a crop label for one feature vector.
    pub fn predict(&self, features: &CropFeatures) -> Result<Prediction, InferenceError> {
        let input = Tensor::from_vec(features.to_vec(), (1, NUM_FEATURES), &self.device)?;
        let logits = self.forward(&input)?.squeeze(0)?;
        let probs = candle_nn::ops::softmax(&logits, 0)?.to_vec1::<f32>()?;

        let (index, confidence) = best_class(&probs).ok_or(InferenceError::EmptyScores)?;
        let label = self
            .catalog
            .get(index)
            .ok_or(InferenceError::LabelOutOfRange {
                index,
                len: self.catalog.len(),
            })?;

        Ok(Prediction {
            label: label.to_string(),
            confidence,
        })
    }

    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let xs = self.fc1.forward(xs)?.relu()?;
        let xs = self.fc2.forward(&xs)?.relu()?;
        self.out.forward(&xs)
    }
}
