//! Plant disease image classifier.
//!
//! EfficientNet-B0 with a classifier head sized to the disease catalog,
//! loaded from a safetensors export of the trained model. Uploaded images
//! are resized to a fixed square resolution and scaled to [0,1] — the same
//! preprocessing the model was trained with; no channel normalization.

use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::{Module, VarBuilder};
use candle_transformers::models::efficientnet::{EfficientNet, MBConvConfig};
use image::imageops::FilterType;
use image::DynamicImage;

use super::labels::LabelCatalog;
use super::{best_class, InferenceError, ModelLoadError, Prediction};

/// Default input resolution for the disease model.
pub const DEFAULT_IMAGE_SIZE: usize = 224;

/// Plant disease model. Read-only after construction, safe to share across
/// concurrent requests. Candle builds no autograd graph here, so a forward
/// pass is inference-only.
pub struct DiseaseClassifier {
    model: EfficientNet,
    catalog: LabelCatalog,
    image_size: usize,
    device: Device,
}

impl DiseaseClassifier {
    /// Build the classifier from an already-populated variable store.
    pub fn new(
        vb: VarBuilder,
        catalog: LabelCatalog,
        image_size: usize,
        device: Device,
    ) -> Result<Self, ModelLoadError> {
        let model = EfficientNet::new(vb, MBConvConfig::b0(), catalog.len())?;
        Ok(Self {
            model,
            catalog,
            image_size,
            device,
        })
    }

    /// Load the exported artifact and its label manifest.
    pub fn load(
        weights: &Path,
        manifest: &Path,
        image_size: usize,
        device: &Device,
    ) -> Result<Self, ModelLoadError> {
        if !weights.exists() {
            return Err(ModelLoadError::ArtifactNotFound(
                weights.display().to_string(),
            ));
        }
        let catalog = LabelCatalog::load(manifest)?;
        let tensors = candle_core::safetensors::load(weights, device)?;
        let vb = VarBuilder::from_tensors(tensors, DType::F32, device);
        Self::new(vb, catalog, image_size, device.clone())
    }

    /// Number of disease labels the model can predict.
    pub fn num_classes(&self) -> usize {
        self.catalog.len()
    }

    /// Decode raw uploaded bytes into an image.
    pub fn decode(bytes: &[u8]) -> Result<DynamicImage, InferenceError> {
        Ok(image::load_from_memory(bytes)?)
    }

    /// Resize and scale an image into a CHW tensor with a leading batch
    /// dimension of 1.
    fn preprocess(&self, image: &DynamicImage) -> candle_core::Result<Tensor> {
        let size = self.image_size as u32;
        let rgb = image.resize_exact(size, size, FilterType::Lanczos3).to_rgb8();

        let num_pixels = self.image_size * self.image_size;
        let mut chw = vec![0.0f32; 3 * num_pixels];
        for (i, pixel) in rgb.pixels().enumerate() {
            chw[i] = f32::from(pixel[0]) / 255.0;
            chw[num_pixels + i] = f32::from(pixel[1]) / 255.0;
            chw[2 * num_pixels + i] = f32::from(pixel[2]) / 255.0;
        }

        Tensor::from_vec(chw, (3, self.image_size, self.image_size), &self.device)?.unsqueeze(0)
    }

    /// Classify a decoded image into a disease label.
    pub fn predict(&self, image: &DynamicImage) -> Result<Prediction, InferenceError> {
        let input = self.preprocess(image)?;
        let logits = self.model.forward(&input)?.squeeze(0)?;
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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(labels: &[&str]) -> LabelCatalog {
        LabelCatalog::from_labels(labels.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    // A small input size keeps the zero-weight forward pass fast; B0
    // downsamples by 32, so 32px still leaves a 1x1 feature map.
    const TEST_IMAGE_SIZE: usize = 32;

    #[test]
    fn test_decode_rejects_garbage() {
        let result = DiseaseClassifier::decode(b"not an image");
        assert!(matches!(result, Err(InferenceError::ImageDecode(_))));
    }

    #[test]
    fn test_decode_png() {
        let img = image::RgbImage::from_pixel(8, 8, image::Rgb([30, 120, 40]));
        let mut png = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let decoded = DiseaseClassifier::decode(&png).unwrap();
        assert_eq!(decoded.width(), 8);
    }

    #[test]
    fn test_predict_maps_into_catalog() {
        let device = Device::Cpu;
        let vb = VarBuilder::zeros(DType::F32, &device);
        let model = DiseaseClassifier::new(
            vb,
            catalog(&["Rice Blast"]),
            TEST_IMAGE_SIZE,
            device,
        )
        .unwrap();

        let img = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            64,
            48,
            image::Rgb([120, 180, 90]),
        ));
        let prediction = model.predict(&img).unwrap();
        assert_eq!(prediction.label, "Rice Blast");
        assert_eq!(prediction.confidence, 1.0);
    }

    #[test]
    fn test_preprocess_shape_and_range() {
        let device = Device::Cpu;
        let vb = VarBuilder::zeros(DType::F32, &device);
        let model =
            DiseaseClassifier::new(vb, catalog(&["Tungro"]), TEST_IMAGE_SIZE, device).unwrap();

        let img = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            100,
            100,
            image::Rgb([255, 0, 128]),
        ));
        let tensor = model.preprocess(&img).unwrap();
        assert_eq!(tensor.dims(), [1, 3, TEST_IMAGE_SIZE, TEST_IMAGE_SIZE]);

        let flat: Vec<f32> = tensor.flatten_all().unwrap().to_vec1().unwrap();
        assert!(flat.iter().all(|v| (0.0..=1.0).contains(v)));
        // Red channel of a uniform (255, 0, 128) image scales to 1.0.
        assert!((flat[0] - 1.0).abs() < 1e-6);
    }
}
