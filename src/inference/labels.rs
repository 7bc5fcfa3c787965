//! Label manifests.
//!
//! Each model artifact ships with a JSON manifest listing its output labels
//! in training order. Classifier heads are sized from the manifest, so a
//! catalog/model cardinality mismatch fails at load time rather than
//! mis-mapping indices at request time.

use std::path::Path;

use super::ModelLoadError;

/// Ordered label catalog for a classifier head.
#[derive(Debug, Clone)]
pub struct LabelCatalog {
    labels: Vec<String>,
}

impl LabelCatalog {
    /// Build a catalog from an in-memory label list.
    pub fn from_labels(labels: Vec<String>) -> Result<Self, ModelLoadError> {
        if labels.is_empty() {
            return Err(ModelLoadError::InvalidManifest(
                "manifest lists no labels".to_string(),
            ));
        }
        Ok(Self { labels })
    }

    /// Load a manifest from a JSON array of strings.
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        if !path.exists() {
            return Err(ModelLoadError::ArtifactNotFound(path.display().to_string()));
        }
        let data = std::fs::read_to_string(path)?;
        let labels: Vec<String> = serde_json::from_str(&data)?;
        Self::from_labels(labels)
    }

    /// Number of labels (and classifier outputs).
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label at a classifier output index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_labels_rejects_empty() {
        let result = LabelCatalog::from_labels(vec![]);
        assert!(matches!(result, Err(ModelLoadError::InvalidManifest(_))));
    }

    #[test]
    fn test_load_manifest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"["Rice Blast", "Tungro", "Healthy Maize"]"#).unwrap();

        let catalog = LabelCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(2), Some("Healthy Maize"));
        assert_eq!(catalog.get(3), None);
    }

    #[test]
    fn test_load_missing_file() {
        let result = LabelCatalog::load(Path::new("/nonexistent/labels.json"));
        assert!(matches!(result, Err(ModelLoadError::ArtifactNotFound(_))));
    }
}
