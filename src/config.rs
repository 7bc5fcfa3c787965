//! Runtime configuration for agro-advisor.
//!
//! Configuration can be loaded from a JSON file or constructed
//! programmatically. Model artifact paths and advisory-service settings
//! live here.

use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "agro-advisor",
    about = "Crop recommendation and plant disease detection server"
)]
pub struct Cli {
    /// Path to configuration file (JSON).
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// HTTP listen address (overrides the config file).
    #[arg(long)]
    pub listen: Option<String>,

    /// Gemini API key (overrides the config file).
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Model artifact configuration.
    #[serde(default)]
    pub models: ModelsConfig,

    /// Advisory service configuration.
    #[serde(default)]
    pub advisory: AdvisoryConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address (e.g. "0.0.0.0:8000").
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Paths to the trained model artifacts and their label manifests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Path to the crop recommendation weights (safetensors).
    pub crop_model_path: PathBuf,

    /// Path to the crop label manifest (JSON array of strings).
    pub crop_labels_path: PathBuf,

    /// Path to the plant disease weights (safetensors).
    pub disease_model_path: PathBuf,

    /// Path to the disease label manifest (JSON array of strings).
    pub disease_labels_path: PathBuf,

    /// Square input resolution the disease model was trained with.
    pub image_size: usize,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            crop_model_path: PathBuf::from("models/crop_recommender.safetensors"),
            crop_labels_path: PathBuf::from("models/crop_labels.json"),
            disease_model_path: PathBuf::from("models/plant_disease.safetensors"),
            disease_labels_path: PathBuf::from("models/disease_labels.json"),
            image_size: crate::inference::disease::DEFAULT_IMAGE_SIZE,
        }
    }
}

/// Generative advisory service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    /// Base URL of the generative language API.
    pub base_url: String,

    /// Model identifier to request.
    pub model: String,

    /// API key. Usually supplied via the GEMINI_API_KEY environment
    /// variable rather than the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-pro-latest".to_string(),
            api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults when
    /// the file does not exist.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if path.exists() {
            let data = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&data)?;
            Ok(config)
        } else {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            Ok(Config::default())
        }
    }
}
