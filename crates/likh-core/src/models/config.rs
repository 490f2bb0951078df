//! Configuration structures for the extraction pipeline.

use std::path::{Path, PathBuf};
use std::time::Duration;

use likh_inference::{DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAiOptions};
use serde::{Deserialize, Serialize};

use crate::error::{LikhError, Result};

/// Default cap on generated tokens; room for a multi-row CSV of a dense invoice.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 10024;

/// Main configuration for likh.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LikhConfig {
    /// Inference endpoint configuration.
    pub api: ApiConfig,

    /// Image encoding configuration.
    pub image: ImageConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Hosted inference endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API root URL.
    pub base_url: String,

    /// Vision model name.
    pub model: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Upper bound on generated tokens per request.
    pub max_output_tokens: u32,

    /// Request timeout in seconds (null = transport default).
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// Connection options for the chat-completions backend.
    pub fn backend_options(&self) -> OpenAiOptions {
        OpenAiOptions {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Image encoding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// JPEG quality (1 - 100).
    pub jpeg_quality: u8,

    /// RGB fill that transparent pixels are composited onto.
    pub background: [u8; 3],
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 75,
            background: [255, 255, 255],
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory CSV downloads are written to.
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

impl LikhConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.image.jpeg_quality) {
            return Err(LikhError::Config(format!(
                "image.jpeg_quality must be between 1 and 100, got {}",
                self.image.jpeg_quality
            )));
        }
        if self.api.max_output_tokens == 0 {
            return Err(LikhError::Config(
                "api.max_output_tokens must be greater than 0".to_string(),
            ));
        }
        if self.api.api_key_env.trim().is_empty() {
            return Err(LikhError::Config(
                "api.api_key_env must name an environment variable".to_string(),
            ));
        }
        Ok(())
    }
}
