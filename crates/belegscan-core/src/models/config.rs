//! Configuration for the scan pipeline.

use serde::{Deserialize, Serialize};

use belegscan_classify::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Main configuration for the belegscan pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Classifier backend configuration.
    pub classifier: ClassifierConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
        }
    }
}

/// Classifier backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// API key. The GEMINI_API_KEY environment variable takes precedence
    /// over this value.
    pub api_key: Option<String>,

    /// Model identifier.
    pub model: String,

    /// API base URL.
    pub base_url: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }

    /// API key to use: environment first, then the config file value.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| self.classifier.api_key.clone())
    }
}
