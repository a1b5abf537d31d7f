//! Inference configuration

use crate::export::{ArtifactPaths, MODEL_FILE, SCALER_FILE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for single-record scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Directory holding the model and scaler artifacts
    pub model_dir: PathBuf,

    /// File name of the serialized forest
    pub model_file: String,

    /// File name of the serialized scaler
    pub scaler_file: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            model_file: MODEL_FILE.to_string(),
            scaler_file: SCALER_FILE.to_string(),
        }
    }
}

/// `models/` next to the running executable, so scoring does not depend on
/// the caller's working directory. Falls back to `./models`.
pub fn default_model_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("models")))
        .unwrap_or_else(|| PathBuf::from("models"))
}

impl InferenceConfig {
    /// Create a new inference configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the artifact directory
    pub fn with_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.model_dir = dir.into();
        self
    }

    /// Builder method to override the artifact file names
    pub fn with_file_names(mut self, model_file: &str, scaler_file: &str) -> Self {
        self.model_file = model_file.to_string();
        self.scaler_file = scaler_file.to_string();
        self
    }

    /// Resolved artifact paths
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            model: self.model_dir.join(&self.model_file),
            scaler: self.model_dir.join(&self.scaler_file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InferenceConfig::default();
        assert!(config.model_dir.ends_with("models"));
        assert_eq!(config.model_file, "model.bin");
        assert_eq!(config.scaler_file, "scaler.bin");
    }

    #[test]
    fn test_builder_pattern() {
        let config = InferenceConfig::new()
            .with_model_dir("/srv/noshow")
            .with_file_names("deposit-model.bin", "deposit-scaler.bin");

        let paths = config.artifact_paths();
        assert_eq!(paths.model, PathBuf::from("/srv/noshow/deposit-model.bin"));
        assert_eq!(paths.scaler, PathBuf::from("/srv/noshow/deposit-scaler.bin"));
    }
}
