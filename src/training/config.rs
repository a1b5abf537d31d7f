//! Training configuration

use crate::synthetic::GeneratorConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the training flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Synthetic dataset settings
    pub generator: GeneratorConfig,

    /// Number of trees in the forest
    pub n_estimators: usize,

    /// Maximum depth of each tree
    pub max_depth: Option<usize>,

    /// Seed for bootstrap and feature sampling
    pub random_state: Option<u64>,

    /// Directory the model and scaler artifacts are written to
    pub output_dir: PathBuf,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            n_estimators: 100,
            max_depth: Some(10),
            random_state: Some(42),
            output_dir: PathBuf::from("."),
        }
    }
}

impl TrainingConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the generator settings
    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    /// Builder method to set the number of trees
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    /// Builder method to set the maximum tree depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Builder method to set the forest seed
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Builder method to set the artifact directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}
