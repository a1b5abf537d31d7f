//! Model training module
//!
//! Provides the training flow for the no-show classifier:
//! - Decision trees with leaf class distributions
//! - Random Forest (bootstrap, per-split feature sampling)
//! - Classification metrics
//! - The engine that generates, scales, fits, persists and reports

mod config;
mod engine;
mod models;
pub mod decision_tree;
pub mod random_forest;

pub use config::TrainingConfig;
pub use engine::{sample_cases, SampleCase, SampleScore, TrainEngine, TrainingReport};
pub use models::ModelMetrics;
pub use decision_tree::{DecisionTree, TreeNode};
pub use random_forest::{MaxFeatures, RandomForest};
