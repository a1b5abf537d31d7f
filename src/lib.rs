//! No-show risk - booking no-show classifier
//!
//! This crate scores how likely a client is to miss a booked appointment:
//! - Synthetic booking data with a fixed latent no-show model
//! - Standard scaling fitted on the training set
//! - A seeded random forest classifier
//! - Persisted artifacts and single-booking scoring on a 0-100 scale
//!
//! # Modules
//!
//! - [`features`] - The ten-field booking record
//! - [`synthetic`] - Synthetic booking generation
//! - [`preprocessing`] - Standard scaling and frame conversion
//! - [`training`] - Decision trees, random forest, training engine
//! - [`export`] - Artifact persistence
//! - [`inference`] - Risk scoring from persisted artifacts
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Data
pub mod features;
pub mod synthetic;
pub mod preprocessing;

// Model
pub mod training;
pub mod export;
pub mod inference;

// Services
pub mod cli;

pub use error::{Result, RiskError};
pub use features::{BookingFeatures, FEATURE_NAMES, N_FEATURES, TARGET_COLUMN};
pub use inference::{predict_risk, InferenceConfig, RiskPredictor, RiskScore};
pub use training::{TrainEngine, TrainingConfig, TrainingReport};
