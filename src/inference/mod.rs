//! Inference module
//!
//! Scores single bookings against persisted artifacts:
//! - Artifact path resolution relative to the installed executable
//! - Strict field-order scaling with the fitted scaler
//! - Positive-class probability as a 0-100 risk score

mod config;
mod engine;

pub use config::{default_model_dir, InferenceConfig};
pub use engine::{predict_risk, RiskPredictor, RiskScore, DEPOSIT_THRESHOLD};
