//! Artifact persistence module
//!
//! The fitted scaler and forest are stored as two bincode files. They are
//! written once by training and only read afterwards.

mod artifacts;

pub use artifacts::{load_artifact, save_artifact, ArtifactPaths, MODEL_FILE, SCALER_FILE};
