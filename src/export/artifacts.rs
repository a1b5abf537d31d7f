//! Binary artifact files

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, RiskError};

/// File name of the serialized forest
pub const MODEL_FILE: &str = "model.bin";

/// File name of the serialized scaler
pub const SCALER_FILE: &str = "scaler.bin";

/// Location of the two artifact files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(MODEL_FILE),
            scaler: dir.join(SCALER_FILE),
        }
    }
}

fn artifact_error(path: &Path, reason: impl ToString) -> RiskError {
    RiskError::ArtifactError {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Serialize `value` to `path`, creating the parent directory if needed
pub fn save_artifact<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| artifact_error(parent, e))?;
        }
    }

    let bytes = bincode::serialize(value).map_err(|e| artifact_error(path, e))?;

    let mut file = File::create(path).map_err(|e| artifact_error(path, e))?;
    file.write_all(&bytes).map_err(|e| artifact_error(path, e))?;

    debug!(path = %path.display(), bytes = bytes.len(), "Wrote artifact");
    Ok(())
}

/// Read and decode an artifact written by [`save_artifact`]
pub fn load_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let mut file = File::open(path).map_err(|e| artifact_error(path, e))?;

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| artifact_error(path, e))?;

    bincode::deserialize(&bytes).map_err(|e| artifact_error(path, e))
}
