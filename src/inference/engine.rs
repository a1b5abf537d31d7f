//! Risk scoring
//!
//! Scores one booking with a persisted scaler and forest:
//! - Record is wrapped into a one-row frame in fitted field order
//! - Fitted scaler statistics are applied, never refitted
//! - Positive-class probability is reported on a 0-100 scale

use super::InferenceConfig;
use crate::error::{Result, RiskError};
use crate::export::{load_artifact, ArtifactPaths};
use crate::features::{BookingFeatures, FEATURE_NAMES, N_FEATURES};
use crate::preprocessing::{frame_to_matrix, Scaler};
use crate::training::RandomForest;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Scores above this value call for a booking deposit
pub const DEPOSIT_THRESHOLD: f64 = 50.0;

/// Label value of the no-show class
const NO_SHOW_CLASS: f64 = 1.0;

/// Predicted no-show probability on a 0-100 scale
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskScore(f64);

impl RiskScore {
    /// Score from a class probability in [0, 1]
    pub fn from_probability(p: f64) -> Self {
        Self(p * 100.0)
    }

    /// Score value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Whether the booking should require a deposit
    pub fn requires_deposit(&self) -> bool {
        self.0 > DEPOSIT_THRESHOLD
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// Fitted scaler and forest, ready to score records
#[derive(Debug, Clone)]
pub struct RiskPredictor {
    scaler: Scaler,
    model: RandomForest,
}

impl RiskPredictor {
    /// Pair a fitted scaler with a fitted forest.
    ///
    /// Fails if either was fitted on anything other than the booking fields.
    pub fn new(scaler: Scaler, model: RandomForest) -> Result<Self> {
        if !scaler.is_fitted() {
            return Err(RiskError::ModelNotFitted);
        }
        if scaler.columns() != FEATURE_NAMES.as_slice() {
            return Err(RiskError::InferenceError(format!(
                "scaler was fitted on {:?}, expected {:?}",
                scaler.columns(),
                FEATURE_NAMES
            )));
        }
        if model.n_trees() == 0 {
            return Err(RiskError::ModelNotFitted);
        }
        if model.n_features() != N_FEATURES {
            return Err(RiskError::ShapeError {
                expected: format!("{} features", N_FEATURES),
                actual: format!("{} features", model.n_features()),
            });
        }

        Ok(Self { scaler, model })
    }

    /// Load both artifacts from disk
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let scaler: Scaler = load_artifact(&paths.scaler)?;
        let model: RandomForest = load_artifact(&paths.model)?;
        debug!(
            model = %paths.model.display(),
            scaler = %paths.scaler.display(),
            n_trees = model.n_trees(),
            "Loaded artifacts"
        );
        Self::new(scaler, model)
    }

    /// Load using the paths in `config`
    pub fn from_config(config: &InferenceConfig) -> Result<Self> {
        Self::load(&config.artifact_paths())
    }

    /// No-show risk of one booking
    pub fn predict_risk(&self, record: &BookingFeatures) -> Result<RiskScore> {
        let frame = record.to_frame()?;
        let scaled = self.scaler.transform(&frame)?;
        let x = frame_to_matrix(&scaled, &FEATURE_NAMES)?;

        let proba = self.model.predict_proba(&x)?;

        // A forest fitted without any no-show labels never predicts one
        let p = match self.model.classes().iter().position(|&c| c == NO_SHOW_CLASS) {
            Some(col) => proba[[0, col]],
            None => 0.0,
        };

        Ok(RiskScore::from_probability(p))
    }

    /// Fitted scaler
    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    /// Fitted forest
    pub fn model(&self) -> &RandomForest {
        &self.model
    }
}

/// Load the artifacts named by `config` and score one record.
///
/// Every call reads both files again.
pub fn predict_risk(record: &BookingFeatures, config: &InferenceConfig) -> Result<RiskScore> {
    RiskPredictor::from_config(config)?.predict_risk(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::TARGET_COLUMN;
    use crate::preprocessing::frame_to_vector;
    use crate::synthetic::{BookingGenerator, GeneratorConfig};
    use polars::prelude::NamedFrom;

    fn small_predictor() -> RiskPredictor {
        let ds = BookingGenerator::new(GeneratorConfig::new().with_n_samples(300).with_seed(3))
            .generate()
            .unwrap();
        let df = ds.to_frame().unwrap();

        let mut scaler = Scaler::new();
        let scaled = scaler.fit_transform(&df, &FEATURE_NAMES).unwrap();
        let x = frame_to_matrix(&scaled, &FEATURE_NAMES).unwrap();
        let y = frame_to_vector(&scaled, TARGET_COLUMN).unwrap();

        let mut model = RandomForest::new(15).with_max_depth(6).with_random_state(5);
        model.fit(&x, &y).unwrap();

        RiskPredictor::new(scaler, model).unwrap()
    }

    #[test]
    fn test_score_in_range() {
        let predictor = small_predictor();
        let record = BookingFeatures::from_array([2.0, 40.0, 1.0, 0.0, 0.0, 7.0, 0.5, 0.0, 14.0, 1.0]);
        let score = predictor.predict_risk(&record).unwrap();
        assert!((0.0..=100.0).contains(&score.value()));
    }

    #[test]
    fn test_deposit_threshold() {
        assert!(RiskScore::from_probability(0.51).requires_deposit());
        assert!(!RiskScore::from_probability(0.5).requires_deposit());
        assert_eq!(RiskScore::from_probability(0.123).to_string(), "12.3");
    }

    #[test]
    fn test_rejects_scaler_with_other_columns() {
        let predictor = small_predictor();
        let df = polars::prelude::DataFrame::new(vec![polars::prelude::Series::new(
            "cancellations".into(),
            &[1.0, 2.0],
        )
        .into()])
        .unwrap();
        let mut scaler = Scaler::new();
        scaler.fit(&df, &["cancellations"]).unwrap();

        let err = RiskPredictor::new(scaler, predictor.model().clone()).unwrap_err();
        assert!(matches!(err, RiskError::InferenceError(_)));
    }

    #[test]
    fn test_missing_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let config = InferenceConfig::new().with_model_dir(dir.path());
        let record = BookingFeatures::from_array([0.0; N_FEATURES]);
        assert!(matches!(
            predict_risk(&record, &config),
            Err(RiskError::ArtifactError { .. })
        ));
    }
}
