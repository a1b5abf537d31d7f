//! Training engine implementation

use super::{ModelMetrics, RandomForest, TrainingConfig};
use crate::error::{Result, RiskError};
use crate::export::{save_artifact, ArtifactPaths};
use crate::features::{BookingFeatures, FEATURE_NAMES, TARGET_COLUMN};
use crate::inference::{RiskPredictor, RiskScore};
use crate::preprocessing::{frame_to_matrix, frame_to_vector, Scaler};
use crate::synthetic::BookingGenerator;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// One of the fixed illustrative bookings scored after training
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleCase {
    pub description: String,
    pub features: BookingFeatures,
}

/// Score of a [`SampleCase`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleScore {
    pub description: String,
    pub risk_score: RiskScore,
}

/// Everything the training flow reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Metrics on the training set
    pub metrics: ModelMetrics,
    /// Fraction of generated bookings labeled no-show
    pub no_show_rate: f64,
    /// (feature, importance), most important first
    pub feature_importances: Vec<(String, f64)>,
    /// Scores of the fixed sample bookings
    pub sample_scores: Vec<SampleScore>,
}

/// The four bookings printed after training, from high to low risk.
pub fn sample_cases() -> Vec<SampleCase> {
    vec![
        SampleCase {
            description: "High risk: 3 cancellations, rainy, holiday, short lead, low reliability, cold, traffic"
                .to_string(),
            features: BookingFeatures {
                cancellations: 3.0,
                days_since_last_booking: 30.0,
                is_evening: 1.0,
                is_rainy: 1.0,
                is_holiday: 1.0,
                booking_lead_time: 2.0,
                client_reliability: 0.5,
                is_first_appointment: 1.0,
                temperature: 8.0,
                is_peak_traffic: 1.0,
            },
        },
        SampleCase {
            description: "Moderate risk: 2 cancellations, rainy, evening".to_string(),
            features: BookingFeatures {
                cancellations: 2.0,
                days_since_last_booking: 30.0,
                is_evening: 1.0,
                is_rainy: 1.0,
                is_holiday: 0.0,
                booking_lead_time: 5.0,
                client_reliability: 0.7,
                is_first_appointment: 0.0,
                temperature: 15.0,
                is_peak_traffic: 0.0,
            },
        },
        SampleCase {
            description: "Low risk: No cancellations, clear day, reliable client".to_string(),
            features: BookingFeatures {
                cancellations: 0.0,
                days_since_last_booking: 10.0,
                is_evening: 0.0,
                is_rainy: 0.0,
                is_holiday: 0.0,
                booking_lead_time: 10.0,
                client_reliability: 0.9,
                is_first_appointment: 0.0,
                temperature: 20.0,
                is_peak_traffic: 0.0,
            },
        },
        SampleCase {
            description: "High risk: 4 cancellations, rainy, short lead, low reliability, traffic".to_string(),
            features: BookingFeatures {
                cancellations: 4.0,
                days_since_last_booking: 60.0,
                is_evening: 0.0,
                is_rainy: 1.0,
                is_holiday: 0.0,
                booking_lead_time: 3.0,
                client_reliability: 0.4,
                is_first_appointment: 1.0,
                temperature: 10.0,
                is_peak_traffic: 1.0,
            },
        },
    ]
}

/// Main training engine: generate, scale, fit, persist, report
#[derive(Debug, Clone)]
pub struct TrainEngine {
    config: TrainingConfig,
    scaler: Option<Scaler>,
    model: Option<RandomForest>,
    metrics: Option<ModelMetrics>,
    no_show_rate: f64,
}

impl TrainEngine {
    /// Create a new training engine
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            scaler: None,
            model: None,
            metrics: None,
            no_show_rate: 0.0,
        }
    }

    /// Generate the synthetic dataset, fit the scaler on it and the forest on
    /// the scaled features.
    pub fn fit(&mut self) -> Result<&mut Self> {
        let start = Instant::now();

        let dataset = BookingGenerator::new(self.config.generator.clone()).generate()?;
        let df = dataset.to_frame()?;
        info!(
            n_samples = dataset.len(),
            no_show_rate = format!("{:.3}", dataset.no_show_rate()),
            "Generated training set"
        );

        let mut scaler = Scaler::new();
        let scaled = scaler.fit_transform(&df, &FEATURE_NAMES)?;
        let x = frame_to_matrix(&scaled, &FEATURE_NAMES)?;
        let y = frame_to_vector(&scaled, TARGET_COLUMN)?;

        let mut model = RandomForest::new(self.config.n_estimators);
        if let Some(depth) = self.config.max_depth {
            model = model.with_max_depth(depth);
        }
        if let Some(seed) = self.config.random_state {
            model = model.with_random_state(seed);
        }
        model.fit(&x, &y)?;

        let y_pred = model.predict(&x)?;
        let mut metrics = ModelMetrics::compute_classification(&y, &y_pred);
        metrics.training_time_secs = start.elapsed().as_secs_f64();
        metrics.n_features = x.ncols();
        metrics.n_samples = x.nrows();

        info!(
            n_trees = model.n_trees(),
            accuracy = format!("{:.3}", metrics.accuracy.unwrap_or(0.0)),
            secs = format!("{:.2}", metrics.training_time_secs),
            "Fitted random forest"
        );

        self.no_show_rate = dataset.no_show_rate();
        self.scaler = Some(scaler);
        self.model = Some(model);
        self.metrics = Some(metrics);
        Ok(self)
    }

    /// Write the fitted scaler and forest into the configured output directory
    pub fn save_artifacts(&self) -> Result<ArtifactPaths> {
        let (scaler, model) = self.fitted()?;
        let paths = ArtifactPaths::in_dir(&self.config.output_dir);

        save_artifact(model, &paths.model)?;
        save_artifact(scaler, &paths.scaler)?;

        info!(
            model = %paths.model.display(),
            scaler = %paths.scaler.display(),
            "Saved artifacts"
        );
        Ok(paths)
    }

    /// Predictor over the in-memory fitted artifacts
    pub fn predictor(&self) -> Result<RiskPredictor> {
        let (scaler, model) = self.fitted()?;
        RiskPredictor::new(scaler.clone(), model.clone())
    }

    /// Training metrics, feature importances and sample scores
    pub fn report(&self) -> Result<TrainingReport> {
        let (_, model) = self.fitted()?;
        let metrics = self.metrics.clone().ok_or(RiskError::ModelNotFitted)?;

        let importances = model.feature_importances().ok_or(RiskError::ModelNotFitted)?;
        let mut feature_importances: Vec<(String, f64)> = FEATURE_NAMES
            .iter()
            .zip(importances.iter())
            .map(|(name, &imp)| (name.to_string(), imp))
            .collect();
        feature_importances.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let predictor = self.predictor()?;
        let sample_scores = sample_cases()
            .into_iter()
            .map(|case| -> Result<SampleScore> {
                Ok(SampleScore {
                    risk_score: predictor.predict_risk(&case.features)?,
                    description: case.description,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(TrainingReport {
            metrics,
            no_show_rate: self.no_show_rate,
            feature_importances,
            sample_scores,
        })
    }

    /// Fit, persist and report in one call
    pub fn run(&mut self) -> Result<(ArtifactPaths, TrainingReport)> {
        self.fit()?;
        let paths = self.save_artifacts()?;
        let report = self.report()?;
        Ok((paths, report))
    }

    /// Get training metrics
    pub fn metrics(&self) -> Option<&ModelMetrics> {
        self.metrics.as_ref()
    }

    /// Get the configuration
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    fn fitted(&self) -> Result<(&Scaler, &RandomForest)> {
        match (&self.scaler, &self.model) {
            (Some(scaler), Some(model)) => Ok((scaler, model)),
            _ => Err(RiskError::ModelNotFitted),
        }
    }
}
