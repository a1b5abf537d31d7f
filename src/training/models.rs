//! Classification metrics

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Metrics for a fitted classifier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelMetrics {
    /// Accuracy
    pub accuracy: Option<f64>,
    /// Precision of the positive class
    pub precision: Option<f64>,
    /// Recall of the positive class
    pub recall: Option<f64>,
    /// F1 score
    pub f1_score: Option<f64>,
    /// Training time in seconds
    pub training_time_secs: f64,
    /// Number of features
    pub n_features: usize,
    /// Number of training samples
    pub n_samples: usize,
}

impl ModelMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute classification metrics for 0/1 labels
    pub fn compute_classification(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Self {
        let mut metrics = Self::new();
        metrics.n_samples = y_true.len();

        if y_true.is_empty() {
            return metrics;
        }

        let correct: usize = y_true
            .iter()
            .zip(y_pred.iter())
            .filter(|(t, p)| (*t - *p).abs() < 0.5)
            .count();
        metrics.accuracy = Some(correct as f64 / y_true.len() as f64);

        let (tp, fp, _, fn_) = Self::confusion_counts(y_true, y_pred);

        metrics.precision = if tp + fp > 0 {
            Some(tp as f64 / (tp + fp) as f64)
        } else {
            Some(0.0)
        };

        metrics.recall = if tp + fn_ > 0 {
            Some(tp as f64 / (tp + fn_) as f64)
        } else {
            Some(0.0)
        };

        if let (Some(p), Some(r)) = (metrics.precision, metrics.recall) {
            metrics.f1_score = if p + r > 0.0 {
                Some(2.0 * p * r / (p + r))
            } else {
                Some(0.0)
            };
        }

        metrics
    }

    fn confusion_counts(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> (usize, usize, usize, usize) {
        let mut tp = 0;
        let mut fp = 0;
        let mut tn = 0;
        let mut fn_ = 0;

        for (t, p) in y_true.iter().zip(y_pred.iter()) {
            match (*t > 0.5, *p > 0.5) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (false, false) => tn += 1,
                (true, false) => fn_ += 1,
            }
        }

        (tp, fp, tn, fn_)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_classification_metrics() {
        let y_true = array![1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 0.0];
        let y_pred = array![1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0];

        let metrics = ModelMetrics::compute_classification(&y_true, &y_pred);

        assert_eq!(metrics.accuracy, Some(0.75));
        assert_eq!(metrics.precision, Some(0.75));
        assert_eq!(metrics.recall, Some(0.75));
        assert!((metrics.f1_score.unwrap() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_no_positive_predictions() {
        let y_true = array![1.0, 0.0];
        let y_pred = array![0.0, 0.0];

        let metrics = ModelMetrics::compute_classification(&y_true, &y_pred);
        assert_eq!(metrics.precision, Some(0.0));
        assert_eq!(metrics.f1_score, Some(0.0));
    }
}
