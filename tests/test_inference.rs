//! Integration tests for risk scoring and the `noshow predict` entry point

use noshow_risk::features::BookingFeatures;
use noshow_risk::inference::{predict_risk, InferenceConfig, RiskPredictor};
use noshow_risk::training::{TrainEngine, TrainingConfig};
use serde_json::Value;
use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;
use tempfile::TempDir;

const LOW_RISK: &str = r#"{"cancellations":0,"days_since_last_booking":10,"is_evening":0,"is_rainy":0,"is_holiday":0,"booking_lead_time":10,"client_reliability":0.9,"is_first_appointment":0,"temperature":20,"is_peak_traffic":0}"#;

/// Artifacts trained once with the default configuration, shared by every test
fn model_dir() -> &'static Path {
    static DIR: OnceLock<TempDir> = OnceLock::new();
    DIR.get_or_init(|| {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainingConfig::default().with_output_dir(dir.path());
        TrainEngine::new(config).fit().unwrap().save_artifacts().unwrap();
        dir
    })
    .path()
}

fn config() -> InferenceConfig {
    InferenceConfig::new().with_model_dir(model_dir())
}

fn run_predict(args: &[&str]) -> (Value, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_noshow"))
        .arg("predict")
        .args(args)
        .env_remove("NOSHOW_MODEL_DIR")
        .output()
        .unwrap();

    let stdout = String::from_utf8(output.stdout).unwrap();
    let value: Value = serde_json::from_str(stdout.trim()).unwrap();
    (value, output.status.code().unwrap())
}

// ============================================================================
// Library API
// ============================================================================

#[test]
fn test_low_risk_booking_scores_low() {
    let record = BookingFeatures::from_json(LOW_RISK).unwrap();
    let score = predict_risk(&record, &config()).unwrap();

    assert!((0.0..=100.0).contains(&score.value()));
    assert!(score.value() < 50.0, "low-risk booking scored {}", score);
    assert!(!score.requires_deposit());
}

#[test]
fn test_more_cancellations_not_lower_risk() {
    let predictor = RiskPredictor::from_config(&config()).unwrap();
    let base = BookingFeatures::from_json(LOW_RISK).unwrap();
    let heavy = BookingFeatures { cancellations: 5.0, ..base };

    let before = predictor.predict_risk(&base).unwrap();
    let after = predictor.predict_risk(&heavy).unwrap();
    assert!(after >= before, "{} -> {}", before, after);
}

#[test]
fn test_json_key_order_ignored() {
    let predictor = RiskPredictor::from_config(&config()).unwrap();

    // Same values, keys listed in reverse order
    let reversed = r#"{"is_peak_traffic":0,"temperature":20,"is_first_appointment":0,"client_reliability":0.9,"booking_lead_time":10,"is_holiday":0,"is_rainy":0,"is_evening":0,"days_since_last_booking":10,"cancellations":0}"#;
    let a = predictor.predict_risk(&BookingFeatures::from_json(LOW_RISK).unwrap()).unwrap();
    let b = predictor.predict_risk(&BookingFeatures::from_json(reversed).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_swapped_values_change_score() {
    let predictor = RiskPredictor::from_config(&config()).unwrap();

    let values = [2.0, 30.0, 0.0, 1.0, 0.0, 5.0, 0.7, 0.0, 15.0, 0.0];
    let mut swapped = values;
    swapped.swap(2, 3); // is_evening <-> is_rainy

    let a = predictor.predict_risk(&BookingFeatures::from_array(values)).unwrap();
    let b = predictor.predict_risk(&BookingFeatures::from_array(swapped)).unwrap();
    assert_ne!(a, b, "swapping is_evening and is_rainy left the score at {}", a);
}

#[test]
fn test_bool_flags_match_numeric() {
    let predictor = RiskPredictor::from_config(&config()).unwrap();
    let with_bools = r#"{"cancellations":0,"days_since_last_booking":10,"is_evening":false,"is_rainy":false,"is_holiday":false,"booking_lead_time":10,"client_reliability":0.9,"is_first_appointment":false,"temperature":20,"is_peak_traffic":false}"#;

    let a = predictor.predict_risk(&BookingFeatures::from_json(LOW_RISK).unwrap()).unwrap();
    let b = predictor.predict_risk(&BookingFeatures::from_json(with_bools).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_predictor_matches_one_shot() {
    let record = BookingFeatures::from_array([3.0, 30.0, 1.0, 1.0, 1.0, 2.0, 0.5, 1.0, 8.0, 1.0]);
    let predictor = RiskPredictor::from_config(&config()).unwrap();

    assert_eq!(
        predictor.predict_risk(&record).unwrap(),
        predict_risk(&record, &config()).unwrap()
    );
}

// ============================================================================
// Binary entry point
// ============================================================================

#[test]
fn test_cli_success() {
    let dir = model_dir().to_str().unwrap();
    let (value, code) = run_predict(&[LOW_RISK, "--model-dir", dir]);

    assert_eq!(code, 0);
    let score = value["risk_score"].as_f64().unwrap();
    assert!((0.0..50.0).contains(&score));
    assert!(value.get("error").is_none());
}

#[test]
fn test_cli_truncated_json() {
    let dir = model_dir().to_str().unwrap();
    let (value, code) = run_predict(&[r#"{"cancellations": 0, "days_since"#, "--model-dir", dir]);

    assert_eq!(code, 0);
    assert!(value["error"].is_string());
    assert!(value.get("risk_score").is_none());
}

#[test]
fn test_cli_missing_and_extra_fields() {
    let dir = model_dir().to_str().unwrap();

    let (value, code) = run_predict(&[r#"{"cancellations": 0}"#, "--model-dir", dir]);
    assert_eq!(code, 0);
    assert!(value["error"].as_str().unwrap().contains("missing field"));

    let extra = LOW_RISK.replace("}", r#","weekday":3}"#);
    let (value, code) = run_predict(&[&extra, "--model-dir", dir]);
    assert_eq!(code, 0);
    assert!(value["error"].as_str().unwrap().contains("unknown field"));
}

#[test]
fn test_cli_missing_artifacts() {
    let empty = tempfile::tempdir().unwrap();
    let (value, code) = run_predict(&[LOW_RISK, "--model-dir", empty.path().to_str().unwrap()]);

    assert_eq!(code, 0);
    assert!(value["error"].is_string());
}

#[test]
fn test_cli_no_input() {
    let (value, code) = run_predict(&[]);
    assert_eq!(code, 0);
    assert!(value["error"].is_string());
}

#[test]
fn test_cli_bad_arguments_reply_in_band() {
    let dir = model_dir().to_str().unwrap();

    for args in [
        vec![LOW_RISK, "extra", "--model-dir", dir],
        vec![LOW_RISK, "--bogus"],
        vec![LOW_RISK, "--model-dir"],
    ] {
        let (value, code) = run_predict(&args);
        assert_eq!(code, 0, "{:?}", args);
        assert!(value["error"].is_string(), "{:?}", args);
        assert!(value.get("risk_score").is_none());
    }
}
