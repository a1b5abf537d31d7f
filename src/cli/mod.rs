//! No-show risk CLI Module
//!
//! Command-line interface for training, single-booking scoring, and dataset export.

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use colored::*;
use polars::prelude::*;
use serde_json::{json, Value};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::features::BookingFeatures;
use crate::inference::{predict_risk, InferenceConfig};
use crate::synthetic::{BookingGenerator, GeneratorConfig};
use crate::training::{TrainEngine, TrainingConfig, TrainingReport};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }
fn warn(s: &str) -> ColoredString   { s.truecolor(235, 180, 90) }

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "noshow")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "No-show risk scoring for appointment bookings")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train the forest on synthetic bookings and write model.bin and scaler.bin
    Train {
        /// Directory the artifacts are written to; pass the same directory to
        /// `predict --model-dir` when it is not `models/` next to the executable
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Number of synthetic bookings
        #[arg(long, default_value = "1000")]
        samples: usize,

        /// Seed for data generation and the forest
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Number of trees
        #[arg(long, default_value = "100")]
        trees: usize,

        /// Maximum tree depth
        #[arg(long, default_value = "10")]
        max_depth: usize,
    },

    /// Score one booking given as a JSON object
    Predict {
        /// Booking record as JSON
        input: Option<String>,

        /// Directory holding model.bin and scaler.bin (default: models/ next to the executable)
        #[arg(long, env = "NOSHOW_MODEL_DIR")]
        model_dir: Option<PathBuf>,
    },

    /// Write the synthetic training set to CSV
    Generate {
        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Number of synthetic bookings
        #[arg(long, default_value = "1000")]
        samples: usize,

        /// Generator seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Also write the latent no-show probability
        #[arg(long)]
        with_probability: bool,
    },
}

/// Outcome of parsing the command line
pub enum Invocation {
    /// Arguments parsed; run the command
    Run(Cli),
    /// `predict` was called with bad arguments; print this and exit 0
    Reply(Value),
}

/// Parse `args`. A malformed `predict` call becomes an in-band
/// `{"error": ...}` reply; help, version and other commands' errors are left
/// for clap to print.
pub fn parse_cli<I, T>(args: I) -> std::result::Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let err = match Cli::try_parse_from(args.iter()) {
        Ok(cli) => return Ok(Invocation::Run(cli)),
        Err(err) => err,
    };

    let is_predict = args.get(1).map_or(false, |a| a == "predict");
    let is_info = matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion);
    if !is_predict || is_info {
        return Err(err);
    }

    let rendered = err.to_string();
    let message = rendered
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ")
        .to_string();
    Ok(Invocation::Reply(json!({ "error": message })))
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(
    output_dir: &Path,
    samples: usize,
    seed: u64,
    trees: usize,
    max_depth: usize,
) -> anyhow::Result<()> {
    section("Train");

    let config = TrainingConfig::new()
        .with_generator(GeneratorConfig::new().with_n_samples(samples).with_seed(seed))
        .with_n_estimators(trees)
        .with_max_depth(max_depth)
        .with_random_state(seed)
        .with_output_dir(output_dir);

    step_run(&format!("Training {} trees on {} bookings", trees, samples));
    let start = Instant::now();
    let mut engine = TrainEngine::new(config);
    let (paths, report) = engine.run()?;
    step_done(&format!("{:?}", start.elapsed()));

    print_report(&report);

    println!();
    println!("  {} {}", ok("✓"), format!("Saved {}", paths.model.display()).white());
    println!("  {} {}", ok("✓"), format!("Saved {}", paths.scaler.display()).white());
    println!(
        "  {}",
        dim(&format!("score with: noshow predict '<json>' --model-dir {}", output_dir.display()))
    );
    println!();

    Ok(())
}

fn print_report(report: &TrainingReport) {
    println!();
    println!(
        "  {:<16} {}",
        muted("Accuracy"),
        format!("{:.2}", report.metrics.accuracy.unwrap_or(0.0)).white().bold()
    );
    for (name, value) in [
        ("Precision", report.metrics.precision),
        ("Recall", report.metrics.recall),
        ("F1", report.metrics.f1_score),
    ] {
        println!("  {:<16} {}", muted(name), format!("{:.2}", value.unwrap_or(0.0)).white());
    }
    println!("  {:<16} {}", muted("No-show rate"), format!("{:.3}", report.no_show_rate).white());
    println!("  {:<16} {}", muted("Time"), format!("{:.3}s", report.metrics.training_time_secs).white());

    section("Feature importance");
    for (name, importance) in &report.feature_importances {
        println!("  {:<26} {:>8.4}", name, importance);
    }

    section("Sample risk scores");
    for sample in &report.sample_scores {
        let suffix = if sample.risk_score.requires_deposit() {
            format!(" {}", warn("(Deposit required)"))
        } else {
            String::new()
        };
        println!("  {}", muted(&sample.description));
        println!("    {} {}{}", dim("risk"), format!("{}", sample.risk_score).white().bold(), suffix);
    }
}

/// Decode `input` and score it, always returning a JSON object.
///
/// `{"risk_score": x}` on success, `{"error": msg}` on any failure.
pub fn predict_json(input: Option<&str>, config: &InferenceConfig) -> Value {
    let Some(input) = input else {
        return json!({ "error": "missing booking JSON argument" });
    };

    match BookingFeatures::from_json(input).and_then(|record| predict_risk(&record, config)) {
        Ok(score) => json!({ "risk_score": score.value() }),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

/// Print the scoring result to stdout. Failures are reported in-band.
pub fn cmd_predict(input: Option<&str>, model_dir: Option<&Path>) {
    let mut config = InferenceConfig::new();
    if let Some(dir) = model_dir {
        config = config.with_model_dir(dir);
    }

    let out = predict_json(input, &config);
    if out.get("error").is_some() {
        tracing::debug!(response = %out, "Scoring failed");
    }
    println!("{}", out);
}

pub fn cmd_generate(output: &Path, samples: usize, seed: u64, with_probability: bool) -> anyhow::Result<()> {
    section("Generate");

    step_run(&format!("Generating {} bookings", samples));
    let start = Instant::now();
    let dataset = BookingGenerator::new(GeneratorConfig::new().with_n_samples(samples).with_seed(seed)).generate()?;
    let mut df = if with_probability {
        dataset.to_frame_with_probability()?
    } else {
        dataset.to_frame()?
    };
    step_done(&format!("{:?}", start.elapsed()));

    step_run(&format!("Saving → {}", output.display()));
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(output)?;
    CsvWriter::new(&mut file).finish(&mut df)?;
    step_done(&format!("{} rows × {} cols", df.height(), df.width()));

    println!();
    println!("  {:<16} {}", muted("No-show rate"), format!("{:.3}", dataset.no_show_rate()).white());
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_predict() {
        let cli = Cli::try_parse_from(["noshow", "predict", "{}", "--model-dir", "/tmp/m"]).unwrap();
        match cli.command {
            Commands::Predict { input, model_dir } => {
                assert_eq!(input.as_deref(), Some("{}"));
                assert_eq!(model_dir, Some(PathBuf::from("/tmp/m")));
            }
            _ => panic!("expected predict"),
        }
    }

    #[test]
    fn test_cli_train_defaults() {
        let cli = Cli::try_parse_from(["noshow", "train"]).unwrap();
        match cli.command {
            Commands::Train { output_dir, samples, seed, trees, max_depth } => {
                assert_eq!(output_dir, PathBuf::from("."));
                assert_eq!(samples, 1000);
                assert_eq!(seed, 42);
                assert_eq!(trees, 100);
                assert_eq!(max_depth, 10);
            }
            _ => panic!("expected train"),
        }
    }

    #[test]
    fn test_bad_predict_args_reply_in_band() {
        for args in [
            vec!["noshow", "predict", "{}", "extra"],
            vec!["noshow", "predict", "{}", "--bogus"],
            vec!["noshow", "predict", "{}", "--model-dir"],
        ] {
            match parse_cli(args.clone()).unwrap() {
                Invocation::Reply(out) => {
                    let message = out["error"].as_str().unwrap();
                    assert!(!message.is_empty(), "{:?}", args);
                    assert!(out.get("risk_score").is_none());
                }
                Invocation::Run(_) => panic!("{:?} should not parse", args),
            }
        }
    }

    #[test]
    fn test_other_parse_errors_left_to_clap() {
        assert!(parse_cli(["noshow", "train", "--bogus"]).is_err());
        let help = parse_cli(["noshow", "predict", "--help"]).err().unwrap();
        assert_eq!(help.kind(), ErrorKind::DisplayHelp);
        assert!(matches!(parse_cli(["noshow", "predict", "{}"]), Ok(Invocation::Run(_))));
    }

    #[test]
    fn test_train_help_points_to_model_dir() {
        use clap::CommandFactory;

        let mut cmd = Cli::command();
        let train = cmd.find_subcommand_mut("train").unwrap();
        let help = train.render_long_help().to_string();
        assert!(help.contains("--model-dir"));
    }

    #[test]
    fn test_predict_json_errors_in_band() {
        let dir = tempfile::tempdir().unwrap();
        let config = InferenceConfig::new().with_model_dir(dir.path());

        let out = predict_json(Some("{\"cancellations\": 1"), &config);
        assert!(out.get("error").is_some());
        assert!(out.get("risk_score").is_none());

        let out = predict_json(None, &config);
        assert!(out["error"].is_string());

        // valid record, no artifacts on disk
        let record = r#"{"cancellations":0,"days_since_last_booking":10,"is_evening":0,"is_rainy":0,"is_holiday":0,"booking_lead_time":10,"client_reliability":0.9,"is_first_appointment":0,"temperature":20,"is_peak_traffic":0}"#;
        let out = predict_json(Some(record), &config);
        assert!(out["error"].as_str().unwrap().starts_with("Artifact error"));
    }
}
