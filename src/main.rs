//! No-show risk - Main Entry Point
//!
//! Trains the booking classifier, scores single bookings, and exports synthetic data.

use noshow_risk::cli::{cmd_generate, cmd_predict, cmd_train, parse_cli, Commands, Invocation};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `predict` keeps stdout to one JSON object
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "noshow_risk=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match parse_cli(std::env::args_os()) {
        Ok(Invocation::Run(cli)) => cli,
        Ok(Invocation::Reply(out)) => {
            println!("{}", out);
            return Ok(());
        }
        Err(err) => err.exit(),
    };

    match cli.command {
        Commands::Train { output_dir, samples, seed, trees, max_depth } => {
            cmd_train(&output_dir, samples, seed, trees, max_depth)?;
        }
        Commands::Predict { input, model_dir } => {
            cmd_predict(input.as_deref(), model_dir.as_deref());
        }
        Commands::Generate { output, samples, seed, with_probability } => {
            cmd_generate(&output, samples, seed, with_probability)?;
        }
    }

    Ok(())
}
