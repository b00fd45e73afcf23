//! Rent Estimator - Main Entry Point
//!
//! Trains, inspects and serves the rent model from the command line.

use clap::Parser;
use rent_estimator::cli::{Cli, Commands, cmd_train, cmd_predict, cmd_predict_batch, cmd_info, cmd_interactive};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rent_estimator=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Train { data, output, config, test_size, seed, json }) => {
            cmd_train(&data, &output, config.as_deref(), test_size, seed, json)?;
        }
        Some(Commands::Predict { model, bhk, size, bathroom, city, furnishing, floor, contact }) => {
            cmd_predict(&model, bhk, size, bathroom, &city, &furnishing, &floor, &contact)?;
        }
        Some(Commands::PredictBatch { model, data, output }) => {
            cmd_predict_batch(&model, &data, &output)?;
        }
        Some(Commands::Info { model }) => {
            cmd_info(&model)?;
        }
        None => {
            // Default: the interactive estimate form
            cmd_interactive()?;
        }
    }

    Ok(())
}
