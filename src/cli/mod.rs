//! Rent Estimator CLI Module
//!
//! Command-line interface for training, prediction and model inspection.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::export::{ModelArtifact, SerializationFormat};
use crate::inference::{
    PropertyForm, RentService, BATHROOM_RANGE, BHK_RANGE, CITIES, CONTACT_TYPES, DEFAULT_FLOOR,
    FURNISHING_STATUSES, SIZE_RANGE,
};
use crate::pipeline::train_holdout;
use crate::record::PropertyRecord;
use crate::training::TrainingConfig;
use crate::utils::data_loader;

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

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

fn money(value: f64) -> String {
    format!("₹{:.0}", value)
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "rent-estimator")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Monthly rent estimation for residential listings")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train a model on a listings CSV and persist it
    Train {
        /// Listings CSV with a Rent column
        #[arg(short, long)]
        data: PathBuf,

        /// Output model file (`.json` for the JSON encoding)
        #[arg(short, long, default_value = "rent_model.bin")]
        output: PathBuf,

        /// Training configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Held-out fraction, overrides the configuration
        #[arg(long)]
        test_size: Option<f64>,

        /// Split seed, overrides the configuration
        #[arg(long)]
        seed: Option<u64>,

        /// Force the JSON encoding regardless of extension
        #[arg(long)]
        json: bool,
    },

    /// Estimate the rent of one property
    Predict {
        /// Trained model file
        #[arg(short, long)]
        model: PathBuf,

        #[arg(long)]
        bhk: u32,

        /// Area in square feet
        #[arg(long)]
        size: f64,

        #[arg(long)]
        bathroom: u32,

        #[arg(long)]
        city: String,

        #[arg(long, default_value = "Semi-Furnished")]
        furnishing: String,

        #[arg(long, default_value = DEFAULT_FLOOR)]
        floor: String,

        #[arg(long, default_value = "Contact Owner")]
        contact: String,
    },

    /// Estimate rents for every row of a CSV
    PredictBatch {
        /// Trained model file
        #[arg(short, long)]
        model: PathBuf,

        /// Listings CSV
        #[arg(short, long)]
        data: PathBuf,

        /// Output CSV with estimates appended
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show what a model file contains
    Info {
        /// Trained model file
        #[arg(short, long)]
        model: PathBuf,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(
    data_path: &Path,
    output: &Path,
    config_path: Option<&Path>,
    test_size: Option<f64>,
    seed: Option<u64>,
    force_json: bool,
) -> anyhow::Result<()> {
    section("Train");

    let mut config = match config_path {
        Some(path) => TrainingConfig::from_file(path)?,
        None => TrainingConfig::default(),
    };
    if let Some(test_size) = test_size {
        config = config.with_test_size(test_size);
    }
    if let Some(seed) = seed {
        config = config.with_random_state(seed);
    }
    config.validate()?;

    step_run("Loading data");
    let start = Instant::now();
    let examples = data_loader::load_examples(data_path)?;
    step_done(&format!("{} listings in {:?}", examples.len(), start.elapsed()));

    step_run("Training decision tree");
    let start = Instant::now();
    let outcome = train_holdout(&examples, &config)?;
    step_done(&format!(
        "{} train / {} test in {:?}",
        outcome.n_train,
        outcome.n_test,
        start.elapsed()
    ));

    let metrics = outcome.metrics;
    let tree = outcome.pipeline.regressor();

    step_run(&format!("Saving → {}", output.display()));
    let format = if force_json {
        SerializationFormat::Json
    } else {
        SerializationFormat::from_path(output)
    };
    let artifact = ModelArtifact::from_pipeline(outcome.pipeline.clone(), Some(&metrics))?;
    artifact.save_with_format(output, format)?;
    step_done(&format!("{:?}", format));

    let r_squared = if metrics.r_squared.is_nan() {
        "undefined".to_string()
    } else {
        format!("{:.4}", metrics.r_squared)
    };

    println!();
    println!("  {:<16} {}", muted("RMSE"), format!("{:.2}", metrics.rmse).white().bold());
    println!("  {:<16} {}", muted("R²"), r_squared.white().bold());
    println!("  {:<16} {}", muted("MAE"), format!("{:.2}", metrics.mae).white());
    println!("  {:<16} {}", muted("Depth"), tree.depth());
    println!("  {:<16} {}", muted("Leaves"), tree.n_leaves());
    println!("  {:<16} {}", muted("Features"), outcome.pipeline.encoder().n_features_out());
    println!();

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_predict(
    model_path: &Path,
    bhk: u32,
    size: f64,
    bathroom: u32,
    city: &str,
    furnishing: &str,
    floor: &str,
    contact: &str,
) -> anyhow::Result<()> {
    section("Predict");

    let service = RentService::load(model_path)?;
    let record = PropertyRecord {
        bhk,
        size,
        bathroom,
        city: city.to_string(),
        furnishing_status: furnishing.to_string(),
        floor: floor.to_string(),
        point_of_contact: contact.to_string(),
    };

    let estimate = service.estimate(&record)?;

    println!("  {:<16} {}", muted("Estimated rent"), money(estimate.rent).white().bold());
    if let Some(rate) = estimate.rent_per_sqft {
        println!("  {:<16} {}", muted("Per sqft"), format!("₹{:.2}", rate).white());
    }
    println!();
    Ok(())
}

pub fn cmd_predict_batch(model_path: &Path, data_path: &Path, output: &Path) -> anyhow::Result<()> {
    section("Predict batch");

    step_run("Loading model");
    let service = RentService::load(model_path)?;
    step_done(&service.metadata().trained_at);

    step_run("Loading data");
    let records = data_loader::load_records(data_path)?;
    step_done(&format!("{} listings", records.len()));

    step_run("Estimating");
    let start = Instant::now();
    let estimates = service.estimate_batch(&records)?;
    step_done(&format!("{:?}", start.elapsed()));

    step_run(&format!("Saving → {}", output.display()));
    data_loader::write_predictions(output, &records, &estimates)?;
    step_done(&format!("{} rows", estimates.len()));

    println!();
    Ok(())
}

pub fn cmd_info(model_path: &Path) -> anyhow::Result<()> {
    section("Model Info");

    let artifact = ModelArtifact::load(model_path)?;
    let metadata = artifact.metadata();
    let pipeline = artifact.pipeline();

    println!("  {:<20} {}", muted("File"), model_path.display());
    println!("  {:<20} {}", muted("Name"), metadata.name);
    println!("  {:<20} {}", muted("Written by"), format!("v{}", metadata.version));
    println!("  {:<20} {}", muted("Trained at"), metadata.trained_at);
    println!("  {:<20} {}", muted("Model type"), metadata.model_type);
    println!("  {:<20} {:016x}", muted("Checksum"), artifact.checksum);
    println!("  {:<20} {}", muted("Tree depth"), pipeline.regressor().depth());
    println!("  {:<20} {}", muted("Leaves"), pipeline.regressor().n_leaves());

    section("Hyperparameters");
    for (key, value) in &metadata.hyperparameters {
        println!("  {:<20} {}", muted(key), value);
    }

    if !metadata.metrics.is_empty() {
        section("Evaluation");
        for (key, value) in &metadata.metrics {
            println!("  {:<20} {:.4}", muted(key), value);
        }
    }

    section("Encoding");
    for params in pipeline.encoder().scaler_params() {
        println!(
            "  {:<20} mean {:.2}  std {:.2}",
            muted(params.field.column_name()),
            params.mean,
            params.std
        );
    }
    for vocab in pipeline.encoder().vocabularies() {
        println!("  {:<20} {} categories", muted(vocab.field.column_name()), vocab.len());
    }

    section("Top features");
    for (name, importance) in pipeline.ranked_importances().iter().take(10) {
        if *importance <= 0.0 {
            break;
        }
        println!("  {:<36} {:.4}", name, importance);
    }

    println!();
    Ok(())
}

// ─── Interactive mode ──────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("       {}", "House Rent Estimator".truecolor(120, 170, 255).bold());
    println!("       {}", dim(&format!("decision tree  ·  v{}  ·  rust", env!("CARGO_PKG_VERSION"))));
    println!();
}

fn select_choice(
    theme: &dialoguer::theme::ColorfulTheme,
    prompt: &str,
    choices: &[&str],
    default: usize,
) -> anyhow::Result<String> {
    let idx = dialoguer::Select::with_theme(theme)
        .with_prompt(prompt)
        .items(choices)
        .default(default)
        .interact()?;
    Ok(choices[idx].to_string())
}

fn prompt_form(theme: &dialoguer::theme::ColorfulTheme, last: &PropertyForm) -> anyhow::Result<PropertyForm> {
    use dialoguer::Input;

    let bhk: u32 = Input::with_theme(theme)
        .with_prompt(format!("BHK ({}-{})", BHK_RANGE.start(), BHK_RANGE.end()))
        .default(last.bhk)
        .validate_with(|v: &u32| {
            if BHK_RANGE.contains(v) { Ok(()) } else { Err("out of range") }
        })
        .interact_text()?;

    let size: f64 = Input::with_theme(theme)
        .with_prompt(format!("Size in sqft ({}-{})", SIZE_RANGE.start(), SIZE_RANGE.end()))
        .default(last.size)
        .validate_with(|v: &f64| {
            if SIZE_RANGE.contains(v) { Ok(()) } else { Err("out of range") }
        })
        .interact_text()?;

    let bathroom: u32 = Input::with_theme(theme)
        .with_prompt(format!("Bathrooms ({}-{})", BATHROOM_RANGE.start(), BATHROOM_RANGE.end()))
        .default(last.bathroom)
        .validate_with(|v: &u32| {
            if BATHROOM_RANGE.contains(v) { Ok(()) } else { Err("out of range") }
        })
        .interact_text()?;

    let position = |choices: &[&str], value: &str| choices.iter().position(|c| *c == value).unwrap_or(0);

    let city = select_choice(theme, "City", &CITIES, position(&CITIES, &last.city))?;
    let furnishing_status = select_choice(
        theme,
        "Furnishing status",
        &FURNISHING_STATUSES,
        position(&FURNISHING_STATUSES, &last.furnishing_status),
    )?;

    let floor: String = Input::with_theme(theme)
        .with_prompt("Floor")
        .default(last.floor.clone())
        .interact_text()?;

    let point_of_contact = select_choice(
        theme,
        "Point of contact",
        &CONTACT_TYPES,
        position(&CONTACT_TYPES, &last.point_of_contact),
    )?;

    Ok(PropertyForm {
        bhk,
        size,
        bathroom,
        city,
        furnishing_status,
        floor,
        point_of_contact,
    })
}

pub fn cmd_interactive() -> anyhow::Result<()> {
    use dialoguer::{theme::ColorfulTheme, Confirm, Input};

    print_banner();

    let theme = ColorfulTheme {
        active_item_prefix: dialoguer::console::style("  ›".to_string()).for_stderr().cyan(),
        active_item_style: dialoguer::console::Style::new().for_stderr().white().bold(),
        inactive_item_prefix: dialoguer::console::style("   ".to_string()).for_stderr(),
        inactive_item_style: dialoguer::console::Style::new().for_stderr().color256(245),
        prompt_prefix: dialoguer::console::style("  ?".to_string()).for_stderr().color256(111),
        prompt_style: dialoguer::console::Style::new().for_stderr().white().bold(),
        ..ColorfulTheme::default()
    };

    let model_path: String = Input::with_theme(&theme)
        .with_prompt("Model file")
        .default("rent_model.bin".to_string())
        .interact_text()?;

    let service = RentService::shared(&model_path)?;
    let mut form = PropertyForm::default();

    loop {
        println!();
        form = prompt_form(&theme, &form)?;

        match form.clone().into_record().and_then(|r| service.estimate(&r)) {
            Ok(estimate) => {
                section("Estimate");
                println!("  {:<16} {}", muted("Monthly rent"), money(estimate.rent).white().bold());
                if let Some(rate) = estimate.rent_per_sqft {
                    println!("  {:<16} {}", muted("Per sqft"), format!("₹{:.2}", rate).white());
                }
            }
            Err(e) => println!("  {} {}", "error".red(), e),
        }

        println!();
        let again = Confirm::with_theme(&theme)
            .with_prompt("Estimate another property")
            .default(true)
            .interact()?;
        if !again {
            println!();
            println!("  {}", dim("goodbye"));
            println!();
            break;
        }
    }

    Ok(())
}
