//! # RCC Beam Design CLI
//!
//! Terminal front end for the design engine: runs every model in a model
//! directory for one load input and prints the corrected sections with their
//! check breakdown, followed by the JSON the HTTP API would return.
//!
//! ```text
//! beam_cli design --fck 30 --fy 415 --mu 120 --models saved_models
//! beam_cli init-models saved_models
//! ```

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use beam_core::corrector::SearchConfig;
use beam_core::evaluator::{detailing_check, StructuralEvaluator};
use beam_core::file_io::{load_models, save_model, ModelFile};
use beam_core::models::RegressionModel;
use beam_core::orchestrator::{run_models, DesignResponse};
use beam_core::section::{LoadInput, Section};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "beam_cli", version, about = "RCC beam design from trained section models")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Design a beam section with every model in the model directory
    Design {
        /// Concrete grade fck (MPa); prompted if omitted
        #[arg(long)]
        fck: Option<f64>,

        /// Steel grade fy (MPa); prompted if omitted
        #[arg(long)]
        fy: Option<f64>,

        /// Factored moment Mu (kN·m); prompted if omitted
        #[arg(long)]
        mu: Option<f64>,

        /// Directory of model files
        #[arg(long, default_value = "saved_models")]
        models: PathBuf,

        /// First perturbation fraction and stage increment
        #[arg(long, default_value_t = 0.01)]
        step_percent: f64,

        /// Largest perturbation fraction searched
        #[arg(long, default_value_t = 0.20)]
        max_step_percent: f64,

        /// Print only the JSON result
        #[arg(long)]
        json: bool,
    },

    /// Write the bundled sample models into a directory
    InitModels {
        /// Target directory (created if missing)
        #[arg(default_value = "saved_models")]
        dir: PathBuf,
    },
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Design {
            fck,
            fy,
            mu,
            models,
            step_percent,
            max_step_percent,
            json,
        } => {
            let load = LoadInput::new(
                fck.unwrap_or_else(|| prompt_f64("Enter concrete grade fck (MPa) [30]: ", 30.0)),
                fy.unwrap_or_else(|| prompt_f64("Enter steel grade fy (MPa) [415]: ", 415.0)),
                mu.unwrap_or_else(|| prompt_f64("Enter design moment Mu (kN·m) [120]: ", 120.0)),
            );
            let search = SearchConfig {
                step_percent,
                max_step_percent,
                ..SearchConfig::default()
            };
            run_design(&load, &models, &search, json)
        }
        Commands::InitModels { dir } => init_models(&dir),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_design(load: &LoadInput, models_dir: &Path, search: &SearchConfig, json_only: bool) -> Result<()> {
    search.validate()?;
    let models = load_models(models_dir)?;
    let designs = run_models(load, &models, search);
    let response = DesignResponse::from_designs(load, &designs);

    if json_only {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("RCC Beam Design");
    println!("═══════════════════════════════════════");
    println!("Input:");
    println!("  fck = {} MPa", load.fck_mpa);
    println!("  fy  = {} MPa", load.fy_mpa);
    println!("  Mu  = {} kN·m", load.mu_knm);
    println!("  Models: {}", models.names().join(", "));
    println!();

    let evaluator = StructuralEvaluator;
    for (name, outcome) in designs {
        println!("═══════════════════════════════════════");
        println!("  MODEL: {}", name);
        println!("═══════════════════════════════════════");

        let design = match outcome {
            Ok(design) => design,
            Err(e) => {
                println!("  Prediction failed: {}", e);
                println!();
                continue;
            }
        };

        let correction = design.correction;
        print_section("Raw prediction", &design.raw);
        print_section("Corrected", &correction.section);
        println!(
            "  Search: {} stage(s), {} evaluation(s)",
            correction.stages, correction.evaluations
        );
        println!();

        let check = evaluator.evaluate(&correction.section, load);
        println!("Checks:");
        println!("  Steel limits:  {:.2} <= {:.2} <= {:.2} {}",
            check.ast_min_mm2,
            correction.section.ast_mm2,
            check.ast_max_mm2,
            status_icon(check.reinforcement_ok)
        );
        println!("  b/d ratio:     {:.3} (min 0.3) {}",
            check.width_depth_ratio,
            status_icon(check.proportions_ok)
        );
        println!("  Capacity:      Mu = {} <= MOR = {:.3} kN·m {}",
            load.mu_knm,
            check.mor_knm,
            status_icon(check.capacity_ok)
        );
        println!("  Ductility:     MOR = {:.3} <= Mul = {:.3} kN·m {}",
            check.mor_knm,
            check.mul_knm,
            status_icon(check.under_reinforced)
        );
        println!("  Cost:          {:.2} per metre", check.cost);

        let detailing = detailing_check(&correction.section);
        println!("  Detailing:     {} {}", detailing.message, status_icon(detailing.ok));
        println!();
        println!("  RESULT: {}",
            if correction.valid { "VALID" } else { "NO VALID SECTION FOUND (clamped original)" }
        );
        println!();
    }

    println!("JSON Output (for API use):");
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

fn print_section(label: &str, section: &Section) {
    println!("  {:<15} b = {:.1} mm, d = {:.1} mm, Ast = {:.1} mm²",
        format!("{}:", label),
        section.width_mm,
        section.depth_mm,
        section.ast_mm2
    );
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}

/// Sample models fitted by hand to typical IS 456 designs for fck 20-35, fy 415-500
fn sample_models() -> Vec<(&'static str, ModelFile)> {
    vec![
        (
            "linear_regression",
            ModelFile::new(RegressionModel::Linear {
                intercept: [230.0, 200.0, 100.0],
                coefficients: [[0.0, 0.0, 0.0], [0.0, 0.0, 2.0], [0.0, 0.0, 6.5]],
            })
            .with_description("Depth and steel linear in Mu at a fixed 230 mm width"),
        ),
        (
            "power_law",
            ModelFile::new(RegressionModel::PowerLaw {
                scale: [230.0, 45.0, 9.0],
                exponents: [[0.0, 0.0, 0.0], [0.0, 0.0, 0.5], [0.0, 0.0, 0.9]],
            })
            .with_description("Log-linear fit: d ~ sqrt(Mu), Ast ~ Mu^0.9"),
        ),
    ]
}

fn init_models(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    for (name, model) in sample_models() {
        let path = dir.join(format!("{}.json", name));
        save_model(&model, &path)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}
