//! RegimeLab CLI — run the momentum/volatility-regime backtest and write reports.
//!
//! Commands:
//! - `run`: align a price and a volatility series, evaluate the three
//!   portfolio variants, print the comparison table, write artifacts
//! - `init-config`: write the default TOML configuration
//! - `show`: print the comparison table of a saved `result.json`

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use regimelab_core::data::{SeriesProvider, SyntheticConfig};
use regimelab_runner::reporting::read_result_json;
use regimelab_runner::{
    provider_for_path, run_from_providers, synthetic_providers, ArtifactManager, ResultsTable,
    RunConfig, RunResult,
};

#[derive(Parser)]
#[command(
    name = "regimelab",
    about = "RegimeLab CLI — price momentum with a volatility-regime overlay"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the backtest on two input files (or synthetic data).
    Run {
        /// Price series (CSV or Parquet).
        #[arg(long, required_unless_present = "synthetic")]
        prices: Option<PathBuf>,

        /// Volatility proxy series, e.g. VIX closes (CSV or Parquet).
        #[arg(long, required_unless_present = "synthetic")]
        vol: Option<PathBuf>,

        /// Generate a deterministic synthetic pair instead of reading files.
        #[arg(long, default_value_t = false, conflicts_with_all = ["prices", "vol"])]
        synthetic: bool,

        /// Seed for --synthetic.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Trading days for --synthetic.
        #[arg(long, default_value_t = 2520)]
        days: usize,

        /// First date for --synthetic (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,

        /// Path to a TOML config file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory for the table, curves, report and JSON.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Write the default configuration as TOML.
    InitConfig {
        /// Destination file.
        #[arg(long, default_value = "regimelab.toml")]
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Print the comparison table from a saved result.json.
    Show {
        /// Path to result.json.
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            prices,
            vol,
            synthetic,
            seed,
            days,
            start,
            config,
            output_dir,
        } => {
            let config = load_config(config.as_deref())?;
            let result = if synthetic {
                run_synthetic(seed, days, start.as_deref(), &config)?
            } else {
                match (prices, vol) {
                    (Some(prices), Some(vol)) => run_files(&prices, &vol, &config)?,
                    _ => bail!("--prices and --vol are both required without --synthetic"),
                }
            };
            report(&result, &output_dir)
        }
        Commands::InitConfig { path, force } => init_config(&path, force),
        Commands::Show { path } => {
            let result = read_result_json(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            print_summary(&result);
            Ok(())
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the default `info` level.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<RunConfig> {
    match path {
        Some(path) => RunConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(RunConfig::default()),
    }
}

fn run_files(prices: &Path, vol: &Path, config: &RunConfig) -> Result<RunResult> {
    let price_provider = provider_for_path(prices, &config.input.price)
        .with_context(|| format!("cannot read prices from {}", prices.display()))?;
    let vol_provider = provider_for_path(vol, &config.input.vol)
        .with_context(|| format!("cannot read volatility from {}", vol.display()))?;
    run(price_provider.as_ref(), vol_provider.as_ref(), config)
}

fn run_synthetic(
    seed: u64,
    days: usize,
    start: Option<&str>,
    config: &RunConfig,
) -> Result<RunResult> {
    let mut synthetic = SyntheticConfig {
        seed,
        trading_days: days,
        ..SyntheticConfig::default()
    };
    if let Some(start) = start {
        synthetic.start = NaiveDate::parse_from_str(start, "%Y-%m-%d")
            .with_context(|| format!("invalid --start '{start}' (expected YYYY-MM-DD)"))?;
    }
    let (price, vol) = synthetic_providers(synthetic);
    run(&price, &vol, config)
}

fn run(price: &dyn SeriesProvider, vol: &dyn SeriesProvider, config: &RunConfig) -> Result<RunResult> {
    run_from_providers(price, vol, config).context("backtest failed")
}

fn report(result: &RunResult, output_dir: &Path) -> Result<()> {
    print_summary(result);
    let paths = ArtifactManager::new(output_dir)
        .and_then(|manager| manager.save_run(result))
        .with_context(|| format!("failed to write artifacts to {}", output_dir.display()))?;
    info!(table = %paths.comparison_csv.display(), "comparison table saved");
    println!("Artifacts saved to: {}", output_dir.display());
    Ok(())
}

fn print_summary(result: &RunResult) {
    let d = &result.diagnostics;
    println!(
        "Run {}  {} to {}  ({} rows, {} trimmed)",
        result.fingerprint.short_id(),
        d.first_date,
        d.last_date,
        d.evaluated_rows,
        d.trimmed_rows
    );
    if result.inputs.has_synthetic() {
        println!("WARNING: synthetic data, not a market result");
    }
    println!();
    print!("{}", ResultsTable::from_result(result).render());
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let toml = RunConfig::default().to_toml()?;
    std::fs::write(path, toml).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
