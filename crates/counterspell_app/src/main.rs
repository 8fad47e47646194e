//! Counterspell site CLI
//!
//! Runs headless scenarios against the site and prints the generated
//! stylesheet, route table and effective configuration.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use counterspell_app::{
    open_storage, routes::ROUTE_PATTERNS, run_loaded_scenario, HeadlessRunConfig, HeadlessScenario,
    SiteConfig,
};
use counterspell_theme::{catalog_stylesheet, ThemeCatalog};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "counterspell")]
#[command(about = "Counterspell Taiwan site tooling")]
#[command(version)]
struct Cli {
    /// Site configuration file or directory containing counterspell.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a headless scenario and print its report
    Run(RunArgs),

    /// Print the color scheme stylesheet
    Stylesheet,

    /// List route patterns
    Routes,

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Scenario JSON file
    scenario: PathBuf,

    /// Also write the report to this relative path
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Logical milliseconds per frame
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run(args) => run(&config, args),
        Commands::Stylesheet => {
            print!("{}", catalog_stylesheet(&ThemeCatalog::builtin()));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Routes => {
            for pattern in ROUTE_PATTERNS {
                println!("{pattern}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<SiteConfig> {
    match path {
        Some(path) => SiteConfig::load_from_path(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(SiteConfig::default()),
    }
}

fn run(config: &SiteConfig, args: RunArgs) -> Result<ExitCode> {
    let scenario = HeadlessScenario::from_path(&args.scenario)?;
    let runtime = HeadlessRunConfig {
        tick_ms: args.tick_ms,
        ..Default::default()
    };
    let outcome = run_loaded_scenario(&scenario, config, runtime, open_storage(config))?;

    let report = outcome.report();
    report.print(&mut std::io::stdout().lock())?;
    if let Some(path) = &args.report {
        report.save(path)?;
        tracing::info!(path = %path.display(), "report written");
    }

    Ok(if outcome.is_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
