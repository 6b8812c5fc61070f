//! Civic command line: show the effective deployment config or replay a
//! governance scenario against a deterministic chain.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use civic_node::{DeploymentConfig, Scenario, ScenarioRunner};
use civic_utils::{init_logging, LogFormat};
use clap::Parser;

#[derive(Parser)]
#[command(name = "civic", about = "Token-weighted governance engine")]
struct Cli {
    /// Path to a TOML deployment file. Built-in defaults apply when absent.
    #[arg(long, global = true, env = "CIVIC_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Overrides the file's `log_level`.
    #[arg(long, global = true, env = "CIVIC_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log output: "human" or "json". Overrides the file's `log_format`.
    #[arg(long, global = true, env = "CIVIC_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the effective deployment config as TOML.
    ShowConfig,
    /// Deploy a fresh system and replay a JSON scenario against it.
    Replay {
        /// Scenario file.
        scenario: PathBuf,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<DeploymentConfig> {
    let mut config = match &cli.config {
        Some(path) => DeploymentConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => DeploymentConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    Ok(config)
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(config.log_format, &config.log_level)
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))?;
    if let Some(path) = &cli.config {
        tracing::info!(path = %path.display(), "loaded deployment config");
    }

    match cli.command {
        Command::ShowConfig => {
            print!("{}", config.to_toml_string()?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Replay { scenario } => {
            let text = std::fs::read_to_string(&scenario)
                .with_context(|| format!("reading scenario {}", scenario.display()))?;
            let scenario = Scenario::from_json(&text)?;

            let mut runner = ScenarioRunner::new(config)?;
            let report = runner.run(&scenario);
            println!("{}", serde_json::to_string_pretty(&report)?);

            if report.passed() {
                tracing::info!(
                    scenario = %report.name,
                    steps = report.steps.len(),
                    final_block = report.final_block,
                    "scenario passed"
                );
                Ok(ExitCode::SUCCESS)
            } else {
                tracing::error!(
                    scenario = %report.name,
                    failures = report.failures(),
                    "scenario failed"
                );
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
