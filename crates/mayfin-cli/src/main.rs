mod commands;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::recommendation::{AnalyseArgs, RecommendArgs};
use commands::scoring::{AlertsArgs, RatiosArgs, ScoreArgs};

/// Loan-file ratio analysis, credit scoring and financing recommendations
#[derive(Parser)]
#[command(
    name = "mayfin",
    version,
    about = "Loan-file ratio analysis, credit scoring and financing recommendations",
    long_about = "A CLI for analysing SME financing dossiers with decimal precision. \
                  Computes the fifteen financial ratios over three fiscal years, raises \
                  risk alerts, scores the entity on seven weighted criteria and sizes \
                  the financeable amount from its self-financing capacity."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Scoring policy file (YAML or JSON); the built-in policy when absent
    #[arg(long, global = true)]
    policy: Option<String>,

    /// Log filter used when RUST_LOG is unset (e.g. "info", "mayfin_core=debug")
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the fifteen ratios for N, N-1 and N-2
    Ratios(RatiosArgs),
    /// Raise risk alerts from ratios and entity flags
    Alerts(AlertsArgs),
    /// Score the entity on the seven weighted criteria
    Score(ScoreArgs),
    /// Size the financeable amount and list guarantees and conditions
    Recommend(RecommendArgs),
    /// Run ratios, alerts, scoring and recommendation in one pass
    Analyse(AnalyseArgs),
    /// Print the active scoring policy after validating it
    Policy,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = telemetry::init(&cli.log_level) {
        eprintln!("{}: {}", "error".red().bold(), e);
        process::exit(2);
    }

    let policy_path = cli.policy.as_deref();
    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Ratios(args) => commands::scoring::run_ratios(args),
        Commands::Alerts(args) => commands::scoring::run_alerts(args),
        Commands::Score(args) => commands::scoring::run_score(args, policy_path),
        Commands::Recommend(args) => commands::recommendation::run_recommend(args, policy_path),
        Commands::Analyse(args) => commands::recommendation::run_analyse(args, policy_path),
        Commands::Policy => commands::policy::run_policy(policy_path),
        Commands::Version => {
            println!("mayfin {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
