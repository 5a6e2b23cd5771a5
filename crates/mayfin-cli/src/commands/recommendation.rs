use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mayfin_core::recommendation::analysis::{analyse_dossier, DossierAnalysis, DossierAnalysisInput};
use mayfin_core::recommendation::deriver::FinancingType;
use mayfin_core::ComputationOutput;

use super::scoring::load_policy;
use crate::input;

/// Arguments shared by `recommend` and `analyse`
#[derive(Args)]
pub struct DossierArgs {
    /// Path to JSON input file ({"years": [...], "profile": {...}, "request": {...}})
    #[arg(long)]
    pub input: Option<String>,

    /// Requested amount (overrides the file)
    #[arg(long)]
    pub requested_amount: Option<Decimal>,

    /// Financing type (overrides the file)
    #[arg(long, value_parser = parse_financing_type)]
    pub financing_type: Option<FinancingType>,

    /// Duration in months (overrides the file)
    #[arg(long)]
    pub duration_months: Option<u32>,
}

/// Arguments for the financing recommendation
#[derive(Args)]
pub struct RecommendArgs {
    #[command(flatten)]
    pub dossier: DossierArgs,
}

/// Arguments for the full dossier analysis
#[derive(Args)]
pub struct AnalyseArgs {
    #[command(flatten)]
    pub dossier: DossierArgs,
}

pub fn run_recommend(
    args: RecommendArgs,
    policy_path: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let out = analyse(args.dossier, policy_path)?;
    let projected = ComputationOutput {
        result: out.result.recommendation,
        methodology: out.methodology,
        assumptions: out.assumptions,
        warnings: out.warnings,
        metadata: out.metadata,
    };
    Ok(serde_json::to_value(projected)?)
}

pub fn run_analyse(
    args: AnalyseArgs,
    policy_path: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let out = analyse(args.dossier, policy_path)?;
    Ok(serde_json::to_value(out)?)
}

fn analyse(
    args: DossierArgs,
    policy_path: Option<&str>,
) -> Result<ComputationOutput<DossierAnalysis>, Box<dyn std::error::Error>> {
    let mut dossier: DossierAnalysisInput =
        input::read_input(args.input.as_deref(), "dossier analysis")?;

    if let Some(amount) = args.requested_amount {
        dossier.request.requested_amount = amount;
    }
    if let Some(financing_type) = args.financing_type {
        dossier.request.financing_type = financing_type;
    }
    if args.duration_months.is_some() {
        dossier.request.duration_months = args.duration_months;
    }
    if policy_path.is_some() {
        dossier.policy = Some(load_policy(policy_path)?);
    }

    Ok(analyse_dossier(&dossier)?)
}

fn parse_financing_type(s: &str) -> Result<FinancingType, String> {
    serde_json::from_value(Value::String(s.trim().to_lowercase().replace('-', "_")))
        .map_err(|_| {
            format!(
                "unknown financing type '{s}' (expected investment, working_capital, leasing or factoring)"
            )
        })
}
