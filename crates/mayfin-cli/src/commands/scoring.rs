use clap::Args;
use serde::Deserialize;
use serde_json::Value;
use std::time::Instant;

use mayfin_core::policy::ScoringPolicy;
use mayfin_core::scoring::alerts::generate_alerts;
use mayfin_core::scoring::ratios::calculate_ratios;
use mayfin_core::scoring::rubric::{score_ratios, EntityProfile};
use mayfin_core::statements::{ensure_unique_years, sorted_descending, FinancialStatementYear};
use mayfin_core::with_metadata;

use crate::input;

/// Financial history plus the entity's qualitative attributes.
#[derive(Debug, Deserialize)]
struct EntityFile {
    years: Vec<FinancialStatementYear>,
    #[serde(default)]
    profile: EntityProfile,
}

/// Arguments for ratio computation
#[derive(Args)]
pub struct RatiosArgs {
    /// Path to JSON input file ({"years": [...]})
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for alert generation
#[derive(Args)]
pub struct AlertsArgs {
    /// Path to JSON input file ({"years": [...], "profile": {...}})
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for scoring
#[derive(Args)]
pub struct ScoreArgs {
    /// Path to JSON input file ({"years": [...], "profile": {...}})
    #[arg(long)]
    pub input: Option<String>,

    /// Sector of activity (overrides the profile)
    #[arg(long)]
    pub sector: Option<String>,

    /// Years of managerial experience (overrides the profile)
    #[arg(long)]
    pub manager_experience: Option<u32>,
}

pub fn run_ratios(args: RatiosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let file = read_entity_file(args.input.as_deref(), "ratio computation")?;

    let ratios = calculate_ratios(&file.years);
    let warnings = short_history_warning(&file.years);

    let out = with_metadata(
        "Fifteen balance-sheet and income-statement ratios over N, N-1, N-2",
        &serde_json::json!({ "fiscal_years_supplied": file.years.len() }),
        warnings,
        start.elapsed().as_micros() as u64,
        ratios,
    );
    Ok(serde_json::to_value(out)?)
}

pub fn run_alerts(args: AlertsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let file = read_entity_file(args.input.as_deref(), "alert generation")?;

    let ratios = calculate_ratios(&file.years);
    let equity = sorted_descending(&file.years)
        .first()
        .and_then(|y| y.equity);
    let alerts = generate_alerts(&ratios, &file.profile.alert_context(equity));

    let out = with_metadata(
        "Threshold alerts on latest-year ratios, trends and entity flags",
        &file.profile,
        short_history_warning(&file.years),
        start.elapsed().as_micros() as u64,
        alerts,
    );
    Ok(serde_json::to_value(out)?)
}

pub fn run_score(args: ScoreArgs, policy_path: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let mut file = read_entity_file(args.input.as_deref(), "scoring")?;
    if args.sector.is_some() {
        file.profile.sector = args.sector;
    }
    if args.manager_experience.is_some() {
        file.profile.manager_experience_years = args.manager_experience;
    }

    let policy = load_policy(policy_path)?;
    let ratios = calculate_ratios(&file.years);
    let scoring = score_ratios(&ratios, &file.profile, &policy);

    let out = with_metadata(
        "Seven weighted criteria scored on a 1-5 tier scale",
        &serde_json::json!({ "weights": policy.weights, "status_cutoffs": policy.status }),
        short_history_warning(&file.years),
        start.elapsed().as_micros() as u64,
        scoring,
    );
    Ok(serde_json::to_value(out)?)
}

/// Read the entity input and reject a history that repeats a fiscal year.
fn read_entity_file(
    path: Option<&str>,
    what: &str,
) -> Result<EntityFile, Box<dyn std::error::Error>> {
    let file: EntityFile = input::read_input(path, what)?;
    ensure_unique_years(&file.years)?;
    Ok(file)
}

/// The policy from `--policy`, or the built-in one.
pub fn load_policy(path: Option<&str>) -> Result<ScoringPolicy, Box<dyn std::error::Error>> {
    match path {
        Some(p) => input::file::read_policy(p),
        None => Ok(ScoringPolicy::default()),
    }
}

fn short_history_warning(years: &[FinancialStatementYear]) -> Vec<String> {
    if years.len() < 3 {
        vec![format!(
            "Only {} fiscal year(s) supplied; older ratio columns are empty",
            years.len()
        )]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_input(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(format!("mayfin-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    const REPEATED_YEAR: &str = r#"{"years": [
        {"fiscal_year": 2023, "revenue": "100"},
        {"fiscal_year": 2023, "revenue": "200"}
    ]}"#;

    #[test]
    fn test_repeated_fiscal_year_is_rejected_by_every_command() {
        let path = write_input("repeated.json", REPEATED_YEAR);

        let err = run_ratios(RatiosArgs { input: Some(path.clone()) }).unwrap_err();
        assert!(err.to_string().contains("2023"), "{err}");
        assert!(run_alerts(AlertsArgs { input: Some(path.clone()) }).is_err());
        let score = ScoreArgs {
            input: Some(path.clone()),
            sector: None,
            manager_experience: None,
        };
        assert!(run_score(score, None).is_err());

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_distinct_years_compute_ratios() {
        let path = write_input(
            "distinct.json",
            r#"{"years": [{"fiscal_year": 2022, "revenue": "100"}, {"fiscal_year": 2023, "revenue": "200"}]}"#,
        );
        let value = run_ratios(RatiosArgs { input: Some(path.clone()) }).unwrap();
        let ratios = value["result"].as_array().unwrap();
        assert_eq!(ratios.len(), 15);
        assert_eq!(value["warnings"].as_array().unwrap().len(), 1);
        fs::remove_file(path).unwrap();
    }
}
