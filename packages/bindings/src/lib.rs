use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use mayfin_core::policy::ScoringPolicy;
use mayfin_core::recommendation::{analysis, deriver};
use mayfin_core::scoring::{alerts, ratios, rubric};
use mayfin_core::statements::{ensure_unique_years, sorted_descending, FinancialStatementYear};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[derive(Deserialize)]
struct EntityInput {
    years: Vec<FinancialStatementYear>,
    #[serde(default)]
    profile: rubric::EntityProfile,
    #[serde(default)]
    policy: Option<ScoringPolicy>,
}

#[derive(Deserialize)]
struct RecommendationInput {
    scoring: rubric::ScoringResult,
    years: Vec<FinancialStatementYear>,
    request: deriver::FinancingRequest,
    #[serde(default)]
    profile: rubric::EntityProfile,
    #[serde(default)]
    policy: Option<ScoringPolicy>,
}

/// Parse entity input, rejecting a history that repeats a fiscal year.
fn parse_entity(input_json: &str) -> NapiResult<EntityInput> {
    let input: EntityInput = serde_json::from_str(input_json).map_err(to_napi_error)?;
    ensure_unique_years(&input.years).map_err(to_napi_error)?;
    Ok(input)
}

fn resolve_policy(policy: Option<ScoringPolicy>) -> NapiResult<ScoringPolicy> {
    let policy = policy.unwrap_or_default();
    policy.validate().map_err(to_napi_error)?;
    Ok(policy)
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_ratios(input_json: String) -> NapiResult<String> {
    let input = parse_entity(&input_json)?;
    let output = ratios::calculate_ratios(&input.years);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn generate_alerts(input_json: String) -> NapiResult<String> {
    let input = parse_entity(&input_json)?;
    let computed = ratios::calculate_ratios(&input.years);
    let equity = sorted_descending(&input.years)
        .first()
        .and_then(|y| y.equity);
    let output = alerts::alert_messages(&computed, &input.profile.alert_context(equity));
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_scoring(input_json: String) -> NapiResult<String> {
    let input = parse_entity(&input_json)?;
    let policy = resolve_policy(input.policy)?;
    let output = rubric::calculate_scoring_with_policy(&input.years, &input.profile, &policy);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

#[napi]
pub fn derive_recommendation(input_json: String) -> NapiResult<String> {
    let input: RecommendationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    ensure_unique_years(&input.years).map_err(to_napi_error)?;
    let policy = resolve_policy(input.policy)?;
    let output = deriver::derive_recommendation_with_policy(
        &input.scoring,
        &input.years,
        &input.request,
        &input.profile,
        &policy,
    );
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyse_dossier(input_json: String) -> NapiResult<String> {
    let input: analysis::DossierAnalysisInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = analysis::analyse_dossier(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
