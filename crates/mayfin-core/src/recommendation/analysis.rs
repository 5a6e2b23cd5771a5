use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::deriver::{derive_recommendation_with_policy, FinancingRequest, Recommendation};
use crate::error::MayfinError;
use crate::policy::ScoringPolicy;
use crate::scoring::alerts::{generate_alerts, Alert};
use crate::scoring::ratios::{calculate_ratios, RatioResult};
use crate::scoring::rubric::{score_ratios, EntityProfile, ScoringResult};
use crate::statements::{ensure_unique_years, sorted_descending, FinancialStatementYear};
use crate::types::*;
use crate::MayfinResult;

/// Fiscal years the ratio columns cover.
const RATIO_WINDOW: usize = 3;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Everything needed to analyse one financing dossier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DossierAnalysisInput {
    pub years: Vec<FinancialStatementYear>,
    #[serde(default)]
    pub profile: EntityProfile,
    pub request: FinancingRequest,
    /// Institution policy; the default policy when absent.
    #[serde(default)]
    pub policy: Option<ScoringPolicy>,
}

/// Ratios, alerts, score and recommendation for one dossier, computed once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DossierAnalysis {
    /// Fiscal years analysed, most recent first.
    pub fiscal_years: Vec<i32>,
    pub ratios: Vec<RatioResult>,
    pub alerts: Vec<Alert>,
    pub alert_messages: Vec<String>,
    pub scoring: ScoringResult,
    pub recommendation: Recommendation,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the full pipeline: ratios, alerts, scoring, then the recommendation.
pub fn analyse_dossier(
    input: &DossierAnalysisInput,
) -> MayfinResult<ComputationOutput<DossierAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let default_policy;
    let policy = match &input.policy {
        Some(p) => p,
        None => {
            default_policy = ScoringPolicy::default();
            &default_policy
        }
    };
    validate_input(input, policy)?;

    let sorted = sorted_descending(&input.years);
    let fiscal_years: Vec<i32> = sorted.iter().map(|y| y.fiscal_year).collect();
    let latest_equity = sorted.first().and_then(|y| y.equity);

    if input.years.len() < RATIO_WINDOW {
        warnings.push(format!(
            "Only {} fiscal year(s) supplied; N-1/N-2 columns and trend alerts are incomplete",
            input.years.len()
        ));
    }

    // --- Ratios ---
    let ratios = calculate_ratios(&input.years);
    let missing: Vec<&str> = ratios
        .iter()
        .filter(|r| r.value_n.is_none())
        .map(|r| r.name.as_str())
        .collect();
    if !missing.is_empty() {
        warnings.push(format!(
            "Insufficient data for {} ratio(s) in the latest year: {}",
            missing.len(),
            missing.join(", ")
        ));
    }

    // --- Alerts ---
    let alerts = generate_alerts(&ratios, &input.profile.alert_context(latest_equity));
    let alert_messages = alerts.iter().map(|a| a.message().to_string()).collect();

    // --- Scoring ---
    let scoring = score_ratios(&ratios, &input.profile, policy);

    // --- Recommendation ---
    let recommendation = derive_recommendation_with_policy(
        &scoring,
        &input.years,
        &input.request,
        &input.profile,
        policy,
    );
    if recommendation.financeable_amount < recommendation.requested_amount {
        warnings.push(format!(
            "Financeable amount {} is below the requested {}",
            recommendation.financeable_amount, recommendation.requested_amount
        ));
    }

    debug!(
        score = scoring.global_score,
        status = ?scoring.status,
        alerts = alerts.len(),
        "dossier analysed"
    );

    let output = DossierAnalysis {
        fiscal_years,
        ratios,
        alerts,
        alert_messages,
        scoring,
        recommendation,
    };

    let assumptions = serde_json::json!({
        "fiscal_years_supplied": input.years.len(),
        "reference_date": reference_date_or_today(input.profile.reference_date),
        "max_leverage_years": policy.recommendation.max_leverage_years.to_string(),
        "financing_coverage_ratio": policy.recommendation.financing_coverage_ratio.to_string(),
        "status_cutoffs": policy.status,
        "weights": policy.weights,
    });

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Ratio analysis, weighted 7-criterion scoring and CAF-based debt sizing",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &DossierAnalysisInput, policy: &ScoringPolicy) -> MayfinResult<()> {
    if input.years.is_empty() {
        return Err(MayfinError::InsufficientData(
            "At least one fiscal year of financial statements is required".into(),
        ));
    }
    ensure_unique_years(&input.years)?;
    if input.request.requested_amount < Decimal::ZERO {
        return Err(MayfinError::InvalidInput {
            field: "request.requested_amount".into(),
            reason: "Requested amount cannot be negative".into(),
        });
    }
    if input.request.duration_months == Some(0) {
        return Err(MayfinError::InvalidInput {
            field: "request.duration_months".into(),
            reason: "Duration must be at least one month".into(),
        });
    }
    if let Some(incorporated) = input.profile.incorporation_date {
        let as_of = reference_date_or_today(input.profile.reference_date);
        if incorporated > as_of {
            return Err(MayfinError::DateError(format!(
                "Incorporation date {incorporated} is after the reference date {as_of}"
            )));
        }
    }
    policy.validate()?;
    debug!(years = input.years.len(), "dossier input validated");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::deriver::FinancingType;
    use crate::scoring::rubric::ScoreStatus;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn year(fiscal_year: i32, revenue: Money) -> FinancialStatementYear {
        FinancialStatementYear {
            revenue: Some(revenue),
            ebitda: Some(revenue * dec!(0.12)),
            net_income: Some(revenue * dec!(0.05)),
            self_financing_capacity: Some(dec!(150_000)),
            total_assets: Some(dec!(1_000_000)),
            current_assets: Some(dec!(500_000)),
            inventory: Some(dec!(100_000)),
            accounts_receivable: Some(dec!(150_000)),
            cash: Some(dec!(120_000)),
            total_liabilities: Some(dec!(1_000_000)),
            equity: Some(dec!(400_000)),
            financial_debt: Some(dec!(70_000)),
            current_liabilities: Some(dec!(250_000)),
            accounts_payable: Some(dec!(90_000)),
            ..FinancialStatementYear::new(fiscal_year)
        }
    }

    fn input() -> DossierAnalysisInput {
        DossierAnalysisInput {
            years: vec![
                year(2021, dec!(800_000)),
                year(2022, dec!(850_000)),
                year(2023, dec!(900_000)),
            ],
            profile: EntityProfile {
                incorporation_date: NaiveDate::from_ymd_opt(2012, 3, 1),
                manager_experience_years: Some(15),
                reference_date: NaiveDate::from_ymd_opt(2024, 6, 30),
                ..EntityProfile::default()
            },
            request: FinancingRequest {
                requested_amount: dec!(200_000),
                financing_type: FinancingType::Investment,
                duration_months: Some(84),
            },
            policy: None,
        }
    }

    #[test]
    fn test_full_pipeline() {
        let out = analyse_dossier(&input()).unwrap();
        let analysis = &out.result;
        assert_eq!(analysis.fiscal_years, vec![2023, 2022, 2021]);
        assert_eq!(analysis.ratios.len(), 15);
        assert!(analysis.alerts.is_empty());
        assert_eq!(analysis.scoring.status, ScoreStatus::AccordFavorable);
        assert_eq!(analysis.recommendation.duration_months, 84);
        assert_eq!(analysis.recommendation.financeable_amount, dec!(200_000));
        assert!(out.warnings.is_empty(), "{:?}", out.warnings);
    }

    #[test]
    fn test_rejects_empty_history() {
        let mut inp = input();
        inp.years.clear();
        assert!(matches!(
            analyse_dossier(&inp),
            Err(MayfinError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_year() {
        let mut inp = input();
        inp.years.push(year(2022, dec!(1)));
        assert!(matches!(
            analyse_dossier(&inp),
            Err(MayfinError::DuplicateFiscalYear { year: 2022 })
        ));
    }

    #[test]
    fn test_rejects_negative_request_and_zero_duration() {
        let mut inp = input();
        inp.request.requested_amount = dec!(-1);
        assert!(matches!(
            analyse_dossier(&inp),
            Err(MayfinError::InvalidInput { .. })
        ));

        let mut inp = input();
        inp.request.duration_months = Some(0);
        assert!(matches!(
            analyse_dossier(&inp),
            Err(MayfinError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_rejects_future_incorporation() {
        let mut inp = input();
        inp.profile.incorporation_date = NaiveDate::from_ymd_opt(2025, 1, 1);
        assert!(matches!(analyse_dossier(&inp), Err(MayfinError::DateError(_))));
    }

    #[test]
    fn test_rejects_invalid_policy() {
        let mut policy = ScoringPolicy::default();
        policy.weights.financial_autonomy = 50;
        let mut inp = input();
        inp.policy = Some(policy);
        assert!(matches!(
            analyse_dossier(&inp),
            Err(MayfinError::InvalidPolicy { .. })
        ));
    }

    #[test]
    fn test_short_history_warns() {
        let mut inp = input();
        inp.years.truncate(1);
        let out = analyse_dossier(&inp).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("1 fiscal year")));
        // Revenue growth needs N-1.
        assert!(out.warnings.iter().any(|w| w.contains("Revenue growth")));
    }

    #[test]
    fn test_capped_amount_warns() {
        let mut inp = input();
        inp.request.requested_amount = dec!(5_000_000);
        let out = analyse_dossier(&inp).unwrap();
        assert!(out.result.recommendation.financeable_amount < dec!(5_000_000));
        assert!(out.warnings.iter().any(|w| w.contains("below the requested")));
    }
}
