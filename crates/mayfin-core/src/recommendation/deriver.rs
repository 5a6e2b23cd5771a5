//! Financing recommendation.
//!
//! Sizes the amount the institution can lend from the entity's
//! self-financing capacity (CAF), then lists the guarantees, special
//! conditions and watch points that go with the decision. The interactive
//! view, the PDF export and the Word export all render this one result.
//!
//! Sizing:
//! - average CAF = sum of CAF over the supplied years / number of years
//!   (a year without CAF counts as zero)
//! - current leverage = latest financial debt / average CAF, or the
//!   unfinanceable sentinel when average CAF is not positive
//! - residual capacity = max(0, (max leverage - current leverage) * average CAF)
//! - financeable amount = min(requested, residual capacity / coverage ratio)
//! - estimated monthly payment = financeable amount / duration * loading

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::policy::{RecommendationPolicy, ScoringPolicy};
use crate::scoring::rubric::{EntityProfile, ScoreStatus, ScoringResult};
use crate::statements::{sorted_descending, FinancialStatementYear};
use crate::types::*;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancingType {
    #[serde(alias = "investissement")]
    Investment,
    #[serde(alias = "tresorerie")]
    WorkingCapital,
    #[serde(alias = "credit_bail")]
    Leasing,
    #[serde(alias = "affacturage")]
    Factoring,
}

impl FinancingType {
    pub fn label(self) -> &'static str {
        match self {
            FinancingType::Investment => "INVESTMENT",
            FinancingType::WorkingCapital => "WORKING CAPITAL",
            FinancingType::Leasing => "LEASING",
            FinancingType::Factoring => "FACTORING",
        }
    }

    /// Financing backed by a physical asset that can be pledged.
    pub fn finances_an_asset(self) -> bool {
        matches!(self, FinancingType::Investment | FinancingType::Leasing)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancingRequest {
    #[serde(alias = "montant_demande")]
    pub requested_amount: Money,
    #[serde(alias = "type_financement")]
    pub financing_type: FinancingType,
    /// Defaults to the policy's standard duration when absent.
    #[serde(default, alias = "duree_mois")]
    pub duration_months: Option<u32>,
}

// ---------------------------------------------------------------------------
// Recommendation vocabulary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guarantee {
    PublicGuaranteeScheme,
    PersonalGuarantee,
    AssetPledge,
}

impl std::fmt::Display for Guarantee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Guarantee::PublicGuaranteeScheme => {
                write!(f, "Public small-business development guarantee (70% of the loan)")
            }
            Guarantee::PersonalGuarantee => {
                write!(f, "Personal guarantee from the manager (capped at 50% of the loan)")
            }
            Guarantee::AssetPledge => write!(f, "Pledge of the financed asset"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialCondition {
    PersonalContribution,
    ReinforcedMonitoring,
    PlanComplianceAttestation,
    ReviewClause,
}

impl std::fmt::Display for SpecialCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecialCondition::PersonalContribution => write!(f, "Minimum 15% personal contribution"),
            SpecialCondition::ReinforcedMonitoring => {
                write!(f, "Reinforced quarterly monitoring during the first year")
            }
            SpecialCondition::PlanComplianceAttestation => {
                write!(f, "Attestation of compliance with the court-approved plan")
            }
            SpecialCondition::ReviewClause => write!(f, "Review clause if ratios deteriorate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchPoint {
    LowEbitdaMargin,
    CyclicalSector(String),
    OperatingLossInsurance,
}

impl std::fmt::Display for WatchPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchPoint::LowEbitdaMargin => {
                write!(f, "Low EBITDA margin calls for close cash monitoring")
            }
            WatchPoint::CyclicalSector(sector) => {
                write!(f, "Sector {sector} is exposed to economic cycles")
            }
            WatchPoint::OperatingLossInsurance => {
                write!(f, "Provide for operating-loss insurance")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Favorable,
    FavorableWithReinforcedGuarantees,
    FurtherStudyRequired,
    RefusalRecommended,
}

impl Decision {
    pub fn label(self) -> &'static str {
        match self {
            Decision::Favorable => "FAVOURABLE",
            Decision::FavorableWithReinforcedGuarantees => {
                "FAVOURABLE subject to reinforced guarantees"
            }
            Decision::FurtherStudyRequired => "FURTHER STUDY REQUIRED",
            Decision::RefusalRecommended => "REFUSAL RECOMMENDED",
        }
    }
}

impl From<ScoreStatus> for Decision {
    fn from(status: ScoreStatus) -> Self {
        match status {
            ScoreStatus::AccordFavorable => Decision::Favorable,
            ScoreStatus::AccordConditionne => Decision::FavorableWithReinforcedGuarantees,
            ScoreStatus::EtudeApprofondie => Decision::FurtherStudyRequired,
            ScoreStatus::Refus => Decision::RefusalRecommended,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub average_self_financing_capacity: Money,
    /// Latest financial debt in years of average CAF.
    pub current_leverage_years: Years,
    pub residual_capacity: Money,
    pub financeable_amount: Money,
    pub requested_amount: Money,
    pub financing_type: FinancingType,
    pub financing_type_label: String,
    pub duration_months: u32,
    /// Straight-line instalment marked up by the policy's payment loading.
    pub estimated_monthly_payment: Money,
    pub required_guarantees: Vec<String>,
    pub special_conditions: Vec<String>,
    pub watch_points: Vec<String>,
    pub decision: Decision,
    pub decision_label: String,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive the financing recommendation with the default policy.
pub fn derive_recommendation(
    scoring: &ScoringResult,
    years: &[FinancialStatementYear],
    request: &FinancingRequest,
    profile: &EntityProfile,
) -> Recommendation {
    derive_recommendation_with_policy(scoring, years, request, profile, &ScoringPolicy::default())
}

pub fn derive_recommendation_with_policy(
    scoring: &ScoringResult,
    years: &[FinancialStatementYear],
    request: &FinancingRequest,
    profile: &EntityProfile,
    policy: &ScoringPolicy,
) -> Recommendation {
    let rp = &policy.recommendation;
    let sorted = sorted_descending(years);
    let latest = sorted.first().copied();
    let score = scoring.global_score;

    // -- Sizing ---------------------------------------------------------------
    let average_caf = average_self_financing_capacity(years);
    let current_debt = latest
        .and_then(|y| y.financial_debt)
        .unwrap_or(Decimal::ZERO);
    let current_leverage = if average_caf > Decimal::ZERO {
        current_debt
            .checked_div(average_caf)
            .unwrap_or(rp.unfinanceable_leverage_years)
    } else {
        rp.unfinanceable_leverage_years
    };
    // No positive CAF means no repayment capacity at all. Headroom that
    // cannot be represented is treated the same way.
    let residual_capacity = if average_caf > Decimal::ZERO {
        rp.max_leverage_years
            .checked_sub(current_leverage)
            .and_then(|headroom| headroom.checked_mul(average_caf))
            .map(|capacity| capacity.max(Decimal::ZERO))
            .unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };
    let coverable = residual_capacity
        .checked_div(rp.financing_coverage_ratio)
        .unwrap_or(Decimal::ZERO);
    let financeable_amount = round_money(request.requested_amount.min(coverable))
        .min(request.requested_amount);
    let duration_months = request
        .duration_months
        .unwrap_or(rp.default_duration_months);
    let estimated_monthly_payment = round_money(
        financeable_amount
            .checked_div(Decimal::from(duration_months))
            .and_then(|m| m.checked_mul(rp.monthly_payment_loading))
            .unwrap_or(Decimal::ZERO),
    );

    // -- Product ---------------------------------------------------------------
    let financing_type_label = if score >= rp.guaranteed_investment_from_score
        && request.financing_type == FinancingType::Investment
    {
        "INVESTMENT LOAN backed by a public guarantee".to_string()
    } else {
        request.financing_type.label().to_string()
    };

    let required_guarantees = required_guarantees(score, request.financing_type, rp);
    let special_conditions = special_conditions(score, profile, rp);
    let watch_points = watch_points(latest, profile, rp);
    let decision = Decision::from(scoring.status);

    debug!(
        score,
        %average_caf,
        %current_leverage,
        %financeable_amount,
        ?decision,
        "recommendation derived"
    );

    Recommendation {
        average_self_financing_capacity: round_money(average_caf),
        current_leverage_years: current_leverage
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero),
        residual_capacity: round_money(residual_capacity),
        financeable_amount,
        requested_amount: request.requested_amount,
        financing_type: request.financing_type,
        financing_type_label,
        duration_months,
        estimated_monthly_payment,
        required_guarantees: required_guarantees.iter().map(|g| g.to_string()).collect(),
        special_conditions: special_conditions.iter().map(|c| c.to_string()).collect(),
        watch_points: watch_points.iter().map(|w| w.to_string()).collect(),
        decision,
        decision_label: decision.label().to_string(),
    }
}

/// Mean CAF across every supplied year; years without CAF count as zero.
///
/// When the plain sum would overflow, each year is divided down first.
pub fn average_self_financing_capacity(years: &[FinancialStatementYear]) -> Money {
    let count = Decimal::from(years.len().max(1));
    let cafs = years
        .iter()
        .map(|y| y.self_financing_capacity.unwrap_or(Decimal::ZERO));

    match cafs.clone().try_fold(Decimal::ZERO, |acc, caf| acc.checked_add(caf)) {
        Some(total) => total / count,
        None => cafs
            .map(|caf| caf / count)
            .fold(Decimal::ZERO, |acc, share| acc.saturating_add(share)),
    }
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

pub fn required_guarantees(
    score: u8,
    financing_type: FinancingType,
    policy: &RecommendationPolicy,
) -> Vec<Guarantee> {
    let mut guarantees = Vec::new();
    if score < policy.public_guarantee_below_score {
        guarantees.push(Guarantee::PublicGuaranteeScheme);
    }
    guarantees.push(Guarantee::PersonalGuarantee);
    if financing_type.finances_an_asset() {
        guarantees.push(Guarantee::AssetPledge);
    }
    guarantees
}

pub fn special_conditions(
    score: u8,
    profile: &EntityProfile,
    policy: &RecommendationPolicy,
) -> Vec<SpecialCondition> {
    let mut conditions = Vec::new();
    if score < policy.reinforced_conditions_below_score {
        conditions.push(SpecialCondition::PersonalContribution);
        conditions.push(SpecialCondition::ReinforcedMonitoring);
    }
    if profile.in_legal_proceeding {
        conditions.push(SpecialCondition::PlanComplianceAttestation);
    }
    conditions.push(SpecialCondition::ReviewClause);
    conditions
}

pub fn watch_points(
    latest: Option<&FinancialStatementYear>,
    profile: &EntityProfile,
    policy: &RecommendationPolicy,
) -> Vec<WatchPoint> {
    let mut points = Vec::new();

    let margin = latest.and_then(|y| match (y.ebitda, y.revenue) {
        (Some(ebitda), Some(revenue)) if !ebitda.is_zero() && !revenue.is_zero() => {
            ebitda
                .checked_div(revenue)
                .and_then(|m| m.checked_mul(Decimal::ONE_HUNDRED))
        }
        _ => None,
    });
    if margin.is_some_and(|m| m < policy.low_ebitda_margin_pct) {
        points.push(WatchPoint::LowEbitdaMargin);
    }

    if let Some(sector) = profile.sector.as_deref() {
        if policy.is_cyclical_sector(sector) {
            points.push(WatchPoint::CyclicalSector(sector.trim().to_string()));
        }
    }

    points.push(WatchPoint::OperatingLossInsurance);
    points
}

fn round_money(amount: Money) -> Money {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::rubric::calculate_scoring;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn year(fiscal_year: i32, caf: Option<Money>, debt: Option<Money>) -> FinancialStatementYear {
        FinancialStatementYear {
            self_financing_capacity: caf,
            financial_debt: debt,
            revenue: Some(dec!(1_000_000)),
            ebitda: Some(dec!(80_000)),
            ..FinancialStatementYear::new(fiscal_year)
        }
    }

    fn scoring_with(score: u8) -> ScoringResult {
        ScoringResult {
            global_score: score,
            status: ScoreStatus::from_score(score),
            details: Vec::new(),
            positive_factors: Vec::new(),
            negative_factors: Vec::new(),
        }
    }

    fn request(amount: Money, financing_type: FinancingType) -> FinancingRequest {
        FinancingRequest {
            requested_amount: amount,
            financing_type,
            duration_months: None,
        }
    }

    #[test]
    fn test_sizing_from_average_caf() {
        let years = vec![
            year(2021, Some(dec!(100_000)), Some(dec!(50_000))),
            year(2022, Some(dec!(120_000)), Some(dec!(60_000))),
            year(2023, Some(dec!(140_000)), Some(dec!(120_000))),
        ];
        let rec = derive_recommendation(
            &scoring_with(85),
            &years,
            &request(dec!(500_000), FinancingType::WorkingCapital),
            &EntityProfile::default(),
        );
        // avg CAF 120k; leverage 120k / 120k = 1; residual (3.5 - 1) * 120k = 300k
        assert_eq!(rec.average_self_financing_capacity, dec!(120_000));
        assert_eq!(rec.current_leverage_years, dec!(1.0));
        assert_eq!(rec.residual_capacity, dec!(300_000));
        // 300k / 0.85 = 352_941.18 -> 352_941
        assert_eq!(rec.financeable_amount, dec!(352_941));
        // 352_941 / 60 * 1.05 = 6_176.47
        assert_eq!(rec.estimated_monthly_payment, dec!(6_176));
    }

    #[test]
    fn test_monthly_payment_uses_duration_and_loading() {
        let years = vec![year(2023, Some(dec!(1_000_000)), Some(Decimal::ZERO))];
        let mut policy = ScoringPolicy::default();
        policy.recommendation.monthly_payment_loading = dec!(1.10);
        let rec = derive_recommendation_with_policy(
            &scoring_with(85),
            &years,
            &FinancingRequest {
                duration_months: Some(48),
                ..request(dec!(120_000), FinancingType::Leasing)
            },
            &EntityProfile::default(),
            &policy,
        );
        // 120_000 / 48 * 1.10
        assert_eq!(rec.estimated_monthly_payment, dec!(2_750));

        let rec = derive_recommendation(
            &scoring_with(85),
            &years,
            &FinancingRequest {
                duration_months: Some(0),
                ..request(dec!(120_000), FinancingType::Leasing)
            },
            &EntityProfile::default(),
        );
        assert_eq!(rec.estimated_monthly_payment, Decimal::ZERO);
    }

    #[test]
    fn test_capacity_beyond_decimal_range_is_zero() {
        // 3.5 years of a 3e28 CAF cannot be represented.
        let years = vec![year(
            2023,
            Some(dec!(30_000_000_000_000_000_000_000_000_000)),
            Some(Decimal::ZERO),
        )];
        let rec = derive_recommendation(
            &scoring_with(85),
            &years,
            &request(dec!(100_000), FinancingType::WorkingCapital),
            &EntityProfile::default(),
        );
        assert_eq!(rec.current_leverage_years, dec!(0.0));
        assert_eq!(rec.residual_capacity, Decimal::ZERO);
        assert_eq!(rec.financeable_amount, Decimal::ZERO);
        assert_eq!(rec.estimated_monthly_payment, Decimal::ZERO);
    }

    #[test]
    fn test_average_caf_of_huge_years_does_not_overflow() {
        let years = vec![
            year(2022, Some(dec!(50_000_000_000_000_000_000_000_000_000)), None),
            year(2023, Some(dec!(50_000_000_000_000_000_000_000_000_000)), None),
        ];
        assert_eq!(
            average_self_financing_capacity(&years),
            dec!(50_000_000_000_000_000_000_000_000_000)
        );

        let years = vec![
            year(2022, Some(Decimal::MAX), None),
            year(2023, Some(Decimal::MAX), None),
            year(2021, Some(Decimal::MAX), None),
        ];
        let average = average_self_financing_capacity(&years);
        assert!(average > dec!(70_000_000_000_000_000_000_000_000_000));
    }

    #[test]
    fn test_financeable_capped_at_requested() {
        let years = vec![year(2023, Some(dec!(500_000)), Some(dec!(100_000)))];
        let rec = derive_recommendation(
            &scoring_with(85),
            &years,
            &request(dec!(150_000.50), FinancingType::WorkingCapital),
            &EntityProfile::default(),
        );
        assert_eq!(rec.financeable_amount, dec!(150_000.50));
        assert!(rec.financeable_amount <= rec.requested_amount);
    }

    #[test]
    fn test_non_positive_caf_uses_sentinel() {
        let years = vec![year(2023, Some(dec!(-20_000)), Some(dec!(100_000)))];
        let rec = derive_recommendation(
            &scoring_with(50),
            &years,
            &request(dec!(100_000), FinancingType::Investment),
            &EntityProfile::default(),
        );
        assert_eq!(rec.current_leverage_years, dec!(10.0));
        assert_eq!(rec.residual_capacity, Decimal::ZERO);
        assert_eq!(rec.financeable_amount, Decimal::ZERO);
    }

    #[test]
    fn test_missing_caf_counts_as_zero() {
        let years = vec![
            year(2022, None, Some(dec!(10_000))),
            year(2023, Some(dec!(100_000)), Some(dec!(10_000))),
        ];
        assert_eq!(average_self_financing_capacity(&years), dec!(50_000));
        assert_eq!(average_self_financing_capacity(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_guarantees_by_score_and_type() {
        let policy = RecommendationPolicy::default();
        assert_eq!(
            required_guarantees(85, FinancingType::WorkingCapital, &policy),
            vec![Guarantee::PersonalGuarantee]
        );
        assert_eq!(
            required_guarantees(79, FinancingType::Leasing, &policy),
            vec![
                Guarantee::PublicGuaranteeScheme,
                Guarantee::PersonalGuarantee,
                Guarantee::AssetPledge
            ]
        );
    }

    #[test]
    fn test_conditions_by_score_and_proceeding() {
        let policy = RecommendationPolicy::default();
        let in_proceeding = EntityProfile {
            in_legal_proceeding: true,
            ..EntityProfile::default()
        };
        assert_eq!(
            special_conditions(69, &in_proceeding, &policy),
            vec![
                SpecialCondition::PersonalContribution,
                SpecialCondition::ReinforcedMonitoring,
                SpecialCondition::PlanComplianceAttestation,
                SpecialCondition::ReviewClause
            ]
        );
        assert_eq!(
            special_conditions(70, &EntityProfile::default(), &policy),
            vec![SpecialCondition::ReviewClause]
        );
    }

    #[test]
    fn test_watch_points() {
        let policy = RecommendationPolicy::default();
        let latest = year(2023, None, None);
        let profile = EntityProfile {
            sector: Some("Restauration".into()),
            ..EntityProfile::default()
        };
        // margin 8% is not low
        assert_eq!(
            watch_points(Some(&latest), &profile, &policy),
            vec![
                WatchPoint::CyclicalSector("Restauration".into()),
                WatchPoint::OperatingLossInsurance
            ]
        );

        let thin = FinancialStatementYear {
            ebitda: Some(dec!(30_000)),
            ..latest
        };
        assert_eq!(
            watch_points(Some(&thin), &EntityProfile::default(), &policy),
            vec![WatchPoint::LowEbitdaMargin, WatchPoint::OperatingLossInsurance]
        );
        assert_eq!(
            watch_points(None, &EntityProfile::default(), &policy),
            vec![WatchPoint::OperatingLossInsurance]
        );
    }

    #[test]
    fn test_unrepresentable_margin_raises_no_watch_point() {
        let policy = RecommendationPolicy::default();
        // 1e26 / 0.1 * 100 exceeds the decimal range.
        let latest = FinancialStatementYear {
            ebitda: Some(dec!(100_000_000_000_000_000_000_000_000)),
            revenue: Some(dec!(0.1)),
            ..FinancialStatementYear::new(2023)
        };
        assert_eq!(
            watch_points(Some(&latest), &EntityProfile::default(), &policy),
            vec![WatchPoint::OperatingLossInsurance]
        );
        let rec = derive_recommendation(
            &scoring_with(85),
            &[latest],
            &request(dec!(10_000), FinancingType::Factoring),
            &EntityProfile::default(),
        );
        assert_eq!(rec.watch_points, vec![WatchPoint::OperatingLossInsurance.to_string()]);
    }

    #[test]
    fn test_investment_label_and_duration() {
        let years = vec![year(2023, Some(dec!(100_000)), Some(dec!(50_000)))];
        let rec = derive_recommendation(
            &scoring_with(60),
            &years,
            &request(dec!(100_000), FinancingType::Investment),
            &EntityProfile::default(),
        );
        assert_eq!(rec.financing_type_label, "INVESTMENT LOAN backed by a public guarantee");
        assert_eq!(rec.duration_months, 60);

        let rec = derive_recommendation(
            &scoring_with(59),
            &years,
            &FinancingRequest {
                duration_months: Some(84),
                ..request(dec!(100_000), FinancingType::Investment)
            },
            &EntityProfile::default(),
        );
        assert_eq!(rec.financing_type_label, "INVESTMENT");
        assert_eq!(rec.duration_months, 84);
    }

    #[test]
    fn test_decision_follows_status() {
        for (score, decision) in [
            (80, Decision::Favorable),
            (60, Decision::FavorableWithReinforcedGuarantees),
            (40, Decision::FurtherStudyRequired),
            (39, Decision::RefusalRecommended),
        ] {
            let rec = derive_recommendation(
                &scoring_with(score),
                &[],
                &request(dec!(10_000), FinancingType::Factoring),
                &EntityProfile::default(),
            );
            assert_eq!(rec.decision, decision);
            assert_eq!(rec.decision_label, decision.label());
        }
    }

    #[test]
    fn test_end_to_end_with_scoring() {
        let years = vec![year(2023, Some(dec!(150_000)), Some(dec!(70_000)))];
        let profile = EntityProfile {
            incorporation_date: NaiveDate::from_ymd_opt(2015, 1, 1),
            manager_experience_years: Some(12),
            reference_date: NaiveDate::from_ymd_opt(2024, 6, 30),
            ..EntityProfile::default()
        };
        let scoring = calculate_scoring(&years, &profile);
        let rec = derive_recommendation(
            &scoring,
            &years,
            &request(dec!(200_000), FinancingType::Investment),
            &profile,
        );
        assert!(rec.financeable_amount <= dec!(200_000));
        assert!(rec
            .special_conditions
            .contains(&SpecialCondition::ReviewClause.to_string()));
    }

    #[test]
    fn test_financing_type_accepts_persisted_values() {
        let t: FinancingType = serde_json::from_str("\"credit_bail\"").unwrap();
        assert_eq!(t, FinancingType::Leasing);
        let t: FinancingType = serde_json::from_str("\"working_capital\"").unwrap();
        assert_eq!(t, FinancingType::WorkingCapital);
    }
}
