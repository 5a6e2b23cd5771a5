//! Weighted scoring rubric.
//!
//! Seven criteria are scored on a 1-5 tier scale and weighted into a global
//! score out of 100:
//!
//! | Criterion           | Weight | Source                                  |
//! |---------------------|--------|-----------------------------------------|
//! | Financial autonomy  | 20     | equity / total liabilities (N)          |
//! | Debt / CAF          | 20     | financial debt / CAF (N)                |
//! | Quick ratio         | 15     | (current assets - inventory) / CL (N)   |
//! | EBITDA margin       | 15     | EBITDA / revenue (N)                    |
//! | Behavioral history  | 15     | credit-bureau listing, legal proceeding |
//! | Entity age          | 10     | whole years since incorporation         |
//! | Manager experience  | 5      | years of managerial experience          |
//!
//! Each criterion contributes `tier / 5 * weight` points. The global score
//! is the rounded sum and maps onto a decision status by fixed cut-offs.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::alerts::AlertContext;
use super::ratios::{
    calculate_ratios, current_value, find_ratio, RatioKey, RatioResult, RatioStatus,
};
use crate::policy::{ScoringPolicy, TierLadder, INSUFFICIENT_DATA_TIER, MAX_TIER, MIN_TIER};
use crate::statements::FinancialStatementYear;
use crate::types::*;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Qualitative attributes of the borrowing entity and its manager.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityProfile {
    #[serde(default)]
    pub incorporation_date: Option<NaiveDate>,
    #[serde(default)]
    pub manager_experience_years: Option<u32>,
    #[serde(default)]
    pub credit_bureau_listed: bool,
    #[serde(default)]
    pub in_legal_proceeding: bool,
    /// Activity sector. Not read by the rubric; the recommendation uses it
    /// for cyclical-sector watch points.
    #[serde(default)]
    pub sector: Option<String>,
    /// Date ages are measured at; today when absent.
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

impl EntityProfile {
    /// Whole years since incorporation; 0 when the date is unknown.
    pub fn entity_age_years(&self) -> i64 {
        self.incorporation_date
            .map(|d| whole_years_between(d, reference_date_or_today(self.reference_date)))
            .unwrap_or(0)
    }

    /// Alert context for this entity, given the latest fiscal year's equity.
    pub fn alert_context(&self, equity: Option<Money>) -> AlertContext {
        AlertContext {
            incorporation_date: self.incorporation_date,
            credit_bureau_listed: self.credit_bureau_listed,
            in_legal_proceeding: self.in_legal_proceeding,
            equity,
            reference_date: self.reference_date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    FinancialAutonomy,
    DebtToCaf,
    QuickRatio,
    EbitdaMargin,
    BehavioralHistory,
    EntityAge,
    ManagerExperience,
}

impl Criterion {
    pub fn label(self) -> &'static str {
        match self {
            Criterion::FinancialAutonomy => "Financial autonomy",
            Criterion::DebtToCaf => "Debt / CAF",
            Criterion::QuickRatio => "Quick ratio",
            Criterion::EbitdaMargin => "EBITDA margin",
            Criterion::BehavioralHistory => "Behavioral history",
            Criterion::EntityAge => "Entity age",
            Criterion::ManagerExperience => "Manager quality",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreDetail {
    pub criterion: Criterion,
    pub label: String,
    pub weight: u32,
    /// Tier obtained, 1 to 5.
    pub tier: u8,
    /// `tier / 5 * weight`
    pub points: Decimal,
    pub justification: String,
}

impl ScoreDetail {
    fn new(criterion: Criterion, weight: u32, tier: u8, justification: String) -> Self {
        Self {
            criterion,
            label: criterion.label().to_string(),
            weight,
            tier,
            points: Decimal::from(tier) * Decimal::from(weight) / Decimal::from(MAX_TIER),
            justification,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreStatus {
    AccordFavorable,
    AccordConditionne,
    EtudeApprofondie,
    Refus,
}

impl ScoreStatus {
    /// Step function of the global score using the default cut-offs
    /// (80 / 60 / 40).
    pub fn from_score(score: u8) -> Self {
        Self::from_score_with_policy(score, &ScoringPolicy::default())
    }

    pub fn from_score_with_policy(score: u8, policy: &ScoringPolicy) -> Self {
        let cutoffs = &policy.status;
        if score >= cutoffs.favorable {
            ScoreStatus::AccordFavorable
        } else if score >= cutoffs.conditional {
            ScoreStatus::AccordConditionne
        } else if score >= cutoffs.further_study {
            ScoreStatus::EtudeApprofondie
        } else {
            ScoreStatus::Refus
        }
    }
}

impl std::fmt::Display for ScoreStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreStatus::AccordFavorable => write!(f, "Favourable"),
            ScoreStatus::AccordConditionne => write!(f, "Conditional approval"),
            ScoreStatus::EtudeApprofondie => write!(f, "Further study required"),
            ScoreStatus::Refus => write!(f, "Refusal"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub description: String,
    /// Signed points: positive factors add, negative factors subtract.
    pub impact: Decimal,
    pub kind: FactorKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    /// 0 to 100.
    pub global_score: u8,
    pub status: ScoreStatus,
    pub details: Vec<ScoreDetail>,
    pub positive_factors: Vec<Factor>,
    pub negative_factors: Vec<Factor>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Score an entity with the default policy.
pub fn calculate_scoring(years: &[FinancialStatementYear], profile: &EntityProfile) -> ScoringResult {
    calculate_scoring_with_policy(years, profile, &ScoringPolicy::default())
}

pub fn calculate_scoring_with_policy(
    years: &[FinancialStatementYear],
    profile: &EntityProfile,
    policy: &ScoringPolicy,
) -> ScoringResult {
    let ratios = calculate_ratios(years);
    score_ratios(&ratios, profile, policy)
}

/// Score already-computed ratios.
pub fn score_ratios(
    ratios: &[RatioResult],
    profile: &EntityProfile,
    policy: &ScoringPolicy,
) -> ScoringResult {
    let w = &policy.weights;
    let details = vec![
        score_ratio(
            Criterion::FinancialAutonomy,
            current_value(ratios, RatioKey::FinancialAutonomy),
            w.financial_autonomy,
            &policy.financial_autonomy,
        ),
        score_debt_to_caf(ratios, policy),
        score_ratio(
            Criterion::QuickRatio,
            current_value(ratios, RatioKey::QuickRatio),
            w.quick_ratio,
            &policy.quick_ratio,
        ),
        score_ratio(
            Criterion::EbitdaMargin,
            current_value(ratios, RatioKey::EbitdaMargin),
            w.ebitda_margin,
            &policy.ebitda_margin,
        ),
        score_behavior(profile, policy),
        score_entity_age(profile, policy),
        score_manager_experience(profile, policy),
    ];

    let total: Decimal = details.iter().map(|d| d.points).sum();
    let global_score = total
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        .to_u8()
        .unwrap_or(0);
    let status = ScoreStatus::from_score_with_policy(global_score, policy);
    let (positive_factors, negative_factors) = extract_factors(&details, policy.max_factors);

    debug!(global_score, ?status, "scoring complete");

    ScoringResult {
        global_score,
        status,
        details,
        positive_factors,
        negative_factors,
    }
}

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

fn score_ratio(
    criterion: Criterion,
    value: Option<Decimal>,
    weight: u32,
    ladder: &TierLadder,
) -> ScoreDetail {
    match value {
        Some(v) => ScoreDetail::new(
            criterion,
            weight,
            ladder.tier(v),
            format!(
                "Value: {:.1}",
                v.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
            ),
        ),
        None => ScoreDetail::new(
            criterion,
            weight,
            INSUFFICIENT_DATA_TIER,
            "Insufficient data".to_string(),
        ),
    }
}

/// Debt / CAF without a value but with a `bad` status means CAF was not
/// positive, which scores the lowest tier rather than "insufficient data".
fn score_debt_to_caf(ratios: &[RatioResult], policy: &ScoringPolicy) -> ScoreDetail {
    let weight = policy.weights.debt_to_caf;
    match find_ratio(ratios, RatioKey::DebtToCaf) {
        Some(r) if r.value_n.is_none() && r.status == RatioStatus::Bad => ScoreDetail::new(
            Criterion::DebtToCaf,
            weight,
            MIN_TIER,
            "No positive self-financing capacity".to_string(),
        ),
        r => score_ratio(
            Criterion::DebtToCaf,
            r.and_then(|r| r.value_n),
            weight,
            &policy.debt_to_caf,
        ),
    }
}

fn score_behavior(profile: &EntityProfile, policy: &ScoringPolicy) -> ScoreDetail {
    let q = &policy.qualitative;
    let (tier, justification) = if profile.credit_bureau_listed {
        (q.credit_bureau_listed_tier, "Listed in the credit-incident register")
    } else if profile.in_legal_proceeding {
        (q.legal_proceeding_tier, "Collective proceeding in progress")
    } else {
        (q.clean_history_tier, "Clean history")
    };
    ScoreDetail::new(
        Criterion::BehavioralHistory,
        policy.weights.behavioral_history,
        tier,
        justification.to_string(),
    )
}

fn score_entity_age(profile: &EntityProfile, policy: &ScoringPolicy) -> ScoreDetail {
    let age = profile.entity_age_years();
    let tier = years_tier(age, policy.qualitative.entity_age_years);
    ScoreDetail::new(
        Criterion::EntityAge,
        policy.weights.entity_age,
        tier,
        format!("{age} years in existence"),
    )
}

fn score_manager_experience(profile: &EntityProfile, policy: &ScoringPolicy) -> ScoreDetail {
    let experience = profile.manager_experience_years.unwrap_or(0);
    let tier = years_tier(i64::from(experience), policy.qualitative.manager_experience_years);
    ScoreDetail::new(
        Criterion::ManagerExperience,
        policy.weights.manager_experience,
        tier,
        format!("{experience} years of experience"),
    )
}

/// Tier 5, 4 or 3 for the first cut-off reached, otherwise 2.
fn years_tier(years: i64, cutoffs: [u32; 3]) -> u8 {
    let reached = |cutoff: u32| years >= i64::from(cutoff);
    if reached(cutoffs[0]) {
        5
    } else if reached(cutoffs[1]) {
        4
    } else if reached(cutoffs[2]) {
        3
    } else {
        2
    }
}

/// Strongest criteria (tier >= 4) and weakest (tier <= 2), both taken from
/// the details ranked by points descending.
fn extract_factors(details: &[ScoreDetail], limit: usize) -> (Vec<Factor>, Vec<Factor>) {
    let mut ranked: Vec<&ScoreDetail> = details.iter().collect();
    ranked.sort_by(|a, b| b.points.cmp(&a.points));

    let describe = |d: &ScoreDetail| format!("{}: {}", d.label, d.justification);

    let positive = ranked
        .iter()
        .filter(|d| d.tier >= 4)
        .take(limit)
        .map(|d| Factor {
            description: describe(d),
            impact: d.points,
            kind: FactorKind::Positive,
        })
        .collect();

    let negative = ranked
        .iter()
        .filter(|d| d.tier <= 2)
        .take(limit)
        .map(|d| Factor {
            description: describe(d),
            impact: -d.points,
            kind: FactorKind::Negative,
        })
        .collect();

    (positive, negative)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
