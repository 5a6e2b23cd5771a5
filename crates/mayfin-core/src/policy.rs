//! Credit policy parameters.
//!
//! Every business-policy number the scoring engine and the recommendation
//! deriver rely on lives here, with the institution's current values as
//! `Default`. Policies are plain serde structs so a different rubric can be
//! loaded from a YAML or JSON file and checked with [`ScoringPolicy::validate`]
//! before use.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::{types::*, MayfinError, MayfinResult};

/// Highest tier a criterion can reach.
pub const MAX_TIER: u8 = 5;

/// Lowest tier a criterion can fall to.
pub const MIN_TIER: u8 = 1;

/// Tier assigned when a criterion's input is missing ("insufficient data").
pub const INSUFFICIENT_DATA_TIER: u8 = 2;

/// Weights across all criteria must add up to this many points.
pub const TOTAL_WEIGHT: u32 = 100;

// ---------------------------------------------------------------------------
// Tier ladders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// Cut-offs for tiers 5 down to 2; anything beyond `tier2` scores 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierLadder {
    pub direction: Direction,
    pub tier5: Decimal,
    pub tier4: Decimal,
    pub tier3: Decimal,
    pub tier2: Decimal,
}

impl TierLadder {
    pub const fn higher_is_better(tier5: Decimal, tier4: Decimal, tier3: Decimal, tier2: Decimal) -> Self {
        Self {
            direction: Direction::HigherIsBetter,
            tier5,
            tier4,
            tier3,
            tier2,
        }
    }

    pub const fn lower_is_better(tier5: Decimal, tier4: Decimal, tier3: Decimal, tier2: Decimal) -> Self {
        Self {
            direction: Direction::LowerIsBetter,
            tier5,
            tier4,
            tier3,
            tier2,
        }
    }

    /// Tier (1-5) reached by `value`. Cut-offs are inclusive.
    pub fn tier(&self, value: Decimal) -> u8 {
        let reaches = |cutoff: Decimal| match self.direction {
            Direction::HigherIsBetter => value >= cutoff,
            Direction::LowerIsBetter => value <= cutoff,
        };
        if reaches(self.tier5) {
            5
        } else if reaches(self.tier4) {
            4
        } else if reaches(self.tier3) {
            3
        } else if reaches(self.tier2) {
            2
        } else {
            MIN_TIER
        }
    }

    fn cutoffs(&self) -> [Decimal; 4] {
        [self.tier5, self.tier4, self.tier3, self.tier2]
    }

    fn validate(&self, field: &str) -> MayfinResult<()> {
        let ordered = self.cutoffs().windows(2).all(|w| match self.direction {
            Direction::HigherIsBetter => w[0] >= w[1],
            Direction::LowerIsBetter => w[0] <= w[1],
        });
        if !ordered {
            return Err(MayfinError::InvalidPolicy {
                field: field.into(),
                reason: "Tier cut-offs must be monotonic in the ladder's direction.".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Scoring policy
// ---------------------------------------------------------------------------

/// Points out of 100 carried by each criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriterionWeights {
    pub financial_autonomy: u32,
    pub debt_to_caf: u32,
    pub quick_ratio: u32,
    pub ebitda_margin: u32,
    pub behavioral_history: u32,
    pub entity_age: u32,
    pub manager_experience: u32,
}

impl CriterionWeights {
    /// Sum of all weights, widened so that no combination of `u32`
    /// weights can overflow.
    pub fn total(&self) -> u64 {
        [
            self.financial_autonomy,
            self.debt_to_caf,
            self.quick_ratio,
            self.ebitda_margin,
            self.behavioral_history,
            self.entity_age,
            self.manager_experience,
        ]
        .into_iter()
        .map(u64::from)
        .sum()
    }
}

impl Default for CriterionWeights {
    fn default() -> Self {
        Self {
            financial_autonomy: 20,
            debt_to_caf: 20,
            quick_ratio: 15,
            ebitda_margin: 15,
            behavioral_history: 15,
            entity_age: 10,
            manager_experience: 5,
        }
    }
}

/// Lowest global score for each favourable status; below `further_study`
/// the file is refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusCutoffs {
    pub favorable: u8,
    pub conditional: u8,
    pub further_study: u8,
}

impl Default for StatusCutoffs {
    fn default() -> Self {
        Self {
            favorable: 80,
            conditional: 60,
            further_study: 40,
        }
    }
}

/// Tiers for the qualitative criteria. Each ladder is read top-down:
/// first cut-off reached wins, otherwise the fallback tier applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualitativeTiers {
    /// Years since incorporation for tiers 5, 4 and 3.
    pub entity_age_years: [u32; 3],
    /// Years of managerial experience for tiers 5, 4 and 3.
    pub manager_experience_years: [u32; 3],
    pub credit_bureau_listed_tier: u8,
    pub legal_proceeding_tier: u8,
    pub clean_history_tier: u8,
}

impl Default for QualitativeTiers {
    fn default() -> Self {
        Self {
            entity_age_years: [5, 3, 2],
            manager_experience_years: [10, 5, 3],
            credit_bureau_listed_tier: 1,
            legal_proceeding_tier: 2,
            clean_history_tier: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub weights: CriterionWeights,
    /// Equity / total liabilities, in percent.
    pub financial_autonomy: TierLadder,
    /// Financial debt in years of self-financing capacity.
    pub debt_to_caf: TierLadder,
    pub quick_ratio: TierLadder,
    /// EBITDA / revenue, in percent.
    pub ebitda_margin: TierLadder,
    pub qualitative: QualitativeTiers,
    pub status: StatusCutoffs,
    /// Maximum number of positive and of negative factors reported.
    pub max_factors: usize,
    pub recommendation: RecommendationPolicy,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            weights: CriterionWeights::default(),
            financial_autonomy: TierLadder::higher_is_better(dec!(35), dec!(25), dec!(15), dec!(10)),
            debt_to_caf: TierLadder::lower_is_better(dec!(2), dec!(3), dec!(4), dec!(6)),
            quick_ratio: TierLadder::higher_is_better(dec!(1.5), dec!(1.2), dec!(0.8), dec!(0.5)),
            ebitda_margin: TierLadder::higher_is_better(dec!(10), dec!(7), dec!(5), dec!(2)),
            qualitative: QualitativeTiers::default(),
            status: StatusCutoffs::default(),
            max_factors: 5,
            recommendation: RecommendationPolicy::default(),
        }
    }
}

impl ScoringPolicy {
    /// Check the policy is internally consistent before it is used to score.
    pub fn validate(&self) -> MayfinResult<()> {
        let total = self.weights.total();
        if total != u64::from(TOTAL_WEIGHT) {
            return Err(MayfinError::InvalidPolicy {
                field: "weights".into(),
                reason: format!("Weights must sum to {TOTAL_WEIGHT}, got {total}."),
            });
        }

        self.financial_autonomy.validate("financial_autonomy")?;
        self.debt_to_caf.validate("debt_to_caf")?;
        self.quick_ratio.validate("quick_ratio")?;
        self.ebitda_margin.validate("ebitda_margin")?;

        let q = &self.qualitative;
        for (field, ladder) in [
            ("qualitative.entity_age_years", q.entity_age_years),
            ("qualitative.manager_experience_years", q.manager_experience_years),
        ] {
            if ladder.windows(2).any(|w| w[0] < w[1]) {
                return Err(MayfinError::InvalidPolicy {
                    field: field.into(),
                    reason: "Year cut-offs must be listed from tier 5 down.".into(),
                });
            }
        }
        for (field, tier) in [
            ("qualitative.credit_bureau_listed_tier", q.credit_bureau_listed_tier),
            ("qualitative.legal_proceeding_tier", q.legal_proceeding_tier),
            ("qualitative.clean_history_tier", q.clean_history_tier),
        ] {
            if !(1..=MAX_TIER).contains(&tier) {
                return Err(MayfinError::InvalidPolicy {
                    field: field.into(),
                    reason: format!("Tier must be between 1 and {MAX_TIER}."),
                });
            }
        }

        let s = &self.status;
        if !(s.favorable > s.conditional && s.conditional > s.further_study)
            || s.favorable > TOTAL_WEIGHT as u8
        {
            return Err(MayfinError::InvalidPolicy {
                field: "status".into(),
                reason: "Status cut-offs must be strictly decreasing and at most 100.".into(),
            });
        }

        self.recommendation.validate()
    }
}

// ---------------------------------------------------------------------------
// Recommendation policy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationPolicy {
    /// Total debt the institution accepts, in years of average CAF.
    pub max_leverage_years: Years,
    /// Share of residual capacity the institution is willing to lend against.
    pub financing_coverage_ratio: Decimal,
    /// Leverage assumed when average CAF is not positive (unfinanceable).
    pub unfinanceable_leverage_years: Years,
    /// Below this score a public guarantee scheme is required.
    pub public_guarantee_below_score: u8,
    /// Below this score a personal contribution and reinforced monitoring apply.
    pub reinforced_conditions_below_score: u8,
    /// From this score an investment request is steered to the guaranteed
    /// investment-loan product.
    pub guaranteed_investment_from_score: u8,
    /// EBITDA margin (percent) under which a treasury watch point is raised.
    pub low_ebitda_margin_pct: Percent,
    pub default_duration_months: u32,
    /// Mark-up applied to the straight-line monthly instalment to estimate
    /// the payment including interest and fees.
    pub monthly_payment_loading: Decimal,
    /// Sectors flagged as exposed to economic cycles (matched case-insensitively).
    pub cyclical_sectors: Vec<String>,
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self {
            max_leverage_years: dec!(3.5),
            financing_coverage_ratio: dec!(0.85),
            unfinanceable_leverage_years: dec!(10),
            public_guarantee_below_score: 80,
            reinforced_conditions_below_score: 70,
            guaranteed_investment_from_score: 60,
            low_ebitda_margin_pct: dec!(5),
            default_duration_months: 60,
            monthly_payment_loading: dec!(1.05),
            cyclical_sectors: ["BTP", "RESTAURATION", "COMMERCE"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl RecommendationPolicy {
    pub fn is_cyclical_sector(&self, sector: &str) -> bool {
        let sector = sector.trim();
        self.cyclical_sectors
            .iter()
            .any(|s| s.eq_ignore_ascii_case(sector))
    }

    fn validate(&self) -> MayfinResult<()> {
        if self.financing_coverage_ratio <= Decimal::ZERO
            || self.financing_coverage_ratio > Decimal::ONE
        {
            return Err(MayfinError::InvalidPolicy {
                field: "recommendation.financing_coverage_ratio".into(),
                reason: "Coverage ratio must be in (0, 1].".into(),
            });
        }
        if self.max_leverage_years <= Decimal::ZERO {
            return Err(MayfinError::InvalidPolicy {
                field: "recommendation.max_leverage_years".into(),
                reason: "Maximum leverage must be positive.".into(),
            });
        }
        if self.unfinanceable_leverage_years < self.max_leverage_years {
            return Err(MayfinError::InvalidPolicy {
                field: "recommendation.unfinanceable_leverage_years".into(),
                reason: "Sentinel leverage must not be below the maximum leverage.".into(),
            });
        }
        if self.default_duration_months == 0 {
            return Err(MayfinError::InvalidPolicy {
                field: "recommendation.default_duration_months".into(),
                reason: "Default duration must be at least one month.".into(),
            });
        }
        if self.monthly_payment_loading < Decimal::ONE {
            return Err(MayfinError::InvalidPolicy {
                field: "recommendation.monthly_payment_loading".into(),
                reason: "Payment loading must be at least 1.".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
