//! Alert generator.
//!
//! Turns computed ratios and the entity's qualitative flags into an ordered
//! list of analyst-facing warnings. Each check is independent; a check whose
//! data is missing is skipped rather than raised.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ratios::{find_ratio, RatioKey, RatioResult};
use crate::types::*;

/// Entities younger than this many whole years are flagged.
pub const MIN_ENTITY_AGE_YEARS: i64 = 2;
pub const QUICK_RATIO_FLOOR: Decimal = dec!(0.5);
pub const DSCR_FLOOR: Decimal = dec!(1);
/// EBITDA margin floor, in percent.
pub const EBITDA_MARGIN_FLOOR: Percent = dec!(2);
/// Revenue decline (percent) that counts as a shrinking year.
pub const REVENUE_DECLINE_FLOOR: Percent = dec!(-5);
/// Year-over-year loss of financial autonomy (points) that is flagged.
pub const AUTONOMY_DEGRADATION_POINTS: Percent = dec!(5);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertContext {
    #[serde(default)]
    pub incorporation_date: Option<NaiveDate>,
    #[serde(default)]
    pub credit_bureau_listed: bool,
    #[serde(default)]
    pub in_legal_proceeding: bool,
    /// Equity of the latest fiscal year.
    #[serde(default)]
    pub equity: Option<Money>,
    /// Date the entity's age is measured at; today when absent.
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

/// Alerts in the order they are reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Alert {
    NegativeEquity { equity: Money },
    CreditBureauListed,
    LegalProceeding,
    YoungEntity { age_years: i64 },
    LowQuickRatio { quick_ratio: Decimal },
    DscrBelowOne { dscr: Decimal },
    VeryLowEbitdaMargin { margin: Percent },
    RevenueDeclineTwoYears { growth_n: Percent, growth_n1: Percent },
    AutonomyDegradation { points: Percent },
}

impl Alert {
    pub fn message(&self) -> &'static str {
        match self {
            Alert::NegativeEquity { .. } => "Negative equity",
            Alert::CreditBureauListed => "Manager listed in the credit-incident register",
            Alert::LegalProceeding => "Collective insolvency proceeding in progress",
            Alert::YoungEntity { .. } => "Entity less than 2 years old",
            Alert::LowQuickRatio { .. } => "Insufficient quick ratio (< 0.5)",
            Alert::DscrBelowOne { .. } => "DSCR < 1 (debt service not covered)",
            Alert::VeryLowEbitdaMargin { .. } => "Very low EBITDA margin (< 2%)",
            Alert::RevenueDeclineTwoYears { .. } => {
                "Revenue declining two consecutive years"
            }
            Alert::AutonomyDegradation { .. } => "Financial autonomy degraded by more than 5 points",
        }
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn generate_alerts(ratios: &[RatioResult], context: &AlertContext) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if let Some(equity) = context.equity.filter(|e| *e < Decimal::ZERO) {
        alerts.push(Alert::NegativeEquity { equity });
    }
    if context.credit_bureau_listed {
        alerts.push(Alert::CreditBureauListed);
    }
    if context.in_legal_proceeding {
        alerts.push(Alert::LegalProceeding);
    }
    if let Some(incorporated) = context.incorporation_date {
        let as_of = reference_date_or_today(context.reference_date);
        let age_years = whole_years_between(incorporated, as_of);
        if age_years < MIN_ENTITY_AGE_YEARS {
            alerts.push(Alert::YoungEntity { age_years });
        }
    }

    let current = |key| find_ratio(ratios, key).and_then(|r| r.value_n);
    let previous = |key| find_ratio(ratios, key).and_then(|r| r.value_n1);

    if let Some(quick_ratio) = current(RatioKey::QuickRatio).filter(|v| *v < QUICK_RATIO_FLOOR) {
        alerts.push(Alert::LowQuickRatio { quick_ratio });
    }
    if let Some(dscr) = current(RatioKey::Dscr).filter(|v| *v < DSCR_FLOOR) {
        alerts.push(Alert::DscrBelowOne { dscr });
    }
    if let Some(margin) = current(RatioKey::EbitdaMargin).filter(|v| *v < EBITDA_MARGIN_FLOOR) {
        alerts.push(Alert::VeryLowEbitdaMargin { margin });
    }
    if let (Some(growth_n), Some(growth_n1)) = (
        current(RatioKey::RevenueGrowth),
        previous(RatioKey::RevenueGrowth),
    ) {
        if growth_n < REVENUE_DECLINE_FLOOR && growth_n1 < REVENUE_DECLINE_FLOOR {
            alerts.push(Alert::RevenueDeclineTwoYears { growth_n, growth_n1 });
        }
    }
    if let (Some(autonomy_n), Some(autonomy_n1)) = (
        current(RatioKey::FinancialAutonomy),
        previous(RatioKey::FinancialAutonomy),
    ) {
        if let Some(points) = autonomy_n1
            .checked_sub(autonomy_n)
            .filter(|p| *p > AUTONOMY_DEGRADATION_POINTS)
        {
            alerts.push(Alert::AutonomyDegradation { points });
        }
    }

    debug!(count = alerts.len(), "alerts generated");
    alerts
}

/// Alert messages as plain strings, in report order.
pub fn alert_messages(ratios: &[RatioResult], context: &AlertContext) -> Vec<String> {
    generate_alerts(ratios, context)
        .iter()
        .map(|a| a.message().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
