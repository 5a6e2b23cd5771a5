//! Ratio engine.
//!
//! Computes the fifteen analysis ratios for the three most recent fiscal
//! years of an entity (N, N-1, N-2) and classifies the N value against the
//! institution's cut-offs.
//!
//! Missing data never fails a computation: a ratio whose operands are not
//! all provided, or whose denominator is zero, is `None` for that year.
//! Status classification treats a `None` N value as `warning`
//! (insufficient data).
//!
//! Debt / CAF is not a repayment period when CAF is zero or negative: the
//! value is `None` and the N status is `bad`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::statements::{sorted_descending, FinancialStatementYear};

/// Share of financial debt assumed to fall due each year when estimating
/// debt service for the DSCR.
pub const DEBT_SERVICE_RATE: Decimal = dec!(0.15);

/// EBIT is approximated as this share of EBITDA.
pub const EBIT_TO_EBITDA: Decimal = dec!(0.85);

pub const DAYS_PER_YEAR: Decimal = dec!(365);

const HUNDRED: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Ratio catalogue
// ---------------------------------------------------------------------------

/// Stable identifier of each ratio, independent of its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioKey {
    DebtToCaf,
    Dscr,
    DebtRatio,
    FinancialAutonomy,
    Gearing,
    NetWorkingCapital,
    CurrentRatio,
    QuickRatio,
    WorkingCapitalDays,
    EbitdaMargin,
    EbitMargin,
    ReturnOnEquity,
    RevenueGrowth,
    InventoryDays,
    DaysSalesOutstanding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioUnit {
    Currency,
    Percent,
    Days,
    Years,
    Multiple,
}

impl std::fmt::Display for RatioUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatioUnit::Currency => write!(f, "€"),
            RatioUnit::Percent => write!(f, "%"),
            RatioUnit::Days => write!(f, "days"),
            RatioUnit::Years => write!(f, "years"),
            RatioUnit::Multiple => write!(f, "x"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioCategory {
    RepaymentCapacity,
    FinancialStructure,
    Liquidity,
    Profitability,
    Activity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioStatus {
    Good,
    Warning,
    Bad,
}

impl std::fmt::Display for RatioStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatioStatus::Good => write!(f, "good"),
            RatioStatus::Warning => write!(f, "warning"),
            RatioStatus::Bad => write!(f, "bad"),
        }
    }
}

/// One side of a status cut-off.
#[derive(Debug, Clone, Copy)]
enum Bound {
    AtLeast(Decimal),
    Above(Decimal),
    AtMost(Decimal),
    Below(Decimal),
}

impl Bound {
    fn holds(self, value: Decimal) -> bool {
        match self {
            Bound::AtLeast(b) => value >= b,
            Bound::Above(b) => value > b,
            Bound::AtMost(b) => value <= b,
            Bound::Below(b) => value < b,
        }
    }
}

/// `good` is tested first, then `warning`; failing both is `bad`.
#[derive(Debug, Clone, Copy)]
struct StatusRule {
    good: Bound,
    warning: Option<Bound>,
}

impl StatusRule {
    const fn new(good: Bound, warning: Bound) -> Self {
        Self {
            good,
            warning: Some(warning),
        }
    }

    fn classify(self, value: Option<Decimal>) -> RatioStatus {
        let Some(v) = value else {
            return RatioStatus::Warning;
        };
        if self.good.holds(v) {
            RatioStatus::Good
        } else if self.warning.is_some_and(|w| w.holds(v)) {
            RatioStatus::Warning
        } else {
            RatioStatus::Bad
        }
    }
}

impl RatioKey {
    /// Every ratio, in report order.
    pub const ALL: [RatioKey; 15] = [
        RatioKey::DebtToCaf,
        RatioKey::Dscr,
        RatioKey::DebtRatio,
        RatioKey::FinancialAutonomy,
        RatioKey::Gearing,
        RatioKey::NetWorkingCapital,
        RatioKey::CurrentRatio,
        RatioKey::QuickRatio,
        RatioKey::WorkingCapitalDays,
        RatioKey::EbitdaMargin,
        RatioKey::EbitMargin,
        RatioKey::ReturnOnEquity,
        RatioKey::RevenueGrowth,
        RatioKey::InventoryDays,
        RatioKey::DaysSalesOutstanding,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RatioKey::DebtToCaf => "Debt / CAF",
            RatioKey::Dscr => "DSCR (EBITDA / debt service)",
            RatioKey::DebtRatio => "Debt ratio",
            RatioKey::FinancialAutonomy => "Financial autonomy",
            RatioKey::Gearing => "Gearing (debt / equity)",
            RatioKey::NetWorkingCapital => "Net working capital",
            RatioKey::CurrentRatio => "Current ratio",
            RatioKey::QuickRatio => "Quick ratio",
            RatioKey::WorkingCapitalDays => "Working capital need (days of revenue)",
            RatioKey::EbitdaMargin => "EBITDA margin",
            RatioKey::EbitMargin => "EBIT margin",
            RatioKey::ReturnOnEquity => "Return on equity",
            RatioKey::RevenueGrowth => "Revenue growth",
            RatioKey::InventoryDays => "Inventory days",
            RatioKey::DaysSalesOutstanding => "Days sales outstanding",
        }
    }

    /// Display form of the "good" threshold.
    pub fn threshold(self) -> &'static str {
        match self {
            RatioKey::DebtToCaf => "≤ 3 years",
            RatioKey::Dscr => "≥ 1.5",
            RatioKey::DebtRatio => "≤ 50%",
            RatioKey::FinancialAutonomy => "≥ 20%",
            RatioKey::Gearing => "≤ 1",
            RatioKey::NetWorkingCapital => "> 0",
            RatioKey::CurrentRatio => "≥ 1",
            RatioKey::QuickRatio => "≥ 0.8",
            RatioKey::WorkingCapitalDays => "< 60 days",
            RatioKey::EbitdaMargin => "≥ 5%",
            RatioKey::EbitMargin => "≥ 2%",
            RatioKey::ReturnOnEquity => "≥ 10%",
            RatioKey::RevenueGrowth => "≥ 0%",
            RatioKey::InventoryDays => "sector",
            RatioKey::DaysSalesOutstanding => "< 60 days",
        }
    }

    pub fn unit(self) -> RatioUnit {
        match self {
            RatioKey::DebtToCaf => RatioUnit::Years,
            RatioKey::NetWorkingCapital => RatioUnit::Currency,
            RatioKey::Dscr
            | RatioKey::Gearing
            | RatioKey::CurrentRatio
            | RatioKey::QuickRatio => RatioUnit::Multiple,
            RatioKey::DebtRatio
            | RatioKey::FinancialAutonomy
            | RatioKey::EbitdaMargin
            | RatioKey::EbitMargin
            | RatioKey::ReturnOnEquity
            | RatioKey::RevenueGrowth => RatioUnit::Percent,
            RatioKey::WorkingCapitalDays
            | RatioKey::InventoryDays
            | RatioKey::DaysSalesOutstanding => RatioUnit::Days,
        }
    }

    pub fn category(self) -> RatioCategory {
        match self {
            RatioKey::DebtToCaf | RatioKey::Dscr | RatioKey::DebtRatio => {
                RatioCategory::RepaymentCapacity
            }
            RatioKey::FinancialAutonomy | RatioKey::Gearing | RatioKey::NetWorkingCapital => {
                RatioCategory::FinancialStructure
            }
            RatioKey::CurrentRatio | RatioKey::QuickRatio | RatioKey::WorkingCapitalDays => {
                RatioCategory::Liquidity
            }
            RatioKey::EbitdaMargin | RatioKey::EbitMargin | RatioKey::ReturnOnEquity => {
                RatioCategory::Profitability
            }
            RatioKey::RevenueGrowth | RatioKey::InventoryDays | RatioKey::DaysSalesOutstanding => {
                RatioCategory::Activity
            }
        }
    }

    fn status_rule(self) -> StatusRule {
        use Bound::*;
        match self {
            RatioKey::DebtToCaf => StatusRule::new(AtMost(dec!(3)), AtMost(dec!(5))),
            RatioKey::Dscr => StatusRule::new(AtLeast(dec!(1.5)), AtLeast(dec!(1))),
            RatioKey::DebtRatio => StatusRule::new(AtMost(dec!(50)), AtMost(dec!(70))),
            RatioKey::FinancialAutonomy => StatusRule::new(AtLeast(dec!(20)), AtLeast(dec!(10))),
            RatioKey::Gearing => StatusRule::new(AtMost(dec!(1)), AtMost(dec!(2))),
            RatioKey::NetWorkingCapital => StatusRule {
                good: Above(Decimal::ZERO),
                warning: None,
            },
            RatioKey::CurrentRatio => StatusRule::new(AtLeast(dec!(1)), AtLeast(dec!(0.8))),
            RatioKey::QuickRatio => StatusRule::new(AtLeast(dec!(0.8)), AtLeast(dec!(0.5))),
            RatioKey::WorkingCapitalDays => StatusRule::new(Below(dec!(60)), Below(dec!(90))),
            RatioKey::EbitdaMargin => StatusRule::new(AtLeast(dec!(5)), AtLeast(dec!(2))),
            RatioKey::EbitMargin => StatusRule::new(AtLeast(dec!(2)), AtLeast(Decimal::ZERO)),
            RatioKey::ReturnOnEquity => StatusRule::new(AtLeast(dec!(10)), AtLeast(dec!(5))),
            RatioKey::RevenueGrowth => StatusRule::new(AtLeast(Decimal::ZERO), AtLeast(dec!(-5))),
            RatioKey::InventoryDays => StatusRule::new(AtMost(dec!(60)), AtMost(dec!(90))),
            RatioKey::DaysSalesOutstanding => StatusRule::new(Below(dec!(60)), Below(dec!(90))),
        }
    }

    /// Classify a current-year value; `None` is `warning`.
    pub fn classify(self, value_n: Option<Decimal>) -> RatioStatus {
        self.status_rule().classify(value_n)
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioResult {
    pub key: RatioKey,
    pub name: String,
    /// Most recent fiscal year supplied.
    pub value_n: Option<Decimal>,
    pub value_n1: Option<Decimal>,
    pub value_n2: Option<Decimal>,
    pub threshold: String,
    pub status: RatioStatus,
    pub unit: RatioUnit,
    pub category: RatioCategory,
}

impl RatioResult {
    fn new(
        key: RatioKey,
        value_n: Option<Decimal>,
        value_n1: Option<Decimal>,
        value_n2: Option<Decimal>,
    ) -> Self {
        Self {
            key,
            name: key.label().to_string(),
            value_n,
            value_n1,
            value_n2,
            threshold: key.threshold().to_string(),
            status: key.classify(value_n),
            unit: key.unit(),
            category: key.category(),
        }
    }
}

/// Look a ratio up by key.
pub fn find_ratio(ratios: &[RatioResult], key: RatioKey) -> Option<&RatioResult> {
    ratios.iter().find(|r| r.key == key)
}

/// Current-year (N) value of a ratio, if computed.
pub fn current_value(ratios: &[RatioResult], key: RatioKey) -> Option<Decimal> {
    find_ratio(ratios, key).and_then(|r| r.value_n)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the fifteen ratios over the three most recent fiscal years.
///
/// Input order does not matter; records are ranked by fiscal year. Fewer
/// than three years leaves the older slots `None`.
pub fn calculate_ratios(years: &[FinancialStatementYear]) -> Vec<RatioResult> {
    let sorted = sorted_descending(years);
    let n = sorted.first().copied();
    let n1 = sorted.get(1).copied();
    let n2 = sorted.get(2).copied();

    let ratios: Vec<RatioResult> = RatioKey::ALL
        .iter()
        .map(|&key| {
            let (value_n, value_n1, value_n2) = match key {
                RatioKey::RevenueGrowth => (revenue_growth(n, n1), revenue_growth(n1, n2), None),
                _ => (
                    n.and_then(|y| year_value(key, y)),
                    n1.and_then(|y| year_value(key, y)),
                    n2.and_then(|y| year_value(key, y)),
                ),
            };
            trace!(?key, ?value_n, ?value_n1, ?value_n2, "ratio computed");
            let mut ratio = RatioResult::new(key, value_n, value_n1, value_n2);
            if key == RatioKey::DebtToCaf && n.is_some_and(lacks_repayment_capacity) {
                ratio.status = RatioStatus::Bad;
            }
            ratio
        })
        .collect();

    debug!(
        years = sorted.len(),
        latest_year = n.map(|y| y.fiscal_year),
        missing_current = ratios.iter().filter(|r| r.value_n.is_none()).count(),
        "ratios calculated"
    );
    ratios
}

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

fn year_value(key: RatioKey, y: &FinancialStatementYear) -> Option<Decimal> {
    match key {
        RatioKey::DebtToCaf => divide(
            y.financial_debt,
            y.self_financing_capacity.filter(|caf| *caf > Decimal::ZERO),
        ),
        RatioKey::Dscr => divide(y.ebitda, mul(y.financial_debt, DEBT_SERVICE_RATE)),
        RatioKey::DebtRatio => percent(divide(y.financial_debt, y.total_liabilities)),
        RatioKey::FinancialAutonomy => percent(divide(y.equity, y.total_liabilities)),
        RatioKey::Gearing => divide(y.financial_debt, y.equity),
        RatioKey::NetWorkingCapital => sub(
            add(y.equity, y.financial_debt),
            sub(y.total_assets, y.current_assets),
        ),
        RatioKey::CurrentRatio => divide(y.current_assets, y.current_liabilities),
        RatioKey::QuickRatio => divide(sub(y.current_assets, y.inventory), y.current_liabilities),
        RatioKey::WorkingCapitalDays => days(divide(
            sub(add(y.inventory, y.accounts_receivable), y.accounts_payable),
            y.revenue,
        )),
        RatioKey::EbitdaMargin => percent(divide(y.ebitda, y.revenue)),
        RatioKey::EbitMargin => percent(divide(mul(y.ebitda, EBIT_TO_EBITDA), y.revenue)),
        RatioKey::ReturnOnEquity => percent(divide(y.net_income, y.equity)),
        RatioKey::InventoryDays => days(divide(y.inventory, y.revenue)),
        RatioKey::DaysSalesOutstanding => days(divide(y.accounts_receivable, y.revenue)),
        RatioKey::RevenueGrowth => None,
    }
}

/// Growth of `current` revenue over `previous`, in percent.
fn revenue_growth(
    current: Option<&FinancialStatementYear>,
    previous: Option<&FinancialStatementYear>,
) -> Option<Decimal> {
    let current = current?.revenue;
    let previous = previous?.revenue;
    percent(divide(sub(current, previous), previous))
}

/// CAF was reported and is not positive.
pub fn lacks_repayment_capacity(y: &FinancialStatementYear) -> bool {
    y.self_financing_capacity.is_some_and(|caf| caf <= Decimal::ZERO)
}

fn divide(numerator: Option<Decimal>, denominator: Option<Decimal>) -> Option<Decimal> {
    let denominator = denominator?;
    if denominator.is_zero() {
        return None;
    }
    numerator?.checked_div(denominator)
}

fn add(a: Option<Decimal>, b: Option<Decimal>) -> Option<Decimal> {
    a?.checked_add(b?)
}

fn sub(a: Option<Decimal>, b: Option<Decimal>) -> Option<Decimal> {
    a?.checked_sub(b?)
}

fn mul(a: Option<Decimal>, factor: Decimal) -> Option<Decimal> {
    a?.checked_mul(factor)
}

fn percent(v: Option<Decimal>) -> Option<Decimal> {
    mul(v, HUNDRED)
}

fn days(v: Option<Decimal>) -> Option<Decimal> {
    mul(v, DAYS_PER_YEAR)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
