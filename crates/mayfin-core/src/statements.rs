//! Multi-year financial statements for one entity.
//!
//! A [`FinancialStatementYear`] holds one fiscal year's balance-sheet and
//! income-statement figures. Every monetary field is optional: `None` means
//! "not provided", which downstream computations keep distinct from zero.
//!
//! Records deserialise from both the field names used here and the column
//! names of the persisted financial-data rows (`chiffre_affaires`,
//! `capitaux_propres`, ...), so rows fetched from the backend can be fed in
//! without a hand-written mapping layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{types::*, MayfinError, MayfinResult};

// ---------------------------------------------------------------------------
// Statement year
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatementYear {
    #[serde(alias = "annee_exercice")]
    pub fiscal_year: i32,
    #[serde(default, alias = "chiffre_affaires")]
    pub revenue: Option<Money>,
    #[serde(default, alias = "resultat_net")]
    pub net_income: Option<Money>,
    #[serde(default)]
    pub ebitda: Option<Money>,
    /// Capacité d'autofinancement (CAF).
    #[serde(default, alias = "capacite_autofinancement")]
    pub self_financing_capacity: Option<Money>,
    #[serde(default, alias = "total_actif")]
    pub total_assets: Option<Money>,
    #[serde(default, alias = "actif_circulant")]
    pub current_assets: Option<Money>,
    #[serde(default, alias = "stocks")]
    pub inventory: Option<Money>,
    #[serde(default, alias = "creances_clients")]
    pub accounts_receivable: Option<Money>,
    #[serde(default, alias = "tresorerie")]
    pub cash: Option<Money>,
    /// Balance-sheet total on the liabilities side (equity included).
    #[serde(default, alias = "total_passif")]
    pub total_liabilities: Option<Money>,
    #[serde(default, alias = "capitaux_propres")]
    pub equity: Option<Money>,
    #[serde(default, alias = "dettes_financieres")]
    pub financial_debt: Option<Money>,
    #[serde(default, alias = "passif_circulant")]
    pub current_liabilities: Option<Money>,
    #[serde(default, alias = "dettes_fournisseurs")]
    pub accounts_payable: Option<Money>,
}

impl FinancialStatementYear {
    /// An empty record for `fiscal_year`; every figure starts as not provided.
    pub fn new(fiscal_year: i32) -> Self {
        Self {
            fiscal_year,
            ..Self::default()
        }
    }
}

/// Records ordered most recent first. The caller's slice is left untouched.
pub fn sorted_descending(years: &[FinancialStatementYear]) -> Vec<&FinancialStatementYear> {
    let mut sorted: Vec<&FinancialStatementYear> = years.iter().collect();
    sorted.sort_by(|a, b| b.fiscal_year.cmp(&a.fiscal_year));
    sorted
}

/// First fiscal year appearing more than once, if any.
pub fn find_duplicate_year(years: &[FinancialStatementYear]) -> Option<i32> {
    let mut seen = std::collections::BTreeSet::new();
    years
        .iter()
        .map(|y| y.fiscal_year)
        .find(|year| !seen.insert(*year))
}

/// Reject a history carrying the same fiscal year twice. Ratios pick N and
/// N-1 by rank, so a repeated year would make them depend on input order.
pub fn ensure_unique_years(years: &[FinancialStatementYear]) -> MayfinResult<()> {
    match find_duplicate_year(years) {
        Some(year) => Err(MayfinError::DuplicateFiscalYear { year }),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Statement history for one entity, holding at most one record per fiscal
/// year. Re-submitting a year replaces the stored record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    into = "Vec<FinancialStatementYear>",
    try_from = "Vec<FinancialStatementYear>"
)]
pub struct FinancialHistory {
    by_year: BTreeMap<i32, FinancialStatementYear>,
}

impl FinancialHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history from raw records, rejecting duplicate fiscal years.
    pub fn from_years(years: Vec<FinancialStatementYear>) -> MayfinResult<Self> {
        let mut history = Self::new();
        for year in years {
            let fiscal_year = year.fiscal_year;
            if history.by_year.insert(fiscal_year, year).is_some() {
                return Err(MayfinError::DuplicateFiscalYear { year: fiscal_year });
            }
        }
        Ok(history)
    }

    /// Insert or replace the record for its fiscal year, returning the
    /// record it replaced.
    pub fn upsert(&mut self, year: FinancialStatementYear) -> Option<FinancialStatementYear> {
        self.by_year.insert(year.fiscal_year, year)
    }

    pub fn remove(&mut self, fiscal_year: i32) -> Option<FinancialStatementYear> {
        self.by_year.remove(&fiscal_year)
    }

    pub fn get(&self, fiscal_year: i32) -> Option<&FinancialStatementYear> {
        self.by_year.get(&fiscal_year)
    }

    pub fn latest(&self) -> Option<&FinancialStatementYear> {
        self.by_year.values().next_back()
    }

    /// Up to `n` records, most recent fiscal year first.
    pub fn most_recent(&self, n: usize) -> Vec<&FinancialStatementYear> {
        self.by_year.values().rev().take(n).collect()
    }

    /// Fiscal years present, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.by_year.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.by_year.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_year.is_empty()
    }

    /// Owned records, most recent fiscal year first.
    pub fn to_vec(&self) -> Vec<FinancialStatementYear> {
        self.by_year.values().rev().cloned().collect()
    }
}

impl From<FinancialHistory> for Vec<FinancialStatementYear> {
    fn from(history: FinancialHistory) -> Self {
        history.by_year.into_values().rev().collect()
    }
}

impl TryFrom<Vec<FinancialStatementYear>> for FinancialHistory {
    type Error = MayfinError;

    fn try_from(years: Vec<FinancialStatementYear>) -> Result<Self, Self::Error> {
        Self::from_years(years)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn year_with_revenue(fiscal_year: i32, revenue: Money) -> FinancialStatementYear {
        FinancialStatementYear {
            revenue: Some(revenue),
            ..FinancialStatementYear::new(fiscal_year)
        }
    }

    #[test]
    fn test_sorted_descending_does_not_mutate_input() {
        let years = vec![
            FinancialStatementYear::new(2021),
            FinancialStatementYear::new(2023),
            FinancialStatementYear::new(2022),
        ];
        let sorted = sorted_descending(&years);
        let order: Vec<i32> = sorted.iter().map(|y| y.fiscal_year).collect();
        assert_eq!(order, vec![2023, 2022, 2021]);
        assert_eq!(years[0].fiscal_year, 2021);
    }

    #[test]
    fn test_find_duplicate_year() {
        let years = vec![
            FinancialStatementYear::new(2022),
            FinancialStatementYear::new(2023),
            FinancialStatementYear::new(2022),
        ];
        assert_eq!(find_duplicate_year(&years), Some(2022));
        assert_eq!(find_duplicate_year(&years[..2]), None);
    }

    #[test]
    fn test_ensure_unique_years() {
        let years = vec![
            year_with_revenue(2023, dec!(100)),
            year_with_revenue(2023, dec!(200)),
        ];
        assert!(matches!(
            ensure_unique_years(&years),
            Err(MayfinError::DuplicateFiscalYear { year: 2023 })
        ));
        assert!(ensure_unique_years(&years[..1]).is_ok());
        assert!(ensure_unique_years(&[]).is_ok());
    }

    #[test]
    fn test_upsert_replaces_same_year() {
        let mut history = FinancialHistory::new();
        assert!(history.upsert(year_with_revenue(2023, dec!(100))).is_none());
        let previous = history.upsert(year_with_revenue(2023, dec!(250)));
        assert_eq!(previous.and_then(|y| y.revenue), Some(dec!(100)));
        assert_eq!(history.len(), 1);
        assert_eq!(history.get(2023).and_then(|y| y.revenue), Some(dec!(250)));
    }

    #[test]
    fn test_from_years_rejects_duplicates() {
        let err = FinancialHistory::from_years(vec![
            FinancialStatementYear::new(2023),
            FinancialStatementYear::new(2023),
        ])
        .unwrap_err();
        match err {
            MayfinError::DuplicateFiscalYear { year } => assert_eq!(year, 2023),
            other => panic!("Expected DuplicateFiscalYear, got {other:?}"),
        }
    }

    #[test]
    fn test_latest_and_most_recent() {
        let history = FinancialHistory::from_years(vec![
            FinancialStatementYear::new(2020),
            FinancialStatementYear::new(2023),
            FinancialStatementYear::new(2021),
            FinancialStatementYear::new(2022),
        ])
        .unwrap();
        assert_eq!(history.latest().map(|y| y.fiscal_year), Some(2023));
        let recent: Vec<i32> = history.most_recent(3).iter().map(|y| y.fiscal_year).collect();
        assert_eq!(recent, vec![2023, 2022, 2021]);
        assert_eq!(history.years(), vec![2020, 2021, 2022, 2023]);
    }

    #[test]
    fn test_remove_year() {
        let mut history =
            FinancialHistory::from_years(vec![FinancialStatementYear::new(2022)]).unwrap();
        assert!(history.remove(2022).is_some());
        assert!(history.is_empty());
        assert!(history.latest().is_none());
    }

    #[test]
    fn test_deserialize_persisted_row_names() {
        let row = serde_json::json!({
            "annee_exercice": 2023,
            "chiffre_affaires": "900000",
            "capacite_autofinancement": "150000",
            "dettes_financieres": "70000",
            "capitaux_propres": null
        });
        let year: FinancialStatementYear = serde_json::from_value(row).unwrap();
        assert_eq!(year.fiscal_year, 2023);
        assert_eq!(year.revenue, Some(dec!(900000)));
        assert_eq!(year.self_financing_capacity, Some(dec!(150000)));
        assert_eq!(year.financial_debt, Some(dec!(70000)));
        assert_eq!(year.equity, None);
        assert_eq!(year.inventory, None);
    }

    #[test]
    fn test_history_serde_rejects_duplicates() {
        let json = r#"[{"fiscal_year": 2023}, {"fiscal_year": 2023}]"#;
        assert!(serde_json::from_str::<FinancialHistory>(json).is_err());
    }
}
