use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values, in the reporting currency.
pub type Money = Decimal;

/// Percentages expressed in percent (50 = 50%), as displayed to analysts.
pub type Percent = Decimal;

/// Multiples (e.g. a 1.5x DSCR)
pub type Multiple = Decimal;

/// Day counts derived from annual figures (x / revenue * 365)
pub type Days = Decimal;

/// Year counts (e.g. debt expressed in years of self-financing capacity)
pub type Years = Decimal;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Whole years elapsed between `since` and `as_of`, counting 365-day years.
///
/// Leap days are not compensated for, so an anniversary can be reached a
/// day early. Negative when `since` lies after `as_of`.
pub fn whole_years_between(since: NaiveDate, as_of: NaiveDate) -> i64 {
    (as_of - since).num_days().div_euclid(365)
}

/// The date ages are measured against: the caller's, or today (UTC).
pub fn reference_date_or_today(reference: Option<NaiveDate>) -> NaiveDate {
    reference.unwrap_or_else(|| Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_whole_years_floor() {
        assert_eq!(whole_years_between(date(2020, 1, 1), date(2024, 12, 31)), 5);
        assert_eq!(whole_years_between(date(2023, 6, 1), date(2024, 5, 30)), 0);
        assert_eq!(whole_years_between(date(2024, 6, 1), date(2024, 6, 1)), 0);
    }

    #[test]
    fn test_future_incorporation_is_negative() {
        assert_eq!(whole_years_between(date(2025, 1, 2), date(2025, 1, 1)), -1);
    }

    #[test]
    fn test_reference_date_passthrough() {
        let d = date(2024, 3, 15);
        assert_eq!(reference_date_or_today(Some(d)), d);
    }
}
