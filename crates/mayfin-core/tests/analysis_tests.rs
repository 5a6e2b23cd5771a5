use chrono::NaiveDate;
use mayfin_core::recommendation::analysis::{analyse_dossier, DossierAnalysisInput};
use mayfin_core::recommendation::deriver::{derive_recommendation, Decision, FinancingRequest, FinancingType};
use mayfin_core::scoring::rubric::{calculate_scoring, EntityProfile};
use mayfin_core::statements::FinancialStatementYear;
use mayfin_core::MayfinError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixtures
// ===========================================================================

fn year(fiscal_year: i32, revenue: Decimal, caf: Decimal) -> FinancialStatementYear {
    FinancialStatementYear {
        revenue: Some(revenue),
        net_income: Some(dec!(30_000)),
        ebitda: Some(dec!(70_000)),
        self_financing_capacity: Some(caf),
        total_assets: Some(dec!(600_000)),
        current_assets: Some(dec!(320_000)),
        inventory: Some(dec!(80_000)),
        accounts_receivable: Some(dec!(120_000)),
        cash: Some(dec!(40_000)),
        total_liabilities: Some(dec!(600_000)),
        equity: Some(dec!(150_000)),
        financial_debt: Some(dec!(180_000)),
        current_liabilities: Some(dec!(230_000)),
        accounts_payable: Some(dec!(95_000)),
        ..FinancialStatementYear::new(fiscal_year)
    }
}

fn dossier(requested: Decimal) -> DossierAnalysisInput {
    DossierAnalysisInput {
        years: vec![
            year(2023, dec!(1_000_000), dec!(60_000)),
            year(2022, dec!(980_000), dec!(55_000)),
            year(2021, dec!(950_000), dec!(50_000)),
        ],
        profile: EntityProfile {
            incorporation_date: NaiveDate::from_ymd_opt(2019, 2, 1),
            manager_experience_years: Some(6),
            sector: Some("BTP".into()),
            reference_date: NaiveDate::from_ymd_opt(2024, 6, 30),
            ..EntityProfile::default()
        },
        request: FinancingRequest {
            requested_amount: requested,
            financing_type: FinancingType::Leasing,
            duration_months: None,
        },
        policy: None,
    }
}

// ===========================================================================
// Dossier analysis
// ===========================================================================

#[test]
fn test_analysis_sizes_from_caf() {
    let out = analyse_dossier(&dossier(dec!(1_000_000))).unwrap();
    let rec = &out.result.recommendation;

    // Average CAF = (60k + 55k + 50k) / 3 = 55k
    assert_eq!(rec.average_self_financing_capacity, dec!(55_000));
    // Leverage = 180k / 55k = 3.27 -> 3.3
    assert_eq!(rec.current_leverage_years, dec!(3.3));
    // Residual = (3.5 - 3.2727..) * 55k = 12.5k
    assert_eq!(rec.residual_capacity, dec!(12_500));
    // 12.5k / 0.85 = 14_705.88 -> 14_706
    assert_eq!(rec.financeable_amount, dec!(14_706));
    assert_eq!(rec.duration_months, 60);
    // 14_706 / 60 * 1.05 = 257.36
    assert_eq!(rec.estimated_monthly_payment, dec!(257));
    assert!(rec.watch_points.iter().any(|w| w.contains("BTP")));
    assert!(rec.required_guarantees.iter().any(|g| g.contains("Pledge")));
}

#[test]
fn test_analysis_is_consistent_with_individual_steps() {
    let input = dossier(dec!(100_000));
    let out = analyse_dossier(&input).unwrap();

    let scoring = calculate_scoring(&input.years, &input.profile);
    let rec = derive_recommendation(&scoring, &input.years, &input.request, &input.profile);

    assert_eq!(out.result.scoring, scoring);
    assert_eq!(out.result.recommendation, rec);
    assert_eq!(out.result.recommendation.decision, Decision::from(scoring.status));
}

#[test]
fn test_financeable_never_exceeds_requested() {
    for requested in [dec!(0), dec!(1), dec!(9_999.99), dec!(14_706), dec!(250_000)] {
        let out = analyse_dossier(&dossier(requested)).unwrap();
        let amount = out.result.recommendation.financeable_amount;
        assert!(amount <= requested, "{amount} > {requested}");
        assert!(amount >= Decimal::ZERO);
    }
}

#[test]
fn test_duplicate_year_rejected() {
    let mut input = dossier(dec!(10_000));
    input.years.push(year(2023, dec!(1), dec!(1)));
    match analyse_dossier(&input) {
        Err(MayfinError::DuplicateFiscalYear { year }) => assert_eq!(year, 2023),
        other => panic!("expected duplicate year error, got {other:?}"),
    }
}

#[test]
fn test_envelope_metadata() {
    let out = analyse_dossier(&dossier(dec!(10_000))).unwrap();
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    assert_eq!(out.assumptions["fiscal_years_supplied"], 3);
    assert_eq!(out.result.fiscal_years, vec![2023, 2022, 2021]);
}

#[test]
fn test_input_accepts_persisted_french_columns() {
    let json = r#"{
        "years": [
            { "annee_exercice": 2023, "chiffre_affaires": "500000",
              "capacite_autofinancement": "40000", "dettes_financieres": "20000" }
        ],
        "profile": { "reference_date": "2024-06-30" },
        "request": { "montant_demande": "50000", "type_financement": "tresorerie" }
    }"#;
    let input: DossierAnalysisInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.request.financing_type, FinancingType::WorkingCapital);

    let out = analyse_dossier(&input).unwrap();
    assert_eq!(out.result.recommendation.financing_type_label, "WORKING CAPITAL");
    assert!(out.result.recommendation.financeable_amount <= dec!(50_000));
}
