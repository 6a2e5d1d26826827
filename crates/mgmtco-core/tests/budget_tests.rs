use chrono::{Datelike, Utc};
use mgmtco_core::goal_seek::runway::{seek_fund_size, seek_starting_cash};
use mgmtco_core::{
    calculate_budget, find_cash_for_runway, find_fund_size_for_runway, format_currency,
    format_runway, run_budget, BudgetData, ExpenseItem, FeeBasis, Fund, Settings,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixtures
// ===========================================================================

fn settings(years: u32, inflation: Decimal) -> Option<Settings> {
    Some(Settings {
        inflation_rate: inflation,
        projection_years: years,
        start_year: Some(2026),
        realization_curve: None,
    })
}

/// A first-time manager: one 50m fund at 2%, $40k/month of costs.
fn emerging_manager() -> BudgetData {
    BudgetData {
        starting_cash: dec!(500000),
        funds: vec![Fund::new("fund-i", dec!(50), dec!(2), Utc::now().year())],
        team: vec![
            ExpenseItem::new("Managing Partner", dec!(20000)),
            ExpenseItem::new("Associate", dec!(10000)),
        ],
        operations: vec![ExpenseItem::new("Fund Admin", dec!(6000))],
        overhead: vec![ExpenseItem::new("Office", dec!(4000))],
        settings: Some(Settings {
            inflation_rate: dec!(0),
            projection_years: 2,
            start_year: None,
            realization_curve: None,
        }),
    }
}

/// $50k/month of costs and a fund that earns nothing.
fn burn_only(starting_cash: Decimal) -> BudgetData {
    BudgetData {
        starting_cash,
        funds: vec![Fund::new("shell", dec!(0), dec!(2), 2026)],
        team: vec![ExpenseItem::new("Team", dec!(50000))],
        operations: vec![],
        overhead: vec![],
        settings: settings(5, dec!(0)),
    }
}

/// Established platform: flagship plus a successor fund, with inflation.
fn platform() -> BudgetData {
    let mut fund_ii = Fund::new("fund-ii", dec!(150), dec!(1.75), 2028);
    fund_ii.first_close_percent = Some(dec!(40));
    fund_ii.final_close_month = Some(18);
    fund_ii.target_return = Some(dec!(2.5));

    let mut fund_i = Fund::new("fund-i", dec!(80), dec!(2), 2026);
    fund_i.target_return = Some(dec!(2));

    BudgetData {
        starting_cash: dec!(1500000),
        funds: vec![fund_i, fund_ii],
        team: vec![
            ExpenseItem::new("Partners", dec!(90000)),
            ExpenseItem::new("Investment Team", dec!(45000)),
        ],
        operations: vec![
            ExpenseItem::new("Fund Admin", dec!(12000)),
            ExpenseItem::new("Audit & Legal", dec!(8000)),
        ],
        overhead: vec![ExpenseItem::new("Office & Travel", dec!(15000))],
        settings: settings(7, dec!(3)),
    }
}

// ===========================================================================
// Projection engine
// ===========================================================================

#[test]
fn test_emerging_manager_known_answers() {
    let results = calculate_budget(&emerging_manager());

    // 50,000,000 x 2% x 50% / 12
    assert!((results.projections[0].revenue - dec!(41666.67)).abs() < dec!(0.01));
    // Fully raised after the 12-month final close
    assert!((results.projections[12].revenue - dec!(83333.33)).abs() < dec!(0.01));
    assert_eq!(results.monthly_burn, dec!(40000));
    assert_eq!(results.annual_budget, dec!(480000));
    assert_eq!(results.annual_revenue, dec!(1000000));
    assert_eq!(results.break_even_month, Some(1));
    assert_eq!(results.runway_months, None);
    assert_eq!(results.seed_capital_needed, dec!(500000));
}

#[test]
fn test_runway_when_cash_runs_out_in_month_two() {
    let mut data = burn_only(dec!(100000));
    data.settings = settings(1, dec!(0));
    let results = calculate_budget(&data);
    assert_eq!(results.runway_months, Some(2));
    assert_eq!(results.break_even_month, None);
    assert_eq!(format_runway(results.runway_months), "2 months");
}

#[test]
fn test_projection_length_matches_horizon() {
    for years in 1..=10 {
        let mut data = platform();
        data.settings = settings(years, dec!(3));
        let results = calculate_budget(&data);
        assert_eq!(results.projections.len(), (years * 12) as usize);
        assert_eq!(results.projections.last().map(|p| p.month), Some(years * 12));
    }
}

#[test]
fn test_cash_balance_never_negative() {
    let results = calculate_budget(&burn_only(dec!(250000)));
    assert!(results.projections.iter().all(|p| p.cash_balance >= Decimal::ZERO));
    assert_eq!(results.ending_cash(), Decimal::ZERO);
}

#[test]
fn test_net_cash_flow_is_revenue_less_expenses() {
    let results = calculate_budget(&platform());
    for p in &results.projections {
        assert_eq!(p.net_cash_flow, p.revenue - p.expenses);
    }
}

#[test]
fn test_projection_is_deterministic() {
    let data = platform();
    assert_eq!(calculate_budget(&data), calculate_budget(&data));
}

#[test]
fn test_json_round_trip_preserves_results() {
    let data = platform();
    let json = serde_json::to_string(&data).unwrap();
    let parsed: BudgetData = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, data);
    assert_eq!(calculate_budget(&parsed), calculate_budget(&data));
}

#[test]
fn test_results_serialize_snake_case() {
    let value = serde_json::to_value(calculate_budget(&platform())).unwrap();
    assert!(value.get("monthly_burn").is_some());
    assert!(value.get("seed_capital_needed").is_some());
    assert!(value["projections"][0].get("net_cash_flow").is_some());
    // Both funds target a multiple above 1.0x
    assert!(value.get("total_carry").is_some());
}

#[test]
fn test_larger_fund_never_shortens_runway() {
    let mut previous_ending = None;
    for size in [dec!(0), dec!(25), dec!(50), dec!(100), dec!(250)] {
        let mut data = burn_only(dec!(300000));
        data.funds[0].size = size;
        let ending = calculate_budget(&data).ending_cash();
        if let Some(prev) = previous_ending {
            assert!(ending >= prev, "size {size}: {ending} < {prev}");
        }
        previous_ending = Some(ending);
    }
}

/// `None` (never depleted) ranks above any finite runway.
fn runway_rank(runway: Option<u32>) -> u32 {
    runway.unwrap_or(u32::MAX)
}

fn late_close_burn() -> BudgetData {
    // Survives the fee-less first year with 400k left
    let mut data = burn_only(dec!(1000000));
    data.funds[0].first_close_year = 2027;
    data.settings = settings(5, dec!(3));
    data
}

#[test]
fn test_runway_monotone_in_fund_size() {
    let mut previous: Option<Option<u32>> = None;
    for step in 0..200 {
        let size = Decimal::from(step * 5);
        let mut data = late_close_burn();
        data.funds[0].size = size;
        let runway = calculate_budget(&data).runway_months;
        if let Some(prev) = previous {
            assert!(
                runway_rank(runway) >= runway_rank(prev),
                "size {size}: runway {runway:?} shorter than {prev:?}"
            );
        }
        previous = Some(runway);
    }
    // The sweep spans both depleted and never-depleted budgets
    assert_eq!(previous, Some(None));
}

#[test]
fn test_runway_monotone_in_fee_rate() {
    let mut previous: Option<Option<u32>> = None;
    for step in 0..=30 {
        let fee_rate = Decimal::from(step) / dec!(10);
        let mut data = late_close_burn();
        data.funds[0].size = dec!(40);
        data.funds[0].fee_rate = fee_rate;
        let runway = calculate_budget(&data).runway_months;
        if let Some(prev) = previous {
            assert!(
                runway_rank(runway) >= runway_rank(prev),
                "fee rate {fee_rate}: runway {runway:?} shorter than {prev:?}"
            );
        }
        previous = Some(runway);
    }
}

#[test]
fn test_very_long_fund_life_does_not_abort_projection() {
    let mut data = burn_only(dec!(1000000));
    data.funds[0].size = dec!(100);
    data.funds[0].target_return = Some(dec!(2));
    data.funds[0].fund_life = Some(dec!(900));

    let output = run_budget(&data).unwrap();
    assert_eq!(output.result.total_carry, Some(Decimal::ZERO));
    assert!(output.warnings.iter().any(|w| w.contains("numeric range")));
}

#[test]
fn test_higher_fee_rate_never_reduces_revenue() {
    let mut low = platform();
    low.funds[0].fee_rate = dec!(1.5);
    let mut high = platform();
    high.funds[0].fee_rate = dec!(2.5);

    let low = calculate_budget(&low);
    let high = calculate_budget(&high);
    for (l, h) in low.projections.iter().zip(&high.projections) {
        assert!(h.revenue >= l.revenue, "month {}", l.month);
    }
}

#[test]
fn test_invested_basis_steps_down_after_investment_period() {
    let mut fund = Fund::new("fund-i", dec!(100), dec!(2), 2026);
    fund.first_close_percent = Some(dec!(100));
    fund.fee_basis = Some(FeeBasis::Invested);
    fund.investment_period = Some(dec!(2));

    let data = BudgetData {
        starting_cash: dec!(1000000),
        funds: vec![fund],
        team: vec![ExpenseItem::new("Team", dec!(50000))],
        operations: vec![],
        overhead: vec![],
        settings: settings(10, dec!(0)),
    };
    let p = calculate_budget(&data).projections;

    // Nothing deployed at first close, half deployed after a year
    assert_eq!(p[0].revenue, Decimal::ZERO);
    assert!((p[12].revenue - dec!(83333.33)).abs() < dec!(0.01));
    // Declines once the investment period ends, but never below 30%
    assert!(p[60].revenue < p[36].revenue);
    let floor = dec!(2000000) * dec!(0.3) / dec!(12);
    assert!(p[119].revenue >= floor - dec!(0.01));
}

#[test]
fn test_inflation_compounds_annually() {
    let mut data = burn_only(dec!(5000000));
    data.settings = settings(3, dec!(10));
    let p = calculate_budget(&data).projections;
    assert_eq!(p[11].expenses, dec!(50000));
    assert_eq!(p[12].expenses, dec!(55000));
    assert_eq!(p[24].expenses, dec!(60500));
}

#[test]
fn test_carry_timeline_sums_to_total() {
    let results = calculate_budget(&platform());
    let total = results.total_carry.unwrap();
    let spread: Decimal = results
        .carry_timeline
        .unwrap()
        .iter()
        .map(|y| y.amount)
        .sum();
    assert!(total > Decimal::ZERO);
    assert!((spread - total).abs() < dec!(0.001));
}

#[test]
fn test_run_budget_validates_and_warns() {
    let output = run_budget(&burn_only(dec!(100000))).unwrap();
    assert!(output.warnings.iter().any(|w| w.contains("Cash is exhausted")));
    assert!(output.methodology.contains("Cash Projection"));

    let mut bad = burn_only(dec!(100000));
    bad.funds[0].fee_rate = dec!(-1);
    assert!(run_budget(&bad).is_err());
}

// ===========================================================================
// Goal seekers
// ===========================================================================

/// Heavy burn against a fund closing in month 0.
fn launched() -> BudgetData {
    BudgetData {
        starting_cash: dec!(4000000),
        funds: vec![Fund::new("fund-i", dec!(50), dec!(2), 2026)],
        team: vec![ExpenseItem::new("Team", dec!(150000))],
        operations: vec![ExpenseItem::new("Fund Admin", dec!(30000))],
        overhead: vec![ExpenseItem::new("Office", dec!(20000))],
        settings: settings(5, dec!(0)),
    }
}

#[test]
fn test_fund_size_solution_reproduces_target_runway() {
    let data = launched();
    let size = find_fund_size_for_runway(&data, 30, 1).unwrap();

    let mut check = data.clone();
    check.funds[0].size = size;
    let runway = calculate_budget(&check).runway_months.unwrap();
    assert!((29..=31).contains(&runway), "runway {runway} at {size}m");
}

#[test]
fn test_cash_solution_reproduces_target_runway() {
    let data = burn_only(dec!(0));
    let cash = find_cash_for_runway(&data, 12, 1).unwrap();

    let mut check = data.clone();
    check.starting_cash = cash;
    let runway = calculate_budget(&check).runway_months.unwrap();
    assert!((11..=13).contains(&runway), "runway {runway} at {cash}");
}

#[test]
fn test_fund_size_needs_a_fund() {
    let mut data = launched();
    data.funds.clear();
    assert_eq!(find_fund_size_for_runway(&data, 24, 1), None);
    assert!(seek_fund_size(&data, 24, 1).is_err());
}

#[test]
fn test_seek_envelopes() {
    let fund = seek_fund_size(&launched(), 30, 1).unwrap();
    assert_eq!(fund.result.target_months, 30);
    assert!(fund.result.iterations <= 50);

    let cash = seek_starting_cash(&burn_only(dec!(0)), 12, 1).unwrap();
    assert_eq!(cash.result.solution % dec!(10000), Decimal::ZERO);
}

// ===========================================================================
// Formatting
// ===========================================================================

#[test]
fn test_format_helpers() {
    assert_eq!(format_currency(dec!(2500000)), "$2.5M");
    assert_eq!(format_currency(dec!(42000)), "$42K");
    assert_eq!(format_currency(dec!(950)), "$950");
    assert_eq!(format_runway(None), "Infinite");
    assert_eq!(format_runway(Some(18)), "1.5 years");
    assert_eq!(format_runway(Some(24)), "2.0 years");
}
