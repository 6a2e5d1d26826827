use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use mgmtco_core::model::budget::BudgetData;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_budget(budget_json: &str) -> NapiResult<BudgetData> {
    serde_json::from_str(budget_json).map_err(to_napi_error)
}

fn to_js_number(value: Decimal) -> NapiResult<f64> {
    value
        .to_f64()
        .ok_or_else(|| to_napi_error(format!("{value} is not representable as a number")))
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Raw projection results, no validation.
#[napi]
pub fn calculate_budget(budget_json: String) -> NapiResult<String> {
    let data = parse_budget(&budget_json)?;
    let results = mgmtco_core::projection::engine::calculate_budget(&data);
    serde_json::to_string(&results).map_err(to_napi_error)
}

/// Validated projection wrapped with methodology and warnings.
#[napi]
pub fn run_budget(budget_json: String) -> NapiResult<String> {
    let data = parse_budget(&budget_json)?;
    let output = mgmtco_core::projection::engine::run_budget(&data).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Goal seeking
// ---------------------------------------------------------------------------

/// First fund's size in millions, or null when the budget has no funds.
#[napi]
pub fn find_fund_size_for_runway(
    budget_json: String,
    target_months: u32,
    tolerance: Option<u32>,
) -> NapiResult<Option<f64>> {
    let data = parse_budget(&budget_json)?;
    let tolerance = tolerance.unwrap_or(mgmtco_core::goal_seek::runway::DEFAULT_TOLERANCE_MONTHS);
    mgmtco_core::find_fund_size_for_runway(&data, target_months, tolerance)
        .map(to_js_number)
        .transpose()
}

#[napi]
pub fn find_cash_for_runway(
    budget_json: String,
    target_months: u32,
    tolerance: Option<u32>,
) -> NapiResult<Option<f64>> {
    let data = parse_budget(&budget_json)?;
    let tolerance = tolerance.unwrap_or(mgmtco_core::goal_seek::runway::DEFAULT_TOLERANCE_MONTHS);
    mgmtco_core::find_cash_for_runway(&data, target_months, tolerance)
        .map(to_js_number)
        .transpose()
}

#[napi]
pub fn seek_fund_size(budget_json: String, target_months: u32, tolerance: Option<u32>) -> NapiResult<String> {
    let data = parse_budget(&budget_json)?;
    let tolerance = tolerance.unwrap_or(mgmtco_core::goal_seek::runway::DEFAULT_TOLERANCE_MONTHS);
    let output = mgmtco_core::goal_seek::runway::seek_fund_size(&data, target_months, tolerance)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn seek_starting_cash(budget_json: String, target_months: u32, tolerance: Option<u32>) -> NapiResult<String> {
    let data = parse_budget(&budget_json)?;
    let tolerance = tolerance.unwrap_or(mgmtco_core::goal_seek::runway::DEFAULT_TOLERANCE_MONTHS);
    let output = mgmtco_core::goal_seek::runway::seek_starting_cash(&data, target_months, tolerance)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[napi]
pub fn budget_sensitivity(input_json: String) -> NapiResult<String> {
    let input: mgmtco_core::scenarios::sensitivity::BudgetSensitivityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mgmtco_core::scenarios::sensitivity::run_budget_sensitivity(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_scenarios(input_json: String) -> NapiResult<String> {
    let input: mgmtco_core::scenarios::compare::ScenarioComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        mgmtco_core::scenarios::compare::compare_scenarios(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

#[napi]
pub fn format_currency(value: f64) -> NapiResult<String> {
    let amount = Decimal::try_from(value).map_err(to_napi_error)?;
    Ok(mgmtco_core::format_currency(amount))
}

/// `months` of null means cash is never exhausted.
#[napi]
pub fn format_runway(months: Option<u32>) -> String {
    mgmtco_core::format_runway(months)
}
