use serde::{Deserialize, Serialize};

use crate::types::Money;

/// One simulated month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProjection {
    /// 1-based month index
    pub month: u32,
    /// Calendar year the month falls in
    pub year: i32,
    /// Display label, e.g. "Mar 2027"
    pub label: String,
    pub revenue: Money,
    pub expenses: Money,
    pub net_cash_flow: Money,
    /// Running cash balance, floored at zero for display
    pub cash_balance: Money,
}

/// Carried interest realized in a calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarryYear {
    pub year: i32,
    pub amount: Money,
}

/// Output of a projection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetResults {
    /// Month-0 expenses (before any inflation)
    pub monthly_burn: Money,
    /// Monthly burn annualized
    pub annual_budget: Money,
    /// Annual fees with every fund fully raised (ignores the ramp)
    pub annual_revenue: Money,
    /// First month (1-based) in which revenue covers expenses
    pub break_even_month: Option<u32>,
    /// First month (1-based) in which cash runs out
    pub runway_months: Option<u32>,
    /// Starting capital needed to stay solvent until revenue first covers expenses
    pub seed_capital_needed: Money,
    pub projections: Vec<MonthlyProjection>,
    /// Month-0 team cost
    pub team_cost: Money,
    /// Month-0 operations cost
    pub operations_cost: Money,
    /// Month-0 overhead cost
    pub overhead_cost: Money,
    /// Estimated carry across funds with a target return above 1.0x
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_carry: Option<Money>,
    /// Carry by realization year, ascending
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carry_timeline: Option<Vec<CarryYear>>,
}

impl BudgetResults {
    /// Displayed cash balance at the end of the horizon.
    pub fn ending_cash(&self) -> Money {
        self.projections
            .last()
            .map(|p| p.cash_balance)
            .unwrap_or_default()
    }
}
