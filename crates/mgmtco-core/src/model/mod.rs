pub mod budget;
pub mod fund;
pub mod results;

pub use budget::{BudgetData, ExpenseItem, ResolvedSettings, Settings};
pub use fund::{FeeBasis, Fund, ResolvedFund};
pub use results::{BudgetResults, CarryYear, MonthlyProjection};
