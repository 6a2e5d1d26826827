pub mod error;
pub mod format;
pub mod types;

pub mod carry;
pub mod expenses;
pub mod fees;
pub mod goal_seek;
pub mod model;
pub mod projection;

#[cfg(feature = "scenarios")]
pub mod scenarios;

pub use error::MgmtCoError;
pub use format::{format_currency, format_runway};
pub use goal_seek::runway::{find_cash_for_runway, find_fund_size_for_runway};
pub use model::*;
pub use projection::engine::{calculate_budget, run_budget};
pub use types::*;

/// Standard result type for all management-company budget operations
pub type MgmtCoResult<T> = Result<T, MgmtCoError>;
