//! Management-fee ramp.
//!
//! Approximates how fee income builds as a fund raises capital between first
//! and final close and, on an invested-capital basis, as that capital is
//! deployed and later returned. It is a smooth proxy, not a cash-flow model
//! of the underlying fund.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::model::fund::{FeeBasis, ResolvedFund};
use crate::types::{Money, Rate};

/// Floor on the post-investment-period fee multiplier (invested basis).
pub const POST_INVESTMENT_FEE_FLOOR: Rate = dec!(0.3);

/// Annual step-down of the invested basis after the investment period,
/// standing in for capital returned to LPs as deals are realized.
pub const POST_INVESTMENT_ANNUAL_DECAY: Rate = dec!(0.15);

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Fraction of commitments raised `months` after first close.
///
/// Linear from the first-close share at month 0 to 100% at the final close.
pub fn capital_raised_fraction(fund: &ResolvedFund, months: i64) -> Rate {
    if months < 0 {
        return Decimal::ZERO;
    }
    if months >= i64::from(fund.final_close_month) {
        return Decimal::ONE;
    }

    let progress = Decimal::from(months) / Decimal::from(fund.final_close_month);
    fund.first_close_fraction + (Decimal::ONE - fund.first_close_fraction) * progress
}

/// Share of raised capital that carries fees on an invested basis.
fn invested_basis_factor(fund: &ResolvedFund, months: i64) -> Rate {
    let elapsed = Decimal::from(months);
    let investment_months = fund.investment_period * MONTHS_PER_YEAR;

    if elapsed < investment_months {
        // Linear deployment over the investment period
        (elapsed / investment_months).min(Decimal::ONE)
    } else {
        let years_post_investment = (elapsed - investment_months) / MONTHS_PER_YEAR;
        (Decimal::ONE - POST_INVESTMENT_ANNUAL_DECAY * years_post_investment)
            .max(POST_INVESTMENT_FEE_FLOOR)
    }
}

/// Fraction of the maximum annual fee earned in a month, in [0, 1].
pub fn fee_multiplier(fund: &ResolvedFund, months_from_first_close: i64) -> Rate {
    if months_from_first_close < 0 {
        return Decimal::ZERO;
    }

    let raised = capital_raised_fraction(fund, months_from_first_close);
    match fund.fee_basis {
        FeeBasis::Committed => raised,
        FeeBasis::Invested => raised * invested_basis_factor(fund, months_from_first_close),
    }
}

/// Fee revenue a fund contributes in one month.
pub fn monthly_fee_revenue(fund: &ResolvedFund, months_from_first_close: i64) -> Money {
    fund.steady_state_annual_fee() * fee_multiplier(fund, months_from_first_close)
        / MONTHS_PER_YEAR
}
