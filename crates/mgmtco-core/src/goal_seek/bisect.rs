//! Bounded bisection over a scalar input.
//!
//! The probe must be monotonic: once a candidate is `TooHigh`, every larger
//! candidate is too. Nothing here checks that; a non-monotonic probe makes
//! the search silently converge on the wrong bracket.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Verdict on one candidate input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// Candidate is too small; search above it
    TooLow,
    /// Candidate is too large; search below it
    TooHigh,
    /// Candidate satisfies the target
    OnTarget,
}

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The probe accepted a midpoint
    OnTarget,
    /// The bracket narrowed to the minimum width
    BracketCollapsed,
    /// The iteration budget ran out
    IterationsExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BisectOutcome {
    /// Accepted midpoint, or the final bracket midpoint
    pub value: Decimal,
    /// Number of probe evaluations
    pub iterations: u32,
    pub termination: Termination,
}

/// Halve `[lo, hi]` until the probe accepts a midpoint, the bracket is no
/// wider than `min_width`, or `max_iterations` probes have run.
///
/// Non-convergence is not an error: the midpoint of the last bracket is
/// returned as a best estimate.
pub fn bisect<F>(
    mut lo: Decimal,
    mut hi: Decimal,
    min_width: Decimal,
    max_iterations: u32,
    mut probe: F,
) -> BisectOutcome
where
    F: FnMut(Decimal) -> Probe,
{
    let mut iterations = 0;

    while iterations < max_iterations {
        if hi - lo <= min_width {
            return BisectOutcome {
                value: (lo + hi) / dec!(2),
                iterations,
                termination: Termination::BracketCollapsed,
            };
        }

        let mid = (lo + hi) / dec!(2);
        iterations += 1;

        match probe(mid) {
            Probe::OnTarget => {
                return BisectOutcome {
                    value: mid,
                    iterations,
                    termination: Termination::OnTarget,
                }
            }
            Probe::TooLow => lo = mid,
            Probe::TooHigh => hi = mid,
        }
    }

    BisectOutcome {
        value: (lo + hi) / dec!(2),
        iterations,
        termination: Termination::IterationsExhausted,
    }
}
