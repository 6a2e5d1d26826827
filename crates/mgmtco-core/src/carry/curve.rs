//! Carry realization curves.
//!
//! A curve is an ordered table of (year offset from first close, weight)
//! pairs describing when a fund's carried interest is paid out. The engine
//! never hard-codes the shape: it walks whatever table it is handed.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MgmtCoError;
use crate::types::Rate;
use crate::MgmtCoResult;

/// Late-life realization pattern typical of PE/VC funds: nothing before
/// year 5, the bulk in years 7-9.
const STANDARD_REALIZATION: [(u32, Rate); 6] = [
    (5, dec!(0.05)),
    (6, dec!(0.10)),
    (7, dec!(0.20)),
    (8, dec!(0.25)),
    (9, dec!(0.25)),
    (10, dec!(0.15)),
];

/// Share of total carry realized in one year of the fund's life.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RealizationPoint {
    /// Years after the fund's first close
    pub year_offset: u32,
    /// Fraction of total carry realized in that year
    pub weight: Rate,
}

/// Ordered realization table. Serializes as a bare list of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RealizationCurve {
    points: Vec<RealizationPoint>,
}

impl RealizationCurve {
    pub fn new(points: Vec<RealizationPoint>) -> Self {
        RealizationCurve { points }
    }

    /// Standard six-year curve anchored at first close + 5 years.
    pub fn standard() -> Self {
        RealizationCurve {
            points: STANDARD_REALIZATION
                .iter()
                .map(|&(year_offset, weight)| RealizationPoint { year_offset, weight })
                .collect(),
        }
    }

    pub fn points(&self) -> &[RealizationPoint] {
        &self.points
    }

    pub fn total_weight(&self) -> Rate {
        self.points.iter().map(|p| p.weight).sum()
    }

    pub fn validate(&self) -> MgmtCoResult<()> {
        if self.points.is_empty() {
            return Err(MgmtCoError::InvalidInput {
                field: "settings.realization_curve".into(),
                reason: "Realization curve needs at least one point".into(),
            });
        }
        if self.points.iter().any(|p| p.weight < Decimal::ZERO) {
            return Err(MgmtCoError::InvalidInput {
                field: "settings.realization_curve".into(),
                reason: "Realization weights cannot be negative".into(),
            });
        }
        Ok(())
    }
}

impl Default for RealizationCurve {
    fn default() -> Self {
        Self::standard()
    }
}
