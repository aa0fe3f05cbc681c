use serde::{Deserialize, Serialize};

use crate::error::{BlendError, Result};

/// Default maximum number of formulas in a mix.
pub const DEFAULT_MAX_FORMULAS: u32 = 5;

/// Default maximum number of solutions in a mix.
pub const DEFAULT_MAX_SOLUTIONS: u32 = 5;

/// Default minimum volume to draw from an opened bottle, in mL.
pub const DEFAULT_MIN_DRAW: f64 = 10.0;

/// Scalar knobs that shape the model, fixed at model construction.
///
/// The waste and priority-penalty ceilings are hard caps, not soft penalties;
/// a request that cannot fit under them is infeasible rather than relaxed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limits {
    /// Max number of formulas used (Mmax).
    pub max_formulas: u32,

    /// Max number of solutions used (Cmax).
    pub max_solutions: u32,

    /// Min volume to draw from any opened item (Vmin, mL); clipped per item
    /// to the item's own bottle volume when the bottle is smaller.
    pub min_draw: f64,

    /// Max tolerated total formula waste (Smax, mL).
    pub max_waste: f64,

    /// Max tolerated priority penalty (Dmax).
    pub max_priority_penalty: f64,
}

impl Limits {
    /// Limits with the waste and penalty ceilings derived from the formula
    /// cap: 500 mL of tolerated waste per formula, plus 500 mL of slack.
    pub fn new(max_formulas: u32, max_solutions: u32, min_draw: f64) -> Self {
        Self {
            max_formulas,
            max_solutions,
            min_draw,
            max_waste: derived_ceiling(max_formulas),
            max_priority_penalty: derived_ceiling(max_formulas),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_draw < 0.0 {
            return Err(BlendError::InvalidLimit(format!(
                "min_draw {} is negative",
                self.min_draw
            )));
        }
        if self.max_waste < 0.0 {
            return Err(BlendError::InvalidLimit(format!(
                "max_waste {} is negative",
                self.max_waste
            )));
        }
        if self.max_priority_penalty < 0.0 {
            return Err(BlendError::InvalidLimit(format!(
                "max_priority_penalty {} is negative",
                self.max_priority_penalty
            )));
        }
        Ok(())
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FORMULAS, DEFAULT_MAX_SOLUTIONS, DEFAULT_MIN_DRAW)
    }
}

fn derived_ceiling(max_formulas: u32) -> f64 {
    f64::from(max_formulas) * 500.0 + 500.0
}
