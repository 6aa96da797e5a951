//! Tuning knobs for the price auction.

use serde::{Deserialize, Serialize};

use super::*;

/// Iteration cap used when none is given.
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// Relative tolerance for floating point comparisons. It is scaled by the
/// magnitude of the valuations, see [`Valuations::epsilon`].
pub const DEFAULT_TOLERANCE: Money = 1e-9;

/// Configuration of a [`PriceAuction`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuctionConfig {
    /// Number of price updates after which the auction gives up.
    pub max_iterations: usize,
    /// Relative tolerance used for demand ties and affordability.
    pub tolerance: Money,
}

impl AuctionConfig {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..Self::default()
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Money) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}
