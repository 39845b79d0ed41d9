//! Cost breakdown - Output of one cost calculation.
//!
//! Values keep full `f64` precision; rounding to cents happens only when formatting.

use serde::{Deserialize, Serialize};

/// Ephemeral result of one calculator run. Never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Total product cost over the whole area
    pub product_cost: f64,
    /// Total labor cost over the whole area
    pub labor_cost: f64,
    /// Product plus labor
    pub total_cost: f64,
    /// Total cost divided by area
    pub cost_per_acre: f64,
}
