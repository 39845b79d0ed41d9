//! Treatment cost calculator - Prices a product application over an area.
//!
//! Package sizes are normalized to ounces, a price per ounce is derived, and the
//! application rate (always read as ounces per acre) is multiplied out over the
//! area together with a flat per-acre labor charge. All arithmetic stays in full
//! `f64` precision; only [`format_currency`] rounds.
//!
//! Invalid input is not an error here. When there is nothing sensible to compute
//! the calculator produces no result and any earlier result stays on display.

use crate::{
    core::catalog::Catalog,
    entities::{CostBreakdown, PackageUnit, Product},
};

/// Default labor charge in dollars per acre.
pub const DEFAULT_LABOR_COST_PER_ACRE: f64 = 10.0;

/// Ounces contained in one of the given package unit.
///
/// Units outside the table convert 1:1, i.e. the package size is assumed to
/// already be in ounces.
#[must_use]
pub const fn ounces_per_unit(unit: &PackageUnit) -> f64 {
    match unit {
        PackageUnit::Gallon => 128.0,
        PackageUnit::Quart => 32.0,
        PackageUnit::Pound => 16.0,
        PackageUnit::Ounce | PackageUnit::Other(_) => 1.0,
    }
}

/// Package size of a product expressed in ounces.
#[must_use]
pub fn ounces_per_package(product: &Product) -> f64 {
    product.package_size * ounces_per_unit(&product.package_unit)
}

/// Price of one ounce of product.
#[must_use]
pub fn price_per_ounce(product: &Product) -> f64 {
    product.price / ounces_per_package(product)
}

/// Computes the cost of treating `acres` with `product`.
///
/// `application_rate` is read as ounces per acre regardless of the product's
/// declared rate unit; the catalog only admits "oz/acre" products.
///
/// Returns `None` when `acres` or `application_rate` is not a positive number.
#[must_use]
pub fn calculate(
    product: &Product,
    acres: f64,
    application_rate: f64,
    labor_cost_per_acre: f64,
) -> Option<CostBreakdown> {
    if !is_positive(acres) || !is_positive(application_rate) {
        return None;
    }

    let product_cost_per_acre = price_per_ounce(product) * application_rate;
    let product_cost = product_cost_per_acre * acres;
    let labor_cost = labor_cost_per_acre * acres;
    let total_cost = product_cost + labor_cost;

    Some(CostBreakdown {
        product_cost,
        labor_cost,
        total_cost,
        cost_per_acre: total_cost / acres,
    })
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Formats a dollar amount with two decimals, e.g. `$212.50`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${amount:.2}")
    }
}

/// Multi-line breakdown as shown in the results panel.
#[must_use]
pub fn format_breakdown(result: &CostBreakdown) -> String {
    format!(
        "Product Cost: {}\nLabor Cost: {}\nTotal Cost: {}\nCost Per Acre: {}",
        format_currency(result.product_cost),
        format_currency(result.labor_cost),
        format_currency(result.total_cost),
        format_currency(result.cost_per_acre),
    )
}

/// One user's calculator inputs plus the last result shown to them.
#[derive(Debug, Clone)]
pub struct CalculatorSession {
    selected_product: Option<String>,
    acres: f64,
    application_rate: f64,
    labor_cost_per_acre: f64,
    last_result: Option<CostBreakdown>,
}

impl Default for CalculatorSession {
    fn default() -> Self {
        Self::new(DEFAULT_LABOR_COST_PER_ACRE)
    }
}

impl CalculatorSession {
    /// Creates an empty session with the given default labor rate.
    #[must_use]
    pub const fn new(labor_cost_per_acre: f64) -> Self {
        Self {
            selected_product: None,
            acres: 0.0,
            application_rate: 0.0,
            labor_cost_per_acre,
            last_result: None,
        }
    }

    /// Selects a product. When the selection changes, the application rate is
    /// pre-filled with the product's `rate_min`; re-selecting the current product
    /// keeps the rate as it is.
    pub fn select_product(&mut self, product: &Product) {
        if self.selected_product.as_deref() == Some(product.id.as_str()) {
            return;
        }
        self.selected_product = Some(product.id.clone());
        self.application_rate = product.rate_min;
    }

    /// Clears the product selection.
    pub fn clear_product(&mut self) {
        self.selected_product = None;
    }

    /// Sets the treated area in acres.
    pub const fn set_acres(&mut self, acres: f64) {
        self.acres = acres;
    }

    /// Overrides the application rate (ounces per acre).
    pub const fn set_application_rate(&mut self, rate: f64) {
        self.application_rate = rate;
    }

    /// Overrides the labor charge (dollars per acre).
    pub const fn set_labor_cost_per_acre(&mut self, labor: f64) {
        self.labor_cost_per_acre = labor;
    }

    /// Id of the selected product, if any.
    #[must_use]
    pub fn selected_product(&self) -> Option<&str> {
        self.selected_product.as_deref()
    }

    /// Current area input.
    #[must_use]
    pub const fn acres(&self) -> f64 {
        self.acres
    }

    /// Current application rate input.
    #[must_use]
    pub const fn application_rate(&self) -> f64 {
        self.application_rate
    }

    /// Current labor charge input.
    #[must_use]
    pub const fn labor_cost_per_acre(&self) -> f64 {
        self.labor_cost_per_acre
    }

    /// Result currently on display.
    #[must_use]
    pub const fn last_result(&self) -> Option<&CostBreakdown> {
        self.last_result.as_ref()
    }

    /// Runs the calculation against the current inputs.
    ///
    /// Returns the freshly computed breakdown, or `None` when nothing was computed
    /// (no product selected, selected product missing from `catalog`, or a
    /// non-positive area or rate). The displayed result only changes on success.
    pub fn calculate(&mut self, catalog: &Catalog) -> Option<CostBreakdown> {
        let product = catalog.get(self.selected_product.as_deref()?)?;
        let result = calculate(
            product,
            self.acres,
            self.application_rate,
            self.labor_cost_per_acre,
        )?;
        self.last_result = Some(result);
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{entities::ProductType, test_utils::*};
    use approx::assert_relative_eq;

    #[test]
    fn test_roundup_reference_breakdown() {
        let catalog = seeded_catalog();
        let roundup = catalog.get("1").unwrap();

        assert_eq!(price_per_ounce(roundup), 0.351_562_5);

        let result = calculate(roundup, 10.0, 32.0, 10.0).unwrap();
        assert_eq!(result.product_cost, 112.5);
        assert_eq!(result.labor_cost, 100.0);
        assert_eq!(result.total_cost, 212.5);
        assert_eq!(result.cost_per_acre, 21.25);
    }

    #[test]
    fn test_conversion_table() {
        assert_eq!(ounces_per_unit(&PackageUnit::Gallon), 128.0);
        assert_eq!(ounces_per_unit(&PackageUnit::Quart), 32.0);
        assert_eq!(ounces_per_unit(&PackageUnit::Pound), 16.0);
        assert_eq!(ounces_per_unit(&PackageUnit::Ounce), 1.0);
    }

    #[test]
    fn test_unknown_unit_falls_back_to_ounces() {
        let mut product = sample_product("x", ProductType::Herbicide);
        product.package_unit = PackageUnit::Other("Jug".to_string());
        product.package_size = 64.0;
        assert_eq!(ounces_per_package(&product), 64.0);
    }

    #[test]
    fn test_price_per_ounce_scales_inversely_with_unit() {
        let mut product = sample_product("x", ProductType::Herbicide);
        product.price = 128.0;
        product.package_size = 1.0;

        for (unit, ounces) in [
            (PackageUnit::Gallon, 128.0),
            (PackageUnit::Quart, 32.0),
            (PackageUnit::Pound, 16.0),
            (PackageUnit::Ounce, 1.0),
        ] {
            product.package_unit = unit;
            assert_relative_eq!(price_per_ounce(&product), 128.0 / ounces);
        }
    }

    #[test]
    fn test_total_cost_is_linear_in_acres() {
        let catalog = seeded_catalog();
        for product in &catalog {
            let single = calculate(product, 7.5, product.rate_max, 12.0).unwrap();
            let double = calculate(product, 15.0, product.rate_max, 12.0).unwrap();
            assert_relative_eq!(double.total_cost, 2.0 * single.total_cost);
            assert_relative_eq!(double.cost_per_acre, single.cost_per_acre);
        }
    }

    #[test]
    fn test_guards_produce_no_result() {
        let product = sample_product("x", ProductType::Herbicide);
        assert!(calculate(&product, 0.0, 10.0, 10.0).is_none());
        assert!(calculate(&product, -5.0, 10.0, 10.0).is_none());
        assert!(calculate(&product, 5.0, 0.0, 10.0).is_none());
        assert!(calculate(&product, 5.0, -1.0, 10.0).is_none());
        assert!(calculate(&product, f64::NAN, 10.0, 10.0).is_none());
        assert!(calculate(&product, 5.0, f64::NAN, 10.0).is_none());
    }

    #[test]
    fn test_zero_labor_is_allowed() {
        let product = sample_product("x", ProductType::Herbicide);
        let result = calculate(&product, 2.0, 8.0, 0.0).unwrap();
        assert_eq!(result.labor_cost, 0.0);
        assert_eq!(result.total_cost, result.product_cost);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(212.5), "$212.50");
        assert_eq!(format_currency(0.351_562_5), "$0.35");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(-3.5), "-$3.50");
    }

    #[test]
    fn test_format_breakdown() {
        let catalog = seeded_catalog();
        let result = calculate(catalog.get("1").unwrap(), 10.0, 32.0, 10.0).unwrap();
        assert_eq!(
            format_breakdown(&result),
            "Product Cost: $112.50\nLabor Cost: $100.00\nTotal Cost: $212.50\nCost Per Acre: $21.25"
        );
    }

    #[test]
    fn test_session_prefills_rate_from_product() {
        let catalog = seeded_catalog();
        let mut session = CalculatorSession::default();
        session.select_product(catalog.get("2").unwrap());
        assert_eq!(session.application_rate(), 29.0);
        assert_eq!(session.labor_cost_per_acre(), DEFAULT_LABOR_COST_PER_ACRE);

        session.set_application_rate(40.0);
        session.select_product(catalog.get("3").unwrap());
        assert_eq!(session.application_rate(), 1.28);
    }

    #[test]
    fn test_reselecting_same_product_keeps_rate() {
        let catalog = seeded_catalog();
        let roundup = catalog.get("1").unwrap();
        let mut session = CalculatorSession::default();

        session.select_product(roundup);
        session.set_application_rate(32.0);
        session.select_product(roundup);
        assert_eq!(session.application_rate(), 32.0);

        session.set_acres(10.0);
        assert_eq!(session.calculate(&catalog).unwrap().total_cost, 212.5);
    }

    #[test]
    fn test_session_without_product_is_noop() {
        let catalog = seeded_catalog();
        let mut session = CalculatorSession::default();
        session.set_acres(10.0);
        assert!(session.calculate(&catalog).is_none());
        assert!(session.last_result().is_none());
    }

    #[test]
    fn test_session_keeps_prior_result_on_invalid_input() {
        let catalog = seeded_catalog();
        let mut session = CalculatorSession::default();
        session.select_product(catalog.get("1").unwrap());
        session.set_application_rate(32.0);
        session.set_acres(10.0);

        let first = session.calculate(&catalog).unwrap();
        assert_eq!(first.total_cost, 212.5);

        session.set_acres(0.0);
        assert!(session.calculate(&catalog).is_none());
        assert_eq!(session.last_result(), Some(&first));

        session.set_acres(20.0);
        let second = session.calculate(&catalog).unwrap();
        assert_eq!(second.total_cost, 425.0);
        assert_eq!(session.last_result(), Some(&second));
    }
}
