//! Price comparison filtering.
//!
//! A filter is a conjunction of a product-type predicate, a crop predicate, and a
//! case-insensitive search over name and manufacturer. Filtering is a linear scan
//! that keeps catalog order.

use crate::{
    core::{calculator::format_currency, catalog::Catalog},
    entities::{Product, ProductType},
};
use std::fmt;

/// Sentinel label meaning "do not filter on this field".
pub const ALL: &str = "All";

/// Product-type predicate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TypeFilter {
    /// Any type
    #[default]
    All,
    /// Only this type
    Only(ProductType),
}

impl TypeFilter {
    /// Parses user input; empty input or "All" (any case) is the sentinel.
    ///
    /// # Errors
    /// Returns a message naming the unknown type.
    pub fn parse(input: &str) -> Result<Self, String> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
            Ok(Self::All)
        } else {
            trimmed.parse().map(Self::Only)
        }
    }

    /// Whether the product passes this predicate.
    #[must_use]
    pub fn matches(self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => product.product_type == wanted,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(t) => t.fmt(f),
        }
    }
}

/// Crop predicate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CropFilter {
    /// Any crop
    #[default]
    All,
    /// Products labelled for this crop (exact name)
    Only(String),
}

impl CropFilter {
    /// Parses user input; empty input or "All" (any case) is the sentinel.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
            Self::All
        } else {
            Self::Only(trimmed.to_string())
        }
    }

    /// Whether the product passes this predicate.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(crop) => product.applies_to(crop),
        }
    }
}

impl fmt::Display for CropFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(crop) => f.write_str(crop),
        }
    }
}

/// The full set of comparison filters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Product-type predicate
    pub product_type: TypeFilter,
    /// Crop predicate
    pub crop: CropFilter,
    search: String,
}

impl ProductFilter {
    /// Builds a filter. The search text is matched case-insensitively.
    #[must_use]
    pub fn new(product_type: TypeFilter, crop: CropFilter, search: &str) -> Self {
        Self {
            product_type,
            crop,
            search: search.to_lowercase(),
        }
    }

    /// Lower-cased search text.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Whether the filter lets everything through.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.product_type == TypeFilter::All && self.crop == CropFilter::All && self.search.is_empty()
    }

    /// Whether the product passes all three predicates.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.product_type.matches(product)
            && self.crop.matches(product)
            && (product.name.to_lowercase().contains(&self.search)
                || product.manufacturer.to_lowercase().contains(&self.search))
    }

    /// Lazily yields matching products in catalog order.
    ///
    /// The iterator is cheap to clone, so callers can restart it (e.g. to count
    /// and then render).
    pub fn apply<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = &'a Product> + Clone {
        catalog.iter().filter(move |p| self.matches(p))
    }
}

/// Recommended rate range, e.g. `20-32 oz/acre`.
#[must_use]
pub fn format_rate(product: &Product) -> String {
    format!(
        "{}-{} {}",
        product.rate_min, product.rate_max, product.rate_unit
    )
}

/// Package price, e.g. `$45.00 / 1 Gallon`.
#[must_use]
pub fn format_price(product: &Product) -> String {
    format!(
        "{} / {} {}",
        format_currency(product.price),
        product.package_size,
        product.package_unit
    )
}
