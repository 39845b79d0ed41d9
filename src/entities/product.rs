//! Product entity - One purchasable crop-protection treatment.
//!
//! Products are read-only catalog records. They carry enough commercial data
//! (price and package size) and application data (recommended rate range) for
//! the cost calculator to price a treatment per acre.

use serde::{Deserialize, Serialize};
use std::{convert::Infallible, fmt, str::FromStr};

/// The only application-rate unit the calculator understands.
pub const OUNCES_PER_ACRE: &str = "oz/acre";

/// Product classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    /// Weed control
    Herbicide,
    /// Insect control
    Insecticide,
    /// Disease control
    Fungicide,
    /// Certified-organic treatment of any kind
    #[serde(rename = "Organic Alternative")]
    OrganicAlternative,
}

impl ProductType {
    /// All product types in display order.
    pub const ALL: [Self; 4] = [
        Self::Herbicide,
        Self::Insecticide,
        Self::Fungicide,
        Self::OrganicAlternative,
    ];

    /// Human-readable label used in listings and filters.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Herbicide => "Herbicide",
            Self::Insecticide => "Insecticide",
            Self::Fungicide => "Fungicide",
            Self::OrganicAlternative => "Organic Alternative",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown product type '{wanted}'"))
    }
}

/// Commercial unit a product is sold in.
///
/// Labels outside the conversion table are kept as [`PackageUnit::Other`]
/// rather than rejected; the calculator treats them as ounces.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PackageUnit {
    /// US liquid gallon
    Gallon,
    /// US liquid quart
    Quart,
    /// Avoirdupois pound
    Pound,
    /// Ounce
    Ounce,
    /// Any other unit label
    Other(String),
}

impl PackageUnit {
    /// Label as shown next to a package size, e.g. "2.5 Gallon".
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Gallon => "Gallon",
            Self::Quart => "Quart",
            Self::Pound => "Pound",
            Self::Ounce => "Ounce",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for PackageUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PackageUnit {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s.trim().to_ascii_lowercase().as_str() {
            "gallon" => Self::Gallon,
            "quart" => Self::Quart,
            "pound" => Self::Pound,
            "ounce" => Self::Ounce,
            _ => Self::Other(s.trim().to_string()),
        };
        Ok(unit)
    }
}

impl From<String> for PackageUnit {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(unit) => unit,
            Err(never) => match never {},
        }
    }
}

impl From<PackageUnit> for String {
    fn from(value: PackageUnit) -> Self {
        value.label().to_string()
    }
}

/// A purchasable treatment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier
    pub id: String,
    /// Trade name (e.g., "Roundup PowerMAX 3")
    pub name: String,
    /// Manufacturer or brand owner
    pub manufacturer: String,
    /// Classification; authoritative for [`Product::is_organic`]
    pub product_type: ProductType,
    /// Free-text active ingredient
    pub active_ingredient: String,
    /// Crops the label allows this product on
    pub crops: Vec<String>,
    /// Package price in USD
    pub price: f64,
    /// Amount per package, in `package_unit`
    pub package_size: f64,
    /// Unit of `package_size`
    pub package_unit: PackageUnit,
    /// Lowest recommended application rate
    pub rate_min: f64,
    /// Highest recommended application rate
    pub rate_max: f64,
    /// Unit label for the rate range (only "oz/acre" passes catalog validation)
    pub rate_unit: String,
}

impl Product {
    /// Whether this product is an organic alternative.
    #[must_use]
    pub fn is_organic(&self) -> bool {
        self.product_type == ProductType::OrganicAlternative
    }

    /// Whether the given crop is on this product's label (exact match).
    #[must_use]
    pub fn applies_to(&self, crop: &str) -> bool {
        self.crops.iter().any(|c| c == crop)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_product_type_parse_is_case_insensitive() {
        assert_eq!(
            "organic alternative".parse::<ProductType>().unwrap(),
            ProductType::OrganicAlternative
        );
        assert_eq!(
            " Fungicide ".parse::<ProductType>().unwrap(),
            ProductType::Fungicide
        );
        assert!("Rodenticide".parse::<ProductType>().is_err());
    }

    #[test]
    fn test_package_unit_unknown_label_is_kept() {
        let unit: PackageUnit = "Liter".parse().unwrap();
        assert_eq!(unit, PackageUnit::Other("Liter".to_string()));
        assert_eq!(unit.to_string(), "Liter");
        assert_eq!("QUART".parse::<PackageUnit>().unwrap(), PackageUnit::Quart);
    }

    #[test]
    fn test_package_unit_serde_uses_labels() {
        let json = serde_json::to_string(&PackageUnit::Gallon).unwrap();
        assert_eq!(json, "\"Gallon\"");
        let back: PackageUnit = serde_json::from_str("\"Bushel\"").unwrap();
        assert_eq!(back, PackageUnit::Other("Bushel".to_string()));
    }

    #[test]
    fn test_is_organic_follows_type() {
        let mut product = crate::test_utils::sample_product("x", ProductType::Herbicide);
        assert!(!product.is_organic());
        product.product_type = ProductType::OrganicAlternative;
        assert!(product.is_organic());
    }
}
