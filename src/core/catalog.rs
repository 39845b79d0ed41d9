//! Product catalog - The fixed, in-memory list of treatments.
//!
//! The catalog is built once at startup, checked against its invariants, and then
//! shared read-only by the calculator and the comparison view. Nothing mutates it
//! at runtime.

use crate::{
    entities::{OUNCES_PER_ACRE, PackageUnit, Product, ProductType},
    errors::{Error, Result},
};
use std::collections::{BTreeSet, HashSet};

/// Immutable, validated product list in insertion order.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Builds a catalog after checking every record.
    ///
    /// # Errors
    /// Returns [`Error::InvalidProduct`] for the first record that has a duplicate id,
    /// an empty name, a negative or non-finite price, a non-positive package size,
    /// an inverted or non-positive rate range, or a rate unit other than "oz/acre".
    pub fn new(products: Vec<Product>) -> Result<Self> {
        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(product.id.as_str()) {
                return Err(invalid(product, "duplicate id"));
            }
            validate_product(product)?;
        }
        Ok(Self { products })
    }

    /// The built-in catalog.
    ///
    /// # Errors
    /// Only fails if the built-in data itself is inconsistent.
    pub fn seeded() -> Result<Self> {
        Self::new(seed_products())
    }

    /// Looks up a product by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Looks up a product by name, ignoring case.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Product> {
        let wanted = name.trim();
        self.products
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(wanted))
    }

    /// Resolves user input that may be either an id or a product name.
    ///
    /// # Errors
    /// Returns [`Error::ProductNotFound`] when neither matches.
    pub fn resolve(&self, id_or_name: &str) -> Result<&Product> {
        self.get(id_or_name.trim())
            .or_else(|| self.find_by_name(id_or_name))
            .ok_or_else(|| Error::ProductNotFound {
                id: id_or_name.to_string(),
            })
    }

    /// All products in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Conventional (non-organic) products, in catalog order.
    pub fn chemical(&self) -> impl Iterator<Item = &Product> + Clone {
        self.products.iter().filter(|p| !p.is_organic())
    }

    /// Organic alternatives, in catalog order.
    pub fn organic(&self) -> impl Iterator<Item = &Product> + Clone {
        self.products.iter().filter(|p| p.is_organic())
    }

    /// Every crop mentioned by any product, sorted and de-duplicated.
    #[must_use]
    pub fn crop_options(&self) -> Vec<String> {
        self.products
            .iter()
            .flat_map(|p| p.crops.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Product types available for filtering.
    #[must_use]
    pub const fn type_options(&self) -> [ProductType; 4] {
        ProductType::ALL
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn invalid(product: &Product, reason: &str) -> Error {
    Error::InvalidProduct {
        id: product.id.clone(),
        reason: reason.to_string(),
    }
}

fn validate_product(product: &Product) -> Result<()> {
    if product.name.trim().is_empty() {
        return Err(invalid(product, "name cannot be empty"));
    }
    if !product.price.is_finite() || product.price < 0.0 {
        return Err(invalid(product, "price must be a non-negative number"));
    }
    if !product.package_size.is_finite() || product.package_size <= 0.0 {
        return Err(invalid(product, "package size must be positive"));
    }
    if !product.rate_min.is_finite() || !product.rate_max.is_finite() {
        return Err(invalid(product, "rate range must be finite"));
    }
    if !(product.rate_min > 0.0 && product.rate_min <= product.rate_max) {
        return Err(invalid(product, "rate range must satisfy 0 < min <= max"));
    }
    if product.rate_unit != OUNCES_PER_ACRE {
        return Err(invalid(
            product,
            &format!(
                "rate unit '{}' is not supported, expected '{OUNCES_PER_ACRE}'",
                product.rate_unit
            ),
        ));
    }
    Ok(())
}

struct Seed {
    id: &'static str,
    name: &'static str,
    manufacturer: &'static str,
    product_type: ProductType,
    active_ingredient: &'static str,
    crops: &'static [&'static str],
    price: f64,
    package_size: f64,
    package_unit: PackageUnit,
    rate_min: f64,
    rate_max: f64,
}

impl From<Seed> for Product {
    fn from(seed: Seed) -> Self {
        Self {
            id: seed.id.to_string(),
            name: seed.name.to_string(),
            manufacturer: seed.manufacturer.to_string(),
            product_type: seed.product_type,
            active_ingredient: seed.active_ingredient.to_string(),
            crops: seed.crops.iter().map(|c| (*c).to_string()).collect(),
            price: seed.price,
            package_size: seed.package_size,
            package_unit: seed.package_unit,
            rate_min: seed.rate_min,
            rate_max: seed.rate_max,
            rate_unit: OUNCES_PER_ACRE.to_string(),
        }
    }
}

fn seed_products() -> Vec<Product> {
    [
        Seed {
            id: "1",
            name: "Roundup PowerMAX 3",
            manufacturer: "Bayer",
            product_type: ProductType::Herbicide,
            active_ingredient: "Glyphosate",
            crops: &["Corn", "Soybeans", "Cotton"],
            price: 45.00,
            package_size: 1.0,
            package_unit: PackageUnit::Gallon,
            rate_min: 20.0,
            rate_max: 32.0,
        },
        Seed {
            id: "2",
            name: "Liberty 280 SL",
            manufacturer: "BASF",
            product_type: ProductType::Herbicide,
            active_ingredient: "Glufosinate",
            crops: &["Corn", "Soybeans", "Cotton"],
            price: 65.00,
            package_size: 2.5,
            package_unit: PackageUnit::Gallon,
            rate_min: 29.0,
            rate_max: 43.0,
        },
        Seed {
            id: "3",
            name: "Warrior II",
            manufacturer: "Syngenta",
            product_type: ProductType::Insecticide,
            active_ingredient: "Lambda-cyhalothrin",
            crops: &["Corn", "Wheat", "Rice"],
            price: 380.00,
            package_size: 1.0,
            package_unit: PackageUnit::Gallon,
            rate_min: 1.28,
            rate_max: 1.92,
        },
        Seed {
            id: "4",
            name: "Headline AMP",
            manufacturer: "BASF",
            product_type: ProductType::Fungicide,
            active_ingredient: "Pyraclostrobin",
            crops: &["Corn"],
            price: 210.00,
            package_size: 2.5,
            package_unit: PackageUnit::Gallon,
            rate_min: 10.0,
            rate_max: 14.4,
        },
        Seed {
            id: "5",
            name: "Neem Oil Concentrate",
            manufacturer: "Organic Solutions",
            product_type: ProductType::OrganicAlternative,
            active_ingredient: "Azadirachtin",
            crops: &["Vegetables", "Fruits", "Ornamentals"],
            price: 85.00,
            package_size: 1.0,
            package_unit: PackageUnit::Gallon,
            rate_min: 32.0,
            rate_max: 64.0,
        },
        Seed {
            id: "6",
            name: "PyGanic Crop Protection",
            manufacturer: "MGK",
            product_type: ProductType::OrganicAlternative,
            active_ingredient: "Pyrethrins",
            crops: &["General", "Greenhouse"],
            price: 150.00,
            package_size: 1.0,
            package_unit: PackageUnit::Gallon,
            rate_min: 16.0,
            rate_max: 32.0,
        },
    ]
    .into_iter()
    .map(Product::from)
    .collect()
}
