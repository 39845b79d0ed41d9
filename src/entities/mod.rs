//! Entity module - Plain data records shared by the core and bot layers.
//! All records are immutable once built and serialize with serde.

pub mod calculation;
pub mod guide;
pub mod product;

pub use calculation::CostBreakdown;
pub use guide::ResourceGuide;
pub use product::{OUNCES_PER_ACRE, PackageUnit, Product, ProductType};
