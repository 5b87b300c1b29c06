use super::Amount;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Stock keeping unit: identifies one purchasable variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(pub String);

impl From<&str> for Sku {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for Sku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Type-safe identifier for Products.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A purchasable configuration of a product (color + storage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub sku: Sku,
    pub color: String,
    pub storage: String,
    /// Added to the product's base price.
    pub price_delta: Amount,
    pub image: String,
    /// Units available when the catalog was loaded.
    pub stock: u32,
}

impl Variant {
    /// Base price plus this variant's delta. `None` if the sum does not fit an [`Amount`].
    pub fn checked_unit_price(&self, product: &Product) -> Option<Amount> {
        product.base_price.checked_add(self.price_delta)
    }

    /// Base price plus this variant's delta. Catalogs reject variants whose price
    /// overflows, so this only saturates for hand-built products.
    pub fn unit_price(&self, product: &Product) -> Amount {
        self.checked_unit_price(product).unwrap_or(Amount::MAX)
    }
}

/// Catalog reference data. Loaded once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub category: String,
    pub base_price: Amount,
    pub rating: f32,
    #[serde(rename = "reviews")]
    pub review_count: u32,
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub specs: BTreeMap<String, String>,
    pub variants: Vec<Variant>,
}

impl Product {
    pub fn variant(&self, sku: &Sku) -> Option<&Variant> {
        self.variants.iter().find(|v| &v.sku == sku)
    }

    /// The variant matching both selectors, if the product offers that combination.
    pub fn variant_for(&self, color: &str, storage: &str) -> Option<&Variant> {
        self.variants
            .iter()
            .find(|v| v.color == color && v.storage == storage)
    }

    /// Distinct colors, in the order the variants list them.
    pub fn colors(&self) -> Vec<&str> {
        distinct(self.variants.iter().map(|v| v.color.as_str()))
    }

    /// Distinct storage capacities, in the order the variants list them.
    pub fn storages(&self) -> Vec<&str> {
        distinct(self.variants.iter().map(|v| v.storage.as_str()))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
