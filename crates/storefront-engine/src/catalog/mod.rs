//! Read-only product catalog.
//!
//! Products are loaded once at startup (from a JSON file or the built-in demo set) and
//! never change afterwards, so the catalog is shared as a plain `Arc<Catalog>` instead of
//! sitting behind an actor.

use crate::model::{Product, ProductId, Sku, Variant};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;

const DEMO_CATALOG: &str = include_str!("demo_catalog.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Duplicate SKU in catalog: {0}")]
    DuplicateSku(Sku),

    #[error("Duplicate product id in catalog: {0}")]
    DuplicateProduct(ProductId),

    #[error("Price of {0} overflows")]
    PriceOverflow(Sku),

    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog read error ({path}): {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    by_sku: HashMap<Sku, (usize, usize)>,
}

impl Catalog {
    /// Indexes `products`. SKUs and product ids must be unique across the catalog.
    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut by_sku = HashMap::new();
        let mut seen_products = Vec::with_capacity(products.len());

        for (p_idx, product) in products.iter().enumerate() {
            if seen_products.contains(&&product.id) {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
            seen_products.push(&product.id);

            for (v_idx, variant) in product.variants.iter().enumerate() {
                if variant.checked_unit_price(product).is_none() {
                    return Err(CatalogError::PriceOverflow(variant.sku.clone()));
                }
                if by_sku.insert(variant.sku.clone(), (p_idx, v_idx)).is_some() {
                    return Err(CatalogError::DuplicateSku(variant.sku.clone()));
                }
            }
        }

        Ok(Self { products, by_sku })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::from_products(products)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        info!(path = %path.display(), products = catalog.products.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// The two-phone demo catalog bundled with the crate.
    pub fn demo() -> Result<Self, CatalogError> {
        Self::from_json(DEMO_CATALOG)
    }

    /// Resolves a SKU to its product and variant. `None` when the SKU is not listed.
    pub fn find_variant(&self, sku: &Sku) -> Option<(&Product, &Variant)> {
        let &(p_idx, v_idx) = self.by_sku.get(sku)?;
        let product = self.products.get(p_idx)?;
        let variant = product.variants.get(v_idx)?;
        Some((product, variant))
    }

    pub fn find_product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Case-insensitive substring search over title, category and description.
    /// A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.products
            .iter()
            .filter(|p| {
                [&p.title, &p.category, &p.description]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_catalog_has_both_phones() {
        let catalog = Catalog::demo().unwrap();
        assert_eq!(catalog.products().len(), 2);

        let (product, variant) = catalog.find_variant(&Sku::from("ip15-128-red")).unwrap();
        assert_eq!(product.id, ProductId::from("prod_ip15"));
        assert_eq!(variant.unit_price(product), 92_999);
        assert_eq!(variant.stock, 1);

        let s24 = catalog.find_product(&ProductId::from("prod_samsung_s24")).unwrap();
        assert_eq!(s24.review_count, 892);
        assert_eq!(s24.specs.get("battery").map(String::as_str), Some("4000mAh"));
    }

    #[test]
    fn unknown_sku_is_absent() {
        let catalog = Catalog::demo().unwrap();
        assert!(catalog.find_variant(&Sku::from("ip15-1tb-gold")).is_none());
    }

    #[test]
    fn variant_selection_helpers() {
        let catalog = Catalog::demo().unwrap();
        let ip15 = catalog.find_product(&ProductId::from("prod_ip15")).unwrap();

        assert_eq!(ip15.colors(), vec!["Black", "Red"]);
        assert_eq!(ip15.storages(), vec!["64GB", "128GB"]);
        assert_eq!(
            ip15.variant_for("Red", "64GB").map(|v| v.sku.clone()),
            Some(Sku::from("ip15-64-red"))
        );
        assert!(ip15.variant_for("Blue", "64GB").is_none());
    }

    #[test]
    fn search_matches_title_and_category() {
        let catalog = Catalog::demo().unwrap();
        assert_eq!(catalog.search("galaxy").len(), 1);
        assert_eq!(catalog.search("MOBILES").len(), 2);
        assert!(catalog.search("   ").is_empty());
        assert!(catalog.search("laptop").is_empty());
    }

    #[test]
    fn duplicate_sku_is_rejected() {
        let mut products = Catalog::demo().unwrap().products().to_vec();
        let copy = products[0].variants[0].clone();
        products[1].variants.push(copy);

        let result = Catalog::from_products(products);
        assert!(matches!(result, Err(CatalogError::DuplicateSku(sku)) if sku.0 == "ip15-64-blk"));
    }

    #[test]
    fn overflowing_variant_price_is_rejected() {
        let mut products = Catalog::demo().unwrap().products().to_vec();
        products[0].base_price = u64::MAX;

        let result = Catalog::from_products(products);
        assert!(matches!(result, Err(CatalogError::PriceOverflow(sku)) if sku.0 == "ip15-128-blk"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(Catalog::from_json("{ not json"), Err(CatalogError::Parse(_))));
    }
}
