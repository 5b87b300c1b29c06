use super::{Amount, Product, ProductId, Sku, Variant};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Identifies one shopper session's cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(pub String);

impl From<&str> for CartId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for CartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How quantities are bounded when a line is merged or updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CartPolicy {
    /// Quantities are never capped; the stock ceiling is informational.
    #[default]
    Permissive,
    /// Merged and updated quantities are capped at the line's stock ceiling.
    ClampToStock,
}

impl CartPolicy {
    fn bound(self, quantity: u64, ceiling: u32) -> u32 {
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self {
            CartPolicy::Permissive => quantity,
            CartPolicy::ClampToStock => quantity.min(ceiling),
        }
    }
}

/// One SKU in the cart. Display fields are copied from the catalog at add time and
/// never re-read, so a later catalog change does not alter what is in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    pub sku: Sku,
    pub title: String,
    pub color: String,
    pub storage: String,
    pub image: String,
    #[serde(rename = "price")]
    pub unit_price: Amount,
    pub quantity: u32,
    #[serde(rename = "stock")]
    pub stock_ceiling: u32,
}

impl LineItem {
    /// Snapshots the product/variant pair into a cart line.
    pub fn snapshot(product: &Product, variant: &Variant, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            sku: variant.sku.clone(),
            title: product.title.clone(),
            color: variant.color.clone(),
            storage: variant.storage.clone(),
            image: variant.image.clone(),
            unit_price: variant.unit_price(product),
            quantity,
            stock_ceiling: variant.stock,
        }
    }

    pub fn line_total(&self) -> Amount {
        self.unit_price.saturating_mul(Amount::from(self.quantity))
    }
}

/// Creation payload for a session cart.
#[derive(Debug, Clone)]
pub struct CartCreate {
    pub session: CartId,
}

/// What an `UpdateQuantity` did to the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    Set(u32),
    Removed,
    /// No line with that SKU.
    Untouched,
}

/// The mutable collection of line items for one session, at most one line per SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    pub items: Vec<LineItem>,
}

impl Cart {
    pub fn new(id: CartId) -> Self {
        Self {
            id,
            items: Vec::new(),
        }
    }

    pub fn with_items(id: CartId, items: Vec<LineItem>) -> Self {
        Self { id, items }
    }

    pub fn line(&self, sku: &Sku) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.sku == sku)
    }

    pub fn subtotal(&self) -> Amount {
        self.items
            .iter()
            .map(LineItem::line_total)
            .fold(0, Amount::saturating_add)
    }

    /// Total units across all lines.
    pub fn count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Merges `item` into the line with the same SKU, or appends it. Returns the line's
    /// quantity afterwards. The caller has already rejected a zero quantity.
    ///
    /// A line the policy bounds to zero is dropped, and 0 is returned.
    pub fn add(&mut self, item: LineItem, policy: CartPolicy) -> u32 {
        match self.items.iter().position(|i| i.sku == item.sku) {
            Some(idx) => {
                let line = &mut self.items[idx];
                let merged = u64::from(line.quantity) + u64::from(item.quantity);
                line.quantity = policy.bound(merged, line.stock_ceiling);
                let quantity = line.quantity;
                if quantity == 0 {
                    self.items.remove(idx);
                }
                quantity
            }
            None => {
                let mut item = item;
                item.quantity = policy.bound(u64::from(item.quantity), item.stock_ceiling);
                let quantity = item.quantity;
                if quantity > 0 {
                    self.items.push(item);
                }
                quantity
            }
        }
    }

    /// Drops the line with `sku`. Returns whether a line was removed.
    pub fn remove(&mut self, sku: &Sku) -> bool {
        let before = self.items.len();
        self.items.retain(|i| &i.sku != sku);
        self.items.len() != before
    }

    /// Sets the line's quantity; anything `<= 0`, or bounded to 0 by the policy,
    /// removes the line.
    pub fn update_quantity(&mut self, sku: &Sku, quantity: i64, policy: CartPolicy) -> QuantityChange {
        let bounded = match self.items.iter().find(|i| &i.sku == sku) {
            None => return QuantityChange::Untouched,
            Some(_) if quantity <= 0 => 0,
            Some(line) => policy.bound(quantity.unsigned_abs(), line.stock_ceiling),
        };
        if bounded == 0 {
            self.remove(sku);
            return QuantityChange::Removed;
        }
        if let Some(line) = self.items.iter_mut().find(|i| &i.sku == sku) {
            line.quantity = bounded;
        }
        QuantityChange::Set(bounded)
    }

    /// Empties the cart, returning how many lines were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.items.len();
        self.items.clear();
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(sku: &str, price: Amount, quantity: u32, stock: u32) -> LineItem {
        LineItem {
            product_id: ProductId::from("prod"),
            sku: Sku::from(sku),
            title: "Phone".into(),
            color: "Black".into(),
            storage: "64GB".into(),
            image: String::new(),
            unit_price: price,
            quantity,
            stock_ceiling: stock,
        }
    }

    #[test]
    fn adding_same_sku_merges_quantities() {
        let mut cart = Cart::new(CartId::from("s"));
        cart.add(line("a", 100, 2, 5), CartPolicy::Permissive);
        let qty = cart.add(line("a", 100, 3, 5), CartPolicy::Permissive);

        assert_eq!(qty, 5);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.count(), 5);
    }

    #[test]
    fn permissive_policy_ignores_stock_ceiling() {
        let mut cart = Cart::new(CartId::from("s"));
        cart.add(line("a", 100, 4, 5), CartPolicy::Permissive);
        assert_eq!(cart.add(line("a", 100, 4, 5), CartPolicy::Permissive), 8);
        assert_eq!(
            cart.update_quantity(&Sku::from("a"), 40, CartPolicy::Permissive),
            QuantityChange::Set(40)
        );
    }

    #[test]
    fn clamp_policy_caps_at_stock_ceiling() {
        let mut cart = Cart::new(CartId::from("s"));
        cart.add(line("a", 100, 4, 5), CartPolicy::ClampToStock);
        assert_eq!(cart.add(line("a", 100, 4, 5), CartPolicy::ClampToStock), 5);
        assert_eq!(
            cart.update_quantity(&Sku::from("a"), 9, CartPolicy::ClampToStock),
            QuantityChange::Set(5)
        );
    }

    #[test]
    fn clamp_to_empty_stock_drops_the_line() {
        let mut cart = Cart::new(CartId::from("s"));
        let sku = Sku::from("sold-out");
        // Restored under the permissive policy with nothing left in stock
        cart.add(line("sold-out", 100, 2, 0), CartPolicy::Permissive);

        assert_eq!(
            cart.update_quantity(&sku, 3, CartPolicy::ClampToStock),
            QuantityChange::Removed
        );
        assert!(cart.is_empty());

        cart.add(line("sold-out", 100, 2, 0), CartPolicy::Permissive);
        assert_eq!(cart.add(line("sold-out", 100, 1, 0), CartPolicy::ClampToStock), 0);
        assert!(cart.is_empty());

        assert_eq!(cart.add(line("sold-out", 100, 1, 0), CartPolicy::ClampToStock), 0);
        assert!(cart.items.iter().all(|i| i.quantity > 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn huge_prices_saturate_instead_of_overflowing() {
        let mut cart = Cart::new(CartId::from("s"));
        cart.add(line("a", Amount::MAX, 2, 5), CartPolicy::Permissive);
        cart.add(line("b", 1, 1, 5), CartPolicy::Permissive);
        assert_eq!(cart.subtotal(), Amount::MAX);
    }

    #[test]
    fn non_positive_update_removes_line() {
        let mut cart = Cart::new(CartId::from("s"));
        cart.add(line("a", 100, 1, 5), CartPolicy::Permissive);
        cart.add(line("b", 50, 1, 5), CartPolicy::Permissive);

        let sku = Sku::from("a");
        assert_eq!(cart.update_quantity(&sku, 0, CartPolicy::Permissive), QuantityChange::Removed);
        assert!(cart.line(&sku).is_none());

        let sku = Sku::from("b");
        assert_eq!(cart.update_quantity(&sku, -1, CartPolicy::Permissive), QuantityChange::Removed);
        assert!(cart.is_empty());
    }

    #[test]
    fn update_or_remove_of_absent_sku_is_noop() {
        let mut cart = Cart::new(CartId::from("s"));
        cart.add(line("a", 100, 1, 5), CartPolicy::Permissive);
        let before = cart.clone();

        assert_eq!(
            cart.update_quantity(&Sku::from("zz"), 3, CartPolicy::Permissive),
            QuantityChange::Untouched
        );
        assert!(!cart.remove(&Sku::from("zz")));
        assert_eq!(cart, before);
    }

    #[test]
    fn subtotal_is_sum_of_line_totals() {
        let mut cart = Cart::new(CartId::from("s"));
        cart.add(line("a", 79_999, 2, 5), CartPolicy::Permissive);
        cart.add(line("b", 69_999, 1, 5), CartPolicy::Permissive);

        assert_eq!(cart.subtotal(), 79_999 * 2 + 69_999);
        assert_eq!(cart.count(), 3);
        assert_eq!(cart.clear(), 2);
        assert_eq!(cart.subtotal(), 0);
    }

    #[test]
    fn line_items_serialize_with_storefront_field_names() {
        let json = serde_json::to_value(line("a", 10, 1, 2)).unwrap();
        assert_eq!(json["productId"], "prod");
        assert_eq!(json["price"], 10);
        assert_eq!(json["stock"], 2);
    }
}
