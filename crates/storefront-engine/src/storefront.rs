//! The command/query surface a storefront UI talks to.
//!
//! [`Storefront`] binds the catalog, the session cart, checkout and the order history
//! together. Every call goes through an actor, so concurrent callers and the delivery
//! ticker observe one serialized sequence of changes per collection.

use crate::cart_actor::CartError;
use crate::catalog::Catalog;
use crate::checkout::{Checkout, CheckoutError, PlaceOrder};
use crate::clients::{CartClient, OrderClient};
use crate::clock::Clock;
use crate::model::{Amount, Cart, CartId, LineItem, Order, OrderId, OrderStatus, Sku};
use crate::order_actor::OrderError;
use actor_framework::ActorClient;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Cloneable handle on a running storefront. Dropping every clone (together with the
/// owning [`StorefrontSystem`](crate::lifecycle::StorefrontSystem)) lets the actors stop.
#[derive(Clone)]
pub struct Storefront {
    catalog: Arc<Catalog>,
    cart: CartClient,
    orders: OrderClient,
    checkout: Checkout,
    session: CartId,
    clock: Arc<dyn Clock>,
}

impl Storefront {
    pub(crate) fn new(
        catalog: Arc<Catalog>,
        cart: CartClient,
        orders: OrderClient,
        checkout: Checkout,
        session: CartId,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog,
            cart,
            orders,
            checkout,
            session,
            clock,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart_client(&self) -> &CartClient {
        &self.cart
    }

    pub fn order_client(&self) -> &OrderClient {
        &self.orders
    }

    pub fn checkout(&self) -> &Checkout {
        &self.checkout
    }

    pub fn session(&self) -> &CartId {
        &self.session
    }

    // --- Cart ---

    /// Adds `quantity` units of the variant `sku`, merging with an existing line.
    #[instrument(skip(self))]
    pub async fn add_to_cart(&self, sku: &str, quantity: u32) -> Result<Cart, CartError> {
        let sku = Sku::from(sku);
        let (product, variant) = self
            .catalog
            .find_variant(&sku)
            .ok_or_else(|| CartError::UnknownSku(sku.to_string()))?;
        let line = LineItem::snapshot(product, variant, quantity);
        self.cart.add_item(self.session.clone(), line).await?;
        self.cart().await
    }

    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, sku: &str) -> Result<Cart, CartError> {
        self.cart
            .remove_item(self.session.clone(), Sku::from(sku))
            .await?;
        self.cart().await
    }

    /// Sets a line's quantity. Zero or negative removes the line.
    #[instrument(skip(self))]
    pub async fn update_quantity(&self, sku: &str, quantity: i64) -> Result<Cart, CartError> {
        let change = self
            .cart
            .update_quantity(self.session.clone(), Sku::from(sku), quantity)
            .await?;
        debug!(?change, "Quantity updated");
        self.cart().await
    }

    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<(), CartError> {
        self.cart.clear(self.session.clone()).await.map(|_| ())
    }

    pub async fn cart(&self) -> Result<Cart, CartError> {
        self.cart.cart(self.session.clone()).await
    }

    pub async fn cart_subtotal(&self) -> Result<Amount, CartError> {
        Ok(self.cart().await?.subtotal())
    }

    /// Total units in the cart (the header badge).
    pub async fn cart_count(&self) -> Result<u64, CartError> {
        Ok(self.cart().await?.count())
    }

    // --- Checkout ---

    pub async fn place_order(&self, request: PlaceOrder) -> Result<Order, CheckoutError> {
        self.checkout.place_order(request).await
    }

    // --- Orders ---

    /// The order as stored, without advancing it.
    pub async fn order(&self, id: &OrderId) -> Result<Option<Order>, OrderError> {
        self.orders.get_order(id.clone()).await
    }

    pub async fn order_exists(&self, id: &OrderId) -> Result<bool, OrderError> {
        self.orders.exists(id.clone()).await
    }

    /// Every order, most recent first.
    pub async fn order_history(&self) -> Result<Vec<Order>, OrderError> {
        self.orders.order_history().await
    }

    /// Brings the order up to date with the clock and returns it, the way the tracking
    /// page polls. `Ok(None)` for an unknown id.
    #[instrument(skip(self))]
    pub async fn track_order(&self, id: &OrderId) -> Result<Option<Order>, OrderError> {
        if self.orders.advance(id.clone(), self.clock.now()).await?.is_none() {
            return Ok(None);
        }
        self.order(id).await
    }

    /// Progress percentage of the order's current status. `Ok(None)` for an unknown id.
    pub async fn order_progress(&self, id: &OrderId) -> Result<Option<u8>, OrderError> {
        self.orders.progress(id.clone()).await
    }

    /// Advances every order to the current time. Returns the orders that moved.
    pub async fn tick(&self) -> Result<Vec<(OrderId, Vec<OrderStatus>)>, OrderError> {
        self.orders.tick_all(self.clock.now()).await
    }
}
