//! Turns the session cart into an order.
//!
//! Placement validates before it mutates: an empty cart or a bad CVV leaves both the cart
//! and the history untouched. Only after the simulated processing delay is the order
//! created and the cart cleared. One placement at a time; a second request while one is
//! in flight is refused instead of queued.

pub mod error;
pub mod pricing;

pub use error::CheckoutError;
pub use pricing::quote;

use crate::clients::{CartClient, OrderClient};
use crate::clock::Clock;
use crate::model::{Amount, CartId, Order, OrderCreate, PaymentDescriptor, PaymentMethod, Shopper};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSettings {
    pub tax_rate: Decimal,
    pub shipping: Amount,
    /// The only CVV the saved card accepts.
    pub demo_cvv: String,
    pub processing_delay: Duration,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(18, 2),
            shipping: 0,
            demo_cvv: "999".to_string(),
            processing_delay: Duration::from_millis(2000),
        }
    }
}

/// Input of a placement.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub method: PaymentMethod,
    pub cvv: Option<String>,
    /// Delivery address; `None` uses the shopper's default address.
    pub address: Option<String>,
}

impl PlaceOrder {
    pub fn new(method: PaymentMethod) -> Self {
        Self {
            method,
            cvv: None,
            address: None,
        }
    }

    pub fn with_cvv(mut self, cvv: impl Into<String>) -> Self {
        self.cvv = Some(cvv.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// Releases the in-flight flag when the placement finishes or is dropped.
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag.clone()))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Clone)]
pub struct Checkout {
    cart: CartClient,
    orders: OrderClient,
    session: CartId,
    shopper: Shopper,
    clock: Arc<dyn Clock>,
    settings: CheckoutSettings,
    in_flight: Arc<AtomicBool>,
}

impl Checkout {
    pub fn new(
        cart: CartClient,
        orders: OrderClient,
        session: CartId,
        shopper: Shopper,
        clock: Arc<dyn Clock>,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            cart,
            orders,
            session,
            shopper,
            clock,
            settings,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn settings(&self) -> &CheckoutSettings {
        &self.settings
    }

    /// Whether a placement is currently being processed.
    pub fn is_processing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Places an order from the session cart and clears the cart.
    #[instrument(skip(self, request), fields(session = %self.session, method = ?request.method))]
    pub async fn place_order(&self, request: PlaceOrder) -> Result<Order, CheckoutError> {
        let _in_flight = InFlight::acquire(&self.in_flight).ok_or_else(|| {
            warn!("Placement refused: another payment is in flight");
            CheckoutError::PaymentInProgress
        })?;

        let cart = self.cart.cart(self.session.clone()).await?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        self.verify_payment(&request)?;

        info!(delay_ms = self.settings.processing_delay.as_millis() as u64, "Processing payment");
        tokio::time::sleep(self.settings.processing_delay).await;

        // The cart may have changed while the payment was processing.
        let cart = self.cart.cart(self.session.clone()).await?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let totals = quote(cart.subtotal(), self.settings.shipping, self.settings.tax_rate);
        let params = OrderCreate {
            items: cart.items,
            totals,
            payment: self.payment_descriptor(request.method),
            address: request
                .address
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| self.shopper.default_address.clone()),
            placed_at: self.clock.now(),
        };
        let order_id = self.orders.place(params).await?;

        if let Err(e) = self.cart.clear(self.session.clone()).await {
            error!(%order_id, error = %e, "Order placed but cart could not be cleared");
        }

        let order = self
            .orders
            .get_order(order_id.clone())
            .await?
            .ok_or_else(|| crate::order_actor::OrderError::NotFound(order_id.to_string()))?;
        info!(%order_id, total = order.totals.total, "Order placed");
        Ok(order)
    }

    fn verify_payment(&self, request: &PlaceOrder) -> Result<(), CheckoutError> {
        if request.method != PaymentMethod::SavedCard {
            return Ok(());
        }
        match request.cvv.as_deref().map(str::trim) {
            Some(cvv) if cvv == self.settings.demo_cvv => Ok(()),
            Some(_) => Err(CheckoutError::InvalidPaymentInput(
                "CVV does not match the saved card".to_string(),
            )),
            None => Err(CheckoutError::InvalidPaymentInput(
                "CVV is required for the saved card".to_string(),
            )),
        }
    }

    fn payment_descriptor(&self, method: PaymentMethod) -> PaymentDescriptor {
        match (method, self.shopper.saved_card()) {
            (PaymentMethod::SavedCard, Some(card)) => PaymentDescriptor {
                method,
                alias: Some(card.alias.clone()),
                masked: Some(card.masked.clone()),
            },
            _ => PaymentDescriptor::for_method(method),
        }
    }
}
