use super::error::SystemError;
use super::ticker::{spawn_ticker, Ticker};
use crate::cart_actor::{self, CartContext};
use crate::catalog::Catalog;
use crate::checkout::Checkout;
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::model::{Cart, CartId, Shopper};
use crate::order_actor::{self, OrderContext};
use crate::persistence::{self, CartSnapshot, KeyValueStore, OrderHistorySnapshot, SnapshotWriter};
use crate::storefront::Storefront;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Session used when the caller does not name one.
pub const DEFAULT_SESSION: &str = "default";

/// The runtime orchestrator: owns the cart actor, the order actor, the snapshot writer
/// and (optionally) the delivery ticker.
///
/// # Example
///
/// ```ignore
/// let system = StorefrontSystem::start(&config, store, clock)?;
/// let shop = system.storefront();
///
/// shop.add_to_cart("ip15-64-blk", 1).await?;
/// let order = shop
///     .place_order(PlaceOrder::new(PaymentMethod::SavedCard).with_cvv("999"))
///     .await?;
///
/// system.shutdown().await?;
/// ```
pub struct StorefrontSystem {
    storefront: Storefront,
    writer: SnapshotWriter,
    cart_key: String,
    orders_key: String,
    clock: Arc<dyn Clock>,
    ticker: Option<Ticker>,
    handles: Vec<JoinHandle<()>>,
}

impl StorefrontSystem {
    /// Loads the catalog named by `config` (or the demo catalog) and starts the system.
    pub fn start(
        config: &EngineConfig,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SystemError> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::load(path)?,
            None => Catalog::demo()?,
        };
        Ok(Self::start_with_catalog(config, catalog, Shopper::demo(), store, clock))
    }

    /// Restores persisted state, then spawns both actors with their snapshot sinks.
    pub fn start_with_catalog(
        config: &EngineConfig,
        catalog: Catalog,
        shopper: Shopper,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let session = CartId::from(DEFAULT_SESSION);
        let cart_key = config.cart_key();
        let orders_key = config.orders_key();

        // 1. Read snapshots before anything can write
        let lines = persistence::load_cart(store.as_ref(), &cart_key);
        let orders = persistence::load_orders(store.as_ref(), &orders_key);
        info!(cart_lines = lines.len(), orders = orders.len(), "Restored persisted state");

        let writer = SnapshotWriter::spawn(store);

        // 2. Create actors, seeded and wired to their sinks
        let (cart_actor, cart_client) = cart_actor::new();
        let cart_actor = cart_actor
            .restore(vec![Cart::with_items(session.clone(), lines)])
            .with_sink(CartSnapshot::new(cart_key.clone(), session.clone(), writer.handle()));

        let (order_actor, order_client) = order_actor::new();
        let order_actor = order_actor
            .restore(orders)
            .with_sink(OrderHistorySnapshot::new(orders_key.clone(), writer.handle()));

        // 3. Start actors with injected context
        let cart_handle = tokio::spawn(cart_actor.run(CartContext {
            policy: config.cart_policy,
        }));
        let order_handle = tokio::spawn(order_actor.run(OrderContext {
            schedule: config.schedule,
        }));

        let checkout = Checkout::new(
            cart_client.clone(),
            order_client.clone(),
            session.clone(),
            shopper,
            clock.clone(),
            config.checkout.clone(),
        );
        let storefront = Storefront::new(
            Arc::new(catalog),
            cart_client,
            order_client,
            checkout,
            session,
            clock.clone(),
        );

        Self {
            storefront,
            writer,
            cart_key,
            orders_key,
            clock,
            ticker: None,
            handles: vec![cart_handle, order_handle],
        }
    }

    pub fn storefront(&self) -> &Storefront {
        &self.storefront
    }

    /// Starts advancing orders in the background every `period`. Replaces a running ticker.
    pub async fn start_ticker(&mut self, period: Duration) {
        if let Some(previous) = self.ticker.take() {
            previous.stop().await;
        }
        self.ticker = Some(spawn_ticker(
            self.storefront.order_client().clone(),
            self.clock.clone(),
            period,
        ));
    }

    /// Waits until every snapshot committed so far has been written.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    /// Empties the cart and the order history and deletes both storage keys.
    pub async fn reset(&self) -> Result<(), SystemError> {
        self.storefront.clear_cart().await?;
        let removed = self.storefront.order_client().reset().await?;

        let handle = self.writer.handle();
        handle.remove(&self.cart_key);
        handle.remove(&self.orders_key);
        handle.flush().await;
        info!(removed_orders = removed, "Storefront reset");
        Ok(())
    }

    /// Gracefully shuts down the system.
    ///
    /// 1. Stops the ticker.
    /// 2. Drops the storefront, which closes the actors' channels.
    /// 3. Waits for both actors to exit.
    /// 4. Drains the snapshot writer.
    ///
    /// Clones of the [`Storefront`] handed out earlier must be dropped first, otherwise the
    /// actors keep running and this waits for them.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down storefront...");

        if let Some(ticker) = self.ticker {
            ticker.stop().await;
        }
        drop(self.storefront);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(SystemError::ActorTaskFailed(format!("{e:?}")));
            }
        }

        self.writer.shutdown().await;
        info!("Storefront shutdown complete.");
        Ok(())
    }
}
