use chrono::Duration;
use std::sync::Arc;
use storefront_engine::checkout::PlaceOrder;
use storefront_engine::clock::ManualClock;
use storefront_engine::config::EngineConfig;
use storefront_engine::lifecycle::{setup_tracing, StorefrontSystem};
use storefront_engine::model::PaymentMethod;
use storefront_engine::order_actor::progress_percentage;
use storefront_engine::persistence::{FileStore, KeyValueStore, MemoryStore};
use tracing::{error, info, info_span, Instrument};

/// Walks one shopper through add-to-cart, checkout and delivery, fast-forwarding a manual
/// clock through the delivery schedule.
#[tokio::main]
async fn main() {
    setup_tracing();

    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(config).await {
        error!(error = %e, "Demo failed");
        std::process::exit(1);
    }
}

async fn run(config: EngineConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store: Arc<dyn KeyValueStore> = match &config.data_dir {
        Some(dir) => Arc::new(FileStore::open(dir)?),
        None => Arc::new(MemoryStore::new()),
    };
    let clock = ManualClock::starting_now();
    let mut system = StorefrontSystem::start(&config, store, Arc::new(clock.clone()))?;
    system.start_ticker(config.tick_period).await;

    let shop = system.storefront().clone();

    // =====================================================================
    // Step 1: Fill the cart
    // =====================================================================
    let cart = async {
        shop.add_to_cart("ip15-64-blk", 1).await?;
        shop.add_to_cart("s24-256-gray", 1).await?;
        shop.update_quantity("s24-256-gray", 0).await
    }
    .instrument(info_span!("cart"))
    .await?;
    info!(lines = cart.items.len(), subtotal = cart.subtotal(), "Cart ready");

    // =====================================================================
    // Step 2: Checkout with the saved card
    // =====================================================================
    let order = shop
        .place_order(PlaceOrder::new(PaymentMethod::SavedCard).with_cvv(config.checkout.demo_cvv.clone()))
        .instrument(info_span!("checkout"))
        .await?;
    info!(
        order_id = %order.order_id,
        subtotal = order.totals.subtotal,
        tax = order.totals.tax,
        total = order.totals.total,
        "Order placed"
    );

    // =====================================================================
    // Step 3: Fast-forward through delivery
    // =====================================================================
    for minute in 1..=5 {
        clock.advance(Duration::minutes(1));
        let Some(tracked) = shop.track_order(&order.order_id).await? else {
            break;
        };
        info!(
            minute,
            status = %tracked.status,
            progress = progress_percentage(&tracked.status),
            "Tracking"
        );
    }

    let history = shop.order_history().await?;
    info!(orders = history.len(), "Order history");

    drop(shop);
    system.flush().await;
    system.shutdown().await?;
    Ok(())
}
