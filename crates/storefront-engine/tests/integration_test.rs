use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use storefront_engine::cart_actor::CartError;
use storefront_engine::checkout::{CheckoutError, PlaceOrder};
use storefront_engine::clock::ManualClock;
use storefront_engine::config::EngineConfig;
use storefront_engine::lifecycle::StorefrontSystem;
use storefront_engine::model::{CartPolicy, OrderId, OrderStatus, PaymentMethod, Sku};
use storefront_engine::order_actor::OrderError;

fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_718_000_000, 0).expect("valid timestamp")
}

fn test_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.checkout.processing_delay = std::time::Duration::ZERO;
    config
}

fn start(config: &EngineConfig, clock: &ManualClock) -> StorefrontSystem {
    let store = storefront_engine::persistence::MemoryStore::new();
    StorefrontSystem::start(config, Arc::new(store), Arc::new(clock.clone())).expect("system starts")
}

fn saved_card() -> PlaceOrder {
    PlaceOrder::new(PaymentMethod::SavedCard).with_cvv("999")
}

/// Full checkout against real actors: cart → order → cleared cart → history.
#[tokio::test]
async fn test_checkout_end_to_end() {
    let clock = ManualClock::new(t0());
    let system = start(&test_config(), &clock);
    let shop = system.storefront().clone();

    let cart = shop.add_to_cart("ip15-64-blk", 1).await.expect("add to cart");
    assert_eq!(cart.subtotal(), 79_999);
    assert_eq!(shop.cart_count().await.expect("count"), 1);

    let order = shop.place_order(saved_card()).await.expect("order placed");
    assert_eq!(order.totals.subtotal, 79_999);
    assert_eq!(order.totals.shipping, 0);
    assert_eq!(order.totals.tax, 14_400);
    assert_eq!(order.totals.total, 94_399);
    assert_eq!(order.status, OrderStatus::Placed);
    assert_eq!(order.timeline.len(), 1);
    assert_eq!(order.placed_at, t0());
    assert_eq!(order.payment.alias.as_deref(), Some("Rose"));
    assert_eq!(order.payment.masked.as_deref(), Some("•••• 4242"));
    assert_eq!(order.address, "Delhi, Chandni Chowk, Gali No.5");
    assert!(order.order_id.0.starts_with(&format!("ORD{}_", t0().timestamp_millis())));

    // Cart is cleared and the order heads the history
    assert!(shop.cart().await.expect("cart").is_empty());
    let history = shop.order_history().await.expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0], order);
    assert!(shop.order_exists(&order.order_id).await.expect("exists"));

    drop(shop);
    system.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn test_cart_merge_update_and_remove() {
    let clock = ManualClock::new(t0());
    let system = start(&test_config(), &clock);
    let shop = system.storefront();

    shop.add_to_cart("ip15-64-blk", 1).await.expect("add");
    shop.add_to_cart("s24-128-gray", 2).await.expect("add");
    let cart = shop.add_to_cart("ip15-64-blk", 2).await.expect("merge");

    assert_eq!(cart.items.len(), 2);
    assert_eq!(cart.line(&Sku::from("ip15-64-blk")).map(|l| l.quantity), Some(3));
    assert_eq!(cart.subtotal(), 79_999 * 3 + 69_999 * 2);

    let cart = shop.update_quantity("s24-128-gray", 0).await.expect("update");
    assert!(cart.line(&Sku::from("s24-128-gray")).is_none());

    let cart = shop.update_quantity("ip15-64-blk", -1).await.expect("update");
    assert!(cart.is_empty());

    // Removing or updating something absent changes nothing
    let cart = shop.remove_from_cart("ip15-64-blk").await.expect("remove");
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_unknown_sku_and_zero_quantity_are_rejected() {
    let clock = ManualClock::new(t0());
    let system = start(&test_config(), &clock);
    let shop = system.storefront();

    let unknown = shop.add_to_cart("ip15-1tb-gold", 1).await;
    assert_eq!(unknown, Err(CartError::UnknownSku("ip15-1tb-gold".into())));

    let zero = shop.add_to_cart("ip15-64-blk", 0).await;
    assert_eq!(zero, Err(CartError::InvalidQuantity(0)));

    assert!(shop.cart().await.expect("cart").is_empty());
}

#[tokio::test]
async fn test_clamp_policy_caps_quantities() {
    let clock = ManualClock::new(t0());
    let mut config = test_config();
    config.cart_policy = CartPolicy::ClampToStock;
    let system = start(&config, &clock);
    let shop = system.storefront();

    // ip15-128-red has a single unit in stock
    let cart = shop.add_to_cart("ip15-128-red", 10).await.expect("add");
    assert_eq!(cart.count(), 1);
}

#[tokio::test]
async fn test_empty_cart_cannot_be_ordered() {
    let clock = ManualClock::new(t0());
    let system = start(&test_config(), &clock);
    let shop = system.storefront();

    let result = shop.place_order(saved_card()).await;
    assert_eq!(result, Err(CheckoutError::EmptyCart));
    assert!(shop.order_history().await.expect("history").is_empty());
}

#[tokio::test]
async fn test_invalid_payment_leaves_state_untouched() {
    let clock = ManualClock::new(t0());
    let system = start(&test_config(), &clock);
    let shop = system.storefront();
    let before = shop.add_to_cart("ip15-64-blk", 1).await.expect("add");

    let wrong_cvv = shop
        .place_order(PlaceOrder::new(PaymentMethod::SavedCard).with_cvv("123"))
        .await;
    assert!(matches!(wrong_cvv, Err(CheckoutError::InvalidPaymentInput(_))));

    let missing_cvv = shop.place_order(PlaceOrder::new(PaymentMethod::SavedCard)).await;
    assert!(matches!(missing_cvv, Err(CheckoutError::InvalidPaymentInput(_))));

    assert_eq!(shop.cart().await.expect("cart"), before);
    assert!(shop.order_history().await.expect("history").is_empty());

    // Other methods need no CVV
    let order = shop
        .place_order(PlaceOrder::new(PaymentMethod::CashOnDelivery).with_address("Mumbai"))
        .await
        .expect("cod order");
    assert_eq!(order.address, "Mumbai");
    assert_eq!(order.payment.alias, None);
}

#[tokio::test]
async fn test_history_is_newest_first() {
    let clock = ManualClock::new(t0());
    let system = start(&test_config(), &clock);
    let shop = system.storefront();

    shop.add_to_cart("ip15-64-blk", 1).await.expect("add");
    let first = shop.place_order(saved_card()).await.expect("first");

    clock.advance(Duration::seconds(1));
    shop.add_to_cart("s24-128-gray", 1).await.expect("add");
    let second = shop.place_order(saved_card()).await.expect("second");

    let ids: Vec<OrderId> = shop
        .order_history()
        .await
        .expect("history")
        .into_iter()
        .map(|o| o.order_id)
        .collect();
    assert_eq!(ids, vec![second.order_id, first.order_id]);
}

#[tokio::test]
async fn test_delivery_timeline_follows_the_clock() {
    let clock = ManualClock::new(t0());
    let system = start(&test_config(), &clock);
    let shop = system.storefront();
    shop.add_to_cart("ip15-64-blk", 1).await.expect("add");
    let order = shop.place_order(saved_card()).await.expect("order");
    let id = order.order_id.clone();

    let status_at = |secs: i64| {
        let shop = shop.clone();
        let id = id.clone();
        let clock = clock.clone();
        async move {
            clock.set(t0() + Duration::seconds(secs));
            shop.track_order(&id)
                .await
                .expect("track")
                .expect("order exists")
        }
    };

    assert_eq!(status_at(120).await.status, OrderStatus::Placed);
    assert_eq!(status_at(180).await.status, OrderStatus::Shipped);
    assert_eq!(status_at(210).await.status, OrderStatus::Shipped);

    let delivered = status_at(300).await;
    assert_eq!(delivered.status, OrderStatus::Delivered);
    let statuses: Vec<OrderStatus> = delivered.timeline.iter().map(|e| e.status.clone()).collect();
    assert_eq!(
        statuses,
        vec![
            OrderStatus::Placed,
            OrderStatus::Shipped,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered
        ]
    );
    assert_eq!(shop.order_progress(&id).await.expect("progress"), Some(100));

    // Terminal: further polling changes nothing
    let later = status_at(3_600).await;
    assert_eq!(later.timeline, delivered.timeline);
}

#[tokio::test]
async fn test_tracking_unknown_order_is_none() {
    let clock = ManualClock::new(t0());
    let system = start(&test_config(), &clock);
    let shop = system.storefront();

    let missing = OrderId::from("ORD0_NONE");
    assert_eq!(shop.track_order(&missing).await.expect("track"), None);
    assert_eq!(shop.order_progress(&missing).await.expect("progress"), None);
    assert!(!shop.order_exists(&missing).await.expect("exists"));
}

#[tokio::test]
async fn test_tick_advances_every_order() {
    let clock = ManualClock::new(t0());
    let system = start(&test_config(), &clock);
    let shop = system.storefront();

    shop.add_to_cart("ip15-64-blk", 1).await.expect("add");
    let older = shop.place_order(saved_card()).await.expect("older");
    clock.advance(Duration::minutes(2));
    shop.add_to_cart("s24-128-gray", 1).await.expect("add");
    let newer = shop.place_order(saved_card()).await.expect("newer");

    // older is 3 minutes old, newer only 1
    clock.advance(Duration::minutes(1));
    let moved = shop.tick().await.expect("tick");
    assert_eq!(moved, vec![(older.order_id.clone(), vec![OrderStatus::Shipped])]);

    clock.advance(Duration::minutes(10));
    let moved = shop.tick().await.expect("tick");
    assert_eq!(moved.len(), 2);
    assert_eq!(moved[0].0, newer.order_id);

    assert!(shop.tick().await.expect("tick").is_empty());
}

#[tokio::test]
async fn test_background_ticker_delivers_orders() {
    let clock = ManualClock::new(t0());
    let mut system = start(&test_config(), &clock);
    let shop = system.storefront().clone();
    shop.add_to_cart("ip15-64-blk", 1).await.expect("add");
    let order = shop.place_order(saved_card()).await.expect("order");

    system.start_ticker(std::time::Duration::from_millis(10)).await;
    clock.advance(Duration::minutes(5));

    let mut status = OrderStatus::Placed;
    for _ in 0..100 {
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        status = shop
            .order(&order.order_id)
            .await
            .expect("get")
            .expect("exists")
            .status;
        if status == OrderStatus::Delivered {
            break;
        }
    }
    assert_eq!(status, OrderStatus::Delivered);

    drop(shop);
    system.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn test_second_placement_while_processing_is_refused() {
    let clock = ManualClock::new(t0());
    let mut config = test_config();
    config.checkout.processing_delay = std::time::Duration::from_millis(200);
    let system = start(&config, &clock);
    let shop = system.storefront().clone();
    shop.add_to_cart("ip15-64-blk", 1).await.expect("add");

    let first = {
        let shop = shop.clone();
        tokio::spawn(async move { shop.place_order(saved_card()).await })
    };
    while !shop.checkout().is_processing() {
        tokio::task::yield_now().await;
    }

    let second = shop.place_order(saved_card()).await;
    assert_eq!(second, Err(CheckoutError::PaymentInProgress));

    first.await.expect("join").expect("first placement succeeds");
    assert_eq!(shop.order_history().await.expect("history").len(), 1);
    assert!(!shop.checkout().is_processing());
}

#[tokio::test]
async fn test_unrepresentable_total_is_refused_without_losing_the_actor() {
    let clock = ManualClock::new(t0());
    let mut config = test_config();
    config.checkout.shipping = u64::MAX;
    let system = start(&config, &clock);
    let shop = system.storefront();
    let before = shop.add_to_cart("ip15-64-blk", 1).await.expect("add");

    let result = shop.place_order(PlaceOrder::new(PaymentMethod::Upi)).await;
    assert!(matches!(
        result,
        Err(CheckoutError::Order(OrderError::ValidationError(_)))
    ));

    // Both actors are still serving and nothing changed
    assert!(shop.order_history().await.expect("history").is_empty());
    assert_eq!(shop.cart().await.expect("cart"), before);
}

#[tokio::test]
async fn test_zero_ticker_period_still_ticks() {
    let clock = ManualClock::new(t0());
    let mut system = start(&test_config(), &clock);
    let shop = system.storefront().clone();
    shop.add_to_cart("ip15-64-blk", 1).await.expect("add");
    let order = shop.place_order(saved_card()).await.expect("order");

    system.start_ticker(std::time::Duration::ZERO).await;
    clock.advance(Duration::minutes(6));

    let mut status = OrderStatus::Placed;
    for _ in 0..100 {
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        status = shop
            .order(&order.order_id)
            .await
            .expect("get")
            .expect("exists")
            .status;
        if status == OrderStatus::Delivered {
            break;
        }
    }
    assert_eq!(status, OrderStatus::Delivered);

    drop(shop);
    system.shutdown().await.expect("clean shutdown");
}
