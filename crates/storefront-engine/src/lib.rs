//! # Storefront Engine
//!
//! Cart and order state for a single-shopper storefront, built on
//! [`actor_framework`].
//!
//! ## Layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`catalog`] | Read-only products and variants, SKU lookup, search |
//! | [`cart_actor`] | One cart per session: merge, update, remove, clear |
//! | [`checkout`] | Pricing and turning the cart into an order |
//! | [`order_actor`] | Order factory and time-driven delivery progression |
//! | [`persistence`] | Snapshot mirroring to a key-value store |
//! | [`lifecycle`] | Startup, ticker, reset, shutdown, tracing setup |
//! | [`storefront`] | The command/query surface for a UI |
//!
//! The cart and the order history are each owned by a single actor, so every mutation
//! of a collection is serialized and each one is mirrored to storage as a whole snapshot.
//! Delivery status is a pure function of elapsed time since placement; anything (a
//! tracking page poll, the background ticker, a test with a manual clock) can ask the
//! order actor to catch up with `now`.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use storefront_engine::checkout::PlaceOrder;
//! use storefront_engine::clock::SystemClock;
//! use storefront_engine::config::EngineConfig;
//! use storefront_engine::lifecycle::StorefrontSystem;
//! use storefront_engine::model::PaymentMethod;
//! use storefront_engine::persistence::MemoryStore;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EngineConfig::default();
//! let system = StorefrontSystem::start(&config, Arc::new(MemoryStore::new()), Arc::new(SystemClock))?;
//! let shop = system.storefront().clone();
//!
//! shop.add_to_cart("ip15-64-blk", 1).await?;
//! let order = shop
//!     .place_order(PlaceOrder::new(PaymentMethod::SavedCard).with_cvv("999"))
//!     .await?;
//! assert_eq!(order.totals.total, 94_399);
//!
//! drop(shop);
//! system.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod cart_actor;
pub mod catalog;
pub mod checkout;
pub mod clients;
pub mod clock;
pub mod config;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod persistence;
pub mod storefront;

pub use lifecycle::StorefrontSystem;
pub use storefront::Storefront;
