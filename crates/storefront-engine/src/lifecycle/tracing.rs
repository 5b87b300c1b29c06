//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG`. Targets are hidden; actor events carry an `entity_type` field instead.
//!
//! ```bash
//! RUST_LOG=info cargo run --bin storefront-demo
//! # payloads (line items, order params) are only logged at debug
//! RUST_LOG=debug cargo run --bin storefront-demo
//! ```
//!
//! With `RUST_LOG=info` a checkout reads roughly:
//!
//! ```text
//! INFO Actor started entity_type="Cart" size=0
//! INFO add_item{sku=ip15-64-blk quantity=1}: Action ok entity_type="Cart" id=default
//! INFO place_order{session=default method=SavedCard}: Processing payment delay_ms=2000
//! INFO place_order{...}: Created entity_type="Order" id=ORD1718000000000_7QX2 size=1
//! INFO Order advanced order_id=ORD1718000000000_7QX2 appended=[Shipped]
//! ```
//!
//! Storage failures show up as `WARN Snapshot write failed key=...` and never abort
//! the operation that produced the snapshot.

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
