use super::WriterHandle;
use crate::model::{Cart, CartId, LineItem, Order};
use actor_framework::SnapshotSink;
use tracing::error;

/// Mirrors one session's cart lines under `key` as a JSON array.
pub struct CartSnapshot {
    key: String,
    session: CartId,
    writer: WriterHandle,
}

impl CartSnapshot {
    pub fn new(key: impl Into<String>, session: CartId, writer: WriterHandle) -> Self {
        Self {
            key: key.into(),
            session,
            writer,
        }
    }
}

impl SnapshotSink<Cart> for CartSnapshot {
    fn persist(&self, carts: &[&Cart]) {
        let items: &[LineItem] = carts
            .iter()
            .find(|cart| cart.id == self.session)
            .map(|cart| cart.items.as_slice())
            .unwrap_or(&[]);
        match serde_json::to_string(items) {
            Ok(blob) => self.writer.submit(&self.key, blob),
            Err(e) => error!(key = %self.key, error = %e, "Cart snapshot serialization failed"),
        }
    }
}

/// Mirrors the whole order history under `key`, most recent first.
pub struct OrderHistorySnapshot {
    key: String,
    writer: WriterHandle,
}

impl OrderHistorySnapshot {
    pub fn new(key: impl Into<String>, writer: WriterHandle) -> Self {
        Self {
            key: key.into(),
            writer,
        }
    }
}

impl SnapshotSink<Order> for OrderHistorySnapshot {
    fn persist(&self, orders: &[&Order]) {
        match serde_json::to_string(orders) {
            Ok(blob) => self.writer.submit(&self.key, blob),
            Err(e) => error!(key = %self.key, error = %e, "Order snapshot serialization failed"),
        }
    }
}
