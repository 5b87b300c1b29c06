use super::{Amount, LineItem};
use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Order identifier: `ORD{epoch_millis}_{4 alphanumerics}`, upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    /// Builds an id from the placement time and a random suffix.
    pub fn generate(placed_at: DateTime<Utc>) -> Self {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(4)
            .map(char::from)
            .collect();
        Self(format!("ORD{}_{}", placed_at.timestamp_millis(), suffix).to_uppercase())
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fulfillment status. Serialized as the labels the tracking page displays.
///
/// Labels this engine does not know (written by some older build) load as
/// [`OrderStatus::Unknown`] with the raw label kept, so a snapshot still loads and
/// writes back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Placed,
    Shipped,
    OutForDelivery,
    Delivered,
    Unknown(String),
}

impl OrderStatus {
    pub fn label(&self) -> &str {
        match self {
            OrderStatus::Placed => "Placed",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::OutForDelivery => "Out for delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Unknown(label) => label,
        }
    }

    /// The next status in canonical order. `None` for the terminal and unknown states.
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Placed => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => Some(OrderStatus::OutForDelivery),
            OrderStatus::OutForDelivery => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Unknown(_) => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered)
    }
}

impl From<String> for OrderStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Placed" => OrderStatus::Placed,
            "Shipped" => OrderStatus::Shipped,
            "Out for delivery" => OrderStatus::OutForDelivery,
            "Delivered" => OrderStatus::Delivered,
            _ => OrderStatus::Unknown(label),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Unknown(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "saved-card")]
    SavedCard,
    #[serde(rename = "new-card")]
    NewCard,
    #[serde(rename = "netbanking")]
    NetBanking,
    #[serde(rename = "upi")]
    Upi,
    #[serde(rename = "wallet")]
    Wallet,
    #[serde(rename = "cod")]
    CashOnDelivery,
}

impl PaymentMethod {
    /// Card methods carry an alias on the order record.
    pub fn is_card(self) -> bool {
        matches!(self, PaymentMethod::SavedCard | PaymentMethod::NewCard)
    }
}

/// How an order was paid, as recorded on the order. Never holds a full card number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDescriptor {
    pub method: PaymentMethod,
    #[serde(rename = "cardAlias", default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masked: Option<String>,
}

impl PaymentDescriptor {
    pub const SAVED_CARD_ALIAS: &'static str = "Rose";
    pub const SAVED_CARD_MASK: &'static str = "•••• 4242";
    pub const NEW_CARD_ALIAS: &'static str = "New Card";

    pub fn for_method(method: PaymentMethod) -> Self {
        let (alias, masked) = match method {
            PaymentMethod::SavedCard => (
                Some(Self::SAVED_CARD_ALIAS.to_string()),
                Some(Self::SAVED_CARD_MASK.to_string()),
            ),
            PaymentMethod::NewCard => (Some(Self::NEW_CARD_ALIAS.to_string()), None),
            _ => (None, None),
        };
        Self {
            method,
            alias,
            masked,
        }
    }
}

/// Money breakdown of an order. `total == subtotal + shipping + tax`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Amount,
    pub shipping: Amount,
    pub tax: Amount,
    pub total: Amount,
}

/// An immutable snapshot of a purchase plus its mutable fulfillment status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: OrderId,
    pub items: Vec<LineItem>,
    #[serde(flatten)]
    pub totals: Totals,
    pub payment: PaymentDescriptor,
    pub address: String,
    pub placed_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub timeline: Vec<TimelineEntry>,
}

impl Order {
    /// Time since placement. Negative if `now` is before `placed_at`.
    pub fn elapsed(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.placed_at
    }
}

/// Creation payload for the order factory.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub items: Vec<LineItem>,
    pub totals: Totals,
    pub payment: PaymentDescriptor,
    pub address: String,
    pub placed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_follow_the_order_format() {
        let placed_at = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let id = OrderId::generate(placed_at);

        let (prefix, suffix) = id.0.split_once('_').unwrap();
        assert_eq!(prefix, "ORD1700000000123");
        assert_eq!(suffix.len(), 4);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn status_labels_round_trip() {
        for status in [
            OrderStatus::Placed,
            OrderStatus::Shipped,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.label()));
            let back: OrderStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn unrecognized_status_is_kept_verbatim() {
        let status: OrderStatus = serde_json::from_str("\"Returned\"").unwrap();
        assert_eq!(status, OrderStatus::Unknown("Returned".into()));
        assert_eq!(status.next(), None);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"Returned\"");
    }

    #[test]
    fn payment_descriptors_by_method() {
        let saved = PaymentDescriptor::for_method(PaymentMethod::SavedCard);
        assert_eq!(saved.alias.as_deref(), Some("Rose"));
        assert_eq!(saved.masked.as_deref(), Some("•••• 4242"));

        let new_card = PaymentDescriptor::for_method(PaymentMethod::NewCard);
        assert_eq!(new_card.alias.as_deref(), Some("New Card"));

        let cod = PaymentDescriptor::for_method(PaymentMethod::CashOnDelivery);
        assert_eq!(cod.alias, None);
        assert_eq!(
            serde_json::to_value(&cod).unwrap(),
            serde_json::json!({ "method": "cod" })
        );
    }

    #[test]
    fn order_totals_are_flattened() {
        let order = Order {
            order_id: OrderId::from("ORD1_AAAA"),
            items: Vec::new(),
            totals: Totals {
                subtotal: 100,
                shipping: 0,
                tax: 18,
                total: 118,
            },
            payment: PaymentDescriptor::for_method(PaymentMethod::Upi),
            address: "home".into(),
            placed_at: DateTime::from_timestamp(0, 0).unwrap(),
            status: OrderStatus::Placed,
            timeline: Vec::new(),
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["orderId"], "ORD1_AAAA");
        assert_eq!(json["total"], 118);
        assert_eq!(json["placedAt"], "1970-01-01T00:00:00Z");

        let back: Order = serde_json::from_value(json).unwrap();
        assert_eq!(back, order);
    }
}
