//! Error types for the Cart actor.

use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartError {
    /// No cart exists for the session.
    #[error("Cart not found: {0}")]
    NotFound(String),

    /// The SKU is not in the catalog.
    #[error("Unknown SKU: {0}")]
    UnknownSku(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Only raised under the clamp-to-stock policy.
    #[error("Out of stock: {0}")]
    OutOfStock(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for CartError {
    fn from(msg: String) -> Self {
        CartError::ActorCommunicationError(msg)
    }
}
