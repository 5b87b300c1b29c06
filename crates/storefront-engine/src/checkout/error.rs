//! Error types for checkout.

use crate::cart_actor::CartError;
use crate::order_actor::OrderError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Cannot place an order with an empty cart")]
    EmptyCart,

    #[error("Invalid payment input: {0}")]
    InvalidPaymentInput(String),

    /// Another placement has not finished yet.
    #[error("A payment is already being processed")]
    PaymentInProgress,

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Order(#[from] OrderError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for CheckoutError {
    fn from(msg: String) -> Self {
        CheckoutError::ActorCommunicationError(msg)
    }
}
