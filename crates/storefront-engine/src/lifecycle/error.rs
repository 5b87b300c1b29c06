use crate::cart_actor::CartError;
use crate::catalog::CatalogError;
use crate::order_actor::OrderError;
use crate::persistence::PersistenceError;
use thiserror::Error;

/// Errors starting, resetting or stopping the storefront system.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Actor task failed: {0}")]
    ActorTaskFailed(String),
}
