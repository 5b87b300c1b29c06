//! System wiring: startup, background scheduling, reset and shutdown.

mod error;
mod storefront_system;
mod ticker;
mod tracing;

pub use self::tracing::setup_tracing;
pub use error::SystemError;
pub use storefront_system::{StorefrontSystem, DEFAULT_SESSION};
pub use ticker::{spawn_ticker, Ticker};
