//! Pure data structures: catalog reference data, the cart, the order record and the
//! shopper profile.
//!
//! Field names serialize in camelCase so persisted snapshots keep the layout the
//! storefront has always written.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod shopper;

pub use cart::*;
pub use catalog::*;
pub use order::*;
pub use shopper::*;

/// Money in whole currency units. Catalog prices carry no fractional part.
pub type Amount = u64;
