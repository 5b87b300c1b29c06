//! Cart resource: one cart per shopper session, with merge/update/remove/clear actions.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::CartContext;
pub use error::*;

use crate::clients::CartClient;
use crate::model::{Cart, CartCreate};
use actor_framework::ResourceActor;

/// Creates a new Cart actor and its client. Carts are keyed by their session id.
pub fn new() -> (ResourceActor<Cart>, CartClient) {
    let (actor, generic_client) = ResourceActor::new(32, |params: &CartCreate| params.session.clone());
    (actor, CartClient::new(generic_client))
}
