//! Order history resource: the order factory and time-driven delivery progression.

mod actions;
pub mod entity;
pub mod error;
pub mod lifecycle;

pub use actions::*;
pub use entity::OrderContext;
pub use error::*;
pub use lifecycle::{advance, progress_percentage, DeliverySchedule};

use crate::clients::OrderClient;
use crate::model::{Order, OrderCreate, OrderId};
use actor_framework::ResourceActor;

/// Creates a new Order actor and its client.
///
/// Ids are derived from the placement timestamp plus a random suffix; a collision is
/// rejected by the actor rather than overwriting the existing order.
pub fn new() -> (ResourceActor<Order>, OrderClient) {
    let (actor, generic_client) =
        ResourceActor::new(32, |params: &OrderCreate| OrderId::generate(params.placed_at));
    (actor, OrderClient::new(generic_client))
}
