//! Typed client wrappers around the generic [`ResourceClient`](actor_framework::ResourceClient).
//!
//! Each wrapper turns domain calls into actor requests and maps framework errors back into
//! the resource's own error type. `get`, `exists` and `list` come from
//! [`ActorClient`](actor_framework::ActorClient).

mod cart_client;
mod order_client;

pub use cart_client::CartClient;
pub use order_client::OrderClient;
