//! # Generic Messages
//!
//! Request messages sent from [`ResourceClient`](crate::ResourceClient) to
//! [`ResourceActor`](crate::ResourceActor), each carrying a oneshot responder.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Message type sent to the actor to request operations.
///
/// The variants cover the lifecycle every managed collection needs: creating an entity,
/// reading one or all of them, running a typed [`ActorEntity::Action`] against one entity
/// or against every entity in a single serialized step, and wiping the collection.
///
/// There is deliberately no delete: entities such as orders form a permanent history.
/// `Reset` exists for test harnesses that need a blank store.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    /// All entities, most recently created first.
    List { respond_to: Response<Vec<T>> },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    /// Applies a clone of `action` to every entity, newest first.
    /// Per-entity failures are reported in the result, not as a request failure.
    Broadcast {
        action: T::Action,
        respond_to: Response<Vec<(T::Id, Result<T::ActionResult, String>)>>,
    },
    Reset { respond_to: Response<usize> },
}
