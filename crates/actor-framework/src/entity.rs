//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract every resource (a cart, an order, …) implements
//! to be managed by the generic [`ResourceActor`](crate::ResourceActor). It names the
//! associated types for ids, creation payloads, actions, context and errors, and provides
//! the lifecycle hooks the actor calls while it owns the entity.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`] runs after construction, before the entity is stored.
//! - [`ActorEntity::state_changed`] tells the actor whether an action result committed a
//!   mutation, so the snapshot sink is only fired for real changes.
//!
//! Neither needs implementing unless the entity wants to customize behavior.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by `ResourceActor`.
///
/// # Async & Context
/// This trait is `#[async_trait]` so hooks may await (e.g., reading a clock service or
/// calling another actor). The `Context` type is injected into every hook at `run()` time,
/// not at construction time.
#[async_trait]
pub trait ActorEntity: Clone + Debug + Send + Sync + 'static {
    /// The unique identifier for this entity.
    ///
    /// Ids are assigned by the id function handed to [`ResourceActor::new`](crate::ResourceActor::new),
    /// so any type works here; there is no counter-based conversion.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// Enum of resource-specific operations (e.g., `AddItem`, `Advance`).
    /// `Clone` so one action can be broadcast to every entity.
    type Action: Send + Sync + Debug + Clone;

    /// The result type returned by actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// One error enum per actor rather than one per action: every hook returns the same
    /// `Self::Error`, and clients get back a single type to match on.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The entity's own id, used when restoring a persisted collection.
    fn id(&self) -> &Self::Id;

    /// Construct the full entity from the assigned id and the payload.
    /// Called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Called after construction and before the entity is inserted.
    /// Returning an error aborts the create; nothing is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handle a resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;

    /// Whether a successful action result changed the entity.
    ///
    /// The actor only emits a snapshot when this returns `true`.
    fn state_changed(_result: &Self::ActionResult) -> bool {
        true
    }
}
