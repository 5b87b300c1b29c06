//! # Actor Framework
//!
//! Building blocks for keeping a collection of stateful entities behind a single Tokio task
//! and talking to it through typed, cloneable handles.
//!
//! Each collection (every cart, the order history, …) is owned by one [`ResourceActor`].
//! The actor drains its request channel one message at a time, so the collection has a
//! single writer: a user command and a background timer poking the same collection are
//! serialized in arrival order, with no locks around the state.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - domain state and the actions that mutate it
//! 2. **Runtime Layer** ([`ResourceActor`]) - message loop, id assignment, snapshots
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - typed request/response
//! 4. **Durability Hook** ([`SnapshotSink`]) - the whole collection, handed over after every
//!    committed mutation so it can be mirrored to storage
//!
//! ## Requests
//!
//! | Request | Effect | Snapshot |
//! |---------|--------|----------|
//! | `Create` | id from the id function, `on_create`, insert newest-first | yes |
//! | `Get` / `List` | clone out one / all entities | no |
//! | `Action` | `handle_action` on one entity | if [`ActorEntity::state_changed`] |
//! | `Broadcast` | same action on every entity, one actor turn | at most one |
//! | `Reset` | empty the collection | yes |
//!
//! ## Context Injection
//!
//! Dependencies reach entity hooks through `run(context)` rather than `new()`, so an actor
//! can be created before the services it depends on exist.
//!
//! ## Testing
//!
//! The [`mock`] module answers a real [`ResourceClient`] from a queue of expectations, which
//! keeps client wrappers testable without spawning actors.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod snapshot;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
pub use snapshot::{NoSnapshot, SnapshotSink};
