//! # Snapshot Sink
//!
//! Hook through which a [`ResourceActor`](crate::ResourceActor) mirrors its collection to
//! durable storage.
//!
//! The actor calls [`SnapshotSink::persist`] synchronously from inside its message loop,
//! right after a mutation commits and before the next message is taken. The sink therefore
//! always sees a whole, consistent collection. Sinks are expected to be fire-and-forget:
//! serialize what they need and hand the bytes to a writer, never block on I/O, never fail
//! the mutation.

use crate::entity::ActorEntity;

/// Receives the full collection after every committed mutation.
pub trait SnapshotSink<T: ActorEntity>: Send + Sync + 'static {
    /// `entities` is ordered most recently created first.
    fn persist(&self, entities: &[&T]);
}

/// A sink that ignores every snapshot. Used when an actor has no backing store.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSnapshot;

impl<T: ActorEntity> SnapshotSink<T> for NoSnapshot {
    fn persist(&self, _entities: &[&T]) {}
}
