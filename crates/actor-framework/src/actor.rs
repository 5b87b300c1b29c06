//! # Generic Actor Server
//!
//! This module defines the `ResourceActor`, the single task that owns a collection of
//! entities. Every read and write to the collection goes through its message loop, so the
//! collection has exactly one writer and needs no lock.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use crate::snapshot::{NoSnapshot, SnapshotSink};
use std::collections::{HashMap, VecDeque};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

type IdFn<T> = Box<dyn Fn(&<T as ActorEntity>::Create) -> <T as ActorEntity>::Id + Send + Sync>;

/// The generic actor that manages a collection of entities.
///
/// The actor owns the `store`, a recency list (most recently created first) and the
/// receiving half of the channel. Messages are processed one at a time, so a create racing
/// against a broadcast action is simply applied in arrival order.
///
/// # Usage Pattern
///
/// 1.  **Create**: `ResourceActor::new(buffer, id_fn)` returns the actor and its client.
/// 2.  **Configure**: optionally `restore()` persisted entities and attach a sink with
///     `with_sink()`.
/// 3.  **Run**: spawn `actor.run(context)`.
///
/// ```rust
/// use actor_framework::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Counter { id: String, hits: u32 }
/// #[derive(Debug)] struct CounterCreate { name: String }
/// #[derive(Debug, Clone)] enum CounterAction { Hit }
/// #[derive(Debug, thiserror::Error)] #[error("counter error")] struct CounterError;
///
/// #[async_trait]
/// impl ActorEntity for Counter {
///     type Id = String;
///     type Create = CounterCreate;
///     type Action = CounterAction;
///     type ActionResult = u32;
///     type Context = ();
///     type Error = CounterError;
///
///     fn id(&self) -> &String { &self.id }
///     fn from_create_params(id: String, _: CounterCreate) -> Result<Self, Self::Error> {
///         Ok(Self { id, hits: 0 })
///     }
///     async fn handle_action(&mut self, _: CounterAction, _: &()) -> Result<u32, Self::Error> {
///         self.hits += 1;
///         Ok(self.hits)
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Counter>::new(10, |p: &CounterCreate| p.name.clone());
///     tokio::spawn(actor.run(()));
///
///     let id = client.create(CounterCreate { name: "home".into() }).await.unwrap();
///     assert_eq!(client.perform_action(id, CounterAction::Hit).await.unwrap(), 1);
/// }
/// ```
///
/// # Operations
///
/// * **Create**: assigns an id through the id function, rejects ids already in the store
///   with [`FrameworkError::AlreadyExists`], builds the entity, runs `on_create`, inserts it
///   at the front of the recency list and emits a snapshot.
/// * **Get** / **List**: clone out one entity or all of them, newest first.
/// * **Action**: runs `handle_action` on one entity; emits a snapshot when
///   [`ActorEntity::state_changed`] says the result mutated state.
/// * **Broadcast**: runs the same action on every entity and emits at most one snapshot.
/// * **Reset**: empties the collection and emits the empty snapshot.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    recency: VecDeque<T::Id>,
    next_id: IdFn<T>,
    sink: Box<dyn SnapshotSink<T>>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - Capacity of the request channel. When full, client calls wait.
    /// * `next_id` - Assigns the id of each new entity from its creation payload.
    pub fn new(
        buffer_size: usize,
        next_id: impl Fn(&T::Create) -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            recency: VecDeque::new(),
            next_id: Box::new(next_id),
            sink: Box::new(NoSnapshot),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Attaches the sink that receives a snapshot after every committed mutation.
    pub fn with_sink(mut self, sink: impl SnapshotSink<T>) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Seeds the store with previously persisted entities, given newest first.
    ///
    /// No snapshot is emitted; the entities came from storage. Entities whose id is
    /// already present are skipped.
    pub fn restore(mut self, entities: Vec<T>) -> Self {
        for entity in entities {
            let id = entity.id().clone();
            if self.store.contains_key(&id) {
                warn!(%id, "Duplicate id in restored snapshot, skipping");
                continue;
            }
            self.recency.push_back(id.clone());
            self.store.insert(id, entity);
        }
        self
    }

    fn emit_snapshot(&self) {
        let entities: Vec<&T> = self
            .recency
            .iter()
            .filter_map(|id| self.store.get(id))
            .collect();
        self.sink.persist(&entities);
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    ///
    /// # Context Injection
    /// The `context` is handed to every entity hook. It is supplied here rather than in
    /// `new()` so dependencies created after the actor can still be wired in.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, size = self.store.len(), "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = (self.next_id)(&params);
                    if self.store.contains_key(&id) {
                        warn!(entity_type, %id, "Already exists");
                        let _ = respond_to.send(Err(FrameworkError::AlreadyExists(id.to_string())));
                        continue;
                    }

                    match T::from_create_params(id.clone(), params) {
                        Ok(mut item) => {
                            if let Err(e) = item.on_create(&context).await {
                                warn!(entity_type, %id, error = %e, "on_create failed");
                                let _ =
                                    respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                                continue;
                            }
                            self.store.insert(id.clone(), item);
                            self.recency.push_front(id.clone());
                            self.emit_snapshot();
                            info!(entity_type, %id, size = self.store.len(), "Created");
                            let _ = respond_to.send(Ok(id));
                        }
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    let items: Vec<T> = self
                        .recency
                        .iter()
                        .filter_map(|id| self.store.get(id).cloned())
                        .collect();
                    debug!(entity_type, count = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let Some(item) = self.store.get_mut(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let result = item.handle_action(action, &context).await;
                    match result {
                        Ok(value) => {
                            if T::state_changed(&value) {
                                self.emit_snapshot();
                            }
                            info!(entity_type, %id, "Action ok");
                            let _ = respond_to.send(Ok(value));
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Action failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::Broadcast { action, respond_to } => {
                    debug!(entity_type, ?action, size = self.store.len(), "Broadcast");
                    let mut changed = false;
                    let mut results = Vec::with_capacity(self.recency.len());
                    for id in &self.recency {
                        let Some(item) = self.store.get_mut(id) else {
                            continue;
                        };
                        match item.handle_action(action.clone(), &context).await {
                            Ok(value) => {
                                changed |= T::state_changed(&value);
                                results.push((id.clone(), Ok(value)));
                            }
                            Err(e) => {
                                warn!(entity_type, %id, error = %e, "Broadcast action failed");
                                results.push((id.clone(), Err(e.to_string())));
                            }
                        }
                    }
                    if changed {
                        self.emit_snapshot();
                        info!(entity_type, "Broadcast committed");
                    }
                    let _ = respond_to.send(Ok(results));
                }
                ResourceRequest::Reset { respond_to } => {
                    let removed = self.store.len();
                    self.store.clear();
                    self.recency.clear();
                    self.emit_snapshot();
                    info!(entity_type, removed, "Reset");
                    let _ = respond_to.send(Ok(removed));
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}
