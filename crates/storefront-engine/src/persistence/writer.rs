use super::{KeyValueStore, PersistenceError};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

enum WriteCommand {
    Save { key: String, blob: String },
    Remove { key: String },
    Flush(oneshot::Sender<()>),
}

/// Cheap, cloneable submitter for the writer task. Submitting never blocks, so it is
/// safe to call from inside an actor's message loop.
#[derive(Clone)]
pub struct WriterHandle {
    sender: mpsc::UnboundedSender<WriteCommand>,
}

impl WriterHandle {
    pub fn submit(&self, key: &str, blob: String) {
        self.send(WriteCommand::Save {
            key: key.to_string(),
            blob,
        });
    }

    pub fn remove(&self, key: &str) {
        self.send(WriteCommand::Remove {
            key: key.to_string(),
        });
    }

    /// Resolves once every write submitted before this call has been attempted.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        self.send(WriteCommand::Flush(done));
        let _ = wait.await;
    }

    fn send(&self, command: WriteCommand) {
        if self.sender.send(command).is_err() {
            warn!("Snapshot writer is gone, dropping write");
        }
    }
}

/// Background task that applies snapshot writes to a [`KeyValueStore`] one at a time, in
/// submission order.
pub struct SnapshotWriter {
    handle: WriterHandle,
    task: JoinHandle<()>,
}

impl SnapshotWriter {
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(store, receiver));
        Self {
            handle: WriterHandle { sender },
            task,
        }
    }

    pub fn handle(&self) -> WriterHandle {
        self.handle.clone()
    }

    pub async fn flush(&self) {
        self.handle.flush().await;
    }

    /// Drains pending writes and stops the task. Every other [`WriterHandle`] must have
    /// been dropped already, otherwise this waits for them.
    pub async fn shutdown(self) {
        drop(self.handle);
        if let Err(e) = self.task.await {
            error!(error = %e, "Snapshot writer task failed");
        }
    }
}

async fn run(store: Arc<dyn KeyValueStore>, mut receiver: mpsc::UnboundedReceiver<WriteCommand>) {
    info!("Snapshot writer started");

    while let Some(command) = receiver.recv().await {
        match command {
            WriteCommand::Save { key, blob } => {
                let bytes = blob.len();
                let result = blocking(&store, key.clone(), move |store, key| store.save(key, &blob)).await;
                match result {
                    Ok(()) => debug!(%key, bytes, "Snapshot saved"),
                    Err(e) => warn!(%key, error = %e, "Snapshot write failed"),
                }
            }
            WriteCommand::Remove { key } => {
                if let Err(e) = blocking(&store, key.clone(), |store, key| store.remove(key)).await {
                    warn!(%key, error = %e, "Snapshot remove failed");
                }
            }
            WriteCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }

    info!("Snapshot writer stopped");
}

async fn blocking<F>(store: &Arc<dyn KeyValueStore>, key: String, op: F) -> Result<(), PersistenceError>
where
    F: FnOnce(&dyn KeyValueStore, &str) -> Result<(), PersistenceError> + Send + 'static,
{
    let store = store.clone();
    let task_key = key.clone();
    match tokio::task::spawn_blocking(move || op(store.as_ref(), &task_key)).await {
        Ok(result) => result,
        Err(e) => Err(PersistenceError::Write {
            key,
            reason: format!("writer thread failed: {e}"),
        }),
    }
}
