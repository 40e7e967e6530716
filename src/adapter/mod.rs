//! Status adapter
//!
//! Owns the compose list and publishes every change to the presentation
//! layer as a [`ListUpdate`]. A single worker task holds the list; commands
//! arrive over a FIFO channel and are handled one at a time, so reading the
//! current list, diffing it on the blocking pool, and swapping in the result
//! can never interleave with another mutation.

mod state;

pub use state::ListChange;

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::diff::{self, EditScript};
use crate::models::{EditorItem, FooterState, Item, Tweet};

use state::ListState;

/// Channel capacity for commands and published updates
const CHANNEL_CAPACITY: usize = 32;

/// Diff function used by the worker
pub type Differ = Arc<dyn Fn(&[Item], &[Item]) -> EditScript + Send + Sync>;

/// A list change ready to be rendered
#[derive(Debug, Clone, Serialize)]
pub struct ListUpdate {
    /// Strictly increasing per applied change
    pub revision: u64,
    /// Instructions turning the previous list into `items`
    pub script: EditScript,
    /// The new canonical list
    pub items: Vec<Item>,
}

/// Errors returned by [`AdapterHandle`]
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The worker task is no longer running
    #[error("status adapter has shut down")]
    Closed,
}

enum Command {
    Apply(ListChange),
    Snapshot(oneshot::Sender<Vec<Item>>),
    Shutdown,
}

/// Cloneable handle for issuing list changes.
///
/// Every method returns once the command is queued; the diff itself runs
/// later and its result arrives on the update receiver.
#[derive(Debug, Clone)]
pub struct AdapterHandle {
    cmd_tx: mpsc::Sender<Command>,
}

impl AdapterHandle {
    /// Replace all previous statuses, keeping the editor last.
    ///
    /// Ignored while no editor exists.
    pub async fn set_previous_status(&self, tweets: Vec<Tweet>) -> Result<(), AdapterError> {
        self.apply(ListChange::SetPreviousStatus(tweets)).await
    }

    /// Insert or replace the editor.
    ///
    /// The first applied editor gets `initial_value = true`, every later one
    /// `false`, whatever the supplied item says.
    pub async fn update_editor(&self, item: EditorItem) -> Result<(), AdapterError> {
        self.apply(ListChange::UpdateEditor(item)).await
    }

    /// Show newly posted statuses and reset the editor, pre-filled with the
    /// footer when it is enabled
    pub async fn update_previous_and_clear_editor(
        &self,
        tweets: Vec<Tweet>,
        footer: FooterState,
    ) -> Result<(), AdapterError> {
        self.apply(ListChange::UpdatePreviousAndClearEditor { tweets, footer })
            .await
    }

    /// Reset the editor, leaving previous statuses alone
    pub async fn clear_editor(&self) -> Result<(), AdapterError> {
        self.apply(ListChange::ClearEditor).await
    }

    /// Update the counter fields of the editor
    pub async fn update_status_counter(
        &self,
        valid: bool,
        length: usize,
        max_length: usize,
    ) -> Result<(), AdapterError> {
        self.apply(ListChange::UpdateStatusCounter {
            valid,
            length,
            max_length,
        })
        .await
    }

    /// Queue an arbitrary list change
    pub async fn apply(&self, change: ListChange) -> Result<(), AdapterError> {
        self.send(Command::Apply(change)).await
    }

    /// Get the canonical list once all previously queued changes are applied
    pub async fn snapshot(&self) -> Result<Vec<Item>, AdapterError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Snapshot(reply_tx)).await?;
        reply_rx.await.map_err(|_| AdapterError::Closed)
    }

    /// Stop the worker after the queued changes and drop the list
    pub async fn shutdown(&self) -> Result<(), AdapterError> {
        self.send(Command::Shutdown).await
    }

    async fn send(&self, cmd: Command) -> Result<(), AdapterError> {
        self.cmd_tx.send(cmd).await.map_err(|_| AdapterError::Closed)
    }
}

/// Spawn the adapter worker with the default diff engine.
///
/// Must be called from within a tokio runtime.
pub fn spawn_adapter() -> (AdapterHandle, mpsc::Receiver<ListUpdate>) {
    spawn_adapter_with(Arc::new(|old: &[Item], new: &[Item]| diff::diff(old, new)))
}

/// Spawn the adapter worker with a custom diff function
pub fn spawn_adapter_with(differ: Differ) -> (AdapterHandle, mpsc::Receiver<ListUpdate>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(CHANNEL_CAPACITY);
    let (update_tx, update_rx) = mpsc::channel::<ListUpdate>(CHANNEL_CAPACITY);

    tokio::spawn(adapter_task(cmd_rx, update_tx, differ));

    (AdapterHandle { cmd_tx }, update_rx)
}

async fn adapter_task(
    mut cmd_rx: mpsc::Receiver<Command>,
    update_tx: mpsc::Sender<ListUpdate>,
    differ: Differ,
) {
    let mut state = ListState::default();
    let mut revision = 0u64;
    let mut presenter_gone = false;

    while let Some(cmd) = cmd_rx.recv().await {
        let change = match cmd {
            Command::Apply(change) => change,
            Command::Snapshot(reply) => {
                let _ = reply.send(state.items().to_vec());
                continue;
            }
            Command::Shutdown => break,
        };

        let Some(items) = state.plan(&change) else {
            tracing::debug!("No editor yet, skipping {}", change.name());
            continue;
        };

        let old = state.items().to_vec();
        let differ = Arc::clone(&differ);
        let computed = tokio::task::spawn_blocking(move || {
            let script = differ(&old, &items);
            (script, items)
        })
        .await;

        let (script, items) = match computed {
            Ok(result) => result,
            Err(e) => {
                // Keep the last good list; nothing is published
                tracing::error!("Diff failed for {}: {}", change.name(), e);
                continue;
            }
        };

        state.commit(items.clone());
        revision += 1;
        tracing::debug!("{} (revision {}, {} ops)", change.name(), revision, script.len());

        if presenter_gone {
            continue;
        }
        let update = ListUpdate {
            revision,
            script,
            items,
        };
        if update_tx.send(update).await.is_err() {
            tracing::warn!("List update receiver dropped; updates are no longer published");
            presenter_gone = true;
        }
    }

    tracing::debug!("Status adapter shutting down");
}
