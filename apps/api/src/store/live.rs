//! Live query subscriptions.
//!
//! A [`LiveQuery`] re-delivers the full result set of its query after every
//! write to the watched collection (no diffing), until the consumer calls
//! [`LiveQuery::unsubscribe`] or drops the handle. Errors arrive as a distinct
//! terminal event, never mixed into the data channel.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use super::{DocStore, QueryOptions, Record, StoreError};

/// Published on the store-wide change feed after every successful write.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub collection: String,
}

/// Fan-out point for change notifications, shared by all store backends.
#[derive(Clone)]
pub struct ChangeHub {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self { tx }
    }

    pub fn publish(&self, collection: &str) {
        // No receivers is fine; the send result is irrelevant.
        let _ = self.tx.send(ChangeEvent {
            collection: collection.to_string(),
        });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub enum LiveEvent {
    /// The full current result set of the watched query.
    Snapshot(Vec<Record>),
    /// Terminal: the subscription is dead after this event.
    Error(StoreError),
}

/// Handle to a live query. Dropping it tears the subscription down; calling
/// [`unsubscribe`](Self::unsubscribe) more than once is a no-op.
pub struct LiveQuery {
    rx: mpsc::Receiver<LiveEvent>,
    task: Option<JoinHandle<()>>,
}

impl LiveQuery {
    /// Waits for the next snapshot or terminal error. `None` once the
    /// subscription has ended.
    pub async fn recv(&mut self) -> Option<LiveEvent> {
        self.rx.recv().await
    }

    pub fn unsubscribe(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.rx.close();
    }
}

impl Drop for LiveQuery {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Stream for LiveQuery {
    type Item = LiveEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

/// Starts a live query: delivers the current result set immediately, then a
/// fresh snapshot after every write to `collection`.
pub fn watch(store: Arc<dyn DocStore>, collection: &str, options: QueryOptions) -> LiveQuery {
    let (tx, rx) = mpsc::channel(16);
    let collection = collection.to_string();
    let mut changes = store.changes();

    let task = tokio::spawn(async move {
        match store.query(&collection, options.clone()).await {
            Ok(records) => {
                if tx.send(LiveEvent::Snapshot(records)).await.is_err() {
                    return;
                }
            }
            Err(err) => {
                let _ = tx.send(LiveEvent::Error(err)).await;
                return;
            }
        }

        loop {
            match changes.recv().await {
                Ok(event) if event.collection == collection => {}
                Ok(_) => continue,
                // Lagging just means we missed intermediate writes; the next
                // snapshot is computed from current state anyway.
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => break,
            }

            match store.query(&collection, options.clone()).await {
                Ok(records) => {
                    if tx.send(LiveEvent::Snapshot(records)).await.is_err() {
                        break;
                    }
                }
                Err(err) => {
                    let _ = tx.send(LiveEvent::Error(err)).await;
                    break;
                }
            }
        }
    });

    LiveQuery {
        rx,
        task: Some(task),
    }
}
