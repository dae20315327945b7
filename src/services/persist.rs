// Author: Dustin Pilgrim
// License: MIT

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::core::activity::Activity;
use crate::core::store::ActivityStore;
use crate::{ddebug, dwarn};

enum PersistMsg {
    Save(Vec<Activity>),
    Flush {
        activities: Vec<Activity>,
        done: oneshot::Sender<bool>,
    },
}

/// Front of the single writer task. Saves are applied in the order they
/// were queued, so an older snapshot never lands after a newer one.
#[derive(Clone)]
pub struct PersistHandle {
    tx: mpsc::UnboundedSender<PersistMsg>,
}

impl PersistHandle {
    /// Fire-and-forget save.
    pub fn queue(&self, activities: Vec<Activity>) {
        if self.tx.send(PersistMsg::Save(activities)).is_err() {
            dwarn!("Persist", "writer is gone; dropping save");
        }
    }

    /// Saves after everything queued before it; resolves to whether the store accepted it.
    pub async fn flush(&self, activities: Vec<Activity>) -> bool {
        let (done, wait) = oneshot::channel();
        if self.tx.send(PersistMsg::Flush { activities, done }).is_err() {
            dwarn!("Persist", "writer is gone; final save skipped");
            return false;
        }
        wait.await.unwrap_or(false)
    }
}

pub fn spawn_writer(store: Arc<dyn ActivityStore>) -> PersistHandle {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(run_writer(store, rx));
    PersistHandle { tx }
}

async fn run_writer(store: Arc<dyn ActivityStore>, mut rx: mpsc::UnboundedReceiver<PersistMsg>) {
    while let Some(msg) = rx.recv().await {
        match msg {
            PersistMsg::Save(mut latest) => {
                // Only the newest of a burst of plain saves matters.
                let mut flush = None;
                while let Ok(next) = rx.try_recv() {
                    match next {
                        PersistMsg::Save(a) => latest = a,
                        PersistMsg::Flush { activities, done } => {
                            flush = Some((activities, done));
                            break;
                        }
                    }
                }

                match flush {
                    Some((activities, done)) => {
                        let ok = write(&store, activities).await;
                        let _ = done.send(ok);
                    }
                    None => {
                        write(&store, latest).await;
                    }
                }
            }
            PersistMsg::Flush { activities, done } => {
                let ok = write(&store, activities).await;
                let _ = done.send(ok);
            }
        }
    }

    ddebug!("Persist", "writer stopped");
}

async fn write(store: &Arc<dyn ActivityStore>, activities: Vec<Activity>) -> bool {
    let store = Arc::clone(store);
    let count = activities.len();

    let res = tokio::task::spawn_blocking(move || store.save(&activities)).await;

    match res {
        Ok(Ok(())) => {
            ddebug!("Persist", "saved {count} activities");
            true
        }
        Ok(Err(e)) => {
            dwarn!("Persist", "save failed: {e}");
            false
        }
        Err(e) => {
            dwarn!("Persist", "save task failed: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::StoreError;
    use crate::core::store::MemoryStore;

    struct FailingStore;

    impl ActivityStore for FailingStore {
        fn load(&self) -> Result<Option<Vec<Activity>>, StoreError> {
            Ok(None)
        }

        fn save(&self, _activities: &[Activity]) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("read-only")))
        }
    }

    #[tokio::test]
    async fn flush_lands_after_queued_saves() {
        let store = Arc::new(MemoryStore::new());
        let handle = spawn_writer(store.clone());

        handle.queue(vec![Activity::new("1", "first")]);
        handle.queue(vec![Activity::new("2", "second")]);
        assert!(handle.flush(vec![Activity::new("3", "final")]).await);

        assert_eq!(store.stored(), Some(vec![Activity::new("3", "final")]));
    }

    #[tokio::test]
    async fn last_queued_save_wins() {
        let store = Arc::new(MemoryStore::new());
        let handle = spawn_writer(store.clone());

        for i in 0..10 {
            handle.queue(vec![Activity::new(i.to_string(), "x")]);
        }
        let last = vec![Activity::new("9", "x")];
        assert!(handle.flush(last.clone()).await);

        assert_eq!(store.stored(), Some(last));
        assert!(store.save_count() <= 11);
    }

    #[tokio::test]
    async fn failures_are_swallowed() {
        let handle = spawn_writer(Arc::new(FailingStore));

        handle.queue(vec![Activity::new("1", "x")]);
        assert!(!handle.flush(vec![Activity::new("1", "x")]).await);

        // The writer keeps serving after a failure.
        assert!(!handle.flush(Vec::new()).await);
    }
}
