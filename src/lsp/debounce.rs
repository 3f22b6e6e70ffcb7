//! Per-key debouncing of background tasks

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs a task for a key once no newer task for that key was scheduled
/// within `delay`. Scheduling again restarts the wait and drops the
/// previous task.
pub struct Debouncer<K> {
    delay: Duration,
    pending: Mutex<HashMap<K, JoinHandle<()>>>,
}

impl<K> Debouncer<K>
where
    K: Eq + Hash,
{
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn schedule<F>(&self, key: K, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.retain(|_, handle| !handle.is_finished());
        if let Some(previous) = pending.insert(key, handle) {
            previous.abort();
        }
    }

    /// Drop the pending task for `key`, if any
    pub fn cancel(&self, key: &K) {
        let removed = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        if let Some(handle) = removed {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const DELAY: Duration = Duration::from_millis(50);
    const SETTLE: Duration = Duration::from_millis(300);

    fn counting_task(counter: Arc<AtomicUsize>, amount: usize) -> impl Future<Output = ()> {
        async move {
            counter.fetch_add(amount, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn bursts_collapse_into_the_last_task() {
        let debouncer = Debouncer::new(DELAY);
        let counter = Arc::new(AtomicUsize::new(0));

        debouncer.schedule("doc", counting_task(counter.clone(), 1));
        debouncer.schedule("doc", counting_task(counter.clone(), 10));
        debouncer.schedule("doc", counting_task(counter.clone(), 100));
        tokio::time::sleep(SETTLE).await;

        assert_eq!(counter.load(Ordering::SeqCst), 100);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let debouncer = Debouncer::new(DELAY);
        let counter = Arc::new(AtomicUsize::new(0));

        debouncer.schedule("a", counting_task(counter.clone(), 1));
        debouncer.schedule("b", counting_task(counter.clone(), 10));
        tokio::time::sleep(SETTLE).await;

        assert_eq!(counter.load(Ordering::SeqCst), 11);
    }

    #[tokio::test]
    async fn cancel_drops_pending_task() {
        let debouncer = Debouncer::new(DELAY);
        let counter = Arc::new(AtomicUsize::new(0));

        debouncer.schedule("doc", counting_task(counter.clone(), 1));
        debouncer.cancel(&"doc");
        tokio::time::sleep(SETTLE).await;

        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
