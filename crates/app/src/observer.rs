//! In-process observer list for pushed notifications.
//!
//! Observers are plain callbacks. Each delivery goes to every observer
//! registered at the time of the call; an observer that fails (returns an
//! error or panics) is logged and skipped, the rest still receive the value.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use mediacenter_domain::error::BoxError;

/// Outcome of a single delivery.
pub type ObserverResult = Result<(), BoxError>;

type Callback<T> = Arc<dyn Fn(T) -> ObserverResult + Send + Sync>;

/// Handle identifying a registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Registry of callbacks notified with values of type `T`.
pub struct ObserverList<T> {
    next_id: AtomicU64,
    entries: Mutex<Vec<(ObserverId, Callback<T>)>>,
}

impl<T> Default for ObserverList<T> {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: Mutex::new(Vec::new()),
        }
    }
}

impl<T: Copy> ObserverList<T> {
    /// Register `observer`; it receives every value notified from now on.
    pub fn add<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(T) -> ObserverResult + Send + Sync + 'static,
    {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push((id, Arc::new(observer)));
        id
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn remove(&self, id: ObserverId) -> bool {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `value` to every registered observer.
    ///
    /// Callbacks run outside the registry lock, so an observer may add or
    /// remove observers (itself included) while being notified.
    pub fn notify(&self, value: T) {
        let snapshot: Vec<(ObserverId, Callback<T>)> = self.lock().clone();
        for (id, observer) in snapshot {
            match catch_unwind(AssertUnwindSafe(|| observer(value))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::warn!(observer = id.0, %err, "observer failed");
                }
                Err(_) => {
                    tracing::error!(observer = id.0, "observer panicked");
                }
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(ObserverId, Callback<T>)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Registration that removes its observer when dropped.
#[must_use = "dropping a subscription unregisters the observer"]
pub struct Subscription<T: Copy> {
    list: Weak<ObserverList<T>>,
    id: ObserverId,
}

impl<T: Copy> Subscription<T> {
    /// Register `observer` on `list`, tied to the returned guard.
    pub fn new<F>(list: &Arc<ObserverList<T>>, observer: F) -> Self
    where
        F: Fn(T) -> ObserverResult + Send + Sync + 'static,
    {
        let id = list.add(observer);
        Self {
            list: Arc::downgrade(list),
            id,
        }
    }

    #[must_use]
    pub fn id(&self) -> ObserverId {
        self.id
    }
}

impl<T: Copy> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(list) = self.list.upgrade() {
            list.remove(self.id);
        }
    }
}
