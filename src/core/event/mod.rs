//=========================================================================
// Event System
//=========================================================================
//
// Synchronous publish/subscribe primitives shared by every subsystem.
//
// Architecture:
//   subscribe(callback) ──> SubscriptionId
//                               │
//   emit(&payload) ──> snapshot of subscribers ──> callback(&payload)
//                               │
//   unsubscribe(id) <───────────┘
//
// Callbacks run on the emitting thread. The loader fires its finish
// signal from its own thread, so every channel is `Send + Sync`.
//
// Emission iterates a snapshot taken under the lock and calls subscribers
// with the lock released. Subscribers may therefore subscribe or
// unsubscribe (themselves included) from inside a callback. Changes take
// effect from the next emission.
//
//=========================================================================

//=== Module Declarations =================================================

mod event_group;

//=== Public API ==========================================================

pub use event_group::EventGroup;

//=== External Dependencies ===============================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

//=== Callback ============================================================

/// Shared subscriber callback.
///
/// Subscribing the same `Callback` (the same `Arc`) twice to one channel
/// registers it once. See [`Event::subscribe_shared`].
pub type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

//=== SubscriptionId ======================================================

/// Handle returned by `subscribe`, used to unsubscribe later.
///
/// Ids are unique for the lifetime of the process, across all channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

//=== Event ===============================================================

/// A single event channel.
///
/// `Event<()>` is the payload-less signal (see [`Event::fire`]).
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use odyssey_engine::core::event::Event;
///
/// let hits = Arc::new(AtomicUsize::new(0));
/// let event: Event<u32> = Event::new();
///
/// let counter = Arc::clone(&hits);
/// let id = event.subscribe(move |value| {
///     counter.fetch_add(*value as usize, Ordering::SeqCst);
/// });
///
/// event.emit(&3);
/// event.unsubscribe(id);
/// event.emit(&3);
///
/// assert_eq!(hits.load(Ordering::SeqCst), 3);
/// ```
pub struct Event<T = ()> {
    subscribers: Mutex<Vec<(SubscriptionId, Callback<T>)>>,
}

impl<T> Event<T> {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    //--- Subscription -----------------------------------------------------

    /// Registers a callback for future emissions.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId::next();
        self.lock().push((id, Arc::new(callback)));
        id
    }

    /// Registers a shared callback, keyed on its identity.
    ///
    /// If this exact `Arc` is already subscribed, the existing id is
    /// returned and nothing is added.
    pub fn subscribe_shared(&self, callback: &Callback<T>) -> SubscriptionId {
        let mut subscribers = self.lock();

        if let Some((id, _)) = subscribers
            .iter()
            .find(|(_, existing)| Arc::ptr_eq(existing, callback))
        {
            return *id;
        }

        let id = SubscriptionId::next();
        subscribers.push((id, Arc::clone(callback)));
        id
    }

    /// Removes a subscription. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.lock();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    pub fn unsubscribe_all(&self) {
        self.lock().clear();
    }

    //--- Queries ----------------------------------------------------------

    pub fn has_subscribers(&self) -> bool {
        !self.lock().is_empty()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    //--- Emission ---------------------------------------------------------

    /// Invokes every current subscriber once with `payload`.
    pub fn emit(&self, payload: &T) {
        let snapshot: Vec<Callback<T>> = self
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in snapshot {
            callback(payload);
        }
    }

    //--- Internal Helpers -------------------------------------------------

    // A subscriber that panicked mid-emit never holds the lock, but a
    // panic inside `retain`/`push` would. Keep the channel usable anyway.
    fn lock(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Callback<T>)>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Event<()> {
    /// Emits a payload-less signal.
    pub fn fire(&self) {
        self.emit(&());
    }
}

//--- Trait Implementations -----------------------------------------------

impl<T> Default for Event<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
