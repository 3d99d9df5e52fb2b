//=========================================================================
// Event Group
//=========================================================================
//
// Multiplexes event channels by a discrete kind.
//
// Architecture:
//   EventGroup<K, T>
//     └─ channels: HashMap<K, Arc<Event<T>>>   (created on first subscribe)
//
// Emitting a kind nobody subscribed to allocates nothing.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

//=== Internal Dependencies ===============================================

use super::{Callback, Event, SubscriptionId};

//=== EventGroup ==========================================================

/// Lazily populated map from event kind to [`Event`] channel.
///
/// # Examples
///
/// ```
/// use odyssey_engine::core::event::EventGroup;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Lifecycle { Started, Stopped }
///
/// let group: EventGroup<Lifecycle, &'static str> = EventGroup::new();
/// group.emit(Lifecycle::Started, &"ignored");
/// assert_eq!(group.channel_count(), 0);
///
/// let id = group.subscribe(Lifecycle::Stopped, |reason| println!("stopped: {reason}"));
/// group.emit(Lifecycle::Stopped, &"user request");
/// assert!(group.unsubscribe(Lifecycle::Stopped, id));
/// ```
pub struct EventGroup<K, T = ()> {
    channels: Mutex<HashMap<K, Arc<Event<T>>>>,
}

impl<K, T> EventGroup<K, T>
where
    K: Eq + Hash + Copy,
{
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
        }
    }

    //--- Subscription -----------------------------------------------------

    /// Registers `callback` for emissions of `kind`, creating the channel
    /// if needed.
    pub fn subscribe<F>(&self, kind: K, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.channel_or_insert(kind).subscribe(callback)
    }

    /// Identity-keyed variant of [`EventGroup::subscribe`].
    pub fn subscribe_shared(&self, kind: K, callback: &Callback<T>) -> SubscriptionId {
        self.channel_or_insert(kind).subscribe_shared(callback)
    }

    /// Removes a subscription from the channel for `kind`.
    ///
    /// Unknown kinds and ids are ignored (returns `false`).
    pub fn unsubscribe(&self, kind: K, id: SubscriptionId) -> bool {
        match self.channel(kind) {
            Some(channel) => channel.unsubscribe(id),
            None => false,
        }
    }

    //--- Emission ---------------------------------------------------------

    /// Emits `payload` to every subscriber of `kind`.
    pub fn emit(&self, kind: K, payload: &T) {
        // The map lock is released before subscribers run.
        if let Some(channel) = self.channel(kind) {
            channel.emit(payload);
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn has_channel(&self, kind: K) -> bool {
        self.lock().contains_key(&kind)
    }

    pub fn channel_count(&self) -> usize {
        self.lock().len()
    }

    pub fn subscriber_count(&self, kind: K) -> usize {
        self.channel(kind).map_or(0, |channel| channel.subscriber_count())
    }

    //--- Internal Helpers -------------------------------------------------

    fn channel(&self, kind: K) -> Option<Arc<Event<T>>> {
        self.lock().get(&kind).cloned()
    }

    fn channel_or_insert(&self, kind: K) -> Arc<Event<T>> {
        Arc::clone(self.lock().entry(kind).or_insert_with(|| Arc::new(Event::new())))
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, Arc<Event<T>>>> {
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

//--- Trait Implementations -----------------------------------------------

impl<K, T> Default for EventGroup<K, T>
where
    K: Eq + Hash + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T> fmt::Debug for EventGroup<K, T>
where
    K: Eq + Hash + Copy + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<K> = self.lock().keys().copied().collect();
        f.debug_struct("EventGroup").field("channels", &kinds).finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        Press,
        Release,
    }

    #[test]
    fn emit_without_channel_allocates_nothing() {
        let group: EventGroup<Kind, u8> = EventGroup::new();

        group.emit(Kind::Press, &1);

        assert_eq!(group.channel_count(), 0);
        assert!(!group.has_channel(Kind::Press));
    }

    #[test]
    fn channel_created_on_first_subscribe() {
        let group: EventGroup<Kind, u8> = EventGroup::new();

        group.subscribe(Kind::Press, |_| {});
        group.subscribe(Kind::Press, |_| {});

        assert!(group.has_channel(Kind::Press));
        assert!(!group.has_channel(Kind::Release));
        assert_eq!(group.subscriber_count(Kind::Press), 2);
    }

    #[test]
    fn emit_only_reaches_matching_kind() {
        let group: EventGroup<Kind, u8> = EventGroup::new();
        let presses = Arc::new(AtomicUsize::new(0));
        let releases = Arc::new(AtomicUsize::new(0));

        let p = Arc::clone(&presses);
        group.subscribe(Kind::Press, move |_| {
            p.fetch_add(1, Ordering::SeqCst);
        });
        let r = Arc::clone(&releases);
        group.subscribe(Kind::Release, move |_| {
            r.fetch_add(1, Ordering::SeqCst);
        });

        group.emit(Kind::Press, &0);
        group.emit(Kind::Press, &0);
        group.emit(Kind::Release, &0);

        assert_eq!(presses.load(Ordering::SeqCst), 2);
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn shared_callback_is_idempotent_per_kind() {
        let group: EventGroup<Kind, u8> = EventGroup::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&hits);
        let callback: Callback<u8> = Arc::new(move |_| {
            inner.fetch_add(1, Ordering::SeqCst);
        });

        group.subscribe_shared(Kind::Press, &callback);
        group.subscribe_shared(Kind::Press, &callback);
        group.emit(Kind::Press, &0);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_from_unknown_kind_is_noop() {
        let group: EventGroup<Kind, u8> = EventGroup::new();
        let id = group.subscribe(Kind::Press, |_| {});

        assert!(!group.unsubscribe(Kind::Release, id));
        assert!(group.unsubscribe(Kind::Press, id));
        assert!(!group.unsubscribe(Kind::Press, id));
    }

    #[test]
    fn callback_may_subscribe_to_same_group_during_emit() {
        let group: Arc<EventGroup<Kind, u8>> = Arc::new(EventGroup::new());

        let inner = Arc::clone(&group);
        group.subscribe(Kind::Press, move |_| {
            inner.subscribe(Kind::Release, |_| {});
        });

        group.emit(Kind::Press, &0);

        assert_eq!(group.subscriber_count(Kind::Release), 1);
    }
}
