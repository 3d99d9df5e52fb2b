//=========================================================================
// Screen Switch
//=========================================================================
//
// Thread-safe request side of the screen state machine.
//
// Screens and callbacks (including the loader's finish callback on the
// loader thread) record the next screen here. The manager consumes the
// request at the start of its next update.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use log::debug;

//=== Internal Dependencies ===============================================

use super::ScreenKey;
use crate::core::event::{Event, SubscriptionId};

//=== ScreenSwitch ========================================================

struct SwitchShared<K> {
    registered: RwLock<HashSet<K>>,
    pending: Mutex<Option<K>>,
    close_game: Event,
}

/// Cloneable handle for requesting screen changes and game shutdown.
#[derive(Clone)]
pub struct ScreenSwitch<K: ScreenKey> {
    shared: Arc<SwitchShared<K>>,
}

impl<K: ScreenKey> ScreenSwitch<K> {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(SwitchShared {
                registered: RwLock::new(HashSet::new()),
                pending: Mutex::new(None),
                close_game: Event::new(),
            }),
        }
    }

    //--- Transitions ------------------------------------------------------

    /// Requests `key` as the next screen.
    ///
    /// Unregistered keys are ignored and return `false`. A later request
    /// in the same frame overrides an earlier one.
    pub fn change(&self, key: K) -> bool {
        if !self.is_registered(&key) {
            debug!("Ignoring change to unregistered screen {:?}", key);
            return false;
        }

        let mut pending = self.shared.pending.lock().unwrap_or_else(PoisonError::into_inner);
        *pending = Some(key);
        true
    }

    /// The requested screen not yet applied, if any.
    pub fn pending(&self) -> Option<K> {
        self.shared
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_registered(&self, key: &K) -> bool {
        self.shared
            .registered
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }

    pub(crate) fn register_key(&self, key: K) {
        self.shared
            .registered
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key);
    }

    pub(crate) fn take_pending(&self) -> Option<K> {
        self.shared
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    //--- Close Game -------------------------------------------------------

    /// Emits the close-game signal. The owning application decides what
    /// shutdown means; the engine stops its loop.
    pub fn close_game(&self) {
        debug!("Close game requested");
        self.shared.close_game.fire();
    }

    pub fn on_close_game<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.shared.close_game.subscribe(move |_| callback())
    }

    pub fn unsubscribe_close_game(&self, id: SubscriptionId) -> bool {
        self.shared.close_game.unsubscribe(id)
    }
}

impl<K: ScreenKey> Default for ScreenSwitch<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ScreenKey> fmt::Debug for ScreenSwitch<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenSwitch")
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn switch() -> ScreenSwitch<&'static str> {
        let switch = ScreenSwitch::new();
        switch.register_key("loading");
        switch.register_key("menu");
        switch
    }

    #[test]
    fn change_records_registered_key() {
        let switch = switch();

        assert!(switch.change("menu"));
        assert_eq!(switch.pending(), Some("menu"));
        assert_eq!(switch.take_pending(), Some("menu"));
        assert_eq!(switch.pending(), None);
    }

    #[test]
    fn change_to_unregistered_key_is_ignored() {
        let switch = switch();

        assert!(!switch.change("credits"));
        assert_eq!(switch.pending(), None);
    }

    #[test]
    fn last_request_wins() {
        let switch = switch();
        switch.change("menu");
        switch.change("loading");

        assert_eq!(switch.take_pending(), Some("loading"));
    }

    #[test]
    fn change_from_another_thread() {
        let switch = switch();
        let remote = switch.clone();

        thread::spawn(move || remote.change("menu")).join().unwrap();

        assert_eq!(switch.pending(), Some("menu"));
    }

    #[test]
    fn close_game_notifies_subscribers() {
        let switch = switch();
        let calls = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&calls);
        let id = switch.on_close_game(move || {
            inner.fetch_add(1, Ordering::SeqCst);
        });

        switch.close_game();
        assert!(switch.unsubscribe_close_game(id));
        switch.close_game();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
