//=========================================================================
// Screen Manager
//=========================================================================
//
// Owns every registered screen and the current key.
//
// Screens are stored in a HashMap by key, so they keep their state
// between activations. Changes requested through the `ScreenSwitch` are
// applied at the start of the next `update`, never mid-frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{Screen, ScreenKey, ScreenSwitch};
use crate::core::event::SubscriptionId;
use crate::core::render::Renderer;

//=== Screen Manager ======================================================

pub struct ScreenManager<K: ScreenKey> {
    screens: HashMap<K, Box<dyn Screen>>,
    current: K,
    switch: ScreenSwitch<K>,
}

impl<K: ScreenKey> ScreenManager<K> {
    //--- Construction -----------------------------------------------------

    /// Creates the manager with `default_key` as the current screen and
    /// calls its `load` once.
    pub fn new(
        switch: ScreenSwitch<K>,
        default_key: K,
        mut default_screen: Box<dyn Screen>,
    ) -> Self {
        info!("Starting screen manager on {:?}", default_key);
        default_screen.load();

        switch.register_key(default_key.clone());
        let mut screens = HashMap::new();
        screens.insert(default_key.clone(), default_screen);

        Self {
            screens,
            current: default_key,
            switch,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a screen under `key`. Replacing an existing registration
    /// is allowed except for the current screen, which is rejected.
    pub fn register(&mut self, key: K, screen: Box<dyn Screen>) -> bool {
        if key == self.current {
            warn!("Screen {:?} is current and cannot be replaced", key);
            return false;
        }

        if self.screens.insert(key.clone(), screen).is_some() {
            warn!("Screen {:?} was already registered and has been replaced", key);
        }
        self.switch.register_key(key);
        true
    }

    pub fn is_registered(&self, key: &K) -> bool {
        self.screens.contains_key(key)
    }

    //--- State Machine ----------------------------------------------------

    pub fn current(&self) -> &K {
        &self.current
    }

    /// Requests a change at the next `update`. See [`ScreenSwitch::change`].
    pub fn change(&self, key: K) -> bool {
        self.switch.change(key)
    }

    /// Applies a pending change, then updates the current screen.
    pub fn update(&mut self, delta_time: f64) {
        if let Some(next) = self.switch.take_pending() {
            self.swap_to(next);
        }

        if let Some(screen) = self.screens.get_mut(&self.current) {
            screen.update(delta_time);
        }
    }

    /// Draws the current screen. Pending changes are not applied here.
    pub fn draw(&mut self, renderer: &mut Renderer) {
        if let Some(screen) = self.screens.get_mut(&self.current) {
            screen.draw(renderer);
        }
    }

    //--- Close Game -------------------------------------------------------

    pub fn on_game_close<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.switch.on_close_game(callback)
    }

    pub fn close_game(&self) {
        self.switch.close_game();
    }

    /// Handle for screens and callbacks to request changes.
    pub fn switch(&self) -> &ScreenSwitch<K> {
        &self.switch
    }

    //--- Internal Helpers -------------------------------------------------

    fn swap_to(&mut self, next: K) {
        if !self.screens.contains_key(&next) {
            warn!("Pending screen {:?} is not registered, staying on {:?}", next, self.current);
            return;
        }

        debug!("Switching screen {:?} -> {:?}", self.current, next);

        if let Some(screen) = self.screens.get_mut(&self.current) {
            screen.unload();
        }
        self.current = next;
        if let Some(screen) = self.screens.get_mut(&self.current) {
            screen.load();
        }
    }
}

impl<K: ScreenKey> fmt::Debug for ScreenManager<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenManager")
            .field("current", &self.current)
            .field("screens", &self.screens.len())
            .field("switch", &self.switch)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::{Color, SharedCanvas};
    use std::sync::{Arc, Mutex};

    //--- Recording Screen -------------------------------------------------

    type Journal = Arc<Mutex<Vec<String>>>;

    struct Recording {
        name: &'static str,
        journal: Journal,
    }

    impl Recording {
        fn boxed(name: &'static str, journal: &Journal) -> Box<dyn Screen> {
            Box::new(Self {
                name,
                journal: Arc::clone(journal),
            })
        }

        fn note(&self, what: &str) {
            self.journal.lock().unwrap().push(format!("{}:{}", self.name, what));
        }
    }

    impl Screen for Recording {
        fn load(&mut self) {
            self.note("load");
        }
        fn unload(&mut self) {
            self.note("unload");
        }
        fn update(&mut self, _delta_time: f64) {
            self.note("update");
        }
        fn draw(&mut self, _renderer: &mut Renderer) {
            self.note("draw");
        }
    }

    fn manager() -> (ScreenManager<&'static str>, Journal) {
        let journal = Journal::default();
        let mut manager = ScreenManager::new(
            ScreenSwitch::new(),
            "loading",
            Recording::boxed("loading", &journal),
        );
        manager.register("menu", Recording::boxed("menu", &journal));
        manager.register("credits", Recording::boxed("credits", &journal));
        journal.lock().unwrap().clear();
        (manager, journal)
    }

    fn renderer() -> Renderer {
        Renderer::new(SharedCanvas::new(4, 4), Color::BLACK)
    }

    fn entries(journal: &Journal) -> Vec<String> {
        journal.lock().unwrap().clone()
    }

    //=====================================================================
    // Construction Tests
    //=====================================================================

    #[test]
    fn default_screen_is_loaded_once() {
        let journal = Journal::default();
        let manager = ScreenManager::new(
            ScreenSwitch::new(),
            "loading",
            Recording::boxed("loading", &journal),
        );

        assert_eq!(*manager.current(), "loading");
        assert_eq!(entries(&journal), vec!["loading:load"]);
    }

    #[test]
    fn current_screen_cannot_be_replaced() {
        let (mut manager, journal) = manager();

        assert!(!manager.register("loading", Recording::boxed("other", &journal)));
        manager.update(1.0);

        assert_eq!(entries(&journal), vec!["loading:update"]);
    }

    //=====================================================================
    // Transition Tests
    //=====================================================================

    #[test]
    fn unknown_change_is_ignored() {
        let (mut manager, journal) = manager();

        assert!(!manager.change("unknown"));
        manager.update(16.0);

        assert_eq!(*manager.current(), "loading");
        assert_eq!(entries(&journal), vec!["loading:update"]);
    }

    #[test]
    fn change_is_deferred_until_next_update() {
        let (mut manager, journal) = manager();
        let mut renderer = renderer();

        manager.update(16.0);
        assert!(manager.change("credits"));
        assert_eq!(*manager.current(), "loading");

        manager.draw(&mut renderer);
        assert_eq!(*manager.current(), "loading");

        manager.update(16.0);
        assert_eq!(*manager.current(), "credits");

        assert_eq!(
            entries(&journal),
            vec![
                "loading:update",
                "loading:draw",
                "loading:unload",
                "credits:load",
                "credits:update",
            ]
        );
    }

    #[test]
    fn change_requested_through_switch_clone() {
        let (mut manager, _journal) = manager();
        let switch = manager.switch().clone();

        switch.change("menu");
        manager.update(1.0);

        assert_eq!(*manager.current(), "menu");
        assert_eq!(switch.pending(), None);
    }

    #[test]
    fn change_to_current_reloads_it() {
        let (mut manager, journal) = manager();

        manager.change("loading");
        manager.update(1.0);

        assert_eq!(
            entries(&journal),
            vec!["loading:unload", "loading:load", "loading:update"]
        );
    }

    #[test]
    fn only_one_screen_is_active() {
        let (mut manager, journal) = manager();

        manager.change("menu");
        manager.update(1.0);
        manager.change("credits");
        manager.update(1.0);

        let journal = entries(&journal);
        let loads = journal.iter().filter(|e| e.ends_with(":load")).count();
        let unloads = journal.iter().filter(|e| e.ends_with(":unload")).count();
        // The default screen was loaded at construction (cleared from the
        // journal), so every load here is matched by one unload.
        assert_eq!(loads, unloads);
    }

    #[test]
    fn close_game_is_forwarded_not_acted_on() {
        let (mut manager, _journal) = manager();
        let closed = Arc::new(Mutex::new(false));
        let inner = Arc::clone(&closed);
        manager.on_game_close(move || *inner.lock().unwrap() = true);

        manager.close_game();
        manager.update(1.0);

        assert!(*closed.lock().unwrap());
        assert_eq!(*manager.current(), "loading");
    }
}
