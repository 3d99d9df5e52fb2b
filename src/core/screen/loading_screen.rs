//=========================================================================
// Loading Screen
//=========================================================================
//
// Built-in screen shown while the resource loader runs.
//
// It draws from an `EarlyAssets` bundle (decoded before the engine was
// built) and requests the next screen once the loader signals finish.
// The finish callback runs on the loader thread and only touches the
// thread-safe `ScreenSwitch`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{Screen, ScreenKey, ScreenSwitch};
use crate::core::event::SubscriptionId;
use crate::core::render::{Color, PixelBuffer, Renderer};
use crate::core::resource::{EarlyAssets, ResourceLoader};

//=== Constants ===========================================================

const BAR_HEIGHT: u32 = 12;
const BAR_MARGIN: u32 = 24;

//=== LoadingScreen =======================================================

pub struct LoadingScreen<K: ScreenKey> {
    loader: ResourceLoader,
    switch: ScreenSwitch<K>,
    next: K,
    assets: EarlyAssets,
    background: Option<Arc<PixelBuffer>>,
    track_color: Color,
    fill_color: Color,
    finish_subscription: Option<SubscriptionId>,
    reported: usize,
}

impl<K: ScreenKey> LoadingScreen<K> {
    //--- Construction -----------------------------------------------------

    /// Shows loader progress and requests `next` when loading finishes.
    pub fn new(
        loader: ResourceLoader,
        switch: ScreenSwitch<K>,
        next: K,
        assets: EarlyAssets,
    ) -> Self {
        Self {
            loader,
            switch,
            next,
            assets,
            background: None,
            track_color: Color::DARK_GRAY,
            fill_color: Color::WHITE,
            finish_subscription: None,
            reported: 0,
        }
    }

    /// Uses the early asset at `path` as a full-screen background.
    pub fn with_background(mut self, path: &str) -> Self {
        self.background = self.assets.image(path);
        if self.background.is_none() {
            warn!("Loading screen background {} is not an early image asset", path);
        }
        self
    }

    pub fn with_bar_colors(mut self, track: Color, fill: Color) -> Self {
        self.track_color = track;
        self.fill_color = fill;
        self
    }

    //--- Queries ----------------------------------------------------------

    /// `"loaded/count"` from the loader.
    pub fn progress_text(&self) -> String {
        self.loader.loading_progress_text()
    }

    pub fn assets(&self) -> &EarlyAssets {
        &self.assets
    }
}

//--- Screen Implementation -----------------------------------------------

impl<K: ScreenKey> Screen for LoadingScreen<K> {
    fn load(&mut self) {
        let switch = self.switch.clone();
        let next = self.next.clone();
        self.finish_subscription = Some(self.loader.on_finish(move || {
            switch.change(next.clone());
        }));

        // Finish may have fired before we subscribed.
        if self.loader.is_finished() {
            self.switch.change(self.next.clone());
        }
    }

    fn unload(&mut self) {
        if let Some(id) = self.finish_subscription.take() {
            self.loader.unsubscribe_finish(id);
        }
    }

    fn update(&mut self, _delta_time: f64) {
        let loaded = self.loader.files_loaded();
        if loaded == self.reported {
            return;
        }
        self.reported = loaded;

        debug!("Loaded {} [{}]", self.loader.last_loaded_file(), self.progress_text());
        if self.loader.is_finished() {
            info!("Loading complete ({}%)", self.loader.loading_progress());
        }
    }

    fn draw(&mut self, renderer: &mut Renderer) {
        let (width, height) = (renderer.width(), renderer.height());

        if let Some(background) = &self.background {
            renderer.buffer_mut().blit_scaled(background, 0, 0, width, height);
        }

        let bar_width = width.saturating_sub(2 * BAR_MARGIN);
        let bar_y = height.saturating_sub(BAR_MARGIN + BAR_HEIGHT) as i32;
        let filled = bar_width * self.loader.loading_progress() / 100;

        renderer.fill_rect(BAR_MARGIN as i32, bar_y, bar_width, BAR_HEIGHT, self.track_color);
        renderer.fill_rect(BAR_MARGIN as i32, bar_y, filled, BAR_HEIGHT, self.fill_color);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
