//=========================================================================
// Odyssey Engine
//
// Main entry point and coordinator for the engine.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Runtime]
//         │                          │
//         ├─ with_resolution()       ├─ starts the resource loader
//         ├─ with_asset_source()     ├─ spawns the game-loop thread
//         ├─ with_default_screen()   ├─ runs the platform (main thread)
//         └─ with_screen()           └─ blocks until exit
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::io;
use std::sync::Arc;

use crossbeam_channel::bounded;
use log::{error, info};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::input::InputManager;
use crate::core::platform_bridge::ChannelSurface;
use crate::core::render::{Color, SharedCanvas};
use crate::core::resource::{
    default_loaders, AssetSource, DirectorySource, EarlyAssets, FormatLoader, LoaderError,
    ResourceLoader,
};
use crate::core::screen::{LoadingScreen, Screen, ScreenKey, ScreenManager, ScreenSwitch};
use crate::core::{EngineServices, GameLoop, LoopControl, ScreenConstructor};
use crate::platform::{Platform, PlatformError, WindowConfig};

//=== EngineError =========================================================

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no default screen was configured")]
    MissingDefaultScreen,

    #[error(transparent)]
    Loader(#[from] LoaderError),

    #[error("failed to spawn game loop thread: {0}")]
    ThreadSpawn(#[source] io::Error),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("game loop panicked: {0}")]
    LoopPanicked(String),
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Window**: "Odyssey Engine", 960x540
/// - **Resolution**: 960x540 logical pixels
/// - **Assets**: `DirectorySource::new("assets")` with image and font loaders
/// - **Frame cap**: none (uncapped loop)
/// - **Channel capacity**: 128 events
/// - **Border color**: black
///
/// # Examples
///
/// ```no_run
/// use odyssey_engine::EngineBuilder;
/// use odyssey_engine::core::resource::EarlyAssets;
///
/// # use odyssey_engine::core::render::Renderer;
/// # use odyssey_engine::core::screen::Screen;
/// # struct Menu;
/// # impl Screen for Menu {
/// #     fn update(&mut self, _delta_time: f64) {}
/// #     fn draw(&mut self, _renderer: &mut Renderer) {}
/// # }
/// EngineBuilder::new()
///     .with_title("Odyssey")
///     .with_loading_screen("loading", "menu", EarlyAssets::empty())
///     .with_screen("menu", |_services| Menu)
///     .build()?
///     .run()?;
/// # Ok::<(), odyssey_engine::EngineError>(())
/// ```
pub struct EngineBuilder<K: ScreenKey> {
    title: String,
    window_size: (u32, u32),
    resolution: (u32, u32),
    source: Arc<dyn AssetSource>,
    loaders: Vec<Arc<dyn FormatLoader>>,
    frame_cap: Option<f64>,
    channel_capacity: usize,
    border_color: Color,
    default_screen: Option<(K, ScreenConstructor<K>)>,
    screens: Vec<(K, ScreenConstructor<K>)>,
}

impl<K: ScreenKey> EngineBuilder<K> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            title: "Odyssey Engine".to_owned(),
            window_size: (960, 540),
            resolution: (960, 540),
            source: Arc::new(DirectorySource::new("assets")),
            loaders: default_loaders(),
            frame_cap: None,
            channel_capacity: 128,
            border_color: Color::BLACK,
            default_screen: None,
            screens: Vec::new(),
        }
    }

    //--- Window -----------------------------------------------------------

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Initial inner window size in logical pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be non-zero, got {}x{}", width, height);
        self.window_size = (width, height);
        self
    }

    /// Fixed logical resolution screens draw in.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Resolution must be non-zero, got {}x{}", width, height);
        self.resolution = (width, height);
        self
    }

    /// Letterbox color outside the centered canvas.
    pub fn with_border_color(mut self, color: Color) -> Self {
        self.border_color = color;
        self
    }

    //--- Resources --------------------------------------------------------

    pub fn with_asset_source(mut self, source: impl AssetSource + 'static) -> Self {
        self.source = Arc::new(source);
        self
    }

    /// Registers an extra format loader after the built-in ones.
    pub fn with_loader(mut self, loader: impl FormatLoader + 'static) -> Self {
        self.loaders.push(Arc::new(loader));
        self
    }

    //--- Loop -------------------------------------------------------------

    /// Caps the game loop at `fps` frames per second.
    ///
    /// # Panics
    ///
    /// Panics if `fps` is not a positive finite number.
    pub fn with_frame_cap(mut self, fps: f64) -> Self {
        assert!(fps > 0.0 && fps.is_finite(), "Frame cap must be positive, got {}", fps);
        self.frame_cap = Some(fps);
        self
    }

    /// Sets the channel capacity for platform → game loop communication.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    //--- Screens ----------------------------------------------------------

    /// Sets the initial screen, loaded once during [`EngineBuilder::build`].
    pub fn with_default_screen<F, S>(mut self, key: K, constructor: F) -> Self
    where
        F: FnOnce(&EngineServices<K>) -> S + 'static,
        S: Screen + 'static,
    {
        self.default_screen = Some((key, boxed(constructor)));
        self
    }

    /// Uses the built-in [`LoadingScreen`] as the initial screen. It moves
    /// on to `next` when the resource loader finishes.
    pub fn with_loading_screen(self, key: K, next: K, assets: EarlyAssets) -> Self {
        self.with_default_screen(key, move |services| {
            LoadingScreen::new(
                services.resources.clone(),
                services.screens.clone(),
                next,
                assets,
            )
        })
    }

    pub fn with_screen<F, S>(mut self, key: K, constructor: F) -> Self
    where
        F: FnOnce(&EngineServices<K>) -> S + 'static,
        S: Screen + 'static,
    {
        self.screens.push((key, boxed(constructor)));
        self
    }

    //--- Build ------------------------------------------------------------

    /// Builds the engine: creates the shared services, constructs every
    /// screen and loads the default one.
    ///
    /// # Errors
    ///
    /// [`EngineError::MissingDefaultScreen`] if no default screen was set.
    pub fn build(self) -> Result<Engine<K>, EngineError> {
        let (default_key, default_constructor) =
            self.default_screen.ok_or(EngineError::MissingDefaultScreen)?;

        info!(
            "Building engine ({}x{} logical, {} screens, channel: {})",
            self.resolution.0,
            self.resolution.1,
            self.screens.len() + 1,
            self.channel_capacity
        );

        let switch = ScreenSwitch::new();
        // Keys are known before any screen loads, so a default screen may
        // request a change from its `load`.
        switch.register_key(default_key.clone());
        for (key, _) in &self.screens {
            switch.register_key(key.clone());
        }

        let services = EngineServices {
            input: Arc::new(InputManager::new()),
            resources: ResourceLoader::with_loaders(self.source, self.loaders),
            screens: switch.clone(),
            canvas: SharedCanvas::new(self.resolution.0, self.resolution.1),
        };

        let mut manager = ScreenManager::new(switch, default_key, default_constructor(&services));
        for (key, constructor) in self.screens {
            manager.register(key, constructor(&services));
        }

        let control = LoopControl::new();
        let on_close = control.clone();
        manager.on_game_close(move || on_close.close());

        let mut game_loop = GameLoop::new(
            manager,
            services.canvas.clone(),
            Arc::clone(&services.input),
            self.border_color,
        )
        .with_control(control.clone());
        if let Some(fps) = self.frame_cap {
            game_loop = game_loop.with_frame_cap(fps);
        }

        Ok(Engine {
            game_loop,
            services,
            control,
            window: WindowConfig {
                title: self.title,
                width: self.window_size.0,
                height: self.window_size.1,
            },
            channel_capacity: self.channel_capacity,
        })
    }
}

impl<K: ScreenKey> Default for EngineBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

fn boxed<K, F, S>(constructor: F) -> ScreenConstructor<K>
where
    K: ScreenKey,
    F: FnOnce(&EngineServices<K>) -> S + 'static,
    S: Screen + 'static,
{
    Box::new(move |services: &EngineServices<K>| Box::new(constructor(services)) as Box<dyn Screen>)
}

//=== Engine ==============================================================

/// Odyssey Engine runtime.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   ├─► ResourceLoader (Loader Thread, one pass)
///   │
///   ├─► GameLoop (Game-Loop Thread, uncapped by default)
///   │     └─► InputManager, ScreenManager, Renderer
///   │
///   └─► Platform (Event Loop)
///         └─► Window, Pixels surface, Input polling
///
/// Communication: crossbeam channels (PlatformEvent ↓, frames ↑)
/// ```
pub struct Engine<K: ScreenKey> {
    game_loop: GameLoop<K>,
    services: EngineServices<K>,
    control: LoopControl,
    window: WindowConfig,
    channel_capacity: usize,
}

impl<K: ScreenKey> Engine<K> {
    //--- Accessors --------------------------------------------------------

    /// Shared handles, e.g. to subscribe to input before running.
    pub fn services(&self) -> &EngineServices<K> {
        &self.services
    }

    /// Stops the game loop from any thread.
    pub fn control(&self) -> LoopControl {
        self.control.clone()
    }

    //--- Execution --------------------------------------------------------

    /// Starts the engine runtime and blocks until the application exits.
    ///
    /// # Lifecycle
    ///
    /// 1. Starts the resource loader thread
    /// 2. Spawns the game-loop thread (waits for the window)
    /// 3. Runs the platform event loop on this thread
    /// 4. On exit: closes the loop and joins it
    ///
    /// # Errors
    ///
    /// - [`EngineError::Loader`] / [`EngineError::ThreadSpawn`] on startup
    /// - [`EngineError::LoopPanicked`] if a screen panicked (fail fast)
    /// - [`EngineError::Platform`] if the event loop failed
    pub fn run(self) -> Result<(), EngineError> {
        info!("Starting engine runtime");

        //--- 1. Start loading assets ---------------------------------------
        self.services.resources.start_loading()?;

        //--- 2. Create communication channels ------------------------------
        let (event_tx, event_rx) = bounded(self.channel_capacity);
        let (frame_tx, frame_rx) = bounded(1);

        //--- 3. Spawn the game loop ----------------------------------------
        let surface = ChannelSurface::new(event_rx, frame_tx);
        let loop_handle = self
            .game_loop
            .start(surface)
            .map_err(EngineError::ThreadSpawn)?;
        info!("Game loop thread spawned");

        //--- 4. Launch the platform subsystem -------------------------------
        let platform_result = Platform::new(self.window, event_tx, frame_rx).run();
        info!("Platform event loop exited");

        //--- 5. Cleanup: stop and join the game loop -------------------------
        self.control.close();
        if let Err(payload) = loop_handle.join() {
            let message = panic_message(payload.as_ref());
            error!("Game loop thread panicked: {}", message);
            return Err(EngineError::LoopPanicked(message));
        }

        platform_result?;
        info!("Engine shutdown complete");
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
