//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) and the pixels surface with the game
// loop thread via crossbeam channels.
//
// Architecture:
// ```text
//  Main Thread:                        Game-Loop Thread:
//  ┌────────────────────────────┐      ┌──────────────────────┐
//  │  Winit Event Loop          │      │  GameLoop            │
//  │   ↓                        │      │   ├─ ChannelSurface  │
//  │  InputTranslator           │      │   ├─ InputManager    │
//  │   ├─ Converts Winit        │      │   └─ ScreenManager   │
//  │   └─ Tracks modifiers      │      │                      │
//  │   ↓                        │      │                      │
//  │  InputBuffer (ordered)     │      │                      │
//  │   ↓                        │      │                      │
//  │  RedrawRequested           │      │                      │
//  │   ├─ flush ── PlatformEvent ─────►│  poll_events()       │
//  │   └─ blit  ◄──── PixelBuffer ─────┤  present()           │
//  └────────────────────────────┘      └──────────────────────┘
//
//  Frame Boundary: RedrawRequested
//    → All buffered input sent as one ordered batch
//    → Most recent finished frame copied into pixels and rendered
//    → Empty buffers NOT sent
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: input is batched per redraw
// - **Sticky modifiers**: modifier state persists across events until
//   explicitly changed (matches platform behavior)
// - **Frame channel disconnect = shutdown**: the loop drops its frame
//   sender when it stops or panics; the platform then exits
// - **Main thread requirement**: Winit mandates main thread on macOS/iOS,
//   so this runs on the thread that called `Engine::run()`
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_translator;

//=== External Crates =====================================================

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::*;
use pixels::{Pixels, SurfaceTexture};
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    error::{EventLoopError, OsError},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::platform_bridge::PlatformEvent;
use crate::core::render::PixelBuffer;
use input_buffer::InputBuffer;
use input_translator::InputTranslator;

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are fatal: without a window or a surface the engine cannot run.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[source] EventLoopError),

    #[error("event loop error: {0}")]
    EventLoopExecution(#[source] EventLoopError),

    #[error("window creation failed: {0}")]
    WindowCreation(#[source] OsError),

    #[error("pixel surface creation failed: {0}")]
    SurfaceCreation(#[source] pixels::Error),

    #[error("frame presentation failed: {0}")]
    Render(#[source] pixels::Error),
}

//=== WindowConfig ========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WindowConfig {
    pub(crate) title: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

//=== Platform ============================================================

/// Window manager, input aggregator and frame presenter.
///
/// Runs on the main thread and talks to the game loop exclusively through
/// channels: input and window events out, finished frames in.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(..)` - no window yet
/// 2. **Execution**: `platform.run()` - runs the event loop
/// 3. **Ready**: window + pixels surface created in `resumed()`
/// 4. **Shutdown**: close requested, or the game loop released the surface
pub(crate) struct Platform {
    config: WindowConfig,

    /// OS window handle (None until `resumed()` called).
    window: Option<Arc<Window>>,

    /// Presentation surface bound to `window`.
    pixels: Option<Pixels<'static>>,

    /// Current pixels buffer size (follows the incoming frame size).
    buffer_size: (u32, u32),

    /// Ordered input until the frame boundary.
    buffer: InputBuffer,

    /// Channel to the game loop.
    event_sender: Sender<PlatformEvent>,

    /// Finished frames from the game loop.
    frames: Receiver<PixelBuffer>,

    /// Converts Winit events to engine InputEvents.
    translator: InputTranslator,

    /// First fatal error raised inside a callback, returned by `run`.
    fatal: Option<PlatformError>,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Does not create the window yet - that happens lazily in `resumed()`.
    pub(crate) fn new(
        config: WindowConfig,
        event_sender: Sender<PlatformEvent>,
        frames: Receiver<PixelBuffer>,
    ) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            config,
            window: None,
            pixels: None,
            buffer_size: (0, 0),
            buffer: InputBuffer::new(),
            event_sender,
            frames,
            translator: InputTranslator::new(),
            fatal: None,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the Winit event loop until the window closes or the game loop
    /// goes away.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails, or if the window or pixel surface could not be created.
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;
        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)?;

        match self.fatal.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn send(&self, event: PlatformEvent) {
        if self.event_sender.send(event).is_err() {
            debug!(target: "platform", "Game loop gone, platform event dropped");
        }
    }

    /// Flushes buffered input events to the game loop.
    ///
    /// If the channel is disconnected (loop stopped or panicked), the
    /// events are dropped with a warning; shutdown follows once the frame
    /// channel reports the disconnect.
    fn flush_input_buffer(&mut self) {
        if let Some(events) = self.buffer.drain() {
            let count = events.len();
            trace!(target: "platform::input", "Flushing {} input events", count);

            if self.event_sender.send(PlatformEvent::Inputs(events)).is_err() {
                warn!(target: "platform::input", "Channel disconnected, dropping {} events", count);
            }
        }
    }

    /// Most recent frame from the game loop, and whether the loop still
    /// holds the frame sender.
    fn latest_frame(&mut self) -> (Option<PixelBuffer>, bool) {
        let mut latest = None;
        loop {
            match self.frames.try_recv() {
                Ok(frame) => latest = Some(frame),
                Err(TryRecvError::Empty) => return (latest, true),
                Err(TryRecvError::Disconnected) => return (latest, false),
            }
        }
    }

    fn present(&mut self, frame: &PixelBuffer) -> Result<(), PlatformError> {
        let Some(pixels) = self.pixels.as_mut() else {
            return Ok(());
        };

        if frame.size() != self.buffer_size {
            if let Err(e) = pixels.resize_buffer(frame.width(), frame.height()) {
                warn!(target: "platform", "Frame buffer resize failed: {}", e);
                return Ok(());
            }
            self.buffer_size = frame.size();
        }

        frame.write_rgba(pixels.frame_mut());
        pixels.render().map_err(PlatformError::Render)
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: PlatformError) {
        error!(target: "platform", "{}", error);
        self.fatal.get_or_insert(error);
        self.send(PlatformEvent::WindowClosed);
        event_loop.exit();
    }

    fn create_surface(
        &mut self,
        event_loop: &ActiveEventLoop,
    ) -> Result<(u32, u32), PlatformError> {
        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(PlatformError::WindowCreation)?,
        );
        let size = window.inner_size();
        info!(
            target: "platform",
            "Window created: {}x{} @ {}x DPI",
            size.width,
            size.height,
            window.scale_factor()
        );

        let surface = SurfaceTexture::new(size.width, size.height, Arc::clone(&window));
        let pixels = Pixels::new(size.width, size.height, surface)
            .map_err(PlatformError::SurfaceCreation)?;

        window.request_redraw();
        self.buffer_size = (size.width, size.height);
        self.pixels = Some(pixels);
        self.window = Some(window);
        Ok((size.width, size.height))
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_deref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Called when app becomes active (startup or mobile resume).
    ///
    /// Creates the window and pixel surface if they don't exist yet, then
    /// reports `Ready` so the game loop can start.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        match self.create_surface(event_loop) {
            Ok((width, height)) => self.send(PlatformEvent::Ready { width, height }),
            Err(e) => self.fail(event_loop, e),
        }
    }

    /// Handles per-window events.
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.translator.translate(&event, &mut self.buffer) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    trace!(target: "platform", "Ignoring zero-size resize (minimized?)");
                    return;
                }
                if let Some(pixels) = self.pixels.as_mut() {
                    if let Err(e) = pixels.resize_surface(size.width, size.height) {
                        warn!(target: "platform", "Surface resize failed: {}", e);
                    }
                }
                debug!(target: "platform", "Window resized to {}x{}", size.width, size.height);
                self.send(PlatformEvent::Resized {
                    width: size.width,
                    height: size.height,
                });
            }

            WindowEvent::RedrawRequested => {
                // Frame boundary: flush input, show the newest frame
                self.flush_input_buffer();

                let (frame, connected) = self.latest_frame();
                if let Some(frame) = frame {
                    if let Err(e) = self.present(&frame) {
                        self.fail(event_loop, e);
                        return;
                    }
                }
                if !connected {
                    info!(target: "platform", "Game loop released the surface, exiting");
                    event_loop.exit();
                    return;
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {
                // Ignore: Focused, Moved, ScaleFactorChanged, etc.
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputEvent, KeyCode, Modifiers};
    use crossbeam_channel::{bounded, unbounded};

    fn platform() -> (Platform, Receiver<PlatformEvent>, Sender<PixelBuffer>) {
        let (event_tx, event_rx) = unbounded();
        let (frame_tx, frame_rx) = bounded(1);
        let config = WindowConfig {
            title: "test".into(),
            width: 320,
            height: 180,
        };
        (Platform::new(config, event_tx, frame_rx), event_rx, frame_tx)
    }

    fn key_down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    //=====================================================================
    // Platform Tests
    //=====================================================================

    #[test]
    fn platform_creation() {
        let (platform, _events, _frames) = platform();
        assert!(platform.window().is_none(), "Window should be created lazily");
    }

    #[test]
    fn flush_empty_buffer_is_noop() {
        let (mut platform, events, _frames) = platform();

        platform.flush_input_buffer();

        assert!(events.try_recv().is_err(), "No events should be sent for empty buffer");
    }

    #[test]
    fn flush_sends_buffered_events_in_order() {
        let (mut platform, events, _frames) = platform();

        platform.buffer.push(key_down(KeyCode::KeyA));
        platform.buffer.push(key_down(KeyCode::KeyB));
        platform.flush_input_buffer();

        match events.try_recv() {
            Ok(PlatformEvent::Inputs(batch)) => {
                assert_eq!(batch, vec![key_down(KeyCode::KeyA), key_down(KeyCode::KeyB)]);
            }
            other => panic!("Expected Inputs event, got {:?}", other),
        }
    }

    #[test]
    fn flush_handles_disconnected_channel() {
        let (mut platform, events, _frames) = platform();
        platform.buffer.push(key_down(KeyCode::Space));

        drop(events);

        // Should not panic, just log warning
        platform.flush_input_buffer();
    }

    #[test]
    fn latest_frame_keeps_newest_and_detects_release() {
        let (mut platform, _events, frames) = platform();

        frames.send(PixelBuffer::new(2, 2)).unwrap();
        let (frame, connected) = platform.latest_frame();
        assert_eq!(frame.map(|f| f.size()), Some((2, 2)));
        assert!(connected);

        drop(frames);
        let (frame, connected) = platform.latest_frame();
        assert!(frame.is_none());
        assert!(!connected);
    }

    #[test]
    fn present_without_surface_is_noop() {
        let (mut platform, _events, _frames) = platform();
        assert!(platform.present(&PixelBuffer::new(4, 4)).is_ok());
    }

    //=====================================================================
    // PlatformError Tests
    //=====================================================================

    #[test]
    fn platform_error_is_error_trait() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<PlatformError>();
    }
}
