//=========================================================================
// Game Loop
//=========================================================================
//
// Dedicated thread driving input → update → draw → present.
//
// Per frame:
// ```text
//   surface.poll_events()    resize canvas, dispatch input, observe close
//   clock.tick()             delta time (ms) since previous frame
//   screens.update(dt)       applies a pending screen change first
//   renderer.clear()
//   screens.draw(renderer)
//   surface.present(renderer.compose())   only if surface.can_present()
//   [frame cap]              sleep the remainder, if configured
// ```
//
// The loop does not start until the surface reports ready; the canvas is
// attached (firing its ready event) right before the first frame.
//
// Panics in a screen unwind the loop thread. The surface is dropped on
// the way out, which disconnects the platform.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::input::InputManager;
use crate::core::platform_bridge::{RenderSurface, SurfaceEvent};
use crate::core::render::{Color, Renderer, SharedCanvas};
use crate::core::screen::{ScreenKey, ScreenManager};

//=== LoopControl =========================================================

/// Cloneable `running` flag. `close` may be called from any thread.
#[derive(Debug, Clone)]
pub struct LoopControl {
    running: Arc<AtomicBool>,
}

impl LoopControl {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Stops the loop after the current frame.
    pub fn close(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl Default for LoopControl {
    fn default() -> Self {
        Self::new()
    }
}

//=== FrameClock ==========================================================

/// Measures delta time between consecutive ticks on a monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last_frame: Instant,
}

impl FrameClock {
    pub fn start() -> Self {
        Self {
            last_frame: Instant::now(),
        }
    }

    /// Milliseconds since the previous tick (or since `start`).
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;
        delta.as_secs_f64() * 1000.0
    }
}

//=== GameLoop ============================================================

pub struct GameLoop<K: ScreenKey> {
    screens: ScreenManager<K>,
    renderer: Renderer,
    canvas: SharedCanvas,
    input: Arc<InputManager>,
    control: LoopControl,
    frame_cap: Option<Duration>,
}

impl<K: ScreenKey> GameLoop<K> {
    //--- Construction -----------------------------------------------------

    pub fn new(
        screens: ScreenManager<K>,
        canvas: SharedCanvas,
        input: Arc<InputManager>,
        border_color: Color,
    ) -> Self {
        Self {
            screens,
            renderer: Renderer::new(canvas.clone(), border_color),
            canvas,
            input,
            control: LoopControl::new(),
            frame_cap: None,
        }
    }

    /// Limits the loop to `fps` frames per second. Uncapped by default.
    ///
    /// # Panics
    ///
    /// Panics if `fps` is not a positive number.
    pub fn with_frame_cap(mut self, fps: f64) -> Self {
        assert!(fps > 0.0 && fps.is_finite(), "Frame cap must be positive, got {}", fps);
        self.frame_cap = Some(Duration::from_secs_f64(1.0 / fps));
        self
    }

    /// Shares an existing `running` flag (e.g. one wired to close-game).
    pub fn with_control(mut self, control: LoopControl) -> Self {
        self.control = control;
        self
    }

    pub fn control(&self) -> LoopControl {
        self.control.clone()
    }

    pub fn screens(&self) -> &ScreenManager<K> {
        &self.screens
    }

    //--- Execution --------------------------------------------------------

    /// Runs the loop on a new thread named `game-loop`.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn start<S>(self, surface: S) -> io::Result<JoinHandle<()>>
    where
        S: RenderSurface + 'static,
    {
        thread::Builder::new()
            .name("game-loop".into())
            .spawn(move || self.run(surface))
    }

    /// Runs the loop on the calling thread until closed.
    pub fn run<S: RenderSurface>(mut self, mut surface: S) {
        let Some((width, height)) = surface.wait_ready() else {
            info!("Host surface closed before it became ready");
            surface.release();
            return;
        };

        self.canvas.attach(width, height);
        info!("Game loop started ({}x{} host)", width, height);

        let mut clock = FrameClock::start();
        let mut frames: u64 = 0;

        while self.control.is_running() {
            let frame_start = Instant::now();

            //--- Step 1: Host events ----------------------------------------
            self.handle_surface_events(surface.poll_events());
            if !self.control.is_running() {
                break;
            }

            //--- Step 2: Update and draw ------------------------------------
            let delta_time = clock.tick();
            self.screens.update(delta_time);

            self.renderer.clear();
            self.screens.draw(&mut self.renderer);

            //--- Step 3: Present --------------------------------------------
            if surface.can_present() {
                if let Err(e) = surface.present(self.renderer.compose()) {
                    warn!("Stopping game loop: {}", e);
                    break;
                }
            } else {
                trace!("Host still showing previous frame, compose skipped");
            }
            frames += 1;

            //--- Step 4: Optional pacing ------------------------------------
            if let Some(frame_duration) = self.frame_cap {
                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
        }

        surface.release();
        info!("Game loop stopped after {} frames", frames);
    }

    //--- Internal Helpers -------------------------------------------------

    fn handle_surface_events(&mut self, events: Vec<SurfaceEvent>) {
        for event in events {
            match event {
                SurfaceEvent::Resized { width, height } => self.canvas.resize(width, height),
                SurfaceEvent::Input(batch) => self.input.dispatch_all(&batch),
                SurfaceEvent::Closed => self.control.close(),
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
