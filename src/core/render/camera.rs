//=========================================================================
// Camera
//=========================================================================
//
// Scrollable, zoomable view over an oversized render buffer.
//
// Coordinates:
// ```text
//   buffer (e.g. 2000x2000) scaled by zoom
//   ┌───────────────────────────────┐
//   │  position                     │
//   │     ┌── viewport ──┐          │
//   │     │  visible on  │          │
//   │     │   canvas     │          │
//   │     └──────────────┘          │
//   └───────────────────────────────┘
//
//   0 <= position <= max(0, buffer * zoom - viewport)
// ```
//
// Position lives in zoomed-buffer pixels, so the clamp above guarantees
// the viewport is always covered by buffer content.
//
// Input: W/A/S/D steer a direction vector (press adds, release subtracts,
// each axis clamped to [-1, 1]) and the wheel accumulates zoom steps.
// Both are applied on the next `update`. A key only steers on its first
// press; OS auto-repeat presses of a held key are ignored.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glam::Vec2;

//=== Internal Dependencies ===============================================

use super::{Canvas, Color, Drawable, PixelBuffer, Updatable};
use crate::core::event::SubscriptionId;
use crate::core::input::{InputManager, KeyCode, KeyInputType, MouseWheelInputType};

//=== Constants ===========================================================

pub const MIN_ZOOM: f32 = 0.45;
pub const MAX_ZOOM: f32 = 2.0;

/// Scroll speed in pixels per millisecond.
pub const DEFAULT_SPEED: f32 = 0.1;

/// Zoom change per wheel notch.
pub const DEFAULT_ZOOM_SPEED: f32 = 0.05;

//=== Controls ============================================================

/// State written by input callbacks, consumed by `update`.
#[derive(Debug, Default)]
struct Controls {
    direction: Vec2,
    pending_zoom: f32,
    /// Bound steering keys currently down.
    held: HashSet<KeyCode>,
}

type SharedControls = Arc<Mutex<Controls>>;

fn lock(controls: &SharedControls) -> MutexGuard<'_, Controls> {
    controls.lock().unwrap_or_else(PoisonError::into_inner)
}

fn steer(controls: &SharedControls, delta: Vec2) {
    let mut controls = lock(controls);
    controls.direction = (controls.direction + delta).clamp(Vec2::NEG_ONE, Vec2::ONE);
}

/// Steers for a bound key edge. Repeated presses and releases of keys
/// that were never pressed leave the direction alone.
fn steer_key(controls: &SharedControls, key: KeyCode, pressed: bool) {
    let Some(direction) = key_direction(key) else {
        return;
    };

    let mut controls = lock(controls);
    let changed = if pressed {
        controls.held.insert(key)
    } else {
        controls.held.remove(&key)
    };
    if changed {
        let delta = if pressed { direction } else { -direction };
        controls.direction = (controls.direction + delta).clamp(Vec2::NEG_ONE, Vec2::ONE);
    }
}

fn key_direction(key: KeyCode) -> Option<Vec2> {
    match key {
        KeyCode::KeyW => Some(Vec2::new(0.0, -1.0)),
        KeyCode::KeyS => Some(Vec2::new(0.0, 1.0)),
        KeyCode::KeyA => Some(Vec2::new(-1.0, 0.0)),
        KeyCode::KeyD => Some(Vec2::new(1.0, 0.0)),
        _ => None,
    }
}

//=== InputBinding ========================================================

/// Live subscriptions on an `InputManager`, removed on unbind/drop.
struct InputBinding {
    input: Arc<InputManager>,
    press: SubscriptionId,
    release: SubscriptionId,
    scroll: SubscriptionId,
}

impl InputBinding {
    fn unbind(self) {
        let keyboard = self.input.on_keyboard_event();
        keyboard.unsubscribe(KeyInputType::Press, self.press);
        keyboard.unsubscribe(KeyInputType::Release, self.release);
        self.input
            .on_mouse_wheel_event()
            .unsubscribe(MouseWheelInputType::Scroll, self.scroll);
    }
}

//=== Camera ==============================================================

/// Oversized render target projected onto the canvas.
///
/// # Examples
///
/// ```
/// use glam::Vec2;
/// use odyssey_engine::core::render::Camera;
///
/// let mut camera = Camera::new(1000, 1000, 800, 600);
///
/// camera.set_position(Vec2::new(-50.0, -50.0));
/// assert_eq!(camera.position(), Vec2::ZERO);
///
/// camera.set_position(Vec2::new(500.0, 500.0));
/// assert_eq!(camera.position(), Vec2::new(200.0, 400.0));
/// ```
pub struct Camera {
    buffer: PixelBuffer,
    viewport: Vec2,
    position: Vec2,
    zoom: f32,
    speed: f32,
    zoom_speed: f32,
    controls: SharedControls,
    binding: Option<InputBinding>,
}

impl Camera {
    //--- Construction -----------------------------------------------------

    /// Creates a camera with a transparent `buffer_*` sized buffer and a
    /// `viewport_*` sized visible window (logical canvas pixels).
    pub fn new(
        buffer_width: u32,
        buffer_height: u32,
        viewport_width: u32,
        viewport_height: u32,
    ) -> Self {
        Self {
            buffer: PixelBuffer::new(buffer_width, buffer_height),
            viewport: Vec2::new(viewport_width as f32, viewport_height as f32),
            position: Vec2::ZERO,
            zoom: 1.0,
            speed: DEFAULT_SPEED,
            zoom_speed: DEFAULT_ZOOM_SPEED,
            controls: Arc::new(Mutex::new(Controls::default())),
            binding: None,
        }
    }

    /// Creates a camera whose viewport is the canvas's logical resolution.
    pub fn for_canvas(buffer_width: u32, buffer_height: u32, canvas: &Canvas) -> Self {
        let (width, height) = canvas.target_size();
        Self::new(buffer_width, buffer_height, width, height)
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_zoom_speed(mut self, zoom_speed: f32) -> Self {
        self.zoom_speed = zoom_speed;
        self
    }

    //--- Positioning ------------------------------------------------------

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position.clamp(Vec2::ZERO, self.max_position());
    }

    pub fn move_by(&mut self, delta: Vec2) {
        self.set_position(self.position + delta);
    }

    /// Clamps `zoom` to `[MIN_ZOOM, MAX_ZOOM]` and re-clamps the position.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_nan() {
            return;
        }
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.set_position(self.position);
    }

    /// Largest valid position at the current zoom.
    pub fn max_position(&self) -> Vec2 {
        let (w, h) = self.buffer.size();
        (Vec2::new(w as f32, h as f32) * self.zoom - self.viewport).max(Vec2::ZERO)
    }

    //--- Steering ---------------------------------------------------------

    /// Adds a movement direction (as a held key would).
    pub fn press(&mut self, direction: Vec2) {
        steer(&self.controls, direction);
    }

    /// Removes a movement direction (as a released key would).
    pub fn release(&mut self, direction: Vec2) {
        steer(&self.controls, -direction);
    }

    /// Queues a zoom change of `-rotation * zoom_speed`.
    pub fn scroll(&mut self, rotation: f32) {
        lock(&self.controls).pending_zoom -= rotation * self.zoom_speed;
    }

    /// Subscribes W/A/S/D and the mouse wheel on `input`.
    ///
    /// Replaces any previous binding. Subscriptions are removed when the
    /// camera is dropped or [`Camera::unbind_input`] is called.
    pub fn bind_input(&mut self, input: Arc<InputManager>) {
        self.unbind_input();

        let keyboard = input.on_keyboard_event();

        let controls = Arc::clone(&self.controls);
        let press = keyboard.subscribe(KeyInputType::Press, move |event| {
            steer_key(&controls, event.key, true);
        });

        let controls = Arc::clone(&self.controls);
        let release = keyboard.subscribe(KeyInputType::Release, move |event| {
            steer_key(&controls, event.key, false);
        });

        let controls = Arc::clone(&self.controls);
        let zoom_speed = self.zoom_speed;
        let scroll = input
            .on_mouse_wheel_event()
            .subscribe(MouseWheelInputType::Scroll, move |event| {
                lock(&controls).pending_zoom -= event.rotation * zoom_speed;
            });

        self.binding = Some(InputBinding {
            input,
            press,
            release,
            scroll,
        });
    }

    pub fn unbind_input(&mut self) {
        if let Some(binding) = self.binding.take() {
            binding.unbind();
        }
    }

    //--- Rendering --------------------------------------------------------

    /// Draws `drawable` into the camera's buffer (buffer coordinates).
    pub fn render(&mut self, drawable: &dyn Drawable) {
        drawable.draw(&mut self.buffer);
    }

    pub fn clear(&mut self, color: Color) {
        self.buffer.fill(color);
    }

    //--- Queries ----------------------------------------------------------

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn direction(&self) -> Vec2 {
        lock(&self.controls).direction
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffer
    }
}

//--- Trait Implementations -----------------------------------------------

impl Updatable for Camera {
    fn update(&mut self, delta_time: f64) {
        let (direction, pending_zoom) = {
            let mut controls = lock(&self.controls);
            (controls.direction, std::mem::take(&mut controls.pending_zoom))
        };

        if pending_zoom != 0.0 {
            self.set_zoom(self.zoom + pending_zoom);
        }
        self.move_by(direction * self.speed * delta_time as f32);
    }
}

impl Drawable for Camera {
    fn draw(&self, target: &mut PixelBuffer) {
        let (w, h) = self.buffer.size();
        target.blit_scaled(
            &self.buffer,
            (-self.position.x).round() as i32,
            (-self.position.y).round() as i32,
            (w as f32 * self.zoom).round() as u32,
            (h as f32 * self.zoom).round() as u32,
        );
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        self.unbind_input();
    }
}

impl fmt::Debug for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Camera")
            .field("buffer", &self.buffer)
            .field("viewport", &self.viewport)
            .field("position", &self.position)
            .field("zoom", &self.zoom)
            .field("bound", &self.binding.is_some())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
