//=========================================================================
// Canvas
//=========================================================================
//
// Maps the fixed logical resolution into the variable host window.
//
// Geometry (recomputed as a unit on every resize or zoom change):
// ```text
//   scale  = min(host_w / target_w, host_h / target_h) * zoom
//   canvas = floor(target * scale)
//   offset = (host - canvas) / 2            (integer division)
//
//   ┌──────────── host ─────────────┐
//   │ border │   canvas    │ border │
//   │        │ (offset) ─► │        │
//   └───────────────────────────────┘
// ```
//
// `SharedCanvas` shares one `Canvas` between the loop thread, screens and
// input consumers, and owns the one-shot "ready" signal fired when the
// host surface first attaches.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use glam::Vec2;
use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::{Color, PixelBuffer};
use crate::core::event::{Event, SubscriptionId};

//=== Canvas ==============================================================

/// Logical-resolution viewport inside a host surface.
///
/// # Examples
///
/// ```
/// use glam::Vec2;
/// use odyssey_engine::core::render::Canvas;
///
/// let mut canvas = Canvas::new(960, 540);
/// canvas.resize(1920, 1200);
///
/// assert_eq!(canvas.scale_factor(), 2.0);
/// assert_eq!(canvas.canvas_size(), (1920, 1080));
/// assert_eq!(canvas.offset(), Vec2::new(0.0, 60.0));
///
/// // Cursor at the top-left corner of the letterboxed image.
/// assert_eq!(canvas.point_in_canvas(Vec2::new(0.0, 60.0)), Vec2::ZERO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    target_width: u32,
    target_height: u32,
    host_width: u32,
    host_height: u32,
    zoom: f32,
    scale_factor: f32,
    canvas_width: u32,
    canvas_height: u32,
    offset: Vec2,
}

impl Canvas {
    //--- Construction -----------------------------------------------------

    /// Creates a canvas whose host initially matches the target size.
    ///
    /// # Panics
    ///
    /// Panics if either target dimension is zero.
    pub fn new(target_width: u32, target_height: u32) -> Self {
        assert!(
            target_width > 0 && target_height > 0,
            "Canvas target resolution must be non-zero, got {}x{}",
            target_width,
            target_height
        );

        let mut canvas = Self {
            target_width,
            target_height,
            host_width: target_width,
            host_height: target_height,
            zoom: 1.0,
            scale_factor: 1.0,
            canvas_width: target_width,
            canvas_height: target_height,
            offset: Vec2::ZERO,
        };
        canvas.recompute();
        canvas
    }

    //--- Configuration ----------------------------------------------------

    /// Adapts to a new host surface size.
    ///
    /// A zero-sized host (minimized window) keeps the previous geometry.
    pub fn resize(&mut self, host_width: u32, host_height: u32) {
        if host_width == 0 || host_height == 0 {
            trace!("Ignoring zero-sized host surface {}x{}", host_width, host_height);
            return;
        }

        self.host_width = host_width;
        self.host_height = host_height;
        self.recompute();
    }

    /// Sets the canvas zoom. Non-positive or non-finite values are ignored.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom;
            self.recompute();
        }
    }

    //--- Coordinate Transforms --------------------------------------------

    /// Converts a host-space point (e.g. the cursor) into canvas space.
    pub fn point_in_canvas(&self, point: Vec2) -> Vec2 {
        (point - self.offset) / self.scale_factor
    }

    /// Shifts a canvas-space point by the centering offset.
    ///
    /// Inverse of [`Canvas::point_in_canvas`] at scale 1.
    pub fn canvas_point_to_window(&self, point: Vec2) -> Vec2 {
        point + self.offset
    }

    /// Scales a canvas-space length or size into host pixels.
    pub fn scale_to_window(&self, value: Vec2) -> Vec2 {
        value * self.scale_factor
    }

    /// Scales a host-space length or size into canvas units.
    pub fn scale_to_canvas(&self, value: Vec2) -> Vec2 {
        value / self.scale_factor
    }

    //--- Letterboxing -----------------------------------------------------

    /// Fills the host regions outside the canvas rectangle with `color`.
    ///
    /// Regions are top, left, right and bottom bands. Bands with no area
    /// (canvas touching or overflowing that edge) are skipped.
    pub fn draw_border(&self, frame: &mut PixelBuffer, color: Color) {
        let host_w = self.host_width as i64;
        let host_h = self.host_height as i64;
        let x = self.offset.x as i64;
        let y = self.offset.y as i64;
        let right = x + self.canvas_width as i64;
        let bottom = y + self.canvas_height as i64;

        let bands = [
            (0, 0, host_w, y),
            (0, y, x, self.canvas_height as i64),
            (right, y, host_w - right, self.canvas_height as i64),
            (0, bottom, host_w, host_h - bottom),
        ];

        for (bx, by, bw, bh) in bands {
            if bw > 0 && bh > 0 {
                frame.fill_rect(bx as i32, by as i32, bw as u32, bh as u32, color);
            }
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn target_size(&self) -> (u32, u32) {
        (self.target_width, self.target_height)
    }

    pub fn host_size(&self) -> (u32, u32) {
        (self.host_width, self.host_height)
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    //--- Internal Helpers -------------------------------------------------

    fn recompute(&mut self) {
        let sx = self.host_width as f32 / self.target_width as f32;
        let sy = self.host_height as f32 / self.target_height as f32;
        self.scale_factor = sx.min(sy) * self.zoom;

        self.canvas_width = (self.target_width as f32 * self.scale_factor) as u32;
        self.canvas_height = (self.target_height as f32 * self.scale_factor) as u32;

        let off_x = (self.host_width as i64 - self.canvas_width as i64) / 2;
        let off_y = (self.host_height as i64 - self.canvas_height as i64) / 2;
        self.offset = Vec2::new(off_x as f32, off_y as f32);
    }
}

//=== SharedCanvas ========================================================

/// Thread-safe handle to the engine's canvas.
///
/// Cloning is cheap; all clones see the same geometry.
#[derive(Debug, Clone)]
pub struct SharedCanvas {
    inner: Arc<SharedCanvasInner>,
}

#[derive(Debug)]
struct SharedCanvasInner {
    canvas: RwLock<Canvas>,
    ready: Event,
    attached: AtomicBool,
}

impl SharedCanvas {
    pub fn new(target_width: u32, target_height: u32) -> Self {
        Self {
            inner: Arc::new(SharedCanvasInner {
                canvas: RwLock::new(Canvas::new(target_width, target_height)),
                ready: Event::new(),
                attached: AtomicBool::new(false),
            }),
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Binds the canvas to a live host surface.
    ///
    /// The first call fires the ready signal; later calls only resize.
    /// Returns `true` on the first call.
    pub fn attach(&self, host_width: u32, host_height: u32) -> bool {
        self.resize(host_width, host_height);

        if self.inner.attached.swap(true, Ordering::AcqRel) {
            return false;
        }

        debug!("Canvas attached to {}x{} host surface", host_width, host_height);
        self.inner.ready.fire();
        true
    }

    pub fn is_attached(&self) -> bool {
        self.inner.attached.load(Ordering::Acquire)
    }

    /// Runs `callback` once the canvas is attached.
    ///
    /// Called immediately when the canvas is already attached, so late
    /// subscribers never miss the one-shot signal.
    pub fn on_ready<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        if self.is_attached() {
            callback();
        }
        self.inner.ready.subscribe(move |_| callback())
    }

    //--- Geometry ---------------------------------------------------------

    pub fn resize(&self, host_width: u32, host_height: u32) {
        self.write(|canvas| canvas.resize(host_width, host_height));
    }

    pub fn set_zoom(&self, zoom: f32) {
        self.write(|canvas| canvas.set_zoom(zoom));
    }

    /// Copy of the current geometry.
    pub fn snapshot(&self) -> Canvas {
        *self.inner.canvas.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn point_in_canvas(&self, point: Vec2) -> Vec2 {
        self.snapshot().point_in_canvas(point)
    }

    //--- Internal Helpers -------------------------------------------------

    fn write(&self, f: impl FnOnce(&mut Canvas)) {
        let mut canvas = self.inner.canvas.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut canvas);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    //=====================================================================
    // Geometry Tests
    //=====================================================================

    #[test]
    fn matching_host_has_unit_scale() {
        let canvas = Canvas::new(960, 540);

        assert_eq!(canvas.scale_factor(), 1.0);
        assert_eq!(canvas.canvas_size(), (960, 540));
        assert_eq!(canvas.offset(), Vec2::ZERO);
    }

    #[test]
    fn round_trip_at_unit_scale() {
        let mut canvas = Canvas::new(960, 540);
        canvas.resize(960, 540);

        for p in [Vec2::ZERO, Vec2::new(12.0, 500.0), Vec2::new(959.0, 539.0)] {
            assert_eq!(canvas.point_in_canvas(canvas.canvas_point_to_window(p)), p);
        }
    }

    #[test]
    fn wide_host_letterboxes_horizontally() {
        let mut canvas = Canvas::new(960, 540);
        canvas.resize(1280, 540);

        assert_eq!(canvas.scale_factor(), 1.0);
        assert_eq!(canvas.offset(), Vec2::new(160.0, 0.0));
        assert_eq!(canvas.point_in_canvas(Vec2::new(160.0, 10.0)), Vec2::new(0.0, 10.0));
    }

    #[test]
    fn smaller_host_scales_down() {
        let mut canvas = Canvas::new(960, 540);
        canvas.resize(480, 480);

        assert_eq!(canvas.scale_factor(), 0.5);
        assert_eq!(canvas.canvas_size(), (480, 270));
        assert_eq!(canvas.offset(), Vec2::new(0.0, 105.0));
        assert_eq!(canvas.point_in_canvas(Vec2::new(240.0, 240.0)), Vec2::new(480.0, 270.0));
    }

    #[test]
    fn offset_uses_integer_division() {
        let mut canvas = Canvas::new(100, 100);
        canvas.resize(101, 100);
        assert_eq!(canvas.offset(), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn zero_sized_host_is_ignored() {
        let mut canvas = Canvas::new(960, 540);
        canvas.resize(1920, 1080);
        canvas.resize(0, 0);

        assert_eq!(canvas.host_size(), (1920, 1080));
        assert_eq!(canvas.scale_factor(), 2.0);
    }

    #[test]
    fn zoom_multiplies_scale() {
        let mut canvas = Canvas::new(100, 100);
        canvas.set_zoom(0.5);

        assert_eq!(canvas.scale_factor(), 0.5);
        assert_eq!(canvas.canvas_size(), (50, 50));
        assert_eq!(canvas.offset(), Vec2::new(25.0, 25.0));

        canvas.set_zoom(0.0);
        assert_eq!(canvas.zoom(), 0.5, "Invalid zoom should be ignored");
    }

    #[test]
    fn scale_helpers_are_inverse() {
        let mut canvas = Canvas::new(960, 540);
        canvas.resize(1920, 1080);
        let size = Vec2::new(30.0, 40.0);

        assert_eq!(canvas.scale_to_window(size), Vec2::new(60.0, 80.0));
        assert_eq!(canvas.scale_to_canvas(canvas.scale_to_window(size)), size);
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn zero_target_panics() {
        Canvas::new(0, 540);
    }

    //=====================================================================
    // Border Tests
    //=====================================================================

    #[test]
    fn border_fills_only_outside_canvas() {
        let mut canvas = Canvas::new(4, 2);
        canvas.resize(8, 6);
        // scale 2 → canvas 8x4 at offset (0, 1)
        let mut frame = PixelBuffer::filled(8, 6, Color::WHITE);

        canvas.draw_border(&mut frame, Color::BLACK);

        for x in 0..8 {
            assert_eq!(frame.get(x, 0), Some(Color::BLACK));
            assert_eq!(frame.get(x, 5), Some(Color::BLACK));
            for y in 1..5 {
                assert_eq!(frame.get(x, y), Some(Color::WHITE));
            }
        }
    }

    #[test]
    fn border_side_bands() {
        let mut canvas = Canvas::new(2, 2);
        canvas.resize(6, 2);
        let mut frame = PixelBuffer::filled(6, 2, Color::WHITE);

        canvas.draw_border(&mut frame, Color::RED);

        assert_eq!(frame.get(0, 0), Some(Color::RED));
        assert_eq!(frame.get(1, 1), Some(Color::RED));
        assert_eq!(frame.get(2, 0), Some(Color::WHITE));
        assert_eq!(frame.get(3, 1), Some(Color::WHITE));
        assert_eq!(frame.get(4, 0), Some(Color::RED));
        assert_eq!(frame.get(5, 1), Some(Color::RED));
    }

    //=====================================================================
    // SharedCanvas Tests
    //=====================================================================

    #[test]
    fn ready_fires_once_on_first_attach() {
        let shared = SharedCanvas::new(960, 540);
        let hits = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&hits);
        shared.on_ready(move || {
            inner.fetch_add(1, Ordering::SeqCst);
        });

        assert!(shared.attach(1920, 1080));
        assert!(!shared.attach(1280, 720));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(shared.snapshot().host_size(), (1280, 720));
    }

    #[test]
    fn late_ready_subscriber_runs_immediately() {
        let shared = SharedCanvas::new(10, 10);
        shared.attach(10, 10);
        let hits = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&hits);

        shared.on_ready(move || {
            inner.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clones_share_geometry() {
        let shared = SharedCanvas::new(960, 540);
        let other = shared.clone();

        other.resize(1920, 1080);

        assert_eq!(shared.snapshot().scale_factor(), 2.0);
        assert_eq!(shared.point_in_canvas(Vec2::new(2.0, 2.0)), Vec2::new(1.0, 1.0));
    }
}
