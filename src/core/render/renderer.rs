//=========================================================================
// Renderer
//=========================================================================
//
// Per-frame drawing target handed to `Screen::draw`.
//
// Frame pipeline (game-loop thread):
//   clear() → Screen::draw(&mut renderer) → compose() → surface.present()
//
// Screens draw in logical coordinates; `compose` produces the host-sized
// frame (letterbox border + logical buffer scaled into the canvas rect).
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{Color, Drawable, PixelBuffer, SharedCanvas};

//=== Renderer ============================================================

#[derive(Debug)]
pub struct Renderer {
    canvas: SharedCanvas,
    buffer: PixelBuffer,
    background: Color,
    border_color: Color,
}

impl Renderer {
    //--- Construction -----------------------------------------------------

    /// Creates a renderer with a logical buffer at the canvas's target size.
    pub fn new(canvas: SharedCanvas, border_color: Color) -> Self {
        let (width, height) = canvas.snapshot().target_size();
        let background = Color::BLACK;

        Self {
            canvas,
            buffer: PixelBuffer::filled(width, height, background),
            background,
            border_color,
        }
    }

    /// Color the logical buffer is cleared to each frame.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self.buffer.fill(background);
        self
    }

    //--- Drawing ----------------------------------------------------------

    pub fn draw(&mut self, drawable: &dyn Drawable) {
        drawable.draw(&mut self.buffer);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color) {
        self.buffer.fill_rect(x, y, width, height, color);
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffer
    }

    //--- Frame Lifecycle --------------------------------------------------

    /// Builds the host-sized frame for the current canvas geometry.
    pub fn compose(&self) -> PixelBuffer {
        let canvas = self.canvas.snapshot();
        let (host_w, host_h) = canvas.host_size();
        let (canvas_w, canvas_h) = canvas.canvas_size();
        let offset = canvas.offset();

        let mut frame = PixelBuffer::new(host_w, host_h);
        canvas.draw_border(&mut frame, self.border_color);
        frame.blit_scaled(
            &self.buffer,
            offset.x as i32,
            offset.y as i32,
            canvas_w,
            canvas_h,
        );
        frame
    }

    /// Resets the logical buffer for the next frame.
    pub fn clear(&mut self) {
        self.buffer.fill(self.background);
    }

    //--- Queries ----------------------------------------------------------

    /// Logical width.
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Logical height.
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn canvas(&self) -> &SharedCanvas {
        &self.canvas
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
