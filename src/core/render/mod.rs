//=========================================================================
// Render System
//=========================================================================
//
// Software rendering into a fixed logical resolution, letterboxed into
// the host window.
//
// Architecture:
// ```text
//   Screen::draw(&mut Renderer)
//        │
//        ├─ Renderer.buffer      (target size, e.g. 960x540)
//        │    └─ Drawable::draw  (sprites, rects, Camera)
//        │
//        └─ Renderer::compose()  (host size)
//             ├─ Canvas::draw_border
//             └─ buffer scaled into the centered canvas rect
// ```
//
// Components:
// - `pixel_buffer`: ARGB software surface
// - `canvas`: window <-> logical coordinate math and letterboxing
// - `camera`: scrollable, zoomable oversized buffer
// - `renderer`: per-frame logical buffer and frame composition
// - `sprite`: basic drawables
//
//=========================================================================

//=== Module Declarations =================================================

pub mod camera;
pub mod canvas;
pub mod pixel_buffer;
pub mod renderer;
pub mod sprite;

//=== Public API ==========================================================

pub use camera::Camera;
pub use canvas::{Canvas, SharedCanvas};
pub use pixel_buffer::PixelBuffer;
pub use renderer::Renderer;
pub use sprite::{FilledRect, Sprite};

//=== Capability Traits ===================================================

/// Something that can paint itself into a pixel buffer.
pub trait Drawable {
    fn draw(&self, target: &mut PixelBuffer);
}

/// Something advanced by frame delta time (milliseconds).
pub trait Updatable {
    fn update(&mut self, delta_time: f64);
}

//=== Color ===============================================================

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

//--- Color Constants -----------------------------------------------------

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);
    pub const DARK_GRAY: Self = Self::rgb(40, 40, 40);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Packs into the `0xAARRGGBB` layout used by [`PixelBuffer`].
    pub const fn to_argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argb_packing_layout() {
        let color = Color::rgba(0x11, 0x22, 0x33, 0x44);
        assert_eq!(color.to_argb(), 0x4411_2233);
        assert_eq!(Color::from_argb(0x4411_2233), color);
    }

    #[test]
    fn rgb_is_opaque() {
        assert_eq!(Color::rgb(1, 2, 3).a, 255);
        assert_eq!(Color::BLACK.to_argb(), 0xFF00_0000);
    }

    #[test]
    fn default_is_black() {
        assert_eq!(Color::default(), Color::BLACK);
    }
}
