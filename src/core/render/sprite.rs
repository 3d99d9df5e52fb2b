//=========================================================================
// Sprites
//=========================================================================
//
// Minimal drawables: an image at a position, and a solid rectangle.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use glam::Vec2;

//=== Internal Dependencies ===============================================

use super::{Color, Drawable, PixelBuffer};

//=== Sprite ==============================================================

/// An image drawn at `position`, optionally stretched to `size`.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub image: Arc<PixelBuffer>,
    pub position: Vec2,
    pub size: Option<(u32, u32)>,
}

impl Sprite {
    pub fn new(image: Arc<PixelBuffer>, position: Vec2) -> Self {
        Self {
            image,
            position,
            size: None,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }
}

impl Drawable for Sprite {
    fn draw(&self, target: &mut PixelBuffer) {
        let (width, height) = self.size.unwrap_or_else(|| self.image.size());
        target.blit_scaled(
            &self.image,
            self.position.x.round() as i32,
            self.position.y.round() as i32,
            width,
            height,
        );
    }
}

//=== FilledRect ==========================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilledRect {
    pub position: Vec2,
    pub width: u32,
    pub height: u32,
    pub color: Color,
}

impl FilledRect {
    pub fn new(position: Vec2, width: u32, height: u32, color: Color) -> Self {
        Self {
            position,
            width,
            height,
            color,
        }
    }
}

impl Drawable for FilledRect {
    fn draw(&self, target: &mut PixelBuffer) {
        target.fill_rect(
            self.position.x.round() as i32,
            self.position.y.round() as i32,
            self.width,
            self.height,
            self.color,
        );
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_draws_at_position() {
        let image = Arc::new(PixelBuffer::filled(1, 1, Color::GREEN));
        let mut target = PixelBuffer::new(3, 3);

        Sprite::new(image, Vec2::new(2.0, 1.0)).draw(&mut target);

        assert_eq!(target.get(2, 1), Some(Color::GREEN));
        assert_eq!(target.get(1, 1), Some(Color::TRANSPARENT));
    }

    #[test]
    fn sprite_stretches_to_size() {
        let image = Arc::new(PixelBuffer::filled(1, 1, Color::RED));
        let mut target = PixelBuffer::new(3, 3);

        Sprite::new(image, Vec2::ZERO).with_size(3, 3).draw(&mut target);

        assert!(target.pixels().iter().all(|&p| p == Color::RED.to_argb()));
    }

    #[test]
    fn filled_rect_covers_area() {
        let mut target = PixelBuffer::new(4, 4);
        FilledRect::new(Vec2::new(1.0, 1.0), 2, 2, Color::BLUE).draw(&mut target);

        assert_eq!(target.get(1, 1), Some(Color::BLUE));
        assert_eq!(target.get(2, 2), Some(Color::BLUE));
        assert_eq!(target.get(3, 3), Some(Color::TRANSPARENT));
    }
}
