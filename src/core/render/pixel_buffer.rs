//=========================================================================
// Pixel Buffer
//=========================================================================
//
// Row-major `0xAARRGGBB` software surface.
//
// All drawing operations clip against the buffer bounds, so callers can
// pass rectangles that are partially (or fully) off-screen.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use image::RgbaImage;

//=== Internal Dependencies ===============================================

use super::Color;

//=== PixelBuffer =========================================================

#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl PixelBuffer {
    //--- Construction -----------------------------------------------------

    /// Creates a fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color.to_argb(); width as usize * height as usize],
        }
    }

    /// Converts a decoded RGBA image.
    pub fn from_rgba(image: &RgbaImage) -> Self {
        let pixels = image
            .pixels()
            .map(|p| Color::rgba(p[0], p[1], p[2], p[3]).to_argb())
            .collect();

        Self {
            width: image.width(),
            height: image.height(),
            pixels,
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).map(|i| Color::from_argb(self.pixels[i]))
    }

    //--- Pixel Access -----------------------------------------------------

    /// Writes a pixel as-is (no blending). Out-of-bounds writes are ignored.
    pub fn put(&mut self, x: u32, y: u32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color.to_argb();
        }
    }

    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color.to_argb());
    }

    //--- Drawing ----------------------------------------------------------

    /// Fills a rectangle, blending translucent colors over the contents.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color) {
        let Some((x0, y0, x1, y1)) = self.clip(x, y, width, height) else {
            return;
        };
        let src = color.to_argb();

        for row in y0..y1 {
            let start = row * self.width as usize;
            for pixel in &mut self.pixels[start + x0..start + x1] {
                *pixel = blend(*pixel, src);
            }
        }
    }

    /// Draws `src` at `(x, y)` with alpha blending.
    pub fn blit(&mut self, src: &PixelBuffer, x: i32, y: i32) {
        self.blit_scaled(src, x, y, src.width, src.height);
    }

    /// Draws `src` stretched to `width` x `height` at `(x, y)`.
    ///
    /// Nearest-neighbour sampling, alpha blended.
    pub fn blit_scaled(&mut self, src: &PixelBuffer, x: i32, y: i32, width: u32, height: u32) {
        if src.width == 0 || src.height == 0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.clip(x, y, width, height) else {
            return;
        };

        for row in y0..y1 {
            let dy = (row as i64 - y as i64) as u64;
            let sy = (dy * src.height as u64 / height as u64) as usize;
            let src_row = sy * src.width as usize;
            let dst_row = row * self.width as usize;

            for col in x0..x1 {
                let dx = (col as i64 - x as i64) as u64;
                let sx = (dx * src.width as u64 / width as u64) as usize;
                let dst = &mut self.pixels[dst_row + col];
                *dst = blend(*dst, src.pixels[src_row + sx]);
            }
        }
    }

    //--- Export -----------------------------------------------------------

    /// Writes the buffer as RGBA8 bytes (e.g. into a presentation surface).
    ///
    /// Copies `min(out.len() / 4, pixel count)` pixels.
    pub fn write_rgba(&self, out: &mut [u8]) {
        for (chunk, &argb) in out.chunks_exact_mut(4).zip(&self.pixels) {
            let color = Color::from_argb(argb);
            chunk.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Intersects a rectangle with the buffer. Returns `(x0, y0, x1, y1)`,
    /// end-exclusive, or `None` when nothing is visible.
    fn clip(
        &self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> Option<(usize, usize, usize, usize)> {
        let x0 = (x as i64).max(0);
        let y0 = (y as i64).max(0);
        let x1 = (x as i64 + width as i64).min(self.width as i64);
        let y1 = (y as i64 + height as i64).min(self.height as i64);

        (x0 < x1 && y0 < y1).then_some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }
}

//--- Blending ------------------------------------------------------------

/// Source-over compositing of two ARGB pixels.
fn blend(dst: u32, src: u32) -> u32 {
    let sa = src >> 24;
    match sa {
        255 => return src,
        0 => return dst,
        _ => {}
    }

    let inv = 255 - sa;
    let channel = |shift: u32| {
        let s = (src >> shift) & 0xFF;
        let d = (dst >> shift) & 0xFF;
        ((s * sa + d * inv) / 255) << shift
    };
    let da = dst >> 24;
    let alpha = (sa + da * inv / 255) << 24;

    alpha | channel(16) | channel(8) | channel(0)
}

//--- Trait Implementations -----------------------------------------------

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // Construction Tests
    //=====================================================================

    #[test]
    fn new_buffer_is_transparent() {
        let buffer = PixelBuffer::new(4, 3);
        assert_eq!(buffer.size(), (4, 3));
        assert_eq!(buffer.pixels().len(), 12);
        assert!(buffer.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn from_rgba_keeps_channel_order() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(1, 0, image::Rgba([10, 20, 30, 255]));

        let buffer = PixelBuffer::from_rgba(&image);

        assert_eq!(buffer.get(1, 0), Some(Color::rgb(10, 20, 30)));
        assert_eq!(buffer.get(0, 0), Some(Color::TRANSPARENT));
    }

    #[test]
    fn get_out_of_bounds_is_none() {
        let buffer = PixelBuffer::new(2, 2);
        assert_eq!(buffer.get(2, 0), None);
        assert_eq!(buffer.get(0, 2), None);
    }

    //=====================================================================
    // Drawing Tests
    //=====================================================================

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut buffer = PixelBuffer::new(4, 4);
        buffer.fill_rect(-2, -2, 4, 4, Color::RED);

        assert_eq!(buffer.get(0, 0), Some(Color::RED));
        assert_eq!(buffer.get(1, 1), Some(Color::RED));
        assert_eq!(buffer.get(2, 2), Some(Color::TRANSPARENT));
    }

    #[test]
    fn fill_rect_fully_outside_is_noop() {
        let mut buffer = PixelBuffer::filled(2, 2, Color::WHITE);
        buffer.fill_rect(5, 5, 10, 10, Color::RED);
        buffer.fill_rect(-20, 0, 10, 10, Color::RED);
        assert!(buffer.pixels().iter().all(|&p| p == Color::WHITE.to_argb()));
    }

    #[test]
    fn translucent_fill_blends() {
        let mut buffer = PixelBuffer::filled(1, 1, Color::BLACK);
        buffer.fill_rect(0, 0, 1, 1, Color::rgba(255, 255, 255, 51));

        let pixel = buffer.get(0, 0).unwrap();
        assert_eq!(pixel.a, 255);
        assert_eq!(pixel.r, 51);
    }

    #[test]
    fn blit_skips_transparent_source_pixels() {
        let mut src = PixelBuffer::new(2, 1);
        src.put(0, 0, Color::GREEN);
        let mut dst = PixelBuffer::filled(3, 1, Color::BLUE);

        dst.blit(&src, 1, 0);

        assert_eq!(dst.get(0, 0), Some(Color::BLUE));
        assert_eq!(dst.get(1, 0), Some(Color::GREEN));
        assert_eq!(dst.get(2, 0), Some(Color::BLUE));
    }

    #[test]
    fn blit_scaled_doubles_pixels() {
        let mut src = PixelBuffer::new(2, 1);
        src.put(0, 0, Color::RED);
        src.put(1, 0, Color::GREEN);
        let mut dst = PixelBuffer::new(4, 2);

        dst.blit_scaled(&src, 0, 0, 4, 2);

        assert_eq!(dst.get(0, 1), Some(Color::RED));
        assert_eq!(dst.get(1, 0), Some(Color::RED));
        assert_eq!(dst.get(2, 1), Some(Color::GREEN));
        assert_eq!(dst.get(3, 0), Some(Color::GREEN));
    }

    #[test]
    fn blit_scaled_with_negative_origin_samples_offset() {
        let mut src = PixelBuffer::new(4, 1);
        for x in 0..4 {
            src.put(x, 0, Color::rgb(x as u8, 0, 0));
        }
        let mut dst = PixelBuffer::new(2, 1);

        dst.blit_scaled(&src, -2, 0, 4, 1);

        assert_eq!(dst.get(0, 0), Some(Color::rgb(2, 0, 0)));
        assert_eq!(dst.get(1, 0), Some(Color::rgb(3, 0, 0)));
    }

    #[test]
    fn write_rgba_emits_byte_order() {
        let buffer = PixelBuffer::filled(1, 1, Color::rgba(1, 2, 3, 4));
        let mut out = [0u8; 4];

        buffer.write_rgba(&mut out);

        assert_eq!(out, [1, 2, 3, 4]);
    }
}
