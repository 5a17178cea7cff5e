//! Heap-backed framebuffer with per-pixel change detection.
//!
//! The dashboard draws every tile into this RAM buffer. After a refresh only
//! the rectangle containing changed pixels is pushed to the real display,
//! which keeps a once-a-minute redraw of unchanged tiles nearly free.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

/// Bounding box of pixels that have changed since the last flush.
#[derive(Debug, Clone, Copy)]
struct DirtyRect {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl DirtyRect {
    fn expand(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn from_point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn to_rectangle(self) -> Rectangle {
        Rectangle::new(
            Point::new(self.min_x as i32, self.min_y as i32),
            Size::new(
                (self.max_x - self.min_x + 1) as u32,
                (self.max_y - self.min_y + 1) as u32,
            ),
        )
    }
}

/// In-memory `DrawTarget<Color = Rgb565>` of any size.
///
/// Tracks a dirty bounding box so that only changed pixels are flushed.
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb565>,
    dirty: Option<DirtyRect>,
}

impl FrameBuffer {
    /// Allocate a buffer filled with `fill`, initially clean.
    pub fn new(size: Size, fill: Rgb565) -> Self {
        let width = size.width as usize;
        let height = size.height as usize;

        Self {
            width,
            height,
            pixels: vec![fill; width * height],
            dirty: None,
        }
    }

    /// Color at `point`, or `None` outside the buffer.
    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        let (x, y) = self.index_of(point)?;
        Some(self.pixels[y * self.width + x])
    }

    /// Region changed since the last flush.
    pub fn dirty_area(&self) -> Option<Rectangle> {
        self.dirty.map(DirtyRect::to_rectangle)
    }

    fn index_of(&self, point: Point) -> Option<(usize, usize)> {
        let x = usize::try_from(point.x).ok()?;
        let y = usize::try_from(point.y).ok()?;
        (x < self.width && y < self.height).then_some((x, y))
    }

    /// Write a single pixel, expanding the dirty rect only if the color changed.
    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb565) {
        let idx = y * self.width + x;
        if self.pixels[idx] != color {
            self.pixels[idx] = color;
            match &mut self.dirty {
                Some(rect) => rect.expand(x, y),
                None => self.dirty = Some(DirtyRect::from_point(x, y)),
            }
        }
    }

    /// Push the dirty region to `display`, then reset the dirty state.
    ///
    /// If nothing changed, this is a no-op.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(rect) = self.dirty.take() else {
            return Ok(());
        };

        let area = rect.to_rectangle();
        let width = area.size.width as usize;

        debug!(
            "Flushing {}x{} dirty region at ({}, {})",
            area.size.width, area.size.height, rect.min_x, rect.min_y
        );

        // Shared borrow so the iterator doesn't capture `&mut self`
        let pixels = &self.pixels;
        let stride = self.width;
        let pixel_iter = (rect.min_y..=rect.max_y).flat_map(move |y| {
            let row_start = y * stride + rect.min_x;
            pixels[row_start..row_start + width].iter().copied()
        });

        display.fill_contiguous(&area, pixel_iter)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let Some((x, y)) = self.index_of(coord) {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };

        for y in area.top_left.y..=bottom_right.y {
            for x in area.top_left.x..=bottom_right.x {
                self.set_pixel(x as usize, y as usize, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for y in 0..self.height {
            for x in 0..self.width {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::PrimitiveStyle;

    #[test]
    fn test_new_buffer_is_clean() {
        let fb = FrameBuffer::new(Size::new(8, 4), Rgb565::BLACK);
        assert!(fb.dirty_area().is_none());
        assert_eq!(fb.pixel(Point::new(7, 3)), Some(Rgb565::BLACK));
        assert_eq!(fb.pixel(Point::new(8, 0)), None);
        assert_eq!(fb.pixel(Point::new(-1, 0)), None);
    }

    #[test]
    fn test_dirty_rect_covers_changed_pixels_only() {
        let mut fb = FrameBuffer::new(Size::new(32, 32), Rgb565::BLACK);

        Pixel(Point::new(3, 4), Rgb565::RED).draw(&mut fb).unwrap();
        Pixel(Point::new(10, 2), Rgb565::RED).draw(&mut fb).unwrap();
        // Same color as before, not a change
        Pixel(Point::new(20, 20), Rgb565::BLACK).draw(&mut fb).unwrap();

        assert_eq!(
            fb.dirty_area(),
            Some(Rectangle::new(Point::new(3, 2), Size::new(8, 3)))
        );
    }

    #[test]
    fn test_fill_solid_clamps_to_buffer() {
        let mut fb = FrameBuffer::new(Size::new(10, 10), Rgb565::BLACK);
        Rectangle::new(Point::new(-5, 8), Size::new(20, 20))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::GREEN))
            .draw(&mut fb)
            .unwrap();

        assert_eq!(fb.pixel(Point::new(0, 9)), Some(Rgb565::GREEN));
        assert_eq!(fb.pixel(Point::new(0, 7)), Some(Rgb565::BLACK));
        assert_eq!(
            fb.dirty_area(),
            Some(Rectangle::new(Point::new(0, 8), Size::new(10, 2)))
        );
    }

    #[test]
    fn test_flush_copies_region_and_resets() {
        let mut fb = FrameBuffer::new(Size::new(16, 16), Rgb565::BLACK);
        let mut target = FrameBuffer::new(Size::new(16, 16), Rgb565::BLACK);

        Pixel(Point::new(5, 6), Rgb565::BLUE).draw(&mut fb).unwrap();
        fb.flush(&mut target).unwrap();

        assert_eq!(target.pixel(Point::new(5, 6)), Some(Rgb565::BLUE));
        assert!(fb.dirty_area().is_none());

        // Nothing changed since, so nothing is sent
        let mut untouched = FrameBuffer::new(Size::new(16, 16), Rgb565::BLACK);
        fb.flush(&mut untouched).unwrap();
        assert!(untouched.dirty_area().is_none());
    }
}
