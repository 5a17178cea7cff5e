//! Vertical stroke gradient and its per-renderer cache

use alloc::vec::Vec;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use log::debug;

use crate::config::{ColorRgb8, GradientStop};
use crate::graph::StrokePaint;

/// One color per row of the drawable area, top row first
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    rows: Vec<Rgb565>,
}

impl Gradient {
    /// Lay the stops out over `height` rows, position 0.0 on the bottom row
    pub fn vertical(height: u32, stops: &[GradientStop]) -> Self {
        let last_row = height.saturating_sub(1).max(1) as f32;
        let rows = (0..height)
            .map(|row| color_at_position(stops, 1.0 - row as f32 / last_row))
            .collect();

        Self { rows }
    }

    pub fn rows(&self) -> &[Rgb565] {
        &self.rows
    }

    pub fn height(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Stroke paint with the first row pinned to screen row `top`
    pub fn paint(&self, top: i32) -> StrokePaint<'_> {
        StrokePaint::Vertical {
            top,
            rows: &self.rows,
        }
    }
}

/// Color at a position along the stops, clamped to the outer stops
fn color_at_position(stops: &[GradientStop], position: f32) -> Rgb565 {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Rgb565::BLACK;
    };

    if position <= first.position {
        return first.color.to_rgb565();
    }
    if position >= last.position {
        return last.color.to_rgb565();
    }

    for pair in stops.windows(2) {
        let (lower, upper) = (pair[0], pair[1]);
        if position <= upper.position {
            let span = upper.position - lower.position;
            if span <= 0.0 {
                return upper.color.to_rgb565();
            }
            return lerp_color(lower.color, upper.color, (position - lower.position) / span);
        }
    }

    last.color.to_rgb565()
}

fn lerp_color(start: ColorRgb8, end: ColorRgb8, t: f32) -> Rgb565 {
    let t = t.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;

    ColorRgb8::new(
        channel(start.r, end.r),
        channel(start.g, end.g),
        channel(start.b, end.b),
    )
    .to_rgb565()
}

#[derive(Debug, Clone)]
struct CachedGradient {
    size: Size,
    gradient: Gradient,
}

/// Gradient cache keyed on the drawable area's dimensions
///
/// The gradient is rebuilt only when the width or height changes. Moving the
/// area does not invalidate it because the paint is re-anchored on every
/// draw. Each renderer owns one cache; caches are never shared.
#[derive(Debug, Clone, Default)]
pub struct GradientCache {
    entry: Option<CachedGradient>,
    builds: u32,
}

impl GradientCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached gradient for `area`, building it first if the size changed
    ///
    /// Returns `None` while the area has no size yet, without touching the
    /// cached entry.
    pub fn get_or_build(&mut self, area: Size, stops: &[GradientStop]) -> Option<&Gradient> {
        if area.width == 0 || area.height == 0 {
            return None;
        }

        let stale = self.entry.as_ref().is_none_or(|cached| cached.size != area);
        if stale {
            debug!("Building {}x{} stroke gradient", area.width, area.height);
            self.builds = self.builds.wrapping_add(1);
            self.entry = Some(CachedGradient {
                size: area,
                gradient: Gradient::vertical(area.height, stops),
            });
        }

        self.current()
    }

    /// Gradient from the last build, if any
    pub fn current(&self) -> Option<&Gradient> {
        self.entry.as_ref().map(|cached| &cached.gradient)
    }

    /// Number of gradients built so far
    pub fn build_count(&self) -> u32 {
        self.builds
    }

    /// Size the cached gradient was built for
    pub fn cached_size(&self) -> Option<Size> {
        self.entry.as_ref().map(|cached| cached.size)
    }

    /// Drop the cached gradient, forcing a rebuild on next use
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
