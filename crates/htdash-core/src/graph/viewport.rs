//! Viewport and coordinate transformation utilities
//!
//! Handles transformation between data space (time offsets, sensor values)
//! and screen space (pixel coordinates).

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::constants::MIN_DATA_RANGE;
use super::series::DataPoint;

/// Data space bounds (min/max x and y values)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataBounds {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl DataBounds {
    pub const fn new(x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Calculate bounds from data points with a relative margin on the y-axis
    ///
    /// The x-axis gets no margin; time axes are pinned by the caller.
    pub fn from_points<I>(points: I, y_margin_factor: f32) -> Option<Self>
    where
        I: IntoIterator<Item = DataPoint>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;

        let mut bounds = Self::new(first.x, first.x, first.y, first.y);
        for point in points {
            bounds.x_min = bounds.x_min.min(point.x);
            bounds.x_max = bounds.x_max.max(point.x);
            bounds.y_min = bounds.y_min.min(point.y);
            bounds.y_max = bounds.y_max.max(point.y);
        }

        let y_margin = bounds.y_range().max(MIN_DATA_RANGE) * y_margin_factor;
        bounds.y_min -= y_margin;
        bounds.y_max += y_margin;

        if bounds.x_range() < MIN_DATA_RANGE {
            bounds.x_max = bounds.x_min + MIN_DATA_RANGE;
        }
        if bounds.y_range() < MIN_DATA_RANGE {
            bounds.y_max = bounds.y_min + MIN_DATA_RANGE;
        }

        Some(bounds)
    }

    /// Widen the y-axis to include the suggested bounds
    ///
    /// Data outside the suggestion still wins, so nothing gets clipped.
    pub fn with_suggested_y(mut self, suggested_min: Option<f32>, suggested_max: Option<f32>) -> Self {
        if let Some(min) = suggested_min {
            self.y_min = self.y_min.min(min);
        }
        if let Some(max) = suggested_max {
            self.y_max = self.y_max.max(max);
        }
        self
    }

    /// Get the X range (width)
    pub fn x_range(&self) -> f32 {
        self.x_max - self.x_min
    }

    /// Get the Y range (height)
    pub fn y_range(&self) -> f32 {
        self.y_max - self.y_min
    }
}

/// Padding around the plot area for labels and margins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportPadding {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for ViewportPadding {
    fn default() -> Self {
        Self::uniform(0)
    }
}

impl ViewportPadding {
    /// Create uniform padding on all sides
    pub const fn uniform(padding: u32) -> Self {
        Self {
            top: padding,
            right: padding,
            bottom: padding,
            left: padding,
        }
    }

    /// Create padding with specific values
    pub const fn new(top: u32, right: u32, bottom: u32, left: u32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Viewport for transforming data coordinates to screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    data_bounds: DataBounds,
    /// Full area including padding
    screen_bounds: Rectangle,
    padding: ViewportPadding,
}

impl Viewport {
    pub fn new(data_bounds: DataBounds, screen_bounds: Rectangle) -> Self {
        Self {
            data_bounds,
            screen_bounds,
            padding: ViewportPadding::default(),
        }
    }

    pub fn with_padding(mut self, padding: ViewportPadding) -> Self {
        self.padding = padding;
        self
    }

    /// Get the plot area (screen bounds minus padding)
    ///
    /// Has zero width or height when the padding consumes the whole canvas.
    pub fn plot_area(&self) -> Rectangle {
        let top_left = Point::new(
            self.screen_bounds.top_left.x + self.padding.left as i32,
            self.screen_bounds.top_left.y + self.padding.top as i32,
        );

        let width = self
            .screen_bounds
            .size
            .width
            .saturating_sub(self.padding.left + self.padding.right);
        let height = self
            .screen_bounds
            .size
            .height
            .saturating_sub(self.padding.top + self.padding.bottom);

        Rectangle::new(top_left, Size::new(width, height))
    }

    /// Transform a data point to screen coordinates
    ///
    /// Points outside the data bounds map outside the plot area; the caller
    /// clips. Returns None only when the transform is not finite.
    pub fn data_to_screen(&self, point: DataPoint) -> Option<Point> {
        let plot_area = self.plot_area();

        let x_norm = (point.x - self.data_bounds.x_min) / self.data_bounds.x_range();
        let y_norm = (point.y - self.data_bounds.y_min) / self.data_bounds.y_range();

        if !x_norm.is_finite() || !y_norm.is_finite() {
            return None;
        }

        // Screen Y increases downward
        let screen_x = plot_area.top_left.x + (x_norm * plot_area.size.width as f32) as i32;
        let screen_y =
            plot_area.top_left.y + ((1.0 - y_norm) * plot_area.size.height as f32) as i32;

        Some(Point::new(screen_x, screen_y))
    }

    /// Screen column for an x value, used for grid lines
    pub fn x_to_screen(&self, x: f32) -> Option<i32> {
        let plot_area = self.plot_area();
        let x_norm = (x - self.data_bounds.x_min) / self.data_bounds.x_range();
        if !x_norm.is_finite() {
            return None;
        }
        Some(plot_area.top_left.x + (x_norm * plot_area.size.width as f32) as i32)
    }

    pub fn data_bounds(&self) -> &DataBounds {
        &self.data_bounds
    }

    pub fn set_data_bounds(&mut self, bounds: DataBounds) {
        self.data_bounds = bounds;
    }
}
