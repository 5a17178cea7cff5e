//! Constants for graph rendering
//!
//! All magic numbers are defined here with descriptive names and units.

/// Number of subdivisions per segment for smooth curve interpolation
///
/// Higher values produce smoother curves but increase rendering time.
/// A sparkline segment rarely spans more than a few pixels, so 6 is plenty.
pub const DEFAULT_SMOOTH_SUBDIVISIONS: usize = 6;

/// Default grid line width in pixels
pub const DEFAULT_GRID_LINE_WIDTH_PX: u32 = 1;

/// Maximum length of formatted axis labels (characters)
pub const MAX_AXIS_LABEL_LENGTH: usize = 16;

/// Vertical distance between the plot area bottom and time labels in pixels
pub const TIME_LABEL_OFFSET_PX: i32 = 9;

/// Horizontal distance between the plot area left edge and value labels in pixels
pub const VALUE_LABEL_OFFSET_PX: i32 = 3;

/// Minimum data range for auto-scaling (prevents division by zero)
pub const MIN_DATA_RANGE: f32 = 0.001;

/// Margin factor for value axis auto-scaling (10% padding)
pub const AUTO_SCALE_MARGIN_FACTOR: f32 = 0.1;

/// Default series line width in pixels
pub const DEFAULT_SERIES_LINE_WIDTH_PX: u32 = 2;
