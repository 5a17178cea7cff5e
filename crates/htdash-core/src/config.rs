//! Dashboard and sparkline configuration
//!
//! Everything cosmetic about a sparkline lives in [`SparklineConfig`]. The
//! two presets cover the two chart looks the dashboard ships with. Configs
//! are plain serde structs so a host can load them from a file.

use alloc::vec;
use alloc::vec::Vec;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::Size;
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

/// Error types for configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Gradient needs at least one stop
    #[error("Gradient has no stops")]
    NoGradientStops,

    /// Stop position outside 0.0..=1.0
    #[error("Gradient stop {index} position out of range")]
    StopOutOfRange {
        /// Index of the offending stop
        index: usize,
    },

    /// Stop positions must not decrease
    #[error("Gradient stop {index} is before the previous stop")]
    StopsNotSorted {
        /// Index of the offending stop
        index: usize,
    },

    /// Tension outside 0.0..=1.0
    #[error("Line tension out of range")]
    TensionOutOfRange,

    /// Window length of zero hours
    #[error("Time window must be at least one hour")]
    EmptyWindow,

    /// Canvas with zero width or height
    #[error("Canvas must have non-zero width and height")]
    EmptyCanvas,
}

/// Result type for configuration validation
pub type ConfigResult<T> = Result<T, ConfigError>;

/// 8-bit-per-channel color as stored in config files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorRgb8 {
    pub const BLUE: Self = Self::new(0, 0, 255);
    pub const GREEN: Self = Self::new(0, 128, 0);
    pub const YELLOW: Self = Self::new(255, 255, 0);
    pub const RED: Self = Self::new(255, 0, 0);
    /// `#C0C0C0`, time grid lines
    pub const SILVER: Self = Self::new(0xc0, 0xc0, 0xc0);
    /// `#A0A0A0`, chart area border
    pub const BORDER_GRAY: Self = Self::new(0xa0, 0xa0, 0xa0);
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Neutral stroke used before the drawable area is measured
    pub const FAINT: Self = Self::new(0x1a, 0x1a, 0x1a);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to RGB565 (R>>3, G>>2, B>>3)
    pub const fn to_rgb565(self) -> Rgb565 {
        Rgb565::new(self.r >> 3, self.g >> 2, self.b >> 3)
    }
}

/// A (position, color) pair along the gradient, position 0.0 is the bottom
/// of the drawable area and 1.0 the top
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub position: f32,
    pub color: ColorRgb8,
}

impl GradientStop {
    pub const fn new(position: f32, color: ColorRgb8) -> Self {
        Self { position, color }
    }
}

/// How the x-axis bounds follow the data
///
/// `MinAndMax` pins the axis to exactly `[now - window, now]`. `MinOnly`
/// pins the lower bound and lets the upper bound follow the newest sample,
/// which after extension is "now" unless samples are stamped in the future.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowBounds {
    MinOnly,
    MinAndMax,
}

/// Time axis appearance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XAxisStyle {
    /// Draw hour grid lines and `HH` labels
    pub visible: bool,
    /// Hours between ticks, aligned to local wall-clock hours
    pub tick_step_hours: u32,
    pub grid_color: ColorRgb8,
    pub label_color: ColorRgb8,
}

/// Value axis range and appearance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YAxisRange {
    /// Draw value labels along the left edge
    pub visible: bool,
    /// Lower bound used unless the data goes below it
    pub suggested_min: Option<f32>,
    /// Upper bound used unless the data goes above it
    pub suggested_max: Option<f32>,
}

/// Rectangle stroked around the drawable area before the line is drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaBorder {
    pub color: ColorRgb8,
    pub width_px: u32,
    /// Optional (dash, gap) lengths in pixels
    pub dash: Option<(u32, u32)>,
}

/// Canvas dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn to_size(self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Sparkline cosmetics and time window
///
/// Fields missing from a config file take their `four_stop()` value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparklineConfig {
    /// Stops bottom to top, positions non-decreasing in 0.0..=1.0
    pub gradient_stops: Vec<GradientStop>,
    /// 0.0 draws straight segments, 0.5 a Catmull-Rom curve
    pub line_tension: f32,
    pub line_width_px: u32,
    pub window_hours: u32,
    pub window_bounds: WindowBounds,
    pub x_axis: XAxisStyle,
    pub y_axis: YAxisRange,
    /// Connect across missing values instead of breaking the line
    pub span_gaps: bool,
    pub canvas_size: CanvasSize,
    pub border: Option<AreaBorder>,
    /// Stroke used while the drawable area has no size
    pub neutral_stroke: ColorRgb8,
    pub background: ColorRgb8,
}

impl Default for SparklineConfig {
    fn default() -> Self {
        Self::four_stop()
    }
}

impl SparklineConfig {
    /// Blue, green, yellow, red with an hour grid every six hours
    pub fn four_stop() -> Self {
        Self {
            gradient_stops: vec![
                GradientStop::new(0.0, ColorRgb8::BLUE),
                GradientStop::new(0.33, ColorRgb8::GREEN),
                GradientStop::new(0.66, ColorRgb8::YELLOW),
                GradientStop::new(1.0, ColorRgb8::RED),
            ],
            line_tension: 0.5,
            line_width_px: 2,
            window_hours: 24,
            window_bounds: WindowBounds::MinAndMax,
            x_axis: XAxisStyle {
                visible: true,
                tick_step_hours: 6,
                grid_color: ColorRgb8::SILVER,
                label_color: ColorRgb8::SILVER,
            },
            y_axis: YAxisRange {
                visible: false,
                suggested_min: Some(0.0),
                suggested_max: Some(35.0),
            },
            span_gaps: true,
            canvas_size: CanvasSize::new(180, 120),
            border: Some(AreaBorder {
                color: ColorRgb8::BORDER_GRAY,
                width_px: 2,
                dash: None,
            }),
            neutral_stroke: ColorRgb8::FAINT,
            background: ColorRgb8::BLACK,
        }
    }

    /// Blue, yellow, red with both axes hidden
    pub fn three_stop() -> Self {
        Self {
            gradient_stops: vec![
                GradientStop::new(0.0, ColorRgb8::BLUE),
                GradientStop::new(0.5, ColorRgb8::YELLOW),
                GradientStop::new(1.0, ColorRgb8::RED),
            ],
            line_tension: 0.4,
            window_bounds: WindowBounds::MinOnly,
            x_axis: XAxisStyle {
                visible: false,
                ..Self::four_stop().x_axis
            },
            ..Self::four_stop()
        }
    }

    /// Check the invariants the renderer relies on
    pub fn validate(&self) -> ConfigResult<()> {
        if self.gradient_stops.is_empty() {
            return Err(ConfigError::NoGradientStops);
        }

        let mut previous = 0.0f32;
        for (index, stop) in self.gradient_stops.iter().enumerate() {
            if !(0.0..=1.0).contains(&stop.position) {
                return Err(ConfigError::StopOutOfRange { index });
            }
            if stop.position < previous {
                return Err(ConfigError::StopsNotSorted { index });
            }
            previous = stop.position;
        }

        if !(0.0..=1.0).contains(&self.line_tension) {
            return Err(ConfigError::TensionOutOfRange);
        }

        if self.window_hours == 0 {
            return Err(ConfigError::EmptyWindow);
        }

        if self.canvas_size.width == 0 || self.canvas_size.height == 0 {
            return Err(ConfigError::EmptyCanvas);
        }

        Ok(())
    }
}

/// Whole-dashboard settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub sparkline: SparklineConfig,
    /// Gap between tiles in pixels
    pub tile_gap_px: u32,
    pub background: ColorRgb8,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sparkline: SparklineConfig::default(),
            tile_gap_px: 8,
            background: ColorRgb8::BLACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert_eq!(SparklineConfig::four_stop().validate(), Ok(()));
        assert_eq!(SparklineConfig::three_stop().validate(), Ok(()));
    }

    #[test]
    fn test_three_stop_hides_axes() {
        let config = SparklineConfig::three_stop();
        assert!(!config.x_axis.visible);
        assert!(!config.y_axis.visible);
        assert_eq!(config.gradient_stops.len(), 3);
        assert_eq!(config.canvas_size, CanvasSize::new(180, 120));
    }

    #[test]
    fn test_validate_rejects_empty_stops() {
        let config = SparklineConfig {
            gradient_stops: Vec::new(),
            ..SparklineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoGradientStops));
    }

    #[test]
    fn test_validate_rejects_unsorted_stops() {
        let config = SparklineConfig {
            gradient_stops: vec![
                GradientStop::new(0.0, ColorRgb8::BLUE),
                GradientStop::new(0.7, ColorRgb8::GREEN),
                GradientStop::new(0.3, ColorRgb8::RED),
            ],
            ..SparklineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::StopsNotSorted { index: 2 })
        );
    }

    #[test]
    fn test_validate_rejects_out_of_range_stop() {
        let config = SparklineConfig {
            gradient_stops: vec![GradientStop::new(1.5, ColorRgb8::RED)],
            ..SparklineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::StopOutOfRange { index: 0 })
        );
    }

    #[test]
    fn test_validate_rejects_zero_window_and_canvas() {
        let config = SparklineConfig {
            window_hours: 0,
            ..SparklineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyWindow));

        let config = SparklineConfig {
            canvas_size: CanvasSize::new(0, 120),
            ..SparklineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyCanvas));
    }

    #[test]
    fn test_color_conversion_to_rgb565() {
        assert_eq!(ColorRgb8::RED.to_rgb565(), Rgb565::new(31, 0, 0));
        assert_eq!(ColorRgb8::BLUE.to_rgb565(), Rgb565::new(0, 0, 31));
    }
}
