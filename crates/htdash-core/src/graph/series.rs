//! Data series types for graph rendering
//!
//! A series is an ordered list of optional points. `None` entries are gaps:
//! depending on `span_gaps` the line either bridges them or breaks into
//! separate runs.

use alloc::vec::Vec;

use super::constants::DEFAULT_SERIES_LINE_WIDTH_PX;
use super::{GraphError, GraphResult};

/// A single data point with x and y coordinates
///
/// x is a time offset in seconds, y the sensor value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    pub x: f32,
    pub y: f32,
}

impl DataPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Interpolation type for rendering series
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InterpolationType {
    /// Straight lines between points
    Linear,
    /// Cardinal spline through the points
    Smooth {
        /// Tangent scale (0.0 = straight, 0.5 = Catmull-Rom, 1.0 = loose)
        tension: f32,
    },
}

/// Visual style configuration for a data series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    /// Line width in pixels
    pub line_width: u32,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_SERIES_LINE_WIDTH_PX,
        }
    }
}

/// A data series containing points, style, and interpolation settings
#[derive(Debug, Clone, PartialEq)]
pub struct DataSeries {
    pub(super) points: Vec<Option<DataPoint>>,
    pub(super) style: SeriesStyle,
    pub(super) interpolation: InterpolationType,
    pub(super) span_gaps: bool,
}

impl DataSeries {
    /// Create an empty series with linear interpolation that spans gaps
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            style: SeriesStyle::default(),
            interpolation: InterpolationType::Linear,
            span_gaps: true,
        }
    }

    /// Set the visual style
    pub fn with_style(mut self, style: SeriesStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the interpolation type
    ///
    /// Returns error if a smooth tension falls outside 0.0..=1.0
    pub fn with_interpolation(mut self, interpolation: InterpolationType) -> GraphResult<Self> {
        if let InterpolationType::Smooth { tension } = interpolation
            && !(0.0..=1.0).contains(&tension)
        {
            return Err(GraphError::InvalidInterpolationParameter {
                param: "tension must be within 0.0..=1.0",
            });
        }

        self.interpolation = interpolation;
        Ok(self)
    }

    /// Choose whether gaps are bridged or break the line
    pub fn with_span_gaps(mut self, span_gaps: bool) -> Self {
        self.span_gaps = span_gaps;
        self
    }

    /// Push a point, or `None` for a gap
    pub fn push(&mut self, point: Option<DataPoint>) {
        self.points.push(point);
    }

    /// Iterate over the present points only
    pub fn valid_points(&self) -> impl Iterator<Item = DataPoint> + '_ {
        self.points.iter().flatten().copied()
    }

    pub fn style(&self) -> &SeriesStyle {
        &self.style
    }

    pub fn interpolation(&self) -> InterpolationType {
        self.interpolation
    }

    /// Split the series into contiguous runs of present points
    ///
    /// With `span_gaps` all present points form a single run. Without it
    /// every gap ends the current run. Empty runs are never returned.
    pub fn runs(&self) -> Vec<Vec<DataPoint>> {
        let mut runs = Vec::new();
        let mut current = Vec::new();

        for entry in self.points.iter() {
            match entry {
                Some(point) => current.push(*point),
                None if !self.span_gaps && !current.is_empty() => {
                    runs.push(core::mem::take(&mut current));
                }
                None => {}
            }
        }

        if !current.is_empty() {
            runs.push(current);
        }

        runs
    }
}

impl Default for DataSeries {
    fn default() -> Self {
        Self::new()
    }
}
