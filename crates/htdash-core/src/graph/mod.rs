//! Line chart engine for small embedded canvases
//!
//! This module is the charting collaborator the sparkline renderer
//! configures. It owns everything about turning data into pixels:
//!
//! - Data space to screen space transformation with padding
//! - Gap-aware series that either span or break at missing values
//! - Linear and cardinal-spline interpolation with adjustable tension
//! - Stroke paints (solid or a per-row vertical gradient)
//! - Time tick grid lines with hour labels, optional value labels
//! - A border overlay around the plot area
//!
//! It knows nothing about stations, clocks or caching. Callers hand it
//! offsets in seconds on the x-axis and a ready-made paint.
//!
//! # Examples
//!
//! ```ignore
//! use htdash_core::graph::*;
//! use embedded_graphics::prelude::*;
//! use embedded_graphics::primitives::Rectangle;
//!
//! let bounds = Rectangle::new(Point::new(0, 0), Size::new(180, 120));
//! let mut graph = Graph::new(bounds).with_padding(ViewportPadding::uniform(4));
//!
//! let mut series = DataSeries::new()
//!     .with_interpolation(InterpolationType::Smooth { tension: 0.5 })?;
//! series.push(Some(DataPoint::new(-3600.0, 21.0)));
//! series.push(None);
//! series.push(Some(DataPoint::new(0.0, 22.5)));
//!
//! graph.set_series(series);
//! graph.set_x_bounds(-86_400.0, 0.0)?;
//! graph.draw(&mut display, &StrokePaint::Solid(Rgb565::WHITE))?;
//! ```

use thiserror_no_std::Error;

mod axis;
mod component;
pub mod constants;
mod grid;
mod interpolation;
pub mod series;
pub mod viewport;

pub use axis::{TimeAxis, TimeTick, YAxisConfig};
pub use component::Graph;
pub use grid::{BorderOverlay, LineStyle};
pub use interpolation::StrokePaint;
pub use series::{DataPoint, DataSeries, InterpolationType, SeriesStyle};
pub use viewport::{DataBounds, Viewport, ViewportPadding};

/// Error types for graph operations
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    /// Invalid data bounds
    #[error("Invalid data bounds (min >= max)")]
    InvalidDataBounds,

    /// Invalid interpolation parameter
    #[error("Invalid interpolation parameter: {param}")]
    InvalidInterpolationParameter {
        /// Parameter description
        param: &'static str,
    },
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;
