//! Main graph component
//!
//! The Graph component orchestrates all rendering for one series on one
//! canvas. Layers are drawn background, border, grid, series, labels.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use log::trace;

use super::axis::{TimeAxis, YAxisConfig, draw_time_labels, draw_y_axis_labels};
use super::constants::AUTO_SCALE_MARGIN_FACTOR;
use super::grid::{BorderOverlay, draw_border, draw_vertical_lines};
use super::interpolation::{StrokePaint, draw_linear_run, draw_smooth_run};
use super::series::{DataSeries, InterpolationType};
use super::viewport::{DataBounds, Viewport, ViewportPadding};
use super::{GraphError, GraphResult};

/// Single-series line chart bound to a canvas rectangle
pub struct Graph {
    /// Bounding rectangle for the entire graph
    bounds: Rectangle,
    series: DataSeries,
    viewport: Viewport,
    time_axis: Option<TimeAxis>,
    y_axis: Option<YAxisConfig>,
    border: Option<BorderOverlay>,
    /// Lower/upper y bounds used unless the data exceeds them
    suggested_y: (Option<f32>, Option<f32>),
    /// Pinned x bounds, overriding the data extent
    x_override: Option<(f32, f32)>,
    /// `None` leaves the canvas untouched before drawing
    background: Option<Rgb565>,
}

impl Graph {
    /// Create a new graph with default configuration
    pub fn new(bounds: Rectangle) -> Self {
        // Placeholder data bounds until a series is set
        let data_bounds = DataBounds::new(0.0, 1.0, 0.0, 1.0);

        Self {
            bounds,
            series: DataSeries::new(),
            viewport: Viewport::new(data_bounds, bounds),
            time_axis: None,
            y_axis: None,
            border: None,
            suggested_y: (None, None),
            x_override: None,
            background: None,
        }
    }

    pub fn with_background(mut self, color: Rgb565) -> Self {
        self.background = Some(color);
        self
    }

    pub fn with_padding(mut self, padding: ViewportPadding) -> Self {
        self.viewport = self.viewport.with_padding(padding);
        self
    }

    pub fn with_border(mut self, border: BorderOverlay) -> Self {
        self.border = Some(border);
        self
    }

    pub fn with_time_axis(mut self, axis: TimeAxis) -> Self {
        self.time_axis = Some(axis);
        self
    }

    pub fn with_y_axis(mut self, config: YAxisConfig) -> Self {
        self.y_axis = Some(config);
        self
    }

    /// Widen the value axis to at least this range
    pub fn with_suggested_y_range(mut self, min: Option<f32>, max: Option<f32>) -> Self {
        self.suggested_y = (min, max);
        self.recalculate_viewport();
        self
    }

    /// Replace the series and rescale
    pub fn set_series(&mut self, series: DataSeries) {
        self.series = series;
        self.recalculate_viewport();
    }

    /// Pin the x-axis bounds without changing y-axis auto-scaling
    pub fn set_x_bounds(&mut self, x_min: f32, x_max: f32) -> GraphResult<()> {
        if !(x_min < x_max) {
            return Err(GraphError::InvalidDataBounds);
        }

        self.x_override = Some((x_min, x_max));
        self.recalculate_viewport();
        Ok(())
    }

    /// Drawable area inside the padding
    pub fn plot_area(&self) -> Rectangle {
        self.viewport.plot_area()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    fn recalculate_viewport(&mut self) {
        let mut bounds = DataBounds::from_points(self.series.valid_points(), AUTO_SCALE_MARGIN_FACTOR)
            .unwrap_or(DataBounds::new(0.0, 1.0, 0.0, 1.0))
            .with_suggested_y(self.suggested_y.0, self.suggested_y.1);

        if let Some((x_min, x_max)) = self.x_override {
            bounds.x_min = x_min;
            bounds.x_max = x_max;
        }

        self.viewport.set_data_bounds(bounds);
    }

    fn draw_series<D: DrawTarget<Color = Rgb565>>(
        &self,
        paint: &StrokePaint<'_>,
        display: &mut D,
    ) -> Result<usize, D::Error> {
        let style = self.series.style();
        let mut drawn = 0;

        for run in self.series.runs() {
            // A lone point has no line to draw
            if run.len() < 2 {
                continue;
            }

            match self.series.interpolation() {
                InterpolationType::Linear => {
                    draw_linear_run(&run, &self.viewport, style, paint, display)?;
                }
                InterpolationType::Smooth { tension } => {
                    draw_smooth_run(&run, &self.viewport, style, tension, paint, display)?;
                }
            }
            drawn += 1;
        }

        Ok(drawn)
    }

    /// Draw every layer and return the number of line runs drawn
    ///
    /// The series is clipped to the plot area; grid, border and labels are
    /// clipped to the graph bounds.
    pub fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        paint: &StrokePaint<'_>,
    ) -> Result<usize, D::Error> {
        let plot_area = self.viewport.plot_area();
        let mut canvas = display.clipped(&self.bounds);

        if let Some(color) = self.background {
            self.bounds
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(&mut canvas)?;
        }

        if let Some(ref border) = self.border {
            draw_border(border, plot_area, &mut canvas)?;
        }

        if let Some(ref axis) = self.time_axis {
            draw_vertical_lines(
                axis.ticks.iter().map(|tick| tick.x),
                axis.grid_color,
                axis.grid_width,
                &self.viewport,
                &mut canvas,
            )?;
        }

        let drawn = if plot_area.size.width == 0 || plot_area.size.height == 0 {
            0
        } else {
            // Data at x_max/y_max lands one pixel past the area's last column/row
            let series_clip = Rectangle::new(plot_area.top_left, plot_area.size + Size::new(1, 1));
            self.draw_series(paint, &mut canvas.clipped(&series_clip))?
        };

        if let Some(ref axis) = self.time_axis {
            draw_time_labels(axis, &self.viewport, &mut canvas)?;
        }

        if let Some(ref y_axis) = self.y_axis {
            draw_y_axis_labels(y_axis, &self.viewport, &mut canvas)?;
        }

        trace!("graph drew {} run(s) in {:?}", drawn, plot_area);
        Ok(drawn)
    }
}
