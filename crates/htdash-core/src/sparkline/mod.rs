//! Gradient sparklines over a rolling time window
//!
//! A [`SparklineRenderer`] turns one station's [`Series`] into a small line
//! chart on a fixed canvas:
//!
//! - The series is copied and its last sample is repeated at "now", so the
//!   line reaches the right edge unless the series ends in a gap
//! - The x-axis covers exactly `[now - window, now]`
//! - The stroke is a vertical gradient across the drawable area, cached per
//!   renderer and rebuilt only when the area's size changes
//!
//! Drawing itself is delegated to [`crate::graph::Graph`].

mod gradient;
mod window;

pub use gradient::{Gradient, GradientCache};
pub use window::{TimeWindow, extend_to_now, hour_ticks};

use alloc::vec::Vec;
use chrono::{DateTime, FixedOffset, Utc};
use core::fmt;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::{debug, trace};
use thiserror_no_std::Error;

use crate::clock::Clock;
use crate::config::{ConfigError, SparklineConfig, WindowBounds};
use crate::graph::constants::DEFAULT_GRID_LINE_WIDTH_PX;
use crate::graph::{
    BorderOverlay, DataPoint, DataSeries, Graph, GraphError, InterpolationType, LineStyle,
    SeriesStyle, StrokePaint, TimeAxis, TimeTick, ViewportPadding, YAxisConfig,
};
use crate::station::{Sample, Series};

/// Space between the canvas edge and the drawable area
pub const SPARKLINE_PADDING_PX: u32 = 4;

/// Extra bottom space for hour labels when the time axis is shown
pub const TIME_LABEL_BAND_PX: u32 = 10;

/// Extra left space for value labels when the value axis is shown
pub const VALUE_LABEL_BAND_PX: u32 = 16;

/// Value labels drawn when the value axis is shown
const VALUE_LABEL_COUNT: usize = 3;

/// Error types for sparkline rendering
#[derive(Debug, Error, PartialEq)]
pub enum SparklineError {
    /// Nothing to extend or draw
    #[error("Series has no samples")]
    EmptySeries,

    /// Window length does not fit a time delta
    #[error("Invalid time window")]
    InvalidWindow,

    #[error("Invalid sparkline configuration: {0}")]
    Config(ConfigError),

    #[error("Chart setup failed: {0}")]
    Graph(GraphError),
}

impl From<ConfigError> for SparklineError {
    fn from(err: ConfigError) -> Self {
        SparklineError::Config(err)
    }
}

impl From<GraphError> for SparklineError {
    fn from(err: GraphError) -> Self {
        SparklineError::Graph(err)
    }
}

/// Result type for sparkline operations
pub type SparklineResult<T> = Result<T, SparklineError>;

/// Failure while rendering to a draw target
#[derive(Debug, PartialEq)]
pub enum RenderError<E> {
    Sparkline(SparklineError),
    /// The draw target rejected a pixel
    Draw(E),
}

impl<E> From<SparklineError> for RenderError<E> {
    fn from(err: SparklineError) -> Self {
        RenderError::Sparkline(err)
    }
}

impl<E: fmt::Debug> fmt::Display for RenderError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Sparkline(err) => write!(f, "{}", err),
            RenderError::Draw(err) => write!(f, "Draw target error: {:?}", err),
        }
    }
}

/// What a render pass did
#[derive(Debug, Clone, PartialEq)]
pub struct SparklineFrame {
    pub window: TimeWindow,
    /// Drawable area inside the canvas padding
    pub plot_area: Rectangle,
    /// X-axis bounds in seconds relative to the window end
    pub x_range: (f32, f32),
    /// Samples drawn, including the one synthesized at "now"
    pub samples: usize,
    /// Line runs drawn; 1 when gaps are spanned
    pub runs_drawn: usize,
    /// The stroke used the gradient rather than the neutral color
    pub gradient_applied: bool,
    /// The gradient was (re)built during this pass
    pub gradient_rebuilt: bool,
}

/// Draws one series as a gradient sparkline on its own canvas
///
/// Owns its gradient cache, so every canvas keeps an independent gradient.
pub struct SparklineRenderer {
    bounds: Rectangle,
    config: SparklineConfig,
    cache: GradientCache,
}

impl SparklineRenderer {
    /// Renderer for a canvas of `config.canvas_size` at `origin`
    pub fn new(origin: Point, config: SparklineConfig) -> SparklineResult<Self> {
        config.validate()?;

        Ok(Self {
            bounds: Rectangle::new(origin, config.canvas_size.to_size()),
            config,
            cache: GradientCache::new(),
        })
    }

    pub fn config(&self) -> &SparklineConfig {
        &self.config
    }

    /// Swap the cosmetics, dropping the cached gradient
    pub fn set_config(&mut self, config: SparklineConfig) -> SparklineResult<()> {
        config.validate()?;

        self.bounds.size = config.canvas_size.to_size();
        self.config = config;
        self.cache.invalidate();
        Ok(())
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    /// Move the canvas; the cached gradient stays valid
    pub fn set_origin(&mut self, origin: Point) {
        self.bounds.top_left = origin;
    }

    /// Resize the canvas
    ///
    /// A zero size is accepted for canvases that have not been laid out yet;
    /// they render with the neutral stroke and no line.
    pub fn resize(&mut self, size: Size) {
        self.bounds.size = size;
    }

    pub fn gradient_cache(&self) -> &GradientCache {
        &self.cache
    }

    /// Render `series` as of the clock's current time
    pub fn render<D, C>(
        &mut self,
        series: &Series,
        display: &mut D,
        clock: &C,
    ) -> Result<SparklineFrame, RenderError<D::Error>>
    where
        D: DrawTarget<Color = Rgb565>,
        C: Clock + ?Sized,
    {
        self.render_at(series, display, clock.now())
    }

    /// Render `series` as of `now`
    ///
    /// The caller's series is never modified; the trailing "now" sample only
    /// exists in the working copy drawn here.
    pub fn render_at<D>(
        &mut self,
        series: &Series,
        display: &mut D,
        now: DateTime<FixedOffset>,
    ) -> Result<SparklineFrame, RenderError<D::Error>>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let now_utc = now.with_timezone(&Utc);
        let working = extend_to_now(series, now_utc)?;
        let window = TimeWindow::ending_at(now_utc, self.config.window_hours)?;
        let graph = self.build_graph(&working, &window, *now.offset())?;
        let plot_area = graph.plot_area();
        let data_bounds = graph.viewport().data_bounds();
        let x_range = (data_bounds.x_min, data_bounds.x_max);

        let builds_before = self.cache.build_count();
        let gradient_applied = self
            .cache
            .get_or_build(plot_area.size, &self.config.gradient_stops)
            .is_some();
        let gradient_rebuilt = self.cache.build_count() != builds_before;

        let paint = match self.cache.current().filter(|_| gradient_applied) {
            Some(gradient) => gradient.paint(plot_area.top_left.y),
            None => {
                debug!("{}: drawable area not measured yet", series.station());
                StrokePaint::Solid(self.config.neutral_stroke.to_rgb565())
            }
        };

        let runs_drawn = graph.draw(display, &paint).map_err(RenderError::Draw)?;

        trace!(
            "{}: {} sample(s) in {} run(s)",
            series.station(),
            working.len(),
            runs_drawn
        );

        Ok(SparklineFrame {
            window,
            plot_area,
            x_range,
            samples: working.len(),
            runs_drawn,
            gradient_applied,
            gradient_rebuilt,
        })
    }

    fn padding(&self) -> ViewportPadding {
        let mut padding = ViewportPadding::uniform(SPARKLINE_PADDING_PX);
        if self.config.x_axis.visible {
            padding.bottom += TIME_LABEL_BAND_PX;
        }
        if self.config.y_axis.visible {
            padding.left += VALUE_LABEL_BAND_PX;
        }
        padding
    }

    /// Configure a chart for the working copy and window
    fn build_graph(
        &self,
        working: &[Sample],
        window: &TimeWindow,
        offset: FixedOffset,
    ) -> SparklineResult<Graph> {
        let config = &self.config;

        let interpolation = if config.line_tension > 0.0 {
            InterpolationType::Smooth {
                tension: config.line_tension,
            }
        } else {
            InterpolationType::Linear
        };

        let mut data = DataSeries::new()
            .with_style(SeriesStyle {
                line_width: config.line_width_px,
            })
            .with_interpolation(interpolation)?
            .with_span_gaps(config.span_gaps);
        for sample in working {
            data.push(
                sample
                    .value
                    .map(|value| DataPoint::new(window.offset_secs(sample.timestamp), value)),
            );
        }

        let x_min = window.start_offset_secs();
        let x_max = match config.window_bounds {
            WindowBounds::MinAndMax => 0.0,
            WindowBounds::MinOnly => data
                .valid_points()
                .map(|point| point.x)
                .reduce(f32::max)
                .filter(|max| *max > x_min)
                .unwrap_or(0.0),
        };

        let mut graph = Graph::new(self.bounds)
            .with_padding(self.padding())
            .with_background(config.background.to_rgb565())
            .with_suggested_y_range(config.y_axis.suggested_min, config.y_axis.suggested_max);

        if let Some(border) = config.border {
            graph = graph.with_border(BorderOverlay {
                color: border.color.to_rgb565(),
                width: border.width_px,
                style: match border.dash {
                    Some((dash_length, gap_length)) => LineStyle::Dashed {
                        dash_length,
                        gap_length,
                    },
                    None => LineStyle::Solid,
                },
            });
        }

        if config.x_axis.visible {
            graph = graph.with_time_axis(TimeAxis {
                ticks: hour_ticks(window, offset, config.x_axis.tick_step_hours),
                grid_color: config.x_axis.grid_color.to_rgb565(),
                label_color: config.x_axis.label_color.to_rgb565(),
                grid_width: DEFAULT_GRID_LINE_WIDTH_PX,
            });
        }

        if config.y_axis.visible {
            graph = graph.with_y_axis(YAxisConfig {
                label_count: VALUE_LABEL_COUNT,
                precision: 0,
                unit: "",
                label_color: config.x_axis.label_color.to_rgb565(),
            });
        }

        graph.set_series(data);
        graph.set_x_bounds(x_min, x_max)?;

        Ok(graph)
    }
}

/// Ticks shown for a window, exposed for hosts that label outside the chart
pub fn window_ticks(
    now: DateTime<FixedOffset>,
    config: &SparklineConfig,
) -> SparklineResult<Vec<TimeTick>> {
    let window = TimeWindow::ending_at(now.with_timezone(&Utc), config.window_hours)?;
    Ok(hour_ticks(&window, *now.offset(), config.x_axis.tick_step_hours))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::{CanvasSize, ColorRgb8};
    use crate::framebuffer::FrameBuffer;
    use crate::station::StationId;
    use alloc::vec;
    use chrono::{TimeDelta, TimeZone};

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 2, 12, 0, 0)
            .unwrap()
    }

    fn hours_ago(hours: i64) -> DateTime<Utc> {
        now().with_timezone(&Utc) - TimeDelta::hours(hours)
    }

    fn gappy_series() -> Series {
        Series::from_samples(
            StationId::new("garden").unwrap(),
            vec![
                Sample::new(hours_ago(4), 18.0),
                Sample::new(hours_ago(3), 19.0),
                Sample::gap(hours_ago(2)),
                Sample::new(hours_ago(1), 22.0),
            ],
        )
        .unwrap()
    }

    fn canvas() -> FrameBuffer {
        FrameBuffer::new(Size::new(200, 140), Rgb565::BLACK)
    }

    #[test]
    fn test_render_leaves_series_untouched() {
        let series = gappy_series();
        let before = series.clone();
        let mut renderer = SparklineRenderer::new(Point::zero(), SparklineConfig::default()).unwrap();

        let frame = renderer.render_at(&series, &mut canvas(), now()).unwrap();

        assert_eq!(series, before);
        assert_eq!(frame.samples, series.len() + 1);
    }

    #[test]
    fn test_window_ends_exactly_at_now() {
        let mut renderer = SparklineRenderer::new(Point::zero(), SparklineConfig::default()).unwrap();
        let frame = renderer.render_at(&gappy_series(), &mut canvas(), now()).unwrap();

        assert_eq!(frame.window.end, now().with_timezone(&Utc));
        assert_eq!(frame.window.start, hours_ago(24));
    }

    #[test]
    fn test_render_through_clock() {
        let clock = FixedClock::new(now());
        let mut renderer = SparklineRenderer::new(Point::zero(), SparklineConfig::default()).unwrap();
        let frame = renderer.render(&gappy_series(), &mut canvas(), &clock).unwrap();
        assert_eq!(frame.window.end, now().with_timezone(&Utc));
    }

    #[test]
    fn test_spanning_gaps_draws_one_run() {
        let mut renderer = SparklineRenderer::new(Point::zero(), SparklineConfig::default()).unwrap();
        let frame = renderer.render_at(&gappy_series(), &mut canvas(), now()).unwrap();
        assert_eq!(frame.runs_drawn, 1);

        let broken = SparklineConfig {
            span_gaps: false,
            ..SparklineConfig::default()
        };
        let mut renderer = SparklineRenderer::new(Point::zero(), broken).unwrap();
        let frame = renderer.render_at(&gappy_series(), &mut canvas(), now()).unwrap();
        assert_eq!(frame.runs_drawn, 2);
    }

    #[test]
    fn test_gradient_built_once_until_resized() {
        let series = gappy_series();
        let mut display = canvas();
        let mut renderer = SparklineRenderer::new(Point::zero(), SparklineConfig::default()).unwrap();

        let first = renderer.render_at(&series, &mut display, now()).unwrap();
        let second = renderer.render_at(&series, &mut display, now()).unwrap();
        assert!(first.gradient_rebuilt);
        assert!(!second.gradient_rebuilt);
        assert_eq!(renderer.gradient_cache().build_count(), 1);

        // Moving keeps the size
        renderer.set_origin(Point::new(10, 10));
        renderer.render_at(&series, &mut display, now()).unwrap();
        assert_eq!(renderer.gradient_cache().build_count(), 1);

        renderer.resize(Size::new(180, 100));
        let resized = renderer.render_at(&series, &mut display, now()).unwrap();
        assert!(resized.gradient_rebuilt);
        assert_eq!(renderer.gradient_cache().build_count(), 2);

        renderer.render_at(&series, &mut display, now()).unwrap();
        assert_eq!(renderer.gradient_cache().build_count(), 2);
    }

    #[test]
    fn test_renderers_keep_separate_caches() {
        let series = gappy_series();
        let mut display = canvas();
        let mut a = SparklineRenderer::new(Point::zero(), SparklineConfig::default()).unwrap();
        let mut b = SparklineRenderer::new(Point::zero(), SparklineConfig::default()).unwrap();

        a.render_at(&series, &mut display, now()).unwrap();
        a.render_at(&series, &mut display, now()).unwrap();
        b.render_at(&series, &mut display, now()).unwrap();

        assert_eq!(a.gradient_cache().build_count(), 1);
        assert_eq!(b.gradient_cache().build_count(), 1);
    }

    #[test]
    fn test_stroke_uses_gradient_colors() {
        let config = SparklineConfig {
            border: None,
            ..SparklineConfig::three_stop()
        };
        let mut display = canvas();
        let mut renderer = SparklineRenderer::new(Point::zero(), config).unwrap();
        let frame = renderer.render_at(&gappy_series(), &mut display, now()).unwrap();
        assert!(frame.gradient_applied);

        let gradient = renderer.gradient_cache().current().unwrap();
        assert_eq!(gradient.height(), frame.plot_area.size.height);

        let mut stroked = 0;
        for y in 0..140 {
            for x in 0..200 {
                if let Some(color) = display.pixel(Point::new(x, y))
                    && color != Rgb565::BLACK
                {
                    assert!(gradient.rows().contains(&color));
                    stroked += 1;
                }
            }
        }
        assert!(stroked > 0);
    }

    #[test]
    fn test_unmeasured_area_uses_neutral_stroke() {
        let mut renderer = SparklineRenderer::new(Point::zero(), SparklineConfig::default()).unwrap();
        renderer.resize(Size::zero());

        let frame = renderer.render_at(&gappy_series(), &mut canvas(), now()).unwrap();

        assert!(!frame.gradient_applied);
        assert_eq!(frame.runs_drawn, 0);
        assert_eq!(renderer.gradient_cache().build_count(), 0);
    }

    #[test]
    fn test_empty_series_draws_nothing() {
        let empty = Series::new(StationId::new("garden").unwrap());
        let mut display = canvas();
        let mut renderer = SparklineRenderer::new(Point::zero(), SparklineConfig::default()).unwrap();

        let result = renderer.render_at(&empty, &mut display, now());

        assert_eq!(
            result,
            Err(RenderError::Sparkline(SparklineError::EmptySeries))
        );
        assert!(display.dirty_area().is_none());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SparklineConfig {
            canvas_size: CanvasSize::new(0, 0),
            ..SparklineConfig::default()
        };
        assert!(matches!(
            SparklineRenderer::new(Point::zero(), config),
            Err(SparklineError::Config(ConfigError::EmptyCanvas))
        ));
    }

    #[test]
    fn test_set_config_invalidates_gradient() {
        let series = gappy_series();
        let mut display = canvas();
        let mut renderer = SparklineRenderer::new(Point::zero(), SparklineConfig::default()).unwrap();
        renderer.render_at(&series, &mut display, now()).unwrap();

        renderer.set_config(SparklineConfig::three_stop()).unwrap();
        let frame = renderer.render_at(&series, &mut display, now()).unwrap();

        assert!(frame.gradient_rebuilt);
        assert_eq!(renderer.gradient_cache().build_count(), 2);
    }

    #[test]
    fn test_border_drawn_around_plot_area() {
        let mut display = canvas();
        let mut renderer = SparklineRenderer::new(Point::zero(), SparklineConfig::default()).unwrap();
        let frame = renderer.render_at(&gappy_series(), &mut display, now()).unwrap();

        // Clear of the hour grid lines and the line itself
        let top_edge = frame.plot_area.top_left + Point::new(20, 0);
        assert_eq!(
            display.pixel(top_edge),
            Some(ColorRgb8::BORDER_GRAY.to_rgb565())
        );
    }

    #[test]
    fn test_pinned_window_spans_exactly_24h() {
        let mut renderer = SparklineRenderer::new(Point::zero(), SparklineConfig::default()).unwrap();
        let frame = renderer.render_at(&gappy_series(), &mut canvas(), now()).unwrap();
        assert_eq!(frame.x_range, (-86_400.0, 0.0));
    }

    #[test]
    fn test_min_only_window_ends_at_newest_value() {
        let mut renderer =
            SparklineRenderer::new(Point::zero(), SparklineConfig::three_stop()).unwrap();

        // The repeated sample sits at now
        let frame = renderer.render_at(&gappy_series(), &mut canvas(), now()).unwrap();
        assert_eq!(frame.x_range, (-86_400.0, 0.0));

        // A trailing gap is repeated as a gap, so the line stops at 3h ago
        let dropout = Series::from_samples(
            StationId::new("garden").unwrap(),
            vec![
                Sample::new(hours_ago(4), 18.0),
                Sample::new(hours_ago(3), 19.0),
                Sample::gap(hours_ago(1)),
            ],
        )
        .unwrap();
        let frame = renderer.render_at(&dropout, &mut canvas(), now()).unwrap();
        assert_eq!(frame.samples, 4);
        assert_eq!(frame.x_range, (-86_400.0, -10_800.0));
    }

    #[test]
    fn test_future_sample_still_extended() {
        let series = Series::from_samples(
            StationId::new("garden").unwrap(),
            vec![Sample::new(hours_ago(3), 18.0), Sample::new(hours_ago(-1), 20.0)],
        )
        .unwrap();
        let mut renderer =
            SparklineRenderer::new(Point::zero(), SparklineConfig::three_stop()).unwrap();

        let frame = renderer.render_at(&series, &mut canvas(), now()).unwrap();

        assert_eq!(frame.samples, 3);
        assert_eq!(frame.runs_drawn, 1);
        assert_eq!(frame.x_range, (-86_400.0, 3600.0));
    }

    #[test]
    fn test_dashed_border_leaves_gaps() {
        let config = SparklineConfig {
            border: Some(crate::config::AreaBorder {
                color: ColorRgb8::BORDER_GRAY,
                width_px: 1,
                dash: Some((4, 4)),
            }),
            ..SparklineConfig::three_stop()
        };
        let mut display = canvas();
        let mut renderer = SparklineRenderer::new(Point::zero(), config).unwrap();
        let frame = renderer.render_at(&gappy_series(), &mut display, now()).unwrap();

        let border = ColorRgb8::BORDER_GRAY.to_rgb565();
        let area = frame.plot_area;
        let lit = (0..area.size.width as i32)
            .filter(|x| display.pixel(area.top_left + Point::new(*x, 0)) == Some(border))
            .count();
        let width = area.size.width as usize;

        assert!(lit > width / 4 && lit < width * 3 / 4, "lit {} of {}", lit, width);
    }

    #[test]
    fn test_window_ticks_follow_local_hours() {
        let ticks = window_ticks(now(), &SparklineConfig::default()).unwrap();
        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["12", "18", "00", "06", "12"]);
    }
}
