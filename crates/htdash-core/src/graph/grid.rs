//! Grid line and border rendering for graph backgrounds
//!
//! Provides vertical grid lines at data-space positions and the rectangle
//! overlay around the plot area, both with solid or dashed strokes.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PointsIter, PrimitiveStyle, Rectangle};

use super::viewport::Viewport;

/// Line style for grid and border rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineStyle {
    /// Solid continuous line
    Solid,
    /// Dashed line with specified dash and gap lengths
    Dashed {
        /// Length of each dash in pixels
        dash_length: u32,
        /// Length of gap between dashes in pixels
        gap_length: u32,
    },
}

/// Rectangle stroked around the plot area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderOverlay {
    pub color: Rgb565,
    pub width: u32,
    pub style: LineStyle,
}

/// Draw one full-height vertical line per x value inside the data bounds
pub(super) fn draw_vertical_lines<D, I>(
    xs: I,
    color: Rgb565,
    width: u32,
    viewport: &Viewport,
    display: &mut D,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
    I: IntoIterator<Item = f32>,
{
    let plot_area = viewport.plot_area();
    let bounds = viewport.data_bounds();
    let bottom = plot_area.top_left.y + plot_area.size.height as i32;

    for x in xs {
        if x < bounds.x_min || x > bounds.x_max {
            continue;
        }
        if let Some(screen_x) = viewport.x_to_screen(x) {
            draw_line(
                Point::new(screen_x, plot_area.top_left.y),
                Point::new(screen_x, bottom),
                color,
                width,
                LineStyle::Solid,
                display,
            )?;
        }
    }

    Ok(())
}

/// Stroke the edges of the plot area
pub(super) fn draw_border<D: DrawTarget<Color = Rgb565>>(
    border: &BorderOverlay,
    plot_area: Rectangle,
    display: &mut D,
) -> Result<(), D::Error> {
    if plot_area.size.width == 0 || plot_area.size.height == 0 || border.width == 0 {
        return Ok(());
    }

    let left = plot_area.top_left.x;
    let top = plot_area.top_left.y;
    let right = left + plot_area.size.width as i32;
    let bottom = top + plot_area.size.height as i32;

    let corners = [
        Point::new(left, top),
        Point::new(right, top),
        Point::new(right, bottom),
        Point::new(left, bottom),
    ];

    for i in 0..corners.len() {
        let start = corners[i];
        let end = corners[(i + 1) % corners.len()];
        draw_line(start, end, border.color, border.width, border.style, display)?;
    }

    Ok(())
}

/// Draw a single line with specified style
fn draw_line<D: DrawTarget<Color = Rgb565>>(
    start: Point,
    end: Point,
    color: Rgb565,
    width: u32,
    style: LineStyle,
    display: &mut D,
) -> Result<(), D::Error> {
    match style {
        LineStyle::Solid => {
            Line::new(start, end)
                .into_styled(PrimitiveStyle::with_stroke(color, width))
                .draw(display)?;
        }
        LineStyle::Dashed {
            dash_length,
            gap_length,
        } => {
            draw_dashed_line(start, end, color, width, dash_length, gap_length, display)?;
        }
    }

    Ok(())
}

/// Draw a dashed line by stroking runs of the line's own pixels
///
/// The pattern is counted in rasterized pixels from `start`, so dashes keep
/// their length on any slope.
fn draw_dashed_line<D: DrawTarget<Color = Rgb565>>(
    start: Point,
    end: Point,
    color: Rgb565,
    width: u32,
    dash_length: u32,
    gap_length: u32,
    display: &mut D,
) -> Result<(), D::Error> {
    let line = Line::new(start, end);
    let line_style = PrimitiveStyle::with_stroke(color, width);

    if dash_length == 0 {
        return Ok(());
    }
    if gap_length == 0 {
        return line.into_styled(line_style).draw(display);
    }

    let pattern_length = dash_length + gap_length;
    let mut dash_start: Option<Point> = None;
    let mut previous = start;

    for (index, point) in line.points().enumerate() {
        let in_dash = (index as u32) % pattern_length < dash_length;
        match (in_dash, dash_start) {
            (true, None) => dash_start = Some(point),
            (false, Some(first)) => {
                Line::new(first, previous)
                    .into_styled(line_style)
                    .draw(display)?;
                dash_start = None;
            }
            _ => {}
        }
        previous = point;
    }

    if let Some(first) = dash_start {
        Line::new(first, previous)
            .into_styled(line_style)
            .draw(display)?;
    }

    Ok(())
}
