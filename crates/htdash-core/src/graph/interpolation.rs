//! Interpolation algorithms for rendering series runs
//!
//! Provides linear and cardinal-spline interpolation. Every drawn piece is an
//! embedded-graphics `Line`, colored by the paint at the piece's midpoint row.

use alloc::vec::Vec;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};

use super::constants::DEFAULT_SMOOTH_SUBDIVISIONS;
use super::series::{DataPoint, SeriesStyle};
use super::viewport::Viewport;

/// Stroke color source for a series line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokePaint<'a> {
    /// One color for the whole line
    Solid(Rgb565),
    /// One color per screen row, `rows[0]` at `top`
    ///
    /// Rows above the first or below the last entry use the nearest entry.
    Vertical { top: i32, rows: &'a [Rgb565] },
}

impl StrokePaint<'_> {
    /// Color at a given screen row
    pub fn color_at(&self, y: i32) -> Rgb565 {
        match self {
            StrokePaint::Solid(color) => *color,
            StrokePaint::Vertical { top, rows } => {
                if rows.is_empty() {
                    return Rgb565::BLACK;
                }
                let row = (y - top).clamp(0, rows.len() as i32 - 1) as usize;
                rows[row]
            }
        }
    }
}

/// Draw one run of points with straight lines
pub(super) fn draw_linear_run<D: DrawTarget<Color = Rgb565>>(
    points: &[DataPoint],
    viewport: &Viewport,
    style: &SeriesStyle,
    paint: &StrokePaint<'_>,
    display: &mut D,
) -> Result<(), D::Error> {
    let screen_points: Vec<Point> = points
        .iter()
        .filter_map(|point| viewport.data_to_screen(*point))
        .collect();

    draw_polyline(&screen_points, style, paint, display)
}

/// Draw one run of points with a cardinal spline
///
/// The curve passes through every point. Tangents are `tension` times the
/// chord between the neighbors; the run's ends reuse their own point as the
/// missing neighbor.
pub(super) fn draw_smooth_run<D: DrawTarget<Color = Rgb565>>(
    points: &[DataPoint],
    viewport: &Viewport,
    style: &SeriesStyle,
    tension: f32,
    paint: &StrokePaint<'_>,
    display: &mut D,
) -> Result<(), D::Error> {
    if points.len() < 3 {
        return draw_linear_run(points, viewport, style, paint, display);
    }

    let step = 1.0 / DEFAULT_SMOOTH_SUBDIVISIONS as f32;
    let last = points.len() - 1;
    let mut screen_points = Vec::with_capacity(last * DEFAULT_SMOOTH_SUBDIVISIONS + 1);

    for i in 0..last {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(last)];

        // The segment's end point is the next segment's start point
        let subdivisions = if i + 1 == last {
            DEFAULT_SMOOTH_SUBDIVISIONS + 1
        } else {
            DEFAULT_SMOOTH_SUBDIVISIONS
        };

        for j in 0..subdivisions {
            let t = j as f32 * step;
            let interpolated = cardinal_point(p0, p1, p2, p3, t, tension);
            if let Some(screen_point) = viewport.data_to_screen(interpolated)
                && screen_points.last().copied() != Some(screen_point)
            {
                screen_points.push(screen_point);
            }
        }
    }

    draw_polyline(&screen_points, style, paint, display)
}

fn draw_polyline<D: DrawTarget<Color = Rgb565>>(
    screen_points: &[Point],
    style: &SeriesStyle,
    paint: &StrokePaint<'_>,
    display: &mut D,
) -> Result<(), D::Error> {
    for pair in screen_points.windows(2) {
        let mid_y = (pair[0].y + pair[1].y) / 2;
        Line::new(pair[0], pair[1])
            .into_styled(PrimitiveStyle::with_stroke(
                paint.color_at(mid_y),
                style.line_width,
            ))
            .draw(display)?;
    }

    Ok(())
}

/// Calculate a point on a cardinal (Hermite) spline segment
///
/// The segment runs from `p1` (t = 0) to `p2` (t = 1). `p0` and `p3` only
/// shape the tangents.
///
/// # Arguments
///
/// * `t` - Interpolation parameter (0.0 to 1.0)
/// * `tension` - Tangent scale (0.0 = straight, 0.5 = Catmull-Rom)
fn cardinal_point(
    p0: DataPoint,
    p1: DataPoint,
    p2: DataPoint,
    p3: DataPoint,
    t: f32,
    tension: f32,
) -> DataPoint {
    let t2 = t * t;
    let t3 = t2 * t;

    // Hermite basis
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    let s = tension.clamp(0.0, 1.0);
    let m1 = DataPoint::new(s * (p2.x - p0.x), s * (p2.y - p0.y));
    let m2 = DataPoint::new(s * (p3.x - p1.x), s * (p3.y - p1.y));

    DataPoint {
        x: h00 * p1.x + h10 * m1.x + h01 * p2.x + h11 * m2.x,
        y: h00 * p1.y + h10 * m1.y + h01 * p2.y + h11 * m2.y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: DataPoint, b: DataPoint) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn test_cardinal_passes_through_endpoints() {
        let p0 = DataPoint::new(0.0, 0.0);
        let p1 = DataPoint::new(1.0, 3.0);
        let p2 = DataPoint::new(2.0, 1.0);
        let p3 = DataPoint::new(3.0, 4.0);

        assert!(close(cardinal_point(p0, p1, p2, p3, 0.0, 0.5), p1));
        assert!(close(cardinal_point(p0, p1, p2, p3, 1.0, 0.5), p2));
    }

    #[test]
    fn test_zero_tension_is_straight() {
        let p0 = DataPoint::new(0.0, 10.0);
        let p1 = DataPoint::new(1.0, 0.0);
        let p2 = DataPoint::new(3.0, 4.0);
        let p3 = DataPoint::new(4.0, -10.0);

        let mid = cardinal_point(p0, p1, p2, p3, 0.5, 0.0);
        assert!(close(mid, DataPoint::new(2.0, 2.0)));
    }

    #[test]
    fn test_vertical_paint_clamps_rows() {
        let rows = [Rgb565::RED, Rgb565::GREEN, Rgb565::BLUE];
        let paint = StrokePaint::Vertical {
            top: 10,
            rows: &rows,
        };
        assert_eq!(paint.color_at(5), Rgb565::RED);
        assert_eq!(paint.color_at(11), Rgb565::GREEN);
        assert_eq!(paint.color_at(100), Rgb565::BLUE);
    }
}
