//! Axis configuration and label rendering
//!
//! The time axis is driven by precomputed ticks; the graph does not know
//! what wall-clock time an x offset corresponds to. The value axis formats
//! evenly spaced numeric labels.

use alloc::vec::Vec;
use embedded_graphics::mono_font::{MonoTextStyle, ascii::FONT_5X8};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Text};
use heapless::String;

use super::constants::{MAX_AXIS_LABEL_LENGTH, TIME_LABEL_OFFSET_PX, VALUE_LABEL_OFFSET_PX};
use super::viewport::Viewport;

/// A grid line position on the time axis and its label
#[derive(Debug, Clone, PartialEq)]
pub struct TimeTick {
    /// Data-space x offset of the tick
    pub x: f32,
    pub label: String<MAX_AXIS_LABEL_LENGTH>,
}

/// Time axis with grid lines and labels at fixed ticks
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    pub ticks: Vec<TimeTick>,
    pub grid_color: Rgb565,
    pub label_color: Rgb565,
    pub grid_width: u32,
}

/// Value axis configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YAxisConfig {
    /// Number of labels, spread evenly from bottom to top
    pub label_count: usize,
    /// Number of decimal places (0 to 2)
    pub precision: usize,
    /// Unit suffix (e.g., "C", "%"), ASCII only
    pub unit: &'static str,
    pub label_color: Rgb565,
}

/// Draw time labels centred under their ticks
pub(super) fn draw_time_labels<D: DrawTarget<Color = Rgb565>>(
    axis: &TimeAxis,
    viewport: &Viewport,
    display: &mut D,
) -> Result<(), D::Error> {
    let plot_area = viewport.plot_area();
    let bounds = viewport.data_bounds();
    let label_y = plot_area.top_left.y + plot_area.size.height as i32 + TIME_LABEL_OFFSET_PX;
    let style = MonoTextStyle::new(&FONT_5X8, axis.label_color);

    for tick in axis.ticks.iter() {
        if tick.x < bounds.x_min || tick.x > bounds.x_max {
            continue;
        }
        if let Some(label_x) = viewport.x_to_screen(tick.x) {
            Text::with_alignment(
                tick.label.as_str(),
                Point::new(label_x, label_y),
                style,
                Alignment::Center,
            )
            .draw(display)?;
        }
    }

    Ok(())
}

/// Draw value labels along the left side of the plot area
pub(super) fn draw_y_axis_labels<D: DrawTarget<Color = Rgb565>>(
    config: &YAxisConfig,
    viewport: &Viewport,
    display: &mut D,
) -> Result<(), D::Error> {
    if config.label_count == 0 {
        return Ok(());
    }

    let plot_area = viewport.plot_area();
    let data_bounds = viewport.data_bounds();
    let style = MonoTextStyle::new(&FONT_5X8, config.label_color);
    let label_x = plot_area.top_left.x + VALUE_LABEL_OFFSET_PX;

    for i in 0..config.label_count {
        let t = if config.label_count > 1 {
            i as f32 / (config.label_count - 1) as f32
        } else {
            0.5
        };

        // Labels run top (max) to bottom (min)
        let value = data_bounds.y_max - data_bounds.y_range() * t;
        let label_y = plot_area.top_left.y + (plot_area.size.height as f32 * t) as i32;

        let label = format_value(value, config.precision, config.unit);
        Text::with_alignment(
            label.as_str(),
            Point::new(label_x, label_y + 3),
            style,
            Alignment::Left,
        )
        .draw(display)?;
    }

    Ok(())
}

/// Format a value with fixed precision into a heapless string
pub(super) fn format_value(
    value: f32,
    precision: usize,
    unit: &str,
) -> String<MAX_AXIS_LABEL_LENGTH> {
    let mut s = String::new();
    let _ = match precision {
        0 => core::fmt::write(&mut s, format_args!("{:.0}{}", value, unit)),
        2 => core::fmt::write(&mut s, format_args!("{:.2}{}", value, unit)),
        _ => core::fmt::write(&mut s, format_args!("{:.1}{}", value, unit)),
    };
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value_precision() {
        assert_eq!(format_value(21.46, 0, "").as_str(), "21");
        assert_eq!(format_value(21.46, 1, "%").as_str(), "21.5%");
        assert_eq!(format_value(21.456, 2, "").as_str(), "21.46");
    }
}
