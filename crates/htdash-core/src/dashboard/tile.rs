//! One station's tile: readout on top, sparkline below

use alloc::format;
use chrono::{DateTime, FixedOffset, Utc};
use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::Alignment;
use log::warn;

use super::constants::{
    CLOCK_LABEL_WIDTH_PX, TILE_BORDER_WIDTH_PX, TILE_LINE_GAP_PX, TILE_PADDING_PX,
};
use crate::clock::format_clock_label;
use crate::config::SparklineConfig;
use crate::sparkline::{RenderError, SparklineFrame, SparklineRenderer, SparklineResult};
use crate::station::{Series, StationId, StationReading};
use crate::ui::{ColorPalette, Drawable, Style, TextComponent, TextSize};

/// Station tile with its own sparkline renderer and gradient cache
pub struct StationTile {
    station: StationId,
    bounds: Rectangle,
    reading_time: DateTime<Utc>,
    name: TextComponent,
    clock: TextComponent,
    temperature: TextComponent,
    humidity: TextComponent,
    series: Option<Series>,
    sparkline: SparklineRenderer,
    palette: ColorPalette,
}

impl StationTile {
    pub fn new(
        reading: &StationReading,
        series: Option<Series>,
        origin: Point,
        config: &SparklineConfig,
        palette: ColorPalette,
    ) -> SparklineResult<Self> {
        let layout = TileLayout::new(origin, config);
        let text_style = |color| Style::new().with_foreground(color);

        let mut tile = Self {
            station: reading.station.clone(),
            bounds: layout.bounds,
            reading_time: reading.time,
            name: TextComponent::new(layout.name, "", TextSize::Medium)
                .with_style(text_style(palette.text_primary)),
            clock: TextComponent::new(layout.clock, "", TextSize::Medium)
                .with_alignment(Alignment::Right)
                .with_style(text_style(palette.text_secondary)),
            temperature: TextComponent::new(layout.temperature, "", TextSize::Large)
                .with_style(text_style(palette.temperature)),
            humidity: TextComponent::new(layout.humidity, "", TextSize::Large)
                .with_alignment(Alignment::Right)
                .with_style(text_style(palette.humidity)),
            series: None,
            sparkline: SparklineRenderer::new(layout.canvas, config.clone())?,
            palette,
        };

        tile.update(reading);
        tile.set_series(series);
        Ok(tile)
    }

    /// Outer size of a tile for a given canvas size
    pub fn size_for(config: &SparklineConfig) -> Size {
        TileLayout::new(Point::zero(), config).bounds.size
    }

    pub fn station(&self) -> &StationId {
        &self.station
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn sparkline(&self) -> &SparklineRenderer {
        &self.sparkline
    }

    pub fn series(&self) -> Option<&Series> {
        self.series.as_ref()
    }

    /// Text currently shown as (name, temperature, humidity)
    pub fn readout(&self) -> (&str, &str, &str) {
        (self.name.text(), self.temperature.text(), self.humidity.text())
    }

    pub fn clock_label(&self) -> &str {
        self.clock.text()
    }

    /// Replace the readout with a newer reading
    pub fn update(&mut self, reading: &StationReading) {
        self.reading_time = reading.time;
        self.name.set_text(reading.display_name());
        self.temperature
            .set_text(&format!("{:.1}°C", reading.temperature));
        self.humidity.set_text(&format!("{}%", reading.humidity));
    }

    /// Replace the sparkline history
    pub fn set_series(&mut self, series: Option<Series>) {
        if series.as_ref().is_none_or(Series::is_empty) {
            warn!("{}: no history, drawing readout only", self.station);
        }
        self.series = series;
    }

    /// Move the tile; the sparkline keeps its size and so its gradient
    pub fn set_origin(&mut self, origin: Point) {
        let layout = TileLayout::new(origin, self.sparkline.config());
        self.bounds = layout.bounds;
        self.name.set_bounds(layout.name);
        self.clock.set_bounds(layout.clock);
        self.temperature.set_bounds(layout.temperature);
        self.humidity.set_bounds(layout.humidity);
        self.sparkline.set_origin(layout.canvas);
    }

    /// Swap sparkline cosmetics, relaying out if the canvas size changed
    pub fn set_sparkline_config(&mut self, config: SparklineConfig) -> SparklineResult<()> {
        self.sparkline.set_config(config)?;
        self.set_origin(self.bounds.top_left);
        Ok(())
    }

    /// Draw the readout, then the sparkline if there is history
    ///
    /// The clock label shows the reading time in `now`'s timezone. Returns
    /// the sparkline frame, or `None` for a tile without history.
    pub fn draw<D>(
        &mut self,
        display: &mut D,
        now: DateTime<FixedOffset>,
    ) -> Result<Option<SparklineFrame>, RenderError<D::Error>>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let local_time = self.reading_time.with_timezone(now.offset());
        self.clock.set_text(&format_clock_label(&local_time));

        self.bounds
            .into_styled(
                Style::new()
                    .with_background(self.palette.surface)
                    .with_border(self.palette.border, TILE_BORDER_WIDTH_PX)
                    .to_primitive_style(),
            )
            .draw(display)
            .map_err(RenderError::Draw)?;

        for text in [
            &mut self.name,
            &mut self.clock,
            &mut self.temperature,
            &mut self.humidity,
        ] {
            text.draw(display).map_err(RenderError::Draw)?;
            text.mark_clean();
        }

        match self.series {
            Some(ref series) if !series.is_empty() => {
                let frame = self.sparkline.render_at(series, display, now)?;
                Ok(Some(frame))
            }
            _ => Ok(None),
        }
    }
}

/// Absolute rectangles of a tile's parts
struct TileLayout {
    bounds: Rectangle,
    name: Rectangle,
    clock: Rectangle,
    temperature: Rectangle,
    humidity: Rectangle,
    canvas: Point,
}

impl TileLayout {
    fn new(origin: Point, config: &SparklineConfig) -> Self {
        let canvas = config.canvas_size.to_size();
        let pad = TILE_PADDING_PX;
        let name_height = TextSize::Medium.height();
        let readout_height = TextSize::Large.height();
        let half = canvas.width / 2;

        let content = origin + Point::new(pad as i32, pad as i32);
        let readout_y = name_height + TILE_LINE_GAP_PX;
        let canvas_y = readout_y + readout_height + TILE_LINE_GAP_PX;

        let at = |x: u32, y: u32| content + Point::new(x as i32, y as i32);
        let name_width = canvas.width.saturating_sub(CLOCK_LABEL_WIDTH_PX);

        Self {
            bounds: Rectangle::new(
                origin,
                Size::new(canvas.width + 2 * pad, canvas_y + canvas.height + 2 * pad),
            ),
            name: Rectangle::new(at(0, 0), Size::new(name_width, name_height)),
            clock: Rectangle::new(
                at(name_width, 0),
                Size::new(canvas.width - name_width, name_height),
            ),
            temperature: Rectangle::new(at(0, readout_y), Size::new(half, readout_height)),
            humidity: Rectangle::new(
                at(half, readout_y),
                Size::new(canvas.width - half, readout_height),
            ),
            canvas: at(0, canvas_y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;
    use crate::station::Sample;
    use alloc::string::ToString;
    use alloc::vec;
    use chrono::{TimeDelta, TimeZone};

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 1, 10, 0, 0)
            .unwrap()
    }

    fn reading(name: Option<&str>) -> StationReading {
        StationReading {
            station: StationId::new("porch").unwrap(),
            name: name.map(|n| n.to_string()),
            temperature: 21.34,
            humidity: 55.0,
            // 09:05 at +01:00
            time: Utc.with_ymd_and_hms(2024, 6, 1, 8, 5, 0).unwrap(),
        }
    }

    fn history() -> Series {
        let now = now().with_timezone(&Utc);
        Series::from_samples(
            StationId::new("porch").unwrap(),
            vec![
                Sample::new(now - TimeDelta::hours(5), 17.0),
                Sample::new(now - TimeDelta::hours(3), 20.0),
                Sample::new(now - TimeDelta::hours(1), 21.3),
            ],
        )
        .unwrap()
    }

    fn tile(series: Option<Series>) -> StationTile {
        StationTile::new(
            &reading(Some("Porch")),
            series,
            Point::new(8, 8),
            &SparklineConfig::default(),
            ColorPalette::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_readout_text() {
        let tile = tile(None);
        assert_eq!(tile.readout(), ("Porch", "21.3°C", "55%"));
    }

    #[test]
    fn test_unnamed_station_shows_unknown() {
        let tile = StationTile::new(
            &reading(None),
            None,
            Point::zero(),
            &SparklineConfig::default(),
            ColorPalette::default(),
        )
        .unwrap();
        assert_eq!(tile.readout().0, "Unknown");
    }

    #[test]
    fn test_clock_label_in_local_time() {
        let mut tile = tile(Some(history()));
        let mut fb = FrameBuffer::new(Size::new(220, 200), Rgb565::BLACK);
        tile.draw(&mut fb, now()).unwrap();
        assert_eq!(tile.clock_label(), "9:05");
    }

    #[test]
    fn test_tile_size_wraps_canvas() {
        let size = StationTile::size_for(&SparklineConfig::default());
        assert_eq!(size.width, 180 + 2 * TILE_PADDING_PX);
        assert!(size.height > 120 + 2 * TILE_PADDING_PX);
    }

    #[test]
    fn test_tile_without_history_draws_readout_only() {
        let mut tile = tile(None);
        let mut fb = FrameBuffer::new(Size::new(220, 200), Rgb565::BLACK);

        let frame = tile.draw(&mut fb, now()).unwrap();

        assert!(frame.is_none());
        assert_eq!(tile.sparkline().gradient_cache().build_count(), 0);
        assert_eq!(fb.dirty_area(), Some(tile.bounds()));
    }

    #[test]
    fn test_tile_draws_sparkline_inside_its_bounds() {
        let mut tile = tile(Some(history()));
        let mut fb = FrameBuffer::new(Size::new(220, 200), Rgb565::BLACK);

        let frame = tile.draw(&mut fb, now()).unwrap().unwrap();

        assert_eq!(frame.runs_drawn, 1);
        assert!(tile.bounds().contains(frame.plot_area.top_left));
        assert_eq!(fb.dirty_area(), Some(tile.bounds()));
    }

    #[test]
    fn test_moving_tile_keeps_gradient() {
        let mut tile = tile(Some(history()));
        let mut fb = FrameBuffer::new(Size::new(420, 200), Rgb565::BLACK);

        tile.draw(&mut fb, now()).unwrap();
        tile.set_origin(Point::new(210, 8));
        tile.draw(&mut fb, now()).unwrap();

        assert_eq!(tile.sparkline().gradient_cache().build_count(), 1);
        assert_eq!(tile.sparkline().bounds().top_left.x, 210 + TILE_PADDING_PX as i32);
    }
}
