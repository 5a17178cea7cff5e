//! Station tiles laid out in a wrapping grid
//!
//! The dashboard holds one [`StationTile`] per reading, in the order the
//! readings arrive, and wraps them left to right into as many columns as
//! fit the display width. Tiles survive reloads and resizes so each keeps
//! its sparkline's gradient cache.

pub mod constants;
mod tile;

pub use tile::StationTile;

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use log::{debug, info};

use crate::clock::Clock;
use crate::config::{DashboardConfig, SparklineConfig};
use crate::sparkline::{RenderError, SparklineResult};
use crate::station::{Series, StationId, StationReading};
use crate::ui::ColorPalette;

/// What one dashboard draw did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawSummary {
    pub tiles: usize,
    pub sparklines: usize,
    pub gradient_rebuilds: usize,
}

pub struct Dashboard {
    config: DashboardConfig,
    palette: ColorPalette,
    size: Size,
    tiles: Vec<StationTile>,
    /// Background must be repainted before the next draw
    needs_clear: bool,
}

impl Dashboard {
    pub fn new(size: Size, config: DashboardConfig) -> SparklineResult<Self> {
        config.sparkline.validate()?;

        Ok(Self {
            config,
            palette: ColorPalette::default(),
            size,
            tiles: Vec::new(),
            needs_clear: true,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn tiles(&self) -> &[StationTile] {
        &self.tiles
    }

    /// Build one tile per reading, in order
    ///
    /// Tiles for stations already on the dashboard are updated in place and
    /// keep their gradient caches. Stations missing from `readings` are
    /// dropped. A station without an entry in `history` gets a readout-only
    /// tile.
    pub fn load(
        &mut self,
        readings: &[StationReading],
        history: &BTreeMap<StationId, Series>,
    ) -> SparklineResult<()> {
        let mut previous: BTreeMap<StationId, StationTile> = self
            .tiles
            .drain(..)
            .map(|tile| (tile.station().clone(), tile))
            .collect();

        let mut tiles = Vec::with_capacity(readings.len());
        for (index, reading) in readings.iter().enumerate() {
            let origin = self.tile_origin(index);
            let series = history.get(&reading.station).cloned();

            let tile = match previous.remove(&reading.station) {
                Some(mut tile) => {
                    tile.update(reading);
                    tile.set_series(series);
                    tile.set_origin(origin);
                    tile
                }
                None => StationTile::new(
                    reading,
                    series,
                    origin,
                    &self.config.sparkline,
                    self.palette,
                )?,
            };
            tiles.push(tile);
        }

        info!(
            "Loaded {} station(s) in {} column(s)",
            tiles.len(),
            self.columns()
        );
        self.tiles = tiles;
        self.needs_clear = true;
        Ok(())
    }

    /// Number of tile columns that fit the display width, at least one
    pub fn columns(&self) -> usize {
        let gap = self.config.tile_gap_px;
        let tile_width = StationTile::size_for(&self.config.sparkline).width;
        let columns = self.size.width.saturating_sub(gap) / (tile_width + gap);
        (columns as usize).max(1)
    }

    fn tile_origin(&self, index: usize) -> Point {
        let gap = self.config.tile_gap_px;
        let tile = StationTile::size_for(&self.config.sparkline);
        let columns = self.columns();
        let (row, column) = ((index / columns) as u32, (index % columns) as u32);

        Point::new(
            (gap + column * (tile.width + gap)) as i32,
            (gap + row * (tile.height + gap)) as i32,
        )
    }

    fn relayout(&mut self) {
        for index in 0..self.tiles.len() {
            let origin = self.tile_origin(index);
            self.tiles[index].set_origin(origin);
        }
        self.needs_clear = true;
    }

    /// Adapt to a new display size; canvases keep their size
    pub fn resize(&mut self, size: Size) {
        if self.size == size {
            return;
        }
        debug!("Resizing dashboard to {}x{}", size.width, size.height);
        self.size = size;
        self.relayout();
    }

    /// Switch every tile to new sparkline cosmetics
    pub fn set_sparkline_config(&mut self, config: SparklineConfig) -> SparklineResult<()> {
        config.validate()?;
        for tile in self.tiles.iter_mut() {
            tile.set_sparkline_config(config.clone())?;
        }
        self.config.sparkline = config;
        self.relayout();
        Ok(())
    }

    /// Draw every tile as of the clock's current time
    pub fn draw<D, C>(
        &mut self,
        display: &mut D,
        clock: &C,
    ) -> Result<DrawSummary, RenderError<D::Error>>
    where
        D: DrawTarget<Color = Rgb565>,
        C: Clock + ?Sized,
    {
        let now = clock.now();

        if self.needs_clear {
            display
                .clear(self.config.background.to_rgb565())
                .map_err(RenderError::Draw)?;
            self.needs_clear = false;
        }

        let mut summary = DrawSummary::default();
        for tile in self.tiles.iter_mut() {
            summary.tiles += 1;
            if let Some(frame) = tile.draw(display, now)? {
                summary.sparklines += 1;
                if frame.gradient_rebuilt {
                    summary.gradient_rebuilds += 1;
                }
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::framebuffer::FrameBuffer;
    use crate::station::Sample;
    use alloc::format;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone, Utc};
    use constants::{DEFAULT_DISPLAY_HEIGHT_PX, DEFAULT_DISPLAY_WIDTH_PX};

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 10, 18, 30, 0)
            .unwrap()
    }

    fn station(i: usize) -> StationId {
        StationId::new(&format!("station-{}", i)).unwrap()
    }

    fn readings(count: usize) -> Vec<StationReading> {
        (0..count)
            .map(|i| StationReading {
                station: station(i),
                name: Some(format!("Station {}", i)),
                temperature: 20.0 + i as f32,
                humidity: 50.0,
                time: now().with_timezone(&Utc),
            })
            .collect()
    }

    fn history(count: usize) -> BTreeMap<StationId, Series> {
        let now = now().with_timezone(&Utc);
        (0..count)
            .map(|i| {
                let series = Series::from_samples(
                    station(i),
                    vec![
                        Sample::new(now - TimeDelta::hours(6), 15.0),
                        Sample::new(now - TimeDelta::hours(2), 19.0),
                    ],
                )
                .unwrap();
                (station(i), series)
            })
            .collect()
    }

    fn display_size() -> Size {
        Size::new(DEFAULT_DISPLAY_WIDTH_PX, DEFAULT_DISPLAY_HEIGHT_PX)
    }

    fn dashboard(count: usize) -> Dashboard {
        let mut dashboard = Dashboard::new(display_size(), DashboardConfig::default()).unwrap();
        dashboard.load(&readings(count), &history(count)).unwrap();
        dashboard
    }

    #[test]
    fn test_tiles_follow_reading_order() {
        let dashboard = dashboard(4);
        let ids: Vec<&str> = dashboard.tiles().iter().map(|t| t.station().as_str()).collect();
        assert_eq!(ids, ["station-0", "station-1", "station-2", "station-3"]);
    }

    #[test]
    fn test_tiles_wrap_into_rows() {
        let dashboard = dashboard(5);
        let tile = StationTile::size_for(&SparklineConfig::default());
        let gap = DashboardConfig::default().tile_gap_px as i32;

        // 196px tiles with 8px gaps: three fit in 800px
        assert_eq!(dashboard.columns(), 3);
        assert_eq!(dashboard.tiles()[2].bounds().top_left.y, gap);
        assert_eq!(
            dashboard.tiles()[3].bounds().top_left,
            Point::new(gap, gap * 2 + tile.height as i32)
        );
    }

    #[test]
    fn test_narrow_display_keeps_one_column() {
        let mut dashboard = dashboard(2);
        dashboard.resize(Size::new(100, 480));
        assert_eq!(dashboard.columns(), 1);
        assert_eq!(dashboard.tiles()[1].bounds().top_left.x, 8);
    }

    #[test]
    fn test_each_tile_builds_its_own_gradient() {
        let mut dashboard = dashboard(3);
        let mut fb = FrameBuffer::new(display_size(), Rgb565::BLACK);
        let clock = FixedClock::new(now());

        let first = dashboard.draw(&mut fb, &clock).unwrap();
        assert_eq!(
            first,
            DrawSummary {
                tiles: 3,
                sparklines: 3,
                gradient_rebuilds: 3
            }
        );

        let second = dashboard.draw(&mut fb, &clock).unwrap();
        assert_eq!(second.gradient_rebuilds, 0);
        for tile in dashboard.tiles() {
            assert_eq!(tile.sparkline().gradient_cache().build_count(), 1);
        }
    }

    #[test]
    fn test_resize_and_reload_keep_caches() {
        let mut dashboard = dashboard(3);
        let mut fb = FrameBuffer::new(display_size(), Rgb565::BLACK);
        let clock = FixedClock::new(now());
        dashboard.draw(&mut fb, &clock).unwrap();

        dashboard.resize(Size::new(420, 480));
        assert_eq!(dashboard.columns(), 2);
        dashboard.load(&readings(3), &history(3)).unwrap();
        let summary = dashboard.draw(&mut fb, &clock).unwrap();

        assert_eq!(summary.gradient_rebuilds, 0);
    }

    #[test]
    fn test_station_without_history_gets_readout_only() {
        let mut dashboard = Dashboard::new(display_size(), DashboardConfig::default()).unwrap();
        dashboard.load(&readings(2), &history(1)).unwrap();
        let mut fb = FrameBuffer::new(display_size(), Rgb565::BLACK);

        let summary = dashboard.draw(&mut fb, &FixedClock::new(now())).unwrap();

        assert_eq!(summary.tiles, 2);
        assert_eq!(summary.sparklines, 1);
        assert!(dashboard.tiles()[1].series().is_none());
    }

    #[test]
    fn test_reload_drops_missing_stations() {
        let mut dashboard = dashboard(3);
        let mut fewer = readings(3);
        fewer.remove(1);
        dashboard.load(&fewer, &history(3)).unwrap();

        let ids: Vec<String> = dashboard
            .tiles()
            .iter()
            .map(|t| t.station().as_str().to_string())
            .collect();
        assert_eq!(ids, ["station-0", "station-2"]);
    }

    #[test]
    fn test_switching_preset_rebuilds_gradients() {
        let mut dashboard = dashboard(2);
        let mut fb = FrameBuffer::new(display_size(), Rgb565::BLACK);
        let clock = FixedClock::new(now());
        dashboard.draw(&mut fb, &clock).unwrap();

        dashboard
            .set_sparkline_config(SparklineConfig::three_stop())
            .unwrap();
        let summary = dashboard.draw(&mut fb, &clock).unwrap();

        assert_eq!(summary.gradient_rebuilds, 2);
        assert_eq!(dashboard.config().sparkline, SparklineConfig::three_stop());
    }
}
