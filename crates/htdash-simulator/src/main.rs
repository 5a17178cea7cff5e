//! Desktop simulator for the htdash weather-station dashboard.
//!
//! Renders htdash-core's dashboard in an SDL2 window via
//! `embedded-graphics-simulator`, fed by synthetic stations so tiles and
//! sparklines can be exercised without a collector.
//!
//! Usage: `htdash-simulator [config.toml]`
//!
//! # Key bindings
//!
//! | Key | Action                              |
//! |-----|-------------------------------------|
//! | C   | Toggle four-stop / three-stop chart |
//! | R   | Append a sample and redraw now      |
//! | Q   | Quit                                |

use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local, TimeDelta, Utc};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{debug, error, info, warn};

use htdash_core::clock::Clock;
use htdash_core::config::{DashboardConfig, SparklineConfig};
use htdash_core::dashboard::Dashboard;
use htdash_core::dashboard::constants::{DEFAULT_DISPLAY_HEIGHT_PX, DEFAULT_DISPLAY_WIDTH_PX};
use htdash_core::framebuffer::FrameBuffer;
use htdash_core::station::{Sample, Series, StationId, StationReading};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 1;

/// Target frame duration (~30 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// The dashboard refreshes once a minute so the sparklines creep to "now".
const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Spacing of synthetic history samples.
const HISTORY_STEP_MINUTES: i64 = 10;

/// Synthetic history reaches a little past the 24h window.
const HISTORY_HOURS: i64 = 26;

// ---------------------------------------------------------------------------
// Wall clock
// ---------------------------------------------------------------------------

/// Host clock in the host's local timezone.
struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

// ---------------------------------------------------------------------------
// Mock stations
// ---------------------------------------------------------------------------

/// A fake station: (id, name, base temperature, has history)
const MOCK_STATIONS: [(&str, Option<&str>, f64, bool); 5] = [
    ("living-room", Some("Living room"), 21.0, true),
    ("garden", Some("Garden"), 12.0, true),
    ("attic", Some("Attic"), 26.0, true),
    ("shellyht-3c6b1f", None, 18.0, true),
    ("cellar", Some("Cellar"), 9.0, false),
];

/// Generates synthetic readings and history that vary with time of day.
struct MockStationGenerator {
    series: BTreeMap<StationId, Series>,
    readings: Vec<StationReading>,
}

impl MockStationGenerator {
    fn new(now: DateTime<Utc>) -> Result<Self> {
        let mut generator = Self {
            series: BTreeMap::new(),
            readings: Vec::new(),
        };

        let start = now - TimeDelta::hours(HISTORY_HOURS);
        for (index, (id, name, base, has_history)) in MOCK_STATIONS.iter().enumerate() {
            let station =
                StationId::new(id).map_err(|e| anyhow::anyhow!("station id {id}: {e}"))?;

            if *has_history {
                let mut series = Series::new(station.clone());
                let mut timestamp = start;
                let mut step = 0usize;
                while timestamp < now {
                    // A few dropouts per station so the gaps get exercised
                    let sample = if (step + index * 7) % 41 == 0 {
                        Sample::gap(timestamp)
                    } else {
                        Sample::new(timestamp, temperature_at(*base, timestamp) as f32)
                    };
                    series
                        .push(sample)
                        .map_err(|e| anyhow::anyhow!("{id}: {e}"))?;
                    timestamp += TimeDelta::minutes(HISTORY_STEP_MINUTES);
                    step += 1;
                }
                generator.series.insert(station.clone(), series);
            }

            generator.readings.push(StationReading {
                station,
                name: name.map(str::to_owned),
                temperature: temperature_at(*base, now) as f32,
                humidity: humidity_at(*base, now) as f32,
                time: now,
            });
        }

        Ok(generator)
    }

    /// Record a new reading for every station at `now` and drop stale history.
    fn tick(&mut self, now: DateTime<Utc>) {
        let cutoff = now - TimeDelta::hours(HISTORY_HOURS);

        for (reading, (_, _, base, _)) in self.readings.iter_mut().zip(MOCK_STATIONS.iter()) {
            reading.temperature = temperature_at(*base, now) as f32;
            reading.humidity = humidity_at(*base, now) as f32;
            reading.time = now;

            if let Some(series) = self.series.get_mut(&reading.station) {
                if let Err(e) = series.push(Sample::new(now, reading.temperature)) {
                    warn!("{}: dropped sample: {}", reading.station, e);
                }
                let pruned = series.prune_before(cutoff);
                if pruned > 0 {
                    debug!("{}: pruned {} stale sample(s)", reading.station, pruned);
                }
            }
        }
    }
}

fn day_phase(at: DateTime<Utc>) -> f64 {
    let secs = at.timestamp().rem_euclid(86_400) as f64;
    secs / 86_400.0 * std::f64::consts::TAU
}

/// Base temperature with a daily swing and a faster wobble.
fn temperature_at(base: f64, at: DateTime<Utc>) -> f64 {
    let phase = day_phase(at);
    base + 4.0 * (phase - 2.0).sin() + 0.6 * (phase * 7.0).cos()
}

/// Humidity rounded to whole percent, running opposite to temperature.
fn humidity_at(base: f64, at: DateTime<Utc>) -> f64 {
    (55.0 - (base - 15.0) - 10.0 * (day_phase(at) - 2.0).sin()).clamp(5.0, 100.0).round()
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    let Some(path) = path else {
        return Ok(DashboardConfig::default());
    };

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config: DashboardConfig =
        toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    config
        .sparkline
        .validate()
        .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;

    info!("Loaded config from {}", path.display());
    Ok(config)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::init();

    let config_path = std::env::args().nth(1);
    let config = load_config(config_path.as_deref().map(Path::new))?;

    let size = Size::new(DEFAULT_DISPLAY_WIDTH_PX, DEFAULT_DISPLAY_HEIGHT_PX);
    info!("Starting htdash simulator");
    info!("Display: {}×{} (scale {}×)", size.width, size.height, WINDOW_SCALE);
    info!("Keys: C=toggle chart  R=refresh  Q=Quit");

    let clock = SystemClock;
    let mut stations = MockStationGenerator::new(clock.now().with_timezone(&Utc))?;

    let mut dashboard = Dashboard::new(size, config.clone())
        .map_err(|e| anyhow::anyhow!("dashboard config: {}", e))?;
    dashboard
        .load(&stations.readings, &stations.series)
        .map_err(|e| anyhow::anyhow!("loading stations: {}", e))?;

    let mut framebuffer = FrameBuffer::new(size, config.background.to_rgb565());
    let mut display = SimulatorDisplay::<Rgb565>::new(size);
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("htdash", &output_settings);

    let mut four_stop = true;
    let mut needs_redraw = true;
    let mut last_refresh = Instant::now();

    'running: loop {
        let frame_start = Instant::now();

        // --- Render -------------------------------------------------------
        if needs_redraw {
            match dashboard.draw(&mut framebuffer, &clock) {
                Ok(summary) => debug!("Drew {:?}", summary),
                Err(e) => error!("Draw error: {}", e),
            }
            if let Err(e) = framebuffer.flush(&mut display) {
                error!("Flush error: {:?}", e);
            }
            needs_redraw = false;
        }

        // The SDL window is created on the first update, before events()
        window.update(&display);

        // --- SDL events ---------------------------------------------------
        let mut refresh_now = false;
        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,
                SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                    Keycode::Q | Keycode::Escape => break 'running,
                    Keycode::C => {
                        four_stop = !four_stop;
                        let preset = if four_stop {
                            SparklineConfig::four_stop()
                        } else {
                            SparklineConfig::three_stop()
                        };
                        info!(
                            "Switching to {} chart",
                            if four_stop { "four-stop" } else { "three-stop" }
                        );
                        if let Err(e) = dashboard.set_sparkline_config(preset) {
                            error!("Preset rejected: {}", e);
                        }
                        needs_redraw = true;
                    }
                    Keycode::R => refresh_now = true,
                    _ => {}
                },
                _ => {}
            }
        }

        // --- Periodic refresh ---------------------------------------------
        if refresh_now || last_refresh.elapsed() >= REFRESH_INTERVAL {
            stations.tick(clock.now().with_timezone(&Utc));
            if let Err(e) = dashboard.load(&stations.readings, &stations.series) {
                error!("Reload failed: {}", e);
            }
            last_refresh = Instant::now();
            needs_redraw = true;
        }

        // --- Frame pacing -------------------------------------------------
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    info!("Simulator exiting");
    Ok(())
}
