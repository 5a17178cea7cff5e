//! Station data model
//!
//! A station reports temperature and humidity readings. The dashboard needs
//! two views of that data: the latest reading for the tile readout
//! ([`StationReading`]) and a chronological history for the sparkline
//! ([`Series`]).

use alloc::string::String;
use alloc::vec::Vec;
use chrono::{DateTime, Utc};
use thiserror_no_std::Error;

/// Maximum accepted station id length in bytes
pub const MAX_STATION_ID_LENGTH: usize = 100;

/// Display name used when a station has never been named
pub const UNKNOWN_STATION_NAME: &str = "Unknown";

/// Error types for the station data model
#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    /// Station id is empty, too long or contains characters other than
    /// ASCII letters, digits and hyphens
    #[error("Invalid station id")]
    InvalidStationId,

    /// Sample is older than the last sample in the series
    #[error("Sample out of order at index {index}")]
    OutOfOrder {
        /// Index the sample would have been stored at
        index: usize,
    },
}

/// Result type for station data operations
pub type SeriesResult<T> = Result<T, SeriesError>;

/// Validated station identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StationId(String);

impl StationId {
    /// Validate and wrap a station id.
    ///
    /// Accepts 1 to [`MAX_STATION_ID_LENGTH`] ASCII letters, digits or
    /// hyphens, in either case.
    pub fn new(id: &str) -> SeriesResult<Self> {
        let valid = !id.is_empty()
            && id.len() <= MAX_STATION_ID_LENGTH
            && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-');

        if !valid {
            return Err(SeriesError::InvalidStationId);
        }

        Ok(Self(String::from(id)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for StationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single timestamped measurement. `None` marks a gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub value: Option<f32>,
}

impl Sample {
    pub const fn new(timestamp: DateTime<Utc>, value: f32) -> Self {
        Self {
            timestamp,
            value: Some(value),
        }
    }

    pub const fn gap(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            value: None,
        }
    }
}

/// Chronological sample history for one station
///
/// Insertion order is time order. Equal timestamps are allowed, earlier ones
/// are rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    station: StationId,
    samples: Vec<Sample>,
}

impl Series {
    /// Create an empty series
    pub fn new(station: StationId) -> Self {
        Self {
            station,
            samples: Vec::new(),
        }
    }

    /// Build a series from samples, rejecting any that go back in time
    pub fn from_samples(station: StationId, samples: Vec<Sample>) -> SeriesResult<Self> {
        if let Some(index) = samples
            .windows(2)
            .position(|pair| pair[1].timestamp < pair[0].timestamp)
        {
            return Err(SeriesError::OutOfOrder { index: index + 1 });
        }

        Ok(Self { station, samples })
    }

    /// Append a sample at the end of the series
    pub fn push(&mut self, sample: Sample) -> SeriesResult<()> {
        if let Some(last) = self.samples.last()
            && sample.timestamp < last.timestamp
        {
            return Err(SeriesError::OutOfOrder {
                index: self.samples.len(),
            });
        }

        self.samples.push(sample);
        Ok(())
    }

    pub fn station(&self) -> &StationId {
        &self.station
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Drop samples older than `cutoff`, returning how many were removed
    pub fn prune_before(&mut self, cutoff: DateTime<Utc>) -> usize {
        let stale = self.samples.partition_point(|s| s.timestamp < cutoff);
        self.samples.drain(..stale);
        stale
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Latest reading and display metadata for one station tile
#[derive(Debug, Clone, PartialEq)]
pub struct StationReading {
    pub station: StationId,
    /// Human-readable station name, `None` if the station was never named
    pub name: Option<String>,
    /// Temperature in °C
    pub temperature: f32,
    /// Relative humidity in %
    pub humidity: f32,
    /// Time the reading was taken
    pub time: DateTime<Utc>,
}

impl StationReading {
    /// Name to display on the tile
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_STATION_NAME)
    }
}
