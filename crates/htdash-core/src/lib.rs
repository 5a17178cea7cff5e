//! Hardware-independent core library for htdash
//!
//! This crate contains the platform-agnostic parts of the weather-station
//! dashboard: the station data model, the sparkline renderer with its
//! per-canvas gradient cache, the charting engine it drives, and the tile
//! layout that puts one sparkline under each station's readout.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets and desktop hosts (for the simulator and tests).

#![no_std]

extern crate alloc;

pub mod clock;
pub mod config;
pub mod dashboard;
pub mod framebuffer;
pub mod graph;
pub mod sparkline;
pub mod station;
pub mod ui;
