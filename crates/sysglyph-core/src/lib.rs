//! # sysglyph-core
//!
//! **A rolling system history strip, small enough to be a tray icon.**
//!
//! `sysglyph-core` samples memory, swap, load, CPU, disk and network
//! counters once per second and paints them into a fixed-size bitmap, one
//! lane per metric, scrolling left as time passes.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::atomic::AtomicBool;
//! use sysglyph_core::{Config, LogPublisher, ProcfsSource, TickDriver};
//!
//! let config = Config::default();
//! let mut driver = TickDriver::new(&config, ProcfsSource::new(), LogPublisher).unwrap();
//!
//! // One sample → scroll → render → publish cycle.
//! let report = driver.tick().unwrap();
//! println!("{}", report.tooltip());
//!
//! // Or keep going until the flag is raised.
//! let shutdown = AtomicBool::new(false);
//! driver.run(&shutdown, Some(5)).unwrap();
//! ```
//!
//! ## Architecture
//!
//! MetricsSource → Metric samplers (refresh) → Canvas (scroll) →
//! Metric renderers (render) → IconPublisher
//!
//! The canvas itself is the history: scrolling moves pixels, nothing is
//! recomputed from stored numbers. Everything runs on the thread that calls
//! [`TickDriver::run`], so no locking is involved; publishers receive an
//! immutable [`Bitmap`] snapshot.

pub mod canvas;
pub mod config;
pub mod driver;
pub mod error;
pub mod metrics;
pub mod palette;
pub mod publish;
pub mod source;
pub mod sources;

pub use canvas::{Bitmap, Canvas, Lane};
pub use config::{Config, DEFAULT_LANE_SIZE, TICK_INTERVAL};
pub use driver::{DriverState, TickDriver, TickReport};
pub use error::{Error, Result};
pub use metrics::{Metric, MetricKind, Sample};
pub use palette::Color;
pub use publish::{IconPublisher, LogPublisher, MemoryPublisher, PamFilePublisher, encode_pam};
pub use source::{
    CpuTimes, IoCounters, LoadReading, MemoryReading, MetricsSource, Readings, StaticSource,
    SwapReading,
};
pub use sources::ProcfsSource;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
