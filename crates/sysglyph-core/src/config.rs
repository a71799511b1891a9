//! Strip configuration.
//!
//! Loaded from JSON; every field has a default so a partial (or empty)
//! object is a valid configuration. The tick interval is fixed at
//! [`TICK_INTERVAL`] and is not configurable.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::metrics::MetricKind;

/// One sample/scroll/render/publish cycle per second.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Default lane edge in pixels.
pub const DEFAULT_LANE_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Lane width and canvas height in pixels.
    pub lane_size: usize,
    /// Lanes from left to right.
    pub lanes: Vec<MetricKind>,
    /// Exact block device name for the disk lane.
    pub disk_device: String,
    /// Kilobytes per tick drawn as a full disk bar.
    pub disk_ceiling_kb: u64,
    /// Exact interface name; `None` watches the first reported interface.
    pub network_interface: Option<String>,
    /// Kilobytes per tick drawn as a full network bar.
    pub network_ceiling_kb: u64,
    /// Treat the first CPU/disk/network reading as a baseline and draw nothing.
    pub suppress_first_tick: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lane_size: DEFAULT_LANE_SIZE,
            lanes: MetricKind::ALL.to_vec(),
            disk_device: "sda".to_string(),
            disk_ceiling_kb: 100 * 1024,
            network_interface: None,
            network_ceiling_kb: 12_800,
            suppress_first_tick: false,
        }
    }
}

impl Config {
    /// Read and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(Error::ConfigIo)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.lane_size == 0 {
            return Err(Error::Config("lane_size must be at least 1".into()));
        }
        if self.lanes.is_empty() {
            return Err(Error::Config("lanes must name at least one metric".into()));
        }
        let mut seen = HashSet::new();
        for kind in &self.lanes {
            if !seen.insert(kind) {
                return Err(Error::Config(format!("lane {kind} listed twice")));
            }
        }
        if self.disk_ceiling_kb == 0 {
            return Err(Error::Config("disk_ceiling_kb must be positive".into()));
        }
        if self.network_ceiling_kb == 0 {
            return Err(Error::Config("network_ceiling_kb must be positive".into()));
        }
        Ok(())
    }

    /// Canvas width implied by this configuration.
    pub fn canvas_width(&self) -> usize {
        self.lane_size * self.lanes.len()
    }
}
