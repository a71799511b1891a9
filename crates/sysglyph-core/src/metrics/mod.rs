//! Per-kind samplers and lane renderers.
//!
//! Every metric kind is one flat struct implementing [`Metric`]: `refresh`
//! pulls a reading from the [`MetricsSource`], derives the bar values from
//! the previous and new readings and remembers the new one; `render` paints
//! those values into the newest column of the metric's lane.
//!
//! Conversions shared by all kinds:
//! - bytes become kilobytes by truncating division by 1024, before any
//!   percentage math, so sub-kilobyte amounts vanish;
//! - percentages are integer `part * 100 / whole`, zero when `whole` is zero;
//! - counter deltas saturate at zero.

pub mod cpu;
pub mod disk;
pub mod load;
pub mod memory;
pub mod network;
pub mod swap;

use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, Lane};
use crate::config::Config;
use crate::error::Result;
use crate::source::MetricsSource;

pub use cpu::CpuMetric;
pub use disk::DiskMetric;
pub use load::LoadMetric;
pub use memory::MemoryMetric;
pub use network::NetworkMetric;
pub use swap::SwapMetric;

/// The metric kinds a lane can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Memory,
    Swap,
    Load,
    Cpu,
    Disk,
    Network,
}

impl MetricKind {
    /// Every kind in the default lane order.
    pub const ALL: [MetricKind; 6] = [
        Self::Memory,
        Self::Swap,
        Self::Load,
        Self::Cpu,
        Self::Disk,
        Self::Network,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Swap => "swap",
            Self::Load => "load",
            Self::Cpu => "cpu",
            Self::Disk => "disk",
            Self::Network => "network",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Derived values of one refresh.
///
/// `values` holds one entry for single-series kinds and two for dual-series
/// kinds, in draw order. They are bar heights in percent of the lane and may
/// fall outside `0..=100`; the canvas clamps them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub kind: MetricKind,
    pub values: Vec<i64>,
    pub summary: String,
}

/// A sampler plus the renderer for its lane.
pub trait Metric: Send {
    /// Pull a new reading, derive this tick's values and keep the reading
    /// as the baseline for the next call.
    fn refresh(&mut self, source: &dyn MetricsSource) -> Result<Sample>;

    /// Draw the most recently derived values into `lane`'s newest column.
    fn render(&self, canvas: &mut Canvas, lane: &Lane);
}

/// Build the sampler for `kind` from the configuration.
pub fn build(kind: MetricKind, config: &Config) -> Box<dyn Metric> {
    match kind {
        MetricKind::Memory => Box::new(MemoryMetric::new()),
        MetricKind::Swap => Box::new(SwapMetric::new()),
        MetricKind::Load => Box::new(LoadMetric::new()),
        MetricKind::Cpu => Box::new(CpuMetric::new(config.suppress_first_tick)),
        MetricKind::Disk => Box::new(DiskMetric::new(
            config.disk_device.clone(),
            config.disk_ceiling_kb,
            config.suppress_first_tick,
        )),
        MetricKind::Network => Box::new(NetworkMetric::new(
            config.network_interface.clone(),
            config.network_ceiling_kb,
            config.suppress_first_tick,
        )),
    }
}

/// Truncating bytes → kilobytes.
pub fn to_kilo(bytes: u64) -> u64 {
    bytes / 1024
}

/// Integer percentage of `part` in `whole`; zero when `whole` is zero.
pub fn percent(part: u64, whole: u64) -> i64 {
    if whole == 0 {
        return 0;
    }
    let pct = u128::from(part) * 100 / u128::from(whole);
    i64::try_from(pct).unwrap_or(i64::MAX)
}

/// Previous value of a pair of cumulative byte counters.
///
/// Shared by the disk and network samplers. The baseline belongs to one
/// named device: when that device vanishes, or a different one takes its
/// place, the next reading starts a fresh baseline and reports zero.
#[derive(Debug, Clone, Default)]
pub(crate) struct CounterPair {
    previous: (u64, u64),
    owner: Option<String>,
    primed: bool,
    suppress_first: bool,
}

impl CounterPair {
    pub(crate) fn new(suppress_first: bool) -> Self {
        Self {
            suppress_first,
            ..Self::default()
        }
    }

    /// Record `(rx, tx)` of `device` and return the kilobyte deltas since
    /// the last call. `None` means no device was reported this tick.
    pub(crate) fn advance(&mut self, device: Option<&str>, rx: u64, tx: u64) -> (u64, u64) {
        let first = !self.primed;
        self.primed = true;

        let Some(device) = device else {
            self.owner = None;
            self.previous = (0, 0);
            return (0, 0);
        };
        let same = self.owner.as_deref() == Some(device);
        if !same {
            self.owner = Some(device.to_string());
        }
        let (old_rx, old_tx) = self.previous;
        self.previous = (rx, tx);

        if first {
            if self.suppress_first {
                return (0, 0);
            }
        } else if !same {
            return (0, 0);
        }
        (
            to_kilo(rx.saturating_sub(old_rx)),
            to_kilo(tx.saturating_sub(old_tx)),
        )
    }
}
