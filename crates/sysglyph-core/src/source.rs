//! Metrics source trait and the raw readings it hands out.
//!
//! A [`MetricsSource`] is a pull-based view of the operating system's
//! counters. It keeps no history of its own: every call returns a fresh
//! point-in-time reading, and the samplers in [`crate::metrics`] do all of
//! the diffing.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Physical memory, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryReading {
    pub total: u64,
    /// Used memory including reclaimable page cache.
    pub used: u64,
    /// Used memory excluding reclaimable page cache.
    pub actual_used: u64,
}

/// Swap space, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReading {
    pub total: u64,
    pub used: u64,
}

/// Run-queue load averages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadReading {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// Cumulative CPU time counters, aggregated over all cores.
///
/// Units are scheduler ticks (`USER_HZ`, normally 100 per second per core).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub sys: u64,
    pub idle: u64,
    pub wait: u64,
    pub irq: u64,
    pub soft_irq: u64,
    pub stolen: u64,
}

impl CpuTimes {
    pub fn total(&self) -> u64 {
        self.user
            + self.nice
            + self.sys
            + self.idle
            + self.wait
            + self.irq
            + self.soft_irq
            + self.stolen
    }
}

/// Cumulative byte counters for one block device or network interface.
///
/// For disks `rx` is bytes read and `tx` bytes written; for interfaces `rx`
/// is bytes received and `tx` bytes transmitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoCounters {
    pub name: String,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

/// Supplier of raw OS readings, one pull operation per metric kind.
///
/// Errors returned here are fatal for the tick cycle. An absent device is
/// not an error: it simply does not appear in [`MetricsSource::disks`] or
/// [`MetricsSource::interfaces`].
pub trait MetricsSource {
    fn memory(&self) -> Result<MemoryReading>;

    fn swap(&self) -> Result<SwapReading>;

    fn load(&self) -> Result<LoadReading>;

    fn cpu(&self) -> Result<CpuTimes>;

    /// Block devices in the order the platform enumerates them.
    fn disks(&self) -> Result<Vec<IoCounters>>;

    /// Network interfaces in the order the platform enumerates them.
    fn interfaces(&self) -> Result<Vec<IoCounters>>;
}

impl<S: MetricsSource + ?Sized> MetricsSource for Box<S> {
    fn memory(&self) -> Result<MemoryReading> {
        (**self).memory()
    }

    fn swap(&self) -> Result<SwapReading> {
        (**self).swap()
    }

    fn load(&self) -> Result<LoadReading> {
        (**self).load()
    }

    fn cpu(&self) -> Result<CpuTimes> {
        (**self).cpu()
    }

    fn disks(&self) -> Result<Vec<IoCounters>> {
        (**self).disks()
    }

    fn interfaces(&self) -> Result<Vec<IoCounters>> {
        (**self).interfaces()
    }
}

/// Every reading at once, as served by [`StaticSource`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Readings {
    pub memory: MemoryReading,
    pub swap: SwapReading,
    pub load: LoadReading,
    pub cpu: CpuTimes,
    pub disks: Vec<IoCounters>,
    pub interfaces: Vec<IoCounters>,
}

impl Readings {
    /// Pull one reading of every kind from `source`.
    pub fn collect(source: &dyn MetricsSource) -> Result<Self> {
        Ok(Self {
            memory: source.memory()?,
            swap: source.swap()?,
            load: source.load()?,
            cpu: source.cpu()?,
            disks: source.disks()?,
            interfaces: source.interfaces()?,
        })
    }
}

/// In-memory source whose readings are set by the caller.
///
/// Cloning shares the underlying readings, so a test (or the demo feed) can
/// keep a handle and mutate what the driver will see on the next tick.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    inner: Arc<Mutex<StaticState>>,
}

#[derive(Debug, Default)]
struct StaticState {
    readings: Readings,
    failing: bool,
}

impl StaticSource {
    pub fn new(readings: Readings) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StaticState {
                readings,
                failing: false,
            })),
        }
    }

    /// Apply `f` to the readings served from now on.
    pub fn update(&self, f: impl FnOnce(&mut Readings)) {
        f(&mut self.lock().readings);
    }

    /// Make every subsequent call fail with a source error.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StaticState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn read<T>(&self, what: &'static str, f: impl FnOnce(&Readings) -> T) -> Result<T> {
        let state = self.lock();
        if state.failing {
            return Err(Error::source_failed(
                what,
                std::io::Error::other("static source set to fail"),
            ));
        }
        Ok(f(&state.readings))
    }
}

impl MetricsSource for StaticSource {
    fn memory(&self) -> Result<MemoryReading> {
        self.read("memory", |r| r.memory)
    }

    fn swap(&self) -> Result<SwapReading> {
        self.read("swap", |r| r.swap)
    }

    fn load(&self) -> Result<LoadReading> {
        self.read("load", |r| r.load)
    }

    fn cpu(&self) -> Result<CpuTimes> {
        self.read("cpu", |r| r.cpu)
    }

    fn disks(&self) -> Result<Vec<IoCounters>> {
        self.read("disks", |r| r.disks.clone())
    }

    fn interfaces(&self) -> Result<Vec<IoCounters>> {
        self.read("interfaces", |r| r.interfaces.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_total_sums_every_field() {
        let t = CpuTimes {
            user: 1,
            nice: 2,
            sys: 3,
            idle: 4,
            wait: 5,
            irq: 6,
            soft_irq: 7,
            stolen: 8,
        };
        assert_eq!(t.total(), 36);
    }

    #[test]
    fn static_source_clones_share_readings() {
        let src = StaticSource::default();
        let handle = src.clone();
        handle.update(|r| r.swap.total = 10);
        assert_eq!(src.swap().unwrap().total, 10);
    }

    #[test]
    fn static_source_can_fail() {
        let src = StaticSource::default();
        src.set_failing(true);
        assert!(matches!(src.cpu(), Err(Error::Source { what: "cpu", .. })));
        src.set_failing(false);
        assert!(src.cpu().is_ok());
    }

    #[test]
    fn collect_gathers_every_kind() {
        let src = StaticSource::default();
        src.update(|r| {
            r.load.one = 2.0;
            r.disks.push(IoCounters {
                name: "sda".into(),
                rx_bytes: 1,
                tx_bytes: 2,
            });
        });
        let r = Readings::collect(&src).unwrap();
        assert_eq!(r.load.one, 2.0);
        assert_eq!(r.disks.len(), 1);

        src.set_failing(true);
        assert!(Readings::collect(&src).is_err());
    }

    #[test]
    fn default_readings_are_zero() {
        let r = Readings::default();
        assert_eq!(r.memory, MemoryReading::default());
        assert!(r.disks.is_empty());
        assert_eq!(r.cpu.total(), 0);
    }
}
