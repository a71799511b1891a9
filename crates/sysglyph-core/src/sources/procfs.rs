//! ProcfsSource: Linux `/proc` counters.
//!
//! Memory and swap come from `meminfo`, CPU ticks from the aggregate `cpu`
//! line of `stat`, block device traffic from `diskstats` and interface
//! traffic from `net/dev`. Load averages go through `getloadavg(3)`.
//!
//! All parsing is done by the `parse_*` functions over plain text so it can
//! be exercised without a live `/proc`.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::source::{CpuTimes, IoCounters, LoadReading, MemoryReading, MetricsSource, SwapReading};

/// Default mount point of procfs.
pub const PROC_ROOT: &str = "/proc";

/// `/proc/diskstats` always counts in 512-byte sectors, whatever the device.
const SECTOR_SIZE: u64 = 512;

/// Metrics source backed by a procfs tree.
#[derive(Debug, Clone)]
pub struct ProcfsSource {
    root: PathBuf,
}

impl ProcfsSource {
    pub fn new() -> Self {
        Self::with_root(PROC_ROOT)
    }

    /// Read from an alternate procfs root (a fixture directory in tests).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, what: &'static str) -> Result<String> {
        std::fs::read_to_string(self.root.join(what)).map_err(|e| Error::source_failed(what, e))
    }

    fn meminfo(&self) -> Result<MemInfo> {
        parse_meminfo(&self.read("meminfo")?)
    }
}

impl Default for ProcfsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSource for ProcfsSource {
    fn memory(&self) -> Result<MemoryReading> {
        Ok(self.meminfo()?.memory())
    }

    fn swap(&self) -> Result<SwapReading> {
        Ok(self.meminfo()?.swap())
    }

    fn load(&self) -> Result<LoadReading> {
        system_loadavg()
    }

    fn cpu(&self) -> Result<CpuTimes> {
        parse_stat_cpu(&self.read("stat")?)
    }

    fn disks(&self) -> Result<Vec<IoCounters>> {
        parse_diskstats(&self.read("diskstats")?)
    }

    fn interfaces(&self) -> Result<Vec<IoCounters>> {
        parse_net_dev(&self.read("net/dev")?)
    }
}

#[cfg(unix)]
fn system_loadavg() -> Result<LoadReading> {
    let mut values = [0.0_f64; 3];
    // SAFETY: `getloadavg` writes up to `n` doubles to a valid buffer.
    let n = unsafe { libc::getloadavg(values.as_mut_ptr(), 3) };
    if n <= 0 {
        return Err(Error::source_failed(
            "loadavg",
            std::io::Error::other("getloadavg returned no samples"),
        ));
    }
    Ok(LoadReading {
        one: values[0],
        five: if n > 1 { values[1] } else { 0.0 },
        fifteen: if n > 2 { values[2] } else { 0.0 },
    })
}

#[cfg(not(unix))]
fn system_loadavg() -> Result<LoadReading> {
    Err(Error::source_failed(
        "loadavg",
        std::io::Error::from(std::io::ErrorKind::Unsupported),
    ))
}

/// The `meminfo` fields we care about, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemInfo {
    pub total: u64,
    pub free: u64,
    pub available: Option<u64>,
    pub buffers: u64,
    pub cached: u64,
    pub swap_total: u64,
    pub swap_free: u64,
}

impl MemInfo {
    pub fn memory(&self) -> MemoryReading {
        // Kernels before 3.14 have no MemAvailable.
        let reclaimable_free = self
            .available
            .unwrap_or(self.free + self.buffers + self.cached);
        MemoryReading {
            total: self.total,
            used: self.total.saturating_sub(self.free),
            actual_used: self.total.saturating_sub(reclaimable_free),
        }
    }

    pub fn swap(&self) -> SwapReading {
        SwapReading {
            total: self.swap_total,
            used: self.swap_total.saturating_sub(self.swap_free),
        }
    }
}

/// Parse `/proc/meminfo`. Values are reported in kB.
pub fn parse_meminfo(text: &str) -> Result<MemInfo> {
    let mut info = MemInfo::default();
    let mut saw_total = false;

    for line in text.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let Some(kb) = rest
            .split_whitespace()
            .next()
            .and_then(|v| v.parse::<u64>().ok())
        else {
            continue;
        };
        let bytes = kb * 1024;
        match key.trim() {
            "MemTotal" => {
                info.total = bytes;
                saw_total = true;
            }
            "MemFree" => info.free = bytes,
            "MemAvailable" => info.available = Some(bytes),
            "Buffers" => info.buffers = bytes,
            "Cached" => info.cached = bytes,
            "SwapTotal" => info.swap_total = bytes,
            "SwapFree" => info.swap_free = bytes,
            _ => {}
        }
    }

    if !saw_total {
        return Err(Error::parse("meminfo", "no MemTotal line"));
    }
    Ok(info)
}

/// Parse the aggregate `cpu` line of `/proc/stat`.
///
/// Older kernels omit the trailing columns; missing ones read as zero.
pub fn parse_stat_cpu(text: &str) -> Result<CpuTimes> {
    let line = text
        .lines()
        .find(|l| l.split_whitespace().next() == Some("cpu"))
        .ok_or_else(|| Error::parse("stat", "no aggregate cpu line"))?;

    let mut fields = [0u64; 8];
    let mut seen = 0;
    for (slot, raw) in fields.iter_mut().zip(line.split_whitespace().skip(1)) {
        *slot = raw
            .parse()
            .map_err(|_| Error::parse("stat", format!("bad cpu field {raw:?}")))?;
        seen += 1;
    }
    if seen < 4 {
        return Err(Error::parse("stat", "cpu line has fewer than 4 fields"));
    }

    let [user, nice, sys, idle, wait, irq, soft_irq, stolen] = fields;
    Ok(CpuTimes {
        user,
        nice,
        sys,
        idle,
        wait,
        irq,
        soft_irq,
        stolen,
    })
}

/// Parse `/proc/diskstats` into per-device byte counters, in file order.
pub fn parse_diskstats(text: &str) -> Result<Vec<IoCounters>> {
    let mut out = Vec::new();
    for line in text.lines() {
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.is_empty() {
            continue;
        }
        // major minor name reads merged sectors_read ms writes merged sectors_written ...
        if cols.len() < 10 {
            return Err(Error::parse("diskstats", format!("short line {line:?}")));
        }
        let sectors = |idx: usize| -> Result<u64> {
            cols[idx]
                .parse::<u64>()
                .map_err(|_| Error::parse("diskstats", format!("bad sector count {:?}", cols[idx])))
        };
        out.push(IoCounters {
            name: cols[2].to_string(),
            rx_bytes: sectors(5)? * SECTOR_SIZE,
            tx_bytes: sectors(9)? * SECTOR_SIZE,
        });
    }
    Ok(out)
}

/// Parse `/proc/net/dev` into per-interface byte counters, in file order.
pub fn parse_net_dev(text: &str) -> Result<Vec<IoCounters>> {
    let mut out = Vec::new();
    // The two header lines carry no colon.
    for line in text.lines() {
        let Some((name, rest)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let cols: Vec<&str> = rest.split_whitespace().collect();
        if cols.len() < 9 {
            return Err(Error::parse("net/dev", format!("short line for {name}")));
        }
        let counter = |idx: usize| -> Result<u64> {
            cols[idx]
                .parse::<u64>()
                .map_err(|_| Error::parse("net/dev", format!("bad counter {:?}", cols[idx])))
        };
        out.push(IoCounters {
            name: name.to_string(),
            rx_bytes: counter(0)?,
            tx_bytes: counter(8)?,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEMINFO: &str = "\
MemTotal:        4096 kB
MemFree:         2048 kB
MemAvailable:    3072 kB
Buffers:          256 kB
Cached:           512 kB
SwapCached:         0 kB
SwapTotal:       1024 kB
SwapFree:         768 kB
";

    const STAT: &str = "\
cpu  100 5 40 900 3 1 2 0 0 0
cpu0 50 2 20 450 1 0 1 0 0 0
intr 12345
";

    const DISKSTATS: &str = "\
   7       0 loop0 10 0 20 0 0 0 0 0 0 0 0 0 0 0 0 0 0
   8       0 sda 100 5 2048 30 50 2 4096 20 0 40 50 0 0 0 0 0 0
";

    const NET_DEV: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo:    1000      10    0    0    0     0          0         0     1000      10    0    0    0     0       0          0
  eth0:  204800     150    0    0    0     0          0         0   102400     120    0    0    0     0       0          0
";

    #[test]
    fn meminfo_memory_and_swap() {
        let info = parse_meminfo(MEMINFO).unwrap();
        let mem = info.memory();
        assert_eq!(mem.total, 4096 * 1024);
        assert_eq!(mem.used, 2048 * 1024);
        assert_eq!(mem.actual_used, 1024 * 1024);

        let swap = info.swap();
        assert_eq!(swap.total, 1024 * 1024);
        assert_eq!(swap.used, 256 * 1024);
    }

    #[test]
    fn meminfo_without_available_falls_back_to_cache_sum() {
        let text = MEMINFO.replace("MemAvailable:    3072 kB\n", "");
        let mem = parse_meminfo(&text).unwrap().memory();
        // free + buffers + cached = 2816 kB
        assert_eq!(mem.actual_used, (4096 - 2816) * 1024);
    }

    #[test]
    fn meminfo_requires_total() {
        assert!(matches!(
            parse_meminfo("MemFree: 1 kB\n"),
            Err(Error::Parse { what: "meminfo", .. })
        ));
    }

    #[test]
    fn stat_reads_aggregate_line() {
        let cpu = parse_stat_cpu(STAT).unwrap();
        assert_eq!(cpu.user, 100);
        assert_eq!(cpu.sys, 40);
        assert_eq!(cpu.idle, 900);
        assert_eq!(cpu.total(), 1051);
    }

    #[test]
    fn stat_short_line_pads_with_zero() {
        let cpu = parse_stat_cpu("cpu 1 2 3 4\n").unwrap();
        assert_eq!(cpu.idle, 4);
        assert_eq!(cpu.stolen, 0);
    }

    #[test]
    fn stat_without_cpu_line_is_parse_error() {
        assert!(parse_stat_cpu("intr 1\n").is_err());
    }

    #[test]
    fn diskstats_converts_sectors_to_bytes() {
        let disks = parse_diskstats(DISKSTATS).unwrap();
        assert_eq!(disks.len(), 2);
        assert_eq!(disks[1].name, "sda");
        assert_eq!(disks[1].rx_bytes, 2048 * 512);
        assert_eq!(disks[1].tx_bytes, 4096 * 512);
    }

    #[test]
    fn net_dev_keeps_file_order() {
        let ifaces = parse_net_dev(NET_DEV).unwrap();
        let names: Vec<&str> = ifaces.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["lo", "eth0"]);
        assert_eq!(ifaces[1].rx_bytes, 204800);
        assert_eq!(ifaces[1].tx_bytes, 102400);
    }

    #[test]
    fn fixture_root_is_read() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("meminfo"), MEMINFO).unwrap();
        std::fs::write(dir.path().join("stat"), STAT).unwrap();
        let src = ProcfsSource::with_root(dir.path());
        assert_eq!(src.memory().unwrap().used, 2048 * 1024);
        assert_eq!(src.cpu().unwrap().user, 100);
        // No diskstats in the fixture: reading the file itself fails.
        assert!(matches!(
            src.disks(),
            Err(Error::Source {
                what: "diskstats",
                ..
            })
        ));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn live_proc_is_readable() {
        let src = ProcfsSource::new();
        let mem = src.memory().unwrap();
        assert!(mem.total > 0);
        assert!(src.cpu().unwrap().total() > 0);
        assert!(src.load().is_ok());
    }
}
