//! Disk lane: read and write throughput of one configured block device.

use log::warn;

use crate::canvas::{Canvas, Lane};
use crate::error::Result;
use crate::palette;
use crate::source::{IoCounters, MetricsSource};

use super::{CounterPair, Metric, MetricKind, Sample, percent};

#[derive(Debug, Clone)]
pub struct DiskMetric {
    device: String,
    ceiling_kb: u64,
    counters: CounterPair,
    present: Option<bool>,
    read_kb: u64,
    write_kb: u64,
    read_pct: i64,
    write_pct: i64,
}

impl DiskMetric {
    /// Watch the device named exactly `device`; `ceiling_kb` per tick is 100%.
    pub fn new(device: impl Into<String>, ceiling_kb: u64, suppress_first: bool) -> Self {
        Self {
            device: device.into(),
            ceiling_kb,
            counters: CounterPair::new(suppress_first),
            present: None,
            read_kb: 0,
            write_kb: 0,
            read_pct: 0,
            write_pct: 0,
        }
    }

    /// `(read_kb, write_kb)` transferred during the last tick.
    pub fn kilobytes(&self) -> (u64, u64) {
        (self.read_kb, self.write_kb)
    }

    fn select<'a>(&self, disks: &'a [IoCounters]) -> Option<&'a IoCounters> {
        disks.iter().find(|d| d.name == self.device)
    }
}

impl Metric for DiskMetric {
    fn refresh(&mut self, source: &dyn MetricsSource) -> Result<Sample> {
        let disks = source.disks()?;
        let selected = self.select(&disks).map(|d| (d.rx_bytes, d.tx_bytes));
        let found = selected.is_some();
        let (rx, tx) = selected.unwrap_or_default();
        if !found && self.present != Some(false) {
            warn!("disk device {:?} not reported; drawing zero", self.device);
        }
        self.present = Some(found);

        let device = found.then_some(self.device.as_str());
        (self.read_kb, self.write_kb) = self.counters.advance(device, rx, tx);
        self.read_pct = percent(self.read_kb, self.ceiling_kb);
        self.write_pct = percent(self.write_kb, self.ceiling_kb);

        let summary = if found {
            format!(
                "Disk {}: read {} KB/s, write {} KB/s",
                self.device, self.read_kb, self.write_kb
            )
        } else {
            format!("Disk {}: not present", self.device)
        };
        Ok(Sample {
            kind: MetricKind::Disk,
            values: vec![self.read_pct, self.write_pct],
            summary,
        })
    }

    fn render(&self, canvas: &mut Canvas, lane: &Lane) {
        canvas.draw_bar(lane.newest_x(), self.read_pct, palette::DISK_READ);
        canvas.draw_bar(lane.newest_x(), self.write_pct, palette::DISK_WRITE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Readings, StaticSource};

    fn disk(name: &str, read: u64, written: u64) -> IoCounters {
        IoCounters {
            name: name.to_string(),
            rx_bytes: read,
            tx_bytes: written,
        }
    }

    fn source(disks: Vec<IoCounters>) -> StaticSource {
        StaticSource::new(Readings {
            disks,
            ..Readings::default()
        })
    }

    #[test]
    fn picks_the_configured_device() {
        let src = source(vec![disk("loop0", 1 << 30, 0), disk("sda", 0, 0)]);
        let mut metric = DiskMetric::new("sda", 1000, false);
        metric.refresh(&src).unwrap();

        src.update(|r| r.disks[1] = disk("sda", 500 * 1024, 100 * 1024 + 1000));
        let sample = metric.refresh(&src).unwrap();
        assert_eq!(metric.kilobytes(), (500, 100));
        assert_eq!(sample.values, vec![50, 10]);
    }

    #[test]
    fn missing_device_reads_as_zero() {
        let src = source(vec![disk("nvme0n1", 4096, 4096)]);
        let mut metric = DiskMetric::new("sda", 1000, false);
        let sample = metric.refresh(&src).unwrap();
        assert_eq!(sample.values, vec![0, 0]);
        assert_eq!(sample.summary, "Disk sda: not present");

        let empty = source(Vec::new());
        assert_eq!(metric.refresh(&empty).unwrap().values, vec![0, 0]);
    }

    #[test]
    fn unchanged_counters_diff_to_zero() {
        let src = source(vec![disk("sda", 10 << 20, 5 << 20)]);
        let mut metric = DiskMetric::new("sda", 1000, false);
        metric.refresh(&src).unwrap();
        assert_eq!(metric.refresh(&src).unwrap().values, vec![0, 0]);
    }

    #[test]
    fn returning_device_starts_a_new_baseline() {
        let src = source(vec![disk("sda", 10 << 30, 0)]);
        let mut metric = DiskMetric::new("sda", 102_400, true);
        metric.refresh(&src).unwrap();

        src.update(|r| r.disks.clear());
        assert_eq!(metric.refresh(&src).unwrap().values, vec![0, 0]);

        src.update(|r| r.disks.push(disk("sda", (10 << 30) + 1024, 0)));
        let back = metric.refresh(&src).unwrap();
        assert_eq!(back.values, vec![0, 0]);
        assert_eq!(metric.kilobytes(), (0, 0));
        assert_eq!(back.summary, "Disk sda: read 0 KB/s, write 0 KB/s");

        src.update(|r| r.disks[0] = disk("sda", (10 << 30) + 1024 + 2048 * 1024, 0));
        metric.refresh(&src).unwrap();
        assert_eq!(metric.kilobytes(), (2048, 0));
    }

    #[test]
    fn bursts_above_the_ceiling_saturate() {
        let src = source(vec![disk("sda", 0, 0)]);
        let mut metric = DiskMetric::new("sda", 100, false);
        metric.refresh(&src).unwrap();
        src.update(|r| r.disks[0] = disk("sda", 300 * 1024, 0));
        assert_eq!(metric.refresh(&src).unwrap().values, vec![300, 0]);

        let mut canvas = Canvas::new(20, &[MetricKind::Disk]).unwrap();
        let lane = canvas.lanes()[0];
        metric.render(&mut canvas, &lane);
        assert!(
            canvas
                .column(lane.newest_x())
                .iter()
                .all(|&c| c == palette::DISK_READ)
        );
    }
}
