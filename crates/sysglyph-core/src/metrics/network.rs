//! Network lane: download and upload throughput of one interface.
//!
//! Without an explicit interface name the first interface the source
//! reports is watched. The order is whatever the platform enumerates (file
//! order of `/proc/net/dev` on Linux, which often puts `lo` first) and is
//! deliberately not re-sorted.

use log::warn;

use crate::canvas::{Canvas, Lane};
use crate::error::Result;
use crate::palette;
use crate::source::{IoCounters, MetricsSource};

use super::{CounterPair, Metric, MetricKind, Sample, percent};

#[derive(Debug, Clone)]
pub struct NetworkMetric {
    interface: Option<String>,
    ceiling_kb: u64,
    counters: CounterPair,
    watching: Option<String>,
    present: Option<bool>,
    down_kb: u64,
    up_kb: u64,
    down_pct: i64,
    up_pct: i64,
}

impl NetworkMetric {
    /// Watch `interface` (or the first reported one); `ceiling_kb` per tick is 100%.
    pub fn new(interface: Option<String>, ceiling_kb: u64, suppress_first: bool) -> Self {
        Self {
            interface,
            ceiling_kb,
            counters: CounterPair::new(suppress_first),
            watching: None,
            present: None,
            down_kb: 0,
            up_kb: 0,
            down_pct: 0,
            up_pct: 0,
        }
    }

    /// `(download_kb, upload_kb)` transferred during the last tick.
    pub fn kilobytes(&self) -> (u64, u64) {
        (self.down_kb, self.up_kb)
    }

    /// Name of the interface selected on the last refresh.
    pub fn watching(&self) -> Option<&str> {
        self.watching.as_deref()
    }

    fn select<'a>(&self, interfaces: &'a [IoCounters]) -> Option<&'a IoCounters> {
        match &self.interface {
            Some(name) => interfaces.iter().find(|i| &i.name == name),
            None => interfaces.first(),
        }
    }
}

impl Metric for NetworkMetric {
    fn refresh(&mut self, source: &dyn MetricsSource) -> Result<Sample> {
        let interfaces = source.interfaces()?;
        let selected = self.select(&interfaces);

        let (rx, tx) = selected.map(|i| (i.rx_bytes, i.tx_bytes)).unwrap_or_default();
        let found = selected.is_some();
        if !found && self.present != Some(false) {
            match &self.interface {
                Some(name) => warn!("network interface {name:?} not reported; drawing zero"),
                None => warn!("no network interface reported; drawing zero"),
            }
        }
        self.present = Some(found);

        let name = selected.map(|i| i.name.as_str());
        (self.down_kb, self.up_kb) = self.counters.advance(name, rx, tx);
        self.watching = selected.map(|i| i.name.clone());
        self.down_pct = percent(self.down_kb, self.ceiling_kb);
        self.up_pct = percent(self.up_kb, self.ceiling_kb);

        let summary = match &self.watching {
            Some(name) => format!(
                "Network {name}: down {} KB/s, up {} KB/s",
                self.down_kb, self.up_kb
            ),
            None => "Network: no interface".to_string(),
        };
        Ok(Sample {
            kind: MetricKind::Network,
            values: vec![self.down_pct, self.up_pct],
            summary,
        })
    }

    fn render(&self, canvas: &mut Canvas, lane: &Lane) {
        canvas.draw_bar(lane.newest_x(), self.down_pct, palette::NET_DOWNLOAD);
        canvas.draw_bar(lane.newest_x(), self.up_pct, palette::NET_UPLOAD);
    }
}
