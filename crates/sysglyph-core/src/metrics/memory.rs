//! Memory lane: used memory with and without page cache.

use crate::canvas::{Canvas, Lane};
use crate::error::Result;
use crate::palette;
use crate::source::MetricsSource;

use super::{Metric, MetricKind, Sample, percent, to_kilo};

/// Two ratios of a single reading; nothing is diffed.
#[derive(Debug, Clone, Default)]
pub struct MemoryMetric {
    used_pct: i64,
    actual_pct: i64,
}

impl MemoryMetric {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(used_pct, actual_pct)` of the last refresh.
    pub fn values(&self) -> (i64, i64) {
        (self.used_pct, self.actual_pct)
    }
}

impl Metric for MemoryMetric {
    fn refresh(&mut self, source: &dyn MetricsSource) -> Result<Sample> {
        let reading = source.memory()?;
        let total = to_kilo(reading.total);
        self.used_pct = percent(to_kilo(reading.used), total);
        self.actual_pct = percent(to_kilo(reading.actual_used), total);

        Ok(Sample {
            kind: MetricKind::Memory,
            values: vec![self.used_pct, self.actual_pct],
            summary: format!(
                "Memory: {}% used ({}% without cache) of {} MB",
                self.used_pct,
                self.actual_pct,
                total / 1024
            ),
        })
    }

    fn render(&self, canvas: &mut Canvas, lane: &Lane) {
        // Cache-inclusive bar first; the actual-used bar covers its lower part.
        canvas.draw_bar(lane.newest_x(), self.used_pct, palette::MEMORY_TOTAL);
        canvas.draw_bar(lane.newest_x(), self.actual_pct, palette::MEMORY_ACTUAL);
    }
}
