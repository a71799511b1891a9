//! Swap lane.

use crate::canvas::{Canvas, Lane};
use crate::error::Result;
use crate::palette;
use crate::source::MetricsSource;

use super::{Metric, MetricKind, Sample, percent, to_kilo};

#[derive(Debug, Clone, Default)]
pub struct SwapMetric {
    used_pct: i64,
}

impl SwapMetric {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Metric for SwapMetric {
    fn refresh(&mut self, source: &dyn MetricsSource) -> Result<Sample> {
        let reading = source.swap()?;
        self.used_pct = percent(to_kilo(reading.used), to_kilo(reading.total));

        let summary = if reading.total == 0 {
            "Swap: none configured".to_string()
        } else {
            format!(
                "Swap: {}% used of {} MB",
                self.used_pct,
                to_kilo(reading.total) / 1024
            )
        };
        Ok(Sample {
            kind: MetricKind::Swap,
            values: vec![self.used_pct],
            summary,
        })
    }

    fn render(&self, canvas: &mut Canvas, lane: &Lane) {
        canvas.draw_bar(lane.newest_x(), self.used_pct, palette::SWAP);
    }
}
