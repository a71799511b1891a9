//! Load lane: one-minute load average ×100 used directly as bar height.
//!
//! This is not a true percentage. Anything above a load of 1.0 saturates
//! the lane.

use crate::canvas::{Canvas, Lane};
use crate::error::Result;
use crate::palette;
use crate::source::MetricsSource;

use super::{Metric, MetricKind, Sample};

#[derive(Debug, Clone, Default)]
pub struct LoadMetric {
    height: i64,
}

impl LoadMetric {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Metric for LoadMetric {
    fn refresh(&mut self, source: &dyn MetricsSource) -> Result<Sample> {
        let load = source.load()?;
        self.height = (load.one * 100.0) as i64;
        Ok(Sample {
            kind: MetricKind::Load,
            values: vec![self.height],
            summary: format!(
                "Load: {:.2} {:.2} {:.2}",
                load.one, load.five, load.fifteen
            ),
        })
    }

    fn render(&self, canvas: &mut Canvas, lane: &Lane) {
        canvas.draw_bar(lane.newest_x(), self.height, palette::LOAD);
    }
}
