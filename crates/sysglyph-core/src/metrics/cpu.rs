//! CPU lane: user and system tick deltas.
//!
//! The counters are cumulative scheduler ticks. At `USER_HZ = 100` and one
//! tick per second, a single fully-busy core advances by 100 per interval,
//! so the raw deltas are used as bar heights directly. On multi-core
//! machines they can exceed 100 and saturate the lane.
//!
//! The very first refresh diffs against an all-zero baseline and therefore
//! reports the full cumulative counters, unless first-tick suppression is on.

use crate::canvas::{Canvas, Lane};
use crate::error::Result;
use crate::palette;
use crate::source::{CpuTimes, MetricsSource};

use super::{Metric, MetricKind, Sample, percent};

#[derive(Debug, Clone, Default)]
pub struct CpuMetric {
    previous: CpuTimes,
    primed: bool,
    suppress_first: bool,
    diff_user: i64,
    diff_system: i64,
    diff_total: u64,
}

impl CpuMetric {
    pub fn new(suppress_first: bool) -> Self {
        Self {
            suppress_first,
            ..Self::default()
        }
    }

    /// `(diff_user, diff_system)` of the last refresh.
    pub fn values(&self) -> (i64, i64) {
        (self.diff_user, self.diff_system)
    }
}

fn tick_delta(new: u64, old: u64) -> i64 {
    i64::try_from(new.saturating_sub(old)).unwrap_or(i64::MAX)
}

impl Metric for CpuMetric {
    fn refresh(&mut self, source: &dyn MetricsSource) -> Result<Sample> {
        let current = source.cpu()?;
        let old = std::mem::replace(&mut self.previous, current);
        let baseline_only = !self.primed && self.suppress_first;
        self.primed = true;

        if baseline_only {
            self.diff_user = 0;
            self.diff_system = 0;
            self.diff_total = 0;
        } else {
            self.diff_user = tick_delta(current.user, old.user);
            self.diff_system = tick_delta(current.sys, old.sys);
            self.diff_total = current.total().saturating_sub(old.total());
        }

        let idle = (current.idle + current.wait).saturating_sub(old.idle + old.wait);
        let busy_pct = if baseline_only {
            0
        } else {
            percent(self.diff_total.saturating_sub(idle), self.diff_total)
        };

        Ok(Sample {
            kind: MetricKind::Cpu,
            values: vec![self.diff_system, self.diff_user],
            summary: format!(
                "CPU: user {} system {} ({}% busy)",
                self.diff_user, self.diff_system, busy_pct
            ),
        })
    }

    fn render(&self, canvas: &mut Canvas, lane: &Lane) {
        canvas.draw_bar(lane.newest_x(), self.diff_system, palette::CPU_SYSTEM);
        canvas.draw_bar(lane.newest_x(), self.diff_user, palette::CPU_USER);
    }
}
