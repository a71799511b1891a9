//! Tick driver: the single worker that samples, scrolls, renders and
//! publishes once per [`TICK_INTERVAL`].
//!
//! ```text
//!            timer deadline
//!   Idle ───────────────────▶ Active
//!    ▲                          │ refresh all → scroll → render → publish
//!    └──────────────────────────┘
//! ```
//!
//! Cycles never overlap. A cycle that overruns the interval pushes the next
//! deadline back instead of queueing catch-up ticks. Shutdown is observed
//! only while idle; a running cycle always completes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::{debug, error, info};
use serde::Serialize;

use crate::canvas::Canvas;
use crate::config::{Config, TICK_INTERVAL};
use crate::error::Result;
use crate::metrics::{self, Metric, Sample};
use crate::publish::IconPublisher;
use crate::source::MetricsSource;

/// Granularity of the idle wait, bounding shutdown latency.
const SHUTDOWN_POLL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Active,
}

/// Outcome of one completed cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// 1-based tick number.
    pub tick: u64,
    /// One sample per lane, in lane order.
    pub samples: Vec<Sample>,
}

impl TickReport {
    /// Summaries joined one per line, as shown in the icon's tooltip.
    pub fn tooltip(&self) -> String {
        self.samples
            .iter()
            .map(|s| s.summary.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Owns the canvas, the samplers, the source and the publisher.
pub struct TickDriver<S, P> {
    source: S,
    publisher: P,
    canvas: Canvas,
    metrics: Vec<Box<dyn Metric>>,
    interval: Duration,
    ticks: u64,
    state: DriverState,
}

impl<S: MetricsSource, P: IconPublisher> TickDriver<S, P> {
    /// Build the canvas and one sampler per configured lane.
    pub fn new(config: &Config, source: S, publisher: P) -> Result<Self> {
        config.validate()?;
        let canvas = Canvas::new(config.lane_size, &config.lanes)?;
        let metrics = config
            .lanes
            .iter()
            .map(|&kind| metrics::build(kind, config))
            .collect();
        Ok(Self {
            source,
            publisher,
            canvas,
            metrics,
            interval: TICK_INTERVAL,
            ticks: 0,
            state: DriverState::Idle,
        })
    }

    #[cfg(test)]
    fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Completed cycles so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Hand the current (initially blank) canvas to the publisher.
    pub fn publish_current(&mut self, tooltip: &str) -> Result<()> {
        self.publisher.publish(&self.canvas.snapshot(), tooltip)
    }

    /// Run one full cycle.
    ///
    /// Every sampler is refreshed before the canvas is touched, so a source
    /// failure leaves the canvas and the published frame unchanged.
    pub fn tick(&mut self) -> Result<TickReport> {
        self.state = DriverState::Active;
        let result = self.cycle();
        self.state = DriverState::Idle;
        result
    }

    fn cycle(&mut self) -> Result<TickReport> {
        let mut samples = Vec::with_capacity(self.metrics.len());
        for metric in &mut self.metrics {
            samples.push(metric.refresh(&self.source)?);
        }

        self.canvas.scroll_left();
        for (i, metric) in self.metrics.iter().enumerate() {
            let lane = self.canvas.lanes()[i];
            self.canvas.clear_column(lane.newest_x());
            metric.render(&mut self.canvas, &lane);
        }

        self.ticks += 1;
        let report = TickReport {
            tick: self.ticks,
            samples,
        };
        let tooltip = report.tooltip();
        debug!("tick {}: {}", report.tick, tooltip.replace('\n', " | "));

        self.publisher.publish(&self.canvas.snapshot(), &tooltip)?;
        Ok(report)
    }

    /// Drive cycles on the fixed schedule until `shutdown` is set, `max_ticks`
    /// cycles have completed, or a cycle fails.
    ///
    /// Publishes the blank canvas first, then waits one interval before the
    /// first cycle. Returns the number of cycles completed by this call.
    pub fn run(&mut self, shutdown: &AtomicBool, max_ticks: Option<u64>) -> Result<u64> {
        info!(
            "driving {} lanes on a {}x{} canvas every {:?}",
            self.metrics.len(),
            self.canvas.width(),
            self.canvas.height(),
            self.interval
        );
        self.publish_current("")?;

        let start_ticks = self.ticks;
        let mut deadline = Instant::now();
        loop {
            if max_ticks.is_some_and(|max| self.ticks - start_ticks >= max) {
                break;
            }
            deadline = (deadline + self.interval).max(Instant::now());
            if !wait_until(deadline, shutdown) {
                break;
            }
            if let Err(e) = self.tick() {
                error!("tick {} failed, stopping: {e}", self.ticks + 1);
                return Err(e);
            }
        }

        let done = self.ticks - start_ticks;
        info!("stopped after {done} ticks");
        Ok(done)
    }
}

/// Sleep until `deadline`; false if `shutdown` was raised first.
fn wait_until(deadline: Instant, shutdown: &AtomicBool) -> bool {
    loop {
        if shutdown.load(Ordering::SeqCst) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        std::thread::sleep((deadline - now).min(SHUTDOWN_POLL));
    }
}
