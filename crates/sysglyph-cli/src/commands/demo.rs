//! `sysglyph demo`: drive the strip from a synthetic feed.
//!
//! The feed is deterministic: every reading is a slow wave of the tick
//! number, so the strip shows recognisable shapes without touching /proc.

use std::cell::Cell;
use std::f64::consts::TAU;

use sysglyph_core::{
    CpuTimes, IoCounters, LoadReading, MemoryReading, MetricsSource, Result, SwapReading,
    TickDriver,
};

const MIB: u64 = 1024 * 1024;

/// Synthetic counters advancing one step per tick.
///
/// Each sampler pulls its kind once per cycle, so a kind pulled a second
/// time marks the start of the next tick, whichever lanes are configured.
pub struct DemoSource {
    step: Cell<u64>,
    pulled: Cell<u8>,
    cpu: Cell<CpuTimes>,
    disk: Cell<(u64, u64)>,
    net: Cell<(u64, u64)>,
}

impl DemoSource {
    pub fn new() -> Self {
        Self {
            step: Cell::new(0),
            pulled: Cell::new(0),
            cpu: Cell::new(CpuTimes::default()),
            disk: Cell::new((0, 0)),
            net: Cell::new((0, 0)),
        }
    }

    /// 0.0..=1.0 wave with the given period in ticks.
    fn wave(&self, period: f64, phase: f64) -> f64 {
        let t = self.step.get() as f64;
        0.5 + 0.5 * (TAU * t / period + phase).sin()
    }

    /// Note a pull of the kind behind `bit`, stepping when it repeats.
    fn pull(&self, bit: u8) {
        if self.pulled.get() & bit != 0 {
            self.advance();
            self.pulled.set(0);
        }
        self.pulled.set(self.pulled.get() | bit);
    }

    fn advance(&self) {
        self.step.set(self.step.get() + 1);

        let mut cpu = self.cpu.get();
        cpu.user += (60.0 * self.wave(40.0, 0.0)) as u64;
        cpu.sys += (20.0 * self.wave(25.0, 1.0)) as u64;
        cpu.idle += 100;
        self.cpu.set(cpu);

        let (read, write) = self.disk.get();
        self.disk.set((
            read + (80.0 * self.wave(30.0, 2.0)) as u64 * MIB,
            write + (30.0 * self.wave(18.0, 0.5)) as u64 * MIB,
        ));

        let (down, up) = self.net.get();
        self.net.set((
            down + (10.0 * self.wave(22.0, 0.0)) as u64 * MIB,
            up + (3.0 * self.wave(14.0, 3.0)) as u64 * MIB,
        ));
    }
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSource for DemoSource {
    fn memory(&self) -> Result<MemoryReading> {
        self.pull(0x01);
        let total = 8192 * MIB;
        let used = (total as f64 * (0.55 + 0.35 * self.wave(60.0, 0.0))) as u64;
        Ok(MemoryReading {
            total,
            used,
            actual_used: used / 2,
        })
    }

    fn swap(&self) -> Result<SwapReading> {
        self.pull(0x02);
        let total = 2048 * MIB;
        Ok(SwapReading {
            total,
            used: (total as f64 * 0.2 * self.wave(90.0, 1.5)) as u64,
        })
    }

    fn load(&self) -> Result<LoadReading> {
        self.pull(0x04);
        let one = 1.4 * self.wave(35.0, 0.3);
        Ok(LoadReading {
            one,
            five: one * 0.8,
            fifteen: one * 0.6,
        })
    }

    fn cpu(&self) -> Result<CpuTimes> {
        self.pull(0x08);
        Ok(self.cpu.get())
    }

    fn disks(&self) -> Result<Vec<IoCounters>> {
        self.pull(0x10);
        let (rx_bytes, tx_bytes) = self.disk.get();
        Ok(vec![IoCounters {
            name: "sda".to_string(),
            rx_bytes,
            tx_bytes,
        }])
    }

    fn interfaces(&self) -> Result<Vec<IoCounters>> {
        self.pull(0x20);
        let (rx_bytes, tx_bytes) = self.net.get();
        Ok(vec![IoCounters {
            name: "demo0".to_string(),
            rx_bytes,
            tx_bytes,
        }])
    }
}

pub fn run(ticks: u64, output: Option<&str>) {
    let config = sysglyph_core::Config {
        suppress_first_tick: true,
        ..sysglyph_core::Config::default()
    };
    let publisher = super::make_publisher(output);

    let mut driver = match TickDriver::new(&config, DemoSource::new(), publisher) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let shutdown = super::shutdown_flag();
    if let Err(e) = driver.run(&shutdown, Some(ticks)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
