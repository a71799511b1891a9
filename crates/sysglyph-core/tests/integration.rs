//! Integration tests for sysglyph-core.
//!
//! These drive the full pipeline:
//! static source → samplers → scrolling canvas → publisher.

use sysglyph_core::palette;
use sysglyph_core::{
    Bitmap, Canvas, Color, Config, CpuTimes, IoCounters, LoadReading, MemoryPublisher,
    MemoryReading, MetricKind, PamFilePublisher, Readings, StaticSource, SwapReading, TickDriver,
};

fn column(bitmap: &Bitmap, x: usize) -> Vec<Color> {
    (0..bitmap.height())
        .map(|y| bitmap.pixel(x, y).unwrap())
        .collect()
}

fn count(col: &[Color], color: Color) -> usize {
    col.iter().filter(|&&c| c == color).count()
}

fn busy_readings() -> Readings {
    Readings {
        memory: MemoryReading {
            total: 4096 * 1024,
            used: 2048 * 1024,
            actual_used: 1024 * 1024,
        },
        swap: SwapReading {
            total: 1000 * 1024,
            used: 100 * 1024,
        },
        load: LoadReading {
            one: 0.25,
            five: 0.5,
            fifteen: 0.75,
        },
        cpu: CpuTimes {
            user: 1000,
            sys: 500,
            idle: 8000,
            ..CpuTimes::default()
        },
        disks: vec![IoCounters {
            name: "sda".into(),
            rx_bytes: 0,
            tx_bytes: 0,
        }],
        interfaces: vec![IoCounters {
            name: "eth0".into(),
            rx_bytes: 0,
            tx_bytes: 0,
        }],
    }
}

#[test]
fn two_lane_scroll_scenario() {
    let mut canvas = Canvas::new(100, &[MetricKind::Load, MetricKind::Swap]).unwrap();
    let red = palette::LOAD;
    let pink = palette::SWAP;

    // tick 1
    canvas.scroll_left();
    canvas.clear_column(99);
    canvas.clear_column(199);
    canvas.draw_bar(99, 40, red);
    canvas.draw_bar(199, 10, pink);
    let tick1 = canvas.snapshot();

    // tick 2
    canvas.scroll_left();
    canvas.clear_column(99);
    canvas.clear_column(199);
    canvas.draw_bar(99, 60, red);
    canvas.draw_bar(199, 20, pink);
    let tick2 = canvas.snapshot();

    assert_eq!(column(&tick2, 98), column(&tick1, 99));
    assert_eq!(count(&column(&tick2, 99), red), 60);
    assert_eq!(count(&column(&tick2, 98), red), 40);
    // Lane 1 only ever holds its own pixels.
    assert_eq!(column(&tick2, 198), column(&tick1, 199));
    assert_eq!(count(&column(&tick2, 199), pink), 20);
    for x in 100..200 {
        assert_eq!(count(&column(&tick2, x), red), 0, "lane 0 leaked into x={x}");
    }
}

#[test]
fn every_tick_is_a_pure_left_shift_per_lane() {
    let config = Config {
        lane_size: 12,
        ..Config::default()
    };
    let src = StaticSource::new(busy_readings());
    let mut driver = TickDriver::new(&config, src.clone(), MemoryPublisher::new(1)).unwrap();

    let mut previous = driver.canvas().snapshot();
    for step in 1..=20u64 {
        src.update(|r| {
            r.cpu.user += 7 * step;
            r.cpu.sys += 3;
            r.cpu.idle += 90;
            r.disks[0].rx_bytes += step * 4096 * 1024;
            r.interfaces[0].tx_bytes += step * 1024 * 1024;
            r.load.one = (step % 4) as f64 * 0.5;
        });
        driver.tick().unwrap();
        let current = driver.canvas().snapshot();
        for lane in driver.canvas().lanes() {
            for x in lane.start_x..lane.newest_x() {
                assert_eq!(
                    column(&current, x),
                    column(&previous, x + 1),
                    "{} lane, x={x}, step {step}",
                    lane.kind
                );
            }
        }
        previous = current;
    }
}

#[test]
fn six_lane_first_tick() {
    let config = Config::default();
    let src = StaticSource::new(busy_readings());
    let mut driver = TickDriver::new(&config, src, MemoryPublisher::new(2)).unwrap();
    let report = driver.tick().unwrap();

    let values: Vec<(MetricKind, Vec<i64>)> = report
        .samples
        .iter()
        .map(|s| (s.kind, s.values.clone()))
        .collect();
    assert_eq!(
        values,
        vec![
            (MetricKind::Memory, vec![50, 25]),
            (MetricKind::Swap, vec![10]),
            (MetricKind::Load, vec![25]),
            // First CPU tick diffs against zero: the cumulative counters.
            (MetricKind::Cpu, vec![500, 1000]),
            (MetricKind::Disk, vec![0, 0]),
            (MetricKind::Network, vec![0, 0]),
        ]
    );

    let frame = &driver.publisher().latest().unwrap().0;
    assert_eq!(frame.width(), 600);
    assert_eq!(frame.height(), 100);
    // CPU spike saturates the lane rather than failing.
    assert_eq!(count(&column(frame, 399), palette::CPU_USER), 100);
    assert_eq!(count(&column(frame, 499), palette::BACKGROUND), 100);
}

#[test]
fn suppressed_first_tick_draws_flat_cpu() {
    let config = Config {
        suppress_first_tick: true,
        ..Config::default()
    };
    let src = StaticSource::new(busy_readings());
    let mut driver = TickDriver::new(&config, src.clone(), MemoryPublisher::new(2)).unwrap();
    driver.tick().unwrap();
    let frame = driver.canvas().snapshot();
    assert_eq!(count(&column(&frame, 399), palette::BACKGROUND), 100);

    src.update(|r| {
        r.cpu.user += 30;
        r.cpu.sys += 5;
    });
    let report = driver.tick().unwrap();
    assert_eq!(report.samples[3].values, vec![5, 30]);
}

#[test]
fn unchanged_source_is_idempotent() {
    let config = Config::default();
    let src = StaticSource::new(busy_readings());
    let mut driver = TickDriver::new(&config, src, MemoryPublisher::new(2)).unwrap();
    driver.tick().unwrap();
    let second = driver.tick().unwrap();
    let third = driver.tick().unwrap();

    assert_eq!(second.samples, third.samples);
    for sample in &third.samples {
        match sample.kind {
            MetricKind::Cpu | MetricKind::Disk | MetricKind::Network => {
                assert!(sample.values.iter().all(|&v| v == 0), "{:?}", sample)
            }
            _ => {}
        }
    }
}

#[test]
fn missing_devices_render_flat_lanes() {
    let config = Config::default();
    let mut readings = busy_readings();
    readings.disks.clear();
    readings.interfaces.clear();
    let mut driver = TickDriver::new(
        &config,
        StaticSource::new(readings),
        MemoryPublisher::new(1),
    )
    .unwrap();
    let report = driver.tick().unwrap();

    assert_eq!(report.samples[4].summary, "Disk sda: not present");
    assert_eq!(report.samples[5].summary, "Network: no interface");
    let frame = driver.canvas().snapshot();
    assert_eq!(count(&column(&frame, 499), palette::BACKGROUND), 100);
    assert_eq!(count(&column(&frame, 599), palette::BACKGROUND), 100);
}

#[test]
fn source_failure_halts_without_publishing() {
    let config = Config::default();
    let src = StaticSource::new(busy_readings());
    let mut driver = TickDriver::new(&config, src.clone(), MemoryPublisher::new(4)).unwrap();
    driver.tick().unwrap();
    src.set_failing(true);

    let err = driver.tick().unwrap_err();
    assert!(matches!(err, sysglyph_core::Error::Source { .. }));
    assert_eq!(driver.publisher().len(), 1);
}

#[test]
fn pam_file_tracks_the_canvas() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("strip.pam");
    let config = Config {
        lane_size: 8,
        lanes: vec![MetricKind::Memory, MetricKind::Load],
        ..Config::default()
    };
    let mut driver = TickDriver::new(
        &config,
        StaticSource::new(busy_readings()),
        PamFilePublisher::new(&path),
    )
    .unwrap();
    driver.tick().unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes, sysglyph_core::encode_pam(&driver.canvas().snapshot()));
    let tooltip = std::fs::read_to_string(tmp.path().join("strip.txt")).unwrap();
    assert_eq!(tooltip.lines().count(), 2);
    assert!(tooltip.lines().nth(1).unwrap().starts_with("Load: 0.25"));
}
