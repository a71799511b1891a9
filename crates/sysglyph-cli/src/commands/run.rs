//! `sysglyph run`: drive the strip from /proc until interrupted.

use log::info;
use sysglyph_core::{ProcfsSource, TickDriver};

pub fn run(config_path: Option<&str>, output: Option<&str>, ticks: Option<u64>) {
    let config = super::load_config(config_path);
    let publisher = super::make_publisher(output);

    let mut driver = match TickDriver::new(&config, ProcfsSource::new(), publisher) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    if let Some(path) = output {
        info!("publishing frames to {path}");
    }

    let shutdown = super::shutdown_flag();
    if let Err(e) = driver.run(&shutdown, ticks) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
