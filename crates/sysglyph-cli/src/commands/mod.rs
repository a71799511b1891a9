pub mod config;
pub mod demo;
pub mod run;
pub mod sample;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::warn;
use serde_json::Value;
use sysglyph_core::{Config, IconPublisher, LogPublisher, PamFilePublisher};

/// Load the config file if one was given, else the defaults. Exits on error.
pub fn load_config(path: Option<&str>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    match Config::from_path(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading {path}: {e}");
            std::process::exit(1);
        }
    }
}

/// PAM file publisher when an output path is given, log publisher otherwise.
pub fn make_publisher(output: Option<&str>) -> Box<dyn IconPublisher> {
    match output {
        Some(path) => Box::new(PamFilePublisher::new(path)),
        None => Box::new(LogPublisher),
    }
}

/// Flag raised by Ctrl+C.
pub fn shutdown_flag() -> Arc<AtomicBool> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let s = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        s.store(true, Ordering::SeqCst);
    }) {
        warn!("could not install Ctrl+C handler: {e}");
    }
    shutdown
}

/// Pretty-print `value` to `path`, or to stdout when no path is given.
pub fn write_json(value: &Value, path: Option<&str>, label: &str) {
    let rendered = match serde_json::to_string_pretty(value) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error serializing {label}: {e}");
            std::process::exit(1);
        }
    };
    match path {
        Some(path) => {
            if let Err(e) = std::fs::write(path, rendered + "\n") {
                eprintln!("Error writing {label} to {path}: {e}");
                std::process::exit(1);
            }
            println!("{label} written to {path}");
        }
        None => println!("{rendered}"),
    }
}
