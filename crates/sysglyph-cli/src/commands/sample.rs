//! `sysglyph sample`: one raw reading of every metric.

use sysglyph_core::{ProcfsSource, Readings};

pub fn run(config_path: Option<&str>, output: Option<&str>) {
    let config = super::load_config(config_path);
    let source = ProcfsSource::new();

    let readings = match Readings::collect(&source) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error reading metrics: {e}");
            std::process::exit(1);
        }
    };

    let disk_present = readings.disks.iter().any(|d| d.name == config.disk_device);
    let watched_interface = match &config.network_interface {
        Some(name) => readings
            .interfaces
            .iter()
            .find(|i| &i.name == name)
            .map(|i| i.name.clone()),
        None => readings.interfaces.first().map(|i| i.name.clone()),
    };

    let value = serde_json::json!({
        "readings": readings,
        "disk_device": config.disk_device,
        "disk_device_present": disk_present,
        "watched_interface": watched_interface,
    });
    super::write_json(&value, output, "Sample");
}
