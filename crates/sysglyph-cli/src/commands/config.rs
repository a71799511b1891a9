//! `sysglyph config`: print the default configuration.

use sysglyph_core::Config;

pub fn run() {
    match serde_json::to_value(Config::default()) {
        Ok(value) => super::write_json(&value, None, "Default config"),
        Err(e) => {
            eprintln!("Error serializing config: {e}");
            std::process::exit(1);
        }
    }
}
