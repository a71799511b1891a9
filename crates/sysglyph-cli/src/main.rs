//! CLI for sysglyph: a rolling system history strip for your tray.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sysglyph")]
#[command(about = "sysglyph: memory, swap, load, CPU, disk and network history as a status icon")]
#[command(version = sysglyph_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample /proc once per second and publish the strip until Ctrl+C
    Run {
        /// JSON configuration file (defaults apply to missing fields)
        #[arg(long)]
        config: Option<String>,

        /// Write each frame to this PAM image (tooltip goes next to it as .txt).
        /// Without it, frames are only logged.
        #[arg(long)]
        output: Option<String>,

        /// Stop after this many ticks
        #[arg(long)]
        ticks: Option<u64>,
    },

    /// Print one raw reading of every metric as JSON
    Sample {
        /// JSON configuration file
        #[arg(long)]
        config: Option<String>,

        /// Write the reading to a file instead of stdout
        #[arg(long)]
        output: Option<String>,
    },

    /// Print the default configuration as JSON
    Config,

    /// Drive the strip from a synthetic feed instead of /proc
    Demo {
        /// Stop after this many ticks
        #[arg(long, default_value = "30")]
        ticks: u64,

        /// Write each frame to this PAM image
        #[arg(long)]
        output: Option<String>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            output,
            ticks,
        } => commands::run::run(config.as_deref(), output.as_deref(), ticks),
        Commands::Sample { config, output } => {
            commands::sample::run(config.as_deref(), output.as_deref())
        }
        Commands::Config => commands::config::run(),
        Commands::Demo { ticks, output } => commands::demo::run(ticks, output.as_deref()),
    }
}
