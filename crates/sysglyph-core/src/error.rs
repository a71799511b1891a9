//! Error type shared by every fallible sysglyph operation.
//!
//! Only genuinely fatal conditions live here. An absent disk device or
//! network interface degrades to a zero reading, and out-of-range bar
//! heights are clamped by the canvas, so neither ever becomes an [`Error`].

use std::io;

use thiserror::Error;

/// Errors raised by metrics sources, publishers and configuration loading.
#[derive(Debug, Error)]
pub enum Error {
    /// The metrics source could not be read at all (permissions, platform).
    #[error("metrics source failed reading {what}: {source}")]
    Source {
        what: &'static str,
        #[source]
        source: io::Error,
    },

    /// The metrics source answered with text we could not make sense of.
    #[error("malformed {what}: {detail}")]
    Parse { what: &'static str, detail: String },

    /// Handing the bitmap to the display side failed.
    #[error("publish failed: {0}")]
    Publish(#[source] io::Error),

    /// Configuration values that cannot drive a canvas.
    #[error("invalid config: {0}")]
    Config(String),

    #[error("reading config: {0}")]
    ConfigIo(#[source] io::Error),

    #[error("parsing config: {0}")]
    ConfigJson(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn source_failed(what: &'static str, source: io::Error) -> Self {
        Self::Source { what, source }
    }

    pub(crate) fn parse(what: &'static str, detail: impl Into<String>) -> Self {
        Self::Parse {
            what,
            detail: detail.into(),
        }
    }
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
