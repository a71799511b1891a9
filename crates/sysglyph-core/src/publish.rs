//! The display boundary: where finished bitmaps leave the tick worker.
//!
//! Publishers receive an immutable [`Bitmap`] snapshot plus the tooltip text
//! built from the samplers' summaries. How the host shows them (tray icon,
//! file watcher, status bar) is not the driver's business.

use std::collections::VecDeque;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;
use tempfile::NamedTempFile;

use crate::canvas::Bitmap;
use crate::error::{Error, Result};

/// Receiver of one bitmap per tick.
pub trait IconPublisher {
    fn publish(&mut self, bitmap: &Bitmap, tooltip: &str) -> Result<()>;
}

impl<P: IconPublisher + ?Sized> IconPublisher for Box<P> {
    fn publish(&mut self, bitmap: &Bitmap, tooltip: &str) -> Result<()> {
        (**self).publish(bitmap, tooltip)
    }
}

/// Encode a bitmap as a Netpbm PAM (`P7`, `RGB_ALPHA`) image.
pub fn encode_pam(bitmap: &Bitmap) -> Vec<u8> {
    let header = format!(
        "P7\nWIDTH {}\nHEIGHT {}\nDEPTH 4\nMAXVAL 255\nTUPLTYPE RGB_ALPHA\nENDHDR\n",
        bitmap.width(),
        bitmap.height()
    );
    let mut out = Vec::with_capacity(header.len() + bitmap.pixels().len() * 4);
    out.extend_from_slice(header.as_bytes());
    out.extend(bitmap.to_rgba_bytes());
    out
}

/// Writes each frame to a PAM file, replacing it atomically, and the tooltip
/// next to it with a `.txt` extension.
///
/// Readers polling the file never observe a half-written image: the frame is
/// written to a temporary sibling and renamed over the target.
#[derive(Debug, Clone)]
pub struct PamFilePublisher {
    path: PathBuf,
    tooltip_path: PathBuf,
}

impl PamFilePublisher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let tooltip_path = path.with_extension("txt");
        Self { path, tooltip_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tooltip_path(&self) -> &Path {
        &self.tooltip_path
    }
}

fn replace_file(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(Error::Publish)?;
    tmp.write_all(contents).map_err(Error::Publish)?;
    tmp.flush().map_err(Error::Publish)?;
    tmp.persist(path).map_err(|e| Error::Publish(e.error))?;
    Ok(())
}

impl IconPublisher for PamFilePublisher {
    fn publish(&mut self, bitmap: &Bitmap, tooltip: &str) -> Result<()> {
        replace_file(&self.path, &encode_pam(bitmap))?;
        replace_file(&self.tooltip_path, tooltip.as_bytes())
    }
}

/// Logs the tooltip of each frame and discards the pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPublisher;

impl IconPublisher for LogPublisher {
    fn publish(&mut self, bitmap: &Bitmap, tooltip: &str) -> Result<()> {
        info!(
            "{}x{} frame | {}",
            bitmap.width(),
            bitmap.height(),
            tooltip.replace('\n', " | ")
        );
        Ok(())
    }
}

/// Keeps the most recent frames in memory.
#[derive(Debug, Clone)]
pub struct MemoryPublisher {
    capacity: usize,
    frames: VecDeque<(Bitmap, String)>,
}

impl MemoryPublisher {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            frames: VecDeque::new(),
        }
    }

    /// Oldest first.
    pub fn frames(&self) -> impl Iterator<Item = &(Bitmap, String)> {
        self.frames.iter()
    }

    pub fn latest(&self) -> Option<&(Bitmap, String)> {
        self.frames.back()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl IconPublisher for MemoryPublisher {
    fn publish(&mut self, bitmap: &Bitmap, tooltip: &str) -> Result<()> {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back((bitmap.clone(), tooltip.to_string()));
        Ok(())
    }
}
