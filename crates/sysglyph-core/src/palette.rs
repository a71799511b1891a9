//! Colors of the status strip.

use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Canvas fill behind every bar (grey).
pub const BACKGROUND: Color = Color::rgb(50, 50, 50);

/// Used memory including page cache (light green).
pub const MEMORY_TOTAL: Color = Color::rgb(159, 252, 206);
/// Used memory excluding page cache (dark green).
pub const MEMORY_ACTUAL: Color = Color::rgb(3, 177, 88);

pub const SWAP: Color = Color::rgb(255, 0, 255);
pub const LOAD: Color = Color::rgb(255, 0, 0);

pub const CPU_SYSTEM: Color = Color::rgb(0, 0, 153);
pub const CPU_USER: Color = Color::rgb(51, 153, 255);

pub const DISK_READ: Color = Color::rgb(178, 96, 1);
pub const DISK_WRITE: Color = Color::rgb(245, 102, 17);

pub const NET_DOWNLOAD: Color = Color::rgb(238, 207, 25);
pub const NET_UPLOAD: Color = Color::rgb(242, 235, 113);
