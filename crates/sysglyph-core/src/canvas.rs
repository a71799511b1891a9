//! Scrolling pixel canvas split into one lane per metric.
//!
//! The canvas is the history: there is no numeric buffer behind it. Every
//! tick each lane is shifted one column to the left, its newest (rightmost)
//! column is cleared, and the renderers paint fresh bars into it.
//!
//! ```text
//!  x: 0 ........ S-1 | S ....... 2S-1 | 2S ...... 3S-1
//!     [ memory lane ] [  swap lane    ] [  load lane   ]
//!                 ^ newest          ^ newest         ^ newest
//! ```
//!
//! Pixels are stored row-major. The canvas never reallocates after
//! construction.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::metrics::MetricKind;
use crate::palette::{self, Color};

/// Contiguous half-open column range `[start_x, end_x)` owned by one metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lane {
    pub kind: MetricKind,
    pub start_x: usize,
    pub end_x: usize,
}

impl Lane {
    pub fn width(&self) -> usize {
        self.end_x - self.start_x
    }

    /// Column the renderer paints each tick.
    pub fn newest_x(&self) -> usize {
        self.end_x - 1
    }

    pub fn contains(&self, x: usize) -> bool {
        (self.start_x..self.end_x).contains(&x)
    }
}

/// Fixed-size RGBA canvas with `lane_size`-wide lanes laid out left to right.
#[derive(Debug, Clone)]
pub struct Canvas {
    lane_size: usize,
    width: usize,
    height: usize,
    pixels: Vec<Color>,
    lanes: Vec<Lane>,
}

impl Canvas {
    /// Build a canvas of `lane_size × lane_size` lanes, one per kind in order.
    ///
    /// The canvas starts background-filled.
    pub fn new(lane_size: usize, kinds: &[MetricKind]) -> Result<Self> {
        if lane_size == 0 {
            return Err(Error::Config("lane size must be at least 1 pixel".into()));
        }
        if kinds.is_empty() {
            return Err(Error::Config("at least one lane is required".into()));
        }

        let lanes = kinds
            .iter()
            .enumerate()
            .map(|(i, &kind)| Lane {
                kind,
                start_x: i * lane_size,
                end_x: (i + 1) * lane_size,
            })
            .collect::<Vec<_>>();
        let width = lane_size * lanes.len();
        let height = lane_size;

        let mut canvas = Self {
            lane_size,
            width,
            height,
            pixels: vec![palette::BACKGROUND; width * height],
            lanes,
        };
        canvas.initialize();
        Ok(canvas)
    }

    /// Paint every pixel with the background color.
    pub fn initialize(&mut self) {
        self.pixels.fill(palette::BACKGROUND);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn lane_size(&self) -> usize {
        self.lane_size
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn lane(&self, kind: MetricKind) -> Option<&Lane> {
        self.lanes.iter().find(|l| l.kind == kind)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Top-to-bottom copy of column `x`.
    pub fn column(&self, x: usize) -> Vec<Color> {
        if x >= self.width {
            return Vec::new();
        }
        (0..self.height)
            .map(|y| self.pixels[y * self.width + x])
            .collect()
    }

    /// Shift every lane one column to the left.
    ///
    /// Within a lane column `x` is copied to `x - 1` for increasing `x`, so
    /// each source column is read before it is overwritten. The lane's first
    /// column falls off and its newest column keeps its stale content until
    /// [`Canvas::clear_column`] or a renderer overwrites it. No pixel ever
    /// crosses a lane boundary.
    pub fn scroll_left(&mut self) {
        for lane in &self.lanes {
            if lane.width() < 2 {
                continue;
            }
            for y in 0..self.height {
                let row = y * self.width;
                self.pixels
                    .copy_within(row + lane.start_x + 1..row + lane.end_x, row + lane.start_x);
            }
        }
    }

    /// Reset column `x` to the background color.
    pub fn clear_column(&mut self, x: usize) {
        self.draw_vertical_segment(x, 0, self.height as i64 - 1, palette::BACKGROUND);
    }

    /// Set rows `y_top..=y_bottom` of column `x` to `color`.
    ///
    /// Rows are clamped into the canvas, so a segment reaching above the top
    /// saturates at row 0 instead of being dropped. An inverted range or an
    /// out-of-canvas column draws nothing.
    pub fn draw_vertical_segment(&mut self, x: usize, y_top: i64, y_bottom: i64, color: Color) {
        if x >= self.width || y_top > y_bottom {
            return;
        }
        let max_y = self.height as i64 - 1;
        let top = y_top.clamp(0, max_y) as usize;
        let bottom = y_bottom.clamp(0, max_y) as usize;
        for y in top..=bottom {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Rows a bar of `percent` occupies: `round(clamp(percent, 0, 100) / 100 × S)`.
    pub fn bar_rows(&self, percent: i64) -> usize {
        let pct = percent.clamp(0, 100) as f64;
        (pct / 100.0 * self.height as f64).round() as usize
    }

    /// Draw a bar of `percent` height anchored at the bottom of column `x`.
    pub fn draw_bar(&mut self, x: usize, percent: i64, color: Color) {
        let rows = self.bar_rows(percent) as i64;
        if rows == 0 {
            return;
        }
        let bottom = self.height as i64 - 1;
        self.draw_vertical_segment(x, bottom - rows + 1, bottom, color);
    }

    /// Immutable copy of the current pixels for the publisher.
    pub fn snapshot(&self) -> Bitmap {
        Bitmap {
            width: self.width,
            height: self.height,
            pixels: Arc::from(self.pixels.as_slice()),
        }
    }
}

/// Frozen canvas content handed across the publish boundary.
///
/// Cheap to clone; the pixels are shared and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Arc<[Color]>,
}

impl Bitmap {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Row-major pixels.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Row-major RGBA bytes, four per pixel.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_bytes()).collect()
    }
}
