//! Downsampled video grid: the pixelated view of the camera feed.
//!
//! Each cell takes its color from one source pixel via nearest mapping,
//! mirrored horizontally so the view behaves like a mirror. Probe colors
//! are read back from the grid cells, i.e. from the blocky rendered
//! output rather than the raw camera pixel.

use crate::params::SamplePoint;

/// Grid of cell colors, stored as tightly packed RGBA8
pub struct PixelGrid {
    cols: usize,
    rows: usize,
    /// cols * rows * 4 bytes, row-major, alpha always 255
    cells: Vec<u8>,
    /// True once a real frame has been committed; the synthetic black
    /// of a fresh grid must never be probed as if it were camera data
    ready: bool,
}

impl PixelGrid {
    /// Create an all-black grid with the given cell counts
    pub fn new(cols: usize, rows: usize) -> Self {
        let mut cells = vec![0u8; cols * rows * 4];
        for alpha in cells.iter_mut().skip(3).step_by(4) {
            *alpha = 255;
        }
        Self {
            cols,
            rows,
            cells,
            ready: false,
        }
    }

    /// Whether at least one frame has been committed since creation or
    /// the last resize
    pub fn ready(&self) -> bool {
        self.ready
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Raw RGBA bytes, ready for texture upload
    pub fn data(&self) -> &[u8] {
        &self.cells
    }

    /// Change the cell counts (viewport resize). Existing colors are
    /// discarded; the next frame repaints everything anyway.
    pub fn resize(&mut self, cols: usize, rows: usize) {
        if cols != self.cols || rows != self.rows {
            *self = Self::new(cols, rows);
        }
    }

    /// Copy a captured frame into the grid.
    ///
    /// `frame` is width*height*4 channel-interleaved bytes. Every cell
    /// (i, j) reads source pixel (floor((cols-1-i) * w / cols),
    /// floor(j * h / rows)): nearest mapping with a horizontal mirror.
    ///
    /// Returns false (grid untouched) when the frame is empty or too
    /// short, so a not-yet-ready device just skips the tick.
    pub fn update_from_frame(&mut self, frame: &[u8], width: usize, height: usize) -> bool {
        if width == 0 || height == 0 || frame.len() < width * height * 4 {
            return false;
        }

        for j in 0..self.rows {
            let src_y = j * height / self.rows;
            for i in 0..self.cols {
                let src_x = (self.cols - 1 - i) * width / self.cols;
                let src = (src_y * width + src_x) * 4;
                let dst = (j * self.cols + i) * 4;

                self.cells[dst] = frame[src];
                self.cells[dst + 1] = frame[src + 1];
                self.cells[dst + 2] = frame[src + 2];
                self.cells[dst + 3] = 255;
            }
        }
        self.ready = true;
        true
    }

    /// RGB of one cell
    pub fn cell(&self, i: usize, j: usize) -> [u8; 3] {
        let idx = (j * self.cols + i) * 4;
        [self.cells[idx], self.cells[idx + 1], self.cells[idx + 2]]
    }

    /// Rendered color under a probe point.
    ///
    /// The point's relative coordinates pick the cell that covers it on
    /// screen, so the returned color is the post-pixelation one: probe
    /// accuracy is deliberately coupled to the block size.
    pub fn probe(&self, point: &SamplePoint) -> [u8; 3] {
        let i = ((point.x * self.cols as f32) as usize).min(self.cols - 1);
        let j = ((point.y * self.rows as f32) as usize).min(self.rows - 1);
        self.cell(i, j)
    }
}
