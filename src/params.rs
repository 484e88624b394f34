//! Parameter definitions with physical units and documented semantics.
//!
//! All tunables live here with:
//! - Physical units (pixels, milliseconds, Hz)
//! - Documented ranges and meanings
//! - `Default` impls carrying the stock values

/// A fixed color-probe location, as a fraction of the window size.
#[derive(Debug, Clone, Copy)]
pub struct SamplePoint {
    /// Horizontal position (0..1, fraction of window width)
    pub x: f32,

    /// Vertical position (0..1, fraction of window height)
    pub y: f32,
}

/// The six probe locations, immutable after startup.
pub const SAMPLE_POINTS: [SamplePoint; 6] = [
    SamplePoint { x: 0.08, y: 0.12 },
    SamplePoint { x: 0.47, y: 0.09 },
    SamplePoint { x: 0.86, y: 0.62 },
    SamplePoint { x: 0.23, y: 0.75 },
    SamplePoint { x: 0.47, y: 0.75 },
    SamplePoint { x: 0.78, y: 0.75 },
];

/// Webcam capture configuration
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Camera device index (0 = system default)
    pub camera_index: u32,

    /// Requested capture width (pixels). Small on purpose: the feed is
    /// pixelated anyway, so 80x60 keeps per-tick copying trivial.
    pub width: u32,

    /// Requested capture height (pixels)
    pub height: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            width: 80,
            height: 60,
        }
    }
}

/// Pixel-grid display configuration
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Size of one rendered grid cell (pixels per side)
    pub cell_size_px: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { cell_size_px: 20 }
    }
}

impl GridConfig {
    /// Number of grid columns for a given window width
    pub fn cols_for(&self, window_width: u32) -> usize {
        ((window_width / self.cell_size_px) as usize).max(1)
    }

    /// Number of grid rows for a given window height
    pub fn rows_for(&self, window_height: u32) -> usize {
        ((window_height / self.cell_size_px) as usize).max(1)
    }
}

/// Trigger cooldown configuration
#[derive(Debug, Clone)]
pub struct TriggerConfig {
    /// Minimum elapsed time between triggers at the same probe point
    /// (milliseconds). Stock value: 100
    pub cooldown_ms: u64,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self { cooldown_ms: 100 }
    }
}

/// Window and overlay configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Diameter of the ring drawn over each probe point (pixels)
    pub marker_diameter_px: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            marker_diameter_px: 10.0,
        }
    }
}

/// Timing constants (compile-time)
pub mod timing {
    /// Probe/trigger ticks per second
    pub const TICK_RATE_HZ: u32 = 20;

    /// Tick interval in milliseconds
    pub const TICK_INTERVAL_MS: u64 = 1000 / TICK_RATE_HZ as u64;
}

/// Audio constants (compile-time)
pub mod audio_constants {
    /// Hard output clip, applied in the stream callback (safety limiter)
    pub const OUTPUT_CLAMP: f32 = 0.5;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_config_cell_counts() {
        let grid = GridConfig::default();
        assert_eq!(grid.cols_for(1280), 64);
        assert_eq!(grid.rows_for(720), 36);

        // Never collapses to zero cells, even for tiny windows
        assert_eq!(grid.cols_for(5), 1);
        assert_eq!(grid.rows_for(0), 1);
    }

    #[test]
    fn test_sample_points_in_unit_square() {
        for point in SAMPLE_POINTS {
            assert!(point.x > 0.0 && point.x < 1.0);
            assert!(point.y > 0.0 && point.y < 1.0);
        }
    }
}
