//! Session-scoped trigger state: probe points plus the cooldown gate.
//!
//! One probe pass per tick: read the rendered color under each point,
//! classify its hue, and run the cooldown gate. The pass is pure with
//! respect to time (the caller injects the clock) and returns the
//! resulting trigger events instead of touching the audio engine, so
//! the whole pipeline is testable without a device or a render loop.

use crate::grid::PixelGrid;
use crate::palette::{classify, hue_of, ColorBucket};
use crate::params::SamplePoint;
use crate::trigger::TriggerGate;

/// A successful trigger: which point fired, and as what bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEvent {
    pub point: usize,
    pub bucket: ColorBucket,
}

/// Per-session trigger state
pub struct Session {
    points: Vec<SamplePoint>,
    gate: TriggerGate,
}

impl Session {
    pub fn new(points: &[SamplePoint], cooldown_ms: u64) -> Self {
        Self {
            points: points.to_vec(),
            gate: TriggerGate::new(points.len(), cooldown_ms),
        }
    }

    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    /// Run one probe/classify/gate pass at time `now_ms`.
    ///
    /// A grid that has not yet received a frame (camera warming up)
    /// produces nothing: probing its synthetic black would classify as
    /// Red at every point. Points over a gap hue produce nothing;
    /// points whose bucket is still cooling down produce nothing and
    /// leave the gate untouched.
    pub fn probe(&mut self, grid: &PixelGrid, now_ms: u64) -> Vec<TriggerEvent> {
        if !grid.ready() {
            return Vec::new();
        }

        let mut events = Vec::new();
        for (index, point) in self.points.iter().enumerate() {
            let [r, g, b] = grid.probe(point);
            let Some(bucket) = classify(hue_of(r, g, b)) else {
                continue;
            };
            if self.gate.try_trigger(index, now_ms) {
                events.push(TriggerEvent {
                    point: index,
                    bucket,
                });
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SAMPLE_POINTS;

    /// RGBA frame of one solid color
    fn solid_frame(w: usize, h: usize, rgb: [u8; 3]) -> Vec<u8> {
        let mut frame = vec![255u8; w * h * 4];
        for px in frame.chunks_exact_mut(4) {
            px[..3].copy_from_slice(&rgb);
        }
        frame
    }

    #[test]
    fn test_solid_red_triggers_every_point_once_per_tick() {
        let mut grid = PixelGrid::new(10, 10);
        grid.update_from_frame(&solid_frame(80, 60, [255, 0, 0]), 80, 60);
        let mut session = Session::new(&SAMPLE_POINTS, 150);

        // Two ticks spaced wider than the cooldown
        let first = session.probe(&grid, 1000);
        let second = session.probe(&grid, 1200);

        assert_eq!(first.len(), 6);
        assert_eq!(second.len(), 6);
        for event in first.iter().chain(second.iter()) {
            assert_eq!(event.bucket, ColorBucket::Red);
        }
    }

    #[test]
    fn test_cooldown_silences_fast_ticks() {
        let mut grid = PixelGrid::new(10, 10);
        grid.update_from_frame(&solid_frame(80, 60, [255, 0, 0]), 80, 60);
        let mut session = Session::new(&SAMPLE_POINTS, 150);

        assert_eq!(session.probe(&grid, 1000).len(), 6);
        // 100ms later: every point still cooling down
        assert_eq!(session.probe(&grid, 1100).len(), 0);
        assert_eq!(session.probe(&grid, 1151).len(), 6);
    }

    #[test]
    fn test_gap_hue_never_triggers() {
        let mut grid = PixelGrid::new(10, 10);
        // Hue 160 (a classifier gap): RGB (0, 255, 170)
        grid.update_from_frame(&solid_frame(80, 60, [0, 255, 170]), 80, 60);
        let mut session = Session::new(&SAMPLE_POINTS, 100);

        assert!(session.probe(&grid, 1000).is_empty());
        // A silent pass must not consume the cooldown either
        grid.update_from_frame(&solid_frame(80, 60, [255, 0, 0]), 80, 60);
        assert_eq!(session.probe(&grid, 1001).len(), 6);
    }

    #[test]
    fn test_single_yellow_point_triggers_exactly_one_kick() {
        let mut grid = PixelGrid::new(10, 10);
        // Background: gap hue 160. One pixel of hue ~55 (255, 234, 0) at
        // the mirrored source of the cell under point 0 (0.08, 0.12):
        // cell (0, 1) reads source pixel (72, 6).
        let mut frame = solid_frame(80, 60, [0, 255, 170]);
        let idx = (6 * 80 + 72) * 4;
        frame[idx..idx + 3].copy_from_slice(&[255, 234, 0]);
        grid.update_from_frame(&frame, 80, 60);

        let mut session = Session::new(&SAMPLE_POINTS, 100);
        let events = session.probe(&grid, 1000);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].point, 0);
        assert_eq!(events[0].bucket, ColorBucket::Yellow);
    }

    #[test]
    fn test_no_triggers_while_camera_warms_up() {
        // Before the first frame the grid is synthetic black, which
        // would read as hue 0 (Red) at every point; the probe pass must
        // skip those ticks entirely
        let mut grid = PixelGrid::new(10, 10);
        let mut session = Session::new(&SAMPLE_POINTS, 100);

        assert!(session.probe(&grid, 1000).is_empty());
        assert!(session.probe(&grid, 2000).is_empty());

        // First real frame: probing resumes
        grid.update_from_frame(&solid_frame(80, 60, [255, 0, 0]), 80, 60);
        assert_eq!(session.probe(&grid, 3000).len(), 6);
    }

    #[test]
    fn test_grid_resize_preserves_gate_state() {
        let mut grid = PixelGrid::new(10, 10);
        grid.update_from_frame(&solid_frame(80, 60, [255, 0, 0]), 80, 60);
        let mut session = Session::new(&SAMPLE_POINTS, 150);

        assert_eq!(session.probe(&grid, 1000).len(), 6);

        // Viewport resize: new grid, same session
        grid.resize(16, 9);
        grid.update_from_frame(&solid_frame(80, 60, [255, 0, 0]), 80, 60);
        // Cooldowns survive the resize
        assert_eq!(session.probe(&grid, 1100).len(), 0);
        assert_eq!(session.probe(&grid, 1151).len(), 6);
    }
}
