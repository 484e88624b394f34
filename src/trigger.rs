//! Per-point trigger cooldown gate.
//!
//! Prevents sound spam: a probe point may only fire again once
//! `cooldown_ms` has elapsed since its last successful trigger.

/// Last-trigger timestamps for every probe point, plus the cooldown
pub struct TriggerGate {
    /// Milliseconds of the last successful trigger, one slot per point.
    /// 0 = never triggered.
    last_trigger_ms: Vec<u64>,

    /// Minimum gap between triggers at the same point (milliseconds)
    cooldown_ms: u64,
}

impl TriggerGate {
    /// Create a gate for `point_count` probe points
    pub fn new(point_count: usize, cooldown_ms: u64) -> Self {
        Self {
            last_trigger_ms: vec![0; point_count],
            cooldown_ms,
        }
    }

    /// Attempt a trigger at `point` at time `now_ms`.
    ///
    /// Returns true and records the timestamp only when the cooldown has
    /// elapsed; otherwise leaves the state untouched.
    pub fn try_trigger(&mut self, point: usize, now_ms: u64) -> bool {
        let last = self.last_trigger_ms[point];
        if now_ms.saturating_sub(last) > self.cooldown_ms {
            self.last_trigger_ms[point] = now_ms;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_blocks_rapid_retrigger() {
        let mut gate = TriggerGate::new(6, 150);

        assert!(gate.try_trigger(0, 1000));
        assert!(!gate.try_trigger(0, 1100)); // 100ms later: still cooling
        assert!(gate.try_trigger(0, 1151)); // 151ms later: allowed
    }

    #[test]
    fn test_failed_trigger_leaves_state_unchanged() {
        let mut gate = TriggerGate::new(1, 150);

        assert!(gate.try_trigger(0, 1000));
        assert!(!gate.try_trigger(0, 1100));
        // The failed attempt must not have refreshed the timestamp
        assert!(gate.try_trigger(0, 1151));
    }

    #[test]
    fn test_points_are_independent() {
        let mut gate = TriggerGate::new(2, 150);

        assert!(gate.try_trigger(0, 1000));
        // Point 1 is unaffected by point 0's cooldown
        assert!(gate.try_trigger(1, 1000));
        assert!(!gate.try_trigger(0, 1000));
    }

    #[test]
    fn test_exact_cooldown_is_still_blocked() {
        let mut gate = TriggerGate::new(1, 150);

        assert!(gate.try_trigger(0, 1000));
        // Strictly-greater comparison: exactly 150ms later is too soon
        assert!(!gate.try_trigger(0, 1150));
    }

    #[test]
    fn test_startup_window_respects_cooldown() {
        // Slots start at 0, so the first cooldown_ms of the session
        // cannot trigger
        let mut gate = TriggerGate::new(1, 100);
        assert!(!gate.try_trigger(0, 50));
        assert!(gate.try_trigger(0, 101));
    }
}
