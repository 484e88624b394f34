//! Hue classification: maps HSB hue values to discrete color buckets.
//!
//! Each bucket owns a fixed hue range; the gaps between ranges are
//! intentional and classify to nothing (no sound).

/// Discrete color category, each mapped to one sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorBucket {
    Red,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
}

impl ColorBucket {
    /// All buckets, in range order
    pub const ALL: [ColorBucket; 6] = [
        ColorBucket::Red,
        ColorBucket::Yellow,
        ColorBucket::Green,
        ColorBucket::Blue,
        ColorBucket::Purple,
        ColorBucket::Pink,
    ];

    /// Stable index for per-bucket storage (clip slots, etc.)
    pub fn index(self) -> usize {
        match self {
            ColorBucket::Red => 0,
            ColorBucket::Yellow => 1,
            ColorBucket::Green => 2,
            ColorBucket::Blue => 3,
            ColorBucket::Purple => 4,
            ColorBucket::Pink => 5,
        }
    }

    /// Lowercase name, used for sample file lookup (`red.wav`, ...)
    pub fn name(self) -> &'static str {
        match self {
            ColorBucket::Red => "red",
            ColorBucket::Yellow => "yellow",
            ColorBucket::Green => "green",
            ColorBucket::Blue => "blue",
            ColorBucket::Purple => "purple",
            ColorBucket::Pink => "pink",
        }
    }
}

/// Classify a hue (degrees, [0, 360)) into a color bucket.
///
/// Ranges are inclusive-lower / exclusive-upper, checked in priority
/// order; hues falling in a gap return `None`.
pub fn classify(hue: f32) -> Option<ColorBucket> {
    if (0.0..15.0).contains(&hue) {
        Some(ColorBucket::Red)
    } else if (50.0..70.0).contains(&hue) {
        Some(ColorBucket::Yellow)
    } else if (90.0..150.0).contains(&hue) {
        Some(ColorBucket::Green)
    } else if (180.0..250.0).contains(&hue) {
        Some(ColorBucket::Blue)
    } else if (270.0..290.0).contains(&hue) {
        Some(ColorBucket::Purple)
    } else if (310.0..345.0).contains(&hue) {
        Some(ColorBucket::Pink)
    } else {
        None
    }
}

/// HSB hue of an RGB color, in degrees [0, 360).
///
/// Achromatic colors (max == min) have hue 0 by convention, so black
/// and gray pixels land in the Red range.
pub fn hue_of(r: u8, g: u8, b: u8) -> f32 {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    if delta <= f32::EPSILON {
        return 0.0;
    }

    let hue = if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    if hue < 0.0 {
        hue + 360.0
    } else {
        hue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_ranges() {
        assert_eq!(classify(0.0), Some(ColorBucket::Red));
        assert_eq!(classify(14.9), Some(ColorBucket::Red));
        assert_eq!(classify(50.0), Some(ColorBucket::Yellow));
        assert_eq!(classify(69.9), Some(ColorBucket::Yellow));
        assert_eq!(classify(90.0), Some(ColorBucket::Green));
        assert_eq!(classify(149.9), Some(ColorBucket::Green));
        assert_eq!(classify(180.0), Some(ColorBucket::Blue));
        assert_eq!(classify(249.9), Some(ColorBucket::Blue));
        assert_eq!(classify(270.0), Some(ColorBucket::Purple));
        assert_eq!(classify(289.9), Some(ColorBucket::Purple));
        assert_eq!(classify(310.0), Some(ColorBucket::Pink));
        assert_eq!(classify(344.9), Some(ColorBucket::Pink));
    }

    #[test]
    fn test_classify_range_edges_exclusive() {
        assert_eq!(classify(15.0), None);
        assert_eq!(classify(70.0), None);
        assert_eq!(classify(150.0), None);
        assert_eq!(classify(250.0), None);
        assert_eq!(classify(290.0), None);
        assert_eq!(classify(345.0), None);
    }

    #[test]
    fn test_classify_gaps_are_silent() {
        for hue in [20.0, 160.0, 260.0, 300.0, 350.0] {
            assert_eq!(classify(hue), None, "hue {} should be a gap", hue);
        }
    }

    #[test]
    fn test_classify_is_deterministic() {
        for i in 0..3600 {
            let hue = i as f32 / 10.0;
            assert_eq!(classify(hue), classify(hue));
        }
    }

    #[test]
    fn test_hue_of_primaries() {
        assert_eq!(hue_of(255, 0, 0), 0.0);
        assert_eq!(hue_of(0, 255, 0), 120.0);
        assert_eq!(hue_of(0, 0, 255), 240.0);
        assert_eq!(hue_of(255, 255, 0), 60.0);
    }

    #[test]
    fn test_hue_of_achromatic_is_zero() {
        assert_eq!(hue_of(0, 0, 0), 0.0);
        assert_eq!(hue_of(128, 128, 128), 0.0);
        assert_eq!(hue_of(255, 255, 255), 0.0);
    }

    #[test]
    fn test_hue_of_wraps_into_range() {
        // Magenta-ish colors sit just below 360, never negative
        let hue = hue_of(255, 0, 128);
        assert!((0.0..360.0).contains(&hue));
        assert!(hue > 300.0);
    }

    #[test]
    fn test_bucket_indices_are_stable() {
        for (i, bucket) in ColorBucket::ALL.iter().enumerate() {
            assert_eq!(bucket.index(), i);
        }
    }
}
