//! One-shot synthesized voices.
//!
//! A voice is a transient value: a stack of oscillator/noise layers,
//! each shaped by its own ADSR envelope, with a fixed lifetime in
//! samples. The mixer renders voices to exhaustion and sweeps the
//! finished ones out; there are no timers or callbacks involved, so
//! lifetimes are deterministic and testable with a sample counter.

use std::f32::consts::TAU;
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::palette::ColorBucket;

/// Basic oscillator shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Saw,
    Triangle,
}

/// Signal source for one voice layer
#[derive(Debug, Clone, Copy)]
pub enum Source {
    /// Oscillator, optionally sweeping from `start_hz` to `end_hz`
    /// over the first `sweep_s` seconds (start == end means no sweep)
    Osc {
        wave: Waveform,
        start_hz: f32,
        end_hz: f32,
        sweep_s: f32,
    },
    WhiteNoise,
    PinkNoise,
}

impl Source {
    fn osc(wave: Waveform, hz: f32) -> Self {
        Source::Osc {
            wave,
            start_hz: hz,
            end_hz: hz,
            sweep_s: 0.0,
        }
    }

    /// Instantaneous frequency at voice time `t` (oscillators only)
    pub fn frequency_at(&self, t: f32) -> f32 {
        match self {
            Source::Osc {
                start_hz,
                end_hz,
                sweep_s,
                ..
            } => {
                if *sweep_s > 0.0 && t < *sweep_s {
                    start_hz + (end_hz - start_hz) * t / sweep_s
                } else {
                    *end_hz
                }
            }
            _ => 0.0,
        }
    }
}

/// ADSR amplitude envelope with a peak level
#[derive(Debug, Clone, Copy)]
pub struct Envelope {
    pub attack_s: f32,
    pub decay_s: f32,
    /// Sustain level as a fraction of `peak` (0..1)
    pub sustain: f32,
    pub release_s: f32,
    /// Peak amplitude reached at the end of the attack
    pub peak: f32,
}

impl Envelope {
    pub const fn new(attack_s: f32, decay_s: f32, sustain: f32, release_s: f32, peak: f32) -> Self {
        Self {
            attack_s,
            decay_s,
            sustain,
            release_s,
            peak,
        }
    }

    /// Envelope level at voice time `t`, for a voice lasting `total_s`.
    ///
    /// The release ramp occupies the final `release_s` of the lifetime,
    /// multiplying whatever the ADS stage has reached, so the voice
    /// always ends at zero amplitude.
    pub fn level(&self, t: f32, total_s: f32) -> f32 {
        if t < 0.0 || t >= total_s {
            return 0.0;
        }

        let ads = if t < self.attack_s {
            self.peak * t / self.attack_s
        } else if t < self.attack_s + self.decay_s {
            let frac = (t - self.attack_s) / self.decay_s;
            self.peak + (self.sustain * self.peak - self.peak) * frac
        } else {
            self.sustain * self.peak
        };

        let release_start = (total_s - self.release_s).max(0.0);
        if t > release_start && self.release_s > 0.0 {
            let frac = (t - release_start) / self.release_s;
            ads * (1.0 - frac).max(0.0)
        } else {
            ads
        }
    }
}

/// One layer of a patch: a source, its envelope, and a relative gain
#[derive(Debug, Clone, Copy)]
pub struct Layer {
    pub source: Source,
    pub env: Envelope,
    pub gain: f32,
}

/// Recipe for a voice: layers plus total lifetime
#[derive(Debug, Clone)]
pub struct Patch {
    pub layers: Vec<Layer>,
    /// Auto-stop time (seconds); the voice is finished after this
    pub duration_s: f32,
}

/// Build the patch for a bucket.
pub fn patch_for(bucket: ColorBucket) -> Patch {
    match bucket {
        // Snare-ish noise burst
        ColorBucket::Red => Patch {
            layers: vec![Layer {
                source: Source::WhiteNoise,
                env: Envelope::new(0.001, 0.05, 0.0, 0.05, 0.3),
                gain: 1.0,
            }],
            duration_s: 0.1,
        },
        // Kick: sine dropping 150 -> 50 Hz
        ColorBucket::Yellow => Patch {
            layers: vec![Layer {
                source: Source::Osc {
                    wave: Waveform::Sine,
                    start_hz: 150.0,
                    end_hz: 50.0,
                    sweep_s: 0.1,
                },
                env: Envelope::new(0.001, 0.2, 0.0, 0.1, 0.5),
                gain: 1.0,
            }],
            duration_s: 0.3,
        },
        // Low growl
        ColorBucket::Green => Patch {
            layers: vec![Layer {
                source: Source::osc(Waveform::Saw, 55.0),
                env: Envelope::new(0.01, 0.1, 0.3, 0.2, 0.3),
                gain: 1.0,
            }],
            duration_s: 0.4,
        },
        // Soft pluck
        ColorBucket::Blue => Patch {
            layers: vec![Layer {
                source: Source::osc(Waveform::Triangle, 220.0),
                env: Envelope::new(0.05, 0.1, 0.4, 0.3, 0.2),
                gain: 1.0,
            }],
            duration_s: 0.5,
        },
        // Bell: fundamental plus a quiet octave overtone
        ColorBucket::Purple => Patch {
            layers: vec![
                Layer {
                    source: Source::osc(Waveform::Sine, 262.0),
                    env: Envelope::new(0.01, 0.3, 0.1, 0.2, 0.25),
                    gain: 1.0,
                },
                Layer {
                    source: Source::osc(Waveform::Sine, 524.0),
                    env: Envelope::new(0.01, 0.3, 0.1, 0.2, 0.25),
                    gain: 0.3,
                },
            ],
            duration_s: 0.5,
        },
        // Hat: filtered noise over a short triangle tick
        ColorBucket::Pink => Patch {
            layers: vec![
                Layer {
                    source: Source::PinkNoise,
                    env: Envelope::new(0.001, 0.1, 0.0, 0.1, 0.3),
                    gain: 1.0,
                },
                Layer {
                    source: Source::osc(Waveform::Triangle, 180.0),
                    env: Envelope::new(0.001, 0.05, 0.0, 0.05, 0.2),
                    gain: 1.0,
                },
            ],
            duration_s: 0.2,
        },
    }
}

/// Pre-constructed patches for all buckets, built once when the synth
/// pack starts
pub struct PatchBank {
    patches: [Arc<Patch>; 6],
}

impl PatchBank {
    pub fn new() -> Self {
        Self {
            patches: ColorBucket::ALL.map(|b| Arc::new(patch_for(b))),
        }
    }

    pub fn get(&self, bucket: ColorBucket) -> Arc<Patch> {
        Arc::clone(&self.patches[bucket.index()])
    }
}

impl Default for PatchBank {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-layer runtime state
struct LayerState {
    /// Oscillator phase in cycles [0, 1)
    phase: f32,
    /// One-pole lowpass state for pink noise
    pink: f32,
}

/// A live voice: one patch instance playing to exhaustion
pub struct Voice {
    patch: Arc<Patch>,
    states: Vec<LayerState>,
    rng: SmallRng,
    sample_rate: f32,
    position: u64,
    total_samples: u64,
}

impl Voice {
    pub fn new(patch: Arc<Patch>, sample_rate: f32) -> Self {
        let total_samples = (patch.duration_s * sample_rate) as u64;
        let states = patch
            .layers
            .iter()
            .map(|_| LayerState {
                phase: 0.0,
                pink: 0.0,
            })
            .collect();
        Self {
            patch,
            states,
            rng: SmallRng::from_entropy(),
            sample_rate,
            position: 0,
            total_samples,
        }
    }

    /// True once the voice has played out its full lifetime
    pub fn finished(&self) -> bool {
        self.position >= self.total_samples
    }

    /// Render the next mono sample and advance the voice
    pub fn next_sample(&mut self) -> f32 {
        if self.finished() {
            return 0.0;
        }

        let t = self.position as f32 / self.sample_rate;
        self.position += 1;

        let mut sample = 0.0;
        for (layer, state) in self.patch.layers.iter().zip(self.states.iter_mut()) {
            let raw = match layer.source {
                Source::Osc { wave, .. } => {
                    let hz = layer.source.frequency_at(t);
                    state.phase = (state.phase + hz / self.sample_rate).fract();
                    oscillate(wave, state.phase)
                }
                Source::WhiteNoise => self.rng.gen_range(-1.0..1.0),
                Source::PinkNoise => {
                    // One-pole lowpass over white noise
                    let white: f32 = self.rng.gen_range(-1.0..1.0);
                    state.pink = state.pink * 0.98 + white * 0.02;
                    (state.pink * 3.5).clamp(-1.0, 1.0)
                }
            };

            sample += raw * layer.env.level(t, self.patch.duration_s) * layer.gain;
        }
        sample
    }
}

/// Evaluate a waveform at a phase in cycles [0, 1)
fn oscillate(wave: Waveform, phase: f32) -> f32 {
    match wave {
        Waveform::Sine => (phase * TAU).sin(),
        Waveform::Saw => 2.0 * phase - 1.0,
        Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kick_sweep_drops_150_to_50() {
        let patch = patch_for(ColorBucket::Yellow);
        let source = patch.layers[0].source;

        assert_eq!(source.frequency_at(0.0), 150.0);
        assert_eq!(source.frequency_at(0.05), 100.0);
        assert_eq!(source.frequency_at(0.1), 50.0);
        // Holds the end frequency after the sweep
        assert_eq!(source.frequency_at(0.25), 50.0);
    }

    #[test]
    fn test_envelope_shape() {
        let env = Envelope::new(0.01, 0.1, 0.3, 0.2, 0.3);
        let total = 0.4;

        // Mid-attack: halfway to peak
        assert!((env.level(0.005, total) - 0.15).abs() < 1e-4);
        // End of decay: sustain level
        assert!((env.level(0.11, total) - 0.09).abs() < 1e-4);
        // Past the lifetime: silent
        assert_eq!(env.level(0.4, total), 0.0);
        assert_eq!(env.level(0.5, total), 0.0);
    }

    #[test]
    fn test_envelope_release_reaches_zero() {
        let env = Envelope::new(0.001, 0.05, 0.0, 0.05, 0.3);
        let near_end = env.level(0.0999, 0.1);
        assert!(near_end < 0.01);
    }

    #[test]
    fn test_voice_finishes_after_its_lifetime() {
        let patch = Arc::new(patch_for(ColorBucket::Red));
        let mut voice = Voice::new(patch, 44_100.0);

        // 100ms at 44.1kHz = 4410 samples
        for _ in 0..4410 {
            assert!(!voice.finished());
            voice.next_sample();
        }
        assert!(voice.finished());
        assert_eq!(voice.next_sample(), 0.0);
    }

    #[test]
    fn test_voice_amplitude_stays_under_peak() {
        let patch = Arc::new(patch_for(ColorBucket::Yellow));
        let mut voice = Voice::new(patch, 44_100.0);

        while !voice.finished() {
            let s = voice.next_sample();
            assert!(s.abs() <= 0.5 + 1e-4);
        }
    }

    #[test]
    fn test_bell_has_fundamental_and_overtone() {
        let patch = patch_for(ColorBucket::Purple);
        assert_eq!(patch.layers.len(), 2);
        assert_eq!(patch.layers[0].source.frequency_at(0.0), 262.0);
        assert_eq!(patch.layers[1].source.frequency_at(0.0), 524.0);
        // Overtone is the quiet layer
        assert!(patch.layers[1].gain < patch.layers[0].gain);
    }

    #[test]
    fn test_patch_bank_covers_all_buckets() {
        let bank = PatchBank::new();
        for bucket in ColorBucket::ALL {
            let patch = bank.get(bucket);
            assert!(!patch.layers.is_empty());
            assert!(patch.duration_s > 0.0);
        }
    }

    #[test]
    fn test_oscillate_waveform_ranges() {
        for wave in [Waveform::Sine, Waveform::Saw, Waveform::Triangle] {
            for i in 0..100 {
                let v = oscillate(wave, i as f32 / 100.0);
                assert!((-1.0..=1.0).contains(&v));
            }
        }
        // Triangle peaks at mid-phase
        assert_eq!(oscillate(Waveform::Triangle, 0.5), 1.0);
        assert_eq!(oscillate(Waveform::Saw, 0.0), -1.0);
    }
}
