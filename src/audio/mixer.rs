//! Additive mixer: sample-clip players plus live synth voices.
//!
//! Runs inside the cpal output callback. One clip player exists per
//! bucket, so a clip can never overlap itself (retriggering restarts it
//! from the beginning); synth voices are unbounded and overlap freely,
//! limited only by the trigger cooldown upstream.

use std::path::Path;
use std::sync::Arc;

use crate::audio::voice::Voice;
use crate::palette::ColorBucket;
use crate::params::audio_constants::OUTPUT_CLAMP;

/// A pre-loaded audio clip: mono samples at the output rate
pub struct Clip {
    samples: Vec<f32>,
}

impl Clip {
    pub fn from_samples(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    /// Load a WAV file, downmix to mono, and resample to `output_rate`.
    pub fn load_wav(path: &Path, output_rate: f32) -> Result<Self, String> {
        let mut reader = hound::WavReader::open(path)
            .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
        let spec = reader.spec();
        let channels = spec.channels as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?,
            hound::SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<Result<_, _>>()
                    .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?
            }
        };

        if interleaved.is_empty() || channels == 0 {
            return Err(format!("{}: no audio data", path.display()));
        }

        let mono: Vec<f32> = interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();

        Ok(Self {
            samples: resample(&mono, spec.sample_rate as f32, output_rate),
        })
    }

}

/// Linear resampling, good enough for short trigger clips
fn resample(input: &[f32], from_rate: f32, to_rate: f32) -> Vec<f32> {
    if (from_rate - to_rate).abs() < f32::EPSILON || input.is_empty() {
        return input.to_vec();
    }
    let ratio = from_rate / to_rate;
    let out_len = (input.len() as f32 / ratio) as usize;
    (0..out_len)
        .map(|i| {
            let pos = i as f32 * ratio;
            let idx = pos as usize;
            let frac = pos - idx as f32;
            let a = input[idx.min(input.len() - 1)];
            let b = input[(idx + 1).min(input.len() - 1)];
            a + (b - a) * frac
        })
        .collect()
}

/// Playback head for one bucket's clip
#[derive(Default)]
struct ClipPlayer {
    position: usize,
    active: bool,
}

/// Shared mixing state, owned behind `Arc<Mutex<_>>` by the audio engine
pub struct Mixer {
    clips: [Option<Arc<Clip>>; 6],
    players: [ClipPlayer; 6],
    voices: Vec<Voice>,
}

impl Mixer {
    pub fn new() -> Self {
        Self {
            clips: Default::default(),
            players: Default::default(),
            voices: Vec::new(),
        }
    }

    /// Install a bucket's clip
    pub fn set_clip(&mut self, bucket: ColorBucket, clip: Arc<Clip>) {
        self.clips[bucket.index()] = Some(clip);
    }

    /// Start (or restart) a bucket's clip from the beginning.
    ///
    /// An unloaded (or empty) bucket is a silent no-op; a clip already
    /// playing is stopped first by the position reset, so the same clip
    /// never overlaps itself. Returns whether playback actually started.
    pub fn play_clip(&mut self, bucket: ColorBucket) -> bool {
        match &self.clips[bucket.index()] {
            Some(clip) if !clip.samples.is_empty() => {
                let player = &mut self.players[bucket.index()];
                player.position = 0;
                player.active = true;
                true
            }
            _ => false,
        }
    }

    pub fn clip_playing(&self, bucket: ColorBucket) -> bool {
        self.players[bucket.index()].active
    }

    /// Add an independent synth voice
    pub fn add_voice(&mut self, voice: Voice) {
        self.voices.push(voice);
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Render `frames` interleaved frames into `out` and advance all
    /// playback heads. Finished voices are swept out afterwards.
    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        let frames = out.len() / channels;
        for frame in 0..frames {
            let mut sample = 0.0;

            for (slot, player) in self.players.iter_mut().enumerate() {
                if !player.active {
                    continue;
                }
                if let Some(clip) = &self.clips[slot] {
                    sample += clip.samples[player.position];
                    player.position += 1;
                    if player.position >= clip.samples.len() {
                        player.active = false;
                    }
                }
            }

            for voice in &mut self.voices {
                sample += voice.next_sample();
            }

            // Safety limiter: hard clip to prevent ear damage
            sample = sample.clamp(-OUTPUT_CLAMP, OUTPUT_CLAMP);
            for ch in 0..channels {
                out[frame * channels + ch] = sample;
            }
        }

        self.voices.retain(|v| !v.finished());
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::voice::{patch_for, Voice};

    fn ramp_clip(len: usize) -> Arc<Clip> {
        Arc::new(Clip::from_samples((0..len).map(|i| i as f32 * 0.01).collect()))
    }

    #[test]
    fn test_unloaded_clip_is_silent_noop() {
        let mut mixer = Mixer::new();
        assert!(!mixer.play_clip(ColorBucket::Red));
        assert!(!mixer.clip_playing(ColorBucket::Red));

        let mut out = vec![1.0f32; 8];
        mixer.render(&mut out, 2);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_retrigger_restarts_clip_without_overlap() {
        let mut mixer = Mixer::new();
        mixer.set_clip(ColorBucket::Red, ramp_clip(100));

        assert!(mixer.play_clip(ColorBucket::Red));
        let mut out = vec![0.0f32; 20];
        mixer.render(&mut out, 1);
        // Ramp starts at 0.0 and climbs
        assert_eq!(out[0], 0.0);
        assert!((out[10] - 0.10).abs() < 1e-6);

        // Retrigger: playback restarts from the beginning, one instance
        assert!(mixer.play_clip(ColorBucket::Red));
        let mut out2 = vec![0.0f32; 4];
        mixer.render(&mut out2, 1);
        assert_eq!(out2[0], 0.0);
        assert!((out2[1] - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_empty_clip_never_starts() {
        let mut mixer = Mixer::new();
        mixer.set_clip(ColorBucket::Red, Arc::new(Clip::from_samples(Vec::new())));

        assert!(!mixer.play_clip(ColorBucket::Red));
        assert!(!mixer.clip_playing(ColorBucket::Red));

        // Rendering must stay a no-op rather than index into nothing
        let mut out = vec![0.0f32; 8];
        mixer.render(&mut out, 1);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_clip_player_stops_at_end() {
        let mut mixer = Mixer::new();
        mixer.set_clip(ColorBucket::Blue, ramp_clip(10));
        mixer.play_clip(ColorBucket::Blue);

        let mut out = vec![0.0f32; 16];
        mixer.render(&mut out, 1);
        assert!(!mixer.clip_playing(ColorBucket::Blue));
        // Tail past the clip is silence
        assert!(out[12..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_overlapping_voices_coexist_and_expire() {
        let mut mixer = Mixer::new();
        let rate = 1000.0; // keep the test cheap

        // Red lasts 100ms = 100 samples at this rate
        mixer.add_voice(Voice::new(patch_for(ColorBucket::Red).into(), rate));
        mixer.add_voice(Voice::new(patch_for(ColorBucket::Red).into(), rate));
        assert_eq!(mixer.active_voices(), 2);

        let mut out = vec![0.0f32; 50];
        mixer.render(&mut out, 1);
        assert_eq!(mixer.active_voices(), 2);

        let mut out = vec![0.0f32; 60];
        mixer.render(&mut out, 1);
        // Both voices played out their lifetime and were swept
        assert_eq!(mixer.active_voices(), 0);
    }

    #[test]
    fn test_output_is_hard_clipped() {
        let mut mixer = Mixer::new();
        mixer.set_clip(ColorBucket::Red, Arc::new(Clip::from_samples(vec![2.0; 8])));
        mixer.set_clip(ColorBucket::Green, Arc::new(Clip::from_samples(vec![2.0; 8])));
        mixer.play_clip(ColorBucket::Red);
        mixer.play_clip(ColorBucket::Green);

        let mut out = vec![0.0f32; 8];
        mixer.render(&mut out, 1);
        assert!(out.iter().all(|&s| s <= OUTPUT_CLAMP));
    }

    #[test]
    fn test_resample_halves_length_for_double_rate() {
        let input: Vec<f32> = (0..100).map(|i| i as f32).collect();
        let out = resample(&input, 88_200.0, 44_100.0);
        assert_eq!(out.len(), 50);
        // Every other sample of a linear ramp
        assert!((out[10] - 20.0).abs() < 1e-3);
    }
}
