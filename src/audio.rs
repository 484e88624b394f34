//! Audio engine: cpal output stream plus the two sound backends.
//!
//! The engine owns the output stream and the shared mixer. A trigger
//! either restarts a bucket's pre-loaded clip (Samples pack) or spawns
//! an independent synthesized voice (Synth pack); which one is decided
//! by the process-wide pack selection.

pub mod mixer;
pub mod voice;

use std::path::Path;
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::palette::ColorBucket;
use mixer::{Clip, Mixer};
use voice::{PatchBank, Voice};

/// The active strategy for turning buckets into sound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundPack {
    /// Pre-recorded clip per bucket
    Samples,
    /// Synthesized one-shot voice per bucket
    Synth,
}

/// Audio engine managing the output stream and trigger dispatch
pub struct AudioEngine {
    /// Shared mixing state (locked by the stream callback)
    mixer: Arc<Mutex<Mixer>>,

    /// Active sound pack
    pack: SoundPack,

    /// Voice recipes, built once at startup
    patches: PatchBank,

    /// Output sample rate (Hz)
    sample_rate: f32,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,
}

impl AudioEngine {
    /// Open the default output device, load sample clips, and start the
    /// stream. Clips that fail to load leave their bucket silent; that
    /// is reported once here and never treated as an error.
    pub fn new(samples_dir: &Path, pack: SoundPack) -> Result<Self, String> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or("No audio output device found")?;

        let config = device
            .default_output_config()
            .map_err(|e| format!("Failed to get audio config: {}", e))?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        println!(
            "Audio: {} @ {}Hz",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            config.sample_rate().0
        );

        let mut mixer = Mixer::new();
        for bucket in ColorBucket::ALL {
            let path = samples_dir.join(format!("{}.wav", bucket.name()));
            match Clip::load_wav(&path, sample_rate) {
                Ok(clip) => mixer.set_clip(bucket, Arc::new(clip)),
                Err(e) => eprintln!("Sample for {} unavailable, staying silent: {}", bucket.name(), e),
            }
        }

        let mixer = Arc::new(Mutex::new(mixer));
        let mixer_for_stream = Arc::clone(&mixer);

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    mixer_for_stream.lock().unwrap().render(data, channels);
                },
                |err| eprintln!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| format!("Failed to build audio stream: {}", e))?;

        stream
            .play()
            .map_err(|e| format!("Failed to start audio stream: {}", e))?;

        Ok(Self {
            mixer,
            pack,
            patches: PatchBank::new(),
            sample_rate,
            _stream: stream,
        })
    }

    /// Select the active sound pack (live, keeps everything else intact)
    pub fn set_pack(&mut self, pack: SoundPack) {
        if self.pack != pack {
            self.pack = pack;
            println!("Sound pack: {:?}", pack);
        }
    }

    /// Realize a bucket as audio through the active pack
    pub fn trigger(&self, bucket: ColorBucket) {
        let mut mixer = self.mixer.lock().unwrap();
        match self.pack {
            SoundPack::Samples => {
                mixer.play_clip(bucket);
            }
            SoundPack::Synth => {
                mixer.add_voice(Voice::new(self.patches.get(bucket), self.sample_rate));
            }
        }
    }
}
