//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::audio::SoundPack;
use crate::params::{CaptureConfig, GridConfig, TriggerConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Chromaphone")]
#[command(about = "Turns webcam colors into sound", long_about = None)]
pub struct Args {
    /// Sound pack: samples (default) or synth
    #[arg(long, value_name = "PACK", default_value = "samples")]
    pub pack: String,

    /// Minimum gap between triggers at one probe point (milliseconds)
    #[arg(long, value_name = "MS", default_value = "100")]
    pub cooldown_ms: u64,

    /// Camera device index
    #[arg(long, value_name = "INDEX", default_value = "0")]
    pub camera: u32,

    /// Rendered size of one grid cell (pixels)
    #[arg(long, value_name = "PX", default_value = "20")]
    pub scale: u32,

    /// Directory holding red.wav .. pink.wav for the samples pack
    #[arg(long, value_name = "DIR", default_value = "samples")]
    pub samples_dir: PathBuf,
}

impl Args {
    /// Parse the sound pack selection
    pub fn parse_pack(&self) -> SoundPack {
        match self.pack.to_lowercase().as_str() {
            "synth" => {
                println!("Sound pack: Synth (one-shot voices)");
                SoundPack::Synth
            }
            "samples" => {
                println!("Sound pack: Samples ({})", self.samples_dir.display());
                SoundPack::Samples
            }
            other => {
                eprintln!("Warning: Unknown sound pack '{}', using samples", other);
                SoundPack::Samples
            }
        }
    }

    pub fn grid_config(&self) -> GridConfig {
        GridConfig {
            cell_size_px: self.scale.max(1),
        }
    }

    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            camera_index: self.camera,
            ..Default::default()
        }
    }

    pub fn trigger_config(&self) -> TriggerConfig {
        TriggerConfig {
            cooldown_ms: self.cooldown_ms,
        }
    }
}
