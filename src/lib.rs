//! Chromaphone library - webcam colors turned into sound

pub mod audio;
pub mod capture;
pub mod grid;
pub mod palette;
pub mod params;
pub mod rendering;
pub mod session;
pub mod trigger;
