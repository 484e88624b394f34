//! Webcam capture via nokhwa.
//!
//! Delivers RGBA frames at (roughly) the requested small resolution.
//! The device is opened only on the explicit start action, and a feed
//! that has no frame yet simply yields nothing for that tick.

use nokhwa::pixel_format::RgbAFormat;
use nokhwa::utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;

use crate::params::CaptureConfig;

/// A captured frame: interleaved RGBA bytes plus dimensions
pub struct Frame {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Live camera feed
pub struct CameraFeed {
    camera: Camera,
    /// Most recent decoded frame, reused while the device has nothing newer
    latest: Option<Frame>,
}

impl CameraFeed {
    /// Open the capture device and start streaming.
    ///
    /// The driver picks the format closest to the requested one; the
    /// actual frame size is whatever the device delivers, and the grid
    /// downsampling copes with any size.
    pub fn open(config: &CaptureConfig) -> Result<Self, String> {
        let format = CameraFormat::new_from(config.width, config.height, FrameFormat::MJPEG, 30);
        let requested = RequestedFormat::new::<RgbAFormat>(RequestedFormatType::Closest(format));

        let mut camera = Camera::new(CameraIndex::Index(config.camera_index), requested)
            .map_err(|e| format!("Failed to open camera {}: {}", config.camera_index, e))?;

        camera
            .open_stream()
            .map_err(|e| format!("Failed to start camera stream: {}", e))?;

        println!(
            "Camera: {} @ {}x{}",
            camera.info().human_name(),
            camera.resolution().width(),
            camera.resolution().height()
        );

        Ok(Self {
            camera,
            latest: None,
        })
    }

    /// Fetch the newest frame, if any.
    ///
    /// A device that is still warming up (or a transiently failed grab)
    /// returns the last good frame, or `None` before the first one
    /// arrives. Decode errors are treated the same way.
    pub fn poll(&mut self) -> Option<&Frame> {
        if let Ok(buffer) = self.camera.frame() {
            if let Ok(decoded) = buffer.decode_image::<RgbAFormat>() {
                self.latest = Some(Frame {
                    width: decoded.width(),
                    height: decoded.height(),
                    pixels: decoded.into_raw(),
                });
            }
        }
        self.latest.as_ref()
    }
}
