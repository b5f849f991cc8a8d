//! Camera access: configuration, scoped sessions, and the preview gate.
//!
//! This module provides the capture tool's camera layer:
//! - Device enumeration via [`list_devices`]
//! - Hardware access via [`HardwareCamera`] behind the [`CameraDevice`] trait
//! - Scoped ownership via [`CameraSession`] (preview always stopped on drop)
//! - The approve/reject checkpoint via [`verify_camera_config`]

mod device;
mod hardware;
mod preview;
mod session;
mod types;

#[cfg(test)]
pub mod testing;

pub use device::{list_devices, CameraDevice, CameraInfo};
pub use hardware::HardwareCamera;
pub use preview::{verify_camera_config, PreviewError};
pub use session::{configure_camera, CameraSession};
pub use types::{
    AppliedSettings, CameraConfig, CameraError, Resolution, DEFAULT_FRAMERATE, MAX_AWB_GAIN,
    MAX_ISO, MAX_SHUTTER_SPEED, SENSOR_MAX_HEIGHT, SENSOR_MAX_WIDTH,
};
