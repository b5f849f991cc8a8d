//! nokhwa-backed camera device.
//!
//! Maps the manual exposure and white-balance configuration onto camera
//! controls. The red/blue balance channels and the auto-white-balance
//! switch have no first-class names in nokhwa, so they are addressed
//! through their v4l2 control ids.

use std::path::Path;

use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, ControlValueSetter, FrameFormat, KnownCameraControl,
    RequestedFormat, RequestedFormatType,
};
use nokhwa::Camera;

use super::device::{list_devices, CameraDevice};
use super::types::{AppliedSettings, CameraConfig, CameraError};

/// v4l2 control id for the automatic white balance switch.
const CID_AUTO_WHITE_BALANCE: u128 = 0x0098_090c;

/// v4l2 control id for the red balance channel.
const CID_RED_BALANCE: u128 = 0x0098_090e;

/// v4l2 control id for the blue balance channel.
const CID_BLUE_BALANCE: u128 = 0x0098_090f;

/// Balance gains are floats in configuration but integer control values on
/// the wire.
const BALANCE_SCALE: f32 = 1000.0;

/// Device index of the rig camera. The rig has exactly one fixed camera.
const DEVICE_INDEX: u32 = 0;

/// The physical camera, configured for manual exposure and white balance.
///
/// Owns exclusive access to the hardware for its lifetime.
pub struct HardwareCamera {
    camera: Camera,
    config: CameraConfig,
}

impl HardwareCamera {
    /// Open the rig camera and apply the full manual configuration.
    ///
    /// Automatic white balance is disabled so the explicit gains take
    /// effect. Fails fast: any control the device rejects aborts the open;
    /// there is no retry.
    pub fn open(config: &CameraConfig) -> Result<Self, CameraError> {
        let devices = list_devices()?;
        if devices.is_empty() {
            return Err(CameraError::NoDevices);
        }
        if !devices.iter().any(|d| d.index == DEVICE_INDEX) {
            return Err(CameraError::DeviceNotFound(DEVICE_INDEX));
        }

        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            CameraFormat::new(
                nokhwa::utils::Resolution::new(config.resolution.width, config.resolution.height),
                FrameFormat::MJPEG,
                config.framerate,
            ),
        ));
        let mut camera = Camera::new(CameraIndex::Index(DEVICE_INDEX), requested)
            .map_err(|e| CameraError::OpenFailed(e.to_string()))?;

        apply_config(&mut camera, config)?;

        Ok(Self {
            camera,
            config: config.clone(),
        })
    }

    /// Read a control back as an integer, if the device reports one.
    fn control_integer(&self, control: KnownCameraControl) -> Option<i64> {
        match self.camera.camera_control(control) {
            Ok(ctrl) => match ctrl.value() {
                ControlValueSetter::Integer(value) => Some(value),
                _ => None,
            },
            Err(_) => None,
        }
    }
}

/// Disable the automatic algorithms and fix exposure and white balance.
fn apply_config(camera: &mut Camera, config: &CameraConfig) -> Result<(), CameraError> {
    set_control(
        camera,
        "auto white balance",
        KnownCameraControl::Other(CID_AUTO_WHITE_BALANCE),
        ControlValueSetter::Boolean(false),
    )?;
    set_control(
        camera,
        "red balance",
        KnownCameraControl::Other(CID_RED_BALANCE),
        ControlValueSetter::Integer((config.awb_red_gain * BALANCE_SCALE) as i64),
    )?;
    set_control(
        camera,
        "blue balance",
        KnownCameraControl::Other(CID_BLUE_BALANCE),
        ControlValueSetter::Integer((config.awb_blue_gain * BALANCE_SCALE) as i64),
    )?;
    set_control(
        camera,
        "shutter speed",
        KnownCameraControl::Exposure,
        ControlValueSetter::Integer(config.shutter_speed as i64),
    )?;

    // ISO 0 keeps the device's automatic gain.
    if config.iso > 0 {
        set_control(
            camera,
            "iso",
            KnownCameraControl::Gain,
            ControlValueSetter::Integer(config.iso as i64),
        )?;
    }

    Ok(())
}

fn set_control(
    camera: &mut Camera,
    name: &'static str,
    control: KnownCameraControl,
    value: ControlValueSetter,
) -> Result<(), CameraError> {
    camera
        .set_camera_control(control, value)
        .map_err(|e| CameraError::ControlFailed {
            control: name,
            message: e.to_string(),
        })
}

impl CameraDevice for HardwareCamera {
    fn start_preview(&mut self) -> Result<(), CameraError> {
        self.camera
            .open_stream()
            .map_err(|e| CameraError::PreviewFailed(e.to_string()))
    }

    fn stop_preview(&mut self) -> Result<(), CameraError> {
        self.camera
            .stop_stream()
            .map_err(|e| CameraError::PreviewFailed(e.to_string()))
    }

    fn capture_still(&mut self, path: &Path) -> Result<(), CameraError> {
        let buffer = self
            .camera
            .frame()
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;
        let frame: RgbImage = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;
        frame.save(path).map_err(|e| CameraError::WriteFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn applied_settings(&self) -> Result<AppliedSettings, CameraError> {
        // Fall back to the requested values for controls the backend cannot
        // read back.
        let iso = self
            .control_integer(KnownCameraControl::Gain)
            .map(|v| v as u32)
            .unwrap_or(self.config.iso);
        let exposure_speed = self
            .control_integer(KnownCameraControl::Exposure)
            .map(|v| v as u32)
            .unwrap_or(self.config.shutter_speed);
        let awb_red_gain = self
            .control_integer(KnownCameraControl::Other(CID_RED_BALANCE))
            .map(|v| v as f32 / BALANCE_SCALE)
            .unwrap_or(self.config.awb_red_gain);
        let awb_blue_gain = self
            .control_integer(KnownCameraControl::Other(CID_BLUE_BALANCE))
            .map(|v| v as f32 / BALANCE_SCALE)
            .unwrap_or(self.config.awb_blue_gain);

        Ok(AppliedSettings {
            iso,
            shutter_speed: self.config.shutter_speed,
            exposure_speed,
            awb_red_gain,
            awb_blue_gain,
        })
    }
}
