//! CLI argument parsing with clap.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::camera::{
    Resolution, MAX_AWB_GAIN, MAX_ISO, MAX_SHUTTER_SPEED, SENSOR_MAX_HEIGHT, SENSOR_MAX_WIDTH,
};

/// Parse and validate a resolution (WIDTHxHEIGHT, bounded by the sensor).
pub fn parse_resolution(s: &str) -> Result<Resolution, String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid resolution format '{}'. Use WIDTHxHEIGHT (e.g., 2000x2000)",
            s
        ));
    }
    let width: u32 = parts[0]
        .parse()
        .map_err(|_| format!("Invalid width '{}' in resolution", parts[0]))?;
    let height: u32 = parts[1]
        .parse()
        .map_err(|_| format!("Invalid height '{}' in resolution", parts[1]))?;
    if width > SENSOR_MAX_WIDTH || height > SENSOR_MAX_HEIGHT {
        return Err(format!(
            "Resolution {}x{} exceeds the sensor maximum of {}x{}",
            width, height, SENSOR_MAX_WIDTH, SENSOR_MAX_HEIGHT
        ));
    }
    Ok(Resolution { width, height })
}

/// Parse and validate a white-balance gain (0.0-8.0).
pub fn parse_awb_gain(s: &str) -> Result<f32, String> {
    let gain: f32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(0.0..=MAX_AWB_GAIN).contains(&gain) {
        return Err(format!(
            "White-balance gain must be between 0.0 and {}, got {}",
            MAX_AWB_GAIN, gain
        ));
    }
    Ok(gain)
}

/// Preview the camera configuration, then capture a sequence of images into
/// a dataset
#[derive(Parser, Debug)]
#[command(name = "capture-images")]
#[command(version, about = "Preview the camera configuration, then capture a sequence of images into a dataset", long_about = None)]
pub struct CaptureArgs {
    /// Resolution of output images, WIDTHxHEIGHT
    #[arg(long, value_parser = parse_resolution, default_value = "2000x2000")]
    pub resolution: Resolution,

    /// ISO (film speed). Higher values brighten the image at the cost of
    /// noise; 0 keeps automatic gain
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(..=MAX_ISO as i64))]
    pub iso: u32,

    /// How long the shutter stays open per capture. Shorter is darker but
    /// freezes motion; longer sees more in dim light but can blur
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u32).range(..=MAX_SHUTTER_SPEED as i64))]
    pub shutter_speed: u32,

    /// Red white-balance gain. Tune together with --awb-blue-gain so a
    /// known white object renders white
    #[arg(long, value_parser = parse_awb_gain, default_value_t = 3.125)]
    pub awb_red_gain: f32,

    /// Blue white-balance gain
    #[arg(long, value_parser = parse_awb_gain, default_value_t = 1.96)]
    pub awb_blue_gain: f32,

    /// Seconds to display the preview before photo capturing starts
    #[arg(long, default_value_t = 10)]
    pub preview_time: u64,

    /// Ask whether the preview looked okay before the capture phase begins
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub prompt_on_timeout: bool,

    /// Directory all datasets are saved to. Should have ample disk space;
    /// defaults to the config file value
    #[arg(long)]
    pub datasets_location: Option<PathBuf>,

    /// Photos land in a directory with this name under --datasets-location
    #[arg(long, default_value = "faces")]
    pub dataset_name: String,

    /// The number of photos to take for this run
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub num_photos_to_take: u32,
}

/// Select captured datasets and stage them for upload
#[derive(Parser, Debug)]
#[command(name = "begin-dataset-upload")]
#[command(version, about = "Choose datasets and copy or zip them into the upload staging directory", long_about = None)]
pub struct UploadArgs {
    /// Top-level directory that contains all datasets. Must match the
    /// location used by capture-images
    #[arg(long)]
    pub datasets_location: Option<PathBuf>,

    /// Directory that staged datasets are written to for upload
    #[arg(long)]
    pub upload_location: Option<PathBuf>,

    /// Zip datasets instead of copying them
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    pub zip_uploads: bool,

    /// Number of packaging workers (defaults to available parallelism)
    #[arg(long)]
    pub workers: Option<usize>,
}
