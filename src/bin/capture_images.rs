//! Capture tool entry point.
//!
//! Configures the camera, shows the preview gate, and captures a run of
//! images into the dataset directory. Exits cleanly both on completion and
//! when the operator rejects the preview.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::{error, info, warn};

use portrait_kit::camera::{configure_camera, verify_camera_config, CameraConfig};
use portrait_kit::capture::{
    capture_dataset, prepare_images_directory, setup_interrupt_handler,
    PREVIEW_CAPTURE_GRACE_PERIOD,
};
use portrait_kit::cli::CaptureArgs;
use portrait_kit::config::Config;
use portrait_kit::files::preview_filename;
use portrait_kit::prompt::TerminalPrompt;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CaptureArgs::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: CaptureArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(None)?;
    let datasets_location = config.resolve_datasets_location(args.datasets_location.clone());

    setup_interrupt_handler()?;

    let images_directory = prepare_images_directory(&datasets_location, &args.dataset_name)?;

    let camera_config = CameraConfig {
        resolution: args.resolution,
        iso: args.iso,
        shutter_speed: args.shutter_speed,
        awb_red_gain: args.awb_red_gain,
        awb_blue_gain: args.awb_blue_gain,
        ..CameraConfig::default()
    };

    let mut session = configure_camera(&camera_config)?;
    info!("Camera configured. Opening preview.");

    let preview_path =
        images_directory.join(preview_filename(&args.dataset_name, chrono::Local::now()));
    let mut prompt = TerminalPrompt::new();

    let approved = verify_camera_config(
        &mut session,
        Duration::from_secs(args.preview_time),
        args.prompt_on_timeout,
        &preview_path,
        &mut prompt,
    )?;

    if !approved {
        info!("Camera config rejected after preview. Exiting.");
        return Ok(());
    }

    let report = capture_dataset(
        &mut session,
        &images_directory,
        &args.dataset_name,
        args.num_photos_to_take,
        PREVIEW_CAPTURE_GRACE_PERIOD,
    )?;

    if report.interrupted {
        warn!(
            "Run stopped early; {} images are in {}.",
            report.captured,
            images_directory.display()
        );
    }

    Ok(())
}
