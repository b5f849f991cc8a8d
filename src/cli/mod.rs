//! Command-line interfaces for the capture and upload tools.

mod args;

pub use args::{parse_awb_gain, parse_resolution, CaptureArgs, UploadArgs};
