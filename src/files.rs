//! Dataset file naming conventions.
//!
//! Image filenames embed the dataset name and a capture timestamp so that a
//! plain directory listing sorts in capture order.

use chrono::{DateTime, Local};

/// File extension used for captured images.
pub const IMAGE_EXTENSION: &str = "jpeg";

/// Timestamp pattern embedded in image filenames.
///
/// Fixed-width and lexicographically sortable, with microsecond precision
/// so back-to-back captures get distinct names.
pub const IMAGE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S-%6f";

/// Marker inserted into preview capture filenames so they can never be
/// mistaken for dataset images.
pub const PREVIEW_MARKER: &str = "PREVIEW";

/// Build the filename for a captured dataset image.
pub fn image_filename(dataset_name: &str, capture_time: DateTime<Local>) -> String {
    format!(
        "{}_{}.{}",
        dataset_name,
        capture_time.format(IMAGE_TIMESTAMP_FORMAT),
        IMAGE_EXTENSION
    )
}

/// Build the filename for a throwaway preview capture.
///
/// Preview captures are always deleted before the capture tool returns.
pub fn preview_filename(dataset_name: &str, capture_time: DateTime<Local>) -> String {
    format!(
        "{}_{}_{}.{}",
        dataset_name,
        PREVIEW_MARKER,
        capture_time.format(IMAGE_TIMESTAMP_FORMAT),
        IMAGE_EXTENSION
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time(micros: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 30, 5).unwrap()
            + chrono::Duration::microseconds(i64::from(micros))
    }

    #[test]
    fn test_image_filename_format() {
        let name = image_filename("faces", fixed_time(0));
        assert_eq!(name, "faces_2024-03-09_14-30-05-000000.jpeg");
    }

    #[test]
    fn test_preview_filename_contains_marker() {
        let name = preview_filename("faces", fixed_time(0));
        assert_eq!(name, "faces_PREVIEW_2024-03-09_14-30-05-000000.jpeg");
        assert!(name.contains(PREVIEW_MARKER));
    }

    #[test]
    fn test_filenames_distinct_per_microsecond() {
        let first = image_filename("faces", fixed_time(1));
        let second = image_filename("faces", fixed_time(2));
        assert_ne!(first, second);
    }

    #[test]
    fn test_filenames_sort_in_capture_order() {
        let earlier = image_filename("faces", fixed_time(9));
        let later = image_filename("faces", fixed_time(10));
        assert!(earlier < later);
    }
}
