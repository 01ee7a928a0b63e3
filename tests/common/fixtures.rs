use counterscan::{EditorState, Point, PointSetName, SelectionMode};
use image::{DynamicImage, ImageBuffer, Rgb};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// A 200x100 grey image, large enough for the outlines used in tests
pub fn test_image() -> DynamicImage {
    DynamicImage::ImageRgb8(ImageBuffer::from_fn(200, 100, |_, _| Rgb([128u8, 128u8, 128u8])))
}

/// Writes `test_image` to a temp PNG. The file is removed when dropped.
pub fn create_test_image_file() -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    test_image()
        .save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}

/// Writes `contents` to a temp file with the given suffix
pub fn write_temp_file(suffix: &str, contents: &str) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    std::fs::write(file.path(), contents).expect("Failed to write temp file");
    file
}

/// Editor with the test image loaded and no points
pub fn editor_with_image() -> EditorState {
    EditorState::new().load_image(Arc::new(test_image()))
}

/// Adds `points` to `set` in order, switching the mode first
pub fn with_points(state: EditorState, set: PointSetName, points: &[(f32, f32)]) -> EditorState {
    let mut state = state.set_mode(SelectionMode::from(set));
    for &(x, y) in points {
        state = state
            .add_point(Point::new(x, y))
            .expect("mode is set, add_point must succeed");
    }
    state
}
