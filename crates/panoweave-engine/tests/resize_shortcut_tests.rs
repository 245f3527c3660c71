//! Tests the fast resize path for near-2:1 sources.

use panoweave_core::{ImageBuffer, ProjectionFormat};
use panoweave_engine::{ConversionRequest, Engine};

/// 202x100 source (ratio 2.02, inside the shortcut tolerance): red top
/// half, blue bottom half.
fn banded_source() -> ImageBuffer {
    let width = 202u32;
    let height = 100u32;
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        let color: [u8; 3] = if y < height / 2 { [255, 0, 0] } else { [0, 0, 255] };
        for _ in 0..width {
            rgb.extend_from_slice(&color);
        }
    }
    ImageBuffer::new(width, height, rgb).expect("source should be valid")
}

#[test]
fn resize_shortcut_tests_preserve_band_structure() {
    let engine = Engine::new();
    let result = engine
        .convert(ConversionRequest::new(banded_source(), 64))
        .expect("conversion should succeed");

    assert_eq!(result.width, 64);
    assert_eq!(result.height, 32);

    // A direct resize keeps the bands horizontal all the way to the poles;
    // the projection path would bend them.
    assert_eq!(result.image.pixel(0, 0), [255, 0, 0]);
    assert_eq!(result.image.pixel(63, 0), [255, 0, 0]);
    assert_eq!(result.image.pixel(0, 31), [0, 0, 255]);
    assert_eq!(result.image.pixel(63, 31), [0, 0, 255]);
}

#[test]
fn resize_shortcut_tests_record_classifier_hint() {
    let engine = Engine::new();
    let result = engine
        .convert(ConversionRequest::new(banded_source(), 64))
        .expect("conversion should succeed");

    assert_eq!(result.source_format, Some(ProjectionFormat::Equirectangular));
}

#[test]
fn resize_shortcut_tests_default_width_is_4096() {
    let request = ConversionRequest::with_default_width(banded_source());
    assert_eq!(request.output_width, panoweave_engine::DEFAULT_OUTPUT_WIDTH);
}
