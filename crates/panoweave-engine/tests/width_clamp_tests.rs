//! Tests output width policy end to end: reject below the floor, clamp
//! above the ceiling.

use panoweave_core::ImageBuffer;
use panoweave_engine::{ConversionRequest, Engine, EngineError, FailureKind, MAX_OUTPUT_WIDTH};

fn near_equirect_source() -> ImageBuffer {
    ImageBuffer::filled(4, 2, [9, 9, 9]).expect("source should be valid")
}

#[test]
fn width_clamp_tests_reject_width_one() {
    let engine = Engine::new();
    let error = engine
        .convert(ConversionRequest::new(near_equirect_source(), 1))
        .expect_err("width 1 should be rejected");

    assert!(matches!(error, EngineError::WidthTooSmall(1)));
    assert_eq!(error.kind(), FailureKind::InvalidInput);
}

#[test]
fn width_clamp_tests_accept_minimum_width() {
    let engine = Engine::new();
    let result = engine
        .convert(ConversionRequest::new(near_equirect_source(), 2))
        .expect("width 2 should convert");

    assert_eq!(result.width, 2);
    assert_eq!(result.height, 1);
}

#[test]
fn width_clamp_tests_clamp_above_ceiling() {
    let engine = Engine::new();
    let result = engine
        .convert(ConversionRequest::new(near_equirect_source(), 8193))
        .expect("over-ceiling width should clamp, not fail");

    assert_eq!(result.width, MAX_OUTPUT_WIDTH);
    assert_eq!(result.height, MAX_OUTPUT_WIDTH / 2);
    assert_eq!(
        result.image.as_bytes().len(),
        MAX_OUTPUT_WIDTH as usize * (MAX_OUTPUT_WIDTH / 2) as usize * 3
    );
}
