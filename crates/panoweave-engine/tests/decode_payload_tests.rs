//! Tests payload decoding and its failure classification.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage};
use panoweave_engine::{EngineError, FailureKind, decode_rgb_bytes};

#[test]
fn decode_payload_tests_round_trip_png_bytes() {
    let source = RgbImage::from_raw(2, 1, vec![10, 20, 30, 40, 50, 60]).unwrap();
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(source)
        .write_to(&mut bytes, ImageFormat::Png)
        .expect("encoding fixture should succeed");

    let decoded = decode_rgb_bytes(bytes.get_ref()).expect("decode should succeed");
    assert_eq!(decoded.width(), 2);
    assert_eq!(decoded.height(), 1);
    assert_eq!(decoded.pixel(0, 0), [10, 20, 30]);
    assert_eq!(decoded.pixel(1, 0), [40, 50, 60]);
}

#[test]
fn decode_payload_tests_classify_garbage_as_undecodable() {
    let error = decode_rgb_bytes(b"definitely not an image").expect_err("garbage must not decode");

    assert!(matches!(error, EngineError::Undecodable(_)));
    assert_eq!(error.kind(), FailureKind::UnsupportedOrUndecodable);
}
