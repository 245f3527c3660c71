//! Tests cubemap projection geometry and its preconditions.

use panoweave_core::ImageBuffer;
use panoweave_project::{ProjectError, project_cubemap_to_equirect};

fn uniform_faces(side: u32) -> [ImageBuffer; 6] {
    [
        ImageBuffer::filled(side, side, [255, 0, 0]).unwrap(), // front
        ImageBuffer::filled(side, side, [0, 255, 0]).unwrap(), // right
        ImageBuffer::filled(side, side, [0, 0, 255]).unwrap(), // back
        ImageBuffer::filled(side, side, [255, 255, 0]).unwrap(), // left
        ImageBuffer::filled(side, side, [255, 255, 255]).unwrap(), // up
        ImageBuffer::filled(side, side, [0, 0, 0]).unwrap(),   // down
    ]
}

#[test]
fn cubemap_projection_tests_cover_equator_and_poles() {
    let output = project_cubemap_to_equirect(&uniform_faces(16), 256)
        .expect("projection should succeed");

    assert_eq!(output.width(), 256);
    assert_eq!(output.height(), 128);

    assert_eq!(output.pixel(128, 64), [255, 0, 0]); // forward
    assert_eq!(output.pixel(192, 64), [0, 255, 0]); // right
    assert_eq!(output.pixel(0, 64), [0, 0, 255]); // back
    assert_eq!(output.pixel(64, 64), [255, 255, 0]); // left
    assert_eq!(output.pixel(128, 0), [255, 255, 255]); // up
    assert_eq!(output.pixel(128, 127), [0, 0, 0]); // down
}

#[test]
fn cubemap_projection_tests_every_output_pixel_is_written() {
    // Uniform gray cube: every direction must land inside some face, so the
    // whole panorama is gray with no unwritten pixels.
    let faces = [
        ImageBuffer::filled(8, 8, [77, 77, 77]).unwrap(),
        ImageBuffer::filled(8, 8, [77, 77, 77]).unwrap(),
        ImageBuffer::filled(8, 8, [77, 77, 77]).unwrap(),
        ImageBuffer::filled(8, 8, [77, 77, 77]).unwrap(),
        ImageBuffer::filled(8, 8, [77, 77, 77]).unwrap(),
        ImageBuffer::filled(8, 8, [77, 77, 77]).unwrap(),
    ];
    let output = project_cubemap_to_equirect(&faces, 64).expect("projection should succeed");

    assert!(output.as_bytes().iter().all(|&byte| byte == 77));
}

#[test]
fn cubemap_projection_tests_reject_mismatched_faces() {
    let mut faces = uniform_faces(16);
    faces[3] = ImageBuffer::filled(16, 12, [0, 0, 0]).unwrap();

    let error = project_cubemap_to_equirect(&faces, 64)
        .expect_err("non-square face must be rejected");
    assert!(matches!(
        error,
        ProjectError::FaceGeometry {
            expected: 16,
            width: 16,
            height: 12
        }
    ));
}
