#![warn(missing_docs)]
//! # panoweave-faces
//!
//! ## Purpose
//! Normalizes and seam-corrects six cube face captures before cubemap
//! assembly.
//!
//! ## Responsibilities
//! - Center-crop every face to a shared square size.
//! - Discard the distortion-prone periphery of the four wall captures.
//! - Preserve the canonical Front, Right, Back, Left, Up, Down order.
//!
//! ## Data flow
//! Six decoded captures -> [`crop_to_common_square`] -> optional wall margin
//! pass in [`preprocess`] -> equal-sized square faces consumed by the cubemap
//! projector.
//!
//! ## Error model
//! Geometry failures surface as [`FaceError`]; preprocessing never produces a
//! partially corrected face set.

use panoweave_core::{CHANNELS, CoreError, CubeFace, ImageBuffer, resize_bilinear};
use thiserror::Error;

/// Fraction of each linear dimension retained by wall perspective correction.
///
/// Walls keep their central 80%; the discarded rim carries the worst
/// perspective distortion in overlapping hand-held captures. Ceiling and
/// floor faces are skipped because their optical geometry differs.
pub const WALL_RETAIN: f64 = 0.80;

/// Crops all six faces to one common square size.
///
/// Each face is first cropped to its own centered square, then resampled to
/// the smallest square side across the set, so every output face shares one
/// size. The cubemap projector requires this as a precondition.
///
/// # Errors
/// Returns [`FaceError`] when output geometry cannot be constructed.
pub fn crop_to_common_square(faces: [ImageBuffer; 6]) -> Result<[ImageBuffer; 6], FaceError> {
    let common = faces
        .iter()
        .map(|face| face.width().min(face.height()))
        .min()
        .unwrap_or_else(|| unreachable!("array has six elements"));

    let mut squared = Vec::with_capacity(6);
    for face in faces {
        let side = face.width().min(face.height());
        let square = crop_center(&face, side, side)?;
        let square = if side == common {
            square
        } else {
            resize_bilinear(&square, common, common)?
        };
        squared.push(square);
    }

    Ok(into_face_array(squared))
}

/// Runs the full seam-reduction preprocessing pass.
///
/// Steps, in order:
/// 1. [`crop_to_common_square`] across all six faces.
/// 2. Perspective correction on the four wall faces only: crop to the
///    central [`WALL_RETAIN`] of each linear dimension and resample back to
///    the common square size. Up/Down pass through unmodified.
///
/// Input and output order is the canonical Front, Right, Back, Left, Up,
/// Down sequence.
///
/// # Errors
/// Returns [`FaceError`] when crop or resample geometry is invalid.
pub fn preprocess(faces: [ImageBuffer; 6]) -> Result<[ImageBuffer; 6], FaceError> {
    let squared = crop_to_common_square(faces)?;
    let common = squared[0].width();

    let mut corrected = Vec::with_capacity(6);
    for (face, image) in CubeFace::CANONICAL.into_iter().zip(squared) {
        if face.is_wall() {
            let retained = wall_retained_side(common);
            let cropped = crop_center(&image, retained, retained)?;
            corrected.push(resize_bilinear(&cropped, common, common)?);
        } else {
            corrected.push(image);
        }
    }

    Ok(into_face_array(corrected))
}

/// Centered crop side for a wall face of the given square size.
fn wall_retained_side(side: u32) -> u32 {
    // Never collapse to zero area on tiny inputs.
    ((f64::from(side) * WALL_RETAIN) as u32).max(1)
}

/// Extracts a centered `crop_width x crop_height` window.
fn crop_center(image: &ImageBuffer, crop_width: u32, crop_height: u32) -> Result<ImageBuffer, FaceError> {
    let left = (image.width() - crop_width) / 2;
    let top = (image.height() - crop_height) / 2;

    let src = image.as_bytes();
    let src_stride = image.width() as usize * CHANNELS;
    let row_len = crop_width as usize * CHANNELS;

    let mut rgb = Vec::with_capacity(row_len * crop_height as usize);
    for y in 0..crop_height as usize {
        let offset = (top as usize + y) * src_stride + left as usize * CHANNELS;
        rgb.extend_from_slice(&src[offset..offset + row_len]);
    }

    Ok(ImageBuffer::new(crop_width, crop_height, rgb)?)
}

fn into_face_array(faces: Vec<ImageBuffer>) -> [ImageBuffer; 6] {
    faces
        .try_into()
        .unwrap_or_else(|_| unreachable!("exactly six faces are produced"))
}

/// Error type for face preprocessing.
#[derive(Debug, Error)]
pub enum FaceError {
    /// Crop or resample produced invalid buffer geometry.
    #[error("face geometry failure: {0}")]
    Geometry(#[from] CoreError),
}
