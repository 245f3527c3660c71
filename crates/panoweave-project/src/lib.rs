#![warn(missing_docs)]
//! # panoweave-project
//!
//! ## Purpose
//! Remaps source imagery onto an equirectangular (lat/lon) output grid.
//!
//! ## Responsibilities
//! - Project a single wide-angle capture through a fisheye-style inverse
//!   mapping.
//! - Project six equal-sized square cube faces through dominant-axis
//!   intersection.
//!
//! ## Data flow
//! For every output pixel the projectors derive a unit direction on the
//! sphere from pixel-center longitude/latitude, map it back into source
//! coordinates, and sample through the edge-clamping bilinear sampler.
//!
//! ## Concurrency
//! Both kernels are pure functions over an independent-output-pixel domain:
//! no pixel depends on another, only the final row-major layout is ordered.
//!
//! ## Error model
//! Invalid output widths and mismatched face geometry return
//! [`ProjectError`]; per-pixel sampling itself cannot fail.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use panoweave_core::{CHANNELS, CoreError, ImageBuffer, sample_bilinear};
use thiserror::Error;

/// Half field of view assumed for single wide-angle captures.
///
/// The radial model is equidistant over a 180 degree field: angular distance
/// from the forward axis maps linearly to radius from the image center.
/// Directions behind the capture fall outside the source disc and clamp to
/// the image border.
const FISHEYE_HALF_FOV: f64 = FRAC_PI_2;

/// Unit direction on the sphere for the center of output pixel `(ox, oy)`.
///
/// Longitude spans `[-pi, pi]` left to right, latitude `[-pi/2, pi/2]` top to
/// bottom. The returned components are (right, down, forward).
fn pixel_direction(ox: u32, oy: u32, out_width: u32, out_height: u32) -> (f64, f64, f64) {
    let lon = ((f64::from(ox) + 0.5) / f64::from(out_width) - 0.5) * TAU;
    let lat = ((f64::from(oy) + 0.5) / f64::from(out_height) - 0.5) * PI;

    let (sin_lon, cos_lon) = lon.sin_cos();
    let (sin_lat, cos_lat) = lat.sin_cos();
    (cos_lat * sin_lon, sin_lat, cos_lat * cos_lon)
}

/// Output height paired with a validated output width.
fn output_height(out_width: u32) -> Result<u32, ProjectError> {
    let out_height = out_width / 2;
    if out_height == 0 {
        return Err(ProjectError::InvalidOutputWidth(out_width));
    }
    Ok(out_height)
}

/// Projects a single wide-angle capture onto an equirectangular grid.
///
/// The input is assumed to be centered on the viewer's forward axis; the
/// angular distance of each output direction from that axis becomes the
/// sampling radius, its in-plane azimuth the sampling angle. Non-fisheye
/// sources classified as `PerspectiveOrOther` are routed through this same
/// transform by the engine facade rather than a true perspective
/// unprojection; callers needing exact perspective handling should supply
/// their own classifier and pre-rectified input.
///
/// # Errors
/// Returns [`ProjectError::InvalidOutputWidth`] when `out_width < 2`.
pub fn project_to_equirect(
    input: &ImageBuffer,
    out_width: u32,
) -> Result<ImageBuffer, ProjectError> {
    let out_height = output_height(out_width)?;

    let center_x = f64::from(input.width() - 1) / 2.0;
    let center_y = f64::from(input.height() - 1) / 2.0;
    let disc_radius = f64::from(input.width().min(input.height())) / 2.0;

    let mut rgb = Vec::with_capacity(out_width as usize * out_height as usize * CHANNELS);
    for oy in 0..out_height {
        for ox in 0..out_width {
            let (dx, dy, dz) = pixel_direction(ox, oy, out_width, out_height);

            // Angle from the forward (+z) axis and azimuth in the image plane.
            let theta = dz.clamp(-1.0, 1.0).acos();
            let psi = dy.atan2(dx);

            let radius = theta / FISHEYE_HALF_FOV * disc_radius;
            let sx = center_x + radius * psi.cos();
            let sy = center_y + radius * psi.sin();

            rgb.extend_from_slice(&sample_bilinear(input, sx, sy));
        }
    }

    Ok(ImageBuffer::new(out_width, out_height, rgb)?)
}

/// Which cube face a direction vector intersects, with its face-local
/// coordinates in `[-1, 1]`.
///
/// Face indices follow the canonical Front, Right, Back, Left, Up, Down
/// order. Magnitude ties resolve to the lateral faces ahead of Up/Down.
fn intersect_face(dx: f64, dy: f64, dz: f64) -> (usize, f64, f64) {
    let ax = dx.abs();
    let ay = dy.abs();
    let az = dz.abs();

    if az >= ax && az >= ay {
        if dz >= 0.0 {
            (0, dx / az, dy / az) // front
        } else {
            (2, -dx / az, dy / az) // back
        }
    } else if ax >= ay {
        if dx >= 0.0 {
            (1, -dz / ax, dy / ax) // right
        } else {
            (3, dz / ax, dy / ax) // left
        }
    } else if dy <= 0.0 {
        (4, dx / ay, dz / ay) // up
    } else {
        (5, dx / ay, -dz / ay) // down
    }
}

/// Projects six equal-sized square cube faces onto an equirectangular grid.
///
/// `faces` must be in canonical Front, Right, Back, Left, Up, Down order;
/// the face preprocessor guarantees the equal-square precondition. Every
/// output direction picks the face whose principal axis has the
/// largest-magnitude component, perspective-divides the remaining two
/// components into face-local coordinates, and samples that face.
///
/// # Errors
/// Returns [`ProjectError::InvalidOutputWidth`] when `out_width < 2` and
/// [`ProjectError::FaceGeometry`] when the faces are not equal-sized squares.
pub fn project_cubemap_to_equirect(
    faces: &[ImageBuffer; 6],
    out_width: u32,
) -> Result<ImageBuffer, ProjectError> {
    let out_height = output_height(out_width)?;

    let side = faces[0].width();
    for face in faces {
        if face.width() != side || face.height() != side {
            return Err(ProjectError::FaceGeometry {
                expected: side,
                width: face.width(),
                height: face.height(),
            });
        }
    }

    let scale = f64::from(side - 1) / 2.0;

    let mut rgb = Vec::with_capacity(out_width as usize * out_height as usize * CHANNELS);
    for oy in 0..out_height {
        for ox in 0..out_width {
            let (dx, dy, dz) = pixel_direction(ox, oy, out_width, out_height);
            let (face_index, u, v) = intersect_face(dx, dy, dz);

            let px = (u + 1.0) * scale;
            let py = (v + 1.0) * scale;
            rgb.extend_from_slice(&sample_bilinear(&faces[face_index], px, py));
        }
    }

    Ok(ImageBuffer::new(out_width, out_height, rgb)?)
}

/// Error type for projection kernels.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// Output width must yield at least a 2x1 grid.
    #[error("output width {0} is too small to form an equirectangular grid")]
    InvalidOutputWidth(u32),
    /// Cube faces must all be squares of one shared size.
    #[error("cube face is {width}x{height}, expected {expected}x{expected}")]
    FaceGeometry {
        /// Shared square side taken from the first face.
        expected: u32,
        /// Offending face width.
        width: u32,
        /// Offending face height.
        height: u32,
    },
    /// Output buffer geometry was invalid.
    #[error("projection output failure: {0}")]
    Output(#[from] CoreError),
}
