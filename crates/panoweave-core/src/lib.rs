#![warn(missing_docs)]
//! # panoweave-core
//!
//! ## Purpose
//! Defines the pure data model and leaf algorithms used across the
//! `panoweave` workspace.
//!
//! ## Responsibilities
//! - Represent validated RGB image buffers.
//! - Name cube faces and their canonical processing order.
//! - Classify a probable source projection from image aspect ratio.
//! - Provide bilinear sampling and resampling used by every projector.
//!
//! ## Data flow
//! Callers decode payloads into [`ImageBuffer`] values; projectors read them
//! through [`sample_bilinear`] and produce new buffers. Six-face requests are
//! collected in a [`FaceSet`] before stitching.
//!
//! ## Ownership and lifetimes
//! Buffers own their backing `Vec<u8>`; every entity is a request-scoped
//! value object and nothing outlives a single engine call.
//!
//! ## Error model
//! Shape and dimension violations return [`CoreError`] variants with
//! caller-actionable categorization. Sampling itself is total: coordinates
//! outside the buffer clamp to the nearest edge and never fail.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of channels per pixel (red, green, blue).
pub const CHANNELS: usize = 3;

/// One RGB pixel value.
pub type Rgb = [u8; CHANNELS];

/// Decoded raster image with a validated row-major RGB byte buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

impl ImageBuffer {
    /// Constructs a validated image buffer.
    ///
    /// # Errors
    /// Returns [`CoreError::ZeroArea`] when either dimension is zero and
    /// [`CoreError::InvalidBufferShape`] when the byte length is not exactly
    /// `width * height * 3`.
    pub fn new(width: u32, height: u32, rgb: Vec<u8>) -> Result<Self, CoreError> {
        let expected = required_rgb_len(width, height)?;
        if rgb.len() != expected {
            return Err(CoreError::InvalidBufferShape {
                expected,
                actual: rgb.len(),
            });
        }

        Ok(Self { width, height, rgb })
    }

    /// Constructs a buffer filled with one uniform color.
    ///
    /// # Errors
    /// Returns [`CoreError::ZeroArea`] when either dimension is zero.
    pub fn filled(width: u32, height: u32, color: Rgb) -> Result<Self, CoreError> {
        let len = required_rgb_len(width, height)?;
        let mut rgb = Vec::with_capacity(len);
        for _ in 0..len / CHANNELS {
            rgb.extend_from_slice(&color);
        }
        Ok(Self { width, height, rgb })
    }

    /// Returns image width in pixels (always >= 1).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns image height in pixels (always >= 1).
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the raw row-major RGB bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.rgb
    }

    /// Consumes the buffer and returns the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.rgb
    }

    /// Returns the pixel at `(x, y)`.
    ///
    /// # Panics
    /// Panics when `(x, y)` is outside the buffer; callers that hold
    /// real-valued coordinates go through [`sample_bilinear`] instead.
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [self.rgb[offset], self.rgb[offset + 1], self.rgb[offset + 2]]
    }

    /// Aspect ratio `width / height` as used by format classification.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// One face of an axis-aligned cubemap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CubeFace {
    /// Forward-looking wall capture.
    Front,
    /// Right wall capture.
    Right,
    /// Rear wall capture.
    Back,
    /// Left wall capture.
    Left,
    /// Ceiling capture.
    Up,
    /// Floor capture.
    Down,
}

impl CubeFace {
    /// Canonical processing order; assembly must receive and preserve it.
    pub const CANONICAL: [CubeFace; 6] = [
        CubeFace::Front,
        CubeFace::Right,
        CubeFace::Back,
        CubeFace::Left,
        CubeFace::Up,
        CubeFace::Down,
    ];

    /// Index of this face within [`CubeFace::CANONICAL`].
    pub fn index(self) -> usize {
        match self {
            CubeFace::Front => 0,
            CubeFace::Right => 1,
            CubeFace::Back => 2,
            CubeFace::Left => 3,
            CubeFace::Up => 4,
            CubeFace::Down => 5,
        }
    }

    /// Lowercase label used in caller-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            CubeFace::Front => "front",
            CubeFace::Right => "right",
            CubeFace::Back => "back",
            CubeFace::Left => "left",
            CubeFace::Up => "up",
            CubeFace::Down => "down",
        }
    }

    /// Returns `true` for the four lateral (wall) faces.
    pub fn is_wall(self) -> bool {
        !matches!(self, CubeFace::Up | CubeFace::Down)
    }
}

/// Probable source projection inferred from image geometry.
///
/// Produced only by a [`ProjectionClassifier`]; downstream code must treat it
/// as a hint, not a verified decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionFormat {
    /// Near 2:1 grid, assumed lat/lon panorama.
    Equirectangular,
    /// Roughly square, assumed wide-angle radial capture.
    Fisheye,
    /// Wider than 5.5:1, assumed six faces laid out side by side.
    HorizontalCubemapStrip,
    /// Anything else; routed through the fisheye-style transform.
    PerspectiveOrOther,
}

/// Capability interface for source-format classification.
///
/// The default [`AspectRatioClassifier`] is a heuristic; callers holding
/// ground-truth capture metadata can substitute their own implementation.
pub trait ProjectionClassifier {
    /// Classifies the probable projection of a `width x height` image.
    fn classify(&self, width: u32, height: u32) -> ProjectionFormat;
}

/// Aspect-ratio heuristic classifier.
///
/// Decision table, first match wins:
/// - `1.9 <= r <= 2.1` -> [`ProjectionFormat::Equirectangular`]
/// - `0.9 <= r <= 1.1` -> [`ProjectionFormat::Fisheye`]
/// - `r > 5.5` -> [`ProjectionFormat::HorizontalCubemapStrip`]
/// - otherwise [`ProjectionFormat::PerspectiveOrOther`]
#[derive(Debug, Clone, Copy, Default)]
pub struct AspectRatioClassifier;

impl ProjectionClassifier for AspectRatioClassifier {
    fn classify(&self, width: u32, height: u32) -> ProjectionFormat {
        if height == 0 {
            return ProjectionFormat::PerspectiveOrOther;
        }

        let r = f64::from(width) / f64::from(height);
        if (1.9..=2.1).contains(&r) {
            ProjectionFormat::Equirectangular
        } else if (0.9..=1.1).contains(&r) {
            ProjectionFormat::Fisheye
        } else if r > 5.5 {
            ProjectionFormat::HorizontalCubemapStrip
        } else {
            ProjectionFormat::PerspectiveOrOther
        }
    }
}

/// Collects cube face images keyed by [`CubeFace`] ahead of a stitch.
#[derive(Debug, Clone, Default)]
pub struct FaceSet {
    slots: [Option<ImageBuffer>; 6],
}

impl FaceSet {
    /// Creates an empty face set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts one face image, returning any previously held image for the
    /// same face.
    pub fn insert(&mut self, face: CubeFace, image: ImageBuffer) -> Option<ImageBuffer> {
        self.slots[face.index()].replace(image)
    }

    /// Returns the image held for `face`, if any.
    pub fn get(&self, face: CubeFace) -> Option<&ImageBuffer> {
        self.slots[face.index()].as_ref()
    }

    /// Returns the first face missing in canonical order, if any.
    pub fn missing(&self) -> Option<CubeFace> {
        CubeFace::CANONICAL
            .into_iter()
            .find(|face| self.slots[face.index()].is_none())
    }

    /// Consumes the set and returns the six faces in canonical order.
    ///
    /// # Errors
    /// Returns the first missing [`CubeFace`] in canonical order when the set
    /// is incomplete.
    pub fn into_faces(self) -> Result<[ImageBuffer; 6], CubeFace> {
        if let Some(face) = self.missing() {
            return Err(face);
        }

        Ok(self
            .slots
            .map(|slot| slot.unwrap_or_else(|| unreachable!("completeness checked above"))))
    }
}

/// Samples `image` at real-valued coordinates with bilinear weighting.
///
/// The four lattice neighbors are each clamped to
/// `[0, width - 1] x [0, height - 1]` (edge-clamp, never wrap), so the lookup
/// is total: out-of-range coordinates return the nearest edge value. The
/// clamp policy defines exact behavior along image borders and is relied on
/// by every projector.
pub fn sample_bilinear(image: &ImageBuffer, x: f64, y: f64) -> Rgb {
    let max_x = i64::from(image.width() - 1);
    let max_y = i64::from(image.height() - 1);

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let tx = x - x.floor();
    let ty = y - y.floor();

    let xa = x0.clamp(0, max_x) as u32;
    let xb = (x0 + 1).clamp(0, max_x) as u32;
    let ya = y0.clamp(0, max_y) as u32;
    let yb = (y0 + 1).clamp(0, max_y) as u32;

    let p00 = image.pixel(xa, ya);
    let p10 = image.pixel(xb, ya);
    let p01 = image.pixel(xa, yb);
    let p11 = image.pixel(xb, yb);

    let w00 = (1.0 - tx) * (1.0 - ty);
    let w10 = tx * (1.0 - ty);
    let w01 = (1.0 - tx) * ty;
    let w11 = tx * ty;

    let mut out = [0u8; CHANNELS];
    for channel in 0..CHANNELS {
        let value = f64::from(p00[channel]) * w00
            + f64::from(p10[channel]) * w10
            + f64::from(p01[channel]) * w01
            + f64::from(p11[channel]) * w11;
        out[channel] = value.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Resamples `image` to `out_width x out_height` with bilinear filtering.
///
/// Output pixel centers map linearly onto source pixel centers; border
/// behavior follows [`sample_bilinear`]'s edge clamp.
///
/// # Errors
/// Returns [`CoreError::ZeroArea`] when either output dimension is zero.
pub fn resize_bilinear(
    image: &ImageBuffer,
    out_width: u32,
    out_height: u32,
) -> Result<ImageBuffer, CoreError> {
    let len = required_rgb_len(out_width, out_height)?;
    let scale_x = f64::from(image.width()) / f64::from(out_width);
    let scale_y = f64::from(image.height()) / f64::from(out_height);

    let mut rgb = Vec::with_capacity(len);
    for oy in 0..out_height {
        let sy = (f64::from(oy) + 0.5) * scale_y - 0.5;
        for ox in 0..out_width {
            let sx = (f64::from(ox) + 0.5) * scale_x - 0.5;
            rgb.extend_from_slice(&sample_bilinear(image, sx, sy));
        }
    }

    ImageBuffer::new(out_width, out_height, rgb)
}

/// Error type for core domain validation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Image dimensions must both be at least one pixel.
    #[error("zero-area image: {width}x{height}")]
    ZeroArea {
        /// Offending width.
        width: u32,
        /// Offending height.
        height: u32,
    },
    /// Pixel buffer length does not match declared geometry.
    #[error("invalid buffer shape: expected {expected} bytes, got {actual}")]
    InvalidBufferShape {
        /// Expected RGB byte count.
        expected: usize,
        /// Actual RGB byte count.
        actual: usize,
    },
    /// Integer overflow while computing buffer geometry.
    #[error("image dimension overflow")]
    DimensionOverflow,
}

fn required_rgb_len(width: u32, height: u32) -> Result<usize, CoreError> {
    if width == 0 || height == 0 {
        return Err(CoreError::ZeroArea { width, height });
    }

    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(CHANNELS))
        .ok_or(CoreError::DimensionOverflow)
}
