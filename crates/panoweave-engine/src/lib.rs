#![warn(missing_docs)]
//! # panoweave-engine
//!
//! ## Purpose
//! Facade over the projection subsystem: validates requests, picks the
//! cheapest correct path, and returns a finished equirectangular buffer.
//!
//! ## Responsibilities
//! - Clamp and validate requested output widths.
//! - Dispatch single-image conversions between the direct-resize fast path,
//!   the fisheye-style projector, and the horizontal-strip cubemap route.
//! - Run the six-face stitch pipeline (preprocess, then cubemap projection).
//! - Decode compressed image payloads into validated buffers.
//!
//! ## Data flow
//! Caller bytes -> [`decode_rgb_bytes`] -> [`ConversionRequest`] /
//! [`StitchRequest`] -> [`Engine::convert`] / [`Engine::stitch`] ->
//! [`ConversionResult`] handed back for encoding and transport (caller's
//! responsibility).
//!
//! ## Ownership and lifetimes
//! Requests own their buffers; the engine holds no state across calls beyond
//! its classifier, so one engine value is safe to share across parallel
//! callers.
//!
//! ## Error model
//! All failures surface synchronously as [`EngineError`] values; there is no
//! partial-result mode and no internal retry. [`EngineError::kind`] maps each
//! variant onto the caller-facing failure taxonomy.

use panoweave_core::{
    AspectRatioClassifier, CHANNELS, CoreError, CubeFace, FaceSet, ImageBuffer,
    ProjectionClassifier, ProjectionFormat, resize_bilinear,
};
use panoweave_faces::{FaceError, crop_to_common_square, preprocess};
use panoweave_project::{ProjectError, project_cubemap_to_equirect, project_to_equirect};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Output width applied when the caller does not request one.
pub const DEFAULT_OUTPUT_WIDTH: u32 = 4096;

/// Ceiling on requested output width; larger requests are clamped down.
pub const MAX_OUTPUT_WIDTH: u32 = 8192;

/// Floor on requested output width; smaller requests are rejected.
pub const MIN_OUTPUT_WIDTH: u32 = 2;

/// Aspect-ratio tolerance for the "already equirectangular" shortcut.
///
/// Deliberately tighter than the classifier's Equirectangular band: the
/// shortcut skips projection entirely, so it only fires when the source is
/// almost exactly 2:1.
const NEAR_EQUIRECT_TOLERANCE: f64 = 0.1;

/// Single-image conversion request.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Decoded source image.
    pub image: ImageBuffer,
    /// Desired output width before clamp policy is applied.
    pub output_width: u32,
}

impl ConversionRequest {
    /// Creates a request with an explicit output width.
    pub fn new(image: ImageBuffer, output_width: u32) -> Self {
        Self {
            image,
            output_width,
        }
    }

    /// Creates a request using [`DEFAULT_OUTPUT_WIDTH`].
    pub fn with_default_width(image: ImageBuffer) -> Self {
        Self::new(image, DEFAULT_OUTPUT_WIDTH)
    }
}

/// Six-face stitch request.
#[derive(Debug, Clone)]
pub struct StitchRequest {
    /// Collected cube faces; all six labels are mandatory.
    pub faces: FaceSet,
    /// Desired output width before clamp policy is applied.
    pub output_width: u32,
}

impl StitchRequest {
    /// Creates a request with an explicit output width.
    pub fn new(faces: FaceSet, output_width: u32) -> Self {
        Self {
            faces,
            output_width,
        }
    }

    /// Creates a request using [`DEFAULT_OUTPUT_WIDTH`].
    pub fn with_default_width(faces: FaceSet) -> Self {
        Self::new(faces, DEFAULT_OUTPUT_WIDTH)
    }
}

/// Finished conversion: the equirectangular buffer plus echoed metadata.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// Equirectangular output buffer.
    pub image: ImageBuffer,
    /// Output width in pixels; always populated.
    pub width: u32,
    /// Output height in pixels (`width / 2`); always populated.
    pub height: u32,
    /// Classifier hint recorded for single-image conversions; stitches have
    /// no single source format.
    pub source_format: Option<ProjectionFormat>,
}

impl ConversionResult {
    /// Transport-friendly summary of this result.
    pub fn summary(&self) -> ResultSummary {
        ResultSummary {
            width: self.width,
            height: self.height,
            source_format: self.source_format,
        }
    }
}

/// Serializable result metadata echoed to transport callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Classifier hint for the source image, when one applies.
    pub source_format: Option<ProjectionFormat>,
}

/// Caller-facing failure taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Caller-correctable input problem (geometry, width policy).
    InvalidInput,
    /// Payload could not be decoded into an image buffer.
    UnsupportedOrUndecodable,
    /// Stitch invoked without all six face labels.
    PreconditionViolation,
}

/// Error type for engine requests.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Requested width is below [`MIN_OUTPUT_WIDTH`].
    #[error("output width {0} is below the minimum of {MIN_OUTPUT_WIDTH}")]
    WidthTooSmall(u32),
    /// Payload bytes could not be decoded.
    #[error("image payload could not be decoded: {0}")]
    Undecodable(#[from] image::ImageError),
    /// Stitch request arrived without the named face.
    #[error("stitch request is missing the {} face", .0.label())]
    MissingFace(CubeFace),
    /// Source buffer failed core validation.
    #[error(transparent)]
    Core(#[from] CoreError),
    /// Face preprocessing failed.
    #[error(transparent)]
    Faces(#[from] FaceError),
    /// Projection kernel failed.
    #[error(transparent)]
    Projection(#[from] ProjectError),
}

impl EngineError {
    /// Maps this error onto the caller-facing [`FailureKind`] taxonomy.
    pub fn kind(&self) -> FailureKind {
        match self {
            EngineError::Undecodable(_) => FailureKind::UnsupportedOrUndecodable,
            EngineError::MissingFace(_) => FailureKind::PreconditionViolation,
            EngineError::WidthTooSmall(_)
            | EngineError::Core(_)
            | EngineError::Faces(_)
            | EngineError::Projection(_) => FailureKind::InvalidInput,
        }
    }
}

/// Decodes compressed image bytes (JPEG or PNG) into a validated buffer.
///
/// # Errors
/// Returns [`EngineError::Undecodable`] with the underlying decoder
/// complaint when the payload is not a decodable image.
pub fn decode_rgb_bytes(bytes: &[u8]) -> Result<ImageBuffer, EngineError> {
    let decoded = image::load_from_memory(bytes)?.to_rgb8();
    let (width, height) = decoded.dimensions();
    Ok(ImageBuffer::new(width, height, decoded.into_raw())?)
}

/// Stateless projection engine with a pluggable source-format classifier.
pub struct Engine {
    classifier: Box<dyn ProjectionClassifier + Send + Sync>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates an engine using the default aspect-ratio classifier.
    pub fn new() -> Self {
        Self::with_classifier(Box::new(AspectRatioClassifier))
    }

    /// Creates an engine with a caller-supplied classifier, for callers who
    /// hold ground-truth capture metadata instead of the heuristic.
    pub fn with_classifier(classifier: Box<dyn ProjectionClassifier + Send + Sync>) -> Self {
        Self { classifier }
    }

    /// Converts one image to equirectangular.
    ///
    /// Near-2:1 sources (`|w/h - 2| < 0.1`) take the direct-resize fast path;
    /// sources classified as a horizontal cubemap strip are sliced into six
    /// faces and routed through the cubemap projector; everything else goes
    /// through the fisheye-style projector.
    ///
    /// # Errors
    /// Returns [`EngineError::WidthTooSmall`] when the requested width is
    /// below [`MIN_OUTPUT_WIDTH`]; projection failures propagate as their
    /// own variants.
    pub fn convert(&self, request: ConversionRequest) -> Result<ConversionResult, EngineError> {
        let out_width = clamp_output_width(request.output_width)?;
        let image = request.image;

        let source_format = self
            .classifier
            .classify(image.width(), image.height());

        let output = if (image.aspect_ratio() - 2.0).abs() < NEAR_EQUIRECT_TOLERANCE {
            resize_bilinear(&image, out_width, out_width / 2)?
        } else if source_format == ProjectionFormat::HorizontalCubemapStrip {
            let faces = crop_to_common_square(slice_horizontal_strip(&image)?)?;
            project_cubemap_to_equirect(&faces, out_width)?
        } else {
            project_to_equirect(&image, out_width)?
        };

        Ok(finish(output, Some(source_format)))
    }

    /// Stitches six labeled cube faces into an equirectangular panorama.
    ///
    /// Always runs the seam-reduction preprocessor before projection.
    ///
    /// # Errors
    /// Returns [`EngineError::MissingFace`] naming the first absent label in
    /// canonical order, or [`EngineError::WidthTooSmall`] for width policy
    /// violations.
    pub fn stitch(&self, request: StitchRequest) -> Result<ConversionResult, EngineError> {
        let out_width = clamp_output_width(request.output_width)?;
        let faces = request.faces.into_faces().map_err(EngineError::MissingFace)?;

        let prepared = preprocess(faces)?;
        let output = project_cubemap_to_equirect(&prepared, out_width)?;

        Ok(finish(output, None))
    }
}

/// Applies the output width policy: clamp above the ceiling, reject below
/// the floor.
///
/// # Errors
/// Returns [`EngineError::WidthTooSmall`] when `requested < MIN_OUTPUT_WIDTH`.
pub fn clamp_output_width(requested: u32) -> Result<u32, EngineError> {
    if requested < MIN_OUTPUT_WIDTH {
        return Err(EngineError::WidthTooSmall(requested));
    }
    Ok(requested.min(MAX_OUTPUT_WIDTH))
}

/// Slices a horizontal strip into six equal-width faces in canonical order.
fn slice_horizontal_strip(image: &ImageBuffer) -> Result<[ImageBuffer; 6], EngineError> {
    let face_width = image.width() / 6;
    if face_width == 0 {
        return Err(EngineError::Core(CoreError::ZeroArea {
            width: image.width(),
            height: image.height(),
        }));
    }

    let src = image.as_bytes();
    let src_stride = image.width() as usize * CHANNELS;
    let row_len = face_width as usize * CHANNELS;

    let mut faces = Vec::with_capacity(6);
    for slot in 0..6usize {
        let left = slot * face_width as usize * CHANNELS;
        let mut rgb = Vec::with_capacity(row_len * image.height() as usize);
        for y in 0..image.height() as usize {
            let offset = y * src_stride + left;
            rgb.extend_from_slice(&src[offset..offset + row_len]);
        }
        faces.push(ImageBuffer::new(face_width, image.height(), rgb)?);
    }

    Ok(faces
        .try_into()
        .unwrap_or_else(|_| unreachable!("exactly six slices are produced")))
}

fn finish(image: ImageBuffer, source_format: Option<ProjectionFormat>) -> ConversionResult {
    let width = image.width();
    let height = image.height();
    ConversionResult {
        image,
        width,
        height,
        source_format,
    }
}
