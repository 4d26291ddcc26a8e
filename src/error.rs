//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, codec, array-shape and resize-backend errors, and provides
//! semantic variants for sample lookups, argument validation and crop bounds.
use thiserror::Error;

use crate::types::{Backend, DType, Interpolation};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Config error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Image buffer error: {0}")]
    ImageBuffer(#[from] fast_image_resize::ImageBufferError),

    #[error("Resize error: {0}")]
    Resize(#[from] fast_image_resize::ResizeError),

    #[error("Cannot find key '{key}' in sample")]
    MissingKey { key: String },

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error(
        "Crop of {crop_height}x{crop_width} at ({top}, {left}) does not fit in a {height}x{width} image"
    )]
    CropOutOfBounds {
        top: usize,
        left: usize,
        crop_height: usize,
        crop_width: usize,
        height: usize,
        width: usize,
    },

    #[error("Expected an image array or tensor, got {found}")]
    UnsupportedContainer { found: &'static str },

    #[error("Interpolation '{interpolation}' is not available on the '{backend}' backend")]
    UnsupportedInterpolation {
        interpolation: Interpolation,
        backend: Backend,
    },

    #[error("Unsupported pixel layout: {dtype} with {channels} channel(s)")]
    UnsupportedPixelLayout { dtype: DType, channels: usize },

    #[error("Resize target must be non-empty, got {width}x{height}")]
    EmptyOutput { width: usize, height: usize },

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("External error: {0}")]
    External(String),
}

impl Error {
    pub fn external<E: std::fmt::Display>(e: E) -> Self {
        Error::External(e.to_string())
    }
}
