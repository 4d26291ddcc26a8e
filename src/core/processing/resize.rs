use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use image::imageops::{self, FilterType as ImageFilter};
use image::{ImageBuffer, Luma, LumaA, Rgb, Rgba};
use ndarray::Array3;
use tracing::debug;

use crate::core::image::{AsArray, FromArray, ImageArray};
use crate::core::processing::backend::resolve_backend;
use crate::core::sample::Value;
use crate::error::{Error, Result};
use crate::types::{Backend, DType, Interpolation, Size};

/// Added before flooring so that exact integer products do not round down.
pub const SCALE_EPSILON: f64 = 1e-9;

/// `floor(dim * scale + 1e-9)`
pub fn scaled_dimension(dim: usize, scale: f64) -> usize {
    (dim as f64 * scale + SCALE_EPSILON).floor() as usize
}

/// `floor(dim / scale + 1e-9)`
pub fn reduced_dimension(dim: usize, scale: f64) -> usize {
    (dim as f64 / scale + SCALE_EPSILON).floor() as usize
}

/// Rounds to the nearest integer, ties to even.
pub fn round_half_even(x: f64) -> usize {
    x.round_ties_even() as usize
}

fn to_u32(value: usize, arg: &'static str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::InvalidArgument {
        arg,
        value: value.to_string(),
    })
}

/// Resizes any array-backed container to `size` and rebuilds the same container kind.
///
/// A single edge is treated as a square target; a pair is `(width, height)`.
/// `backend = None` uses the process-wide default (see
/// [`default_backend`](crate::core::processing::backend::default_backend)).
pub fn resize_fn<T: AsArray + FromArray>(
    img: &T,
    size: impl Into<Size>,
    interpolation: Interpolation,
    backend: Option<Backend>,
) -> Result<T> {
    let (width, height) = size.into().width_height();
    let array = img.as_array();
    let resized = resize_array(&array, width, height, interpolation, resolve_backend(backend))?;
    Ok(T::from_array(resized))
}

/// [`resize_fn`] over a sample value: arrays stay arrays, tensors stay tensors.
pub fn resize_value(
    value: &Value,
    size: impl Into<Size>,
    interpolation: Interpolation,
    backend: Option<Backend>,
) -> Result<Value> {
    match value {
        Value::Array(a) => Ok(Value::Array(resize_fn(a, size, interpolation, backend)?)),
        Value::Tensor(t) => Ok(Value::Tensor(resize_fn(t, size, interpolation, backend)?)),
        other => Err(Error::UnsupportedContainer {
            found: other.kind(),
        }),
    }
}

pub fn resize_array(
    src: &ImageArray,
    width: usize,
    height: usize,
    interpolation: Interpolation,
    backend: Backend,
) -> Result<ImageArray> {
    if width == 0 || height == 0 {
        return Err(Error::EmptyOutput { width, height });
    }
    let (rows, cols, channels) = src.dim();
    if rows == 0 || cols == 0 {
        return Err(Error::InvalidArgument {
            arg: "image",
            value: format!("{}x{}", cols, rows),
        });
    }
    if !(1..=4).contains(&channels) {
        return Err(Error::UnsupportedPixelLayout {
            dtype: src.dtype(),
            channels,
        });
    }
    if !backend.supports(interpolation) {
        return Err(Error::UnsupportedInterpolation {
            interpolation,
            backend,
        });
    }

    debug!(
        "Resizing {}x{}x{} {} -> {}x{} ({}, {})",
        cols,
        rows,
        channels,
        src.dtype(),
        width,
        height,
        interpolation,
        backend
    );

    match backend {
        Backend::Fir => fir_resize(src, width, height, interpolation),
        Backend::Image => imageops_resize(src, width, height, interpolation),
    }
}

// ---------------------------------------------------------------------------
// fast_image_resize backend
// ---------------------------------------------------------------------------

/// Element types that round-trip through `fast_image_resize` byte buffers.
trait FirElement: Copy + 'static {
    const DTYPE: DType;

    fn pixel_type(channels: usize) -> Option<PixelType>;
    fn to_bytes(values: &[Self]) -> Vec<u8>;
    fn from_bytes(bytes: &[u8]) -> Vec<Self>;
}

impl FirElement for u8 {
    const DTYPE: DType = DType::U8;

    fn pixel_type(channels: usize) -> Option<PixelType> {
        match channels {
            1 => Some(PixelType::U8),
            2 => Some(PixelType::U8x2),
            3 => Some(PixelType::U8x3),
            4 => Some(PixelType::U8x4),
            _ => None,
        }
    }

    fn to_bytes(values: &[Self]) -> Vec<u8> {
        values.to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Vec<Self> {
        bytes.to_vec()
    }
}

impl FirElement for u16 {
    const DTYPE: DType = DType::U16;

    fn pixel_type(channels: usize) -> Option<PixelType> {
        match channels {
            1 => Some(PixelType::U16),
            2 => Some(PixelType::U16x2),
            3 => Some(PixelType::U16x3),
            4 => Some(PixelType::U16x4),
            _ => None,
        }
    }

    fn to_bytes(values: &[Self]) -> Vec<u8> {
        let mut out = Vec::with_capacity(values.len() * 2);
        for &v in values {
            out.extend_from_slice(&v.to_le_bytes());
        }
        out
    }

    fn from_bytes(bytes: &[u8]) -> Vec<Self> {
        bytes
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect()
    }
}

impl FirElement for f32 {
    const DTYPE: DType = DType::F32;

    fn pixel_type(channels: usize) -> Option<PixelType> {
        match channels {
            1 => Some(PixelType::F32),
            2 => Some(PixelType::F32x2),
            3 => Some(PixelType::F32x3),
            4 => Some(PixelType::F32x4),
            _ => None,
        }
    }

    fn to_bytes(values: &[Self]) -> Vec<u8> {
        let mut out = Vec::with_capacity(values.len() * 4);
        for &v in values {
            out.extend_from_slice(&v.to_le_bytes());
        }
        out
    }

    fn from_bytes(bytes: &[u8]) -> Vec<Self> {
        bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }
}

fn fir_algorithm(interpolation: Interpolation) -> Result<ResizeAlg> {
    Ok(match interpolation {
        Interpolation::Nearest => ResizeAlg::Nearest,
        Interpolation::Bilinear => ResizeAlg::Convolution(FilterType::Bilinear),
        Interpolation::Bicubic => ResizeAlg::Convolution(FilterType::CatmullRom),
        Interpolation::Box => ResizeAlg::Convolution(FilterType::Box),
        Interpolation::Lanczos => ResizeAlg::Convolution(FilterType::Lanczos3),
        Interpolation::Hamming => ResizeAlg::Convolution(FilterType::Hamming),
        Interpolation::Area => {
            return Err(Error::UnsupportedInterpolation {
                interpolation,
                backend: Backend::Fir,
            });
        }
    })
}

fn fir_resize(
    src: &ImageArray,
    width: usize,
    height: usize,
    interpolation: Interpolation,
) -> Result<ImageArray> {
    let alg = fir_algorithm(interpolation)?;
    Ok(match src {
        ImageArray::U8(a) => ImageArray::U8(fir_resize_typed(a, width, height, alg)?),
        ImageArray::U16(a) => ImageArray::U16(fir_resize_typed(a, width, height, alg)?),
        ImageArray::F32(a) => ImageArray::F32(fir_resize_typed(a, width, height, alg)?),
    })
}

fn fir_resize_typed<T: FirElement>(
    src: &Array3<T>,
    width: usize,
    height: usize,
    alg: ResizeAlg,
) -> Result<Array3<T>> {
    let (rows, cols, channels) = src.dim();
    let pixel_type = T::pixel_type(channels).ok_or(Error::UnsupportedPixelLayout {
        dtype: T::DTYPE,
        channels,
    })?;

    let contiguous = src.as_standard_layout();
    let values = contiguous
        .as_slice()
        .ok_or_else(|| Error::Processing("image array is not contiguous".to_string()))?;

    // Channels are independent samples here, not straight alpha.
    let resize_options = ResizeOptions::new().resize_alg(alg).use_alpha(false);
    let mut resizer = Resizer::new();

    let src_image = Image::from_vec_u8(
        to_u32(cols, "width")?,
        to_u32(rows, "height")?,
        T::to_bytes(values),
        pixel_type,
    )?;
    let mut dst_image = Image::new(to_u32(width, "width")?, to_u32(height, "height")?, pixel_type);
    resizer.resize(&src_image, &mut dst_image, &resize_options)?;

    let out = T::from_bytes(&dst_image.into_vec());
    Ok(Array3::from_shape_vec((height, width, channels), out)?)
}

// ---------------------------------------------------------------------------
// image::imageops backend
// ---------------------------------------------------------------------------

enum ImageKernel {
    Filter(ImageFilter),
    Area,
}

fn image_kernel(interpolation: Interpolation) -> Result<ImageKernel> {
    Ok(match interpolation {
        Interpolation::Nearest => ImageKernel::Filter(ImageFilter::Nearest),
        Interpolation::Bilinear => ImageKernel::Filter(ImageFilter::Triangle),
        Interpolation::Bicubic => ImageKernel::Filter(ImageFilter::CatmullRom),
        Interpolation::Lanczos => ImageKernel::Filter(ImageFilter::Lanczos3),
        Interpolation::Area => ImageKernel::Area,
        Interpolation::Box | Interpolation::Hamming => {
            return Err(Error::UnsupportedInterpolation {
                interpolation,
                backend: Backend::Image,
            });
        }
    })
}

/// Wraps an HWC array as an `ImageBuffer<$pixel<$elem>>`, resizes it and unwraps the result.
macro_rules! resize_buffer {
    ($pixel:ident, $elem:ty, $src:expr, $width:expr, $height:expr, $kernel:expr) => {{
        let (rows, cols, channels) = $src.dim();
        let raw: Vec<$elem> = $src.as_standard_layout().into_owned().into_raw_vec();
        let buffer: ImageBuffer<$pixel<$elem>, Vec<$elem>> =
            ImageBuffer::from_raw(to_u32(cols, "width")?, to_u32(rows, "height")?, raw)
                .ok_or_else(|| {
                    Error::Processing("pixel buffer does not match image dimensions".to_string())
                })?;
        let (w, h) = (to_u32($width, "width")?, to_u32($height, "height")?);
        let resized = match $kernel {
            ImageKernel::Filter(filter) => imageops::resize(&buffer, w, h, *filter),
            ImageKernel::Area => imageops::thumbnail(&buffer, w, h),
        };
        Array3::from_shape_vec(($height, $width, channels), resized.into_raw())?
    }};
}

macro_rules! resize_by_channels {
    ($elem:ty, $dtype:expr, $src:expr, $width:expr, $height:expr, $kernel:expr) => {
        match $src.dim().2 {
            1 => resize_buffer!(Luma, $elem, $src, $width, $height, $kernel),
            2 => resize_buffer!(LumaA, $elem, $src, $width, $height, $kernel),
            3 => resize_buffer!(Rgb, $elem, $src, $width, $height, $kernel),
            4 => resize_buffer!(Rgba, $elem, $src, $width, $height, $kernel),
            channels => {
                return Err(Error::UnsupportedPixelLayout {
                    dtype: $dtype,
                    channels,
                });
            }
        }
    };
}

fn imageops_resize(
    src: &ImageArray,
    width: usize,
    height: usize,
    interpolation: Interpolation,
) -> Result<ImageArray> {
    let kernel = &image_kernel(interpolation)?;
    Ok(match src {
        ImageArray::U8(a) => {
            ImageArray::U8(resize_by_channels!(u8, DType::U8, a, width, height, kernel))
        }
        ImageArray::U16(a) => {
            ImageArray::U16(resize_by_channels!(u16, DType::U16, a, width, height, kernel))
        }
        ImageArray::F32(a) => {
            ImageArray::F32(resize_by_channels!(f32, DType::F32, a, width, height, kernel))
        }
    })
}
