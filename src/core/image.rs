//! Image containers: a plain HWC array ([`ImageArray`]) and a tensor-like wrapper
//! ([`Tensor`]) that shares its storage. Resize dispatch works on anything that
//! implements [`AsArray`] and [`FromArray`].
use std::borrow::Cow;
use std::sync::Arc;

use ndarray::{Array3, s};

use crate::error::{Error, Result};
use crate::types::DType;

/// Rank-3 image buffer, `height x width x channels`.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageArray {
    U8(Array3<u8>),
    U16(Array3<u16>),
    F32(Array3<f32>),
}

impl ImageArray {
    /// `(height, width, channels)`
    pub fn dim(&self) -> (usize, usize, usize) {
        match self {
            ImageArray::U8(a) => a.dim(),
            ImageArray::U16(a) => a.dim(),
            ImageArray::F32(a) => a.dim(),
        }
    }

    pub fn height(&self) -> usize {
        self.dim().0
    }

    pub fn width(&self) -> usize {
        self.dim().1
    }

    pub fn channels(&self) -> usize {
        self.dim().2
    }

    pub fn dtype(&self) -> DType {
        match self {
            ImageArray::U8(_) => DType::U8,
            ImageArray::U16(_) => DType::U16,
            ImageArray::F32(_) => DType::F32,
        }
    }

    /// Copies out the box `[top, top + height) x [left, left + width)`, all channels.
    pub fn crop(&self, top: usize, left: usize, height: usize, width: usize) -> Result<ImageArray> {
        let (rows, cols, _) = self.dim();
        if top + height > rows || left + width > cols {
            return Err(Error::CropOutOfBounds {
                top,
                left,
                crop_height: height,
                crop_width: width,
                height: rows,
                width: cols,
            });
        }
        let window = s![top..top + height, left..left + width, ..];
        Ok(match self {
            ImageArray::U8(a) => ImageArray::U8(a.slice(window).to_owned()),
            ImageArray::U16(a) => ImageArray::U16(a.slice(window).to_owned()),
            ImageArray::F32(a) => ImageArray::F32(a.slice(window).to_owned()),
        })
    }
}

impl From<Array3<u8>> for ImageArray {
    fn from(a: Array3<u8>) -> Self {
        ImageArray::U8(a)
    }
}

impl From<Array3<u16>> for ImageArray {
    fn from(a: Array3<u16>) -> Self {
        ImageArray::U16(a)
    }
}

impl From<Array3<f32>> for ImageArray {
    fn from(a: Array3<f32>) -> Self {
        ImageArray::F32(a)
    }
}

/// Tensor-like wrapper over an [`ImageArray`].
///
/// Clones are shallow: the storage is reference counted, so a cloned `Sample`
/// shares tensor buffers with the original.
#[derive(Debug, Clone)]
pub struct Tensor {
    storage: Arc<ImageArray>,
}

impl Tensor {
    pub fn new(array: ImageArray) -> Self {
        Self {
            storage: Arc::new(array),
        }
    }

    pub fn dim(&self) -> (usize, usize, usize) {
        self.storage.dim()
    }

    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    /// True if both tensors point at the same storage.
    pub fn shares_storage(&self, other: &Tensor) -> bool {
        Arc::ptr_eq(&self.storage, &other.storage)
    }

    pub fn crop(&self, top: usize, left: usize, height: usize, width: usize) -> Result<Tensor> {
        Ok(Tensor::new(self.storage.crop(top, left, height, width)?))
    }
}

impl AsRef<ImageArray> for Tensor {
    fn as_ref(&self) -> &ImageArray {
        &self.storage
    }
}

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.storage == other.storage
    }
}

/// Read access to the underlying HWC array.
pub trait AsArray {
    fn as_array(&self) -> Cow<'_, ImageArray>;
}

/// Rebuilds a container from a resized array.
pub trait FromArray: Sized {
    fn from_array(array: ImageArray) -> Self;
}

impl AsArray for ImageArray {
    fn as_array(&self) -> Cow<'_, ImageArray> {
        Cow::Borrowed(self)
    }
}

impl FromArray for ImageArray {
    fn from_array(array: ImageArray) -> Self {
        array
    }
}

impl AsArray for Tensor {
    fn as_array(&self) -> Cow<'_, ImageArray> {
        Cow::Borrowed(self.storage.as_ref())
    }
}

impl FromArray for Tensor {
    fn from_array(array: ImageArray) -> Self {
        Tensor::new(array)
    }
}
