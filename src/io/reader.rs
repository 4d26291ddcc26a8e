use std::path::Path;

use image::DynamicImage;
use ndarray::Array3;
use tracing::{debug, warn};

use crate::core::image::ImageArray;
use crate::error::Result;

/// Decodes an image file into an HWC array.
///
/// 8-bit, 16-bit and 32-bit float layouts are kept as decoded; anything else is
/// converted to RGB8.
pub fn load_image(path: &Path) -> Result<ImageArray> {
    let img = image::open(path)?;
    debug!(
        "Decoded {:?}: {}x{} {:?}",
        path,
        img.width(),
        img.height(),
        img.color()
    );
    dynamic_to_array(img)
}

pub fn dynamic_to_array(img: DynamicImage) -> Result<ImageArray> {
    let rows = img.height() as usize;
    let cols = img.width() as usize;
    Ok(match img {
        DynamicImage::ImageLuma8(b) => ImageArray::U8(Array3::from_shape_vec((rows, cols, 1), b.into_raw())?),
        DynamicImage::ImageLumaA8(b) => ImageArray::U8(Array3::from_shape_vec((rows, cols, 2), b.into_raw())?),
        DynamicImage::ImageRgb8(b) => ImageArray::U8(Array3::from_shape_vec((rows, cols, 3), b.into_raw())?),
        DynamicImage::ImageRgba8(b) => ImageArray::U8(Array3::from_shape_vec((rows, cols, 4), b.into_raw())?),
        DynamicImage::ImageLuma16(b) => ImageArray::U16(Array3::from_shape_vec((rows, cols, 1), b.into_raw())?),
        DynamicImage::ImageLumaA16(b) => ImageArray::U16(Array3::from_shape_vec((rows, cols, 2), b.into_raw())?),
        DynamicImage::ImageRgb16(b) => ImageArray::U16(Array3::from_shape_vec((rows, cols, 3), b.into_raw())?),
        DynamicImage::ImageRgba16(b) => ImageArray::U16(Array3::from_shape_vec((rows, cols, 4), b.into_raw())?),
        DynamicImage::ImageRgb32F(b) => ImageArray::F32(Array3::from_shape_vec((rows, cols, 3), b.into_raw())?),
        DynamicImage::ImageRgba32F(b) => ImageArray::F32(Array3::from_shape_vec((rows, cols, 4), b.into_raw())?),
        other => {
            warn!("Converting {:?} image to RGB8", other.color());
            ImageArray::U8(Array3::from_shape_vec((rows, cols, 3), other.to_rgb8().into_raw())?)
        }
    })
}
