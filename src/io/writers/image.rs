use std::path::Path;

use image::{DynamicImage, ImageBuffer, Pixel};
use tracing::info;

use crate::core::image::ImageArray;
use crate::error::{Error, Result};

fn buffer<P: Pixel>(width: u32, height: u32, raw: Vec<P::Subpixel>) -> Result<ImageBuffer<P, Vec<P::Subpixel>>> {
    ImageBuffer::from_raw(width, height, raw)
        .ok_or_else(|| Error::Processing("pixel buffer does not match image dimensions".to_string()))
}

/// Wraps an HWC array as a `DynamicImage`.
///
/// Float arrays are converted to 8 bits since the common encoders have no f32 path;
/// only 3 and 4 channel float arrays are accepted.
pub fn array_to_dynamic(array: &ImageArray) -> Result<DynamicImage> {
    let (rows, cols, channels) = array.dim();
    let unsupported = Error::UnsupportedPixelLayout {
        dtype: array.dtype(),
        channels,
    };
    let width = u32::try_from(cols).map_err(Error::external)?;
    let height = u32::try_from(rows).map_err(Error::external)?;

    Ok(match array {
        ImageArray::U8(a) => {
            let raw = a.as_standard_layout().into_owned().into_raw_vec();
            match channels {
                1 => DynamicImage::ImageLuma8(buffer(width, height, raw)?),
                2 => DynamicImage::ImageLumaA8(buffer(width, height, raw)?),
                3 => DynamicImage::ImageRgb8(buffer(width, height, raw)?),
                4 => DynamicImage::ImageRgba8(buffer(width, height, raw)?),
                _ => return Err(unsupported),
            }
        }
        ImageArray::U16(a) => {
            let raw = a.as_standard_layout().into_owned().into_raw_vec();
            match channels {
                1 => DynamicImage::ImageLuma16(buffer(width, height, raw)?),
                2 => DynamicImage::ImageLumaA16(buffer(width, height, raw)?),
                3 => DynamicImage::ImageRgb16(buffer(width, height, raw)?),
                4 => DynamicImage::ImageRgba16(buffer(width, height, raw)?),
                _ => return Err(unsupported),
            }
        }
        ImageArray::F32(a) => {
            let raw = a.as_standard_layout().into_owned().into_raw_vec();
            match channels {
                3 => DynamicImage::ImageRgb8(DynamicImage::ImageRgb32F(buffer(width, height, raw)?).to_rgb8()),
                4 => DynamicImage::ImageRgba8(DynamicImage::ImageRgba32F(buffer(width, height, raw)?).to_rgba8()),
                _ => return Err(unsupported),
            }
        }
    })
}

/// Encodes `array` to `path`; the format follows the file extension.
pub fn save_image(array: &ImageArray, path: &Path) -> Result<()> {
    array_to_dynamic(array)?.save(path)?;
    info!("Wrote {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::reader::load_image;
    use ndarray::Array3;

    #[test]
    fn u8_and_u16_arrays_round_trip_through_png() -> Result<()> {
        let dir = tempfile::tempdir()?;

        let rgb = ImageArray::U8(Array3::from_shape_fn((6, 9, 3), |(r, c, ch)| (r * 20 + c * 3 + ch) as u8));
        let path = dir.path().join("rgb.png");
        save_image(&rgb, &path)?;
        assert_eq!(load_image(&path)?, rgb);

        let deep = ImageArray::U16(Array3::from_shape_fn((4, 4, 1), |(r, c, _)| (r * 4000 + c) as u16));
        let path = dir.path().join("deep.png");
        save_image(&deep, &path)?;
        assert_eq!(load_image(&path)?, deep);
        Ok(())
    }

    #[test]
    fn float_arrays_are_written_as_8_bit() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let float = ImageArray::F32(Array3::from_elem((3, 3, 3), 1.0));
        let path = dir.path().join("float.png");
        save_image(&float, &path)?;
        match load_image(&path)? {
            ImageArray::U8(a) => assert!(a.iter().all(|&v| v == 255)),
            other => panic!("unexpected dtype {}", other.dtype()),
        }

        let gray_float = ImageArray::F32(Array3::zeros((3, 3, 1)));
        assert!(matches!(
            save_image(&gray_float, &dir.path().join("gray.png")),
            Err(Error::UnsupportedPixelLayout { channels: 1, .. })
        ));
        Ok(())
    }
}
