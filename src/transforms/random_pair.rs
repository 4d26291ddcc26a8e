use std::fmt;

use rand::{Rng, RngCore};
use tracing::debug;

use crate::core::params::RandomPairParams;
use crate::core::processing::resize::{reduced_dimension, resize_value, round_half_even};
use crate::core::sample::{GT_KEY, LQ_KEY, SCALE_KEY, Sample, Value};
use crate::error::{Error, Result};
use crate::transforms::{Transform, backend_label};
use crate::types::{Backend, Interpolation, Size};

/// Synthesizes an LQ/GT training pair from the image under `"gt"`.
///
/// A scale is drawn uniformly from `[scale_min, scale_max)`. Then:
///
/// - without a patch size, GT is trimmed from the origin to
///   `round(h_lr * scale) x round(w_lr * scale)` where
///   `h_lr = floor(H / scale + 1e-9)`, and LQ is GT downsampled to `h_lr x w_lr`;
/// - with a patch size `p`, a square GT crop of edge `round(p * scale)` is taken
///   at a random origin and LQ is that crop downsampled to `p x p`.
///
/// Writes `"gt"`, `"lq"` and `"scale"`.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomPairGenerator {
    scale_min: f64,
    scale_max: f64,
    patch_size: Option<usize>,
    interpolation: Interpolation,
    backend: Option<Backend>,
}

impl RandomPairGenerator {
    pub fn new(
        scale_min: f64,
        scale_max: f64,
        patch_size: Option<usize>,
        interpolation: Interpolation,
        backend: Option<Backend>,
    ) -> Result<Self> {
        if !(scale_min.is_finite() && scale_min > 0.0) {
            return Err(Error::InvalidArgument {
                arg: "scale_min",
                value: scale_min.to_string(),
            });
        }
        if !scale_max.is_finite() || scale_max < scale_min {
            return Err(Error::InvalidArgument {
                arg: "scale_max",
                value: format!("{} (scale_min={})", scale_max, scale_min),
            });
        }
        if patch_size == Some(0) {
            return Err(Error::InvalidArgument {
                arg: "patch_size",
                value: "0".to_string(),
            });
        }
        Ok(Self {
            scale_min,
            scale_max,
            patch_size,
            interpolation,
            backend,
        })
    }

    pub fn from_params(params: &RandomPairParams) -> Result<Self> {
        Self::new(
            params.scale_min,
            params.scale_max,
            params.patch_size,
            params.interpolation,
            params.backend,
        )
    }

    /// Uniform draw from `[scale_min, scale_max)`; exactly `scale_min` when the bounds coincide.
    pub fn draw_scale<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.scale_max > self.scale_min {
            rng.gen_range(self.scale_min..self.scale_max)
        } else {
            self.scale_min
        }
    }

    pub fn generate<R: Rng + ?Sized>(&self, mut sample: Sample, rng: &mut R) -> Result<Sample> {
        let gt = sample.get(GT_KEY)?;
        let (height, width, _) = gt.image_dim()?;
        let scale = self.draw_scale(rng);

        let (crop_hr, crop_lr) = match self.patch_size {
            None => {
                let h_lr = reduced_dimension(height, scale);
                let w_lr = reduced_dimension(width, scale);
                let h_hr = round_half_even(h_lr as f64 * scale).min(height);
                let w_hr = round_half_even(w_lr as f64 * scale).min(width);
                let trimmed = if (h_hr, w_hr) == (height, width) {
                    None
                } else {
                    Some(gt.crop(0, 0, h_hr, w_hr)?)
                };
                let lr = resize_value(
                    trimmed.as_ref().unwrap_or(gt),
                    Size::Exact {
                        width: w_lr,
                        height: h_lr,
                    },
                    self.interpolation,
                    self.backend,
                )?;
                debug!(
                    "scale={:.4}: gt {}x{} trimmed to {}x{}, lq {}x{}",
                    scale, width, height, w_hr, h_hr, w_lr, h_lr
                );
                (trimmed, lr)
            }
            Some(w_lr) => {
                let w_hr = round_half_even(w_lr as f64 * scale);
                if height <= w_hr || width <= w_hr {
                    return Err(Error::CropOutOfBounds {
                        top: 0,
                        left: 0,
                        crop_height: w_hr,
                        crop_width: w_hr,
                        height,
                        width,
                    });
                }
                let top = rng.gen_range(0..height - w_hr);
                let left = rng.gen_range(0..width - w_hr);
                let hr = gt.crop(top, left, w_hr, w_hr)?;
                let lr = resize_value(&hr, Size::Square(w_lr), self.interpolation, self.backend)?;
                debug!(
                    "scale={:.4}: gt {}x{} cropped at ({}, {}) to {}x{}, lq {}x{}",
                    scale, width, height, top, left, w_hr, w_hr, w_lr, w_lr
                );
                (Some(hr), lr)
            }
        };

        if let Some(hr) = crop_hr {
            sample.insert(GT_KEY, hr);
        }
        sample.insert(LQ_KEY, crop_lr);
        sample.insert(SCALE_KEY, Value::Scalar(scale));
        Ok(sample)
    }
}

impl Transform for RandomPairGenerator {
    fn apply(&self, sample: Sample, rng: &mut dyn RngCore) -> Result<Sample> {
        self.generate(sample, rng)
    }

    fn required_keys(&self) -> Vec<&str> {
        vec![GT_KEY]
    }

    fn produced_keys(&self) -> Vec<&str> {
        vec![GT_KEY, LQ_KEY, SCALE_KEY]
    }
}

impl fmt::Display for RandomPairGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let patch = match self.patch_size {
            Some(p) => p.to_string(),
            None => "none".to_string(),
        };
        write!(
            f,
            "RandomPairGenerator scale_min={}, scale_max={}, patch_size={}, interpolation={}, backend={}",
            self.scale_min,
            self.scale_max,
            patch,
            self.interpolation,
            backend_label(self.backend)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::image::{ImageArray, Tensor};
    use ndarray::Array3;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Single-channel image whose pixel value encodes its position.
    fn position_image(rows: usize, cols: usize) -> ImageArray {
        ImageArray::U16(Array3::from_shape_fn((rows, cols, 1), |(r, c, _)| {
            (r * cols + c) as u16
        }))
    }

    fn u16_pixels(value: &Value) -> Array3<u16> {
        match value {
            Value::Array(ImageArray::U16(a)) => a.clone(),
            Value::Tensor(t) => match t.as_ref() {
                ImageArray::U16(a) => a.clone(),
                other => panic!("unexpected dtype {}", other.dtype()),
            },
            other => panic!("unexpected value {}", other.kind()),
        }
    }

    #[test]
    fn fixed_scale_patch_mode_crops_inside_the_source() -> Result<()> {
        let generator =
            RandomPairGenerator::new(2.0, 2.0, Some(16), Interpolation::Bicubic, Some(Backend::Fir))?;
        let source = position_image(64, 64);
        let mut rng = StdRng::seed_from_u64(0);
        let mut seen_top = Vec::new();

        for _ in 0..200 {
            let out = generator.generate(Sample::from_single(GT_KEY, source.clone()), &mut rng)?;
            assert_eq!(out.scalar(SCALE_KEY)?, 2.0);
            assert_eq!(out.get(LQ_KEY)?.image_dim()?, (16, 16, 1));

            let gt = u16_pixels(out.get(GT_KEY)?);
            assert_eq!(gt.dim(), (32, 32, 1));
            let origin = gt[[0, 0, 0]] as usize;
            let (top, left) = (origin / 64, origin % 64);
            assert!(top < 32 && left < 32, "origin ({}, {})", top, left);
            assert_eq!(gt[[31, 31, 0]] as usize, (top + 31) * 64 + left + 31);
            seen_top.push(top);
        }
        // both ends of the origin range get exercised
        assert!(seen_top.iter().any(|&t| t < 4));
        assert!(seen_top.iter().any(|&t| t > 27));
        Ok(())
    }

    #[test]
    fn whole_image_mode_trims_to_scale_multiple() -> Result<()> {
        let generator =
            RandomPairGenerator::new(1.0, 4.0, None, Interpolation::Bicubic, Some(Backend::Fir))?;
        let mut rng = StdRng::seed_from_u64(42);

        for (h, w) in [(97, 61), (128, 128), (50, 203)] {
            for _ in 0..25 {
                let source = position_image(h, w);
                let out = generator.generate(Sample::from_single(GT_KEY, source), &mut rng)?;
                let scale = out.scalar(SCALE_KEY)?;
                assert!((1.0..4.0).contains(&scale), "scale {}", scale);

                let h_lr = (h as f64 / scale + 1e-9).floor() as usize;
                let w_lr = (w as f64 / scale + 1e-9).floor() as usize;
                assert_eq!(out.get(LQ_KEY)?.image_dim()?, (h_lr, w_lr, 1));

                let gt = u16_pixels(out.get(GT_KEY)?);
                let (gh, gw, _) = gt.dim();
                assert_eq!(gh, (h_lr as f64 * scale).round_ties_even() as usize);
                assert_eq!(gw, (w_lr as f64 * scale).round_ties_even() as usize);
                assert!(gh <= h && gw <= w);
                // trimmed from the origin
                assert_eq!(gt[[0, 0, 0]], 0);
                assert_eq!(gt[[gh - 1, gw - 1, 0]] as usize, (gh - 1) * w + gw - 1);
            }
        }
        Ok(())
    }

    #[test]
    fn integer_scale_without_patch_keeps_divisible_images() -> Result<()> {
        let generator =
            RandomPairGenerator::new(3.0, 3.0, None, Interpolation::Area, Some(Backend::Image))?;
        let mut rng = StdRng::seed_from_u64(1);
        let out = generator.generate(Sample::from_single(GT_KEY, position_image(96, 60)), &mut rng)?;
        assert_eq!(out.get(GT_KEY)?.image_dim()?, (96, 60, 1));
        assert_eq!(out.get(LQ_KEY)?.image_dim()?, (32, 20, 1));
        Ok(())
    }

    #[test]
    fn crop_larger_than_source_is_an_error() -> Result<()> {
        let generator =
            RandomPairGenerator::new(2.0, 2.0, Some(32), Interpolation::Bicubic, Some(Backend::Fir))?;
        let mut rng = StdRng::seed_from_u64(3);

        let err = generator
            .generate(Sample::from_single(GT_KEY, position_image(48, 100)), &mut rng)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::CropOutOfBounds {
                crop_height: 64,
                height: 48,
                ..
            }
        ));

        // a source exactly the crop size leaves an empty origin range
        let err = generator
            .generate(Sample::from_single(GT_KEY, position_image(64, 64)), &mut rng)
            .unwrap_err();
        assert!(matches!(err, Error::CropOutOfBounds { .. }));
        Ok(())
    }

    #[test]
    fn wide_scale_range_fails_only_for_draws_that_overflow() -> Result<()> {
        let generator =
            RandomPairGenerator::new(1.0, 4.0, Some(16), Interpolation::Bicubic, Some(Backend::Fir))?;
        let source = position_image(40, 40);
        let mut rng = StdRng::seed_from_u64(17);
        let (mut ok, mut failed) = (0, 0);

        for _ in 0..200 {
            // generate() draws the scale first, so a clone sees the same value
            let scale = generator.draw_scale(&mut rng.clone());
            let w_hr = (16.0 * scale).round_ties_even() as usize;

            match generator.generate(Sample::from_single(GT_KEY, source.clone()), &mut rng) {
                Ok(out) => {
                    assert!(w_hr < 40, "scale {} should not fit", scale);
                    assert_eq!(out.scalar(SCALE_KEY)?, scale);
                    assert_eq!(out.get(LQ_KEY)?.image_dim()?, (16, 16, 1));

                    let gt = u16_pixels(out.get(GT_KEY)?);
                    assert_eq!(gt.dim(), (w_hr, w_hr, 1));
                    let origin = gt[[0, 0, 0]] as usize;
                    let (top, left) = (origin / 40, origin % 40);
                    assert!(top + w_hr < 40 && left + w_hr < 40, "origin ({}, {})", top, left);
                    assert_eq!(
                        gt[[w_hr - 1, w_hr - 1, 0]] as usize,
                        (top + w_hr - 1) * 40 + left + w_hr - 1
                    );
                    ok += 1;
                }
                Err(Error::CropOutOfBounds {
                    crop_height,
                    height,
                    ..
                }) => {
                    assert!(w_hr >= 40, "scale {} should fit", scale);
                    assert_eq!((crop_height, height), (w_hr, 40));
                    failed += 1;
                }
                Err(other) => panic!("unexpected error {:?}", other),
            }
        }
        assert!(ok > 0 && failed > 0, "ok={} failed={}", ok, failed);
        Ok(())
    }

    #[test]
    fn same_seed_gives_same_pair() -> Result<()> {
        let generator =
            RandomPairGenerator::new(1.5, 3.5, Some(12), Interpolation::Bilinear, Some(Backend::Fir))?;
        let source = position_image(80, 90);
        let run = |seed: u64| -> Result<Sample> {
            let mut rng = StdRng::seed_from_u64(seed);
            generator.generate(Sample::from_single(GT_KEY, source.clone()), &mut rng)
        };
        assert_eq!(run(9)?, run(9)?);
        Ok(())
    }

    #[test]
    fn prior_scale_and_lq_are_overwritten() -> Result<()> {
        let generator =
            RandomPairGenerator::new(2.0, 2.0, None, Interpolation::Bicubic, Some(Backend::Fir))?;
        let sample = Sample::from_single(GT_KEY, position_image(20, 20))
            .with_feature(SCALE_KEY, 99.0)
            .with_feature(LQ_KEY, position_image(1, 1));
        let out = generator.generate(sample, &mut StdRng::seed_from_u64(0))?;
        assert_eq!(out.scalar(SCALE_KEY)?, 2.0);
        assert_eq!(out.get(LQ_KEY)?.image_dim()?, (10, 10, 1));
        Ok(())
    }

    #[test]
    fn tensor_sources_produce_tensors() -> Result<()> {
        let generator =
            RandomPairGenerator::new(2.0, 2.0, Some(8), Interpolation::Bicubic, Some(Backend::Fir))?;
        let sample = Sample::from_single(GT_KEY, Tensor::new(position_image(40, 40)));
        let out = generator.generate(sample, &mut StdRng::seed_from_u64(5))?;
        assert_eq!(out.get(GT_KEY)?.kind(), "tensor");
        assert_eq!(out.get(LQ_KEY)?.kind(), "tensor");
        assert_eq!(out.get(GT_KEY)?.image_dim()?, (16, 16, 1));
        Ok(())
    }

    #[test]
    fn missing_gt_fails() {
        let generator = RandomPairGenerator::new(1.0, 4.0, None, Interpolation::Bicubic, None).unwrap();
        let sample = Sample::from_single("img", position_image(8, 8));
        assert!(matches!(
            generator.generate(sample, &mut StdRng::seed_from_u64(0)),
            Err(Error::MissingKey { .. })
        ));
    }

    #[test]
    fn invalid_bounds_are_rejected() {
        assert!(matches!(
            RandomPairGenerator::new(4.0, 2.0, None, Interpolation::Bicubic, None),
            Err(Error::InvalidArgument { arg: "scale_max", .. })
        ));
        assert!(matches!(
            RandomPairGenerator::new(0.0, 2.0, None, Interpolation::Bicubic, None),
            Err(Error::InvalidArgument { arg: "scale_min", .. })
        ));
        assert!(matches!(
            RandomPairGenerator::new(1.0, 2.0, Some(0), Interpolation::Bicubic, None),
            Err(Error::InvalidArgument { arg: "patch_size", .. })
        ));
        assert!(RandomPairGenerator::new(2.0, 2.0, Some(4), Interpolation::Bicubic, None).is_ok());
    }

    #[test]
    fn display_lists_configuration() {
        let generator =
            RandomPairGenerator::new(1.0, 4.0, Some(48), Interpolation::Bicubic, None).unwrap();
        assert_eq!(
            generator.to_string(),
            "RandomPairGenerator scale_min=1, scale_max=4, patch_size=48, interpolation=bicubic, backend=default"
        );
    }
}
