use std::fmt;

use rand::RngCore;
use tracing::debug;

use crate::core::params::ResizeParams;
use crate::core::processing::resize::{resize_value, scaled_dimension};
use crate::core::sample::Sample;
use crate::error::{Error, Result};
use crate::transforms::{Transform, backend_label};
use crate::types::{Backend, Interpolation, Size};

/// Rescales the image under `input_key` by a fixed factor and stores the result
/// under `output_key` (which may be the same key).
///
/// Output size is `(floor(h * scale + 1e-9), floor(w * scale + 1e-9))`.
#[derive(Debug, Clone, PartialEq)]
pub struct Resizer {
    scale: f64,
    input_key: String,
    output_key: String,
    interpolation: Interpolation,
    backend: Option<Backend>,
}

impl Resizer {
    pub fn new(
        scale: f64,
        input_key: impl Into<String>,
        output_key: impl Into<String>,
        interpolation: Interpolation,
        backend: Option<Backend>,
    ) -> Result<Self> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(Error::InvalidArgument {
                arg: "scale",
                value: scale.to_string(),
            });
        }
        Ok(Self {
            scale,
            input_key: input_key.into(),
            output_key: output_key.into(),
            interpolation,
            backend,
        })
    }

    pub fn from_params(params: &ResizeParams) -> Result<Self> {
        Self::new(
            params.scale,
            params.input_key.as_str(),
            params.output_key.as_str(),
            params.interpolation,
            params.backend,
        )
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn input_key(&self) -> &str {
        &self.input_key
    }

    pub fn output_key(&self) -> &str {
        &self.output_key
    }

    /// `(height, width)` after scaling.
    pub fn output_size(&self, height: usize, width: usize) -> (usize, usize) {
        (
            scaled_dimension(height, self.scale),
            scaled_dimension(width, self.scale),
        )
    }

    /// Resizes `input_key` into `output_key`; no other key is touched.
    pub fn resize(&self, mut sample: Sample) -> Result<Sample> {
        let image = sample.get(&self.input_key)?;
        let (h_in, w_in, _) = image.image_dim()?;
        let (h_out, w_out) = self.output_size(h_in, w_in);
        let resized = resize_value(
            image,
            Size::Exact {
                width: w_out,
                height: h_out,
            },
            self.interpolation,
            self.backend,
        )?;
        debug!(
            "Resized '{}' {}x{} -> '{}' {}x{}",
            self.input_key, w_in, h_in, self.output_key, w_out, h_out
        );
        sample.insert(self.output_key.clone(), resized);
        Ok(sample)
    }
}

impl Transform for Resizer {
    fn apply(&self, sample: Sample, _rng: &mut dyn RngCore) -> Result<Sample> {
        self.resize(sample)
    }

    fn required_keys(&self) -> Vec<&str> {
        vec![self.input_key.as_str()]
    }

    fn produced_keys(&self) -> Vec<&str> {
        vec![self.output_key.as_str()]
    }
}

impl fmt::Display for Resizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Resizer scale={}, input_key={}, output_key={}, interpolation={}, backend={}",
            self.scale,
            self.input_key,
            self.output_key,
            self.interpolation,
            backend_label(self.backend)
        )
    }
}
