use serde::{Deserialize, Serialize};

use crate::types::{Backend, Interpolation};

fn default_scale_min() -> f64 {
    1.0
}

fn default_scale_max() -> f64 {
    4.0
}

/// Parameters of a deterministic [`Resizer`](crate::transforms::Resizer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeParams {
    /// > 1 upsamples, < 1 downsamples
    pub scale: f64,
    pub input_key: String,
    /// May equal `input_key`, in which case the input is replaced
    pub output_key: String,
    #[serde(default)]
    pub interpolation: Interpolation,
    /// None means the process-wide default backend
    #[serde(default)]
    pub backend: Option<Backend>,
}

/// Parameters of a [`RandomPairGenerator`](crate::transforms::RandomPairGenerator)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomPairParams {
    /// Inclusive
    #[serde(default = "default_scale_min")]
    pub scale_min: f64,
    /// Exclusive
    #[serde(default = "default_scale_max")]
    pub scale_max: f64,
    /// LQ patch edge; None keeps the whole image
    #[serde(default)]
    pub patch_size: Option<usize>,
    #[serde(default)]
    pub interpolation: Interpolation,
    #[serde(default)]
    pub backend: Option<Backend>,
}

impl Default for RandomPairParams {
    fn default() -> Self {
        Self {
            scale_min: default_scale_min(),
            scale_max: default_scale_max(),
            patch_size: None,
            interpolation: Interpolation::default(),
            backend: None,
        }
    }
}

/// One pipeline stage, tagged by `type` in config files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformConfig {
    Resize(ResizeParams),
    RandomPair(RandomPairParams),
}

/// A whole pipeline as stored in a JSON config file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Seed for the pipeline RNG; None draws from OS entropy
    #[serde(default)]
    pub seed: Option<u64>,
    pub transforms: Vec<TransformConfig>,
}
