//! Sample transforms and their composition.
//!
//! A [`Transform`] takes a [`Sample`] by value, reads the keys it requires,
//! writes the keys it produces and returns the sample for the next stage.
//! Randomness is injected per call so a pipeline driven by a seeded RNG is
//! reproducible.
use std::collections::HashSet;
use std::fmt;

use rand::RngCore;
use tracing::trace;

use crate::core::params::TransformConfig;
use crate::core::sample::Sample;
use crate::error::{Error, Result};
use crate::types::Backend;

pub mod random_pair;
pub mod resizer;

pub use random_pair::RandomPairGenerator;
pub use resizer::Resizer;

pub trait Transform: Send + Sync + fmt::Debug + fmt::Display {
    /// Applies the transform, drawing any randomness from `rng`.
    fn apply(&self, sample: Sample, rng: &mut dyn RngCore) -> Result<Sample>;

    /// Keys that must be present before this transform runs.
    fn required_keys(&self) -> Vec<&str>;

    /// Keys bound (or overwritten) by this transform.
    fn produced_keys(&self) -> Vec<&str>;
}

fn backend_label(backend: Option<Backend>) -> &'static str {
    backend.map_or("default", |b| b.as_str())
}

/// Builds a boxed transform from its config entry.
pub fn build_transform(config: &TransformConfig) -> Result<Box<dyn Transform>> {
    Ok(match config {
        TransformConfig::Resize(params) => Box::new(Resizer::from_params(params)?),
        TransformConfig::RandomPair(params) => Box::new(RandomPairGenerator::from_params(params)?),
    })
}

/// An ordered sequence of transforms applied one after another.
#[derive(Debug, Default)]
pub struct Compose {
    transforms: Vec<Box<dyn Transform>>,
}

impl Compose {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, transform: impl Transform + 'static) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    pub fn push(&mut self, transform: Box<dyn Transform>) {
        self.transforms.push(transform);
    }

    pub fn from_configs(configs: &[TransformConfig]) -> Result<Self> {
        let transforms = configs
            .iter()
            .map(build_transform)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { transforms })
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Walks the stages without running them and fails with [`Error::MissingKey`]
    /// on the first required key that neither `initial` nor an earlier stage provides.
    pub fn check_keys<'a>(&'a self, initial: impl IntoIterator<Item = &'a str>) -> Result<()> {
        let mut available: HashSet<&str> = initial.into_iter().collect();
        for transform in &self.transforms {
            for key in transform.required_keys() {
                if !available.contains(key) {
                    return Err(Error::MissingKey {
                        key: key.to_string(),
                    });
                }
            }
            available.extend(transform.produced_keys());
        }
        Ok(())
    }
}

impl Transform for Compose {
    fn apply(&self, mut sample: Sample, rng: &mut dyn RngCore) -> Result<Sample> {
        for transform in &self.transforms {
            trace!("Applying {}", transform);
            sample = transform.apply(sample, rng)?;
        }
        Ok(sample)
    }

    fn required_keys(&self) -> Vec<&str> {
        let mut produced: HashSet<&str> = HashSet::new();
        let mut required = Vec::new();
        for transform in &self.transforms {
            for key in transform.required_keys() {
                if !produced.contains(key) && !required.contains(&key) {
                    required.push(key);
                }
            }
            produced.extend(transform.produced_keys());
        }
        required
    }

    fn produced_keys(&self) -> Vec<&str> {
        let mut produced = Vec::new();
        for transform in &self.transforms {
            for key in transform.produced_keys() {
                if !produced.contains(&key) {
                    produced.push(key);
                }
            }
        }
        produced
    }
}

impl fmt::Display for Compose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Compose(")?;
        for transform in &self.transforms {
            writeln!(f, "    {}", transform)?;
        }
        write!(f, ")")
    }
}
