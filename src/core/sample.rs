use std::collections::HashMap;

use crate::core::image::{ImageArray, Tensor};
use crate::error::{Error, Result};

/// High-resolution reference image.
pub const GT_KEY: &str = "gt";
/// Derived low-resolution image.
pub const LQ_KEY: &str = "lq";
/// Scale drawn by the random pair generator.
pub const SCALE_KEY: &str = "scale";
/// Source path of the GT image, when loaded from disk.
pub const GT_PATH_KEY: &str = "gt_path";

/// A single value stored in a [`Sample`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Array(ImageArray),
    Tensor(Tensor),
    Scalar(f64),
    Text(String),
}

impl Value {
    /// Name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Array(_) => "array",
            Value::Tensor(_) => "tensor",
            Value::Scalar(_) => "scalar",
            Value::Text(_) => "text",
        }
    }

    /// `(height, width, channels)` of an array or tensor.
    pub fn image_dim(&self) -> Result<(usize, usize, usize)> {
        match self {
            Value::Array(a) => Ok(a.dim()),
            Value::Tensor(t) => Ok(t.dim()),
            other => Err(Error::UnsupportedContainer {
                found: other.kind(),
            }),
        }
    }

    /// Crops an array or tensor, keeping the container kind.
    pub fn crop(&self, top: usize, left: usize, height: usize, width: usize) -> Result<Value> {
        match self {
            Value::Array(a) => Ok(Value::Array(a.crop(top, left, height, width)?)),
            Value::Tensor(t) => Ok(Value::Tensor(t.crop(top, left, height, width)?)),
            other => Err(Error::UnsupportedContainer {
                found: other.kind(),
            }),
        }
    }
}

impl From<ImageArray> for Value {
    fn from(a: ImageArray) -> Self {
        Value::Array(a)
    }
}

impl From<Tensor> for Value {
    fn from(t: Tensor) -> Self {
        Value::Tensor(t)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// The record that flows through a transform pipeline.
///
/// Maps feature names (`"gt"`, `"lq"`, `"scale"`, ...) to their values. Each
/// transform takes the sample by value, reads its required keys, writes its
/// outputs and hands the sample to the next stage.
///
/// Cloning is shallow for [`Value::Tensor`] entries and deep for arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sample {
    features: HashMap<String, Value>,
}

impl Sample {
    pub fn new(features: HashMap<String, Value>) -> Self {
        Self { features }
    }

    /// Creates a `Sample` from a single `(name, value)` pair.
    ///
    /// Chain with [`with_feature`](Self::with_feature) to add more features.
    pub fn from_single(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            features: HashMap::from([(name.into(), value.into())]),
        }
    }

    /// Adds or overwrites a feature.
    pub fn with_feature(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.features.insert(name.into(), value.into());
        self
    }

    /// Binds `name` to `value`, returning the previous value if any.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.features.insert(name.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Result<&Value> {
        self.features.get(key).ok_or_else(|| Error::MissingKey {
            key: key.to_string(),
        })
    }

    pub fn remove(&mut self, key: &str) -> Result<Value> {
        self.features.remove(key).ok_or_else(|| Error::MissingKey {
            key: key.to_string(),
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.features.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Returns the HWC array behind `key`, whether stored as an array or a tensor.
    pub fn image(&self, key: &str) -> Result<&ImageArray> {
        match self.get(key)? {
            Value::Array(a) => Ok(a),
            Value::Tensor(t) => Ok(t.as_ref()),
            other => Err(Error::UnsupportedContainer {
                found: other.kind(),
            }),
        }
    }

    pub fn scalar(&self, key: &str) -> Result<f64> {
        match self.get(key)? {
            Value::Scalar(v) => Ok(*v),
            other => Err(Error::Processing(format!(
                "expected a scalar under '{}', got {}",
                key,
                other.kind()
            ))),
        }
    }
}
