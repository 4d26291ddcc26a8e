//! Shared types and enums used across SRPAIR.
//! Includes `Interpolation`, `Backend`, `DType` and the target `Size` of a resize.
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Resampling kernel requested from a backend.
///
/// Not every backend implements every kernel; see [`Backend::supports`].
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Debug, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    Nearest,
    Bilinear,
    #[default]
    Bicubic,
    Area,
    Box,
    Lanczos,
    Hamming,
}

impl Interpolation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interpolation::Nearest => "nearest",
            Interpolation::Bilinear => "bilinear",
            Interpolation::Bicubic => "bicubic",
            Interpolation::Area => "area",
            Interpolation::Box => "box",
            Interpolation::Lanczos => "lanczos",
            Interpolation::Hamming => "hamming",
        }
    }
}

impl std::fmt::Display for Interpolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Interpolation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(Interpolation::Nearest),
            "bilinear" => Ok(Interpolation::Bilinear),
            "bicubic" => Ok(Interpolation::Bicubic),
            "area" => Ok(Interpolation::Area),
            "box" => Ok(Interpolation::Box),
            "lanczos" => Ok(Interpolation::Lanczos),
            "hamming" => Ok(Interpolation::Hamming),
            _ => Err(Error::InvalidArgument {
                arg: "interpolation",
                value: s.to_string(),
            }),
        }
    }
}

/// Image resize implementation family.
///
/// - `Fir`: `fast_image_resize`, convolution filters (`nearest`, `bilinear`, `bicubic`, `box`,
///   `lanczos`, `hamming`).
/// - `Image`: `image::imageops` (`nearest`, `bilinear`, `bicubic`, `area`, `lanczos`).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Fir,
    Image,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Fir => "fir",
            Backend::Image => "image",
        }
    }

    pub fn supports(&self, interpolation: Interpolation) -> bool {
        match self {
            Backend::Fir => !matches!(interpolation, Interpolation::Area),
            Backend::Image => !matches!(interpolation, Interpolation::Box | Interpolation::Hamming),
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fir" | "fast_image_resize" => Ok(Backend::Fir),
            "image" => Ok(Backend::Image),
            _ => Err(Error::InvalidArgument {
                arg: "backend",
                value: s.to_string(),
            }),
        }
    }
}

/// Element type of an image buffer.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DType {
    U8,
    U16,
    F32,
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DType::U8 => write!(f, "u8"),
            DType::U16 => write!(f, "u16"),
            DType::F32 => write!(f, "f32"),
        }
    }
}

/// Target size of a resize: a square edge or an explicit `(width, height)`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Size {
    Square(usize),
    Exact { width: usize, height: usize },
}

impl Size {
    /// Normalizes to `(width, height)`.
    pub fn width_height(self) -> (usize, usize) {
        match self {
            Size::Square(edge) => (edge, edge),
            Size::Exact { width, height } => (width, height),
        }
    }
}

impl From<usize> for Size {
    fn from(edge: usize) -> Self {
        Size::Square(edge)
    }
}

/// `(width, height)`
impl From<(usize, usize)> for Size {
    fn from((width, height): (usize, usize)) -> Self {
        Size::Exact { width, height }
    }
}
