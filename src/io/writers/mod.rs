//! Output writers: image files and the JSON sidecar describing a generated pair.
pub mod image;
pub mod sidecar;

pub use self::image::save_image;
pub use sidecar::{PairReport, write_pair_sidecar};
