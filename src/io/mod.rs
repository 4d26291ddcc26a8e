//! I/O layer for image files and pair outputs.
//! Provides the `reader` that decodes image files into `ImageArray`s and the
//! `writers` for PNG/JPEG/... outputs and JSON pair sidecars.
pub mod reader;
pub use reader::load_image;

pub mod writers;
pub use writers::{PairReport, save_image, write_pair_sidecar};
