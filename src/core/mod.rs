//! Core building blocks: image containers, the `Sample` record, construction
//! parameters and resize processing. These are consumed by `transforms` and the
//! high-level `api` module.
pub mod image;
pub mod params;
pub mod processing;
pub mod sample;
