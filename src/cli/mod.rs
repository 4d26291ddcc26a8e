//! Command line front end for pair generation.
//!
//! `args` declares the flags, `errors` the failures that only the CLI can
//! hit (missing or conflicting inputs), and `runner` turns the flags into a
//! pipeline plus a seeded RNG before handing off to `srpair::api` for the
//! single-file or directory run.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
