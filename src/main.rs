//! `srpair` binary.
//!
//! Turns high-resolution images into LQ/GT training pairs. Point it at one
//! file with `--input` or at a folder with `--input-dir`; each image yields
//! `<stem>_gt.png`, `<stem>_lq.png` and a `<stem>.json` summary in
//! `--output-dir`. The pipeline is either a JSON file (`--config`) or a single
//! random-pair stage described by the inline scale and patch flags.

use clap::Parser;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    cli::run(cli::CliArgs::parse())
}
