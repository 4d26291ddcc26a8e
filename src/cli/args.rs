use clap::Parser;
use std::path::PathBuf;

use srpair::{Backend, Interpolation};

#[derive(Parser, Debug)]
#[command(name = "srpair", version, about = "SRPAIR CLI: synthesize LQ/GT super-resolution training pairs")]
pub struct CliArgs {
    /// Input image (single file mode)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Input directory containing images (batch mode)
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Output directory for <stem>_gt.png, <stem>_lq.png and <stem>.json
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// JSON pipeline config. When given, the inline pair options below are ignored
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Minimum scale, inclusive
    #[arg(long, default_value_t = 1.0)]
    pub scale_min: f64,

    /// Maximum scale, exclusive
    #[arg(long, default_value_t = 4.0)]
    pub scale_max: f64,

    /// LQ patch size; omit to derive LQ from the whole image
    #[arg(long)]
    pub patch_size: Option<usize>,

    /// Interpolation (nearest, bilinear, bicubic, area, box, lanczos, hamming)
    #[arg(long, value_enum, default_value_t = Interpolation::Bicubic)]
    pub interpolation: Interpolation,

    /// Resize backend for the inline pair stage (fir or image); defaults to the process-wide backend
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,

    /// Process-wide default backend for stages that do not name one
    #[arg(long, value_enum)]
    pub default_backend: Option<Backend>,

    /// RNG seed; overrides the seed of a config file
    #[arg(long)]
    pub seed: Option<u64>,

    /// Batch mode: keep going when a file fails
    #[arg(long, default_value_t = false)]
    pub continue_on_error: bool,

    /// Enable logging (filter with RUST_LOG)
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
