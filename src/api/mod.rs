//! High-level, ergonomic library API: load and build pipelines from config files,
//! generate LQ/GT pairs from image files, and write them to disk one file or one
//! directory at a time. Prefer these entrypoints over the low-level transform
//! modules when integrating SRPAIR into a data preparation job.
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{info, warn};

use crate::core::params::PipelineConfig;
use crate::core::sample::{GT_KEY, GT_PATH_KEY, LQ_KEY, SCALE_KEY, Sample};
use crate::error::{Error, Result};
use crate::io::reader::load_image;
use crate::io::writers::{PairReport, save_image, write_pair_sidecar};
use crate::transforms::{Compose, Transform};

/// File extensions picked up by directory processing.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff", "webp"];

/// Read a JSON pipeline config from disk
pub fn load_pipeline_config(path: &Path) -> Result<PipelineConfig> {
    let text = std::fs::read_to_string(path)?;
    let config: PipelineConfig = serde_json::from_str(&text)?;
    info!(
        "Loaded pipeline config {:?} ({} stage(s))",
        path,
        config.transforms.len()
    );
    Ok(config)
}

/// Build the transforms of `config` and check that they can run on a freshly loaded sample.
pub fn build_pipeline(config: &PipelineConfig) -> Result<Compose> {
    let pipeline = Compose::from_configs(&config.transforms)?;
    pipeline.check_keys([GT_KEY, GT_PATH_KEY])?;
    Ok(pipeline)
}

/// Seeded RNG when `seed` is given, OS entropy otherwise
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Load an image file as a sample with `"gt"` and `"gt_path"` bound
pub fn load_sample(input: &Path) -> Result<Sample> {
    let gt = load_image(input)?;
    Ok(Sample::from_single(GT_KEY, gt)
        .with_feature(GT_PATH_KEY, input.to_string_lossy().into_owned()))
}

/// Load `input` and run it through `pipeline`
pub fn generate_pair(
    input: &Path,
    pipeline: &dyn Transform,
    rng: &mut dyn RngCore,
) -> Result<Sample> {
    let sample = load_sample(input)?;
    pipeline.apply(sample, rng)
}

fn shape_of(sample: &Sample, key: &str) -> Result<[usize; 3]> {
    let (h, w, c) = sample.image(key)?.dim();
    Ok([h, w, c])
}

/// Generate a pair from `input` and write `<stem>_gt.png`, `<stem>_lq.png` and
/// `<stem>.json` into `output_dir`
pub fn process_image_to_dir(
    input: &Path,
    output_dir: &Path,
    pipeline: &dyn Transform,
    rng: &mut dyn RngCore,
) -> Result<PairReport> {
    let stem = input
        .file_stem()
        .ok_or_else(|| Error::InvalidArgument {
            arg: "input",
            value: input.display().to_string(),
        })?
        .to_string_lossy()
        .into_owned();

    let sample = generate_pair(input, pipeline, rng)?;

    std::fs::create_dir_all(output_dir)?;
    let gt_path = output_dir.join(format!("{}_gt.png", stem));
    let lq_path = output_dir.join(format!("{}_lq.png", stem));
    save_image(sample.image(GT_KEY)?, &gt_path)?;
    save_image(sample.image(LQ_KEY)?, &lq_path)?;

    let report = PairReport {
        source: input.to_path_buf(),
        gt_path,
        lq_path,
        scale: sample.scalar(SCALE_KEY).ok(),
        gt_shape: shape_of(&sample, GT_KEY)?,
        lq_shape: shape_of(&sample, LQ_KEY)?,
    };
    write_pair_sidecar(&report, &output_dir.join(format!("{}.json", stem)))?;
    Ok(report)
}

/// Batch processing report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Immediate entries of `input_dir`, sorted so seeded runs visit files in a stable order
pub fn iterate_directory(input_dir: &Path) -> Result<std::vec::IntoIter<PathBuf>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(input_dir)? {
        entries.push(entry?.path());
    }
    entries.sort();
    Ok(entries.into_iter())
}

/// Process every image file in `input_dir` into `output_dir`.
/// Non-image entries are skipped. If `continue_on_error` is true, failures are counted in
/// the report and processing continues; otherwise, the first error is returned.
pub fn process_directory_to_dir(
    input_dir: &Path,
    output_dir: &Path,
    pipeline: &dyn Transform,
    rng: &mut dyn RngCore,
    continue_on_error: bool,
) -> Result<BatchReport> {
    std::fs::create_dir_all(output_dir)?;

    let mut report = BatchReport::default();
    for path in iterate_directory(input_dir)? {
        if !path.is_file() || !has_image_extension(&path) {
            info!("Skipping non-image entry: {:?}", path);
            report.skipped += 1;
            continue;
        }

        match process_image_to_dir(&path, output_dir, pipeline, rng) {
            Ok(_) => report.processed += 1,
            Err(e) => {
                report.errors += 1;
                if !continue_on_error {
                    return Err(e);
                }
                warn!("Error processing {:?}: {}", path, e);
            }
        }
    }

    info!(
        "Batch complete: processed={} skipped={} errors={}",
        report.processed, report.skipped, report.errors
    );
    Ok(report)
}
