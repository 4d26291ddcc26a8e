use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;

/// Summary of one generated LQ/GT pair, written next to the images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairReport {
    pub source: PathBuf,
    pub gt_path: PathBuf,
    pub lq_path: PathBuf,
    /// Drawn scale; None when the pipeline did not record one
    pub scale: Option<f64>,
    /// `[height, width, channels]`
    pub gt_shape: [usize; 3],
    pub lq_shape: [usize; 3],
}

pub fn write_pair_sidecar(report: &PairReport, path: &Path) -> Result<()> {
    let json_string = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json_string)?;
    info!("Created pair sidecar: {:?}", path);
    Ok(())
}
