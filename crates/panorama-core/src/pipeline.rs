use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use tracing::{info, warn};

use crate::aggregate::aggregate_frames;
use crate::error::{EtlError, Result};
use crate::output::write_output;
use panorama_parser::MetricFrame;

#[derive(Debug)]
pub struct RunSummary {
    pub files_ingested: usize,
    pub rows_written: usize,
    pub output_path: PathBuf,
}

/// Runs the full pipeline once: discover exports, canonicalize each file,
/// aggregate the union, write the output.
///
/// Files are processed one at a time, fully materialized. Any fatal
/// condition (no discoverable inputs, an undecodable or unreadable file)
/// aborts before the output path is touched; there is no per-file
/// skip-and-continue.
pub fn run(input_dir: &Path, output_path: &Path) -> Result<RunSummary> {
    let pattern = input_dir.join("*.csv");
    let pattern_str = pattern.to_str().ok_or_else(|| {
        EtlError::Processing(format!("invalid input path {}", input_dir.display()))
    })?;

    let mut frames: Vec<DataFrame> = Vec::new();
    for entry in glob::glob(pattern_str)? {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                warn!("could not read path from glob pattern: {err}");
                continue;
            }
        };
        info!(file = %path.display(), "loading export");
        let frame = MetricFrame::from_path(&path)?;
        frames.push(frame.df);
    }

    if frames.is_empty() {
        return Err(EtlError::Processing(format!(
            "no CSV exports found in {}",
            input_dir.display()
        )));
    }
    let files_ingested = frames.len();

    let aggregated = aggregate_frames(frames)?;
    let rows_written = write_output(aggregated, output_path)?;

    Ok(RunSummary {
        files_ingested,
        rows_written,
        output_path: output_path.to_path_buf(),
    })
}
