use std::path::Path;

use serde::Serialize;

use crate::error::{EtlError, Result};
use panorama_parser::load_raw_table;

/// Read-only diagnostics for one raw export: original headers, shape, and a
/// handful of sample rows. Inspects inputs before the pipeline runs and
/// takes no part in the ETL contract.
#[derive(Debug, Clone, Serialize)]
pub struct FileProfile {
    pub file_name: String,
    pub rows: usize,
    pub columns: Vec<String>,
    pub sample: Vec<Vec<String>>,
}

pub fn profile_file(path: &Path, sample_limit: usize) -> Result<FileProfile> {
    let table = load_raw_table(path)?;
    Ok(FileProfile {
        file_name: table.source_file.clone(),
        rows: table.rows.len(),
        columns: table.headers.clone(),
        sample: table.rows.iter().take(sample_limit).cloned().collect(),
    })
}

pub fn profile_dir(input_dir: &Path, sample_limit: usize) -> Result<Vec<FileProfile>> {
    let pattern = input_dir.join("*.csv");
    let pattern_str = pattern.to_str().ok_or_else(|| {
        EtlError::Processing(format!("invalid input path {}", input_dir.display()))
    })?;

    let mut profiles = Vec::new();
    for entry in glob::glob(pattern_str)? {
        let path = match entry {
            Ok(path) => path,
            Err(_) => continue,
        };
        profiles.push(profile_file(&path, sample_limit)?);
    }

    if profiles.is_empty() {
        return Err(EtlError::Processing(format!(
            "no CSV exports found in {}",
            input_dir.display()
        )));
    }
    Ok(profiles)
}
