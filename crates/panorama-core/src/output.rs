use std::fs;
use std::path::Path;

use polars::prelude::*;
use tracing::info;

use crate::error::Result;

/// Serializes the aggregated dataset to the output CSV.
///
/// The sum-typed group keys are rendered at this boundary only: absent dates
/// become `undetermined`, absent identifiers become `absent`. The file is
/// written wholesale from an in-memory buffer, so a failed run never leaves
/// a half-written output behind.
pub fn write_output(aggregated: DataFrame, path: &Path) -> Result<usize> {
    let has_post_id = aggregated
        .get_column_names()
        .iter()
        .any(|name| name.as_str() == "post_id");

    let mut rendered: Vec<Expr> = vec![col("date")
        .dt()
        .strftime("%Y-%m-%d")
        .fill_null(lit("undetermined"))
        .alias("date")];
    if has_post_id {
        rendered.push(col("post_id").fill_null(lit("absent")));
    }

    let mut out = aggregated.lazy().with_columns(rendered).collect()?;

    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(&mut out)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, &buffer)?;

    info!(rows = out.height(), path = %path.display(), "output written");
    Ok(out.height())
}
