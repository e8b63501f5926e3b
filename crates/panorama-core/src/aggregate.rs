use polars::prelude::*;

use crate::error::{EtlError, Result};
use panorama_parser::Metric;

/// Names of the derived ratio columns, in output order.
pub const RATIO_COLUMNS: [&str; 4] = [
    "ctr",
    "engagement_rate",
    "visits_per_click",
    "calls_per_click",
];

/// Unions the per-file metric frames row-wise (no deduplication across
/// files), groups by (date, post_id) when any row in the whole dataset has a
/// resolved identifier and by (date) alone otherwise, sums the canonical
/// metrics, and computes the derived ratios from the aggregated sums.
///
/// Null group keys survive aggregation: rows without a date or identifier
/// form their own groups. Output rows are sorted on the group key so a rerun
/// over unchanged inputs reproduces the output byte for byte.
pub fn aggregate_frames(frames: Vec<DataFrame>) -> Result<DataFrame> {
    if frames.is_empty() {
        return Err(EtlError::Processing(
            "no frames to aggregate".to_string(),
        ));
    }

    let lazyframes: Vec<LazyFrame> = frames.into_iter().map(|df| df.lazy()).collect();
    let unified = concat(&lazyframes, UnionArgs::default())?.collect()?;

    // Dataset-wide grouping decision, not per-row.
    let post_id = unified.column("post_id")?;
    let has_post_ids = post_id.null_count() < unified.height();

    let mut keys = vec![col("date")];
    if has_post_ids {
        keys.push(col("post_id"));
    }

    let sums: Vec<Expr> = Metric::ALL
        .iter()
        .map(|metric| col(metric.canonical_name()).sum())
        .collect();

    let zero_filled: Vec<Expr> = Metric::ALL
        .iter()
        .map(|metric| col(metric.canonical_name()).fill_null(lit(0.0f64)))
        .collect();

    let ratios = [
        ratio_expr("link_clicks", "impressions", "ctr"),
        ratio_expr("engagements", "reach", "engagement_rate"),
        ratio_expr("visits", "link_clicks", "visits_per_click"),
        ratio_expr("call_clicks", "link_clicks", "calls_per_click"),
    ];

    let cleaned_ratios: Vec<Expr> = RATIO_COLUMNS
        .iter()
        .map(|name| col(*name).fill_nan(lit(0.0f64)).fill_null(lit(0.0f64)))
        .collect();

    let sort_keys: Vec<&str> = if has_post_ids {
        vec!["date", "post_id"]
    } else {
        vec!["date"]
    };

    let mut ordered: Vec<Expr> = vec![col("date")];
    if has_post_ids {
        ordered.push(col("post_id"));
    }
    for metric in Metric::ALL {
        ordered.push(col(metric.canonical_name()));
    }
    for name in RATIO_COLUMNS {
        ordered.push(col(name));
    }

    let aggregated = unified
        .lazy()
        .group_by(keys)
        .agg(sums)
        .with_columns(zero_filled)
        .with_columns(ratios)
        .with_columns(cleaned_ratios)
        .sort(sort_keys, SortMultipleOptions::default())
        .select(ordered)
        .collect()?;

    Ok(aggregated)
}

fn ratio_expr(numerator: &str, denominator: &str, name: &str) -> Expr {
    when(col(denominator).gt(lit(0.0f64)))
        .then(col(numerator) / col(denominator))
        .otherwise(lit(0.0f64))
        .alias(name)
}
