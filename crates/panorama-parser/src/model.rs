use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use polars::prelude::*;
use tracing::warn;

use crate::errors::ParseError;
use crate::load::load_raw_table;
use crate::metrics::Metric;
use crate::normalize::canonical_ident;
use crate::resolve::{coerce_numeric, find_date_column, find_post_id_column, parse_loose_date};

/// One raw cell after best-effort numeric coercion: either a parsed number
/// or the original text, never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            CellValue::Text(_) => None,
        }
    }
}

/// One input file as read from disk: original headers in original order,
/// rows of raw cell text. No shape invariant beyond header width.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub source_file: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

/// One input file after header canonicalization and field resolution.
///
/// Columns are stored under their canonical names with insertion order
/// preserved. Two distinct original headers that canonicalize identically
/// are not disambiguated: the last occurrence wins (a warning is logged).
/// The synthesized `dates` and `post_ids` fields are sum-typed: an absent
/// date or identifier stays `None` and forms its own group downstream.
#[derive(Debug, Clone)]
pub struct NormalizedFrame {
    pub source_file: String,
    column_order: Vec<String>,
    columns: HashMap<String, Vec<CellValue>>,
    pub dates: Vec<Option<NaiveDate>>,
    pub post_ids: Vec<Option<String>>,
}

impl NormalizedFrame {
    pub fn from_table(table: RawTable) -> Self {
        let canonical: Vec<String> = table
            .headers
            .iter()
            .map(|header| canonical_ident(header))
            .collect();

        let mut column_order: Vec<String> = Vec::with_capacity(canonical.len());
        let mut raw_columns: HashMap<String, Vec<String>> = HashMap::new();
        for (idx, name) in canonical.iter().enumerate() {
            let cells: Vec<String> = table
                .rows
                .iter()
                .map(|row| row.get(idx).cloned().unwrap_or_default())
                .collect();
            if raw_columns.insert(name.clone(), cells).is_some() {
                warn!(
                    column = %name,
                    file = %table.source_file,
                    "duplicate canonical header, keeping the last occurrence"
                );
            } else {
                column_order.push(name.clone());
            }
        }

        let dates: Vec<Option<NaiveDate>> = match find_date_column(&canonical) {
            Some(date_col) => raw_columns[date_col]
                .iter()
                .map(|cell| parse_loose_date(cell))
                .collect(),
            None => vec![None; table.rows.len()],
        };

        let post_id_col: Option<String> =
            find_post_id_column(&column_order).map(str::to_string);
        let post_ids: Vec<Option<String>> = match post_id_col.as_deref() {
            Some(name) => raw_columns[name]
                .iter()
                .map(|cell| {
                    let trimmed = cell.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        Some(trimmed.to_string())
                    }
                })
                .collect(),
            None => vec![None; table.rows.len()],
        };

        // Numeric coercion applies to every column except the adopted post
        // identifier column; the identifier is text wholesale.
        let mut columns: HashMap<String, Vec<CellValue>> =
            HashMap::with_capacity(raw_columns.len());
        for (name, cells) in raw_columns {
            let is_post_id = post_id_col.as_deref() == Some(name.as_str());
            let converted: Vec<CellValue> = cells
                .into_iter()
                .map(|cell| {
                    if is_post_id {
                        CellValue::Text(cell)
                    } else {
                        coerce_numeric(&cell)
                    }
                })
                .collect();
            columns.insert(name, converted);
        }

        NormalizedFrame {
            source_file: table.source_file,
            column_order,
            columns,
            dates,
            post_ids,
        }
    }

    pub fn height(&self) -> usize {
        self.dates.len()
    }

    pub fn column_order(&self) -> &[String] {
        &self.column_order
    }

    pub fn column(&self, name: &str) -> Option<&[CellValue]> {
        self.columns.get(name).map(Vec::as_slice)
    }
}

/// One input file mapped onto the canonical metric schema, ready for
/// concatenation: nullable `date` and `post_id`, the ten canonical metrics
/// as floats, and the source file name as provenance.
#[derive(Debug, Clone)]
pub struct MetricFrame {
    pub source_file: String,
    pub df: DataFrame,
}

impl MetricFrame {
    /// Loader → normalizer → resolver → metric mapper for a single file.
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let table = load_raw_table(path)?;
        let frame = NormalizedFrame::from_table(table);
        Self::from_normalized(&frame)
    }

    pub fn from_normalized(frame: &NormalizedFrame) -> Result<Self, ParseError> {
        let height = frame.height();
        let frame_err = |source| ParseError::Frame {
            source_file: frame.source_file.clone(),
            source,
        };

        let epoch = NaiveDate::default();
        let days: Vec<Option<i32>> = frame
            .dates
            .iter()
            .map(|date| date.map(|d| d.signed_duration_since(epoch).num_days() as i32))
            .collect();
        let date_series = Series::new("date".into(), days)
            .cast(&DataType::Date)
            .map_err(frame_err)?;

        let mut columns: Vec<Column> = Vec::with_capacity(Metric::ALL.len() + 3);
        columns.push(date_series.into());

        let ids: Vec<Option<&str>> = frame.post_ids.iter().map(|id| id.as_deref()).collect();
        columns.push(Series::new("post_id".into(), ids).into());

        for metric in Metric::ALL {
            let values: Vec<Option<f64>> = match metric
                .aliases()
                .iter()
                .copied()
                .find_map(|alias| frame.column(alias))
            {
                Some(cells) => cells.iter().map(CellValue::as_number).collect(),
                None => vec![Some(0.0); height],
            };
            columns.push(Series::new(metric.canonical_name().into(), values).into());
        }

        columns.push(
            Series::new(
                "source_file".into(),
                vec![frame.source_file.as_str(); height],
            )
            .into(),
        );

        let df = DataFrame::new(columns).map_err(frame_err)?;

        Ok(MetricFrame {
            source_file: frame.source_file.clone(),
            df,
        })
    }
}
