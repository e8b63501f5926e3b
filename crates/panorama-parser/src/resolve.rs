use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::model::CellValue;

/// Substrings that mark a canonical column name as carrying a date/time
/// semantic. The first matching column, in original column order, wins.
const DATE_HINTS: &[&str] = &["data", "date", "time", "dia", "created"];

/// Canonical names consulted for the post identifier, in priority order.
/// Only the first name present in a frame is ever adopted; candidates are
/// never merged.
const POST_ID_CANDIDATES: &[&str] = &[
    "post_id",
    "id",
    "publicacao",
    "publicacao_id",
    "publicacoe_id",
    "post",
    "postagem",
    "permalink",
    "link",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%m/%d/%Y",
    "%d/%m/%y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const ZONED_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%d %H:%M:%S%z"];

pub fn find_date_column(canonical_headers: &[String]) -> Option<&str> {
    canonical_headers
        .iter()
        .map(String::as_str)
        .find(|name| DATE_HINTS.iter().any(|hint| name.contains(hint)))
}

pub fn find_post_id_column<'a>(present: &'a [String]) -> Option<&'a str> {
    POST_ID_CANDIDATES.iter().find_map(|candidate| {
        present
            .iter()
            .find(|name| name.as_str() == *candidate)
            .map(String::as_str)
    })
}

/// Permissive free-text date parsing. Day-first formats are tried before
/// month-first because these exports are predominantly Portuguese.
/// Anything unparseable yields `None`, never an error.
pub fn parse_loose_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date_naive());
        }
    }
    None
}

/// Best-effort numeric coercion: strips thousands-separator commas and
/// attempts a float parse. Values that fail the numeric pattern pass through
/// as text unchanged; this function never fails.
pub fn coerce_numeric(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellValue::Text(raw.to_string());
    }
    let stripped = trimmed.replace(',', "");
    match stripped.parse::<f64>() {
        Ok(value) => CellValue::Number(value),
        Err(_) => CellValue::Text(raw.to_string()),
    }
}
