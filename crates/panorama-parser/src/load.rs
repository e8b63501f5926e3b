use std::fs;
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use tracing::warn;

use crate::errors::ParseError;
use crate::model::RawTable;

/// Reads one raw export into a tabular frame of original headers and rows.
///
/// Decoding tries strict UTF-8 first, then retries with WINDOWS-1252 (the
/// Latin-family single-byte encoding older exports ship in). A file neither
/// decoder accepts is a fatal per-file error. The CSV reader runs flexible:
/// short rows are padded with empty cells, long rows truncated to the header
/// width; structural errors beyond that surface as the csv crate's own
/// errors.
pub fn load_raw_table(path: &Path) -> Result<RawTable, ParseError> {
    let bytes = fs::read(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = decode_text(&bytes, path)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| ParseError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| ParseError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let mut row: Vec<String> = record.iter().map(|cell| cell.to_string()).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    let source_file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(RawTable {
        source_file,
        headers,
        rows,
    })
}

fn decode_text(bytes: &[u8], path: &Path) -> Result<String, ParseError> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(_) => {
            warn!(
                file = %path.display(),
                "not valid UTF-8, retrying with WINDOWS-1252"
            );
            let (text, _, had_errors) = WINDOWS_1252.decode(bytes);
            if had_errors {
                Err(ParseError::Decode {
                    path: path.to_path_buf(),
                })
            } else {
                Ok(text.into_owned())
            }
        }
    }
}
