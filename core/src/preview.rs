//! Client-side CSV preview.
//!
//! Shows the first few records of a file before it is uploaded. Records are
//! read with a real CSV reader, so a quoted field containing a comma stays
//! one cell; for unquoted content this is exactly a split on literal commas.
//! Blank lines are skipped. The raw bytes go through encoding detection
//! first, so Latin-1 exports preview readably.

use std::borrow::Cow;

use csv::ReaderBuilder;

use crate::error::{PreviewError, PreviewResult};

/// First records of a CSV file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CsvPreview {
    pub rows: Vec<Vec<String>>,
    /// Detected or assumed encoding of the source bytes.
    pub encoding: String,
}

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes with the given encoding label, falling back to lossy UTF-8
/// for unknown labels. A byte order mark overrides the label.
pub fn decode_content<'a>(bytes: &'a [u8], encoding: &str) -> Cow<'a, str> {
    let encoding = encoding_rs::Encoding::for_label(encoding.as_bytes())
        .unwrap_or(encoding_rs::UTF_8);
    encoding.decode(bytes).0
}

/// Preview the first `max_rows` non-empty records of CSV text.
pub fn preview_csv(content: &str, max_rows: usize) -> PreviewResult<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(b',')
        .from_reader(content.as_bytes());

    let mut rows = Vec::with_capacity(max_rows);
    for record in reader.records() {
        if rows.len() == max_rows {
            break;
        }
        let record = record?;
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    if rows.is_empty() && max_rows > 0 {
        return Err(PreviewError::EmptyFile);
    }
    Ok(rows)
}

/// Preview raw file bytes, detecting their encoding first.
pub fn preview_bytes(bytes: &[u8], max_rows: usize) -> PreviewResult<CsvPreview> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let rows = preview_csv(&content, max_rows)?;
    Ok(CsvPreview { rows, encoding })
}
