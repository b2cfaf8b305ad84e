//! CSV reading with encoding and delimiter auto-detection.
//!
//! School ERP exports are nominally UTF-8 but frequently arrive as
//! ISO-8859-1 or Windows-1252, so the parser sniffs the encoding before
//! decoding. Rows come back as header-name → raw-value maps; no
//! enrollment-specific logic lives here.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{CsvError, CsvResult};

/// One CSV row: header name → raw field value.
///
/// Fields missing from a short row are simply absent from the map.
pub type Record = BTreeMap<String, String>;

/// Delimiter assumed when detection finds nothing better.
pub const DEFAULT_DELIMITER: char = ';';

/// Result of parsing with metadata.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed rows in input order.
    pub records: Vec<Record>,
    /// Detected or requested encoding.
    pub encoding: String,
    /// Detected or requested delimiter.
    pub delimiter: char,
    /// Column headers, trimmed.
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet, normalized to the
/// charset names [`decode_content`] understands.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let (charset, _, _) = chardet::detect(bytes);

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the named encoding.
///
/// Unknown charsets fall back to lossy UTF-8; a BOM is stripped.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let codec = match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15,
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252,
        _ => encoding_rs::UTF_8,
    };
    let (text, _, _) = codec.decode(bytes);
    text.into_owned()
}

/// Detect the delimiter by counting candidates in the header line.
///
/// Ties and misses resolve to the semicolon the source system exports.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [';', ',', '\t', '|'];
    let mut best_sep = DEFAULT_DELIMITER;
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse decoded CSV text into rows with an explicit delimiter.
///
/// Quoted fields may contain the delimiter; short rows leave their trailing
/// fields absent; extra fields beyond the header are dropped.
pub fn parse_records(content: &str, delimiter: char) -> CsvResult<(Vec<String>, Vec<Record>)> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let delim = if delimiter.is_ascii() {
        delimiter as u8
    } else {
        DEFAULT_DELIMITER as u8
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delim)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row = Record::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            row.insert(header.clone(), value.to_string());
        }
        records.push(row);
    }

    Ok((headers, records))
}

/// Parse CSV bytes, auto-detecting encoding and (unless given) delimiter.
pub fn parse_bytes(bytes: &[u8], delimiter: Option<char>) -> CsvResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));

    let (headers, records) = parse_records(&content, delimiter)?;

    Ok(ParseResult {
        records,
        encoding,
        delimiter,
        headers,
    })
}

/// Parse a CSV file, auto-detecting encoding and (unless given) delimiter.
pub fn parse_file<P: AsRef<Path>>(path: P, delimiter: Option<char>) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes, delimiter)
}
