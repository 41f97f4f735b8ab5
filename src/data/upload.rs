use std::fmt;
use std::io::Cursor;

use anyhow::{anyhow, bail, Context};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{NaiveDateTime, NaiveTime};

use crate::error::{DashboardError, Result};

/// Shown in place of the table whenever an upload cannot be read.
pub const UPLOAD_ERROR_MESSAGE: &str = "There was an error processing this file.";

/// Number of characters of raw content echoed under the table.
pub const EXCERPT_CHARS: usize = 200;

// ---------------------------------------------------------------------------
// CellValue – a single cell of an uploaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common dataframe dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date string kept as text.
    Date(String),
    Null,
}

impl CellValue {
    /// Guess the type of a raw text cell.
    pub fn infer(s: &str) -> Self {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        match s {
            "true" | "True" | "TRUE" => CellValue::Bool(true),
            "false" | "False" | "FALSE" => CellValue::Bool(false),
            _ => CellValue::String(s.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) | CellValue::Date(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Int(i) => CellValue::Integer(*i),
            Data::Float(f) => CellValue::Float(*f),
            Data::String(s) => CellValue::String(s.clone()),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTimeIso(s) => CellValue::Date(s.clone()),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(dt) => CellValue::Date(iso_datetime(dt)),
                None => CellValue::Float(dt.as_f64()),
            },
            Data::Empty => CellValue::Null,
            other => CellValue::String(other.to_string()),
        }
    }
}

/// Midnight timestamps print as plain dates.
fn iso_datetime(dt: NaiveDateTime) -> String {
    if dt.time() == NaiveTime::MIN {
        dt.date().format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

// ---------------------------------------------------------------------------
// UploadPreview – what the upload region shows
// ---------------------------------------------------------------------------

/// A successfully parsed upload.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePreview {
    pub filename: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    /// Leading characters of the raw upload followed by `...`: the text
    /// itself for UTF-8 uploads, a base64 data URL for binary ones.
    pub excerpt: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadPreview {
    Table(TablePreview),
    Error { filename: String, message: String },
}

impl UploadPreview {
    pub fn error(filename: &str) -> Self {
        UploadPreview::Error {
            filename: filename.to_string(),
            message: UPLOAD_ERROR_MESSAGE.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UploadKind {
    Csv,
    Spreadsheet,
}

/// Pick a reader from the filename. "csv" wins over "xls" when both appear.
fn sniff(filename: &str) -> Option<UploadKind> {
    let lower = filename.to_ascii_lowercase();
    if lower.contains("csv") {
        Some(UploadKind::Csv)
    } else if lower.contains("xls") {
        Some(UploadKind::Spreadsheet)
    } else {
        None
    }
}

/// Turn one uploaded file into a preview. Never fails: anything that cannot
/// be read becomes [`UploadPreview::Error`] and the reason is logged.
pub fn parse(bytes: &[u8], filename: &str) -> UploadPreview {
    match parse_table(bytes, filename) {
        Ok((columns, rows)) => {
            log::info!(
                "Parsed upload '{filename}': {} rows × {} columns",
                rows.len(),
                columns.len()
            );
            UploadPreview::Table(TablePreview {
                filename: filename.to_string(),
                columns,
                rows,
                excerpt: excerpt(bytes),
            })
        }
        Err(e) => {
            log::warn!("{e}");
            UploadPreview::error(filename)
        }
    }
}

type Table = (Vec<String>, Vec<Vec<CellValue>>);

fn parse_table(bytes: &[u8], filename: &str) -> Result<Table> {
    let parsed = match sniff(filename) {
        Some(UploadKind::Csv) => parse_csv(bytes),
        Some(UploadKind::Spreadsheet) => parse_spreadsheet(bytes),
        None => Err(anyhow!("unsupported file type")),
    };
    parsed.map_err(|e| DashboardError::UploadParse {
        filename: filename.to_string(),
        reason: format!("{e:#}"),
    })
}

fn parse_csv(bytes: &[u8]) -> anyhow::Result<Table> {
    let text = std::str::from_utf8(bytes).context("decoding upload as UTF-8")?;
    let mut reader = csv::Reader::from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if columns.is_empty() {
        bail!("no columns to parse from file");
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(CellValue::infer).collect());
    }
    Ok((columns, rows))
}

/// First sheet only; its first row is the header.
fn parse_spreadsheet(bytes: &[u8]) -> anyhow::Result<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| anyhow!("opening workbook: {e}"))?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no sheets")?
        .map_err(|e| anyhow!("reading first sheet: {e}"))?;

    let mut sheet_rows = range.rows();
    let Some(header) = sheet_rows.next() else {
        return Ok((Vec::new(), Vec::new()));
    };

    let columns = header
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            Data::Empty => format!("Unnamed: {i}"),
            other => other.to_string(),
        })
        .collect();
    let rows = sheet_rows
        .map(|row| row.iter().map(CellValue::from).collect())
        .collect();
    Ok((columns, rows))
}

fn excerpt(bytes: &[u8]) -> String {
    let source = match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            // Four base64 characters per three bytes covers the excerpt.
            let head = &bytes[..bytes.len().min(EXCERPT_CHARS / 4 * 3 + 3)];
            format!("data:application/octet-stream;base64,{}", STANDARD.encode(head))
        }
    };
    let mut text: String = source.chars().take(EXCERPT_CHARS).collect();
    text.push_str("...");
    text
}
