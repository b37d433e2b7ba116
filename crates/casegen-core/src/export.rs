//! Final JSON and spreadsheet exports.
//!
//! Both exports carry the same records. The spreadsheet has one row per test
//! case and one column per field name seen anywhere in the set, in first-seen
//! order; a record without a field leaves that cell blank.

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook, XlsxError};
use serde::ser::Error as _;
use serde_json::{Map, Value};

use crate::domain::TestCase;
use crate::error::{PipelineError, Result};

pub const SHEET_NAME: &str = "test_cases";

/// Longest text a single cell may hold.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Test cases as JSON objects, in order.
pub fn to_records(cases: &[TestCase]) -> Result<Vec<Map<String, Value>>> {
    cases
        .iter()
        .map(|case| match serde_json::to_value(case)? {
            Value::Object(map) => Ok(map),
            other => Err(PipelineError::Serialization(serde_json::Error::custom(
                format!("test case {} did not serialize to an object: {other}", case.id),
            ))),
        })
        .collect()
}

/// Union of field names across `records`, in first-seen order.
pub fn columns(records: &[Map<String, Value>]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

/// Text form of a cell: strings verbatim, null as empty, everything else as
/// compact JSON. Cut to [`MAX_CELL_CHARS`] characters.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => clip(s).to_string(),
        other => clip(&other.to_string()).to_string(),
    }
}

fn clip(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Render `cases` as an XLSX workbook bound for `path`.
///
/// The document creation time is pinned to `date` so that two renders of the
/// same records on the same day produce the same workbook. The JSON export
/// keeps full values; oversized cell text is clipped here only.
pub fn render_spreadsheet(cases: &[TestCase], date: NaiveDate, path: &Path) -> Result<Vec<u8>> {
    let records = to_records(cases)?;
    build_workbook(&records, date).map_err(|e| PipelineError::spreadsheet(path, e))
}

fn build_workbook(
    records: &[Map<String, Value>],
    date: NaiveDate,
) -> std::result::Result<Vec<u8>, XlsxError> {
    let columns = columns(records);

    let mut workbook = Workbook::new();
    let created = ExcelDateTime::from_ymd(
        u16::try_from(date.year()).unwrap_or(1900),
        date.month() as u8,
        date.day() as u8,
    )?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, name) in columns.iter().enumerate() {
        sheet.write_string_with_format(0, col_index(col), clip(name), &header)?;
    }

    for (idx, record) in records.iter().enumerate() {
        let row = u32::try_from(idx + 1).unwrap_or(u32::MAX);
        for (col, name) in columns.iter().enumerate() {
            let col = col_index(col);
            match record.get(name) {
                None | Some(Value::Null) => {}
                Some(Value::Bool(b)) => {
                    sheet.write_boolean(row, col, *b)?;
                }
                Some(Value::Number(n)) => match n.as_f64() {
                    Some(f) => {
                        sheet.write_number(row, col, f)?;
                    }
                    None => {
                        sheet.write_string(row, col, n.to_string())?;
                    }
                },
                Some(value) => {
                    sheet.write_string(row, col, cell_text(value))?;
                }
            }
        }
    }

    workbook.save_to_buffer()
}

// Out-of-range columns saturate and are rejected by the writer.
fn col_index(col: usize) -> u16 {
    u16::try_from(col).unwrap_or(u16::MAX)
}
