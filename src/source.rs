//! Raw source reading for CSV/TSV files and spreadsheet workbooks.

use std::{fs, io::Cursor, path::Path};

use anyhow::{Context, Result, anyhow};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use log::debug;
use sha2::{Digest, Sha256};

use crate::{
    error::LoadError,
    io_utils,
    raw::{RawCell, RawTable},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Delimited,
    Workbook,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "tsv" | "txt" => Some(SourceFormat::Delimited),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(SourceFormat::Workbook),
            _ => None,
        }
    }
}

/// Reader settings for delimited sources; workbooks ignore them.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub delimiter: Option<u8>,
    pub encoding: Option<String>,
}

/// Raw contents of one source file plus its SHA-256 fingerprint.
#[derive(Debug, Clone)]
pub struct RawSource {
    pub table: RawTable,
    pub fingerprint: String,
}

pub fn read_source(path: &Path, options: &LoadOptions) -> Result<RawSource, LoadError> {
    let format = SourceFormat::from_path(path)
        .ok_or_else(|| LoadError::unavailable(path, "unsupported file extension"))?;
    let bytes = fs::read(path).map_err(|err| LoadError::unavailable(path, err))?;
    let fingerprint = fingerprint(&bytes);
    debug!(
        "Read {} byte(s) from {:?} ({:?})",
        bytes.len(),
        path,
        format
    );

    let table = match format {
        SourceFormat::Delimited => read_delimited(path, &bytes, options),
        SourceFormat::Workbook => read_workbook(bytes),
    }
    .map_err(|err| LoadError::unavailable(path, format!("{err:#}")))?;

    Ok(RawSource { table, fingerprint })
}

pub fn fingerprint(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

fn read_delimited(path: &Path, bytes: &[u8], options: &LoadOptions) -> Result<RawTable> {
    let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
    let encoding = io_utils::resolve_encoding(options.encoding.as_deref())?;
    io_utils::read_raw_table(bytes, delimiter, encoding)
}

/// Reads the first sheet; its first row is the header row.
fn read_workbook(bytes: Vec<u8>) -> Result<RawTable> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).context("Opening workbook")?;
    let sheet_names = workbook.sheet_names().to_vec();
    let sheet = sheet_names
        .first()
        .ok_or_else(|| anyhow!("Workbook has no sheets"))?;
    debug!(
        "Reading sheet '{}' (first of {})",
        sheet,
        sheet_names.len()
    );
    let range = workbook
        .worksheet_range(sheet)
        .with_context(|| format!("Reading sheet '{sheet}'"))?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|cells| {
            cells
                .iter()
                .map(|cell| workbook_cell(cell).as_text().into_owned())
                .collect()
        })
        .unwrap_or_default();
    let mut table = RawTable::new(headers);
    for cells in rows {
        table.push_row(cells.iter().map(workbook_cell).collect());
    }
    Ok(table)
}

fn workbook_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Blank,
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Float(f) => RawCell::Number(*f),
        Data::String(s) => RawCell::from_text(s),
        other => RawCell::Text(other.to_string()),
    }
}
