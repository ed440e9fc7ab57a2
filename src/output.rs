use std::{
    fs::File,
    io::{self, BufWriter, Write},
};

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;

use crate::{
    cli::{OutputArgs, OutputFormat},
    io_utils,
    record::PlayerTable,
    table,
};

/// A view ready for any of the output formats.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub json: JsonValue,
}

impl Rendered {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>, json: JsonValue) -> Self {
        Self {
            headers,
            rows,
            json,
        }
    }

    pub fn from_table(view: &PlayerTable) -> Self {
        Self::new(
            view.headers(),
            view.display_rows(),
            JsonValue::Array(view.json_records()),
        )
    }

    /// Single-column listing, e.g. team or player names.
    pub fn from_names(header: &str, names: &[String]) -> Self {
        Self::new(
            vec![header.to_string()],
            names.iter().map(|name| vec![name.clone()]).collect(),
            JsonValue::from(names.to_vec()),
        )
    }
}

/// Applies `--limit` to a list view before it is rendered, so every output
/// format sees the same records.
pub fn limited<T>(mut items: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    items
}

/// Writes an already limited view in the requested format.
pub fn emit(rendered: Rendered, args: &OutputArgs) -> Result<()> {
    let path = args.output.as_deref();
    match args.format {
        OutputFormat::Table => {
            let text = table::render_table(&rendered.headers, &rendered.rows);
            let mut writer = open_writer(path)?;
            writer
                .write_all(text.as_bytes())
                .context("Writing table output")?;
            writer.flush().context("Flushing table output")
        }
        OutputFormat::Csv => {
            let delimiter = io_utils::resolve_output_delimiter(path, None);
            let mut writer = io_utils::open_csv_writer(path, delimiter)?;
            writer
                .write_record(&rendered.headers)
                .context("Writing output headers")?;
            for (idx, row) in rendered.rows.iter().enumerate() {
                writer
                    .write_record(row)
                    .with_context(|| format!("Writing output row {}", idx + 1))?;
            }
            writer.flush().context("Flushing output")
        }
        OutputFormat::Json => {
            let mut writer = open_writer(path)?;
            serde_json::to_writer_pretty(&mut writer, &rendered.json)
                .context("Writing JSON output")?;
            writeln!(writer).context("Writing JSON output")?;
            writer.flush().context("Flushing JSON output")
        }
    }
}

fn open_writer(path: Option<&std::path::Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        None => Box::new(io::stdout()),
    })
}
