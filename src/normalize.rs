//! Field normalization: raw export → canonical [`PlayerTable`].
//!
//! The pass runs in a fixed order:
//!
//! 1. header hygiene (trim, drop placeholder and duplicate columns)
//! 2. required-column check (`Player`, `Span`)
//! 3. team extraction from the first parenthetical of the player name
//! 4. span split into start/end years (strict)
//! 5. lenient numeric coercion of stat columns (dash → `0`, garbage → `0`)
//! 6. highest-score parsing with the not-out marker removed
//!
//! Rows are never dropped or reordered. The only row-level failure is a
//! malformed span, which fails the whole table.

use std::{collections::HashSet, sync::OnceLock};

use log::debug;
use regex::Regex;

use crate::{
    error::LoadError,
    raw::RawTable,
    record::{Column, PlayerRecord, PlayerTable, STAT_COLUMNS},
};

pub const PLAYER_COLUMN: &str = "Player";
pub const SPAN_COLUMN: &str = "Span";
pub const HIGHEST_SCORE_COLUMN: &str = "HS";

const TEAM_PREFIX: &str = "ICC/";
const NOT_OUT_MARKER: char = '*';

/// Columns the normalizer recomputes; a source carrying them (for example a
/// previous export of this tool) has them dropped rather than passed through.
const DERIVED_COLUMNS: [Column; 4] = [
    Column::Team,
    Column::StartYear,
    Column::EndYear,
    Column::HighestScoreNumeric,
];

static PARENTHETICAL: OnceLock<Regex> = OnceLock::new();

fn parenthetical() -> &'static Regex {
    PARENTHETICAL.get_or_init(|| Regex::new(r"\((.*?)\)").expect("valid parenthetical pattern"))
}

pub fn normalize(raw: &RawTable) -> Result<PlayerTable, LoadError> {
    let columns = clean_headers(&raw.headers);
    let position = |name: &str| {
        columns
            .iter()
            .find(|(_, header)| header == name)
            .map(|(idx, _)| *idx)
    };

    let player_idx = position(PLAYER_COLUMN);
    let span_idx = position(SPAN_COLUMN);
    let (player_idx, span_idx) = match (player_idx, span_idx) {
        (Some(player), Some(span)) => (player, span),
        _ => {
            let missing = [(PLAYER_COLUMN, player_idx), (SPAN_COLUMN, span_idx)]
                .into_iter()
                .filter(|(_, idx)| idx.is_none())
                .map(|(name, _)| name.to_string())
                .collect();
            return Err(LoadError::SchemaError { missing });
        }
    };

    let stat_indices = STAT_COLUMNS.map(|column| position(column.header()));
    for (column, idx) in STAT_COLUMNS.iter().zip(&stat_indices) {
        if idx.is_none() {
            debug!("Stat column '{column}' not present; filling with 0");
        }
    }
    let highest_idx = position(HIGHEST_SCORE_COLUMN);

    let reserved: HashSet<&str> = [PLAYER_COLUMN, SPAN_COLUMN, HIGHEST_SCORE_COLUMN]
        .into_iter()
        .chain(STAT_COLUMNS.iter().map(|c| c.header()))
        .chain(DERIVED_COLUMNS.iter().map(|c| c.header()))
        .collect();
    let extras = columns
        .iter()
        .filter(|(_, header)| !reserved.contains(header.as_str()))
        .cloned()
        .collect::<Vec<_>>();

    let mut defaulted = 0usize;
    let mut rows = Vec::with_capacity(raw.row_count());
    for row_idx in 0..raw.row_count() {
        let text_at = move |idx: usize| raw.cell(row_idx, idx).as_text();
        let player_name = text_at(player_idx).trim().to_string();
        let team = extract_team(&player_name);

        let span = text_at(span_idx);
        let (career_start_year, career_end_year) =
            parse_span(&span).ok_or_else(|| LoadError::RowParseError {
                row: row_idx + 1,
                column: SPAN_COLUMN.to_string(),
                value: span.to_string(),
            })?;

        let mut stats = [0.0; STAT_COLUMNS.len()];
        for (slot, idx) in stats.iter_mut().zip(&stat_indices) {
            let Some(idx) = idx else {
                continue;
            };
            let text = text_at(*idx);
            match parse_stat(&text) {
                Some(value) => *slot = value,
                None if text.trim().is_empty() => {}
                None => defaulted += 1,
            }
        }
        let [matches, innings, not_outs, runs, average, centuries, fifties] = stats;

        let highest_score = highest_idx
            .map(|idx| text_at(idx).trim().to_string())
            .unwrap_or_default();
        let highest_score_numeric = parse_highest_score(&highest_score);

        rows.push(PlayerRecord {
            player_name,
            team,
            career_start_year,
            career_end_year,
            matches,
            innings,
            not_outs,
            runs,
            highest_score,
            highest_score_numeric,
            average,
            centuries,
            fifties,
            extras: extras
                .iter()
                .map(|(idx, _)| text_at(*idx).trim().to_string())
                .collect(),
        });
    }

    if defaulted > 0 {
        debug!("Coerced {defaulted} non-numeric stat cell(s) to 0");
    }
    debug!(
        "Normalized {} row(s) with {} passthrough column(s)",
        rows.len(),
        extras.len()
    );
    Ok(PlayerTable::new(
        extras.into_iter().map(|(_, name)| name).collect(),
        rows,
    ))
}

/// Trims headers and drops placeholder and duplicate columns, keeping the
/// first occurrence. Returns the surviving `(source index, name)` pairs.
pub fn clean_headers(headers: &[String]) -> Vec<(usize, String)> {
    let mut seen = HashSet::new();
    headers
        .iter()
        .enumerate()
        .filter_map(|(idx, header)| {
            let name = header.trim();
            if is_placeholder_header(name) {
                debug!("Dropping placeholder column {idx} ('{header}')");
                return None;
            }
            if !seen.insert(name.to_string()) {
                debug!("Dropping duplicate column '{name}' at position {idx}");
                return None;
            }
            Some((idx, name.to_string()))
        })
        .collect()
}

fn is_placeholder_header(name: &str) -> bool {
    let lowered = name.to_lowercase();
    lowered.is_empty() || lowered == "nan" || lowered.starts_with("unnamed")
}

/// Team code from the first `(...)` group of a player name.
pub fn extract_team(player_name: &str) -> Option<String> {
    let captures = parenthetical().captures(player_name)?;
    captures.get(1).map(|inner| clean_team(inner.as_str()))
}

fn clean_team(raw: &str) -> String {
    raw.replace(TEAM_PREFIX, "")
        .chars()
        .filter(|c| !c.is_ascii_digit())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Splits `YYYY-YYYY` into start and end years. Anything other than exactly
/// two hyphen-joined integers is rejected.
pub fn parse_span(value: &str) -> Option<(i32, i32)> {
    let mut parts = value.split('-');
    let (Some(start), Some(end), None) = (parts.next(), parts.next(), parts.next()) else {
        return None;
    };
    Some((start.trim().parse().ok()?, end.trim().parse().ok()?))
}

/// Lenient stat coercion: every `-` becomes `0`, anything unparseable is `0`.
pub fn coerce_number(value: &str) -> f64 {
    parse_stat(value).unwrap_or_default()
}

fn parse_stat(value: &str) -> Option<f64> {
    parse_finite(&value.replace('-', "0"))
}

pub fn parse_highest_score(value: &str) -> f64 {
    parse_finite(&value.replace(NOT_OUT_MARKER, "")).unwrap_or_default()
}

fn parse_finite(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
}
