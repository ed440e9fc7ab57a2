//! Canonical player records and the column selectors used to query them.
//!
//! A [`PlayerTable`] is the normalized, typed form of one batting export.
//! Queries never mutate a table; they build new ones through
//! [`PlayerTable::derive`], which keeps the passthrough column layout and
//! source fingerprint of the table it came from.

use std::{fmt, str::FromStr};

use anyhow::{Result, anyhow};
use serde_json::{Map, Value as JsonValue, json};

use crate::{
    data::Value,
    raw::{RawCell, RawTable},
};

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub player_name: String,
    pub team: Option<String>,
    pub career_start_year: i32,
    pub career_end_year: i32,
    pub matches: f64,
    pub innings: f64,
    pub not_outs: f64,
    pub runs: f64,
    pub highest_score: String,
    pub highest_score_numeric: f64,
    pub average: f64,
    pub centuries: f64,
    pub fifties: f64,
    pub extras: Vec<String>,
}

impl PlayerRecord {
    pub fn span(&self) -> String {
        format!("{}-{}", self.career_start_year, self.career_end_year)
    }

    /// JSON object keyed by column header, `null` for an absent team, then
    /// the passthrough columns named by `extra_columns`.
    pub fn to_json(&self, extra_columns: &[String]) -> JsonValue {
        let mut object = Map::new();
        for column in Column::ALL {
            let value = column.value(self).map_or(JsonValue::Null, |value| json!(value));
            object.insert(column.header().to_string(), value);
        }
        for (name, value) in extra_columns.iter().zip(&self.extras) {
            object.insert(name.clone(), JsonValue::from(value.as_str()));
        }
        JsonValue::Object(object)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerTable {
    pub extra_columns: Vec<String>,
    pub rows: Vec<PlayerRecord>,
    pub fingerprint: Option<String>,
}

impl PlayerTable {
    pub fn new(extra_columns: Vec<String>, rows: Vec<PlayerRecord>) -> Self {
        Self {
            extra_columns,
            rows,
            fingerprint: None,
        }
    }

    /// Builds a derived view over `rows` with this table's column layout.
    pub fn derive(&self, rows: Vec<PlayerRecord>) -> Self {
        Self {
            extra_columns: self.extra_columns.clone(),
            rows,
            fingerprint: self.fingerprint.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `limit` rows, or the whole table when no limit is given.
    pub fn head(&self, limit: Option<usize>) -> Self {
        match limit {
            Some(limit) => self.derive(self.rows.iter().take(limit).cloned().collect()),
            None => self.clone(),
        }
    }

    pub fn headers(&self) -> Vec<String> {
        Column::ALL
            .iter()
            .map(|column| column.header().to_string())
            .chain(self.extra_columns.iter().cloned())
            .collect()
    }

    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|record| {
                Column::ALL
                    .iter()
                    .map(|column| {
                        column
                            .value(record)
                            .map(|value| value.as_display())
                            .unwrap_or_default()
                    })
                    .chain(record.extras.iter().cloned())
                    .collect()
            })
            .collect()
    }

    /// One JSON object per row, keyed by column header in table order.
    pub fn json_records(&self) -> Vec<JsonValue> {
        self.rows
            .iter()
            .map(|record| record.to_json(&self.extra_columns))
            .collect()
    }

    /// Maps the canonical table back onto the raw source layout so it can be
    /// fed through normalization again.
    pub fn to_raw(&self) -> RawTable {
        let mut headers = vec!["Player".to_string(), "Span".to_string()];
        headers.extend(STAT_COLUMNS.iter().map(|c| c.header().to_string()));
        headers.push(Column::HighestScore.header().to_string());
        headers.extend(self.extra_columns.iter().cloned());

        let mut raw = RawTable::new(headers);
        for record in &self.rows {
            let mut cells = vec![
                RawCell::from_text(&record.player_name),
                RawCell::Text(record.span()),
            ];
            cells.extend(
                STAT_COLUMNS
                    .iter()
                    .map(|c| RawCell::Number(c.numeric(record).unwrap_or_default())),
            );
            cells.push(RawCell::from_text(&record.highest_score));
            cells.extend(record.extras.iter().map(|value| RawCell::from_text(value)));
            raw.push_row(cells);
        }
        raw
    }
}

/// Stat columns that receive lenient numeric coercion.
pub const STAT_COLUMNS: [Column; 7] = [
    Column::Matches,
    Column::Innings,
    Column::NotOuts,
    Column::Runs,
    Column::Average,
    Column::Centuries,
    Column::Fifties,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Player,
    Team,
    Span,
    StartYear,
    EndYear,
    Matches,
    Innings,
    NotOuts,
    Runs,
    HighestScore,
    HighestScoreNumeric,
    Average,
    Centuries,
    Fifties,
}

impl Column {
    pub const ALL: [Column; 14] = [
        Column::Player,
        Column::Team,
        Column::Span,
        Column::StartYear,
        Column::EndYear,
        Column::Matches,
        Column::Innings,
        Column::NotOuts,
        Column::Runs,
        Column::HighestScore,
        Column::HighestScoreNumeric,
        Column::Average,
        Column::Centuries,
        Column::Fifties,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Player => "Player",
            Column::Team => "Team",
            Column::Span => "Span",
            Column::StartYear => "Start_Year",
            Column::EndYear => "End_Year",
            Column::Matches => "Mat",
            Column::Innings => "Inn",
            Column::NotOuts => "NO",
            Column::Runs => "Runs",
            Column::HighestScore => "HS",
            Column::HighestScoreNumeric => "HS_Numeric",
            Column::Average => "Avg",
            Column::Centuries => "100",
            Column::Fifties => "50",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(
            self,
            Column::Player | Column::Team | Column::Span | Column::HighestScore
        )
    }

    pub fn value(self, record: &PlayerRecord) -> Option<Value> {
        let value = match self {
            Column::Player => Value::Text(record.player_name.clone()),
            Column::Team => Value::Text(record.team.clone()?),
            Column::Span => Value::Text(record.span()),
            Column::StartYear => Value::Integer(i64::from(record.career_start_year)),
            Column::EndYear => Value::Integer(i64::from(record.career_end_year)),
            Column::HighestScore => Value::Text(record.highest_score.clone()),
            numeric => Value::Number(numeric.numeric(record)?),
        };
        Some(value)
    }

    /// Numeric view of the column, `None` for text columns.
    pub fn numeric(self, record: &PlayerRecord) -> Option<f64> {
        let value = match self {
            Column::StartYear => f64::from(record.career_start_year),
            Column::EndYear => f64::from(record.career_end_year),
            Column::Matches => record.matches,
            Column::Innings => record.innings,
            Column::NotOuts => record.not_outs,
            Column::Runs => record.runs,
            Column::HighestScoreNumeric => record.highest_score_numeric,
            Column::Average => record.average,
            Column::Centuries => record.centuries,
            Column::Fifties => record.fifties,
            Column::Player | Column::Team | Column::Span | Column::HighestScore => return None,
        };
        Some(value)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for Column {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let lowered = value.trim().to_ascii_lowercase();
        let column = match lowered.as_str() {
            "player" | "name" => Column::Player,
            "team" | "country" => Column::Team,
            "span" => Column::Span,
            "start_year" | "start" => Column::StartYear,
            "end_year" | "end" => Column::EndYear,
            "mat" | "matches" => Column::Matches,
            "inn" | "innings" => Column::Innings,
            "no" | "not_outs" => Column::NotOuts,
            "runs" => Column::Runs,
            "hs" => Column::HighestScore,
            "hs_numeric" | "highest" => Column::HighestScoreNumeric,
            "avg" | "average" => Column::Average,
            "100" | "centuries" | "hundreds" => Column::Centuries,
            "50" | "fifties" => Column::Fifties,
            _ => return Err(anyhow!("Unknown column '{value}'")),
        };
        Ok(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PlayerRecord {
        PlayerRecord {
            player_name: "Younis Khan (PAK)".to_string(),
            team: Some("PAK".to_string()),
            career_start_year: 2000,
            career_end_year: 2017,
            matches: 118.0,
            innings: 213.0,
            not_outs: 19.0,
            runs: 10099.0,
            highest_score: "313".to_string(),
            highest_score_numeric: 313.0,
            average: 52.05,
            centuries: 34.0,
            fifties: 33.0,
            extras: vec!["18.0".to_string()],
        }
    }

    #[test]
    fn column_aliases_parse_case_insensitively() {
        assert_eq!("RUNS".parse::<Column>().unwrap(), Column::Runs);
        assert_eq!("Avg".parse::<Column>().unwrap(), Column::Average);
        assert_eq!("hundreds".parse::<Column>().unwrap(), Column::Centuries);
        assert_eq!(
            "HS_Numeric".parse::<Column>().unwrap(),
            Column::HighestScoreNumeric
        );
        assert!("strike_rate".parse::<Column>().is_err());
    }

    #[test]
    fn display_rows_follow_header_order() {
        let table = PlayerTable::new(vec!["0".to_string()], vec![record()]);
        let headers = table.headers();
        let rows = table.display_rows();
        assert_eq!(headers.len(), rows[0].len());
        assert_eq!(rows[0][0], "Younis Khan (PAK)");
        assert_eq!(rows[0][2], "2000-2017");
        assert_eq!(rows[0][8], "10099");
        assert_eq!(rows[0].last().unwrap(), "18.0");
    }

    #[test]
    fn json_records_use_null_for_missing_team() {
        let mut orphan = record();
        orphan.team = None;
        let table = PlayerTable::new(Vec::new(), vec![orphan]);
        let json = table.json_records();
        assert_eq!(json[0]["Team"], JsonValue::Null);
        assert_eq!(json[0]["Runs"], JsonValue::from(10099.0));
        assert_eq!(json[0]["Start_Year"], JsonValue::from(2000));
    }
}
