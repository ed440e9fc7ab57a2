use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{record::Column, teams::TeamMetric};

pub const DEFAULT_SOURCE: &str = "data/ICC Test Bat 3001.xlsx";
pub const SOURCE_ENV: &str = "CRICKET_STATS_SOURCE";

#[derive(Debug, Parser)]
#[command(author, version, about = "Explore Test cricket batting statistics", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Filter players by career years and name, then sort
    Players(PlayersArgs),
    /// Compare two players head to head
    Compare(CompareArgs),
    /// Aggregate runs, centuries and averages per team
    Teams(TeamsArgs),
    /// List every player of one team, highest run scorers first
    Roster(RosterArgs),
    /// Build a team → player hierarchy sized by a stat
    Tree(TreeArgs),
    /// List distinct teams or players
    List(ListArgs),
    /// Summarize the loaded dataset
    Summary(SummaryArgs),
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Batting export to load (.csv, .tsv, .xlsx, .xls, .ods)
    #[arg(short = 'i', long = "input", env = SOURCE_ENV, default_value = DEFAULT_SOURCE)]
    pub input: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of a delimited input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
    /// Write output to this file instead of stdout
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Limit number of rows emitted
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Args)]
pub struct PlayersArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub output: OutputArgs,
    /// Case-insensitive player name search (last names work best)
    #[arg(short = 's', long)]
    pub search: Option<String>,
    /// First year of the career window (defaults to the earliest debut)
    #[arg(long)]
    pub from: Option<i32>,
    /// Last year of the career window (defaults to the latest retirement)
    #[arg(long)]
    pub to: Option<i32>,
    /// Column to sort by
    #[arg(long, default_value = "runs", value_parser = parse_column)]
    pub sort: Column,
    /// Sort ascending instead of descending
    #[arg(long)]
    pub ascending: bool,
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub output: OutputArgs,
    /// First player, exactly as listed (e.g. "SR Tendulkar (INDIA)")
    pub first: String,
    /// Second player
    pub second: String,
    /// Show statistics as rows and players as columns
    #[arg(long)]
    pub transpose: bool,
}

#[derive(Debug, Args)]
pub struct TeamsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub output: OutputArgs,
    /// Only keep teams with more than this many total runs
    #[arg(long = "min-runs", default_value_t = crate::teams::DEFAULT_MIN_TEAM_RUNS)]
    pub min_runs: f64,
    /// Leaderboard metric to sort by
    #[arg(long, default_value = "total_100s", value_parser = parse_team_metric)]
    pub sort: TeamMetric,
    /// Sort ascending instead of descending
    #[arg(long)]
    pub ascending: bool,
}

#[derive(Debug, Args)]
pub struct RosterArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub output: OutputArgs,
    /// Selected team label (e.g. "AUS")
    #[arg(short = 't', long)]
    pub team: String,
}

#[derive(Debug, Args)]
pub struct TreeArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub output: OutputArgs,
    /// Column that forms the first hierarchy level
    #[arg(long, default_value = "team", value_parser = parse_column)]
    pub group: Column,
    /// Numeric column that sizes each player
    #[arg(long, default_value = "runs", value_parser = parse_column)]
    pub size: Column,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListKind {
    Teams,
    Players,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub output: OutputArgs,
    /// What to list
    #[arg(value_enum)]
    pub kind: ListKind,
    /// Restrict players to one team
    #[arg(short = 't', long)]
    pub team: Option<String>,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn parse_column(value: &str) -> Result<Column, String> {
    value.parse().map_err(|err: anyhow::Error| err.to_string())
}

pub fn parse_team_metric(value: &str) -> Result<TeamMetric, String> {
    value.parse().map_err(|err: anyhow::Error| err.to_string())
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
