use std::{cmp::Ordering, collections::BTreeMap, fmt, str::FromStr};

use anyhow::{Result, anyhow};
use serde::Serialize;

use crate::{data::format_number, record::PlayerTable};

/// Teams at or below this many total runs are treated as noise (associate
/// sides, composite "World"/ICC rows).
pub const DEFAULT_MIN_TEAM_RUNS: f64 = 5000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSummary {
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Total_Runs")]
    pub total_runs: f64,
    #[serde(rename = "Total_100s")]
    pub total_centuries: f64,
    #[serde(rename = "Total_50s")]
    pub total_fifties: f64,
    #[serde(rename = "Total_Innings")]
    pub total_innings: f64,
    #[serde(rename = "Total_NO")]
    pub total_not_outs: f64,
    #[serde(rename = "Total_Players")]
    pub total_players: usize,
    #[serde(rename = "Total_Outs")]
    pub total_outs: f64,
    #[serde(rename = "Historic_Average")]
    pub historic_average: f64,
}

impl TeamSummary {
    fn empty(team: &str) -> Self {
        Self {
            team: team.to_string(),
            total_runs: 0.0,
            total_centuries: 0.0,
            total_fifties: 0.0,
            total_innings: 0.0,
            total_not_outs: 0.0,
            total_players: 0,
            total_outs: 0.0,
            historic_average: 0.0,
        }
    }

    fn finish(&mut self) {
        self.total_outs = self.total_innings - self.total_not_outs;
        self.historic_average = if self.total_outs > 0.0 {
            round2(self.total_runs / self.total_outs)
        } else {
            0.0
        };
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Groups players by team (rows without a team are skipped), ordered by team
/// name, keeping only teams with more than `min_total_runs`.
pub fn aggregate_teams(table: &PlayerTable, min_total_runs: f64) -> Vec<TeamSummary> {
    let mut groups: BTreeMap<&str, TeamSummary> = BTreeMap::new();
    for record in &table.rows {
        let Some(team) = record.team.as_deref() else {
            continue;
        };
        let summary = groups
            .entry(team)
            .or_insert_with(|| TeamSummary::empty(team));
        summary.total_runs += record.runs;
        summary.total_centuries += record.centuries;
        summary.total_fifties += record.fifties;
        summary.total_innings += record.innings;
        summary.total_not_outs += record.not_outs;
        summary.total_players += 1;
    }
    groups
        .into_values()
        .map(|mut summary| {
            summary.finish();
            summary
        })
        .filter(|summary| summary.total_runs > min_total_runs)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamMetric {
    Team,
    TotalRuns,
    TotalCenturies,
    TotalFifties,
    TotalInnings,
    TotalNotOuts,
    TotalPlayers,
    TotalOuts,
    HistoricAverage,
}

impl TeamMetric {
    pub const ALL: [TeamMetric; 9] = [
        TeamMetric::Team,
        TeamMetric::TotalRuns,
        TeamMetric::TotalCenturies,
        TeamMetric::TotalFifties,
        TeamMetric::TotalInnings,
        TeamMetric::TotalNotOuts,
        TeamMetric::TotalPlayers,
        TeamMetric::TotalOuts,
        TeamMetric::HistoricAverage,
    ];

    pub fn header(self) -> &'static str {
        match self {
            TeamMetric::Team => "Team",
            TeamMetric::TotalRuns => "Total_Runs",
            TeamMetric::TotalCenturies => "Total_100s",
            TeamMetric::TotalFifties => "Total_50s",
            TeamMetric::TotalInnings => "Total_Innings",
            TeamMetric::TotalNotOuts => "Total_NO",
            TeamMetric::TotalPlayers => "Total_Players",
            TeamMetric::TotalOuts => "Total_Outs",
            TeamMetric::HistoricAverage => "Historic_Average",
        }
    }

    fn numeric(self, summary: &TeamSummary) -> f64 {
        match self {
            TeamMetric::Team => 0.0,
            TeamMetric::TotalRuns => summary.total_runs,
            TeamMetric::TotalCenturies => summary.total_centuries,
            TeamMetric::TotalFifties => summary.total_fifties,
            TeamMetric::TotalInnings => summary.total_innings,
            TeamMetric::TotalNotOuts => summary.total_not_outs,
            TeamMetric::TotalPlayers => summary.total_players as f64,
            TeamMetric::TotalOuts => summary.total_outs,
            TeamMetric::HistoricAverage => summary.historic_average,
        }
    }

    fn display(self, summary: &TeamSummary) -> String {
        match self {
            TeamMetric::Team => summary.team.clone(),
            TeamMetric::TotalPlayers => summary.total_players.to_string(),
            other => format_number(other.numeric(summary)),
        }
    }

    fn compare(self, a: &TeamSummary, b: &TeamSummary) -> Ordering {
        match self {
            TeamMetric::Team => a.team.cmp(&b.team),
            other => other.numeric(a).total_cmp(&other.numeric(b)),
        }
    }
}

impl fmt::Display for TeamMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for TeamMetric {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let lowered = value.trim().to_ascii_lowercase();
        let metric = match lowered.as_str() {
            "team" => TeamMetric::Team,
            "runs" | "total_runs" => TeamMetric::TotalRuns,
            "100s" | "centuries" | "total_100s" => TeamMetric::TotalCenturies,
            "50s" | "fifties" | "total_50s" => TeamMetric::TotalFifties,
            "innings" | "total_innings" => TeamMetric::TotalInnings,
            "no" | "not_outs" | "total_no" => TeamMetric::TotalNotOuts,
            "players" | "total_players" => TeamMetric::TotalPlayers,
            "outs" | "total_outs" => TeamMetric::TotalOuts,
            "average" | "avg" | "historic_average" => TeamMetric::HistoricAverage,
            _ => return Err(anyhow!("Unknown team metric '{value}'")),
        };
        Ok(metric)
    }
}

/// Stable leaderboard ordering of aggregated teams.
pub fn leaderboard(
    summaries: &[TeamSummary],
    metric: TeamMetric,
    ascending: bool,
) -> Vec<TeamSummary> {
    let mut ordered = summaries.to_vec();
    ordered.sort_by(|a, b| {
        let ordering = metric.compare(a, b);
        if ascending { ordering } else { ordering.reverse() }
    });
    ordered
}

pub fn summary_headers() -> Vec<String> {
    TeamMetric::ALL
        .iter()
        .map(|metric| metric.header().to_string())
        .collect()
}

pub fn summary_rows(summaries: &[TeamSummary]) -> Vec<Vec<String>> {
    summaries
        .iter()
        .map(|summary| {
            TeamMetric::ALL
                .iter()
                .map(|metric| metric.display(summary))
                .collect()
        })
        .collect()
}
