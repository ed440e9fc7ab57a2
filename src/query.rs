//! Pure query operations over a canonical [`PlayerTable`].
//!
//! Every function takes the table by reference and returns a freshly
//! allocated view; the input is never modified. Empty results are valid
//! views, not errors.

use std::collections::HashMap;

use itertools::Itertools;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::{
    data::{compare_optional, format_number},
    record::{Column, PlayerTable},
};

pub const HIERARCHY_ROOT: &str = "World";

/// Statistics shown in a head-to-head comparison, in display order.
pub const HEAD_TO_HEAD_STATS: [Column; 6] = [
    Column::Matches,
    Column::Runs,
    Column::Average,
    Column::Centuries,
    Column::Fifties,
    Column::HighestScoreNumeric,
];

/// Keeps careers that overlap `[min_year, max_year]`, inclusive.
pub fn filter_year_overlap(table: &PlayerTable, min_year: i32, max_year: i32) -> PlayerTable {
    table.derive(
        table
            .rows
            .iter()
            .filter(|r| r.career_start_year <= max_year && r.career_end_year >= min_year)
            .cloned()
            .collect(),
    )
}

/// Literal substring match on one column. An empty query keeps every row;
/// absent values never match.
pub fn search(
    table: &PlayerTable,
    column: Column,
    query: &str,
    case_insensitive: bool,
) -> PlayerTable {
    let query = query.trim();
    if query.is_empty() {
        return table.clone();
    }
    let needle = if case_insensitive {
        query.to_lowercase()
    } else {
        query.to_string()
    };
    table.derive(
        table
            .rows
            .iter()
            .filter(|record| {
                column.value(record).is_some_and(|value| {
                    let haystack = value.as_display();
                    if case_insensitive {
                        haystack.to_lowercase().contains(&needle)
                    } else {
                        haystack.contains(&needle)
                    }
                })
            })
            .cloned()
            .collect(),
    )
}

/// Stable sort; equal keys keep their original order in either direction.
pub fn sort(table: &PlayerTable, column: Column, ascending: bool) -> PlayerTable {
    let mut keyed = table
        .rows
        .iter()
        .map(|record| (column.value(record), record))
        .collect::<Vec<_>>();
    keyed.sort_by(|(a, _), (b, _)| compare_optional(a.as_ref(), b.as_ref(), ascending));
    table.derive(keyed.into_iter().map(|(_, record)| record.clone()).collect())
}

/// Rows whose player name equals either identifier, in table order.
pub fn compare(table: &PlayerTable, id_a: &str, id_b: &str) -> PlayerTable {
    table.derive(
        table
            .rows
            .iter()
            .filter(|r| r.player_name == id_a || r.player_name == id_b)
            .cloned()
            .collect(),
    )
}

/// Players of the selected team, highest run scorers first.
pub fn roster(table: &PlayerTable, team: &str) -> PlayerTable {
    let members = table.derive(
        table
            .rows
            .iter()
            .filter(|r| r.team.as_deref() == Some(team))
            .cloned()
            .collect(),
    );
    sort(&members, Column::Runs, false)
}

pub fn teams(table: &PlayerTable) -> Vec<String> {
    table
        .rows
        .iter()
        .filter_map(|r| r.team.clone())
        .sorted()
        .dedup()
        .collect()
}

pub fn players(table: &PlayerTable, team: Option<&str>) -> Vec<String> {
    table
        .rows
        .iter()
        .filter(|r| team.is_none() || r.team.as_deref() == team)
        .map(|r| r.player_name.clone())
        .sorted()
        .dedup()
        .collect()
}

/// Earliest career start and latest career end.
pub fn year_bounds(table: &PlayerTable) -> Option<(i32, i32)> {
    let min = table.rows.iter().map(|r| r.career_start_year).min()?;
    let max = table.rows.iter().map(|r| r.career_end_year).max()?;
    Some((min, max))
}

/// User-facing parameter vector for the main player listing.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardQuery {
    pub search: String,
    pub years: Option<(i32, i32)>,
    pub sort_by: Column,
    pub ascending: bool,
}

impl Default for DashboardQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            years: None,
            sort_by: Column::Runs,
            ascending: false,
        }
    }
}

/// Year window (defaulting to the table's bounds), then player search, then
/// sort.
pub fn dashboard(table: &PlayerTable, query: &DashboardQuery) -> PlayerTable {
    let windowed = match query.years.or_else(|| year_bounds(table)) {
        Some((min_year, max_year)) => filter_year_overlap(table, min_year, max_year),
        None => table.clone(),
    };
    let matched = search(&windowed, Column::Player, &query.search, true);
    sort(&matched, query.sort_by, query.ascending)
}

#[derive(Debug, Clone, Serialize)]
pub struct StatLine {
    pub statistic: String,
    pub values: Vec<f64>,
}

/// Comparison view transposed so that players are columns.
#[derive(Debug, Clone, Serialize)]
pub struct HeadToHead {
    pub players: Vec<String>,
    pub statistics: Vec<StatLine>,
}

impl HeadToHead {
    pub fn from_view(view: &PlayerTable) -> Self {
        let players = view.rows.iter().map(|r| r.player_name.clone()).collect();
        let statistics = HEAD_TO_HEAD_STATS
            .iter()
            .map(|column| StatLine {
                statistic: column.header().to_string(),
                values: view
                    .rows
                    .iter()
                    .map(|r| column.numeric(r).unwrap_or_default())
                    .collect(),
            })
            .collect();
        Self {
            players,
            statistics,
        }
    }

    /// Keeps the first `limit` statistic lines.
    pub fn truncate(&mut self, limit: usize) {
        self.statistics.truncate(limit);
    }

    pub fn headers(&self) -> Vec<String> {
        std::iter::once("Statistic".to_string())
            .chain(self.players.iter().cloned())
            .collect()
    }

    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.statistics
            .iter()
            .map(|line| {
                std::iter::once(line.statistic.clone())
                    .chain(line.values.iter().map(|v| format_number(*v)))
                    .collect()
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HierarchyLeaf {
    pub label: String,
    pub size: f64,
    /// Full player row keyed by column header.
    pub record: JsonValue,
}

#[derive(Debug, Clone, Serialize)]
pub struct HierarchyGroup {
    pub label: String,
    pub total: f64,
    pub leaves: Vec<HierarchyLeaf>,
}

/// Two-level drill-down: root → group → player.
#[derive(Debug, Clone, Serialize)]
pub struct Hierarchy {
    pub label: String,
    pub size_metric: String,
    pub total: f64,
    pub groups: Vec<HierarchyGroup>,
}

impl Hierarchy {
    pub fn leaf_count(&self) -> usize {
        self.groups.iter().map(|g| g.leaves.len()).sum()
    }

    /// Keeps the first `limit` leaves in display order. Groups left without
    /// leaves are dropped and every total is recomputed from what remains.
    pub fn truncate(&mut self, limit: usize) {
        let mut remaining = limit;
        for group in &mut self.groups {
            group.leaves.truncate(remaining);
            remaining -= group.leaves.len();
            group.total = group.leaves.iter().map(|leaf| leaf.size).sum();
        }
        self.groups.retain(|group| !group.leaves.is_empty());
        self.total = self.groups.iter().map(|g| g.total).sum();
    }

    /// One line per leaf: root, group, player, size.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.groups
            .iter()
            .flat_map(|group| {
                group.leaves.iter().map(move |leaf| {
                    vec![
                        self.label.clone(),
                        group.label.clone(),
                        leaf.label.clone(),
                        format_number(leaf.size),
                    ]
                })
            })
            .collect()
    }
}

/// Groups rows for area-proportional rendering. Rows whose size is not a
/// positive number, or whose group value is absent, are left out. Groups
/// appear in order of first occurrence.
pub fn hierarchy(table: &PlayerTable, group_column: Column, size_metric: Column) -> Hierarchy {
    let mut groups: Vec<HierarchyGroup> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for record in &table.rows {
        let Some(size) = size_metric.numeric(record).filter(|size| *size > 0.0) else {
            continue;
        };
        let Some(key) = group_column.value(record).map(|v| v.as_display()) else {
            continue;
        };
        let idx = *positions.entry(key.clone()).or_insert_with(|| {
            groups.push(HierarchyGroup {
                label: key,
                total: 0.0,
                leaves: Vec::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[idx];
        group.total += size;
        group.leaves.push(HierarchyLeaf {
            label: record.player_name.clone(),
            size,
            record: record.to_json(&table.extra_columns),
        });
    }

    Hierarchy {
        label: HIERARCHY_ROOT.to_string(),
        size_metric: size_metric.header().to_string(),
        total: groups.iter().map(|g| g.total).sum(),
        groups,
    }
}
