mod common;

use std::sync::Arc;

use cricket_stats::{
    loader::TableLoader,
    query::{self, DashboardQuery, HeadToHead},
    record::{Column, PlayerTable},
    teams::{TeamMetric, aggregate_teams, leaderboard},
};
use proptest::prelude::*;

use common::{FIXTURE, fixture_path, names, player};

fn fixture() -> Arc<PlayerTable> {
    TableLoader::default()
        .load(&fixture_path(FIXTURE))
        .expect("load fixture")
}

#[test]
fn year_overlap_uses_interval_intersection() {
    let table = PlayerTable::new(
        Vec::new(),
        vec![
            player("Partial", None, (1995, 2005), 1.0),
            player("Before", None, (1990, 1994), 1.0),
            player("Inside", None, (2002, 2003), 1.0),
            player("Spanning", None, (1980, 2020), 1.0),
            player("Edge", None, (2010, 2012), 1.0),
        ],
    );
    let view = query::filter_year_overlap(&table, 2000, 2010);
    assert_eq!(names(&view), vec!["Partial", "Inside", "Spanning", "Edge"]);
    assert_eq!(table.len(), 5);
}

#[test]
fn year_overlap_on_fixture() {
    let table = fixture();
    let view = query::filter_year_overlap(&table, 2000, 2010);
    assert_eq!(view.len(), 7);
    assert!(!names(&view).contains(&"WG Grace (ENG)"));
}

#[test]
fn search_is_case_insensitive_substring() {
    let table = fixture();
    let view = query::search(&table, Column::Player, "KALLIS", true);
    assert_eq!(names(&view), vec!["JH Kallis (ICC/SA)"]);

    let strict = query::search(&table, Column::Player, "KALLIS", false);
    assert!(strict.is_empty());
}

#[test]
fn empty_search_is_identity_and_null_never_matches() {
    let table = fixture();
    let view = query::search(&table, Column::Player, "   ", true);
    assert_eq!(view, *table);

    let by_team = query::search(&table, Column::Team, "a", true);
    assert!(!names(&by_team).contains(&"Anon"));
    assert!(names(&by_team).contains(&"SR Tendulkar (INDIA)"));
}

#[test]
fn sort_places_extremes_first() {
    let table = fixture();
    let descending = query::sort(&table, Column::Average, false);
    assert_eq!(descending.rows[0].player_name, "DG Bradman (AUS)");
    let ascending = query::sort(&table, Column::Average, true);
    assert_eq!(ascending.rows[0].player_name, "Extra Player (USA1)");
    let by_highest = query::sort(&table, Column::HighestScoreNumeric, false);
    assert_eq!(by_highest.rows[0].player_name, "BC Lara (ICC/WI)");
}

#[test]
fn sort_is_stable_in_both_directions() {
    let table = PlayerTable::new(
        Vec::new(),
        vec![
            player("first", None, (2000, 2001), 50.0),
            player("high", None, (2000, 2001), 90.0),
            player("second", None, (2000, 2001), 50.0),
            player("low", None, (2000, 2001), 10.0),
        ],
    );
    let descending = query::sort(&table, Column::Runs, false);
    assert_eq!(names(&descending), vec!["high", "first", "second", "low"]);
    let ascending = query::sort(&table, Column::Runs, true);
    assert_eq!(names(&ascending), vec!["low", "first", "second", "high"]);
}

#[test]
fn missing_teams_sort_last() {
    let table = PlayerTable::new(
        Vec::new(),
        vec![
            player("none", None, (2000, 2001), 1.0),
            player("b", Some("ZIM"), (2000, 2001), 1.0),
            player("a", Some("AUS"), (2000, 2001), 1.0),
        ],
    );
    assert_eq!(
        names(&query::sort(&table, Column::Team, true)),
        vec!["a", "b", "none"]
    );
    assert_eq!(
        names(&query::sort(&table, Column::Team, false)),
        vec!["b", "a", "none"]
    );
}

#[test]
fn compare_handles_zero_one_and_many_matches() {
    let table = fixture();
    let pair = query::compare(&table, "RT Ponting (AUS)", "SR Tendulkar (INDIA)");
    assert_eq!(names(&pair), vec!["SR Tendulkar (INDIA)", "RT Ponting (AUS)"]);

    let same = query::compare(&table, "RT Ponting (AUS)", "RT Ponting (AUS)");
    assert_eq!(same.len(), 1);

    assert!(query::compare(&table, "Nobody", "No One").is_empty());

    let duplicated = PlayerTable::new(
        Vec::new(),
        vec![
            player("Twin", None, (2000, 2001), 1.0),
            player("Twin", None, (2002, 2003), 2.0),
        ],
    );
    assert_eq!(query::compare(&duplicated, "Twin", "Twin").len(), 2);
}

#[test]
fn head_to_head_transposes_statistics() {
    let table = fixture();
    let pair = query::compare(&table, "SR Tendulkar (INDIA)", "RT Ponting (AUS)");
    let matrix = HeadToHead::from_view(&pair);
    assert_eq!(
        matrix.headers(),
        vec!["Statistic", "SR Tendulkar (INDIA)", "RT Ponting (AUS)"]
    );
    let rows = matrix.display_rows();
    assert_eq!(rows[1], vec!["Runs", "15921", "13378"]);
    assert_eq!(rows[5], vec!["HS_Numeric", "248", "257"]);
}

#[test]
fn roster_lists_selected_team_by_runs() {
    let table = fixture();
    let roster = query::roster(&table, "AUS");
    assert_eq!(names(&roster), vec!["RT Ponting (AUS)", "DG Bradman (AUS)"]);
    assert!(query::roster(&table, "NED").is_empty());
}

#[test]
fn pickers_and_bounds() {
    let table = fixture();
    assert_eq!(
        query::teams(&table),
        vec!["AUS", "ENG", "INDIA", "SA", "SL", "USA", "WI"]
    );
    assert_eq!(
        query::players(&table, Some("ENG")),
        vec!["AN Cook (ENG)", "WG Grace (ENG)"]
    );
    assert_eq!(query::players(&table, None).len(), 11);
    assert_eq!(query::year_bounds(&table), Some((1880, 2019)));
    assert_eq!(query::year_bounds(&PlayerTable::default()), None);
}

#[test]
fn dashboard_applies_window_search_and_sort() {
    let table = fixture();
    let everything = query::dashboard(&table, &DashboardQuery::default());
    assert_eq!(everything.len(), table.len());
    assert_eq!(everything.rows[0].player_name, "SR Tendulkar (INDIA)");

    let request = DashboardQuery {
        search: "a".to_string(),
        years: Some((1920, 1950)),
        sort_by: Column::Runs,
        ascending: true,
    };
    let view = query::dashboard(&table, &request);
    assert_eq!(names(&view), vec!["DG Bradman (AUS)"]);

    let nothing = DashboardQuery {
        search: "zzz".to_string(),
        ..DashboardQuery::default()
    };
    assert!(query::dashboard(&table, &nothing).is_empty());
}

#[test]
fn hierarchy_skips_non_positive_sizes_and_missing_groups() {
    let table = fixture();
    let tree = query::hierarchy(&table, Column::Team, Column::Runs);
    assert_eq!(tree.label, "World");
    let groups: Vec<&str> = tree.groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(groups, vec!["INDIA", "AUS", "SA", "ENG", "SL", "WI"]);
    assert_eq!(tree.leaf_count(), 9);
    let india = &tree.groups[0];
    assert_eq!(india.total, 15921.0 + 13288.0);
    assert!(tree
        .groups
        .iter()
        .flat_map(|g| &g.leaves)
        .all(|leaf| leaf.size > 0.0));
}

#[test]
fn team_aggregation_on_fixture() {
    let table = fixture();
    let summaries = aggregate_teams(&table, 5000.0);
    let teams: Vec<&str> = summaries.iter().map(|s| s.team.as_str()).collect();
    assert_eq!(teams, vec!["AUS", "ENG", "INDIA", "SA", "SL", "WI"]);

    let india = &summaries[2];
    assert_eq!(india.total_runs, 29209.0);
    assert_eq!(india.total_outs, 550.0);
    assert_eq!(india.total_players, 2);
    assert_eq!(india.historic_average, 53.11);

    let by_centuries = leaderboard(&summaries, TeamMetric::TotalCenturies, false);
    let order: Vec<&str> = by_centuries.iter().map(|s| s.team.as_str()).collect();
    assert_eq!(order, vec!["INDIA", "AUS", "SA", "SL", "ENG", "WI"]);
}

#[test]
fn team_aggregation_averages_guard_division() {
    let mut strong = player("A (NZ)", Some("NZ"), (2000, 2001), 4000.0);
    strong.innings = 100.0;
    strong.not_outs = 20.0;
    let idle = player("B (HK)", Some("HK"), (2000, 2001), 10.0);
    let table = PlayerTable::new(Vec::new(), vec![strong, idle]);

    let summaries = aggregate_teams(&table, 0.0);
    let nz = summaries.iter().find(|s| s.team == "NZ").expect("NZ");
    assert_eq!(nz.total_outs, 80.0);
    assert_eq!(nz.historic_average, 50.0);
    let hk = summaries.iter().find(|s| s.team == "HK").expect("HK");
    assert_eq!(hk.historic_average, 0.0);

    assert!(aggregate_teams(&table, 5000.0).is_empty());
}

proptest! {
    #[test]
    fn sort_keeps_equal_keys_in_input_order(
        keys in proptest::collection::vec(0u8..4, 0..40),
        ascending in any::<bool>(),
    ) {
        let rows = keys
            .iter()
            .enumerate()
            .map(|(idx, key)| player(&idx.to_string(), None, (2000, 2001), f64::from(*key)))
            .collect();
        let table = PlayerTable::new(Vec::new(), rows);
        let sorted = query::sort(&table, Column::Runs, ascending);
        prop_assert_eq!(sorted.len(), keys.len());
        for pair in sorted.rows.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.runs == b.runs {
                let ia: usize = a.player_name.parse().unwrap();
                let ib: usize = b.player_name.parse().unwrap();
                prop_assert!(ia < ib);
            } else if ascending {
                prop_assert!(a.runs < b.runs);
            } else {
                prop_assert!(a.runs > b.runs);
            }
        }
    }
}

#[test]
fn hierarchy_truncate_keeps_leading_leaves_and_recomputes_totals() {
    let table = fixture();
    let mut tree = query::hierarchy(&table, Column::Team, Column::Runs);
    tree.truncate(3);
    let groups: Vec<&str> = tree.groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(groups, vec!["INDIA", "AUS"]);
    assert_eq!(tree.leaf_count(), 3);
    assert_eq!(tree.groups[0].total, 15921.0 + 13288.0);
    assert_eq!(tree.groups[1].total, 13378.0);
    assert_eq!(tree.total, 15921.0 + 13288.0 + 13378.0);
    assert_eq!(tree.display_rows().len(), 3);

    tree.truncate(0);
    assert!(tree.groups.is_empty());
    assert_eq!(tree.total, 0.0);
}

#[test]
fn hierarchy_leaves_carry_header_keyed_records() {
    let table = fixture();
    let tree = query::hierarchy(&table, Column::Team, Column::Runs);
    let record = &tree.groups[0].leaves[0].record;
    assert_eq!(record["Player"], "SR Tendulkar (INDIA)");
    assert_eq!(record["Start_Year"], 1989);
    assert_eq!(record["HS"], "248*");
    assert_eq!(record["SR"], "54.08");
}

#[test]
fn head_to_head_truncate_limits_statistic_lines() {
    let table = fixture();
    let pair = query::compare(&table, "SR Tendulkar (INDIA)", "RT Ponting (AUS)");
    let mut matrix = HeadToHead::from_view(&pair);
    matrix.truncate(2);
    assert_eq!(matrix.display_rows().len(), 2);
    assert_eq!(matrix.headers().len(), 3);
}
