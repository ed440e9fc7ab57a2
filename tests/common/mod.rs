#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use cricket_stats::record::{PlayerRecord, PlayerTable};
use tempfile::{TempDir, tempdir};

pub const FIXTURE: &str = "test_batting.csv";
pub const WORKBOOK_FIXTURE: &str = "test_batting.xlsx";

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

/// Minimal canonical record for query tests.
pub fn player(name: &str, team: Option<&str>, span: (i32, i32), runs: f64) -> PlayerRecord {
    PlayerRecord {
        player_name: name.to_string(),
        team: team.map(str::to_string),
        career_start_year: span.0,
        career_end_year: span.1,
        matches: 0.0,
        innings: 0.0,
        not_outs: 0.0,
        runs,
        highest_score: String::new(),
        highest_score_numeric: 0.0,
        average: 0.0,
        centuries: 0.0,
        fifties: 0.0,
        extras: Vec::new(),
    }
}

pub fn names(table: &PlayerTable) -> Vec<&str> {
    table.rows.iter().map(|r| r.player_name.as_str()).collect()
}
