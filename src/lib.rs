pub mod cli;
pub mod data;
pub mod error;
pub mod io_utils;
pub mod loader;
pub mod normalize;
pub mod output;
pub mod query;
pub mod raw;
pub mod record;
pub mod source;
pub mod table;
pub mod teams;

use std::{env, sync::Arc, sync::OnceLock};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{LevelFilter, debug, info, warn};
use serde_json::json;

use crate::{
    cli::{Cli, Commands, ListKind, SourceArgs},
    loader::TableLoader,
    output::Rendered,
    query::{DashboardQuery, HeadToHead},
    record::PlayerTable,
    source::LoadOptions,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("cricket_stats", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Players(args) => handle_players(&args),
        Commands::Compare(args) => handle_compare(&args),
        Commands::Teams(args) => handle_teams(&args),
        Commands::Roster(args) => handle_roster(&args),
        Commands::Tree(args) => handle_tree(&args),
        Commands::List(args) => handle_list(&args),
        Commands::Summary(args) => handle_summary(&args),
    }
}

fn load_table(args: &SourceArgs) -> Result<Arc<PlayerTable>> {
    let options = LoadOptions {
        delimiter: args.delimiter,
        encoding: args.input_encoding.clone(),
    };
    let mut loader = TableLoader::new(options);
    loader
        .load(&args.input)
        .with_context(|| format!("Loading batting data from {:?}", args.input))
}

fn handle_players(args: &cli::PlayersArgs) -> Result<()> {
    let table = load_table(&args.source)?;
    if let (Some(from), Some(to)) = (args.from, args.to) {
        if from > to {
            bail!("Career window start {from} is after its end {to}");
        }
    }
    let years = match (args.from, args.to) {
        (None, None) => None,
        (from, to) => {
            let (earliest, latest) = query::year_bounds(&table).unwrap_or((i32::MIN, i32::MAX));
            Some((from.unwrap_or(earliest), to.unwrap_or(latest)))
        }
    };
    let request = DashboardQuery {
        search: args.search.clone().unwrap_or_default(),
        years,
        sort_by: args.sort,
        ascending: args.ascending,
    };
    debug!("Dashboard query: {:?}", request);

    let view = query::dashboard(&table, &request);
    if view.is_empty() {
        warn!("No players found matching the search and career window; try just a last name");
    } else {
        info!(
            "{} of {} player(s) matched, sorted by {} {}",
            view.len(),
            table.len(),
            request.sort_by,
            if request.ascending { "ascending" } else { "descending" }
        );
    }
    output::emit(
        Rendered::from_table(&view.head(args.output.limit)),
        &args.output,
    )
}

fn handle_compare(args: &cli::CompareArgs) -> Result<()> {
    let table = load_table(&args.source)?;
    let view = query::compare(&table, args.first.trim(), args.second.trim());
    match view.len() {
        0 => warn!("Could not find either player; names must match the listing exactly"),
        1 if args.first.trim() != args.second.trim() => {
            warn!("Only one of the two players was found")
        }
        n => debug!("Comparison matched {n} row(s)"),
    }
    let rendered = if args.transpose {
        let mut matrix = HeadToHead::from_view(&view);
        if let Some(limit) = args.output.limit {
            matrix.truncate(limit);
        }
        Rendered::new(
            matrix.headers(),
            matrix.display_rows(),
            serde_json::to_value(&matrix).context("Serializing comparison")?,
        )
    } else {
        Rendered::from_table(&view.head(args.output.limit))
    };
    output::emit(rendered, &args.output)
}

fn handle_teams(args: &cli::TeamsArgs) -> Result<()> {
    let table = load_table(&args.source)?;
    let summaries = teams::aggregate_teams(&table, args.min_runs);
    let ordered = teams::leaderboard(&summaries, args.sort, args.ascending);
    info!(
        "{} team(s) above {} total runs, ordered by {}",
        ordered.len(),
        data::format_number(args.min_runs),
        args.sort
    );
    let ordered = output::limited(ordered, args.output.limit);
    let rendered = Rendered::new(
        teams::summary_headers(),
        teams::summary_rows(&ordered),
        serde_json::to_value(&ordered).context("Serializing team summaries")?,
    );
    output::emit(rendered, &args.output)
}

fn handle_roster(args: &cli::RosterArgs) -> Result<()> {
    let table = load_table(&args.source)?;
    let team = args.team.trim();
    let view = query::roster(&table, team);
    if view.is_empty() {
        warn!(
            "No players found for team '{}'; known teams: {}",
            team,
            query::teams(&table).join(", ")
        );
    } else {
        info!("All {} player(s) for {}", view.len(), team);
    }
    output::emit(
        Rendered::from_table(&view.head(args.output.limit)),
        &args.output,
    )
}

fn handle_tree(args: &cli::TreeArgs) -> Result<()> {
    if !args.size.is_numeric() {
        bail!("Size metric '{}' is not a numeric column", args.size);
    }
    let table = load_table(&args.source)?;
    let mut tree = query::hierarchy(&table, args.group, args.size);
    info!(
        "{} group(s) and {} player(s) with positive {}",
        tree.groups.len(),
        tree.leaf_count(),
        args.size
    );
    if let Some(limit) = args.output.limit {
        tree.truncate(limit);
    }
    let headers = vec![
        "Root".to_string(),
        args.group.header().to_string(),
        "Player".to_string(),
        args.size.header().to_string(),
    ];
    let rendered = Rendered::new(
        headers,
        tree.display_rows(),
        serde_json::to_value(&tree).context("Serializing hierarchy")?,
    );
    output::emit(rendered, &args.output)
}

fn handle_list(args: &cli::ListArgs) -> Result<()> {
    let table = load_table(&args.source)?;
    let limit = args.output.limit;
    let rendered = match args.kind {
        ListKind::Teams => {
            Rendered::from_names("Team", &output::limited(query::teams(&table), limit))
        }
        ListKind::Players => {
            let team = args.team.as_deref().map(str::trim);
            let names = output::limited(query::players(&table, team), limit);
            Rendered::from_names("Player", &names)
        }
    };
    output::emit(rendered, &args.output)
}

fn handle_summary(args: &cli::SummaryArgs) -> Result<()> {
    let table = load_table(&args.source)?;
    let bounds = query::year_bounds(&table);
    let fields = vec![
        ("source", args.source.input.display().to_string()),
        ("sha256", table.fingerprint.clone().unwrap_or_default()),
        ("players", table.len().to_string()),
        ("teams", query::teams(&table).len().to_string()),
        (
            "first_year",
            bounds.map(|(first, _)| first.to_string()).unwrap_or_default(),
        ),
        (
            "last_year",
            bounds.map(|(_, last)| last.to_string()).unwrap_or_default(),
        ),
        ("columns", table.headers().join(", ")),
    ];
    let fields = output::limited(fields, args.output.limit);
    let json = fields
        .iter()
        .map(|(key, value)| (key.to_string(), json!(value)))
        .collect::<serde_json::Map<_, _>>();
    let rendered = Rendered::new(
        vec!["field".to_string(), "value".to_string()],
        fields
            .iter()
            .map(|(key, value)| vec![key.to_string(), value.clone()])
            .collect(),
        serde_json::Value::Object(json),
    );
    output::emit(rendered, &args.output)
}
