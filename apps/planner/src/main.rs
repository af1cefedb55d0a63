use std::{fs, path::PathBuf, rc::Rc};

use anyhow::{Context, Result};
use board::{BoardPresenter, MemoryHost};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use models::FilterModel;
use shared::{
    filter::filter_counts,
    protocol::{FilterKind, SortKind, UpdateKind},
    time::{Clock, FixedClock, SystemClock},
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod script;
mod seed;

#[derive(Parser, Debug)]
#[command(about = "Render and drive a trip board from the command line")]
struct Cli {
    #[arg(long, default_value = "planner.toml")]
    config: PathBuf,
    /// Seed JSON with points, destinations and offers.
    #[arg(long)]
    data: Option<PathBuf>,
    /// RFC 3339 timestamp used as "now" by the time filters.
    #[arg(long)]
    now: Option<DateTime<Utc>>,
    #[arg(long)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the board for a filter and sort.
    Show {
        #[arg(long)]
        filter: Option<FilterKind>,
        #[arg(long)]
        sort: Option<SortKind>,
    },
    /// Print how many points each filter would show.
    Filters,
    /// Replay a JSON script of user interactions and print the final board.
    Replay {
        script: PathBuf,
        /// Print the board after every step.
        #[arg(long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = config::load_settings(&cli.config)?;
    if let Some(data) = cli.data {
        settings.data_path = data;
    }
    if let Some(now) = cli.now {
        settings.now = Some(now);
    }
    if let Some(level) = cli.log_level {
        settings.log_level = level;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let seed = seed::load_seed(&settings.data_path)?;
    info!(
        points = seed.points.len(),
        destinations = seed.destinations.len(),
        path = %settings.data_path.display(),
        "loaded seed data"
    );

    let clock: Rc<dyn Clock> = match settings.now {
        Some(now) => Rc::new(FixedClock(now)),
        None => Rc::new(SystemClock),
    };
    let points = Rc::new(seed.into_model());
    let filter = Rc::new(FilterModel::new(settings.default_filter));
    let board = BoardPresenter::new(
        MemoryHost::new(),
        Rc::clone(&points),
        Rc::clone(&filter),
        Rc::clone(&clock),
        || debug!("creation form closed, new event control enabled"),
    );
    board.init();
    board.sort_changed(settings.default_sort);

    match cli.command {
        Command::Show {
            filter: filter_kind,
            sort,
        } => {
            if let Some(kind) = filter_kind {
                filter.set_filter(UpdateKind::Major, kind);
            }
            if let Some(sort) = sort {
                board.sort_changed(sort);
            }
            print!("{}", board.host().render_text());
        }
        Command::Filters => {
            let active = filter.filter();
            for (kind, count) in filter_counts(&points.points(), clock.now()) {
                let marker = if kind == active { "*" } else { " " };
                println!("{marker} {kind:<10} {count}");
            }
        }
        Command::Replay {
            script: script_path,
            verbose,
        } => {
            let raw = fs::read_to_string(&script_path)
                .with_context(|| format!("failed to read script '{}'", script_path.display()))?;
            let steps = script::parse_script(&raw)?;
            let refused = script::replay(&board, &filter, &steps, |index, step| {
                if verbose {
                    println!("-- step {index}: {step:?}");
                    print!("{}", board.host().render_text());
                }
            });
            if refused > 0 {
                info!(refused, "some steps were refused");
            }
            print!("{}", board.host().render_text());
        }
    }

    Ok(())
}
