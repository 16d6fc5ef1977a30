use std::{path::PathBuf, time::Duration};

use analysis::{CanvasSize, GeoProjector};
use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use history::{HistoryConfig, HistoryHandle, HistoryService, SaveStatus};
use model::{RunSummary, Track};
use utility::{format, id::Id};

use crate::config::ImportConfig;

mod config;
mod import;

#[derive(Parser, Debug)]
#[command(author, version, about = "Import GPS recordings and keep the latest runs", long_about = None)]
struct Cli {
    /// History document, overrides RUN_HISTORY_PATH
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a GPX recording into the history
    Import {
        file: PathBuf,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// Cancel parsing after this many seconds, overrides RUN_IMPORT_TIMEOUT_SECS
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Show the statistics of a GPX recording without importing it
    Inspect { file: PathBuf },
    /// List the history, newest first
    List,
    /// Remove a run from the history
    Remove { id: Id<RunSummary> },
    /// Print the preview polyline of a run in canvas coordinates as JSON
    Preview {
        id: Id<RunSummary>,
        #[arg(long, default_value_t = 320.0)]
        width: f64,
        #[arg(long, default_value_t = 200.0)]
        height: f64,
        #[arg(long)]
        padding: Option<f64>,
    },
    /// Print the JSON Schema of the history document
    Schema,
}

impl Cli {
    fn history_config(&self) -> HistoryConfig {
        match &self.history {
            Some(path) => HistoryConfig::new(path.clone()),
            None => HistoryConfig::from_env().unwrap_or_default(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let history_config = cli.history_config();

    match cli.command {
        Command::Import {
            file,
            title,
            location,
            timeout,
        } => {
            let mut import_config = ImportConfig::from_env().unwrap_or_default();
            if let Some(seconds) = timeout {
                import_config.timeout = Some(Duration::from_secs(seconds)).filter(|t| !t.is_zero());
            }
            let track = import::load_track(file, &import_config).await?;
            let run = RunSummary::from_track(&track, title, location);

            let history = open_history(history_config).await?;
            let outcome = history.add(run.clone()).await?;
            print_run(&run);
            for evicted in &outcome.evicted {
                println!("dropped {} ({})", evicted.display_title(), evicted.id);
            }
            warn_unsaved(&outcome.save);
        }
        Command::Inspect { file } => {
            let import_config = ImportConfig::from_env().unwrap_or_default();
            let track = import::load_track(file, &import_config).await?;
            print_track(&track);
        }
        Command::List => {
            let history = open_history(history_config).await?;
            let runs = history.snapshot().await?;
            if runs.is_empty() {
                println!("no runs yet");
            }
            for run in &runs {
                print_run(run);
            }
        }
        Command::Remove { id } => {
            let history = open_history(history_config).await?;
            let outcome = history.remove(id).await?;
            match &outcome.removed {
                Some(run) => println!("removed {}", run.display_title()),
                None => println!("no run with id {}", id),
            }
            warn_unsaved(&outcome.save);
        }
        Command::Preview {
            id,
            width,
            height,
            padding,
        } => {
            let history = open_history(history_config).await?;
            let runs = history.snapshot().await?;
            let run = runs
                .iter()
                .find(|run| run.id == id)
                .ok_or_else(|| anyhow!("no run with id {}", id))?;

            let projector = match padding {
                Some(padding) => GeoProjector::with_padding(&run.preview_points, padding),
                None => GeoProjector::for_run(run),
            };
            let points: Vec<[f64; 2]> = projector
                .project(CanvasSize::new(width, height))
                .into_iter()
                .map(|point| [point.x, point.y])
                .collect();
            println!("{}", serde_json::to_string(&points)?);
        }
        Command::Schema => {
            let schema = schemars::schema_for!(Vec<RunSummary>);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

async fn open_history(config: HistoryConfig) -> anyhow::Result<HistoryHandle> {
    let path = config.path.clone();
    HistoryService::open(config)
        .await
        .with_context(|| format!("could not open history at {}", path.display()))
}

fn print_run(run: &RunSummary) {
    println!("{}  {}", run.id, run.display_title());
    if let Some(location) = &run.location {
        println!("    {}", location);
    }
    println!(
        "    {}  {}  {} /mi",
        format::miles(run.distance_meters),
        format::duration(run.duration_seconds),
        format::pace(run.avg_pace_sec_per_mile)
    );
}

fn print_track(track: &Track) {
    println!("points    {}", track.len());
    println!("distance  {}", format::miles(track.total_distance()));
    println!("duration  {}", format::duration(track.duration_seconds()));
    println!("pace      {} /mi", format::pace(track.average_pace()));
}

fn warn_unsaved(status: &SaveStatus) {
    if let SaveStatus::Failed(why) = status {
        log::warn!("history kept in memory only: {}", why);
        eprintln!("warning: the history could not be saved: {}", why);
    }
}
