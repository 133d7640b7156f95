use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use inspection_structs::EnvironmentGraph;
use log::{info, warn};

use config::{load_base_environment, load_segments, LoadError};
use output::{write_generation, write_summary, Format, OutputOptions};

pub mod config;
pub mod output;

/// Generates waypoints, inspection points and mission state machines for
/// tunnel segments.
#[derive(Parser, Debug)]
#[command(name = "inspection_generator", version)]
struct Cli {
    /// Base environment the generated objects are appended to.
    #[arg(short, long, default_value = "environment.yaml")]
    environment: PathBuf,
    /// Augmented environment; the format's extension is appended if missing.
    #[arg(short, long, default_value = "environment_out.yaml")]
    output: PathBuf,
    /// Segment configuration.
    #[arg(short, long, default_value = "config_env.yaml")]
    config: PathBuf,
    #[arg(long, default_value = "generated_tasks")]
    task_dir: PathBuf,
    #[arg(long, value_enum, default_value_t = Format::Yaml)]
    format: Format,
    /// Skip writing the intermediate task lists.
    #[arg(long)]
    no_task_lists: bool,
    /// Print a table of the generated missions.
    #[arg(long)]
    summary: bool,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let segments = load_segments(&cli.config)?;
    let base = match load_base_environment(&cli.environment) {
        Ok(env) => env,
        Err(LoadError::MissingBaseEnvironment { path }) => {
            warn!("base environment {} not found, starting from an empty one", path);
            EnvironmentGraph::new()
        }
        Err(LoadError::Other(e)) => return Err(e),
    };

    let generation = inspection_planner::generate(&segments, base).context("generating missions")?;

    let options = OutputOptions {
        environment: cli.output,
        task_dir: cli.task_dir,
        format: cli.format,
        task_lists: !cli.no_task_lists,
    };
    let written = write_generation(&generation, &options)?;
    info!(
        "{} objects, {} missions, {} files written",
        generation.environment.objects().len(),
        generation.segments.len() * 2,
        written.len()
    );

    if cli.summary {
        write_summary(&generation, std::io::stdout().lock()).context("printing summary")?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run(Cli::parse())
}
