use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use storyflow::config::StoryflowConfig;
use storyflow::flow::{AvailableStory, FlowEdit, FlowGraph, StoryFlowDto};

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    /// Configuration file; defaults apply when omitted
    #[clap(short, long, global = true)]
    config: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        #[clap(long = "output", default_value = "storyflow.yaml")]
        output: String,
    },
    /// Check a saved story flow for integrity errors
    Validate {
        #[clap(short, long)]
        flow: String,
    },
    /// Replay a list of edits against a saved story flow
    Apply {
        #[clap(short, long)]
        flow: String,
        #[clap(short, long)]
        edits: String,
        /// Stories that link-story blocks are resolved against
        #[clap(short, long)]
        stories: Option<String>,
        /// Where to write the resulting flow; printed when omitted
        #[clap(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::Init { output } => {
            info!("Writing default configuration: {}", output);
            StoryflowConfig::default()
                .save(&output)
                .with_context(|| format!("Failed to write {}", output))?;
        }
        Commands::Validate { flow } => {
            let config = load_config(args.config.as_deref())?;
            let graph = load_flow(&flow, &config)?;
            info!(
                "{} is valid: {} block(s), {} connection(s)",
                flow,
                graph.block_count(),
                graph.connection_count()
            );
        }
        Commands::Apply {
            flow,
            edits,
            stories,
            output,
        } => {
            let config = load_config(args.config.as_deref())?;
            let dto: StoryFlowDto = read_json(&flow)?;
            let story_id = dto.story_id.clone();
            let mut graph = FlowGraph::from_dto_with_config(dto, config.flow)
                .with_context(|| format!("Failed to load flow {}", flow))?;

            let edits: Vec<FlowEdit> = read_json(&edits)?;
            let total = edits.len();
            let rejected = graph
                .apply_edits(edits)
                .iter()
                .filter(|result| result.is_err())
                .count();
            info!("Applied {} of {} edit(s)", total - rejected, total);

            if let Some(stories) = stories {
                let available: Vec<AvailableStory> = read_json(&stories)?;
                let unavailable = graph.resolve_linked_story_names(&available);
                if unavailable > 0 {
                    warn!("{} link-story block(s) point at unavailable stories", unavailable);
                }
            }

            let rendered = serde_json::to_string_pretty(&graph.to_dto(story_id))?;
            match output {
                Some(path) => {
                    fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write {}", path))?;
                    info!("Wrote {}", path);
                }
                None => println!("{}", rendered),
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&str>) -> Result<StoryflowConfig> {
    match path {
        Some(path) => StoryflowConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path)),
        None => Ok(StoryflowConfig::default()),
    }
}

fn load_flow(path: &str, config: &StoryflowConfig) -> Result<FlowGraph> {
    let dto: StoryFlowDto = read_json(path)?;
    FlowGraph::from_dto_with_config(dto, config.flow.clone())
        .with_context(|| format!("Failed to load flow {}", path))
}

fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .map(|level| level.to_lowercase())
        .as_deref()
        .unwrap_or("info")
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level.to_string()))
        .without_time()
        .init();
}
