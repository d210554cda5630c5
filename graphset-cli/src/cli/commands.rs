//! Command implementations and argument parsing for the graphset CLI.

use std::collections::BTreeMap;
use std::io::{self, Write};

use clap::{Args, Parser, Subcommand};
use graphset_core::{
    AttributedGraph, DEFAULT_FEATURE_WIDTH, DEFAULT_STOP_AFTER, Dataset, DatasetError, LabelMap,
    MULTI_GRAPH_STREAM, MultiGraphDataset, SINGLE_GRAPH_STREAM, SamplerConfig, SingleGraphConfig,
    SingleGraphDataset, stream_rng,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "graphset", about = "Build in-memory graph learning datasets.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Build the karate club node-classification dataset.
    Single(SingleCommand),
    /// Sample random regular graphs with graph-level labels.
    Multi(MultiCommand),
}

/// Options accepted by the `single` command.
#[derive(Debug, Args, Clone)]
pub struct SingleCommand {
    /// Base seed; omit for an entropy-seeded run.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Width of each node feature vector.
    #[arg(
        long = "feature-width",
        default_value_t = DEFAULT_FEATURE_WIDTH,
        value_parser = clap::value_parser!(usize),
    )]
    pub feature_width: usize,
}

/// Options accepted by the `multi` command.
#[derive(Debug, Args, Clone)]
pub struct MultiCommand {
    /// Base seed; omit for an entropy-seeded run.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop once more than this many graphs are accepted.
    #[arg(
        long = "stop-after",
        default_value_t = DEFAULT_STOP_AFTER,
        value_parser = clap::value_parser!(usize),
    )]
    pub stop_after: usize,

    /// Width of each node feature vector.
    #[arg(
        long = "feature-width",
        default_value_t = DEFAULT_FEATURE_WIDTH,
        value_parser = clap::value_parser!(usize),
    )]
    pub feature_width: usize,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Dataset construction failed.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub enum ExecutionSummary {
    /// Result of the `single` command.
    Single(SingleGraphDataset),
    /// Result of the `multi` command.
    Multi(MultiGraphDataset),
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when the dataset cannot be built.
///
/// # Examples
/// ```
/// use graphset_cli::cli::{Cli, Command, ExecutionSummary, SingleCommand, run_cli};
/// use graphset_core::Dataset;
///
/// let cli = Cli {
///     command: Command::Single(SingleCommand { seed: Some(1), feature_width: 4 }),
/// };
/// let ExecutionSummary::Single(dataset) = run_cli(cli)? else {
///     unreachable!("single command yields a single graph");
/// };
/// assert_eq!(dataset.len(), 1);
/// # Ok::<(), graphset_cli::cli::CliError>(())
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty, seed = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Single(command) => {
            span.record("command", "single");
            record_seed(&span, command.seed);
            run_single(&command)
        }
        Command::Multi(command) => {
            span.record("command", "multi");
            record_seed(&span, command.seed);
            run_multi(&command)
        }
    }
}

fn record_seed(span: &Span, seed: Option<u64>) {
    match seed {
        Some(seed) => span.record("seed", seed),
        None => span.record("seed", "entropy"),
    };
}

pub(super) fn run_single(command: &SingleCommand) -> Result<ExecutionSummary, CliError> {
    let config = SingleGraphConfig {
        feature_width: command.feature_width,
        ..SingleGraphConfig::default()
    };
    let mut rng = stream_rng(command.seed, SINGLE_GRAPH_STREAM);
    let dataset = SingleGraphDataset::build_with(
        &AttributedGraph::karate_club(),
        &LabelMap::club(),
        &config,
        &mut rng,
    )?;
    info!(dataset = dataset.name(), "single command completed");
    Ok(ExecutionSummary::Single(dataset))
}

pub(super) fn run_multi(command: &MultiCommand) -> Result<ExecutionSummary, CliError> {
    let config = SamplerConfig {
        feature_width: command.feature_width,
        stop_after: command.stop_after,
        ..SamplerConfig::default()
    };
    let mut rng = stream_rng(command.seed, MULTI_GRAPH_STREAM);
    let dataset = MultiGraphDataset::build_with(&config, &mut rng)?;
    info!(
        dataset = dataset.name(),
        graphs = dataset.len(),
        "multi command completed"
    );
    Ok(ExecutionSummary::Multi(dataset))
}

pub(super) fn label_histogram(labels: &[i64]) -> BTreeMap<i64, usize> {
    let mut histogram = BTreeMap::new();
    for &label in labels {
        *histogram.entry(label).or_default() += 1;
    }
    histogram
}

fn write_histogram(writer: &mut impl Write, labels: &[i64]) -> io::Result<()> {
    let entries: Vec<String> = label_histogram(labels)
        .into_iter()
        .map(|(label, count)| format!("{label}={count}"))
        .collect();
    writeln!(writer, "labels: {}", entries.join(" "))
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use graphset_cli::cli::{ExecutionSummary, render_summary};
/// # use graphset_core::{SINGLE_GRAPH_STREAM, SingleGraphDataset, stream_rng};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dataset = SingleGraphDataset::build(&mut stream_rng(Some(3), SINGLE_GRAPH_STREAM))?;
/// let mut buffer = Vec::new();
/// render_summary(&ExecutionSummary::Single(dataset), &mut buffer)?;
/// let text = String::from_utf8(buffer)?;
/// assert!(text.starts_with("dataset: karate_club\n"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Single(dataset) => {
            let graph = dataset.graph();
            writeln!(writer, "dataset: {}", dataset.name())?;
            writeln!(writer, "graph: {graph}")?;
            if let Some(masks) = graph.split_masks() {
                let counts = masks.counts();
                writeln!(
                    writer,
                    "split: train={} val={} test={}",
                    counts.train, counts.val, counts.test
                )?;
            }
            write_histogram(&mut writer, graph.node_labels().unwrap_or_default())?;
        }
        ExecutionSummary::Multi(dataset) => {
            let stats = dataset.stats();
            writeln!(writer, "dataset: {}", dataset.name())?;
            writeln!(writer, "graphs: {}", dataset.len())?;
            writeln!(
                writer,
                "sampler: draws={} parity_rejections={} degree_rejections={} generator_failures={} accepted={}",
                stats.draws,
                stats.parity_rejections,
                stats.degree_rejections,
                stats.generator_failures,
                stats.accepted,
            )?;
            write_histogram(&mut writer, dataset.labels())?;
            if let Ok((graph, label)) = dataset.item_at(0) {
                writeln!(writer, "first: {graph} label={label}")?;
            }
        }
    }
    Ok(())
}
