//! Unit tests for CLI argument parsing, command execution and rendering.

use super::commands::{label_histogram, run_multi, run_single};
use super::{
    Cli, CliError, Command, ExecutionSummary, MultiCommand, SingleCommand, render_summary, run_cli,
};

use clap::Parser;
use graphset_core::{Dataset, DatasetError};
use graphset_test_support::recording::RecordingLayer;
use rstest::rstest;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn render(summary: &ExecutionSummary) -> Result<String, Box<dyn std::error::Error>> {
    let mut buffer = Vec::new();
    render_summary(summary, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[rstest]
fn clap_applies_single_defaults() -> TestResult {
    let cli = Cli::try_parse_from(["graphset", "single"])?;
    let Command::Single(command) = cli.command else {
        panic!("expected single command");
    };
    assert_eq!(command.seed, None);
    assert_eq!(command.feature_width, 10);
    Ok(())
}

#[rstest]
fn clap_parses_multi_overrides() -> TestResult {
    let cli = Cli::try_parse_from([
        "graphset",
        "multi",
        "--seed",
        "42",
        "--stop-after",
        "5",
        "--feature-width",
        "3",
    ])?;
    let Command::Multi(command) = cli.command else {
        panic!("expected multi command");
    };
    assert_eq!(command.seed, Some(42));
    assert_eq!(command.stop_after, 5);
    assert_eq!(command.feature_width, 3);
    Ok(())
}

#[rstest]
#[case::negative_seed(&["graphset", "single", "--seed", "-1"])]
#[case::non_numeric_width(&["graphset", "multi", "--feature-width", "wide"])]
#[case::unknown_command(&["graphset", "pairs"])]
#[case::missing_command(&["graphset"])]
fn clap_rejects_malformed_arguments(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[rstest]
fn single_summary_reports_split_and_labels() -> TestResult {
    let summary = run_single(&SingleCommand {
        seed: Some(9),
        feature_width: 10,
    })?;
    let text = render(&summary)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        [
            "dataset: karate_club",
            "graph: Graph(num_nodes=34, num_edges=78, \
             ndata_schemes={feat: f32[10], label: i64, train_mask: bool, val_mask: bool, test_mask: bool}, \
             edata_schemes={weight: i64[1]})",
            "split: train=20 val=6 test=8",
            "labels: 0=17 1=17",
        ]
    );
    Ok(())
}

#[rstest]
fn multi_summary_reports_sampler_stats() -> TestResult {
    let summary = run_multi(&MultiCommand {
        seed: Some(9),
        stop_after: 4,
        feature_width: 2,
    })?;
    let ExecutionSummary::Multi(dataset) = &summary else {
        panic!("expected multi summary");
    };
    let stats = dataset.stats();
    let (first, label) = dataset.item_at(0)?;

    let text = render(&summary)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "dataset: synthetic");
    assert_eq!(lines[1], "graphs: 5");
    assert_eq!(
        lines[2],
        format!(
            "sampler: draws={} parity_rejections={} degree_rejections={} generator_failures={} accepted=5",
            stats.draws, stats.parity_rejections, stats.degree_rejections, stats.generator_failures,
        )
    );
    assert!(lines[3].starts_with("labels: "));
    assert_eq!(lines[4], format!("first: {first} label={label}"));
    Ok(())
}

#[rstest]
fn seeded_runs_are_reproducible() -> TestResult {
    let command = MultiCommand {
        seed: Some(77),
        stop_after: 10,
        feature_width: 4,
    };
    let first = render(&run_multi(&command)?)?;
    let second = render(&run_multi(&command)?)?;
    assert_eq!(first, second);
    Ok(())
}

#[rstest]
fn zero_feature_width_surfaces_dataset_error() {
    let cli = Cli {
        command: Command::Single(SingleCommand {
            seed: Some(1),
            feature_width: 0,
        }),
    };
    let err = run_cli(cli).expect_err("zero width is invalid");
    let CliError::Dataset(inner) = &err;
    assert_eq!(inner.code().as_str(), "DATASET_INVALID_CONFIG");
    assert!(matches!(
        inner,
        DatasetError::InvalidConfig {
            parameter: "feature_width",
            ..
        }
    ));
}

#[rstest]
fn run_cli_records_command_span() -> TestResult {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let cli = Cli {
        command: Command::Multi(MultiCommand {
            seed: Some(3),
            stop_after: 2,
            feature_width: 10,
        }),
    };
    tracing::subscriber::with_default(subscriber, || run_cli(cli))?;

    let span = layer.span("cli.run").ok_or("cli.run span missing")?;
    assert_eq!(span.fields.get("command").map(String::as_str), Some("multi"));
    assert_eq!(span.fields.get("seed").map(String::as_str), Some("3"));

    let completed = layer.events_with_message("multi command completed");
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].level, Level::INFO);
    assert_eq!(completed[0].field("graphs"), Some("3"));
    Ok(())
}

#[rstest]
#[case::balanced(&[0, 1, 1, 0], &[(0, 2), (1, 2)])]
#[case::single_class(&[1, 1, 1], &[(1, 3)])]
#[case::empty(&[], &[])]
fn histogram_counts_each_label(#[case] labels: &[i64], #[case] expected: &[(i64, usize)]) {
    let histogram: Vec<(i64, usize)> = label_histogram(labels).into_iter().collect();
    assert_eq!(histogram, expected);
}
