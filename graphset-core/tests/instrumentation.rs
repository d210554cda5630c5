//! Tests for the tracing spans and events emitted by dataset builders.

use graphset_core::{MultiGraphDataset, SamplerConfig, SingleGraphDataset};
use graphset_test_support::recording::RecordingLayer;
use rand::{SeedableRng, rngs::SmallRng};
use rstest::{fixture, rstest};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

#[fixture]
fn layer() -> RecordingLayer {
    RecordingLayer::default()
}

fn record<T>(layer: &RecordingLayer, run: impl FnOnce() -> T) -> T {
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    tracing::subscriber::with_default(subscriber, run)
}

#[rstest]
fn single_build_reports_source_and_split(layer: RecordingLayer) {
    record(&layer, || {
        SingleGraphDataset::build(&mut SmallRng::seed_from_u64(1)).expect("karate club builds")
    });

    let span = layer.span("dataset.single.build").expect("build span closed");
    assert_eq!(span.fields.get("source").map(String::as_str), Some("karate_club"));
    assert_eq!(span.fields.get("nodes").map(String::as_str), Some("34"));
    assert_eq!(span.fields.get("edges").map(String::as_str), Some("78"));

    let events = layer.events_with_message("single graph dataset built");
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.level, Level::INFO);
    assert_eq!(event.field("train"), Some("20"));
    assert_eq!(event.field("val"), Some("6"));
    assert_eq!(event.field("test"), Some("8"));
}

#[rstest]
fn multi_build_logs_rejections_and_summary(layer: RecordingLayer) {
    let config = SamplerConfig {
        degree_range: 4..7,
        node_range: 6..7,
        stop_after: 20,
        ..SamplerConfig::default()
    };
    let dataset = record(&layer, || {
        MultiGraphDataset::build_with(&config, &mut SmallRng::seed_from_u64(17))
            .expect("degrees 4 and 5 on six nodes are admissible")
    });

    let span = layer.span("dataset.multi.build").expect("build span closed");
    assert_eq!(span.fields.get("stop_after").map(String::as_str), Some("20"));

    let refusals = layer.events_with_message("generator refused, resampling");
    assert_eq!(refusals.len(), dataset.stats().generator_failures);
    assert!(
        refusals
            .iter()
            .all(|event| event.field("code") == Some("REGULAR_GRAPH_DEGREE_TOO_LARGE"))
    );

    let summary = layer.events_with_message("synthetic dataset built");
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].field("graphs"), Some("21"));
}

#[rstest]
fn rejected_config_is_logged_as_span_error(layer: RecordingLayer) {
    let config = SamplerConfig {
        feature_width: 0,
        ..SamplerConfig::default()
    };
    let result = record(&layer, || {
        MultiGraphDataset::build_with(&config, &mut SmallRng::seed_from_u64(0))
    });
    assert!(result.is_err());

    let errors: Vec<_> = layer
        .events()
        .into_iter()
        .filter(|event| event.level == Level::ERROR)
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(
        errors[0]
            .field("error")
            .is_some_and(|message| message.contains("feature_width"))
    );
}
