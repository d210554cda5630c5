//! Graphset core library.
//!
//! Builds in-memory graph learning datasets: a single decorated karate club
//! graph for node classification, and a collection of random regular graphs
//! with graph-level labels.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod dataset;
mod error;
mod fixture;
mod graph;
mod multi;
mod regular;
mod rng;
mod single;
mod split;
#[cfg(test)]
mod test_utils;

pub use crate::{
    dataset::Dataset,
    error::{
        DatasetError, DatasetErrorCode, GraphError, GraphErrorCode, RegularGraphError,
        RegularGraphErrorCode, Result, SplitError, SplitErrorCode,
    },
    fixture::{AttributedGraph, LabelMap, MR_HI, OFFICER},
    graph::{EdgeWeights, FeatureMatrix, Graph},
    multi::{DEFAULT_STOP_AFTER, MultiGraphDataset, SamplerConfig, SamplerStats},
    regular::random_regular_graph,
    rng::{MULTI_GRAPH_STREAM, SINGLE_GRAPH_STREAM, derive_seed, stream_rng},
    single::{DEFAULT_FEATURE_WIDTH, SingleGraphConfig, SingleGraphDataset},
    split::{Split, SplitCounts, SplitMasks, SplitRatios},
};
