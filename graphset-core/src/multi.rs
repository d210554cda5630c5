//! Multi-graph dataset of random regular graphs with graph-level labels.
//!
//! The sampler draws a degree and a node count, rejects pairs that cannot
//! form a simple regular graph, and keeps going until it has accepted more
//! than [`SamplerConfig::stop_after`] graphs.

use std::ops::Range;

use rand::{Rng, rngs::SmallRng};
use tracing::{debug, info, instrument};

use crate::{
    Result,
    dataset::{Dataset, check_index},
    error::DatasetError,
    graph::{FeatureMatrix, Graph},
    regular::random_regular_graph,
    single::DEFAULT_FEATURE_WIDTH,
};

const SYNTHETIC_NAME: &str = "synthetic";
const GRAPH_FEATURE_KEY: &str = "feats";

/// Default acceptance threshold of the sampler loop.
pub const DEFAULT_STOP_AFTER: usize = 100;

/// Parameters for the regular-graph sampler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Half-open range degrees are drawn from.
    pub degree_range: Range<usize>,
    /// Half-open range node counts are drawn from.
    pub node_range: Range<usize>,
    /// Width of each node feature vector.
    pub feature_width: usize,
    /// Number of graph classes, at least two; labels are drawn from
    /// `0..num_classes`.
    pub num_classes: i64,
    /// The loop stops once the accepted count exceeds this value, so the
    /// dataset holds `stop_after + 1` graphs.
    pub stop_after: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            degree_range: 3..10,
            node_range: 5..10,
            feature_width: DEFAULT_FEATURE_WIDTH,
            num_classes: 2,
            stop_after: DEFAULT_STOP_AFTER,
        }
    }
}

impl SamplerConfig {
    /// Checks the configuration can terminate and produce valid graphs.
    ///
    /// # Errors
    /// Returns [`DatasetError::InvalidConfig`] for empty ranges, a zero
    /// feature width, fewer than two classes, or ranges that contain no
    /// `(nodes, degree)` pair with an even product and `degree < nodes`.
    ///
    /// # Examples
    /// ```
    /// use graphset_core::SamplerConfig;
    ///
    /// assert!(SamplerConfig::default().validate().is_ok());
    ///
    /// let odd_only = SamplerConfig {
    ///     degree_range: 3..4,
    ///     node_range: 5..6,
    ///     ..SamplerConfig::default()
    /// };
    /// assert!(odd_only.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        let invalid = |parameter, reason| Err(DatasetError::InvalidConfig { parameter, reason });
        if self.degree_range.is_empty() {
            return invalid("degree_range", "must not be empty");
        }
        if self.node_range.is_empty() {
            return invalid("node_range", "must not be empty");
        }
        if self.feature_width == 0 {
            return invalid("feature_width", "must be at least 1");
        }
        if self.num_classes < 2 {
            return invalid("num_classes", "must be at least 2");
        }
        if !self.has_feasible_pair() {
            return invalid(
                "degree_range",
                "no degree and node count pair admits a regular graph",
            );
        }
        Ok(())
    }

    /// Whether some degree `d` and node count `n` in range satisfy `d < n`
    /// with `d * n` even.
    ///
    /// The two smallest degrees cover both parities; larger degrees only
    /// shrink the set of admissible node counts.
    fn has_feasible_pair(&self) -> bool {
        let Some(max_nodes) = self.node_range.end.checked_sub(1) else {
            return false;
        };
        self.degree_range.clone().take(2).any(|degree| {
            if degree >= max_nodes {
                return false;
            }
            if degree % 2 == 0 {
                return true;
            }
            let lowest = self.node_range.start.max(degree + 1);
            let first_even = lowest + lowest % 2;
            first_even <= max_nodes
        })
    }
}

/// Counters describing how the sampler loop spent its draws.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SamplerStats {
    /// Number of `(degree, nodes)` pairs drawn.
    pub draws: usize,
    /// Pairs rejected because `degree * nodes` was odd.
    pub parity_rejections: usize,
    /// Pairs rejected because `nodes < degree`.
    pub degree_rejections: usize,
    /// Pairs the regular-graph generator refused.
    pub generator_failures: usize,
    /// Graphs accepted into the dataset.
    pub accepted: usize,
}

impl SamplerStats {
    /// Total number of rejected draws.
    #[must_use]
    pub fn rejections(&self) -> usize {
        self.parity_rejections + self.degree_rejections + self.generator_failures
    }
}

/// Dataset of random regular graphs, each paired with one integer label.
///
/// Node features are stored under the `feats` key.
///
/// # Examples
/// ```
/// use graphset_core::{Dataset, MultiGraphDataset, SamplerConfig};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let config = SamplerConfig { stop_after: 4, ..SamplerConfig::default() };
/// let mut rng = SmallRng::seed_from_u64(7);
/// let dataset = MultiGraphDataset::build_with(&config, &mut rng)?;
/// assert_eq!(dataset.len(), 5);
/// let (graph, label) = dataset.item_at(0)?;
/// assert!(graph.num_nodes() >= 5);
/// assert!((0..2).contains(&label));
/// # Ok::<(), graphset_core::DatasetError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MultiGraphDataset {
    graphs: Vec<Graph>,
    labels: Vec<i64>,
    stats: SamplerStats,
}

impl MultiGraphDataset {
    /// Builds the synthetic dataset with the default configuration
    /// (101 graphs).
    ///
    /// # Errors
    /// Returns [`DatasetError`] if graph assembly fails.
    pub fn build(rng: &mut SmallRng) -> Result<Self> {
        Self::build_with(&SamplerConfig::default(), rng)
    }

    /// Runs the rejection-sampling loop described by `config`.
    ///
    /// Parity failures, degree-bound failures and generator refusals are
    /// retried without limit; validation guarantees an admissible pair
    /// exists so the loop terminates.
    ///
    /// # Errors
    /// Returns [`DatasetError::InvalidConfig`] for an unusable configuration
    /// and [`DatasetError::Graph`] if an accepted graph cannot be assembled.
    #[instrument(
        name = "dataset.multi.build",
        err,
        skip_all,
        fields(stop_after = config.stop_after),
    )]
    pub fn build_with(config: &SamplerConfig, rng: &mut SmallRng) -> Result<Self> {
        config.validate()?;
        let mut graphs = Vec::new();
        let mut labels = Vec::new();
        let mut stats = SamplerStats::default();

        loop {
            stats.draws += 1;
            let degree = rng.gen_range(config.degree_range.clone());
            let nodes = rng.gen_range(config.node_range.clone());
            if degree % 2 == 1 && nodes % 2 == 1 {
                stats.parity_rejections += 1;
                debug!(degree, nodes, "odd stub total, resampling");
                continue;
            }
            if nodes < degree {
                stats.degree_rejections += 1;
                debug!(degree, nodes, "degree exceeds node count, resampling");
                continue;
            }
            let edges = match random_regular_graph(degree, nodes, rng) {
                Ok(edges) => edges,
                Err(error) => {
                    stats.generator_failures += 1;
                    debug!(code = %error.code(), %error, "generator refused, resampling");
                    continue;
                }
            };

            let mut graph = Graph::from_pairs(nodes, &edges)?;
            let features = FeatureMatrix::uniform(nodes, config.feature_width, rng);
            graph.set_node_features_as(GRAPH_FEATURE_KEY, features)?;
            let label = rng.gen_range(0..config.num_classes);
            graphs.push(graph);
            labels.push(label);
            stats.accepted += 1;

            if stats.accepted > config.stop_after {
                break;
            }
        }

        info!(
            graphs = stats.accepted,
            draws = stats.draws,
            rejections = stats.rejections(),
            "synthetic dataset built"
        );
        Ok(Self {
            graphs,
            labels,
            stats,
        })
    }

    /// Returns the sampled graphs in acceptance order.
    #[must_use]
    pub fn graphs(&self) -> &[Graph] {
        &self.graphs
    }

    /// Returns the graph labels, aligned with [`Self::graphs`].
    #[must_use]
    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    /// Returns the sampler counters.
    #[must_use]
    pub fn stats(&self) -> SamplerStats {
        self.stats
    }
}

impl Dataset for MultiGraphDataset {
    type Item<'a> = (&'a Graph, i64);

    fn name(&self) -> &str {
        SYNTHETIC_NAME
    }

    fn len(&self) -> usize {
        self.graphs.len()
    }

    fn item_at(&self, index: usize) -> Result<Self::Item<'_>> {
        check_index(index, self.len())?;
        match (self.graphs.get(index), self.labels.get(index)) {
            (Some(graph), Some(&label)) => Ok((graph, label)),
            _ => Err(DatasetError::OutOfBounds {
                index,
                len: self.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::default_ranges(3..10, 5..10, true)]
    #[case::smallest_pair(4..5, 5..6, true)]
    #[case::odd_only(3..4, 5..6, false)]
    #[case::odd_degrees_even_nodes(3..4, 4..5, true)]
    #[case::degree_equals_nodes(6..7, 6..7, false)]
    #[case::degree_exceeds_nodes(9..10, 3..4, false)]
    #[case::odd_then_even_degree(5..7, 7..8, true)]
    #[case::odd_degree_needs_even_nodes(5..6, 5..8, true)]
    fn feasibility_matches_brute_force(
        #[case] degree_range: Range<usize>,
        #[case] node_range: Range<usize>,
        #[case] expected: bool,
    ) {
        let brute_force = degree_range.clone().any(|degree| {
            node_range
                .clone()
                .any(|nodes| degree < nodes && (degree * nodes) % 2 == 0)
        });
        assert_eq!(brute_force, expected, "case table disagrees with brute force");
        let config = SamplerConfig {
            degree_range,
            node_range,
            ..SamplerConfig::default()
        };
        assert_eq!(config.has_feasible_pair(), expected);
    }

    #[rstest]
    #[case::empty_degrees(SamplerConfig { degree_range: 4..4, ..SamplerConfig::default() }, "degree_range")]
    #[case::empty_nodes(SamplerConfig { node_range: 9..5, ..SamplerConfig::default() }, "node_range")]
    #[case::zero_width(SamplerConfig { feature_width: 0, ..SamplerConfig::default() }, "feature_width")]
    #[case::no_classes(SamplerConfig { num_classes: 0, ..SamplerConfig::default() }, "num_classes")]
    #[case::single_class(SamplerConfig { num_classes: 1, ..SamplerConfig::default() }, "num_classes")]
    fn invalid_configs_are_rejected(#[case] config: SamplerConfig, #[case] expected: &str) {
        let err = config.validate().expect_err("configuration must be rejected");
        match err {
            DatasetError::InvalidConfig { parameter, .. } => assert_eq!(parameter, expected),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejections_sum_all_failure_kinds() {
        let stats = SamplerStats {
            draws: 10,
            parity_rejections: 2,
            degree_rejections: 3,
            generator_failures: 1,
            accepted: 4,
        };
        assert_eq!(stats.rejections(), 6);
    }
}
