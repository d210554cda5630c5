//! Single-graph dataset built from an attributed source graph.

use std::ops::Range;

use rand::rngs::SmallRng;
use tracing::{info, instrument};

use crate::{
    Result,
    dataset::{Dataset, check_index},
    error::DatasetError,
    fixture::{AttributedGraph, LabelMap},
    graph::{EdgeWeights, FeatureMatrix, Graph},
    split::{SplitMasks, SplitRatios},
};

/// Default width of generated node feature vectors.
pub const DEFAULT_FEATURE_WIDTH: usize = 10;

/// Parameters for decorating a source graph.
#[derive(Clone, Debug, PartialEq)]
pub struct SingleGraphConfig {
    /// Width of each node feature vector.
    pub feature_width: usize,
    /// Half-open range edge weights are drawn from.
    pub weight_range: Range<i64>,
    /// Train/validation ratios; the test split takes the remainder.
    pub split: SplitRatios,
}

impl Default for SingleGraphConfig {
    fn default() -> Self {
        Self {
            feature_width: DEFAULT_FEATURE_WIDTH,
            weight_range: 3..10,
            split: SplitRatios::default(),
        }
    }
}

impl SingleGraphConfig {
    /// Checks the configuration before any random draws are made.
    ///
    /// # Errors
    /// Returns [`DatasetError::InvalidConfig`] for a zero feature width or an
    /// empty weight range, and [`DatasetError::Split`] for invalid ratios.
    pub fn validate(&self) -> Result<()> {
        if self.feature_width == 0 {
            return Err(DatasetError::InvalidConfig {
                parameter: "feature_width",
                reason: "must be at least 1",
            });
        }
        if self.weight_range.is_empty() {
            return Err(DatasetError::InvalidConfig {
                parameter: "weight_range",
                reason: "must not be empty",
            });
        }
        self.split.validate()?;
        Ok(())
    }
}

/// Dataset holding exactly one decorated graph.
///
/// # Examples
/// ```
/// use graphset_core::{Dataset, SingleGraphDataset};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// let dataset = SingleGraphDataset::build(&mut rng)?;
/// assert_eq!(dataset.name(), "karate_club");
/// assert_eq!(dataset.len(), 1);
/// let graph = dataset.item_at(0)?;
/// assert_eq!((graph.num_nodes(), graph.num_edges()), (34, 78));
/// # Ok::<(), graphset_core::DatasetError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SingleGraphDataset {
    name: String,
    graph: Graph,
}

impl SingleGraphDataset {
    /// Builds the karate club dataset with the default configuration.
    ///
    /// # Errors
    /// Returns [`DatasetError`] if graph decoration fails.
    pub fn build(rng: &mut SmallRng) -> Result<Self> {
        Self::build_with(
            &AttributedGraph::karate_club(),
            &LabelMap::club(),
            &SingleGraphConfig::default(),
            rng,
        )
    }

    /// Decorates `source` with random features and weights, mapped labels
    /// and contiguous split masks.
    ///
    /// Features are drawn before weights, so a fixed seed reproduces both.
    ///
    /// # Errors
    /// Returns [`DatasetError::InvalidConfig`] or [`DatasetError::Split`] for
    /// a bad configuration and [`DatasetError::UnknownCategory`] when a node
    /// category is missing from `labels`.
    #[instrument(
        name = "dataset.single.build",
        err,
        skip_all,
        fields(
            source = %source.name(),
            nodes = source.num_nodes(),
            edges = source.num_edges(),
        ),
    )]
    pub fn build_with(
        source: &AttributedGraph,
        labels: &LabelMap,
        config: &SingleGraphConfig,
        rng: &mut SmallRng,
    ) -> Result<Self> {
        config.validate()?;
        let nodes = source.num_nodes();
        let node_labels = labels.labels_for(source)?;

        let features = FeatureMatrix::uniform(nodes, config.feature_width, rng);
        let weights = EdgeWeights::uniform(source.num_edges(), &config.weight_range, rng)?;
        let masks = SplitMasks::contiguous(nodes, &config.split)?;
        let counts = masks.counts();

        let mut graph = Graph::from_pairs(nodes, source.edges())?;
        graph.set_node_features(features)?;
        graph.set_node_labels(node_labels)?;
        graph.set_edge_weights(weights)?;
        graph.set_split_masks(masks)?;

        info!(
            train = counts.train,
            val = counts.val,
            test = counts.test,
            "single graph dataset built"
        );
        Ok(Self {
            name: source.name().to_owned(),
            graph,
        })
    }

    /// Returns the decorated graph.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}

impl Dataset for SingleGraphDataset {
    type Item<'a> = &'a Graph;

    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        1
    }

    fn item_at(&self, index: usize) -> Result<Self::Item<'_>> {
        check_index(index, self.len())?;
        Ok(&self.graph)
    }
}
