//! Graph container with attached node and edge data.
//!
//! A [`Graph`] stores directed edges as parallel source/destination vectors
//! in insertion order, together with optional per-node features, labels and
//! split masks and optional per-edge weights. Attached data is validated
//! against the graph shape so downstream consumers can index it without
//! bounds surprises.

use std::{fmt, ops::Range};

use rand::{Rng, rngs::SmallRng};

use crate::{error::GraphError, split::SplitMasks};

const DEFAULT_FEATURE_KEY: &str = "feat";

/// Dense row-major `f32` matrix with one row per node.
///
/// # Examples
/// ```
/// use graphset_core::FeatureMatrix;
///
/// let matrix = FeatureMatrix::from_vec(2, 3, vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5])?;
/// assert_eq!(matrix.shape(), (2, 3));
/// assert_eq!(matrix.row(1), Some(&[0.3_f32, 0.4, 0.5][..]));
/// # Ok::<(), graphset_core::GraphError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureMatrix {
    rows: usize,
    width: usize,
    values: Vec<f32>,
}

impl FeatureMatrix {
    /// Draws a `(rows, width)` matrix with entries uniform in `[0, 1)`.
    #[must_use]
    pub fn uniform(rows: usize, width: usize, rng: &mut SmallRng) -> Self {
        let values = (0..rows.saturating_mul(width))
            .map(|_| rng.gen_range(0.0_f32..1.0_f32))
            .collect();
        Self {
            rows,
            width,
            values,
        }
    }

    /// Wraps pre-computed row-major values.
    ///
    /// # Errors
    /// Returns [`GraphError::ShapeMismatch`] when `values` does not hold
    /// exactly `rows * width` entries.
    pub fn from_vec(rows: usize, width: usize, values: Vec<f32>) -> Result<Self, GraphError> {
        let expected = rows.saturating_mul(width);
        if values.len() != expected {
            return Err(GraphError::ShapeMismatch {
                field: "feat",
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            rows,
            width,
            values,
        })
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the row width.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns `(rows, width)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.width)
    }

    /// Returns the values of row `index`, if present.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.width)?;
        let end = start.checked_add(self.width)?;
        self.values.get(start..end)
    }

    /// Returns every value in row-major order.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }
}

/// Integer edge weights, one per edge (shape `(E, 1)`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeWeights {
    values: Vec<i64>,
}

impl EdgeWeights {
    /// Draws `count` weights uniformly from `range`.
    ///
    /// # Errors
    /// Returns [`GraphError::EmptyWeightRange`] when `range` holds no values.
    ///
    /// # Examples
    /// ```
    /// use graphset_core::EdgeWeights;
    /// use rand::{SeedableRng, rngs::SmallRng};
    ///
    /// let mut rng = SmallRng::seed_from_u64(4);
    /// let weights = EdgeWeights::uniform(5, &(3..10), &mut rng)?;
    /// assert_eq!(weights.shape(), (5, 1));
    /// assert!(EdgeWeights::uniform(5, &(7..7), &mut rng).is_err());
    /// # Ok::<(), graphset_core::GraphError>(())
    /// ```
    pub fn uniform(
        count: usize,
        range: &Range<i64>,
        rng: &mut SmallRng,
    ) -> Result<Self, GraphError> {
        if range.is_empty() {
            return Err(GraphError::EmptyWeightRange {
                start: range.start,
                end: range.end,
            });
        }
        let values = (0..count)
            .map(|_| rng.gen_range(range.clone()))
            .collect();
        Ok(Self { values })
    }

    /// Wraps pre-computed weights.
    #[must_use]
    pub fn from_vec(values: Vec<i64>) -> Self {
        Self { values }
    }

    /// Returns the number of weights.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether no weights are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns `(len, 1)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.values.len(), 1)
    }

    /// Returns the weights in edge order.
    #[must_use]
    pub fn as_slice(&self) -> &[i64] {
        &self.values
    }
}

/// Directed graph over nodes `0..num_nodes` with optional attached data.
///
/// # Examples
/// ```
/// use graphset_core::Graph;
///
/// let graph = Graph::from_pairs(3, &[(0, 1), (1, 2)])?;
/// assert_eq!(graph.num_nodes(), 3);
/// assert_eq!(graph.num_edges(), 2);
/// assert_eq!(graph.src(), &[0, 1]);
/// assert_eq!(graph.dst(), &[1, 2]);
/// assert_eq!(
///     graph.to_string(),
///     "Graph(num_nodes=3, num_edges=2, ndata_schemes={}, edata_schemes={})"
/// );
/// # Ok::<(), graphset_core::GraphError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Graph {
    num_nodes: usize,
    src: Vec<usize>,
    dst: Vec<usize>,
    features: Option<(&'static str, FeatureMatrix)>,
    labels: Option<Vec<i64>>,
    masks: Option<SplitMasks>,
    weights: Option<EdgeWeights>,
}

impl Graph {
    /// Builds a graph from parallel endpoint vectors.
    ///
    /// # Errors
    /// Returns [`GraphError::LengthMismatch`] when `src` and `dst` differ in
    /// length and [`GraphError::NodeOutOfRange`] when an endpoint is not
    /// below `num_nodes`.
    pub fn from_edges(
        num_nodes: usize,
        src: Vec<usize>,
        dst: Vec<usize>,
    ) -> Result<Self, GraphError> {
        if src.len() != dst.len() {
            return Err(GraphError::LengthMismatch {
                src: src.len(),
                dst: dst.len(),
            });
        }
        let endpoints = src.iter().zip(&dst).enumerate();
        for (edge, (&u, &v)) in endpoints {
            if let Some(node) = [u, v].into_iter().find(|&node| node >= num_nodes) {
                return Err(GraphError::NodeOutOfRange {
                    edge,
                    node,
                    num_nodes,
                });
            }
        }
        Ok(Self {
            num_nodes,
            src,
            dst,
            features: None,
            labels: None,
            masks: None,
            weights: None,
        })
    }

    /// Builds a graph from `(source, destination)` pairs.
    ///
    /// # Errors
    /// Returns [`GraphError::NodeOutOfRange`] when an endpoint is not below
    /// `num_nodes`.
    pub fn from_pairs(num_nodes: usize, pairs: &[(usize, usize)]) -> Result<Self, GraphError> {
        let (src, dst): (Vec<usize>, Vec<usize>) = pairs.iter().copied().unzip();
        Self::from_edges(num_nodes, src, dst)
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.src.len()
    }

    /// Returns edge source endpoints in insertion order.
    #[must_use]
    pub fn src(&self) -> &[usize] {
        &self.src
    }

    /// Returns edge destination endpoints in insertion order.
    #[must_use]
    pub fn dst(&self) -> &[usize] {
        &self.dst
    }

    /// Iterates over `(source, destination)` pairs in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.src.iter().copied().zip(self.dst.iter().copied())
    }

    /// Counts incident edges per node, ignoring direction.
    #[must_use]
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0_usize; self.num_nodes];
        for node in self.src.iter().chain(&self.dst) {
            if let Some(slot) = degrees.get_mut(*node) {
                *slot += 1;
            }
        }
        degrees
    }

    /// Attaches node features.
    ///
    /// # Errors
    /// Returns [`GraphError::ShapeMismatch`] unless the matrix has one row
    /// per node.
    pub fn set_node_features(&mut self, features: FeatureMatrix) -> Result<(), GraphError> {
        self.set_node_features_as(DEFAULT_FEATURE_KEY, features)
    }

    /// Attaches node features under `key`, replacing any earlier features.
    ///
    /// # Errors
    /// Returns [`GraphError::ShapeMismatch`] unless the matrix has one row
    /// per node.
    ///
    /// # Examples
    /// ```
    /// use graphset_core::{FeatureMatrix, Graph};
    ///
    /// let mut graph = Graph::from_pairs(2, &[(0, 1)])?;
    /// graph.set_node_features_as("feats", FeatureMatrix::from_vec(2, 1, vec![0.5, 0.25])?)?;
    /// assert_eq!(graph.node_feature_key(), Some("feats"));
    /// # Ok::<(), graphset_core::GraphError>(())
    /// ```
    pub fn set_node_features_as(
        &mut self,
        key: &'static str,
        features: FeatureMatrix,
    ) -> Result<(), GraphError> {
        check_rows(key, self.num_nodes, features.rows())?;
        self.features = Some((key, features));
        Ok(())
    }

    /// Attaches integer node labels.
    ///
    /// # Errors
    /// Returns [`GraphError::ShapeMismatch`] unless there is one label per
    /// node.
    pub fn set_node_labels(&mut self, labels: Vec<i64>) -> Result<(), GraphError> {
        check_rows("label", self.num_nodes, labels.len())?;
        self.labels = Some(labels);
        Ok(())
    }

    /// Attaches train/validation/test masks.
    ///
    /// # Errors
    /// Returns [`GraphError::ShapeMismatch`] unless the masks cover every
    /// node.
    pub fn set_split_masks(&mut self, masks: SplitMasks) -> Result<(), GraphError> {
        check_rows("train_mask", self.num_nodes, masks.len())?;
        self.masks = Some(masks);
        Ok(())
    }

    /// Attaches edge weights.
    ///
    /// # Errors
    /// Returns [`GraphError::ShapeMismatch`] unless there is one weight per
    /// edge.
    pub fn set_edge_weights(&mut self, weights: EdgeWeights) -> Result<(), GraphError> {
        check_rows("weight", self.num_edges(), weights.len())?;
        self.weights = Some(weights);
        Ok(())
    }

    /// Returns the attached node features.
    #[must_use]
    pub fn node_features(&self) -> Option<&FeatureMatrix> {
        self.features.as_ref().map(|(_, features)| features)
    }

    /// Returns the key the node features are stored under.
    #[must_use]
    pub fn node_feature_key(&self) -> Option<&'static str> {
        self.features.as_ref().map(|&(key, _)| key)
    }

    /// Returns the attached node labels.
    #[must_use]
    pub fn node_labels(&self) -> Option<&[i64]> {
        self.labels.as_deref()
    }

    /// Returns the attached split masks.
    #[must_use]
    pub fn split_masks(&self) -> Option<&SplitMasks> {
        self.masks.as_ref()
    }

    /// Returns the attached edge weights.
    #[must_use]
    pub fn edge_weights(&self) -> Option<&EdgeWeights> {
        self.weights.as_ref()
    }

    fn node_schemes(&self) -> Vec<String> {
        let mut schemes = Vec::new();
        if let Some((key, features)) = &self.features {
            schemes.push(format!("{key}: f32[{}]", features.width()));
        }
        if self.labels.is_some() {
            schemes.push("label: i64".to_owned());
        }
        if self.masks.is_some() {
            schemes.extend(
                ["train_mask", "val_mask", "test_mask"]
                    .into_iter()
                    .map(|name| format!("{name}: bool")),
            );
        }
        schemes
    }

    fn edge_schemes(&self) -> Vec<String> {
        self.weights
            .iter()
            .map(|_| "weight: i64[1]".to_owned())
            .collect()
    }
}

fn check_rows(field: &'static str, expected: usize, actual: usize) -> Result<(), GraphError> {
    if expected == actual {
        Ok(())
    } else {
        Err(GraphError::ShapeMismatch {
            field,
            expected,
            actual,
        })
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Graph(num_nodes={}, num_edges={}, ndata_schemes={{{}}}, edata_schemes={{{}}})",
            self.num_nodes,
            self.num_edges(),
            self.node_schemes().join(", "),
            self.edge_schemes().join(", "),
        )
    }
}
