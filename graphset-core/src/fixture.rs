//! Categorically attributed source graphs and category-to-label maps.
//!
//! [`AttributedGraph::karate_club`] reproduces Zachary's karate club network:
//! members of a university karate club, an edge for every pair that
//! interacted outside the club, and the faction (`"Mr. Hi"` or `"Officer"`)
//! each member joined after the club split.
//!
//! Zachary W. (1977). An information flow model for conflict and fission in
//! small groups. Journal of Anthropological Research, 33, 452-473.

use std::{collections::BTreeMap, sync::Arc};

use crate::error::{DatasetError, GraphError};

/// Category carried by members who followed the instructor.
pub const MR_HI: &str = "Mr. Hi";
/// Category carried by members who followed the club officer.
pub const OFFICER: &str = "Officer";

const KARATE_CLUB_NAME: &str = "karate_club";
const KARATE_CLUB_NODES: usize = 34;

const MR_HI_MEMBERS: [usize; 17] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 10, 11, 12, 13, 16, 17, 19, 21];

#[rustfmt::skip]
const KARATE_CLUB_EDGES: [(usize, usize); 78] = [
    (0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (0, 6), (0, 7), (0, 8),
    (0, 10), (0, 11), (0, 12), (0, 13), (0, 17), (0, 19), (0, 21), (0, 31),
    (1, 2), (1, 3), (1, 7), (1, 13), (1, 17), (1, 19), (1, 21), (1, 30),
    (2, 3), (2, 7), (2, 8), (2, 9), (2, 13), (2, 27), (2, 28), (2, 32),
    (3, 7), (3, 12), (3, 13),
    (4, 6), (4, 10),
    (5, 6), (5, 10), (5, 16),
    (6, 16),
    (8, 30), (8, 32), (8, 33),
    (9, 33),
    (13, 33),
    (14, 32), (14, 33),
    (15, 32), (15, 33),
    (18, 32), (18, 33),
    (19, 33),
    (20, 32), (20, 33),
    (22, 32), (22, 33),
    (23, 25), (23, 27), (23, 29), (23, 32), (23, 33),
    (24, 25), (24, 27), (24, 31),
    (25, 31),
    (26, 29), (26, 33),
    (27, 33),
    (28, 31), (28, 33),
    (29, 32), (29, 33),
    (30, 32), (30, 33),
    (31, 32), (31, 33),
    (32, 33),
];

/// Undirected graph whose nodes each carry one categorical attribute.
///
/// # Examples
/// ```
/// use graphset_core::{AttributedGraph, MR_HI};
///
/// let club = AttributedGraph::karate_club();
/// assert_eq!(club.num_nodes(), 34);
/// assert_eq!(club.num_edges(), 78);
/// assert_eq!(club.category(0), Some(MR_HI));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributedGraph {
    name: Arc<str>,
    num_nodes: usize,
    edges: Vec<(usize, usize)>,
    categories: Vec<Arc<str>>,
}

impl AttributedGraph {
    /// Builds a source graph from an edge list and one category per node.
    ///
    /// # Errors
    /// Returns [`GraphError::ShapeMismatch`] when `categories` does not have
    /// one entry per node and [`GraphError::NodeOutOfRange`] when an edge
    /// endpoint is not below `num_nodes`.
    pub fn new(
        name: impl Into<Arc<str>>,
        num_nodes: usize,
        edges: Vec<(usize, usize)>,
        categories: Vec<Arc<str>>,
    ) -> Result<Self, GraphError> {
        if categories.len() != num_nodes {
            return Err(GraphError::ShapeMismatch {
                field: "category",
                expected: num_nodes,
                actual: categories.len(),
            });
        }
        for (edge, &(u, v)) in edges.iter().enumerate() {
            let node = u.max(v);
            if node >= num_nodes {
                return Err(GraphError::NodeOutOfRange {
                    edge,
                    node,
                    num_nodes,
                });
            }
        }
        Ok(Self {
            name: name.into(),
            num_nodes,
            edges,
            categories,
        })
    }

    /// Returns Zachary's karate club with its `club` attribute.
    ///
    /// Edges are listed once each, lower endpoint first, in row-major order.
    #[must_use]
    pub fn karate_club() -> Self {
        let mr_hi: Arc<str> = Arc::from(MR_HI);
        let officer: Arc<str> = Arc::from(OFFICER);
        let categories = (0..KARATE_CLUB_NODES)
            .map(|node| {
                if MR_HI_MEMBERS.binary_search(&node).is_ok() {
                    Arc::clone(&mr_hi)
                } else {
                    Arc::clone(&officer)
                }
            })
            .collect();
        Self {
            name: Arc::from(KARATE_CLUB_NAME),
            num_nodes: KARATE_CLUB_NODES,
            edges: KARATE_CLUB_EDGES.to_vec(),
            categories,
        }
    }

    /// Returns the graph name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Returns the edges in their stable iteration order.
    #[must_use]
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Returns the category of `node`.
    #[must_use]
    pub fn category(&self, node: usize) -> Option<&str> {
        self.categories.get(node).map(AsRef::as_ref)
    }
}

/// Fixed dictionary from category strings to integer labels.
///
/// The map is not total: a category it does not list is an
/// error rather than a default label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelMap {
    entries: BTreeMap<Arc<str>, i64>,
}

impl LabelMap {
    /// Builds a map from `(category, label)` pairs.
    ///
    /// # Examples
    /// ```
    /// use graphset_core::LabelMap;
    ///
    /// let map = LabelMap::new([("red", 0), ("blue", 1)]);
    /// assert_eq!(map.get("blue"), Some(1));
    /// assert_eq!(map.get("green"), None);
    /// ```
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<Arc<str>>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(category, label)| (category.into(), label))
                .collect(),
        }
    }

    /// Returns the karate club faction map: `"Mr. Hi"` is 0, `"Officer"` is 1.
    #[must_use]
    pub fn club() -> Self {
        Self::new([(MR_HI, 0), (OFFICER, 1)])
    }

    /// Returns the label for `category`.
    #[must_use]
    pub fn get(&self, category: &str) -> Option<i64> {
        self.entries.get(category).copied()
    }

    /// Maps every node of `graph` to its label, in node order.
    ///
    /// # Errors
    /// Returns [`DatasetError::UnknownCategory`] for the first node whose
    /// category is not in the map.
    pub fn labels_for(&self, graph: &AttributedGraph) -> Result<Vec<i64>, DatasetError> {
        graph
            .categories
            .iter()
            .enumerate()
            .map(|(node, category)| {
                self.get(category)
                    .ok_or_else(|| DatasetError::UnknownCategory {
                        node,
                        category: Arc::clone(category),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeSet;

    #[test]
    fn karate_club_edges_are_unique_and_ordered() {
        let club = AttributedGraph::karate_club();
        assert!(club.edges().iter().all(|&(u, v)| u < v));
        assert!(club.edges().windows(2).all(|pair| pair[0] < pair[1]));
        let unique: BTreeSet<_> = club.edges().iter().collect();
        assert_eq!(unique.len(), 78);
    }

    #[test]
    fn karate_club_factions_have_expected_sizes() {
        let club = AttributedGraph::karate_club();
        let mr_hi = (0..club.num_nodes())
            .filter(|&node| club.category(node) == Some(MR_HI))
            .count();
        assert_eq!(mr_hi, 17);
        assert_eq!(club.category(33), Some(OFFICER));
        assert_eq!(club.category(34), None);
    }

    #[test]
    fn club_labels_follow_faction() {
        let club = AttributedGraph::karate_club();
        let labels = LabelMap::club()
            .labels_for(&club)
            .expect("every karate club category is mapped");
        assert_eq!(labels.len(), 34);
        assert_eq!(labels[0], 0);
        assert_eq!(labels[9], 1);
        assert_eq!(labels.iter().filter(|&&label| label == 1).count(), 17);
    }

    #[test]
    fn unknown_category_is_reported() {
        let graph = AttributedGraph::new(
            "tiny",
            2,
            vec![(0, 1)],
            vec![Arc::from(MR_HI), Arc::from("Referee")],
        )
        .expect("graph is well formed");
        let err = LabelMap::club()
            .labels_for(&graph)
            .expect_err("Referee is not a club faction");
        assert_eq!(
            err,
            DatasetError::UnknownCategory {
                node: 1,
                category: Arc::from("Referee"),
            }
        );
    }

    #[test]
    fn new_rejects_missing_categories() {
        let err = AttributedGraph::new("tiny", 3, vec![(0, 1)], vec![Arc::from(MR_HI)])
            .expect_err("three nodes need three categories");
        assert!(matches!(err, GraphError::ShapeMismatch { field: "category", .. }));
    }

    #[test]
    fn new_rejects_out_of_range_edges() {
        let categories = vec![Arc::from(MR_HI), Arc::from(OFFICER)];
        let err = AttributedGraph::new("tiny", 2, vec![(0, 2)], categories)
            .expect_err("node 2 does not exist");
        assert!(matches!(err, GraphError::NodeOutOfRange { node: 2, .. }));
    }
}
