//! Random regular graph generation by stub pairing.
//!
//! Every node receives `degree` stubs; shuffled stubs are paired into edges.
//! Pairs that would form a self-loop or repeat an existing edge go back into
//! a pending pool which is reshuffled and paired again, as long as the
//! pending nodes can still form at least one new edge. Otherwise the attempt
//! is abandoned and restarted from scratch.

use std::collections::{BTreeMap, BTreeSet};

use rand::{rngs::SmallRng, seq::SliceRandom};
use tracing::trace;

use crate::error::RegularGraphError;

/// Generates a uniformly shuffled `degree`-regular simple graph on `nodes`
/// nodes.
///
/// Edges are returned once each as `(u, v)` with `u < v`, sorted ascending.
///
/// # Errors
/// Returns [`RegularGraphError::OddDegreeSum`] when `degree * nodes` is odd
/// and [`RegularGraphError::DegreeTooLarge`] when `degree >= nodes`.
///
/// # Examples
/// ```
/// use graphset_core::random_regular_graph;
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let mut rng = SmallRng::seed_from_u64(3);
/// let edges = random_regular_graph(4, 5, &mut rng)?;
/// // A 4-regular graph on five nodes is the complete graph.
/// assert_eq!(edges.len(), 10);
/// # Ok::<(), graphset_core::RegularGraphError>(())
/// ```
pub fn random_regular_graph(
    degree: usize,
    nodes: usize,
    rng: &mut SmallRng,
) -> Result<Vec<(usize, usize)>, RegularGraphError> {
    if degree % 2 == 1 && nodes % 2 == 1 {
        return Err(RegularGraphError::OddDegreeSum { degree, nodes });
    }
    if degree >= nodes {
        return Err(RegularGraphError::DegreeTooLarge { degree, nodes });
    }
    if degree == 0 {
        return Ok(Vec::new());
    }

    let mut attempt = 1_u64;
    loop {
        if let Some(edges) = try_pairing(degree, nodes, rng) {
            trace!(degree, nodes, attempt, "regular graph generated");
            return Ok(edges.into_iter().collect());
        }
        attempt += 1;
    }
}

fn try_pairing(
    degree: usize,
    nodes: usize,
    rng: &mut SmallRng,
) -> Option<BTreeSet<(usize, usize)>> {
    let mut edges = BTreeSet::new();
    let mut stubs: Vec<usize> = (0..degree).flat_map(|_| 0..nodes).collect();

    while !stubs.is_empty() {
        stubs.shuffle(rng);
        let mut pending: BTreeMap<usize, usize> = BTreeMap::new();
        for pair in stubs.chunks_exact(2) {
            let &[a, b] = pair else { continue };
            let edge = (a.min(b), a.max(b));
            if a != b && edges.insert(edge) {
                continue;
            }
            *pending.entry(a).or_default() += 1;
            *pending.entry(b).or_default() += 1;
        }
        if !can_extend(&edges, &pending) {
            return None;
        }
        stubs = pending
            .into_iter()
            .flat_map(|(node, count)| std::iter::repeat_n(node, count))
            .collect();
    }
    Some(edges)
}

/// Whether some pair of distinct pending nodes is not yet connected.
fn can_extend(edges: &BTreeSet<(usize, usize)>, pending: &BTreeMap<usize, usize>) -> bool {
    if pending.is_empty() {
        return true;
    }
    let nodes: Vec<usize> = pending.keys().copied().collect();
    nodes.iter().enumerate().any(|(index, &high)| {
        nodes
            .iter()
            .take(index)
            .any(|&low| !edges.contains(&(low, high)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use rand::SeedableRng;
    use rstest::{fixture, rstest};

    use crate::test_utils::suite_proptest_config;

    #[fixture]
    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    fn degrees(nodes: usize, edges: &[(usize, usize)]) -> Vec<usize> {
        let mut degrees = vec![0; nodes];
        for &(u, v) in edges {
            degrees[u] += 1;
            degrees[v] += 1;
        }
        degrees
    }

    #[rstest]
    #[case::odd_sum(3, 9)]
    #[case::both_odd(5, 7)]
    #[case::nine_on_three(9, 3)]
    fn odd_stub_totals_are_rejected(
        mut rng: SmallRng,
        #[case] degree: usize,
        #[case] nodes: usize,
    ) {
        let err = random_regular_graph(degree, nodes, &mut rng).expect_err("odd stub total");
        assert_eq!(err, RegularGraphError::OddDegreeSum { degree, nodes });
    }

    #[rstest]
    #[case::equal(6, 6)]
    #[case::equal_even(4, 4)]
    #[case::larger(8, 5)]
    fn oversized_degrees_are_rejected(
        mut rng: SmallRng,
        #[case] degree: usize,
        #[case] nodes: usize,
    ) {
        let err = random_regular_graph(degree, nodes, &mut rng).expect_err("degree too large");
        assert_eq!(err, RegularGraphError::DegreeTooLarge { degree, nodes });
    }

    #[rstest]
    fn zero_degree_yields_no_edges(mut rng: SmallRng) {
        let edges = random_regular_graph(0, 7, &mut rng).expect("0-regular graphs exist");
        assert!(edges.is_empty());
    }

    #[rstest]
    fn smallest_sampler_pair_is_complete_graph(mut rng: SmallRng) {
        let edges = random_regular_graph(4, 5, &mut rng).expect("K5 is 4-regular");
        let expected: Vec<(usize, usize)> = (0..5)
            .flat_map(|u| (u + 1..5).map(move |v| (u, v)))
            .collect();
        assert_eq!(edges, expected);
    }

    #[test]
    fn same_seed_gives_same_graph() {
        let first = random_regular_graph(3, 8, &mut SmallRng::seed_from_u64(11))
            .expect("3-regular on 8 nodes exists");
        let second = random_regular_graph(3, 8, &mut SmallRng::seed_from_u64(11))
            .expect("3-regular on 8 nodes exists");
        assert_eq!(first, second);
    }

    #[test]
    fn can_extend_requires_an_unused_pair() {
        let edges: BTreeSet<_> = [(0, 1)].into_iter().collect();
        let only_connected: BTreeMap<_, _> = [(0, 1), (1, 1)].into_iter().collect();
        assert!(!can_extend(&edges, &only_connected));
        let single_node: BTreeMap<_, _> = [(2, 2)].into_iter().collect();
        assert!(!can_extend(&edges, &single_node));
        let open: BTreeMap<_, _> = [(0, 1), (2, 1)].into_iter().collect();
        assert!(can_extend(&edges, &open));
        assert!(can_extend(&edges, &BTreeMap::new()));
    }

    proptest! {
        #![proptest_config(suite_proptest_config(64))]

        #[test]
        fn feasible_parameters_yield_simple_regular_graphs(
            degree in 0_usize..8,
            nodes in 1_usize..16,
            seed in any::<u64>(),
        ) {
            prop_assume!(degree < nodes && (degree * nodes) % 2 == 0);
            let mut rng = SmallRng::seed_from_u64(seed);
            let edges = random_regular_graph(degree, nodes, &mut rng)
                .map_err(|err| TestCaseError::fail(err.to_string()))?;
            prop_assert_eq!(edges.len(), degree * nodes / 2);
            prop_assert!(edges.iter().all(|&(u, v)| u < v && v < nodes));
            prop_assert!(edges.windows(2).all(|pair| pair[0] < pair[1]));
            prop_assert!(degrees(nodes, &edges).iter().all(|&d| d == degree));
        }
    }
}
