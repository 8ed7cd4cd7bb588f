//! # Graph Builder Module
//!
//! Folds the stream of pairing observations into the first-stage graph. The
//! fold keeps, per unordered pair, the maximum recommendation level seen,
//! which makes it commutative and associative: feeding the same multiset of
//! observations in any order produces an identical graph.

use std::collections::BTreeMap;

use log::{debug, info};

use crate::classifier::PairingObservation;
use crate::graph::{Edge, Graph, Metadata, Node, PairKey};

/// Accumulated state for one unordered pair
#[derive(Debug, Clone, Copy, Default)]
struct PairAccum {
    level: u8,
    from_affinity: bool,
}

/// Accumulator for building the graph from observations.
///
/// The accumulator is owned by the caller and never shared across
/// invocations, so independent builders over partitioned input could later
/// be merged with a max-reconciling union without changing results.
///
/// # Examples
///
/// ```rust
/// use flavorgraph::builder::GraphBuilder;
/// use flavorgraph::classifier::PairingObservation;
///
/// let mut builder = GraphBuilder::new();
/// builder.observe(PairingObservation {
///     a: "garlic".into(), b: "onion".into(), level: 1, from_affinity: false,
/// });
/// builder.observe(PairingObservation {
///     a: "onion".into(), b: "garlic".into(), level: 3, from_affinity: false,
/// });
///
/// let graph = builder.finish();
/// assert_eq!(graph.nodes.len(), 2);
/// assert_eq!(graph.edges.len(), 1);
/// assert_eq!(graph.edges[0].weight, 3);
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder {
    pairs: BTreeMap<PairKey, PairAccum>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one observation into the accumulator.
    ///
    /// Reflexive observations are discarded; repeated observations of the
    /// same unordered pair reconcile to the maximum level.
    pub fn observe(&mut self, obs: PairingObservation) {
        if obs.a == obs.b {
            debug!("Discarding reflexive observation on '{}'", obs.a);
            return;
        }
        let accum = self.pairs.entry(PairKey::new(&obs.a, &obs.b)).or_default();
        accum.level = accum.level.max(obs.level);
        accum.from_affinity |= obs.from_affinity;
    }

    /// Fold a batch of observations
    pub fn observe_all(&mut self, observations: impl IntoIterator<Item = PairingObservation>) {
        for obs in observations {
            self.observe(obs);
        }
    }

    /// Produce the graph: one node per distinct ingredient, one edge per
    /// observed pair at its maximum level, in deterministic order.
    pub fn finish(self) -> Graph {
        let mut nodes: BTreeMap<String, Node> = BTreeMap::new();
        let mut edges = Vec::with_capacity(self.pairs.len());

        for (PairKey(a, b), accum) in self.pairs {
            for id in [&a, &b] {
                nodes.entry(id.clone()).or_insert_with(|| Node {
                    id: id.clone(),
                    label: id.clone(),
                    category: None,
                });
            }
            edges.push(Edge {
                source: a,
                target: b,
                weight: accum.level,
                recommendation_level: accum.level,
                from_affinity: accum.from_affinity.then_some(true),
            });
        }

        let mut graph = Graph {
            nodes: nodes.into_values().collect(),
            edges,
            metadata: Metadata::default(),
        };
        graph.refresh_metadata();
        info!(
            "Built graph with {} nodes and {} edges",
            graph.nodes.len(),
            graph.edges.len()
        );
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(a: &str, b: &str, level: u8) -> PairingObservation {
        PairingObservation {
            a: a.to_string(),
            b: b.to_string(),
            level,
            from_affinity: false,
        }
    }

    #[test]
    fn test_fold_is_order_independent() {
        let observations = vec![
            obs("garlic", "onion", 1),
            obs("onion", "garlic", 3),
            obs("garlic", "basil", 4),
            obs("basil", "onion", 2),
        ];

        let mut forward = GraphBuilder::new();
        forward.observe_all(observations.clone());

        let mut reverse = GraphBuilder::new();
        reverse.observe_all(observations.into_iter().rev());

        assert_eq!(forward.finish(), reverse.finish());
    }

    #[test]
    fn test_max_level_reconciliation() {
        let mut builder = GraphBuilder::new();
        builder.observe(obs("a", "b", 1));
        builder.observe(obs("a", "b", 3));
        builder.observe(obs("b", "a", 2));

        let graph = builder.finish();
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].weight, 3);
        assert_eq!(graph.edges[0].recommendation_level, 3);
    }

    #[test]
    fn test_reflexive_observation_discarded() {
        let mut builder = GraphBuilder::new();
        builder.observe(obs("garlic", "garlic", 4));

        let graph = builder.finish();
        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_affinity_flag_sticks() {
        let mut builder = GraphBuilder::new();
        builder.observe(obs("pork", "achiote", 1));
        builder.observe(PairingObservation {
            from_affinity: true,
            ..obs("achiote", "pork", 2)
        });

        let graph = builder.finish();
        assert_eq!(graph.edges[0].from_affinity, Some(true));
    }

    #[test]
    fn test_invariants_hold_after_build() {
        let mut builder = GraphBuilder::new();
        builder.observe_all(vec![
            obs("a", "b", 1),
            obs("b", "c", 2),
            obs("c", "a", 3),
        ]);
        let graph = builder.finish();
        assert!(graph.check_invariants().is_ok());
        assert_eq!(graph.metadata.total_edges, 3);
    }
}
