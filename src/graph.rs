//! # Flavor Graph Data Model
//!
//! This module defines the undirected, weighted ingredient graph that the
//! pipeline threads from stage to stage, together with its serialized form.
//!
//! ## Core Concepts
//!
//! - **Node**: one ingredient, keyed by its normalized (later canonical) id
//! - **Edge**: one unordered ingredient pair with a recommendation level 1-4
//! - **Metadata**: counts, the level legend, and category information
//!
//! The serialized artifact is consumed downstream by the image-fetch and
//! category collaborators, which never touch node or edge identity.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::errors::PipelineError;

/// Where the pairing data comes from, recorded in metadata
pub const SOURCE_NAME: &str = "The Flavor Bible (Dornenburg & Page, 2008)";

/// One ingredient node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Normalized ingredient string; unique key within the graph
    pub id: String,
    /// Display string
    pub label: String,
    /// Optional classification tag, added after enforcement
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub category: Option<String>,
}

/// One undirected weighted edge between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    /// Maximum recommendation level observed for the pair (1-4)
    pub weight: u8,
    /// Same value as `weight`, kept under the name downstream consumers use
    pub recommendation_level: u8,
    /// Present and true when the pair appeared in an affinity group
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub from_affinity: Option<bool>,
}

/// An unordered node-id pair usable as a map key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairKey(pub String, pub String);

impl PairKey {
    /// Build a key from two ids in either order
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self(a.to_string(), b.to_string())
        } else {
            Self(b.to_string(), a.to_string())
        }
    }
}

/// Category entry for the UI filter dropdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub id: String,
    pub label: String,
}

/// Graph-level metadata carried in the serialized artifact
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub source: String,
    pub total_nodes: usize,
    pub total_edges: usize,
    pub affinity_edges: usize,
    pub recommendation_levels: BTreeMap<String, String>,
    pub level_counts: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<CategoryInfo>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub category_counts: BTreeMap<String, usize>,
}

/// The weighted undirected co-occurrence graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Degree of every node, computed from the current edge set
    pub fn degrees(&self) -> HashMap<&str, usize> {
        let mut degrees: HashMap<&str, usize> = HashMap::new();
        for edge in &self.edges {
            *degrees.entry(edge.source.as_str()).or_default() += 1;
            *degrees.entry(edge.target.as_str()).or_default() += 1;
        }
        degrees
    }

    /// Verify the stage-boundary invariants: every edge references existing
    /// nodes, no edge is reflexive, and no unordered pair appears twice.
    pub fn check_invariants(&self) -> Result<(), PipelineError> {
        let ids: std::collections::HashSet<&str> =
            self.nodes.iter().map(|n| n.id.as_str()).collect();
        if ids.len() != self.nodes.len() {
            return Err(PipelineError::InvariantViolation(
                "duplicate node id".to_string(),
            ));
        }

        let mut seen: std::collections::HashSet<PairKey> = std::collections::HashSet::new();
        for edge in &self.edges {
            if edge.source == edge.target {
                return Err(PipelineError::InvariantViolation(format!(
                    "reflexive edge on '{}'",
                    edge.source
                )));
            }
            if !ids.contains(edge.source.as_str()) || !ids.contains(edge.target.as_str()) {
                return Err(PipelineError::InvariantViolation(format!(
                    "edge ({}, {}) references an absent node",
                    edge.source, edge.target
                )));
            }
            if !seen.insert(PairKey::new(&edge.source, &edge.target)) {
                return Err(PipelineError::InvariantViolation(format!(
                    "duplicate unordered pair ({}, {})",
                    edge.source, edge.target
                )));
            }
        }
        Ok(())
    }

    /// Sort nodes and edges into deterministic order
    pub fn sort(&mut self) {
        self.nodes.sort_by(|a, b| a.id.cmp(&b.id));
        self.edges
            .sort_by(|a, b| (&a.source, &a.target).cmp(&(&b.source, &b.target)));
    }

    /// Recompute the counting metadata from the current nodes and edges
    pub fn refresh_metadata(&mut self) {
        self.metadata.source = SOURCE_NAME.to_string();
        self.metadata.total_nodes = self.nodes.len();
        self.metadata.total_edges = self.edges.len();
        self.metadata.affinity_edges = self
            .edges
            .iter()
            .filter(|e| e.from_affinity == Some(true))
            .count();

        let mut level_counts: BTreeMap<String, usize> = BTreeMap::new();
        for level in 1..=4u8 {
            level_counts.insert(
                level.to_string(),
                self.edges.iter().filter(|e| e.weight == level).count(),
            );
        }
        self.metadata.level_counts = level_counts;
        self.metadata.recommendation_levels = recommendation_level_legend();
    }
}

/// The four-level legend downstream consumers display
fn recommendation_level_legend() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "1".to_string(),
            "regular (suggested by one or more experts)".to_string(),
        ),
        (
            "2".to_string(),
            "bold (recommended by a number of experts)".to_string(),
        ),
        (
            "3".to_string(),
            "bold caps (very highly recommended)".to_string(),
        ),
        (
            "4".to_string(),
            "holy grail (*bold caps, most highly recommended)".to_string(),
        ),
    ])
}
