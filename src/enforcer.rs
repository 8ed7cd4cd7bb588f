//! # Invariant Enforcer Module
//!
//! Iterative pruning pass over the merged graph: isolated nodes, edges
//! referencing removed nodes, and nodes failing the food-relevance
//! predicate are dropped until a fixed point is reached. Removing a
//! non-food node can newly isolate its neighbors, so a single sweep is not
//! enough; two iterations usually suffice.

use std::collections::HashSet;

use log::{debug, info};

use crate::graph::Graph;
use crate::validity::is_food_item;

/// Prune the graph to its terminal state: every node has degree >= 1,
/// every edge references existing nodes, and every node names a food.
pub fn enforce(mut graph: Graph) -> Graph {
    let mut iterations = 0;
    loop {
        iterations += 1;
        let nodes_before = graph.nodes.len();
        let edges_before = graph.edges.len();

        drop_isolated(&mut graph);

        let non_food: HashSet<String> = graph
            .nodes
            .iter()
            .filter(|n| !is_food_item(&n.id))
            .map(|n| n.id.clone())
            .collect();
        if !non_food.is_empty() {
            debug!("Dropping {} non-food nodes", non_food.len());
            graph.nodes.retain(|n| !non_food.contains(&n.id));
            graph
                .edges
                .retain(|e| !non_food.contains(&e.source) && !non_food.contains(&e.target));
        }

        if graph.nodes.len() == nodes_before && graph.edges.len() == edges_before {
            break;
        }
    }

    graph.sort();
    graph.refresh_metadata();
    info!(
        "Enforcement reached fixed point after {iterations} iteration(s): {} nodes, {} edges",
        graph.nodes.len(),
        graph.edges.len()
    );
    graph
}

/// Drop degree-0 nodes, then any edge referencing a dropped node
fn drop_isolated(graph: &mut Graph) {
    let connected: HashSet<String> = graph
        .edges
        .iter()
        .flat_map(|e| [e.source.clone(), e.target.clone()])
        .collect();

    let isolated = graph.nodes.len()
        - graph
            .nodes
            .iter()
            .filter(|n| connected.contains(&n.id))
            .count();
    if isolated > 0 {
        debug!("Dropping {isolated} isolated nodes");
    }
    graph.nodes.retain(|n| connected.contains(&n.id));

    let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    graph
        .edges
        .retain(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()));
}
