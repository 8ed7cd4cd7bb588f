//! # Extraction Pipeline Module
//!
//! Wires the stages together: token document -> segmenter -> classifier ->
//! graph builder -> canonicalization merge -> invariant enforcement ->
//! category tagging. The graph is moved from stage to stage and its
//! invariants are checked at every boundary.

use log::{debug, info};

use crate::builder::GraphBuilder;
use crate::canonical;
use crate::category;
use crate::classifier::{classify_line, SectionState};
use crate::config::ExtractConfig;
use crate::document::TokenDocument;
use crate::enforcer;
use crate::errors::PipelineError;
use crate::graph::Graph;
use crate::segmenter::segment_lines;

/// Extract the raw (pre-merge) graph from a token document.
///
/// Classifier state is threaded across page boundaries: a section that
/// starts at the bottom of one page continues on the next.
pub fn extract_graph(doc: &TokenDocument, config: &ExtractConfig) -> Result<Graph, PipelineError> {
    let mut builder = GraphBuilder::new();
    let mut state = SectionState::Outside;

    for (page_num, page) in doc.pages.iter().enumerate() {
        if page_num < config.charts_start_page || page_num >= config.charts_end_page {
            continue;
        }
        debug!("Scanning page {page_num}");
        for line in segment_lines(&page.tokens, config.line_band_height) {
            let (next_state, classified) = classify_line(state, &line);
            state = next_state;
            builder.observe_all(classified.observations);
        }
    }

    let graph = builder.finish();
    graph.check_invariants()?;
    Ok(graph)
}

/// Run the whole pipeline, producing the final categorized graph.
pub fn run(doc: &TokenDocument, config: &ExtractConfig) -> Result<Graph, PipelineError> {
    let raw = extract_graph(doc, config)?;
    info!(
        "Raw graph: {} nodes, {} edges",
        raw.nodes.len(),
        raw.edges.len()
    );

    let merged = canonical::merge(raw);
    merged.check_invariants()?;

    let mut graph = enforcer::enforce(merged);
    graph.check_invariants()?;

    category::apply_categories(&mut graph);
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Page, Token};

    fn page(lines: &[&str]) -> Page {
        let tokens = lines
            .iter()
            .enumerate()
            .map(|(i, text)| Token {
                text: text.to_string(),
                top: i as f64 * 12.0,
                emphasized: false,
            })
            .collect();
        Page { tokens }
    }

    fn config() -> ExtractConfig {
        ExtractConfig {
            charts_start_page: 0,
            ..ExtractConfig::default()
        }
    }

    #[test]
    fn test_section_state_crosses_pages() {
        let doc = TokenDocument {
            pages: vec![page(&["GARLIC"]), page(&["onion, thyme"])],
        };
        let graph = extract_graph(&doc, &config()).unwrap();

        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["garlic", "onion", "thyme"]);
        assert_eq!(graph.edges.len(), 2);
    }

    #[test]
    fn test_pages_before_chart_window_skipped() {
        let doc = TokenDocument {
            pages: vec![page(&["GARLIC", "onion"]), page(&["BASIL", "tomato"])],
        };
        let cfg = ExtractConfig {
            charts_start_page: 1,
            ..ExtractConfig::default()
        };
        let graph = extract_graph(&doc, &cfg).unwrap();

        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["basil", "tomato"]);
    }

    #[test]
    fn test_full_run_produces_categorized_graph() {
        let doc = TokenDocument {
            pages: vec![page(&[
                "GARLIC",
                "onion, olive oil",
                "apricots, dried",
                "APRICOTS",
                "pork, garlic",
            ])],
        };
        let graph = run(&doc, &config()).unwrap();

        assert!(graph.check_invariants().is_ok());
        assert!(graph.nodes.iter().all(|n| n.category.is_some()));
        // both apricot spellings collapse to one canonical node
        assert_eq!(graph.nodes.iter().filter(|n| n.id.contains("apricot")).count(), 1);
        let degrees = graph.degrees();
        assert!(graph
            .nodes
            .iter()
            .all(|n| degrees.get(n.id.as_str()).copied().unwrap_or(0) >= 1));
    }
}
