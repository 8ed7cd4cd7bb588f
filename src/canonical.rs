//! # Canonicalization Merger Module
//!
//! This module collapses lexical variants of the same ingredient into single
//! canonical graph nodes. The compendium writes the same food many ways:
//! "apricots", "apricots, dried" and "dried apricots" are one ingredient;
//! "oil, olive" is "olive oil"; "chocolate, dark, milk" names two.
//!
//! ## Features
//!
//! - Ordered rewrite-rule table, first match wins, pass-through default
//! - Comma-structured compound labels may expand to several canonical ids
//! - Many-to-one node merge with max-weight edge reconciliation
//! - Idempotent: merging an already-canonical graph is a no-op
//!
//! The rewrite table is evaluated strictly top to bottom; see each rule's
//! name for the precedence actually in force.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use log::{debug, info};

use crate::graph::{Edge, Graph, Node, PairKey};
use crate::validity::is_single_ingredient;

/// Compound-product suffixes that stay distinct from their base fruit
const COMPOUND_PRODUCTS: &[&str] = &[" brandy", " liqueur", " wine", " vinegar"];

/// Bare fruits a compound product must never collapse into
const BARE_FRUIT_CANONICALS: &[&str] = &["apricot", "cherry", "orange", "peach"];

/// Storage qualifiers stripped wherever they appear
const STORAGE_QUALIFIERS: &[&str] = &[", dried", ", fresh", ", canned"];

/// Preparation qualifiers dropped from "noun, qualifier" forms
const PREP_QUALIFIERS: &[&str] = &["ground", "whole", "minced", "chopped", "sliced"];

/// Head nouns whose "noun, qualifier" form inverts to "qualifier noun"
const INVERTING_HEADS: &[&str] = &[
    "oil", "vinegar", "pepper", "cream", "chicken", "crab", "chocolate", "ham", "honey",
    "lettuce", "liver", "mustard", "paprika", "parsley", "rice", "savory", "stock", "sugar",
    "wine", "cabbage", "mint", "salmon", "trout", "bass", "cod", "fish",
];

/// Qualifiers that always lead regardless of the head noun ("basil, thai")
const LEADING_QUALIFIERS: &[&str] = &["thai", "lemon", "sweet", "holy"];

/// Fixed plural-to-singular mapping for common ingredients
static SINGULAR_MAP: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("apricots", "apricot"),
        ("apples", "apple"),
        ("bananas", "banana"),
        ("beans", "beans"),
        ("berries", "berry"),
        ("carrots", "carrot"),
        ("cherries", "cherry"),
        ("dates", "date"),
        ("figs", "fig"),
        ("grapes", "grape"),
        ("lemons", "lemon"),
        ("limes", "lime"),
        ("mangoes", "mango"),
        ("mangos", "mango"),
        ("melons", "melon"),
        ("olives", "olive"),
        ("onions", "onion"),
        ("oranges", "orange"),
        ("peaches", "peach"),
        ("pears", "pear"),
        ("peas", "pea"),
        ("peppers", "pepper"),
        ("plums", "plum"),
        ("potatoes", "potato"),
        ("tomatoes", "tomato"),
        ("walnuts", "walnut"),
        ("almonds", "almond"),
        ("anchovies", "anchovy"),
        ("clams", "clam"),
        ("mussels", "mussel"),
        ("oysters", "oyster"),
        ("scallops", "scallop"),
        ("shrimps", "shrimp"),
        ("shrimp", "shrimp"),
        ("herbs", "herbs"),
        ("spices", "spices"),
    ])
});

/// One entry of the ordered rewrite table.
///
/// A rule either declines (`None`) or rewrites its input to one or more
/// canonical ids; the first rule that matches wins.
pub struct RewriteRule {
    pub name: &'static str,
    apply: fn(&str) -> Option<Vec<String>>,
}

/// The canonicalization table, evaluated top to bottom
pub static REWRITE_RULES: &[RewriteRule] = &[
    RewriteRule {
        name: "compound-product-guard",
        apply: compound_product_guard,
    },
    RewriteRule {
        name: "variant-list-expansion",
        apply: variant_list_expansion,
    },
    RewriteRule {
        name: "category-colon",
        apply: category_colon,
    },
    RewriteRule {
        name: "storage-qualifier",
        apply: storage_qualifier,
    },
    RewriteRule {
        name: "cheese-head",
        apply: cheese_head,
    },
    RewriteRule {
        name: "beans-head",
        apply: beans_head,
    },
    RewriteRule {
        name: "noun-inversion",
        apply: noun_inversion,
    },
    RewriteRule {
        name: "prep-qualifier",
        apply: prep_qualifier,
    },
    RewriteRule {
        name: "plural-head-inversion",
        apply: plural_head_inversion,
    },
    RewriteRule {
        name: "generic-inversion",
        apply: generic_inversion,
    },
    RewriteRule {
        name: "plural-singular",
        apply: plural_singular,
    },
];

/// Map a node id to its canonical id set (normally one id).
///
/// # Examples
///
/// ```rust
/// use flavorgraph::canonical::canonical_ids;
///
/// assert_eq!(canonical_ids("oil, olive"), vec!["olive oil"]);
/// assert_eq!(canonical_ids("apricots, dried"), vec!["apricot"]);
/// assert_eq!(
///     canonical_ids("chocolate, dark, milk"),
///     vec!["dark chocolate", "milk chocolate"]
/// );
/// assert_eq!(canonical_ids("garlic"), vec!["garlic"]);
/// ```
pub fn canonical_ids(id: &str) -> Vec<String> {
    apply_rules(id, REWRITE_RULES)
}

fn apply_rules(id: &str, rules: &[RewriteRule]) -> Vec<String> {
    for rule in rules {
        if let Some(out) = (rule.apply)(id) {
            debug!("Rule '{}' rewrote '{id}' -> {out:?}", rule.name);
            return out;
        }
    }
    vec![id.to_string()]
}

/// Single-output canonicalization, used when a rule recurses
fn canonical_one(id: &str) -> String {
    canonical_ids(id)
        .into_iter()
        .next()
        .unwrap_or_else(|| id.to_string())
}

fn split_head(id: &str) -> Option<(&str, &str)> {
    id.split_once(", ")
}

/// "apricot brandy" and friends stay distinct products whenever the
/// remaining rules would reduce them to the bare fruit
fn compound_product_guard(id: &str) -> Option<Vec<String>> {
    if !COMPOUND_PRODUCTS.iter().any(|p| id.contains(p)) {
        return None;
    }
    let rewritten = apply_rules(id, &REWRITE_RULES[1..]);
    let collapses = rewritten
        .iter()
        .any(|c| c != id && BARE_FRUIT_CANONICALS.contains(&c.as_str()));
    collapses.then(|| vec![id.to_string()])
}

/// "chocolate, dark, milk" → "dark chocolate" + "milk chocolate"
fn variant_list_expansion(id: &str) -> Option<Vec<String>> {
    let (base, rest) = split_head(id)?;
    if base != "chocolate" {
        return None;
    }
    let variants: Vec<&str> = rest.split(", ").collect();
    if variants.len() < 2 {
        return None;
    }
    Some(variants.iter().map(|v| format!("{v} {base}")).collect())
}

/// "liqueurs: apricot" → "apricot liqueur"; other "cat: x" → "x"
fn category_colon(id: &str) -> Option<Vec<String>> {
    let (cat, ing) = id.split_once(": ")?;
    let canon = match cat {
        "liqueurs" | "vinegars" | "oils" | "wines" => {
            format!("{} {}", ing.trim(), cat.trim_end_matches('s'))
        }
        "vinegar" | "oil" | "wine" => format!("{} {cat}", ing.trim()),
        _ => ing.trim().to_string(),
    };
    Some(vec![canon])
}

/// "X, dried" / "dried X" and friends reduce to X
fn storage_qualifier(id: &str) -> Option<Vec<String>> {
    for qualifier in STORAGE_QUALIFIERS {
        if id.contains(qualifier) {
            let stripped = id.replace(qualifier, "");
            return Some(vec![canonical_one(stripped.trim())]);
        }
    }
    if let Some(rest) = id.strip_prefix("dried ") {
        return Some(vec![canonical_one(rest.trim())]);
    }
    None
}

/// "cheese, stilton" → "stilton" (specific cheeses stand on their own name)
fn cheese_head(id: &str) -> Option<Vec<String>> {
    let rest = id.strip_prefix("cheese, ")?;
    Some(vec![rest.trim().to_string()])
}

/// "beans, black" / "beans, black, pinto" → "black beans"
fn beans_head(id: &str) -> Option<Vec<String>> {
    let rest = id.strip_prefix("beans, ")?;
    let first = rest.split(", ").next().unwrap_or(rest);
    Some(vec![format!("{first} beans")])
}

/// Noun-specific "noun, qualifier" → "qualifier noun" table
fn noun_inversion(id: &str) -> Option<Vec<String>> {
    let (a, b) = split_head(id)?;
    if b.is_empty() {
        return None;
    }

    // qualifiers that lead regardless of the head: "basil, thai" → "thai basil"
    if LEADING_QUALIFIERS.contains(&b) {
        return Some(vec![format!("{b} {a}")]);
    }
    if b == "star" {
        return Some(vec!["star anise".to_string()]);
    }
    if a == "balsamic" && b.contains("vinegar") {
        return Some(vec![format!("{b} {a}")]);
    }
    if a == "butter" && (b == "unsalted" || b == "salted") {
        return Some(vec!["butter".to_string()]);
    }
    if a == "lamb" {
        return if b == "chops" || b == "shank" {
            Some(vec![format!("{a} {b}")])
        } else {
            Some(vec![format!("{b} {a}")])
        };
    }
    if (a == "lemon" || a == "lime" || a == "orange") && b == "juice" {
        return Some(vec![format!("{a} juice")]);
    }
    if a == "mint" && b == "peppermint" {
        return Some(vec!["peppermint".to_string()]);
    }
    if a == "salt" && b.contains(' ') {
        return Some(vec![b.to_string()]);
    }
    if a == "salt" {
        return Some(vec![format!("{b} salt")]);
    }
    if INVERTING_HEADS.contains(&a) {
        return Some(vec![format!("{b} {a}")]);
    }
    None
}

/// "pepper, ground" handled above; here "carrots, chopped" → "carrot"
fn prep_qualifier(id: &str) -> Option<Vec<String>> {
    let (a, b) = split_head(id)?;
    if PREP_QUALIFIERS.contains(&b) {
        return Some(vec![canonical_one(a)]);
    }
    None
}

/// "artichokes, jerusalem" → "jerusalem artichoke"
fn plural_head_inversion(id: &str) -> Option<Vec<String>> {
    let (a, b) = split_head(id)?;
    if b.is_empty() || !a.ends_with('s') {
        return None;
    }
    let base = &a[..a.len() - 1];
    Some(vec![format!("{b} {base}")])
}

/// Fallback "a, b" → "b a"
fn generic_inversion(id: &str) -> Option<Vec<String>> {
    let (a, b) = split_head(id)?;
    if b.is_empty() {
        return None;
    }
    Some(vec![format!("{b} {a}")])
}

/// Whole-string plural lookup, applied only to comma-free forms
fn plural_singular(id: &str) -> Option<Vec<String>> {
    SINGULAR_MAP.get(id).map(|s| vec![s.to_string()])
}

/// Merge the graph under the canonical identity mapping.
///
/// A pre-pass drops multi-word phrase nodes that survived extraction; every
/// remaining node is rewritten to its canonical id set; nodes sharing a
/// canonical id collapse into one (shortest candidate label wins); edges
/// rewrite to the Cartesian product of their endpoints' canonical sets,
/// excluding self-pairs and absent endpoints, reconciling duplicates to the
/// maximum weight.
pub fn merge(graph: Graph) -> Graph {
    let kept: Vec<&Node> = graph
        .nodes
        .iter()
        .filter(|n| is_single_ingredient(&n.id))
        .collect();
    let dropped_phrases = graph.nodes.len() - kept.len();
    if dropped_phrases > 0 {
        info!("Dropped {dropped_phrases} phrase nodes before merging");
    }

    // original id → canonical id set
    let mapping: BTreeMap<&str, Vec<String>> = kept
        .iter()
        .map(|n| (n.id.as_str(), canonical_ids(&n.id)))
        .collect();

    // canonical id → contributing original nodes
    let mut contributors: BTreeMap<&str, Vec<&Node>> = BTreeMap::new();
    for node in &kept {
        for canon in &mapping[node.id.as_str()] {
            contributors.entry(canon).or_default().push(node);
        }
    }

    let nodes: Vec<Node> = contributors
        .iter()
        .map(|(canon, originals)| {
            let mut candidates: Vec<&str> = originals.iter().map(|n| n.label.as_str()).collect();
            candidates.push(canon);
            candidates.sort_by(|x, y| x.len().cmp(&y.len()).then(x.cmp(y)));
            Node {
                id: canon.to_string(),
                label: candidates[0].to_string(),
                category: originals.iter().find_map(|n| n.category.clone()),
            }
        })
        .collect();

    let mut pairs: BTreeMap<PairKey, (u8, bool)> = BTreeMap::new();
    for edge in &graph.edges {
        let (Some(sources), Some(targets)) = (
            mapping.get(edge.source.as_str()),
            mapping.get(edge.target.as_str()),
        ) else {
            continue;
        };
        for src in sources {
            for tgt in targets {
                if src == tgt {
                    continue;
                }
                let entry = pairs.entry(PairKey::new(src, tgt)).or_default();
                entry.0 = entry.0.max(edge.weight);
                entry.1 |= edge.from_affinity == Some(true);
            }
        }
    }

    let edges: Vec<Edge> = pairs
        .into_iter()
        .map(|(PairKey(source, target), (weight, affinity))| Edge {
            source,
            target,
            weight,
            recommendation_level: weight,
            from_affinity: affinity.then_some(true),
        })
        .collect();

    let mut merged = Graph {
        nodes,
        edges,
        metadata: graph.metadata,
    };
    merged.sort();
    merged.refresh_metadata();
    info!(
        "Canonicalization: {} -> {} nodes, {} edges",
        kept.len() + dropped_phrases,
        merged.nodes.len(),
        merged.edges.len()
    );
    merged
}
