//! # Ingredient Normalizer Module
//!
//! This module provides the lexical normalization applied to every raw
//! ingredient string before it can become a graph node.
//!
//! ## Features
//!
//! - Lowercasing and whitespace collapsing
//! - Strips the leading "most highly recommended" asterisk marker
//! - Removes "— in general"-style dash suffixes
//! - Removes parenthetical annotations, including orphaned parentheses
//! - Removes "esp." / "e.g." abbreviation markers

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// "— in general", "— see also X" and similar dash suffixes
    static ref DASH_SUFFIX: Regex = Regex::new(r"\s*—\s+.*$").expect("dash suffix pattern should be valid");
    /// Balanced parenthetical notes like "(e.g., Thai)" or "(esp. ripe)"
    static ref PARENTHETICAL: Regex = Regex::new(r"\s*\([^)]*\)\s*").expect("parenthetical pattern should be valid");
    /// Orphaned opening parens/brackets left over after line wrapping
    static ref ORPHAN_OPEN: Regex = Regex::new(r"[(\[]\s*").expect("orphan open pattern should be valid");
    /// Orphaned closing parens/brackets
    static ref ORPHAN_CLOSE: Regex = Regex::new(r"\s*[)\]]").expect("orphan close pattern should be valid");
    /// "esp." / "e.g." abbreviation markers
    static ref ABBREVIATION: Regex = Regex::new(r"\b(esp\.|e\.g\.)\s*").expect("abbreviation pattern should be valid");
}

/// Normalize a raw ingredient string to its canonical lexical surface form.
///
/// Returns an empty string for input that normalizes to nothing. The
/// function is idempotent: `normalize(normalize(x)) == normalize(x)`.
///
/// # Examples
///
/// ```rust
/// use flavorgraph::normalize::normalize;
///
/// assert_eq!(normalize("*BASIL"), "basil");
/// assert_eq!(normalize("anchovies — in general"), "anchovies");
/// assert_eq!(normalize("cheese (esp. goat)"), "cheese");
/// assert_eq!(normalize("  Olive   Oil "), "olive oil");
/// ```
pub fn normalize(raw: &str) -> String {
    let mut name = raw.trim().to_lowercase();
    name = name.trim_start_matches('*').to_string();
    name = DASH_SUFFIX.replace(&name, "").into_owned();
    name = PARENTHETICAL.replace_all(&name, " ").into_owned();
    name = ORPHAN_OPEN.replace_all(&name, " ").into_owned();
    name = ORPHAN_CLOSE.replace_all(&name, " ").into_owned();
    name = ABBREVIATION.replace_all(&name, "").into_owned();
    name.split_whitespace().collect::<Vec<&str>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_trims() {
        assert_eq!(normalize("  GARLIC  "), "garlic");
    }

    #[test]
    fn test_strips_asterisk_marker() {
        assert_eq!(normalize("*saffron"), "saffron");
        assert_eq!(normalize("**saffron"), "saffron");
    }

    #[test]
    fn test_strips_dash_suffix() {
        assert_eq!(normalize("beef — in general"), "beef");
        assert_eq!(normalize("calf's liver — see liver"), "calf's liver");
    }

    #[test]
    fn test_strips_parentheticals() {
        assert_eq!(normalize("chiles (e.g., ancho, chipotle)"), "chiles");
        assert_eq!(normalize("mushrooms (esp. wild)"), "mushrooms");
    }

    #[test]
    fn test_strips_orphan_parens() {
        assert_eq!(normalize("walnuts (toasted"), "walnuts toasted");
        assert_eq!(normalize("toasted) walnuts"), "toasted walnuts");
    }

    #[test]
    fn test_strips_abbreviation_markers() {
        assert_eq!(normalize("vinegar, esp. sherry"), "vinegar, sherry");
        assert_eq!(normalize("e.g. cumin"), "cumin");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("red   wine    vinegar"), "red wine vinegar");
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("(ripe)"), "");
    }

    #[test]
    fn test_idempotent() {
        let raws = [
            "*BASIL — in general",
            "cheese (esp. goat)",
            "  Olive   Oil ",
            "chiles (e.g., ancho",
            "tomatoes, canned)",
            "",
        ];
        for raw in raws {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }
}
