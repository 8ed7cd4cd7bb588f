//! # Validity Filter Module
//!
//! Predicates deciding whether a normalized string denotes one genuine food
//! ingredient. The compendium interleaves its pairing lists with chef quotes,
//! venue names and serving advice, so everything that reaches the graph goes
//! through these filters first.
//!
//! All predicates are deliberately conservative: dropping a real ingredient
//! is preferred over keeping noise, since downstream consumers assume every
//! retained node is a genuine food.

use std::collections::HashSet;
use std::sync::LazyLock;

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::{MAX_INGREDIENT_LEN, MIN_INGREDIENT_LEN};

/// Sentence and legend cues that disqualify a string outright
const SENTENCE_CUES: &[&str] = &[
    "recommended by",
    "suggested by",
    "key:",
    "flavors mentioned",
    "those in",
    "percent",
    "part salt",
    "part sugar",
    "mixture of",
    "a dish",
    "a cake",
    "a hint of",
    "a little",
    "a couple of",
    "a dash of",
    "a light",
    "a moment",
    "a contrast",
    "a fruit",
];

/// Blocklisted substrings for non-ingredient strings (front matter, cross
/// references, chef-quote fragments, venues)
const BLOCKLIST: &[&str] = &[
    "about the",
    "see also",
    "acknowledgments",
    "acquiring editor",
    "also called for",
    "also known as",
    "along with",
    "restaurant",
    "cuisine",
];

lazy_static! {
    /// Leading article or conjunction marks a phrase, not an ingredient
    static ref LEADING_PHRASE: Regex =
        Regex::new(r"^(a|an|the|and|also|along)\s+").expect("leading phrase pattern should be valid");
    /// Strings that are nothing but punctuation and digits
    static ref ONLY_SYMBOLS: Regex =
        Regex::new(r"^[\W\d]+$").expect("symbols pattern should be valid");
    /// Any embedded digit (recipe amounts, page numbers)
    static ref ANY_DIGIT: Regex = Regex::new(r"\d").expect("digit pattern should be valid");
    /// "X and Y" / "X or Y" / "X the Y" joining words mark multi-item phrases
    static ref JOINING_WORD: Regex =
        Regex::new(r"\s(and|or|the)\s").expect("joining word pattern should be valid");
    /// Sentence-like verb constructions ("we make", "it is also", ...)
    static ref SENTENCE_VERB: Regex =
        Regex::new(r"\b(we|who|as they|it is|that is)\s+(also|are|make|loved)")
            .expect("sentence verb pattern should be valid");
}

/// Decide whether a normalized string denotes one genuine ingredient.
///
/// All checks are independent reject conditions combined by logical OR, so
/// their evaluation order never affects the result.
///
/// # Examples
///
/// ```rust
/// use flavorgraph::validity::is_valid_ingredient;
///
/// assert!(is_valid_ingredient("olive oil"));
/// assert!(is_valid_ingredient("star anise"));
/// assert!(!is_valid_ingredient("a dash of nutmeg"));
/// assert!(!is_valid_ingredient("salt and pepper"));
/// assert!(!is_valid_ingredient("2 parts sugar"));
/// ```
pub fn is_valid_ingredient(name: &str) -> bool {
    if name.len() < MIN_INGREDIENT_LEN || name.len() > MAX_INGREDIENT_LEN {
        return false;
    }
    if SENTENCE_CUES.iter().any(|cue| name.contains(cue)) {
        return false;
    }
    if LEADING_PHRASE.is_match(name) {
        return false;
    }
    if ONLY_SYMBOLS.is_match(name) || ANY_DIGIT.is_match(name) {
        return false;
    }
    if name.ends_with('.') || name.ends_with('!') || name.ends_with('?') {
        return false;
    }
    if name.starts_with('(') || name.ends_with(')') {
        return false;
    }
    if JOINING_WORD.is_match(name) {
        return false;
    }
    if name.starts_with("see ") || name.contains(" see ") || name.contains("cf.") {
        return false;
    }
    if BLOCKLIST.iter().any(|bl| name.contains(bl)) {
        return false;
    }
    true
}

/// Standalone words that are not foods (verbs, descriptors, seasons,
/// techniques, taste vocabulary)
static NON_FOOD_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "serve", "served", "serving", "seedless", "back", "ask", "avoid", "balance", "baking",
        "autumn", "fall", "spring", "winter", "summer", "season", "seasons", "example", "around",
        "artificial", "artisanal", "natural", "organic", "aroma", "astringency", "bitter",
        "bitterness", "sweetness", "acidity", "beverages", "dishes", "appetizers", "desserts",
        "cuisines", "cooked", "raw", "fermented", "broiled", "barbecued", "grilled", "minced",
        "chopped", "sliced", "diced", "ground", "whole", "baby", "adult", "fresh", "dried",
        "canned", "frozen", "use", "try", "add", "adds", "belly", "flakes", "black", "white",
        "red", "green", "yellow", "brown", "light", "dark", "heavy", "ingredient", "ingredients",
        "method", "technique", "breakfast", "lunch", "dinner", "snack", "meal", "crust", "crusts",
        "sauce", "sauces", "rub", "rubs", "powder", "starch", "thickener", "january", "february",
        "march", "april", "may", "june", "july", "august", "september", "october", "november",
        "december", "but", "color", "other", "then", "which", "with", "you", "many", "most",
        "first", "done", "off", "half", "good", "nice", "rich", "hot", "cold", "warm", "cooling",
        "warming", "refreshing", "ripe", "unripe", "young", "old", "new", "soft", "hard", "dry",
        "wet", "fatty", "lean", "mild", "strong", "sweet", "sour", "salty", "umami", "texture",
        "heat", "crunch", "crunchy", "flaky", "velvety", "greasy", "grainy",
    ])
});

/// Substrings marking a string as advice or description rather than a food
static NON_FOOD_SUBSTRINGS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    vec![
        " as a ",
        " as crust",
        " as dessert",
        " see also",
        " dishes",
        " foods",
        " appetizers",
        " cuisines",
        " beverages",
        "ingredient",
        "method",
        " to ",
        " for granted",
        " and other ",
        " and/or ",
        " bistro",
        " restaurant",
        " grill",
        " brasserie",
        " he said",
        " i like",
        " you can",
        " then add",
        " of course",
        " in terms of",
        "— ",
    ]
});

/// Place names that appear standalone in chef quotes
static PLACE_NAMES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "alabama",
        "arizona",
        "california",
        "florida",
        "idaho",
        "massachusetts",
        "new jersey",
        "new york",
        "oregon",
        "sonoma",
        "vermont",
        "virginia",
        "washington",
        "rome",
        "japan",
        "spain",
        "france",
        "tuscan",
        "venetian",
        "new england",
        "southern",
        "northern",
        "eastern",
        "peking",
        "szechuan",
        "boston",
    ])
});

/// Venue names quoted throughout the compendium
static VENUE_NAMES: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    vec![
        "café boulud",
        "café annie",
        "café gray",
        "café juanita",
        "le bernardin",
        "union square café",
        "eleven madison park",
        "jean georges",
        "charlie trotter",
        "frontera grill",
        "gary danko",
        "osteria mozza",
        "zuni café",
        "brasserie jo",
        "citronelle",
    ]
});

/// Decide whether a retained node id names an actual food.
///
/// Applied by the invariant enforcer after canonicalization, this predicate
/// catches vocabulary the extraction-time filter lets through once merging
/// has stripped qualifiers: standalone descriptors, place and venue names,
/// cross-references, and multi-item disjunctions.
pub fn is_food_item(name: &str) -> bool {
    if name.len() < 3 {
        return false;
    }
    if NON_FOOD_WORDS.contains(name) || PLACE_NAMES.contains(name) {
        return false;
    }
    if VENUE_NAMES.iter().any(|v| name.contains(v)) {
        return false;
    }
    if NON_FOOD_SUBSTRINGS.iter().any(|sub| name.contains(sub)) {
        return false;
    }
    // "X or Y" / "X / Y" multi-item disjunctions
    if name.contains(" or ") || name.contains(" / ") {
        return false;
    }
    if name.starts_with("see ") || name.contains(" see ") {
        return false;
    }
    if name.starts_with("and ") || name.starts_with("and/or") {
        return false;
    }
    if SENTENCE_VERB.is_match(name) {
        return false;
    }
    true
}

/// Decide whether a node id looks like one single ingredient rather than a
/// phrase or dish description. Used as the merge pre-pass.
pub fn is_single_ingredient(name: &str) -> bool {
    if name.starts_with("and ") || name.starts_with("and/or") {
        return false;
    }
    if name.split_whitespace().count() > 4 {
        return false;
    }
    if IS_ARE_PHRASE.is_match(name) {
        return false;
    }
    // "X in Y sauce" dish descriptions
    if name.contains(" in ")
        && ["sauce", "butter", "wine", "pan", "dessert"]
            .iter()
            .any(|x| name.contains(x))
    {
        return false;
    }
    true
}

lazy_static! {
    /// Verb constructions marking sentence fragments ("are salty", "is milder")
    static ref IS_ARE_PHRASE: Regex = Regex::new(
        r"(^are\s+|\bare\s+\w+|\bis\s+\w+|\bin\s+a\s+|\bin\s+the\s+|\bas\s+in\s+|\bif\s+you\s+|\bwhen\s+they\s+|\bdon'?t\s+|\bthose\s+|\bpopular\s+in|\bstuffed\s+in\s+)"
    )
    .expect("phrase pattern should be valid");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_ingredients() {
        assert!(is_valid_ingredient("garlic"));
        assert!(is_valid_ingredient("olive oil"));
        assert!(is_valid_ingredient("crème fraîche"));
        assert!(is_valid_ingredient("soft-shell crab"));
    }

    #[test]
    fn test_rejects_length_bounds() {
        assert!(!is_valid_ingredient(""));
        assert!(!is_valid_ingredient("x"));
        assert!(!is_valid_ingredient(
            "a very long descriptive passage about how to braise short ribs"
        ));
    }

    #[test]
    fn test_rejects_sentence_cues() {
        assert!(!is_valid_ingredient("recommended by one chef"));
        assert!(!is_valid_ingredient("key: bold caps"));
        assert!(!is_valid_ingredient("a hint of smoke"));
    }

    #[test]
    fn test_rejects_leading_articles_and_conjunctions() {
        assert!(!is_valid_ingredient("the flavor stays"));
        assert!(!is_valid_ingredient("and then cooked"));
        assert!(!is_valid_ingredient("also known as cilantro"));
        assert!(!is_valid_ingredient("an apple"));
    }

    #[test]
    fn test_rejects_digits_and_punctuation() {
        assert!(!is_valid_ingredient("2 parts"));
        assert!(!is_valid_ingredient("350 degrees"));
        assert!(!is_valid_ingredient("!!"));
        assert!(!is_valid_ingredient("great with pasta."));
    }

    #[test]
    fn test_rejects_joining_words() {
        assert!(!is_valid_ingredient("salt and pepper"));
        assert!(!is_valid_ingredient("lemon or lime"));
        assert!(!is_valid_ingredient("of the brine"));
    }

    #[test]
    fn test_rejects_cross_references_and_venues() {
        assert!(!is_valid_ingredient("see also anise"));
        assert!(!is_valid_ingredient("calf's liver see liver"));
        assert!(!is_valid_ingredient("alsatian cuisine"));
        assert!(!is_valid_ingredient("union square restaurant"));
    }

    #[test]
    fn test_rejects_orphan_parens() {
        assert!(!is_valid_ingredient("(ancho"));
        assert!(!is_valid_ingredient("chipotle)"));
    }

    #[test]
    fn test_order_independence_of_checks() {
        // strings triggering several independent reject conditions at once
        assert!(!is_valid_ingredient("the 2 restaurants)"));
        assert!(!is_valid_ingredient("and 1 part sugar."));
    }

    #[test]
    fn test_food_predicate_accepts_foods() {
        assert!(is_food_item("apricot"));
        assert!(is_food_item("black pepper"));
        assert!(is_food_item("foie gras"));
    }

    #[test]
    fn test_food_predicate_rejects_descriptors() {
        assert!(!is_food_item("seedless"));
        assert!(!is_food_item("serve"));
        assert!(!is_food_item("summer"));
        assert!(!is_food_item("black"));
    }

    #[test]
    fn test_food_predicate_rejects_places_and_venues() {
        assert!(!is_food_item("sonoma"));
        assert!(!is_food_item("le bernardin"));
        assert!(!is_food_item("dinner at café boulud"));
    }

    #[test]
    fn test_food_predicate_rejects_disjunctions() {
        assert!(!is_food_item("black or kalamata"));
        assert!(!is_food_item("goat / sheep cheese"));
    }

    #[test]
    fn test_single_ingredient_predicate() {
        assert!(is_single_ingredient("apricot"));
        assert!(is_single_ingredient("aged balsamic vinegar"));
        assert!(!is_single_ingredient("and pasilla"));
        assert!(!is_single_ingredient("short ribs are best braised slowly"));
        assert!(!is_single_ingredient("mussels in a white wine sauce"));
        assert!(!is_single_ingredient("rosemary is milder"));
    }
}
