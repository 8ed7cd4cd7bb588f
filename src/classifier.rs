//! # Line Classifier Module
//!
//! This module assigns each segmented line a structural role and turns
//! pairing and affinity lines into `PairingObservation`s.
//!
//! ## Features
//!
//! - Explicit state machine over the document's section structure
//! - ALL-CAPS section-header recognition with metadata-key exclusion
//! - Four-level recommendation strength from typographic cues
//! - "+"-joined affinity groups expanded into cliques
//!
//! The compendium lays out one ALL-CAPS ingredient header per section,
//! followed by indented comma-separated pairing lists whose typographic
//! emphasis encodes recommendation strength, plus a distinct
//! "Flavor Affinities" block of "+"-joined proven combinations.

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;

use crate::normalize::normalize;
use crate::segmenter::Line;
use crate::validity::is_valid_ingredient;

/// Metadata keys that open non-pairing lines inside an ingredient section
const METADATA_KEYS: &[&str] = &[
    "season", "taste", "weight", "volume", "techniques", "tips", "avoid", "function",
];

/// Literal marker phrase opening the affinity block of a section
const AFFINITY_MARKER: &str = "flavor affinit";

/// Legend and key lines never yield observations
const LEGEND_CUES: &[&str] = &["key:", "flavors mentioned", "those in", "recommended by"];

/// Minimum share of uppercase among alphabetic characters for a header
const HEADER_UPPER_RATIO: f64 = 0.8;

lazy_static! {
    /// Trailing "esp. ..." / "e.g. ..." tails on a single pairing segment
    static ref SEGMENT_TAIL: Regex =
        Regex::new(r"(?i)\s+(esp\.|e\.g\.)\s+.*$").expect("segment tail pattern should be valid");
    /// Parenthetical notes inside a pairing segment
    static ref SEGMENT_PAREN: Regex =
        Regex::new(r"\s*\([^)]*\)\s*").expect("segment paren pattern should be valid");
}

/// Structural role assigned to one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    SectionHeader,
    AffinityGroup,
    PairingList,
    Metadata,
    Noise,
}

/// Classifier position within the document's section structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionState {
    /// Before the first recognized section, or after an invalid header
    Outside,
    /// Inside the section of the named ingredient
    InSection(String),
    /// Inside a "Flavor Affinities" block, until the next header
    InAffinityBlock,
}

/// One observed ingredient pairing with its recommendation level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingObservation {
    pub a: String,
    pub b: String,
    /// Recommendation level: 1 plain, 2 emphasized, 3 caps, 4 starred
    pub level: u8,
    /// True when the pairing came from an affinity group
    pub from_affinity: bool,
}

/// The outcome of classifying one line
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedLine {
    pub role: Role,
    pub observations: Vec<PairingObservation>,
}

impl ClassifiedLine {
    fn plain(role: Role) -> Self {
        Self {
            role,
            observations: Vec::new(),
        }
    }
}

/// Classify one line given the current state, returning the next state and
/// the line's role plus any pairing observations.
///
/// The state is threaded explicitly through every call so the transition
/// table stays independently testable; the caller owns it across lines and
/// pages.
///
/// # Examples
///
/// ```rust
/// use flavorgraph::classifier::{classify_line, Role, SectionState};
/// use flavorgraph::segmenter::Line;
///
/// let header = Line { text: "GARLIC".into(), emphasized: false };
/// let (state, classified) = classify_line(SectionState::Outside, &header);
/// assert_eq!(classified.role, Role::SectionHeader);
/// assert_eq!(state, SectionState::InSection("garlic".into()));
///
/// let pairing = Line { text: "onion, olive oil".into(), emphasized: false };
/// let (_, classified) = classify_line(state, &pairing);
/// assert_eq!(classified.observations.len(), 2);
/// ```
pub fn classify_line(state: SectionState, line: &Line) -> (SectionState, ClassifiedLine) {
    let text = line.text.trim();
    let lower = text.to_lowercase();

    // Legend lines look like headers but describe the typography key
    if LEGEND_CUES.iter().any(|cue| lower.contains(cue)) {
        trace!("Legend line dropped: '{text}'");
        return (state, ClassifiedLine::plain(Role::Noise));
    }

    // The affinity marker is sticky until the next section header, whether
    // it appears standalone or as the metadata key opening the block
    if lower.contains(AFFINITY_MARKER) {
        debug!("Entering affinity block");
        return (
            SectionState::InAffinityBlock,
            ClassifiedLine::plain(Role::Metadata),
        );
    }

    if is_section_header(text) {
        let header = text.split(':').next().unwrap_or(text).trim();
        let normalized = normalize(header);
        return if is_valid_ingredient(&normalized) {
            debug!("New ingredient section: '{normalized}'");
            (
                SectionState::InSection(normalized),
                ClassifiedLine::plain(Role::SectionHeader),
            )
        } else {
            trace!("Header rejected by validity filter: '{normalized}'");
            (
                SectionState::Outside,
                ClassifiedLine::plain(Role::SectionHeader),
            )
        };
    }

    match state {
        SectionState::InAffinityBlock if text.contains('+') => {
            let observations = expand_affinity_group(text);
            let role = if observations.is_empty() {
                Role::Noise
            } else {
                Role::AffinityGroup
            };
            (
                SectionState::InAffinityBlock,
                ClassifiedLine { role, observations },
            )
        }
        SectionState::InAffinityBlock => (
            SectionState::InAffinityBlock,
            ClassifiedLine::plain(Role::Noise),
        ),
        SectionState::InSection(current) => {
            if METADATA_KEYS.iter().any(|key| lower.starts_with(key)) {
                return (
                    SectionState::InSection(current),
                    ClassifiedLine::plain(Role::Metadata),
                );
            }
            let observations = parse_pairing_line(&current, text, line.emphasized);
            (
                SectionState::InSection(current),
                ClassifiedLine {
                    role: Role::PairingList,
                    observations,
                },
            )
        }
        SectionState::Outside => (SectionState::Outside, ClassifiedLine::plain(Role::Noise)),
    }
}

/// Check whether a line is an ingredient section header.
///
/// Headers are at least 80% uppercase among their alphabetic characters and
/// must not open with a metadata key.
pub fn is_section_header(text: &str) -> bool {
    let stripped = text.trim();
    if stripped.len() < 2 {
        return false;
    }
    let lower = stripped.to_lowercase();
    if METADATA_KEYS
        .iter()
        .any(|key| lower.starts_with(&format!("{key}:")))
    {
        return false;
    }
    let letters: Vec<char> = stripped.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.is_empty() {
        return false;
    }
    let upper = letters.iter().filter(|c| c.is_uppercase()).count();
    (upper as f64 / letters.len() as f64) >= HEADER_UPPER_RATIO
}

/// Parse a comma-separated pairing line under the given section ingredient.
///
/// The whole line carries one recommendation level derived from its
/// typographic cues: a leading `*` marker is level 4, an all-caps leading
/// word level 3, emphasized styling level 2, anything else level 1. A
/// segment carrying its own `*` marker mid-line is escalated to level 4
/// on its own.
fn parse_pairing_line(current: &str, text: &str, emphasized: bool) -> Vec<PairingObservation> {
    let line_level = detect_level(text, emphasized);

    let mut observations = Vec::new();
    for part in text.split(',') {
        let part = part.trim();
        let level = if part.starts_with('*') { 4 } else { line_level };
        let mut segment = SEGMENT_TAIL.replace(part, "").into_owned();
        segment = SEGMENT_PAREN.replace_all(&segment, " ").into_owned();
        let segment = segment.trim_matches(|c| c == ' ' || c == ')');
        let norm = normalize(segment);
        if norm.is_empty() || !is_valid_ingredient(&norm) {
            continue;
        }
        if norm == current {
            continue;
        }
        trace!("Pairing {current} + {norm} at level {level}");
        observations.push(PairingObservation {
            a: current.to_string(),
            b: norm,
            level,
            from_affinity: false,
        });
    }
    observations
}

/// Derive the recommendation level of a pairing line from its raw text
fn detect_level(text: &str, emphasized: bool) -> u8 {
    if text.trim_start().starts_with('*') {
        return 4;
    }
    let first_part = text.split(',').next().unwrap_or("").trim();
    let first_word = first_part.split_whitespace().next().unwrap_or("");
    if first_word.chars().count() > 1 && is_all_caps(first_word) {
        return 3;
    }
    if emphasized {
        return 2;
    }
    1
}

/// Expand a "+"-joined affinity line into one observation per unordered
/// pair among its valid members (clique expansion), all at level 2.
fn expand_affinity_group(text: &str) -> Vec<PairingObservation> {
    let parts: Vec<String> = text
        .split('+')
        .map(|p| normalize(p.trim()))
        .filter(|p| !p.is_empty() && is_valid_ingredient(p))
        .collect();

    if parts.len() < 2 {
        return Vec::new();
    }

    let mut observations = Vec::new();
    for i in 0..parts.len() {
        for j in (i + 1)..parts.len() {
            if parts[i] != parts[j] {
                observations.push(PairingObservation {
                    a: parts[i].clone(),
                    b: parts[j].clone(),
                    level: 2,
                    from_affinity: true,
                });
            }
        }
    }
    debug!(
        "Affinity group of {} members expanded to {} pairings",
        parts.len(),
        observations.len()
    );
    observations
}

/// True if every alphabetic character is uppercase and at least one exists
fn is_all_caps(word: &str) -> bool {
    let mut has_alpha = false;
    for c in word.chars() {
        if c.is_alphabetic() {
            has_alpha = true;
            if !c.is_uppercase() {
                return false;
            }
        }
    }
    has_alpha
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> Line {
        Line {
            text: text.to_string(),
            emphasized: false,
        }
    }

    fn bold(text: &str) -> Line {
        Line {
            text: text.to_string(),
            emphasized: true,
        }
    }

    #[test]
    fn test_header_recognition() {
        assert!(is_section_header("GARLIC"));
        assert!(is_section_header("CHEESE, GOAT"));
        assert!(is_section_header("BLOOD ORANGEs")); // one lowercase char still >= 80%
        assert!(!is_section_header("onion"));
        assert!(!is_section_header("Season: spring"));
        assert!(!is_section_header("x"));
        assert!(!is_section_header("..."));
    }

    #[test]
    fn test_header_opens_section() {
        let (state, classified) = classify_line(SectionState::Outside, &line("GARLIC"));
        assert_eq!(classified.role, Role::SectionHeader);
        assert_eq!(state, SectionState::InSection("garlic".to_string()));
    }

    #[test]
    fn test_invalid_header_goes_outside() {
        let start = SectionState::InSection("garlic".to_string());
        let (state, classified) = classify_line(start, &line("ACKNOWLEDGMENTS"));
        assert_eq!(classified.role, Role::SectionHeader);
        assert_eq!(state, SectionState::Outside);
    }

    #[test]
    fn test_pairing_line_levels() {
        let state = SectionState::InSection("garlic".to_string());

        let (_, plain) = classify_line(state.clone(), &line("onion, thyme"));
        assert!(plain.observations.iter().all(|o| o.level == 1));

        let (_, emphasized) = classify_line(state.clone(), &bold("onion, thyme"));
        assert!(emphasized.observations.iter().all(|o| o.level == 2));

        let (_, caps) = classify_line(state.clone(), &line("ONIONS, red"));
        assert!(caps.observations.iter().all(|o| o.level == 3));

        let (_, starred) = classify_line(state, &line("*onion"));
        assert!(starred.observations.iter().all(|o| o.level == 4));
    }

    #[test]
    fn test_starred_segment_escalates_alone() {
        let state = SectionState::InSection("garlic".to_string());
        let (_, classified) = classify_line(state, &line("onion, olive oil, *basil"));

        let levels: Vec<(&str, u8)> = classified
            .observations
            .iter()
            .map(|o| (o.b.as_str(), o.level))
            .collect();
        assert_eq!(
            levels,
            vec![("onion", 1), ("olive oil", 1), ("basil", 4)]
        );
    }

    #[test]
    fn test_pairing_line_pairs_with_section_ingredient() {
        let state = SectionState::InSection("garlic".to_string());
        let (_, classified) = classify_line(state, &line("onion, olive oil, basil"));

        assert_eq!(classified.role, Role::PairingList);
        assert_eq!(classified.observations.len(), 3);
        for obs in &classified.observations {
            assert_eq!(obs.a, "garlic");
            assert!(!obs.from_affinity);
        }
        assert_eq!(classified.observations[1].b, "olive oil");
    }

    #[test]
    fn test_pairing_line_skips_invalid_and_reflexive_segments() {
        let state = SectionState::InSection("garlic".to_string());
        let (_, classified) = classify_line(state, &line("garlic, a hint of smoke, onion"));

        assert_eq!(classified.observations.len(), 1);
        assert_eq!(classified.observations[0].b, "onion");
    }

    #[test]
    fn test_metadata_line_ignored() {
        let state = SectionState::InSection("garlic".to_string());
        let (next, classified) = classify_line(state.clone(), &line("Season: spring-summer"));

        assert_eq!(classified.role, Role::Metadata);
        assert!(classified.observations.is_empty());
        assert_eq!(next, state);
    }

    #[test]
    fn test_affinity_marker_is_sticky() {
        let state = SectionState::InSection("achiote".to_string());
        let (state, classified) = classify_line(state, &line("Flavor Affinities"));
        assert_eq!(classified.role, Role::Metadata);
        assert_eq!(state, SectionState::InAffinityBlock);

        // a plain line inside the block is not a pairing list
        let (state, classified) = classify_line(state, &line("works well in stews"));
        assert_eq!(classified.role, Role::Noise);
        assert_eq!(state, SectionState::InAffinityBlock);
    }

    #[test]
    fn test_affinity_clique_expansion() {
        let (state, classified) = classify_line(
            SectionState::InAffinityBlock,
            &line("achiote + pork + sour orange"),
        );

        assert_eq!(state, SectionState::InAffinityBlock);
        assert_eq!(classified.role, Role::AffinityGroup);
        assert_eq!(classified.observations.len(), 3);
        for obs in &classified.observations {
            assert_eq!(obs.level, 2);
            assert!(obs.from_affinity);
        }
    }

    #[test]
    fn test_affinity_group_needs_two_valid_members() {
        let (_, classified) =
            classify_line(SectionState::InAffinityBlock, &line("achiote + 350"));
        assert_eq!(classified.role, Role::Noise);
        assert!(classified.observations.is_empty());
    }

    #[test]
    fn test_header_ends_affinity_block() {
        let (state, _) = classify_line(SectionState::InAffinityBlock, &line("ANCHOVIES"));
        assert_eq!(state, SectionState::InSection("anchovies".to_string()));
    }

    #[test]
    fn test_line_with_no_section_is_noise() {
        let (state, classified) =
            classify_line(SectionState::Outside, &line("apple, pear, quince"));
        assert_eq!(classified.role, Role::Noise);
        assert!(classified.observations.is_empty());
        assert_eq!(state, SectionState::Outside);
    }

    #[test]
    fn test_legend_lines_dropped() {
        let state = SectionState::InSection("garlic".to_string());
        let (_, classified) = classify_line(
            state,
            &line("KEY: Flavors mentioned by one or more experts"),
        );
        assert_eq!(classified.role, Role::Noise);
    }

    #[test]
    fn test_segment_tail_stripping() {
        let state = SectionState::InSection("pork".to_string());
        let (_, classified) =
            classify_line(state, &line("vinegar esp. sherry vinegar, thyme"));

        assert_eq!(classified.observations.len(), 2);
        assert_eq!(classified.observations[0].b, "vinegar");
        assert_eq!(classified.observations[1].b, "thyme");
    }
}
