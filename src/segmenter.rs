//! # Line Segmenter Module
//!
//! Groups the positioned tokens of one page into logical text lines. Tokens
//! whose vertical coordinate falls within the same tolerance band are joined
//! into a single line, preserving left-to-right token order.

use std::collections::BTreeMap;

use log::trace;

use crate::document::Token;

/// A logical text line reduced from one vertical band of tokens
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Concatenated token text, single-space separated
    pub text: String,
    /// True if any token in the band was emphasized
    pub emphasized: bool,
}

/// Segment one page of tokens into lines, top to bottom.
///
/// The vertical coordinate of each token is quantized into bands of
/// `band_height` points; tokens sharing a band form one line. Empty and
/// whitespace-only lines are dropped. The returned iterator is finite and
/// meant to be consumed once per page.
///
/// # Examples
///
/// ```rust
/// use flavorgraph::document::Token;
/// use flavorgraph::segmenter::segment_lines;
///
/// let tokens = vec![
///     Token { text: "olive".into(), top: 10.2, emphasized: false },
///     Token { text: "oil".into(), top: 10.4, emphasized: false },
///     Token { text: "basil".into(), top: 22.0, emphasized: true },
/// ];
/// let lines: Vec<_> = segment_lines(&tokens, 3.0).collect();
/// assert_eq!(lines.len(), 2);
/// assert_eq!(lines[0].text, "olive oil");
/// assert!(lines[1].emphasized);
/// ```
pub fn segment_lines(tokens: &[Token], band_height: f64) -> impl Iterator<Item = Line> {
    let mut bands: BTreeMap<i64, Vec<&Token>> = BTreeMap::new();
    for token in tokens {
        let band = (token.top / band_height).round() as i64;
        bands.entry(band).or_default().push(token);
    }

    trace!(
        "Segmented {} tokens into {} vertical bands",
        tokens.len(),
        bands.len()
    );

    bands
        .into_values()
        .filter_map(|band_tokens| {
            let text = band_tokens
                .iter()
                .map(|t| t.text.trim())
                .filter(|t| !t.is_empty())
                .collect::<Vec<&str>>()
                .join(" ");
            if text.is_empty() {
                return None;
            }
            let emphasized = band_tokens.iter().any(|t| t.emphasized);
            Some(Line { text, emphasized })
        })
        .collect::<Vec<Line>>()
        .into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, top: f64) -> Token {
        Token {
            text: text.to_string(),
            top,
            emphasized: false,
        }
    }

    #[test]
    fn test_tokens_in_same_band_join() {
        let tokens = vec![token("CHEESE", 100.0), token("GOAT", 100.4)];
        let lines: Vec<_> = segment_lines(&tokens, 3.0).collect();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "CHEESE GOAT");
    }

    #[test]
    fn test_distinct_bands_stay_separate() {
        let tokens = vec![token("garlic", 10.0), token("onions", 50.0)];
        let lines: Vec<_> = segment_lines(&tokens, 3.0).collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "garlic");
        assert_eq!(lines[1].text, "onions");
    }

    #[test]
    fn test_lines_emitted_top_to_bottom() {
        let tokens = vec![token("second", 80.0), token("first", 12.0)];
        let lines: Vec<_> = segment_lines(&tokens, 3.0).collect();

        assert_eq!(lines[0].text, "first");
        assert_eq!(lines[1].text, "second");
    }

    #[test]
    fn test_whitespace_only_lines_dropped() {
        let tokens = vec![token("  ", 10.0), token("thyme", 40.0)];
        let lines: Vec<_> = segment_lines(&tokens, 3.0).collect();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "thyme");
    }

    #[test]
    fn test_emphasis_aggregates_across_band() {
        let tokens = vec![
            Token {
                text: "sour".to_string(),
                top: 10.0,
                emphasized: false,
            },
            Token {
                text: "cherries".to_string(),
                top: 10.4,
                emphasized: true,
            },
        ];
        let lines: Vec<_> = segment_lines(&tokens, 3.0).collect();

        assert_eq!(lines.len(), 1);
        assert!(lines[0].emphasized);
    }

    #[test]
    fn test_empty_page_yields_no_lines() {
        let lines: Vec<_> = segment_lines(&[], 3.0).collect();
        assert!(lines.is_empty());
    }
}
