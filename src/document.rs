//! # Token Document Module
//!
//! This module defines the input data model for the extraction pipeline: a
//! document that yields, per page, a sequence of positioned text tokens as
//! produced by an upstream layout reader.
//!
//! ## Features
//!
//! - Serde-backed token document loading from JSON
//! - Fail-fast on a missing or unreadable document
//! - Per-page leniency: a page that cannot be deserialized is skipped

use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::PipelineError;

/// A positioned piece of text from one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The token text as read from the page
    pub text: String,
    /// Distance from the top of the page, in points
    pub top: f64,
    /// Whether the token was set in an emphasized (bold) face
    #[serde(default)]
    pub emphasized: bool,
}

/// One page of tokens, in reading order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub tokens: Vec<Token>,
}

/// A full token document, page by page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenDocument {
    pub pages: Vec<Page>,
}

impl TokenDocument {
    /// Load a token document from a JSON file.
    ///
    /// The file must contain an object with a `pages` array. Pages that fail
    /// to deserialize are skipped with a warning and excluded from the
    /// result; a missing file or a file that is not a token document at all
    /// is a fatal error.
    pub fn from_path(path: &Path) -> Result<Self, PipelineError> {
        if !path.exists() {
            return Err(PipelineError::DocumentNotFound(path.display().to_string()));
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::DocumentNotFound(format!("{}: {e}", path.display())))?;

        let value: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|e| PipelineError::DocumentParse(format!("{}: {e}", path.display())))?;

        let raw_pages = value
            .get("pages")
            .and_then(|p| p.as_array())
            .ok_or_else(|| {
                PipelineError::DocumentParse(format!("{}: no pages array", path.display()))
            })?;

        let mut pages = Vec::with_capacity(raw_pages.len());
        for (page_num, raw_page) in raw_pages.iter().enumerate() {
            match serde_json::from_value::<Page>(raw_page.clone()) {
                Ok(page) => pages.push(page),
                Err(e) => {
                    warn!("Skipping page {page_num}: {e}");
                }
            }
        }

        info!(
            "Loaded token document {} ({} pages)",
            path.display(),
            pages.len()
        );
        Ok(Self { pages })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_document_fails_fast() {
        let err = TokenDocument::from_path(Path::new("/nonexistent/tokens.json")).unwrap_err();
        assert!(matches!(err, PipelineError::DocumentNotFound(_)));
    }

    #[test]
    fn test_load_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"pages": [{{"tokens": [{{"text": "GARLIC", "top": 10.0, "emphasized": true}}]}}]}}"#
        )
        .unwrap();

        let doc = TokenDocument::from_path(file.path()).unwrap();
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.pages[0].tokens[0].text, "GARLIC");
        assert!(doc.pages[0].tokens[0].emphasized);
    }

    #[test]
    fn test_bad_page_is_skipped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"pages": [{{"tokens": "not an array"}}, {{"tokens": [{{"text": "onion", "top": 1.0}}]}}]}}"#
        )
        .unwrap();

        let doc = TokenDocument::from_path(file.path()).unwrap();
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.pages[0].tokens[0].text, "onion");
        assert!(!doc.pages[0].tokens[0].emphasized);
    }

    #[test]
    fn test_document_without_pages_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"nodes": []}}"#).unwrap();

        let err = TokenDocument::from_path(file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::DocumentParse(_)));
    }
}
