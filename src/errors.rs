//! # Pipeline Error Types Module
//!
//! This module defines custom error types used throughout the extraction pipeline.
//! It provides structured error handling for document reading, graph validation
//! and artifact persistence.

/// Custom error types for pipeline operations
#[derive(Debug, Clone)]
pub enum PipelineError {
    /// Input document missing or unreadable
    DocumentNotFound(String),
    /// Input document could not be parsed at all
    DocumentParse(String),
    /// A graph invariant was violated at a stage boundary
    InvariantViolation(String),
    /// Artifact write errors
    Persist(String),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::DocumentNotFound(msg) => write!(f, "Document not found: {msg}"),
            PipelineError::DocumentParse(msg) => write!(f, "Document parse error: {msg}"),
            PipelineError::InvariantViolation(msg) => write!(f, "Graph invariant violation: {msg}"),
            PipelineError::Persist(msg) => write!(f, "Persist error: {msg}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<anyhow::Error> for PipelineError {
    fn from(err: anyhow::Error) -> Self {
        PipelineError::Persist(err.to_string())
    }
}
