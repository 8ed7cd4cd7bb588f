//! # Extraction Configuration Module
//!
//! This module defines configuration structures for the extraction pipeline,
//! including page windows, line segmentation parameters and image fetch settings.

// Constants for extraction configuration
pub const CHARTS_START_PAGE: usize = 41; // pages before this are front matter
pub const CHARTS_END_PAGE: usize = 999;
pub const LINE_BAND_HEIGHT: f64 = 3.0;
pub const MIN_INGREDIENT_LEN: usize = 2;
pub const MAX_INGREDIENT_LEN: usize = 45;

/// Configuration for document extraction
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// First page (zero-indexed) of the flavor charts
    pub charts_start_page: usize,
    /// Page cap; pages at or past this index are ignored
    pub charts_end_page: usize,
    /// Vertical tolerance band for grouping tokens into lines, in points
    pub line_band_height: f64,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            charts_start_page: CHARTS_START_PAGE,
            charts_end_page: CHARTS_END_PAGE,
            line_band_height: LINE_BAND_HEIGHT,
        }
    }
}

/// Configuration for the Wikipedia image lookup
#[derive(Debug, Clone)]
pub struct ImageFetchConfig {
    /// Delay between API requests in milliseconds (Wikipedia allows ~200 req/min)
    pub request_delay_ms: u64,
    /// Base delay before retrying a rate-limited request, in milliseconds
    pub retry_delay_ms: u64,
    /// Maximum random jitter added to retry delays, in milliseconds
    pub retry_jitter_ms: u64,
    /// Maximum number of attempts per request
    pub max_retries: u32,
    /// Only fetch images for nodes with strictly more than this many edges
    pub min_degree: usize,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ImageFetchConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 1500,
            retry_delay_ms: 60_000, // 1 minute
            retry_jitter_ms: 5000,
            max_retries: 3,
            min_degree: 5,
            request_timeout_secs: 15,
        }
    }
}
