//! # Node Image Fetcher Module
//!
//! Looks up an illustrative Wikipedia image for every well-connected node
//! and writes an id -> image-URL map next to the graph artifact. The lookup
//! runs after the graph is final and never touches node or edge identity.
//!
//! ## Features
//!
//! - Two-step Wikipedia API lookup (page search, then page image)
//! - Rate limited to one request per 1.5 s (Wikipedia allows ~200 req/min)
//! - Retry with jittered backoff on HTTP 429
//! - Resumes from an existing output map, skipping fetched nodes
//! - Per-node failures are logged and skipped, never fatal to the run

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use log::{info, warn};
use rand::Rng;
use serde_json::Value;

use crate::config::ImageFetchConfig;
use crate::graph::Graph;
use crate::persist::write_atomic;

const WIKI_API: &str = "https://en.wikipedia.org/w/api.php";
const USER_AGENT: &str = "flavorgraph/0.1 (food pairing visualization)";
const THUMBNAIL_SIZE: u32 = 400;

/// Rate-limited Wikipedia image lookup client
pub struct ImageFetcher {
    client: reqwest::Client,
    config: ImageFetchConfig,
}

impl ImageFetcher {
    pub fn new(config: ImageFetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Fetch images for every node whose degree exceeds the configured
    /// minimum, resuming from an existing map at `out_path` if one exists.
    /// The updated map is written back atomically.
    pub async fn fetch_for_graph(
        &self,
        graph: &Graph,
        out_path: &Path,
    ) -> Result<BTreeMap<String, String>> {
        let mut images = load_existing_map(out_path);
        if !images.is_empty() {
            info!("Resuming: {} images already fetched", images.len());
        }

        let to_fetch = nodes_to_fetch(graph, &images, self.config.min_degree);
        info!(
            "Fetching images for {} nodes (degree > {})",
            to_fetch.len(),
            self.config.min_degree
        );

        let mut failed = 0usize;
        for (i, node_id) in to_fetch.iter().enumerate() {
            if (i + 1) % 50 == 0 {
                info!("Progress: {}/{}", i + 1, to_fetch.len());
            }
            match self.fetch_image_url(node_id).await {
                Some(url) => {
                    images.insert(node_id.clone(), url);
                }
                None => failed += 1,
            }
            tokio::time::sleep(Duration::from_millis(self.config.request_delay_ms)).await;
        }

        let json = serde_json::to_string_pretty(&images)?;
        write_atomic(out_path, json.as_bytes())?;
        info!(
            "Image fetch done: {} images, {} not found",
            images.len(),
            failed
        );
        Ok(images)
    }

    /// Search Wikipedia for the ingredient and return its main page image
    /// URL, thumbnail preferred over the original. `None` if no page or no
    /// image was found.
    pub async fn fetch_image_url(&self, ingredient: &str) -> Option<String> {
        let search_term = to_search_term(ingredient);

        let data = self
            .api_request(
                &[
                    ("action", "query"),
                    ("list", "search"),
                    ("srsearch", &search_term),
                    ("srlimit", "1"),
                    ("format", "json"),
                ],
                "Search",
                ingredient,
            )
            .await?;

        let page_id = data
            .pointer("/query/search/0/pageid")
            .and_then(Value::as_u64)?;

        tokio::time::sleep(Duration::from_millis(self.config.request_delay_ms)).await;

        let data = self
            .api_request(
                &[
                    ("action", "query"),
                    ("pageids", &page_id.to_string()),
                    ("prop", "pageimages"),
                    ("pithumbsize", &THUMBNAIL_SIZE.to_string()),
                    ("format", "json"),
                ],
                "Image",
                ingredient,
            )
            .await?;

        let page = data.pointer(&format!("/query/pages/{page_id}"))?;
        page.pointer("/thumbnail/source")
            .or_else(|| page.pointer("/original/source"))
            .and_then(Value::as_str)
            .map(String::from)
    }

    /// One API request with retry on rate limiting and transport errors.
    /// Retry delays carry random jitter so resumed runs do not hammer the
    /// API in lockstep.
    async fn api_request(
        &self,
        params: &[(&str, &str)],
        step: &str,
        ingredient: &str,
    ) -> Option<Value> {
        for attempt in 0..self.config.max_retries {
            let last_attempt = attempt + 1 >= self.config.max_retries;
            let response = self.client.get(WIKI_API).query(params).send().await;

            match response {
                Ok(resp) if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS => {
                    if last_attempt {
                        return None;
                    }
                    let delay = self.retry_delay();
                    warn!("Rate limited, waiting {}ms...", delay.as_millis());
                    tokio::time::sleep(delay).await;
                }
                Ok(resp) => match resp.error_for_status() {
                    Ok(resp) => match resp.json::<Value>().await {
                        Ok(data) => return Some(data),
                        Err(e) => {
                            if last_attempt {
                                warn!("{step} error for {ingredient}: {e}");
                                return None;
                            }
                            tokio::time::sleep(self.retry_delay()).await;
                        }
                    },
                    Err(e) => {
                        if last_attempt {
                            warn!("{step} error for {ingredient}: {e}");
                            return None;
                        }
                        tokio::time::sleep(self.retry_delay()).await;
                    }
                },
                Err(e) => {
                    if last_attempt {
                        warn!("{step} error for {ingredient}: {e}");
                        return None;
                    }
                    tokio::time::sleep(self.retry_delay()).await;
                }
            }
        }
        None
    }

    fn retry_delay(&self) -> Duration {
        let jitter = rand::thread_rng().gen_range(0..=self.config.retry_jitter_ms);
        Duration::from_millis(self.config.retry_delay_ms + jitter)
    }
}

/// Convert a node id to a Wikipedia search term.
///
/// Canonical ids are mostly clean already; any comma-structured leftover is
/// reduced to its head noun.
pub fn to_search_term(name: &str) -> String {
    name.split(',').next().unwrap_or(name).trim().to_string()
}

/// Nodes worth illustrating: degree strictly above `min_degree` and not
/// already present in the map, in deterministic order.
pub fn nodes_to_fetch(
    graph: &Graph,
    existing: &BTreeMap<String, String>,
    min_degree: usize,
) -> Vec<String> {
    let degrees = graph.degrees();
    let mut ids: Vec<String> = graph
        .nodes
        .iter()
        .filter(|n| degrees.get(n.id.as_str()).copied().unwrap_or(0) > min_degree)
        .filter(|n| !existing.contains_key(&n.id))
        .map(|n| n.id.clone())
        .collect();
    ids.sort();
    ids
}

fn load_existing_map(path: &Path) -> BTreeMap<String, String> {
    if !path.exists() {
        return BTreeMap::new();
    }
    match std::fs::read_to_string(path)
        .map_err(anyhow::Error::from)
        .and_then(|raw| serde_json::from_str(&raw).map_err(anyhow::Error::from))
    {
        Ok(map) => map,
        Err(e) => {
            warn!("Ignoring unreadable image map {}: {e}", path.display());
            BTreeMap::new()
        }
    }
}
