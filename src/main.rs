use std::env;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::info;

use flavorgraph::config::{ExtractConfig, ImageFetchConfig};
use flavorgraph::document::TokenDocument;
use flavorgraph::images::ImageFetcher;
use flavorgraph::{persist, pipeline};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    info!("Starting flavor graph extraction");

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Get the token document path from environment
    let document_path = env::var("TOKEN_DOCUMENT").expect("TOKEN_DOCUMENT must be set");

    // Output directory for the graph artifacts
    let output_dir = PathBuf::from(env::var("OUTPUT_DIR").unwrap_or_else(|_| "data".to_string()));
    std::fs::create_dir_all(&output_dir)?;

    info!("Reading token document from: {document_path}");
    let doc = TokenDocument::from_path(Path::new(&document_path))?;

    let mut graph = pipeline::run(&doc, &ExtractConfig::default())?;

    let json_path = output_dir.join("flavor_pairings.json");
    let csv_path = output_dir.join("flavor_pairings.csv");
    persist::write_graph(&mut graph, &json_path, &csv_path)?;

    info!(
        "Extraction complete: {} nodes, {} edges",
        graph.metadata.total_nodes, graph.metadata.total_edges
    );

    // Image lookup is opt-in; it takes a while at one request per 1.5s
    let fetch_images = env::var("FETCH_IMAGES")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if fetch_images {
        let fetcher = ImageFetcher::new(ImageFetchConfig::default())?;
        let images_path = output_dir.join("node_images.json");
        let images = fetcher.fetch_for_graph(&graph, &images_path).await?;
        info!("Image map written with {} entries", images.len());
    }

    Ok(())
}
