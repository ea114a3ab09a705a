//! `campusbuddy search`: Query the embedding index directly.

use campusbuddy_agent::embedder_from_config;
use campusbuddy_config::AppConfig;
use campusbuddy_index::{EmbeddingIndex, JsonFileStore};

pub fn run(
    config: &AppConfig,
    query: &str,
    k: usize,
    threshold: Option<f32>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let embedder = embedder_from_config(&config.embedding)?;
    let store = JsonFileStore::new(config.knowledge.resolved_path());
    let index = EmbeddingIndex::from_store(&store, embedder)?;

    let threshold = threshold.unwrap_or(config.retrieval.min_similarity as f32);
    let matches = index.search(query, k, threshold)?;

    if json {
        for m in &matches {
            let line = serde_json::json!({
                "similarity": m.similarity,
                "record": m.record.as_ref(),
            });
            println!("{line}");
        }
        return Ok(());
    }

    if matches.is_empty() {
        println!("  No matches above {threshold:.2} for \"{query}\".");
        return Ok(());
    }
    for (rank, m) in matches.iter().enumerate() {
        println!(
            "  {}. [{:.3}] {:<12} {}",
            rank + 1,
            m.similarity,
            m.category.as_str(),
            m.record.title()
        );
    }
    Ok(())
}
