//! `campusbuddy doctor`: Diagnose configuration and dataset health.

use std::path::Path;
use std::time::Duration;

use campusbuddy_agent::embedder_from_config;
use campusbuddy_config::AppConfig;
use campusbuddy_core::embedding::Embedder;
use campusbuddy_core::store::KnowledgeStore;
use campusbuddy_index::{EmbeddingIndex, JsonFileStore, OllamaEmbedder};
use tracing::debug;

pub fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("CampusBuddy Doctor — System Diagnostics");
    println!("=======================================\n");

    let mut issues = 0;

    let config = if config_path.exists() {
        match AppConfig::load_with_env(config_path) {
            Ok(config) => {
                println!("  [ok]   Config file valid: {}", config_path.display());
                config
            }
            Err(e) => {
                println!("  [fail] Config file invalid: {e}");
                println!("\n  1 issue found. Fix the config and re-run doctor.");
                return Ok(());
            }
        }
    } else {
        println!("  [warn] No config file, using defaults (run `campusbuddy onboard`)");
        issues += 1;
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    };

    let dataset_path = config.knowledge.resolved_path();
    let store = JsonFileStore::new(dataset_path.clone());
    let records = match store.list_records() {
        Ok(records) if records.is_empty() => {
            println!("  [warn] Dataset at {} has no records", dataset_path.display());
            issues += 1;
            None
        }
        Ok(records) => {
            println!(
                "  [ok]   Dataset loaded: {} records from {}",
                records.len(),
                dataset_path.display()
            );
            Some(records)
        }
        Err(e) => {
            println!("  [fail] {e}");
            issues += 1;
            None
        }
    };

    if config.embedding.provider == "ollama" {
        let timeout = Duration::from_secs(config.embedding.timeout_secs);
        match OllamaEmbedder::probe(&config.embedding.url, &config.embedding.model, timeout) {
            Ok(probed)
                if config
                    .embedding
                    .dimensions
                    .is_some_and(|d| d != probed.dimensions()) =>
            {
                println!(
                    "  [fail] Ollama model '{}' returns {} dimensions, config says {}",
                    probed.model(),
                    probed.dimensions(),
                    config.embedding.dimensions.unwrap_or_default()
                );
                issues += 1;
            }
            Ok(probed) => {
                println!(
                    "  [ok]   Ollama reachable at {} ({} dimensions)",
                    config.embedding.url,
                    probed.dimensions()
                );
            }
            Err(e) => {
                println!("  [fail] Ollama probe failed: {e}");
                issues += 1;
            }
        }
    }

    match (embedder_from_config(&config.embedding), records) {
        (Err(e), _) => {
            println!("  [fail] Embedder: {e}");
            issues += 1;
        }
        (Ok(embedder), Some(records)) => {
            debug!(embedder = embedder.name(), "Building index for diagnostics");
            match EmbeddingIndex::build(records, embedder) {
                Ok(index) => {
                    println!(
                        "  [ok]   Index built with the {} embedder ({} dimensions)",
                        index.embedder_name(),
                        index.dimensions()
                    );
                    for (category, count) in index.category_counts() {
                        println!("           {:<13} {count}", category.as_str());
                    }
                }
                Err(e) => {
                    println!("  [fail] Index build failed: {e}");
                    issues += 1;
                }
            }
        }
        (Ok(_), None) => {}
    }

    println!();
    if issues == 0 {
        println!("  All checks passed!");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
