//! `campusbuddy onboard`: First-time setup.

use std::path::Path;

use campusbuddy_config::AppConfig;

/// The bundled sample dataset.
pub const SAMPLE_DATASET: &str = include_str!("../../../../data/campus_knowledge.json");

pub fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("CampusBuddy — First-Time Setup");
    println!("==============================\n");

    let config_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(AppConfig::config_dir);
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("  Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    let config = if config_path.exists() {
        println!("  Config already exists at: {}", config_path.display());
        println!("  Edit it manually or delete and re-run onboard.");
        AppConfig::load_from(config_path).unwrap_or_default()
    } else {
        std::fs::write(config_path, AppConfig::default_toml())?;
        println!("  Created config.toml at: {}", config_path.display());
        AppConfig::default()
    };

    let dataset_path = config.knowledge.resolved_path();
    if dataset_path.exists() {
        println!("  Dataset already exists at: {}", dataset_path.display());
    } else {
        if let Some(parent) = dataset_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&dataset_path, SAMPLE_DATASET)?;
        println!("  Wrote sample dataset to: {}", dataset_path.display());
    }

    println!("\nNext steps:");
    println!("  campusbuddy doctor");
    println!("  campusbuddy chat");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusbuddy_core::record::KnowledgeBase;

    #[test]
    fn sample_dataset_covers_every_category() {
        let kb: KnowledgeBase = serde_json::from_str(SAMPLE_DATASET).unwrap();
        assert!(!kb.professors.is_empty());
        assert!(!kb.courses.is_empty());
        assert!(!kb.dining.is_empty());
        assert!(!kb.housing.is_empty());
        assert!(!kb.events.is_empty());
        assert!(!kb.organizations.is_empty());
        assert!(!kb.facilities.is_empty());
        assert!(!kb.news.is_empty());
    }
}
