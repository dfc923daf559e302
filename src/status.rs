// System status display: shows corpus directories, gold set, and model files.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::corpus::loader::{load_gold, load_topics};

/// Display system status to the terminal.
pub fn show(config: &Config) -> Result<()> {
    show_topic_dir("Data directory", &config.data_dir)?;
    show_topic_dir("Topics directory", &config.topics_dir)?;

    if config.gold_dir.is_dir() {
        let gold = load_gold(&config.gold_dir)?;
        let references: usize = gold.values().map(Vec::len).sum();
        println!(
            "Gold summaries: {} ({} topics, {} references)",
            config.gold_dir.display(),
            gold.len(),
            references
        );
    } else {
        println!("Gold summaries: {} (missing)", config.gold_dir.display());
    }

    let embed_dir = config.embedding_dir();
    if crate::embeddings::download::embedding_files_present(&config.model_dir) {
        let size = std::fs::metadata(embed_dir.join("model.onnx"))
            .map(|m| format_bytes(m.len()))
            .unwrap_or_else(|_| "unknown".to_string());
        println!("Embedding model: {} ({})", embed_dir.display(), size);
    } else {
        println!("Embedding model: not downloaded");
        println!("  Run `opinsum download-model` to enable BERTScore");
    }

    println!(
        "Defaults: summary size {}, MMR lambda {}",
        config.summary_size, config.mmr_lambda
    );

    Ok(())
}

fn show_topic_dir(label: &str, dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        println!("{label}: {} (missing)", dir.display());
        return Ok(());
    }
    let topics = load_topics(dir)?;
    let sentences: usize = topics.iter().map(|t| t.sentences.len()).sum();
    println!(
        "{label}: {} ({} topics, {} review sentences)",
        dir.display(),
        topics.len(),
        sentences
    );
    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
