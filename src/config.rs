use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// value has a default matching the dataset's conventional layout, and the
/// CLI flags override whatever is configured here.
pub struct Config {
    /// Directory holding the full Opinosis `*.txt.data` topic files
    pub data_dir: PathBuf,
    /// Directory holding the reduced topic set used by LexRank and MMR runs
    pub topics_dir: PathBuf,
    /// Directory with one subdirectory of `*.gold` files per topic
    pub gold_dir: PathBuf,
    /// Directory containing the ONNX embedding model files
    pub model_dir: PathBuf,
    /// Default number of sentences per generated summary
    pub summary_size: usize,
    /// Default MMR relevance/redundancy trade-off
    pub mmr_lambda: f64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to defaults; set-but-unparseable numeric
    /// variables are an error rather than being silently ignored.
    pub fn load() -> Result<Self> {
        let model_dir = env::var("OPINSUM_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::embeddings::download::default_model_dir());

        Ok(Self {
            data_dir: path_var("OPINSUM_DATA_DIR", "data"),
            topics_dir: path_var("OPINSUM_TOPICS_DIR", "topics"),
            gold_dir: path_var("OPINSUM_GOLD_DIR", "summaries-gold"),
            model_dir,
            summary_size: parse_var("OPINSUM_SUMMARY_SIZE", 2)?,
            mmr_lambda: parse_var("OPINSUM_MMR_LAMBDA", 0.7)?,
        })
    }

    /// Directory of the sentence-transformer model used for BERTScore.
    pub fn embedding_dir(&self) -> PathBuf {
        crate::embeddings::download::embedding_model_dir(&self.model_dir)
    }

    /// Check that the embedding model has been downloaded.
    /// Call this before any operation that needs BERTScore.
    pub fn require_model(&self) -> Result<()> {
        if !crate::embeddings::download::embedding_files_present(&self.model_dir) {
            anyhow::bail!(
                "Embedding model files not found in {}\n\
                 Run `opinsum download-model` to download them.\n\
                 Or set OPINSUM_MODEL_DIR to a directory that already has them.",
                self.embedding_dir().display()
            );
        }
        Ok(())
    }
}

fn path_var(name: &str, default: &str) -> PathBuf {
    env::var(name)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a number, got {raw:?}")),
        Err(_) => Ok(default),
    }
}
