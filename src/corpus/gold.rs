// Quantitative overview of the human-written gold summaries: how many there
// are and how long they run on average.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::loader::gold_paths;

/// Aggregate length statistics over every `*.gold` file.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GoldStats {
    pub total_summaries: usize,
    pub total_words: usize,
    /// `None` when no gold files were found
    pub average_words: Option<f64>,
}

/// Count gold summaries and their whitespace-separated words.
pub fn analyze(gold_dir: &Path) -> Result<GoldStats> {
    let mut total_words = 0;
    let mut total_summaries = 0;

    for path in gold_paths(gold_dir)? {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        total_words += text.split_whitespace().count();
        total_summaries += 1;
    }

    let average_words = if total_summaries == 0 {
        None
    } else {
        Some(total_words as f64 / total_summaries as f64)
    };

    Ok(GoldStats {
        total_summaries,
        total_words,
        average_words,
    })
}
