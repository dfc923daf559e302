// Summarization strategies: TF-IDF scoring, LexRank, MMR, word-graph paths.

pub mod graph;
pub mod lexrank;
pub mod mmr;
pub mod tfidf;
pub mod traits;
pub mod vector;

use std::fmt;

use serde::{Deserialize, Serialize};

/// The available summarization strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    TfIdf,
    LexRank,
    Mmr,
    Graph,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::TfIdf => "tfidf",
            Strategy::LexRank => "lexrank",
            Strategy::Mmr => "mmr",
            Strategy::Graph => "graph",
        }
    }

    /// Whether the strategy reads the full `data/` set by default rather than
    /// the reduced `topics/` set.
    pub fn uses_full_dataset(&self) -> bool {
        matches!(self, Strategy::TfIdf | Strategy::Graph)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
