// TF-IDF sentence scoring.
//
// Uses the `keyword_extraction` crate to score every word of a topic, treating
// each review sentence as a separate document: words that appear in nearly
// every review get downweighted, while words concentrated in a few reviews get
// boosted. A sentence's score is the mean score of its content words, so long
// rambling reviews don't win on length alone.

use anyhow::Result;
use keyword_extraction::tf_idf::{TfIdf, TfIdfParams};
use stop_words::{get, LANGUAGE};
use tracing::debug;

use super::traits::Summarizer;
use crate::corpus::text::{clean_bare, content_tokens};
use crate::corpus::Topic;

/// Extractive summarizer ranking sentences by mean TF-IDF word score.
pub struct TfIdfSummarizer {
    /// How many top sentences to return
    pub summary_size: usize,
}

impl Default for TfIdfSummarizer {
    fn default() -> Self {
        Self { summary_size: 2 }
    }
}

impl Summarizer for TfIdfSummarizer {
    fn name(&self) -> &'static str {
        "tfidf"
    }

    fn summarize(&self, topic: &Topic) -> Result<Vec<String>> {
        if topic.sentences.is_empty() {
            return Ok(Vec::new());
        }

        let scores = sentence_scores(&topic.sentences);
        let ranked = rank_descending(&scores);

        if let Some(&top) = ranked.first() {
            debug!(
                topic = %topic.name,
                top_score = scores[top],
                "Ranked sentences by TF-IDF"
            );
        }

        Ok(ranked
            .into_iter()
            .take(self.summary_size)
            .map(|i| topic.sentences[i].clone())
            .collect())
    }
}

/// Mean TF-IDF word score of each sentence (0.0 when it has no content words).
pub fn sentence_scores(sentences: &[String]) -> Vec<f64> {
    let cleaned: Vec<String> = sentences.iter().map(|s| clean_bare(s)).collect();

    let stop_words: Vec<String> = get(LANGUAGE::English);
    let params = TfIdfParams::UnprocessedDocuments(&cleaned, &stop_words, None);
    let tfidf = TfIdf::new(params);

    cleaned
        .iter()
        .map(|sentence| {
            let words = content_tokens(sentence);
            if words.is_empty() {
                return 0.0;
            }
            let total: f64 = words
                .iter()
                .map(|w| tfidf.get_score(w) as f64)
                .sum();
            total / words.len() as f64
        })
        .collect()
}

/// Indices sorted by score descending; equal scores keep input order.
pub fn rank_descending(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    order
}
