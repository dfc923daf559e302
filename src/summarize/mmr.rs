// Maximal Marginal Relevance selection.
//
// Relevance is each sentence's cosine similarity to the TF-IDF centroid of its
// topic. Redundancy is its highest similarity to anything already picked.
// Each round picks the remaining sentence maximizing
//
//   lambda * relevance - (1 - lambda) * redundancy
//
// until the target count is reached or candidates run out. On equal scores the
// lowest remaining index wins.

use anyhow::Result;
use tracing::debug;

use super::traits::Summarizer;
use super::vector::TfIdfMatrix;
use crate::corpus::text::normalize_for_vectors;
use crate::corpus::Topic;

/// MMR summarizer over stemmed, stop-word-free TF-IDF sentence vectors.
pub struct MmrSummarizer {
    /// Number of sentences to select
    pub summary_size: usize,
    /// Relevance/redundancy trade-off: 1.0 is pure relevance
    pub lambda: f64,
}

impl Default for MmrSummarizer {
    fn default() -> Self {
        Self {
            summary_size: 2,
            lambda: 0.7,
        }
    }
}

impl Summarizer for MmrSummarizer {
    fn name(&self) -> &'static str {
        "mmr"
    }

    fn summarize(&self, topic: &Topic) -> Result<Vec<String>> {
        if !(0.0..=1.0).contains(&self.lambda) {
            anyhow::bail!("MMR lambda must be within [0, 1], got {}", self.lambda);
        }
        if topic.sentences.len() < self.summary_size {
            debug!(
                topic = %topic.name,
                found = topic.sentences.len(),
                expected = self.summary_size,
                "Fewer sentences than the summary size; selecting all"
            );
        }

        let normalized: Vec<String> = topic
            .sentences
            .iter()
            .map(|s| normalize_for_vectors(s))
            .collect();

        let matrix = TfIdfMatrix::fit(&normalized);
        let similarity = matrix.similarity_matrix();
        let relevance = matrix.centroid_relevance();

        let picked = select(&relevance, &similarity, self.summary_size, self.lambda);

        Ok(picked
            .into_iter()
            .map(|i| topic.sentences[i].clone())
            .collect())
    }
}

/// Greedy MMR over precomputed scores. Returns selected indices in pick order.
///
/// `similarity` must be square with side `relevance.len()`.
pub fn select(relevance: &[f64], similarity: &[Vec<f64>], k: usize, lambda: f64) -> Vec<usize> {
    let mut selected: Vec<usize> = Vec::with_capacity(k.min(relevance.len()));
    let mut remaining: Vec<usize> = (0..relevance.len()).collect();

    while selected.len() < k && !remaining.is_empty() {
        let mut best_pos = 0;
        let mut best_score = f64::NEG_INFINITY;

        for (pos, &idx) in remaining.iter().enumerate() {
            let score = marginal_relevance(idx, relevance, similarity, &selected, lambda);
            if score > best_score {
                best_score = score;
                best_pos = pos;
            }
        }

        selected.push(remaining.remove(best_pos));
    }

    selected
}

/// MMR score of candidate `idx` given the current selection.
pub fn marginal_relevance(
    idx: usize,
    relevance: &[f64],
    similarity: &[Vec<f64>],
    selected: &[usize],
    lambda: f64,
) -> f64 {
    let redundancy = selected
        .iter()
        .map(|&s| similarity[idx][s])
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
        .unwrap_or(0.0);
    lambda * relevance[idx] - (1.0 - lambda) * redundancy
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(n: usize) -> Vec<Vec<f64>> {
        (0..n)
            .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
            .collect()
    }

    #[test]
    fn test_first_pick_is_most_relevant() {
        let relevance = vec![0.2, 0.9, 0.5];
        let picked = select(&relevance, &identity(3), 1, 0.7);
        assert_eq!(picked, vec![1]);
    }

    #[test]
    fn test_ties_break_on_lowest_index() {
        let relevance = vec![0.5, 0.5, 0.5];
        let picked = select(&relevance, &identity(3), 3, 0.7);
        assert_eq!(picked, vec![0, 1, 2]);
    }

    #[test]
    fn test_redundancy_penalty_skips_near_duplicate() {
        // 0 and 1 are near-duplicates; 2 is less relevant but novel.
        let relevance = vec![0.9, 0.85, 0.6];
        let similarity = vec![
            vec![1.0, 0.95, 0.1],
            vec![0.95, 1.0, 0.1],
            vec![0.1, 0.1, 1.0],
        ];
        let picked = select(&relevance, &similarity, 2, 0.5);
        assert_eq!(picked, vec![0, 2]);
    }

    #[test]
    fn test_lambda_one_is_relevance_order() {
        let relevance = vec![0.1, 0.4, 0.3, 0.9];
        let similarity = vec![vec![1.0; 4]; 4];
        let picked = select(&relevance, &similarity, 4, 1.0);
        assert_eq!(picked, vec![3, 1, 2, 0]);
    }

    #[test]
    fn test_stops_when_candidates_exhausted() {
        let picked = select(&[0.3, 0.2], &identity(2), 5, 0.7);
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn test_zero_k_selects_nothing() {
        assert!(select(&[0.3], &identity(1), 0, 0.7).is_empty());
    }

    #[test]
    fn test_summarizer_returns_original_sentences() {
        let topic = Topic {
            name: "battery".to_string(),
            sentences: vec![
                "The battery life is excellent.".to_string(),
                "Battery life is excellent!".to_string(),
                "The screen scratches easily.".to_string(),
            ],
        };
        let summary = MmrSummarizer {
            summary_size: 2,
            lambda: 0.3,
        }
        .summarize(&topic)
        .unwrap();

        assert_eq!(summary.len(), 2);
        for s in &summary {
            assert!(topic.sentences.contains(s));
        }
        // Heavy redundancy penalty: both battery sentences never make it together
        assert!(summary.contains(&"The screen scratches easily.".to_string()));
    }

    #[test]
    fn test_rejects_lambda_out_of_range() {
        let topic = Topic {
            name: "t".to_string(),
            sentences: vec!["one sentence here".to_string()],
        };
        let result = MmrSummarizer {
            summary_size: 1,
            lambda: 1.5,
        }
        .summarize(&topic);
        assert!(result.is_err());
    }
}
