// LexRank: sentence centrality over an idf-modified-cosine similarity graph.
//
// IDF is learned once from the whole corpus (every review sentence of every
// topic is a document), then each topic is summarized independently:
//
//   1. similarity(x, y) = sum_w tf_x(w) tf_y(w) idf(w)^2
//                         / (|tf_x * idf| * |tf_y * idf|)
//   2. keep edges with similarity >= threshold (or use raw weights in
//      continuous mode); every sentence links to itself
//   3. row-normalize into a Markov matrix and take its stationary
//      distribution by power iteration
//   4. the most central sentences form the summary

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use tracing::debug;

use super::tfidf::rank_descending;
use super::traits::Summarizer;
use crate::corpus::text::{clean_line, content_tokens};
use crate::corpus::Topic;

const POWER_TOLERANCE: f64 = 1e-5;
const POWER_MAX_ITERATIONS: usize = 10_000;

/// LexRank summarizer with a corpus-wide IDF table.
pub struct LexRankSummarizer {
    idf: HashMap<String, f64>,
    /// IDF for words never seen while fitting: ln(N), as if seen once
    default_idf: f64,
    pub summary_size: usize,
    /// Minimum similarity for an edge in discrete mode
    pub threshold: f64,
    /// Use similarity values as edge weights instead of thresholding
    pub continuous: bool,
}

impl LexRankSummarizer {
    /// Learn IDF from every sentence of every topic.
    pub fn fit(topics: &[Topic]) -> Self {
        let documents = topics.iter().flat_map(|t| t.sentences.iter());

        let mut df: HashMap<String, usize> = HashMap::new();
        let mut n_docs = 0usize;
        for sentence in documents {
            n_docs += 1;
            let unique: HashSet<String> = content_tokens(&clean_line(sentence)).into_iter().collect();
            for word in unique {
                *df.entry(word).or_insert(0) += 1;
            }
        }

        let n = n_docs.max(1) as f64;
        let idf = df
            .into_iter()
            .map(|(word, count)| (word, (n / count as f64).ln()))
            .collect();

        debug!(documents = n_docs, "Fitted LexRank IDF");

        Self {
            idf,
            default_idf: n.ln(),
            summary_size: 2,
            threshold: 0.1,
            continuous: false,
        }
    }

    pub fn with_summary_size(mut self, summary_size: usize) -> Self {
        self.summary_size = summary_size;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_continuous(mut self, continuous: bool) -> Self {
        self.continuous = continuous;
        self
    }

    fn idf_of(&self, word: &str) -> f64 {
        self.idf.get(word).copied().unwrap_or(self.default_idf)
    }

    /// Idf-modified cosine between two bag-of-words term-frequency maps.
    pub fn similarity(&self, a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
        let mut numerator = 0.0;
        for (word, tf_a) in a {
            if let Some(tf_b) = b.get(word) {
                let idf = self.idf_of(word);
                numerator += tf_a * tf_b * idf * idf;
            }
        }

        let norm = |tf: &HashMap<String, f64>| {
            tf.iter()
                .map(|(w, f)| {
                    let x = f * self.idf_of(w);
                    x * x
                })
                .sum::<f64>()
                .sqrt()
        };

        let denom = norm(a) * norm(b);
        if denom < f64::EPSILON {
            0.0
        } else {
            numerator / denom
        }
    }

    /// Stationary-distribution centrality of each sentence (sums to 1.0).
    pub fn centrality(&self, sentences: &[String]) -> Vec<f64> {
        let bags: Vec<HashMap<String, f64>> = sentences
            .iter()
            .map(|s| term_frequencies(&content_tokens(&clean_line(s))))
            .collect();

        let n = bags.len();
        let mut weights = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                let w = if i == j {
                    1.0
                } else {
                    let sim = self.similarity(&bags[i], &bags[j]);
                    if self.continuous {
                        sim
                    } else if sim >= self.threshold {
                        1.0
                    } else {
                        0.0
                    }
                };
                weights[i][j] = w;
            }
        }

        stationary_distribution(&markov_matrix(weights))
    }
}

impl Summarizer for LexRankSummarizer {
    fn name(&self) -> &'static str {
        "lexrank"
    }

    fn summarize(&self, topic: &Topic) -> Result<Vec<String>> {
        if topic.sentences.is_empty() {
            return Ok(Vec::new());
        }

        let scores = self.centrality(&topic.sentences);
        Ok(rank_descending(&scores)
            .into_iter()
            .take(self.summary_size)
            .map(|i| topic.sentences[i].clone())
            .collect())
    }
}

fn term_frequencies(tokens: &[String]) -> HashMap<String, f64> {
    let mut tf = HashMap::new();
    for t in tokens {
        *tf.entry(t.clone()).or_insert(0.0) += 1.0;
    }
    tf
}

/// Scale every row to sum to 1.0. Rows summing to zero are left as-is.
pub fn markov_matrix(mut weights: Vec<Vec<f64>>) -> Vec<Vec<f64>> {
    for row in &mut weights {
        let sum: f64 = row.iter().sum();
        if sum > 0.0 {
            for w in row.iter_mut() {
                *w /= sum;
            }
        }
    }
    weights
}

/// Stationary distribution of a row-stochastic matrix by power iteration,
/// starting from the uniform distribution.
pub fn stationary_distribution(transition: &[Vec<f64>]) -> Vec<f64> {
    let n = transition.len();
    if n == 0 {
        return Vec::new();
    }

    let mut p = vec![1.0 / n as f64; n];
    for _ in 0..POWER_MAX_ITERATIONS {
        let mut next = vec![0.0; n];
        for (i, row) in transition.iter().enumerate() {
            for (j, t) in row.iter().enumerate() {
                next[j] += p[i] * t;
            }
        }

        let total: f64 = next.iter().sum();
        if total > 0.0 {
            for v in &mut next {
                *v /= total;
            }
        }

        let delta: f64 = next.iter().zip(&p).map(|(a, b)| (a - b).abs()).sum();
        p = next;
        if delta < POWER_TOLERANCE {
            break;
        }
    }
    p
}
