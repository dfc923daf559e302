// ROUGE: n-gram, longest-common-subsequence, and skip-bigram overlap between a
// candidate summary and a reference.
//
// Tokenization lowercases, turns every non-alphanumeric run into a space, and
// stems tokens longer than three characters. Counts are clipped: a candidate
// n-gram only matches as many times as it occurs in the reference.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex_lite::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};

use super::Prf;

static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Weight exponent for ROUGE-W.
pub const ROUGE_W_WEIGHT: f64 = 1.2;

/// Every ROUGE variant reported by the evaluation jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RougeSuite {
    pub rouge1: Prf,
    pub rouge2: Prf,
    pub rouge4: Prf,
    pub rouge_l: Prf,
    pub rouge_w: Prf,
    pub rouge_s4: Prf,
    pub rouge_su4: Prf,
}

impl RougeSuite {
    pub fn mean(suites: &[RougeSuite]) -> RougeSuite {
        let pick = |f: fn(&RougeSuite) -> Prf| -> Prf {
            Prf::mean(&suites.iter().map(f).collect::<Vec<_>>())
        };
        RougeSuite {
            rouge1: pick(|s| s.rouge1),
            rouge2: pick(|s| s.rouge2),
            rouge4: pick(|s| s.rouge4),
            rouge_l: pick(|s| s.rouge_l),
            rouge_w: pick(|s| s.rouge_w),
            rouge_s4: pick(|s| s.rouge_s4),
            rouge_su4: pick(|s| s.rouge_su4),
        }
    }
}

/// Tokenizes text and computes ROUGE variants.
pub struct RougeScorer {
    stemmer: Option<Stemmer>,
}

impl Default for RougeScorer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl RougeScorer {
    pub fn new(use_stemmer: bool) -> Self {
        Self {
            stemmer: use_stemmer.then(|| Stemmer::create(Algorithm::English)),
        }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let spaced = NON_ALNUM.replace_all(&lower, " ");
        spaced
            .split_whitespace()
            .map(|t| match &self.stemmer {
                Some(stemmer) if t.len() > 3 => stemmer.stem(t).into_owned(),
                _ => t.to_string(),
            })
            .collect()
    }

    /// All variants for one candidate/reference pair.
    pub fn score(&self, candidate: &str, reference: &str) -> RougeSuite {
        let c = self.tokenize(candidate);
        let r = self.tokenize(reference);
        RougeSuite {
            rouge1: rouge_n(&c, &r, 1),
            rouge2: rouge_n(&c, &r, 2),
            rouge4: rouge_n(&c, &r, 4),
            rouge_l: rouge_l(&c, &r),
            rouge_w: rouge_w(&c, &r, ROUGE_W_WEIGHT),
            rouge_s4: rouge_s(&c, &r, 4),
            rouge_su4: rouge_su(&c, &r, 4),
        }
    }
}

fn ngram_counts(tokens: &[String], n: usize) -> HashMap<Vec<&str>, usize> {
    let mut counts = HashMap::new();
    if n == 0 || tokens.len() < n {
        return counts;
    }
    for window in tokens.windows(n) {
        let gram: Vec<&str> = window.iter().map(String::as_str).collect();
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

fn clipped_overlap(candidate: &HashMap<Vec<&str>, usize>, reference: &HashMap<Vec<&str>, usize>) -> usize {
    candidate
        .iter()
        .map(|(gram, &c)| c.min(reference.get(gram).copied().unwrap_or(0)))
        .sum()
}

fn total(counts: &HashMap<Vec<&str>, usize>) -> usize {
    counts.values().sum()
}

/// ROUGE-N over pre-tokenized text.
pub fn rouge_n(candidate: &[String], reference: &[String], n: usize) -> Prf {
    let c = ngram_counts(candidate, n);
    let r = ngram_counts(reference, n);
    Prf::from_counts(clipped_overlap(&c, &r) as f64, total(&c) as f64, total(&r) as f64)
}

/// Length of the longest common subsequence.
pub fn lcs_length(a: &[String], b: &[String]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Sentence-level ROUGE-L.
pub fn rouge_l(candidate: &[String], reference: &[String]) -> Prf {
    let lcs = lcs_length(candidate, reference) as f64;
    Prf::from_counts(lcs, candidate.len() as f64, reference.len() as f64)
}

/// Weighted LCS (ROUGE-W): consecutive matches count more, by `k^weight`.
pub fn rouge_w(candidate: &[String], reference: &[String], weight: f64) -> Prf {
    if candidate.is_empty() || reference.is_empty() {
        return Prf::default();
    }

    let f = |k: f64| k.powf(weight);
    let f_inv = |x: f64| x.powf(1.0 / weight);

    let (m, n) = (reference.len(), candidate.len());
    let mut c = vec![vec![0.0f64; n + 1]; m + 1];
    let mut w = vec![vec![0usize; n + 1]; m + 1];

    for i in 1..=m {
        for j in 1..=n {
            if reference[i - 1] == candidate[j - 1] {
                let k = w[i - 1][j - 1] as f64;
                c[i][j] = c[i - 1][j - 1] + f(k + 1.0) - f(k);
                w[i][j] = w[i - 1][j - 1] + 1;
            } else if c[i - 1][j] > c[i][j - 1] {
                c[i][j] = c[i - 1][j];
            } else {
                c[i][j] = c[i][j - 1];
            }
        }
    }

    let wlcs = c[m][n];
    let recall = f_inv(wlcs / f(m as f64));
    let precision = f_inv(wlcs / f(n as f64));
    Prf::new(precision, recall)
}

/// Skip-bigrams with at most `max_gap` words between the pair.
fn skip_bigram_counts(tokens: &[String], max_gap: usize) -> HashMap<Vec<&str>, usize> {
    let mut counts = HashMap::new();
    for i in 0..tokens.len() {
        let last = (i + max_gap + 1).min(tokens.len().saturating_sub(1));
        for j in (i + 1)..=last {
            if j >= tokens.len() {
                break;
            }
            let gram = vec![tokens[i].as_str(), tokens[j].as_str()];
            *counts.entry(gram).or_insert(0) += 1;
        }
    }
    counts
}

/// ROUGE-S: skip-bigram overlap only, with the given maximum skip distance.
pub fn rouge_s(candidate: &[String], reference: &[String], max_gap: usize) -> Prf {
    let c = skip_bigram_counts(candidate, max_gap);
    let r = skip_bigram_counts(reference, max_gap);
    Prf::from_counts(clipped_overlap(&c, &r) as f64, total(&c) as f64, total(&r) as f64)
}

/// ROUGE-SU: skip-bigrams plus unigrams (SU4 = gap 4).
pub fn rouge_su(candidate: &[String], reference: &[String], max_gap: usize) -> Prf {
    let mut c = skip_bigram_counts(candidate, max_gap);
    c.extend(ngram_counts(candidate, 1));
    let mut r = skip_bigram_counts(reference, max_gap);
    r.extend(ngram_counts(reference, 1));
    Prf::from_counts(clipped_overlap(&c, &r) as f64, total(&c) as f64, total(&r) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_tokenize_lowercases_and_stems() {
        let scorer = RougeScorer::new(true);
        assert_eq!(
            scorer.tokenize("The Batteries, running!"),
            vec!["the", "batteri", "run"]
        );
    }

    #[test]
    fn test_tokenize_without_stemmer() {
        let scorer = RougeScorer::new(false);
        assert_eq!(scorer.tokenize("Running-fast"), vec!["running", "fast"]);
    }

    #[test]
    fn test_rouge_n_clips_counts() {
        // "the the the" vs "the cat": only one "the" matches
        let s = rouge_n(&toks("the the the"), &toks("the cat"), 1);
        assert!((s.precision - 1.0 / 3.0).abs() < 1e-12);
        assert!((s.recall - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_rouge_2_partial() {
        let s = rouge_n(&toks("a b c"), &toks("a b d"), 2);
        assert!((s.precision - 0.5).abs() < 1e-12);
        assert!((s.recall - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_rouge_n_too_short() {
        assert_eq!(rouge_n(&toks("a b"), &toks("a b"), 4), Prf::default());
    }

    #[test]
    fn test_lcs_length() {
        assert_eq!(lcs_length(&toks("a b c d"), &toks("a c d e")), 3);
        assert_eq!(lcs_length(&toks(""), &toks("a")), 0);
    }

    #[test]
    fn test_rouge_l() {
        let s = rouge_l(&toks("a b c d"), &toks("a c d e f"));
        assert!((s.precision - 0.75).abs() < 1e-12);
        assert!((s.recall - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_rouge_w_identical_is_one() {
        let t = toks("the screen is bright");
        let s = rouge_w(&t, &t, ROUGE_W_WEIGHT);
        assert!((s.fmeasure - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rouge_w_rewards_consecutive_matches() {
        let reference = toks("a b c d");
        let consecutive = rouge_w(&toks("a b x x"), &reference, ROUGE_W_WEIGHT);
        let scattered = rouge_w(&toks("a x b x"), &reference, ROUGE_W_WEIGHT);
        assert!(consecutive.recall > scattered.recall);
    }

    #[test]
    fn test_skip_bigram_counts_respect_gap() {
        let t = toks("a b c");
        let counts = skip_bigram_counts(&t, 0);
        // 2 adjacent bigrams
        assert_eq!(total(&counts), 2);
        let counts = skip_bigram_counts(&t, 4);
        // a-b, a-c, b-c
        assert_eq!(total(&counts), 3);
    }

    #[test]
    fn test_rouge_su4_identical() {
        let t = toks("battery life is great for travel");
        let s = rouge_su(&t, &t, 4);
        assert!((s.fmeasure - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_score_suite_disjoint() {
        let suite = RougeScorer::default().score("screen bright", "battery weak");
        assert_eq!(suite.rouge1.fmeasure, 0.0);
        assert_eq!(suite.rouge_l.fmeasure, 0.0);
        assert_eq!(suite.rouge_su4.fmeasure, 0.0);
    }
}
