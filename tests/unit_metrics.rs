// Unit tests for the summary quality metrics.
//
// BERTScore runs against a deterministic in-memory embedder so no model
// download is needed.

use anyhow::Result;
use async_trait::async_trait;

use opinsum::metrics::bertscore::{greedy_match, score_pairs, TokenEmbedder};
use opinsum::metrics::meteor::{
    align, count_chunks, meteor_score, single_meteor_score, tokenize, MeteorParams,
};
use opinsum::metrics::readability::{flesch_reading_ease, syllable_count};
use opinsum::metrics::rouge::{
    lcs_length, rouge_l, rouge_n, rouge_s, rouge_su, rouge_w, RougeScorer, ROUGE_W_WEIGHT,
};
use opinsum::metrics::{Prf, ReferenceMode};

fn words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

// ============================================================
// ROUGE
// ============================================================

#[test]
fn rouge_identical_disjoint_and_empty() {
    let scorer = RougeScorer::default();
    let same = scorer.score("the battery dies quickly", "the battery dies quickly");
    assert!((same.rouge1.fmeasure - 1.0).abs() < 1e-12);
    assert!((same.rouge2.fmeasure - 1.0).abs() < 1e-12);
    assert!((same.rouge_l.fmeasure - 1.0).abs() < 1e-12);
    assert!((same.rouge_su4.fmeasure - 1.0).abs() < 1e-12);

    let disjoint = scorer.score("screen sharp", "battery dies");
    assert_eq!(disjoint.rouge1.fmeasure, 0.0);

    let empty = scorer.score("", "battery dies");
    assert_eq!(empty.rouge1, Prf::default());
}

#[test]
fn rouge_tokenizer_stems_and_splits_punctuation() {
    let scorer = RougeScorer::default();
    assert_eq!(scorer.tokenize("Batteries, DIE!"), vec!["batteri", "die"]);
    // Three-letter tokens are not stemmed
    assert_eq!(RougeScorer::new(true).tokenize("ran"), vec!["ran"]);
    assert_eq!(RougeScorer::new(false).tokenize("Batteries"), vec!["batteries"]);
}

#[test]
fn rouge_l_uses_in_order_matches() {
    let s = rouge_l(&words("battery dies screen sharp"), &words("screen battery sharp"));
    // LCS "battery sharp" or "screen sharp": length 2
    assert!((s.precision - 0.5).abs() < 1e-12);
    assert!((s.recall - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(rouge_n(&words("battery"), &words("battery"), 2), Prf::default());
}

#[test]
fn lcs_and_rouge_w() {
    assert_eq!(lcs_length(&words("a b c d"), &words("a c d")), 3);
    let identical = rouge_w(&words("a b c"), &words("a b c"), ROUGE_W_WEIGHT);
    assert!((identical.fmeasure - 1.0).abs() < 1e-9);
    // Consecutive matches beat scattered ones
    let consecutive = rouge_w(&words("a b x y"), &words("a b c d"), ROUGE_W_WEIGHT);
    let scattered = rouge_w(&words("a x b y"), &words("a c b d"), ROUGE_W_WEIGHT);
    assert!(consecutive.recall > scattered.recall);
}

#[test]
fn skip_bigrams_respect_gap() {
    let gap0 = rouge_su(&words("a x b"), &words("a b"), 0);
    let gap4 = rouge_su(&words("a x b"), &words("a b"), 4);
    assert!(gap4.precision > gap0.precision);
}

#[test]
fn rouge_s_ignores_unigrams() {
    // No shared pair, but every word is shared
    let s = rouge_s(&words("b a"), &words("a b"), 4);
    assert_eq!(s.fmeasure, 0.0);
    let su = rouge_su(&words("b a"), &words("a b"), 4);
    assert!((su.precision - 2.0 / 3.0).abs() < 1e-12);

    let same = rouge_s(&words("battery dies fast"), &words("battery dies fast"), 4);
    assert!((same.fmeasure - 1.0).abs() < 1e-12);
    assert_eq!(rouge_s(&words("battery"), &words("battery"), 4), Prf::default());

    let scorer = RougeScorer::default();
    let suite = scorer.score("the battery dies quickly", "the battery dies quickly");
    assert!((suite.rouge_s4.fmeasure - 1.0).abs() < 1e-12);
}

#[test]
fn reference_modes_combine() {
    let scores = [Prf::new(0.2, 0.2), Prf::new(0.8, 0.8)];
    assert_eq!(ReferenceMode::First.combine(&scores), scores[0]);
    assert_eq!(ReferenceMode::Best.combine(&scores), scores[1]);
    assert!((ReferenceMode::Average.combine(&scores).fmeasure - 0.5).abs() < 1e-12);
    assert_eq!(ReferenceMode::Best.combine(&[]), Prf::default());

    let refs = vec!["a".to_string(), "b".to_string()];
    assert_eq!(ReferenceMode::First.select(&refs).len(), 1);
    assert_eq!(ReferenceMode::Average.select(&refs).len(), 2);
}

// ============================================================
// METEOR
// ============================================================

#[test]
fn meteor_identical_approaches_one() {
    let t = tokenize("battery charger screen");
    let score = single_meteor_score(&t, &t, &MeteorParams::default());
    let expected = 1.0 - 0.5 * (1.0f64 / 3.0).powi(3);
    assert!((score - expected).abs() < 1e-9);
}

#[test]
fn meteor_stem_stage_matches_inflections() {
    let hyp = tokenize("batteries charging");
    let reference = tokenize("battery charged");
    let matches = align(&hyp, &reference);
    assert_eq!(matches, vec![(0, 0), (1, 1)]);
    assert_eq!(count_chunks(&matches), 1);
}

#[test]
fn meteor_word_order_raises_penalty() {
    let reference = tokenize("battery charger screen resolution");
    let params = MeteorParams::default();
    let ordered = single_meteor_score(
        &reference,
        &tokenize("battery charger screen resolution"),
        &params,
    );
    let shuffled = single_meteor_score(
        &reference,
        &tokenize("resolution screen charger battery"),
        &params,
    );
    assert!(ordered > shuffled);
}

#[test]
fn meteor_multi_reference_takes_max() {
    let refs = vec!["screen resolution".to_string(), "battery charger".to_string()];
    let multi = meteor_score(&refs, "battery charger", &MeteorParams::default());
    let single = meteor_score(&refs[1..], "battery charger", &MeteorParams::default());
    assert_eq!(multi, single);
    assert_eq!(meteor_score(&[], "battery", &MeteorParams::default()), 0.0);
}

// ============================================================
// Readability
// ============================================================

#[test]
fn flesch_prefers_short_words() {
    let simple = flesch_reading_ease("The cat sat on the mat.");
    let hard = flesch_reading_ease("Extraordinary manufacturing inconsistencies predominate.");
    assert!(simple > hard);
    assert_eq!(syllable_count("battery"), 3);
}

// ============================================================
// BERTScore
// ============================================================

/// One-hot vector per word keyed on its first letter.
struct LetterEmbedder;

#[async_trait]
impl TokenEmbedder for LetterEmbedder {
    async fn embed_tokens(&self, texts: &[String]) -> Result<Vec<Vec<Vec<f64>>>> {
        Ok(texts
            .iter()
            .map(|t| {
                t.split_whitespace()
                    .map(|w| {
                        let mut v = vec![0.0; 26];
                        let first = w.bytes().next().unwrap_or(b'a').to_ascii_lowercase();
                        let idx = first.wrapping_sub(b'a') as usize % 26;
                        v[idx] = 1.0;
                        v
                    })
                    .collect()
            })
            .collect())
    }
}

struct BrokenEmbedder;

#[async_trait]
impl TokenEmbedder for BrokenEmbedder {
    async fn embed_tokens(&self, _texts: &[String]) -> Result<Vec<Vec<Vec<f64>>>> {
        anyhow::bail!("model unavailable")
    }
}

#[tokio::test]
async fn bertscore_identical_texts_score_one() {
    let text = vec!["battery charger".to_string()];
    let scores = score_pairs(&LetterEmbedder, &text, &text).await.unwrap();
    assert_eq!(scores.len(), 1);
    assert!((scores[0].fmeasure - 1.0).abs() < 1e-12);
}

#[tokio::test]
async fn bertscore_partial_overlap() {
    let candidates = vec!["battery".to_string()];
    let references = vec!["battery screen".to_string()];
    let scores = score_pairs(&LetterEmbedder, &candidates, &references).await.unwrap();
    assert!((scores[0].precision - 1.0).abs() < 1e-12);
    assert!((scores[0].recall - 0.5).abs() < 1e-12);
}

#[tokio::test]
async fn bertscore_length_mismatch_and_embedder_errors() {
    let one = vec!["battery".to_string()];
    assert!(score_pairs(&LetterEmbedder, &one, &[]).await.is_err());
    assert!(score_pairs(&BrokenEmbedder, &one, &one).await.is_err());
}

#[test]
fn greedy_match_orthogonal_tokens_score_zero() {
    let s = greedy_match(&[vec![1.0, 0.0]], &[vec![0.0, 1.0]]);
    assert_eq!(s.fmeasure, 0.0);
}
