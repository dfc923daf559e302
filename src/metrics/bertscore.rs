// BERTScore: greedy matching of contextual token embeddings.
//
// Every candidate token is matched to its most similar reference token and
// vice versa:
//
//   P = mean over candidate tokens of max cosine to any reference token
//   R = mean over reference tokens of max cosine to any candidate token
//   F = 2PR / (P + R)
//
// No IDF weighting and no baseline rescaling. Embeddings come from the
// `TokenEmbedder` trait, so the model behind them is swappable.

use anyhow::Result;
use async_trait::async_trait;

use super::Prf;
use crate::summarize::vector::cosine;

/// Produces one contextual vector per content token of each input text.
/// Special tokens ([CLS], [SEP], padding) must already be excluded.
#[async_trait]
pub trait TokenEmbedder: Send + Sync {
    async fn embed_tokens(&self, texts: &[String]) -> Result<Vec<Vec<Vec<f64>>>>;
}

/// Greedy-match precision/recall between two token embedding sequences.
pub fn greedy_match(candidate: &[Vec<f64>], reference: &[Vec<f64>]) -> Prf {
    if candidate.is_empty() || reference.is_empty() {
        return Prf::default();
    }

    let best = |from: &[Vec<f64>], to: &[Vec<f64>]| -> f64 {
        let total: f64 = from
            .iter()
            .map(|a| {
                to.iter()
                    .map(|b| cosine(a, b))
                    .fold(f64::NEG_INFINITY, f64::max)
            })
            .sum();
        total / from.len() as f64
    };

    Prf::new(best(candidate, reference), best(reference, candidate))
}

/// Score many candidate/reference pairs, embedding them in one batch.
/// Returns one result per pair, in input order.
pub async fn score_pairs(
    embedder: &dyn TokenEmbedder,
    candidates: &[String],
    references: &[String],
) -> Result<Vec<Prf>> {
    if candidates.len() != references.len() {
        anyhow::bail!(
            "BERTScore needs one reference per candidate ({} candidates, {} references)",
            candidates.len(),
            references.len()
        );
    }

    let mut texts = Vec::with_capacity(candidates.len() * 2);
    texts.extend_from_slice(candidates);
    texts.extend_from_slice(references);

    let embedded = embedder.embed_tokens(&texts).await?;
    if embedded.len() != texts.len() {
        anyhow::bail!(
            "Embedder returned {} sequences for {} texts",
            embedded.len(),
            texts.len()
        );
    }

    let (cand_emb, ref_emb) = embedded.split_at(candidates.len());
    Ok(cand_emb
        .iter()
        .zip(ref_emb)
        .map(|(c, r)| greedy_match(c, r))
        .collect())
}
