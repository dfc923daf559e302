// METEOR: unigram alignment with a fragmentation penalty.
//
// Alignment runs in stages over the words still unmatched: exact surface
// match first, then Snowball-stem match. Each stage walks both sequences from
// the end, so repeated words pair with their last occurrences first. The
// aligned pairs are then grouped into chunks (runs that are contiguous in both
// the hypothesis and the reference); fewer chunks means better word order.
//
//   fmean   = P * R / (alpha * P + (1 - alpha) * R)
//   penalty = gamma * (chunks / matches) ^ beta
//   score   = fmean * (1 - penalty)

use rust_stemmers::{Algorithm, Stemmer};
use unicode_segmentation::UnicodeSegmentation;

/// METEOR parameters.
#[derive(Debug, Clone, Copy)]
pub struct MeteorParams {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl Default for MeteorParams {
    fn default() -> Self {
        Self {
            alpha: 0.9,
            beta: 3.0,
            gamma: 0.5,
        }
    }
}

/// Lowercased word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.unicode_words().map(|w| w.to_lowercase()).collect()
}

/// METEOR of a hypothesis against a single reference, both pre-tokenized.
pub fn single_meteor_score(reference: &[String], hypothesis: &[String], params: &MeteorParams) -> f64 {
    let matches = align(hypothesis, reference);
    let matched = matches.len() as f64;
    if matched == 0.0 {
        return 0.0;
    }

    let precision = matched / hypothesis.len() as f64;
    let recall = matched / reference.len() as f64;
    let fmean = precision * recall / (params.alpha * precision + (1.0 - params.alpha) * recall);

    let chunks = count_chunks(&matches) as f64;
    let penalty = params.gamma * (chunks / matched).powf(params.beta);

    fmean * (1.0 - penalty)
}

/// Best METEOR over several references; 0.0 when there are none.
pub fn meteor_score(references: &[String], hypothesis: &str, params: &MeteorParams) -> f64 {
    let hyp = tokenize(hypothesis);
    references
        .iter()
        .map(|r| single_meteor_score(&tokenize(r), &hyp, params))
        .fold(0.0, f64::max)
}

/// Align hypothesis and reference words. Returns `(hyp_idx, ref_idx)` pairs
/// sorted by hypothesis index.
pub fn align(hypothesis: &[String], reference: &[String]) -> Vec<(usize, usize)> {
    let mut hyp: Vec<(usize, String)> = hypothesis.iter().cloned().enumerate().collect();
    let mut refs: Vec<(usize, String)> = reference.iter().cloned().enumerate().collect();

    let mut matches = match_stage(&mut hyp, &mut refs);

    let stemmer = Stemmer::create(Algorithm::English);
    let mut hyp_stems: Vec<(usize, String)> = hyp
        .iter()
        .map(|(i, w)| (*i, stemmer.stem(w).into_owned()))
        .collect();
    let mut ref_stems: Vec<(usize, String)> = refs
        .iter()
        .map(|(i, w)| (*i, stemmer.stem(w).into_owned()))
        .collect();
    matches.extend(match_stage(&mut hyp_stems, &mut ref_stems));

    matches.sort_by_key(|&(h, _)| h);
    matches
}

/// Greedily pair equal words, scanning both lists from the end, and remove
/// the paired entries.
fn match_stage(hyp: &mut Vec<(usize, String)>, refs: &mut Vec<(usize, String)>) -> Vec<(usize, usize)> {
    let mut matches = Vec::new();
    let mut i = hyp.len();
    while i > 0 {
        i -= 1;
        if let Some(j) = refs.iter().rposition(|(_, w)| *w == hyp[i].1) {
            matches.push((hyp[i].0, refs[j].0));
            hyp.remove(i);
            refs.remove(j);
        }
    }
    matches
}

/// Number of runs of matches contiguous in both sequences.
pub fn count_chunks(matches: &[(usize, usize)]) -> usize {
    if matches.is_empty() {
        return 0;
    }
    let mut chunks = 1;
    for pair in matches.windows(2) {
        let (h0, r0) = pair[0];
        let (h1, r1) = pair[1];
        if !(h1 == h0 + 1 && r1 == r0 + 1) {
            chunks += 1;
        }
    }
    chunks
}
