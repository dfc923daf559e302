// Summary quality metrics: ROUGE variants, METEOR, BERTScore, readability.

pub mod bertscore;
pub mod meteor;
pub mod readability;
pub mod rouge;

use serde::{Deserialize, Serialize};

/// Precision, recall, and their harmonic mean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Prf {
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
}

impl Prf {
    pub fn new(precision: f64, recall: f64) -> Self {
        Self {
            precision,
            recall,
            fmeasure: f_measure(precision, recall),
        }
    }

    /// Precision/recall from a match count and the two totals. Empty sides
    /// score 0.0 rather than dividing by zero.
    pub fn from_counts(matches: f64, candidate_total: f64, reference_total: f64) -> Self {
        let precision = if candidate_total > 0.0 {
            matches / candidate_total
        } else {
            0.0
        };
        let recall = if reference_total > 0.0 {
            matches / reference_total
        } else {
            0.0
        };
        Self::new(precision, recall)
    }

    /// Component-wise mean; zero for an empty slice.
    pub fn mean(scores: &[Prf]) -> Prf {
        if scores.is_empty() {
            return Prf::default();
        }
        let n = scores.len() as f64;
        Prf {
            precision: scores.iter().map(|s| s.precision).sum::<f64>() / n,
            recall: scores.iter().map(|s| s.recall).sum::<f64>() / n,
            fmeasure: scores.iter().map(|s| s.fmeasure).sum::<f64>() / n,
        }
    }
}

/// Harmonic mean of precision and recall, 0.0 when both are zero.
pub fn f_measure(precision: f64, recall: f64) -> f64 {
    if precision + recall <= 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Mean of a slice of scalars; zero for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// How a topic's multiple gold references are combined into one score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceMode {
    /// Score against the first reference only
    First,
    /// Keep the reference with the best F-measure
    Best,
    /// Average over all references
    Average,
}

impl ReferenceMode {
    /// Combine per-reference scores according to the mode.
    pub fn combine(&self, per_reference: &[Prf]) -> Prf {
        match self {
            ReferenceMode::First => per_reference.first().copied().unwrap_or_default(),
            ReferenceMode::Best => per_reference
                .iter()
                .copied()
                .fold(None, |best: Option<Prf>, s| match best {
                    Some(b) if b.fmeasure >= s.fmeasure => Some(b),
                    _ => Some(s),
                })
                .unwrap_or_default(),
            ReferenceMode::Average => Prf::mean(per_reference),
        }
    }

    /// References this mode actually needs to score.
    pub fn select<'a>(&self, references: &'a [String]) -> &'a [String] {
        match self {
            ReferenceMode::First => &references[..references.len().min(1)],
            ReferenceMode::Best | ReferenceMode::Average => references,
        }
    }
}
