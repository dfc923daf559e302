// Sentence vector space: TF-IDF rows with smoothed IDF and L2 normalization.
//
// Each preprocessed sentence is a document. Terms are words of two or more
// characters. Weights are raw term counts times `ln((1 + n) / (1 + df)) + 1`,
// and every row is scaled to unit length so cosine similarity reduces to a dot
// product for non-empty rows.

use std::collections::BTreeMap;

use unicode_segmentation::UnicodeSegmentation;

/// Dense TF-IDF matrix, one row per input sentence.
#[derive(Debug, Clone)]
pub struct TfIdfMatrix {
    /// Term -> column index, columns in lexicographic term order
    pub vocabulary: BTreeMap<String, usize>,
    pub rows: Vec<Vec<f64>>,
}

impl TfIdfMatrix {
    /// Fit the vocabulary and IDF on `documents` and transform them.
    pub fn fit(documents: &[String]) -> Self {
        let tokenized: Vec<Vec<&str>> = documents.iter().map(|d| terms(d)).collect();

        let mut vocabulary: BTreeMap<String, usize> = BTreeMap::new();
        for doc in &tokenized {
            for term in doc {
                vocabulary.entry((*term).to_string()).or_insert(0);
            }
        }
        for (col, idx) in vocabulary.values_mut().enumerate() {
            *idx = col;
        }

        let n_terms = vocabulary.len();
        let n_docs = documents.len() as f64;

        let mut df = vec![0usize; n_terms];
        let mut counts: Vec<Vec<f64>> = Vec::with_capacity(tokenized.len());
        for doc in &tokenized {
            let mut row = vec![0.0; n_terms];
            for term in doc {
                row[vocabulary[*term]] += 1.0;
            }
            for (col, &c) in row.iter().enumerate() {
                if c > 0.0 {
                    df[col] += 1;
                }
            }
            counts.push(row);
        }

        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n_docs) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let rows = counts
            .into_iter()
            .map(|mut row| {
                for (col, value) in row.iter_mut().enumerate() {
                    *value *= idf[col];
                }
                l2_normalize(&mut row);
                row
            })
            .collect();

        Self { vocabulary, rows }
    }

    /// Pairwise cosine similarity between all rows.
    pub fn similarity_matrix(&self) -> Vec<Vec<f64>> {
        self.rows
            .iter()
            .map(|a| self.rows.iter().map(|b| cosine(a, b)).collect())
            .collect()
    }

    /// Column-wise mean of all rows: a synthetic "average sentence".
    pub fn centroid(&self) -> Vec<f64> {
        let n_terms = self.vocabulary.len();
        let mut mean = vec![0.0; n_terms];
        if self.rows.is_empty() {
            return mean;
        }
        for row in &self.rows {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        let n = self.rows.len() as f64;
        for m in &mut mean {
            *m /= n;
        }
        mean
    }

    /// Cosine similarity of every row against the centroid.
    pub fn centroid_relevance(&self) -> Vec<f64> {
        let centroid = self.centroid();
        self.rows.iter().map(|row| cosine(row, &centroid)).collect()
    }
}

/// Terms of a document: Unicode words of at least two characters.
fn terms(document: &str) -> Vec<&str> {
    document
        .unicode_words()
        .filter(|w| w.chars().count() >= 2)
        .collect()
}

fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for v in row.iter_mut() {
            *v /= norm;
        }
    }
}

/// Cosine similarity; 0.0 when either vector has zero length or the
/// dimensions differ.
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let denom = mag_a * mag_b;
    if denom < f64::EPSILON {
        0.0
    } else {
        dot / denom
    }
}
