// Review-coverage evaluation: how much of the source reviews each summary
// sentence carries, and how readable it is.
//
// Works on the detailed summary layout. Every summary sentence is scored with
// ROUGE-1/2/L F against all of the topic's reviews joined together, plus its
// Flesch reading ease. Sentence scores are averaged per topic, then topic
// averages across the run, and the whole thing is rendered as a text report.

use std::fmt::Write;

use serde::Serialize;
use tracing::{info, warn};

use crate::corpus::DetailedSummary;
use crate::metrics::mean;
use crate::metrics::readability::flesch_reading_ease;
use crate::metrics::rouge::RougeScorer;

/// Averaged F-measures and readability for one topic or for the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ReviewScores {
    pub rouge1: f64,
    pub rouge2: f64,
    pub rouge_l: f64,
    pub readability: f64,
}

impl ReviewScores {
    fn mean(scores: &[ReviewScores]) -> ReviewScores {
        let pick = |f: fn(&ReviewScores) -> f64| mean(&scores.iter().map(f).collect::<Vec<_>>());
        ReviewScores {
            rouge1: pick(|s| s.rouge1),
            rouge2: pick(|s| s.rouge2),
            rouge_l: pick(|s| s.rouge_l),
            readability: pick(|s| s.readability),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicReview {
    pub topic: String,
    pub scores: ReviewScores,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewEvaluation {
    pub topics: Vec<TopicReview>,
    pub average: ReviewScores,
}

/// Score every topic of a detailed summary file. Topics with an empty
/// summary are skipped with a warning.
pub fn evaluate(entries: &[DetailedSummary], scorer: &RougeScorer) -> ReviewEvaluation {
    let mut topics = Vec::with_capacity(entries.len());

    for entry in entries {
        if entry.summary.is_empty() {
            warn!(topic = %entry.topic, "Topic has no summary sentences, skipping");
            continue;
        }

        let reviews = entry.original_reviews.join(" ");
        let per_sentence: Vec<ReviewScores> = entry
            .summary
            .iter()
            .map(|sentence| {
                let suite = scorer.score(sentence, &reviews);
                ReviewScores {
                    rouge1: suite.rouge1.fmeasure,
                    rouge2: suite.rouge2.fmeasure,
                    rouge_l: suite.rouge_l.fmeasure,
                    readability: flesch_reading_ease(sentence),
                }
            })
            .collect();

        topics.push(TopicReview {
            topic: entry.topic.clone(),
            scores: ReviewScores::mean(&per_sentence),
        });
    }

    let all: Vec<ReviewScores> = topics.iter().map(|t| t.scores).collect();
    let average = ReviewScores::mean(&all);

    info!(
        topics = topics.len(),
        rouge1 = average.rouge1,
        readability = average.readability,
        "Review evaluation finished"
    );

    ReviewEvaluation { topics, average }
}

/// Plain-text report: one block per topic, then the cross-topic averages.
pub fn render(evaluation: &ReviewEvaluation) -> String {
    let mut out = String::new();

    for t in &evaluation.topics {
        let _ = writeln!(out, "Topic: {}", t.topic);
        let _ = writeln!(out, "  ROUGE-1 Average Score: {:.4}", t.scores.rouge1);
        let _ = writeln!(out, "  ROUGE-2 Average Score: {:.4}", t.scores.rouge2);
        let _ = writeln!(out, "  ROUGE-L Average Score: {:.4}", t.scores.rouge_l);
        let _ = writeln!(
            out,
            "  Readability (Flesch Reading Ease): {:.2}\n",
            t.scores.readability
        );
    }

    let avg = &evaluation.average;
    let _ = writeln!(out, "Final Average Evaluation Scores Across Topics:");
    let _ = writeln!(out, "  ROUGE-1: {:.4}", avg.rouge1);
    let _ = writeln!(out, "  ROUGE-2: {:.4}", avg.rouge2);
    let _ = writeln!(out, "  ROUGE-L: {:.4}", avg.rouge_l);
    let _ = writeln!(out, "  Readability (Flesch Reading Ease): {:.2}", avg.readability);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(topic: &str, reviews: &[&str], summary: &[&str]) -> DetailedSummary {
        DetailedSummary {
            topic: topic.to_string(),
            original_reviews: reviews.iter().map(|s| s.to_string()).collect(),
            summary: summary.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_summary_from_reviews_has_full_precision_overlap() {
        let entries = vec![entry(
            "kindle",
            &["battery charger works", "screen resolution sharp"],
            &["battery charger works"],
        )];
        let eval = evaluate(&entries, &RougeScorer::default());
        assert_eq!(eval.topics.len(), 1);
        // Precision 1, recall 3/6
        let expected = 2.0 * 1.0 * 0.5 / 1.5;
        assert!((eval.topics[0].scores.rouge1 - expected).abs() < 1e-12);
    }

    #[test]
    fn test_empty_summary_skipped() {
        let entries = vec![entry("a", &["battery"], &[]), entry("b", &["battery"], &["battery"])];
        let eval = evaluate(&entries, &RougeScorer::default());
        assert_eq!(eval.topics.len(), 1);
        assert_eq!(eval.topics[0].topic, "b");
    }

    #[test]
    fn test_render_format() {
        let eval = ReviewEvaluation {
            topics: vec![TopicReview {
                topic: "kindle".to_string(),
                scores: ReviewScores {
                    rouge1: 0.5,
                    rouge2: 0.25,
                    rouge_l: 0.5,
                    readability: 70.123,
                },
            }],
            average: ReviewScores {
                rouge1: 0.5,
                rouge2: 0.25,
                rouge_l: 0.5,
                readability: 70.123,
            },
        };
        let text = render(&eval);
        assert!(text.starts_with("Topic: kindle\n  ROUGE-1 Average Score: 0.5000\n"));
        assert!(text.contains("  Readability (Flesch Reading Ease): 70.12\n\n"));
        assert!(text.ends_with("  Readability (Flesch Reading Ease): 70.12\n"));
        assert!(text.contains("Final Average Evaluation Scores Across Topics:\n  ROUGE-1: 0.5000\n"));
    }
}
