// Summarization job: run one strategy over every topic of a corpus.
//
// A failing topic is logged and left out of the output; the rest of the batch
// still runs. The result is the topic -> sentences map every evaluation job
// reads, optionally expanded into the detailed layout that keeps the source
// reviews next to each summary.

use std::path::{Path, PathBuf};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::corpus::{DetailedSummary, Summaries, Topic};
use crate::summarize::graph::GraphSummarizer;
use crate::summarize::lexrank::LexRankSummarizer;
use crate::summarize::mmr::MmrSummarizer;
use crate::summarize::tfidf::TfIdfSummarizer;
use crate::summarize::traits::Summarizer;
use crate::summarize::Strategy;

/// Tunables shared by every strategy; each one reads the fields it needs.
#[derive(Debug, Clone)]
pub struct StrategySettings {
    /// Sentences per summary (paths per topic for the graph strategy)
    pub summary_size: usize,
    /// MMR relevance/redundancy trade-off
    pub lambda: f64,
    /// LexRank edge threshold
    pub threshold: f64,
    /// LexRank continuous mode
    pub continuous: bool,
    /// Minimum words per graph path
    pub min_length: usize,
    /// Optional cap on graph path extensions per topic
    pub max_expansions: Option<u64>,
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            summary_size: 2,
            lambda: 0.7,
            threshold: 0.1,
            continuous: false,
            min_length: 7,
            max_expansions: None,
        }
    }
}

/// Build the summarizer for `strategy`. LexRank learns its IDF table from
/// `topics`, so the same corpus must be passed to [`run`].
///
/// Settings are checked here, once, so a bad value fails the whole job instead
/// of every topic.
pub fn build_summarizer(
    strategy: Strategy,
    settings: &StrategySettings,
    topics: &[Topic],
) -> Result<Box<dyn Summarizer>> {
    if strategy == Strategy::Mmr && !(0.0..=1.0).contains(&settings.lambda) {
        anyhow::bail!("MMR lambda must be within [0, 1], got {}", settings.lambda);
    }

    Ok(match strategy {
        Strategy::TfIdf => Box::new(TfIdfSummarizer {
            summary_size: settings.summary_size,
        }),
        Strategy::LexRank => Box::new(
            LexRankSummarizer::fit(topics)
                .with_summary_size(settings.summary_size)
                .with_threshold(settings.threshold)
                .with_continuous(settings.continuous),
        ),
        Strategy::Mmr => Box::new(MmrSummarizer {
            summary_size: settings.summary_size,
            lambda: settings.lambda,
        }),
        Strategy::Graph => Box::new(GraphSummarizer {
            top_n: settings.summary_size,
            min_length: settings.min_length,
            max_expansions: settings.max_expansions,
        }),
    })
}

/// Summarize every topic. Topics whose summarizer fails are skipped with a
/// warning.
pub fn run(summarizer: &dyn Summarizer, topics: &[Topic]) -> Summaries {
    let pb = ProgressBar::new(topics.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Summarizing [{bar:30}] {pos}/{len} {msg}")
            .expect("valid template"),
    );

    let mut summaries = Summaries::new();
    for topic in topics {
        pb.set_message(topic.name.clone());
        match summarizer.summarize(topic) {
            Ok(sentences) => {
                summaries.insert(topic.name.clone(), sentences);
            }
            Err(e) => {
                warn!(
                    topic = %topic.name,
                    strategy = summarizer.name(),
                    error = %e,
                    "Failed to summarize topic, skipping"
                );
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(
        strategy = summarizer.name(),
        topics = topics.len(),
        summarized = summaries.len(),
        "Summarization finished"
    );
    summaries
}

/// Pair each summary with the reviews it came from, in topic order.
pub fn detailed(topics: &[Topic], summaries: &Summaries) -> Vec<DetailedSummary> {
    topics
        .iter()
        .filter_map(|topic| {
            summaries.get(&topic.name).map(|summary| DetailedSummary {
                topic: topic.name.clone(),
                original_reviews: topic.sentences.clone(),
                summary: summary.clone(),
            })
        })
        .collect()
}

/// `<strategy>_results/<strategy>_summaries.json`
pub fn default_output(strategy: Strategy) -> PathBuf {
    PathBuf::from(format!("{strategy}_results")).join(format!("{strategy}_summaries.json"))
}

/// Where an evaluation report goes when `--output` isn't given: next to the
/// summaries file, named `<strategy>_<metric>_metrics.json` when the file
/// follows the `<strategy>_summaries.json` convention.
pub fn default_metrics_output(summaries: &Path, metric: &str) -> PathBuf {
    let dir = summaries.parent().unwrap_or_else(|| Path::new(""));
    let prefix = summaries
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_suffix("_summaries.json"));
    match prefix {
        Some(strategy) if !strategy.is_empty() => {
            dir.join(format!("{strategy}_{metric}_metrics.json"))
        }
        _ => dir.join(format!("{metric}_metrics.json")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailsOn(&'static str);

    impl Summarizer for FailsOn {
        fn name(&self) -> &'static str {
            "fails-on"
        }

        fn summarize(&self, topic: &Topic) -> anyhow::Result<Vec<String>> {
            if topic.name == self.0 {
                anyhow::bail!("boom");
            }
            Ok(topic.sentences.iter().take(1).cloned().collect())
        }
    }

    fn topic(name: &str, sentences: &[&str]) -> Topic {
        Topic {
            name: name.to_string(),
            sentences: sentences.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_run_skips_failing_topics() {
        let topics = vec![
            topic("a", &["first a", "second a"]),
            topic("b", &["first b"]),
        ];
        let out = run(&FailsOn("a"), &topics);
        assert_eq!(out.len(), 1);
        assert_eq!(out["b"], vec!["first b".to_string()]);
    }

    #[test]
    fn test_detailed_keeps_reviews() {
        let topics = vec![topic("a", &["x", "y"]), topic("b", &["z"])];
        let mut summaries = Summaries::new();
        summaries.insert("a".to_string(), vec!["x".to_string()]);

        let entries = detailed(&topics, &summaries);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].original_reviews, vec!["x", "y"]);
        assert_eq!(entries[0].summary, vec!["x"]);
    }

    #[test]
    fn test_default_output_paths() {
        assert_eq!(
            default_output(Strategy::Mmr),
            PathBuf::from("mmr_results/mmr_summaries.json")
        );
        assert_eq!(
            default_metrics_output(Path::new("mmr_results/mmr_summaries.json"), "meteor"),
            PathBuf::from("mmr_results/mmr_meteor_metrics.json")
        );
        assert_eq!(
            default_metrics_output(Path::new("out.json"), "rouge"),
            PathBuf::from("rouge_metrics.json")
        );
    }

    #[test]
    fn test_build_summarizer_names() {
        let settings = StrategySettings::default();
        for strategy in [
            Strategy::TfIdf,
            Strategy::LexRank,
            Strategy::Mmr,
            Strategy::Graph,
        ] {
            let s = build_summarizer(strategy, &settings, &[]).unwrap();
            assert_eq!(s.name(), strategy.as_str());
        }
    }

    #[test]
    fn test_build_summarizer_rejects_bad_lambda() {
        for lambda in [1.5, -0.1, f64::NAN] {
            let settings = StrategySettings {
                lambda,
                ..StrategySettings::default()
            };
            let err = build_summarizer(Strategy::Mmr, &settings, &[])
                .err()
                .expect("out-of-range lambda must be rejected");
            assert!(err.to_string().contains("lambda"), "got: {err}");
        }

        // Lambda only matters to MMR
        let settings = StrategySettings {
            lambda: 1.5,
            ..StrategySettings::default()
        };
        assert!(build_summarizer(Strategy::TfIdf, &settings, &[]).is_ok());
    }
}
