// Evaluation jobs: score generated summaries against the gold references.
//
// Every job pairs each summarized topic with its gold references (topics
// missing from either side are left out), joins the summary sentences into one
// candidate text, and produces a serializable report with per-topic scores and
// the average across topics.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::corpus::{GoldSet, Summaries};
use crate::metrics::bertscore::{self, TokenEmbedder};
use crate::metrics::meteor::{self, MeteorParams};
use crate::metrics::readability::flesch_reading_ease;
use crate::metrics::rouge::{RougeScorer, RougeSuite};
use crate::metrics::{mean, Prf, ReferenceMode};

/// The available evaluation metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Rouge,
    Su4,
    Meteor,
    BertScore,
    Readability,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Rouge => "rouge",
            Metric::Su4 => "su4",
            Metric::Meteor => "meteor",
            Metric::BertScore => "bertscore",
            Metric::Readability => "readability",
        }
    }

    /// Reference mode used when `--reference` isn't given.
    pub fn default_reference(&self) -> ReferenceMode {
        match self {
            Metric::Rouge => ReferenceMode::First,
            Metric::Su4 => ReferenceMode::Average,
            Metric::BertScore => ReferenceMode::Best,
            // METEOR always takes the best reference; readability has none
            Metric::Meteor | Metric::Readability => ReferenceMode::Best,
        }
    }

    pub fn needs_gold(&self) -> bool {
        !matches!(self, Metric::Readability)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance carried by every JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    /// RFC 3339 timestamp of the run
    pub generated_at: String,
    pub summaries: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gold: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_mode: Option<ReferenceMode>,
}

impl ReportMeta {
    pub fn new(summaries: &Path, gold: Option<&Path>, reference_mode: Option<ReferenceMode>) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            summaries: summaries.to_path_buf(),
            gold: gold.map(Path::to_path_buf),
            reference_mode,
        }
    }
}

/// One summarized topic together with its gold references.
#[derive(Debug, Clone)]
pub struct ScoringPair<'a> {
    pub topic: &'a str,
    /// Summary sentences joined with single spaces
    pub candidate: String,
    pub references: &'a [String],
}

/// Pair summaries with gold references, in topic order. Topics without gold
/// references are skipped.
pub fn pair_topics<'a>(summaries: &'a Summaries, gold: &'a GoldSet) -> Vec<ScoringPair<'a>> {
    summaries
        .iter()
        .filter_map(|(topic, sentences)| match gold.get(topic) {
            Some(references) if !references.is_empty() => Some(ScoringPair {
                topic: topic.as_str(),
                candidate: sentences.join(" "),
                references,
            }),
            _ => {
                debug!(topic = %topic, "No gold references for topic, skipping");
                None
            }
        })
        .collect()
}

/// Combine per-reference ROUGE suites variant by variant.
pub fn combine_suites(mode: ReferenceMode, per_reference: &[RougeSuite]) -> RougeSuite {
    let pick = |f: fn(&RougeSuite) -> Prf| -> Prf {
        mode.combine(&per_reference.iter().map(f).collect::<Vec<_>>())
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

/// Full ROUGE suite per topic. Topics with an empty summary are skipped;
/// zero scored topics is an error.
pub fn rouge_suites(
    scorer: &RougeScorer,
    summaries: &Summaries,
    gold: &GoldSet,
    mode: ReferenceMode,
) -> Result<BTreeMap<String, RougeSuite>> {
    let mut per_topic = BTreeMap::new();
    for pair in pair_topics(summaries, gold) {
        if pair.candidate.trim().is_empty() {
            debug!(topic = pair.topic, "Empty summary, skipping");
            continue;
        }
        let per_reference: Vec<RougeSuite> = mode
            .select(pair.references)
            .iter()
            .map(|r| scorer.score(&pair.candidate, r))
            .collect();
        per_topic.insert(pair.topic.to_string(), combine_suites(mode, &per_reference));
    }

    if per_topic.is_empty() {
        anyhow::bail!(
            "No topics could be scored: no summarized topic has both a non-empty summary and gold references"
        );
    }
    Ok(per_topic)
}

/// ROUGE-1, ROUGE-2 and ROUGE-L for one topic or an average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RougeScores {
    pub rouge1: Prf,
    pub rouge2: Prf,
    pub rouge_l: Prf,
}

impl From<&RougeSuite> for RougeScores {
    fn from(s: &RougeSuite) -> Self {
        Self {
            rouge1: s.rouge1,
            rouge2: s.rouge2,
            rouge_l: s.rouge_l,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RougeReport {
    #[serde(flatten)]
    pub meta: ReportMeta,
    pub topics_scored: usize,
    pub average: RougeScores,
    pub per_topic: BTreeMap<String, RougeScores>,
}

pub fn evaluate_rouge(
    summaries: &Summaries,
    gold: &GoldSet,
    mode: ReferenceMode,
    meta: ReportMeta,
) -> Result<RougeReport> {
    let suites = rouge_suites(&RougeScorer::default(), summaries, gold, mode)?;
    let all: Vec<RougeSuite> = suites.values().copied().collect();
    let average = RougeScores::from(&RougeSuite::mean(&all));

    info!(
        topics = suites.len(),
        rouge1_f = average.rouge1.fmeasure,
        "ROUGE evaluation finished"
    );

    Ok(RougeReport {
        meta,
        topics_scored: suites.len(),
        average,
        per_topic: suites
            .iter()
            .map(|(topic, suite)| (topic.clone(), RougeScores::from(suite)))
            .collect(),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct Su4Report {
    #[serde(flatten)]
    pub meta: ReportMeta,
    pub topics_scored: usize,
    pub average: RougeSuite,
    /// 0.5 * ROUGE-1 F + 0.5 * ROUGE-SU4 F of the averages
    pub composite_su4: f64,
    pub per_topic: BTreeMap<String, RougeSuite>,
}

pub fn evaluate_su4(
    summaries: &Summaries,
    gold: &GoldSet,
    mode: ReferenceMode,
    meta: ReportMeta,
) -> Result<Su4Report> {
    let per_topic = rouge_suites(&RougeScorer::default(), summaries, gold, mode)?;
    let all: Vec<RougeSuite> = per_topic.values().copied().collect();
    let average = RougeSuite::mean(&all);
    let composite_su4 = composite_su4(&average);

    info!(topics = per_topic.len(), composite_su4, "ROUGE-SU4 evaluation finished");

    Ok(Su4Report {
        meta,
        topics_scored: per_topic.len(),
        average,
        composite_su4,
        per_topic,
    })
}

pub fn composite_su4(suite: &RougeSuite) -> f64 {
    0.5 * suite.rouge1.fmeasure + 0.5 * suite.rouge_su4.fmeasure
}

#[derive(Debug, Clone, Serialize)]
pub struct MeteorReport {
    #[serde(flatten)]
    pub meta: ReportMeta,
    pub average_meteor: f64,
    pub per_topic: BTreeMap<String, f64>,
}

/// METEOR per topic, best over references. A summary with no words scores 0
/// and is logged; the batch carries on.
pub fn evaluate_meteor(summaries: &Summaries, gold: &GoldSet, meta: ReportMeta) -> MeteorReport {
    let params = MeteorParams::default();
    let mut per_topic = BTreeMap::new();

    for pair in pair_topics(summaries, gold) {
        let score = if meteor::tokenize(&pair.candidate).is_empty() {
            warn!(topic = pair.topic, "Summary has no words to align, scoring 0");
            0.0
        } else {
            meteor::meteor_score(pair.references, &pair.candidate, &params)
        };
        per_topic.insert(pair.topic.to_string(), score);
    }

    let scores: Vec<f64> = per_topic.values().copied().collect();
    let average_meteor = mean(&scores);
    info!(topics = scores.len(), average_meteor, "METEOR evaluation finished");

    MeteorReport {
        meta,
        average_meteor,
        per_topic,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BertScoreReport {
    #[serde(flatten)]
    pub meta: ReportMeta,
    pub topics_scored: usize,
    pub average: Prf,
    pub per_topic: BTreeMap<String, Prf>,
    /// Topics skipped because embedding failed
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_topics: Vec<String>,
}

/// BERTScore per topic. Embedding failures skip the topic with a warning.
pub async fn evaluate_bertscore(
    embedder: &dyn TokenEmbedder,
    summaries: &Summaries,
    gold: &GoldSet,
    mode: ReferenceMode,
    meta: ReportMeta,
) -> BertScoreReport {
    let pairs = pair_topics(summaries, gold);

    let pb = ProgressBar::new(pairs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  BERTScore [{bar:30}] {pos}/{len} ({eta})")
            .expect("valid template"),
    );

    let mut per_topic = BTreeMap::new();
    let mut failed_topics = Vec::new();

    for pair in &pairs {
        let references: Vec<String> = mode.select(pair.references).to_vec();
        let candidates = vec![pair.candidate.clone(); references.len()];

        match bertscore::score_pairs(embedder, &candidates, &references).await {
            Ok(per_reference) => {
                per_topic.insert(pair.topic.to_string(), mode.combine(&per_reference));
            }
            Err(e) => {
                warn!(topic = pair.topic, error = %e, "BERTScore failed for topic, skipping");
                failed_topics.push(pair.topic.to_string());
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let scores: Vec<Prf> = per_topic.values().copied().collect();
    let average = Prf::mean(&scores);
    info!(
        topics = scores.len(),
        failed = failed_topics.len(),
        f1 = average.fmeasure,
        "BERTScore evaluation finished"
    );

    BertScoreReport {
        meta,
        topics_scored: scores.len(),
        average,
        per_topic,
        failed_topics,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadabilityReport {
    #[serde(flatten)]
    pub meta: ReportMeta,
    pub average_flesch: f64,
    pub per_topic: BTreeMap<String, f64>,
}

/// Flesch reading ease of each joined summary. Needs no references.
pub fn evaluate_readability(summaries: &Summaries, meta: ReportMeta) -> ReadabilityReport {
    let per_topic: BTreeMap<String, f64> = summaries
        .iter()
        .map(|(topic, sentences)| (topic.clone(), flesch_reading_ease(&sentences.join(" "))))
        .collect();

    let scores: Vec<f64> = per_topic.values().copied().collect();
    let average_flesch = mean(&scores);
    info!(topics = scores.len(), average_flesch, "Readability evaluation finished");

    ReadabilityReport {
        meta,
        average_flesch,
        per_topic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summaries(entries: &[(&str, &[&str])]) -> Summaries {
        entries
            .iter()
            .map(|(t, s)| (t.to_string(), s.iter().map(|x| x.to_string()).collect()))
            .collect()
    }

    fn gold(entries: &[(&str, &[&str])]) -> GoldSet {
        summaries(entries)
    }

    fn meta() -> ReportMeta {
        ReportMeta::new(Path::new("summaries.json"), Some(Path::new("gold")), None)
    }

    #[test]
    fn test_pair_topics_intersection() {
        let s = summaries(&[("a", &["x y"]), ("b", &["z"])]);
        let g = gold(&[("a", &["x y"]), ("c", &["w"])]);
        let pairs = pair_topics(&s, &g);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].topic, "a");
        assert_eq!(pairs[0].candidate, "x y");
    }

    #[test]
    fn test_rouge_identical_is_one() {
        let s = summaries(&[("a", &["battery life", "is short"])]);
        let g = gold(&[("a", &["battery life is short"])]);
        let report = evaluate_rouge(&s, &g, ReferenceMode::First, meta()).unwrap();
        assert_eq!(report.topics_scored, 1);
        assert!((report.average.rouge1.fmeasure - 1.0).abs() < 1e-12);
        assert!((report.average.rouge_l.fmeasure - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rouge_no_topics_is_error() {
        let s = summaries(&[("a", &[])]);
        let g = gold(&[("a", &["battery"])]);
        assert!(evaluate_rouge(&s, &g, ReferenceMode::First, meta()).is_err());
    }

    #[test]
    fn test_rouge_first_vs_best() {
        let s = summaries(&[("a", &["battery charger"])]);
        let g = gold(&[("a", &["screen resolution", "battery charger"])]);
        let first = evaluate_rouge(&s, &g, ReferenceMode::First, meta()).unwrap();
        let best = evaluate_rouge(&s, &g, ReferenceMode::Best, meta()).unwrap();
        assert_eq!(first.average.rouge1.fmeasure, 0.0);
        assert!((best.average.rouge1.fmeasure - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_su4_composite() {
        let s = summaries(&[("a", &["battery charger works"])]);
        let g = gold(&[("a", &["battery charger works"])]);
        let report = evaluate_su4(&s, &g, ReferenceMode::Average, meta()).unwrap();
        assert!((report.composite_su4 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_meteor_empty_summary_scores_zero() {
        let s = summaries(&[("a", &[]), ("b", &["battery charger"])]);
        let g = gold(&[("a", &["battery"]), ("b", &["battery charger"])]);
        let report = evaluate_meteor(&s, &g, meta());
        assert_eq!(report.per_topic["a"], 0.0);
        assert!(report.per_topic["b"] > 0.9);
        assert!((report.average_meteor - report.per_topic["b"] / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_meteor_no_topics_is_zero() {
        let report = evaluate_meteor(&Summaries::new(), &GoldSet::new(), meta());
        assert_eq!(report.average_meteor, 0.0);
    }

    #[test]
    fn test_readability_average() {
        let s = summaries(&[("a", &["The cat sat down."]), ("b", &[])]);
        let report = evaluate_readability(&s, meta());
        assert_eq!(report.per_topic["b"], 0.0);
        assert!((report.average_flesch - report.per_topic["a"] / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_report_meta_serializes_flat() {
        let report = evaluate_readability(&summaries(&[("a", &["Hi."])]), meta());
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("generated_at").is_some());
        assert_eq!(json["summaries"], "summaries.json");
        assert!(json.get("reference_mode").is_none());
    }
}
