// Filesystem loaders for the Opinosis layout.
//
//   data/<topic>.txt.data            one review sentence per line
//   summaries-gold/<topic>/*.gold    one human reference per file
//   <results>/<strategy>.json        generated summaries
//
// Everything is read eagerly; the whole dataset is a few hundred kilobytes.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// File suffix of an Opinosis topic file.
pub const TOPIC_SUFFIX: &str = ".txt.data";

/// File suffix of a gold reference summary.
pub const GOLD_SUFFIX: &str = ".gold";

/// A named group of reviews, keyed by source filename stem.
#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    pub name: String,
    /// Non-blank review lines in file order, trimmed and whitespace-collapsed
    /// but otherwise as written.
    pub sentences: Vec<String>,
}

/// Gold references per topic, in file-name order.
pub type GoldSet = BTreeMap<String, Vec<String>>;

/// Generated summaries: topic -> ordered summary sentences.
pub type Summaries = BTreeMap<String, Vec<String>>;

/// A summary written together with the reviews it was built from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailedSummary {
    pub topic: String,
    pub original_reviews: Vec<String>,
    pub summary: Vec<String>,
}

/// Either on-disk summary layout. The map form is what every summarizer
/// writes by default; the detailed form is written with `--detailed`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SummaryFile {
    Map(Summaries),
    Detailed(Vec<DetailedSummary>),
}

/// Load every `*.txt.data` file in `dir` as a topic, sorted by topic name.
pub fn load_topics(dir: &Path) -> Result<Vec<Topic>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read topic directory {}", dir.display()))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && topic_name(p).is_some())
        .collect();
    paths.sort();

    let mut topics = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(name) = topic_name(&path) else {
            continue;
        };
        let sentences = read_lines_lossy(&path)?;
        debug!(topic = %name, sentences = sentences.len(), "Loaded topic");
        topics.push(Topic { name, sentences });
    }

    if topics.is_empty() {
        warn!(dir = %dir.display(), "No *.txt.data topic files found");
    }

    Ok(topics)
}

/// Topic name for a path like `data/price_amazon_kindle.txt.data`.
pub fn topic_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let stem = file_name.strip_suffix(TOPIC_SUFFIX)?;
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}

/// Read a file as UTF-8, dropping undecodable bytes, keeping non-blank lines.
fn read_lines_lossy(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);

    Ok(text
        .lines()
        .map(|line| line.replace(char::REPLACEMENT_CHARACTER, ""))
        .filter(|line| !line.trim().is_empty())
        .map(|line| collapse_whitespace(&line))
        .collect())
}

fn collapse_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Load all gold summaries under `gold_dir`.
///
/// Each subdirectory is a topic; each `*.gold` file inside it is one
/// reference. Topics without any gold file are left out, and stray files at
/// the top level are ignored.
pub fn load_gold(gold_dir: &Path) -> Result<GoldSet> {
    let entries = fs::read_dir(gold_dir)
        .with_context(|| format!("Failed to read gold directory {}", gold_dir.display()))?;

    let mut gold = GoldSet::new();
    for entry in entries.filter_map(|e| e.ok()) {
        let topic_path = entry.path();
        if !topic_path.is_dir() {
            continue;
        }
        let Some(topic) = topic_path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let references = read_gold_files(&topic_path)?;
        if references.is_empty() {
            debug!(topic, "Gold directory has no .gold files, skipping");
            continue;
        }
        gold.insert(topic.to_string(), references);
    }

    Ok(gold)
}

/// Paths of every `*.gold` file under `gold_dir`, topic by topic.
pub fn gold_paths(gold_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(gold_dir)
        .with_context(|| format!("Failed to read gold directory {}", gold_dir.display()))?;

    let mut topic_dirs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    topic_dirs.sort();

    let mut paths = Vec::new();
    for dir in topic_dirs {
        paths.extend(gold_files_in(&dir)?);
    }
    Ok(paths)
}

fn gold_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(GOLD_SUFFIX))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn read_gold_files(dir: &Path) -> Result<Vec<String>> {
    gold_files_in(dir)?
        .into_iter()
        .map(|path| {
            fs::read_to_string(&path)
                .map(|s| s.trim().to_string())
                .with_context(|| format!("Failed to read {}", path.display()))
        })
        .collect()
}

/// Load generated summaries in either the map or the detailed layout.
pub fn load_summaries(path: &Path) -> Result<Summaries> {
    match read_summary_file(path)? {
        SummaryFile::Map(map) => Ok(map),
        SummaryFile::Detailed(entries) => Ok(entries
            .into_iter()
            .map(|e| (e.topic, e.summary))
            .collect()),
    }
}

/// Load summaries in the detailed layout (topic, original reviews, summary).
pub fn load_detailed(path: &Path) -> Result<Vec<DetailedSummary>> {
    match read_summary_file(path)? {
        SummaryFile::Detailed(entries) => Ok(entries),
        SummaryFile::Map(_) => anyhow::bail!(
            "{} holds plain topic -> summary pairs; re-run `opinsum summarize` with --detailed \
             so the original reviews are included",
            path.display()
        ),
    }
}

fn read_summary_file(path: &Path) -> Result<SummaryFile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read summaries from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a recognized summary file", path.display()))
}
