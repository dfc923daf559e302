// Colored terminal output for summaries and evaluation reports.
//
// This module handles all terminal-specific formatting: colors and tables.
// The main.rs command handlers delegate here after writing their report files.

use std::collections::BTreeMap;

use colored::Colorize;

use crate::corpus::gold::GoldStats;
use crate::corpus::Summaries;
use crate::metrics::rouge::RougeSuite;
use crate::metrics::Prf;
use crate::pipeline::evaluate::{
    BertScoreReport, MeteorReport, ReadabilityReport, RougeReport, Su4Report,
};
use crate::pipeline::review::ReviewEvaluation;

/// Preview the first `limit` topics of a summary run.
pub fn display_summaries(summaries: &Summaries, limit: usize) {
    if summaries.is_empty() {
        println!("No summaries were produced.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Summaries ({} topics) ===", summaries.len()).bold()
    );

    for (topic, sentences) in summaries.iter().take(limit) {
        println!("\n  {}", topic.cyan());
        if sentences.is_empty() {
            println!("    {}", "(empty)".dimmed());
        }
        for sentence in sentences {
            println!("    - {}", super::truncate_chars(sentence, 120));
        }
    }

    if summaries.len() > limit {
        println!(
            "\n  {}",
            format!("... and {} more topics", summaries.len() - limit).dimmed()
        );
    }
    println!();
}

/// Precision/recall/F table, one row per metric.
pub fn display_prf_table(title: &str, rows: &[(&str, Prf)]) {
    println!("\n{}", format!("=== {title} ===").bold());
    println!();
    println!(
        "  {:<12} {:>9} {:>9} {:>9}",
        "Metric".dimmed(),
        "Precision".dimmed(),
        "Recall".dimmed(),
        "F".dimmed(),
    );
    println!("  {}", "-".repeat(42).dimmed());

    for (name, prf) in rows {
        println!(
            "  {:<12} {:>9.4} {:>9.4} {}",
            name,
            prf.precision,
            prf.recall,
            colorize_fraction(prf.fmeasure),
        );
    }
    println!();
}

pub fn display_rouge(report: &RougeReport) {
    display_prf_table(
        &format!("ROUGE ({} topics)", report.topics_scored),
        &[
            ("ROUGE-1", report.average.rouge1),
            ("ROUGE-2", report.average.rouge2),
            ("ROUGE-L", report.average.rouge_l),
        ],
    );
}

pub fn display_su4(report: &Su4Report) {
    display_prf_table(
        &format!("ROUGE-SU4 ({} topics)", report.topics_scored),
        &suite_rows(&report.average),
    );
    println!("  COMPOSITE-SU4-F: {}", colorize_fraction(report.composite_su4));
    println!();
}

fn suite_rows(suite: &RougeSuite) -> [(&'static str, Prf); 7] {
    [
        ("ROUGE-1", suite.rouge1),
        ("ROUGE-2", suite.rouge2),
        ("ROUGE-4", suite.rouge4),
        ("ROUGE-L", suite.rouge_l),
        ("ROUGE-W-1.2", suite.rouge_w),
        ("ROUGE-S4", suite.rouge_s4),
        ("ROUGE-SU4", suite.rouge_su4),
    ]
}

pub fn display_bertscore(report: &BertScoreReport) {
    display_prf_table(
        &format!("BERTScore ({} topics)", report.topics_scored),
        &[("BERTScore", report.average)],
    );
    if !report.failed_topics.is_empty() {
        println!(
            "  {} {} topics failed to embed: {}",
            "!".yellow(),
            report.failed_topics.len(),
            report.failed_topics.join(", ").dimmed()
        );
        println!();
    }
}

pub fn display_meteor(report: &MeteorReport) {
    display_scalar_table("METEOR", &report.per_topic, report.average_meteor, |v| {
        colorize_fraction(v).to_string()
    });
}

pub fn display_readability(report: &ReadabilityReport) {
    display_scalar_table(
        "Flesch Reading Ease",
        &report.per_topic,
        report.average_flesch,
        |v| colorize_flesch(v).to_string(),
    );
}

/// Per-topic scalar scores followed by their average.
fn display_scalar_table(
    title: &str,
    per_topic: &BTreeMap<String, f64>,
    average: f64,
    paint: impl Fn(f64) -> String,
) {
    println!(
        "\n{}",
        format!("=== {title} ({} topics) ===", per_topic.len()).bold()
    );
    println!();
    for (topic, value) in per_topic {
        println!("  {:<48} {}", super::truncate_chars(topic, 45), paint(*value));
    }
    println!("  {}", "-".repeat(56).dimmed());
    println!("  {:<48} {}", "Average".bold(), paint(average));
    println!();
}

pub fn display_review(evaluation: &ReviewEvaluation) {
    println!(
        "\n{}",
        format!("=== Review Coverage ({} topics) ===", evaluation.topics.len()).bold()
    );
    println!();
    let avg = &evaluation.average;
    println!("  ROUGE-1: {}", colorize_fraction(avg.rouge1));
    println!("  ROUGE-2: {}", colorize_fraction(avg.rouge2));
    println!("  ROUGE-L: {}", colorize_fraction(avg.rouge_l));
    println!(
        "  Readability (Flesch Reading Ease): {}",
        colorize_flesch(avg.readability)
    );
    println!();
}

pub fn display_gold_stats(stats: &GoldStats) {
    match stats.average_words {
        Some(avg) => {
            println!("Total Gold Summaries: {}", stats.total_summaries);
            println!("Average Word Count: {:.2}", avg);
        }
        None => println!("No summaries were found."),
    }
}

/// Colorize a score in [0, 1].
fn colorize_fraction(value: f64) -> colored::ColoredString {
    let text = format!("{value:.4}");
    if value >= 0.5 {
        text.green()
    } else if value >= 0.2 {
        text.yellow()
    } else {
        text.red()
    }
}

/// Colorize a Flesch score by the usual readability bands.
fn colorize_flesch(value: f64) -> colored::ColoredString {
    let text = format!("{value:.2}");
    if value >= 60.0 {
        text.green()
    } else if value >= 30.0 {
        text.yellow()
    } else {
        text.red()
    }
}
