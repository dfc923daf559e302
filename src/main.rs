use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

use opinsum::config::Config;
use opinsum::corpus::{gold, loader};
use opinsum::metrics::ReferenceMode;
use opinsum::output::{self, terminal};
use opinsum::pipeline::evaluate::{self, Metric, ReportMeta};
use opinsum::pipeline::{review, summarize};
use opinsum::summarize::Strategy;

/// Opinsum: extractive summarization of opinion reviews.
///
/// Builds short summaries of each Opinosis topic with one of several
/// strategies and scores them against human-written gold summaries.
#[derive(Parser)]
#[command(name = "opinsum", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize every topic with the chosen strategy
    Summarize {
        strategy: StrategyArg,

        /// Directory of *.txt.data topic files (default depends on strategy)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output JSON file (default: <strategy>_results/<strategy>_summaries.json)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Sentences per summary, or paths per topic for `graph`
        #[arg(long)]
        size: Option<usize>,

        /// MMR relevance/redundancy trade-off in [0, 1]
        #[arg(long)]
        lambda: Option<f64>,

        /// LexRank similarity threshold for an edge
        #[arg(long, default_value = "0.1")]
        threshold: f64,

        /// LexRank: weight edges by similarity instead of thresholding
        #[arg(long)]
        continuous: bool,

        /// Minimum words per graph path
        #[arg(long, default_value = "7")]
        min_length: usize,

        /// Stop graph path search after this many extensions per topic
        #[arg(long)]
        max_expansions: Option<u64>,

        /// Also write the original reviews next to each summary
        #[arg(long)]
        detailed: bool,
    },

    /// Score generated summaries against the gold references
    Evaluate {
        metric: MetricArg,

        /// Summaries JSON file written by `summarize`
        #[arg(long)]
        summaries: PathBuf,

        /// Gold summaries directory (default: OPINSUM_GOLD_DIR or summaries-gold)
        #[arg(long)]
        gold: Option<PathBuf>,

        /// Output JSON file (default: next to the summaries file)
        #[arg(long)]
        output: Option<PathBuf>,

        /// How multiple gold references per topic are combined
        #[arg(long)]
        reference: Option<ReferenceArg>,
    },

    /// Score detailed summaries against their own source reviews
    ReviewEval {
        /// Detailed summaries JSON file (written with `summarize --detailed`)
        #[arg(long)]
        summaries: PathBuf,

        /// Output text report (default: evaluation_results.txt)
        #[arg(long, default_value = "evaluation_results.txt")]
        output: PathBuf,
    },

    /// Show how many gold summaries there are and their average length
    GoldStats {
        /// Gold summaries directory (default: OPINSUM_GOLD_DIR or summaries-gold)
        #[arg(long)]
        gold: Option<PathBuf>,
    },

    /// Download the ONNX embedding model used by BERTScore (~90 MB)
    DownloadModel,

    /// Show system status (corpus directories, gold set, model files)
    Status,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Tfidf,
    Lexrank,
    Mmr,
    Graph,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Tfidf => Strategy::TfIdf,
            StrategyArg::Lexrank => Strategy::LexRank,
            StrategyArg::Mmr => Strategy::Mmr,
            StrategyArg::Graph => Strategy::Graph,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum MetricArg {
    Rouge,
    Su4,
    Meteor,
    Bertscore,
    Readability,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Rouge => Metric::Rouge,
            MetricArg::Su4 => Metric::Su4,
            MetricArg::Meteor => Metric::Meteor,
            MetricArg::Bertscore => Metric::BertScore,
            MetricArg::Readability => Metric::Readability,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ReferenceArg {
    First,
    Best,
    Average,
}

impl From<ReferenceArg> for ReferenceMode {
    fn from(arg: ReferenceArg) -> Self {
        match arg {
            ReferenceArg::First => ReferenceMode::First,
            ReferenceArg::Best => ReferenceMode::Best,
            ReferenceArg::Average => ReferenceMode::Average,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("opinsum=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize {
            strategy,
            input,
            output: output_override,
            size,
            lambda,
            threshold,
            continuous,
            min_length,
            max_expansions,
            detailed,
        } => {
            let config = Config::load()?;
            let strategy = Strategy::from(strategy);

            let input = input.unwrap_or_else(|| {
                if strategy.uses_full_dataset() {
                    config.data_dir.clone()
                } else {
                    config.topics_dir.clone()
                }
            });
            let output_path =
                output_override.unwrap_or_else(|| summarize::default_output(strategy));

            // The graph strategy returns a single best path unless asked for more
            let summary_size = size.unwrap_or(match strategy {
                Strategy::Graph => 1,
                _ => config.summary_size,
            });
            let settings = summarize::StrategySettings {
                summary_size,
                lambda: lambda.unwrap_or(config.mmr_lambda),
                threshold,
                continuous,
                min_length,
                max_expansions,
            };

            println!("Loading topics from {}...", input.display());
            let topics = loader::load_topics(&input)?;
            println!(
                "Summarizing {} topics with {}...",
                topics.len(),
                strategy.to_string().bold()
            );
            info!(strategy = %strategy, topics = topics.len(), ?settings, "Starting summarization");

            let summarizer = summarize::build_summarizer(strategy, &settings, &topics)?;
            let summaries = summarize::run(summarizer.as_ref(), &topics);

            if detailed {
                output::write_json(&output_path, &summarize::detailed(&topics, &summaries))?;
            } else {
                output::write_json(&output_path, &summaries)?;
            }

            terminal::display_summaries(&summaries, 5);
            println!("Summaries saved to: {}", output_path.display());
        }

        Commands::Evaluate {
            metric,
            summaries: summaries_path,
            gold,
            output: output_override,
            reference,
        } => {
            let config = Config::load()?;
            let metric = Metric::from(metric);
            let mode = reference
                .map(ReferenceMode::from)
                .unwrap_or_else(|| metric.default_reference());
            let gold_dir = gold.unwrap_or_else(|| config.gold_dir.clone());
            let output_path = output_override.unwrap_or_else(|| {
                summarize::default_metrics_output(&summaries_path, metric.as_str())
            });

            let summaries = loader::load_summaries(&summaries_path)?;
            println!(
                "Evaluating {} summaries with {}...",
                summaries.len(),
                metric.to_string().bold()
            );

            let gold_set = if metric.needs_gold() {
                let set = loader::load_gold(&gold_dir)?;
                info!(gold_topics = set.len(), gold_dir = %gold_dir.display(), "Loaded gold references");
                set
            } else {
                Default::default()
            };

            match metric {
                Metric::Rouge => {
                    let meta = ReportMeta::new(&summaries_path, Some(&gold_dir), Some(mode));
                    let report = evaluate::evaluate_rouge(&summaries, &gold_set, mode, meta)?;
                    output::write_json(&output_path, &report)?;
                    terminal::display_rouge(&report);
                }
                Metric::Su4 => {
                    let meta = ReportMeta::new(&summaries_path, Some(&gold_dir), Some(mode));
                    let report = evaluate::evaluate_su4(&summaries, &gold_set, mode, meta)?;
                    output::write_json(&output_path, &report)?;
                    terminal::display_su4(&report);
                }
                Metric::Meteor => {
                    let meta = ReportMeta::new(&summaries_path, Some(&gold_dir), None);
                    let report = evaluate::evaluate_meteor(&summaries, &gold_set, meta);
                    output::write_json(&output_path, &report)?;
                    terminal::display_meteor(&report);
                }
                Metric::BertScore => {
                    config.require_model()?;
                    let embedder =
                        opinsum::embeddings::onnx::OnnxTokenEmbedder::load(&config.embedding_dir())?;
                    let meta = ReportMeta::new(&summaries_path, Some(&gold_dir), Some(mode));
                    let report =
                        evaluate::evaluate_bertscore(&embedder, &summaries, &gold_set, mode, meta)
                            .await;
                    output::write_json(&output_path, &report)?;
                    terminal::display_bertscore(&report);
                }
                Metric::Readability => {
                    let meta = ReportMeta::new(&summaries_path, None, None);
                    let report = evaluate::evaluate_readability(&summaries, meta);
                    output::write_json(&output_path, &report)?;
                    terminal::display_readability(&report);
                }
            }

            println!("Metrics saved to: {}", output_path.display());
        }

        Commands::ReviewEval {
            summaries,
            output: output_path,
        } => {
            let entries = loader::load_detailed(&summaries)?;
            println!("Evaluating {} topics against their reviews...", entries.len());

            let evaluation =
                review::evaluate(&entries, &opinsum::metrics::rouge::RougeScorer::default());
            output::write_text(&output_path, &review::render(&evaluation))?;

            terminal::display_review(&evaluation);
            println!("Report saved to: {}", output_path.display());
        }

        Commands::GoldStats { gold: gold_dir } => {
            let config = Config::load()?;
            let gold_dir = gold_dir.unwrap_or(config.gold_dir);
            let stats = gold::analyze(&gold_dir)?;
            terminal::display_gold_stats(&stats);
        }

        Commands::DownloadModel => {
            let config = Config::load()?;
            let model_dir = &config.model_dir;

            println!("Downloading ONNX embedding model...");
            println!("  Destination: {}", model_dir.display());

            opinsum::embeddings::download::download_model(model_dir).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("You can now run `opinsum evaluate bertscore --summaries <file>`.");
        }

        Commands::Status => {
            let config = Config::load()?;
            opinsum::status::show(&config)?;
        }
    }

    Ok(())
}
