use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use docret_core::config::Config;
use docret_core::DistanceMetric;
use docret_retriever::{DocumentRetriever, DEFAULT_CONTEXT_K, DEFAULT_MAX_RESULTS, DEFAULT_THRESHOLD};

#[derive(Parser)]
#[command(name = "docret", about = "Query a pre-built document vector index")]
struct Cli {
    /// Configuration environment (dev, prod, test); defaults to RUST_ENV or dev
    #[arg(long, global = true)]
    config_env: Option<String>,
    /// Index directory, overriding retriever.index_dir
    #[arg(long, global = true)]
    index: Option<PathBuf>,
    /// Table name, overriding retriever.table
    #[arg(long, global = true)]
    table: Option<String>,
    /// Embedding model used to build the index, overriding retriever.embedding.model
    #[arg(long, global = true)]
    model: Option<String>,
    /// Distance metric of the index (l2, cosine, dot)
    #[arg(long, global = true)]
    metric: Option<DistanceMetric>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ranked results with source, page and distance
    Search {
        query: String,
        #[arg(short)]
        k: Option<usize>,
        /// Emit records as JSON instead of the console view
        #[arg(long)]
        json: bool,
    },
    /// Raw (chunk, score) pairs
    Scores {
        query: String,
        #[arg(short)]
        k: Option<usize>,
        /// Relevance (higher is better) instead of distance
        #[arg(long)]
        relevance: bool,
    },
    /// Only results whose distance is at most the threshold
    Filter {
        query: String,
        #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f32,
        #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
        max_results: usize,
    },
    /// The context block handed to a language model
    Context {
        query: String,
        #[arg(short, default_value_t = DEFAULT_CONTEXT_K)]
        k: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let env_name = cli.config_env.clone().unwrap_or_else(|| std::env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string()));
    let config = Config::load_for_env(Path::new("."), &env_name).context("loading configuration")?;
    let mut settings = config.retriever()?;
    if let Some(index) = &cli.index { settings.index_dir = index.to_string_lossy().to_string(); }
    if let Some(table) = &cli.table { settings.table = table.clone(); }
    if let Some(model) = &cli.model { settings.embedding.model = model.clone(); }
    if let Some(metric) = cli.metric { settings.metric = metric; }
    tracing::debug!(env = config.env_name(), ?settings, "resolved settings");

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Loading {} and {}", settings.embedding.model, settings.index_dir));
    let retriever = DocumentRetriever::from_settings(&settings, Path::new("."));
    spinner.finish_and_clear();
    let retriever = retriever?;

    match cli.command {
        Command::Search { query, k, json } => {
            let k = k.unwrap_or(settings.default_k);
            if json {
                println!("{}", serde_json::to_string_pretty(&retriever.detailed_search(&query, k)?)?);
            } else {
                retriever.search_and_print_results(&query, k)?;
            }
        }
        Command::Scores { query, k, relevance } => {
            let k = k.unwrap_or(settings.default_k);
            let (hits, label) = if relevance {
                (retriever.search_with_relevance_scores(&query, k)?, "relevance")
            } else {
                (retriever.search_with_scores(&query, k)?, "distance")
            };
            for (i, hit) in hits.iter().enumerate() {
                println!("{}. {}={:.4}  {}", i + 1, label, hit.score, one_line(&hit.chunk.content));
            }
        }
        Command::Filter { query, threshold, max_results } => {
            let hits = retriever.filter_by_score_threshold(&query, threshold, max_results)?;
            println!("{} result(s) with distance <= {}", hits.len(), threshold);
            for (i, hit) in hits.iter().enumerate() {
                println!("{}. distance={:.4}  {}", i + 1, hit.score, one_line(&hit.chunk.content));
            }
        }
        Command::Context { query, k } => {
            print!("{}", retriever.get_context_for_llm(&query, k)?);
        }
    }
    Ok(())
}

fn one_line(content: &str) -> String {
    content.split_whitespace().collect::<Vec<_>>().join(" ")
}
