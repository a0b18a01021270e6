use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use data_loader::{MovieDataset, MusicDataset, PromptStyle};
use llm_client::config::token_path;
use llm_client::{Credentials, LlmSettings, OpenAiClient};
use agents::{DescriptionAgent, EmbeddingAgent};
use orchestrator::{PersistSummary, ProfileOrchestrator, RunReport, persist};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// profile-embed - describe users' rating histories with an LLM and embed them
#[derive(Parser)]
#[command(name = "profile-embed")]
#[command(about = "Build natural-language user profiles and embeddings from rating datasets", long_about = None)]
struct Cli {
    /// Dataset to use: MovieLens 1M or Amazon CDs & Vinyl
    #[arg(short, long, value_enum, default_value_t = DatasetName::Ml1m)]
    dataset: DatasetName,

    /// Model provider
    #[arg(short, long, value_enum, default_value_t = AgentKind::Openai)]
    agent: AgentKind,

    /// Only build the prompts, without any calls to the model provider
    #[arg(short, long)]
    test: bool,

    /// Folder for the result files
    #[arg(short, long, default_value = "embeddings")]
    result_folder: PathBuf,

    /// Dataset directory (defaults to data/ml-1m or data/Amazon_CDs_and_Vinyl)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// YAML file holding the provider token
    #[arg(long)]
    token_file: Option<PathBuf>,

    /// Completion model override
    #[arg(long)]
    model: Option<String>,

    /// Embedding model override
    #[arg(long)]
    embedding_model: Option<String>,

    /// Render music ratings grouped by rating value
    #[arg(long)]
    grouped_prompt: bool,

    /// Process at most this many users
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DatasetName {
    #[value(name = "ml-1m")]
    Ml1m,
    Amazon,
}

impl DatasetName {
    fn as_str(&self) -> &'static str {
        match self {
            DatasetName::Ml1m => "ml-1m",
            DatasetName::Amazon => "amazon",
        }
    }

    fn default_data_dir(&self) -> PathBuf {
        match self {
            DatasetName::Ml1m => PathBuf::from("data/ml-1m"),
            DatasetName::Amazon => PathBuf::from("data/Amazon_CDs_and_Vinyl"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AgentKind {
    Openai,
}

impl AgentKind {
    /// Key of this provider's token in the credential file
    fn token_key(&self) -> &'static str {
        match self {
            AgentKind::Openai => "openai",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Credentials come first: a bad token file should fail before any loading
    let token_file = token_path(cli.token_file.as_deref());
    let credentials = Credentials::from_file(&token_file, cli.agent.token_key())
        .context("Failed to load credentials")?;

    let mut orchestrator = build_orchestrator(&cli, &credentials)?;

    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| cli.dataset.default_data_dir());
    println!(
        "Loading {} dataset from {}...",
        cli.dataset.as_str(),
        data_dir.display()
    );

    let start = Instant::now();
    let report = match cli.dataset {
        DatasetName::Ml1m => {
            let mut dataset = MovieDataset::load_from_files(&data_dir)
                .context("Failed to load MovieLens dataset")?;
            print_loaded(dataset.len(), start);
            orchestrator.process(dataset.iter_mut()).await
        }
        DatasetName::Amazon => {
            let style = if cli.grouped_prompt {
                PromptStyle::Grouped
            } else {
                PromptStyle::Summary
            };
            let mut dataset = MusicDataset::load_from_files(&data_dir, style)
                .context("Failed to load Amazon CDs & Vinyl dataset")?;
            print_loaded(dataset.len(), start);
            orchestrator.process(dataset.iter_mut()).await
        }
    };

    let summary = persist(&report, &cli.result_folder, cli.dataset.as_str())
        .context("Failed to save results")?;
    print_summary(&report, &summary, start);

    Ok(())
}

fn build_orchestrator(cli: &Cli, credentials: &Credentials) -> Result<ProfileOrchestrator> {
    let mut settings = LlmSettings::default();
    if let Some(model) = &cli.model {
        settings = settings.with_completion_model(model.clone());
    }
    if let Some(model) = &cli.embedding_model {
        settings = settings.with_embedding_model(model.clone());
    }

    let client = Arc::new(
        OpenAiClient::new(credentials, settings).context("Failed to build model client")?,
    );
    info!(
        "Using {:?} agent with {} (test mode: {})",
        cli.agent,
        client.settings().completion_model,
        cli.test
    );

    let embedding_model = client.settings().embedding_model.clone();
    Ok(ProfileOrchestrator::new(
        DescriptionAgent::new(client.clone()),
        EmbeddingAgent::with_model(client, embedding_model),
    )
    .with_test_mode(cli.test)
    .with_limit(cli.limit))
}

fn print_loaded(users: usize, start: Instant) {
    println!(
        "{} Loaded {} users in {:?}",
        "✓".green(),
        users,
        start.elapsed()
    );
}

/// Colored end-of-run summary
fn print_summary(report: &RunReport, summary: &PersistSummary, start: Instant) {
    println!("{}", "Run summary:".bold().blue());
    println!(
        "{}Profiles written: {} -> {}",
        "• ".green(),
        report.records.len(),
        summary.results_path.display()
    );
    match &summary.errors_path {
        Some(path) => println!(
            "{}Failed users: {} -> {}",
            "• ".red(),
            summary.error_count.to_string().red(),
            path.display()
        ),
        None => println!("{}Failed users: 0", "• ".green()),
    }
    println!("{}Total time: {:.2?}", "• ".cyan(), start.elapsed());
}
