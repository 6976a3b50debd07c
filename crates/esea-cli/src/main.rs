mod pipeline;
mod source;

use anyhow::Context;
use clap::{Parser, Subcommand};
use esea_core::{MatchId, PageVariant};
use esea_scraper::{classify, extract, CompiledLandmarks, Landmarks, PageSnapshot, SessionTracker};
use esea_store::{GameStore, JsonlStore};
use tracing_subscriber::EnvFilter;

use crate::pipeline::{MatchOutcome, ScrapeSummary};
use crate::source::PageSource;

#[derive(Debug, Parser)]
#[command(name = "esea-cli")]
#[command(about = "Classify and extract ESEA match-report pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the page variant of a match.
    Classify {
        #[arg(long)]
        match_id: MatchId,
    },
    /// Print the extracted game record of a match as JSON.
    Extract {
        #[arg(long)]
        match_id: MatchId,
    },
    /// Fetch, classify, extract and store one or more matches in order.
    Scrape {
        #[arg(long = "match-id", required = true)]
        match_ids: Vec<MatchId>,
        /// Extract without writing to the output file.
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = esea_core::load_app_config_from_env().context("failed to load configuration")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let landmarks = load_landmarks(&config)?;
    let source = PageSource::from_config(&config)?;
    let sessions = SessionTracker::new();

    match cli.command {
        Commands::Classify { match_id } => {
            let _session = sessions.acquire(match_id);
            let snapshot = fetch_snapshot(&source, match_id).await?;
            println!("{}", classify(&snapshot, &landmarks));
        }
        Commands::Extract { match_id } => {
            let _session = sessions.acquire(match_id);
            let snapshot = fetch_snapshot(&source, match_id).await?;
            let variant = classify(&snapshot, &landmarks);
            if variant == PageVariant::Invalid {
                anyhow::bail!("match {match_id} page is INVALID; nothing to extract");
            }
            let record = extract(&snapshot, variant, &landmarks)
                .with_context(|| format!("failed to extract match {match_id}"))?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Scrape { match_ids, dry_run } => {
            let store = JsonlStore::new(&config.output_path);
            let sink: Option<&dyn GameStore> = if dry_run { None } else { Some(&store) };
            let summary =
                pipeline::run_scrape(&source, sink, &landmarks, &sessions, &match_ids).await;
            report(&summary, dry_run, &config.output_path);
            if summary.failed > 0 {
                anyhow::bail!("{} of {} matches failed", summary.failed, match_ids.len());
            }
        }
    }

    Ok(())
}

fn load_landmarks(config: &esea_core::AppConfig) -> anyhow::Result<CompiledLandmarks> {
    let landmarks = match &config.landmarks_path {
        Some(path) => Landmarks::load(path)
            .with_context(|| format!("failed to load landmarks from {}", path.display()))?,
        None => Landmarks::default(),
    };
    landmarks.compile().context("invalid landmarks")
}

async fn fetch_snapshot(source: &PageSource, match_id: MatchId) -> anyhow::Result<PageSnapshot> {
    use esea_scraper::PageFetcher as _;

    let page = source
        .fetch(match_id)
        .await
        .with_context(|| format!("failed to fetch match {match_id}"))?;
    Ok(PageSnapshot::from_page(&page))
}

fn report(summary: &ScrapeSummary, dry_run: bool, output: &std::path::Path) {
    for (match_id, outcome) in &summary.outcomes {
        match outcome {
            MatchOutcome::Stored(variant) => println!("{match_id}\t{variant}\tstored"),
            MatchOutcome::Extracted(variant) => println!("{match_id}\t{variant}\tdry-run"),
            MatchOutcome::SkippedInvalid => println!("{match_id}\tINVALID\tskipped"),
        }
    }
    if dry_run {
        println!(
            "dry-run: {} extracted, {} skipped, {} failed",
            summary.extracted, summary.skipped, summary.failed
        );
    } else {
        println!(
            "{} stored to {}, {} skipped, {} failed",
            summary.extracted,
            output.display(),
            summary.skipped,
            summary.failed
        );
    }
}
