use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use up_core::{Config, Result};
use up_extract::Extractor;
use up_inference::create_generator;
use up_pipeline::{Pipeline, PipelineOptions};
use up_search::Discovery;
use up_storage::create_store;

#[derive(Parser, Debug)]
#[command(author, version, about = "Competitor-informed article enhancement", long_about = None)]
struct Cli {
    /// Article store backend: http or memory
    #[arg(long, default_value = "http")]
    store: String,
    /// Text generation backend: openai or dummy
    #[arg(long, default_value = "openai")]
    generator: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Enhance every eligible source article in one batch
    Run {
        /// Competitor articles gathered per item
        #[arg(long)]
        competitors: Option<usize>,
        /// Seconds to wait between items
        #[arg(long)]
        delay: Option<u64>,
        /// Stop after this many successful publications
        #[arg(long)]
        cap: Option<usize>,
    },
    /// Run discovery and extraction for a topic and print what was found
    Probe { topic: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    match cli.command {
        Commands::Run {
            competitors,
            delay,
            cap,
        } => {
            if let Some(n) = competitors {
                config.competitors_per_item = n;
            }
            if let Some(secs) = delay {
                config.pacing_delay = Duration::from_secs(secs);
            }
            if let Some(n) = cap {
                config.success_cap = n;
            }
            run_batch(&cli.store, &cli.generator, &config).await
        }
        Commands::Probe { topic } => probe(&topic, &config).await,
    }
}

async fn run_batch(store_kind: &str, generator_kind: &str, config: &Config) -> Result<()> {
    let store = create_store(store_kind, config)?;
    info!("💾 Article store ready (using {})", store_kind);

    let generator = create_generator(generator_kind, config)?;
    info!("🧠 Generator ready (using {})", generator.name());

    let discovery = Discovery::from_config(config)?;
    let extractor = Arc::new(Extractor::new(config.fetch_timeout)?);

    let pipeline = Pipeline::new(
        store,
        discovery,
        extractor,
        generator,
        PipelineOptions::from(config),
    );
    let summary = pipeline.run().await?;

    info!(
        "📊 {} published, {} skipped, {} failed ({} attempted)",
        summary.succeeded, summary.skipped, summary.failed, summary.total
    );
    for (title, reason) in &summary.failures {
        info!("   ❌ {}: {}", title, reason);
    }
    Ok(())
}

async fn probe(topic: &str, config: &Config) -> Result<()> {
    let discovery = Discovery::from_config(config)?;
    let extractor = Extractor::new(config.fetch_timeout)?;

    let candidates = discovery
        .discover(topic, config.competitors_per_item)
        .await;
    info!("🔍 {} candidates for '{}'", candidates.len(), topic);

    for candidate in &candidates {
        use up_core::CompetitorExtractor;
        match extractor.extract(candidate).await {
            Some(doc) => info!(
                "📄 {} ({} chars): {}",
                doc.url(),
                doc.text.len(),
                up_extract::text::truncate_chars(&doc.excerpt, 120)
            ),
            None => info!("🚫 {}: no readable content", candidate.url),
        }
    }
    Ok(())
}
