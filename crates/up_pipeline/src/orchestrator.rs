use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{info, warn};
use up_core::{
    ArticleStore, CompetitorExtractor, Config, Error, Result, SourceArticle, TextGenerator,
    STATUS_ORIGINAL, STATUS_UPDATED,
};
use up_inference::{ContentEnhancer, GapAnalyzer};
use up_search::Discovery;

use crate::citations;

/// Operational knobs for one batch run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub competitors_per_item: usize,
    pub pacing_delay: Duration,
    pub success_cap: usize,
}

impl From<&Config> for PipelineOptions {
    fn from(config: &Config) -> Self {
        Self {
            competitors_per_item: config.competitors_per_item,
            pacing_delay: config.pacing_delay,
            success_cap: config.success_cap,
        }
    }
}

/// How one source article fared.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Published { id: String },
    Skipped(String),
    Failed(String),
}

/// Accounting for a whole batch. `total` counts attempted items only, so
/// `succeeded + skipped + failed == total` always holds.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub failures: Vec<(String, String)>,
}

impl RunSummary {
    fn record(&mut self, source: &SourceArticle, outcome: &ItemOutcome) {
        self.total += 1;
        match outcome {
            ItemOutcome::Published { id } => {
                self.succeeded += 1;
                info!("✅ Published enhanced '{}' as article {}", source.title, id);
            }
            ItemOutcome::Skipped(reason) => {
                self.skipped += 1;
                info!("⏭️ Skipped '{}': {}", source.title, reason);
            }
            ItemOutcome::Failed(reason) => {
                self.failed += 1;
                self.failures.push((source.title.clone(), reason.clone()));
                warn!("❌ Failed '{}': {}", source.title, reason);
            }
        }
    }
}

/// Batch orchestrator: walks eligible source articles, runs discovery,
/// extraction, analysis and enhancement per item, and publishes the results.
/// Per-item failures are isolated; only configuration errors abort the run.
pub struct Pipeline {
    store: Arc<dyn ArticleStore>,
    discovery: Discovery,
    extractor: Arc<dyn CompetitorExtractor>,
    gap: GapAnalyzer,
    enhancer: ContentEnhancer,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn ArticleStore>,
        discovery: Discovery,
        extractor: Arc<dyn CompetitorExtractor>,
        generator: Arc<dyn TextGenerator>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            store,
            discovery,
            extractor,
            gap: GapAnalyzer::new(generator.clone()),
            enhancer: ContentEnhancer::new(generator),
            options,
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let sources = self.store.list_source_articles(STATUS_ORIGINAL).await?;
        // The dedup set is as load-bearing as the source list: publishing
        // without it risks duplicates, so a listing failure here aborts the
        // run before any item is attempted, same as the source fetch.
        let derived: HashSet<String> = self
            .store
            .list_derived_urls(STATUS_UPDATED)
            .await?
            .into_iter()
            .collect();

        let eligible: Vec<&SourceArticle> = sources
            .iter()
            .filter(|source| match &source.original_url {
                Some(url) => !derived.contains(url),
                None => true,
            })
            .collect();
        info!(
            "🚀 {} of {} source articles eligible (cap {})",
            eligible.len(),
            sources.len(),
            self.options.success_cap
        );

        let mut summary = RunSummary::default();
        let mut remaining = eligible.len();

        for source in eligible {
            if summary.succeeded >= self.options.success_cap {
                info!("🧢 Success cap reached, stopping the batch");
                break;
            }

            let outcome = self.process_item(source).await?;
            summary.record(source, &outcome);
            remaining -= 1;

            if remaining > 0
                && summary.succeeded < self.options.success_cap
                && !self.options.pacing_delay.is_zero()
            {
                tokio::time::sleep(self.options.pacing_delay).await;
            }
        }

        info!(
            "🏁 Batch done: {} published, {} skipped, {} failed of {}",
            summary.succeeded, summary.skipped, summary.failed, summary.total
        );
        Ok(summary)
    }

    /// Handle one source article end to end. Returns Err only for fatal
    /// errors; every per-item problem becomes a Skipped or Failed outcome.
    async fn process_item(&self, source: &SourceArticle) -> Result<ItemOutcome> {
        info!("📰 Enhancing '{}'", source.title);

        // Over-budget bodies can never verify preservation, so they are
        // skipped before any search or generation spend.
        if source.content.chars().count() > up_inference::MAX_SOURCE_CHARS {
            return Ok(ItemOutcome::Skipped(format!(
                "source body exceeds the {} char enhancement budget",
                up_inference::MAX_SOURCE_CHARS
            )));
        }

        let candidates = self
            .discovery
            .discover(&source.title, self.options.competitors_per_item)
            .await;
        if candidates.is_empty() {
            return Ok(ItemOutcome::Skipped("no competitors discovered".to_string()));
        }

        let documents: Vec<_> = join_all(
            candidates
                .iter()
                .map(|candidate| self.extractor.extract(candidate)),
        )
        .await
        .into_iter()
        .flatten()
        .collect();
        if documents.is_empty() {
            return Ok(ItemOutcome::Skipped(
                "no competitor content extracted".to_string(),
            ));
        }
        info!(
            "🔬 {} of {} competitors yielded content",
            documents.len(),
            candidates.len()
        );

        let gap_analysis = self.gap.analyze(source, &documents).await?;

        let enhancement = match self.enhancer.enhance(source, &documents).await {
            Ok(enhancement) => enhancement,
            Err(Error::ContentPreservation(reason)) => {
                return Ok(ItemOutcome::Skipped(format!(
                    "enhancement discarded: {}",
                    reason
                )));
            }
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                return Ok(ItemOutcome::Failed(format!("enhancement failed: {}", err)))
            }
        };

        let block = citations::assemble(&documents);
        let mut content = enhancement.body.render();
        if !block.is_empty() {
            content.push('\n');
            content.push_str(&block.html);
        }

        let payload = up_core::EnhancedArticlePayload {
            title: enhancement.title,
            content,
            excerpt: source.excerpt.clone(),
            author: source.author.clone(),
            published_at: source.published_at,
            featured_image: source.featured_image.clone(),
            original_url: source.original_url.clone(),
            competitor_references: block.records,
            gap_analysis,
            status: STATUS_UPDATED.to_string(),
        };

        match self.store.create_article(&payload).await {
            Ok(created) => Ok(ItemOutcome::Published { id: created.id }),
            Err(err) if err.is_fatal() => Err(err),
            Err(err) => Ok(ItemOutcome::Failed(format!("publish failed: {}", err))),
        }
    }
}
