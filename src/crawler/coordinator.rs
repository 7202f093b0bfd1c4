//! Harvest coordinator - main crawl orchestration logic
//!
//! This module drives a complete run:
//! - Validating and fetching the district listing page
//! - Resolving municipality links
//! - Fetching every detail page, sequentially or in ordered windows
//! - Extracting summaries and tallies and unifying the party columns
//! - Assembling the final dataset and run report
//!
//! Any failure aborts the whole run; there is no partial dataset.

use crate::config::{Config, SummaryConfig};
use crate::crawler::document::Document;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::links::resolve_links;
use crate::crawler::summary::extract_summary;
use crate::crawler::tallies::extract_tallies;
use crate::dataset::{Dataset, Row, SchemaUnifier, SubEntity, SummaryStats, TallyMap};
use crate::output::{DroppedCategories, RunReport};
use crate::url::{base_url, validate_listing_url};
use crate::{HarvestError, Result};
use chrono::Utc;
use tokio::task::JoinSet;

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct Harvest {
    pub dataset: Dataset,
    pub report: RunReport,
}

/// Everything extracted from one detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPage {
    pub summary: SummaryStats,
    pub tallies: TallyMap,
}

/// Parses a detail page body into its summary and tallies
pub fn parse_detail(body: &str, url: &str, config: &SummaryConfig) -> Result<DetailPage> {
    let doc = Document::parse(body);
    let summary = extract_summary(&doc, config)?;
    let tallies = extract_tallies(&doc, url)?;
    Ok(DetailPage { summary, tallies })
}

/// Main harvest coordinator structure
pub struct Coordinator {
    config: Config,
    fetcher: Fetcher,
}

impl Coordinator {
    /// Creates a coordinator with an HTTP client built from `config`
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = Fetcher::new(&config)?;
        Ok(Self::with_fetcher(config, fetcher))
    }

    pub fn with_fetcher(config: Config, fetcher: Fetcher) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetches the listing page and resolves its municipalities
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SubEntity>)` - At least one municipality, in listing order
    /// * `Err(HarvestError::InvalidListingUrl)` - Rejected before any fetch
    /// * `Err(HarvestError::NoSubEntities)` - The listing links no municipality
    pub async fn discover(&self, listing_url: &str) -> Result<Vec<SubEntity>> {
        let listing_url = listing_url.trim();
        validate_listing_url(listing_url, &self.config.crawler.listing_marker)?;

        tracing::info!("Downloading data from: {}", listing_url);
        let listing = self.fetcher.fetch_document(listing_url).await?;

        let entities = resolve_links(
            &listing,
            &base_url(listing_url),
            &self.config.crawler.detail_marker,
        )?;

        if entities.is_empty() {
            return Err(HarvestError::NoSubEntities {
                url: listing_url.to_string(),
            });
        }

        tracing::info!("Found {} municipalities", entities.len());
        Ok(entities)
    }

    /// Runs a complete harvest of `listing_url`
    ///
    /// The party columns are fixed by the first municipality in listing order,
    /// even when detail pages are fetched concurrently.
    pub async fn run(&self, listing_url: &str) -> Result<Harvest> {
        let started_at = Utc::now();
        let entities = self.discover(listing_url).await?;
        let total = entities.len();
        let window = self.config.crawler.max_concurrent_fetches.max(1);

        let mut unifier = SchemaUnifier::new();
        let mut rows = Vec::with_capacity(total);
        let mut dropped = Vec::new();

        for (chunk_index, chunk) in entities.chunks(window).enumerate() {
            let bodies = self.fetch_window(chunk_index * window, total, chunk).await?;

            for (entity, body) in chunk.iter().zip(bodies) {
                let page = parse_detail(&body, &entity.detail_url, &self.config.summary)
                    .map_err(|e| e.for_page(entity.code, &entity.name))?;

                let projection = unifier.project(&page.tallies);
                if !projection.dropped.is_empty() {
                    tracing::warn!(
                        "{} ({}): parties missing from the column header are dropped: {}",
                        entity.name,
                        entity.code,
                        projection.dropped.join(", ")
                    );
                    dropped.push(DroppedCategories {
                        code: entity.code,
                        name: entity.name.clone(),
                        categories: projection.dropped,
                    });
                }

                rows.push(Row::new(entity, page.summary, projection.counts));
            }
        }

        let dataset = Dataset::new(unifier.into_header(), rows);
        let report = RunReport {
            started_at,
            finished_at: Utc::now(),
            municipalities: dataset.len(),
            categories: dataset.schema().len(),
            dropped,
        };

        tracing::info!(
            "Harvest completed: {} municipalities, {} parties in {:.1}s",
            report.municipalities,
            report.categories,
            report.elapsed_seconds()
        );

        Ok(Harvest { dataset, report })
    }

    /// Fetches the detail pages of one window, returning bodies in window order
    ///
    /// `offset` is the listing index of the window's first municipality.
    async fn fetch_window(
        &self,
        offset: usize,
        total: usize,
        chunk: &[SubEntity],
    ) -> Result<Vec<String>> {
        if chunk.len() == 1 {
            let entity = &chunk[0];
            log_progress(offset, total, entity);
            let body = self
                .fetcher
                .fetch_text(&entity.detail_url)
                .await
                .map_err(|e| e.for_page(entity.code, &entity.name))?;
            return Ok(vec![body]);
        }

        let mut tasks = JoinSet::new();
        for (i, entity) in chunk.iter().enumerate() {
            log_progress(offset + i, total, entity);
            let fetcher = self.fetcher.clone();
            let entity = entity.clone();
            tasks.spawn(async move {
                let body = fetcher
                    .fetch_text(&entity.detail_url)
                    .await
                    .map_err(|e| e.for_page(entity.code, &entity.name));
                (i, body)
            });
        }

        let mut bodies: Vec<Option<String>> = vec![None; chunk.len()];
        while let Some(joined) = tasks.join_next().await {
            let (i, body) = joined?;
            bodies[i] = Some(body?);
        }

        Ok(bodies.into_iter().flatten().collect())
    }
}

fn log_progress(index: usize, total: usize, entity: &SubEntity) {
    tracing::info!(
        "({}/{}) Processing municipality: {} ({})",
        index + 1,
        total,
        entity.name,
        entity.code
    );
}
