//! One run of the daily job.
//!
//! Load (or reset) the catalog, pick one unseen trending title per
//! category, enrich it, and persist the extended catalog in one write.

use std::sync::Arc;

use chrono::{NaiveDate, SecondsFormat, Utc, Weekday};
use tracing::{info, warn};

use crate::assemble::{Enrichment, assemble};
use crate::error::PipelineError;
use crate::item::{Catalog, CatalogItem, Category};
use crate::resolver::{DescriptionResolver, ResolveContext};
use crate::schedule::{reset_due, select_candidate};
use crate::source::{ArtworkSink, MetadataSource, TrendingCandidate, artwork_file_name};
use crate::store::CatalogStore;

/// Per-invocation settings.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Calendar day of the run, used for the reset decision.
    pub date: NaiveDate,
    pub reset_day: Weekday,
    pub categories: Vec<Category>,
    /// Fetch and resolve, but write nothing (no reset, no images, no catalog).
    pub dry_run: bool,
}

/// What happened to one category.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryOutcome {
    Added { id: u64, title: String },
    /// Every trending id was already in the catalog.
    NothingNew,
    /// The selected candidate had no usable title.
    Invalid { id: u64 },
    TrendingUnavailable(String),
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub reset: bool,
    pub outcomes: Vec<(Category, CategoryOutcome)>,
    pub added: Vec<CatalogItem>,
    pub catalog_len: usize,
}

pub struct Pipeline<S> {
    metadata: Arc<dyn MetadataSource>,
    resolver: DescriptionResolver,
    artwork: Arc<dyn ArtworkSink>,
    store: S,
}

impl<S: CatalogStore> Pipeline<S> {
    pub fn new(
        metadata: Arc<dyn MetadataSource>,
        resolver: DescriptionResolver,
        artwork: Arc<dyn ArtworkSink>,
        store: S,
    ) -> Self {
        Self {
            metadata,
            resolver,
            artwork,
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn run(&self, config: &RunConfig) -> Result<RunReport, PipelineError> {
        let reset = reset_due(config.date, config.reset_day, self.store.last_reset());
        let mut catalog = if reset {
            if config.dry_run {
                info!(date = %config.date, "reset day: dry run, treating catalog as empty");
            } else {
                info!(date = %config.date, "reset day: discarding catalog and artwork");
                self.store.reset(config.date).map_err(store_error)?;
            }
            Catalog::new()
        } else {
            self.store.load()
        };
        info!(items = catalog.len(), "catalog loaded");

        let mut outcomes = Vec::with_capacity(config.categories.len());
        let mut added = Vec::new();

        for &category in &config.categories {
            info!(%category, "processing category");
            let trending = match self.metadata.trending(category).await {
                Ok(list) => list,
                Err(e) => {
                    warn!(%category, error = %e, "trending fetch failed");
                    outcomes.push((category, CategoryOutcome::TrendingUnavailable(e.reason)));
                    continue;
                }
            };

            let seen = catalog.seen();
            let Some(candidate) = select_candidate(category, &trending, &seen) else {
                info!(%category, candidates = trending.len(), "nothing new trending");
                outcomes.push((category, CategoryOutcome::NothingNew));
                continue;
            };
            info!(%category, id = candidate.id, title = %candidate.title, "selected candidate");

            match self.enrich(category, candidate, config.dry_run).await {
                Some(item) => {
                    outcomes.push((
                        category,
                        CategoryOutcome::Added {
                            id: item.id,
                            title: item.title.clone(),
                        },
                    ));
                    catalog.push(item.clone());
                    added.push(item);
                }
                None => {
                    warn!(%category, id = candidate.id, "candidate has no title, skipping");
                    outcomes.push((category, CategoryOutcome::Invalid { id: candidate.id }));
                }
            }
        }

        let all_unavailable = !outcomes.is_empty()
            && outcomes
                .iter()
                .all(|(_, o)| matches!(o, CategoryOutcome::TrendingUnavailable(_)));
        if all_unavailable {
            return Err(PipelineError::TrendingUnavailable);
        }

        if !added.is_empty() && !config.dry_run {
            self.store.save(&catalog).map_err(store_error)?;
            self.store.publish_latest(&added).map_err(store_error)?;
            info!(added = added.len(), total = catalog.len(), "catalog saved");
        }

        Ok(RunReport {
            reset,
            outcomes,
            added,
            catalog_len: catalog.len(),
        })
    }

    async fn enrich(
        &self,
        category: Category,
        candidate: &TrendingCandidate,
        dry_run: bool,
    ) -> Option<CatalogItem> {
        let id = candidate.id;
        let detail = match self.metadata.detail(category, id).await {
            Some(detail) => detail,
            None => {
                warn!(%category, id, "detail unavailable, using trending fields");
                candidate.to_detail()
            }
        };

        let credits = self.metadata.credits(category, id).await;
        let reviews = self.metadata.reviews(category, id).await;
        let external_ref = self.metadata.external_ref(category, id).await;

        let description = self
            .resolver
            .resolve(&ResolveContext {
                primary_text: &detail.overview,
                title_localized: &detail.title,
                title_original: &detail.original_title,
                category,
                id,
            })
            .await;

        let (poster_ref, backdrop_ref) = if dry_run {
            (None, None)
        } else {
            let poster = match &detail.poster_path {
                Some(path) => {
                    let url = self.metadata.poster_url(path);
                    self.artwork
                        .store(&url, &artwork_file_name(category, id, "poster"))
                        .await
                }
                None => None,
            };
            let backdrop = match &detail.backdrop_path {
                Some(path) => {
                    let url = self.metadata.backdrop_url(path);
                    self.artwork
                        .store(&url, &artwork_file_name(category, id, "backdrop"))
                        .await
                }
                None => None,
            };
            (poster, backdrop)
        };

        assemble(
            category,
            Enrichment {
                detail,
                credits,
                reviews,
                external_ref,
                description,
                poster_ref,
                backdrop_ref,
                fetched_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            },
        )
    }
}

fn store_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> PipelineError {
    PipelineError::Store(Box::new(e))
}
