//! Synopsis resolution: turn a possibly-thin provider overview into a
//! substantive description.
//!
//! The resolver keeps the provider text when it is long enough. Otherwise it
//! walks an ordered list of [`DescriptionStrategy`]s and takes the first
//! non-empty answer:
//!
//! 1. localized encyclopedia, searched by localized title
//! 2. localized encyclopedia, searched by original title (only if it differs)
//! 3. secondary encyclopedia, searched by localized title
//! 4. provider overview in a fallback language, prefixed with a marker
//!
//! When every stage comes back empty the short provider text is returned
//! as-is, so the description is never blank if anything was available.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::item::Category;
use crate::normalize::{char_len, truncate_chars};
use crate::source::{Encyclopedia, MetadataSource};

/// Provider text at least this long is used verbatim.
pub const MIN_PRIMARY_CHARS: usize = 30;
/// Encyclopedia summaries are cut to this many characters.
pub const SUMMARY_CHAR_BUDGET: usize = 600;
/// Prefix for descriptions taken from the fallback-language overview.
pub const NO_LOCALIZED_MARKER: &str = "【暂无中文简介】";

/// Everything a strategy may look at.
#[derive(Debug, Clone)]
pub struct ResolveContext<'a> {
    pub primary_text: &'a str,
    pub title_localized: &'a str,
    pub title_original: &'a str,
    pub category: Category,
    pub id: u64,
}

/// One stage of the fallback chain. `None` means "try the next one".
#[async_trait]
pub trait DescriptionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn attempt(&self, ctx: &ResolveContext<'_>) -> Option<String>;
}

/// Which title an encyclopedia lookup searches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTitle {
    Localized,
    /// Skipped when the original title equals the localized one.
    Original,
}

/// Search an encyclopedia and tag the summary with its source.
pub struct EncyclopediaLookup {
    source: Arc<dyn Encyclopedia>,
    title: SearchTitle,
    name: &'static str,
}

impl EncyclopediaLookup {
    pub fn new(source: Arc<dyn Encyclopedia>, title: SearchTitle, name: &'static str) -> Self {
        Self { source, title, name }
    }
}

/// `（来源：<label>）`
pub fn provenance_tag(label: &str) -> String {
    format!("（来源：{label}）")
}

#[async_trait]
impl DescriptionStrategy for EncyclopediaLookup {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn attempt(&self, ctx: &ResolveContext<'_>) -> Option<String> {
        let query = match self.title {
            SearchTitle::Localized => ctx.title_localized,
            SearchTitle::Original => {
                if ctx.title_original == ctx.title_localized {
                    return None;
                }
                ctx.title_original
            }
        };
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let summary = self.source.summary(query).await?;
        let summary = summary.trim();
        if summary.is_empty() {
            return None;
        }
        Some(format!(
            "{}{}",
            truncate_chars(summary, SUMMARY_CHAR_BUDGET),
            provenance_tag(self.source.label())
        ))
    }
}

/// Ask the provider for the overview in another language.
pub struct ForeignLanguageFallback {
    source: Arc<dyn MetadataSource>,
    language: String,
}

impl ForeignLanguageFallback {
    pub fn new(source: Arc<dyn MetadataSource>, language: impl Into<String>) -> Self {
        Self {
            source,
            language: language.into(),
        }
    }
}

#[async_trait]
impl DescriptionStrategy for ForeignLanguageFallback {
    fn name(&self) -> &'static str {
        "foreign-language"
    }

    async fn attempt(&self, ctx: &ResolveContext<'_>) -> Option<String> {
        let text = self
            .source
            .description(ctx.category, ctx.id, &self.language)
            .await?;
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(format!("{NO_LOCALIZED_MARKER}{text}"))
    }
}

/// Ordered fallback chain over [`DescriptionStrategy`]s.
pub struct DescriptionResolver {
    strategies: Vec<Box<dyn DescriptionStrategy>>,
}

impl DescriptionResolver {
    pub fn new(strategies: Vec<Box<dyn DescriptionStrategy>>) -> Self {
        Self { strategies }
    }

    /// The standard four-stage chain.
    pub fn standard(
        localized: Arc<dyn Encyclopedia>,
        secondary: Arc<dyn Encyclopedia>,
        metadata: Arc<dyn MetadataSource>,
        fallback_language: impl Into<String>,
    ) -> Self {
        Self::new(vec![
            Box::new(EncyclopediaLookup::new(
                Arc::clone(&localized),
                SearchTitle::Localized,
                "encyclopedia-localized-title",
            )),
            Box::new(EncyclopediaLookup::new(
                localized,
                SearchTitle::Original,
                "encyclopedia-original-title",
            )),
            Box::new(EncyclopediaLookup::new(
                secondary,
                SearchTitle::Localized,
                "secondary-encyclopedia",
            )),
            Box::new(ForeignLanguageFallback::new(metadata, fallback_language)),
        ])
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub async fn resolve(&self, ctx: &ResolveContext<'_>) -> String {
        let primary = ctx.primary_text;
        if char_len(primary) >= MIN_PRIMARY_CHARS && !primary.trim().is_empty() {
            return primary.to_string();
        }

        info!(
            category = %ctx.category,
            id = ctx.id,
            title = ctx.title_localized,
            "primary description too short, trying fallbacks"
        );
        for strategy in &self.strategies {
            debug!(strategy = strategy.name(), "attempting description source");
            if let Some(text) = strategy.attempt(ctx).await {
                info!(strategy = strategy.name(), "description resolved");
                return text;
            }
        }

        info!(
            category = %ctx.category,
            id = ctx.id,
            "no fallback produced a description, keeping provider text"
        );
        ctx.primary_text.to_string()
    }
}
