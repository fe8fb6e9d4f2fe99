//! Ports to the outside world: the metadata provider, encyclopedias, and
//! artwork storage.
//!
//! Every method except [`MetadataSource::trending`] is fail-soft: an
//! implementation catches its own network and parse errors and hands back
//! the empty value instead. Only the trending list can fail loudly, because
//! losing it for every category leaves the run with nothing to do.

use async_trait::async_trait;
use thiserror::Error;

use crate::item::Category;
use crate::normalize::Credits;

/// The trending endpoint could not be read at all.
#[derive(Debug, Error)]
#[error("trending list unavailable for {category}: {reason}")]
pub struct TrendingUnavailable {
    pub category: Category,
    pub reason: String,
}

/// A row of the provider's "trending today" listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendingCandidate {
    pub id: u64,
    pub title: String,
    pub original_title: String,
    pub overview: String,
    pub rating: f64,
    pub release_date: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

impl TrendingCandidate {
    /// Best-effort detail record when the detail endpoint is unavailable.
    pub fn to_detail(&self) -> ItemDetail {
        ItemDetail {
            id: self.id,
            title: self.title.clone(),
            original_title: self.original_title.clone(),
            overview: self.overview.clone(),
            rating: self.rating,
            release_date: self.release_date.clone(),
            poster_path: self.poster_path.clone(),
            backdrop_path: self.backdrop_path.clone(),
            ..ItemDetail::default()
        }
    }
}

/// Item detail with film/series field names already unified.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDetail {
    pub id: u64,
    pub title: String,
    pub original_title: String,
    pub overview: String,
    pub tagline: Option<String>,
    pub rating: f64,
    pub release_date: String,
    pub runtime: Option<u32>,
    pub genres: Vec<String>,
    /// Series creators; used when the crew lists no director.
    pub creators: Vec<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn trending(
        &self,
        category: Category,
    ) -> Result<Vec<TrendingCandidate>, TrendingUnavailable>;

    async fn detail(&self, category: Category, id: u64) -> Option<ItemDetail>;

    /// Directors and billed actors, already capped.
    async fn credits(&self, category: Category, id: u64) -> Credits;

    /// Review excerpts, already filtered, ordered, and capped.
    async fn reviews(&self, category: Category, id: u64) -> Vec<String>;

    async fn external_ref(&self, category: Category, id: u64) -> Option<String>;

    /// The item's overview in a specific language, if the provider has one.
    async fn description(&self, category: Category, id: u64, language: &str) -> Option<String>;

    fn poster_url(&self, path: &str) -> String;

    fn backdrop_url(&self, path: &str) -> String;
}

/// A free-text searchable encyclopedia.
#[async_trait]
pub trait Encyclopedia: Send + Sync {
    /// Human-readable source name used in provenance tags.
    fn label(&self) -> &str;

    /// Summary of the best-matching page for `query`, or `None`.
    async fn summary(&self, query: &str) -> Option<String>;
}

/// Downloads an image and persists it under a derived name.
#[async_trait]
pub trait ArtworkSink: Send + Sync {
    /// Returns the relative storage reference on success.
    async fn store(&self, url: &str, file_name: &str) -> Option<String>;
}

/// Deterministic artwork file name for an item.
pub fn artwork_file_name(category: Category, id: u64, kind: &str) -> String {
    format!("{category}_{id}_{kind}.jpg")
}
