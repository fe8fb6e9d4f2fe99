//! Combine adapter outputs into a [`CatalogItem`].

use crate::item::{CatalogItem, Category};
use crate::normalize::{Credits, MAX_ACTORS, MAX_DIRECTORS, MAX_REVIEWS, round_rating};
use crate::source::ItemDetail;

/// Everything gathered for one candidate.
#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    pub detail: ItemDetail,
    pub credits: Credits,
    pub reviews: Vec<String>,
    pub external_ref: Option<String>,
    pub description: String,
    pub poster_ref: Option<String>,
    pub backdrop_ref: Option<String>,
    pub fetched_at: String,
}

/// Build the output record, or `None` when the item has no usable title.
pub fn assemble(category: Category, enrichment: Enrichment) -> Option<CatalogItem> {
    let Enrichment {
        detail,
        credits,
        reviews,
        external_ref,
        description,
        poster_ref,
        backdrop_ref,
        fetched_at,
    } = enrichment;

    let title = detail.title.trim().to_string();
    if title.is_empty() {
        return None;
    }
    let original_title = match detail.original_title.trim() {
        "" => title.clone(),
        t => t.to_string(),
    };

    let directors = if credits.directors.is_empty() {
        detail.creators
    } else {
        credits.directors
    };

    Some(CatalogItem {
        id: detail.id,
        category,
        title,
        original_title,
        tagline: detail.tagline.filter(|t| !t.trim().is_empty()),
        rating: round_rating(detail.rating),
        release_date: detail.release_date,
        runtime: detail.runtime.filter(|&m| m > 0),
        genres: detail.genres,
        directors: directors.into_iter().take(MAX_DIRECTORS).collect(),
        actors: credits.actors.into_iter().take(MAX_ACTORS).collect(),
        description,
        reviews: reviews.into_iter().take(MAX_REVIEWS).collect(),
        poster_ref,
        backdrop_ref,
        external_ref: external_ref.filter(|r| !r.trim().is_empty()),
        fetched_at,
    })
}
