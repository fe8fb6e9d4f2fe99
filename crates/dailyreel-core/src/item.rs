//! Catalog records shared by the store, the sources, and the pipeline.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Media kind. Identity of an item is `(Category, id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Film,
    Series,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Film, Category::Series];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Film => "film",
            Self::Series => "series",
        }
    }

    /// Path segment the metadata provider uses for this category.
    pub fn api_path(&self) -> &'static str {
        match self {
            Self::Film => "movie",
            Self::Series => "tv",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "film" | "movie" => Ok(Self::Film),
            "series" | "tv" => Ok(Self::Series),
            other => Err(format!("unknown category '{other}' (expected film or series)")),
        }
    }
}

/// One enriched trending title as persisted in `catalog.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: u64,
    pub category: Category,
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    /// 0.0..=10.0, one decimal place.
    pub rating: f64,
    /// ISO date, empty when unknown.
    #[serde(default)]
    pub release_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub directors: Vec<String>,
    #[serde(default)]
    pub actors: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub reviews: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_ref: Option<String>,
    /// RFC 3339 timestamp string.
    pub fetched_at: String,
}

impl CatalogItem {
    pub fn key(&self) -> (Category, u64) {
        (self.category, self.id)
    }
}

/// The rolling weekly window of announced items, in announcement order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Identity keys of everything already announced.
    pub fn seen(&self) -> HashSet<(Category, u64)> {
        self.items.iter().map(CatalogItem::key).collect()
    }

    pub fn contains(&self, category: Category, id: u64) -> bool {
        self.items.iter().any(|i| i.category == category && i.id == id)
    }

    /// Append an item. Uniqueness is the caller's job (see `select_candidate`).
    pub fn push(&mut self, item: CatalogItem) {
        self.items.push(item);
    }
}
