use chrono::NaiveDate;

use crate::item::{Catalog, CatalogItem};

/// Persistence for the rolling catalog and its artwork.
pub trait CatalogStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the persisted catalog. Missing or unreadable state is an empty catalog.
    fn load(&self) -> Catalog;

    /// Replace the persisted catalog with `catalog`.
    fn save(&self, catalog: &Catalog) -> Result<(), Self::Error>;

    /// Discard the catalog and all stored artwork, recording `date` as the reset date.
    fn reset(&self, date: NaiveDate) -> Result<(), Self::Error>;

    /// Date of the most recent reset, if any.
    fn last_reset(&self) -> Option<NaiveDate>;

    /// Publish the items added by the current run as the "latest" snapshot.
    fn publish_latest(&self, items: &[CatalogItem]) -> Result<(), Self::Error>;
}
