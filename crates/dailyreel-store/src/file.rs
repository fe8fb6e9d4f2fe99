//! File-backed catalog store.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use dailyreel_core::{Catalog, CatalogItem, CatalogStore};
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::StoreError;

const CATALOG_FILE: &str = "catalog.json";
const LATEST_FILE: &str = "latest.json";
const RESET_MARKER_FILE: &str = ".last_reset";
const IMAGES_DIR: &str = "images";

/// Catalog store rooted at a data directory.
///
/// Layout:
/// - `catalog.json`: the rolling catalog, a JSON array of items
/// - `latest.json`: items added by the most recent run that added any
/// - `images/`: downloaded posters and backdrops
/// - `.last_reset`: ISO date of the last weekly reset
///
/// Every write goes to a temporary file in the same directory and is then
/// renamed over the target, so an interrupted run leaves the previous file
/// intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self { root: root.into() };
        let images = store.images_dir();
        fs::create_dir_all(&images).map_err(|e| StoreError::io(&images, e))?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.root.join(CATALOG_FILE)
    }

    pub fn latest_path(&self) -> PathBuf {
        self.root.join(LATEST_FILE)
    }

    /// Directory artwork is written into.
    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }

    fn marker_path(&self) -> PathBuf {
        self.root.join(RESET_MARKER_FILE)
    }

    // ── Writes ──

    fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_atomic(path, &bytes)
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let mut tmp = NamedTempFile::new_in(&self.root).map_err(|e| StoreError::io(&self.root, e))?;
        tmp.write_all(bytes).map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.persist(path)?;
        Ok(())
    }

    fn remove_file_if_present(path: &Path) -> Result<(), StoreError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }
}

impl CatalogStore for FileStore {
    type Error = StoreError;

    fn load(&self) -> Catalog {
        let path = self.catalog_path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no catalog yet, starting empty");
                return Catalog::new();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "catalog unreadable, starting empty");
                return Catalog::new();
            }
        };
        match serde_json::from_slice::<Catalog>(&bytes) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "catalog corrupt, starting empty");
                Catalog::new()
            }
        }
    }

    fn save(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let path = self.catalog_path();
        self.write_json(&path, catalog)?;
        info!(path = %path.display(), items = catalog.len(), "wrote catalog");
        Ok(())
    }

    fn reset(&self, date: NaiveDate) -> Result<(), StoreError> {
        Self::remove_file_if_present(&self.catalog_path())?;
        Self::remove_file_if_present(&self.latest_path())?;

        let images = self.images_dir();
        match fs::remove_dir_all(&images) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::io(&images, e)),
        }
        fs::create_dir_all(&images).map_err(|e| StoreError::io(&images, e))?;

        self.save(&Catalog::new())?;
        self.write_atomic(&self.marker_path(), date.format("%Y-%m-%d").to_string().as_bytes())?;
        info!(%date, root = %self.root.display(), "store reset");
        Ok(())
    }

    fn last_reset(&self) -> Option<NaiveDate> {
        let raw = fs::read_to_string(self.marker_path()).ok()?;
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
    }

    fn publish_latest(&self, items: &[CatalogItem]) -> Result<(), StoreError> {
        self.write_json(&self.latest_path(), items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dailyreel_core::Category;

    fn item(category: Category, id: u64) -> CatalogItem {
        CatalogItem {
            id,
            category,
            title: format!("标题 {id}"),
            original_title: format!("Title {id}"),
            tagline: None,
            rating: 8.1,
            release_date: "2026-10-10".into(),
            runtime: None,
            genres: vec!["剧情".into()],
            directors: vec![],
            actors: vec![],
            description: "描述".into(),
            reviews: vec![],
            poster_ref: None,
            backdrop_ref: None,
            external_ref: None,
            fetched_at: "2026-10-19T00:00:00Z".into(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn open_creates_images_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("data")).unwrap();
        assert!(store.images_dir().is_dir());
    }

    #[test]
    fn missing_catalog_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.load().is_empty());
        assert_eq!(store.last_reset(), None);
    }

    #[test]
    fn corrupt_catalog_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        fs::write(store.catalog_path(), b"{ not json").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_then_load_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let catalog = Catalog::from_items(vec![item(Category::Series, 2), item(Category::Film, 1)]);
        store.save(&catalog).unwrap();

        let loaded = store.load();
        assert_eq!(loaded, catalog);
        let raw = fs::read_to_string(store.catalog_path()).unwrap();
        assert!(raw.contains("标题 2"), "non-ASCII text is written unescaped");
        assert!(raw.contains("\"originalTitle\""));
    }

    #[test]
    fn save_replaces_whole_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store
            .save(&Catalog::from_items(vec![item(Category::Film, 1), item(Category::Film, 2)]))
            .unwrap();
        store
            .save(&Catalog::from_items(vec![item(Category::Film, 3)]))
            .unwrap();

        assert_eq!(store.load().len(), 1);
        let mut entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        entries.sort();
        assert_eq!(entries, vec!["catalog.json", "images"]);
    }

    #[test]
    fn reset_discards_catalog_and_artwork() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store
            .save(&Catalog::from_items(vec![item(Category::Film, 1)]))
            .unwrap();
        store.publish_latest(&[item(Category::Film, 1)]).unwrap();
        fs::write(store.images_dir().join("film_1_poster.jpg"), b"jpeg").unwrap();

        store.reset(date("2026-10-19")).unwrap();

        assert!(store.load().is_empty());
        assert!(store.images_dir().is_dir());
        assert_eq!(fs::read_dir(store.images_dir()).unwrap().count(), 0);
        assert!(!store.latest_path().exists());
        assert_eq!(store.last_reset(), Some(date("2026-10-19")));
    }

    #[test]
    fn latest_snapshot_holds_only_given_items() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store
            .publish_latest(&[item(Category::Series, 5)])
            .unwrap();
        let raw = fs::read(store.latest_path()).unwrap();
        let parsed: Vec<CatalogItem> = serde_json::from_slice(&raw).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].key(), (Category::Series, 5));
    }
}
