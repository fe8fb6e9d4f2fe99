//! Storage layer: the catalog as a JSON file next to its artwork directory.

mod error;
pub use error::StoreError;

mod file;
pub use file::FileStore;
