//! HTTP adapters: TMDB metadata, encyclopedia lookups, and artwork downloads.

mod error;
mod http;

pub mod artwork;
pub mod baike;
pub mod tmdb;
pub mod wikipedia;

#[cfg(test)]
mod test_server;

pub use artwork::ImageDownloader;
pub use baike::BaikeClient;
pub use error::SourceError;
pub use tmdb::TmdbClient;
pub use wikipedia::WikipediaClient;
