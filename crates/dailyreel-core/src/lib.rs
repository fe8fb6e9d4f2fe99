pub mod assemble;
pub mod error;
pub mod item;
pub mod normalize;
pub mod pipeline;
pub mod resolver;
pub mod schedule;
pub mod source;
pub mod store;

pub use assemble::{Enrichment, assemble};
pub use error::PipelineError;
pub use item::{Catalog, CatalogItem, Category};
pub use normalize::{Credits, CrewMember, Review, select_reviews};
pub use pipeline::{CategoryOutcome, Pipeline, RunConfig, RunReport};
pub use resolver::{DescriptionResolver, DescriptionStrategy, ResolveContext};
pub use schedule::{is_reset_day, reset_due, select_candidate};
pub use source::{
    ArtworkSink, Encyclopedia, ItemDetail, MetadataSource, TrendingCandidate, TrendingUnavailable,
};
pub use store::CatalogStore;
