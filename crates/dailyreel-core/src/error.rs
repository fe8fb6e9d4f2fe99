use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("trending list unavailable for every category")]
    TrendingUnavailable,

    #[error("catalog store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}
