use thiserror::Error;

use crate::configapi::ConfigApiError;
use crate::provider::ProviderError;
use crate::state::StateError;

#[derive(Debug, Error)]
pub enum PdconfError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Api(#[from] ConfigApiError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("unknown data source type: {0}")]
    UnknownDataSourceType(String),

    #[error("no state for {type_name} '{name}'; apply or import it first")]
    MissingState { type_name: String, name: String },

    #[error("{action} failed with {errors} error(s)")]
    Diagnostics { action: &'static str, errors: usize },
}

pub type Result<T> = std::result::Result<T, PdconfError>;
