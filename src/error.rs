use crate::ir::Tier;
use std::path::PathBuf;
use thiserror::Error;

/// Payload could not be turned into a [`crate::ir::HierarchyData`].
#[derive(Debug, Error)]
pub enum HierarchyError {
    #[error("invalid hierarchy payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{tier} {id} has an empty name")]
    EmptyName { tier: Tier, id: i64 },
}

/// The only hard failures of a render call.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render target not found: {0}")]
    MissingTarget(String),
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("rasterization failed: {0}")]
    Raster(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{tier} {id} not found")]
    NotFound { tier: Tier, id: i64 },
    #[error("name is required")]
    EmptyName,
    #[error("{tier} items cannot link to {other} items")]
    InvalidLink { tier: Tier, other: Tier },
}
