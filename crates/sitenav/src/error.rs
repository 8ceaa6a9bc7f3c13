//! CLI error types.

use sitenav_config::ConfigError;
use sitenav_site::NavError;
use sitenav_store_fs::PlanError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Plan(#[from] PlanError),

    #[error("{0}")]
    Navigation(#[from] NavError),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    NotFound(String),
}
