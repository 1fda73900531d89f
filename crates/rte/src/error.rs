//! CLI error types.

use rte_config::ConfigError;
use rte_renderer::RenderError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Validation(String),
}
