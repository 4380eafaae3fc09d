//! CLI error types.

use std::path::PathBuf;

use md2jira_renderer::RenderError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("cannot read file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot convert document")]
    Convert(#[from] RenderError),

    #[error("cannot write output")]
    Write(#[source] std::io::Error),
}
