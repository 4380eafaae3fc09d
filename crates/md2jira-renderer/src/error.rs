//! Render error types.

/// Error that aborts a render pass.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// A node kind with no registered rule was visited.
    #[error("no render function for node kind '{kind}({code})'")]
    UnsupportedKind {
        /// Kind name.
        kind: &'static str,
        /// Numeric kind code.
        code: u16,
    },

    /// The output sink rejected a write.
    #[error("failed to write output")]
    Output(#[from] std::io::Error),
}
