//! Error types for the server binary.
//!
//! [`AppError`] is the top-level error type that wraps every failure the
//! process can hit between startup and the final snapshot write.

/// Top-level error for the server binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that the lifecycle can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: crate::config::ConfigError,
    },

    /// Loading or writing the snapshot failed.
    #[error("persistence error: {source}")]
    Persistence {
        /// The underlying store error.
        #[from]
        source: whenfree_store::StoreError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: whenfree_api::ServerError,
    },
}
