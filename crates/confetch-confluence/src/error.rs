//! Error types for the export pipeline.

/// Error from a page export operation.
///
/// No variant is retried anywhere; every failure aborts the whole
/// export and propagates to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Page identifier is neither numeric nor a usable page URL.
    #[error("invalid page identifier: {0}")]
    InvalidInput(String),

    /// URL-derived host does not match the configured site.
    ///
    /// Raised before any network call so authenticated requests never
    /// go to the wrong tenant.
    #[error("page URL host '{url_host}' does not match configured site '{configured}'")]
    HostMismatch {
        /// Host extracted from the page URL, lower-cased.
        url_host: String,
        /// Site from the loaded configuration.
        configured: String,
    },

    /// Server answered with a non-success status.
    #[error("HTTP {status} {reason} for {method} {url}")]
    Transport {
        /// HTTP status code.
        status: u16,
        /// Reason phrase for the status.
        reason: String,
        /// Request method.
        method: String,
        /// Full request URL.
        url: String,
    },

    /// HTTP request failed before any status was received (network
    /// error, timeout, TLS failure).
    #[error("HTTP request failed")]
    Network(#[from] ureq::Error),

    /// JSON deserialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}
