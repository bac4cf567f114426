//! Client for the external workforce directory.
//!
//! The directory is the system of record for role membership: role
//! assignment and removal call out to it first, and the local account row
//! is only mutated after the directory confirms. When no directory URL is
//! configured (development, tests) the [`LocalDirectory`] stand-in derives
//! identities deterministically from the email address.

mod http;
mod local;

pub use http::HttpDirectoryClient;
pub use local::LocalDirectory;

use async_trait::async_trait;
use vigil_core::roles::Role;

/// Errors from the directory integration layer.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("directory request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The directory returned a non-2xx status code.
    #[error("directory error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The directory answered 2xx but the body was not what we expect.
    #[error("directory response malformed: {0}")]
    Malformed(String),
}

/// Abstraction over the external directory.
///
/// Trait object so handlers stay testable without a live directory; the
/// production implementation is [`HttpDirectoryClient`].
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Grant `role` to the person identified by `email`.
    ///
    /// Returns the directory's identity key for that person (the external
    /// id our account rows are keyed by).
    async fn assign_role(&self, email: &str, role: Role) -> Result<String, DirectoryError>;

    /// Revoke all managed roles for `external_id`.
    async fn remove_role(&self, external_id: &str) -> Result<(), DirectoryError>;
}
