//! Credential provider for the permissions controller.
//!
//! Hands out GitHub App installation clients narrowed to a single
//! organization, with a read-only flag a global dry-run setting forces on
//! regardless of what the caller requested.

pub mod credential_provider;

pub use credential_provider::{CredentialProvider, ScopedClient};

/// Result type for authentication operations.
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Errors that can occur while provisioning or using narrowed credentials.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials provided")]
    InvalidCredentials,

    #[error("insufficient permissions: {0}")]
    InsufficientPermissions(String),

    #[error("GitHub API error: {0}")]
    GitHubError(String),

    #[error("authentication error: {0}")]
    Other(String),
}
