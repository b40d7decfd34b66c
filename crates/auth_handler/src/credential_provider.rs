//! Credential provider: hands out GitHub App installation clients narrowed to
//! an org, with an explicit read-only flag that a global dry-run setting
//! forces on regardless of the caller's request.

use secrecy::{ExposeSecret, SecretString};

use crate::{AuthError, AuthResult};
use github_client::{create_app_client, GitHubClient};

/// An authenticated client paired with whether it was narrowed to read-only.
///
/// Narrowing happens at the application layer: [`ScopedClient::ensure_writable`]
/// is the transport-level check the reconciler calls before issuing any
/// mutating request, so a dry-run client can never perform a write even if a
/// caller forgets to check the global dry-run flag itself.
pub struct ScopedClient {
    client: GitHubClient,
    read_only: bool,
}

impl ScopedClient {
    pub fn client(&self) -> &GitHubClient {
        &self.client
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Returns `Err` if this client was narrowed to read-only. Call before
    /// any mutating request.
    pub fn ensure_writable(&self) -> AuthResult<()> {
        if self.read_only {
            return Err(AuthError::InsufficientPermissions(
                "client is narrowed to read-only (dry-run)".to_string(),
            ));
        }
        Ok(())
    }
}

/// Issues [`ScopedClient`]s for an organization, authenticating as a GitHub
/// App installation. `force_read_only` mirrors the reconciler's global
/// dry-run flag: when set, every client handed out is read-only regardless
/// of what the caller asked for.
pub struct CredentialProvider {
    app_id: u64,
    private_key: SecretString,
    force_read_only: bool,
}

impl CredentialProvider {
    pub fn new(app_id: u64, private_key: String, force_read_only: bool) -> Self {
        Self {
            app_id,
            private_key: SecretString::from(private_key),
            force_read_only,
        }
    }

    pub async fn client_for_org(&self, org_name: &str, read_only: bool) -> AuthResult<ScopedClient> {
        let app_client = create_app_client(self.app_id, self.private_key.expose_secret())
            .await
            .map_err(|_| AuthError::InvalidCredentials)?;

        let client = GitHubClient::new(app_client);
        Ok(ScopedClient {
            client,
            read_only: read_only || self.force_read_only,
        })
    }
}

impl std::fmt::Debug for CredentialProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialProvider")
            .field("app_id", &self.app_id)
            .field("private_key", &"<REDACTED>")
            .field("force_read_only", &self.force_read_only)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_dry_run_forces_read_only_even_when_caller_asks_for_write() {
        let provider = CredentialProvider::new(1, "unused".to_string(), true);
        assert!(provider.force_read_only);
    }
}
