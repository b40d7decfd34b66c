#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] config_manager::Error),

    #[error("GitHub API error: {0}")]
    GitHub(#[from] github_client::Error),

    #[error("authentication error: {0}")]
    Auth(#[from] auth_handler::AuthError),

    #[error("reconciler error: {0}")]
    Reconciler(#[from] reconciler::Error),

    #[error("{0} is not set")]
    MissingEnvVar(String),

    #[error("failed to read GitHub App credentials at '{0}': {1}")]
    CredentialsUnreadable(String, String),

    #[error("failed to serialize generated config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0} organization(s) failed to reconcile")]
    OrganizationsFailed(usize),
}
