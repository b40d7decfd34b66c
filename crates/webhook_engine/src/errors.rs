#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] config_manager::Error),

    #[error("GitHub API error: {0}")]
    GitHub(#[from] github_client::Error),

    #[error("reconciler error: {0}")]
    Reconciler(#[from] reconciler::Error),

    #[error("malformed webhook payload: {0}")]
    MalformedPayload(String),

    #[error("invalid webhook signature")]
    InvalidSignature,
}
