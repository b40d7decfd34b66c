#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("GitHub API error: {0}")]
    GitHub(#[from] github_client::Error),

    #[error("failed to write temp config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to spawn reconciler subprocess: {0}")]
    Spawn(String),
}
