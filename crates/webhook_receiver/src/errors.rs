#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing '{0}' header")]
    MissingHeader(&'static str),

    #[error("invalid webhook signature")]
    InvalidSignature,

    #[error("webhook engine error: {0}")]
    Engine(#[from] webhook_engine::Error),

    #[error("dry-run harness error: {0}")]
    DryRun(#[from] dryrun_harness::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config_manager::Error),

    #[error("authentication error: {0}")]
    Auth(#[from] auth_handler::AuthError),

    #[error("{0} is not set")]
    MissingEnvVar(String),

    #[error("failed to read GitHub App credentials at '{0}': {1}")]
    CredentialsUnreadable(String, String),
}
