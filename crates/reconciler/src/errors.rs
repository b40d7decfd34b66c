#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] config_manager::Error),

    #[error("GitHub API error: {0}")]
    GitHub(#[from] github_client::Error),

    #[error("authentication error: {0}")]
    Auth(#[from] auth_handler::AuthError),

    #[error("policy violation in org '{org}': {message}")]
    PolicyViolation { org: String, message: String },

    #[error("more than one team named '{0}' exists upstream")]
    DuplicateTeam(String),
}

impl Error {
    pub fn policy_violation(org: impl Into<String>, message: impl Into<String>) -> Self {
        Error::PolicyViolation { org: org.into(), message: message.into() }
    }
}
