#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no permissions config found: {0}")]
    ConfigMissing(String),

    #[error("permissions config could not be parsed: {0}")]
    ConfigMalformed(String),

    #[error("permissions config for '{org}' is invalid ({kind}): {message}")]
    ConfigInvalid {
        org: String,
        kind: String,
        message: String,
    },

    #[error("GitHub API error: {0}")]
    GitHub(#[from] github_client::Error),

    #[error("failed to read local config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub fn invalid(org: impl Into<String>, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigInvalid {
            org: org.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }
}
