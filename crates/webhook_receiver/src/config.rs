//! Centralizes every `std::env::var` read behind one fallible constructor,
//! run once at startup and logged (secrets redacted) before the first
//! network call.

use crate::Error;

pub struct RuntimeConfig {
    pub config_org: String,
    pub config_repo: String,
    pub config_path: String,
    pub self_login: String,
    pub webhook_secret: String,
    pub trusted_releasers: Vec<String>,
    pub release_policies_raw: Option<String>,
    pub port: u16,
    pub app_id: u64,
    pub private_key: String,
}

fn env_var(name: &str) -> Result<String, Error> {
    std::env::var(name).map_err(|_| Error::MissingEnvVar(name.to_string()))
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, Error> {
        let (app_id, private_key) = crate::credentials::load()?;
        Ok(Self {
            config_org: env_var("PERMISSIONS_FILE_ORG")?,
            config_repo: env_var("PERMISSIONS_FILE_REPO")?,
            config_path: env_var("PERMISSIONS_FILE_PATH")?,
            self_login: env_var("SHERIFF_SELF_LOGIN")?,
            webhook_secret: std::env::var("GITHUB_WEBHOOK_SECRET").unwrap_or_else(|_| "development".to_string()),
            trusted_releasers: std::env::var("SHERIFF_TRUSTED_RELEASERS")
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            release_policies_raw: std::env::var("SHERIFF_RELEASE_POLICIES").ok(),
            port: std::env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(8080),
            app_id,
            private_key,
        })
    }
}

impl std::fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("config_org", &self.config_org)
            .field("config_repo", &self.config_repo)
            .field("config_path", &self.config_path)
            .field("self_login", &self.self_login)
            .field("webhook_secret", &"<REDACTED>")
            .field("trusted_releasers", &self.trusted_releasers)
            .field("release_policies_raw", &self.release_policies_raw.as_ref().map(|_| "<REDACTED>"))
            .field("port", &self.port)
            .field("app_id", &self.app_id)
            .field("private_key", &"<REDACTED>")
            .finish()
    }
}
