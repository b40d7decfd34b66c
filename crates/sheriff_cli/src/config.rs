//! Centralizes the `reconcile` subcommand's environment reads behind one
//! fallible constructor, logged (secrets redacted) before the first network
//! call.

use crate::Error;

pub struct RuntimeConfig {
    pub config_org: String,
    pub local_override: Option<String>,
    pub plugins: Vec<String>,
    pub app_id: u64,
    pub private_key: String,
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, Error> {
        let (app_id, private_key) = crate::credentials::load()?;
        Ok(Self {
            config_org: std::env::var("PERMISSIONS_FILE_ORG")
                .map_err(|_| Error::MissingEnvVar("PERMISSIONS_FILE_ORG".to_string()))?,
            local_override: std::env::var("PERMISSIONS_FILE_LOCAL_PATH").ok(),
            plugins: std::env::var("SHERIFF_PLUGINS")
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            app_id,
            private_key,
        })
    }
}

impl std::fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("config_org", &self.config_org)
            .field("local_override", &self.local_override)
            .field("plugins", &self.plugins)
            .field("app_id", &self.app_id)
            .field("private_key", &"<REDACTED>")
            .finish()
    }
}
