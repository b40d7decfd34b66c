//! Shared server state: one memoizing [`OrgClientCache`] per declared
//! organization, the loaded permissions documents, and the dry-run queue.

use std::collections::HashMap;
use std::path::PathBuf;

use auth_handler::CredentialProvider;
use config_manager::{loader, OrganizationConfig};
use dryrun_harness::DryRunQueue;
use github_client::GitHubClient;
use reconciler::OrgClientCache;
use webhook_engine::EngineConfig as WebhookEngineConfig;
use webhook_engine::release_policy::TrustedReleaserPolicy;

use crate::config::RuntimeConfig;
use crate::errors::Error;

fn reconciler_binary_path() -> PathBuf {
    if let Ok(path) = std::env::var("SHERIFF_RECONCILER_BINARY") {
        return PathBuf::from(path);
    }
    let mut path = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("sheriff"));
    path.set_file_name("sheriff");
    path
}

pub struct AppState {
    pub configs: Vec<OrganizationConfig>,
    pub caches: HashMap<String, OrgClientCache>,
    pub webhook_secret: Vec<u8>,
    pub self_login: String,
    pub trusted_releasers: Vec<String>,
    pub release_policies: Vec<TrustedReleaserPolicy>,
    pub config_org: String,
    pub config_repo: String,
    pub config_path: String,
    pub dry_run_client: GitHubClient,
    pub dry_run_queue: DryRunQueue,
    pub reconciler_binary: PathBuf,
    pub port: u16,
}

impl AppState {
    pub async fn load() -> Result<Self, Error> {
        let config = RuntimeConfig::from_env()?;
        tracing::info!(config = ?config, "loaded runtime configuration");

        let release_policies = match &config.release_policies_raw {
            Some(raw) => webhook_engine::release_policy::parse_policies(raw)?,
            None => Vec::new(),
        };

        let provider = CredentialProvider::new(config.app_id, config.private_key.clone(), false);

        let bootstrap = provider.client_for_org(&config.config_org, true).await.map_err(Error::Auth)?;
        let local_override = std::env::var("PERMISSIONS_FILE_LOCAL_PATH").ok();
        let configs =
            loader::load_permissions_config(bootstrap.client(), local_override.as_deref()).await?;

        let mut caches = HashMap::new();
        for org_config in &configs {
            let scoped = provider
                .client_for_org(&org_config.organization, false)
                .await
                .map_err(Error::Auth)?;
            caches.insert(org_config.organization.clone(), OrgClientCache::new(org_config.organization.clone(), scoped));
        }
        if !caches.contains_key(&config.config_org) {
            let scoped = provider.client_for_org(&config.config_org, false).await.map_err(Error::Auth)?;
            caches.insert(config.config_org.clone(), OrgClientCache::new(config.config_org.clone(), scoped));
        }

        let dry_run_client =
            provider.client_for_org(&config.config_org, false).await.map_err(Error::Auth)?.client().clone();
        let dry_run_queue = DryRunQueue::spawn(dry_run_client.clone());
        let port = config.port;

        Ok(Self {
            configs,
            caches,
            webhook_secret: config.webhook_secret.into_bytes(),
            self_login: config.self_login,
            trusted_releasers: config.trusted_releasers,
            release_policies,
            config_org: config.config_org,
            config_repo: config.config_repo,
            config_path: config.config_path,
            dry_run_client,
            dry_run_queue,
            reconciler_binary: reconciler_binary_path(),
            port,
        })
    }

    pub fn cache_for(&self, owner_login: &str) -> &OrgClientCache {
        self.caches
            .get(owner_login)
            .unwrap_or_else(|| &self.caches[&self.config_org])
    }

    pub fn engine_config(&self) -> WebhookEngineConfig<'_> {
        WebhookEngineConfig {
            self_login: &self.self_login,
            trusted_releasers: &self.trusted_releasers,
            release_policies: &self.release_policies,
            config_org: &self.config_org,
            config_repo: &self.config_repo,
        }
    }
}
