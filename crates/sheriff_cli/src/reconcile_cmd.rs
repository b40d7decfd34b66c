//! `sheriff reconcile`: loads the permissions document and drives every
//! declared organization toward it.

use auth_handler::CredentialProvider;
use config_manager::loader;
use reconciler::plugin::Plugin;
use reconciler::OrgClientCache;
use tracing::{error, info};

use crate::config::RuntimeConfig;
use crate::console_alert::ConsoleAlertTransport;
use crate::Error;

/// Plugin bodies (gsuite/slack/heroku/github) are out of scope; only the
/// fan-out mechanism is implemented, so `SHERIFF_PLUGINS` currently selects
/// from an empty registry.
fn selected_plugins(requested: &[String]) -> Vec<Box<dyn Plugin>> {
    for name in requested {
        tracing::warn!(plugin = name, "plugin body not implemented, skipping");
    }
    Vec::new()
}

pub async fn run(dry_run: bool) -> Result<(), Error> {
    let config = RuntimeConfig::from_env()?;
    info!(config = ?config, dry_run, "starting reconcile run");

    let provider = CredentialProvider::new(config.app_id, config.private_key.clone(), dry_run);

    let bootstrap = provider.client_for_org(&config.config_org, true).await?;
    let orgs =
        loader::load_permissions_config(bootstrap.client(), config.local_override.as_deref()).await?;

    let transport = ConsoleAlertTransport;
    let plugins = selected_plugins(&config.plugins);

    let mut failures = 0;
    for org_config in &orgs {
        info!(org = %org_config.organization, dry_run, "reconciling organization");
        let scoped = match provider.client_for_org(&org_config.organization, dry_run).await {
            Ok(scoped) => scoped,
            Err(e) => {
                error!(org = %org_config.organization, error = %e, "failed to obtain scoped client");
                failures += 1;
                continue;
            }
        };
        let cache = OrgClientCache::new(org_config.organization.clone(), scoped);

        match reconciler::reconcile_org(&cache, dry_run, org_config, &plugins).await {
            Ok(messages) => {
                for message in messages {
                    message.flush(&transport).await;
                }
            }
            Err(e) => {
                error!(org = %org_config.organization, error = %e, "reconcile failed");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(Error::OrganizationsFailed(failures));
    }
    Ok(())
}
