//! Per-org orchestration (spec §4.2): the eight-step sequence tying
//! together custom properties, invitations, missing-repo warnings, orphan
//! team deletion, team reconcile, repo creation, metadata prefetch, and repo
//! reconcile.

use std::collections::{BTreeMap, BTreeSet};

use config_manager::{AccessLevel, CustomProperty, OrganizationConfig, RepositoryConfig, TeamConfig, Visibility};
use futures::stream::{self, StreamExt};
use github_client::{CustomPropertyDefinition, Team};
use tracing::{info, warn};

use crate::alert::{MessageBuilder, Severity};
use crate::client_cache::OrgClientCache;
use crate::errors::Error;
use crate::filters::is_hidden;
use crate::plugin::Plugin;
use crate::repo_reconcile::{self, RepoMetadata};
use crate::team_state_machine;

const REPO_PREFETCH_CONCURRENCY: usize = 8;

fn to_definition(property: &CustomProperty) -> CustomPropertyDefinition {
    CustomPropertyDefinition {
        property_name: property.property_name.clone(),
        value_type: property.value_type.into(),
        required: property.required,
        default_value: property.default_value.clone(),
        description: property.description.clone(),
        allowed_values: property.allowed_values.clone(),
    }
}

/// Step 1: upserts declared custom property definitions that are missing or
/// differ, and deletes upstream definitions not present in the config.
async fn sync_custom_property_definitions(cache: &OrgClientCache, dry_run: bool, org: &OrganizationConfig) -> Result<(), Error> {
    let client = cache.client().client();
    let observed = client.list_organization_custom_properties(cache.org()).await?;
    let observed_by_name: BTreeMap<&String, &CustomPropertyDefinition> =
        observed.iter().map(|d| (&d.property_name, d)).collect();

    for declared in &org.custom_properties {
        let definition = to_definition(declared);
        let needs_upsert = match observed_by_name.get(&declared.property_name) {
            Some(existing) => *existing != &definition,
            None => true,
        };
        if needs_upsert && !dry_run {
            client.upsert_organization_custom_property(cache.org(), &definition).await?;
        }
    }

    let declared_names: BTreeSet<&String> = org.custom_properties.iter().map(|p| &p.property_name).collect();
    for existing in &observed {
        if !declared_names.contains(&existing.property_name) && !dry_run {
            client.delete_organization_custom_property(cache.org(), &existing.property_name).await?;
        }
    }

    Ok(())
}

/// Step 2: invites every declared member/maintainer who isn't already an org
/// member and doesn't already have a pending invitation. Halts this org's
/// remaining mutations (by returning an error) if a declared login cannot be
/// resolved on the platform.
async fn sync_user_invitations(
    cache: &OrgClientCache,
    dry_run: bool,
    org: &OrganizationConfig,
) -> Result<Vec<MessageBuilder>, Error> {
    let mut alerts = Vec::new();
    let client = cache.client().client();

    let mut declared_logins: BTreeSet<String> = BTreeSet::new();
    for team in &org.teams {
        declared_logins.extend(team.members.iter().cloned());
        declared_logins.extend(team.maintainers.iter().cloned());
    }

    let members = cache.members().await?;
    let member_logins: BTreeSet<String> = members.iter().map(|m| m.login.clone()).collect();
    let pending = client.list_organization_invitations(cache.org()).await?;
    let pending_logins: BTreeSet<String> = pending.iter().filter_map(|i| i.login.clone()).collect();

    for login in declared_logins {
        if member_logins.contains(&login) || pending_logins.contains(&login) {
            continue;
        }

        let user = client.get_user_by_login(&login).await.map_err(|_| {
            Error::policy_violation(cache.org(), format!("declared user '{login}' was not found on the platform"))
        })?;

        if user.login != login {
            alerts.push(
                MessageBuilder::new(Severity::Critical)
                    .text(format!("declared login `{login}` does not case-match canonical login `{}`", user.login)),
            );
            return Err(Error::policy_violation(cache.org(), format!("login case mismatch for '{login}'")));
        }

        if !dry_run {
            client.create_organization_invitation(cache.org(), user.id).await?;
        }
    }

    Ok(alerts)
}

/// Step 3: synthesizes placeholder config entries (visibility `current`, no
/// teams/collaborators) for observed repos without a declared entry, after
/// filtering out hidden repos.
async fn synthesize_missing_repos(
    cache: &OrgClientCache,
    org: &OrganizationConfig,
) -> Result<(Vec<RepositoryConfig>, Vec<MessageBuilder>), Error> {
    let observed = cache.repositories().await?;
    let declared_names: BTreeSet<&String> = org.repositories.iter().map(|r| &r.name).collect();

    let mut synthesized = Vec::new();
    let mut warnings = Vec::new();

    for repo in &observed {
        if is_hidden(repo.name()) || declared_names.contains(&repo.name().to_string()) {
            continue;
        }
        warnings.push(
            MessageBuilder::new(Severity::Warning)
                .repository(format!("{}/{}", cache.org(), repo.name()))
                .text("observed repository has no config entry; treating as `current` visibility with no declared access"),
        );
        synthesized.push(RepositoryConfig {
            name: repo.name().to_string(),
            teams: BTreeMap::new(),
            external_collaborators: BTreeMap::new(),
            settings: Default::default(),
            visibility: Visibility::Current,
            properties: BTreeMap::new(),
            rulesets: Vec::new(),
        });
    }

    Ok((synthesized, warnings))
}

/// Step 4: deletes any upstream team not present in the declared team list.
async fn delete_orphan_teams(cache: &OrgClientCache, dry_run: bool, org: &OrganizationConfig) -> Result<(), Error> {
    let observed = cache.teams().await?;
    let declared_names: BTreeSet<&String> = org.teams.iter().map(|t| &t.name).collect();

    for team in &observed {
        if declared_names.contains(&team.name) {
            continue;
        }
        if dry_run {
            continue;
        }
        cache.client().client().delete_team(cache.org(), &team.slug).await?;
        cache.invalidate_teams().await;
    }

    Ok(())
}

/// Steps 5 for one declared team: ensure/privacy/parent/membership.
async fn reconcile_team(
    cache: &OrgClientCache,
    dry_run: bool,
    team: &TeamConfig,
    all_teams: &[Team],
    owners: &BTreeSet<String>,
    pending_invites: &BTreeSet<String>,
) -> Result<Team, Error> {
    let created = team_state_machine::ensure_team(cache, dry_run, team).await?;
    let synced = team_state_machine::sync_privacy_and_parent(cache, dry_run, created, team, all_teams).await?;
    team_state_machine::sync_membership(cache, dry_run, &synced, team, owners, pending_invites).await?;
    Ok(synced)
}

/// Step 6: creates declared repos that don't exist yet, skipping per-repo
/// work for them in dry-run.
async fn create_missing_repos(
    cache: &OrgClientCache,
    dry_run: bool,
    org: &OrganizationConfig,
    observed: &[github_client::Repository],
) -> Result<BTreeSet<String>, Error> {
    let observed_names: BTreeSet<&str> = observed.iter().map(|r| r.name()).collect();
    let mut skip_for_dry_run = BTreeSet::new();

    for repo in &org.repositories {
        if observed_names.contains(repo.name.as_str()) {
            continue;
        }
        if dry_run {
            skip_for_dry_run.insert(repo.name.clone());
            continue;
        }
        let payload = github_client::RepositoryCreatePayload {
            name: repo.name.clone(),
            has_wiki: Some(false),
            private: if repo.visibility == Visibility::Current {
                None
            } else {
                Some(repo.visibility == Visibility::Private)
            },
            ..Default::default()
        };
        cache.client().client().create_org_repository(cache.org(), &payload).await?;
        cache.invalidate_repositories().await;
    }

    Ok(skip_for_dry_run)
}

/// Reconciles one organization end to end.
pub async fn reconcile_org(
    cache: &OrgClientCache,
    dry_run: bool,
    org: &OrganizationConfig,
    plugins: &[Box<dyn Plugin>],
) -> Result<Vec<MessageBuilder>, Error> {
    let mut alerts = Vec::new();
    info!(org = cache.org(), "starting org reconcile");

    sync_custom_property_definitions(cache, dry_run, org).await?;

    let invite_alerts = sync_user_invitations(cache, dry_run, org).await?;
    alerts.extend(invite_alerts);

    let (synthesized_repos, missing_warnings) = synthesize_missing_repos(cache, org).await?;
    alerts.extend(missing_warnings);

    delete_orphan_teams(cache, dry_run, org).await?;

    let owners: BTreeSet<String> = cache.owners().await?.into_iter().map(|u| u.login).collect();
    let pending_invites: BTreeSet<String> = cache
        .client()
        .client()
        .list_organization_invitations(cache.org())
        .await?
        .into_iter()
        .filter_map(|i| i.login)
        .collect();

    let mut reconciled_teams = Vec::with_capacity(org.teams.len());
    for team in &org.teams {
        let all_teams = cache.teams().await?;
        let team_result = reconcile_team(cache, dry_run, team, &all_teams, &owners, &pending_invites).await?;
        reconciled_teams.push(team_result);
        let plugin_alerts = crate::plugin::fan_out_team(plugins, team, cache.org()).await;
        alerts.extend(plugin_alerts);
    }

    let team_ids: BTreeMap<String, u64> =
        reconciled_teams.iter().map(|t| (t.name.clone(), t.id)).collect();

    let observed_repos = cache.repositories().await?;
    let all_declared_repos: Vec<RepositoryConfig> =
        org.repositories.iter().cloned().chain(synthesized_repos).collect();
    let skip_creation = create_missing_repos(cache, dry_run, org, &observed_repos).await?;

    let non_archived: Vec<&RepositoryConfig> = all_declared_repos
        .iter()
        .filter(|r| !skip_creation.contains(&r.name))
        .filter(|r| {
            !observed_repos
                .iter()
                .any(|o| o.name() == r.name && o.is_archived())
        })
        .collect();

    let prefetched: Vec<(String, RepoMetadata)> = stream::iter(non_archived.iter().map(|r| r.name.clone()))
        .map(|name| async move {
            let result = repo_reconcile::prefetch_repo_metadata(cache, cache.org(), &name).await;
            (name, result)
        })
        .buffer_unordered(REPO_PREFETCH_CONCURRENCY)
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .filter_map(|(name, result)| match result {
            Ok(metadata) => Some((name, metadata)),
            Err(e) => {
                warn!(org = cache.org(), repo = %name, error = %e, "failed to prefetch repo metadata");
                None
            }
        })
        .collect();

    let metadata_by_name: BTreeMap<String, RepoMetadata> = prefetched.into_iter().collect();

    for repo in &all_declared_repos {
        let Some(metadata) = metadata_by_name.get(&repo.name) else { continue };

        reconcile_repo(cache, dry_run, org, repo, metadata, &team_ids, &mut alerts).await?;

        let plugin_alerts = crate::plugin::fan_out_repo(plugins, repo, &org.teams, cache.org()).await;
        alerts.extend(plugin_alerts);
    }

    for repo in org.repositories.iter().filter(|r| {
        observed_repos.iter().any(|o| o.name() == r.name && o.is_archived())
    }) {
        let plugin_alerts = crate::plugin::fan_out_repo(plugins, repo, &org.teams, cache.org()).await;
        alerts.extend(plugin_alerts);
    }

    Ok(alerts)
}

#[allow(clippy::too_many_arguments)]
async fn reconcile_repo(
    cache: &OrgClientCache,
    dry_run: bool,
    org: &OrganizationConfig,
    repo: &RepositoryConfig,
    metadata: &RepoMetadata,
    team_ids: &BTreeMap<String, u64>,
    alerts: &mut Vec<MessageBuilder>,
) -> Result<(), Error> {
    let owner = cache.org();

    let declared_team_access: BTreeMap<String, AccessLevel> = repo.teams.clone();
    repo_reconcile::reconcile_teams(cache, dry_run, owner, &repo.name, &declared_team_access, &metadata.attached_teams)
        .await?;

    repo_reconcile::reconcile_collaborators(
        cache,
        dry_run,
        owner,
        &repo.name,
        &repo.external_collaborators,
        &metadata.pending_invitations,
        &metadata.direct_collaborators,
    )
    .await?;

    let effective = repo.effective_settings(&org.repository_defaults);
    repo_reconcile::reconcile_settings(cache, dry_run, owner, &repo.name, &effective, &metadata.repo).await?;
    repo_reconcile::reconcile_fork_approval(
        cache,
        dry_run,
        owner,
        &repo.name,
        &effective,
        metadata.repo.is_private(),
    )
    .await?;

    if let Some(alert) =
        repo_reconcile::reconcile_visibility(cache, dry_run, owner, &repo.name, repo.visibility, &metadata.repo).await?
    {
        alerts.push(alert);
    }

    repo_reconcile::reconcile_custom_properties(
        cache,
        dry_run,
        owner,
        &repo.name,
        &repo.properties,
        &org.custom_properties,
        &metadata.custom_properties,
    )
    .await?;

    repo_reconcile::reconcile_rulesets(
        cache,
        dry_run,
        owner,
        &repo.name,
        repo,
        &org.common_rulesets,
        team_ids,
        &metadata.rulesets,
    )
    .await?;

    Ok(())
}
