//! Per-repository reconcile: teams, collaborators, settings, fork-PR
//! approval, visibility, custom properties, rulesets (spec §4.4).

use std::collections::{BTreeMap, HashMap};

use config_manager::{
    canonicalize_observed, diff, normalize, AccessLevel, CustomProperty, EffectiveSettings,
    PropertyValue, RepositoryConfig, Ruleset, RulesetRef, Visibility,
};
use github_client::{
    ApprovalPolicy, Collaborator, ForkPrApprovalPolicy, Repository, RepositoryInvitation,
    RepositorySettingsUpdate, RepositoryRuleset, RepoTeamPermission,
};

use crate::alert::{MessageBuilder, Severity};
use crate::client_cache::OrgClientCache;
use crate::errors::Error;

const STARGAZER_VISIBILITY_THRESHOLD: u64 = 100;

/// Metadata prefetched for one repo before its reconcile steps run (spec
/// §4.2 step 7).
pub struct RepoMetadata {
    pub repo: Repository,
    pub attached_teams: Vec<RepoTeamPermission>,
    pub pending_invitations: Vec<RepositoryInvitation>,
    pub direct_collaborators: Vec<Collaborator>,
    pub custom_properties: HashMap<String, serde_json::Value>,
    pub rulesets: Vec<RepositoryRuleset>,
}

pub async fn prefetch_repo_metadata(
    cache: &OrgClientCache,
    owner: &str,
    repo_name: &str,
) -> Result<RepoMetadata, Error> {
    let client = cache.client().client();
    let repo = client.get_repository(owner, repo_name).await?;
    let attached_teams = client.list_repository_teams(owner, repo_name).await?;
    let pending_invitations = client.list_repository_invitations(owner, repo_name).await?;
    let direct_collaborators = client.list_direct_collaborators(owner, repo_name).await?;
    let custom_properties = client.get_custom_properties(owner, repo_name).await?;
    let rulesets = client.list_repository_rulesets(owner, repo_name).await?;

    Ok(RepoMetadata {
        repo,
        attached_teams,
        pending_invitations,
        direct_collaborators,
        custom_properties,
        rulesets,
    })
}

/// Syncs teams attached to the repo against `declared`.
pub async fn reconcile_teams(
    cache: &OrgClientCache,
    dry_run: bool,
    owner: &str,
    repo_name: &str,
    declared: &BTreeMap<String, AccessLevel>,
    attached: &[RepoTeamPermission],
) -> Result<(), Error> {
    let client = cache.client().client();

    for attached_team in attached {
        if !declared.contains_key(&attached_team.name) {
            if dry_run {
                continue;
            }
            client.remove_repo_team(cache.org(), &attached_team.slug, owner, repo_name).await?;
        }
    }

    for (team_name, &level) in declared {
        let observed = attached.iter().find(|t| &t.name == team_name);
        let slug = team_name.to_lowercase().replace(' ', "-");
        let slug = observed.map(|t| t.slug.clone()).unwrap_or(slug);

        let needs_update = match observed {
            Some(t) => AccessLevel::from_github(&t.permission) != Some(level),
            None => true,
        };

        if needs_update && !dry_run {
            client
                .add_or_update_repo_team_permission(cache.org(), &slug, owner, repo_name, level.to_github())
                .await?;
        }
    }

    Ok(())
}

enum CollaboratorAction {
    Noop,
    Remove,
    UpdatePermission,
}

fn collaborator_action(declared: Option<AccessLevel>, observed: Option<AccessLevel>) -> CollaboratorAction {
    match (declared, observed) {
        (None, Some(_)) => CollaboratorAction::Remove,
        (Some(d), Some(o)) if d != o => CollaboratorAction::UpdatePermission,
        _ => CollaboratorAction::Noop,
    }
}

/// Syncs pending invitations and direct collaborators against
/// `external_collaborators`, then adds anyone declared but not yet present
/// in either set.
pub async fn reconcile_collaborators(
    cache: &OrgClientCache,
    dry_run: bool,
    owner: &str,
    repo_name: &str,
    declared: &BTreeMap<String, AccessLevel>,
    invitations: &[RepositoryInvitation],
    direct: &[Collaborator],
) -> Result<(), Error> {
    let client = cache.client().client();

    for invite in invitations {
        let Some(login) = invite.invitee.as_ref().map(|i| i.login.clone()) else { continue };
        let declared_level = declared.get(&login).copied();
        let observed_level = AccessLevel::from_github(&invite.permissions);

        match collaborator_action(declared_level, observed_level) {
            CollaboratorAction::Noop => {}
            CollaboratorAction::Remove => {
                if !dry_run {
                    client.delete_repository_invitation(owner, repo_name, invite.id).await?;
                }
            }
            CollaboratorAction::UpdatePermission => {
                if !dry_run {
                    let level = declared_level.expect("update implies declared level present");
                    client
                        .update_repository_invitation(owner, repo_name, invite.id, level.to_github())
                        .await?;
                }
            }
        }
    }

    for collaborator in direct {
        let declared_level = declared.get(&collaborator.login).copied();
        let observed_level = AccessLevel::from_bitmap(&collaborator.permissions);

        match collaborator_action(declared_level, observed_level) {
            CollaboratorAction::Noop => {}
            CollaboratorAction::Remove => {
                if !dry_run {
                    client.remove_collaborator(owner, repo_name, &collaborator.login).await?;
                }
            }
            CollaboratorAction::UpdatePermission => {
                if !dry_run {
                    let level = declared_level.expect("update implies declared level present");
                    client.add_collaborator(owner, repo_name, &collaborator.login, level.to_github()).await?;
                }
            }
        }
    }

    let already_present: std::collections::BTreeSet<String> = invitations
        .iter()
        .filter_map(|i| i.invitee.as_ref().map(|i| i.login.clone()))
        .chain(direct.iter().map(|c| c.login.clone()))
        .collect();

    for (login, &level) in declared {
        if already_present.contains(login) {
            continue;
        }
        if dry_run {
            continue;
        }
        client.add_collaborator(owner, repo_name, login, level.to_github()).await?;
    }

    Ok(())
}

/// Updates `has_wiki` if it differs from observed.
pub async fn reconcile_settings(
    cache: &OrgClientCache,
    dry_run: bool,
    owner: &str,
    repo_name: &str,
    effective: &EffectiveSettings,
    observed: &Repository,
) -> Result<(), Error> {
    if observed.has_wiki() == Some(effective.has_wiki) {
        return Ok(());
    }
    if dry_run {
        return Ok(());
    }

    let update = RepositorySettingsUpdate { has_wiki: Some(effective.has_wiki), ..Default::default() };
    cache.client().client().update_repository_settings(owner, repo_name, &update).await?;
    Ok(())
}

/// Requires owner approval for first-time fork contributors when declared
/// and the repo isn't private.
pub async fn reconcile_fork_approval(
    cache: &OrgClientCache,
    dry_run: bool,
    owner: &str,
    repo_name: &str,
    effective: &EffectiveSettings,
    is_private: bool,
) -> Result<(), Error> {
    if !effective.forks_need_actions_approval || is_private {
        return Ok(());
    }

    let client = cache.client().client();
    let current = client.get_fork_pr_approval_policy(owner, repo_name).await?;
    if current.approval_policy == ApprovalPolicy::AllExternalContributors {
        return Ok(());
    }
    if dry_run {
        return Ok(());
    }

    client
        .set_fork_pr_approval_policy(
            owner,
            repo_name,
            ForkPrApprovalPolicy { approval_policy: ApprovalPolicy::AllExternalContributors },
        )
        .await?;
    Ok(())
}

/// Updates visibility unless `current`, or unless the stargazer count makes
/// the mutation too risky to apply silently.
pub async fn reconcile_visibility(
    cache: &OrgClientCache,
    dry_run: bool,
    owner: &str,
    repo_name: &str,
    declared: Visibility,
    observed: &Repository,
) -> Result<Option<MessageBuilder>, Error> {
    if declared == Visibility::Current {
        return Ok(None);
    }

    let should_be_private = declared == Visibility::Private;
    if should_be_private == observed.is_private() {
        return Ok(None);
    }

    let stargazers_unknown_or_popular = match observed.stargazers_count() {
        Some(count) => count >= STARGAZER_VISIBILITY_THRESHOLD,
        None => true,
    };
    if stargazers_unknown_or_popular {
        let message = MessageBuilder::new(Severity::Critical)
            .repository(format!("{owner}/{repo_name}"))
            .text("refused to change visibility on a repository with a high or unknown stargazer count")
            .divider();
        return Ok(Some(message));
    }

    if dry_run {
        return Ok(None);
    }

    let update = RepositorySettingsUpdate { private: Some(should_be_private), ..Default::default() };
    cache.client().client().update_repository_settings(owner, repo_name, &update).await?;
    Ok(None)
}

/// Compares declared property values (augmented with org-level defaults the
/// repo doesn't override) against observed values, sorted by name, and
/// issues a single bulk upsert on any mismatch.
pub async fn reconcile_custom_properties(
    cache: &OrgClientCache,
    dry_run: bool,
    owner: &str,
    repo_name: &str,
    declared: &BTreeMap<String, PropertyValue>,
    org_defaults: &[CustomProperty],
    observed: &HashMap<String, serde_json::Value>,
) -> Result<(), Error> {
    let mut effective: BTreeMap<String, serde_json::Value> = BTreeMap::new();
    for definition in org_defaults {
        if let Some(default) = &definition.default_value {
            effective.insert(definition.property_name.clone(), default.clone());
        }
    }
    for (name, value) in declared {
        let json_value = match value {
            PropertyValue::Scalar(s) => serde_json::Value::String(s.clone()),
            PropertyValue::List(items) => {
                serde_json::Value::Array(items.iter().cloned().map(serde_json::Value::String).collect())
            }
        };
        effective.insert(name.clone(), json_value);
    }

    let observed_sorted: BTreeMap<&String, &serde_json::Value> = observed.iter().collect();
    let effective_sorted: BTreeMap<&String, &serde_json::Value> = effective.iter().collect();

    if observed_sorted == effective_sorted {
        return Ok(());
    }
    if dry_run {
        return Ok(());
    }

    let payload_items = effective
        .iter()
        .map(|(name, value)| serde_json::json!({ "property_name": name, "value": value }))
        .collect();
    let payload = github_client::CustomPropertiesPayload::new(payload_items);
    cache.client().client().set_repository_custom_properties(owner, repo_name, &payload).await?;
    Ok(())
}

/// Resolves a repo's `rulesets` entries (inline or named references into
/// `common_rulesets`) into fully normalized rulesets, then diffs each
/// against the observed set by name, creating/updating/deleting as needed.
pub async fn reconcile_rulesets(
    cache: &OrgClientCache,
    dry_run: bool,
    owner: &str,
    repo_name: &str,
    repo: &RepositoryConfig,
    common_rulesets: &BTreeMap<String, Ruleset>,
    team_ids: &BTreeMap<String, u64>,
    observed: &[RepositoryRuleset],
) -> Result<(), Error> {
    let client = cache.client().client();

    let mut declared_rulesets: Vec<(String, RepositoryRuleset)> = Vec::new();
    for entry in &repo.rulesets {
        let ruleset = match entry {
            RulesetRef::Inline(inline) => inline.as_ref().clone(),
            RulesetRef::Named(name) => common_rulesets
                .get(name)
                .ok_or_else(|| Error::policy_violation(cache.org(), format!("ruleset '{name}' not found")))?
                .clone(),
        };
        let name = ruleset.name.clone();
        declared_rulesets.push((name, normalize(&ruleset, team_ids)));
    }

    for (name, declared) in &declared_rulesets {
        let existing = observed.iter().find(|r| &r.name == name);
        match existing {
            None => {
                if dry_run {
                    continue;
                }
                client.create_repository_ruleset(owner, repo_name, declared).await?;
            }
            Some(existing) => {
                let canonical = canonicalize_observed(existing.clone());
                if diff(declared, &canonical).is_empty() {
                    continue;
                }
                if dry_run {
                    continue;
                }
                let Some(id) = existing.id else { continue };
                client.update_repository_ruleset(owner, repo_name, id, declared).await?;
            }
        }
    }

    for observed_ruleset in observed {
        let still_declared = declared_rulesets.iter().any(|(n, _)| *n == observed_ruleset.name);
        if still_declared {
            continue;
        }
        if dry_run {
            continue;
        }
        if let Some(id) = observed_ruleset.id {
            client.delete_repository_ruleset(owner, repo_name, id).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collaborator_removed_when_undeclared() {
        let action = collaborator_action(None, Some(AccessLevel::Write));
        assert!(matches!(action, CollaboratorAction::Remove));
    }

    #[test]
    fn collaborator_updated_when_level_differs() {
        let action = collaborator_action(Some(AccessLevel::Admin), Some(AccessLevel::Write));
        assert!(matches!(action, CollaboratorAction::UpdatePermission));
    }

    #[test]
    fn collaborator_noop_when_matching() {
        let action = collaborator_action(Some(AccessLevel::Write), Some(AccessLevel::Write));
        assert!(matches!(action, CollaboratorAction::Noop));
    }
}
