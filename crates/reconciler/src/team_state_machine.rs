//! Per-team reconcile: existence, privacy, parent, and membership sync
//! (spec §4.3).

use std::collections::BTreeSet;

use config_manager::TeamConfig;
use github_client::{CreateTeamPayload, Team, TeamMembershipRole, TeamParent, TeamPrivacy, UpdateTeamPayload};
use tracing::instrument;

use crate::client_cache::OrgClientCache;
use crate::errors::Error;

/// Used as a team id when a team doesn't exist yet and the run is dry-run,
/// so downstream steps (membership sync, repo attach) proceed without
/// touching the platform.
pub const DRY_RUN_PLACEHOLDER_ID: u64 = u64::MAX;

/// Finds the declared team upstream by name, creating it (or a dry-run
/// placeholder) if absent. Fatal if more than one upstream team shares the
/// name.
#[instrument(skip(cache, declared), fields(org = %cache.org(), team = %declared.name))]
pub async fn ensure_team(cache: &OrgClientCache, dry_run: bool, declared: &TeamConfig) -> Result<Team, Error> {
    let teams = cache.teams().await?;
    let matches: Vec<&Team> = teams.iter().filter(|t| t.name == declared.name).collect();

    match matches.len() {
        0 => {
            if dry_run {
                return Ok(Team {
                    id: DRY_RUN_PLACEHOLDER_ID,
                    node_id: String::new(),
                    name: declared.name.clone(),
                    slug: declared.name.to_lowercase().replace(' ', "-"),
                    privacy: desired_privacy(declared),
                    parent: None,
                });
            }
            let payload = CreateTeamPayload {
                name: declared.name.clone(),
                privacy: Some(desired_privacy(declared)),
                parent_team_id: None,
            };
            let created = cache.client().client().create_team(cache.org(), &payload).await?;
            cache.invalidate_teams().await;
            Ok(created)
        }
        1 => Ok(matches[0].clone()),
        _ => Err(Error::DuplicateTeam(declared.name.clone())),
    }
}

fn desired_privacy(declared: &TeamConfig) -> TeamPrivacy {
    if declared.secret {
        TeamPrivacy::Secret
    } else {
        TeamPrivacy::Closed
    }
}

/// Updates privacy and parent if they differ from the declared state.
/// Returns the (possibly refreshed) team.
#[instrument(skip(cache, team, declared, all_teams), fields(org = %cache.org(), team = %team.name))]
pub async fn sync_privacy_and_parent(
    cache: &OrgClientCache,
    dry_run: bool,
    team: Team,
    declared: &TeamConfig,
    all_teams: &[Team],
) -> Result<Team, Error> {
    if team.id == DRY_RUN_PLACEHOLDER_ID {
        return Ok(team);
    }

    let want_privacy = desired_privacy(declared);
    let want_parent_id = match &declared.parent {
        Some(parent_name) => all_teams.iter().find(|t| &t.name == parent_name).map(|t| t.id),
        None => None,
    };
    let has_parent_mismatch = match (&team.parent, want_parent_id) {
        (Some(observed), Some(wanted)) => observed.id != wanted,
        (None, Some(_)) => true,
        (Some(_), None) => declared.parent.is_some(),
        (None, None) => false,
    };

    if team.privacy == want_privacy && !has_parent_mismatch {
        return Ok(team);
    }

    if dry_run {
        return Ok(Team {
            privacy: want_privacy,
            parent: want_parent_id.map(|id| TeamParent { id, slug: String::new() }),
            ..team
        });
    }

    let payload = UpdateTeamPayload {
        privacy: Some(want_privacy),
        parent_team_id: want_parent_id.or(match team.parent {
            Some(ref p) if !has_parent_mismatch => Some(p.id),
            _ => None,
        }),
    };
    let updated = cache.client().client().update_team(cache.org(), &team.slug, &payload).await?;
    Ok(updated)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Role {
    Maintainer,
    Member,
    Absent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Noop,
    Put(TeamMembershipRole),
    Evict,
}

fn transition(desired: Role, observed: Role, is_owner: bool, declared_member: bool) -> Action {
    match (desired, observed) {
        (Role::Maintainer, Role::Maintainer) => Action::Noop,
        (Role::Maintainer, Role::Member) => Action::Put(TeamMembershipRole::Maintainer),
        (Role::Maintainer, Role::Absent) => Action::Put(TeamMembershipRole::Maintainer),
        (Role::Member, Role::Maintainer) => {
            if is_owner {
                Action::Noop
            } else {
                Action::Put(TeamMembershipRole::Member)
            }
        }
        (Role::Member, Role::Member) => Action::Noop,
        (Role::Member, Role::Absent) => Action::Put(TeamMembershipRole::Member),
        (Role::Absent, Role::Maintainer) => {
            if is_owner && declared_member {
                Action::Noop
            } else {
                Action::Evict
            }
        }
        (Role::Absent, Role::Member) => Action::Evict,
        (Role::Absent, Role::Absent) => Action::Noop,
    }
}

/// Syncs a team's membership against its declared members/maintainers.
/// `pending_invites` holds logins with an outstanding org invitation — adds
/// and promotions are skipped for them until the invite resolves.
#[instrument(skip_all, fields(org = %cache.org(), team = %team.slug))]
pub async fn sync_membership(
    cache: &OrgClientCache,
    dry_run: bool,
    team: &Team,
    declared: &TeamConfig,
    owners: &BTreeSet<String>,
    pending_invites: &BTreeSet<String>,
) -> Result<(), Error> {
    if team.id == DRY_RUN_PLACEHOLDER_ID {
        return Ok(());
    }

    let observed_maintainers: BTreeSet<String> = cache
        .client()
        .client()
        .list_team_members_by_role(cache.org(), &team.slug, TeamMembershipRole::Maintainer)
        .await?
        .into_iter()
        .map(|m| m.login)
        .collect();
    let observed_members: BTreeSet<String> = cache
        .client()
        .client()
        .list_team_members_by_role(cache.org(), &team.slug, TeamMembershipRole::Member)
        .await?
        .into_iter()
        .map(|m| m.login)
        .collect();

    let mut all_logins: BTreeSet<String> = BTreeSet::new();
    all_logins.extend(declared.maintainers.iter().cloned());
    all_logins.extend(declared.members.iter().cloned());
    all_logins.extend(observed_maintainers.iter().cloned());
    all_logins.extend(observed_members.iter().cloned());

    for login in all_logins {
        let desired = if declared.maintainers.contains(&login) {
            Role::Maintainer
        } else if declared.members.contains(&login) {
            Role::Member
        } else {
            Role::Absent
        };
        let observed = if observed_maintainers.contains(&login) {
            Role::Maintainer
        } else if observed_members.contains(&login) {
            Role::Member
        } else {
            Role::Absent
        };

        let is_owner = owners.contains(&login);
        let declared_member = declared.members.contains(&login) || declared.maintainers.contains(&login);
        let action = transition(desired, observed, is_owner, declared_member);

        match action {
            Action::Noop => {}
            Action::Put(role) => {
                if pending_invites.contains(&login) {
                    continue;
                }
                if dry_run {
                    continue;
                }
                cache.client().client().put_team_membership(cache.org(), &team.slug, &login, role).await?;
            }
            Action::Evict => {
                if dry_run {
                    continue;
                }
                cache.client().client().remove_team_membership(cache.org(), &team.slug, &login).await?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maintainer_observed_member_is_promoted() {
        assert_eq!(
            transition(Role::Maintainer, Role::Member, false, false),
            Action::Put(TeamMembershipRole::Maintainer)
        );
    }

    #[test]
    fn member_demotion_noops_for_org_owner() {
        assert_eq!(transition(Role::Member, Role::Maintainer, true, false), Action::Noop);
    }

    #[test]
    fn member_demotion_applies_for_non_owner() {
        assert_eq!(
            transition(Role::Member, Role::Maintainer, false, false),
            Action::Put(TeamMembershipRole::Member)
        );
    }

    #[test]
    fn eviction_noops_for_owner_who_is_also_declared_member() {
        assert_eq!(transition(Role::Absent, Role::Maintainer, true, true), Action::Noop);
    }

    #[test]
    fn eviction_applies_for_owner_not_declared_anywhere() {
        assert_eq!(transition(Role::Absent, Role::Maintainer, true, false), Action::Evict);
    }

    #[test]
    fn absent_absent_is_noop() {
        assert_eq!(transition(Role::Absent, Role::Absent, false, false), Action::Noop);
    }
}
