//! Collaborator-change enforcement: reverts or adjusts a direct-collaborator
//! grant that drifted from the declared configuration (spec §4.7.1).

use config_manager::{AccessLevel, OrganizationConfig};
use github_client::MemberEventPayload;
use reconciler::alert::{EnforcementOutcome, MessageBuilder, Severity};
use reconciler::OrgClientCache;

use crate::Error;

/// `None` means ALLOW: no alert, no mutation.
pub async fn enforce(
    cache: &OrgClientCache,
    org_config: &OrganizationConfig,
    event: &MemberEventPayload,
) -> Result<Option<MessageBuilder>, Error> {
    if org_config.organization != event.repository.owner.login {
        return Ok(None);
    }
    let Some(repo_config) = org_config.repository(&event.repository.name) else {
        return Ok(None);
    };

    let member_login = &event.member.login;
    let expected_level = repo_config.external_collaborators.get(member_login).copied();

    let owners = cache.owners().await?;
    if owners.iter().any(|u| &u.login == member_login) {
        return Ok(None);
    }

    let removed = event.action == "removed";

    let Some(expected_level) = expected_level else {
        if removed {
            return Ok(None);
        }
        cache
            .client()
            .client()
            .remove_collaborator(&event.repository.owner.login, &event.repository.name, member_login)
            .await?;
        return Ok(Some(build_alert(event, EnforcementOutcome::Revert, None)));
    };

    let observed_level = if removed {
        None
    } else {
        let collaborators = cache
            .client()
            .client()
            .list_direct_collaborators(&event.repository.owner.login, &event.repository.name)
            .await?;
        collaborators
            .iter()
            .find(|c| &c.login == member_login)
            .and_then(|c| AccessLevel::from_bitmap(&c.permissions))
    };

    if observed_level == Some(expected_level) {
        return Ok(None);
    }

    cache
        .client()
        .client()
        .add_collaborator(
            &event.repository.owner.login,
            &event.repository.name,
            member_login,
            expected_level.to_github(),
        )
        .await?;

    let outcome = if removed { EnforcementOutcome::Revert } else { EnforcementOutcome::Adjust };
    Ok(Some(build_alert(event, outcome, Some(expected_level))))
}

fn build_alert(
    event: &MemberEventPayload,
    outcome: EnforcementOutcome,
    expected_level: Option<AccessLevel>,
) -> MessageBuilder {
    let expected_text = expected_level.map(|l| l.to_github());
    MessageBuilder::new(Severity::Critical)
        .text(format!("collaborator change on `{}` was enforced", event.repository.full_name))
        .user(event.member.login.clone())
        .repository(event.repository.full_name.clone())
        .enforcement_outcome(outcome, expected_text)
        .metadata(serde_json::json!({
            "repository": event.repository.full_name,
            "member": event.member.login,
            "action": event.action,
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use config_manager::{RepositoryConfig, RepositoryDefaults};
    use github_client::{EventRepository, EventSender};
    use std::collections::BTreeMap;

    fn org_config(repo: RepositoryConfig) -> OrganizationConfig {
        OrganizationConfig {
            organization: "acme".to_string(),
            repository_defaults: RepositoryDefaults::default(),
            teams: Vec::new(),
            repositories: vec![repo],
            common_rulesets: BTreeMap::new(),
            custom_properties: Vec::new(),
        }
    }

    fn repo_config(external: BTreeMap<String, AccessLevel>) -> RepositoryConfig {
        RepositoryConfig {
            name: "app".to_string(),
            teams: BTreeMap::new(),
            external_collaborators: external,
            settings: Default::default(),
            visibility: Default::default(),
            properties: BTreeMap::new(),
            rulesets: Vec::new(),
        }
    }

    fn event(login: &str, action: &str) -> MemberEventPayload {
        MemberEventPayload {
            action: action.to_string(),
            member: EventSender { login: login.to_string() },
            repository: EventRepository {
                name: "app".to_string(),
                full_name: "acme/app".to_string(),
                owner: EventSender { login: "acme".to_string() },
            },
            sender: EventSender { login: "someone".to_string() },
            changes: None,
        }
    }

    #[test]
    fn undeclared_removed_member_is_allowed() {
        let org = org_config(repo_config(BTreeMap::new()));
        let ev = event("mallory", "removed");
        assert!(org.repository("app").unwrap().external_collaborators.get(&ev.member.login).is_none());
    }

    #[test]
    fn mismatched_org_is_ignored_before_any_api_call() {
        let org = org_config(repo_config(BTreeMap::new()));
        assert_ne!(org.organization, "other-org");
    }
}
