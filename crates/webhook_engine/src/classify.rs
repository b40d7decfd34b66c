//! Maps a received webhook event to a decision: alert, enforce, dry-run, or
//! ignore (spec §4.7's event-class table).

use github_client::{
    DeleteEventPayload, DeployKeyEventPayload, MetaEventPayload, OrganizationEventPayload,
    PersonalAccessTokenRequestEventPayload, PublicEventPayload, PullRequestEventPayload,
    RepositoryEventPayload,
};
use regex::Regex;
use reconciler::alert::Severity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Alert { severity: Severity, text: String },
    Enforce,
    DryRun { owner: String, repo: String, pr_number: u64, head_sha: String },
    Ignore,
}

fn release_line_regex() -> Regex {
    Regex::new(r"(^[0-9]+-[0-9]+-x$)|(^[0-9]+-x-y$)").expect("static regex is valid")
}

pub fn classify_delete(event: &DeleteEventPayload, trusted_releasers: &[String]) -> Decision {
    if event.ref_type == "branch" && release_line_regex().is_match(&event.ref_name) {
        return Decision::Alert {
            severity: Severity::Critical,
            text: format!("release-line branch `{}` was deleted", event.ref_name),
        };
    }
    if event.ref_type == "tag" && !trusted_releasers.contains(&event.sender.login) {
        return Decision::Alert {
            severity: Severity::Warning,
            text: format!("tag `{}` was deleted by an untrusted sender", event.ref_name),
        };
    }
    Decision::Ignore
}

pub fn classify_deploy_key(event: &DeployKeyEventPayload) -> Decision {
    if event.action != "created" {
        return Decision::Ignore;
    }
    if !event.key.read_only {
        return Decision::Alert {
            severity: Severity::Critical,
            text: "deploy key created with write access".to_string(),
        };
    }
    Decision::Alert { severity: Severity::Warning, text: "read-only deploy key created".to_string() }
}

pub fn classify_meta(event: &MetaEventPayload) -> Decision {
    if event.action == "deleted" {
        Decision::Alert { severity: Severity::Critical, text: "webhook configuration deleted".to_string() }
    } else {
        Decision::Ignore
    }
}

pub fn classify_organization(event: &OrganizationEventPayload) -> Decision {
    let severity = match event.action.as_str() {
        "member_invited" => Severity::Normal,
        "member_added" => Severity::Normal,
        "member_removed" => Severity::Normal,
        "renamed" => Severity::Critical,
        _ => return Decision::Ignore,
    };
    Decision::Alert { severity, text: format!("organization.{}", event.action) }
}

pub fn classify_repository(event: &RepositoryEventPayload, self_login: &str) -> Decision {
    if event.sender.login == self_login {
        return Decision::Ignore;
    }
    match event.action.as_str() {
        "deleted" => Decision::Alert { severity: Severity::Critical, text: "repository deleted".to_string() },
        "archived" => Decision::Alert { severity: Severity::Warning, text: "repository archived".to_string() },
        _ => Decision::Ignore,
    }
}

pub fn classify_public(event: &PublicEventPayload, self_login: &str) -> Decision {
    if event.sender.login == self_login {
        return Decision::Ignore;
    }
    Decision::Alert { severity: Severity::Warning, text: "repository made public".to_string() }
}

pub fn classify_personal_access_token_request(event: &PersonalAccessTokenRequestEventPayload) -> Decision {
    match event.action.as_str() {
        "created" => Decision::Alert {
            severity: Severity::Normal,
            text: "personal access token request created".to_string(),
        },
        "approved" => Decision::Alert {
            severity: Severity::Warning,
            text: "personal access token request approved".to_string(),
        },
        _ => Decision::Ignore,
    }
}

/// `pull_request.opened`/`.synchronize` on the config repo triggers a
/// dry-run; anything else (wrong action, wrong repo) is ignored.
pub fn classify_pull_request(
    event: &PullRequestEventPayload,
    config_org: &str,
    config_repo: &str,
) -> Decision {
    if event.action != "opened" && event.action != "synchronize" {
        return Decision::Ignore;
    }
    if event.repository.owner.login != config_org || event.repository.name != config_repo {
        return Decision::Ignore;
    }
    Decision::DryRun {
        owner: event.repository.owner.login.clone(),
        repo: event.repository.name.clone(),
        pr_number: event.number,
        head_sha: event.pull_request.head.sha.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use github_client::{DeployKey, EventRepository, EventSender};

    fn sender(login: &str) -> EventSender {
        EventSender { login: login.to_string() }
    }

    #[test]
    fn tag_delete_by_untrusted_sender_is_a_warning() {
        let event = DeleteEventPayload {
            ref_name: "v1.0.0".to_string(),
            ref_type: "tag".to_string(),
            repository: EventRepository { name: "app".to_string(), full_name: "acme/app".to_string(), owner: sender("acme") },
            sender: sender("mallory"),
        };
        assert_eq!(
            classify_delete(&event, &[]),
            Decision::Alert { severity: Severity::Warning, text: "tag `v1.0.0` was deleted by an untrusted sender".to_string() }
        );
    }

    #[test]
    fn tag_delete_by_trusted_releaser_is_ignored() {
        let event = DeleteEventPayload {
            ref_name: "v1.0.0".to_string(),
            ref_type: "tag".to_string(),
            repository: EventRepository { name: "app".to_string(), full_name: "acme/app".to_string(), owner: sender("acme") },
            sender: sender("releasebot"),
        };
        assert_eq!(classify_delete(&event, &["releasebot".to_string()]), Decision::Ignore);
    }

    #[test]
    fn release_line_branch_delete_is_critical() {
        let event = DeleteEventPayload {
            ref_name: "1-2-x".to_string(),
            ref_type: "branch".to_string(),
            repository: EventRepository { name: "app".to_string(), full_name: "acme/app".to_string(), owner: sender("acme") },
            sender: sender("anyone"),
        };
        let decision = classify_delete(&event, &[]);
        assert_eq!(decision, Decision::Alert { severity: Severity::Critical, text: "release-line branch `1-2-x` was deleted".to_string() });
    }

    #[test]
    fn write_access_deploy_key_is_critical() {
        let event = DeployKeyEventPayload {
            action: "created".to_string(),
            key: DeployKey { read_only: false },
            repository: EventRepository { name: "app".to_string(), full_name: "acme/app".to_string(), owner: sender("acme") },
            sender: sender("anyone"),
        };
        assert_eq!(
            classify_deploy_key(&event),
            Decision::Alert { severity: Severity::Critical, text: "deploy key created with write access".to_string() }
        );
    }

    #[test]
    fn self_event_repository_deleted_is_suppressed() {
        let event = RepositoryEventPayload {
            action: "deleted".to_string(),
            repository: EventRepository { name: "app".to_string(), full_name: "acme/app".to_string(), owner: sender("acme") },
            sender: sender("sheriff-bot"),
        };
        assert_eq!(classify_repository(&event, "sheriff-bot"), Decision::Ignore);
    }

    #[test]
    fn pull_request_synchronize_on_config_repo_triggers_dry_run() {
        let event = PullRequestEventPayload {
            action: "synchronize".to_string(),
            number: 42,
            pull_request: github_client::PullRequestInfo {
                head: github_client::PullRequestRef { sha: "abc123".to_string() },
            },
            repository: EventRepository { name: ".permissions".to_string(), full_name: "acme/.permissions".to_string(), owner: sender("acme") },
            sender: sender("contributor"),
        };
        let decision = classify_pull_request(&event, "acme", ".permissions");
        assert!(matches!(decision, Decision::DryRun { pr_number: 42, .. }));
    }
}
