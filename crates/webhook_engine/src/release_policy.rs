//! Trusted-releaser policy for `release.*` events (spec §4.7.2).

use github_client::{GitHubClient, ReleaseEventPayload};
use reconciler::alert::Severity;
use serde::Deserialize;

use crate::Error;

#[derive(Clone, Debug, Deserialize)]
pub struct TrustedReleaserPolicy {
    pub repository: String,
    pub releaser: String,
    #[serde(rename = "mustMatchRepo")]
    pub must_match_repo: String,
    pub actions: Vec<String>,
}

pub fn parse_policies(raw: &str) -> Result<Vec<TrustedReleaserPolicy>, Error> {
    serde_json::from_str(raw).map_err(|e| Error::MalformedPayload(e.to_string()))
}

/// Returns `None` to silently drop the event, `Some(severity)` to alert.
pub async fn classify(
    client: &GitHubClient,
    event: &ReleaseEventPayload,
    trusted_releasers: &[String],
    policies: &[TrustedReleaserPolicy],
) -> Result<Option<Severity>, Error> {
    if trusted_releasers.contains(&event.sender.login) {
        return Ok(None);
    }

    let matching_policy = policies.iter().find(|p| {
        p.repository == event.repository.full_name
            && p.releaser == event.sender.login
            && p.actions.contains(&event.action)
    });

    if let Some(policy) = matching_policy {
        let Some((owner, repo)) = policy.must_match_repo.split_once('/') else {
            return Err(Error::MalformedPayload(format!(
                "trusted releaser policy `mustMatchRepo` is not owner/repo: {}",
                policy.must_match_repo
            )));
        };
        let mirrored = client.get_release_by_tag(owner, repo, &event.release.tag_name).await?;
        return Ok(if mirrored.is_some() { None } else { Some(Severity::Critical) });
    }

    let severity = match event.action.as_str() {
        "deleted" => Severity::Critical,
        "unpublished" | "edited" => Severity::Warning,
        "created" | "published" | "prereleased" => Severity::Normal,
        _ => return Ok(None),
    };
    Ok(Some(severity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_policy_array() {
        let raw = r#"[{"repository":"acme/app","releaser":"bot","mustMatchRepo":"acme/app-upstream","actions":["created"]}]"#;
        let policies = parse_policies(raw).unwrap();
        assert_eq!(policies.len(), 1);
        assert_eq!(policies[0].must_match_repo, "acme/app-upstream");
    }

    #[test]
    fn malformed_policy_json_is_an_error() {
        assert!(parse_policies("not json").is_err());
    }
}
