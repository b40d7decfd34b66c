//! Multi-source loading of the permissions document: local file, an
//! explicit local path override, or the platform as a fallback.

use std::collections::BTreeMap;
use std::path::Path;

use github_client::GitHubClient;
use tracing::{debug, instrument};

use crate::errors::Error;
use crate::normalize::{expand_formations, expand_references};
use crate::organization::{OrganizationConfig, PermissionsConfig};
use crate::validator;

const DEFAULT_NAMES: [&str; 2] = ["config.yml", "config.yaml"];

/// Where the document was actually read from, for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    LocalFile(String),
    Platform { org: String, repo: String, path: String, r#ref: String },
}

/// Reads the raw document text, trying local candidates before falling back
/// to the platform. Does not parse or validate.
#[instrument(skip(client))]
pub async fn fetch_raw(client: &GitHubClient, local_override: Option<&str>) -> Result<(String, ConfigSource), Error> {
    if let Some(path) = local_override {
        return read_local(path);
    }

    for candidate in DEFAULT_NAMES {
        if Path::new(candidate).is_file() {
            return read_local(candidate);
        }
    }

    let org = std::env::var("PERMISSIONS_FILE_ORG")
        .map_err(|_| Error::ConfigMissing("PERMISSIONS_FILE_ORG is not set".to_string()))?;
    let repo = std::env::var("PERMISSIONS_FILE_REPO").unwrap_or_else(|_| ".permissions".to_string());
    let path = std::env::var("PERMISSIONS_FILE_PATH").unwrap_or_else(|_| "config.yaml".to_string());
    let r#ref = std::env::var("PERMISSIONS_FILE_REF").unwrap_or_else(|_| "main".to_string());

    debug!(org, repo, path, r#ref, "fetching permissions document from platform");
    let content = client
        .get_file_content(&org, &repo, &path, Some(&r#ref))
        .await
        .map_err(|source| Error::ConfigMissing(format!("failed to fetch {org}/{repo}/{path}@{ref}: {source}", ref = r#ref)))?;

    Ok((content, ConfigSource::Platform { org, repo, path, r#ref }))
}

fn read_local(path: &str) -> Result<(String, ConfigSource), Error> {
    let content = std::fs::read_to_string(path)?;
    Ok((content, ConfigSource::LocalFile(path.to_string())))
}

/// Parses the raw document, expands formations and references, and runs the
/// validator against every resulting organization.
#[instrument(skip(raw))]
pub fn parse_and_normalize(raw: &str) -> Result<Vec<OrganizationConfig>, Error> {
    let document: serde_yaml::Value = serde_yaml::from_str(raw)?;

    let mut teams_by_org = BTreeMap::new();
    if let serde_yaml::Value::Mapping(ref map) = document {
        if let Some(teams_value) = map.get("teams") {
            let org_name = map
                .get("organization")
                .and_then(|v| v.as_str())
                .ok_or_else(|| Error::ConfigMalformed("document missing `organization` key".to_string()))?;
            teams_by_org.insert(org_name.to_string(), expand_formations(teams_value)?);
        }
    } else if let serde_yaml::Value::Sequence(ref orgs) = document {
        for org_value in orgs {
            let org_name = org_value
                .get("organization")
                .and_then(|v| v.as_str())
                .ok_or_else(|| Error::ConfigMalformed("organization entry missing `organization` key".to_string()))?;
            if let Some(teams_value) = org_value.get("teams") {
                teams_by_org.insert(org_name.to_string(), expand_formations(teams_value)?);
            }
        }
    }

    let resolved_teams = expand_references(teams_by_org);

    let permissions: PermissionsConfig = serde_yaml::from_value(document)?;
    let mut orgs = permissions.into_orgs();

    for org in &mut orgs {
        if let Some(teams) = resolved_teams.get(&org.organization) {
            org.teams = teams.clone();
        }
        validator::validate(org)?;
    }

    Ok(orgs)
}

/// Loads, parses, normalizes, and validates the permissions document, trying
/// the usual sources in order.
#[instrument(skip(client))]
pub async fn load_permissions_config(
    client: &GitHubClient,
    local_override: Option<&str>,
) -> Result<Vec<OrganizationConfig>, Error> {
    let (raw, source) = fetch_raw(client, local_override).await?;
    debug!(?source, "loaded permissions document");
    parse_and_normalize(&raw)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
