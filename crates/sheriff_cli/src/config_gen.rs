//! Reads an organization's live state from GitHub and emits it as a
//! canonical permissions document (spec §6's config generator).
//!
//! Ruleset bodies are not reverse-engineered: GitHub's normalized ruleset
//! shape does not roundtrip losslessly back to the declarative `RulesetRef`
//! form, so generated repos always declare an empty `rulesets` list.

use std::collections::BTreeMap;

use config_manager::{
    AccessLevel, CustomProperty, CustomPropertyValueType, OrganizationConfig, PropertyValue,
    RepositoryConfig, RepositoryDefaults, RepositorySettingsDecl, TeamConfig, Visibility,
};
use github_client::{GitHubClient, TeamMembershipRole};

use crate::Error;

pub async fn generate(client: &GitHubClient, org: &str) -> Result<OrganizationConfig, Error> {
    let mut teams = Vec::new();
    for team in client.list_teams(org).await? {
        let maintainers = client
            .list_team_members_by_role(org, &team.slug, TeamMembershipRole::Maintainer)
            .await?
            .into_iter()
            .map(|m| m.login)
            .collect();
        let members = client
            .list_team_members_by_role(org, &team.slug, TeamMembershipRole::Member)
            .await?
            .into_iter()
            .map(|m| m.login)
            .collect();
        teams.push(TeamConfig {
            name: team.name,
            members,
            maintainers,
            parent: team.parent.map(|p| p.slug),
            secret: team.privacy == github_client::TeamPrivacy::Secret,
            display_name: None,
            gsuite: None,
            slack: None,
        });
    }
    teams.sort_by(|a, b| a.name.cmp(&b.name));

    let repositories_live = client.search_repositories(&format!("org:{org}")).await?;
    let mut repositories = Vec::new();
    for repo in &repositories_live {
        let mut teams_decl = BTreeMap::new();
        for t in client.list_repository_teams(org, repo.name()).await? {
            if let Some(level) = AccessLevel::from_github(&t.permission) {
                teams_decl.insert(t.slug, level);
            }
        }

        let mut external_collaborators = BTreeMap::new();
        for collaborator in client.list_direct_collaborators(org, repo.name()).await? {
            if let Some(level) = AccessLevel::from_bitmap(&collaborator.permissions) {
                external_collaborators.insert(collaborator.login, level);
            }
        }

        let mut properties = BTreeMap::new();
        for (name, value) in client.get_custom_properties(org, repo.name()).await? {
            let declared = match value {
                serde_json::Value::Array(items) => PropertyValue::List(
                    items.into_iter().filter_map(|v| v.as_str().map(str::to_string)).collect(),
                ),
                serde_json::Value::String(s) => PropertyValue::Scalar(s),
                _ => continue,
            };
            properties.insert(name, declared);
        }

        repositories.push(RepositoryConfig {
            name: repo.name().to_string(),
            teams: teams_decl,
            external_collaborators,
            settings: RepositorySettingsDecl {
                has_wiki: repo.has_wiki(),
                forks_need_actions_approval: None,
            },
            visibility: if repo.is_private() { Visibility::Private } else { Visibility::Public },
            properties,
            rulesets: Vec::new(),
        });
    }
    repositories.sort_by(|a, b| a.name.cmp(&b.name));

    let custom_properties = client
        .list_organization_custom_properties(org)
        .await?
        .into_iter()
        .map(|definition| CustomProperty {
            property_name: definition.property_name,
            value_type: match definition.value_type {
                github_client::CustomPropertyValueType::String => CustomPropertyValueType::String,
                github_client::CustomPropertyValueType::SingleSelect => {
                    CustomPropertyValueType::SingleSelect
                }
                github_client::CustomPropertyValueType::MultiSelect => {
                    CustomPropertyValueType::MultiSelect
                }
            },
            required: definition.required,
            default_value: definition.default_value,
            description: definition.description,
            allowed_values: definition.allowed_values,
        })
        .collect();

    Ok(OrganizationConfig {
        organization: org.to_string(),
        repository_defaults: RepositoryDefaults::default(),
        teams,
        repositories,
        common_rulesets: BTreeMap::new(),
        custom_properties,
    })
}

pub fn render_yaml(config: &OrganizationConfig) -> Result<String, Error> {
    Ok(serde_yaml::to_string(config)?)
}
