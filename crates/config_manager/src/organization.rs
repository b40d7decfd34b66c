//! Top-level organization configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::custom_property::CustomProperty;
use crate::repository::{RepositoryConfig, RepositoryDefaults};
use crate::ruleset::Ruleset;
use crate::team::TeamConfig;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OrganizationConfig {
    pub organization: String,
    pub repository_defaults: RepositoryDefaults,
    #[serde(default)]
    pub teams: Vec<TeamConfig>,
    #[serde(default)]
    pub repositories: Vec<RepositoryConfig>,
    #[serde(default)]
    pub common_rulesets: BTreeMap<String, Ruleset>,
    #[serde(default, rename = "customProperties")]
    pub custom_properties: Vec<CustomProperty>,
}

impl OrganizationConfig {
    pub fn team(&self, name: &str) -> Option<&TeamConfig> {
        self.teams.iter().find(|t| t.name == name)
    }

    pub fn repository(&self, name: &str) -> Option<&RepositoryConfig> {
        self.repositories.iter().find(|r| r.name == name)
    }
}

/// One organization, or an ordered list of them, as the source document may
/// declare either shape at the top level.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PermissionsConfig {
    Many(Vec<OrganizationConfig>),
    One(Box<OrganizationConfig>),
}

impl PermissionsConfig {
    pub fn into_orgs(self) -> Vec<OrganizationConfig> {
        match self {
            PermissionsConfig::Many(orgs) => orgs,
            PermissionsConfig::One(org) => vec![*org],
        }
    }
}
