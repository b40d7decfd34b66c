//! Repository declarations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::access_level::AccessLevel;
use crate::ruleset::RulesetRef;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RepositoryConfig {
    pub name: String,
    #[serde(default)]
    pub teams: BTreeMap<String, AccessLevel>,
    #[serde(default)]
    pub external_collaborators: BTreeMap<String, AccessLevel>,
    #[serde(default)]
    pub settings: RepositorySettingsDecl,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
    #[serde(default)]
    pub rulesets: Vec<RulesetRef>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RepositorySettingsDecl {
    #[serde(default)]
    pub has_wiki: Option<bool>,
    #[serde(default)]
    pub forks_need_actions_approval: Option<bool>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Current,
}

/// A custom-property value: a scalar for `string`/`single_select`, or an
/// array for `multi_select`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum PropertyValue {
    Scalar(String),
    List(Vec<String>),
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RepositoryDefaults {
    pub has_wiki: bool,
    #[serde(default)]
    pub forks_need_actions_approval: Option<bool>,
}

/// The effective settings for a repo: `repo.settings` falls back field-by-field
/// to `repository_defaults`.
pub struct EffectiveSettings {
    pub has_wiki: bool,
    pub forks_need_actions_approval: bool,
}

impl RepositoryConfig {
    pub fn effective_settings(&self, defaults: &RepositoryDefaults) -> EffectiveSettings {
        EffectiveSettings {
            has_wiki: self.settings.has_wiki.unwrap_or(defaults.has_wiki),
            forks_need_actions_approval: self
                .settings
                .forks_need_actions_approval
                .or(defaults.forks_need_actions_approval)
                .unwrap_or(false),
        }
    }
}
