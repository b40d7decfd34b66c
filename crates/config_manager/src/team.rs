//! Team declarations, post formation/reference normalization.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TeamConfig {
    pub name: String,
    #[serde(default)]
    pub members: BTreeSet<String>,
    pub maintainers: BTreeSet<String>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub secret: bool,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub gsuite: Option<GsuiteConfig>,
    #[serde(default)]
    pub slack: Option<SlackConfig>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GsuiteConfig {
    pub privacy: GsuitePrivacy,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GsuitePrivacy {
    Internal,
    External,
}

/// `slack: true` or `slack: "<channel>"` in the source YAML.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SlackConfig {
    Default(bool),
    Channel(String),
}

impl<'de> Deserialize<'de> for SlackConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_yaml::Value::deserialize(deserializer)?;
        match value {
            serde_yaml::Value::Bool(b) => Ok(SlackConfig::Default(b)),
            serde_yaml::Value::String(s) => Ok(SlackConfig::Channel(s)),
            other => Err(serde::de::Error::custom(format!(
                "expected bool or string for `slack`, found {other:?}"
            ))),
        }
    }
}
