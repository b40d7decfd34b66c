//! Organization-level custom property declarations.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CustomProperty {
    pub property_name: String,
    pub value_type: CustomPropertyValueType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default_value: Option<serde_json::Value>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub allowed_values: Option<Vec<String>>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CustomPropertyValueType {
    String,
    SingleSelect,
    MultiSelect,
}

impl From<CustomPropertyValueType> for github_client::CustomPropertyValueType {
    fn from(value: CustomPropertyValueType) -> Self {
        match value {
            CustomPropertyValueType::String => github_client::CustomPropertyValueType::String,
            CustomPropertyValueType::SingleSelect => {
                github_client::CustomPropertyValueType::SingleSelect
            }
            CustomPropertyValueType::MultiSelect => {
                github_client::CustomPropertyValueType::MultiSelect
            }
        }
    }
}
