//! Organization-level custom property *definitions*.
//!
//! Distinct from [`crate::CustomPropertiesPayload`], which carries the
//! per-repository *values* assigned to these definitions.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CustomPropertyDefinition {
    pub property_name: String,
    pub value_type: CustomPropertyValueType,
    #[serde(default)]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CustomPropertyValueType {
    String,
    SingleSelect,
    MultiSelect,
}
