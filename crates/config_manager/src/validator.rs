//! Schema and cross-entity validation for a normalized [`OrganizationConfig`].

use std::collections::{BTreeSet, HashSet};

use crate::custom_property::CustomPropertyValueType;
use crate::errors::Error;
use crate::organization::OrganizationConfig;
use crate::repository::PropertyValue;
use crate::ruleset::RulesetRef;

pub fn validate(org: &OrganizationConfig) -> Result<(), Error> {
    validate_team_names_unique(org)?;
    validate_repo_names_unique(org)?;

    for team in &org.teams {
        validate_team(org, team)?;
    }

    for repo in &org.repositories {
        validate_repository(org, repo)?;
    }

    validate_custom_properties(org)?;

    Ok(())
}

fn validate_team_names_unique(org: &OrganizationConfig) -> Result<(), Error> {
    let mut seen = HashSet::new();
    for team in &org.teams {
        if team.name.is_empty() {
            return Err(Error::invalid(&org.organization, "team", "team name must not be empty"));
        }
        if !seen.insert(team.name.as_str()) {
            return Err(Error::invalid(
                &org.organization,
                "team",
                format!("duplicate team name '{}'", team.name),
            ));
        }
    }
    Ok(())
}

fn validate_repo_names_unique(org: &OrganizationConfig) -> Result<(), Error> {
    let mut seen = HashSet::new();
    for repo in &org.repositories {
        if repo.name.is_empty() {
            return Err(Error::invalid(&org.organization, "repository", "repository name must not be empty"));
        }
        if !seen.insert(repo.name.as_str()) {
            return Err(Error::invalid(
                &org.organization,
                "repository",
                format!("duplicate repository name '{}'", repo.name),
            ));
        }
    }
    Ok(())
}

fn validate_team(org: &OrganizationConfig, team: &crate::team::TeamConfig) -> Result<(), Error> {
    if team.maintainers.is_empty() {
        return Err(Error::invalid(
            &org.organization,
            "team",
            format!("team '{}' must have at least one maintainer", team.name),
        ));
    }

    let overlap: Vec<&String> = team.members.intersection(&team.maintainers).collect();
    if !overlap.is_empty() {
        return Err(Error::invalid(
            &org.organization,
            "team",
            format!(
                "team '{}' has users listed as both member and maintainer: {:?}",
                team.name, overlap
            ),
        ));
    }

    if team.gsuite.is_some() && team.display_name.is_none() {
        return Err(Error::invalid(
            &org.organization,
            "team",
            format!("team '{}' declares gsuite but has no displayName", team.name),
        ));
    }

    if let Some(parent_name) = &team.parent {
        if parent_name == &team.name {
            return Err(Error::invalid(
                &org.organization,
                "team",
                format!("team '{}' cannot be its own parent", team.name),
            ));
        }

        let parent = org.team(parent_name).ok_or_else(|| {
            Error::invalid(
                &org.organization,
                "team",
                format!("team '{}' declares parent '{}' which does not exist", team.name, parent_name),
            )
        })?;

        if parent.secret {
            return Err(Error::invalid(
                &org.organization,
                "team",
                format!("team '{}' has secret parent team '{}', which the platform forbids", team.name, parent_name),
            ));
        }

        if team.secret {
            return Err(Error::invalid(
                &org.organization,
                "team",
                format!("secret team '{}' cannot have a parent", team.name),
            ));
        }

        detect_parent_cycle(org, &team.name)?;
    }

    Ok(())
}

fn detect_parent_cycle(org: &OrganizationConfig, start: &str) -> Result<(), Error> {
    let mut visited = BTreeSet::new();
    let mut current = start.to_string();
    loop {
        if !visited.insert(current.clone()) {
            return Err(Error::invalid(
                &org.organization,
                "team",
                format!("cycle detected in parent chain starting at team '{start}'"),
            ));
        }
        let team = match org.team(&current) {
            Some(t) => t,
            None => return Ok(()),
        };
        match &team.parent {
            Some(parent) => current = parent.clone(),
            None => return Ok(()),
        }
    }
}

fn validate_repository(org: &OrganizationConfig, repo: &crate::repository::RepositoryConfig) -> Result<(), Error> {
    for team_name in repo.teams.keys() {
        if org.team(team_name).is_none() {
            return Err(Error::invalid(
                &org.organization,
                "repository",
                format!("repository '{}' grants access to undeclared team '{}'", repo.name, team_name),
            ));
        }
    }

    for ruleset_ref in &repo.rulesets {
        let ruleset = match ruleset_ref {
            RulesetRef::Inline(rs) => rs,
            RulesetRef::Named(name) => org.common_rulesets.get(name).ok_or_else(|| {
                Error::invalid(
                    &org.organization,
                    "ruleset",
                    format!("repository '{}' references undefined common ruleset '{}'", repo.name, name),
                )
            })?,
        };

        if let Some(bypass) = &ruleset.bypass {
            if bypass.teams.is_empty() && bypass.apps.is_empty() {
                return Err(Error::invalid(
                    &org.organization,
                    "ruleset",
                    format!("ruleset '{}' declares an empty bypass block", ruleset.name),
                ));
            }
            for team_name in &bypass.teams {
                if org.team(team_name).is_none() {
                    return Err(Error::invalid(
                        &org.organization,
                        "ruleset",
                        format!("ruleset '{}' bypass references undeclared team '{}'", ruleset.name, team_name),
                    ));
                }
            }
        }
    }

    Ok(())
}

fn validate_custom_properties(org: &OrganizationConfig) -> Result<(), Error> {
    for property in &org.custom_properties {
        let needs_allowed_values = matches!(
            property.value_type,
            CustomPropertyValueType::SingleSelect | CustomPropertyValueType::MultiSelect
        );

        match &property.allowed_values {
            Some(values) if needs_allowed_values => {
                if values.is_empty() {
                    return Err(Error::invalid(
                        &org.organization,
                        "custom_property",
                        format!("property '{}' has an empty allowed_values list", property.property_name),
                    ));
                }
            }
            Some(_) => {
                return Err(Error::invalid(
                    &org.organization,
                    "custom_property",
                    format!(
                        "property '{}' declares allowed_values but is not a select type",
                        property.property_name
                    ),
                ));
            }
            None if needs_allowed_values => {
                return Err(Error::invalid(
                    &org.organization,
                    "custom_property",
                    format!("property '{}' is a select type but declares no allowed_values", property.property_name),
                ));
            }
            None => {}
        }

        if let Some(default) = &property.default_value {
            validate_default_value_shape(org, property, default)?;
        }
    }

    for repo in &org.repositories {
        for (name, value) in &repo.properties {
            let property = org
                .custom_properties
                .iter()
                .find(|p| &p.property_name == name)
                .ok_or_else(|| {
                    Error::invalid(
                        &org.organization,
                        "custom_property",
                        format!("repository '{}' sets undeclared property '{}'", repo.name, name),
                    )
                })?;

            let is_list = matches!(value, PropertyValue::List(_));
            if is_list != matches!(property.value_type, CustomPropertyValueType::MultiSelect) {
                return Err(Error::invalid(
                    &org.organization,
                    "custom_property",
                    format!(
                        "repository '{}' property '{}' shape does not match declared value_type",
                        repo.name, name
                    ),
                ));
            }

            if let Some(allowed) = &property.allowed_values {
                let values: Vec<&String> = match value {
                    PropertyValue::Scalar(s) => vec![s],
                    PropertyValue::List(list) => list.iter().collect(),
                };
                for v in values {
                    if !allowed.contains(v) {
                        return Err(Error::invalid(
                            &org.organization,
                            "custom_property",
                            format!(
                                "repository '{}' property '{}' value '{}' is not in allowed_values",
                                repo.name, name, v
                            ),
                        ));
                    }
                }
            }
        }
    }

    Ok(())
}

fn validate_default_value_shape(
    org: &OrganizationConfig,
    property: &crate::custom_property::CustomProperty,
    default: &serde_json::Value,
) -> Result<(), Error> {
    let shape_ok = match property.value_type {
        CustomPropertyValueType::String | CustomPropertyValueType::SingleSelect => default.is_string(),
        CustomPropertyValueType::MultiSelect => default.is_array(),
    };
    if !shape_ok {
        return Err(Error::invalid(
            &org.organization,
            "custom_property",
            format!("property '{}' default_value does not match value_type", property.property_name),
        ));
    }

    if let Some(allowed) = &property.allowed_values {
        let elements: Vec<String> = match default {
            serde_json::Value::String(s) => vec![s.clone()],
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => vec![],
        };
        for element in elements {
            if !allowed.contains(&element) {
                return Err(Error::invalid(
                    &org.organization,
                    "custom_property",
                    format!(
                        "property '{}' default_value element '{}' is not in allowed_values",
                        property.property_name, element
                    ),
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
