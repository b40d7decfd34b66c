use super::*;
use crate::custom_property::CustomProperty;
use crate::organization::OrganizationConfig;
use crate::repository::{PropertyValue, RepositoryConfig, RepositoryDefaults};
use crate::team::TeamConfig;
use std::collections::BTreeMap;

fn base_org() -> OrganizationConfig {
    OrganizationConfig {
        organization: "acme".to_string(),
        repository_defaults: RepositoryDefaults { has_wiki: false, forks_need_actions_approval: None },
        teams: vec![],
        repositories: vec![],
        common_rulesets: BTreeMap::new(),
        custom_properties: vec![],
    }
}

fn team(name: &str, maintainers: &[&str], members: &[&str]) -> TeamConfig {
    TeamConfig {
        name: name.to_string(),
        members: members.iter().map(|s| s.to_string()).collect(),
        maintainers: maintainers.iter().map(|s| s.to_string()).collect(),
        parent: None,
        secret: false,
        display_name: None,
        gsuite: None,
        slack: None,
    }
}

#[test]
fn rejects_team_with_no_maintainers() {
    let mut org = base_org();
    org.teams.push(team("core", &[], &["bob"]));
    let err = validate(&org).unwrap_err();
    assert!(matches!(err, Error::ConfigInvalid { .. }));
}

#[test]
fn rejects_member_maintainer_overlap() {
    let mut org = base_org();
    org.teams.push(team("core", &["alice"], &["alice"]));
    assert!(validate(&org).is_err());
}

#[test]
fn rejects_self_parent_cycle() {
    let mut org = base_org();
    let mut core = team("core", &["alice"], &[]);
    core.parent = Some("core".to_string());
    org.teams.push(core);
    assert!(validate(&org).is_err());
}

#[test]
fn rejects_secret_team_with_parent() {
    let mut org = base_org();
    org.teams.push(team("parent-team", &["alice"], &[]));
    let mut child = team("child", &["bob"], &[]);
    child.secret = true;
    child.parent = Some("parent-team".to_string());
    org.teams.push(child);
    assert!(validate(&org).is_err());
}

#[test]
fn rejects_repo_referencing_undeclared_team() {
    let mut org = base_org();
    let mut repo = RepositoryConfig {
        name: "app".to_string(),
        teams: BTreeMap::new(),
        external_collaborators: BTreeMap::new(),
        settings: Default::default(),
        visibility: Default::default(),
        properties: BTreeMap::new(),
        rulesets: vec![],
    };
    repo.teams.insert("ghost".to_string(), crate::access_level::AccessLevel::Write);
    org.repositories.push(repo);
    assert!(validate(&org).is_err());
}

#[test]
fn accepts_valid_minimal_org() {
    let mut org = base_org();
    org.teams.push(team("core", &["alice"], &["bob"]));
    let mut repo = RepositoryConfig {
        name: "app".to_string(),
        teams: BTreeMap::new(),
        external_collaborators: BTreeMap::new(),
        settings: Default::default(),
        visibility: Default::default(),
        properties: BTreeMap::new(),
        rulesets: vec![],
    };
    repo.teams.insert("core".to_string(), crate::access_level::AccessLevel::Write);
    org.repositories.push(repo);
    assert!(validate(&org).is_ok());
}

#[test]
fn rejects_property_value_not_in_allowed_values() {
    let mut org = base_org();
    org.custom_properties.push(CustomProperty {
        property_name: "team".to_string(),
        value_type: CustomPropertyValueType::SingleSelect,
        required: false,
        default_value: None,
        description: None,
        allowed_values: Some(vec!["platform".to_string()]),
    });
    let mut repo = RepositoryConfig {
        name: "app".to_string(),
        teams: BTreeMap::new(),
        external_collaborators: BTreeMap::new(),
        settings: Default::default(),
        visibility: Default::default(),
        properties: BTreeMap::new(),
        rulesets: vec![],
    };
    repo.properties.insert("team".to_string(), PropertyValue::Scalar("unknown".to_string()));
    org.repositories.push(repo);
    assert!(validate(&org).is_err());
}
