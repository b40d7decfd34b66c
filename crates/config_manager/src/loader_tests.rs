use super::*;

const SINGLE_ORG_DOC: &str = r#"
organization: acme
repository_defaults:
  has_wiki: false
teams:
  - name: core
    maintainers: [alice]
    members: [bob]
repositories:
  - name: app
    teams:
      core: write
"#;

const LIST_DOC: &str = r#"
- organization: acme
  repository_defaults:
    has_wiki: false
  teams:
    - name: core
      maintainers: [alice]
      members: [bob]
- organization: widgets
  repository_defaults:
    has_wiki: true
  teams:
    - name: infra
      maintainers: [carol]
      members: []
"#;

#[test]
fn parses_single_org_document() {
    let orgs = parse_and_normalize(SINGLE_ORG_DOC).expect("valid document");
    assert_eq!(orgs.len(), 1);
    assert_eq!(orgs[0].organization, "acme");
    assert_eq!(orgs[0].teams.len(), 1);
    assert!(orgs[0].teams[0].maintainers.contains("alice"));
}

#[test]
fn parses_list_of_orgs_document() {
    let orgs = parse_and_normalize(LIST_DOC).expect("valid document");
    assert_eq!(orgs.len(), 2);
    assert_eq!(orgs[0].organization, "acme");
    assert_eq!(orgs[1].organization, "widgets");
}

#[test]
fn rejects_malformed_yaml() {
    let err = parse_and_normalize("not: [valid: yaml: at: all").unwrap_err();
    assert!(matches!(err, Error::Yaml(_)));
}

#[test]
fn rejects_invalid_team_after_normalization() {
    let doc = r#"
organization: acme
repository_defaults:
  has_wiki: false
teams:
  - name: core
    maintainers: []
    members: [bob]
"#;
    let err = parse_and_normalize(doc).unwrap_err();
    assert!(matches!(err, Error::ConfigInvalid { .. }));
}

#[test]
fn missing_local_file_surfaces_io_error() {
    let err = read_local("/nonexistent/path/does-not-exist.yaml").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
