//! Formation and reference expansion: the two legacy team-definition shapes
//! are resolved into concrete [`TeamConfig`] values before validation runs.
//!
//! Formations are resolved first (same-org only), then references (which
//! may cross organizations) are resolved against the fully formation-expanded
//! set of every org loaded in the same run. A reference whose org or team is
//! not found resolves to an empty, maintainer-less placeholder team, which
//! the validator then rejects with a precise `ConfigInvalid`.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::team::{GsuiteConfig, SlackConfig, TeamConfig};

/// A team declaration as it appears in the source document, before any
/// expansion: either concrete, a formation (union of other teams), or a
/// reference (mirror of another org's team).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTeamDecl {
    Formation(FormationDecl),
    Reference(ReferenceDecl),
    Concrete(TeamConfig),
}

#[derive(Debug, Deserialize)]
struct FormationDecl {
    name: String,
    formation: Vec<String>,
    #[serde(rename = "displayName", default)]
    display_name: Option<String>,
    #[serde(default)]
    gsuite: Option<GsuiteConfig>,
    #[serde(default)]
    slack: Option<SlackConfig>,
}

#[derive(Debug, Deserialize)]
struct ReferenceDecl {
    name: String,
    reference: String,
    #[serde(rename = "displayName", default)]
    display_name: Option<String>,
    #[serde(default)]
    gsuite: Option<GsuiteConfig>,
    #[serde(default)]
    slack: Option<SlackConfig>,
}

/// The result of expanding one org's team declarations through the
/// formation pass. References are carried through unresolved until the
/// global reference pass runs.
#[derive(Debug)]
pub enum ExpandedTeam {
    Concrete(TeamConfig),
    PendingReference {
        name: String,
        reference: String,
        display_name: Option<String>,
        gsuite: Option<GsuiteConfig>,
        slack: Option<SlackConfig>,
    },
}

impl ExpandedTeam {
    pub fn name(&self) -> &str {
        match self {
            ExpandedTeam::Concrete(t) => &t.name,
            ExpandedTeam::PendingReference { name, .. } => name,
        }
    }
}

/// Parses one org's raw `teams` YAML value and expands any `formation`
/// entries against the concrete teams declared in the same list.
pub fn expand_formations(raw_teams: &serde_yaml::Value) -> Result<Vec<ExpandedTeam>, serde_yaml::Error> {
    let decls: Vec<RawTeamDecl> = serde_yaml::from_value(raw_teams.clone())?;

    let mut concrete: BTreeMap<String, TeamConfig> = BTreeMap::new();
    for decl in &decls {
        if let RawTeamDecl::Concrete(team) = decl {
            concrete.insert(team.name.clone(), team.clone());
        }
    }

    let mut out = Vec::with_capacity(decls.len());
    for decl in decls {
        match decl {
            RawTeamDecl::Concrete(team) => out.push(ExpandedTeam::Concrete(team)),
            RawTeamDecl::Reference(r) => out.push(ExpandedTeam::PendingReference {
                name: r.name,
                reference: r.reference,
                display_name: r.display_name,
                gsuite: r.gsuite,
                slack: r.slack,
            }),
            RawTeamDecl::Formation(f) => {
                let mut maintainers = std::collections::BTreeSet::new();
                let mut members = std::collections::BTreeSet::new();
                for source_name in &f.formation {
                    if let Some(source) = concrete.get(source_name) {
                        maintainers.extend(source.maintainers.iter().cloned());
                        members.extend(source.members.iter().cloned());
                    }
                }
                members = members.difference(&maintainers).cloned().collect();

                let team = TeamConfig {
                    name: f.name,
                    members,
                    maintainers,
                    parent: None,
                    secret: false,
                    display_name: f.display_name,
                    gsuite: f.gsuite,
                    slack: f.slack,
                };
                out.push(ExpandedTeam::Concrete(team));
            }
        }
    }

    Ok(out)
}

/// Resolves every `PendingReference` across all orgs loaded in this run
/// against the fully formation-expanded set. Unresolvable references become
/// `UnresolvedReference` for the validator to flag.
pub fn expand_references(mut orgs: BTreeMap<String, Vec<ExpandedTeam>>) -> BTreeMap<String, Vec<TeamConfig>> {
    let snapshot: BTreeMap<String, BTreeMap<String, TeamConfig>> = orgs
        .iter()
        .map(|(org, teams)| {
            let concrete: BTreeMap<String, TeamConfig> = teams
                .iter()
                .filter_map(|t| match t {
                    ExpandedTeam::Concrete(team) => Some((team.name.clone(), team.clone())),
                    _ => None,
                })
                .collect();
            (org.clone(), concrete)
        })
        .collect();

    let mut result = BTreeMap::new();
    for (org_name, teams) in orgs.drain() {
        let mut resolved = Vec::with_capacity(teams.len());
        for team in teams {
            match team {
                ExpandedTeam::Concrete(t) => resolved.push(t),
                ExpandedTeam::PendingReference {
                    name,
                    reference,
                    display_name,
                    gsuite,
                    slack,
                } => {
                    if let Some(source) = resolve_reference(&snapshot, &reference) {
                        resolved.push(TeamConfig {
                            name,
                            members: source.members.clone(),
                            maintainers: source.maintainers.clone(),
                            parent: None,
                            secret: false,
                            display_name: display_name.or_else(|| source.display_name.clone()),
                            gsuite: gsuite.or_else(|| source.gsuite.clone()),
                            slack: slack.or_else(|| source.slack.clone()),
                        });
                    } else {
                        // Left unresolved: the validator reports `ConfigInvalid`
                        // naming the offending reference. A placeholder empty
                        // team with no maintainers is synthesized here and
                        // caught downstream by the maintainers-nonempty rule.
                        resolved.push(TeamConfig {
                            name,
                            members: Default::default(),
                            maintainers: Default::default(),
                            parent: None,
                            secret: false,
                            display_name: None,
                            gsuite: None,
                            slack: None,
                        });
                    }
                }
            }
        }
        result.insert(org_name, resolved);
    }
    result
}

fn resolve_reference<'a>(
    snapshot: &'a BTreeMap<String, BTreeMap<String, TeamConfig>>,
    reference: &str,
) -> Option<&'a TeamConfig> {
    let (org, team) = reference.split_once('/')?;
    snapshot.get(org)?.get(team)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formation_unions_maintainers_and_excludes_them_from_members() {
        let raw = serde_yaml::from_str::<serde_yaml::Value>(
            r#"
            - name: core-a
              maintainers: [alice]
              members: [bob]
            - name: core-b
              maintainers: [carol]
              members: [alice]
            - name: combined
              formation: [core-a, core-b]
            "#,
        )
        .unwrap();

        let expanded = expand_formations(&raw).unwrap();
        let combined = expanded
            .iter()
            .find(|t| t.name() == "combined")
            .expect("combined team present");

        match combined {
            ExpandedTeam::Concrete(team) => {
                assert!(team.maintainers.contains("alice"));
                assert!(team.maintainers.contains("carol"));
                assert!(team.members.contains("bob"));
                // alice is a maintainer via core-a, so she must not also appear as a member
                assert!(!team.members.contains("alice"));
            }
            other => panic!("expected concrete team, got {other:?}"),
        }
    }

    #[test]
    fn reference_mirrors_source_team_fields() {
        let mut orgs = BTreeMap::new();
        orgs.insert(
            "upstream-org".to_string(),
            vec![ExpandedTeam::Concrete(TeamConfig {
                name: "platform".to_string(),
                members: ["bob".to_string()].into_iter().collect(),
                maintainers: ["alice".to_string()].into_iter().collect(),
                parent: None,
                secret: false,
                display_name: Some("Platform".to_string()),
                gsuite: None,
                slack: None,
            })],
        );
        orgs.insert(
            "downstream-org".to_string(),
            vec![ExpandedTeam::PendingReference {
                name: "mirrored".to_string(),
                reference: "upstream-org/platform".to_string(),
                display_name: None,
                gsuite: None,
                slack: None,
            }],
        );

        let resolved = expand_references(orgs);
        let mirrored = &resolved["downstream-org"][0];
        assert_eq!(mirrored.name, "mirrored");
        assert!(mirrored.maintainers.contains("alice"));
        assert!(mirrored.members.contains("bob"));
    }
}

