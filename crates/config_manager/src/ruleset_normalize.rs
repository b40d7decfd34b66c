//! Normalizes a declared [`Ruleset`] into the upstream wire shape
//! (`github_client::RepositoryRuleset`) and computes a structural diff
//! against an observed ruleset.

use std::collections::BTreeMap;

use github_client::{
    BypassActor, BypassActorType, BypassMode, MergeMethod, PullRequestParameters,
    RefNameCondition, RepositoryRuleset, RequiredStatusChecksParameters, Rule, RulesetConditions,
    RulesetEnforcement, RulesetTarget, StatusCheck,
};

use crate::ruleset::{Ruleset, RulesetEnforcementDecl, RulesetTargetDecl, RuleToken};

/// Converts a declared ruleset into GitHub's wire shape. `team_ids` resolves
/// bypass team names (within the same org) to their numeric team id.
pub fn normalize(ruleset: &Ruleset, team_ids: &BTreeMap<String, u64>) -> RepositoryRuleset {
    let mut rules: Vec<Rule> = ruleset.rules.iter().map(|token| map_rule_token(*token)).collect();

    if let Some(pr) = &ruleset.require_pull_request {
        rules.push(Rule::PullRequest {
            parameters: PullRequestParameters {
                dismiss_stale_reviews_on_push: Some(pr.dismiss_stale_reviews_on_push.unwrap_or(false)),
                require_code_owner_review: Some(pr.require_code_owner_review.unwrap_or(false)),
                require_last_push_approval: Some(pr.require_last_push_approval.unwrap_or(false)),
                required_approving_review_count: Some(pr.required_approving_review_count.unwrap_or(0)),
                required_review_thread_resolution: Some(
                    pr.required_review_thread_resolution.unwrap_or(false),
                ),
                allowed_merge_methods: Some(match &pr.allowed_merge_methods {
                    Some(methods) => methods.iter().filter_map(|m| map_merge_method(m)).collect(),
                    None => vec![MergeMethod::Squash],
                }),
            },
        });
    }

    if let Some(checks) = &ruleset.require_status_checks {
        rules.push(Rule::RequiredStatusChecks {
            parameters: RequiredStatusChecksParameters {
                required_status_checks: checks
                    .iter()
                    .map(|c| StatusCheck {
                        context: c.context.clone(),
                        integration_id: c.app_id.map(|id| id as u64),
                    })
                    .collect(),
                strict_required_status_checks_policy: Some(false),
            },
        });
    }

    rules.sort_by_key(rule_sort_key);

    let mut bypass_actors: Vec<BypassActor> = Vec::new();
    if let Some(bypass) = &ruleset.bypass {
        for app_id in &bypass.apps {
            bypass_actors.push(BypassActor {
                actor_id: *app_id,
                actor_type: BypassActorType::Integration,
                bypass_mode: BypassMode::Always,
            });
        }
        for team_name in &bypass.teams {
            if let Some(id) = team_ids.get(team_name) {
                bypass_actors.push(BypassActor {
                    actor_id: *id,
                    actor_type: BypassActorType::Team,
                    bypass_mode: BypassMode::Always,
                });
            }
        }
    }
    bypass_actors.sort_by_key(|a| (actor_type_rank(&a.actor_type), a.actor_id));

    RepositoryRuleset {
        id: None,
        name: ruleset.name.clone(),
        target: match ruleset.target {
            RulesetTargetDecl::Branch => RulesetTarget::Branch,
            RulesetTargetDecl::Tag => RulesetTarget::Tag,
        },
        enforcement: match ruleset.enforcement {
            RulesetEnforcementDecl::Disabled => RulesetEnforcement::Disabled,
            RulesetEnforcementDecl::Active => RulesetEnforcement::Active,
            RulesetEnforcementDecl::Evaluate => RulesetEnforcement::Evaluate,
        },
        bypass_actors,
        conditions: Some(RulesetConditions {
            ref_name: RefNameCondition {
                include: ruleset.ref_name.include.clone(),
                exclude: ruleset.ref_name.exclude.clone(),
            },
        }),
        rules,
        node_id: None,
        source: None,
        source_type: None,
        created_at: None,
        updated_at: None,
        _links: None,
    }
}

fn map_rule_token(token: RuleToken) -> Rule {
    match token {
        RuleToken::RestrictCreation => Rule::Creation,
        RuleToken::RestrictUpdate => Rule::Update,
        RuleToken::RestrictDeletion => Rule::Deletion,
        RuleToken::RequireLinearHistory => Rule::RequiredLinearHistory,
        RuleToken::RequireSignedCommits => Rule::RequiredSignatures,
        RuleToken::RestrictForcePush => Rule::NonFastForward,
    }
}

fn map_merge_method(s: &str) -> Option<MergeMethod> {
    match s {
        "merge" => Some(MergeMethod::Merge),
        "squash" => Some(MergeMethod::Squash),
        "rebase" => Some(MergeMethod::Rebase),
        _ => None,
    }
}

fn rule_sort_key(rule: &Rule) -> &'static str {
    match rule {
        Rule::Creation => "creation",
        Rule::Update => "update",
        Rule::Deletion => "deletion",
        Rule::RequiredLinearHistory => "required_linear_history",
        Rule::RequiredSignatures => "required_signatures",
        Rule::PullRequest { .. } => "pull_request",
        Rule::RequiredStatusChecks { .. } => "required_status_checks",
        Rule::NonFastForward => "non_fast_forward",
    }
}

fn actor_type_rank(actor_type: &BypassActorType) -> u8 {
    match actor_type {
        BypassActorType::OrganizationAdmin => 0,
        BypassActorType::RepositoryRole => 1,
        BypassActorType::Team => 2,
        BypassActorType::Integration => 3,
        BypassActorType::DeployKey => 4,
    }
}

/// Projects an observed ruleset (as returned by the platform) into the same
/// canonical ordering used by [`normalize`], so the two sides compare
/// structurally equal when they declare the same policy.
pub fn canonicalize_observed(mut observed: RepositoryRuleset) -> RepositoryRuleset {
    observed.rules.sort_by_key(rule_sort_key);
    observed
        .bypass_actors
        .sort_by_key(|a| (actor_type_rank(&a.actor_type), a.actor_id));
    observed
}

/// A single field-level difference between a declared and observed ruleset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesetFieldDiff {
    pub field: String,
    pub declared: String,
    pub observed: String,
}

/// Computes the field-level diff between a normalized declared ruleset and a
/// canonicalized observed ruleset. An empty result means they match.
pub fn diff(declared: &RepositoryRuleset, observed: &RepositoryRuleset) -> Vec<RulesetFieldDiff> {
    let mut diffs = Vec::new();

    if declared.target != observed.target {
        diffs.push(RulesetFieldDiff {
            field: "target".to_string(),
            declared: format!("{:?}", declared.target),
            observed: format!("{:?}", observed.target),
        });
    }

    if declared.enforcement != observed.enforcement {
        diffs.push(RulesetFieldDiff {
            field: "enforcement".to_string(),
            declared: format!("{:?}", declared.enforcement),
            observed: format!("{:?}", observed.enforcement),
        });
    }

    if declared.conditions != observed.conditions {
        diffs.push(RulesetFieldDiff {
            field: "conditions.ref_name".to_string(),
            declared: format!("{:?}", declared.conditions),
            observed: format!("{:?}", observed.conditions),
        });
    }

    if declared.rules != observed.rules {
        diffs.push(RulesetFieldDiff {
            field: "rules".to_string(),
            declared: format!("{:?}", declared.rules),
            observed: format!("{:?}", observed.rules),
        });
    }

    if declared.bypass_actors != observed.bypass_actors {
        diffs.push(RulesetFieldDiff {
            field: "bypass_actors".to_string(),
            declared: format!("{:?}", declared.bypass_actors),
            observed: format!("{:?}", observed.bypass_actors),
        });
    }

    diffs
}

/// Renders a diff as human-readable text, with ANSI coloring when `colorize`
/// is true (used for terminal output) or plain text otherwise (used in alert
/// messages).
pub fn render_diff(diffs: &[RulesetFieldDiff], colorize: bool) -> String {
    let mut out = String::new();
    for d in diffs {
        if colorize {
            out.push_str(&format!(
                "\x1b[1m{}\x1b[0m:\n  \x1b[31m- {}\x1b[0m\n  \x1b[32m+ {}\x1b[0m\n",
                d.field, d.observed, d.declared
            ));
        } else {
            out.push_str(&format!("{}:\n  - {}\n  + {}\n", d.field, d.observed, d.declared));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruleset::{RefNameDecl, Ruleset};
    use std::collections::BTreeSet;

    fn sample_ruleset() -> Ruleset {
        Ruleset {
            name: "main-prot".to_string(),
            target: RulesetTargetDecl::Branch,
            enforcement: RulesetEnforcementDecl::Active,
            bypass: None,
            ref_name: RefNameDecl { include: vec!["refs/heads/main".to_string()], exclude: vec![] },
            rules: BTreeSet::from([RuleToken::RequireSignedCommits, RuleToken::RestrictForcePush]),
            require_pull_request: None,
            require_status_checks: None,
        }
    }

    #[test]
    fn normalize_sorts_rules_by_type() {
        let normalized = normalize(&sample_ruleset(), &BTreeMap::new());
        let kinds: Vec<&str> = normalized.rules.iter().map(rule_sort_key).collect();
        let mut sorted = kinds.clone();
        sorted.sort();
        assert_eq!(kinds, sorted);
    }

    #[test]
    fn matching_rulesets_produce_empty_diff() {
        let declared = normalize(&sample_ruleset(), &BTreeMap::new());
        let observed = canonicalize_observed(declared.clone());
        assert!(diff(&declared, &observed).is_empty());
    }

    #[test]
    fn extra_observed_rule_is_detected() {
        let declared = normalize(&sample_ruleset(), &BTreeMap::new());
        let mut observed = declared.clone();
        observed.rules.push(Rule::Creation);
        let observed = canonicalize_observed(observed);
        let diffs = diff(&declared, &observed);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].field, "rules");
    }
}
