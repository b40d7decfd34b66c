//! The declared (source-YAML) shape of a ruleset, prior to normalization
//! into the upstream wire shape (see [`crate::ruleset_normalize`]).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Ruleset {
    pub name: String,
    pub target: RulesetTargetDecl,
    #[serde(default = "default_enforcement")]
    pub enforcement: RulesetEnforcementDecl,
    #[serde(default)]
    pub bypass: Option<BypassDecl>,
    pub ref_name: RefNameDecl,
    #[serde(default)]
    pub rules: BTreeSet<RuleToken>,
    #[serde(default)]
    pub require_pull_request: Option<RequirePullRequestDecl>,
    #[serde(default)]
    pub require_status_checks: Option<Vec<StatusCheckDecl>>,
}

fn default_enforcement() -> RulesetEnforcementDecl {
    RulesetEnforcementDecl::Active
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RulesetTargetDecl {
    Branch,
    Tag,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RulesetEnforcementDecl {
    Disabled,
    Active,
    Evaluate,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct BypassDecl {
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub apps: Vec<u64>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RefNameDecl {
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// The declared rule tokens; these are translated into upstream rule types
/// by [`crate::ruleset_normalize::normalize`].
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RuleToken {
    RestrictCreation,
    RestrictUpdate,
    RestrictDeletion,
    RequireLinearHistory,
    RequireSignedCommits,
    RestrictForcePush,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RequirePullRequestDecl {
    #[serde(default)]
    pub dismiss_stale_reviews_on_push: Option<bool>,
    #[serde(default)]
    pub require_code_owner_review: Option<bool>,
    #[serde(default)]
    pub require_last_push_approval: Option<bool>,
    #[serde(default)]
    pub required_approving_review_count: Option<u32>,
    #[serde(default)]
    pub required_review_thread_resolution: Option<bool>,
    #[serde(default)]
    pub allowed_merge_methods: Option<Vec<String>>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StatusCheckDecl {
    pub context: String,
    #[serde(default)]
    pub app_id: Option<i64>,
}

/// A repo's `rulesets` entry: either an inline [`Ruleset`] or a reference to
/// one declared in `common_rulesets` by name.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RulesetRef {
    Inline(Box<Ruleset>),
    Named(String),
}
