//! GitHub Checks API types, used by the dry-run harness to publish the
//! "Sheriff Dry Run" check on the head commit of a config pull request.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Queued,
    InProgress,
    Completed,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    Success,
    Failure,
    ActionRequired,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct CheckRunOutput {
    pub title: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Payload for `POST /repos/{owner}/{repo}/check-runs`.
#[derive(Debug, Serialize)]
pub struct CreateCheckRunPayload {
    pub name: String,
    pub head_sha: String,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<CheckConclusion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<CheckRunOutput>,
}

/// Payload for `PATCH /repos/{owner}/{repo}/check-runs/{check_run_id}`.
#[derive(Debug, Serialize)]
pub struct UpdateCheckRunPayload {
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<CheckConclusion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<CheckRunOutput>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CheckRun {
    pub id: u64,
    pub head_sha: String,
    pub status: CheckStatus,
}
