//! Drives one dry-run end to end: poll the PR for a merge sha, run the
//! reconciler against the candidate config in a subprocess, and publish the
//! captured output as a check run (spec §4.8).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use github_client::{
    CheckConclusion, CheckRunOutput, CheckStatus, CreateCheckRunPayload, CreateGistPayload,
    GistFileInput, GitHubClient, UpdateCheckRunPayload,
};
use tracing::{info, warn};

use crate::Error;

const CHECK_NAME: &str = "Sheriff Dry Run";
const POLL_ATTEMPTS: usize = 10;
const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// One queued dry-run: a config pull request whose head has settled enough
/// to have a merge commit.
#[derive(Clone, Debug)]
pub struct DryRunRequest {
    pub config_org: String,
    pub config_repo: String,
    pub config_path: String,
    pub pr_number: u64,
    pub head_sha: String,
    pub reconciler_binary: PathBuf,
}

/// Polls the PR up to [`POLL_ATTEMPTS`] times, [`POLL_INTERVAL`] apart, until
/// `mergeable_state` is known; returns the merge commit sha if one exists.
pub async fn poll_for_merge_sha(
    client: &GitHubClient,
    owner: &str,
    repo: &str,
    pr_number: u64,
) -> Result<Option<String>, Error> {
    for attempt in 0..POLL_ATTEMPTS {
        let pr = client.get_pull_request(owner, repo, pr_number).await?;
        if pr.mergeable_state.is_some() {
            return Ok(pr.merge_commit_sha);
        }
        if attempt + 1 < POLL_ATTEMPTS {
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
    warn!(owner, repo, pr_number, "mergeable_state never settled");
    Ok(None)
}

pub async fn post_no_merge_sha_check(
    client: &GitHubClient,
    owner: &str,
    repo: &str,
    head_sha: &str,
) -> Result<(), Error> {
    let payload = CreateCheckRunPayload {
        name: CHECK_NAME.to_string(),
        head_sha: head_sha.to_string(),
        status: CheckStatus::Completed,
        conclusion: Some(CheckConclusion::Failure),
        output: Some(CheckRunOutput {
            title: CHECK_NAME.to_string(),
            summary: "No merge sha available".to_string(),
            text: None,
        }),
    };
    client.create_check_run(owner, repo, &payload).await?;
    Ok(())
}

pub async fn post_in_progress_check(
    client: &GitHubClient,
    owner: &str,
    repo: &str,
    head_sha: &str,
) -> Result<u64, Error> {
    let payload = CreateCheckRunPayload {
        name: CHECK_NAME.to_string(),
        head_sha: head_sha.to_string(),
        status: CheckStatus::InProgress,
        conclusion: None,
        output: None,
    };
    let check_run = client.create_check_run(owner, repo, &payload).await?;
    Ok(check_run.id)
}

/// Fetches the config file at the merge commit, writes it to a temp path
/// keyed by `(merge_sha, head_sha)`, spawns the reconciler against it in
/// dry-run mode, captures its combined output, and posts the completed
/// check with the output rendered as an embedded SVG gist image.
pub async fn execute(
    client: &GitHubClient,
    request: &DryRunRequest,
    merge_sha: &str,
    check_run_id: u64,
) -> Result<(), Error> {
    let config_contents = client
        .get_file_content(&request.config_org, &request.config_repo, &request.config_path, Some(merge_sha))
        .await?;

    let config_path =
        std::env::temp_dir().join(format!("sheriff-{merge_sha}-{}.yaml", request.head_sha));
    tokio::fs::write(&config_path, config_contents).await?;

    let (exit_success, combined_output) = run_subprocess(&request.reconciler_binary, &config_path).await?;

    let svg = crate::svg::render(&combined_output);
    let gist_url = upload_svg_gist(client, merge_sha, &svg).await?;

    let conclusion = if exit_success { CheckConclusion::Success } else { CheckConclusion::Failure };
    let payload = UpdateCheckRunPayload {
        status: CheckStatus::Completed,
        conclusion: Some(conclusion),
        output: Some(CheckRunOutput {
            title: CHECK_NAME.to_string(),
            summary: format!("Dry run against merge commit `{merge_sha}`"),
            text: Some(format!("<img src=\"{gist_url}\" width=\"800\" />")),
        }),
    };
    client.update_check_run(&request.config_org, &request.config_repo, check_run_id, &payload).await?;
    Ok(())
}

async fn run_subprocess(binary: &Path, config_path: &Path) -> Result<(bool, String), Error> {
    let output = tokio::process::Command::new(binary)
        .arg("reconcile")
        .env("PERMISSIONS_FILE_LOCAL_PATH", config_path)
        .env("CLICOLOR_FORCE", "1")
        .output()
        .await
        .map_err(|e| Error::Spawn(e.to_string()))?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    info!(success = output.status.success(), "dry run subprocess finished");
    Ok((output.status.success(), combined))
}

async fn upload_svg_gist(client: &GitHubClient, merge_sha: &str, svg: &str) -> Result<String, Error> {
    let mut files = HashMap::new();
    files.insert(
        format!("dry-run-{merge_sha}.svg"),
        GistFileInput { content: svg.to_string() },
    );
    let payload = CreateGistPayload {
        description: format!("Sheriff dry-run output for {merge_sha}"),
        public: false,
        files,
    };
    let gist = client.create_gist(&payload).await?;
    let file = gist
        .files
        .values()
        .next()
        .ok_or_else(|| Error::Spawn("gist created with no files".to_string()))?;
    Ok(file.raw_url.clone())
}

/// Posts a harness-level failure check when anything above could not even
/// run to completion.
pub async fn post_harness_failure_check(
    client: &GitHubClient,
    owner: &str,
    repo: &str,
    check_run_id: u64,
) -> Result<(), Error> {
    let payload = UpdateCheckRunPayload {
        status: CheckStatus::Completed,
        conclusion: Some(CheckConclusion::ActionRequired),
        output: Some(CheckRunOutput {
            title: CHECK_NAME.to_string(),
            summary: "Something went wrong".to_string(),
            text: None,
        }),
    };
    client.update_check_run(owner, repo, check_run_id, &payload).await?;
    Ok(())
}
