//! Single-worker FIFO queue guaranteeing at most one dry-run subprocess runs
//! at a time (spec §4.8 / §5).

use github_client::GitHubClient;
use tokio::sync::mpsc;
use tracing::error;

use crate::harness::{self, DryRunRequest};

struct QueuedJob {
    request: DryRunRequest,
    merge_sha: String,
    check_run_id: u64,
}

#[derive(Clone)]
pub struct DryRunQueue {
    sender: mpsc::UnboundedSender<QueuedJob>,
}

impl DryRunQueue {
    /// Spawns the single background worker that drains the queue in order.
    pub fn spawn(client: GitHubClient) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(worker_loop(client, receiver));
        Self { sender }
    }

    pub fn enqueue(&self, request: DryRunRequest, merge_sha: String, check_run_id: u64) {
        let _ = self.sender.send(QueuedJob { request, merge_sha, check_run_id });
    }
}

async fn worker_loop(client: GitHubClient, mut receiver: mpsc::UnboundedReceiver<QueuedJob>) {
    while let Some(job) = receiver.recv().await {
        let outcome = harness::execute(&client, &job.request, &job.merge_sha, job.check_run_id).await;
        if let Err(e) = outcome {
            error!(error = %e, "dry run failed at the harness level");
            let _ = harness::post_harness_failure_check(
                &client,
                &job.request.config_org,
                &job.request.config_repo,
                job.check_run_id,
            )
            .await;
        }
    }
}
