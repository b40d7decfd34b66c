//! Logs alert blocks through `tracing` rather than a chat transport. The
//! receiver has no outbound notification integration of its own; operators
//! are expected to ship logs to wherever the rest of the fleet's logs go.

use async_trait::async_trait;
use reconciler::alert::{AlertTransport, Block, Severity};

pub struct TracingAlertTransport;

fn render(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|block| match block {
            Block::Text(text) => text.clone(),
            Block::Context(text) => format!("({text})"),
            Block::User(login) => format!("user={login}"),
            Block::Repository(full_name) => format!("repo={full_name}"),
            Block::Divider => "--".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

#[async_trait]
impl AlertTransport for TracingAlertTransport {
    async fn send(&self, severity: Severity, blocks: &[Block], metadata: Option<serde_json::Value>) {
        let message = render(blocks);
        match severity {
            Severity::Critical => tracing::error!(metadata = ?metadata, "{message}"),
            Severity::Warning => tracing::warn!(metadata = ?metadata, "{message}"),
            Severity::Normal => tracing::info!(metadata = ?metadata, "{message}"),
        }
    }
}
