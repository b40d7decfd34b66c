//! Append-only alert block assembler and chunked transport.

use async_trait::async_trait;

const MAX_BLOCKS_PER_SEND: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

/// The outcome of a webhook enforcement decision, annotated onto an alert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnforcementOutcome {
    Allow,
    Revert,
    Adjust,
}

impl EnforcementOutcome {
    pub fn as_text(self, expected_level: Option<&str>) -> Option<String> {
        match self {
            EnforcementOutcome::Allow => None,
            EnforcementOutcome::Revert => Some("automatically reverted".to_string()),
            EnforcementOutcome::Adjust => Some(format!(
                "adjusted to the correct state of `{}`",
                expected_level.unwrap_or("unknown")
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    Text(String),
    Context(String),
    User(String),
    Repository(String),
    Divider,
}

/// A transport able to deliver alert blocks, chunked to the platform's
/// message-size limit. Implementations own their own retry/auth concerns.
#[async_trait]
pub trait AlertTransport: Send + Sync {
    async fn send(&self, severity: Severity, blocks: &[Block], metadata: Option<serde_json::Value>);
}

/// Accumulates blocks for a single alert message, then flushes them to a
/// transport in chunks of at most [`MAX_BLOCKS_PER_SEND`].
pub struct MessageBuilder {
    severity: Severity,
    blocks: Vec<Block>,
    metadata: Option<serde_json::Value>,
}

impl MessageBuilder {
    pub fn new(severity: Severity) -> Self {
        Self { severity, blocks: Vec::new(), metadata: None }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(Block::Text(text.into()));
        self
    }

    pub fn context(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(Block::Context(text.into()));
        self
    }

    pub fn user(mut self, login: impl Into<String>) -> Self {
        self.blocks.push(Block::User(login.into()));
        self
    }

    pub fn repository(mut self, full_name: impl Into<String>) -> Self {
        self.blocks.push(Block::Repository(full_name.into()));
        self
    }

    pub fn divider(mut self) -> Self {
        self.blocks.push(Block::Divider);
        self
    }

    pub fn enforcement_outcome(self, outcome: EnforcementOutcome, expected_level: Option<&str>) -> Self {
        match outcome.as_text(expected_level) {
            Some(text) => self.text(text),
            None => self,
        }
    }

    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub async fn flush(self, transport: &dyn AlertTransport) {
        for chunk in self.blocks.chunks(MAX_BLOCKS_PER_SEND) {
            transport.send(self.severity, chunk, self.metadata.clone()).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        sends: Mutex<Vec<(Severity, usize)>>,
    }

    #[async_trait]
    impl AlertTransport for RecordingTransport {
        async fn send(&self, severity: Severity, blocks: &[Block], _metadata: Option<serde_json::Value>) {
            self.sends.lock().unwrap().push((severity, blocks.len()));
        }
    }

    #[tokio::test]
    async fn flushes_in_chunks_of_fifty() {
        let transport = RecordingTransport::default();
        let mut builder = MessageBuilder::new(Severity::Critical);
        for i in 0..120 {
            builder = builder.text(format!("line {i}"));
        }
        builder.flush(&transport).await;

        let sends = transport.sends.lock().unwrap();
        assert_eq!(sends.len(), 3);
        assert_eq!(sends[0], (Severity::Critical, 50));
        assert_eq!(sends[2], (Severity::Critical, 20));
    }

    #[test]
    fn adjust_outcome_names_expected_level() {
        let outcome = EnforcementOutcome::Adjust;
        assert_eq!(
            outcome.as_text(Some("read")),
            Some("adjusted to the correct state of `read`".to_string())
        );
    }

    #[test]
    fn allow_outcome_has_no_text() {
        assert_eq!(EnforcementOutcome::Allow.as_text(None), None);
    }
}
