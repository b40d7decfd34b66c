//! Plugin fan-out seam (spec §4.5). Concrete plugins (chat user-groups,
//! directory groups, hosting-service collaborators) are out of scope; this
//! defines the capability-set trait the reconciler dispatches over.

use std::collections::BTreeSet;

use async_trait::async_trait;
use config_manager::{RepositoryConfig, TeamConfig};

use crate::alert::MessageBuilder;

/// A platform-specific side-effect handler invoked after team and repo
/// reconcile. Both methods default to no-ops so a plugin only needs to
/// implement the hooks it cares about.
#[async_trait]
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    async fn handle_team(&self, _team: &TeamConfig, _org: &str) -> Option<MessageBuilder> {
        None
    }

    async fn handle_repo(&self, _repo: &RepositoryConfig, _teams: &[TeamConfig], _org: &str) -> Option<MessageBuilder> {
        None
    }
}

/// Runs every plugin's `handle_team` against one team, sequentially, in
/// declaration order — plugins are not safe for concurrent mutation of their
/// own per-org state (spec §5).
pub async fn fan_out_team(plugins: &[Box<dyn Plugin>], team: &TeamConfig, org: &str) -> Vec<MessageBuilder> {
    let mut messages = Vec::new();
    for plugin in plugins {
        if let Some(message) = plugin.handle_team(team, org).await {
            messages.push(message);
        }
    }
    messages
}

/// Runs every plugin's `handle_repo` against one repo, including archived
/// ones (spec §4.2 step 8).
pub async fn fan_out_repo(
    plugins: &[Box<dyn Plugin>],
    repo: &RepositoryConfig,
    teams: &[TeamConfig],
    org: &str,
) -> Vec<MessageBuilder> {
    let mut messages = Vec::new();
    for plugin in plugins {
        if let Some(message) = plugin.handle_repo(repo, teams, org).await {
            messages.push(message);
        }
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::Severity;

    struct NoopPlugin;

    #[async_trait]
    impl Plugin for NoopPlugin {
        fn name(&self) -> &str {
            "noop"
        }
    }

    struct RecordingPlugin;

    #[async_trait]
    impl Plugin for RecordingPlugin {
        fn name(&self) -> &str {
            "recording"
        }

        async fn handle_team(&self, team: &TeamConfig, _org: &str) -> Option<MessageBuilder> {
            Some(MessageBuilder::new(Severity::Normal).text(format!("saw team {}", team.name)))
        }
    }

    #[tokio::test]
    async fn default_methods_are_noops() {
        let plugins: Vec<Box<dyn Plugin>> = vec![Box::new(NoopPlugin)];
        let team = test_team();
        let messages = fan_out_team(&plugins, &team, "acme").await;
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn plugin_handling_team_yields_a_message() {
        let plugins: Vec<Box<dyn Plugin>> = vec![Box::new(RecordingPlugin)];
        let team = test_team();
        let messages = fan_out_team(&plugins, &team, "acme").await;
        assert_eq!(messages.len(), 1);
    }

    fn test_team() -> TeamConfig {
        TeamConfig {
            name: "eng".to_string(),
            members: BTreeSet::new(),
            maintainers: BTreeSet::new(),
            parent: None,
            secret: false,
            display_name: None,
            gsuite: None,
            slack: None,
        }
    }
}
