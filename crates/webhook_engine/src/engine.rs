//! Single entry point for a received webhook delivery: deserializes the
//! payload for its declared kind, classifies it, and either produces an
//! alert, runs collaborator enforcement, or signals a dry-run request.

use config_manager::OrganizationConfig;
use github_client::{
    DeleteEventPayload, DeployKeyEventPayload, MemberEventPayload, MetaEventPayload,
    OrganizationEventPayload, PersonalAccessTokenRequestEventPayload, PublicEventPayload,
    PullRequestEventPayload, ReleaseEventPayload, RepositoryEventPayload, WebhookEventKind,
};
use reconciler::alert::{MessageBuilder, Severity};
use reconciler::OrgClientCache;
use tracing::{info, warn};

use crate::classify::{self, Decision};
use crate::release_policy::TrustedReleaserPolicy;
use crate::{collaborator_enforcement, release_policy, Error};

pub struct EngineConfig<'a> {
    pub self_login: &'a str,
    pub trusted_releasers: &'a [String],
    pub release_policies: &'a [TrustedReleaserPolicy],
    pub config_org: &'a str,
    pub config_repo: &'a str,
}

pub enum Outcome {
    Alert(MessageBuilder),
    DryRun { owner: String, repo: String, pr_number: u64, head_sha: String },
    NoAction,
}

fn parse<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(|e| Error::MalformedPayload(e.to_string()))
}

fn alert(severity: Severity, text: impl Into<String>, metadata: serde_json::Value) -> Outcome {
    Outcome::Alert(MessageBuilder::new(severity).text(text).metadata(metadata))
}

/// Dispatches one webhook delivery. `cache`/`configs` are needed only for
/// the `member` event's enforcement lookup.
pub async fn handle_delivery(
    kind: WebhookEventKind,
    delivery_id: &str,
    body: &[u8],
    cache: &OrgClientCache,
    configs: &[OrganizationConfig],
    ctx: &EngineConfig<'_>,
) -> Result<Outcome, Error> {
    info!(delivery_id, event = ?kind, "received webhook delivery");

    match kind {
        WebhookEventKind::Delete => {
            let event: DeleteEventPayload = parse(body)?;
            match classify::classify_delete(&event, ctx.trusted_releasers) {
                Decision::Alert { severity, text } => {
                    Ok(alert(severity, text, serde_json::to_value(&event).unwrap_or_default()))
                }
                _ => Ok(Outcome::NoAction),
            }
        }
        WebhookEventKind::DeployKey => {
            let event: DeployKeyEventPayload = parse(body)?;
            match classify::classify_deploy_key(&event) {
                Decision::Alert { severity, text } => {
                    Ok(alert(severity, text, serde_json::to_value(&event).unwrap_or_default()))
                }
                _ => Ok(Outcome::NoAction),
            }
        }
        WebhookEventKind::Member => {
            let event: MemberEventPayload = parse(body)?;
            let Some(org_config) = configs.iter().find(|c| c.organization == event.repository.owner.login)
            else {
                return Ok(Outcome::NoAction);
            };
            match collaborator_enforcement::enforce(cache, org_config, &event).await? {
                Some(message) => Ok(Outcome::Alert(message)),
                None => Ok(Outcome::NoAction),
            }
        }
        WebhookEventKind::Meta => {
            let event: MetaEventPayload = parse(body)?;
            match classify::classify_meta(&event) {
                Decision::Alert { severity, text } => {
                    Ok(alert(severity, text, serde_json::to_value(&event).unwrap_or_default()))
                }
                _ => Ok(Outcome::NoAction),
            }
        }
        WebhookEventKind::Organization => {
            let event: OrganizationEventPayload = parse(body)?;
            match classify::classify_organization(&event) {
                Decision::Alert { severity, text } => {
                    Ok(alert(severity, text, serde_json::to_value(&event).unwrap_or_default()))
                }
                _ => Ok(Outcome::NoAction),
            }
        }
        WebhookEventKind::Repository => {
            let event: RepositoryEventPayload = parse(body)?;
            match classify::classify_repository(&event, ctx.self_login) {
                Decision::Alert { severity, text } => {
                    Ok(alert(severity, text, serde_json::to_value(&event).unwrap_or_default()))
                }
                _ => Ok(Outcome::NoAction),
            }
        }
        WebhookEventKind::Public => {
            let event: PublicEventPayload = parse(body)?;
            match classify::classify_public(&event, ctx.self_login) {
                Decision::Alert { severity, text } => {
                    Ok(alert(severity, text, serde_json::to_value(&event).unwrap_or_default()))
                }
                _ => Ok(Outcome::NoAction),
            }
        }
        WebhookEventKind::Release => {
            let event: ReleaseEventPayload = parse(body)?;
            let severity = release_policy::classify(
                cache.client().client(),
                &event,
                ctx.trusted_releasers,
                ctx.release_policies,
            )
            .await?;
            match severity {
                Some(severity) => Ok(alert(
                    severity,
                    format!("release.{} on {}", event.action, event.repository.full_name),
                    serde_json::to_value(&event).unwrap_or_default(),
                )),
                None => Ok(Outcome::NoAction),
            }
        }
        WebhookEventKind::PersonalAccessTokenRequest => {
            let event: PersonalAccessTokenRequestEventPayload = parse(body)?;
            match classify::classify_personal_access_token_request(&event) {
                Decision::Alert { severity, text } => {
                    Ok(alert(severity, text, serde_json::to_value(&event).unwrap_or_default()))
                }
                _ => Ok(Outcome::NoAction),
            }
        }
        WebhookEventKind::PullRequest => {
            let event: PullRequestEventPayload = parse(body)?;
            match classify::classify_pull_request(&event, ctx.config_org, ctx.config_repo) {
                Decision::DryRun { owner, repo, pr_number, head_sha } => {
                    Ok(Outcome::DryRun { owner, repo, pr_number, head_sha })
                }
                _ => Ok(Outcome::NoAction),
            }
        }
        WebhookEventKind::Unhandled => {
            warn!(delivery_id, "received unhandled webhook event kind");
            Ok(Outcome::NoAction)
        }
    }
}
