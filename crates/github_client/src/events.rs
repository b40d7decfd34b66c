//! Inbound webhook event payload types.
//!
//! GitHub does not tag a webhook delivery's JSON body with its event kind; the kind
//! travels in the `X-GitHub-Event` HTTP header instead. [`WebhookEventKind`] mirrors
//! the header values this system reacts to; the receiver looks up the header, then
//! deserializes the body against the matching payload struct.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventKind {
    Delete,
    DeployKey,
    Member,
    Meta,
    Organization,
    Repository,
    Public,
    Release,
    PersonalAccessTokenRequest,
    PullRequest,
    #[serde(other)]
    Unhandled,
}

impl WebhookEventKind {
    /// Parses the `X-GitHub-Event` header value.
    pub fn from_header(value: &str) -> Self {
        match value {
            "delete" => Self::Delete,
            "deploy_key" => Self::DeployKey,
            "member" => Self::Member,
            "meta" => Self::Meta,
            "organization" => Self::Organization,
            "repository" => Self::Repository,
            "public" => Self::Public,
            "release" => Self::Release,
            "personal_access_token_request" => Self::PersonalAccessTokenRequest,
            "pull_request" => Self::PullRequest,
            _ => Self::Unhandled,
        }
    }
}

/// The minimal actor shape repeated across every webhook payload.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EventSender {
    pub login: String,
}

/// The minimal repository shape repeated across every webhook payload.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EventRepository {
    pub name: String,
    pub full_name: String,
    pub owner: EventSender,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DeleteEventPayload {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub ref_type: String,
    pub repository: EventRepository,
    pub sender: EventSender,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DeployKeyEventPayload {
    pub action: String,
    pub key: DeployKey,
    pub repository: EventRepository,
    pub sender: EventSender,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DeployKey {
    pub read_only: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MemberEventPayload {
    pub action: String,
    pub member: EventSender,
    pub repository: EventRepository,
    pub sender: EventSender,
    #[serde(default)]
    pub changes: Option<MemberChanges>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MemberChanges {
    pub permission: Option<PermissionChange>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PermissionChange {
    pub from: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MetaEventPayload {
    pub action: String,
    pub hook_id: u64,
    pub sender: EventSender,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OrganizationEventPayload {
    pub action: String,
    pub membership: Option<OrganizationMembershipChange>,
    pub sender: EventSender,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OrganizationMembershipChange {
    pub user: EventSender,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RepositoryEventPayload {
    pub action: String,
    pub repository: EventRepository,
    pub sender: EventSender,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PublicEventPayload {
    pub repository: EventRepository,
    pub sender: EventSender,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ReleaseEventPayload {
    pub action: String,
    pub release: ReleaseInfo,
    pub repository: EventRepository,
    pub sender: EventSender,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ReleaseInfo {
    pub tag_name: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PersonalAccessTokenRequestEventPayload {
    pub action: String,
    pub personal_access_token_request: PersonalAccessTokenRequestInfo,
    pub sender: EventSender,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PersonalAccessTokenRequestInfo {
    pub id: u64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PullRequestEventPayload {
    pub action: String,
    pub number: u64,
    pub pull_request: PullRequestInfo,
    pub repository: EventRepository,
    pub sender: EventSender,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PullRequestInfo {
    pub head: PullRequestRef,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PullRequestRef {
    pub sha: String,
}
