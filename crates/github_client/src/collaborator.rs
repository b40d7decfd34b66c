//! Repository collaborator and invitation domain types.

use serde::{Deserialize, Serialize};

/// A direct collaborator on a repository, with their effective permission bitmap.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Collaborator {
    pub login: String,
    pub permissions: CollaboratorPermissions,
}

/// The five-flag permission bitmap GitHub reports for a collaborator.
///
/// This crate carries the raw flags as-is; callers apply their own
/// highest-true-flag rule to decode them into a single access level.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct CollaboratorPermissions {
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub maintain: bool,
    #[serde(default)]
    pub push: bool,
    #[serde(default)]
    pub triage: bool,
    #[serde(default)]
    pub pull: bool,
}

/// Payload for `PUT /repos/{owner}/{repo}/collaborators/{username}`.
#[derive(Debug, Serialize)]
pub struct AddCollaboratorPayload {
    pub permission: String,
}

/// A pending invitation to a repository.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RepositoryInvitation {
    pub id: u64,
    pub invitee: Option<InvitationInvitee>,
    pub permissions: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InvitationInvitee {
    pub login: String,
}

/// Payload for `PATCH /repos/{owner}/{repo}/invitations/{invitation_id}`.
#[derive(Debug, Serialize)]
pub struct UpdateInvitationPayload {
    pub permissions: String,
}
