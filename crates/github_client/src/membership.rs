//! Organization membership domain types.

use serde::{Deserialize, Serialize};

/// A user's membership record in an organization.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OrganizationMembership {
    pub role: OrganizationRole,
    pub state: MembershipState,
}

/// A user's role within an organization.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrganizationRole {
    Admin,
    Member,
}

impl OrganizationMembership {
    /// An org "owner" in sheriff's vocabulary is a user holding the `admin` role.
    pub fn is_owner(&self) -> bool {
        self.role == OrganizationRole::Admin
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MembershipState {
    Active,
    Pending,
}

/// A pending organization invitation.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OrganizationInvitation {
    pub id: u64,
    pub login: Option<String>,
    pub email: Option<String>,
    pub role: String,
}

/// Payload for `POST /orgs/{org}/invitations`.
#[derive(Debug, Serialize)]
pub struct CreateOrganizationInvitationPayload {
    pub invitee_id: u64,
    pub role: &'static str,
}
