//! Team domain types.
//!
//! This module contains types representing GitHub organization teams, their
//! privacy level, and membership roles.

use serde::{Deserialize, Serialize};

/// A GitHub organization team.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Team {
    pub id: u64,
    pub node_id: String,
    pub name: String,
    pub slug: String,
    pub privacy: TeamPrivacy,
    /// Present when this team has a parent team attached.
    pub parent: Option<TeamParent>,
}

/// The subset of a parent team's fields returned when a team is nested under another.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TeamParent {
    pub id: u64,
    pub slug: String,
}

/// Visibility of a team within the organization.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TeamPrivacy {
    Secret,
    Closed,
}

/// Role a user holds on a team.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TeamMembershipRole {
    Member,
    Maintainer,
}

/// Payload for `POST /orgs/{org}/teams`.
#[derive(Debug, Default, Serialize)]
pub struct CreateTeamPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy: Option<TeamPrivacy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_team_id: Option<u64>,
}

/// Payload for `PATCH /orgs/{org}/teams/{team_slug}`.
#[derive(Debug, Default, Serialize)]
pub struct UpdateTeamPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy: Option<TeamPrivacy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_team_id: Option<u64>,
}

/// Payload for `PUT /orgs/{org}/teams/{team_slug}/memberships/{username}`.
#[derive(Debug, Serialize)]
pub struct PutTeamMembershipPayload {
    pub role: TeamMembershipRole,
}

/// A user's immediate membership on a team, as returned by the members-by-role listing.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TeamMember {
    pub login: String,
}
