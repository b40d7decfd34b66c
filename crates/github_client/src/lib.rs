//! Crate for interacting with the GitHub REST API.
//!
//! This crate provides a client for making authenticated requests to GitHub,
//! authenticating as a GitHub App using its ID and private key, and exposes the
//! narrow slice of the API surface the permissions controller needs: org
//! membership and teams, repository collaborators, custom properties,
//! rulesets, checks and gists.

use async_trait::async_trait;
use jsonwebtoken::EncodingKey;
use octocrab::{Octocrab, Result as OctocrabResult};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

pub mod errors;
pub use errors::Error;

pub mod checks;
pub mod collaborator;
pub mod custom_property_definition;
pub mod events;
pub mod gist;
pub mod installation;
pub mod membership;
pub mod repository;
pub mod ruleset;
pub mod team;
pub mod user;

pub use checks::{
    CheckConclusion, CheckRun, CheckRunOutput, CheckStatus, CreateCheckRunPayload,
    UpdateCheckRunPayload,
};
pub use collaborator::{
    AddCollaboratorPayload, Collaborator, CollaboratorPermissions, InvitationInvitee,
    RepositoryInvitation, UpdateInvitationPayload,
};
pub use custom_property_definition::{CustomPropertyDefinition, CustomPropertyValueType};
pub use events::{
    DeleteEventPayload, DeployKey, DeployKeyEventPayload, EventRepository, EventSender,
    MemberChanges, MemberEventPayload, MetaEventPayload, OrganizationEventPayload,
    OrganizationMembershipChange, PermissionChange, PersonalAccessTokenRequestEventPayload,
    PersonalAccessTokenRequestInfo, PublicEventPayload, PullRequestEventPayload, PullRequestInfo,
    PullRequestRef, ReleaseEventPayload, ReleaseInfo, RepositoryEventPayload, WebhookEventKind,
};
pub use gist::{CreateGistPayload, Gist, GistFile, GistFileInput};
pub use installation::{Account, Installation};
pub use membership::{
    CreateOrganizationInvitationPayload, MembershipState, OrganizationInvitation,
    OrganizationMembership, OrganizationRole,
};
pub use repository::{Organization, Repository};
pub use ruleset::{
    BypassActor, BypassActorType, BypassMode, MergeMethod, PullRequestParameters,
    RefNameCondition, RepositoryRuleset, RequiredStatusChecksParameters, Rule, RulesetConditions,
    RulesetEnforcement, RulesetTarget, StatusCheck,
};
pub use team::{
    CreateTeamPayload, PutTeamMembershipPayload, Team, TeamMember, TeamMembershipRole, TeamParent,
    TeamPrivacy, UpdateTeamPayload,
};
pub use user::User;

pub mod custom_property_payload;
pub use custom_property_payload::CustomPropertiesPayload;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// A client for interacting with the GitHub API, authenticated as a GitHub App.
///
/// This struct provides a high-level interface for GitHub API operations using
/// GitHub App authentication. It wraps an Octocrab client and provides methods
/// for repository, team, membership and ruleset management.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Octocrab,
}

impl GitHubClient {
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Gets an installation access token for a specific organization.
    ///
    /// Finds the installation for the given organization and returns an access
    /// token that can be used for API calls on its behalf.
    #[instrument(skip(self), fields(org_name = %org_name))]
    pub async fn get_installation_token_for_org(&self, org_name: &str) -> Result<String, Error> {
        let installations = self.list_installations().await?;

        let installation = installations
            .into_iter()
            .find(|inst| inst.account.login.eq_ignore_ascii_case(org_name))
            .ok_or_else(|| {
                error!(org_name = org_name, "No installation found for organization");
                Error::AuthError(format!(
                    "GitHub App not installed on organization '{org_name}'"
                ))
            })?;

        let (_, token) = self
            .client
            .installation_and_token(installation.id.into())
            .await
            .map_err(|e| {
                log_octocrab_error("Failed to get installation token", e);
                Error::AuthError(format!(
                    "Failed to get installation token for organization '{org_name}'"
                ))
            })?;

        info!(org_name = org_name, installation_id = installation.id, "Retrieved installation token");
        Ok(token.expose_secret().to_string())
    }

    /// Lists installations of the authenticated GitHub App.
    #[instrument(skip(self))]
    pub async fn list_installations(&self) -> Result<Vec<Installation>, Error> {
        let result: OctocrabResult<Vec<octocrab::models::Installation>> =
            self.client.get("/app/installations", None::<&()>).await;

        match result {
            Ok(installations) => Ok(installations.into_iter().map(Installation::from).collect()),
            Err(e) => {
                log_octocrab_error("Failed to list installations", e);
                Err(Error::InvalidResponse)
            }
        }
    }

    /// Fetches details for a specific repository.
    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository, Error> {
        match self.client.repos(owner, repo).get().await {
            Ok(r) => Ok(Repository::from(r)),
            Err(e) => {
                if is_not_found_error(&e) {
                    return Err(Error::NotFound(format!("{owner}/{repo}")));
                }
                log_octocrab_error("Failed to get repository", e);
                Err(Error::ApiError())
            }
        }
    }

    /// Gets the content of a file from a repository at an optional ref, decoded to UTF-8.
    ///
    /// Used both to load the permissions config from the platform and to fetch
    /// the candidate config at a PR's merge commit for dry-run.
    #[instrument(skip(self), fields(owner = %owner, repo = %repo, path = %path))]
    pub async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        r#ref: Option<&str>,
    ) -> Result<String, Error> {
        let mut request = self.client.repos(owner, repo).get_content().path(path);
        if let Some(r) = r#ref {
            request = request.r#ref(r);
        }

        let mut content = request.send().await.map_err(|e| {
            if is_not_found_error(&e) {
                return Error::NotFound(format!("{owner}/{repo}:{path}"));
            }
            log_octocrab_error("Failed to fetch file content", e);
            Error::InvalidResponse
        })?;

        let entry = content
            .take_items()
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("{owner}/{repo}:{path}")))?;

        entry.decoded_content().ok_or(Error::InvalidResponse)
    }

    /// Searches for repositories matching a query (e.g. `org:myorg`).
    #[instrument(skip(self), fields(query = %query))]
    pub async fn search_repositories(&self, query: &str) -> Result<Vec<Repository>, Error> {
        let search_result = self
            .client
            .search()
            .repositories(query)
            .per_page(100)
            .send()
            .await
            .map_err(|e| {
                log_octocrab_error("Failed to search repositories", e);
                Error::ApiError()
            })?;

        Ok(search_result.items.into_iter().map(Repository::from).collect())
    }

    /// Creates a repository within an organization.
    #[instrument(skip(self, payload), fields(org_name = %org_name))]
    pub async fn create_org_repository(
        &self,
        org_name: &str,
        payload: &RepositoryCreatePayload,
    ) -> Result<Repository, Error> {
        let path = format!("/orgs/{org_name}/repos");
        let response: OctocrabResult<octocrab::models::Repository> =
            self.client.post(path, Some(payload)).await;
        response.map(Repository::from).map_err(|e| {
            log_octocrab_error("Failed to create repository for organization", e);
            Error::InvalidResponse
        })
    }

    /// Updates settings for a repository. Only fields set to `Some` are sent.
    #[instrument(skip(self, settings), fields(owner = %owner, repo = %repo))]
    pub async fn update_repository_settings(
        &self,
        owner: &str,
        repo: &str,
        settings: &RepositorySettingsUpdate,
    ) -> Result<Repository, Error> {
        let path = format!("/repos/{owner}/{repo}");
        let response: OctocrabResult<octocrab::models::Repository> =
            self.client.patch(path, Some(settings)).await;
        response.map(Repository::from).map_err(|e| {
            log_octocrab_error("Failed to update repository settings", e);
            Error::InvalidResponse
        })
    }

    /// Sets custom property values on a repository. The definitions must
    /// already exist at the organization level.
    #[instrument(skip(self, payload), fields(owner = %owner, repo = %repo))]
    pub async fn set_repository_custom_properties(
        &self,
        owner: &str,
        repo: &str,
        payload: &CustomPropertiesPayload,
    ) -> Result<(), Error> {
        let path = format!("/repos/{owner}/{repo}/custom-properties");
        let response: OctocrabResult<Option<serde_json::Value>> =
            self.client.patch(path, Some(payload)).await;
        response.map(|_| ()).map_err(|e| {
            log_octocrab_error("Failed to set repository custom properties", e);
            Error::ApiError()
        })
    }

    /// Gets custom property values currently set on a repository.
    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    pub async fn get_custom_properties(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<std::collections::HashMap<String, serde_json::Value>, Error> {
        let path = format!("/repos/{owner}/{repo}/properties/values");
        let result: OctocrabResult<Vec<RepositoryCustomPropertyValue>> =
            self.client.get(&path, None::<&()>).await;

        let values = result.map_err(|e| {
            log_octocrab_error("Failed to get custom properties", e);
            Error::InvalidResponse
        })?;

        Ok(values.into_iter().map(|v| (v.property_name, v.value)).collect())
    }

    // ---- Organization custom property definitions ----

    /// Lists custom property definitions declared at the organization level.
    #[instrument(skip(self), fields(org = %org))]
    pub async fn list_organization_custom_properties(
        &self,
        org: &str,
    ) -> Result<Vec<CustomPropertyDefinition>, Error> {
        let path = format!("/orgs/{org}/properties/schema");
        let result: OctocrabResult<Vec<CustomPropertyDefinition>> =
            self.client.get(&path, None::<&()>).await;
        result.map_err(|e| {
            log_octocrab_error("Failed to list organization custom properties", e);
            Error::InvalidResponse
        })
    }

    /// Creates or updates a single custom property definition.
    #[instrument(skip(self, definition), fields(org = %org))]
    pub async fn upsert_organization_custom_property(
        &self,
        org: &str,
        definition: &CustomPropertyDefinition,
    ) -> Result<(), Error> {
        let path = format!("/orgs/{org}/properties/schema/{}", definition.property_name);
        let response: OctocrabResult<Option<serde_json::Value>> =
            self.client.put(path, Some(definition)).await;
        response.map(|_| ()).map_err(|e| {
            log_octocrab_error("Failed to upsert organization custom property", e);
            Error::ApiError()
        })
    }

    /// Deletes a custom property definition from the organization.
    #[instrument(skip(self), fields(org = %org, property_name = %property_name))]
    pub async fn delete_organization_custom_property(
        &self,
        org: &str,
        property_name: &str,
    ) -> Result<(), Error> {
        let path = format!("/orgs/{org}/properties/schema/{property_name}");
        let response: OctocrabResult<Option<serde_json::Value>> =
            self.client.delete(path, None::<&()>).await;
        response.map(|_| ()).map_err(|e| {
            if is_not_found_error(&e) {
                return Error::NotFound(format!("property {property_name}"));
            }
            log_octocrab_error("Failed to delete organization custom property", e);
            Error::ApiError()
        })
    }

    // ---- Fork PR approval ----

    /// Gets the fork pull request contributor approval policy for a repository.
    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    pub async fn get_fork_pr_approval_policy(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<ForkPrApprovalPolicy, Error> {
        let path = format!("/repos/{owner}/{repo}/actions/permissions/fork-pr-contributor-approval");
        let result: OctocrabResult<ForkPrApprovalPolicy> = self.client.get(&path, None::<&()>).await;
        result.map_err(|e| {
            log_octocrab_error("Failed to get fork PR approval policy", e);
            Error::InvalidResponse
        })
    }

    /// Sets the fork pull request contributor approval policy for a repository.
    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    pub async fn set_fork_pr_approval_policy(
        &self,
        owner: &str,
        repo: &str,
        policy: ForkPrApprovalPolicy,
    ) -> Result<(), Error> {
        let path = format!("/repos/{owner}/{repo}/actions/permissions/fork-pr-contributor-approval");
        let response: OctocrabResult<Option<serde_json::Value>> =
            self.client.put(path, Some(&policy)).await;
        response.map(|_| ()).map_err(|e| {
            log_octocrab_error("Failed to set fork PR approval policy", e);
            Error::ApiError()
        })
    }

    // ---- Organization membership ----

    /// Lists active members of an organization.
    #[instrument(skip(self), fields(org = %org))]
    pub async fn list_organization_members(&self, org: &str) -> Result<Vec<User>, Error> {
        let path = format!("/orgs/{org}/members?per_page=100");
        let result: OctocrabResult<Vec<User>> = self.client.get(&path, None::<&()>).await;
        result.map_err(|e| {
            log_octocrab_error("Failed to list organization members", e);
            Error::InvalidResponse
        })
    }

    /// Lists organization members holding the `admin` role ("org owners" in
    /// sheriff's vocabulary).
    #[instrument(skip(self), fields(org = %org))]
    pub async fn list_organization_owners(&self, org: &str) -> Result<Vec<User>, Error> {
        let path = format!("/orgs/{org}/members?role=admin&per_page=100");
        let result: OctocrabResult<Vec<User>> = self.client.get(&path, None::<&()>).await;
        result.map_err(|e| {
            log_octocrab_error("Failed to list organization owners", e);
            Error::InvalidResponse
        })
    }

    /// Looks up a user by login. Used to resolve an invitee's numeric id and
    /// to confirm the exact canonical casing of a login.
    #[instrument(skip(self), fields(login = %login))]
    pub async fn get_user_by_login(&self, login: &str) -> Result<User, Error> {
        let path = format!("/users/{login}");
        let result: OctocrabResult<User> = self.client.get(&path, None::<&()>).await;
        result.map_err(|e| {
            if is_not_found_error(&e) {
                return Error::NotFound(format!("user {login}"));
            }
            log_octocrab_error("Failed to get user", e);
            Error::InvalidResponse
        })
    }

    /// Gets a user's membership record (role, state) within an organization.
    #[instrument(skip(self), fields(org = %org, login = %login))]
    pub async fn get_organization_membership(
        &self,
        org: &str,
        login: &str,
    ) -> Result<Option<OrganizationMembership>, Error> {
        let path = format!("/orgs/{org}/memberships/{login}");
        let result: OctocrabResult<OrganizationMembership> = self.client.get(&path, None::<&()>).await;

        match result {
            Ok(m) => Ok(Some(m)),
            Err(e) if is_not_found_error(&e) => Ok(None),
            Err(e) => {
                log_octocrab_error("Failed to get organization membership", e);
                Err(Error::InvalidResponse)
            }
        }
    }

    /// Lists pending organization invitations.
    #[instrument(skip(self), fields(org = %org))]
    pub async fn list_organization_invitations(
        &self,
        org: &str,
    ) -> Result<Vec<OrganizationInvitation>, Error> {
        let path = format!("/orgs/{org}/invitations?per_page=100");
        let result: OctocrabResult<Vec<OrganizationInvitation>> =
            self.client.get(&path, None::<&()>).await;
        result.map_err(|e| {
            log_octocrab_error("Failed to list organization invitations", e);
            Error::InvalidResponse
        })
    }

    /// Creates a `direct_member` invitation for a user already known by id.
    #[instrument(skip(self), fields(org = %org, invitee_id = invitee_id))]
    pub async fn create_organization_invitation(
        &self,
        org: &str,
        invitee_id: u64,
    ) -> Result<(), Error> {
        let path = format!("/orgs/{org}/invitations");
        let payload = CreateOrganizationInvitationPayload { invitee_id, role: "direct_member" };
        let response: OctocrabResult<serde_json::Value> = self.client.post(path, Some(&payload)).await;
        response.map(|_| ()).map_err(|e| {
            log_octocrab_error("Failed to create organization invitation", e);
            Error::ApiError()
        })
    }

    // ---- Teams ----

    /// Lists all teams in an organization.
    #[instrument(skip(self), fields(org = %org))]
    pub async fn list_teams(&self, org: &str) -> Result<Vec<Team>, Error> {
        let path = format!("/orgs/{org}/teams?per_page=100");
        let result: OctocrabResult<Vec<Team>> = self.client.get(&path, None::<&()>).await;
        result.map_err(|e| {
            log_octocrab_error("Failed to list teams", e);
            Error::InvalidResponse
        })
    }

    pub async fn create_team(&self, org: &str, payload: &CreateTeamPayload) -> Result<Team, Error> {
        let path = format!("/orgs/{org}/teams");
        let result: OctocrabResult<Team> = self.client.post(path, Some(payload)).await;
        result.map_err(|e| {
            log_octocrab_error("Failed to create team", e);
            Error::ApiError()
        })
    }

    pub async fn update_team(
        &self,
        org: &str,
        team_slug: &str,
        payload: &UpdateTeamPayload,
    ) -> Result<Team, Error> {
        let path = format!("/orgs/{org}/teams/{team_slug}");
        let result: OctocrabResult<Team> = self.client.patch(path, Some(payload)).await;
        result.map_err(|e| {
            log_octocrab_error("Failed to update team", e);
            Error::ApiError()
        })
    }

    pub async fn delete_team(&self, org: &str, team_slug: &str) -> Result<(), Error> {
        let path = format!("/orgs/{org}/teams/{team_slug}");
        let response: OctocrabResult<Option<serde_json::Value>> =
            self.client.delete(path, None::<&()>).await;
        response.map(|_| ()).map_err(|e| {
            if is_not_found_error(&e) {
                return Error::NotFound(format!("team {team_slug}"));
            }
            log_octocrab_error("Failed to delete team", e);
            Error::ApiError()
        })
    }

    /// Lists a team's immediate members at a given role, capped at 100 (one page).
    #[instrument(skip(self), fields(org = %org, team_slug = %team_slug, role = ?role))]
    pub async fn list_team_members_by_role(
        &self,
        org: &str,
        team_slug: &str,
        role: TeamMembershipRole,
    ) -> Result<Vec<TeamMember>, Error> {
        let role_str = match role {
            TeamMembershipRole::Member => "member",
            TeamMembershipRole::Maintainer => "maintainer",
        };
        let path = format!("/orgs/{org}/teams/{team_slug}/members?role={role_str}&per_page=100");
        let result: OctocrabResult<Vec<TeamMember>> = self.client.get(&path, None::<&()>).await;
        result.map_err(|e| {
            log_octocrab_error("Failed to list team members", e);
            Error::InvalidResponse
        })
    }

    pub async fn put_team_membership(
        &self,
        org: &str,
        team_slug: &str,
        login: &str,
        role: TeamMembershipRole,
    ) -> Result<(), Error> {
        let path = format!("/orgs/{org}/teams/{team_slug}/memberships/{login}");
        let payload = PutTeamMembershipPayload { role };
        let response: OctocrabResult<serde_json::Value> = self.client.put(path, Some(&payload)).await;
        response.map(|_| ()).map_err(|e| {
            log_octocrab_error("Failed to put team membership", e);
            Error::ApiError()
        })
    }

    pub async fn remove_team_membership(
        &self,
        org: &str,
        team_slug: &str,
        login: &str,
    ) -> Result<(), Error> {
        let path = format!("/orgs/{org}/teams/{team_slug}/memberships/{login}");
        let response: OctocrabResult<Option<serde_json::Value>> =
            self.client.delete(path, None::<&()>).await;
        response.map(|_| ()).map_err(|e| {
            if is_not_found_error(&e) {
                return Error::NotFound(format!("membership {login} on {team_slug}"));
            }
            log_octocrab_error("Failed to remove team membership", e);
            Error::ApiError()
        })
    }

    // ---- Repo teams ----

    pub async fn list_repository_teams(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<RepoTeamPermission>, Error> {
        let path = format!("/repos/{owner}/{repo}/teams?per_page=100");
        let result: OctocrabResult<Vec<RepoTeamPermission>> = self.client.get(&path, None::<&()>).await;
        result.map_err(|e| {
            log_octocrab_error("Failed to list repository teams", e);
            Error::InvalidResponse
        })
    }

    pub async fn add_or_update_repo_team_permission(
        &self,
        org: &str,
        team_slug: &str,
        owner: &str,
        repo: &str,
        permission: &str,
    ) -> Result<(), Error> {
        let path = format!("/orgs/{org}/teams/{team_slug}/repos/{owner}/{repo}");
        let body = serde_json::json!({ "permission": permission });
        let response: OctocrabResult<Option<serde_json::Value>> = self.client.put(path, Some(&body)).await;
        response.map(|_| ()).map_err(|e| {
            log_octocrab_error("Failed to attach team to repository", e);
            Error::ApiError()
        })
    }

    pub async fn remove_repo_team(
        &self,
        org: &str,
        team_slug: &str,
        owner: &str,
        repo: &str,
    ) -> Result<(), Error> {
        let path = format!("/orgs/{org}/teams/{team_slug}/repos/{owner}/{repo}");
        let response: OctocrabResult<Option<serde_json::Value>> =
            self.client.delete(path, None::<&()>).await;
        response.map(|_| ()).map_err(|e| {
            if is_not_found_error(&e) {
                return Error::NotFound(format!("team {team_slug} on {owner}/{repo}"));
            }
            log_octocrab_error("Failed to detach team from repository", e);
            Error::ApiError()
        })
    }

    // ---- Direct collaborators ----

    pub async fn list_direct_collaborators(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<Collaborator>, Error> {
        let path = format!("/repos/{owner}/{repo}/collaborators?affiliation=direct&per_page=100");
        let result: OctocrabResult<Vec<Collaborator>> = self.client.get(&path, None::<&()>).await;
        result.map_err(|e| {
            log_octocrab_error("Failed to list direct collaborators", e);
            Error::InvalidResponse
        })
    }

    pub async fn add_collaborator(
        &self,
        owner: &str,
        repo: &str,
        login: &str,
        permission: &str,
    ) -> Result<(), Error> {
        let path = format!("/repos/{owner}/{repo}/collaborators/{login}");
        let payload = AddCollaboratorPayload { permission: permission.to_string() };
        let response: OctocrabResult<Option<serde_json::Value>> = self.client.put(path, Some(&payload)).await;
        response.map(|_| ()).map_err(|e| {
            log_octocrab_error("Failed to add collaborator", e);
            Error::ApiError()
        })
    }

    pub async fn remove_collaborator(&self, owner: &str, repo: &str, login: &str) -> Result<(), Error> {
        let path = format!("/repos/{owner}/{repo}/collaborators/{login}");
        let response: OctocrabResult<Option<serde_json::Value>> =
            self.client.delete(path, None::<&()>).await;
        response.map(|_| ()).map_err(|e| {
            if is_not_found_error(&e) {
                return Error::NotFound(format!("collaborator {login} on {owner}/{repo}"));
            }
            log_octocrab_error("Failed to remove collaborator", e);
            Error::ApiError()
        })
    }

    pub async fn list_repository_invitations(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<RepositoryInvitation>, Error> {
        let path = format!("/repos/{owner}/{repo}/invitations?per_page=100");
        let result: OctocrabResult<Vec<RepositoryInvitation>> = self.client.get(&path, None::<&()>).await;
        result.map_err(|e| {
            log_octocrab_error("Failed to list repository invitations", e);
            Error::InvalidResponse
        })
    }

    pub async fn update_repository_invitation(
        &self,
        owner: &str,
        repo: &str,
        invitation_id: u64,
        permission: &str,
    ) -> Result<(), Error> {
        let path = format!("/repos/{owner}/{repo}/invitations/{invitation_id}");
        let payload = UpdateInvitationPayload { permissions: permission.to_string() };
        let response: OctocrabResult<serde_json::Value> = self.client.patch(path, Some(&payload)).await;
        response.map(|_| ()).map_err(|e| {
            log_octocrab_error("Failed to update repository invitation", e);
            Error::ApiError()
        })
    }

    pub async fn delete_repository_invitation(
        &self,
        owner: &str,
        repo: &str,
        invitation_id: u64,
    ) -> Result<(), Error> {
        let path = format!("/repos/{owner}/{repo}/invitations/{invitation_id}");
        let response: OctocrabResult<Option<serde_json::Value>> =
            self.client.delete(path, None::<&()>).await;
        response.map(|_| ()).map_err(|e| {
            if is_not_found_error(&e) {
                return Error::NotFound(format!("invitation {invitation_id}"));
            }
            log_octocrab_error("Failed to delete repository invitation", e);
            Error::ApiError()
        })
    }

    // ---- Rulesets ----

    /// Lists rulesets on a repository. Per GitHub's API, this does not include
    /// each ruleset's `rules`; call [`Self::get_repository_ruleset`] for the full shape.
    pub async fn list_repository_rulesets(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<RepositoryRuleset>, Error> {
        let path = format!("/repos/{owner}/{repo}/rulesets?per_page=100");
        let result: OctocrabResult<Vec<RepositoryRuleset>> = self.client.get(&path, None::<&()>).await;
        result.map_err(|e| {
            log_octocrab_error("Failed to list repository rulesets", e);
            Error::InvalidResponse
        })
    }

    pub async fn get_repository_ruleset(
        &self,
        owner: &str,
        repo: &str,
        ruleset_id: u64,
    ) -> Result<RepositoryRuleset, Error> {
        let path = format!("/repos/{owner}/{repo}/rulesets/{ruleset_id}");
        let result: OctocrabResult<RepositoryRuleset> = self.client.get(&path, None::<&()>).await;
        result.map_err(|e| {
            if is_not_found_error(&e) {
                return Error::NotFound(format!("ruleset {ruleset_id}"));
            }
            log_octocrab_error("Failed to get repository ruleset", e);
            Error::InvalidResponse
        })
    }

    pub async fn create_repository_ruleset(
        &self,
        owner: &str,
        repo: &str,
        ruleset: &RepositoryRuleset,
    ) -> Result<RepositoryRuleset, Error> {
        let path = format!("/repos/{owner}/{repo}/rulesets");
        let result: OctocrabResult<RepositoryRuleset> = self.client.post(path, Some(ruleset)).await;
        result.map_err(|e| {
            log_octocrab_error("Failed to create repository ruleset", e);
            Error::ApiError()
        })
    }

    pub async fn update_repository_ruleset(
        &self,
        owner: &str,
        repo: &str,
        ruleset_id: u64,
        ruleset: &RepositoryRuleset,
    ) -> Result<RepositoryRuleset, Error> {
        let path = format!("/repos/{owner}/{repo}/rulesets/{ruleset_id}");
        let result: OctocrabResult<RepositoryRuleset> = self.client.put(path, Some(ruleset)).await;
        result.map_err(|e| {
            log_octocrab_error("Failed to update repository ruleset", e);
            Error::ApiError()
        })
    }

    pub async fn delete_repository_ruleset(
        &self,
        owner: &str,
        repo: &str,
        ruleset_id: u64,
    ) -> Result<(), Error> {
        let path = format!("/repos/{owner}/{repo}/rulesets/{ruleset_id}");
        let response: OctocrabResult<Option<serde_json::Value>> =
            self.client.delete(path, None::<&()>).await;
        response.map(|_| ()).map_err(|e| {
            if is_not_found_error(&e) {
                return Error::NotFound(format!("ruleset {ruleset_id}"));
            }
            log_octocrab_error("Failed to delete repository ruleset", e);
            Error::ApiError()
        })
    }

    // ---- Checks & releases & pull requests (dry-run harness) ----

    pub async fn create_check_run(
        &self,
        owner: &str,
        repo: &str,
        payload: &CreateCheckRunPayload,
    ) -> Result<CheckRun, Error> {
        let path = format!("/repos/{owner}/{repo}/check-runs");
        let result: OctocrabResult<CheckRun> = self.client.post(path, Some(payload)).await;
        result.map_err(|e| {
            log_octocrab_error("Failed to create check run", e);
            Error::ApiError()
        })
    }

    pub async fn update_check_run(
        &self,
        owner: &str,
        repo: &str,
        check_run_id: u64,
        payload: &UpdateCheckRunPayload,
    ) -> Result<CheckRun, Error> {
        let path = format!("/repos/{owner}/{repo}/check-runs/{check_run_id}");
        let result: OctocrabResult<CheckRun> = self.client.patch(path, Some(payload)).await;
        result.map_err(|e| {
            log_octocrab_error("Failed to update check run", e);
            Error::ApiError()
        })
    }

    /// Fetches the pull request used to poll `mergeable_state`.
    pub async fn get_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<octocrab::models::pulls::PullRequest, Error> {
        self.client.pulls(owner, repo).get(number).await.map_err(|e| {
            log_octocrab_error("Failed to get pull request", e);
            Error::InvalidResponse
        })
    }

    /// Looks up a release by tag, used by the trusted-releaser policy to
    /// confirm a mirrored release exists on the canonical repository.
    pub async fn get_release_by_tag(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<Option<octocrab::models::repos::Release>, Error> {
        match self.client.repos(owner, repo).releases().get_by_tag(tag).await {
            Ok(release) => Ok(Some(release)),
            Err(e) if is_not_found_error(&e) => Ok(None),
            Err(e) => {
                log_octocrab_error("Failed to get release by tag", e);
                Err(Error::InvalidResponse)
            }
        }
    }

    /// Creates a gist, used to publish the dry-run harness's SVG snapshot.
    pub async fn create_gist(&self, payload: &CreateGistPayload) -> Result<Gist, Error> {
        let result: OctocrabResult<Gist> = self.client.post("/gists", Some(payload)).await;
        result.map_err(|e| {
            log_octocrab_error("Failed to create gist", e);
            Error::ApiError()
        })
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
struct RepositoryCustomPropertyValue {
    property_name: String,
    value: serde_json::Value,
}

/// A team attached to a repository, with its effective permission.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RepoTeamPermission {
    pub name: String,
    pub slug: String,
    pub permission: String,
}

/// Settings that can be updated for an existing repository.
///
/// Use `Default::default()` to get a no-op update, then set specific fields.
#[derive(Serialize, Default, Debug)]
pub struct RepositorySettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_issues: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_projects: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_wiki: Option<bool>,
}

/// Fork pull request contributor approval policy, as returned/accepted by
/// `/repos/{owner}/{repo}/actions/permissions/fork-pr-contributor-approval`.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalPolicy {
    FirstTimeContributors,
    FirstTimeContributorsNewToGithub,
    AllExternalContributors,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ForkPrApprovalPolicy {
    pub approval_policy: ApprovalPolicy,
}

/// Payload used to create a repository via the REST API.
#[derive(Serialize, Default, Debug, Clone)]
pub struct RepositoryCreatePayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_issues: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_wiki: Option<bool>,
}

/// Trait seam over [`GitHubClient`] so the reconciler and webhook engine can be
/// exercised against a mock in tests without talking to the real API.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    async fn create_org_repository(
        &self,
        owner: &str,
        payload: &RepositoryCreatePayload,
    ) -> Result<Repository, Error>;

    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository, Error>;

    async fn update_repository_settings(
        &self,
        owner: &str,
        repo: &str,
        settings: &RepositorySettingsUpdate,
    ) -> Result<Repository, Error>;

    async fn get_installation_token_for_org(&self, org_name: &str) -> Result<String, Error>;

    async fn set_repository_custom_properties(
        &self,
        owner: &str,
        repo: &str,
        payload: &CustomPropertiesPayload,
    ) -> Result<(), Error>;

    async fn get_custom_properties(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<std::collections::HashMap<String, serde_json::Value>, Error>;

    async fn search_repositories(&self, query: &str) -> Result<Vec<Repository>, Error>;
}

#[async_trait]
impl RepositoryClient for GitHubClient {
    async fn create_org_repository(
        &self,
        owner: &str,
        payload: &RepositoryCreatePayload,
    ) -> Result<Repository, Error> {
        GitHubClient::create_org_repository(self, owner, payload).await
    }

    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository, Error> {
        GitHubClient::get_repository(self, owner, repo).await
    }

    async fn update_repository_settings(
        &self,
        owner: &str,
        repo: &str,
        settings: &RepositorySettingsUpdate,
    ) -> Result<Repository, Error> {
        GitHubClient::update_repository_settings(self, owner, repo, settings).await
    }

    async fn get_installation_token_for_org(&self, org_name: &str) -> Result<String, Error> {
        GitHubClient::get_installation_token_for_org(self, org_name).await
    }

    async fn set_repository_custom_properties(
        &self,
        owner: &str,
        repo: &str,
        payload: &CustomPropertiesPayload,
    ) -> Result<(), Error> {
        GitHubClient::set_repository_custom_properties(self, owner, repo, payload).await
    }

    async fn get_custom_properties(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<std::collections::HashMap<String, serde_json::Value>, Error> {
        GitHubClient::get_custom_properties(self, owner, repo).await
    }

    async fn search_repositories(&self, query: &str) -> Result<Vec<Repository>, Error> {
        GitHubClient::search_repositories(self, query).await
    }
}

/// Authenticates with GitHub using an installation access token for a specific app installation.
#[instrument(skip(octocrab))]
pub async fn authenticate_with_access_token(
    octocrab: &Octocrab,
    installation_id: u64,
    repository_owner: &str,
    source_repository: &str,
) -> Result<Octocrab, Error> {
    debug!(repository_owner, repository = source_repository, installation_id, "Finding installation");

    let (api_with_token, _) = octocrab
        .installation_and_token(installation_id.into())
        .await
        .map_err(|_| {
            error!(repository_owner, repository = source_repository, installation_id, "Failed to create installation token");
            Error::InvalidResponse
        })?;

    Ok(api_with_token)
}

/// Creates an `Octocrab` client authenticated as a GitHub App using a JWT token.
#[instrument(skip(private_key))]
pub async fn create_app_client(app_id: u64, private_key: &str) -> Result<Octocrab, Error> {
    let key = EncodingKey::from_rsa_pem(private_key.as_bytes()).map_err(|e| {
        error!(app_id, error = %e, "Failed to parse RSA private key");
        Error::AuthError(format!("Failed to parse the private key: {e}"))
    })?;

    Octocrab::builder().app(app_id.into(), key).build().map_err(|e| {
        error!(app_id, error = ?e, "Failed to build Octocrab client with App credentials");
        Error::AuthError("Failed to build GitHub App client".to_string())
    })
}

/// Creates an Octocrab client authenticated with a personal access token.
#[instrument(skip(token))]
pub fn create_token_client(token: &str) -> Result<Octocrab, Error> {
    Octocrab::builder()
        .personal_token(token.to_string())
        .build()
        .map_err(|_| Error::ApiError())
}

/// Logs an Octocrab error with appropriate detail for the error variant.
fn log_octocrab_error(message: &str, e: octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, backtrace } => error!(
            error_message = source.message,
            backtrace = backtrace.to_string(),
            "{}. Received an error from GitHub",
            message
        ),
        octocrab::Error::UriParse { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. Failed to parse URI.",
            message
        ),
        _ => error!(error_message = e.to_string(), message),
    };
}

/// Checks if an octocrab error is a 404 Not Found error.
fn is_not_found_error(e: &octocrab::Error) -> bool {
    match e {
        octocrab::Error::GitHub { source, .. } => source.status_code == http::StatusCode::NOT_FOUND,
        _ => false,
    }
}
