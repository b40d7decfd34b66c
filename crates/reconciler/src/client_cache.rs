//! Per-org memoization of the platform client and fleet-wide listings that
//! every reconcile step would otherwise refetch: org members, org owners,
//! teams, and repositories. An explicit invalidation hook is used after any
//! creation so the next read sees the new entity.

use tokio::sync::RwLock;

use auth_handler::ScopedClient;
use github_client::{Error, Repository, Team, User};

struct Memo<T> {
    value: RwLock<Option<Vec<T>>>,
}

impl<T: Clone> Memo<T> {
    fn new() -> Self {
        Self { value: RwLock::new(None) }
    }

    async fn get_or_try_init<F, Fut>(&self, fetch: F) -> Result<Vec<T>, Error>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<Vec<T>, Error>>,
    {
        if let Some(cached) = self.value.read().await.as_ref() {
            return Ok(cached.clone());
        }
        let fetched = fetch().await?;
        *self.value.write().await = Some(fetched.clone());
        Ok(fetched)
    }

    async fn invalidate(&self) {
        *self.value.write().await = None;
    }
}

/// Memoizes one org's client and fleet-wide listings for the lifetime of a
/// single reconcile run.
pub struct OrgClientCache {
    client: ScopedClient,
    org: String,
    members: Memo<User>,
    owners: Memo<User>,
    teams: Memo<Team>,
    repositories: Memo<Repository>,
}

impl OrgClientCache {
    pub fn new(org: impl Into<String>, client: ScopedClient) -> Self {
        Self {
            client,
            org: org.into(),
            members: Memo::new(),
            owners: Memo::new(),
            teams: Memo::new(),
            repositories: Memo::new(),
        }
    }

    pub fn client(&self) -> &ScopedClient {
        &self.client
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub async fn members(&self) -> Result<Vec<User>, Error> {
        let org = self.org.clone();
        let client = self.client.client();
        self.members.get_or_try_init(|| async move { client.list_organization_members(&org).await }).await
    }

    pub async fn owners(&self) -> Result<Vec<User>, Error> {
        let org = self.org.clone();
        let client = self.client.client();
        self.owners.get_or_try_init(|| async move { client.list_organization_owners(&org).await }).await
    }

    pub async fn teams(&self) -> Result<Vec<Team>, Error> {
        let org = self.org.clone();
        let client = self.client.client();
        self.teams.get_or_try_init(|| async move { client.list_teams(&org).await }).await
    }

    pub async fn invalidate_teams(&self) {
        self.teams.invalidate().await;
    }

    pub async fn repositories(&self) -> Result<Vec<Repository>, Error> {
        let query = format!("org:{}", self.org);
        let client = self.client.client();
        self.repositories.get_or_try_init(|| async move { client.search_repositories(&query).await }).await
    }

    pub async fn invalidate_repositories(&self) {
        self.repositories.invalidate().await;
    }
}
