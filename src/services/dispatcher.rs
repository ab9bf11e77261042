//! ServiceDispatcher - authenticated fetch-and-normalize entry point
//!
//! Controllers hand the dispatcher a user id and a platform name; it resolves
//! the adapter, looks up the user's stored token, performs the request
//! through the shared `RawClient` and returns the canonical model. Failures
//! from the adapter propagate unchanged.
//!
//! The dispatcher holds only shared, immutable collaborators, so one
//! instance can serve any number of concurrent requests.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::adapters::{AdapterRegistry, PlatformAdapter, Route};
use crate::bridge::{cancellable, RawClient};
use crate::config::GardenConfig;
use crate::error::{GardenError, GardenResult};
use crate::oauth::{OAuthExchangerFactory, TokenRequest};
use crate::storage::TokenStore;
use crate::types::{Branch, Commit, File, Issue, Platform, Repository};

pub struct ServiceDispatcher {
    raw: Arc<dyn RawClient>,
    tokens: Arc<dyn TokenStore>,
    adapters: AdapterRegistry,
    exchangers: OAuthExchangerFactory,
    config: Arc<GardenConfig>,
}

impl ServiceDispatcher {
    pub fn new(
        raw: Arc<dyn RawClient>,
        tokens: Arc<dyn TokenStore>,
        adapters: AdapterRegistry,
        exchangers: OAuthExchangerFactory,
        config: Arc<GardenConfig>,
    ) -> Self {
        Self {
            raw,
            tokens,
            adapters,
            exchangers,
            config,
        }
    }

    /// Standard wiring: built-in adapters and exchangers, honouring the
    /// URL overrides in `config`
    pub fn from_config(
        raw: Arc<dyn RawClient>,
        tokens: Arc<dyn TokenStore>,
        config: GardenConfig,
    ) -> Self {
        let adapters = AdapterRegistry::from_config(&config);
        let exchangers = OAuthExchangerFactory::from_config(raw.clone(), &config);
        Self::new(raw, tokens, adapters, exchangers, Arc::new(config))
    }

    /// Repositories the user belongs to on `platform`
    pub async fn repositories(
        &self,
        user_id: i64,
        platform: &str,
        cancel: &CancellationToken,
    ) -> GardenResult<Vec<Repository>> {
        let (adapter, body) = self.fetch(user_id, platform, Route::Repositories, cancel).await?;
        adapter.extract_repositories(&body)
    }

    /// Issues visible to the user on `platform`
    pub async fn issues(
        &self,
        user_id: i64,
        platform: &str,
        cancel: &CancellationToken,
    ) -> GardenResult<Vec<Issue>> {
        let (adapter, body) = self.fetch(user_id, platform, Route::Issues, cancel).await?;
        adapter.extract_issues(&body)
    }

    pub async fn repository(
        &self,
        user_id: i64,
        platform: &str,
        owner: &str,
        repo: &str,
        cancel: &CancellationToken,
    ) -> GardenResult<Repository> {
        let route = Route::Repository {
            owner: owner.to_string(),
            repo: repo.to_string(),
        };
        let (adapter, body) = self.fetch(user_id, platform, route, cancel).await?;
        adapter.extract_repository(&body)
    }

    pub async fn commits(
        &self,
        user_id: i64,
        platform: &str,
        owner: &str,
        repo: &str,
        cancel: &CancellationToken,
    ) -> GardenResult<Vec<Commit>> {
        let route = Route::Commits {
            owner: owner.to_string(),
            repo: repo.to_string(),
        };
        let (adapter, body) = self.fetch(user_id, platform, route, cancel).await?;
        adapter.extract_commits(&body)
    }

    pub async fn commit(
        &self,
        user_id: i64,
        platform: &str,
        owner: &str,
        repo: &str,
        sha: &str,
        cancel: &CancellationToken,
    ) -> GardenResult<Commit> {
        let route = Route::Commit {
            owner: owner.to_string(),
            repo: repo.to_string(),
            sha: sha.to_string(),
        };
        let (adapter, body) = self.fetch(user_id, platform, route, cancel).await?;
        adapter.extract_commit(&body)
    }

    pub async fn branches(
        &self,
        user_id: i64,
        platform: &str,
        owner: &str,
        repo: &str,
        cancel: &CancellationToken,
    ) -> GardenResult<Vec<Branch>> {
        let route = Route::Branches {
            owner: owner.to_string(),
            repo: repo.to_string(),
        };
        let (adapter, body) = self.fetch(user_id, platform, route, cancel).await?;
        adapter.extract_branches(&body)
    }

    pub async fn branch(
        &self,
        user_id: i64,
        platform: &str,
        owner: &str,
        repo: &str,
        branch: &str,
        cancel: &CancellationToken,
    ) -> GardenResult<Branch> {
        let route = Route::Branch {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: branch.to_string(),
        };
        let (adapter, body) = self.fetch(user_id, platform, route, cancel).await?;
        adapter.extract_branch(&body)
    }

    /// Directory listing at `path` (empty for the repository root)
    pub async fn files(
        &self,
        user_id: i64,
        platform: &str,
        owner: &str,
        repo: &str,
        path: &str,
        cancel: &CancellationToken,
    ) -> GardenResult<Vec<File>> {
        let route = Route::Files {
            owner: owner.to_string(),
            repo: repo.to_string(),
            path: path.to_string(),
        };
        let (adapter, body) = self.fetch(user_id, platform, route, cancel).await?;
        adapter.extract_files(&body)
    }

    /// Redeem an authorization code for an access token.
    ///
    /// Storing the token is left to the caller.
    pub async fn exchange_token(
        &self,
        platform: &str,
        authorization_code: &str,
        redirect_uri: &str,
        cancel: &CancellationToken,
    ) -> GardenResult<String> {
        let credentials = self.config.credentials_for(platform)?;
        let exchanger = self.exchangers.resolve(platform)?;

        let request = TokenRequest::new(
            exchanger.platform(),
            authorization_code,
            redirect_uri,
            &credentials,
        );
        cancellable(cancel, exchanger.exchange_token(&request)).await
    }

    /// Resolve the adapter, authenticate and GET the route's body
    async fn fetch(
        &self,
        user_id: i64,
        platform_name: &str,
        route: Route,
        cancel: &CancellationToken,
    ) -> GardenResult<(Arc<dyn PlatformAdapter>, Vec<u8>)> {
        let adapter = self.adapters.resolve(platform_name)?;
        let platform = adapter.platform();
        let token = self.token_for(user_id, platform).await?;

        let url = adapter.endpoint(&route);
        debug!(user_id, platform = %platform, url = %url, "dispatching request");

        let response = cancellable(cancel, self.raw.get(&url, &adapter.authorization(&token))).await?;
        if !response.is_success() {
            warn!(user_id, platform = %platform, status = response.status, url = %url, "platform request failed");
            return Err(GardenError::Upstream {
                platform,
                status: response.status,
                body: response.text_lossy(),
            });
        }

        info!(user_id, platform = %platform, status = response.status, bytes = response.body.len(), "platform request succeeded");
        Ok((adapter, response.body))
    }

    async fn token_for(&self, user_id: i64, platform: Platform) -> GardenResult<String> {
        self.tokens
            .get(user_id, platform)
            .await?
            .ok_or(GardenError::TokenNotFound { user_id, platform })
    }
}
