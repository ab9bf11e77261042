//! Platform adapters implementing the PlatformAdapter trait

pub mod gitea;
pub mod github;
pub mod gitlab;
pub mod platform_adapter;

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::GardenConfig;
use crate::error::{GardenError, GardenResult};
use crate::types::Platform;

pub use gitea::GiteaAdapter;
pub use github::GitHubAdapter;
pub use gitlab::GitLabAdapter;
pub use platform_adapter::{PlatformAdapter, Route};

/// Lookup from platform name to adapter
///
/// The one place a platform name turns into an adapter; callers never
/// match on names themselves.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<Platform, Arc<dyn PlatformAdapter>>,
}

impl AdapterRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// GitHub, GitLab and Gitea adapters, honouring API URL overrides
    pub fn from_config(config: &GardenConfig) -> Self {
        let github = config
            .api_url(Platform::GitHub)
            .map_or_else(GitHubAdapter::new, GitHubAdapter::with_api_url);
        let gitlab = config
            .api_url(Platform::GitLab)
            .map_or_else(GitLabAdapter::new, GitLabAdapter::with_api_url);
        let gitea = config
            .api_url(Platform::Gitea)
            .map_or_else(GiteaAdapter::new, GiteaAdapter::with_api_url);

        Self::new()
            .register(Arc::new(github))
            .register(Arc::new(gitlab))
            .register(Arc::new(gitea))
    }

    /// Add or replace the adapter for `adapter.platform()`
    pub fn register(mut self, adapter: Arc<dyn PlatformAdapter>) -> Self {
        self.adapters.insert(adapter.platform(), adapter);
        self
    }

    pub fn resolve(&self, platform_name: &str) -> GardenResult<Arc<dyn PlatformAdapter>> {
        let platform: Platform = platform_name.parse()?;
        self.adapters
            .get(&platform)
            .cloned()
            .ok_or_else(|| GardenError::UnsupportedPlatform(platform_name.to_string()))
    }
}
