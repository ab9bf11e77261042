use std::collections::HashMap;
use std::sync::Arc;

use super::{GitHubExchanger, GitLabExchanger, GiteaExchanger, OAuthExchanger};
use crate::bridge::RawClient;
use crate::config::GardenConfig;
use crate::error::{GardenError, GardenResult};
use crate::types::Platform;

/// Platform name to exchanger lookup
#[derive(Clone, Default)]
pub struct OAuthExchangerFactory {
    exchangers: HashMap<Platform, Arc<dyn OAuthExchanger>>,
}

impl OAuthExchangerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// One exchanger per platform sharing `raw`, with token URL overrides
    /// from config
    pub fn from_config(raw: Arc<dyn RawClient>, config: &GardenConfig) -> Self {
        let github = match config.oauth_url(Platform::GitHub) {
            Some(url) => GitHubExchanger::with_token_url(raw.clone(), url),
            None => GitHubExchanger::new(raw.clone()),
        };
        let gitlab = match config.oauth_url(Platform::GitLab) {
            Some(url) => GitLabExchanger::with_token_url(raw.clone(), url),
            None => GitLabExchanger::new(raw.clone()),
        };
        let gitea = match config.oauth_url(Platform::Gitea) {
            Some(url) => GiteaExchanger::with_token_url(raw, url),
            None => GiteaExchanger::new(raw),
        };

        Self::new()
            .register(Arc::new(github))
            .register(Arc::new(gitlab))
            .register(Arc::new(gitea))
    }

    /// Add or replace the exchanger for `exchanger.platform()`
    pub fn register(mut self, exchanger: Arc<dyn OAuthExchanger>) -> Self {
        self.exchangers.insert(exchanger.platform(), exchanger);
        self
    }

    pub fn resolve(&self, platform_name: &str) -> GardenResult<Arc<dyn OAuthExchanger>> {
        let platform: Platform = platform_name.parse()?;
        self.exchangers
            .get(&platform)
            .cloned()
            .ok_or_else(|| GardenError::UnsupportedPlatform(platform_name.to_string()))
    }
}
