//! Configuration management for devgarden
//!
//! Per-platform OAuth client credentials and API URL overrides, read from
//! `~/.config/devgarden/config.yaml` and overlaid by environment variables:
//!
//! ```yaml
//! platforms:
//!   github:
//!     client_id: Iv1.0123
//!     client_secret: s3cr3t
//!   gitea:
//!     client_id: abc
//!     client_secret: def
//!     api_url: https://codeberg.org/api/v1
//!     oauth_url: https://codeberg.org/login/oauth/access_token
//! ```
//!
//! Environment: `DEVGARDEN_<PLATFORM>_CLIENT_ID`, `..._CLIENT_SECRET`,
//! `..._API_URL`, `..._OAUTH_URL` (e.g. `DEVGARDEN_GITLAB_CLIENT_ID`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::error::{GardenError, GardenResult};
use crate::storage::GardenPaths;
use crate::types::Platform;

/// An OAuth application's client id and secret
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Settings for one platform
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct PlatformSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// REST API base URL (self-hosted instances, Codeberg)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// OAuth token endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_url: Option<String>,
}

impl fmt::Debug for PlatformSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformSettings")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("api_url", &self.api_url)
            .field("oauth_url", &self.oauth_url)
            .finish()
    }
}

/// Top-level config.yaml structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GardenConfig {
    #[serde(default)]
    pub platforms: HashMap<Platform, PlatformSettings>,
}

impl GardenConfig {
    /// Load config from a YAML file; a missing file is an empty config
    pub fn load(path: &Path) -> GardenResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from the default location and apply environment overrides
    pub fn load_default(paths: &GardenPaths) -> GardenResult<Self> {
        let mut config = Self::load(&paths.config_file())?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overlay values from `lookup` (normally the process environment)
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for platform in Platform::ALL {
            let prefix = format!("DEVGARDEN_{}", platform.as_str().to_ascii_uppercase());
            let var = |suffix: &str| lookup(&format!("{prefix}_{suffix}")).filter(|v| !v.is_empty());

            let overrides = [
                var("CLIENT_ID"),
                var("CLIENT_SECRET"),
                var("API_URL"),
                var("OAUTH_URL"),
            ];
            if overrides.iter().all(Option::is_none) {
                continue;
            }

            let [client_id, client_secret, api_url, oauth_url] = overrides;
            let settings = self.platforms.entry(platform).or_default();
            settings.client_id = client_id.or(settings.client_id.take());
            settings.client_secret = client_secret.or(settings.client_secret.take());
            settings.api_url = api_url.or(settings.api_url.take());
            settings.oauth_url = oauth_url.or(settings.oauth_url.take());
        }
    }

    pub fn settings(&self, platform: Platform) -> Option<&PlatformSettings> {
        self.platforms.get(&platform)
    }

    /// API base URL override for `platform`, if any
    pub fn api_url(&self, platform: Platform) -> Option<&str> {
        self.settings(platform).and_then(|s| s.api_url.as_deref())
    }

    /// Token endpoint override for `platform`, if any
    pub fn oauth_url(&self, platform: Platform) -> Option<&str> {
        self.settings(platform).and_then(|s| s.oauth_url.as_deref())
    }

    /// Client credentials for the named platform.
    ///
    /// An unknown name or an incomplete pair is `UnsupportedPlatform`.
    pub fn credentials_for(&self, platform_name: &str) -> GardenResult<OAuthCredentials> {
        let platform: Platform = platform_name.parse()?;
        let unsupported = || GardenError::UnsupportedPlatform(platform_name.to_string());

        let settings = self.settings(platform).ok_or_else(unsupported)?;
        match (&settings.client_id, &settings.client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => Ok(OAuthCredentials {
                client_id: id.clone(),
                client_secret: secret.clone(),
            }),
            _ => Err(unsupported()),
        }
    }
}
