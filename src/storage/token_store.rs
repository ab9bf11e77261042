use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use tokio::sync::{Mutex, RwLock};

use super::GardenPaths;
use crate::error::GardenResult;
use crate::types::Platform;

/// Per-user, per-platform access token lookup
///
/// The dispatcher only reads; `put` is for the login path that runs after a
/// successful token exchange.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self, user_id: i64, platform: Platform) -> GardenResult<Option<String>>;

    async fn put(&self, user_id: i64, platform: Platform, token: &str) -> GardenResult<()>;
}

/// In-memory token cache
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<HashMap<(i64, Platform), String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, user_id: i64, platform: Platform) -> GardenResult<Option<String>> {
        Ok(self.tokens.read().await.get(&(user_id, platform)).cloned())
    }

    async fn put(&self, user_id: i64, platform: Platform, token: &str) -> GardenResult<()> {
        self.tokens
            .write()
            .await
            .insert((user_id, platform), token.to_string());
        Ok(())
    }
}

/// A stored access token
#[derive(Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub token: String,
    pub stored_at: DateTime<Utc>,
}

impl fmt::Debug for StoredToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredToken")
            .field("token", &"[REDACTED]")
            .field("stored_at", &self.stored_at)
            .finish()
    }
}

/// Root structure for tokens.yaml file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokensFile {
    #[serde(default)]
    pub tokens: HashMap<i64, HashMap<Platform, StoredToken>>,
}

/// Token store backed by tokens.yaml
pub struct YamlTokenStore {
    path: PathBuf,
    /// Serializes load-modify-save cycles
    write_lock: Mutex<()>,
}

impl YamlTokenStore {
    pub fn new(paths: &GardenPaths) -> Self {
        Self::with_path(paths.tokens_file())
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Load tokens from disk
    /// Returns empty state if file doesn't exist
    pub async fn load(&self) -> GardenResult<TokensFile> {
        if !self.path.exists() {
            return Ok(TokensFile::default());
        }

        let contents = tokio::fs::read_to_string(&self.path).await?;
        let tokens: TokensFile = serde_yaml::from_str(&contents)?;
        Ok(tokens)
    }

    /// Save tokens to disk with atomic write
    /// Writes to a temp file then renames to prevent corruption
    async fn save(&self, tokens: &TokensFile) -> GardenResult<()> {
        let temp_path = self.path.with_extension("yaml.tmp");

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = serde_yaml::to_string(tokens)?;
        tokio::fs::write(&temp_path, &contents).await?;

        // Tokens are credentials: owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            tokio::fs::set_permissions(&temp_path, permissions).await?;
        }

        tokio::fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for YamlTokenStore {
    async fn get(&self, user_id: i64, platform: Platform) -> GardenResult<Option<String>> {
        let tokens = self.load().await?;

        Ok(tokens
            .tokens
            .get(&user_id)
            .and_then(|user_tokens| user_tokens.get(&platform))
            .map(|stored| stored.token.clone()))
    }

    async fn put(&self, user_id: i64, platform: Platform, token: &str) -> GardenResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut tokens = self.load().await?;

        tokens.tokens.entry(user_id).or_default().insert(
            platform,
            StoredToken {
                token: token.to_string(),
                stored_at: Utc::now(),
            },
        );

        self.save(&tokens).await
    }
}
