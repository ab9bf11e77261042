//! Devgarden - unified access to GitHub, GitLab and Gitea
//!
//! Devgarden signs users in through each platform's OAuth web flow and
//! normalizes repositories, issues, commits, branches and files from all
//! three REST APIs into one canonical model.

pub mod adapters;
pub mod bridge;
pub mod config;
pub mod error;
pub mod oauth;
pub mod services;
pub mod storage;
pub mod types;

// Re-exports for convenience
pub use adapters::{AdapterRegistry, PlatformAdapter, Route};
pub use bridge::{HttpRawClient, RawClient, RawResponse};
pub use config::{GardenConfig, OAuthCredentials};
pub use error::{GardenError, GardenResult};
pub use oauth::{OAuthExchanger, OAuthExchangerFactory, TokenRequest};
pub use services::ServiceDispatcher;
pub use storage::{GardenPaths, MemoryTokenStore, TokenStore, YamlTokenStore};
pub use types::*;

pub use tokio_util::sync::CancellationToken;
