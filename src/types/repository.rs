use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person or group attached to a repository, issue or commit.
///
/// Both fields may be empty; adapters never leave a member out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub photo_url: String,
}

impl Member {
    pub fn new(name: impl Into<String>, photo_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            photo_url: photo_url.into(),
        }
    }

    /// Member with a name and no photo (commit authors)
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, String::new())
    }
}

/// A repository, normalized across platforms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Platform-native numeric id
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_private: bool,
    pub is_fork: bool,
    /// Web URL of the repository
    pub url: String,
    pub creation_date: DateTime<Utc>,
    /// Kilobytes on GitHub and Gitea, bytes on GitLab
    pub size: u64,
    pub owner: Member,
}
