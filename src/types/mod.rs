//! Core types for devgarden
//!
//! The canonical model every adapter produces, plus the platform identifier.

pub mod commit;
pub mod issue;
pub mod repository;
pub mod tree;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GardenError;

pub use commit::Commit;
pub use issue::{Issue, IssueState, UnknownIssueState};
pub use repository::{Member, Repository};
pub use tree::{Branch, File, FileKind};

/// Supported source-code hosting platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    GitHub,
    GitLab,
    Gitea,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::GitHub, Platform::GitLab, Platform::Gitea];

    /// Lowercase name used in configuration keys and token storage
    pub const fn as_str(self) -> &'static str {
        match self {
            Platform::GitHub => "github",
            Platform::GitLab => "gitlab",
            Platform::Gitea => "gitea",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = GardenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "github" => Ok(Platform::GitHub),
            "gitlab" => Ok(Platform::GitLab),
            "gitea" => Ok(Platform::Gitea),
            _ => Err(GardenError::UnsupportedPlatform(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_from_str() {
        assert_eq!("github".parse::<Platform>().unwrap(), Platform::GitHub);
        assert_eq!("GitLab".parse::<Platform>().unwrap(), Platform::GitLab);
        assert_eq!(" gitea ".parse::<Platform>().unwrap(), Platform::Gitea);
    }

    #[test]
    fn test_platform_from_str_unknown() {
        let err = "bitbucket".parse::<Platform>().unwrap_err();
        assert!(matches!(err, GardenError::UnsupportedPlatform(name) if name == "bitbucket"));
    }

    #[test]
    fn test_platform_display_roundtrips() {
        for platform in Platform::ALL {
            assert_eq!(platform.to_string().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn test_platform_serde_lowercase() {
        let json = serde_json::to_string(&Platform::GitLab).unwrap();
        assert_eq!(json, "\"gitlab\"");
    }
}
