//! Gitea adapter implementing PlatformAdapter
//!
//! Uses the Gitea/Forgejo API v1 shapes, which follow GitHub's closely but
//! send empty strings where GitHub sends null. Repository sizes are in
//! kilobytes.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::platform_adapter::{
    decode_list, decode_one, encode_path, join_url, non_empty, repo_path, PlatformAdapter, Route,
};
use crate::error::{GardenError, GardenResult};
use crate::types::{
    Branch, Commit, File, FileKind, Issue, IssueState, Member, Platform, Repository,
    UnknownIssueState,
};

/// Gitea API base URL
pub const GITEA_API_URL: &str = "https://gitea.com/api/v1";

#[derive(Debug, Default, Deserialize)]
struct GiteaUser {
    #[serde(default)]
    login: String,
    #[serde(default)]
    avatar_url: String,
}

/// Gitea repository response from API
#[derive(Debug, Deserialize)]
struct GiteaRepo {
    id: i64,
    name: String,
    #[serde(default)]
    description: Option<String>,
    private: bool,
    #[serde(default)]
    fork: bool,
    html_url: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    size: u64,
    owner: Option<GiteaUser>,
}

#[derive(Debug, Deserialize)]
struct GiteaLabel {
    name: String,
}

/// Gitea issue response from API
#[derive(Debug, Deserialize)]
struct GiteaIssue {
    title: String,
    #[serde(default)]
    body: Option<String>,
    state: String,
    created_at: DateTime<Utc>,
    user: Option<GiteaUser>,
    #[serde(default)]
    labels: Vec<GiteaLabel>,
}

#[derive(Debug, Default, Deserialize)]
struct GiteaCommitUser {
    #[serde(default)]
    name: String,
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct GiteaCommitDetail {
    message: String,
    author: Option<GiteaCommitUser>,
}

/// Gitea commit response from API
#[derive(Debug, Deserialize)]
struct GiteaCommit {
    sha: String,
    commit: GiteaCommitDetail,
    /// Top-level creation time; fallback when the git author has no date
    created: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct GiteaBranchHead {
    id: String,
}

/// Gitea branch response from API
#[derive(Debug, Deserialize)]
struct GiteaBranch {
    name: String,
    commit: GiteaBranchHead,
    #[serde(default)]
    protected: bool,
}

/// Gitea contents entry
#[derive(Debug, Deserialize)]
struct GiteaContent {
    name: String,
    path: String,
    sha: String,
    #[serde(default)]
    size: u64,
    #[serde(rename = "type")]
    kind: String,
}

/// Gitea adapter for PlatformAdapter trait
pub struct GiteaAdapter {
    api_url: String,
}

impl GiteaAdapter {
    pub fn new() -> Self {
        Self::with_api_url(GITEA_API_URL)
    }

    /// Create a new GiteaAdapter for a self-hosted instance or Codeberg
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self { api_url: api_url.into() }
    }

    fn member(user: Option<GiteaUser>) -> Member {
        let user = user.unwrap_or_default();
        Member::new(user.login, user.avatar_url)
    }

    fn to_repository(gt_repo: GiteaRepo) -> GardenResult<Repository> {
        Ok(Repository {
            id: gt_repo.id,
            name: gt_repo.name,
            description: non_empty(gt_repo.description),
            is_private: gt_repo.private,
            is_fork: gt_repo.fork,
            url: gt_repo.html_url,
            creation_date: gt_repo.created_at,
            size: gt_repo.size,
            owner: Self::member(gt_repo.owner),
        })
    }

    fn to_state(state: &str) -> Result<IssueState, UnknownIssueState> {
        match state {
            "open" => Ok(IssueState::Open),
            "closed" => Ok(IssueState::Closed),
            other => Err(UnknownIssueState(other.to_string())),
        }
    }

    fn to_issue(gt_issue: GiteaIssue) -> GardenResult<Issue> {
        let state = Self::to_state(&gt_issue.state).map_err(|e| GardenError::mapping("issues", e))?;

        Ok(Issue {
            title: gt_issue.title,
            body: non_empty(gt_issue.body),
            state,
            creation_date: gt_issue.created_at,
            author: Self::member(gt_issue.user),
            labels: gt_issue.labels.into_iter().map(|l| l.name).collect(),
        })
    }

    fn to_commit(gt_commit: GiteaCommit) -> GardenResult<Commit> {
        let author = gt_commit.commit.author.unwrap_or_default();
        let date = author.date.or(gt_commit.created).ok_or_else(|| {
            GardenError::mapping("commits", format!("commit {} has no date", gt_commit.sha))
        })?;

        Ok(Commit {
            sha: gt_commit.sha,
            author: Member::named(author.name),
            message: gt_commit.commit.message,
            date,
        })
    }

    fn to_branch(gt_branch: GiteaBranch) -> GardenResult<Branch> {
        Ok(Branch {
            name: gt_branch.name,
            commit_sha: gt_branch.commit.id,
            protected: gt_branch.protected,
        })
    }

    fn to_file(content: GiteaContent) -> GardenResult<File> {
        let kind = match content.kind.as_str() {
            "file" => FileKind::File,
            "dir" => FileKind::Dir,
            "symlink" => FileKind::Symlink,
            "submodule" => FileKind::Submodule,
            other => {
                return Err(GardenError::mapping("files", format!("unknown content type: {other}")))
            }
        };

        Ok(File {
            name: content.name,
            path: content.path,
            sha: content.sha,
            kind,
            size: content.size,
        })
    }
}

impl Default for GiteaAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformAdapter for GiteaAdapter {
    fn platform(&self) -> Platform {
        Platform::Gitea
    }

    fn endpoint(&self, route: &Route) -> String {
        let path = match route {
            Route::Repositories => "user/repos?limit=50".to_string(),
            Route::Issues => "repos/issues/search?type=issues&state=all&limit=50".to_string(),
            Route::Repository { owner, repo } => repo_path(owner, repo),
            Route::Commits { owner, repo } => format!("{}/commits?limit=50", repo_path(owner, repo)),
            Route::Commit { owner, repo, sha } => format!("{}/git/commits/{sha}", repo_path(owner, repo)),
            Route::Branches { owner, repo } => format!("{}/branches", repo_path(owner, repo)),
            Route::Branch { owner, repo, branch } => {
                format!("{}/branches/{}", repo_path(owner, repo), urlencoding::encode(branch))
            }
            Route::Files { owner, repo, path } => {
                format!("{}/contents/{}", repo_path(owner, repo), encode_path(path))
            }
        };
        join_url(&self.api_url, &path)
    }

    fn authorization(&self, token: &str) -> String {
        // Gitea/Forgejo uses "token" instead of "Bearer"
        format!("token {token}")
    }

    fn extract_repositories(&self, raw: &[u8]) -> GardenResult<Vec<Repository>> {
        decode_list(Platform::Gitea, "repositories", raw, Self::to_repository)
    }

    fn extract_issues(&self, raw: &[u8]) -> GardenResult<Vec<Issue>> {
        decode_list(Platform::Gitea, "issues", raw, Self::to_issue)
    }

    fn extract_commits(&self, raw: &[u8]) -> GardenResult<Vec<Commit>> {
        decode_list(Platform::Gitea, "commits", raw, Self::to_commit)
    }

    fn extract_branches(&self, raw: &[u8]) -> GardenResult<Vec<Branch>> {
        decode_list(Platform::Gitea, "branches", raw, Self::to_branch)
    }

    fn extract_files(&self, raw: &[u8]) -> GardenResult<Vec<File>> {
        decode_list(Platform::Gitea, "files", raw, Self::to_file)
    }

    fn extract_repository(&self, raw: &[u8]) -> GardenResult<Repository> {
        decode_one(Platform::Gitea, "repository", raw, Self::to_repository)
    }

    fn extract_commit(&self, raw: &[u8]) -> GardenResult<Commit> {
        decode_one(Platform::Gitea, "commit", raw, Self::to_commit)
    }

    fn extract_branch(&self, raw: &[u8]) -> GardenResult<Branch> {
        decode_one(Platform::Gitea, "branch", raw, Self::to_branch)
    }
}
