//! GitLab adapter implementing PlatformAdapter
//!
//! Maps GitLab REST API v4 payloads onto the canonical model. GitLab differs
//! from the other platforms in three ways the mapping absorbs here:
//! - visibility and forking are strings, not booleans
//! - the repository size sits in a `statistics` sub-object, in bytes
//! - group-owned projects have no `owner` object at all

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::platform_adapter::{decode_list, decode_one, join_url, PlatformAdapter, Route};
use crate::error::{GardenError, GardenResult};
use crate::types::{
    Branch, Commit, File, FileKind, Issue, IssueState, Member, Platform, Repository,
    UnknownIssueState,
};

/// GitLab API base URL
pub const GITLAB_API_URL: &str = "https://gitlab.com/api/v4";

/// Git mode GitLab reports for symlinks in tree listings
const SYMLINK_MODE: &str = "120000";

/// Owner/author object embedded in GitLab responses
#[derive(Debug, Default, Deserialize)]
struct GitLabUser {
    #[serde(default)]
    name: String,
    avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitLabStatistics {
    #[serde(default)]
    repository_size: u64,
}

/// GitLab project response from API
#[derive(Debug, Deserialize)]
struct GitLabProject {
    id: i64,
    name: String,
    description: Option<String>,
    #[serde(default)]
    visibility: String, // "public", "internal", "private"
    #[serde(default)]
    forking_access_level: String, // "enabled", "private", "disabled"
    web_url: String,
    created_at: DateTime<Utc>,
    statistics: Option<GitLabStatistics>,
    owner: Option<GitLabUser>,
}

/// GitLab issue response from API
#[derive(Debug, Deserialize)]
struct GitLabIssue {
    title: String,
    description: Option<String>,
    state: String,
    created_at: DateTime<Utc>,
    author: Option<GitLabUser>,
    #[serde(default)]
    labels: Vec<String>,
}

/// GitLab commit response from API
#[derive(Debug, Deserialize)]
struct GitLabCommit {
    id: String,
    #[serde(default)]
    author_name: String,
    message: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct GitLabBranchHead {
    id: String,
}

/// GitLab branch response from API
#[derive(Debug, Deserialize)]
struct GitLabBranch {
    name: String,
    commit: GitLabBranchHead,
    #[serde(default)]
    protected: bool,
}

/// GitLab repository tree entry
#[derive(Debug, Deserialize)]
struct GitLabTreeEntry {
    id: String,
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String, // "blob", "tree", "commit"
    #[serde(default)]
    mode: String,
}

/// GitLab adapter for PlatformAdapter trait
pub struct GitLabAdapter {
    api_url: String,
}

impl GitLabAdapter {
    pub fn new() -> Self {
        Self::with_api_url(GITLAB_API_URL)
    }

    /// Create a new GitLabAdapter with a custom API URL (for testing or self-hosted)
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self { api_url: api_url.into() }
    }

    fn member(user: Option<GitLabUser>) -> Member {
        let user = user.unwrap_or_default();
        Member::new(user.name, user.avatar_url.unwrap_or_default())
    }

    /// GitLab addresses projects by their URL-encoded "namespace/project" path
    fn project_id(owner: &str, repo: &str) -> String {
        urlencoding::encode(&format!("{owner}/{repo}")).into_owned()
    }

    fn to_repository(gl_project: GitLabProject) -> GardenResult<Repository> {
        Ok(Repository {
            id: gl_project.id,
            name: gl_project.name,
            description: gl_project.description,
            is_private: gl_project.visibility == "private",
            is_fork: gl_project.forking_access_level == "enabled",
            url: gl_project.web_url,
            creation_date: gl_project.created_at,
            size: gl_project.statistics.map_or(0, |s| s.repository_size),
            owner: Self::member(gl_project.owner),
        })
    }

    fn to_state(state: &str) -> Result<IssueState, UnknownIssueState> {
        match state {
            "opened" => Ok(IssueState::Open),
            "closed" => Ok(IssueState::Closed),
            other => Err(UnknownIssueState(other.to_string())),
        }
    }

    fn to_issue(gl_issue: GitLabIssue) -> GardenResult<Issue> {
        let state = Self::to_state(&gl_issue.state).map_err(|e| GardenError::mapping("issues", e))?;

        Ok(Issue {
            title: gl_issue.title,
            body: gl_issue.description,
            state,
            creation_date: gl_issue.created_at,
            author: Self::member(gl_issue.author),
            labels: gl_issue.labels.into_iter().collect(),
        })
    }

    fn to_commit(gl_commit: GitLabCommit) -> GardenResult<Commit> {
        Ok(Commit {
            sha: gl_commit.id,
            author: Member::named(gl_commit.author_name),
            message: gl_commit.message,
            date: gl_commit.created_at,
        })
    }

    fn to_branch(gl_branch: GitLabBranch) -> GardenResult<Branch> {
        Ok(Branch {
            name: gl_branch.name,
            commit_sha: gl_branch.commit.id,
            protected: gl_branch.protected,
        })
    }

    fn to_file(entry: GitLabTreeEntry) -> GardenResult<File> {
        let kind = match (entry.kind.as_str(), entry.mode.as_str()) {
            ("blob", SYMLINK_MODE) => FileKind::Symlink,
            ("blob", _) => FileKind::File,
            ("tree", _) => FileKind::Dir,
            ("commit", _) => FileKind::Submodule,
            (other, _) => {
                return Err(GardenError::mapping("files", format!("unknown tree entry type: {other}")))
            }
        };

        Ok(File {
            name: entry.name,
            path: entry.path,
            sha: entry.id,
            kind,
            size: 0,
        })
    }
}

impl Default for GitLabAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformAdapter for GitLabAdapter {
    fn platform(&self) -> Platform {
        Platform::GitLab
    }

    fn endpoint(&self, route: &Route) -> String {
        let path = match route {
            Route::Repositories => "projects?membership=true&statistics=true&per_page=100".to_string(),
            Route::Issues => "issues?scope=all&per_page=100".to_string(),
            Route::Repository { owner, repo } => {
                format!("projects/{}?statistics=true", Self::project_id(owner, repo))
            }
            Route::Commits { owner, repo } => format!(
                "projects/{}/repository/commits?per_page=100",
                Self::project_id(owner, repo)
            ),
            Route::Commit { owner, repo, sha } => format!(
                "projects/{}/repository/commits/{sha}",
                Self::project_id(owner, repo)
            ),
            Route::Branches { owner, repo } => format!(
                "projects/{}/repository/branches?per_page=100",
                Self::project_id(owner, repo)
            ),
            Route::Branch { owner, repo, branch } => format!(
                "projects/{}/repository/branches/{}",
                Self::project_id(owner, repo),
                urlencoding::encode(branch)
            ),
            Route::Files { owner, repo, path } => {
                let path = path.trim_matches('/');
                if path.is_empty() {
                    format!("projects/{}/repository/tree?per_page=100", Self::project_id(owner, repo))
                } else {
                    format!(
                        "projects/{}/repository/tree?path={}&per_page=100",
                        Self::project_id(owner, repo),
                        urlencoding::encode(path)
                    )
                }
            }
        };
        join_url(&self.api_url, &path)
    }

    fn authorization(&self, token: &str) -> String {
        // OAuth tokens go in a Bearer header; PRIVATE-TOKEN is for PATs
        format!("Bearer {token}")
    }

    fn extract_repositories(&self, raw: &[u8]) -> GardenResult<Vec<Repository>> {
        decode_list(Platform::GitLab, "repositories", raw, Self::to_repository)
    }

    fn extract_issues(&self, raw: &[u8]) -> GardenResult<Vec<Issue>> {
        decode_list(Platform::GitLab, "issues", raw, Self::to_issue)
    }

    fn extract_commits(&self, raw: &[u8]) -> GardenResult<Vec<Commit>> {
        decode_list(Platform::GitLab, "commits", raw, Self::to_commit)
    }

    fn extract_branches(&self, raw: &[u8]) -> GardenResult<Vec<Branch>> {
        decode_list(Platform::GitLab, "branches", raw, Self::to_branch)
    }

    fn extract_files(&self, raw: &[u8]) -> GardenResult<Vec<File>> {
        decode_list(Platform::GitLab, "files", raw, Self::to_file)
    }

    fn extract_repository(&self, raw: &[u8]) -> GardenResult<Repository> {
        decode_one(Platform::GitLab, "repository", raw, Self::to_repository)
    }

    fn extract_commit(&self, raw: &[u8]) -> GardenResult<Commit> {
        decode_one(Platform::GitLab, "commit", raw, Self::to_commit)
    }

    fn extract_branch(&self, raw: &[u8]) -> GardenResult<Branch> {
        decode_one(Platform::GitLab, "branch", raw, Self::to_branch)
    }
}
