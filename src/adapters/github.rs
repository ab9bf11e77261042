//! GitHub adapter implementing PlatformAdapter
//!
//! Maps GitHub REST API v3 payloads onto the canonical model.
//! Repository sizes are reported in kilobytes.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::platform_adapter::{decode_list, decode_one, encode_path, join_url, repo_path, PlatformAdapter, Route};
use crate::error::{GardenError, GardenResult};
use crate::types::{
    Branch, Commit, File, FileKind, Issue, IssueState, Member, Platform, Repository,
    UnknownIssueState,
};

/// GitHub API base URL
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Owner/user object embedded in GitHub responses
#[derive(Debug, Default, Deserialize)]
struct GitHubUser {
    #[serde(default)]
    login: String,
    #[serde(default)]
    avatar_url: String,
}

/// GitHub repository response from API
#[derive(Debug, Deserialize)]
struct GitHubRepo {
    id: i64,
    name: String,
    description: Option<String>,
    private: bool,
    #[serde(default)]
    fork: bool,
    html_url: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    size: u64,
    owner: Option<GitHubUser>,
}

#[derive(Debug, Deserialize)]
struct GitHubLabel {
    name: String,
}

/// GitHub issue response from API
#[derive(Debug, Deserialize)]
struct GitHubIssue {
    title: String,
    body: Option<String>,
    state: String,
    created_at: DateTime<Utc>,
    user: Option<GitHubUser>,
    #[serde(default)]
    labels: Vec<GitHubLabel>,
}

#[derive(Debug, Default, Deserialize)]
struct GitHubGitAuthor {
    #[serde(default)]
    name: String,
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct GitHubCommitDetail {
    message: String,
    author: Option<GitHubGitAuthor>,
}

/// GitHub commit response from API
#[derive(Debug, Deserialize)]
struct GitHubCommit {
    sha: String,
    commit: GitHubCommitDetail,
}

#[derive(Debug, Deserialize)]
struct GitHubBranchHead {
    sha: String,
}

/// GitHub branch response from API
#[derive(Debug, Deserialize)]
struct GitHubBranch {
    name: String,
    commit: GitHubBranchHead,
    #[serde(default)]
    protected: bool,
}

/// GitHub contents entry
#[derive(Debug, Deserialize)]
struct GitHubContent {
    name: String,
    path: String,
    sha: String,
    #[serde(default)]
    size: u64,
    #[serde(rename = "type")]
    kind: String,
}

/// GitHub adapter for PlatformAdapter trait
pub struct GitHubAdapter {
    api_url: String,
}

impl GitHubAdapter {
    pub fn new() -> Self {
        Self::with_api_url(GITHUB_API_URL)
    }

    /// Create a new GitHubAdapter with a custom API URL (GitHub Enterprise or testing)
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self { api_url: api_url.into() }
    }

    fn member(user: Option<GitHubUser>) -> Member {
        let user = user.unwrap_or_default();
        Member::new(user.login, user.avatar_url)
    }

    fn to_repository(gh_repo: GitHubRepo) -> GardenResult<Repository> {
        Ok(Repository {
            id: gh_repo.id,
            name: gh_repo.name,
            description: gh_repo.description,
            is_private: gh_repo.private,
            is_fork: gh_repo.fork,
            url: gh_repo.html_url,
            creation_date: gh_repo.created_at,
            size: gh_repo.size,
            owner: Self::member(gh_repo.owner),
        })
    }

    fn to_state(state: &str) -> Result<IssueState, UnknownIssueState> {
        match state {
            "open" => Ok(IssueState::Open),
            "closed" => Ok(IssueState::Closed),
            other => Err(UnknownIssueState(other.to_string())),
        }
    }

    fn to_issue(gh_issue: GitHubIssue) -> GardenResult<Issue> {
        let state = Self::to_state(&gh_issue.state).map_err(|e| GardenError::mapping("issues", e))?;

        Ok(Issue {
            title: gh_issue.title,
            body: gh_issue.body,
            state,
            creation_date: gh_issue.created_at,
            author: Self::member(gh_issue.user),
            labels: gh_issue.labels.into_iter().map(|l| l.name).collect(),
        })
    }

    fn to_commit(gh_commit: GitHubCommit) -> GardenResult<Commit> {
        let author = gh_commit.commit.author.unwrap_or_default();
        let date = author.date.ok_or_else(|| {
            GardenError::mapping("commits", format!("commit {} has no author date", gh_commit.sha))
        })?;

        Ok(Commit {
            sha: gh_commit.sha,
            author: Member::named(author.name),
            message: gh_commit.commit.message,
            date,
        })
    }

    fn to_branch(gh_branch: GitHubBranch) -> GardenResult<Branch> {
        Ok(Branch {
            name: gh_branch.name,
            commit_sha: gh_branch.commit.sha,
            protected: gh_branch.protected,
        })
    }

    fn to_file(content: GitHubContent) -> GardenResult<File> {
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

impl Default for GitHubAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformAdapter for GitHubAdapter {
    fn platform(&self) -> Platform {
        Platform::GitHub
    }

    fn endpoint(&self, route: &Route) -> String {
        let path = match route {
            Route::Repositories => "user/repos?per_page=100".to_string(),
            Route::Issues => "issues?filter=all&state=all&per_page=100".to_string(),
            Route::Repository { owner, repo } => repo_path(owner, repo),
            Route::Commits { owner, repo } => format!("{}/commits?per_page=100", repo_path(owner, repo)),
            Route::Commit { owner, repo, sha } => format!("{}/commits/{sha}", repo_path(owner, repo)),
            Route::Branches { owner, repo } => format!("{}/branches?per_page=100", repo_path(owner, repo)),
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
        format!("Bearer {token}")
    }

    fn extract_repositories(&self, raw: &[u8]) -> GardenResult<Vec<Repository>> {
        decode_list(Platform::GitHub, "repositories", raw, Self::to_repository)
    }

    fn extract_issues(&self, raw: &[u8]) -> GardenResult<Vec<Issue>> {
        decode_list(Platform::GitHub, "issues", raw, Self::to_issue)
    }

    fn extract_commits(&self, raw: &[u8]) -> GardenResult<Vec<Commit>> {
        decode_list(Platform::GitHub, "commits", raw, Self::to_commit)
    }

    fn extract_branches(&self, raw: &[u8]) -> GardenResult<Vec<Branch>> {
        decode_list(Platform::GitHub, "branches", raw, Self::to_branch)
    }

    fn extract_files(&self, raw: &[u8]) -> GardenResult<Vec<File>> {
        decode_list(Platform::GitHub, "files", raw, Self::to_file)
    }

    fn extract_repository(&self, raw: &[u8]) -> GardenResult<Repository> {
        decode_one(Platform::GitHub, "repository", raw, Self::to_repository)
    }

    fn extract_commit(&self, raw: &[u8]) -> GardenResult<Commit> {
        decode_one(Platform::GitHub, "commit", raw, Self::to_commit)
    }

    fn extract_branch(&self, raw: &[u8]) -> GardenResult<Branch> {
        decode_one(Platform::GitHub, "branch", raw, Self::to_branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bytes(value: serde_json::Value) -> Vec<u8> {
        value.to_string().into_bytes()
    }

    fn repo_json() -> serde_json::Value {
        json!({
            "id": 1296269,
            "name": "Hello-World",
            "full_name": "octocat/Hello-World",
            "description": "This your first repo!",
            "private": false,
            "fork": true,
            "html_url": "https://github.com/octocat/Hello-World",
            "created_at": "2011-01-26T19:01:12Z",
            "size": 108,
            "owner": {
                "login": "octocat",
                "avatar_url": "https://github.com/images/error/octocat_happy.gif"
            }
        })
    }

    #[test]
    fn test_extract_repositories() {
        let adapter = GitHubAdapter::new();
        let repos = adapter.extract_repositories(&bytes(json!([repo_json()]))).unwrap();

        assert_eq!(repos.len(), 1);
        let repo = &repos[0];
        assert_eq!(repo.id, 1296269);
        assert_eq!(repo.name, "Hello-World");
        assert_eq!(repo.description.as_deref(), Some("This your first repo!"));
        assert!(!repo.is_private);
        assert!(repo.is_fork);
        assert_eq!(repo.url, "https://github.com/octocat/Hello-World");
        assert_eq!(repo.size, 108);
        assert_eq!(repo.owner.name, "octocat");
        assert_eq!(repo.creation_date.to_rfc3339(), "2011-01-26T19:01:12+00:00");
    }

    #[test]
    fn test_extract_repositories_missing_owner() {
        let mut repo = repo_json();
        repo.as_object_mut().unwrap().remove("owner");

        let repos = GitHubAdapter::new().extract_repositories(&bytes(json!([repo]))).unwrap();
        assert_eq!(repos[0].owner, Member::default());
    }

    #[test]
    fn test_extract_repositories_is_idempotent() {
        let adapter = GitHubAdapter::new();
        let raw = bytes(json!([repo_json(), repo_json()]));
        assert_eq!(
            adapter.extract_repositories(&raw).unwrap(),
            adapter.extract_repositories(&raw).unwrap()
        );
    }

    #[test]
    fn test_extract_repositories_error_envelope() {
        let raw = bytes(json!({"message": "Bad credentials", "documentation_url": "https://docs.github.com"}));
        let err = GitHubAdapter::new().extract_repositories(&raw).unwrap_err();
        assert!(matches!(err, GardenError::MalformedPayload { .. }));
    }

    #[test]
    fn test_extract_issues() {
        let raw = bytes(json!([{
            "title": "Found a bug",
            "body": null,
            "state": "closed",
            "created_at": "2011-04-22T13:33:48Z",
            "user": {"login": "octocat", "avatar_url": "https://a/1"},
            "labels": [{"name": "bug"}, {"name": "ui"}, {"name": "bug"}]
        }]));

        let issues = GitHubAdapter::new().extract_issues(&raw).unwrap();
        let issue = &issues[0];
        assert_eq!(issue.state, IssueState::Closed);
        assert_eq!(issue.body, None);
        assert_eq!(issue.author, Member::new("octocat", "https://a/1"));
        assert_eq!(issue.labels.len(), 2);
        assert!(issue.labels.contains("ui"));
    }

    #[test]
    fn test_extract_issues_rejects_unknown_state() {
        let raw = bytes(json!([{
            "title": "t",
            "state": "draft",
            "created_at": "2011-04-22T13:33:48Z",
            "user": null
        }]));

        let err = GitHubAdapter::new().extract_issues(&raw).unwrap_err();
        assert!(matches!(err, GardenError::UnexpectedMappingFailure { what: "issues", .. }));
    }

    #[test]
    fn test_extract_commits_has_no_photo() {
        let raw = bytes(json!([{
            "sha": "6dcb09b5b57875f334f61aebed695e2e4193db5e",
            "commit": {
                "message": "Fix all the bugs",
                "author": {"name": "Monalisa Octocat", "email": "m@github.com", "date": "2011-04-14T16:00:49Z"}
            },
            "author": {"login": "octocat", "avatar_url": "https://a/2"}
        }]));

        let commits = GitHubAdapter::new().extract_commits(&raw).unwrap();
        assert_eq!(commits[0].sha, "6dcb09b5b57875f334f61aebed695e2e4193db5e");
        assert_eq!(commits[0].author.name, "Monalisa Octocat");
        assert_eq!(commits[0].author.photo_url, "");
        assert_eq!(commits[0].message, "Fix all the bugs");
    }

    #[test]
    fn test_extract_branches_and_branch() {
        let branch = json!({"name": "main", "commit": {"sha": "abc", "url": "u"}, "protected": true});
        let adapter = GitHubAdapter::new();

        let branches = adapter.extract_branches(&bytes(json!([branch.clone()]))).unwrap();
        assert_eq!(branches[0], Branch { name: "main".into(), commit_sha: "abc".into(), protected: true });
        assert_eq!(adapter.extract_branch(&bytes(branch)).unwrap(), branches[0]);
    }

    #[test]
    fn test_extract_files() {
        let raw = bytes(json!([
            {"name": "README.md", "path": "README.md", "sha": "a1", "size": 12, "type": "file"},
            {"name": "src", "path": "src", "sha": "b2", "size": 0, "type": "dir"}
        ]));

        let files = GitHubAdapter::new().extract_files(&raw).unwrap();
        assert_eq!(files[0].kind, FileKind::File);
        assert_eq!(files[0].size, 12);
        assert_eq!(files[1].kind, FileKind::Dir);
    }

    #[test]
    fn test_extract_files_single_file_is_malformed() {
        let raw = bytes(json!({"name": "README.md", "path": "README.md", "sha": "a1", "size": 12, "type": "file"}));
        let err = GitHubAdapter::new().extract_files(&raw).unwrap_err();
        assert!(matches!(err, GardenError::MalformedPayload { what: "files", .. }));
    }

    #[test]
    fn test_endpoints() {
        let adapter = GitHubAdapter::with_api_url("https://ghe.example.com/api/v3/");
        assert_eq!(
            adapter.endpoint(&Route::Repositories),
            "https://ghe.example.com/api/v3/user/repos?per_page=100"
        );
        assert_eq!(
            adapter.endpoint(&Route::Files {
                owner: "o".into(),
                repo: "r".into(),
                path: "docs/a b.md".into()
            }),
            "https://ghe.example.com/api/v3/repos/o/r/contents/docs/a%20b.md"
        );
        assert_eq!(adapter.authorization("t0k"), "Bearer t0k");
    }

    #[test]
    fn test_endpoint_encodes_owner_and_repo() {
        let adapter = GitHubAdapter::new();
        assert_eq!(
            adapter.endpoint(&Route::Commits { owner: "o w".into(), repo: "r?x#y".into() }),
            "https://api.github.com/repos/o%20w/r%3Fx%23y/commits?per_page=100"
        );
    }
}
