//! PlatformAdapter trait - unified interface over platform payloads
//!
//! Each platform returns repositories, issues, commits, branches and files in
//! its own JSON dialect. An adapter turns those raw bodies into the canonical
//! model in `crate::types`, and knows where each resource lives and how the
//! platform expects its token to be presented.
//!
//! Extraction is pure: the body has already been fetched by a `RawClient`.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{GardenError, GardenResult};
use crate::types::{Branch, Commit, File, Issue, Platform, Repository};

/// A resource the dispatcher can fetch for an authenticated user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Repositories the user belongs to
    Repositories,
    /// Issues visible to the user
    Issues,
    Repository { owner: String, repo: String },
    Commits { owner: String, repo: String },
    Commit { owner: String, repo: String, sha: String },
    Branches { owner: String, repo: String },
    Branch { owner: String, repo: String, branch: String },
    /// Directory listing; an empty path is the repository root
    Files { owner: String, repo: String, path: String },
}

/// Unified interface over platform payloads
///
/// Implemented by:
/// - GitHubAdapter
/// - GitLabAdapter
/// - GiteaAdapter
pub trait PlatformAdapter: Send + Sync {
    fn platform(&self) -> Platform;

    /// Absolute URL of `route` on this platform's API
    fn endpoint(&self, route: &Route) -> String;

    /// Value for the `Authorization` header carrying `token`
    fn authorization(&self, token: &str) -> String;

    fn extract_repositories(&self, raw: &[u8]) -> GardenResult<Vec<Repository>>;

    fn extract_issues(&self, raw: &[u8]) -> GardenResult<Vec<Issue>>;

    fn extract_commits(&self, raw: &[u8]) -> GardenResult<Vec<Commit>>;

    fn extract_branches(&self, raw: &[u8]) -> GardenResult<Vec<Branch>>;

    fn extract_files(&self, raw: &[u8]) -> GardenResult<Vec<File>>;

    fn extract_repository(&self, raw: &[u8]) -> GardenResult<Repository>;

    fn extract_commit(&self, raw: &[u8]) -> GardenResult<Commit>;

    fn extract_branch(&self, raw: &[u8]) -> GardenResult<Branch>;
}

/// Decode a JSON list body into DTOs and map each one.
///
/// A body that is not a JSON list is `MalformedPayload`; an element that
/// does not fit the DTO, or that `map` rejects, is `UnexpectedMappingFailure`.
pub(crate) fn decode_list<D, T>(
    platform: Platform,
    what: &'static str,
    raw: &[u8],
    map: impl Fn(D) -> GardenResult<T>,
) -> GardenResult<Vec<T>>
where
    D: DeserializeOwned,
{
    let values: Vec<serde_json::Value> = serde_json::from_slice(raw).map_err(|e| {
        warn!(platform = %platform, what, error = %e, "payload is not a list");
        GardenError::malformed(what, e)
    })?;

    let items = values
        .into_iter()
        .map(|value| decode_value(platform, what, value, &map))
        .collect::<GardenResult<Vec<T>>>()?;

    debug!(platform = %platform, what, count = items.len(), "extracted");
    Ok(items)
}

/// Decode a single JSON object body into a DTO and map it.
pub(crate) fn decode_one<D, T>(
    platform: Platform,
    what: &'static str,
    raw: &[u8],
    map: impl Fn(D) -> GardenResult<T>,
) -> GardenResult<T>
where
    D: DeserializeOwned,
{
    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(raw)
        .map_err(|e| {
            warn!(platform = %platform, what, error = %e, "payload is not an object");
            GardenError::malformed(what, e)
        })?;

    decode_value(platform, what, serde_json::Value::Object(object), &map)
}

fn decode_value<D, T>(
    platform: Platform,
    what: &'static str,
    value: serde_json::Value,
    map: &impl Fn(D) -> GardenResult<T>,
) -> GardenResult<T>
where
    D: DeserializeOwned,
{
    let dto: D = serde_json::from_value(value).map_err(|e| {
        warn!(platform = %platform, what, error = %e, "element does not match DTO");
        GardenError::mapping(what, e)
    })?;

    map(dto)
}

/// Join `base` and `path` with exactly one slash
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Encode each segment of a repository path, keeping the separators
pub(crate) fn encode_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// `repos/{owner}/{repo}` with both segments percent-encoded
pub(crate) fn repo_path(owner: &str, repo: &str) -> String {
    format!("repos/{}/{}", urlencoding::encode(owner), urlencoding::encode(repo))
}

/// Platforms that send `""` for an unset description
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
