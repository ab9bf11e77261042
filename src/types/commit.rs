use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Member;

/// A commit, identified by its sha.
///
/// Commit payloads carry no avatar, so `author.photo_url` is always empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub author: Member,
    pub message: String,
    pub date: DateTime<Utc>,
}
