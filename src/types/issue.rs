use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use super::Member;

/// Canonical issue state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// A platform reported an issue state with no canonical counterpart
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised issue state: {0}")]
pub struct UnknownIssueState(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub title: String,
    pub body: Option<String>,
    pub state: IssueState,
    pub creation_date: DateTime<Utc>,
    pub author: Member,
    pub labels: BTreeSet<String>,
}
