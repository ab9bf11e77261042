use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    /// Sha of the branch head
    pub commit_sha: String,
    pub protected: bool,
}

/// Kind of entry in a repository listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Dir,
    Symlink,
    Submodule,
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub name: String,
    pub path: String,
    /// Blob or tree sha
    pub sha: String,
    pub kind: FileKind,
    /// Bytes; 0 where the platform does not report sizes in listings (GitLab)
    pub size: u64,
}
