//! Payload types of the content-hosting API. Only the fields the gallery reads
//! are modelled; everything else in the upstream JSON is ignored.

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks, submodules and anything newer.
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct DirectoryEntry {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: EntryKind,

    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

impl DirectoryEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CommitEntry {
    pub commit: CommitDetail,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CommitDetail {
    #[serde(default)]
    pub committer: Option<Signature>,
    #[serde(default)]
    pub author: Option<Signature>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub date: Option<String>,
}

impl CommitEntry {
    /// Committer date, or the author date when the committer is missing.
    pub fn timestamp(&self) -> Option<&str> {
        let committer = self.commit.committer.as_ref().and_then(|s| s.date.as_deref());
        committer.or_else(|| self.commit.author.as_ref().and_then(|s| s.date.as_deref()))
    }
}
