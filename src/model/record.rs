use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One gallery entry, derived from a single top-level folder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub raw_name: String,
    pub title: String,
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_ref: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    /// Set only on placeholder records whose folder listing failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,
}

impl PackageRecord {
    pub fn is_placeholder(&self) -> bool {
        self.fetch_error.is_some()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Matches either the raw folder name or the display title, ignoring case.
    pub fn matches_name(&self, name: &str) -> bool {
        self.raw_name == name
            || self.title == name
            || self.raw_name.eq_ignore_ascii_case(name)
            || self.title.eq_ignore_ascii_case(name)
    }
}

/// The published record set at one point in time.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub generation: u64,
    pub records: Arc<[PackageRecord]>,
    pub failed_folders: usize,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            generation: 0,
            records: Arc::from(Vec::new()),
            failed_folders: 0,
        }
    }
}

impl Snapshot {
    pub fn find(&self, name: &str) -> Option<&PackageRecord> {
        self.records
            .iter()
            .find(|r| r.raw_name == name)
            .or_else(|| self.records.iter().find(|r| r.matches_name(name)))
    }
}
