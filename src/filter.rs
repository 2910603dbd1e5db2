//! Visible-subset computation for the gallery: free-text search plus tag picker.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::PackageRecord;

/// How a selection of several tags is combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TagPolicy {
    /// A record is shown when it carries any of the selected tags.
    #[default]
    Any,
    /// A record is shown only when it carries every selected tag.
    All,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    pub tags: BTreeSet<String>,
    pub policy: TagPolicy,
}

impl Query {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_policy(mut self, policy: TagPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Selects the tag if absent, deselects it otherwise.
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.tags.remove(tag) {
            self.tags.insert(tag.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.tags.is_empty()
    }

    pub fn matches(&self, record: &PackageRecord) -> bool {
        matches_text(record, &self.text) && self.matches_tags(record)
    }

    fn matches_tags(&self, record: &PackageRecord) -> bool {
        if self.tags.is_empty() {
            return true;
        }
        match self.policy {
            TagPolicy::Any => self.tags.iter().any(|t| record.has_tag(t)),
            TagPolicy::All => self.tags.iter().all(|t| record.has_tag(t)),
        }
    }
}

fn matches_text(record: &PackageRecord, text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return true;
    }
    let q = text.to_lowercase();
    record.title.to_lowercase().contains(&q)
        || record.tags.iter().any(|t| t.to_lowercase().contains(&q))
}

/// Records matching `query`, in their original order.
pub fn visible<'a>(records: &'a [PackageRecord], query: &Query) -> Vec<&'a PackageRecord> {
    records.iter().filter(|r| query.matches(r)).collect()
}

/// Every tag used by any record, deduplicated and sorted.
pub fn all_tags(records: &[PackageRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|r| r.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Number of records carrying each tag; a record repeating a tag counts once.
pub fn tag_counts(records: &[PackageRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for r in records {
        let own: BTreeSet<&String> = r.tags.iter().collect();
        for t in own {
            *counts.entry(t.clone()).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod tests;
