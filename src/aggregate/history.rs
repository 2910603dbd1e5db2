use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::remote::CommitEntry;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistorySpan {
    pub created_at: String,
    pub updated_at: String,
}

/// Oldest and newest commit timestamps.
///
/// Entries without a parseable date are skipped; `None` when nothing is left.
pub fn history_span(commits: &[CommitEntry]) -> Option<HistorySpan> {
    let mut oldest: Option<(OffsetDateTime, &str)> = None;
    let mut newest: Option<(OffsetDateTime, &str)> = None;

    for c in commits {
        let Some(raw) = c.timestamp() else {
            continue;
        };
        let Ok(at) = OffsetDateTime::parse(raw, &Rfc3339) else {
            continue;
        };
        if oldest.is_none_or(|(t, _)| at < t) {
            oldest = Some((at, raw));
        }
        if newest.is_none_or(|(t, _)| at > t) {
            newest = Some((at, raw));
        }
    }

    match (oldest, newest) {
        (Some((_, created)), Some((_, updated))) => Some(HistorySpan {
            created_at: created.to_string(),
            updated_at: updated.to_string(),
        }),
        _ => None,
    }
}
