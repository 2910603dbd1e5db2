//! Timestamp display helpers shared by the CLI and the TUI.

use std::sync::OnceLock;

use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::format_description::well_known::Rfc3339;

fn ui_format() -> &'static [FormatItem<'static>] {
    static FMT: OnceLock<Vec<FormatItem<'static>>> = OnceLock::new();
    FMT.get_or_init(|| {
        time::format_description::parse(
            "[year]-[month repr:numerical padding:zero]-[day padding:zero] [hour padding:zero]:[minute padding:zero]Z",
        )
        .expect("valid time format")
    })
}

/// `2024-05-20 08:30Z`, or `None` when `ts` is not RFC 3339.
pub fn fmt_abs(ts: &str) -> Option<String> {
    let dt = OffsetDateTime::parse(ts, &Rfc3339).ok()?;
    dt.to_offset(time::UtcOffset::UTC).format(ui_format()).ok()
}

/// `5m ago`, `3h ago`, `4d ago`; `None` for future or older-than-two-weeks
/// timestamps, which read better as absolute dates.
pub fn fmt_since(ts: &str, now: OffsetDateTime) -> Option<String> {
    let dt = OffsetDateTime::parse(ts, &Rfc3339).ok()?;
    let secs = (now - dt).whole_seconds();
    if secs < 0 {
        return None;
    }

    let mins = secs / 60;
    let hours = mins / 60;
    let days = hours / 24;

    let s = if secs < 60 {
        "just now".to_string()
    } else if mins < 60 {
        format!("{}m ago", mins)
    } else if hours < 48 {
        format!("{}h ago", hours)
    } else if days < 14 {
        format!("{}d ago", days)
    } else {
        return None;
    };
    Some(s)
}

/// Relative when recent, absolute otherwise, raw text as a last resort.
pub fn fmt_ts(ts: &str, now: OffsetDateTime) -> String {
    fmt_since(ts, now)
        .or_else(|| fmt_abs(ts))
        .unwrap_or_else(|| ts.to_string())
}

#[cfg(test)]
#[path = "tests/timefmt_tests.rs"]
mod tests;
