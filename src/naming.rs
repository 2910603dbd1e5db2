//! Folder-name parsing: `"[UI] Widget A"` -> title `"Widget A"`, tags `["UI"]`.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameParts {
    pub title: String,
    pub tags: Vec<String>,
}

/// Splits a raw folder name into a display title and its bracketed tags.
///
/// Tags are scanned left to right; the first `]` after a `[` closes the
/// tag, so brackets never nest. A `[` without a closing `]` is kept in the
/// title. The title is only trimmed at its ends: whitespace left behind by
/// a removed tag in the middle of the name stays as it is.
pub fn extract(raw_name: &str) -> NameParts {
    let mut title = String::with_capacity(raw_name.len());
    let mut tags = Vec::new();
    let mut rest = raw_name;

    while let Some(open) = rest.find('[') {
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find(']') else {
            break;
        };
        title.push_str(&rest[..open]);
        tags.push(after_open[..close].to_string());
        rest = &after_open[close + 1..];
    }
    title.push_str(rest);

    NameParts {
        title: title.trim().to_string(),
        tags,
    }
}

/// File name a downloaded configuration is saved under.
pub fn config_file_name(title: &str) -> String {
    let slug = title
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "config.json".to_string()
    } else {
        format!("{}-config.json", slug)
    }
}

#[cfg(test)]
#[path = "tests/naming_tests.rs"]
mod tests;
