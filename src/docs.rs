//! Documentation loading: raw readme retrieval and image reference rewriting.

use std::borrow::Cow;
use std::sync::OnceLock;

use percent_encoding::percent_decode_str;
use regex::{Captures, Regex};

use crate::error::GalleryError;
use crate::model::{GalleryConfig, PackageRecord};
use crate::remote::{ContentClient, encode_segment};

mod render;
pub use self::render::render_lines;

/// Fetches a record's readme and rewrites its `<img>` tags into markdown
/// images that resolve against the package folder.
pub async fn load_doc(
    client: &ContentClient,
    record: &PackageRecord,
) -> Result<String, GalleryError> {
    let fail = |cause: anyhow::Error| GalleryError::DocFetchFailed {
        name: record.raw_name.clone(),
        cause,
    };

    let readme = record
        .readme_ref
        .as_deref()
        .ok_or_else(|| fail(anyhow::anyhow!("package has no readme")))?;
    let url = raw_url(client.config(), readme);
    tracing::debug!(package = %record.raw_name, %url, "loading readme");

    let text = client.fetch_text(&url).await.map_err(fail)?;
    let folder = image_folder(record, &url);
    Ok(rewrite_images(&text, folder))
}

/// Turns a human-facing file page URL into the URL of its raw content.
///
/// `{html}/{owner}/{repo}/blob/{ref}/{path}` becomes
/// `{raw}/{owner}/{repo}/{ref}/{path}`. Anything else is returned as is.
pub fn raw_url(cfg: &GalleryConfig, html_url: &str) -> String {
    let html_base = cfg.html_url.trim_end_matches('/');
    let raw_base = cfg.raw_url.trim_end_matches('/');

    let Some(rest) = html_url
        .strip_prefix(html_base)
        .and_then(|r| r.strip_prefix('/'))
    else {
        return html_url.to_string();
    };

    let mut parts = rest.splitn(4, '/');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(repo), Some("blob" | "raw"), Some(tail)) if !tail.is_empty() => {
            format!("{}/{}/{}/{}", raw_base, owner, repo, tail)
        }
        _ => html_url.to_string(),
    }
}

/// Folder part of a file URL (everything before the last `/`).
pub fn folder_of(url: &str) -> Option<&str> {
    url.rsplit_once('/').map(|(dir, _)| dir)
}

fn image_folder<'a>(record: &'a PackageRecord, readme_raw: &'a str) -> &'a str {
    record
        .preview_ref
        .as_deref()
        .and_then(folder_of)
        .or_else(|| folder_of(readme_raw))
        .unwrap_or_default()
}

fn img_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)<img\b[^>]*?\bsrc\s*=\s*"([^"]*)"[^>]*>"#).expect("valid img regex")
    })
}

/// Replaces `<img src="NAME">` tags with `![NAME](folder/NAME)`.
///
/// NAME is percent-decoded first and re-encoded once when composed into the
/// link, so already-encoded names are not encoded twice. Absolute sources
/// keep pointing at themselves.
pub fn rewrite_images(markdown: &str, folder: &str) -> String {
    let folder = folder.trim_end_matches('/');
    img_tag()
        .replace_all(markdown, |caps: &Captures<'_>| {
            let src = &caps[1];
            let name: Cow<'_, str> = percent_decode_str(src).decode_utf8_lossy();
            if src.starts_with("http://") || src.starts_with("https://") {
                return format!("![{}]({})", name, src);
            }
            let rel = name.trim_start_matches("./");
            let encoded = rel
                .split('/')
                .map(encode_segment)
                .collect::<Vec<_>>()
                .join("/");
            if folder.is_empty() {
                format!("![{}]({})", rel, encoded)
            } else {
                format!("![{}]({}/{})", rel, folder, encoded)
            }
        })
        .into_owned()
}

#[cfg(test)]
#[path = "tests/docs_tests.rs"]
mod tests;
