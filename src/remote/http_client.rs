use std::future::Future;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use super::*;

const ACCEPT_V3: &str = "application/vnd.github.v3+json";

/// Characters escaped inside a single URL path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b']')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub fn encode_segment(s: &str) -> String {
    utf8_percent_encode(s, SEGMENT).to_string()
}

/// Escapes literal square brackets so a reference survives being embedded in
/// a link target.
pub fn encode_brackets(s: &str) -> String {
    s.replace('[', "%5B").replace(']', "%5D")
}

pub(super) async fn with_retries<T, F, Fut>(label: &str, retries: u32, mut f: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = retries.saturating_add(1);
    let mut last: Option<anyhow::Error> = None;
    for i in 0..attempts {
        match f().await {
            Ok(v) => return Ok(v),
            Err(err) => {
                tracing::debug!(
                    label,
                    attempt = i + 1,
                    error = %format!("{:#}", err),
                    "request failed"
                );
                last = Some(err);
                if i + 1 < attempts {
                    tokio::time::sleep(Duration::from_millis(200 * (1 << i.min(6)))).await;
                }
            }
        }
    }
    Err(last
        .unwrap_or_else(|| anyhow::anyhow!("unknown error"))
        .context(label.to_string()))
}

impl ContentClient {
    pub(super) fn ensure_ok(
        &self,
        resp: reqwest::Response,
        label: &str,
    ) -> Result<reqwest::Response> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            anyhow::bail!(
                "{}: unauthorized (token invalid or expired; check GITHUB_TOKEN)",
                label
            );
        }
        if status == reqwest::StatusCode::FORBIDDEN {
            let exhausted = resp
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                == Some("0");
            if exhausted {
                anyhow::bail!("{}: rate limit exhausted (set a token to raise it)", label);
            }
            anyhow::bail!("{}: forbidden", label);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            anyhow::bail!("{}: not found", label);
        }
        resp.error_for_status()
            .with_context(|| format!("{} status", label))
    }

    /// Adds the API headers, and the credential when the target is one of the
    /// configured hosts.
    pub(super) fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, ACCEPT_V3);
        if let Some(token) = self.config.token.as_deref().filter(|t| !t.is_empty())
            && self.is_trusted(url)
        {
            req = req.header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token));
        }
        req
    }

    /// Same scheme, host and port as the API or raw host.
    pub(super) fn is_trusted(&self, url: &str) -> bool {
        let Ok(target) = reqwest::Url::parse(url) else {
            return false;
        };
        let target = target.origin();
        [&self.config.api_url, &self.config.raw_url]
            .into_iter()
            .filter_map(|base| reqwest::Url::parse(base).ok())
            .any(|base| base.origin() == target)
    }

    pub(super) fn repo_url(&self, tail: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.config.api_url.trim_end_matches('/'),
            encode_segment(&self.config.owner),
            encode_segment(&self.config.repo),
            tail
        )
    }

    pub(super) fn contents_url(&self, path: &str) -> String {
        let encoded = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(encode_segment)
            .collect::<Vec<_>>()
            .join("/");
        self.repo_url(&format!("contents/{}", encoded))
    }
}

#[cfg(test)]
#[path = "../tests/remote/http_client_tests.rs"]
mod tests;
