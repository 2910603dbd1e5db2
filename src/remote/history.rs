use super::*;

impl ContentClient {
    /// Commits touching `path`, newest first as the API returns them.
    pub async fn list_commits(&self, path: &str) -> Result<Vec<CommitEntry>> {
        let url = self.repo_url("commits");
        let url = url.as_str();
        let label = format!("history {}", path);
        with_retries(&label, self.config.retries, || async move {
            let resp = self
                .get(url)
                .query(&[("path", path)])
                .send()
                .await
                .context("send")?;
            self.ensure_ok(resp, "list commits")?
                .json::<Vec<CommitEntry>>()
                .await
                .context("parse commits")
        })
        .await
    }
}
