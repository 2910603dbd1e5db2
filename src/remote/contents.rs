//! Directory listings (`/contents/{path}`).

use super::*;

impl ContentClient {
    /// Lists the immediate children of `path` (relative to the repository
    /// root, not percent-encoded).
    pub async fn list_dir(&self, path: &str) -> Result<Vec<DirectoryEntry>> {
        let url = self.contents_url(path);
        let url = url.as_str();
        let label = format!("list {}", path);
        let body: serde_json::Value = with_retries(&label, self.config.retries, || async move {
            let resp = self.get(url).send().await.context("send")?;
            self.ensure_ok(resp, "list contents")?
                .json()
                .await
                .context("parse listing json")
        })
        .await?;

        if !body.is_array() {
            anyhow::bail!("{} did not return a directory listing", path);
        }
        let entries: Vec<DirectoryEntry> =
            serde_json::from_value(body).context("parse directory entries")?;
        Ok(entries)
    }

    /// Lists the configured root folder.
    pub async fn list_root(&self) -> Result<Vec<DirectoryEntry>> {
        let root = self.config.root_path().to_string();
        self.list_dir(&root).await
    }

    /// Lists one sub-folder of the configured root.
    pub async fn list_folder(&self, folder: &str) -> Result<Vec<DirectoryEntry>> {
        let path = self.config.folder_path(folder);
        self.list_dir(&path).await
    }
}
