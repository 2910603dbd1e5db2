use super::*;

impl ContentClient {
    /// Raw bytes behind a download reference.
    pub async fn fetch_raw(&self, url: &str) -> Result<Vec<u8>> {
        let label = format!("fetch {}", url);
        with_retries(&label, self.config.retries, || async move {
            let resp = self.get(url).send().await.context("send")?;
            let bytes = self
                .ensure_ok(resp, "fetch raw content")?
                .bytes()
                .await
                .context("read body")?;
            Ok(bytes.to_vec())
        })
        .await
    }

    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let bytes = self.fetch_raw(url).await?;
        String::from_utf8(bytes).with_context(|| format!("{} is not utf-8 text", url))
    }
}
