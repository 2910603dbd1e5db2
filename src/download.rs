//! Saving a package's configuration file locally.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::GalleryError;
use crate::model::PackageRecord;
use crate::naming::config_file_name;
use crate::remote::ContentClient;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedConfig {
    pub path: PathBuf,
    pub bytes: u64,
    /// blake3 of the saved content, hex encoded.
    pub digest: String,
}

/// Fetches `record`'s configuration file and writes it into `dir` as
/// `<slugged title>-config.json`, replacing any previous download.
pub async fn download_config(
    client: &ContentClient,
    record: &PackageRecord,
    dir: &Path,
) -> Result<SavedConfig, GalleryError> {
    let fail = |cause: anyhow::Error| GalleryError::DownloadFetchFailed {
        name: record.raw_name.clone(),
        cause,
    };

    let url = record
        .config_ref
        .as_deref()
        .ok_or_else(|| fail(anyhow::anyhow!("package has no configuration file")))?;
    let bytes = client.fetch_raw(url).await.map_err(fail)?;

    if let Err(err) = serde_json::from_slice::<serde_json::Value>(&bytes) {
        tracing::warn!(
            package = %record.raw_name,
            error = %err,
            "configuration is not valid json"
        );
    }

    let path = dir.join(config_file_name(&record.title));
    write_atomic(&path, &bytes).map_err(fail)?;
    let digest = blake3::hash(&bytes).to_hex().to_string();
    tracing::info!(
        package = %record.raw_name,
        path = %path.display(),
        %digest,
        "configuration saved"
    );

    Ok(SavedConfig {
        path,
        bytes: bytes.len() as u64,
        digest,
    })
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
