use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Where the gallery reads from and how it talks to the content API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub api_url: String,
    /// Prefix of human-facing file pages (`html_url`).
    pub html_url: String,
    /// Prefix of raw file content.
    pub raw_url: String,

    pub owner: String,
    pub repo: String,
    /// Root folder whose sub-folders become records. Not percent-encoded.
    pub path: String,

    // Usually supplied through the environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    pub preview_pattern: String,
    pub config_pattern: String,
    pub readme_name: String,

    pub fetch_history: bool,
    pub max_concurrency: usize,
    pub on_folder_error: FolderErrorPolicy,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    pub retries: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            html_url: "https://github.com".to_string(),
            raw_url: "https://raw.githubusercontent.com".to_string(),
            owner: "lumapps-marketplace".to_string(),
            repo: "lumapps-extension-code-sample".to_string(),
            path: "micro-app/micro-app/Plug and play".to_string(),
            token: None,
            preview_pattern: "*.png".to_string(),
            config_pattern: "*.json".to_string(),
            readme_name: "readme.md".to_string(),
            fetch_history: true,
            max_concurrency: 8,
            on_folder_error: FolderErrorPolicy::default(),
            request_timeout_secs: None,
            retries: 0,
        }
    }
}

/// What a load does when one folder's listing call fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FolderErrorPolicy {
    /// Abandon the whole load; the gallery shows nothing.
    #[default]
    Abort,
    /// Keep going; the folder becomes a record carrying the error.
    Placeholder,
}

impl GalleryConfig {
    pub fn read(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read config {}", path.display()))?;
        let cfg: GalleryConfig = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse config {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.owner.trim().is_empty() || self.repo.trim().is_empty() {
            anyhow::bail!("owner and repo must be set");
        }
        if self.max_concurrency == 0 {
            anyhow::bail!("max_concurrency must be at least 1");
        }
        globset::Glob::new(&self.preview_pattern)
            .with_context(|| format!("invalid preview_pattern {:?}", self.preview_pattern))?;
        globset::Glob::new(&self.config_pattern)
            .with_context(|| format!("invalid config_pattern {:?}", self.config_pattern))?;
        Ok(())
    }

    /// `path` with surrounding slashes removed.
    pub fn root_path(&self) -> &str {
        self.path.trim_matches('/')
    }

    pub fn folder_path(&self, folder: &str) -> String {
        let root = self.root_path();
        if root.is_empty() {
            folder.to_string()
        } else {
            format!("{}/{}", root, folder)
        }
    }
}
