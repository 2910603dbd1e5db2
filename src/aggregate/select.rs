use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};

use crate::model::GalleryConfig;
use crate::remote::{DirectoryEntry, encode_brackets};

/// The three references a folder can contribute to its record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub preview_ref: Option<String>,
    pub readme_ref: Option<String>,
    pub config_ref: Option<String>,
}

/// Picks preview, readme and configuration files out of a folder listing.
///
/// Each pick is the first matching file in listing order.
#[derive(Debug)]
pub struct FileSelector {
    preview: GlobMatcher,
    config: GlobMatcher,
    readme_name: String,
}

impl FileSelector {
    pub fn new(cfg: &GalleryConfig) -> Result<Self> {
        let preview = Glob::new(&cfg.preview_pattern)
            .with_context(|| format!("compile preview pattern {:?}", cfg.preview_pattern))?
            .compile_matcher();
        let config = Glob::new(&cfg.config_pattern)
            .with_context(|| format!("compile config pattern {:?}", cfg.config_pattern))?
            .compile_matcher();
        Ok(Self {
            preview,
            config,
            readme_name: cfg.readme_name.clone(),
        })
    }

    pub fn select(&self, files: &[DirectoryEntry]) -> Selection {
        let mut files = files.iter().filter(|e| !e.is_dir());

        let preview = files.clone().find(|f| self.preview.is_match(&f.name));
        let readme = files
            .clone()
            .find(|f| f.name.eq_ignore_ascii_case(&self.readme_name));
        let config = files.find(|f| self.config.is_match(&f.name));

        Selection {
            preview_ref: preview.and_then(|f| f.download_url.as_deref()).map(encode_brackets),
            readme_ref: readme.and_then(|f| f.html_url.as_deref()).map(encode_brackets),
            config_ref: config.and_then(|f| f.download_url.as_deref()).map(encode_brackets),
        }
    }
}
