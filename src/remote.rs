use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::model::GalleryConfig;

mod http_client;
use self::http_client::with_retries;
pub use self::http_client::{encode_brackets, encode_segment};

mod types;
pub use self::types::*;
mod contents;
mod history;
mod raw;

/// Read-only client for the content-hosting API.
///
/// Cheap to clone: the underlying connection pool and the configuration are
/// shared.
#[derive(Clone)]
pub struct ContentClient {
    config: Arc<GalleryConfig>,
    client: reqwest::Client,
}

impl ContentClient {
    pub fn new(config: Arc<GalleryConfig>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent("gallery");
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("build reqwest client")?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }
}
