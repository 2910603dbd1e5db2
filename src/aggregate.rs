//! Discovery and per-folder aggregation into gallery records.
//!
//! A load lists the root folder, fans out one task per sub-folder (bounded by
//! `max_concurrency`), and publishes the assembled records as one snapshot.
//! Every load carries a generation number; a load that has been overtaken by
//! a newer one never publishes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Semaphore, watch};
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::error::GalleryError;
use crate::model::{FolderErrorPolicy, GalleryConfig, PackageRecord, Snapshot};
use crate::naming;
use crate::remote::ContentClient;

mod history;
mod select;

pub use self::history::{HistorySpan, history_span};
pub use self::select::{FileSelector, Selection};

#[derive(Clone, Debug)]
pub enum LoadOutcome {
    Published {
        records: Arc<[PackageRecord]>,
        failed_folders: usize,
    },
    /// A newer load started before this one finished; nothing was published.
    Superseded,
}

#[derive(Clone, Debug)]
pub struct LoadReport {
    pub generation: u64,
    pub outcome: LoadOutcome,
}

impl LoadReport {
    pub fn records(&self) -> Option<&[PackageRecord]> {
        match &self.outcome {
            LoadOutcome::Published { records, .. } => Some(&records[..]),
            LoadOutcome::Superseded => None,
        }
    }

    pub fn failed_folders(&self) -> usize {
        match &self.outcome {
            LoadOutcome::Published { failed_folders, .. } => *failed_folders,
            LoadOutcome::Superseded => 0,
        }
    }
}

enum Collected {
    Done {
        records: Vec<PackageRecord>,
        failed_folders: usize,
    },
    Superseded,
}

pub struct Aggregator {
    client: ContentClient,
    selector: Arc<FileSelector>,
    generation: AtomicU64,
    snapshot: watch::Sender<Snapshot>,
}

impl Aggregator {
    pub fn new(config: GalleryConfig) -> Result<Self, GalleryError> {
        config.validate().map_err(GalleryError::Config)?;
        let selector = FileSelector::new(&config).map_err(GalleryError::Config)?;
        let client = ContentClient::new(Arc::new(config)).map_err(GalleryError::Config)?;
        let (snapshot, _) = watch::channel(Snapshot::default());
        Ok(Self {
            client,
            selector: Arc::new(selector),
            generation: AtomicU64::new(0),
            snapshot,
        })
    }

    pub fn client(&self) -> &ContentClient {
        &self.client
    }

    pub fn config(&self) -> &GalleryConfig {
        self.client.config()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot.subscribe()
    }

    /// The most recently published record set.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }

    /// Discovers every folder and publishes a fresh record set.
    ///
    /// On failure the published set is replaced by an empty one and the
    /// error is returned. A load overtaken by a newer one reports
    /// `Superseded` whether it failed or not.
    pub async fn load(&self) -> Result<LoadReport, GalleryError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let span = tracing::info_span!("load", generation);
        self.load_generation(generation).instrument(span).await
    }

    async fn load_generation(&self, generation: u64) -> Result<LoadReport, GalleryError> {
        match self.collect(generation).await {
            Ok(Collected::Done {
                records,
                failed_folders,
            }) => {
                let records: Arc<[PackageRecord]> = Arc::from(records);
                if !self.commit(generation, records.clone(), failed_folders) {
                    tracing::debug!("superseded before publishing");
                    return Ok(LoadReport {
                        generation,
                        outcome: LoadOutcome::Superseded,
                    });
                }
                tracing::info!(records = records.len(), failed_folders, "published");
                Ok(LoadReport {
                    generation,
                    outcome: LoadOutcome::Published {
                        records,
                        failed_folders,
                    },
                })
            }
            Ok(Collected::Superseded) => {
                tracing::debug!("superseded while fetching folders");
                Ok(LoadReport {
                    generation,
                    outcome: LoadOutcome::Superseded,
                })
            }
            Err(err) if !self.is_current(generation) => {
                tracing::debug!(kind = err.kind(), error = %err, "superseded load failed");
                Ok(LoadReport {
                    generation,
                    outcome: LoadOutcome::Superseded,
                })
            }
            Err(err) => {
                tracing::warn!(kind = err.kind(), error = %err, "load failed; gallery emptied");
                self.commit(generation, Arc::from(Vec::new()), 0);
                Err(err)
            }
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Replaces the published snapshot when `generation` is still the latest
    /// load and newer than what is published.
    fn commit(
        &self,
        generation: u64,
        records: Arc<[PackageRecord]>,
        failed_folders: usize,
    ) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.snapshot.send_if_modified(|cur| {
            if generation <= cur.generation {
                return false;
            }
            *cur = Snapshot {
                generation,
                records,
                failed_folders,
            };
            true
        })
    }

    async fn collect(&self, generation: u64) -> Result<Collected, GalleryError> {
        let cfg = self.client.config();
        let root = self
            .client
            .list_root()
            .await
            .map_err(|cause| GalleryError::DiscoveryFailed { cause })?;

        let names: Vec<String> = root
            .into_iter()
            .filter(|e| e.is_dir())
            .map(|e| e.name)
            .collect();
        tracing::debug!(folders = names.len(), "discovered folders");

        let permits = Arc::new(Semaphore::new(cfg.max_concurrency));
        let mut tasks = JoinSet::new();
        for (idx, name) in names.iter().enumerate() {
            let client = self.client.clone();
            let selector = self.selector.clone();
            let permits = permits.clone();
            let name = name.clone();
            tasks.spawn(
                async move {
                    let record = match permits.acquire_owned().await {
                        Ok(_permit) => build_record(&client, &selector, &name).await,
                        Err(err) => Err(GalleryError::FolderFetchFailed {
                            folder: name,
                            cause: anyhow::Error::new(err),
                        }),
                    };
                    (idx, record)
                }
                .in_current_span(),
            );
        }

        let mut slots: Vec<Option<PackageRecord>> = vec![None; names.len()];
        let mut failed_folders = 0;
        while let Some(joined) = tasks.join_next().await {
            let (idx, record) = match joined {
                Ok(v) => v,
                Err(err) => {
                    return Err(GalleryError::FolderFetchFailed {
                        folder: "<task>".to_string(),
                        cause: anyhow::Error::new(err),
                    });
                }
            };

            match record {
                Ok(record) => slots[idx] = Some(record),
                Err(err) => match cfg.on_folder_error {
                    FolderErrorPolicy::Abort => return Err(err),
                    FolderErrorPolicy::Placeholder => {
                        tracing::warn!(folder = %names[idx], error = %err, "folder skipped");
                        failed_folders += 1;
                        slots[idx] = Some(placeholder(&names[idx], &err));
                    }
                },
            }

            if !self.is_current(generation) {
                return Ok(Collected::Superseded);
            }
        }

        Ok(Collected::Done {
            records: slots.into_iter().flatten().collect(),
            failed_folders,
        })
    }
}

async fn build_record(
    client: &ContentClient,
    selector: &FileSelector,
    name: &str,
) -> Result<PackageRecord, GalleryError> {
    let files = client
        .list_folder(name)
        .await
        .map_err(|cause| GalleryError::FolderFetchFailed {
            folder: name.to_string(),
            cause,
        })?;
    let picks = selector.select(&files);

    let span = if client.config().fetch_history {
        match folder_history(client, name).await {
            Ok(span) => span,
            Err(err) => {
                tracing::debug!(folder = name, error = %err, "no timestamps");
                None
            }
        }
    } else {
        None
    };

    let parts = naming::extract(name);
    let (created_at, updated_at) = match span {
        Some(s) => (Some(s.created_at), Some(s.updated_at)),
        None => (None, None),
    };
    Ok(PackageRecord {
        raw_name: name.to_string(),
        title: parts.title,
        tags: parts.tags,
        preview_ref: picks.preview_ref,
        readme_ref: picks.readme_ref,
        config_ref: picks.config_ref,
        created_at,
        updated_at,
        fetch_error: None,
    })
}

async fn folder_history(
    client: &ContentClient,
    name: &str,
) -> Result<Option<HistorySpan>, GalleryError> {
    let path = client.config().folder_path(name);
    let commits = client
        .list_commits(&path)
        .await
        .map_err(|cause| GalleryError::HistoryUnavailable {
            folder: name.to_string(),
            cause,
        })?;
    Ok(history_span(&commits))
}

fn placeholder(name: &str, err: &GalleryError) -> PackageRecord {
    let parts = naming::extract(name);
    PackageRecord {
        raw_name: name.to_string(),
        title: parts.title,
        tags: parts.tags,
        preview_ref: None,
        readme_ref: None,
        config_ref: None,
        created_at: None,
        updated_at: None,
        fetch_error: Some(err.to_string()),
    }
}

#[cfg(test)]
#[path = "tests/aggregate_tests.rs"]
mod tests;
