use std::path::PathBuf;

use anyhow::Result;

use crate::model::GalleryConfig;

#[derive(Clone, Debug)]
pub struct TuiRunOptions {
    pub config: GalleryConfig,
    /// Where downloaded configuration files are written.
    pub download_dir: PathBuf,
    /// Runtime the loads and downloads are spawned on.
    pub runtime: tokio::runtime::Handle,
}

pub fn run_with_options(opts: TuiRunOptions) -> Result<()> {
    crate::tui_shell::run(opts)
}
