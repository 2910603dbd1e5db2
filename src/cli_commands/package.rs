use std::path::PathBuf;

use clap::Args;

#[derive(Args)]
pub(crate) struct ReadmeArgs {
    /// Folder name or title
    pub(crate) name: String,
    /// Print as wrapped plain text instead of markdown
    #[arg(long)]
    pub(crate) plain: bool,
    /// Line width for --plain
    #[arg(long, default_value_t = 100)]
    pub(crate) width: usize,
}

#[derive(Args)]
pub(crate) struct DownloadArgs {
    /// Folder name or title
    pub(crate) name: String,
    /// Directory to save into (defaults to current directory)
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}
