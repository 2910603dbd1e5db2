use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, ValueEnum};

use gallery::model::{FolderErrorPolicy, GalleryConfig};

use crate::Commands;

#[derive(Parser)]
#[command(name = "gallery")]
#[command(about = "Browse micro-app packages published in a repository folder", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    /// Append logs to this file (the TUI never logs to the terminal)
    #[arg(long, value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SourceArgs {
    /// JSON configuration file (defaults are used for anything it omits)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Content API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Repository owner
    #[arg(long, global = true)]
    owner: Option<String>,

    /// Repository name
    #[arg(long, global = true)]
    repo: Option<String>,

    /// Folder whose sub-folders are packages
    #[arg(long, global = true)]
    path: Option<String>,

    /// Access token attached to API requests
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Maximum folders fetched at once
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    /// Skip commit history (no created/updated timestamps)
    #[arg(long, global = true)]
    no_history: bool,

    /// What to do when a single folder cannot be listed
    #[arg(long, value_enum, global = true)]
    on_folder_error: Option<FolderErrorArg>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum FolderErrorArg {
    /// Show nothing if any folder fails
    Abort,
    /// Show the folder as a placeholder and keep the rest
    Placeholder,
}

impl From<FolderErrorArg> for FolderErrorPolicy {
    fn from(v: FolderErrorArg) -> Self {
        match v {
            FolderErrorArg::Abort => FolderErrorPolicy::Abort,
            FolderErrorArg::Placeholder => FolderErrorPolicy::Placeholder,
        }
    }
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli.source)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;

    match cli.command {
        None => {
            gallery::logging::init_file(cli.log_file.as_deref())?;
            let download_dir = std::env::current_dir().context("get current dir")?;
            gallery::tui::run_with_options(gallery::tui::TuiRunOptions {
                config,
                download_dir,
                runtime: runtime.handle().clone(),
            })?;
        }
        Some(command) => {
            match cli.log_file.as_deref() {
                Some(path) => gallery::logging::init_file(Some(path))?,
                None => gallery::logging::init_stderr()?,
            }
            crate::cli_exec::handle_command(command, config, &runtime)?
        }
    }

    Ok(())
}

pub(crate) fn resolve_config(args: &SourceArgs) -> Result<GalleryConfig> {
    let mut cfg = match &args.config {
        Some(path) => GalleryConfig::read(path)?,
        None => GalleryConfig::default(),
    };

    if let Some(v) = &args.api_url {
        cfg.api_url = v.clone();
    }
    if let Some(v) = &args.owner {
        cfg.owner = v.clone();
    }
    if let Some(v) = &args.repo {
        cfg.repo = v.clone();
    }
    if let Some(v) = &args.path {
        cfg.path = v.clone();
    }
    if let Some(v) = args.token.as_ref().filter(|t| !t.is_empty()) {
        cfg.token = Some(v.clone());
    }
    if let Some(n) = args.concurrency {
        cfg.max_concurrency = n;
    }
    if args.no_history {
        cfg.fetch_history = false;
    }
    if let Some(p) = args.on_folder_error {
        cfg.on_folder_error = p.into();
    }

    cfg.validate().context("invalid configuration")?;
    Ok(cfg)
}
