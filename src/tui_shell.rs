use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::aggregate::{Aggregator, LoadReport};
use crate::download::SavedConfig;
use crate::filter::{Query, TagPolicy};
use crate::model::{PackageRecord, Snapshot};
use crate::tui::TuiRunOptions;

mod app;
use app::App;

mod event_loop;
use event_loop::run_loop;

mod input;
use input::Input;

mod render;

pub(crate) fn run(opts: TuiRunOptions) -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("TUI requires an interactive terminal (TTY); use a subcommand instead");
    }

    let mut app = App::new(opts)?;

    let mut stdout = io::stdout();
    enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    app.refresh();
    let res = run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Focus {
    Search,
    Packages,
    Tags,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Search => Focus::Packages,
            Focus::Packages => Focus::Tags,
            Focus::Tags => Focus::Search,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Search => Focus::Tags,
            Focus::Packages => Focus::Search,
            Focus::Tags => Focus::Packages,
        }
    }
}

/// Results of background work, delivered to the event loop.
#[derive(Debug)]
enum AppEvent {
    Loaded(std::result::Result<LoadReport, String>),
    Doc {
        raw_name: String,
        result: std::result::Result<String, String>,
    },
    Downloaded {
        raw_name: String,
        result: std::result::Result<SavedConfig, String>,
    },
}

#[derive(Debug)]
enum DocState {
    Loading,
    Ready(String),
    Failed(String),
}

#[derive(Debug)]
struct DocModal {
    raw_name: String,
    title: String,
    state: DocState,
    scroll: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Status {
    text: String,
    error: bool,
}
