use tokio::sync::{mpsc, watch};

use super::*;

pub(super) struct App {
    aggregator: Arc<Aggregator>,
    runtime: tokio::runtime::Handle,
    download_dir: PathBuf,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    snapshot_rx: watch::Receiver<Snapshot>,

    pub(super) snapshot: Snapshot,
    pub(super) query: Query,
    pub(super) search: Input,
    pub(super) focus: Focus,

    pub(super) all_tags: Vec<(String, usize)>,
    pub(super) tag_cursor: usize,

    /// Indices into `snapshot.records` of the records passing `query`.
    pub(super) visible: Vec<usize>,
    pub(super) selected: usize,

    pub(super) loads_in_flight: usize,
    pub(super) status: Option<Status>,
    pub(super) modal: Option<DocModal>,
    pub(super) quit: bool,
}

impl App {
    pub(super) fn new(opts: TuiRunOptions) -> Result<Self> {
        let aggregator = Arc::new(Aggregator::new(opts.config)?);
        let snapshot_rx = aggregator.subscribe();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut app = Self {
            aggregator,
            runtime: opts.runtime,
            download_dir: opts.download_dir,
            events_tx,
            events_rx,
            snapshot_rx,
            snapshot: Snapshot::default(),
            query: Query::default(),
            search: Input::default(),
            focus: Focus::Search,
            all_tags: Vec::new(),
            tag_cursor: 0,
            visible: Vec::new(),
            selected: 0,
            loads_in_flight: 0,
            status: None,
            modal: None,
            quit: false,
        };
        app.recompute();
        Ok(app)
    }

    pub(super) fn source_label(&self) -> String {
        let cfg = self.aggregator.config();
        format!("{}/{}:{}", cfg.owner, cfg.repo, cfg.root_path())
    }

    pub(super) fn selected_record(&self) -> Option<&PackageRecord> {
        let idx = *self.visible.get(self.selected)?;
        self.snapshot.records.get(idx)
    }

    pub(super) fn visible_records(&self) -> impl Iterator<Item = &PackageRecord> + '_ {
        self.visible
            .iter()
            .filter_map(|&i| self.snapshot.records.get(i))
    }

    /// Starts a new load; an older one still running is superseded.
    pub(super) fn refresh(&mut self) {
        self.loads_in_flight += 1;
        let aggregator = self.aggregator.clone();
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let res = aggregator.load().await.map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::Loaded(res));
        });
    }

    pub(super) fn open_doc(&mut self) {
        let Some(record) = self.selected_record().cloned() else {
            return;
        };
        if record.readme_ref.is_none() {
            self.set_status(format!("{} has no readme", record.title), true);
            return;
        }

        self.modal = Some(DocModal {
            raw_name: record.raw_name.clone(),
            title: record.title.clone(),
            state: DocState::Loading,
            scroll: 0,
        });
        let aggregator = self.aggregator.clone();
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let result = crate::docs::load_doc(aggregator.client(), &record)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::Doc {
                raw_name: record.raw_name,
                result,
            });
        });
    }

    pub(super) fn download_selected(&mut self) {
        let Some(record) = self.selected_record().cloned() else {
            return;
        };
        if record.config_ref.is_none() {
            self.set_status(format!("{} has no configuration file", record.title), true);
            return;
        }

        self.set_status(format!("downloading {}...", record.title), false);
        let aggregator = self.aggregator.clone();
        let tx = self.events_tx.clone();
        let dir = self.download_dir.clone();
        self.runtime.spawn(async move {
            let result = crate::download::download_config(aggregator.client(), &record, &dir)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::Downloaded {
                raw_name: record.raw_name,
                result,
            });
        });
    }

    /// Applies everything that arrived from background tasks since the last
    /// frame.
    pub(super) fn drain_events(&mut self) {
        if self.snapshot_rx.has_changed().unwrap_or(false) {
            let snapshot = self.snapshot_rx.borrow_and_update().clone();
            self.apply_snapshot(snapshot);
        }
        while let Ok(ev) = self.events_rx.try_recv() {
            self.apply_event(ev);
        }
    }

    pub(super) fn apply_event(&mut self, ev: AppEvent) {
        match ev {
            AppEvent::Loaded(res) => {
                self.loads_in_flight = self.loads_in_flight.saturating_sub(1);
                match res {
                    Ok(report) => {
                        if let Some(records) = report.records() {
                            let failed = report.failed_folders();
                            if failed > 0 {
                                self.set_status(
                                    format!(
                                        "loaded {} packages; {} folder(s) unavailable",
                                        records.len(),
                                        failed
                                    ),
                                    true,
                                );
                            } else {
                                self.set_status(format!("loaded {} packages", records.len()), false);
                            }
                        }
                    }
                    Err(err) => self.set_status(format!("load failed: {}", err), true),
                }
            }
            AppEvent::Doc { raw_name, result } => {
                let Some(modal) = self.modal.as_mut() else {
                    return;
                };
                if modal.raw_name != raw_name {
                    return;
                }
                modal.state = match result {
                    Ok(doc) => DocState::Ready(doc),
                    Err(err) => DocState::Failed(err),
                };
            }
            AppEvent::Downloaded { raw_name, result } => match result {
                Ok(saved) => self.set_status(
                    format!("saved {} ({} bytes)", saved.path.display(), saved.bytes),
                    false,
                ),
                Err(err) => self.set_status(format!("{}: {}", raw_name, err), true),
            },
        }
    }

    pub(super) fn apply_snapshot(&mut self, snapshot: Snapshot) {
        let keep = self.selected_record().map(|r| r.raw_name.clone());
        self.snapshot = snapshot;
        self.recompute();
        if let Some(name) = keep
            && let Some(pos) = self
                .visible
                .iter()
                .position(|&i| self.snapshot.records[i].raw_name == name)
        {
            self.selected = pos;
        }
    }

    /// Re-derives the tag picker and the visible list from the snapshot and
    /// the current query.
    pub(super) fn recompute(&mut self) {
        self.query.text = self.search.buf.trim().to_string();
        self.all_tags = crate::filter::tag_counts(&self.snapshot.records)
            .into_iter()
            .collect();
        self.visible = self
            .snapshot
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| self.query.matches(r))
            .map(|(i, _)| i)
            .collect();
        self.selected = self.selected.min(self.visible.len().saturating_sub(1));
        self.tag_cursor = self.tag_cursor.min(self.all_tags.len().saturating_sub(1));
    }

    pub(super) fn toggle_tag_at_cursor(&mut self) {
        let Some((tag, _)) = self.all_tags.get(self.tag_cursor).cloned() else {
            return;
        };
        self.query.toggle_tag(&tag);
        self.recompute();
    }

    pub(super) fn toggle_policy(&mut self) {
        self.query.policy = match self.query.policy {
            TagPolicy::Any => TagPolicy::All,
            TagPolicy::All => TagPolicy::Any,
        };
        self.recompute();
    }

    pub(super) fn clear_tags(&mut self) {
        self.query.tags.clear();
        self.recompute();
    }

    pub(super) fn move_selection(&mut self, delta: isize) {
        let len = self.visible.len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = self.selected.saturating_add_signed(delta).min(len - 1);
    }

    pub(super) fn move_tag_cursor(&mut self, delta: isize) {
        let len = self.all_tags.len();
        if len == 0 {
            self.tag_cursor = 0;
            return;
        }
        self.tag_cursor = self.tag_cursor.saturating_add_signed(delta).min(len - 1);
    }

    pub(super) fn set_status(&mut self, text: String, error: bool) {
        self.status = Some(Status { text, error });
    }

    pub(super) fn handle_key(&mut self, k: KeyEvent) {
        if k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }
        let ctrl_r = k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('r');
        if k.code == KeyCode::F(5) || ctrl_r {
            self.refresh();
            return;
        }
        if self.modal.is_some() {
            self.handle_modal_key(k);
            return;
        }

        match k.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return;
            }
            KeyCode::Esc => {
                if !self.search.buf.is_empty() {
                    self.search.clear();
                    self.recompute();
                } else if !self.query.tags.is_empty() {
                    self.clear_tags();
                } else {
                    self.quit = true;
                }
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Search => self.handle_search_key(k),
            Focus::Packages => self.handle_packages_key(k),
            Focus::Tags => self.handle_tags_key(k),
        }
    }

    fn handle_search_key(&mut self, k: KeyEvent) {
        match k.code {
            KeyCode::Char(c) => {
                self.search.insert_char(c);
                self.recompute();
            }
            KeyCode::Backspace => {
                self.search.backspace();
                self.recompute();
            }
            KeyCode::Delete => {
                self.search.delete();
                self.recompute();
            }
            KeyCode::Left => self.search.move_left(),
            KeyCode::Right => self.search.move_right(),
            KeyCode::Home => self.search.home(),
            KeyCode::End => self.search.end(),
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Enter => self.open_doc(),
            _ => {}
        }
    }

    fn handle_packages_key(&mut self, k: KeyEvent) {
        match k.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-10),
            KeyCode::PageDown => self.move_selection(10),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.move_selection(isize::MAX),
            KeyCode::Enter => self.open_doc(),
            KeyCode::Char('d') => self.download_selected(),
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
    }

    fn handle_tags_key(&mut self, k: KeyEvent) {
        match k.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_tag_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_tag_cursor(1),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_tag_at_cursor(),
            KeyCode::Char('a') => self.toggle_policy(),
            KeyCode::Char('c') => self.clear_tags(),
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, k: KeyEvent) {
        let Some(modal) = self.modal.as_mut() else {
            return;
        };
        match k.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => self.modal = None,
            KeyCode::Up | KeyCode::Char('k') => modal.scroll = modal.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => modal.scroll = modal.scroll.saturating_add(1),
            KeyCode::PageUp => modal.scroll = modal.scroll.saturating_sub(20),
            KeyCode::PageDown => modal.scroll = modal.scroll.saturating_add(20),
            KeyCode::Home => modal.scroll = 0,
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/app_tests.rs"]
mod tests;
