//! Interactive board: the grouped task view with optimistic updates.
//!
//! The event loop runs on the main thread. Store reads happen on a loader
//! thread connected by mpsc channels, so a slow store never blocks input. A
//! file watcher on the data directory requests a reload whenever the snapshot
//! changes externally (e.g. `agenda add` from another terminal).
//!
//! Mutations follow the optimistic pattern: the displayed snapshot is patched
//! first, then the store write is issued; a successful write keeps the patch
//! as the new baseline, a failed write surfaces the error and re-fetches
//! ground truth, which discards the patch.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use notify::{RecursiveMode, Watcher};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::task::{self, Task, TaskFields, TaskStore};

use super::actions::{self, CreateTaskInput};
use super::model::{self, Row, TaskSnapshot};
use super::view;

const EVENT_POLL_MS: u64 = 120;
const WATCH_DEBOUNCE_MS: u64 = 200;

enum LoadRequest {
    Reload,
}

enum UiMsg {
    DataLoaded(Vec<Task>),
    LoadError(String),
    WatchError(String),
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Error,
    Info,
}

/// Input modes layered over the list
pub(crate) enum InputMode {
    Normal,
    /// Collecting a description for a new task
    AddTask { buffer: String },
    /// Collecting a due date for one task (empty input clears it)
    EditDue { id: u64, buffer: String },
    /// Waiting for delete confirmation
    ConfirmDelete { id: u64, description: String },
}

pub struct AppState {
    pub(crate) snapshot: TaskSnapshot,
    pub(crate) rows: Vec<Row>,
    pub(crate) selected: Option<usize>,
    pub(crate) mode: InputMode,
    pub(crate) today: NaiveDate,
    /// A failed store read replaces the list content entirely
    pub(crate) load_error: Option<String>,
    pub(crate) config: Config,
    status_message: Option<String>,
    info_message: Option<String>,
    store: TaskStore,
}

impl AppState {
    fn new(store: TaskStore, config: Config) -> Self {
        Self {
            snapshot: TaskSnapshot::default(),
            rows: Vec::new(),
            selected: None,
            mode: InputMode::Normal,
            today: Local::now().date_naive(),
            load_error: None,
            config,
            status_message: None,
            info_message: None,
            store,
        }
    }

    pub(crate) fn selected_task(&self) -> Option<&Task> {
        match self.selected.and_then(|index| self.rows.get(index)) {
            Some(Row::Task(task)) => Some(task),
            _ => None,
        }
    }

    pub(crate) fn status_line(&self) -> Option<(String, StatusKind)> {
        if let Some(message) = self.status_message.as_ref() {
            return Some((message.clone(), StatusKind::Error));
        }
        if let Some(info) = self.info_message.as_ref() {
            return Some((info.clone(), StatusKind::Info));
        }
        None
    }

    pub(crate) fn footer_hint(&self) -> &'static str {
        match self.mode {
            InputMode::Normal => {
                "j/k move  a add  space toggle  t due  p project  d delete  r reload  q quit"
            }
            InputMode::AddTask { .. } => "type description  enter save  esc cancel",
            InputMode::EditDue { .. } => "YYYY-MM-DD, empty clears  enter save  esc cancel",
            InputMode::ConfirmDelete { .. } => "y confirm delete  esc cancel",
        }
    }

    fn set_error(&mut self, message: String) {
        self.status_message = Some(message);
        self.info_message = None;
    }

    fn set_info(&mut self, message: String) {
        self.info_message = Some(message);
        self.status_message = None;
    }

    fn clear_status(&mut self) {
        self.status_message = None;
        self.info_message = None;
    }

    /// Rebuild the render rows from the snapshot, keeping the selection on
    /// the same task where possible.
    fn rebuild_rows(&mut self) {
        let keep_id = self.selected_task().map(|task| task.id);
        let previous_index = self.selected;

        self.today = Local::now().date_naive();
        self.rows = model::build_rows(self.snapshot.tasks(), self.today);

        let selectable = model::selectable_rows(&self.rows);
        if selectable.is_empty() {
            self.selected = None;
            return;
        }

        if let Some(id) = keep_id {
            let by_id = selectable.iter().copied().find(|index| {
                matches!(&self.rows[*index], Row::Task(task) if task.id == id)
            });
            if let Some(index) = by_id {
                self.selected = Some(index);
                return;
            }
        }

        // The selected task is gone: fall back to the nearest selectable row.
        let fallback = previous_index
            .and_then(|previous| {
                selectable
                    .iter()
                    .copied()
                    .filter(|index| *index <= previous)
                    .next_back()
            })
            .unwrap_or(selectable[0]);
        self.selected = Some(fallback);
    }

    fn move_selection(&mut self, delta: isize) {
        let selectable = model::selectable_rows(&self.rows);
        if selectable.is_empty() {
            self.selected = None;
            return;
        }
        let current = self
            .selected
            .and_then(|index| selectable.iter().position(|candidate| *candidate == index));
        let next = match current {
            None => 0,
            Some(position) => {
                let position = position as isize + delta;
                position.clamp(0, selectable.len() as isize - 1) as usize
            }
        };
        self.selected = Some(selectable[next]);
    }

    // =========================================================================
    // Optimistic mutations
    // =========================================================================

    fn optimistic_update(&mut self, id: u64, fields: TaskFields, req_tx: &Sender<LoadRequest>) {
        // Optimistic-applied: patch the displayed snapshot before the write.
        self.snapshot.apply_update(id, &fields);
        self.rebuild_rows();

        match actions::update_task(&self.store, id, fields) {
            Ok(outcome) => {
                // Committed: the patched snapshot is the new baseline.
                self.set_info(outcome.message);
            }
            Err(err) => {
                // Reverted: discard the patch by re-fetching ground truth.
                self.set_error(format!("update failed: {err}"));
                let _ = req_tx.send(LoadRequest::Reload);
            }
        }
    }

    fn optimistic_delete(&mut self, id: u64, req_tx: &Sender<LoadRequest>) {
        self.snapshot.apply_remove(id);
        self.rebuild_rows();

        match actions::delete_task(&self.store, id) {
            Ok(outcome) => {
                self.set_info(outcome.message);
            }
            Err(err) => {
                self.set_error(format!("delete failed: {err}"));
                let _ = req_tx.send(LoadRequest::Reload);
            }
        }
    }

    /// No optimistic insert on creation: the id is store-assigned, so the
    /// board re-fetches after the write instead.
    fn submit_create(&mut self, description: String, req_tx: &Sender<LoadRequest>) {
        match actions::create_task(
            &self.store,
            CreateTaskInput {
                description: description.clone(),
                due_date: None,
                project_id: None,
            },
        ) {
            Ok(outcome) => {
                self.set_info(outcome.message);
                self.mode = InputMode::Normal;
                let _ = req_tx.send(LoadRequest::Reload);
            }
            Err(err) => {
                // Keep the entered description for retry.
                self.set_error(err.to_string());
                self.mode = InputMode::AddTask {
                    buffer: description,
                };
            }
        }
    }

    fn submit_due(&mut self, id: u64, buffer: String, req_tx: &Sender<LoadRequest>) {
        let trimmed = buffer.trim();
        let due_date = if trimmed.is_empty() {
            None
        } else {
            match task::parse_due_date(trimmed) {
                Ok(date) => Some(date),
                Err(err) => {
                    // Keep the entered date for correction.
                    self.set_error(err.to_string());
                    self.mode = InputMode::EditDue { id, buffer };
                    return;
                }
            }
        };

        let Some(current) = self.snapshot.get(id) else {
            self.set_error(Error::TaskNotFound(id).to_string());
            self.mode = InputMode::Normal;
            return;
        };
        let mut fields = TaskFields::from_task(current);
        fields.due_date = due_date;

        self.mode = InputMode::Normal;
        self.optimistic_update(id, fields, req_tx);
    }

    fn toggle_completed(&mut self, req_tx: &Sender<LoadRequest>) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let id = task.id;
        let mut fields = TaskFields::from_task(task);
        fields.completed = !fields.completed;
        self.optimistic_update(id, fields, req_tx);
    }

    fn cycle_project(&mut self, req_tx: &Sender<LoadRequest>) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let id = task.id;
        let mut fields = TaskFields::from_task(task);
        fields.project_id =
            actions::next_project(&self.config.projects, fields.project_id.as_deref());
        self.optimistic_update(id, fields, req_tx);
    }
}

pub fn run(store: TaskStore, config: Config) -> Result<()> {
    // The watcher needs the data directory to exist.
    store.storage().init_dirs()?;

    let (ui_tx, ui_rx) = mpsc::channel();
    let (req_tx, req_rx) = mpsc::channel();

    spawn_loader(store.clone(), req_rx, ui_tx.clone());
    spawn_watch(store.clone(), req_tx.clone(), ui_tx);

    if req_tx.send(LoadRequest::Reload).is_err() {
        return Err(Error::OperationFailed(
            "failed to start task loader".to_string(),
        ));
    }

    let mut app = AppState::new(store, config);
    run_terminal(&mut app, ui_rx, req_tx)
}

fn run_terminal(
    app: &mut AppState,
    ui_rx: Receiver<UiMsg>,
    req_tx: Sender<LoadRequest>,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, app, ui_rx, req_tx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    ui_rx: Receiver<UiMsg>,
    req_tx: Sender<LoadRequest>,
) -> Result<()> {
    let mut dirty = true;
    loop {
        while let Ok(msg) = ui_rx.try_recv() {
            handle_ui_msg(app, msg);
            dirty = true;
        }

        if dirty {
            terminal.draw(|frame| view::render(frame, app))?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            match event::read()? {
                Event::Key(key) => {
                    if handle_key(app, key, &req_tx) {
                        break;
                    }
                    dirty = true;
                }
                Event::Resize(_, _) => {
                    dirty = true;
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn handle_ui_msg(app: &mut AppState, msg: UiMsg) {
    match msg {
        UiMsg::DataLoaded(tasks) => {
            debug!(count = tasks.len(), "board loaded tasks");
            app.load_error = None;
            app.snapshot.replace_all(tasks);
            app.rebuild_rows();
        }
        UiMsg::LoadError(err) => {
            app.load_error = Some(err);
        }
        UiMsg::WatchError(err) => {
            app.set_error(format!("watch failed: {err}"));
        }
    }
}

/// Returns true when the app should quit
fn handle_key(app: &mut AppState, key: KeyEvent, req_tx: &Sender<LoadRequest>) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    match &mut app.mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('j') | KeyCode::Down => {
                app.clear_status();
                app.move_selection(1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                app.clear_status();
                app.move_selection(-1);
            }
            KeyCode::Char('a') => {
                app.clear_status();
                app.mode = InputMode::AddTask {
                    buffer: String::new(),
                };
            }
            KeyCode::Char(' ') => app.toggle_completed(req_tx),
            KeyCode::Char('t') => {
                if let Some(task) = app.selected_task() {
                    let buffer = task
                        .due_date
                        .map(|date| date.format("%Y-%m-%d").to_string())
                        .unwrap_or_default();
                    app.mode = InputMode::EditDue {
                        id: task.id,
                        buffer,
                    };
                }
            }
            KeyCode::Char('p') => app.cycle_project(req_tx),
            KeyCode::Char('d') => {
                if let Some(task) = app.selected_task() {
                    app.mode = InputMode::ConfirmDelete {
                        id: task.id,
                        description: task.description.clone(),
                    };
                }
            }
            KeyCode::Char('r') => {
                app.clear_status();
                let _ = req_tx.send(LoadRequest::Reload);
            }
            _ => {}
        },
        InputMode::AddTask { buffer } => match key.code {
            KeyCode::Esc => app.mode = InputMode::Normal,
            KeyCode::Enter => {
                let description = buffer.clone();
                app.submit_create(description, req_tx);
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) => buffer.push(c),
            _ => {}
        },
        InputMode::EditDue { id, buffer } => match key.code {
            KeyCode::Esc => app.mode = InputMode::Normal,
            KeyCode::Enter => {
                let (id, buffer) = (*id, buffer.clone());
                app.submit_due(id, buffer, req_tx);
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) => buffer.push(c),
            _ => {}
        },
        InputMode::ConfirmDelete { id, .. } => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let id = *id;
                app.mode = InputMode::Normal;
                app.optimistic_delete(id, req_tx);
            }
            KeyCode::Esc | KeyCode::Char('n') => app.mode = InputMode::Normal,
            _ => {}
        },
    }
    false
}

fn spawn_loader(store: TaskStore, req_rx: Receiver<LoadRequest>, ui_tx: Sender<UiMsg>) {
    thread::spawn(move || {
        while let Ok(request) = req_rx.recv() {
            match request {
                LoadRequest::Reload => match store.read_all() {
                    Ok(tasks) => {
                        if ui_tx.send(UiMsg::DataLoaded(tasks)).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        if ui_tx.send(UiMsg::LoadError(err.to_string())).is_err() {
                            break;
                        }
                    }
                },
            }
        }
    });
}

fn spawn_watch(store: TaskStore, req_tx: Sender<LoadRequest>, ui_tx: Sender<UiMsg>) {
    let data_dir = store.storage().data_dir().to_path_buf();
    thread::spawn(move || {
        let (watch_tx, watch_rx) = mpsc::channel();
        let watcher = notify::recommended_watcher(move |res| {
            let _ = watch_tx.send(res);
        });
        let mut watcher = match watcher {
            Ok(watcher) => watcher,
            Err(err) => {
                let _ = ui_tx.send(UiMsg::WatchError(err.to_string()));
                return;
            }
        };
        if let Err(err) = watcher.watch(&data_dir, RecursiveMode::NonRecursive) {
            let _ = ui_tx.send(UiMsg::WatchError(err.to_string()));
            return;
        }

        loop {
            match watch_rx.recv() {
                Err(_) => break,
                Ok(Err(err)) => {
                    let _ = ui_tx.send(UiMsg::WatchError(err.to_string()));
                }
                Ok(Ok(_event)) => {
                    // Debounce the burst from an atomic replace (create + rename).
                    while watch_rx
                        .recv_timeout(Duration::from_millis(WATCH_DEBOUNCE_MS))
                        .is_ok()
                    {}
                    if req_tx.send(LoadRequest::Reload).is_err() {
                        break;
                    }
                }
            }
        }
    });
}
