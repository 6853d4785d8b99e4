use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDateTime};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::style::Print;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};

use crate::alerts::{Alert, Notifier};
use crate::context::AppContext;
use crate::model::config::AlertConfig;
use crate::model::dates;
use crate::model::task::{Category, TaskDraft, TaskId};
use crate::ops::filter::Filter;
use crate::ops::stats::TaskStats;
use crate::store::{Backend, StoreError, TaskStore};
use crate::view::actions::{self, RowAction};
use crate::view::rows::{self, ListView};
use crate::view::toast::{ToastKind, ToastQueue};

use super::input;
use super::input::text::LineEditor;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Add-task form is open
    Add,
    /// Editing the selected task's title
    Edit,
    /// Waiting for y/n on a delete
    Confirm,
}

/// Field focus inside the add form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Due,
    Category,
    Notify,
}

impl FormField {
    pub const ORDER: [FormField; 4] = [
        FormField::Title,
        FormField::Due,
        FormField::Category,
        FormField::Notify,
    ];

    pub fn next(self) -> FormField {
        let idx = FormField::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        FormField::ORDER[(idx + 1) % FormField::ORDER.len()]
    }

    pub fn prev(self) -> FormField {
        let idx = FormField::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        FormField::ORDER[(idx + FormField::ORDER.len() - 1) % FormField::ORDER.len()]
    }
}

/// State of the add-task form
#[derive(Debug, Clone)]
pub struct AddForm {
    pub title: LineEditor,
    pub due: LineEditor,
    pub category: Category,
    pub notify: bool,
    pub focus: FormField,
}

impl Default for AddForm {
    fn default() -> Self {
        AddForm {
            title: LineEditor::default(),
            due: LineEditor::default(),
            category: Category::default(),
            notify: false,
            focus: FormField::Title,
        }
    }
}

impl AddForm {
    /// Turn the form into a draft. Title validation is left to the store.
    pub fn to_draft(&self) -> Result<TaskDraft, String> {
        let mut draft = TaskDraft::new(self.title.text())
            .category(self.category.key())
            .notify(self.notify);
        if let Some(due) = dates::parse_due(self.due.text())? {
            draft = draft.due(due);
        }
        Ok(draft)
    }
}

/// Title edit in progress
#[derive(Debug, Clone)]
pub struct EditState {
    pub id: TaskId,
    pub editor: LineEditor,
}

/// Delete waiting for confirmation
#[derive(Debug, Clone)]
pub struct ConfirmState {
    pub id: TaskId,
    pub title: String,
}

/// Main application state
pub struct App<B: Backend> {
    pub store: TaskStore<B>,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    /// Cursor index into the visible rows
    pub cursor: usize,
    /// First visible row
    pub scroll_offset: usize,
    pub form: Option<AddForm>,
    pub edit: Option<EditState>,
    pub confirm: Option<ConfirmState>,
    pub toasts: ToastQueue,
    pub show_help: bool,
    /// Set when the remote session is rejected; the TUI exits with a hint
    pub auth_lost: bool,
    /// Ring the terminal bell on the next frame
    pub ring_bell: bool,
    notifier: Rc<RefCell<Notifier>>,
    fired: Rc<RefCell<Vec<Alert>>>,
}

impl<B: Backend> App<B> {
    pub fn new(mut store: TaskStore<B>, theme: Theme, toast_ttl: Duration, alerts: &AlertConfig) -> Self {
        let fired = Rc::new(RefCell::new(Vec::new()));
        let inbox = Rc::clone(&fired);
        let sink = Box::new(move |alert: Alert| inbox.borrow_mut().push(alert));
        let notifier = Rc::new(RefCell::new(Notifier::from_config(alerts, sink)));

        notifier
            .borrow_mut()
            .scan(store.list(), Local::now().naive_local());
        let scanner = Rc::clone(&notifier);
        store.subscribe(move |tasks| {
            scanner
                .borrow_mut()
                .scan(tasks, Local::now().naive_local());
        });

        App {
            store,
            mode: Mode::Navigate,
            should_quit: false,
            theme,
            cursor: 0,
            scroll_offset: 0,
            form: None,
            edit: None,
            confirm: None,
            toasts: ToastQueue::new(toast_ttl),
            show_help: false,
            auth_lost: false,
            ring_bell: false,
            notifier,
            fired,
        }
    }

    pub fn list_view(&self) -> ListView {
        rows::project(&self.store.visible())
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::of(self.store.list())
    }

    pub fn row_count(&self) -> usize {
        self.store.visible().len()
    }

    pub fn selected_id(&self) -> Option<TaskId> {
        self.store.visible().get(self.cursor).map(|t| t.id.clone())
    }

    pub fn clamp_cursor(&mut self) {
        let count = self.row_count();
        self.cursor = if count == 0 { 0 } else { self.cursor.min(count - 1) };
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let count = self.row_count();
        if count == 0 {
            return;
        }
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, count as isize - 1) as usize;
    }

    /// Show a store error, or leave the TUI if the session is gone
    pub fn report_error(&mut self, err: StoreError) {
        if err.is_auth() {
            warn!(error = %err, "session rejected, leaving TUI");
            self.auth_lost = true;
            self.should_quit = true;
            return;
        }
        self.toasts.error(err.user_message(), Instant::now());
    }

    fn report(&mut self, outcome: Result<Option<String>, StoreError>) {
        match outcome {
            Ok(Some(msg)) => self.toasts.success(msg, Instant::now()),
            Ok(None) => {}
            Err(e) => self.report_error(e),
        }
        self.clamp_cursor();
    }

    /// Run a row action against the task under the cursor
    pub fn act_on_selected(&mut self, action: RowAction) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let outcome = actions::apply(&mut self.store, &id, action);
        self.report(outcome);
    }

    pub fn set_filter(&mut self, filter: Filter) {
        if let Err(e) = self.store.set_filter(filter) {
            self.report_error(e);
        }
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    pub fn reload(&mut self) {
        match self.store.refresh() {
            Ok(()) => self.clamp_cursor(),
            Err(e) => self.report_error(e),
        }
    }

    /// Submit the add form. The form stays open on failure.
    pub fn submit_form(&mut self) {
        let Some(form) = self.form.as_ref() else {
            return;
        };
        let draft = match form.to_draft() {
            Ok(d) => d,
            Err(msg) => {
                self.toasts.error(msg, Instant::now());
                return;
            }
        };
        match actions::add(&mut self.store, draft) {
            Ok(msg) => {
                self.toasts.success(msg, Instant::now());
                self.form = None;
                self.mode = Mode::Navigate;
                self.clamp_cursor();
            }
            Err(e) => self.report_error(e),
        }
    }

    /// Commit the title edit; blank input cancels
    pub fn submit_edit(&mut self) {
        let Some(state) = self.edit.take() else {
            return;
        };
        self.mode = Mode::Navigate;
        let outcome = actions::apply(
            &mut self.store,
            &state.id,
            RowAction::Edit(Some(state.editor.text().to_string())),
        );
        self.report(outcome);
    }

    /// Resolve the pending delete
    pub fn resolve_confirm(&mut self, confirmed: bool) {
        let Some(state) = self.confirm.take() else {
            return;
        };
        self.mode = Mode::Navigate;
        let outcome = actions::apply(&mut self.store, &state.id, RowAction::Delete { confirmed });
        self.report(outcome);
    }

    /// Expire toasts and fire due alerts
    pub fn tick(&mut self, now: NaiveDateTime) {
        let instant = Instant::now();
        self.toasts.prune(instant);

        let store = &self.store;
        self.notifier
            .borrow_mut()
            .poll(now, |id| store.get(id).map(|t| t.completed));

        let fired: Vec<Alert> = self.fired.borrow_mut().drain(..).collect();
        for alert in fired {
            info!(id = %alert.task_id, "alert delivered");
            self.toasts
                .push(ToastKind::Alert, format!("{}: {}", alert.heading, alert.body), instant);
            self.ring_bell = true;
        }
    }
}

/// Run the TUI application
pub fn run(ctx: &AppContext) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.open_store().map_err(|e| {
        if e.is_auth() {
            format!("{} (run `todo login`)", e.user_message())
        } else {
            e.user_message()
        }
    })?;

    let mut app = App::new(
        store,
        Theme::from_config(&ctx.config.ui),
        Duration::from_secs(ctx.config.ui.toast_seconds),
        &ctx.config.alerts,
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    if app.auth_lost {
        return Err("Session expired. Please log in again (run `todo login`).".into());
    }
    Ok(())
}

fn run_event_loop<B: Backend>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<B>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.tick(Local::now().naive_local());
        if app.ring_bell {
            execute!(io::stdout(), Print("\x07"))?;
            app.ring_bell = false;
        }

        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
