//! Screen state and input dispatch.
//!
//! Each input event maps to at most one action. Timer actions go to the
//! [`TimerController`]; resets that need confirmation open a [`Prompt`] and
//! complete once every question is answered.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::form::CategoryForm;
use crate::history::{AttemptLog, AttemptRecord};
use crate::reconcile::{Decisions, ReconcileOffer, ReconcileQuestion};
use crate::storage::CategoryStore;
use crate::time_format::Millis;
use crate::timer::{RefreshHandle, TimerController};
use crate::view::RunView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Categories,
    Form,
    Timer,
}

/// Timer actions reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    StartOrSplit,
    Reset,
    Pause,
    Undo,
    Skip,
    /// Back to the category list; resets first.
    Leave,
}

impl TimerAction {
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        match key.code {
            KeyCode::Char(' ') => Some(TimerAction::StartOrSplit),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(TimerAction::Reset),
            KeyCode::Char('p') | KeyCode::Char('P') => Some(TimerAction::Pause),
            KeyCode::Left => Some(TimerAction::Undo),
            KeyCode::Right => Some(TimerAction::Skip),
            KeyCode::Esc => Some(TimerAction::Leave),
            _ => None,
        }
    }
}

/// A reset waiting on the user's answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReset {
    pub offer: ReconcileOffer,
    remaining: Vec<ReconcileQuestion>,
    decisions: Decisions,
    leave_after: bool,
}

impl PendingReset {
    pub fn question(&self) -> Option<ReconcileQuestion> {
        self.remaining.first().copied()
    }

    fn answer(&mut self, yes: bool) {
        if self.remaining.is_empty() {
            return;
        }
        match self.remaining.remove(0) {
            ReconcileQuestion::SavePersonalBest { .. } => self.decisions.save_personal_best = yes,
            ReconcileQuestion::SaveGolds => self.decisions.save_golds = yes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    DeleteCategory(usize),
    Reconcile(PendingReset),
}

impl Prompt {
    pub fn text(&self) -> &'static str {
        match self {
            Prompt::DeleteCategory(_) => "Are you sure you want to delete this category?",
            Prompt::Reconcile(pending) => pending.question().map_or("", |q| q.text()),
        }
    }
}

pub struct App {
    pub store: CategoryStore,
    pub controller: TimerController,
    pub state: AppState,
    /// Highlighted row of the category list.
    pub selected: usize,
    pub form: Option<CategoryForm>,
    pub prompt: Option<Prompt>,
    /// Category being run.
    pub active: Option<usize>,
    pub config: Config,
    pub status: Option<String>,
    pub should_quit: bool,
    refresh: Option<RefreshHandle>,
    displayed_elapsed: Millis,
    history: Option<AttemptLog>,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("state", &self.state)
            .field("active", &self.active)
            .field("phase", &self.controller.phase())
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}

impl App {
    pub fn new(store: CategoryStore, config: Config) -> Self {
        Self::with_clock(store, config, SystemClock)
    }

    pub fn with_clock(store: CategoryStore, config: Config, clock: impl Clock + 'static) -> Self {
        Self {
            store,
            controller: TimerController::new(),
            state: AppState::Categories,
            selected: 0,
            form: None,
            prompt: None,
            active: None,
            config,
            status: None,
            should_quit: false,
            refresh: None,
            displayed_elapsed: 0,
            history: None,
            clock: Box::new(clock),
        }
    }

    pub fn with_history(mut self, log: AttemptLog) -> Self {
        self.history = Some(log);
        self
    }

    fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Whether the display needs periodic refresh.
    pub fn refresh_active(&self) -> bool {
        self.refresh.is_some()
    }

    /// Elapsed time as of the last transition or refresh.
    pub fn displayed_elapsed(&self) -> Millis {
        self.displayed_elapsed
    }

    pub fn run_view(&self) -> Option<RunView> {
        let mut view = RunView::capture(&self.controller, self.now(), self.config.visible_segments)?;
        view.elapsed = self.displayed_elapsed;
        Some(view)
    }

    pub fn active_title(&self) -> Option<&str> {
        self.active
            .and_then(|i| self.store.get(i))
            .map(|c| c.title.as_str())
    }

    pub fn on_tick(&mut self) {
        let Some(handle) = self.refresh else {
            return;
        };
        match self.controller.refresh(handle, self.now()) {
            Some(elapsed) => self.displayed_elapsed = elapsed,
            None => self.refresh = None,
        }
    }

    fn sync_refresh(&mut self) {
        self.refresh = self.controller.refresh_handle();
        self.displayed_elapsed = self.controller.elapsed_ms(self.now());
    }

    pub fn open_timer(&mut self, index: usize) -> bool {
        let Some(category) = self.store.get(index) else {
            return false;
        };
        self.controller.load(category);
        info!(category = %category.title, "opened timer");
        self.active = Some(index);
        self.selected = index;
        self.state = AppState::Timer;
        self.status = None;
        self.sync_refresh();
        true
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.prompt.is_some() {
            self.handle_prompt_key(key);
            return;
        }
        match self.state {
            AppState::Categories => self.handle_list_key(key),
            AppState::Form => self.handle_form_key(key),
            AppState::Timer => {
                if let Some(action) = TimerAction::from_key(&key) {
                    self.dispatch(action);
                }
            }
        }
    }

    pub fn dispatch(&mut self, action: TimerAction) {
        if !self.controller.is_loaded() || self.prompt.is_some() {
            return;
        }
        let now = self.now();
        match action {
            TimerAction::StartOrSplit => {
                self.controller.start_or_split(now);
            }
            TimerAction::Pause => {
                self.controller.pause(now);
            }
            TimerAction::Skip => {
                self.controller.skip(now);
            }
            TimerAction::Undo => {
                if let Some(baseline) = self.active.and_then(|i| self.store.get(i)) {
                    self.controller.undo(baseline, now);
                }
            }
            TimerAction::Reset => self.begin_reset(false),
            TimerAction::Leave => self.begin_reset(true),
        }
        self.sync_refresh();
    }

    fn begin_reset(&mut self, leave_after: bool) {
        let Some(baseline) = self.active.and_then(|i| self.store.get(i)) else {
            return;
        };
        let offer = self.controller.reset_offer(baseline);
        if offer.is_empty() {
            self.finish_reset(Decisions::default(), leave_after);
        } else {
            self.prompt = Some(Prompt::Reconcile(PendingReset {
                offer,
                remaining: offer.questions(),
                decisions: Decisions::default(),
                leave_after,
            }));
        }
    }

    fn finish_reset(&mut self, mut decisions: Decisions, leave_after: bool) {
        let Some(index) = self.active else {
            return;
        };
        let ended = self.controller.run().cloned();
        let Some(baseline) = self.store.get_mut(index) else {
            return;
        };
        let title = baseline.title.clone();
        let Some(outcome) = self.controller.reset(baseline, &mut decisions) else {
            return;
        };

        if outcome.changed() {
            if let Err(e) = self.store.persist() {
                warn!(error = %e, "failed to save categories");
                self.status = Some(e.to_string());
            }
        }

        if let (Some(run), Some(log)) = (ended, self.history.as_ref()) {
            if self.config.record_history && run.attempted() {
                if let Err(e) = log.append(&AttemptRecord::from_run(&title, &run, &outcome)) {
                    warn!(error = %e, "failed to record attempt");
                    self.status = Some(e.to_string());
                }
            }
        }

        if leave_after {
            self.controller.unload();
            self.active = None;
            self.state = AppState::Categories;
        }
        self.sync_refresh();
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let answer = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => true,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
            _ => return,
        };
        match self.prompt.take() {
            Some(Prompt::DeleteCategory(index)) => {
                if answer {
                    self.delete_category(index);
                }
            }
            Some(Prompt::Reconcile(mut pending)) => {
                pending.answer(answer);
                if pending.question().is_some() {
                    self.prompt = Some(Prompt::Reconcile(pending));
                } else {
                    self.finish_reset(pending.decisions, pending.leave_after);
                }
            }
            None => {}
        }
    }

    fn delete_category(&mut self, index: usize) {
        match self.store.remove(index) {
            Ok(removed) => {
                info!(category = %removed.title, "deleted category");
                self.status = Some(format!("Deleted {}", removed.title));
                self.selected = self.selected.min(self.store.len().saturating_sub(1));
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.store.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => {
                self.open_timer(self.selected);
            }
            KeyCode::Char('n') => {
                self.form = Some(CategoryForm::create());
                self.state = AppState::Form;
                self.status = None;
            }
            KeyCode::Char('e') => {
                if let Some(category) = self.store.get(self.selected) {
                    self.form = Some(CategoryForm::edit(self.selected, category));
                    self.state = AppState::Form;
                    self.status = None;
                }
            }
            KeyCode::Char('d') => {
                if self.selected < self.store.len() {
                    self.prompt = Some(Prompt::DeleteCategory(self.selected));
                }
            }
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Some(form) = self.form.as_mut() else {
            self.state = AppState::Categories;
            return;
        };
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.form = None;
                self.state = AppState::Categories;
            }
            KeyCode::Char('s') if ctrl => self.submit_form(),
            KeyCode::Char('n') if ctrl => form.add_row(),
            KeyCode::Char('d') if ctrl => form.remove_row(),
            KeyCode::Char(c) if !ctrl => form.insert_char(c),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Up => form.up(),
            KeyCode::Down | KeyCode::Enter => form.down(),
            KeyCode::Tab => form.next_column(),
            KeyCode::BackTab => form.prev_column(),
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let category = match form.submit() {
            Ok(category) => category,
            Err(e) => {
                form.error = Some(e.to_string());
                return;
            }
        };
        let editing = form.editing;
        let saved = match editing {
            Some(index) => self.store.update(index, category).map(|_| index),
            None => self.store.add(category),
        };
        match saved {
            Ok(index) => {
                self.status = Some(
                    if editing.is_some() {
                        "The category was successfully updated!"
                    } else {
                        "The category was successfully created!"
                    }
                    .to_string(),
                );
                self.selected = index;
                self.form = None;
                self.state = AppState::Categories;
            }
            Err(e) => {
                if let Some(form) = self.form.as_mut() {
                    form.error = Some(e.to_string());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::clock::ManualClock;
    use crate::storage::MemoryGateway;
    use crate::timer::TimerPhase;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with(categories: Vec<Category>) -> (App, ManualClock, MemoryGateway) {
        let gateway = MemoryGateway::new(categories);
        let store = CategoryStore::open(gateway.clone()).unwrap();
        let clock = ManualClock::new();
        let app = App::with_clock(store, Config::default(), clock.clone());
        (app, clock, gateway)
    }

    #[test]
    fn timer_keys_map_to_actions() {
        assert_eq!(
            TimerAction::from_key(&key(KeyCode::Char(' '))),
            Some(TimerAction::StartOrSplit)
        );
        assert_eq!(TimerAction::from_key(&key(KeyCode::Left)), Some(TimerAction::Undo));
        assert_eq!(TimerAction::from_key(&key(KeyCode::Right)), Some(TimerAction::Skip));
        assert_eq!(TimerAction::from_key(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn dispatch_without_run_is_ignored() {
        let (mut app, _, _) = app_with(vec![]);
        app.dispatch(TimerAction::StartOrSplit);
        assert!(!app.controller.is_loaded());
        assert!(!app.refresh_active());
    }

    #[test]
    fn refresh_follows_running_state() {
        let (mut app, clock, _) = app_with(vec![Category::new("Any%", &["A", "B"])]);
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Timer);
        assert!(!app.refresh_active());

        app.handle_key(key(KeyCode::Char(' ')));
        assert!(app.refresh_active());
        clock.advance_ms(1_234);
        app.on_tick();
        assert_eq!(app.displayed_elapsed(), 1_234);

        app.handle_key(key(KeyCode::Char('p')));
        assert!(!app.refresh_active());
        clock.advance_ms(5_000);
        app.on_tick();
        assert_eq!(app.displayed_elapsed(), 1_234);
    }

    #[test]
    fn reset_without_attempt_asks_nothing() {
        let (mut app, _, gateway) = app_with(vec![Category::new("Any%", &["A"])]);
        app.open_timer(0);
        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(app.prompt, None);
        assert_eq!(app.controller.phase(), TimerPhase::Idle);
        assert_eq!(gateway.save_count(), 0);
    }

    #[test]
    fn leave_goes_back_to_list() {
        let (mut app, _, _) = app_with(vec![Category::new("Any%", &["A"])]);
        app.open_timer(0);
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.state, AppState::Categories);
        assert!(!app.controller.is_loaded());
        assert_eq!(app.active, None);
    }

    #[test]
    fn delete_requires_confirmation() {
        let (mut app, _, gateway) = app_with(vec![
            Category::new("Any%", &["A"]),
            Category::new("100%", &["A"]),
        ]);
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char('d')));
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.store.len(), 2);

        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(app.prompt, Some(Prompt::DeleteCategory(1)));
        app.handle_key(key(KeyCode::Char('y')));
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.selected, 0);
        assert_eq!(gateway.snapshot().len(), 1);
    }

    #[test]
    fn form_errors_stay_on_form() {
        let (mut app, _, _) = app_with(vec![]);
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Form);
        app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(app.state, AppState::Form);
        let error = app.form.as_ref().and_then(|f| f.error.clone()).unwrap();
        assert!(error.starts_with("Could not submit:"));
        assert!(app.store.is_empty());
    }

    #[test]
    fn ctrl_c_quits_from_anywhere() {
        let (mut app, _, _) = app_with(vec![Category::new("Any%", &["A"])]);
        app.open_timer(0);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
