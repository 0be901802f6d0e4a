//! Main application controller
//!
//! Manages the TUI, application state, background API calls and the screen
//! rendering loop. API calls run on spawned tasks and report back over an
//! mpsc channel; every report carries the session epoch it was started for
//! and is dropped when that session is gone.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::KeyEvent;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::{
    api::{self, TrainingApi},
    app::{
        screens::{
            FinishAction, FinishScreen, IntervalAction, IntervalScreen, LoadScreen, MenuAction,
            MenuScreen, StartScreen, WorkoutAction, WorkoutScreen,
        },
        state::{AppState, NavigationAction, StateManager},
        tui::{Tui, TuiEvent},
    },
    config::AppConfig,
    error::{user_friendly_message, RetryConfig},
    models::{MySetSummary, PreviousSession, SaveAck, TrainingSession},
    session::{today, GuidedSession, SaveStatus, TrainingStep},
    MysetError, Result,
};

/// Results of background API calls
#[derive(Debug)]
pub enum ApiEvent {
    MysetsLoaded(Result<Vec<MySetSummary>>),
    SessionLoaded {
        epoch: u64,
        result: Result<(TrainingSession, Option<PreviousSession>)>,
    },
    SaveFinished {
        epoch: u64,
        result: Result<SaveAck>,
    },
}

/// Everything the app does that is not drawing. Kept apart from the
/// terminal so it can be driven from tests.
pub struct AppCore {
    state_manager: StateManager,
    config: AppConfig,
    api: Arc<dyn TrainingApi>,
    start_screen: StartScreen,
    load_screen: LoadScreen,
    menu_screen: MenuScreen,
    workout_screen: WorkoutScreen,
    interval_screen: IntervalScreen,
    finish_screen: FinishScreen,
    session: Option<GuidedSession>,
    /// Bumped whenever a session is started or left
    epoch: u64,
    events_tx: mpsc::Sender<ApiEvent>,
    events_rx: mpsc::Receiver<ApiEvent>,
    save_cancel: Option<oneshot::Sender<()>>,
}

impl AppCore {
    pub fn new(config: AppConfig, api: Arc<dyn TrainingApi>) -> Self {
        let (events_tx, events_rx) = mpsc::channel(16);
        Self {
            state_manager: StateManager::new(),
            config,
            api,
            start_screen: StartScreen::new(),
            load_screen: LoadScreen::new(),
            menu_screen: MenuScreen::new(),
            workout_screen: WorkoutScreen::new(),
            interval_screen: IntervalScreen::new(),
            finish_screen: FinishScreen::new(),
            session: None,
            epoch: 0,
            events_tx,
            events_rx,
            save_cancel: None,
        }
    }

    pub fn state(&self) -> &AppState {
        self.state_manager.current_state()
    }

    pub fn should_quit(&self) -> bool {
        self.state_manager.should_quit()
    }

    pub fn session(&self) -> Option<&GuidedSession> {
        self.session.as_ref()
    }

    pub fn start_screen(&self) -> &StartScreen {
        &self.start_screen
    }

    pub fn load_screen(&self) -> &LoadScreen {
        &self.load_screen
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    fn retry_config(&self) -> RetryConfig {
        RetryConfig::with_attempts(self.config.api.fetch_attempts)
    }

    /// Fetch the myset list in the background
    pub fn request_mysets(&mut self) {
        self.start_screen.set_loading();
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        let retry = self.retry_config();
        tokio::spawn(async move {
            let result = api::load_mysets(api.as_ref(), retry).await;
            let _ = tx.send(ApiEvent::MysetsLoaded(result)).await;
        });
    }

    /// Fetch a myset and its previous session, then open the menu
    pub fn open_myset(&mut self, id: i64, name: Option<String>) {
        self.leave_session();
        self.start_screen.clear_notice();
        let epoch = self.epoch;
        self.load_screen.set_loading(id, name);
        self.state_manager.transition_to(AppState::Loading);

        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        let retry = self.retry_config();
        info!(myset = id, epoch, "loading myset");
        tokio::spawn(async move {
            let result = api::load_session(api.as_ref(), id, retry).await;
            let _ = tx.send(ApiEvent::SessionLoaded { epoch, result }).await;
        });
    }

    /// Apply every API result that has arrived
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
        }
    }

    /// Wait for the next API result and apply it
    pub async fn next_api_event(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.apply_event(event);
                true
            }
            None => false,
        }
    }

    fn apply_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::MysetsLoaded(Ok(mysets)) => self.start_screen.set_mysets(mysets),
            ApiEvent::MysetsLoaded(Err(err)) => {
                warn!(error = %err, "myset list failed");
                self.start_screen.set_error(user_friendly_message(&err));
            }
            ApiEvent::SessionLoaded { epoch, .. } | ApiEvent::SaveFinished { epoch, .. }
                if epoch != self.epoch =>
            {
                debug!(epoch, current = self.epoch, "dropping stale response");
            }
            ApiEvent::SessionLoaded { result, .. } => match result {
                Ok((session, previous)) => {
                    let rest = self.config.training.rest_secs;
                    self.session = Some(GuidedSession::new(session, previous, rest, self.epoch));
                    self.workout_screen.clear();
                    self.interval_screen.reset();
                    self.finish_screen.reset();
                    self.state_manager.transition_to(AppState::Training);
                }
                Err(err) => {
                    warn!(error = %err, "myset failed to load");
                    self.load_screen.set_error(user_friendly_message(&err));
                    self.state_manager.transition_to(AppState::LoadFailed);
                }
            },
            ApiEvent::SaveFinished { result, .. } => {
                self.save_cancel = None;
                let Some(guided) = self.session.as_mut() else {
                    return;
                };
                guided.save_finished(result);
                let notice = match guided.finish().status {
                    SaveStatus::Saved(Some(id)) => {
                        format!("Saved {} (record #{})", guided.session().name, id)
                    }
                    SaveStatus::Saved(None) => format!("Saved {}", guided.session().name),
                    _ => return,
                };
                info!(%notice, "session saved, back to the list");
                self.back_to_list();
                self.start_screen.set_notice(notice);
            }
        }
    }

    /// Drop the current session, cancel its save and invalidate late responses
    fn leave_session(&mut self) {
        if let Some(cancel) = self.save_cancel.take() {
            let _ = cancel.send(());
        }
        self.session = None;
        self.workout_screen.clear();
        self.epoch += 1;
    }

    fn back_to_list(&mut self) {
        self.leave_session();
        self.state_manager.transition_to(AppState::Start);
        self.request_mysets();
    }

    /// Feed elapsed time to the rest timer
    pub fn tick(&mut self, elapsed: Duration) -> Result<()> {
        if let Some(guided) = self.session.as_mut() {
            if guided.tick(elapsed)? {
                self.after_interval();
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if StateManager::is_force_quit(&key) {
            self.quit();
            return Ok(());
        }

        match self.state_manager.current_state().clone() {
            AppState::Start => self.handle_start_key(key),
            AppState::Loading | AppState::LoadFailed => {
                let action = StateManager::key_to_navigation(key);
                match action {
                    NavigationAction::Back => self.back_to_list(),
                    NavigationAction::Retry if self.load_screen.error().is_some() => {
                        if let Some(id) = self.load_screen.myset_id() {
                            let name = self.load_screen.myset_name().map(str::to_string);
                            self.open_myset(id, name);
                        }
                    }
                    _ => self.state_manager.handle_navigation(&action),
                }
            }
            AppState::Training => self.handle_training_key(key)?,
            AppState::Exit => {}
        }
        Ok(())
    }

    fn handle_start_key(&mut self, key: KeyEvent) {
        let action = StateManager::key_to_navigation(key);
        match action {
            NavigationAction::Up => self.start_screen.select_previous(),
            NavigationAction::Down => self.start_screen.select_next(),
            NavigationAction::Select => {
                if let Some(myset) = self.start_screen.selected_myset() {
                    let (id, name) = (myset.id, myset.name.clone());
                    self.open_myset(id, Some(name));
                }
            }
            NavigationAction::Retry => self.request_mysets(),
            _ => self.state_manager.handle_navigation(&action),
        }
    }

    fn handle_training_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(step) = self.session.as_ref().map(GuidedSession::step) else {
            self.state_manager.transition_to(AppState::Start);
            return Ok(());
        };
        match step {
            TrainingStep::Menu => self.handle_menu_key(key),
            TrainingStep::Workout => self.handle_workout_key(key),
            TrainingStep::Interval => self.handle_interval_key(key),
            TrainingStep::Finish => self.handle_finish_key(key),
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.menu_screen.handle_key(key) {
            MenuAction::Start => {
                if let Some(guided) = self.session.as_mut() {
                    guided.start()?;
                    self.workout_screen.sync(guided)?;
                }
            }
            MenuAction::Back => self.back_to_list(),
            MenuAction::Quit => self.quit(),
            MenuAction::None => {}
        }
        Ok(())
    }

    fn handle_workout_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(guided) = self.session.as_mut() else {
            return Ok(());
        };
        self.workout_screen.sync(guided)?;
        match self.workout_screen.handle_key(key) {
            WorkoutAction::Confirm => {
                if let Some(draft) = self.workout_screen.draft() {
                    let recorded = guided.confirm_draft(draft)?;
                    debug!(coerced = recorded.coerced.len(), "set confirmed");
                }
                self.workout_screen.clear();
                self.interval_screen.reset();
            }
            WorkoutAction::EndTraining => {
                guided.end_training()?;
                self.workout_screen.clear();
                self.finish_screen.reset();
            }
            WorkoutAction::None => {}
        }
        Ok(())
    }

    fn handle_interval_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(guided) = self.session.as_mut() else {
            return Ok(());
        };
        match self.interval_screen.handle_key(key) {
            IntervalAction::ToggleTimer => guided.timer_mut().toggle(),
            IntervalAction::IncreaseRest => guided.timer_mut().increase_custom(),
            IntervalAction::DecreaseRest => guided.timer_mut().decrease_custom(),
            IntervalAction::ApplyRest => guided.timer_mut().apply_custom(),
            IntervalAction::MemoChar(c) => guided.push_memo_char(c),
            IntervalAction::MemoBackspace => guided.pop_memo_char(),
            IntervalAction::Skip => {
                guided.finish_interval()?;
                self.after_interval();
            }
            IntervalAction::NextExercise if guided.has_next_exercise() => {
                guided.skip_to_next_exercise()?;
                self.after_interval();
            }
            IntervalAction::ExtraSet if guided.is_last_set_of_exercise() => {
                guided.add_extra_set()?;
                self.after_interval();
            }
            IntervalAction::EndTraining => {
                guided.end_training()?;
                self.finish_screen.reset();
            }
            IntervalAction::NextExercise | IntervalAction::ExtraSet | IntervalAction::None => {}
        }
        Ok(())
    }

    /// Prepare whichever screen the session moved to after resting
    fn after_interval(&mut self) {
        self.workout_screen.clear();
        self.interval_screen.reset();
        self.finish_screen.reset();
        if let Some(guided) = self.session.as_ref() {
            if guided.step() == TrainingStep::Workout {
                if let Err(err) = self.workout_screen.sync(guided) {
                    warn!(error = %err, "could not prepare the next set");
                }
            }
        }
    }

    fn handle_finish_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(guided) = self.session.as_mut() else {
            return Ok(());
        };
        match self.finish_screen.handle_key(key, guided.finish()) {
            FinishAction::Save => self.start_save()?,
            FinishAction::RequestDiscard => guided.request_discard(),
            FinishAction::CancelDiscard => guided.cancel_discard(),
            FinishAction::ConfirmDiscard => {
                if guided.discard_confirmed() {
                    info!("session discarded");
                    self.back_to_list();
                }
            }
            FinishAction::NotesChar(c) => guided.notes_mut().push(c),
            FinishAction::NotesBackspace => {
                guided.notes_mut().pop();
            }
            FinishAction::None => {}
        }
        Ok(())
    }

    /// Send the finished session on a background task
    fn start_save(&mut self) -> Result<()> {
        let guided = self
            .session
            .as_mut()
            .ok_or_else(|| MysetError::InvalidTransition("no session to save".to_string()))?;
        let request = guided.begin_save(today())?;
        let id = guided.session().id;
        let epoch = self.epoch;

        let (cancel_tx, cancel_rx) = oneshot::channel();
        self.save_cancel = Some(cancel_tx);
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                result = api.save_session(id, &request) => result,
                _ = cancel_rx => Err(MysetError::Cancelled("save abandoned".to_string())),
            };
            let _ = tx.send(ApiEvent::SaveFinished { epoch, result }).await;
        });
        Ok(())
    }

    pub fn quit(&mut self) {
        self.leave_session();
        self.state_manager.quit();
    }
}

/// TUI application controller
pub struct App {
    /// Terminal UI handler
    tui: Tui,
    core: AppCore,
}

impl App {
    /// Create a new application instance
    pub fn new(config: AppConfig, api: Arc<dyn TrainingApi>) -> Result<Self> {
        let tui = Tui::new(config.ui.tick_rate())?;
        Ok(Self {
            tui,
            core: AppCore::new(config, api),
        })
    }

    /// Initialize the TUI and kick off the first fetch
    pub fn init(&mut self, myset: Option<i64>) -> Result<()> {
        self.tui.init()?;
        match myset {
            Some(id) => self.core.open_myset(id, None),
            None => self.core.request_mysets(),
        }
        Ok(())
    }

    /// Run the main application loop
    pub async fn run(&mut self) -> Result<()> {
        while !self.core.should_quit() {
            self.core.drain_events();
            self.draw()?;
            match self.tui.next_event()? {
                TuiEvent::Key(key) => {
                    if let Err(err) = self.core.handle_key(key) {
                        // Rejected transitions leave state untouched
                        warn!(error = %err, "key ignored");
                    }
                }
                TuiEvent::Tick(elapsed) => {
                    if let Err(err) = self.core.tick(elapsed) {
                        warn!(error = %err, "tick failed");
                    }
                }
                TuiEvent::Idle => {}
            }
            // Let spawned API tasks make progress between polls
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        self.tui.restore()?;
        Ok(())
    }

    /// Draw the current screen
    fn draw(&mut self) -> Result<()> {
        let core = &mut self.core;
        self.tui
            .draw(|f| draw_core(f, core))
            .map_err(|e| MysetError::Tui(e.to_string()))
    }
}

/// Render whichever screen the core is on
pub fn draw_core(f: &mut ratatui::Frame, core: &mut AppCore) {
    match core.state_manager.current_state() {
        AppState::Start | AppState::Exit => core.start_screen.render(f),
        AppState::Loading | AppState::LoadFailed => core.load_screen.render(f),
        AppState::Training => {
            let Some(guided) = core.session.as_ref() else {
                return;
            };
            match guided.step() {
                TrainingStep::Menu => core.menu_screen.render(f, guided),
                TrainingStep::Workout => core.workout_screen.render(f, guided),
                TrainingStep::Interval => core.interval_screen.render(f, guided),
                TrainingStep::Finish => core.finish_screen.render(f, guided),
            }
        }
    }
}
