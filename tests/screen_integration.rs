//! Integration tests for the app core: key handling, background loads and rendering

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};
use serde_json::json;
use tokio::sync::Notify;

use mysetrun::api::TrainingApi;
use mysetrun::app::{draw_core, AppCore, AppState, StateManager};
use mysetrun::config::AppConfig;
use mysetrun::models::{
    CreateTrainingSessionRequest, MySetDetail, MySetSummary, PreviousSessionData, SaveAck,
};
use mysetrun::session::{SaveStatus, TrainingStep};
use mysetrun::{MysetError, Result};

#[derive(Default)]
struct FakeApi {
    fail_detail: bool,
    /// Saves wait here until notified
    save_gate: Option<Arc<Notify>>,
    saves: Mutex<Vec<CreateTrainingSessionRequest>>,
}

#[async_trait]
impl TrainingApi for FakeApi {
    async fn list_mysets(&self) -> Result<Vec<MySetSummary>> {
        Ok(serde_json::from_value(json!([
            {"id": 7, "name": "Push Day"},
            {"id": 8, "name": "Leg Day"}
        ]))?)
    }

    async fn fetch_myset(&self, id: i64) -> Result<MySetDetail> {
        if self.fail_detail {
            return Err(MysetError::Api {
                status: Some(404),
                message: "gone".into(),
            });
        }
        Ok(serde_json::from_value(json!({
            "id": id,
            "name": "Push Day",
            "workouts": [
                {"menu": "Bench Press", "type": "weight", "unit": "kg",
                 "sets": [{"weight": 60, "reps": 10}, {"weight": 65, "reps": 8}]}
            ]
        }))?)
    }

    async fn fetch_previous_session(&self, _id: i64) -> Result<Option<PreviousSessionData>> {
        Ok(None)
    }

    async fn save_session(
        &self,
        _id: i64,
        request: &CreateTrainingSessionRequest,
    ) -> Result<SaveAck> {
        if let Some(gate) = &self.save_gate {
            gate.notified().await;
        }
        self.saves.lock().unwrap().push(request.clone());
        Ok(SaveAck { success: true, id: Some(1) })
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn screen_text(core: &mut AppCore) -> String {
    let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
    terminal.draw(|f| draw_core(f, core)).unwrap();
    terminal
        .backend()
        .buffer()
        .content
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

async fn loaded_core(api: Arc<FakeApi>) -> AppCore {
    let mut core = AppCore::new(AppConfig::default(), api);
    core.request_mysets();
    assert!(core.next_api_event().await);
    core
}

/// Open the first myset, start it and end the training right away
async fn core_at_finish(api: Arc<FakeApi>) -> AppCore {
    let mut core = loaded_core(api).await;
    core.handle_key(key(KeyCode::Enter)).unwrap();
    assert!(core.next_api_event().await);
    core.handle_key(key(KeyCode::Enter)).unwrap();
    core.handle_key(key(KeyCode::Esc)).unwrap();
    core.handle_key(key(KeyCode::Char('y'))).unwrap();
    assert_eq!(core.session().unwrap().step(), TrainingStep::Finish);
    core
}

#[tokio::test]
async fn test_list_loads_and_renders() {
    let mut core = loaded_core(Arc::new(FakeApi::default())).await;
    assert_eq!(*core.state(), AppState::Start);
    assert_eq!(core.start_screen().mysets().len(), 2);

    let text = screen_text(&mut core);
    assert!(text.contains("Push Day"));
    assert!(text.contains("Leg Day"));

    core.handle_key(key(KeyCode::Down)).unwrap();
    assert_eq!(core.start_screen().selected_myset().unwrap().name, "Leg Day");
}

#[tokio::test]
async fn test_guided_flow_saves_recorded_sets() {
    let api = Arc::new(FakeApi::default());
    let mut core = loaded_core(Arc::clone(&api)).await;

    core.handle_key(key(KeyCode::Enter)).unwrap();
    assert_eq!(*core.state(), AppState::Loading);
    assert!(core.next_api_event().await);
    assert_eq!(*core.state(), AppState::Training);
    assert_eq!(core.session().unwrap().step(), TrainingStep::Menu);
    assert!(screen_text(&mut core).contains("Bench Press"));

    // Menu -> first set, accept the planned values
    core.handle_key(key(KeyCode::Enter)).unwrap();
    assert_eq!(core.session().unwrap().step(), TrainingStep::Workout);
    core.handle_key(key(KeyCode::Enter)).unwrap();
    assert_eq!(core.session().unwrap().step(), TrainingStep::Interval);
    screen_text(&mut core);

    // Skip the rest, then overwrite reps of set 2
    core.handle_key(key(KeyCode::Char('s'))).unwrap();
    assert_eq!(core.session().unwrap().position().set, 1);
    core.handle_key(key(KeyCode::Tab)).unwrap();
    core.handle_key(key(KeyCode::Backspace)).unwrap();
    core.handle_key(key(KeyCode::Char('6'))).unwrap();
    core.handle_key(key(KeyCode::Enter)).unwrap();

    core.handle_key(key(KeyCode::Char('s'))).unwrap();
    assert_eq!(core.session().unwrap().step(), TrainingStep::Finish);
    assert!(screen_text(&mut core).contains("Training complete"));

    core.handle_key(key(KeyCode::Char('s'))).unwrap();
    assert_eq!(core.session().unwrap().finish().status, SaveStatus::Saving);
    assert!(core.next_api_event().await);

    // A successful save goes straight back to the list
    assert_eq!(*core.state(), AppState::Start);
    assert!(core.session().is_none());
    assert_eq!(core.start_screen().notice(), Some("Saved Push Day (record #1)"));

    let saves = api.saves.lock().unwrap().clone();
    assert_eq!(saves.len(), 1);
    let sets = &saves[0].workouts[0].sets;
    assert_eq!(sets.len(), 2);
    assert_eq!((sets[0].weight, sets[0].reps), (Some(60.0), Some(10)));
    assert_eq!((sets[1].weight, sets[1].reps), (Some(65.0), Some(6)));

    assert!(core.next_api_event().await);
    assert_eq!(core.start_screen().mysets().len(), 2);
    assert!(screen_text(&mut core).contains("Saved Push Day"));

    // Opening the next myset clears the banner
    core.handle_key(key(KeyCode::Enter)).unwrap();
    assert_eq!(core.start_screen().notice(), None);
}

#[tokio::test]
async fn test_load_failure_can_be_left() {
    let api = Arc::new(FakeApi {
        fail_detail: true,
        ..FakeApi::default()
    });
    let mut core = loaded_core(api).await;

    core.handle_key(key(KeyCode::Enter)).unwrap();
    assert!(core.next_api_event().await);
    assert_eq!(*core.state(), AppState::LoadFailed);
    assert!(core.load_screen().error().is_some());
    assert!(screen_text(&mut core).contains("no longer exists"));

    core.handle_key(key(KeyCode::Esc)).unwrap();
    assert_eq!(*core.state(), AppState::Start);
}

#[tokio::test]
async fn test_stale_session_load_is_dropped() {
    let mut core = loaded_core(Arc::new(FakeApi::default())).await;

    core.handle_key(key(KeyCode::Enter)).unwrap();
    let loading_epoch = core.epoch();
    // Leave before the response is applied
    core.handle_key(key(KeyCode::Esc)).unwrap();
    assert!(core.epoch() > loading_epoch);

    // The list reload and the late session load both arrive
    assert!(core.next_api_event().await);
    assert!(core.next_api_event().await);
    assert_eq!(*core.state(), AppState::Start);
    assert!(core.session().is_none());
}

#[tokio::test]
async fn test_end_training_needs_confirmation() {
    let mut core = loaded_core(Arc::new(FakeApi::default())).await;
    core.handle_key(key(KeyCode::Enter)).unwrap();
    assert!(core.next_api_event().await);
    core.handle_key(key(KeyCode::Enter)).unwrap();

    // From a set: a single Esc only opens the dialog
    core.handle_key(key(KeyCode::Esc)).unwrap();
    assert_eq!(core.session().unwrap().step(), TrainingStep::Workout);
    assert!(screen_text(&mut core).contains("End training?"));
    core.handle_key(key(KeyCode::Char('n'))).unwrap();
    assert_eq!(core.session().unwrap().step(), TrainingStep::Workout);
    assert!(!screen_text(&mut core).contains("End training?"));

    // From a rest: same dialog on `e`
    core.handle_key(key(KeyCode::Enter)).unwrap();
    assert_eq!(core.session().unwrap().step(), TrainingStep::Interval);
    core.handle_key(key(KeyCode::Char('e'))).unwrap();
    assert_eq!(core.session().unwrap().step(), TrainingStep::Interval);
    assert!(screen_text(&mut core).contains("End training?"));
    core.handle_key(key(KeyCode::Esc)).unwrap();
    assert_eq!(core.session().unwrap().step(), TrainingStep::Interval);

    core.handle_key(key(KeyCode::Esc)).unwrap();
    core.handle_key(key(KeyCode::Char('y'))).unwrap();
    assert_eq!(core.session().unwrap().step(), TrainingStep::Finish);
    assert_eq!(core.session().unwrap().summary().done_sets, 1);
}

#[tokio::test]
async fn test_quit_while_saving_cancels_the_save() {
    let gate = Arc::new(Notify::new());
    let api = Arc::new(FakeApi {
        save_gate: Some(Arc::clone(&gate)),
        ..FakeApi::default()
    });
    let mut core = core_at_finish(Arc::clone(&api)).await;

    core.handle_key(key(KeyCode::Char('s'))).unwrap();
    assert_eq!(core.session().unwrap().finish().status, SaveStatus::Saving);
    let saving_epoch = core.epoch();

    core.quit();
    assert!(core.should_quit());
    assert!(core.session().is_none());
    assert!(core.epoch() > saving_epoch);

    // The save never completes on its own, so only the cancel can produce this
    let arrived = tokio::time::timeout(Duration::from_secs(5), core.next_api_event())
        .await
        .expect("cancelled save reports back");
    assert!(arrived);
    assert!(core.session().is_none());
    assert!(core.should_quit());

    // Releasing the gate afterwards records nothing
    gate.notify_waiters();
    tokio::task::yield_now().await;
    assert!(api.saves.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_discard_returns_to_list() {
    let mut core = core_at_finish(Arc::new(FakeApi::default())).await;

    core.handle_key(key(KeyCode::Char('d'))).unwrap();
    assert!(screen_text(&mut core).contains("Discard this session?"));
    core.handle_key(key(KeyCode::Char('y'))).unwrap();
    assert_eq!(*core.state(), AppState::Start);
    assert!(core.session().is_none());
}

#[tokio::test]
async fn test_quit_keys() {
    let mut core = loaded_core(Arc::new(FakeApi::default())).await;
    core.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
        .unwrap();
    assert!(core.should_quit());

    let mut core = loaded_core(Arc::new(FakeApi::default())).await;
    core.handle_key(key(KeyCode::Char('q'))).unwrap();
    assert!(core.should_quit());
}

#[test]
fn test_state_manager_transitions() {
    let mut state_manager = StateManager::new();
    assert_eq!(*state_manager.current_state(), AppState::Start);

    state_manager.transition_to(AppState::Loading);
    state_manager.transition_to(AppState::Training);
    assert_eq!(*state_manager.current_state(), AppState::Training);

    state_manager.go_back();
    assert_eq!(*state_manager.current_state(), AppState::Loading);
}
