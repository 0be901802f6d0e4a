//! Application state management
//!
//! Handles screen transitions, navigation logic, and keyboard event processing
//! for the TUI application. Which training screen is shown inside
//! `AppState::Training` is decided by the guided session's own step.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Application screens/states
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppState {
    /// Myset list
    #[default]
    Start,
    /// Fetching a myset and its previous session
    Loading,
    /// Guided session: menu, workout, interval or finish
    Training,
    /// The myset could not be fetched; no guided flow
    LoadFailed,
    /// Exit immediately
    Exit,
}

/// Navigation actions that can be triggered by keyboard input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationAction {
    /// Move selection up (arrow up, k, Shift+Tab)
    Up,
    /// Move selection down (arrow down, j, Tab)
    Down,
    /// Confirm selection (Enter, Space)
    Select,
    /// Go back/cancel (Esc, Backspace)
    Back,
    /// Retry the last request (r)
    Retry,
    /// Quit application (q, Q, Ctrl+C)
    Quit,
    /// No action
    None,
}

/// Application state manager
#[derive(Debug)]
pub struct StateManager {
    current_state: AppState,
    previous_state: Option<AppState>,
    should_quit: bool,
}

impl StateManager {
    /// Create a new state manager starting at the myset list
    pub fn new() -> Self {
        Self {
            current_state: AppState::Start,
            previous_state: None,
            should_quit: false,
        }
    }

    /// Get the current application state
    pub fn current_state(&self) -> &AppState {
        &self.current_state
    }

    /// Get the previous state if available
    pub fn previous_state(&self) -> Option<&AppState> {
        self.previous_state.as_ref()
    }

    /// Check if the application should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit || self.current_state == AppState::Exit
    }

    /// Set the quit flag
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Transition to a new state
    pub fn transition_to(&mut self, new_state: AppState) {
        if new_state != self.current_state {
            self.previous_state = Some(self.current_state.clone());
            self.current_state = new_state;
        }
    }

    /// Go back to the previous state if available, otherwise go to Start
    pub fn go_back(&mut self) {
        match self.previous_state.take() {
            Some(prev_state) => {
                self.current_state = prev_state;
            }
            None => {
                self.current_state = AppState::Start;
            }
        }
    }

    /// Handle the transitions that do not depend on screen contents
    pub fn handle_navigation(&mut self, action: &NavigationAction) {
        match (&self.current_state, action) {
            (_, NavigationAction::Quit) => self.should_quit = true,
            (AppState::Start, NavigationAction::Back) => self.should_quit = true,
            (AppState::LoadFailed, NavigationAction::Back)
            | (AppState::Loading, NavigationAction::Back) => {
                self.transition_to(AppState::Start);
            }
            // Everything else belongs to the active screen
            _ => {}
        }
    }

    /// Convert keyboard event to navigation action.
    /// Only used on screens without text entry.
    pub fn key_to_navigation(key: KeyEvent) -> NavigationAction {
        match key.code {
            // Quit keys
            KeyCode::Char('q') | KeyCode::Char('Q') => NavigationAction::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                NavigationAction::Quit
            }

            // Navigation keys
            KeyCode::Up | KeyCode::Char('k') => NavigationAction::Up,
            KeyCode::Down | KeyCode::Char('j') => NavigationAction::Down,

            // Selection and confirmation
            KeyCode::Enter | KeyCode::Char(' ') => NavigationAction::Select,

            // Back/cancel
            KeyCode::Esc | KeyCode::Backspace => NavigationAction::Back,

            KeyCode::Char('r') | KeyCode::Char('R') => NavigationAction::Retry,
            KeyCode::Tab => NavigationAction::Down,
            KeyCode::BackTab => NavigationAction::Up,

            _ => NavigationAction::None,
        }
    }

    /// Ctrl+C quits from every screen, including text entry
    pub fn is_force_quit(key: &KeyEvent) -> bool {
        key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_state_manager_creation() {
        let state_manager = StateManager::new();
        assert_eq!(*state_manager.current_state(), AppState::Start);
        assert!(!state_manager.should_quit());
        assert!(state_manager.previous_state().is_none());
    }

    #[test]
    fn test_state_transitions() {
        let mut state_manager = StateManager::new();

        state_manager.transition_to(AppState::Loading);
        assert_eq!(*state_manager.current_state(), AppState::Loading);
        assert_eq!(state_manager.previous_state(), Some(&AppState::Start));

        state_manager.transition_to(AppState::Training);
        assert_eq!(*state_manager.current_state(), AppState::Training);
        assert_eq!(state_manager.previous_state(), Some(&AppState::Loading));
    }

    #[test]
    fn test_go_back() {
        let mut state_manager = StateManager::new();

        state_manager.transition_to(AppState::LoadFailed);
        state_manager.go_back();
        assert_eq!(*state_manager.current_state(), AppState::Start);
        assert!(state_manager.previous_state().is_none());

        // Going back from Start stays at Start
        state_manager.go_back();
        assert_eq!(*state_manager.current_state(), AppState::Start);
    }

    #[test]
    fn test_quit_handling() {
        let mut state_manager = StateManager::new();
        state_manager.handle_navigation(&NavigationAction::Quit);
        assert!(state_manager.should_quit());

        let mut state_manager = StateManager::new();
        state_manager.transition_to(AppState::Exit);
        assert!(state_manager.should_quit());
    }

    #[test]
    fn test_back_navigation() {
        let mut state_manager = StateManager::new();
        state_manager.transition_to(AppState::LoadFailed);
        state_manager.handle_navigation(&NavigationAction::Back);
        assert_eq!(*state_manager.current_state(), AppState::Start);
        assert!(!state_manager.should_quit());

        // Back from Start quits
        state_manager.handle_navigation(&NavigationAction::Back);
        assert!(state_manager.should_quit());
    }

    #[test]
    fn test_training_navigation_is_left_to_screens() {
        let mut state_manager = StateManager::new();
        state_manager.transition_to(AppState::Training);
        state_manager.handle_navigation(&NavigationAction::Back);
        state_manager.handle_navigation(&NavigationAction::Select);
        assert_eq!(*state_manager.current_state(), AppState::Training);
        assert!(!state_manager.should_quit());
    }

    #[test]
    fn test_key_to_navigation() {
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(StateManager::key_to_navigation(key(KeyCode::Char('q'))), NavigationAction::Quit);
        assert_eq!(
            StateManager::key_to_navigation(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            NavigationAction::Quit
        );
        assert_eq!(StateManager::key_to_navigation(key(KeyCode::Up)), NavigationAction::Up);
        assert_eq!(StateManager::key_to_navigation(key(KeyCode::Char('j'))), NavigationAction::Down);
        assert_eq!(StateManager::key_to_navigation(key(KeyCode::Enter)), NavigationAction::Select);
        assert_eq!(StateManager::key_to_navigation(key(KeyCode::Esc)), NavigationAction::Back);
        assert_eq!(StateManager::key_to_navigation(key(KeyCode::Char('r'))), NavigationAction::Retry);
        assert_eq!(StateManager::key_to_navigation(key(KeyCode::Tab)), NavigationAction::Down);
        assert_eq!(StateManager::key_to_navigation(key(KeyCode::BackTab)), NavigationAction::Up);
    }

    #[test]
    fn test_force_quit() {
        assert!(StateManager::is_force_quit(&KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!StateManager::is_force_quit(&KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::NONE
        )));
    }
}
