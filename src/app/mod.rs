//! TUI application module
//!
//! Contains the terminal user interface components, screen management,
//! and application state handling.

pub mod app;
pub mod screens;
pub mod state;
pub mod tui;

pub use app::{draw_core, ApiEvent, App, AppCore};
pub use screens::{FinishScreen, IntervalScreen, MenuScreen, StartScreen, WorkoutScreen};
pub use state::{AppState, NavigationAction, StateManager};
pub use tui::{Tui, TuiEvent};
