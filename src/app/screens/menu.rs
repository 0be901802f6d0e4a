//! Today's menu, shown before the first set

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame,
};

use super::{render_help, render_title, ACCENT};
use crate::app::state::{NavigationAction, StateManager};
use crate::session::GuidedSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    None,
    Start,
    Back,
    Quit,
}

#[derive(Debug, Default)]
pub struct MenuScreen;

impl MenuScreen {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key(&self, key: KeyEvent) -> MenuAction {
        match StateManager::key_to_navigation(key) {
            NavigationAction::Select => MenuAction::Start,
            NavigationAction::Back => MenuAction::Back,
            NavigationAction::Quit => MenuAction::Quit,
            _ => MenuAction::None,
        }
    }

    pub fn render(&self, f: &mut Frame, guided: &GuidedSession) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(6),    // Exercises
                Constraint::Length(3), // Previous session
                Constraint::Length(3), // Help
            ])
            .split(f.size());

        let session = guided.session();
        render_title(f, chunks[0], &format!("Today's menu: {}", session.name), ACCENT);
        self.render_exercises(f, chunks[1], guided);

        let previous = match guided.previous() {
            Some(prev) => format!("Last trained on {}", prev.date),
            None => "No previous session of this myset".to_string(),
        };
        let previous = Paragraph::new(previous)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(previous, chunks[2]);

        render_help(f, chunks[3], &[("Enter", "Start training"), ("Esc", "Back"), ("Q", "Quit")]);
    }

    fn render_exercises(&self, f: &mut Frame, area: Rect, guided: &GuidedSession) {
        let header = Row::new(vec!["#", "Exercise", "Sets", "Plan", "Memo"]).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let rows: Vec<Row> = guided
            .session()
            .exercises
            .iter()
            .enumerate()
            .map(|(i, exercise)| {
                let plan = exercise
                    .sets()
                    .iter()
                    .map(|s| s.values.describe(&exercise.unit))
                    .collect::<Vec<_>>()
                    .join(", ");
                Row::new(vec![
                    (i + 1).to_string(),
                    exercise.name.clone(),
                    exercise.set_count().to_string(),
                    plan,
                    exercise.memo.clone().unwrap_or_default(),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(3),
                Constraint::Length(20),
                Constraint::Length(5),
                Constraint::Min(20),
                Constraint::Length(16),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Exercises")
                .border_style(Style::default().fg(ACCENT)),
        )
        .column_spacing(1);

        f.render_widget(table, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn test_menu_keys() {
        let screen = MenuScreen::new();
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(screen.handle_key(key(KeyCode::Enter)), MenuAction::Start);
        assert_eq!(screen.handle_key(key(KeyCode::Esc)), MenuAction::Back);
        assert_eq!(screen.handle_key(key(KeyCode::Char('q'))), MenuAction::Quit);
        assert_eq!(screen.handle_key(key(KeyCode::Char('x'))), MenuAction::None);
    }
}
