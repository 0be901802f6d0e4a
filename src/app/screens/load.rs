//! Loading and load-failure screen for a single myset

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{render_help, render_title, ACCENT};

#[derive(Debug, Default)]
pub struct LoadScreen {
    myset_id: Option<i64>,
    myset_name: Option<String>,
    error: Option<String>,
}

impl LoadScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the spinner text for a myset
    pub fn set_loading(&mut self, id: i64, name: Option<String>) {
        self.myset_id = Some(id);
        self.myset_name = name;
        self.error = None;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Myset to fetch again on retry
    pub fn myset_id(&self) -> Option<i64> {
        self.myset_id
    }

    pub fn myset_name(&self) -> Option<&str> {
        self.myset_name.as_deref()
    }

    pub fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(f.size());

        let name = self
            .myset_name
            .clone()
            .or_else(|| self.myset_id.map(|id| format!("myset #{}", id)))
            .unwrap_or_default();

        match &self.error {
            None => {
                render_title(f, chunks[0], "Loading", ACCENT);
                let body = Paragraph::new(format!("Fetching {}...", name))
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL));
                f.render_widget(body, chunks[1]);
                render_help(f, chunks[2], &[("Esc", "Cancel")]);
            }
            Some(message) => {
                render_title(f, chunks[0], "Could not load myset", Color::Red);
                let body = Paragraph::new(format!("{}\n\n{}", name, message))
                    .style(Style::default().fg(Color::Red))
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true })
                    .block(Block::default().borders(Borders::ALL));
                f.render_widget(body, chunks[1]);
                render_help(f, chunks[2], &[("R", "Retry"), ("Esc", "Back"), ("Q", "Quit")]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_clears_previous_error() {
        let mut screen = LoadScreen::new();
        screen.set_loading(3, Some("Leg Day".into()));
        screen.set_error("boom");
        assert_eq!(screen.error(), Some("boom"));
        screen.set_loading(3, Some("Leg Day".into()));
        assert!(screen.error().is_none());
        assert_eq!(screen.myset_id(), Some(3));
    }
}
