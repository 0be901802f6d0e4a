//! Start screen implementation
//!
//! Lists the user's mysets and starts a guided session for the selected one.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::{render_help, render_title, ACCENT};
use crate::models::MySetSummary;

/// Whether the list is usable yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Start screen component with myset selection
#[derive(Debug)]
pub struct StartScreen {
    mysets: Vec<MySetSummary>,
    selected_index: usize,
    list_state: ListState,
    status: ListStatus,
    notice: Option<String>,
}

impl StartScreen {
    /// Create a new start screen waiting for the list
    pub fn new() -> Self {
        Self {
            mysets: Vec::new(),
            selected_index: 0,
            list_state: ListState::default(),
            status: ListStatus::Loading,
            notice: None,
        }
    }

    pub fn status(&self) -> &ListStatus {
        &self.status
    }

    /// Banner shown above the list until the next session starts
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn set_loading(&mut self) {
        self.status = ListStatus::Loading;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status = ListStatus::Failed(message.into());
    }

    /// Replace the list, keeping the selection in range
    pub fn set_mysets(&mut self, mysets: Vec<MySetSummary>) {
        self.mysets = mysets;
        self.status = ListStatus::Ready;
        if self.mysets.is_empty() {
            self.selected_index = 0;
            self.list_state.select(None);
        } else {
            self.selected_index = self.selected_index.min(self.mysets.len() - 1);
            self.list_state.select(Some(self.selected_index));
        }
    }

    pub fn mysets(&self) -> &[MySetSummary] {
        &self.mysets
    }

    /// Get the currently selected myset
    pub fn selected_myset(&self) -> Option<&MySetSummary> {
        if self.status != ListStatus::Ready {
            return None;
        }
        self.mysets.get(self.selected_index)
    }

    /// Move selection up
    pub fn select_previous(&mut self) {
        if self.mysets.is_empty() {
            return;
        }
        if self.selected_index > 0 {
            self.selected_index -= 1;
        } else {
            self.selected_index = self.mysets.len() - 1;
        }
        self.list_state.select(Some(self.selected_index));
    }

    /// Move selection down
    pub fn select_next(&mut self) {
        if self.mysets.is_empty() {
            return;
        }
        if self.selected_index < self.mysets.len() - 1 {
            self.selected_index += 1;
        } else {
            self.selected_index = 0;
        }
        self.list_state.select(Some(self.selected_index));
    }

    /// Render the start screen
    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(2), // Subtitle
                Constraint::Min(8),    // Myset list
                Constraint::Length(3), // Help text
            ])
            .split(f.size());

        render_title(f, chunks[0], "MYSETRUN", ACCENT);

        let subtitle = match &self.notice {
            Some(notice) => Paragraph::new(notice.as_str()).style(Style::default().fg(Color::Green)),
            None => Paragraph::new("Pick a myset to train").style(Style::default().fg(Color::White)),
        }
        .alignment(Alignment::Center);
        f.render_widget(subtitle, chunks[1]);

        self.render_list(f, chunks[2]);

        render_help(
            f,
            chunks[3],
            &[("↑↓", "Navigate"), ("Enter", "Start"), ("R", "Reload"), ("Q", "Quit")],
        );
    }

    fn render_list(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("My Sets");

        let message = match &self.status {
            ListStatus::Loading => Some(("Loading mysets...".to_string(), Color::Yellow)),
            ListStatus::Failed(msg) => Some((format!("{}\n\nPress R to retry.", msg), Color::Red)),
            ListStatus::Ready if self.mysets.is_empty() => Some((
                "No mysets yet. Create one in the web app first.".to_string(),
                Color::Gray,
            )),
            ListStatus::Ready => None,
        };

        if let Some((text, color)) = message {
            let paragraph = Paragraph::new(text)
                .style(Style::default().fg(color))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block);
            f.render_widget(paragraph, area);
            return;
        }

        let items: Vec<ListItem> = self
            .mysets
            .iter()
            .map(|m| {
                let updated = m
                    .updated_at
                    .as_deref()
                    .and_then(|d| d.get(..10))
                    .map(|d| format!("  (updated {})", d))
                    .unwrap_or_default();
                ListItem::new(format!("{}{}", m.name, updated))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(ACCENT).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(list, area, &mut self.list_state);
    }
}

impl Default for StartScreen {
    fn default() -> Self {
        Self::new()
    }
}
