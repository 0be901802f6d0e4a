//! Finish screen implementation
//!
//! Session summary, notes, save status and the discard confirmation dialog.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::{render_confirm_dialog, render_help, render_title, ACCENT};
use crate::models::workout::trim_number;
use crate::session::{FinishState, GuidedSession, SaveStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishAction {
    None,
    Save,
    RequestDiscard,
    ConfirmDiscard,
    CancelDiscard,
    NotesChar(char),
    NotesBackspace,
}

#[derive(Debug, Default)]
pub struct FinishScreen {
    notes_focused: bool,
}

impl FinishScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes_focused(&self) -> bool {
        self.notes_focused
    }

    pub fn reset(&mut self) {
        self.notes_focused = false;
    }

    pub fn handle_key(&mut self, key: KeyEvent, state: &FinishState) -> FinishAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return FinishAction::None;
        }

        // The app leaves this screen as soon as the save lands
        if let SaveStatus::Saved(_) = state.status {
            return FinishAction::None;
        }

        if state.confirm_discard {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => FinishAction::ConfirmDiscard,
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    FinishAction::CancelDiscard
                }
                _ => FinishAction::None,
            };
        }

        if self.notes_focused {
            return match key.code {
                KeyCode::Tab | KeyCode::Esc | KeyCode::Enter => {
                    self.notes_focused = false;
                    FinishAction::None
                }
                KeyCode::Backspace => FinishAction::NotesBackspace,
                KeyCode::Char(c) => FinishAction::NotesChar(c),
                _ => FinishAction::None,
            };
        }

        if state.status.is_saving() {
            return FinishAction::None;
        }

        match key.code {
            KeyCode::Char('s') | KeyCode::Enter => FinishAction::Save,
            KeyCode::Char('d') | KeyCode::Esc => FinishAction::RequestDiscard,
            KeyCode::Tab | KeyCode::Char('m') => {
                self.notes_focused = true;
                FinishAction::None
            }
            _ => FinishAction::None,
        }
    }

    pub fn render(&self, f: &mut Frame, guided: &GuidedSession) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(7), // Summary
                Constraint::Min(4),    // Recorded sets
                Constraint::Length(3), // Notes
                Constraint::Length(3), // Status
                Constraint::Length(4), // Quote
                Constraint::Length(3), // Help
            ])
            .split(f.size());

        render_title(
            f,
            chunks[0],
            &format!("Training complete: {}", guided.session().name),
            Color::Green,
        );
        self.render_summary(f, chunks[1], guided);
        self.render_sets(f, chunks[2], guided);
        self.render_notes(f, chunks[3], guided.finish());
        self.render_status(f, chunks[4], guided.finish());

        let quote = guided.finish().quote;
        let quote = Paragraph::new(vec![
            Line::from(Span::styled(
                format!("\"{}\"", quote.text),
                Style::default().add_modifier(Modifier::ITALIC),
            )),
            Line::from(format!("- {}", quote.author)),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        f.render_widget(quote, chunks[5]);

        let hints: &[(&str, &str)] = match guided.finish().status {
            SaveStatus::Saving | SaveStatus::Saved(_) => &[("Ctrl+C", "Quit")],
            _ => &[("S", "Save"), ("M", "Notes"), ("D", "Discard")],
        };
        render_help(f, chunks[6], hints);

        if guided.finish().confirm_discard {
            render_confirm_dialog(
                f,
                "Discard",
                "Discard this session? Nothing will be saved.",
                "Y discard   N keep",
            );
        }
    }

    fn render_summary(&self, f: &mut Frame, area: Rect, guided: &GuidedSession) {
        let summary = guided.summary();
        let rows = vec![
            Row::new(vec!["Exercises".to_string(), summary.exercises.to_string()]),
            Row::new(vec![
                "Sets done".to_string(),
                format!("{} / {}", summary.done_sets, summary.planned_sets),
            ]),
            Row::new(vec!["Total volume".to_string(), trim_number(summary.volume)]),
            Row::new(vec!["Total distance".to_string(), trim_number(summary.distance)]),
        ];
        let table = Table::new(rows, [Constraint::Length(16), Constraint::Min(10)])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Summary")
                    .border_style(Style::default().fg(ACCENT)),
            )
            .column_spacing(2);
        f.render_widget(table, area);
    }

    fn render_sets(&self, f: &mut Frame, area: Rect, guided: &GuidedSession) {
        let lines: Vec<Line> = guided
            .session()
            .exercises
            .iter()
            .map(|exercise| {
                let done: Vec<String> = exercise
                    .sets()
                    .iter()
                    .filter(|s| s.done)
                    .map(|s| s.values.describe(&exercise.unit))
                    .collect();
                let text = if done.is_empty() {
                    "not done".to_string()
                } else {
                    done.join(", ")
                };
                Line::from(vec![
                    Span::styled(
                        format!("{}: ", exercise.name),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::raw(text),
                ])
            })
            .collect();
        let sets = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Recorded"));
        f.render_widget(sets, area);
    }

    fn render_notes(&self, f: &mut Frame, area: Rect, state: &FinishState) {
        let border = if self.notes_focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let cursor = if self.notes_focused { "_" } else { "" };
        let notes = Paragraph::new(format!("{}{}", state.notes, cursor)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Notes")
                .border_style(border),
        );
        f.render_widget(notes, area);
    }

    fn render_status(&self, f: &mut Frame, area: Rect, state: &FinishState) {
        let (text, color) = match &state.status {
            SaveStatus::Idle => ("Not saved yet".to_string(), Color::Gray),
            SaveStatus::Saving => ("Saving...".to_string(), Color::Yellow),
            SaveStatus::Failed(msg) => (format!("Save failed: {} Press S to retry.", msg), Color::Red),
            SaveStatus::Saved(Some(id)) => (format!("Saved (record #{})", id), Color::Green),
            SaveStatus::Saved(None) => ("Saved".to_string(), Color::Green),
        };
        let status = Paragraph::new(text)
            .style(Style::default().fg(color))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(status, area);
    }
}
