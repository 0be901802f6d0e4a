//! Workout screen implementation
//!
//! Text entry for the current set, the planned target and a comparison with
//! the previous session of the same myset. Esc asks before ending the
//! training.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{render_confirm_dialog, render_help, render_progress, render_title, ACCENT};
use crate::session::{FieldComparison, GuidedSession, SetDraft, SetField};
use crate::util::format_delta;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkoutAction {
    None,
    /// Record the draft and start resting
    Confirm,
    /// Go to the finish screen without recording this set
    EndTraining,
}

#[derive(Debug, Default)]
pub struct WorkoutScreen {
    draft: Option<SetDraft>,
    confirm_end: bool,
}

impl WorkoutScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> Option<&SetDraft> {
        self.draft.as_ref()
    }

    pub fn confirm_end(&self) -> bool {
        self.confirm_end
    }

    /// Drop the draft so the next `sync` seeds a fresh one
    pub fn clear(&mut self) {
        self.draft = None;
        self.confirm_end = false;
    }

    /// Seed a draft for the set under the cursor if none is loaded
    pub fn sync(&mut self, guided: &GuidedSession) -> Result<()> {
        if self.draft.is_none() {
            self.draft = Some(guided.draft()?);
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> WorkoutAction {
        let Some(draft) = self.draft.as_mut() else {
            return WorkoutAction::None;
        };
        if self.confirm_end {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.confirm_end = false;
                    WorkoutAction::EndTraining
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.confirm_end = false;
                    WorkoutAction::None
                }
                _ => WorkoutAction::None,
            };
        }
        match key.code {
            KeyCode::Enter => return WorkoutAction::Confirm,
            KeyCode::Esc => self.confirm_end = true,
            KeyCode::Tab | KeyCode::Down => draft.focus_next(),
            KeyCode::BackTab | KeyCode::Up => draft.focus_previous(),
            KeyCode::Backspace => draft.backspace(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                draft.push_char(c)
            }
            _ => {}
        }
        WorkoutAction::None
    }

    pub fn render(&self, f: &mut Frame, guided: &GuidedSession) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Progress
                Constraint::Length(6), // Inputs
                Constraint::Min(5),    // Target / previous
                Constraint::Length(3), // Help
            ])
            .split(f.size());

        let pos = guided.position();
        let (name, sets) = guided
            .current_exercise()
            .map(|e| (e.name.as_str(), e.set_count()))
            .unwrap_or(("", 0));
        render_title(
            f,
            chunks[0],
            &format!("{}  ·  Set {} of {}", name, pos.set + 1, sets),
            ACCENT,
        );
        render_progress(f, chunks[1], guided.progress());

        if let Some(draft) = &self.draft {
            self.render_inputs(f, chunks[2], draft);
            self.render_reference(f, chunks[3], guided, draft);
        }

        render_help(
            f,
            chunks[4],
            &[("Tab", "Next field"), ("Enter", "Complete set"), ("Esc", "End training")],
        );

        if self.confirm_end {
            render_confirm_dialog(
                f,
                "End training",
                "End training? Remaining sets will be skipped.",
                "Y end   N keep going",
            );
        }
    }

    fn render_inputs(&self, f: &mut Frame, area: Rect, draft: &SetDraft) {
        let fields = draft.fields();
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, fields.len() as u32); fields.len()])
            .split(area);

        for (field, column) in fields.iter().zip(columns.iter()) {
            let focused = *field == draft.focused();
            let unit = match field {
                SetField::Weight | SetField::Distance => format!(" ({})", draft.unit()),
                SetField::Reps => " (reps)".to_string(),
                SetField::Time => " (mm:ss)".to_string(),
            };
            let border = if focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let cursor = if focused { "_" } else { "" };
            let input = Paragraph::new(format!("{}{}", draft.text(*field), cursor))
                .style(Style::default().add_modifier(Modifier::BOLD))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!("{}{}", field.label(), unit))
                        .border_style(border),
                );
            f.render_widget(input, *column);
        }
    }

    fn render_reference(&self, f: &mut Frame, area: Rect, guided: &GuidedSession, draft: &SetDraft) {
        let mut lines = vec![Line::from(vec![
            Span::styled("Target: ", Style::default().fg(Color::Yellow)),
            Span::raw(draft.target().describe(draft.unit())),
        ])];

        if let Some(memo) = guided.current_exercise().and_then(|e| e.memo.as_deref()) {
            lines.push(Line::from(vec![
                Span::styled("Memo: ", Style::default().fg(Color::Yellow)),
                Span::raw(memo.to_string()),
            ]));
        }

        if draft.previous().is_some() {
            let date = guided.previous().map(|p| p.date.as_str()).unwrap_or("");
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Last time ({})", date),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            )));

            let comparisons = draft.comparisons();
            for field in draft.fields() {
                let Some(previous) = draft.previous_text(*field) else {
                    continue;
                };
                let mut spans = vec![Span::raw(format!("  {}: {}", field.label(), previous))];
                if let Some((_, cmp)) = comparisons.iter().find(|(f, _)| f == field) {
                    spans.push(comparison_span(cmp));
                }
                lines.push(Line::from(spans));
            }
            if let Some(memo) = draft.previous().and_then(|p| p.memo.as_deref()) {
                lines.push(Line::from(format!("  Memo: {}", memo)));
            }
            if let Some(message) = draft.encouragement() {
                lines.push(Line::from(Span::styled(
                    message,
                    Style::default().fg(Color::Green),
                )));
            }
        }

        let reference = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(reference, area);
    }
}

fn comparison_span(cmp: &FieldComparison) -> Span<'static> {
    match cmp {
        FieldComparison::Higher(diff) => Span::styled(
            format!("  ▲ {}", format_delta(*diff)),
            Style::default().fg(Color::Green),
        ),
        FieldComparison::Lower(diff) => Span::styled(
            format!("  ▼ {}", format_delta(*diff)),
            Style::default().fg(Color::Red),
        ),
        FieldComparison::Same => Span::styled("  =", Style::default().fg(Color::Gray)),
    }
}
