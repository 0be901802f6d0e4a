//! Rest interval screen
//!
//! Countdown with pause/resume and a custom length, what comes next, and a
//! memo for the set that was just completed. Keys act on the timer unless
//! the memo box has focus. Ending the training early asks first.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use super::{render_confirm_dialog, render_help, render_progress, render_title, ACCENT};
use crate::session::{GuidedSession, UpNext, Urgency};
use crate::util::{format_clock, format_duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalAction {
    None,
    /// Start, pause or resume the countdown
    ToggleTimer,
    /// Stop resting and move on
    Skip,
    NextExercise,
    /// Confirmed from the end-training dialog
    EndTraining,
    ExtraSet,
    IncreaseRest,
    DecreaseRest,
    ApplyRest,
    MemoChar(char),
    MemoBackspace,
}

#[derive(Debug, Default)]
pub struct IntervalScreen {
    memo_focused: bool,
    confirm_end: bool,
}

impl IntervalScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn memo_focused(&self) -> bool {
        self.memo_focused
    }

    pub fn confirm_end(&self) -> bool {
        self.confirm_end
    }

    /// Back to timer controls; called when a new interval begins
    pub fn reset(&mut self) {
        self.memo_focused = false;
        self.confirm_end = false;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> IntervalAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return IntervalAction::None;
        }

        if self.confirm_end {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.confirm_end = false;
                    IntervalAction::EndTraining
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.confirm_end = false;
                    IntervalAction::None
                }
                _ => IntervalAction::None,
            };
        }

        if self.memo_focused {
            return match key.code {
                KeyCode::Tab | KeyCode::Esc | KeyCode::Enter => {
                    self.memo_focused = false;
                    IntervalAction::None
                }
                KeyCode::Backspace => IntervalAction::MemoBackspace,
                KeyCode::Char(c) => IntervalAction::MemoChar(c),
                _ => IntervalAction::None,
            };
        }

        match key.code {
            KeyCode::Char(' ') => IntervalAction::ToggleTimer,
            KeyCode::Enter | KeyCode::Char('s') => IntervalAction::Skip,
            KeyCode::Char('n') => IntervalAction::NextExercise,
            KeyCode::Char('e') | KeyCode::Esc => {
                self.confirm_end = true;
                IntervalAction::None
            }
            KeyCode::Char('x') => IntervalAction::ExtraSet,
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => IntervalAction::IncreaseRest,
            KeyCode::Char('-') | KeyCode::Left => IntervalAction::DecreaseRest,
            KeyCode::Char('a') => IntervalAction::ApplyRest,
            KeyCode::Tab | KeyCode::Char('m') => {
                self.memo_focused = true;
                IntervalAction::None
            }
            _ => IntervalAction::None,
        }
    }

    pub fn render(&self, f: &mut Frame, guided: &GuidedSession) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Progress
                Constraint::Length(5), // Countdown
                Constraint::Length(3), // Custom rest
                Constraint::Min(4),    // Up next
                Constraint::Length(3), // Memo
                Constraint::Length(3), // Help
            ])
            .split(f.size());

        render_title(f, chunks[0], "Rest", ACCENT);
        render_progress(f, chunks[1], guided.progress());
        self.render_countdown(f, chunks[2], guided);

        let timer = guided.timer();
        let custom = Paragraph::new(format!(
            "Custom rest: {}   (←/→ adjust, A apply)",
            format_duration(std::time::Duration::from_secs(timer.custom_secs()))
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(custom, chunks[3]);

        self.render_up_next(f, chunks[4], guided);
        self.render_memo(f, chunks[5], guided);

        let mut hints = vec![("Space", "Start/Pause"), ("Enter", "Skip rest")];
        if guided.has_next_exercise() {
            hints.push(("N", "Next exercise"));
        }
        if guided.is_last_set_of_exercise() {
            hints.push(("X", "Extra set"));
        }
        hints.push(("M", "Memo"));
        hints.push(("E", "End training"));
        render_help(f, chunks[6], &hints);

        if self.confirm_end {
            render_confirm_dialog(
                f,
                "End training",
                "End training? Remaining sets will be skipped.",
                "Y end   N keep going",
            );
        }
    }

    fn render_countdown(&self, f: &mut Frame, area: Rect, guided: &GuidedSession) {
        let timer = guided.timer();
        let color = match timer.urgency() {
            Urgency::Critical => Color::Red,
            Urgency::Warning => Color::Yellow,
            Urgency::Calm => Color::Green,
        };
        let state = if timer.is_running() {
            ""
        } else if timer.is_fresh() {
            "  (press Space to start)"
        } else {
            "  (paused)"
        };

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Countdown"))
            .gauge_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .ratio(timer.ratio())
            .label(format!("{}{}", format_clock(timer.remaining_secs()), state));
        f.render_widget(gauge, area);
    }

    fn render_up_next(&self, f: &mut Frame, area: Rect, guided: &GuidedSession) {
        let text = match guided.up_next() {
            UpNext::Set {
                exercise,
                set_number,
                values,
                unit,
            } => format!("{}  ·  Set {}  ·  {}", exercise, set_number, values.describe(&unit)),
            UpNext::Exercise { name, sets } => format!("Next exercise: {} ({} sets)", name, sets),
            UpNext::Finish => "Last set done. Next up: finish".to_string(),
        };
        let up_next = Paragraph::new(Line::from(text))
            .block(Block::default().borders(Borders::ALL).title("Up next"));
        f.render_widget(up_next, area);
    }

    fn render_memo(&self, f: &mut Frame, area: Rect, guided: &GuidedSession) {
        let border = if self.memo_focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let cursor = if self.memo_focused { "_" } else { "" };
        let memo = Paragraph::new(format!("{}{}", guided.interval_memo(), cursor)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Memo for this set")
                .border_style(border),
        );
        f.render_widget(memo, area);
    }
}
