//! TUI screen components
//!
//! Contains individual screen implementations for different application states,
//! plus the title/help/progress widgets they share.

pub mod finish;
pub mod interval;
pub mod load;
pub mod menu;
pub mod start;
pub mod workout;

pub use finish::{FinishAction, FinishScreen};
pub use interval::{IntervalAction, IntervalScreen};
pub use load::LoadScreen;
pub use menu::{MenuAction, MenuScreen};
pub use start::{ListStatus, StartScreen};
pub use workout::{WorkoutAction, WorkoutScreen};

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

pub(crate) const ACCENT: Color = Color::Cyan;

/// Bold boxed title
pub(crate) fn render_title(f: &mut Frame, area: Rect, title: &str, color: Color) {
    let widget = Paragraph::new(title.to_string())
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    f.render_widget(widget, area);
}

/// Key hints such as `Enter Select  Q Quit`
pub(crate) fn render_help(f: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, label) in hints {
        spans.push(Span::styled(
            key.to_string(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {}  ", label)));
    }

    let help = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    f.render_widget(help, area);
}

/// Overall session progress bar
pub(crate) fn render_progress(f: &mut Frame, area: Rect, percent: f64) {
    let percent = percent.clamp(0.0, 100.0);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title("Progress")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT)),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .percent(percent.round() as u16)
        .label(format!("{:.0}%", percent));
    f.render_widget(gauge, area);
}

/// Centered rectangle for dialogs
pub(crate) fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Yes/no dialog drawn over the current screen
pub(crate) fn render_confirm_dialog(f: &mut Frame, title: &str, message: &str, keys: &str) {
    let area = centered_rect(60, 5, f.size());
    let dialog = Paragraph::new(vec![
        Line::from(message.to_string()),
        Line::from(Span::styled(
            keys.to_string(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(Style::default().fg(Color::Red)),
    );
    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}
