//! Modal message dialog drawn over the form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::CardioTheme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Error,
}

/// A titled message awaiting dismissal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub body: String,
}

impl Dialog {
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Info,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Error,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Rectangle of `percent_x` by `percent_y` centred in `area`.
fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
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

pub fn render_dialog(f: &mut Frame, area: Rect, dialog: &Dialog) {
    let popup = centered(area, 70, 80);

    let border_style = match dialog.kind {
        DialogKind::Info => CardioTheme::border_focused(),
        DialogKind::Error => CardioTheme::danger(),
    };

    let mut lines: Vec<Line> = dialog
        .body
        .lines()
        .map(|line| {
            if line.starts_with("Heart Disease: ") {
                let style = CardioTheme::outcome(line.ends_with("Yes"));
                Line::from(Span::styled(line, style))
            } else {
                Line::from(Span::styled(line, CardioTheme::text()))
            }
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("[Enter/Esc] ", CardioTheme::key_hint()),
        Span::styled("OK", CardioTheme::key_desc()),
    ]));

    let block = Block::default()
        .title(Span::styled(format!(" {} ", dialog.title), CardioTheme::title()))
        .borders(Borders::ALL)
        .border_style(border_style)
        .style(CardioTheme::dialog());

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        popup,
    );
}
