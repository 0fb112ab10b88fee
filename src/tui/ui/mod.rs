//! UI module: View components for the TUI.

pub mod dialog;
pub mod form;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::CardioTheme;

/// Footer with the medical disclaimer and the loaded artifact fingerprints.
pub fn render_disclaimer(f: &mut Frame, area: Rect, artifacts: &str) {
    let text = vec![
        Line::from(vec![Span::styled(
            "DISCLAIMER: This tool provides indicative estimates and does not replace professional medical evaluation.",
            CardioTheme::text_muted(),
        )]),
        Line::from(vec![Span::styled(artifacts, CardioTheme::text_secondary())]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(CardioTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
