//! Clinical input form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{Field, RawAnswers};
use crate::tui::styles::CardioTheme;

/// One labelled entry: free numeric text or a two-way choice.
#[derive(Debug, Clone)]
pub struct FormField {
    pub field: Field,
    pub hint: &'static str,
    pub value: String,
}

impl FormField {
    fn new(field: Field, hint: &'static str) -> Self {
        // Choice fields always hold one of their options; the first is the default.
        let value = field
            .choices()
            .map(|[first, _]| first.to_string())
            .unwrap_or_default();
        Self { field, hint, value }
    }

    /// Switch a choice field to its other option.
    fn toggle(&mut self) {
        if let Some([a, b]) = self.field.choices() {
            let next = if self.value == a { b } else { a };
            self.value = next.to_string();
        }
    }
}

/// Form state
pub struct FormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            fields: vec![
                FormField::new(Field::Age, "years"),
                FormField::new(Field::SysBp, "mmHg"),
                FormField::new(Field::DiaBp, "mmHg"),
                FormField::new(Field::Glucose, "mg/dL"),
                FormField::new(Field::TotChol, "mg/dL"),
                FormField::new(Field::CigsPerDay, "count"),
                FormField::new(Field::PrevalentHyp, "Yes / No"),
                FormField::new(Field::Diabetes, "Yes / No"),
                FormField::new(Field::BpMeds, "Yes / No"),
                FormField::new(Field::Sex, "Male / Female"),
            ],
            selected_field: 0,
            error_message: None,
        }
    }
}

impl FormState {
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    fn current(&mut self) -> &mut FormField {
        &mut self.fields[self.selected_field]
    }

    /// Type into a numeric field. Ignored on choice fields; anything but a
    /// digit, `.` or `-` is rejected with a footer message.
    pub fn input_char(&mut self, c: char) {
        let current = self.current();
        if current.field.is_categorical() {
            return;
        }
        if c.is_ascii_digit() || c == '.' || c == '-' {
            current.value.push(c);
            self.error_message = None;
        } else {
            let label = current.field.label();
            self.error_message = Some(format!("{label} accepts numbers only"));
        }
    }

    pub fn delete_char(&mut self) {
        let current = self.current();
        if !current.field.is_categorical() {
            current.value.pop();
        }
    }

    pub fn clear_field(&mut self) {
        let current = self.current();
        if !current.field.is_categorical() {
            current.value.clear();
        }
    }

    /// Flip the selected choice field. Returns false on numeric fields.
    pub fn toggle_choice(&mut self) -> bool {
        let current = self.current();
        if current.field.is_categorical() {
            current.toggle();
            self.error_message = None;
            true
        } else {
            false
        }
    }

    /// Current entries keyed by question key.
    #[must_use]
    pub fn to_answers(&self) -> RawAnswers {
        self.fields
            .iter()
            .map(|f| (f.field.key().to_string(), f.value.clone()))
            .collect()
    }

    /// Fill the form with a typical patient.
    pub fn load_sample_data(&mut self) {
        let sample = [
            (Field::Age, "55"),
            (Field::SysBp, "140"),
            (Field::DiaBp, "85"),
            (Field::Glucose, "90"),
            (Field::TotChol, "220"),
            (Field::CigsPerDay, "10"),
            (Field::PrevalentHyp, "Yes"),
            (Field::Diabetes, "No"),
            (Field::BpMeds, "No"),
            (Field::Sex, "Male"),
        ];
        for (field, value) in sample {
            if let Some(entry) = self.fields.iter_mut().find(|f| f.field == field) {
                entry.value = value.to_string();
            }
        }
        self.error_message = None;
    }
}

/// Render the input form
pub fn render_form(f: &mut Frame, area: Rect, state: &FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Fields
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0]);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", CardioTheme::text()),
        Span::styled("Heart Disease Prediction", CardioTheme::title()),
        Span::styled(" │ Ten clinical risk factors", CardioTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(CardioTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &FormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (state.fields.len() + 1) / 2;
    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(f, columns[1], &state.fields[mid..], mid, state.selected_field);
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, entry) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let (border_style, title_style) = if is_selected {
            (CardioTheme::border_focused(), CardioTheme::focused())
        } else {
            (CardioTheme::border(), CardioTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", entry.field.label()), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let mut spans = vec![Span::raw(" ")];
        match entry.field.choices() {
            Some(options) => {
                for option in options {
                    let style = if entry.value == option {
                        CardioTheme::choice_selected()
                    } else {
                        CardioTheme::text_muted()
                    };
                    spans.push(Span::styled(format!(" {option} "), style));
                    spans.push(Span::raw(" "));
                }
            }
            None if entry.value.is_empty() => {
                spans.push(Span::styled(entry.hint, CardioTheme::text_muted()));
            }
            None => spans.push(Span::styled(entry.value.as_str(), CardioTheme::text())),
        }
        if is_selected && !entry.field.is_categorical() {
            spans.push(Span::styled("▌", CardioTheme::cursor()));
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &FormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", CardioTheme::danger()),
            Span::styled(err.as_str(), CardioTheme::danger()),
        ])
    } else {
        let hints = [
            ("[↑↓] ", "Navigate "),
            ("[←→/Space] ", "Choose "),
            ("[Enter] ", "Predict "),
            ("[R] ", "Random Test Case "),
            ("[S] ", "Sample Data "),
            ("[Q] ", "Quit"),
        ];
        Line::from(
            hints
                .into_iter()
                .flat_map(|(key, desc)| {
                    [
                        Span::styled(key, CardioTheme::key_hint()),
                        Span::styled(desc, CardioTheme::key_desc()),
                    ]
                })
                .collect::<Vec<_>>(),
        )
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(CardioTheme::border()),
    );

    f.render_widget(footer, area);
}
