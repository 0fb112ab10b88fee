//! Main TUI application state machine.
//!
//! Handles:
//! - Form navigation and entry
//! - Predict and random test case actions
//! - Modal result and error dialogs

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::artifacts::{FittedPreprocessor, LinearModel};
use crate::application::report::{
    format_fingerprints, format_prediction, format_random_case, ERROR_TITLE, PREDICTION_TITLE,
    RANDOM_CASE_TITLE,
};
use crate::application::PredictionService;
use crate::domain::ClinicalInputs;

use super::ui::{
    dialog::{render_dialog, Dialog},
    form::{render_form, FormState},
    render_disclaimer,
};

/// Prediction service as deployed for the desktop form.
pub type DesktopService = PredictionService<FittedPreprocessor, LinearModel>;

/// Main application state
pub struct App {
    service: Arc<DesktopService>,
    form: FormState,
    /// Open modal, if any. Keys go to the dialog while it is shown.
    dialog: Option<Dialog>,
    /// Fingerprint summary shown under the disclaimer.
    artifacts_line: String,
    rng: StdRng,
    should_quit: bool,
}

impl App {
    /// Create the application around a loaded prediction service.
    pub fn new(service: Arc<DesktopService>) -> Self {
        let artifacts_line = format_fingerprints(service.fingerprints());
        Self {
            service,
            form: FormState::default(),
            dialog: None,
            artifacts_line,
            rng: StdRng::from_entropy(),
            should_quit: false,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let area = f.area();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(area);

                render_form(f, chunks[0], &self.form);
                render_disclaimer(f, chunks[1], &self.artifacts_line);

                if let Some(dialog) = &self.dialog {
                    render_dialog(f, area, dialog);
                }
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    pub(crate) fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.dialog.is_some() {
            if matches!(key, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.dialog = None;
            }
            return;
        }

        match key {
            KeyCode::Up | KeyCode::BackTab => self.form.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form.next_field(),
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => {
                self.form.toggle_choice();
            }
            KeyCode::Enter => self.predict(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.random_case(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.form.load_sample_data(),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char(c) => self.form.input_char(c),
            KeyCode::Backspace => self.form.delete_char(),
            KeyCode::Delete => self.form.clear_field(),
            _ => {}
        }
    }

    fn predict(&mut self) {
        let outcome = ClinicalInputs::from_answers(&self.form.to_answers())
            .and_then(|inputs| self.service.predict(&inputs));

        self.dialog = Some(match outcome {
            Ok(result) => Dialog::info(PREDICTION_TITLE, format_prediction(&result)),
            Err(e) => {
                tracing::warn!("Prediction failed: {}", e);
                Dialog::error(ERROR_TITLE, e.to_string())
            }
        });
    }

    fn random_case(&mut self) {
        self.dialog = Some(match self.service.sample_case(&mut self.rng) {
            Ok(case) => Dialog::info(RANDOM_CASE_TITLE, format_random_case(&case)),
            Err(e) => {
                tracing::warn!("Random test case failed: {}", e);
                Dialog::error(ERROR_TITLE, e.to_string())
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ArtifactBundle;
    use crate::tui::ui::dialog::DialogKind;
    use std::path::Path;

    fn app(dir: &str) -> App {
        let bundle = ArtifactBundle::load(Path::new(dir), true).expect("Artifacts should load");
        let service = PredictionService::from_bundle(bundle).expect("Should build service");
        let mut app = App::new(Arc::new(service));
        app.rng = StdRng::seed_from_u64(3);
        app
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    #[test]
    fn test_predict_opens_prediction_dialog() {
        let mut app = app("models/desktop");
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);

        let dialog = app.dialog.clone().expect("Dialog should open");
        assert_eq!(dialog.kind, DialogKind::Info);
        assert_eq!(dialog.title, "Prediction");
        assert!(dialog.body.starts_with("Heart Disease: No\n\nProbability: 27.49%"));

        // Keys are swallowed by the dialog until it is dismissed.
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc);
        assert!(app.dialog.is_none());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_invalid_form_opens_error_dialog() {
        let mut app = app("models/desktop");
        press(&mut app, KeyCode::Enter);

        let dialog = app.dialog.expect("Dialog should open");
        assert_eq!(dialog.kind, DialogKind::Error);
        assert_eq!(dialog.title, "Error");
        assert!(dialog.body.contains("age"));
    }

    #[test]
    fn test_random_case_dialog() {
        let mut app = app("models/desktop");
        press(&mut app, KeyCode::Char('r'));

        let dialog = app.dialog.expect("Dialog should open");
        assert_eq!(dialog.title, "Random Test Case");
        assert!(dialog.body.starts_with("Random Test Case:\n\nAge: "));
        assert!(dialog.body.contains("\nHeart Disease: "));
    }

    #[test]
    fn test_random_case_without_holdout_reports_error() {
        let mut app = app("models/web");
        press(&mut app, KeyCode::Char('R'));
        assert_eq!(app.dialog.expect("Dialog should open").kind, DialogKind::Error);
    }

    #[test]
    fn test_footer_lists_loaded_artifacts() {
        let app = app("models/desktop");
        for file in ["imputer.json", "scaler.json", "model.json", "x_test.json"] {
            assert!(
                app.artifacts_line.contains(&format!("{file} sha256:")),
                "{}",
                app.artifacts_line
            );
        }
    }

    #[test]
    fn test_ctrl_q_quits_even_with_dialog() {
        let mut app = app("models/desktop");
        press(&mut app, KeyCode::Enter);
        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }
}
