//! TUI module: Terminal User Interface using Ratatui.
//!
//! The desktop variant: a form for the ten clinical inputs with a
//! Predict action and a Random Test Case action, each answered by a
//! modal dialog.

mod app;
mod styles;
mod ui;

pub use app::{App, DesktopService};
pub use styles::CardioTheme;
