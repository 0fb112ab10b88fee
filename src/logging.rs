//! Tracing setup shared by the binaries.

use std::io::IsTerminal;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::adapters::sanitize::SanitizingMakeWriter;
use crate::config::LogMode;

/// Whether logs should go to `log_file` rather than stdout.
///
/// In `Auto` mode a terminal UI owns the screen, so an interactive stdout
/// means file logging.
#[must_use]
pub fn use_file(mode: LogMode, owns_terminal: bool) -> bool {
    match mode {
        LogMode::File => true,
        LogMode::Stdout => false,
        LogMode::Auto => owns_terminal && std::io::stdout().is_terminal(),
    }
}

/// Install the global subscriber. Keep the returned guard alive until exit
/// or buffered lines are lost.
///
/// # Errors
/// Returns error if the log file cannot be opened.
pub fn init(mode: LogMode, log_file: &Path, owns_terminal: bool) -> std::io::Result<WorkerGuard> {
    let (writer, guard) = if use_file(mode, owns_terminal) {
        if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            // Opening the file below reports the real failure.
            let _ = std::fs::create_dir_all(parent);
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_modes() {
        assert!(use_file(LogMode::File, false));
        assert!(!use_file(LogMode::Stdout, true));
        // A server never owns the terminal.
        assert!(!use_file(LogMode::Auto, false));
    }
}
