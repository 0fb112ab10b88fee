//! cardiorisk: heart disease risk prediction.
//!
//! Entry point for the desktop (terminal) variant.

use std::sync::Arc;

use anyhow::{Context, Result};

use cardiorisk::adapters::ArtifactBundle;
use cardiorisk::application::PredictionService;
use cardiorisk::config::{Settings, Variant};
use cardiorisk::logging;
use cardiorisk::tui::App;

fn main() -> Result<()> {
    let settings = Settings::from_env(Variant::Desktop)?;

    // Logs on the terminal would corrupt the alternate screen.
    let _guard = logging::init(settings.log_mode, &settings.log_file, true)
        .with_context(|| format!("Failed to open log file {}", settings.log_file.display()))?;

    tracing::info!("Starting cardiorisk...");

    let bundle = ArtifactBundle::load(&settings.artifacts_dir, settings.verify_fingerprints)
        .with_context(|| {
            format!(
                "Failed to load artifacts from {}",
                settings.artifacts_dir.display()
            )
        })?;
    let service = PredictionService::from_bundle(bundle)?;
    tracing::info!("Loaded models: {}", service.model_names().collect::<Vec<_>>().join(", "));
    if !service.has_holdout() {
        tracing::warn!("No holdout table deployed; Random Test Case is unavailable");
    }

    let mut app = App::new(Arc::new(service));
    app.run()?;

    tracing::info!("cardiorisk shutdown complete.");
    Ok(())
}
