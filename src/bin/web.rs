//! cardiorisk web server.
//!
//! Serves the questionnaire, the account pages and the JSON `/predict`
//! endpoint over the web deployment's artifacts.

use std::sync::Arc;

use anyhow::{Context, Result};

use cardiorisk::adapters::{ArtifactBundle, JsonUserStore};
use cardiorisk::application::{AccountService, PredictionService};
use cardiorisk::config::{Settings, Variant};
use cardiorisk::logging;
use cardiorisk::web::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::from_env(Variant::Web)?;
    let _guard = logging::init(settings.log_mode, &settings.log_file, false)
        .with_context(|| format!("Failed to open log file {}", settings.log_file.display()))?;

    let bundle = ArtifactBundle::load(&settings.artifacts_dir, settings.verify_fingerprints)
        .with_context(|| {
            format!(
                "Failed to load artifacts from {}",
                settings.artifacts_dir.display()
            )
        })?;
    let predictions = PredictionService::from_bundle(bundle)?;

    let store = JsonUserStore::new(&settings.user_db).with_context(|| {
        format!(
            "Failed to open user registry {}",
            settings.user_db.display()
        )
    })?;
    tracing::info!("User registry: {}", store.path().display());
    let accounts = AccountService::new(Arc::new(store));

    let app = router(AppState::new(predictions, accounts));

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_addr))?;
    tracing::info!("cardiorisk-web listening on http://{}", settings.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
