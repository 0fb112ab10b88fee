//! Web variant: HTTP routes over the prediction and account services.
//!
//! | Route | Method | Behaviour |
//! |-------|--------|-----------|
//! | `/`, `/login` | GET | login page |
//! | `/login` | POST | form login, redirect to `/index` |
//! | `/registration` | GET, POST | registration page / form, redirect to `/login` |
//! | `/index` | GET | questionnaire |
//! | `/index` | POST | redirect to `/predict` |
//! | `/predict` | POST | JSON answers in, JSON labels by model out |
//! | `/book` | GET | static reading page |

mod handlers;
mod pages;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::adapters::artifacts::{FittedPreprocessor, LinearModel};
use crate::adapters::JsonUserStore;
use crate::application::{AccountService, PredictionService};

pub use handlers::{Answer, PredictRequest};

/// Prediction service as deployed for the web front-end.
pub type WebPredictionService = PredictionService<FittedPreprocessor, LinearModel>;

/// Account service over the flat-file registry.
pub type WebAccountService = AccountService<JsonUserStore>;

/// Shared, read-only handles for every request.
#[derive(Clone)]
pub struct AppState {
    pub predictions: Arc<WebPredictionService>,
    pub accounts: Arc<WebAccountService>,
}

impl AppState {
    pub fn new(predictions: WebPredictionService, accounts: WebAccountService) -> Self {
        Self {
            predictions: Arc::new(predictions),
            accounts: Arc::new(accounts),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::show_login))
        .route(
            "/login",
            get(handlers::show_login).post(handlers::process_login),
        )
        .route(
            "/registration",
            get(handlers::show_registration).post(handlers::process_registration),
        )
        .route("/index", get(handlers::index).post(handlers::index_submit))
        .route("/predict", post(handlers::predict))
        .route("/book", get(handlers::book))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
