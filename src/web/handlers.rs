//! Request handlers.
//!
//! Every error is turned into a response here: JSON `{"error": ...}` for
//! `/predict`, a re-rendered form for login and registration.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use zeroize::Zeroize;

use super::{pages, AppState};
use crate::domain::{ClinicalInputs, RawAnswers};
use crate::CardioError;

/// Body of `POST /predict`.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub answers: Vec<Answer>,
}

/// One questionnaire answer. The value may be sent as a string or a number.
#[derive(Debug, Deserialize)]
pub struct Answer {
    pub question: String,
    pub answer: Value,
}

impl PredictRequest {
    /// Flatten into question key -> answer text. A repeated question keeps
    /// its last answer.
    fn into_answers(self) -> Result<RawAnswers, CardioError> {
        let mut answers = RawAnswers::with_capacity(self.answers.len());
        for Answer { question, answer } in self.answers {
            let text = match answer {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                other => {
                    return Err(CardioError::InvalidInput(format!(
                        "{question}: unsupported answer {other}"
                    )))
                }
            };
            answers.insert(question, text);
        }
        Ok(answers)
    }
}

/// JSON error body with a status derived from the error kind.
pub(super) struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<CardioError> for ApiError {
    fn from(err: CardioError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!("Prediction request failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: format!("Invalid request body: {}", rejection.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub(super) async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(ApiError::from)?;
    let answers = request.into_answers()?;
    let inputs = ClinicalInputs::from_answers(&answers)?;
    let labels = state.predictions.predict_all(&inputs)?;
    Ok(Json(labels).into_response())
}

pub(super) async fn show_login() -> Html<String> {
    Html(pages::login(None))
}

pub(super) async fn show_registration() -> Html<String> {
    Html(pages::registration(None))
}

pub(super) async fn index() -> Html<String> {
    Html(pages::index())
}

pub(super) async fn index_submit() -> Redirect {
    Redirect::to("/predict")
}

pub(super) async fn book() -> Html<String> {
    Html(pages::book())
}

#[derive(Deserialize)]
pub(super) struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

impl Drop for LoginForm {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}

#[derive(Deserialize)]
pub(super) struct RegistrationForm {
    #[serde(default)]
    fullname: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

impl Drop for RegistrationForm {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}

/// Run blocking registry work off the async executor.
async fn blocking<T, F>(work: F) -> Result<T, CardioError>
where
    F: FnOnce() -> Result<T, CardioError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| CardioError::Io(std::io::Error::other(e)))?
}

pub(super) async fn process_login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Response {
    let accounts = state.accounts.clone();
    let outcome = blocking(move || accounts.login(&form.username, &form.password)).await;

    match outcome {
        Ok(_) => Redirect::to("/index").into_response(),
        Err(e @ CardioError::InvalidCredentials) => Html(pages::login(Some(&e.to_string()))).into_response(),
        Err(e) => {
            tracing::error!("Login failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(pages::login(Some("An error occurred. Please try again."))),
            )
                .into_response()
        }
    }
}

pub(super) async fn process_registration(
    State(state): State<AppState>,
    Form(form): Form<RegistrationForm>,
) -> Response {
    let accounts = state.accounts.clone();
    let outcome =
        blocking(move || accounts.register(&form.fullname, &form.username, &form.password)).await;

    match outcome {
        Ok(_) => Redirect::to("/login").into_response(),
        Err(e @ (CardioError::DuplicateUsername | CardioError::InvalidInput(_))) => {
            Html(pages::registration(Some(&e.to_string()))).into_response()
        }
        Err(e) => {
            tracing::error!("Registration failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(pages::registration(Some(
                    "An error occurred. Please try again.",
                ))),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: Value) -> PredictRequest {
        serde_json::from_value(body).expect("Valid request")
    }

    #[test]
    fn test_numbers_and_strings_are_accepted() {
        let answers = request(json!({
            "answers": [
                { "question": "age", "answer": 55 },
                { "question": "sysBP", "answer": "140.5" },
            ]
        }))
        .into_answers()
        .expect("Should flatten");

        assert_eq!(answers["age"], "55");
        assert_eq!(answers["sysBP"], "140.5");
    }

    #[test]
    fn test_last_duplicate_wins() {
        let answers = request(json!({
            "answers": [
                { "question": "age", "answer": "40" },
                { "question": "age", "answer": "41" },
            ]
        }))
        .into_answers()
        .expect("Should flatten");
        assert_eq!(answers["age"], "41");
    }

    #[test]
    fn test_other_json_values_are_invalid_input() {
        let err = request(json!({
            "answers": [{ "question": "age", "answer": null }]
        }))
        .into_answers()
        .unwrap_err();
        assert!(matches!(err, CardioError::InvalidInput(_)));
    }
}
