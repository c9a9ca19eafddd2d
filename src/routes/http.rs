//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use serde::de::DeserializeOwned;
use axum::{
  body::Bytes,
  extract::{rejection::JsonRejection, Path, State},
  http::header,
  response::IntoResponse,
  Json,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

/// Parse an optional JSON body: empty means defaults, anything else must be valid JSON.
fn optional_json<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
  if body.is_empty() {
    return Ok(T::default());
  }
  let Json(value) = Json::<T>::from_bytes(body)?;
  Ok(value)
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_tip(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(TipOut { text: daily_tip(&state) })
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_quiz(
  State(state): State<Arc<AppState>>,
  body: Bytes,
) -> Result<Json<QuizOut>, ApiError> {
  let body: NewQuizIn = optional_json(&body)?;
  let quiz = start_quiz(&state, body.count).await;
  info!(target: "quiz", id = %quiz.id, questions = quiz.questions.len(), "HTTP quiz served");
  Ok(Json(quiz))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_get_quiz(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> Result<Json<QuizOut>, ApiError> {
  Ok(Json(get_quiz(&state, id).await?))
}

#[instrument(level = "info", skip(state, body), fields(%id))]
pub async fn http_put_answers(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  body: Result<Json<AnswersIn>, JsonRejection>,
) -> Result<Json<AnswersOut>, ApiError> {
  let Json(body) = body?;
  let (answered, total) = record_answers(&state, id, &body.answers).await?;
  Ok(Json(AnswersOut { answered, total }))
}

#[instrument(level = "info", skip(state, body), fields(%id))]
pub async fn http_post_submit(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  body: Bytes,
) -> Result<Json<SubmitOut>, ApiError> {
  let body: AnswersIn = optional_json(&body)?;
  let out = submit_quiz(&state, id, &body.answers).await?;
  info!(target: "quiz", %id, correct = out.correct, total = out.total, "HTTP submit evaluated");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state), fields(%id, %format))]
pub async fn http_get_export(
  State(state): State<Arc<AppState>>,
  Path((id, format)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, ApiError> {
  let (fmt, bytes) = export_results(&state, id, &format).await?;
  let headers = [
    (header::CONTENT_TYPE, fmt.content_type().to_string()),
    (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", fmt.file_name())),
  ];
  Ok((headers, bytes))
}
