//! Core behaviors behind the HTTP handlers.
//!
//! This includes:
//!   - Starting a quiz session (sampling from the bank)
//!   - Recording picks and submitting for a score
//!   - Rendering the three result downloads
//!   - Picking the daily grammar tip

use rand::seq::SliceRandom;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::export::ExportFormat;
use crate::protocol::{AnswerIn, DownloadOut, QuizOut, SubmitOut};
use crate::session::QuizSession;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn start_quiz(state: &AppState, count: Option<usize>) -> QuizOut {
  let requested = count.unwrap_or(state.questions_per_quiz);
  let session = QuizSession::start(&state.bank, requested, &mut rand::thread_rng());
  info!(target: "quiz", id = %session.id, requested, sampled = session.len(), "Quiz session started");
  let out = crate::protocol::to_out(&state.title, &session);
  state.insert_session(session).await;
  out
}

#[instrument(level = "info", skip(state))]
pub async fn get_quiz(state: &AppState, id: Uuid) -> Result<QuizOut, ApiError> {
  let session = state.get_session(id).await.ok_or(ApiError::UnknownSession(id))?;
  Ok(crate::protocol::to_out(&state.title, &session))
}

/// Apply a batch of picks; one invalid pick rejects the whole batch.
#[instrument(level = "info", skip(state, answers), fields(%id, n = answers.len()))]
pub async fn record_answers(state: &AppState, id: Uuid, answers: &[AnswerIn]) -> Result<(usize, usize), ApiError> {
  state
    .with_session(id, |s| -> Result<(usize, usize), ApiError> {
      s.record_all(&picks(answers))?;
      let answered = s.responses().iter().filter(|r| r.is_some()).count();
      debug!(target: "quiz", %id, answered, total = s.len(), "Answers recorded");
      Ok((answered, s.len()))
    })
    .await
    .ok_or(ApiError::UnknownSession(id))?
}

#[instrument(level = "info", skip(state, answers), fields(%id, n = answers.len()))]
pub async fn submit_quiz(state: &AppState, id: Uuid, answers: &[AnswerIn]) -> Result<SubmitOut, ApiError> {
  let submission = state
    .with_session(id, |s| -> Result<_, ApiError> {
      s.record_all(&picks(answers))?;
      Ok(s.submit().clone())
    })
    .await
    .ok_or(ApiError::UnknownSession(id))??;

  let score = submission.score;
  let feedback = state.feedback.classify(score.percentage());
  info!(
    target: "quiz",
    %id,
    correct = score.correct,
    total = score.total,
    percentage = %score.percentage_display(),
    ?feedback,
    "Quiz submitted"
  );

  let downloads = ExportFormat::ALL
    .into_iter()
    .map(|format| DownloadOut {
      format,
      file_name: format.file_name(),
      url: format!("/api/v1/quiz/{}/export/{}", id, format.slug()),
    })
    .collect();

  Ok(SubmitOut {
    correct: score.correct,
    total: score.total,
    percentage: score.percentage(),
    percentage_display: score.percentage_display(),
    feedback,
    feedback_message: feedback.message(),
    rows: submission.rows,
    downloads,
  })
}

/// Render one download. Only available once the quiz has been submitted.
#[instrument(level = "info", skip(state), fields(%id, %format))]
pub async fn export_results(state: &AppState, id: Uuid, format: &str) -> Result<(ExportFormat, Vec<u8>), ApiError> {
  let fmt = ExportFormat::from_slug(format).ok_or_else(|| ApiError::UnknownFormat(format.to_string()))?;
  let session = state.get_session(id).await.ok_or(ApiError::UnknownSession(id))?;
  let submission = session.submission().ok_or(ApiError::NotSubmitted(id))?;
  let bytes = fmt.render(&submission.rows, &submission.score)?;
  info!(target: "quiz", %id, format = fmt.slug(), bytes = bytes.len(), "Results exported");
  Ok((fmt, bytes))
}

fn picks(answers: &[AnswerIn]) -> Vec<(usize, Option<String>)> {
  answers.iter().map(|a| (a.index, a.answer.clone())).collect()
}

pub fn daily_tip(state: &AppState) -> String {
  state
    .tips
    .choose(&mut rand::thread_rng())
    .cloned()
    .unwrap_or_default()
}
