//! Public request/response structs for the HTTP API (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Feedback, ResultRow};
use crate::export::ExportFormat;
use crate::session::QuizSession;

#[derive(Debug, Default, Deserialize)]
pub struct NewQuizIn {
    pub count: Option<usize>,
}

/// A question as the page sees it. The correct answer never leaves the server.
#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub index: usize,
    pub prompt: String,
    pub options: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct QuizOut {
    pub id: Uuid,
    pub title: String,
    pub questions: Vec<QuestionOut>,
    /// Current picks, parallel to `questions`.
    pub answers: Vec<Option<String>>,
    pub submitted: bool,
}

/// Convert an internal session to the public DTO.
pub fn to_out(title: &str, s: &QuizSession) -> QuizOut {
    QuizOut {
        id: s.id,
        title: title.to_string(),
        questions: s
            .questions()
            .iter()
            .enumerate()
            .map(|(index, q)| QuestionOut {
                index,
                prompt: q.prompt.clone(),
                options: q.options.clone(),
            })
            .collect(),
        answers: s.responses().to_vec(),
        submitted: s.submission().is_some(),
    }
}

#[derive(Debug, Deserialize)]
pub struct AnswerIn {
    pub index: usize,
    #[serde(default)]
    pub answer: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnswersIn {
    #[serde(default)]
    pub answers: Vec<AnswerIn>,
}

#[derive(Debug, Serialize)]
pub struct AnswersOut {
    pub answered: usize,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct DownloadOut {
    pub format: ExportFormat,
    pub file_name: &'static str,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitOut {
    pub correct: usize,
    pub total: usize,
    pub percentage: f64,
    pub percentage_display: String,
    pub feedback: Feedback,
    pub feedback_message: &'static str,
    pub rows: Vec<ResultRow>,
    pub downloads: Vec<DownloadOut>,
}

#[derive(Serialize)]
pub struct TipOut {
    pub text: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
