//! Result exporters. Each one turns the same `(rows, score)` into the bytes of a
//! downloadable file. All outputs are deterministic: no clocks, no random IDs.

use serde::Serialize;
use thiserror::Error;

use crate::domain::{ResultRow, Score};

pub mod document;
pub mod spreadsheet;
pub mod tabular;

pub const HEADERS: [&str; 3] = ["Question", "Your Answer", "Correct Answer"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("xlsx export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("pdf export failed: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("export buffer error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Xlsx, ExportFormat::Pdf];

    /// URL segment, e.g. `/export/csv`.
    pub fn slug(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn from_slug(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.slug().eq_ignore_ascii_case(s))
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "grammar_quiz_results.csv",
            ExportFormat::Xlsx => "grammar_quiz_results.xlsx",
            ExportFormat::Pdf => "grammar_quiz_results.pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn render(&self, rows: &[ResultRow], score: &Score) -> Result<Vec<u8>, ExportError> {
        match self {
            ExportFormat::Csv => tabular::render(rows, score),
            ExportFormat::Xlsx => spreadsheet::render(rows, score),
            ExportFormat::Pdf => document::render(rows, score),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::{ResultRow, Score};

    pub fn rows() -> Vec<ResultRow> {
        vec![
            ResultRow {
                question: "Choose the correct word: 'I am taller ___ my brother.'".into(),
                your_answer: Some("than".into()),
                correct_answer: "than".into(),
            },
            ResultRow {
                question: "Which is correct, \"fewer\" or \"less\", for countable nouns?".into(),
                your_answer: Some("less".into()),
                correct_answer: "fewer".into(),
            },
            ResultRow {
                question: "Which sentence is grammatically correct?".into(),
                your_answer: None,
                correct_answer: "They're going to the park.".into(),
            },
        ]
    }

    pub fn score() -> Score {
        Score { correct: 1, total: 3 }
    }

    pub fn all_correct() -> (Vec<ResultRow>, Score) {
        let rows: Vec<ResultRow> = rows()
            .into_iter()
            .map(|mut r| {
                r.your_answer = Some(r.correct_answer.clone());
                r
            })
            .collect();
        let total = rows.len();
        (rows, Score { correct: total, total })
    }
}
