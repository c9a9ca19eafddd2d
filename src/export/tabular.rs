//! `grammar_quiz_results.csv`: UTF-8, header row, `\n` line endings, RFC 4180 quoting.

use csv::{Terminator, WriterBuilder};

use super::{ExportError, HEADERS};
use crate::domain::{ResultRow, Score};

pub fn render(rows: &[ResultRow], _score: &Score) -> Result<Vec<u8>, ExportError> {
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    wtr.write_record(HEADERS)?;
    for r in rows {
        wtr.write_record([r.question.as_str(), r.your_answer_text(), r.correct_answer.as_str()])?;
    }
    wtr.into_inner()
        .map_err(|e| ExportError::Io(std::io::Error::new(e.error().kind(), e.to_string())))
}
