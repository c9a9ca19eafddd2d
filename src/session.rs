//! One quiz attempt: the sampled questions and the user's picks.

use std::time::Instant;

use rand::Rng;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Question, QuestionBank, ResultRow, Score};
use crate::sampler::sample;
use crate::scoring;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("question index {index} out of range (quiz has {total})")]
    UnknownQuestion { index: usize, total: usize },
    #[error("{answer:?} is not an option of question {index}")]
    NotAnOption { index: usize, answer: String },
}

/// Frozen outcome of a submit action.
#[derive(Clone, Debug)]
pub struct Submission {
    pub rows: Vec<ResultRow>,
    pub score: Score,
}

/// Session-scoped state. `responses[i]` belongs to `questions[i]`; `None` until picked.
#[derive(Clone, Debug)]
pub struct QuizSession {
    pub id: Uuid,
    questions: Vec<Question>,
    responses: Vec<Option<String>>,
    submission: Option<Submission>,
    last_seen: Instant,
}

impl QuizSession {
    /// Start a quiz with `requested` questions drawn from `bank`.
    pub fn start<R: Rng + ?Sized>(bank: &QuestionBank, requested: usize, rng: &mut R) -> Self {
        Self::with_questions(sample(bank, requested, rng))
    }

    pub fn with_questions(questions: Vec<Question>) -> Self {
        let responses = vec![None; questions.len()];
        Self {
            id: Uuid::new_v4(),
            questions,
            responses,
            submission: None,
            last_seen: Instant::now(),
        }
    }

    /// Last time a request touched this session.
    pub fn last_seen(&self) -> Instant {
        self.last_seen
    }

    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn responses(&self) -> &[Option<String>] {
        &self.responses
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Record (or clear, with `None`) the pick for question `index`.
    /// Only one of the question's own options is accepted.
    pub fn record(&mut self, index: usize, answer: Option<String>) -> Result<(), SessionError> {
        self.check(index, answer.as_deref())?;
        self.responses[index] = answer;
        Ok(())
    }

    /// Record a batch of picks. Either every pick is valid and all are applied,
    /// or nothing changes and the first offending pick is reported.
    pub fn record_all(&mut self, picks: &[(usize, Option<String>)]) -> Result<(), SessionError> {
        for (index, answer) in picks {
            self.check(*index, answer.as_deref())?;
        }
        for (index, answer) in picks {
            self.responses[*index] = answer.clone();
        }
        Ok(())
    }

    fn check(&self, index: usize, answer: Option<&str>) -> Result<(), SessionError> {
        let total = self.questions.len();
        let question = self
            .questions
            .get(index)
            .ok_or(SessionError::UnknownQuestion { index, total })?;
        match answer {
            Some(a) if !question.has_option(a) => {
                Err(SessionError::NotAnOption { index, answer: a.to_string() })
            }
            _ => Ok(()),
        }
    }

    /// Score the current responses and keep the result for exports.
    /// Submitting again recomputes from whatever is recorded now.
    pub fn submit(&mut self) -> &Submission {
        let rows = scoring::result_rows(self);
        let score = scoring::score(self);
        self.submission.insert(Submission { rows, score })
    }

    pub fn submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds::seed_bank;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session() -> QuizSession {
        let bank = seed_bank().expect("bank");
        QuizSession::start(&bank, 10, &mut StdRng::seed_from_u64(1))
    }

    #[test]
    fn starts_with_one_empty_slot_per_question() {
        let s = session();
        assert_eq!(s.len(), 7);
        assert_eq!(s.responses().len(), 7);
        assert!(s.responses().iter().all(Option::is_none));
        assert!(s.submission().is_none());
    }

    #[test]
    fn record_rejects_foreign_answers_and_bad_indexes() {
        let mut s = session();
        assert_eq!(
            s.record(7, None),
            Err(SessionError::UnknownQuestion { index: 7, total: 7 })
        );
        assert!(matches!(
            s.record(0, Some("definitely not an option".into())),
            Err(SessionError::NotAnOption { index: 0, .. })
        ));
        assert!(s.responses()[0].is_none());
    }

    #[test]
    fn record_then_clear() {
        let mut s = session();
        let pick = s.questions()[2].options[0].clone();
        s.record(2, Some(pick.clone())).expect("valid option");
        assert_eq!(s.responses()[2].as_deref(), Some(pick.as_str()));
        s.record(2, None).expect("clearing is allowed");
        assert!(s.responses()[2].is_none());
    }

    #[test]
    fn bad_pick_in_a_batch_leaves_every_slot_untouched() {
        let mut s = session();
        let good = s.questions()[0].options[0].clone();
        let err = s.record_all(&[(0, Some(good.clone())), (99, None)]).unwrap_err();
        assert_eq!(err, SessionError::UnknownQuestion { index: 99, total: 7 });
        assert!(s.responses()[0].is_none());

        let err = s
            .record_all(&[(0, Some(good.clone())), (1, Some("not offered".into()))])
            .unwrap_err();
        assert!(matches!(err, SessionError::NotAnOption { index: 1, .. }));
        assert!(s.responses().iter().all(Option::is_none));

        let second = s.questions()[1].options[2].clone();
        s.record_all(&[(0, Some(good.clone())), (1, Some(second))]).expect("valid batch");
        assert_eq!(s.responses()[0].as_deref(), Some(good.as_str()));
        assert!(s.responses()[1].is_some());
    }

    #[test]
    fn submit_reflects_latest_responses() {
        let mut s = session();
        assert_eq!(s.submit().score.correct, 0);
        let answer = s.questions()[0].answer.clone();
        s.record(0, Some(answer)).expect("valid");
        assert_eq!(s.submit().score.correct, 1);
        assert_eq!(s.submission().map(|x| x.rows.len()), Some(7));
    }
}
