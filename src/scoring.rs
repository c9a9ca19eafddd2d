//! Pure scoring over a session: exact text match, unanswered never matches.

use crate::domain::{ResultRow, Score};
use crate::session::QuizSession;

pub fn score(session: &QuizSession) -> Score {
  let correct = session
    .questions()
    .iter()
    .zip(session.responses())
    .filter(|(q, r)| r.as_deref() == Some(q.answer.as_str()))
    .count();
  Score { correct, total: session.len() }
}

/// Result rows in quiz order.
pub fn result_rows(session: &QuizSession) -> Vec<ResultRow> {
  session
    .questions()
    .iter()
    .zip(session.responses())
    .map(|(q, r)| ResultRow {
      question: q.prompt.clone(),
      your_answer: r.clone(),
      correct_answer: q.answer.clone(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seeds::seed_bank;
  use rand::rngs::StdRng;
  use rand::{Rng, SeedableRng};

  fn fresh(seed: u64) -> QuizSession {
    let bank = seed_bank().expect("bank");
    QuizSession::start(&bank, 10, &mut StdRng::seed_from_u64(seed))
  }

  #[test]
  fn all_unanswered_scores_zero() {
    let s = fresh(5);
    let sc = score(&s);
    assert_eq!(sc.correct, 0);
    assert_eq!(sc.total, 7);
    assert_eq!(sc.percentage_display(), "0.00");
  }

  #[test]
  fn all_correct_scores_full() {
    let mut s = fresh(6);
    for i in 0..s.len() {
      let a = s.questions()[i].answer.clone();
      s.record(i, Some(a)).expect("valid");
    }
    let sc = score(&s);
    assert_eq!(sc.correct, sc.total);
    assert_eq!(sc.percentage_display(), "100.00");
    assert!(result_rows(&s).iter().all(ResultRow::is_correct));
  }

  #[test]
  fn random_picks_stay_in_bounds_and_match_percentage() {
    let mut rng = StdRng::seed_from_u64(11);
    for seed in 0..50 {
      let mut s = fresh(seed);
      for i in 0..s.len() {
        let choice = rng.gen_range(0..=3);
        let pick = s.questions()[i].options.get(choice).cloned();
        s.record(i, pick).expect("valid");
      }
      let sc = score(&s);
      assert!(sc.correct <= sc.total);
      let expected = 100.0 * sc.correct as f64 / sc.total as f64;
      assert!((sc.percentage() - expected).abs() < 1e-9);
      assert_eq!(sc.correct, result_rows(&s).iter().filter(|r| r.is_correct()).count());
    }
  }

  #[test]
  fn scoring_is_idempotent() {
    let mut s = fresh(8);
    let a = s.questions()[1].answer.clone();
    s.record(1, Some(a)).expect("valid");
    assert_eq!(score(&s), score(&s));
    assert_eq!(result_rows(&s), result_rows(&s));
  }
}
