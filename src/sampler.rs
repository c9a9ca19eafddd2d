//! Picking the questions of one quiz.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{Question, QuestionBank};

/// Draw `min(requested, bank.len())` distinct questions, uniformly and in random order.
/// Asking for more than the bank holds just yields the whole bank, shuffled.
pub fn sample<R: Rng + ?Sized>(bank: &QuestionBank, requested: usize, rng: &mut R) -> Vec<Question> {
    let k = requested.min(bank.len());
    let mut picked: Vec<Question> = bank.questions().choose_multiple(rng, k).cloned().collect();
    // choose_multiple leaves the order partly tied to the bank
    picked.shuffle(rng);
    picked
}
