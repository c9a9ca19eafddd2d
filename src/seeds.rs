//! Built-in content: the default grammar bank and tips.

use crate::config::QuizConfig;
use crate::domain::{BankError, QuestionBank};

const BUILTIN_CONFIG: &str = include_str!("../bank/grammar.toml");

/// The embedded config, parsed. Guarantees the app is useful without any external file.
pub fn seed_config() -> Result<QuizConfig, BankError> {
  QuizConfig::from_toml_str(BUILTIN_CONFIG)
}

pub fn seed_bank() -> Result<QuestionBank, BankError> {
  QuestionBank::new(seed_config()?.questions)
}

/// Tips shown when the loaded config brings none of its own.
pub fn seed_tips() -> Vec<String> {
  seed_config().map(|c| c.tips).unwrap_or_default()
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  #[test]
  fn builtin_bank_is_valid() {
    let bank = seed_bank().expect("built-in bank validates");
    assert_eq!(bank.len(), 7);
  }

  #[test]
  fn builtin_distractors_are_distinct_from_answer_and_each_other() {
    let bank = seed_bank().expect("bank");
    for q in bank.questions() {
      let distractors: Vec<&str> = q.distractors().collect();
      assert_eq!(distractors.len(), 2, "{:?} must list its answer exactly once", q.prompt);
      assert!(distractors.iter().all(|d| *d != q.answer));
      let unique: HashSet<&&str> = distractors.iter().collect();
      assert_eq!(unique.len(), distractors.len(), "{:?}", q.prompt);
    }
  }

  #[test]
  fn builtin_tips_present() {
    assert_eq!(seed_tips().len(), 5);
  }
}
