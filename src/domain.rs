//! Domain models: questions, the bank they live in, result rows and scores.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of choices rendered for every question.
pub const OPTIONS_PER_QUESTION: usize = 3;

/// One multiple-choice prompt. `answer` must be one of the shown `options`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
  pub prompt: String,
  pub options: Vec<String>,
  pub answer: String,
}

impl Question {
  /// Options that are not the correct answer.
  pub fn distractors(&self) -> impl Iterator<Item = &str> {
    self.options.iter().map(String::as_str).filter(move |o| *o != self.answer)
  }

  pub fn has_option(&self, choice: &str) -> bool {
    self.options.iter().any(|o| o == choice)
  }

  fn validate(&self) -> Result<(), BankError> {
    if self.prompt.trim().is_empty() {
      return Err(BankError::EmptyField { prompt: self.prompt.clone(), field: "prompt" });
    }
    if self.options.len() != OPTIONS_PER_QUESTION {
      return Err(BankError::OptionCount { prompt: self.prompt.clone(), found: self.options.len() });
    }
    if self.answer.trim().is_empty() {
      return Err(BankError::EmptyField { prompt: self.prompt.clone(), field: "answer" });
    }
    if self.options.iter().any(|o| o.trim().is_empty()) {
      return Err(BankError::EmptyField { prompt: self.prompt.clone(), field: "options" });
    }

    let mut seen = HashSet::new();
    for o in &self.options {
      if !seen.insert(o.as_str()) {
        return Err(BankError::DuplicateOption { prompt: self.prompt.clone(), option: o.clone() });
      }
    }
    if !self.has_option(&self.answer) {
      return Err(BankError::AnswerNotOffered { prompt: self.prompt.clone(), answer: self.answer.clone() });
    }
    Ok(())
  }
}

#[derive(Debug, Error)]
pub enum BankError {
  #[error("question bank is empty")]
  Empty,
  #[error("duplicate prompt in bank: {0:?}")]
  DuplicatePrompt(String),
  #[error("{prompt:?}: expected 3 options, found {found}")]
  OptionCount { prompt: String, found: usize },
  #[error("{prompt:?}: empty {field}")]
  EmptyField { prompt: String, field: &'static str },
  #[error("{prompt:?}: option {option:?} is listed twice")]
  DuplicateOption { prompt: String, option: String },
  #[error("{prompt:?}: correct answer {answer:?} is not among the options")]
  AnswerNotOffered { prompt: String, answer: String },
  #[error("invalid bank TOML: {0}")]
  Parse(#[from] toml::de::Error),
}

/// Validated, prompt-unique set of questions. Immutable once built.
#[derive(Clone, Debug)]
pub struct QuestionBank {
  questions: Vec<Question>,
}

impl QuestionBank {
  pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
    if questions.is_empty() {
      return Err(BankError::Empty);
    }
    let mut prompts = HashSet::new();
    for q in &questions {
      q.validate()?;
      if !prompts.insert(q.prompt.as_str()) {
        return Err(BankError::DuplicatePrompt(q.prompt.clone()));
      }
    }
    Ok(Self { questions })
  }

  pub fn questions(&self) -> &[Question] {
    &self.questions
  }

  pub fn len(&self) -> usize {
    self.questions.len()
  }
}

/// One scored comparison, shared input of every exporter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResultRow {
  pub question: String,
  pub your_answer: Option<String>,
  pub correct_answer: String,
}

impl ResultRow {
  pub fn is_correct(&self) -> bool {
    self.your_answer.as_deref() == Some(self.correct_answer.as_str())
  }

  /// Text shown for the user's answer in exports; blank when unanswered.
  pub fn your_answer_text(&self) -> &str {
    self.your_answer.as_deref().unwrap_or("")
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Score {
  pub correct: usize,
  pub total: usize,
}

impl Score {
  pub fn percentage(&self) -> f64 {
    if self.total == 0 { 0.0 } else { 100.0 * self.correct as f64 / self.total as f64 }
  }

  /// Percentage with two decimals, e.g. "66.67".
  pub fn percentage_display(&self) -> String {
    format!("{:.2}", self.percentage())
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
  Excellent,
  Good,
  TryAgain,
}

impl Feedback {
  pub fn message(&self) -> &'static str {
    match self {
      Feedback::Excellent => "Excellent! Keep it up!",
      Feedback::Good => "Good job! Keep practicing.",
      Feedback::TryAgain => "Don't worry! Try again and improve!",
    }
  }
}
