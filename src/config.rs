//! Loading quiz configuration (bank + tips + feedback thresholds) from TOML.
//!
//! See `QuizConfig` for the expected schema. Every field is optional; an
//! empty `questions` list means "use the built-in bank".

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{BankError, Feedback, Question, QuestionBank};

pub const DEFAULT_QUESTIONS_PER_QUIZ: usize = 10;
pub const DEFAULT_MAX_SESSIONS: usize = 1000;
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

#[derive(Clone, Debug, Deserialize)]
pub struct QuizConfig {
  #[serde(default = "default_title")]
  pub title: String,
  #[serde(default = "default_questions_per_quiz")]
  pub questions_per_quiz: usize,
  #[serde(default)]
  pub tips: Vec<String>,
  #[serde(default)]
  pub feedback: FeedbackThresholds,
  #[serde(default)]
  pub questions: Vec<Question>,
  /// Live sessions kept in memory; the least recently used one goes first.
  #[serde(default = "default_max_sessions")]
  pub max_sessions: usize,
  /// Idle sessions older than this are dropped when a new quiz starts.
  #[serde(default = "default_session_ttl_secs")]
  pub session_ttl_secs: u64,
}

impl Default for QuizConfig {
  fn default() -> Self {
    Self {
      title: default_title(),
      questions_per_quiz: DEFAULT_QUESTIONS_PER_QUIZ,
      tips: Vec::new(),
      feedback: FeedbackThresholds::default(),
      questions: Vec::new(),
      max_sessions: DEFAULT_MAX_SESSIONS,
      session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
    }
  }
}

fn default_title() -> String { "Grammar Growth Challenge".into() }
fn default_questions_per_quiz() -> usize { DEFAULT_QUESTIONS_PER_QUIZ }
fn default_max_sessions() -> usize { DEFAULT_MAX_SESSIONS }
fn default_session_ttl_secs() -> u64 { DEFAULT_SESSION_TTL_SECS }

/// Percentage cut-offs for the feedback message shown after scoring.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct FeedbackThresholds {
  pub excellent: f64,
  pub good: f64,
}

impl Default for FeedbackThresholds {
  fn default() -> Self {
    Self { excellent: 80.0, good: 50.0 }
  }
}

impl FeedbackThresholds {
  pub fn classify(&self, percentage: f64) -> Feedback {
    if percentage >= self.excellent {
      Feedback::Excellent
    } else if percentage >= self.good {
      Feedback::Good
    } else {
      Feedback::TryAgain
    }
  }
}

impl QuizConfig {
  pub fn from_toml_str(s: &str) -> Result<Self, BankError> {
    Ok(toml::from_str::<QuizConfig>(s)?)
  }

  /// Validate the configured questions into a bank. `None` when the config has none.
  pub fn bank(&self) -> Option<Result<QuestionBank, BankError>> {
    if self.questions.is_empty() {
      None
    } else {
      Some(QuestionBank::new(self.questions.clone()))
    }
  }
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. On any IO/parsing error, returns None.
pub fn load_quiz_config_from_env() -> Option<QuizConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match QuizConfig::from_toml_str(&s) {
      Ok(cfg) => {
        info!(target: "grammar_quiz", %path, questions = cfg.questions.len(), "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "grammar_quiz", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "grammar_quiz", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
