//! Application state: the question bank, quiz settings, and the session registry.
//!
//! The bank comes from QUIZ_CONFIG_PATH when that file parses and validates,
//! otherwise from the built-in seed. Each quiz session is an independent entry
//! in `sessions`, touched only by requests that carry its id.
//!
//! The registry is bounded: starting a quiz first drops sessions idle longer
//! than `session_ttl`, then the least recently used ones beyond `max_sessions`.

use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::config::{load_quiz_config_from_env, FeedbackThresholds, QuizConfig};
use crate::domain::{BankError, QuestionBank};
use crate::seeds::{seed_bank, seed_config, seed_tips};
use crate::session::QuizSession;

#[derive(Clone)]
pub struct AppState {
    pub bank: Arc<QuestionBank>,
    pub title: String,
    pub questions_per_quiz: usize,
    pub tips: Vec<String>,
    pub feedback: FeedbackThresholds,
    pub max_sessions: usize,
    pub session_ttl: Duration,
    pub sessions: Arc<RwLock<HashMap<Uuid, QuizSession>>>,
}

impl AppState {
    /// Build state from env: load config if any, fall back to the built-in bank.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Result<Self, BankError> {
        Self::from_config(load_quiz_config_from_env())
    }

    pub fn from_config(cfg: Option<QuizConfig>) -> Result<Self, BankError> {
        let cfg = match cfg {
            Some(c) => c,
            None => seed_config()?,
        };

        let bank = match cfg.bank() {
            Some(Ok(bank)) => bank,
            Some(Err(e)) => {
                error!(target: "grammar_quiz", error = %e, "Configured bank is invalid; using built-in bank");
                seed_bank()?
            }
            None => {
                warn!(target: "grammar_quiz", "Config has no questions; using built-in bank");
                seed_bank()?
            }
        };

        let tips = if cfg.tips.is_empty() { seed_tips() } else { cfg.tips.clone() };

        info!(
            target: "grammar_quiz",
            questions = bank.len(),
            per_quiz = cfg.questions_per_quiz,
            tips = tips.len(),
            max_sessions = cfg.max_sessions,
            session_ttl_secs = cfg.session_ttl_secs,
            "Question bank ready"
        );

        Ok(Self {
            bank: Arc::new(bank),
            title: cfg.title,
            questions_per_quiz: cfg.questions_per_quiz,
            tips,
            feedback: cfg.feedback,
            max_sessions: cfg.max_sessions.max(1),
            session_ttl: Duration::from_secs(cfg.session_ttl_secs),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    #[instrument(level = "debug", skip(self, session), fields(id = %session.id))]
    pub async fn insert_session(&self, session: QuizSession) {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.last_seen().elapsed() < self.session_ttl);
        let expired = before - sessions.len();

        let mut evicted = 0;
        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, s)| s.last_seen())
                .map(|(id, _)| *id);
            let Some(oldest) = oldest else { break };
            sessions.remove(&oldest);
            evicted += 1;
        }

        if expired + evicted > 0 {
            debug!(target: "quiz", expired, evicted, live = sessions.len(), "Sessions dropped");
        }
        sessions.insert(session.id, session);
    }

    /// Read-only copy of a session by id.
    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn get_session(&self, id: Uuid) -> Option<QuizSession> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Run `f` against the session with exclusive access. `None` if the id is unknown.
    /// Marks the session as recently used.
    pub async fn with_session<T>(&self, id: Uuid, f: impl FnOnce(&mut QuizSession) -> T) -> Option<T> {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(&id).map(|s| {
            s.touch();
            f(s)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limited(max_sessions: usize, session_ttl_secs: u64) -> AppState {
        let cfg = QuizConfig { max_sessions, session_ttl_secs, ..seed_config().expect("seed") };
        AppState::from_config(Some(cfg)).expect("state")
    }

    fn one_question(state: &AppState) -> QuizSession {
        QuizSession::with_questions(state.bank.questions()[..1].to_vec())
    }

    #[test]
    fn builtin_state_without_config() {
        let state = AppState::from_config(None).expect("state");
        assert_eq!(state.bank.len(), 7);
        assert_eq!(state.questions_per_quiz, 10);
        assert_eq!(state.tips.len(), 5);
    }

    #[test]
    fn invalid_configured_bank_falls_back_to_builtin() {
        let cfg = QuizConfig::from_toml_str(
            r#"
            tips = ["Mind your tenses."]
            [[questions]]
            prompt = "Broken?"
            options = ["a", "a", "b"]
            answer = "a"
            "#,
        )
        .expect("parses");
        let state = AppState::from_config(Some(cfg)).expect("state");
        assert_eq!(state.bank.len(), 7);
        assert_eq!(state.tips, vec!["Mind your tenses.".to_string()]);
    }

    #[tokio::test]
    async fn sessions_are_isolated_by_id() {
        let state = AppState::from_config(None).expect("state");
        let a = QuizSession::with_questions(state.bank.questions()[..2].to_vec());
        let b = QuizSession::with_questions(state.bank.questions()[2..4].to_vec());
        let (ida, idb) = (a.id, b.id);
        state.insert_session(a).await;
        state.insert_session(b).await;

        let answer = state.bank.questions()[0].answer.clone();
        state
            .with_session(ida, |s| s.record(0, Some(answer)))
            .await
            .expect("known id")
            .expect("valid answer");

        let a = state.get_session(ida).await.expect("a");
        let b = state.get_session(idb).await.expect("b");
        assert!(a.responses()[0].is_some());
        assert!(b.responses().iter().all(Option::is_none));
        assert!(state.get_session(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn registry_never_exceeds_its_cap() {
        let state = limited(3, 3600);
        let mut ids = Vec::new();
        for _ in 0..5 {
            let s = one_question(&state);
            ids.push(s.id);
            state.insert_session(s).await;
            std::thread::sleep(Duration::from_millis(2));
        }
        assert_eq!(state.sessions.read().await.len(), 3);
        assert!(state.get_session(ids[0]).await.is_none());
        assert!(state.get_session(ids[1]).await.is_none());
        for id in &ids[2..] {
            assert!(state.get_session(*id).await.is_some());
        }
    }

    #[tokio::test]
    async fn recently_used_session_survives_eviction() {
        let state = limited(2, 3600);
        let (a, b, c) = (one_question(&state), one_question(&state), one_question(&state));
        let (ida, idb, idc) = (a.id, b.id, c.id);
        state.insert_session(a).await;
        std::thread::sleep(Duration::from_millis(2));
        state.insert_session(b).await;
        std::thread::sleep(Duration::from_millis(2));
        state.with_session(ida, |_| ()).await.expect("a is live");
        std::thread::sleep(Duration::from_millis(2));
        state.insert_session(c).await;

        assert!(state.get_session(ida).await.is_some());
        assert!(state.get_session(idb).await.is_none());
        assert!(state.get_session(idc).await.is_some());
    }

    #[tokio::test]
    async fn idle_sessions_expire_on_insert() {
        let state = limited(100, 0);
        let (a, b) = (one_question(&state), one_question(&state));
        let (ida, idb) = (a.id, b.id);
        state.insert_session(a).await;
        state.insert_session(b).await;
        assert!(state.get_session(ida).await.is_none());
        assert!(state.get_session(idb).await.is_some());
        assert_eq!(state.sessions.read().await.len(), 1);
    }
}
