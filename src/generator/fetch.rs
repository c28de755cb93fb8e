use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use thiserror::Error;
use tracing::{debug, warn};

use crate::event::AppEvent;
use crate::generator::story::{DailyProblem, StorySource};
use crate::session::SessionId;

/// Shown when the explanation worker itself dies.
pub const EXPLANATION_UNAVAILABLE: &str = "Sorry, I couldn't generate an explanation right now.";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("no story source is configured (set GEMINI_API_KEY)")]
    NotConfigured,
    #[error("story worker stopped before answering")]
    WorkerFailed,
}

impl LoadError {
    /// Player-facing line shown above the fallback problem.
    pub fn banner(&self) -> &'static str {
        match self {
            LoadError::NotConfigured => {
                "No story API key is set (GEMINI_API_KEY). Here is a practice problem instead."
            }
            LoadError::WorkerFailed => "Could not fetch the daily problem. Please try again later.",
        }
    }
}

#[derive(Debug)]
pub enum StoryPayload {
    Problem(Result<DailyProblem, LoadError>),
    Explanation(String),
}

/// A worker result, tagged with the session that asked for it.
#[derive(Debug)]
pub struct StoryReply {
    pub session: SessionId,
    pub payload: StoryPayload,
}

/// Runs story source calls off the event loop and posts the results back as
/// [`AppEvent::Story`].
pub struct StoryFetcher {
    source: Option<Arc<dyn StorySource>>,
    tx: Sender<AppEvent>,
}

impl StoryFetcher {
    pub fn new(source: Option<Arc<dyn StorySource>>, tx: Sender<AppEvent>) -> Self {
        Self { source, tx }
    }

    pub fn is_configured(&self) -> bool {
        self.source.is_some()
    }

    pub fn request_problem(&self, session: SessionId) {
        let Some(source) = self.source.clone() else {
            self.post(session, StoryPayload::Problem(Err(LoadError::NotConfigured)));
            return;
        };
        let tx = self.tx.clone();
        debug!(?session, "requesting daily problem");
        thread::spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| source.fetch_daily_problem()))
                .map_err(|_| {
                    warn!(?session, "daily problem worker panicked");
                    LoadError::WorkerFailed
                });
            let _ = tx.send(AppEvent::Story(StoryReply {
                session,
                payload: StoryPayload::Problem(result),
            }));
        });
    }

    pub fn request_explanation(&self, session: SessionId, problem_statement: String, wrong_answer: String) {
        let Some(source) = self.source.clone() else {
            self.post(
                session,
                StoryPayload::Explanation(EXPLANATION_UNAVAILABLE.to_string()),
            );
            return;
        };
        let tx = self.tx.clone();
        debug!(?session, "requesting explanation");
        thread::spawn(move || {
            let text = panic::catch_unwind(AssertUnwindSafe(|| {
                source.explain(&problem_statement, &wrong_answer)
            }))
            .unwrap_or_else(|_| {
                warn!(?session, "explanation worker panicked");
                EXPLANATION_UNAVAILABLE.to_string()
            });
            let _ = tx.send(AppEvent::Story(StoryReply {
                session,
                payload: StoryPayload::Explanation(text),
            }));
        });
    }

    fn post(&self, session: SessionId, payload: StoryPayload) {
        let _ = self.tx.send(AppEvent::Story(StoryReply { session, payload }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    struct PanickingSource;

    impl StorySource for PanickingSource {
        fn fetch_daily_problem(&self) -> DailyProblem {
            panic!("boom")
        }

        fn explain(&self, _problem_statement: &str, _wrong_answer: &str) -> String {
            panic!("boom")
        }
    }

    struct EchoSource;

    impl StorySource for EchoSource {
        fn fetch_daily_problem(&self) -> DailyProblem {
            DailyProblem {
                story: "Kalisa has 4 bananas.".to_string(),
                question: "How many bananas?".to_string(),
                answer: 4,
            }
        }

        fn explain(&self, problem_statement: &str, wrong_answer: &str) -> String {
            format!("{problem_statement} / {wrong_answer}")
        }
    }

    fn recv_reply(rx: &mpsc::Receiver<AppEvent>) -> StoryReply {
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            AppEvent::Story(reply) => reply,
            _ => panic!("expected a story reply"),
        }
    }

    #[test]
    fn test_banner_names_the_cause() {
        assert!(LoadError::NotConfigured.banner().contains("GEMINI_API_KEY"));
        assert_eq!(
            LoadError::WorkerFailed.banner(),
            "Could not fetch the daily problem. Please try again later."
        );
    }

    #[test]
    fn test_unconfigured_fetch_reports_not_configured() {
        let (tx, rx) = mpsc::channel();
        let fetcher = StoryFetcher::new(None, tx);
        assert!(!fetcher.is_configured());
        fetcher.request_problem(SessionId(3));
        let reply = recv_reply(&rx);
        assert_eq!(reply.session, SessionId(3));
        assert!(matches!(
            reply.payload,
            StoryPayload::Problem(Err(LoadError::NotConfigured))
        ));
    }

    #[test]
    fn test_reply_carries_session_and_problem() {
        let (tx, rx) = mpsc::channel();
        let fetcher = StoryFetcher::new(Some(Arc::new(EchoSource)), tx);
        fetcher.request_problem(SessionId(8));
        let reply = recv_reply(&rx);
        assert_eq!(reply.session, SessionId(8));
        match reply.payload {
            StoryPayload::Problem(Ok(problem)) => assert_eq!(problem.answer, 4),
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn test_explanation_passes_statement_and_answer() {
        let (tx, rx) = mpsc::channel();
        let fetcher = StoryFetcher::new(Some(Arc::new(EchoSource)), tx);
        fetcher.request_explanation(SessionId(1), "story q".to_string(), "9".to_string());
        match recv_reply(&rx).payload {
            StoryPayload::Explanation(text) => assert_eq!(text, "story q / 9"),
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn test_worker_panic_is_contained() {
        let (tx, rx) = mpsc::channel();
        let fetcher = StoryFetcher::new(Some(Arc::new(PanickingSource)), tx);

        fetcher.request_problem(SessionId(2));
        assert!(matches!(
            recv_reply(&rx).payload,
            StoryPayload::Problem(Err(LoadError::WorkerFailed))
        ));

        fetcher.request_explanation(SessionId(2), "p".to_string(), "1".to_string());
        match recv_reply(&rx).payload {
            StoryPayload::Explanation(text) => assert_eq!(text, EXPLANATION_UNAVAILABLE),
            other => panic!("unexpected payload {other:?}"),
        }
    }
}
