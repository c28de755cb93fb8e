use crate::engine::scoring::{DAILY_CORRECT, DAILY_INCORRECT};
use crate::generator::fetch::{EXPLANATION_UNAVAILABLE, LoadError};
use crate::generator::story::DailyProblem;
use crate::session::SessionId;
use crate::session::input::AnswerInput;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DailyPhase {
    Loading,
    Ready,
    AwaitingRetry,
    AnsweredCorrect,
}

/// What the coordinator must send to the story source for a hint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplainRequest {
    pub problem_statement: String,
    pub wrong_answer: String,
}

pub struct DailyProblemSession {
    id: SessionId,
    phase: DailyPhase,
    problem: Option<DailyProblem>,
    load_error: Option<LoadError>,
    input: AnswerInput,
    last_answer: Option<String>,
    explanation: Option<String>,
    explaining: bool,
}

impl DailyProblemSession {
    /// Starts in `Loading`; the caller dispatches the first fetch.
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            phase: DailyPhase::Loading,
            problem: None,
            load_error: None,
            input: AnswerInput::new(),
            last_answer: None,
            explanation: None,
            explaining: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> DailyPhase {
        self.phase
    }

    pub fn problem(&self) -> Option<&DailyProblem> {
        self.problem.as_ref()
    }

    pub fn load_error(&self) -> Option<&LoadError> {
        self.load_error.as_ref()
    }

    pub fn input(&self) -> &AnswerInput {
        &self.input
    }

    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    pub fn is_explaining(&self) -> bool {
        self.explaining
    }

    fn accepts_answer(&self) -> bool {
        matches!(self.phase, DailyPhase::Ready | DailyPhase::AwaitingRetry) && !self.explaining
    }

    pub fn can_explain(&self) -> bool {
        self.phase == DailyPhase::AwaitingRetry
            && !self.explaining
            && self.last_answer.as_deref().is_some_and(|a| !a.is_empty())
    }

    pub fn can_retry_load(&self) -> bool {
        self.load_error.is_some()
            && matches!(self.phase, DailyPhase::Ready | DailyPhase::AwaitingRetry)
    }

    pub fn on_problem_loaded(&mut self, result: Result<DailyProblem, LoadError>) -> bool {
        if self.phase != DailyPhase::Loading {
            return false;
        }
        match result {
            Ok(problem) => {
                self.problem = Some(problem);
                self.load_error = None;
            }
            Err(err) => {
                self.problem = Some(DailyProblem::fallback());
                self.load_error = Some(err);
            }
        }
        self.phase = DailyPhase::Ready;
        true
    }

    pub fn type_char(&mut self, ch: char) -> bool {
        self.accepts_answer() && self.input.process_char(ch)
    }

    pub fn backspace(&mut self) {
        if self.accepts_answer() {
            self.input.process_backspace();
        }
    }

    #[cfg(test)]
    pub fn set_input(&mut self, text: &str) {
        if self.accepts_answer() {
            self.input.set(text);
        }
    }

    /// Check the typed answer. Returns the score delta to report, or None if
    /// the submission was ignored.
    pub fn submit(&mut self) -> Option<i64> {
        if !self.accepts_answer() {
            return None;
        }
        let expected = self.problem.as_ref()?.answer;
        let answer = self.input.parsed()?;

        if answer == expected {
            self.phase = DailyPhase::AnsweredCorrect;
            Some(DAILY_CORRECT)
        } else {
            self.phase = DailyPhase::AwaitingRetry;
            self.last_answer = Some(self.input.value().to_string());
            Some(DAILY_INCORRECT)
        }
    }

    pub fn request_explanation(&mut self) -> Option<ExplainRequest> {
        if !self.can_explain() {
            return None;
        }
        let problem_statement = self.problem.as_ref()?.statement();
        let wrong_answer = self.last_answer.clone()?;
        self.explaining = true;
        self.explanation = None;
        Some(ExplainRequest {
            problem_statement,
            wrong_answer,
        })
    }

    pub fn on_explanation(&mut self, text: String) -> bool {
        if !self.explaining {
            return false;
        }
        self.explaining = false;
        self.explanation = Some(if text.trim().is_empty() {
            EXPLANATION_UNAVAILABLE.to_string()
        } else {
            text
        });
        true
    }

    /// Re-enter `Loading` after a failed first load. Returns true if the
    /// caller should dispatch a new fetch.
    pub fn retry_load(&mut self) -> bool {
        if !self.can_retry_load() || self.explaining {
            return false;
        }
        self.phase = DailyPhase::Loading;
        self.problem = None;
        self.load_error = None;
        self.input.clear();
        self.last_answer = None;
        self.explanation = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::story::{FALLBACK_ANSWER, FALLBACK_QUESTION, FALLBACK_STORY};

    fn market_problem() -> DailyProblem {
        DailyProblem {
            story: "Uwase sells 6 avocados for 150 RWF each at Kimironko market.".to_string(),
            question: "How many francs does she earn?".to_string(),
            answer: 900,
        }
    }

    fn ready_session() -> DailyProblemSession {
        let mut daily = DailyProblemSession::new(SessionId(1));
        daily.on_problem_loaded(Ok(market_problem()));
        daily
    }

    #[test]
    fn test_starts_loading_and_rejects_input() {
        let mut daily = DailyProblemSession::new(SessionId(1));
        assert_eq!(daily.phase(), DailyPhase::Loading);
        assert!(!daily.type_char('1'));
        assert_eq!(daily.submit(), None);
        assert!(daily.problem().is_none());
    }

    #[test]
    fn test_successful_load_exposes_exact_problem() {
        let daily = ready_session();
        assert_eq!(daily.phase(), DailyPhase::Ready);
        assert_eq!(daily.problem(), Some(&market_problem()));
        assert!(daily.load_error().is_none());
        assert!(!daily.can_retry_load());
    }

    #[test]
    fn test_failed_load_uses_fallback_and_scores_fifty() {
        let mut daily = DailyProblemSession::new(SessionId(1));
        assert!(daily.on_problem_loaded(Err(LoadError::WorkerFailed)));
        assert_eq!(daily.phase(), DailyPhase::Ready);
        let problem = daily.problem().unwrap();
        assert_eq!(problem.story, FALLBACK_STORY);
        assert_eq!(problem.question, FALLBACK_QUESTION);
        assert_eq!(problem.answer, FALLBACK_ANSWER);
        assert_eq!(daily.load_error(), Some(&LoadError::WorkerFailed));
        assert!(daily.can_retry_load());

        daily.set_input("15");
        assert_eq!(daily.submit(), Some(50));
        assert_eq!(daily.phase(), DailyPhase::AnsweredCorrect);
    }

    #[test]
    fn test_large_franc_answer_can_be_typed() {
        let mut daily = DailyProblemSession::new(SessionId(4));
        daily.on_problem_loaded(Ok(DailyProblem {
            story: "A cooperative in Huye sells 500 bags of coffee for 25000 RWF each.".to_string(),
            question: "How many francs does it earn?".to_string(),
            answer: 12_500_000,
        }));
        for ch in "12500000".chars() {
            assert!(daily.type_char(ch));
        }
        assert_eq!(daily.input().value(), "12500000");
        assert_eq!(daily.submit(), Some(50));
        assert_eq!(daily.phase(), DailyPhase::AnsweredCorrect);
    }

    #[test]
    fn test_late_load_ignored_once_ready() {
        let mut daily = ready_session();
        assert!(!daily.on_problem_loaded(Ok(DailyProblem::fallback())));
        assert_eq!(daily.problem(), Some(&market_problem()));
    }

    #[test]
    fn test_answered_correct_is_terminal() {
        let mut daily = ready_session();
        daily.set_input("900");
        assert_eq!(daily.submit(), Some(50));
        assert_eq!(daily.submit(), None);
        assert!(!daily.type_char('1'));
        assert!(daily.request_explanation().is_none());
        assert!(!daily.retry_load());
        assert_eq!(daily.phase(), DailyPhase::AnsweredCorrect);
    }

    #[test]
    fn test_wrong_answer_then_explain_then_resubmit() {
        let mut daily = ready_session();
        daily.set_input("800");
        assert_eq!(daily.submit(), Some(-5));
        assert_eq!(daily.phase(), DailyPhase::AwaitingRetry);

        let request = daily.request_explanation().unwrap();
        assert_eq!(
            request.problem_statement,
            "Uwase sells 6 avocados for 150 RWF each at Kimironko market. How many francs does she earn?"
        );
        assert_eq!(request.wrong_answer, "800");
        assert!(daily.is_explaining());

        // One explanation at a time, and no submits while it is in flight.
        assert!(daily.request_explanation().is_none());
        assert_eq!(daily.submit(), None);

        assert!(daily.on_explanation("Multiply 6 by 150.".to_string()));
        assert!(!daily.is_explaining());
        assert_eq!(daily.explanation(), Some("Multiply 6 by 150."));
        assert_eq!(daily.phase(), DailyPhase::AwaitingRetry);

        daily.set_input("900");
        assert_eq!(daily.submit(), Some(50));
        assert_eq!(daily.phase(), DailyPhase::AnsweredCorrect);
    }

    #[test]
    fn test_explain_requires_wrong_answer() {
        let mut daily = ready_session();
        assert!(daily.request_explanation().is_none());
        daily.set_input("abc");
        assert_eq!(daily.submit(), None);
        assert!(daily.request_explanation().is_none());
    }

    #[test]
    fn test_blank_explanation_replaced_with_apology() {
        let mut daily = ready_session();
        daily.set_input("1");
        daily.submit();
        daily.request_explanation();
        daily.on_explanation("   ".to_string());
        assert_eq!(daily.explanation(), Some(EXPLANATION_UNAVAILABLE));
    }

    #[test]
    fn test_unrequested_explanation_ignored() {
        let mut daily = ready_session();
        assert!(!daily.on_explanation("hint".to_string()));
        assert!(daily.explanation().is_none());
    }

    #[test]
    fn test_retry_load_only_after_failure() {
        let mut ok = ready_session();
        assert!(!ok.retry_load());

        let mut failed = DailyProblemSession::new(SessionId(2));
        failed.on_problem_loaded(Err(LoadError::NotConfigured));
        failed.set_input("3");
        failed.submit();
        assert!(failed.retry_load());
        assert_eq!(failed.phase(), DailyPhase::Loading);
        assert!(failed.problem().is_none());
        assert!(failed.load_error().is_none());
        assert!(failed.input().is_empty());

        assert!(failed.on_problem_loaded(Ok(market_problem())));
        assert_eq!(failed.problem(), Some(&market_problem()));
        assert!(!failed.retry_load());
    }
}
