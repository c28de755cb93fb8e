use std::time::{Duration, Instant};

use rand::Rng;

use crate::engine::scoring::{DRILL_CORRECT, DRILL_INCORRECT};
use crate::generator::arithmetic::{self, Mode, Problem};
use crate::session::input::AnswerInput;

pub const CORRECT_DELAY: Duration = Duration::from_millis(800);
pub const INCORRECT_DELAY: Duration = Duration::from_millis(1000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    None,
    Correct,
    Incorrect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PendingAction {
    NextProblem,
    ClearFeedback,
}

#[derive(Clone, Copy, Debug)]
struct Pending {
    due: Instant,
    action: PendingAction,
}

/// One run of the drill screen for a single mode.
///
/// Submitting moves to a feedback state; `tick` moves back once the feedback
/// delay has passed. The delay lives inside the session, so dropping the
/// session cancels it.
pub struct DrillSession {
    mode: Mode,
    problem: Problem,
    input: AnswerInput,
    feedback: Feedback,
    score: u64,
    correct_count: u32,
    attempts: u32,
    pending: Option<Pending>,
}

impl DrillSession {
    pub fn new<R: Rng + ?Sized>(mode: Mode, rng: &mut R) -> Self {
        Self::with_problem(mode, arithmetic::generate(mode, rng))
    }

    pub fn with_problem(mode: Mode, problem: Problem) -> Self {
        Self {
            mode,
            problem,
            input: AnswerInput::new(),
            feedback: Feedback::None,
            score: 0,
            correct_count: 0,
            attempts: 0,
            pending: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn input(&self) -> &AnswerInput {
        &self.input
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn accepts_input(&self) -> bool {
        self.feedback == Feedback::None
    }

    pub fn type_char(&mut self, ch: char) -> bool {
        self.accepts_input() && self.input.process_char(ch)
    }

    pub fn backspace(&mut self) {
        if self.accepts_input() {
            self.input.process_backspace();
        }
    }

    /// Check the typed answer. Returns the score delta to report, or None if
    /// the submission was ignored.
    pub fn submit(&mut self, now: Instant) -> Option<i64> {
        if !self.accepts_input() {
            return None;
        }
        let answer = self.input.parsed()?;
        self.attempts += 1;

        if answer == self.problem.answer {
            self.feedback = Feedback::Correct;
            self.score += DRILL_CORRECT as u64;
            self.correct_count += 1;
            self.pending = Some(Pending {
                due: now + CORRECT_DELAY,
                action: PendingAction::NextProblem,
            });
            Some(DRILL_CORRECT)
        } else {
            self.feedback = Feedback::Incorrect;
            self.pending = Some(Pending {
                due: now + INCORRECT_DELAY,
                action: PendingAction::ClearFeedback,
            });
            Some(DRILL_INCORRECT)
        }
    }

    /// Fire the scheduled transition if it is due. Returns true if state changed.
    pub fn tick<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) -> bool {
        let Some(pending) = self.pending else {
            return false;
        };
        if now < pending.due {
            return false;
        }
        self.pending = None;
        match pending.action {
            PendingAction::NextProblem => {
                self.problem = arithmetic::generate(self.mode, rng);
            }
            PendingAction::ClearFeedback => {}
        }
        self.feedback = Feedback::None;
        self.input.clear();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn session(mode: Mode, a: i64, b: i64) -> DrillSession {
        DrillSession::with_problem(mode, Problem::from_operands(mode, a, b))
    }

    fn type_str(drill: &mut DrillSession, text: &str) {
        for ch in text.chars() {
            drill.type_char(ch);
        }
    }

    #[test]
    fn test_new_session_awaits_answer() {
        let mut rng = SmallRng::seed_from_u64(1);
        let drill = DrillSession::new(Mode::Subtraction, &mut rng);
        assert_eq!(drill.feedback(), Feedback::None);
        assert!(drill.input().is_empty());
        assert_eq!(drill.score(), 0);
        assert!(drill.problem().answer >= 0);
    }

    #[test]
    fn test_correct_answer_scores_once() {
        let mut drill = session(Mode::Addition, 3, 4);
        let now = Instant::now();
        type_str(&mut drill, "7");
        assert_eq!(drill.submit(now), Some(10));
        assert_eq!(drill.feedback(), Feedback::Correct);
        assert_eq!(drill.score(), 10);

        // Feedback is showing: further submits and typing are rejected.
        assert_eq!(drill.submit(now), None);
        assert!(!drill.type_char('1'));
        assert_eq!(drill.score(), 10);
        assert_eq!(drill.correct_count(), 1);
    }

    #[test]
    fn test_correct_answer_advances_after_delay() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut drill = session(Mode::Addition, 3, 4);
        let now = Instant::now();
        type_str(&mut drill, "7");
        drill.submit(now);

        assert!(!drill.tick(now + Duration::from_millis(799), &mut rng));
        assert_eq!(drill.feedback(), Feedback::Correct);

        assert!(drill.tick(now + CORRECT_DELAY, &mut rng));
        assert_eq!(drill.feedback(), Feedback::None);
        assert!(drill.input().is_empty());
        assert!(drill.problem().text.contains(" + "));

        // Nothing left scheduled.
        assert!(!drill.tick(now + Duration::from_secs(10), &mut rng));
    }

    #[test]
    fn test_wrong_answer_keeps_problem() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut drill = session(Mode::Division, 4, 6);
        assert_eq!(drill.problem().text, "24 ÷ 6 = ?");
        let now = Instant::now();
        type_str(&mut drill, "5");
        assert_eq!(drill.submit(now), Some(-2));
        assert_eq!(drill.feedback(), Feedback::Incorrect);
        assert_eq!(drill.score(), 0);

        assert!(!drill.tick(now + Duration::from_millis(999), &mut rng));
        assert!(drill.tick(now + INCORRECT_DELAY, &mut rng));
        assert_eq!(drill.feedback(), Feedback::None);
        assert!(drill.input().is_empty());
        assert_eq!(drill.problem().text, "24 ÷ 6 = ?");
        assert_eq!(drill.problem().answer, 4);

        // Retry the same problem.
        type_str(&mut drill, "4");
        assert_eq!(drill.submit(now + INCORRECT_DELAY), Some(10));
        assert_eq!(drill.attempts(), 2);
        assert_eq!(drill.correct_count(), 1);
    }

    #[test]
    fn test_empty_or_non_numeric_input_ignored() {
        let mut drill = session(Mode::Multiplication, 2, 3);
        let now = Instant::now();
        assert_eq!(drill.submit(now), None);
        type_str(&mut drill, "-");
        assert_eq!(drill.submit(now), None);
        assert_eq!(drill.feedback(), Feedback::None);
        assert_eq!(drill.attempts(), 0);
        assert_eq!(drill.input().value(), "-");
    }

    #[test]
    fn test_backspace_blocked_during_feedback() {
        let mut drill = session(Mode::Addition, 1, 1);
        type_str(&mut drill, "3");
        drill.submit(Instant::now());
        drill.backspace();
        assert_eq!(drill.input().value(), "3");
    }
}
