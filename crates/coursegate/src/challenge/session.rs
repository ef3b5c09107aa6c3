//! Challenge session state and verification.

use super::generator::ChallengeSource;

/// Outcome of a challenge submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Candidate matched; the session is solved for its remaining lifetime
    Solved,
    /// Candidate did not match; the caller schedules a regeneration
    Mismatch,
    /// Session was already solved; the submission is ignored
    AlreadySolved,
}

/// One wizard's retype-to-verify state.
///
/// Lives and dies with the wizard session; never persisted.
pub struct ChallengeSession {
    text: String,
    solved: bool,
    attempted_wrong: bool,
    input: String,
}

impl ChallengeSession {
    pub fn new(source: &dyn ChallengeSource) -> Self {
        Self {
            text: source.next_text(),
            solved: false,
            attempted_wrong: false,
            input: String::new(),
        }
    }

    /// Current challenge text (what the user must retype)
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// True after a submission failed, until the next regeneration
    pub fn attempted_wrong(&self) -> bool {
        self.attempted_wrong
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Replace the challenge text, clearing the solved flag, the error
    /// flag, and the input buffer. Called on mount, on a manual refresh,
    /// and after a mismatch.
    pub fn regenerate(&mut self, source: &dyn ChallengeSource) {
        self.text = source.next_text();
        self.solved = false;
        self.attempted_wrong = false;
        self.input.clear();
    }

    /// Case-insensitive comparison against the current text. Solving is
    /// one-way: once solved, later submissions are no-ops.
    pub fn submit(&mut self, candidate: &str) -> SubmitOutcome {
        if self.solved {
            return SubmitOutcome::AlreadySolved;
        }

        if candidate.to_lowercase() == self.text.to_lowercase() {
            self.solved = true;
            self.attempted_wrong = false;
            tracing::debug!("challenge solved");
            SubmitOutcome::Solved
        } else {
            self.attempted_wrong = true;
            tracing::debug!("challenge mismatch");
            SubmitOutcome::Mismatch
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl ChallengeSource for Fixed {
        fn next_text(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn comparison_is_case_insensitive() {
        let mut session = ChallengeSession::new(&Fixed("AbCdEf"));
        assert_eq!(session.submit("abcdef"), SubmitOutcome::Solved);
        assert!(session.is_solved());
    }

    #[test]
    fn mismatch_sets_error_flag_without_solving() {
        let mut session = ChallengeSession::new(&Fixed("AbCdEf"));
        assert_eq!(session.submit("zzzzzz"), SubmitOutcome::Mismatch);
        assert!(session.attempted_wrong());
        assert!(!session.is_solved());
    }

    #[test]
    fn solving_is_one_way() {
        let mut session = ChallengeSession::new(&Fixed("AbCdEf"));
        session.submit("ABCDEF");
        assert_eq!(session.submit("wrong!"), SubmitOutcome::AlreadySolved);
        assert!(session.is_solved());
    }

    #[test]
    fn regenerate_clears_state_and_input() {
        let mut session = ChallengeSession::new(&Fixed("AbCdEf"));
        session.set_input("abc");
        session.submit("zzzzzz");

        session.regenerate(&Fixed("GhJkMn"));
        assert_eq!(session.text(), "GhJkMn");
        assert!(!session.attempted_wrong());
        assert!(!session.is_solved());
        assert_eq!(session.input(), "");
    }
}
