//! Disambiguation of a texture found in more than one archive.
//!
//! A sequential decision process: candidates are offered in discovery order,
//! the first affirmative answer wins and short-circuits the rest, and
//! declining every candidate is a no-op outcome rather than an error. The
//! process is an explicit state machine driven by a caller-supplied yes/no
//! oracle, so tests can script it without interactive I/O.

/// Answers yes/no questions on behalf of the user.
pub trait ConfirmOracle {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// State of one disambiguation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceState {
    /// No candidate offered yet.
    Pending,
    /// Waiting on the answer for candidate `i`.
    Asking(usize),
    /// Candidate `i` was affirmed; no further candidates are offered.
    Resolved(usize),
    /// Every candidate was declined.
    Skipped,
}

/// Drives the choice among `total` candidates for one texture name.
///
/// A machine with a single candidate resolves immediately without
/// consulting the oracle. Once resolved or skipped, [`run`] returns the
/// recorded outcome and never asks again.
///
/// [`run`]: ChoiceMachine::run
#[derive(Debug)]
pub struct ChoiceMachine {
    total: usize,
    state: ChoiceState,
}

impl ChoiceMachine {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            state: ChoiceState::Pending,
        }
    }

    pub fn state(&self) -> ChoiceState {
        self.state
    }

    /// Walk the candidates until one is affirmed or all are declined.
    ///
    /// `prompt` renders the question for candidate `i`. Returns the index of
    /// the affirmed candidate, or `None` if every candidate was declined (or
    /// there were none).
    pub fn run<O, F>(&mut self, oracle: &mut O, mut prompt: F) -> Option<usize>
    where
        O: ConfirmOracle,
        F: FnMut(usize) -> String,
    {
        match self.state {
            ChoiceState::Resolved(i) => return Some(i),
            ChoiceState::Skipped => return None,
            ChoiceState::Pending | ChoiceState::Asking(_) => {}
        }

        if self.total == 0 {
            self.state = ChoiceState::Skipped;
            return None;
        }

        // Unambiguous: extract immediately and silently.
        if self.total == 1 {
            self.state = ChoiceState::Resolved(0);
            return Some(0);
        }

        for i in 0..self.total {
            self.state = ChoiceState::Asking(i);
            if oracle.confirm(&prompt(i)) {
                self.state = ChoiceState::Resolved(i);
                return Some(i);
            }
        }

        self.state = ChoiceState::Skipped;
        None
    }
}
