/// Chain state definitions for a single film
///
/// A chain starts on the wiki article and ends with at most one record.
use crate::KinoError;
use std::fmt;

/// Represents where a film's chain currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainState {
    /// Reading fields from the wiki article
    Extracting,

    /// Waiting on the rating site, partial record in hand
    Chaining,

    /// Combining the partial record with a rating and counting it
    Finalizing,

    /// Chain is over, with or without a record
    Done,
}

impl ChainState {
    /// Returns true if moving from `self` to `next` is allowed
    ///
    /// # Valid Transitions
    ///
    /// | From | To |
    /// |------|----|
    /// | Extracting | Chaining, Finalizing, Done |
    /// | Chaining | Finalizing, Done |
    /// | Finalizing | Done |
    /// | Done | (none) |
    pub fn can_transition_to(&self, next: ChainState) -> bool {
        matches!(
            (self, next),
            (Self::Extracting, Self::Chaining)
                | (Self::Extracting, Self::Finalizing)
                | (Self::Extracting, Self::Done)
                | (Self::Chaining, Self::Finalizing)
                | (Self::Chaining, Self::Done)
                | (Self::Finalizing, Self::Done)
        )
    }

    /// Moves to `next`, rejecting transitions the chain cannot make
    pub fn transition(&mut self, next: ChainState) -> Result<(), KinoError> {
        if !self.can_transition_to(next) {
            return Err(KinoError::InvalidTransition {
                from: *self,
                to: next,
            });
        }
        tracing::trace!("Chain state {} -> {}", self, next);
        *self = next;
        Ok(())
    }

    /// Short lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extracting => "extracting",
            Self::Chaining => "chaining",
            Self::Finalizing => "finalizing",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for ChainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
