use serde::{Deserialize, Serialize};

use crate::stimulus::{Direction, SortRule};

/// Session parameters that shape future stimuli.
///
/// Only the trial runner mutates this, and only after scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptiveState {
    /// Symbols per stimulus for sequence tasks.
    pub span: usize,
    pub direction: Direction,
    /// Active sorting rule, if the task sorts cards.
    pub rule: Option<SortRule>,
}

impl AdaptiveState {
    pub fn with_span(span: usize) -> Self {
        Self {
            span,
            direction: Direction::Forward,
            rule: None,
        }
    }

    pub fn with_rule(rule: SortRule) -> Self {
        Self {
            span: 1,
            direction: Direction::Forward,
            rule: Some(rule),
        }
    }
}

impl Default for AdaptiveState {
    fn default() -> Self {
        Self::with_span(1)
    }
}
