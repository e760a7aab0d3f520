use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a session currently is in the trial cycle.
///
/// `CollectingParticipant -> Presenting -> AwaitingResponse -> Scoring ->
/// (Presenting | Terminal)`. `Terminal` is absorbing.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    CollectingParticipant,
    Presenting,
    AwaitingResponse,
    Scoring,
    Terminal,
}

impl SessionState {
    /// True when a response submitted now would be scored.
    pub fn allows_input(&self) -> bool {
        matches!(self, Self::AwaitingResponse)
    }

    pub fn shows_stimulus(&self) -> bool {
        matches!(self, Self::Presenting | Self::AwaitingResponse)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CollectingParticipant => "collecting_participant",
            Self::Presenting => "presenting",
            Self::AwaitingResponse => "awaiting_response",
            Self::Scoring => "scoring",
            Self::Terminal => "terminal",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
