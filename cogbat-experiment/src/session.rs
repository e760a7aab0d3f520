use cogbat_core::{AdaptiveState, Participant, ResultLog};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::config::TaskKind;

/// A finished session as handed to the reporter. Read-only from here on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedSession {
    pub task: TaskKind,
    pub participant: Participant,
    pub log: ResultLog,
    pub final_state: AdaptiveState,
    /// Wall-clock time the session reached its terminal state.
    #[serde(with = "time::serde::rfc3339")]
    pub completed_at: OffsetDateTime,
}
