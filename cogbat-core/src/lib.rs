pub mod adaptive;
pub mod error;
pub mod participant;
pub mod phase;
pub mod stimulus;
pub mod trial;

pub use adaptive::AdaptiveState;
pub use error::CoreError;
pub use participant::{Participant, ParticipantError, ParticipantForm};
pub use phase::SessionState;
pub use stimulus::{
    ArrowDirection, Card, Color, Direction, Shape, SortRule, StimulusGenerator, TrialContext,
    TrialSpec,
};
pub use trial::{
    Credit, Judgement, ResponseCapture, ResultLog, Scorer, TrialOutcome, TrialResult,
};
