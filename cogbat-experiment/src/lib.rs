pub mod config;
pub mod plan;
pub mod policy;
pub mod runner;
pub mod session;
pub mod tasks;
pub mod trial;

pub use config::{
    CardSortConfig, ConfigError, DigitSpanConfig, FlankerConfig, StaircaseConfig, StroopConfig,
    TaskConfig, TaskKind, WordRecallConfig,
};
pub use plan::TaskPlan;
pub use policy::{AdaptivePolicy, Continuation};
pub use runner::{SessionEvent, TrialRunner};
pub use session::CompletedSession;
pub use trial::{Presentation, Trial, TrialTimestamps};
