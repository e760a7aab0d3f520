use cogbat_core::{Scorer, StimulusGenerator};

use crate::config::TaskKind;
use crate::policy::AdaptivePolicy;
use crate::trial::Presentation;

/// A task's capabilities, injected into the trial runner.
#[derive(Debug)]
pub struct TaskPlan {
    pub kind: TaskKind,
    pub generator: Box<dyn StimulusGenerator>,
    pub scorer: Box<dyn Scorer>,
    pub policy: AdaptivePolicy,
    pub presentation: Presentation,
}

impl TaskPlan {
    /// Builds a plan from one task type that both generates and scores.
    pub fn new<K>(
        kind: TaskKind,
        task: K,
        policy: AdaptivePolicy,
        presentation: Presentation,
    ) -> Self
    where
        K: StimulusGenerator + Scorer + Clone + 'static,
    {
        Self {
            kind,
            generator: Box::new(task.clone()),
            scorer: Box::new(task),
            policy,
            presentation,
        }
    }

    /// Builds a plan from separate generator and scorer.
    pub fn from_parts(
        kind: TaskKind,
        generator: Box<dyn StimulusGenerator>,
        scorer: Box<dyn Scorer>,
        policy: AdaptivePolicy,
        presentation: Presentation,
    ) -> Self {
        Self {
            kind,
            generator,
            scorer,
            policy,
            presentation,
        }
    }
}
