use cogbat_core::{ArrowDirection, Judgement, Scorer, StimulusGenerator, TrialContext, TrialSpec};
use rand::{Rng, RngCore};

use super::normalize_label;

/// Arrow rows whose middle arrow must be judged despite its flankers.
#[derive(Debug, Clone)]
pub struct FlankerTask {
    flankers_per_side: usize,
    congruent_probability: f64,
}

impl FlankerTask {
    pub fn new(flankers_per_side: usize, congruent_probability: f64) -> Self {
        Self {
            flankers_per_side,
            congruent_probability: congruent_probability.clamp(0.0, 1.0),
        }
    }

    fn parse_direction(label: &str) -> Option<ArrowDirection> {
        match label {
            "left" | "l" | "←" | "<" => Some(ArrowDirection::Left),
            "right" | "r" | "→" | ">" => Some(ArrowDirection::Right),
            _ => None,
        }
    }
}

impl Default for FlankerTask {
    fn default() -> Self {
        Self::new(2, 0.5)
    }
}

impl StimulusGenerator for FlankerTask {
    fn generate(&self, _ctx: &TrialContext<'_>, rng: &mut dyn RngCore) -> TrialSpec {
        let target = if rng.random_bool(0.5) {
            ArrowDirection::Left
        } else {
            ArrowDirection::Right
        };
        let flanker = if rng.random_bool(self.congruent_probability) {
            target
        } else {
            target.opposite()
        };
        let mut arrows = vec![flanker; self.flankers_per_side];
        arrows.push(target);
        arrows.extend(std::iter::repeat_n(flanker, self.flankers_per_side));
        TrialSpec::Arrows { arrows }
    }
}

impl Scorer for FlankerTask {
    fn score(&self, spec: &TrialSpec, response: &str) -> Judgement {
        let label = normalize_label(response);
        let (Some(chosen), Some(target)) = (Self::parse_direction(&label), spec.target_arrow())
        else {
            return Judgement::incorrect(label);
        };
        Judgement::new(chosen == target, chosen.label())
    }
}
