use cogbat_core::{Color, Judgement, Scorer, StimulusGenerator, TrialContext, TrialSpec};
use rand::{Rng, RngCore};

use super::normalize_label;

/// Color words printed in an ink that has to be named.
///
/// Word and ink are drawn independently, so congruent trials occur by chance.
#[derive(Debug, Clone, Copy, Default)]
pub struct StroopTask;

impl StroopTask {
    fn draw(rng: &mut dyn RngCore) -> Color {
        Color::STROOP[rng.random_range(0..Color::STROOP.len())]
    }
}

impl StimulusGenerator for StroopTask {
    fn generate(&self, _ctx: &TrialContext<'_>, rng: &mut dyn RngCore) -> TrialSpec {
        let word = Self::draw(rng);
        let ink = Self::draw(rng);
        TrialSpec::ColorWord { word, ink }
    }
}

impl Scorer for StroopTask {
    fn score(&self, spec: &TrialSpec, response: &str) -> Judgement {
        let label = normalize_label(response);
        match spec {
            TrialSpec::ColorWord { ink, .. } if !label.is_empty() => {
                Judgement::new(label == ink.label(), label)
            }
            _ => Judgement::incorrect(label),
        }
    }
}
