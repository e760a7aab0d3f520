use cogbat_core::{Judgement, Scorer, StimulusGenerator, TrialContext, TrialSpec};
use rand::{Rng, RngCore};

const DIGIT_POOL: usize = 10;

/// Digit sequences recalled forward or backward.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigitSpanTask;

impl StimulusGenerator for DigitSpanTask {
    fn generate(&self, ctx: &TrialContext<'_>, rng: &mut dyn RngCore) -> TrialSpec {
        let span = ctx.state.span;
        let digits = if span <= DIGIT_POOL {
            rand::seq::index::sample(rng, DIGIT_POOL, span)
                .iter()
                .map(|d| d as u8)
                .collect()
        } else {
            // More digits than the pool holds: repeats are unavoidable.
            (0..span)
                .map(|_| rng.random_range(0..DIGIT_POOL as u8))
                .collect()
        };
        TrialSpec::Digits {
            digits,
            direction: ctx.state.direction,
        }
    }
}

impl Scorer for DigitSpanTask {
    fn score(&self, spec: &TrialSpec, response: &str) -> Judgement {
        let typed: String = response.chars().filter(|c| !c.is_whitespace()).collect();
        if typed.is_empty() || !matches!(spec, TrialSpec::Digits { .. }) {
            return Judgement::incorrect(typed);
        }
        let correct = typed == spec.expected_answer();
        Judgement::new(correct, typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogbat_core::{AdaptiveState, Direction};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn digits(values: &[u8], direction: Direction) -> TrialSpec {
        TrialSpec::Digits {
            digits: values.to_vec(),
            direction,
        }
    }

    #[test]
    fn generated_digits_never_repeat_within_pool() {
        let mut rng = StdRng::seed_from_u64(42);
        for span in 1..=10 {
            let state = AdaptiveState::with_span(span);
            let ctx = TrialContext {
                index: 0,
                state: &state,
            };
            let spec = DigitSpanTask.generate(&ctx, &mut rng);
            let TrialSpec::Digits { digits, .. } = spec else {
                panic!("digit task produced {spec:?}");
            };
            assert_eq!(digits.len(), span);
            let unique: HashSet<u8> = digits.iter().copied().collect();
            assert_eq!(unique.len(), span);
            assert!(digits.iter().all(|d| *d < 10));
        }
    }

    #[test]
    fn oversized_span_still_generates() {
        let mut rng = StdRng::seed_from_u64(3);
        let state = AdaptiveState::with_span(12);
        let ctx = TrialContext {
            index: 0,
            state: &state,
        };
        assert_eq!(DigitSpanTask.generate(&ctx, &mut rng).size(), 12);
    }

    #[test]
    fn whitespace_is_ignored_when_scoring() {
        let spec = digits(&[3, 9, 4], Direction::Forward);
        let judged = DigitSpanTask.score(&spec, " 3 9  4 ");
        assert!(judged.correct);
        assert_eq!(judged.normalized, "394");
        assert!(!DigitSpanTask.score(&spec, "349").correct);
    }

    #[test]
    fn backward_recall_expects_reverse_order() {
        let spec = digits(&[3, 9, 4], Direction::Backward);
        assert!(DigitSpanTask.score(&spec, "4 9 3").correct);
        assert!(!DigitSpanTask.score(&spec, "394").correct);
    }

    #[test]
    fn non_numeric_and_empty_input_is_incorrect() {
        let spec = digits(&[1, 2], Direction::Forward);
        assert!(!DigitSpanTask.score(&spec, "").correct);
        assert!(!DigitSpanTask.score(&spec, "one two").correct);
    }
}
