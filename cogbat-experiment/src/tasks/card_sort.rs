use cogbat_core::{
    Card, Color, Judgement, Scorer, Shape, SortRule, StimulusGenerator, TrialContext, TrialSpec,
};
use rand::{Rng, RngCore};

use super::normalize_label;

/// Simplified Wisconsin card sorting: pick the choice card that matches the
/// target under a rule the participant is never told.
#[derive(Debug, Clone)]
pub struct CardSortTask {
    option_count: usize,
}

impl CardSortTask {
    pub fn new(option_count: usize) -> Self {
        Self {
            option_count: option_count.max(1),
        }
    }

    fn random_card(rng: &mut dyn RngCore) -> Card {
        Card::new(
            Color::CARDS[rng.random_range(0..Color::CARDS.len())],
            Shape::ALL[rng.random_range(0..Shape::ALL.len())],
        )
    }

    /// A card agreeing with `target` on the rule attribute; the other
    /// attribute is random.
    fn matching_card(target: &Card, rule: SortRule, rng: &mut dyn RngCore) -> Card {
        let mut card = Self::random_card(rng);
        match rule {
            SortRule::Color => card.color = target.color,
            SortRule::Shape => card.shape = target.shape,
        }
        card
    }

    /// Resolves a response to one of the offered cards, by 1-based position
    /// or by its label.
    fn resolve<'a>(options: &'a [Card], label: &str) -> Option<&'a Card> {
        if let Ok(position) = label.parse::<usize>() {
            return position.checked_sub(1).and_then(|i| options.get(i));
        }
        options.iter().find(|card| card.to_string() == label)
    }
}

impl Default for CardSortTask {
    fn default() -> Self {
        Self::new(3)
    }
}

impl StimulusGenerator for CardSortTask {
    fn generate(&self, ctx: &TrialContext<'_>, rng: &mut dyn RngCore) -> TrialSpec {
        let rule = ctx.state.rule.unwrap_or(SortRule::Color);
        let target = Self::random_card(rng);
        let mut options: Vec<Card> = (0..self.option_count)
            .map(|_| Self::random_card(rng))
            .collect();
        if !options.iter().any(|card| card.matches(&target, rule)) {
            let slot = rng.random_range(0..options.len());
            options[slot] = Self::matching_card(&target, rule, rng);
        }
        TrialSpec::Card {
            target,
            options,
            rule,
        }
    }
}

impl Scorer for CardSortTask {
    fn score(&self, spec: &TrialSpec, response: &str) -> Judgement {
        let label = normalize_label(response);
        let TrialSpec::Card {
            target,
            options,
            rule,
        } = spec
        else {
            return Judgement::incorrect(label);
        };
        match Self::resolve(options, &label) {
            Some(chosen) => Judgement::new(chosen.matches(target, *rule), chosen.to_string()),
            None => Judgement::incorrect(label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogbat_core::AdaptiveState;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn spec(rule: SortRule) -> TrialSpec {
        TrialSpec::Card {
            target: Card::new(Color::Red, Shape::Circle),
            options: vec![
                Card::new(Color::Red, Shape::Square),
                Card::new(Color::Blue, Shape::Circle),
                Card::new(Color::Green, Shape::Triangle),
            ],
            rule,
        }
    }

    #[test]
    fn every_trial_offers_a_matching_card() {
        let task = CardSortTask::new(3);
        let mut rng = StdRng::seed_from_u64(21);
        for rule in [SortRule::Color, SortRule::Shape] {
            let state = AdaptiveState::with_rule(rule);
            let ctx = TrialContext {
                index: 0,
                state: &state,
            };
            for _ in 0..50 {
                let TrialSpec::Card {
                    target,
                    options,
                    rule: snapshot,
                } = task.generate(&ctx, &mut rng)
                else {
                    panic!("card task must produce cards");
                };
                assert_eq!(snapshot, rule);
                assert_eq!(options.len(), 3);
                assert!(options.iter().any(|c| c.matches(&target, rule)));
            }
        }
    }

    #[test]
    fn choice_by_position_or_label() {
        let task = CardSortTask::default();
        let by_color = spec(SortRule::Color);
        assert!(task.score(&by_color, "1").correct);
        assert!(task.score(&by_color, "Red  Square").correct);
        assert!(!task.score(&by_color, "2").correct);
        assert_eq!(task.score(&by_color, "2").normalized, "blue circle");

        let by_shape = spec(SortRule::Shape);
        assert!(task.score(&by_shape, "blue circle").correct);
        assert!(!task.score(&by_shape, "1").correct);
    }

    #[test]
    fn unknown_choices_are_incorrect() {
        let task = CardSortTask::default();
        let s = spec(SortRule::Color);
        for response in ["", "0", "4", "purple star", "red"] {
            let judged = task.score(&s, response);
            assert!(!judged.correct, "{response:?} must be incorrect");
        }
    }
}
