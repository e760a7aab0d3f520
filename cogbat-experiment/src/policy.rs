use cogbat_core::{AdaptiveState, Direction, SortRule};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// What the runner does after a scored trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    Continue,
    Terminate,
}

/// How a task adapts between trials and when it ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum AdaptivePolicy {
    /// Exactly `trials` trials; the span grows by `increment` per trial up to
    /// `cap`.
    FixedCount {
        trials: usize,
        start_span: usize,
        increment: usize,
        cap: usize,
    },
    /// Forward block, then backward block. A hit raises the span; a miss (or
    /// a hit at `max_span`) ends the block. The backward block never returns
    /// to forward.
    Staircase {
        min_span: usize,
        max_span: usize,
        max_trials: usize,
    },
    /// Fixed count; the sorting rule flips after every `switch_every` trials
    /// regardless of correctness. Zero never flips.
    RuleSwitch {
        trials: usize,
        switch_every: usize,
        initial_rule: Option<SortRule>,
    },
}

impl AdaptivePolicy {
    /// Fixed-length task whose stimulus size never changes.
    pub fn fixed(trials: usize) -> Self {
        AdaptivePolicy::FixedCount {
            trials,
            start_span: 1,
            increment: 0,
            cap: 1,
        }
    }

    /// Upper bound on the number of logged trials.
    pub fn budget(&self) -> usize {
        match self {
            AdaptivePolicy::FixedCount { trials, .. } => *trials,
            AdaptivePolicy::Staircase { max_trials, .. } => *max_trials,
            AdaptivePolicy::RuleSwitch { trials, .. } => *trials,
        }
    }

    pub fn initial_state(&self, rng: &mut dyn RngCore) -> AdaptiveState {
        match self {
            AdaptivePolicy::FixedCount { start_span, .. } => AdaptiveState::with_span(*start_span),
            AdaptivePolicy::Staircase { min_span, .. } => AdaptiveState::with_span(*min_span),
            AdaptivePolicy::RuleSwitch { initial_rule, .. } => {
                let rule = initial_rule.unwrap_or_else(|| {
                    if rng.random_bool(0.5) {
                        SortRule::Color
                    } else {
                        SortRule::Shape
                    }
                });
                AdaptiveState::with_rule(rule)
            }
        }
    }

    /// Applies the outcome of trial number `completed` (one-based) to the
    /// adaptive state and decides whether another trial follows.
    pub fn after_trial(
        &self,
        state: &mut AdaptiveState,
        completed: usize,
        correct: bool,
    ) -> Continuation {
        match self {
            AdaptivePolicy::FixedCount {
                trials,
                increment,
                cap,
                ..
            } => {
                if completed >= *trials {
                    return Continuation::Terminate;
                }
                state.span = (state.span + increment).min(*cap);
                Continuation::Continue
            }
            AdaptivePolicy::Staircase {
                min_span,
                max_span,
                max_trials,
            } => {
                let block_done = !correct || state.span >= *max_span;
                let next = match (state.direction, block_done) {
                    (_, false) => {
                        state.span += 1;
                        Continuation::Continue
                    }
                    (Direction::Forward, true) => {
                        state.direction = Direction::Backward;
                        state.span = *min_span;
                        Continuation::Continue
                    }
                    (Direction::Backward, true) => Continuation::Terminate,
                };
                if completed >= *max_trials {
                    Continuation::Terminate
                } else {
                    next
                }
            }
            AdaptivePolicy::RuleSwitch {
                trials,
                switch_every,
                ..
            } => {
                if completed >= *trials {
                    return Continuation::Terminate;
                }
                if *switch_every > 0 && completed % switch_every == 0 {
                    state.rule = state.rule.map(|rule| rule.switched());
                }
                Continuation::Continue
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn staircase() -> AdaptivePolicy {
        AdaptivePolicy::Staircase {
            min_span: 3,
            max_span: 5,
            max_trials: 6,
        }
    }

    #[test]
    fn fixed_count_grows_to_cap_then_stops() {
        let policy = AdaptivePolicy::FixedCount {
            trials: 4,
            start_span: 3,
            increment: 2,
            cap: 6,
        };
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = policy.initial_state(&mut rng);
        let mut spans = vec![state.span];
        for completed in 1..4 {
            assert_eq!(
                policy.after_trial(&mut state, completed, false),
                Continuation::Continue
            );
            spans.push(state.span);
        }
        assert_eq!(spans, vec![3, 5, 6, 6]);
        assert_eq!(
            policy.after_trial(&mut state, 4, true),
            Continuation::Terminate
        );
    }

    #[test]
    fn staircase_switches_to_backward_on_forward_miss() {
        let policy = staircase();
        let mut state = AdaptiveState::with_span(4);
        assert_eq!(
            policy.after_trial(&mut state, 2, false),
            Continuation::Continue
        );
        assert_eq!(state.direction, Direction::Backward);
        assert_eq!(state.span, 3);
        assert_eq!(
            policy.after_trial(&mut state, 3, false),
            Continuation::Terminate
        );
    }

    #[test]
    fn staircase_hit_at_cap_completes_block() {
        let policy = staircase();
        let mut state = AdaptiveState::with_span(5);
        policy.after_trial(&mut state, 3, true);
        assert_eq!(state.direction, Direction::Backward);
        assert_eq!(state.span, 3);

        state.span = 5;
        assert_eq!(
            policy.after_trial(&mut state, 6, true),
            Continuation::Terminate
        );
    }

    #[test]
    fn rule_switch_flips_on_schedule() {
        let policy = AdaptivePolicy::RuleSwitch {
            trials: 10,
            switch_every: 3,
            initial_rule: Some(SortRule::Color),
        };
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = policy.initial_state(&mut rng);
        let mut rules = Vec::new();
        for completed in 1..=9 {
            policy.after_trial(&mut state, completed, completed % 2 == 0);
            rules.push(state.rule);
        }
        use SortRule::*;
        assert_eq!(
            rules,
            vec![
                Some(Color),
                Some(Color),
                Some(Shape),
                Some(Shape),
                Some(Shape),
                Some(Color),
                Some(Color),
                Some(Color),
                Some(Shape),
            ]
        );
        assert_eq!(
            policy.after_trial(&mut state, 10, true),
            Continuation::Terminate
        );
    }

    #[test]
    fn zero_switch_interval_keeps_the_rule() {
        let policy: AdaptivePolicy = serde_json::from_str(
            r#"{"policy":"rule_switch","trials":3,"switch_every":0,"initial_rule":"shape"}"#,
        )
        .unwrap();
        let mut state = AdaptiveState::with_rule(SortRule::Shape);
        for completed in 1..3 {
            assert_eq!(
                policy.after_trial(&mut state, completed, true),
                Continuation::Continue
            );
            assert_eq!(state.rule, Some(SortRule::Shape));
        }
        assert_eq!(
            policy.after_trial(&mut state, 3, true),
            Continuation::Terminate
        );
    }
}
