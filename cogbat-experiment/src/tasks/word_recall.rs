use cogbat_core::{Credit, Judgement, Scorer, StimulusGenerator, TrialContext, TrialSpec};
use rand::RngCore;

use super::normalize_label;

/// Word lists shown one word at a time, then recalled in any order.
#[derive(Debug, Clone)]
pub struct WordRecallTask {
    vocabulary: Vec<String>,
}

impl WordRecallTask {
    /// Words are lower-cased; blanks and duplicates are dropped.
    pub fn new(vocabulary: Vec<String>) -> Self {
        let mut words: Vec<String> = Vec::with_capacity(vocabulary.len());
        for word in vocabulary {
            let word = normalize_label(&word);
            if !word.is_empty() && !words.contains(&word) {
                words.push(word);
            }
        }
        Self { vocabulary: words }
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Splits free recall on whitespace and commas, keeping first mentions.
    fn recalled(response: &str) -> Vec<String> {
        let mut recalled: Vec<String> = Vec::new();
        for word in response
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
        {
            if !recalled.contains(&word) {
                recalled.push(word);
            }
        }
        recalled
    }
}

impl StimulusGenerator for WordRecallTask {
    fn generate(&self, ctx: &TrialContext<'_>, rng: &mut dyn RngCore) -> TrialSpec {
        let length = ctx.state.span.min(self.vocabulary.len());
        let words = rand::seq::index::sample(rng, self.vocabulary.len(), length)
            .iter()
            .map(|i| self.vocabulary[i].clone())
            .collect();
        TrialSpec::Words { words }
    }
}

impl Scorer for WordRecallTask {
    fn score(&self, spec: &TrialSpec, response: &str) -> Judgement {
        let recalled = Self::recalled(response);
        let normalized = recalled.join(" ");
        let TrialSpec::Words { words } = spec else {
            return Judgement::incorrect(normalized);
        };
        let hits = recalled.iter().filter(|w| words.contains(*w)).count() as u32;
        let total = words.len() as u32;
        let correct = total > 0 && hits == total;
        Judgement::new(correct, normalized).with_credit(Credit { hits, total })
    }
}
