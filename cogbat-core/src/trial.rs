use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::stimulus::TrialSpec;

/// Judges a raw response against the stimulus snapshot it answers.
///
/// Scoring never fails: empty or malformed input is an incorrect answer.
pub trait Scorer: Send + Sync + fmt::Debug {
    fn score(&self, spec: &TrialSpec, response: &str) -> Judgement;
}

/// A participant's raw answer and when it was submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCapture {
    pub raw: String,
    /// Monotonic timestamp of submission, in nanoseconds on the session timer.
    pub submitted_at_ns: u64,
}

impl ResponseCapture {
    pub fn new(raw: impl Into<String>, submitted_at_ns: u64) -> Self {
        Self {
            raw: raw.into(),
            submitted_at_ns,
        }
    }
}

/// Partial credit for list recall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credit {
    pub hits: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Judgement {
    pub correct: bool,
    pub normalized: String,
    pub credit: Option<Credit>,
}

impl Judgement {
    pub fn new(correct: bool, normalized: impl Into<String>) -> Self {
        Self {
            correct,
            normalized: normalized.into(),
            credit: None,
        }
    }

    pub fn incorrect(normalized: impl Into<String>) -> Self {
        Self::new(false, normalized)
    }

    pub fn with_credit(mut self, credit: Credit) -> Self {
        self.credit = Some(credit);
        self
    }
}

/// One row of the result log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    /// One-based, assigned by the log.
    pub trial: usize,
    pub stimulus: String,
    pub condition: String,
    pub expected: String,
    pub response: String,
    pub correct: bool,
    pub reaction_time_s: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit: Option<Credit>,
}

/// Everything about a trial except its index.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialOutcome {
    pub spec: TrialSpec,
    pub judgement: Judgement,
    pub reaction_time_s: f64,
}

/// Append-only trial log bounded by the session's trial budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultLog {
    budget: usize,
    entries: Vec<TrialResult>,
}

impl ResultLog {
    pub fn with_budget(budget: usize) -> Self {
        Self {
            budget,
            entries: Vec::with_capacity(budget),
        }
    }

    /// Appends the next trial; its index is one past the last entry.
    pub fn append(&mut self, outcome: TrialOutcome) -> Result<&TrialResult, CoreError> {
        if self.entries.len() >= self.budget {
            return Err(CoreError::BudgetExhausted {
                budget: self.budget,
            });
        }
        let TrialOutcome {
            spec,
            judgement,
            reaction_time_s,
        } = outcome;
        self.entries.push(TrialResult {
            trial: self.entries.len() + 1,
            stimulus: spec.to_string(),
            condition: spec.condition(),
            expected: spec.expected_answer(),
            response: judgement.normalized,
            correct: judgement.correct,
            reaction_time_s,
            credit: judgement.credit,
        });
        let index = self.entries.len() - 1;
        Ok(&self.entries[index])
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.budget
    }

    pub fn entries(&self) -> &[TrialResult] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrialResult> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&TrialResult> {
        self.entries.last()
    }

    pub fn correct_count(&self) -> usize {
        self.entries.iter().filter(|r| r.correct).count()
    }
}

impl<'a> IntoIterator for &'a ResultLog {
    type Item = &'a TrialResult;
    type IntoIter = std::slice::Iter<'a, TrialResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
