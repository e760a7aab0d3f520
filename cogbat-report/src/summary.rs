use std::fmt;

use cogbat_core::{Credit, ResultLog, TrialResult};
use serde::Serialize;

/// Headline numbers for a finished session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub trials: usize,
    pub correct: usize,
    /// Percent of trials scored correct, or of words recalled when the log
    /// carries recall credit.
    pub accuracy_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recall: Option<Credit>,
}

impl Summary {
    pub fn from_log(log: &ResultLog) -> Self {
        Self::from_results(log.entries())
    }

    pub fn from_results(results: &[TrialResult]) -> Self {
        let trials = results.len();
        let correct = results.iter().filter(|r| r.correct).count();

        let recall = results
            .iter()
            .filter_map(|r| r.credit)
            .reduce(|a, b| Credit {
                hits: a.hits + b.hits,
                total: a.total + b.total,
            });
        let accuracy_pct = match recall {
            Some(Credit { hits, total }) => percent(hits as usize, total as usize),
            None => percent(correct, trials),
        };
        Self {
            trials,
            correct,
            accuracy_pct,
            recall,
        }
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = part as f64 / whole as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.recall {
            Some(Credit { hits, total }) => write!(f, "recalled {hits} of {total} words")?,
            None => write!(f, "{} of {} trials correct", self.correct, self.trials)?,
        }
        write!(f, " ({:.2}%)", self.accuracy_pct)
    }
}
