use std::fmt;
use std::str::FromStr;

use cogbat_core::SortRule;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plan::TaskPlan;
use crate::policy::AdaptivePolicy;
use crate::tasks::{CardSortTask, DigitSpanTask, FlankerTask, StroopTask, WordRecallTask};
use crate::trial::Presentation;

/// The battery's tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    DigitSpan,
    DigitSpanStaircase,
    Flanker,
    Stroop,
    CardSort,
    WordRecall,
}

impl TaskKind {
    pub const ALL: [TaskKind; 6] = [
        TaskKind::DigitSpan,
        TaskKind::DigitSpanStaircase,
        TaskKind::Flanker,
        TaskKind::Stroop,
        TaskKind::CardSort,
        TaskKind::WordRecall,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            TaskKind::DigitSpan => "digit_span",
            TaskKind::DigitSpanStaircase => "digit_span_staircase",
            TaskKind::Flanker => "flanker",
            TaskKind::Stroop => "stroop",
            TaskKind::CardSort => "card_sort",
            TaskKind::WordRecall => "word_recall",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            TaskKind::DigitSpan => "Digit Span Test",
            TaskKind::DigitSpanStaircase => "Digit Span Test (forward / backward)",
            TaskKind::Flanker => "Flanker Test",
            TaskKind::Stroop => "Stroop Test",
            TaskKind::CardSort => "Card Sorting Test",
            TaskKind::WordRecall => "Word List Recall Test",
        }
    }

    pub fn default_config(&self) -> TaskConfig {
        match self {
            TaskKind::DigitSpan => TaskConfig::DigitSpan(DigitSpanConfig::default()),
            TaskKind::DigitSpanStaircase => {
                TaskConfig::DigitSpanStaircase(StaircaseConfig::default())
            }
            TaskKind::Flanker => TaskConfig::Flanker(FlankerConfig::default()),
            TaskKind::Stroop => TaskConfig::Stroop(StroopConfig::default()),
            TaskKind::CardSort => TaskConfig::CardSort(CardSortConfig::default()),
            TaskKind::WordRecall => TaskConfig::WordRecall(WordRecallConfig::default()),
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for TaskKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        TaskKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == wanted)
            .ok_or_else(|| ConfigError::UnknownTask(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown task `{0}`")]
    UnknownTask(String),
    #[error("{field} must be at least 1")]
    Zero { field: &'static str },
    #[error("span range {min}..={max} is empty")]
    SpanRange { min: usize, max: usize },
    #[error("probability {0} is outside 0..=1")]
    Probability(f64),
    #[error("option count {0} is outside 2..=9")]
    OptionCount(usize),
    #[error("word lists of {needed} need at least {needed} distinct words, vocabulary has {available}")]
    Vocabulary { needed: usize, available: usize },
}

/// Fixed-count digit span: span grows each trial up to a cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigitSpanConfig {
    pub trials: usize,
    pub start_span: usize,
    pub span_increment: usize,
    pub max_span: usize,
    pub base_display_ms: u64,
    pub per_digit_ms: u64,
}

impl Default for DigitSpanConfig {
    fn default() -> Self {
        Self {
            trials: 8,
            start_span: 3,
            span_increment: 1,
            max_span: 10,
            base_display_ms: 2500,
            per_digit_ms: 500,
        }
    }
}

/// Forward block then backward block, each climbing until a miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaircaseConfig {
    pub min_span: usize,
    pub max_span: usize,
    /// Defaults to two full blocks.
    pub max_trials: Option<usize>,
    pub base_display_ms: u64,
    pub per_digit_ms: u64,
}

impl Default for StaircaseConfig {
    fn default() -> Self {
        Self {
            min_span: 3,
            max_span: 9,
            max_trials: None,
            base_display_ms: 2500,
            per_digit_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlankerConfig {
    pub trials: usize,
    pub flankers_per_side: usize,
    pub congruent_probability: f64,
}

impl Default for FlankerConfig {
    fn default() -> Self {
        Self {
            trials: 6,
            flankers_per_side: 2,
            congruent_probability: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StroopConfig {
    pub trials: usize,
}

impl Default for StroopConfig {
    fn default() -> Self {
        Self { trials: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardSortConfig {
    pub trials: usize,
    pub switch_every: usize,
    pub option_count: usize,
    /// Random when unset.
    pub initial_rule: Option<SortRule>,
}

impl Default for CardSortConfig {
    fn default() -> Self {
        Self {
            trials: 10,
            switch_every: 3,
            option_count: 3,
            initial_rule: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordRecallConfig {
    pub lists: usize,
    pub list_length: usize,
    pub per_word_ms: u64,
    pub vocabulary: Vec<String>,
}

pub const DEFAULT_VOCABULARY: [&str; 20] = [
    "apple", "carpet", "elephant", "jungle", "river", "mountain", "guitar", "doctor", "planet",
    "mirror", "window", "pencil", "candle", "ocean", "rocket", "flower", "laptop", "camera",
    "banana", "pillow",
];

impl Default for WordRecallConfig {
    fn default() -> Self {
        Self {
            lists: 1,
            list_length: 10,
            per_word_ms: 1500,
            vocabulary: DEFAULT_VOCABULARY.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// Per-task settings, tagged by `task` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum TaskConfig {
    DigitSpan(DigitSpanConfig),
    DigitSpanStaircase(StaircaseConfig),
    Flanker(FlankerConfig),
    Stroop(StroopConfig),
    CardSort(CardSortConfig),
    WordRecall(WordRecallConfig),
}

impl TaskConfig {
    pub fn kind(&self) -> TaskKind {
        match self {
            TaskConfig::DigitSpan(_) => TaskKind::DigitSpan,
            TaskConfig::DigitSpanStaircase(_) => TaskKind::DigitSpanStaircase,
            TaskConfig::Flanker(_) => TaskKind::Flanker,
            TaskConfig::Stroop(_) => TaskKind::Stroop,
            TaskConfig::CardSort(_) => TaskKind::CardSort,
            TaskConfig::WordRecall(_) => TaskKind::WordRecall,
        }
    }

    /// Replaces the trial count for fixed-length tasks, or the trial budget
    /// of the staircase.
    pub fn with_trials(mut self, trials: usize) -> Self {
        match &mut self {
            TaskConfig::DigitSpan(c) => c.trials = trials,
            TaskConfig::DigitSpanStaircase(c) => c.max_trials = Some(trials),
            TaskConfig::Flanker(c) => c.trials = trials,
            TaskConfig::Stroop(c) => c.trials = trials,
            TaskConfig::CardSort(c) => c.trials = trials,
            TaskConfig::WordRecall(c) => c.lists = trials,
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            TaskConfig::DigitSpan(c) => {
                nonzero("trials", c.trials)?;
                nonzero("start_span", c.start_span)?;
                if c.max_span < c.start_span {
                    return Err(ConfigError::SpanRange {
                        min: c.start_span,
                        max: c.max_span,
                    });
                }
            }
            TaskConfig::DigitSpanStaircase(c) => {
                nonzero("min_span", c.min_span)?;
                if c.max_span < c.min_span {
                    return Err(ConfigError::SpanRange {
                        min: c.min_span,
                        max: c.max_span,
                    });
                }
                if let Some(max_trials) = c.max_trials {
                    nonzero("max_trials", max_trials)?;
                }
            }
            TaskConfig::Flanker(c) => {
                nonzero("trials", c.trials)?;
                nonzero("flankers_per_side", c.flankers_per_side)?;
                if !(0.0..=1.0).contains(&c.congruent_probability) {
                    return Err(ConfigError::Probability(c.congruent_probability));
                }
            }
            TaskConfig::Stroop(c) => nonzero("trials", c.trials)?,
            TaskConfig::CardSort(c) => {
                nonzero("trials", c.trials)?;
                nonzero("switch_every", c.switch_every)?;
                if !(2..=9).contains(&c.option_count) {
                    return Err(ConfigError::OptionCount(c.option_count));
                }
            }
            TaskConfig::WordRecall(c) => {
                nonzero("lists", c.lists)?;
                nonzero("list_length", c.list_length)?;
                let available = WordRecallTask::new(c.vocabulary.clone()).vocabulary().len();
                if available < c.list_length {
                    return Err(ConfigError::Vocabulary {
                        needed: c.list_length,
                        available,
                    });
                }
            }
        }
        Ok(())
    }

    /// Validates the settings and wires the task's generator, scorer,
    /// adaptive policy and presentation mode together.
    pub fn plan(&self) -> Result<TaskPlan, ConfigError> {
        self.validate()?;
        let kind = self.kind();
        let plan = match self {
            TaskConfig::DigitSpan(c) => TaskPlan::new(
                kind,
                DigitSpanTask,
                AdaptivePolicy::FixedCount {
                    trials: c.trials,
                    start_span: c.start_span,
                    increment: c.span_increment,
                    cap: c.max_span,
                },
                Presentation::Timed {
                    base_ms: c.base_display_ms,
                    per_item_ms: c.per_digit_ms,
                },
            ),
            TaskConfig::DigitSpanStaircase(c) => TaskPlan::new(
                kind,
                DigitSpanTask,
                AdaptivePolicy::Staircase {
                    min_span: c.min_span,
                    max_span: c.max_span,
                    max_trials: c
                        .max_trials
                        .unwrap_or(2 * (c.max_span - c.min_span + 1)),
                },
                Presentation::Timed {
                    base_ms: c.base_display_ms,
                    per_item_ms: c.per_digit_ms,
                },
            ),
            TaskConfig::Flanker(c) => TaskPlan::new(
                kind,
                FlankerTask::new(c.flankers_per_side, c.congruent_probability),
                AdaptivePolicy::fixed(c.trials),
                Presentation::Immediate,
            ),
            TaskConfig::Stroop(c) => TaskPlan::new(
                kind,
                StroopTask,
                AdaptivePolicy::fixed(c.trials),
                Presentation::Immediate,
            ),
            TaskConfig::CardSort(c) => TaskPlan::new(
                kind,
                CardSortTask::new(c.option_count),
                AdaptivePolicy::RuleSwitch {
                    trials: c.trials,
                    switch_every: c.switch_every,
                    initial_rule: c.initial_rule,
                },
                Presentation::Immediate,
            ),
            TaskConfig::WordRecall(c) => TaskPlan::new(
                kind,
                WordRecallTask::new(c.vocabulary.clone()),
                AdaptivePolicy::FixedCount {
                    trials: c.lists,
                    start_span: c.list_length,
                    increment: 0,
                    cap: c.list_length,
                },
                Presentation::Timed {
                    base_ms: 0,
                    per_item_ms: c.per_word_ms,
                },
            ),
        };
        Ok(plan)
    }
}

impl Default for TaskConfig {
    fn default() -> Self {
        TaskConfig::DigitSpan(DigitSpanConfig::default())
    }
}

fn nonzero(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::Zero { field })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_names_parse_loosely() {
        assert_eq!("Flanker".parse::<TaskKind>(), Ok(TaskKind::Flanker));
        assert_eq!(
            "digit-span-staircase".parse::<TaskKind>(),
            Ok(TaskKind::DigitSpanStaircase)
        );
        assert!(matches!(
            "n-back".parse::<TaskKind>(),
            Err(ConfigError::UnknownTask(_))
        ));
    }

    #[test]
    fn json_config_is_tagged_by_task() {
        let config: TaskConfig =
            serde_json::from_str(r#"{ "task": "card_sort", "trials": 12 }"#).unwrap();
        match &config {
            TaskConfig::CardSort(c) => {
                assert_eq!(c.trials, 12);
                assert_eq!(c.switch_every, 3);
            }
            other => panic!("unexpected config {other:?}"),
        }
        assert_eq!(config.kind(), TaskKind::CardSort);
    }

    #[test]
    fn every_default_config_is_valid() {
        for kind in TaskKind::ALL {
            let config = kind.default_config();
            assert_eq!(config.kind(), kind);
            assert!(config.plan().is_ok(), "{kind} default must plan");
        }
    }

    #[test]
    fn invalid_settings_are_reported() {
        let span = TaskConfig::DigitSpan(DigitSpanConfig {
            start_span: 5,
            max_span: 4,
            ..Default::default()
        });
        assert_eq!(
            span.validate(),
            Err(ConfigError::SpanRange { min: 5, max: 4 })
        );

        let words = TaskConfig::WordRecall(WordRecallConfig {
            list_length: 4,
            vocabulary: vec!["a".into(), "b".into(), "A".into()],
            ..Default::default()
        });
        assert_eq!(
            words.validate(),
            Err(ConfigError::Vocabulary {
                needed: 4,
                available: 2
            })
        );

        let zero = TaskKind::Stroop.default_config().with_trials(0);
        assert_eq!(zero.validate(), Err(ConfigError::Zero { field: "trials" }));
    }
}
