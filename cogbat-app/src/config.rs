use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use cogbat_experiment::{TaskConfig, TaskKind};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Settings read from `--config`, with CLI flags layered on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Attributes asked for after the participant identifier, in order.
    pub participant_fields: Vec<String>,
    pub output_dir: PathBuf,
    pub seed: Option<u64>,
    pub json_export: bool,
    /// Per-task overrides; tasks not listed run with their defaults.
    pub tasks: Vec<TaskConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            participant_fields: ["Name", "Age", "Profession", "SleepHours"]
                .into_iter()
                .map(String::from)
                .collect(),
            output_dir: PathBuf::from("results"),
            seed: None,
            json_export: false,
            tasks: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `--config` if given and applies the remaining flags.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(out) = &cli.out {
            config.output_dir = out.clone();
        }
        if cli.seed.is_some() {
            config.seed = cli.seed;
        }
        config.json_export |= cli.json;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (i, field) in self.participant_fields.iter().enumerate() {
            let name = field.trim();
            if name.is_empty() {
                bail!("participant_fields[{i}] is blank");
            }
            if self.participant_fields[..i]
                .iter()
                .any(|earlier| earlier.trim() == name)
            {
                bail!("participant field `{name}` is listed twice");
            }
        }
        Ok(())
    }

    /// The configured task settings for `kind`, or its defaults.
    pub fn task_config(&self, kind: TaskKind, trials: Option<usize>) -> TaskConfig {
        let config = self
            .tasks
            .iter()
            .find(|c| c.kind() == kind)
            .cloned()
            .unwrap_or_else(|| kind.default_config());
        match trials {
            Some(n) => config.with_trials(n),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogbat_experiment::FlankerConfig;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "seed": 9,
                "tasks": [{ "task": "flanker", "trials": 12, "flankers_per_side": 3 }]
            }"#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.participant_fields.len(), 4);
        assert_eq!(config.output_dir, PathBuf::from("results"));

        let TaskConfig::Flanker(flanker) = config.task_config(TaskKind::Flanker, None) else {
            panic!("flanker override expected");
        };
        assert_eq!(
            flanker,
            FlankerConfig {
                trials: 12,
                flankers_per_side: 3,
                ..Default::default()
            }
        );
        assert_eq!(
            config.task_config(TaskKind::Stroop, None),
            TaskKind::Stroop.default_config()
        );
    }

    #[test]
    fn trial_flag_overrides_config() {
        let config = AppConfig::default();
        let TaskConfig::CardSort(cards) = config.task_config(TaskKind::CardSort, Some(4)) else {
            panic!("card sort expected");
        };
        assert_eq!(cards.trials, 4);
    }

    #[test]
    fn duplicate_fields_are_rejected() {
        let config = AppConfig {
            participant_fields: vec!["Age".into(), "Age".into()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(AppConfig::default().validate().is_ok());

        let padded = AppConfig {
            participant_fields: vec!["Age".into(), " Age ".into()],
            ..Default::default()
        };
        let err = padded.validate().unwrap_err();
        assert!(err.to_string().contains("`Age` is listed twice"));
    }
}
