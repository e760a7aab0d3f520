use std::path::PathBuf;

use clap::{Parser, ValueHint};
use cogbat_experiment::TaskKind;

#[derive(Debug, Parser)]
#[command(author, version, about = "Terminal runner for the cognitive test battery")]
pub struct Cli {
    /// Task to run: digit_span, digit_span_staircase, flanker, stroop, card_sort, word_recall
    pub task: TaskKind,

    /// JSON file with participant fields, output settings and task overrides
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Seed for reproducible stimulus sequences
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory receiving the exported results
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub out: Option<PathBuf>,

    /// Override the task's trial count (list count for word recall)
    #[arg(long)]
    pub trials: Option<usize>,

    /// Also write a JSON export next to the table
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_task_and_overrides() {
        let cli = Cli::try_parse_from([
            "cogbat",
            "digit-span-staircase",
            "--seed",
            "7",
            "--trials",
            "4",
            "--out",
            "runs",
        ])
        .unwrap();
        assert_eq!(cli.task, TaskKind::DigitSpanStaircase);
        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.trials, Some(4));
        assert_eq!(cli.out, Some(PathBuf::from("runs")));
        assert!(!cli.json);
    }

    #[test]
    fn rejects_unknown_task() {
        assert!(Cli::try_parse_from(["cogbat", "tetris"]).is_err());
    }
}
