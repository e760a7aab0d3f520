mod app;
mod cli;
mod config;
mod logging;

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::Parser;
use cogbat_experiment::TrialRunner;
use cogbat_timing::MonotonicTimer;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use app::App;
use cli::Cli;
use config::AppConfig;

fn main() -> Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    let config = AppConfig::resolve(&cli)?;
    let plan = config
        .task_config(cli.task, cli.trials)
        .plan()
        .with_context(|| format!("invalid settings for {}", cli.task))?;
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    debug!(?config, "configuration resolved");

    let runner = TrialRunner::new(plan, MonotonicTimer::new(), rng);
    let ansi = io::stdout().is_terminal();
    App::new(runner, config, io::stdin().lock(), io::stdout().lock())
        .with_ansi(ansi)
        .run()?;

    Ok(())
}
