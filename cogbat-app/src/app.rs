use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use cogbat_core::{Color, ParticipantForm, SessionState, TrialSpec};
use cogbat_experiment::{CompletedSession, TrialRunner};
use cogbat_report::{Summary, export_csv, export_json};
use cogbat_timing::Timer;
use rand::Rng;

use crate::config::AppConfig;

/// Sleep slice while a word list is on screen.
const REVEAL_POLL: Duration = Duration::from_millis(20);

/// Line-oriented terminal front end for one session.
pub struct App<T, R, I, O>
where
    T: Timer<Timestamp = u64>,
    R: Rng,
{
    runner: TrialRunner<T, R>,
    config: AppConfig,
    input: I,
    output: O,
    ansi: bool,
}

impl<T, R, I, O> App<T, R, I, O>
where
    T: Timer<Timestamp = u64>,
    R: Rng,
    I: BufRead,
    O: Write,
{
    pub fn new(runner: TrialRunner<T, R>, config: AppConfig, input: I, output: O) -> Self {
        Self {
            runner,
            config,
            input,
            output,
            ansi: false,
        }
    }

    /// Colours Stroop words and erases timed stimuli once their display ends.
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    pub fn run(mut self) -> Result<CompletedSession> {
        writeln!(self.output, "=== {} ===", self.runner.task_kind().title())?;
        self.collect_participant()?;
        while !self.runner.is_terminal() {
            match self.runner.state() {
                SessionState::Presenting => self.present()?,
                SessionState::AwaitingResponse => self.collect_response()?,
                state => bail!("session stuck in {state}"),
            }
        }
        self.finish()
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line).context("reading input")? == 0 {
            bail!("input closed before the session finished");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn read_required(&mut self, prompt: &str) -> Result<String> {
        loop {
            let value = self.read_line(prompt)?;
            if !value.trim().is_empty() {
                return Ok(value);
            }
            writeln!(self.output, "This field is required.")?;
        }
    }

    fn collect_participant(&mut self) -> Result<()> {
        writeln!(self.output, "Please enter your details.")?;
        while self.runner.state() == SessionState::CollectingParticipant {
            let mut form = ParticipantForm::new(self.read_required("Participant ID: ")?);
            for field in self.config.participant_fields.clone() {
                let value = self.read_required(&format!("{field}: "))?;
                form = form.field(field, value);
            }
            if let Err(err) = form.validate() {
                writeln!(self.output, "Invalid details: {err}. Please try again.")?;
            }
            self.runner.submit_participant(form);
        }
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        let spec = self
            .runner
            .current_spec()
            .cloned()
            .context("no stimulus to present")?;
        if let Some((trial, budget)) = self.runner.trial_progress() {
            writeln!(self.output, "\nTrial {trial} of {budget}")?;
        }

        let timed = self.runner.time_remaining().is_some();
        match &spec {
            TrialSpec::Words { .. } => self.reveal_words()?,
            TrialSpec::Card {
                target, options, ..
            } => {
                writeln!(self.output, "Target card: {target}")?;
                for (i, card) in options.iter().enumerate() {
                    writeln!(self.output, "  {}) {card}", i + 1)?;
                }
            }
            TrialSpec::ColorWord { word, ink } if self.ansi => {
                writeln!(self.output, "{}", paint(word.word(), *ink))?;
            }
            other if timed => self.show_transient(&other.to_string())?,
            other => writeln!(self.output, "{other}")?,
        }

        while let Some(remaining) = self.runner.time_remaining() {
            if remaining.is_zero() {
                break;
            }
            self.runner.timer().sleep(remaining);
        }
        if timed {
            self.clear_transient()?;
        }
        self.runner.advance();
        Ok(())
    }

    fn reveal_words(&mut self) -> Result<()> {
        let mut shown: Option<String> = None;
        while let Some(remaining) = self.runner.time_remaining() {
            if remaining.is_zero() {
                break;
            }
            let visible = self.runner.visible_item().map(str::to_owned);
            if visible.is_some() && visible != shown {
                if let Some(word) = &visible {
                    self.show_transient(word)?;
                }
                shown = visible;
            }
            self.runner.timer().sleep(remaining.min(REVEAL_POLL));
        }
        Ok(())
    }

    fn show_transient(&mut self, text: &str) -> Result<()> {
        if self.ansi {
            write!(self.output, "\r\x1b[2K{text}")?;
            self.output.flush()?;
        } else {
            writeln!(self.output, "{text}")?;
        }
        Ok(())
    }

    fn clear_transient(&mut self) -> Result<()> {
        if self.ansi {
            write!(self.output, "\r\x1b[2K")?;
            self.output.flush()?;
        }
        Ok(())
    }

    fn collect_response(&mut self) -> Result<()> {
        let (prompt, feedback) = match self.runner.current_spec() {
            Some(TrialSpec::Digits { direction, .. }) => (
                format!("Type the digits in {} order: ", direction.label()),
                false,
            ),
            Some(TrialSpec::Arrows { .. }) => ("Middle arrow (left/right): ".to_string(), false),
            Some(TrialSpec::ColorWord { .. }) => (
                "Ink colour (red/green/blue/yellow): ".to_string(),
                false,
            ),
            Some(TrialSpec::Card { .. }) => ("Matching card (number or name): ".to_string(), true),
            Some(TrialSpec::Words { .. }) => {
                ("Type every word you remember: ".to_string(), false)
            }
            None => bail!("no trial awaiting a response"),
        };
        let answer = self.read_line(&prompt)?;
        self.runner.respond(answer);
        if feedback {
            if let Some(row) = self.runner.results().last() {
                let verdict = if row.correct { "Correct." } else { "Incorrect." };
                writeln!(self.output, "{verdict}")?;
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<CompletedSession> {
        let session = self
            .runner
            .completed()
            .context("session ended without a participant")?;
        let summary = Summary::from_log(&session.log);
        writeln!(self.output, "\nTest completed! {summary}")?;

        let table = export_csv(&self.config.output_dir, &session)
            .context("exporting the results table")?;
        writeln!(self.output, "Results saved to {}", table.display())?;
        if self.config.json_export {
            let json = export_json(&self.config.output_dir, &session)
                .context("exporting results as json")?;
            writeln!(self.output, "JSON saved to {}", json.display())?;
        }
        Ok(session)
    }
}

fn paint(text: &str, ink: Color) -> String {
    let code = match ink {
        Color::Red => 31,
        Color::Green => 32,
        Color::Yellow => 33,
        Color::Blue => 34,
    };
    format!("\x1b[1;{code}m{text}\x1b[0m")
}
