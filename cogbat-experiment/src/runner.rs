use std::time::Duration;

use cogbat_core::{
    AdaptiveState, Participant, ParticipantForm, ResponseCapture, ResultLog, SessionState,
    TrialContext, TrialOutcome, TrialSpec,
};
use cogbat_timing::Timer;
use rand::Rng;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::config::TaskKind;
use crate::plan::TaskPlan;
use crate::policy::Continuation;
use crate::session::CompletedSession;
use crate::trial::{Trial, TrialTimestamps};

/// External inputs, processed one at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    ParticipantSubmitted(ParticipantForm),
    /// Explicit advance or timer tick.
    Advance,
    Respond(ResponseCapture),
}

/// One participant's session of one task.
///
/// Driven entirely by [`TrialRunner::handle_event`]; it never sleeps and
/// never transitions on its own. Events that do not apply to the current
/// state are ignored.
pub struct TrialRunner<T, R>
where
    T: Timer,
    R: Rng,
{
    plan: TaskPlan,
    timer: T,
    rng: R,
    state: SessionState,
    participant: Option<Participant>,
    adaptive: AdaptiveState,
    current: Option<Trial<T::Timestamp>>,
    log: ResultLog,
    completed_at: Option<OffsetDateTime>,
}

impl<T, R> TrialRunner<T, R>
where
    T: Timer<Timestamp = u64>,
    R: Rng,
{
    pub fn new(plan: TaskPlan, timer: T, rng: R) -> Self {
        let log = ResultLog::with_budget(plan.policy.budget());
        Self {
            plan,
            timer,
            rng,
            state: SessionState::default(),
            participant: None,
            adaptive: AdaptiveState::default(),
            current: None,
            log,
            completed_at: None,
        }
    }

    /// Applies one event and returns the resulting state.
    pub fn handle_event(&mut self, event: SessionEvent) -> SessionState {
        match (self.state, event) {
            (SessionState::CollectingParticipant, SessionEvent::ParticipantSubmitted(form)) => {
                self.start(&form)
            }
            (SessionState::Presenting, SessionEvent::Advance) => self.open_response_window(),
            (SessionState::AwaitingResponse, SessionEvent::Respond(capture)) => {
                self.score_response(capture)
            }
            (state, event) => {
                debug!(%state, ?event, "event ignored");
            }
        }
        self.state
    }

    pub fn submit_participant(&mut self, form: ParticipantForm) -> SessionState {
        self.handle_event(SessionEvent::ParticipantSubmitted(form))
    }

    pub fn advance(&mut self) -> SessionState {
        self.handle_event(SessionEvent::Advance)
    }

    /// Submits a response stamped with the session timer's current time.
    pub fn respond(&mut self, raw: impl Into<String>) -> SessionState {
        let capture = ResponseCapture::new(raw, self.timer.now());
        self.handle_event(SessionEvent::Respond(capture))
    }

    pub fn respond_at(&mut self, raw: impl Into<String>, submitted_at_ns: u64) -> SessionState {
        self.handle_event(SessionEvent::Respond(ResponseCapture::new(
            raw,
            submitted_at_ns,
        )))
    }

    fn start(&mut self, form: &ParticipantForm) {
        let participant = match form.validate() {
            Ok(participant) => participant,
            Err(err) => {
                warn!(%err, "participant form rejected");
                return;
            }
        };
        self.adaptive = self.plan.policy.initial_state(&mut self.rng);
        info!(
            task = %self.plan.kind,
            participant = participant.identifier(),
            budget = self.log.budget(),
            "session started"
        );
        self.participant = Some(participant);
        self.present_next();
    }

    fn present_next(&mut self) {
        let index = self.log.len();
        if self.current.as_ref().is_some_and(|t| t.index == index) {
            self.state = SessionState::Presenting;
            return;
        }
        let ctx = TrialContext {
            index,
            state: &self.adaptive,
        };
        let spec = self.plan.generator.generate(&ctx, &mut self.rng);
        let shown_for = self.plan.presentation.display_duration(&spec);
        let now = self.timer.now();
        debug!(trial = index + 1, stimulus = %spec, ?shown_for, "presenting");
        self.current = Some(Trial {
            index,
            spec,
            display: shown_for,
            timestamps: TrialTimestamps {
                presented: now,
                response_window: None,
            },
        });
        self.state = SessionState::Presenting;
    }

    fn open_response_window(&mut self) {
        if let Some(remaining) = self.time_remaining() {
            if !remaining.is_zero() {
                debug!(?remaining, "stimulus still on display");
                return;
            }
        }
        let now = self.timer.now();
        if let Some(trial) = &mut self.current {
            trial.timestamps.response_window = Some(now);
            self.state = SessionState::AwaitingResponse;
            debug!(trial = trial.index + 1, "response window opened");
        }
    }

    fn score_response(&mut self, capture: ResponseCapture) {
        let Some(trial) = self.current.take() else {
            return;
        };
        self.state = SessionState::Scoring;

        let opened = trial
            .timestamps
            .response_window
            .unwrap_or(trial.timestamps.presented);
        let reaction_time_s = capture.submitted_at_ns.saturating_sub(opened) as f64 / 1e9;
        let judgement = self.plan.scorer.score(&trial.spec, &capture.raw);
        let correct = judgement.correct;

        let appended = self.log.append(TrialOutcome {
            spec: trial.spec,
            judgement,
            reaction_time_s,
        });
        match appended {
            Ok(row) => debug!(
                trial = row.trial,
                correct = row.correct,
                rt = row.reaction_time_s,
                "trial scored"
            ),
            Err(err) => {
                warn!(%err, "response dropped");
                self.terminate();
                return;
            }
        }

        let previous = self.adaptive.direction;
        let next = self
            .plan
            .policy
            .after_trial(&mut self.adaptive, self.log.len(), correct);
        if self.adaptive.direction != previous {
            info!(
                direction = self.adaptive.direction.label(),
                span = self.adaptive.span,
                "block switched"
            );
        }

        match next {
            Continuation::Continue if !self.log.is_full() => self.present_next(),
            _ => self.terminate(),
        }
    }

    fn terminate(&mut self) {
        self.current = None;
        self.state = SessionState::Terminal;
        self.completed_at = Some(OffsetDateTime::now_utc());
        info!(
            task = %self.plan.kind,
            trials = self.log.len(),
            correct = self.log.correct_count(),
            "session complete"
        );
    }

    /// Display time left before the response window may open. `None` when
    /// not presenting or when the task waits for an explicit advance.
    pub fn time_remaining(&self) -> Option<Duration> {
        if self.state != SessionState::Presenting {
            return None;
        }
        let trial = self.current.as_ref()?;
        let display = trial.display?;
        Some(display.saturating_sub(self.timer.elapsed(trial.timestamps.presented)))
    }

    /// For timed item-by-item displays (word lists), the item that should be
    /// on screen right now.
    pub fn visible_item(&self) -> Option<&str> {
        if self.state != SessionState::Presenting {
            return None;
        }
        let trial = self.current.as_ref()?;
        let TrialSpec::Words { words } = &trial.spec else {
            return None;
        };
        let per_item = self.plan.presentation.per_item()?;
        let shown = self.timer.elapsed(trial.timestamps.presented).as_nanos()
            / per_item.as_nanos().max(1);
        words.get(shown as usize).map(String::as_str)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn task_kind(&self) -> TaskKind {
        self.plan.kind
    }

    pub fn current_spec(&self) -> Option<&TrialSpec> {
        self.current.as_ref().map(|t| &t.spec)
    }

    pub fn adaptive_state(&self) -> &AdaptiveState {
        &self.adaptive
    }

    pub fn participant(&self) -> Option<&Participant> {
        self.participant.as_ref()
    }

    pub fn results(&self) -> &ResultLog {
        &self.log
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// (current trial number, trial budget) while trials are running.
    pub fn trial_progress(&self) -> Option<(usize, usize)> {
        match self.state {
            SessionState::Presenting
            | SessionState::AwaitingResponse
            | SessionState::Scoring => Some((self.log.len() + 1, self.log.budget())),
            _ => None,
        }
    }

    /// The finished session, once terminal.
    pub fn completed(&self) -> Option<CompletedSession> {
        if !self.is_terminal() {
            return None;
        }
        let participant = self.participant.clone()?;
        Some(CompletedSession {
            task: self.plan.kind,
            participant,
            log: self.log.clone(),
            final_state: self.adaptive.clone(),
            completed_at: self.completed_at?,
        })
    }
}
