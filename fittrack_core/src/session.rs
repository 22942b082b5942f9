//! Workout session engine.
//!
//! One run-through of a workout template, modelled as an explicit state
//! machine: the engine iterates exercises and sets, credits calories as
//! each set is presented (set completion is trusted, not confirmed),
//! drives the countdown timer for rest periods, and commits a session
//! record to the ledger on completion or abort.
//!
//! All engine methods run on the controlling thread. The timer's worker
//! thread only posts events into the engine's channel; `pump` drains
//! them and applies transitions, so the shell can poll from its own
//! event loop and render `EngineEvent`s.

use crate::timer::{CountdownTimer, TimerEvent};
use crate::{Error, ExerciseStep, Result, Store, DEFAULT_CALORIES_PER_REP, DEFAULT_ICON};
use chrono::{DateTime, Local};
use std::sync::mpsc::{channel, Receiver};
use std::time::{Duration, Instant};

/// Session state. `Resting` holds the position to present when the rest
/// countdown ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active { exercise: usize, set: u32 },
    Resting { exercise: usize, set: u32 },
    Completed,
    Aborted,
}

/// Outcome of a finished (completed or aborted) session
#[derive(Clone, Debug)]
pub struct SessionSummary {
    pub workout_name: String,
    pub duration_minutes: u32,
    pub calories_burned: f64,
    pub aborted: bool,
}

/// Events surfaced to the shell by `pump`
#[derive(Clone, Debug)]
pub enum EngineEvent {
    /// The status line changed (new set presented, rest started)
    Status(String),
    /// Rest countdown tick, whole seconds remaining
    Tick { remaining: u32 },
    /// The session was committed to the ledger
    Finished(SessionSummary),
}

/// Transient, exclusively-owned snapshot of the in-progress run;
/// discarded on completion or abort.
struct RunSnapshot {
    workout_name: String,
    steps: Vec<ExerciseStep>,
    calories: f64,
    started_at: DateTime<Local>,
    presented_at: Instant,
    timer_generation: u64,
}

pub struct SessionEngine {
    state: SessionState,
    run: Option<RunSnapshot>,
    timer: CountdownTimer,
    events: Receiver<TimerEvent>,
    /// Fixed delay between presenting a set and starting its rest
    acclimation: Duration,
    status: String,
    pending: Vec<EngineEvent>,
}

impl SessionEngine {
    pub fn new(acclimation: Duration) -> Self {
        let (tx, rx) = channel();
        Self {
            state: SessionState::Idle,
            run: None,
            timer: CountdownTimer::new(tx),
            events: rx,
            acclimation,
            status: String::new(),
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current status line for display
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Begin a session from the named template.
    ///
    /// The template is snapshotted: catalog edits made while the session
    /// runs do not affect it. Rejects with `InvalidState` if a session
    /// is already in progress and `NotFound` if the template is absent.
    pub fn start(&mut self, store: &mut Store, workout_name: &str) -> Result<()> {
        if matches!(
            self.state,
            SessionState::Active { .. } | SessionState::Resting { .. }
        ) {
            return Err(Error::InvalidState(format!(
                "a session is already in progress ({:?})",
                self.state
            )));
        }

        let template = store
            .get_workout(workout_name)
            .ok_or_else(|| Error::NotFound(format!("workout template {:?}", workout_name)))?;
        let steps = template.exercises.clone();
        let name = template.name.clone();

        tracing::info!("Starting session {:?} ({} steps)", name, steps.len());
        self.run = Some(RunSnapshot {
            workout_name: name,
            steps,
            calories: 0.0,
            started_at: Local::now(),
            presented_at: Instant::now(),
            timer_generation: 0,
        });
        self.present(store, 0, 1)
    }

    /// Drain timer events and apply due transitions; returns the events
    /// the shell should render. Call this from the controlling thread's
    /// loop.
    pub fn pump(&mut self, store: &mut Store) -> Result<Vec<EngineEvent>> {
        let incoming: Vec<TimerEvent> = self.events.try_iter().collect();
        for event in incoming {
            // Discard events from a countdown that was stopped or replaced
            let current = self.run.as_ref().map(|r| r.timer_generation);
            if current != Some(event.generation) {
                continue;
            }

            if event.running {
                self.pending.push(EngineEvent::Tick {
                    remaining: event.remaining,
                });
            } else if let SessionState::Resting { exercise, set } = self.state {
                self.present(store, exercise, set)?;
            }
        }

        // A presented set moves on to its rest after the acclimation delay
        if let SessionState::Active { .. } = self.state {
            let due = self
                .run
                .as_ref()
                .map(|r| r.presented_at.elapsed() >= self.acclimation)
                .unwrap_or(false);
            if due {
                self.begin_rest(store)?;
            }
        }

        Ok(std::mem::take(&mut self.pending))
    }

    /// Cut the current rest short and advance immediately.
    ///
    /// The stopped countdown delivers no further tick. Outside of
    /// `Resting` this is a no-op.
    pub fn skip(&mut self, store: &mut Store) -> Result<Vec<EngineEvent>> {
        if !matches!(self.state, SessionState::Resting { .. }) {
            return Ok(Vec::new());
        }
        // stop() quiesces the worker and posts the terminal event before
        // returning, so the transition happens in this pump
        self.timer.stop();
        self.pump(store)
    }

    /// Forwarded to the timer; engine state does not change
    pub fn pause(&self) {
        self.timer.pause();
    }

    pub fn resume(&self) {
        self.timer.resume();
    }

    /// Terminate the session early (user-confirmed stop).
    ///
    /// Elapsed duration and calories accumulated so far are still
    /// committed, exactly as on completion.
    pub fn stop(&mut self, store: &mut Store) -> Result<SessionSummary> {
        match self.state {
            SessionState::Idle | SessionState::Completed | SessionState::Aborted => Err(
                Error::InvalidState("no session in progress".into()),
            ),
            SessionState::Active { .. } | SessionState::Resting { .. } => {
                self.timer.stop();
                // The stopped countdown's trailing events are moot
                while self.events.try_recv().is_ok() {}
                self.finish(store, true)
            }
        }
    }

    /// Present `Active(exercise, set)`, epsilon-advancing past exhausted
    /// sets and exercises; completes the session when no step remains.
    fn present(&mut self, store: &mut Store, exercise: usize, set: u32) -> Result<()> {
        let mut exercise = exercise;
        let mut set = set;
        let step = loop {
            let run = self
                .run
                .as_ref()
                .ok_or_else(|| Error::InvalidState("no active workout".into()))?;
            if exercise >= run.steps.len() {
                return self.finish(store, false).map(|_| ());
            }
            let step = &run.steps[exercise];
            if set > step.sets {
                exercise += 1;
                set = 1;
                continue;
            }
            break step.clone();
        };

        // Calories are credited when the set is presented; reps are
        // trusted as completed
        let (per_rep, icon) = match store.get_exercise(&step.name) {
            Some(e) => (e.calories_per_rep, e.icon.clone()),
            None => (DEFAULT_CALORIES_PER_REP, DEFAULT_ICON.to_string()),
        };

        let run = self
            .run
            .as_mut()
            .ok_or_else(|| Error::InvalidState("no active workout".into()))?;
        run.calories += per_rep * f64::from(step.reps);
        run.presented_at = Instant::now();

        self.status = format!(
            "{} {} - set {}/{} ({} reps)",
            icon, step.name, set, step.sets, step.reps
        );
        self.pending.push(EngineEvent::Status(self.status.clone()));
        self.state = SessionState::Active { exercise, set };
        tracing::debug!("Presented exercise {} set {}", exercise, set);
        Ok(())
    }

    /// Transition a presented set into its rest period, or complete the
    /// session when nothing remains after it.
    fn begin_rest(&mut self, store: &mut Store) -> Result<()> {
        let SessionState::Active { exercise, set } = self.state else {
            return Ok(());
        };

        let (rest, has_next) = {
            let run = self
                .run
                .as_ref()
                .ok_or_else(|| Error::InvalidState("no active workout".into()))?;
            let step = &run.steps[exercise];
            let has_next = set < step.sets || exercise + 1 < run.steps.len();
            (step.rest, has_next)
        };

        if !has_next {
            return self.finish(store, false).map(|_| ());
        }
        if rest == 0 {
            // Zero-second rest: no countdown, straight to the next set
            return self.present(store, exercise, set + 1);
        }

        self.timer.start(rest);
        if let Some(run) = self.run.as_mut() {
            run.timer_generation = self.timer.generation();
        }
        self.state = SessionState::Resting {
            exercise,
            set: set + 1,
        };
        self.status = format!("Resting ({}s)", rest);
        self.pending.push(EngineEvent::Status(self.status.clone()));
        Ok(())
    }

    /// Commit the run to the ledger and enter the terminal state. Either
    /// terminal state accepts a new `start`. The snapshot is discarded
    /// either way; a persistence failure propagates to the caller after
    /// the store has rolled itself back.
    fn finish(&mut self, store: &mut Store, aborted: bool) -> Result<SessionSummary> {
        let run = self
            .run
            .take()
            .ok_or_else(|| Error::InvalidState("no active workout".into()))?;
        self.state = if aborted {
            SessionState::Aborted
        } else {
            SessionState::Completed
        };
        self.status.clear();

        let elapsed = Local::now() - run.started_at;
        let duration_minutes = elapsed.num_minutes().max(1) as u32;

        store.record_session(
            &run.workout_name,
            run.steps.clone(),
            duration_minutes,
            run.calories,
        )?;

        let summary = SessionSummary {
            workout_name: run.workout_name,
            duration_minutes,
            calories_burned: (run.calories * 10.0).round() / 10.0,
            aborted,
        };
        tracing::info!(
            "Session {:?} {}: {} min, {} kcal",
            summary.workout_name,
            if aborted { "aborted" } else { "completed" },
            summary.duration_minutes,
            summary.calories_burned
        );
        self.pending.push(EngineEvent::Finished(summary.clone()));
        Ok(summary)
    }
}
