//! Session timer state machine.
//!
//! The timer does not own a thread. It owns a [`TickSchedule`] describing
//! when the next one-second tick is due; the caller waits for that deadline
//! and calls [`SessionTimer::tick`]. Pausing, cancelling or completing drops
//! the schedule, so a stale deadline can never fire.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> Completed -> Idle
//!            |          |
//!            +----------+-> Idle (cancel, nothing recorded)
//! ```

use crate::{Error, Result, WorkoutDefinition};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Receiver of finished sessions (the progress ledger)
pub trait CompletionSink {
    fn record_completion(&mut self, workout: &WorkoutDefinition, session_id: Uuid) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    /// Only observable while the completion is being recorded
    Completed,
}

/// Repeating tick deadline, created on start/resume and dropped on stop
#[derive(Debug, Clone)]
pub struct TickSchedule {
    interval: Duration,
    next_due: Instant,
    fired: u64,
}

impl TickSchedule {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: Instant::now() + interval,
            fired: 0,
        }
    }

    fn advance(&mut self) {
        self.fired += 1;
        self.next_due += self.interval;
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Time left until the next tick, zero if already overdue
    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }

    pub fn ticks_fired(&self) -> u64 {
        self.fired
    }
}

/// The workout currently loaded into the timer
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub id: Uuid,
    pub workout: WorkoutDefinition,
    /// Seconds left; drops to -1 on the tick that completes the session
    pub remaining: i64,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimerEvent {
    Started { workout_id: String, total: u32 },
    Ticked { remaining: i64 },
    Paused { remaining: i64 },
    Resumed { remaining: i64 },
    Cancelled { workout_id: String },
    Completed { workout_id: String, forced: bool },
}

#[derive(Debug)]
pub struct SessionTimer {
    state: TimerState,
    session: Option<ActiveSession>,
    schedule: Option<TickSchedule>,
    tick_interval: Duration,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl SessionTimer {
    pub fn new(tick_interval: Duration) -> Self {
        Self {
            state: TimerState::Idle,
            session: None,
            schedule: None,
            tick_interval,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn session(&self) -> Option<&ActiveSession> {
        self.session.as_ref()
    }

    pub fn remaining(&self) -> Option<i64> {
        self.session.as_ref().map(|s| s.remaining)
    }

    pub fn schedule(&self) -> Option<&TickSchedule> {
        self.schedule.as_ref()
    }

    /// 0.0 .. 1.0 elapsed share of the active session
    pub fn progress(&self) -> f64 {
        match &self.session {
            Some(s) if s.total > 0 => {
                (1.0 - s.remaining.max(0) as f64 / s.total as f64).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Load `workout` and start counting down from its full duration.
    ///
    /// Any session already loaded is abandoned first, without recording it.
    pub fn start(&mut self, workout: &WorkoutDefinition) -> TimerEvent {
        if let Some(prev) = self.stop_and_discard() {
            tracing::debug!("Abandoned session {} for {}", prev.id, workout.id);
        }

        let session = ActiveSession {
            id: Uuid::new_v4(),
            workout: workout.clone(),
            remaining: workout.duration_seconds as i64,
            total: workout.duration_seconds,
        };
        tracing::info!("Started {} ({}s), session {}", workout.id, session.total, session.id);

        self.session = Some(session);
        self.schedule = Some(TickSchedule::new(self.tick_interval));
        self.state = TimerState::Running;

        TimerEvent::Started {
            workout_id: workout.id.clone(),
            total: workout.duration_seconds,
        }
    }

    /// Count down one second. Ticks outside `Running` are ignored.
    ///
    /// The session completes on the tick that takes `remaining` below zero,
    /// one full tick after the display reached 0.
    pub fn tick<S: CompletionSink + ?Sized>(&mut self, sink: &mut S) -> Result<Option<TimerEvent>> {
        if self.state != TimerState::Running {
            return Ok(None);
        }

        let remaining = match self.session.as_mut() {
            Some(session) => {
                session.remaining -= 1;
                session.remaining
            }
            None => return Ok(None),
        };
        if let Some(schedule) = self.schedule.as_mut() {
            schedule.advance();
        }

        if remaining < 0 {
            return self.finish(sink, false).map(Some);
        }
        Ok(Some(TimerEvent::Ticked { remaining }))
    }

    pub fn pause(&mut self) -> Result<TimerEvent> {
        self.require(&[TimerState::Running], "pause")?;

        self.schedule = None;
        self.state = TimerState::Paused;
        let remaining = self.remaining().unwrap_or(0);
        tracing::debug!("Paused with {}s remaining", remaining);
        Ok(TimerEvent::Paused { remaining })
    }

    /// Continue a paused session from where it stopped
    pub fn resume(&mut self) -> Result<TimerEvent> {
        self.require(&[TimerState::Paused], "resume")?;

        self.schedule = Some(TickSchedule::new(self.tick_interval));
        self.state = TimerState::Running;
        Ok(TimerEvent::Resumed {
            remaining: self.remaining().unwrap_or(0),
        })
    }

    /// Abandon the session. Nothing is recorded.
    pub fn cancel(&mut self) -> Result<TimerEvent> {
        self.require(&[TimerState::Running, TimerState::Paused], "cancel")?;

        let workout_id = self
            .stop_and_discard()
            .map(|s| s.workout.id)
            .unwrap_or_default();
        tracing::info!("Cancelled {}", workout_id);
        Ok(TimerEvent::Cancelled { workout_id })
    }

    /// Record the session now, regardless of the time left
    pub fn force_complete<S: CompletionSink + ?Sized>(&mut self, sink: &mut S) -> Result<TimerEvent> {
        self.require(&[TimerState::Running, TimerState::Paused], "complete")?;
        self.finish(sink, true)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn require(&self, allowed: &[TimerState], action: &'static str) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                action,
                state: self.state,
            })
        }
    }

    fn stop_and_discard(&mut self) -> Option<ActiveSession> {
        self.schedule = None;
        self.state = TimerState::Idle;
        self.session.take()
    }

    fn finish<S: CompletionSink + ?Sized>(&mut self, sink: &mut S, forced: bool) -> Result<TimerEvent> {
        self.schedule = None;
        self.state = TimerState::Completed;

        let result = match self.session.take() {
            Some(session) => sink
                .record_completion(&session.workout, session.id)
                .map(|_| TimerEvent::Completed {
                    workout_id: session.workout.id,
                    forced,
                }),
            None => Err(Error::Other("no active session".into())),
        };

        self.state = TimerState::Idle;
        result
    }
}

/// Format seconds as `mm:ss`; negative values show as `00:00`
pub fn format_clock(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
