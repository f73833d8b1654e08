//! Live countdown state shared by firmware and host targets.
//!
//! [`SystemState`] tracks the countdown timer and the two sound outputs. It
//! never touches hardware; it only records what the driver has asserted and
//! derives time remaining and sound-elapsed readings from the clock it owns.
//!
//! The timer and the outputs are orthogonal axes: stopping the timer leaves
//! an in-progress sound alone, and the horn and beep flags are independent.

use core::fmt;

use crate::clock::MonotonicClock;
use crate::schedule::Schedule;

/// Whether the countdown clock is advancing.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TimerState {
    Stopped,
    Running,
}

/// Errors surfaced by [`SystemState`] queries and transitions.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StateError {
    /// No schedule has been bound with [`SystemState::set_schedule`].
    NoScheduleAttached,
    /// The timer has never been started, so there is no reference instant.
    TimerNotStarted,
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::NoScheduleAttached => f.write_str("no schedule attached"),
            StateError::TimerNotStarted => f.write_str("timer not started"),
        }
    }
}

/// Countdown state machine for a single starter.
#[derive(Debug)]
pub struct SystemState<'a, C> {
    clock: C,
    schedule: Option<Schedule<'a>>,
    timer: TimerState,
    timer_started_at: Option<u64>,
    horn_on: bool,
    beep_on: bool,
    sound_started_at: Option<u64>,
}

impl<'a, C> SystemState<'a, C>
where
    C: MonotonicClock,
{
    /// Creates a quiescent state with no schedule bound.
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            schedule: None,
            timer: TimerState::Stopped,
            timer_started_at: None,
            horn_on: false,
            beep_on: false,
            sound_started_at: None,
        }
    }

    /// Creates a quiescent state bound to `schedule`.
    #[must_use]
    pub fn with_schedule(clock: C, schedule: Schedule<'a>) -> Self {
        let mut state = Self::new(clock);
        state.schedule = Some(schedule);
        state
    }

    /// Returns to the quiescent state: timer stopped, outputs off, no timestamps.
    /// The bound schedule is kept.
    pub fn initialize(&mut self) {
        self.timer = TimerState::Stopped;
        self.timer_started_at = None;
        self.horn_on = false;
        self.beep_on = false;
        self.sound_started_at = None;
    }

    /// Arms a new countdown run.
    ///
    /// Re-arms the schedule cursor, clears both outputs and stamps the start
    /// instant. This is the only place the cursor is reset.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::NoScheduleAttached`] when no schedule is bound;
    /// the state is left untouched.
    pub fn start_timer(&mut self) -> Result<(), StateError> {
        let schedule = self
            .schedule
            .as_mut()
            .ok_or(StateError::NoScheduleAttached)?;
        schedule.reset();

        self.horn_on = false;
        self.beep_on = false;
        self.timer_started_at = Some(self.clock.now_ms());
        self.timer = TimerState::Running;
        Ok(())
    }

    /// Halts the countdown. Sound outputs and the schedule cursor are left as they are.
    pub fn stop_timer(&mut self) {
        self.timer = TimerState::Stopped;
    }

    /// Sequence length minus time elapsed since [`SystemState::start_timer`].
    ///
    /// Goes negative once the sequence has run out; callers treat that as
    /// complete.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::NoScheduleAttached`] or
    /// [`StateError::TimerNotStarted`] when there is nothing to measure against.
    pub fn time_remaining_ms(&self) -> Result<i64, StateError> {
        let schedule = self.schedule.as_ref().ok_or(StateError::NoScheduleAttached)?;
        let started_at = self.timer_started_at.ok_or(StateError::TimerNotStarted)?;
        let elapsed = self.elapsed_since(started_at);
        let elapsed = i64::try_from(elapsed).unwrap_or(i64::MAX);
        Ok(i64::from(schedule.total_duration_ms()).saturating_sub(elapsed))
    }

    #[must_use]
    pub fn timer_state(&self) -> TimerState {
        self.timer
    }

    #[must_use]
    pub fn is_timer_running(&self) -> bool {
        self.timer == TimerState::Running
    }

    /// Returns `true` when either output is asserted.
    #[must_use]
    pub fn is_sound_on(&self) -> bool {
        self.horn_on || self.beep_on
    }

    #[must_use]
    pub fn is_horn_on(&self) -> bool {
        self.horn_on
    }

    #[must_use]
    pub fn is_beep_on(&self) -> bool {
        self.beep_on
    }

    /// Asserts the horn flag and restarts the shared sound clock.
    pub fn set_horn_on(&mut self) {
        self.horn_on = true;
        self.sound_started_at = Some(self.clock.now_ms());
    }

    /// Asserts the beep flag and restarts the shared sound clock.
    pub fn set_beep_on(&mut self) {
        self.beep_on = true;
        self.sound_started_at = Some(self.clock.now_ms());
    }

    pub fn set_horn_off(&mut self) {
        self.horn_on = false;
    }

    pub fn set_beep_off(&mut self) {
        self.beep_on = false;
    }

    /// Milliseconds since the most recent `set_*_on`, or `None` if no sound has started.
    #[must_use]
    pub fn time_since_sound_start_ms(&self) -> Option<u64> {
        self.sound_started_at
            .map(|started_at| self.elapsed_since(started_at))
    }

    /// Binds the schedule used by subsequent runs, returning the previous one.
    ///
    /// The cursor is not touched; [`SystemState::start_timer`] re-arms it.
    pub fn set_schedule(&mut self, schedule: Schedule<'a>) -> Option<Schedule<'a>> {
        self.schedule.replace(schedule)
    }

    #[must_use]
    pub fn schedule(&self) -> Option<&Schedule<'a>> {
        self.schedule.as_ref()
    }

    pub fn schedule_mut(&mut self) -> Option<&mut Schedule<'a>> {
        self.schedule.as_mut()
    }

    /// Current clock reading, for stamping telemetry.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn elapsed_since(&self, earlier: u64) -> u64 {
        self.clock.now_ms().saturating_sub(earlier)
    }
}
