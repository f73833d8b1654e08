//! Start sequencer: the polling loop that turns countdown state into relay
//! transitions.
//!
//! The sequencer owns the horn and beep relays. Each [`StartSequencer::poll`]
//! releases any sound whose configured duration has elapsed, fires the
//! pending schedule entry once the countdown reaches its trigger time, and
//! stops the timer when the schedule has run out. Nothing blocks; the
//! embedding loop decides how often to poll.

use crate::clock::MonotonicClock;
use crate::relay::Relay;
use crate::schedule::{Schedule, SoundKind};
use crate::state::{StateError, SystemState};
use crate::telemetry::{TelemetryEventKind, TelemetryRecorder};

/// How long each output stays energised once fired.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SequencerConfig {
    pub horn_ms: u32,
    pub beep_ms: u32,
}

impl SequencerConfig {
    /// Default horn blast length.
    pub const DEFAULT_HORN_MS: u32 = 1_000;
    /// Default committee beep length.
    pub const DEFAULT_BEEP_MS: u32 = 300;

    #[must_use]
    pub const fn new(horn_ms: u32, beep_ms: u32) -> Self {
        Self { horn_ms, beep_ms }
    }

    /// Configured hold time for `kind`.
    #[must_use]
    pub fn duration_ms(&self, kind: SoundKind) -> u64 {
        match kind {
            SoundKind::Horn => u64::from(self.horn_ms),
            SoundKind::Beep => u64::from(self.beep_ms),
        }
    }
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HORN_MS, Self::DEFAULT_BEEP_MS)
    }
}

/// Result of a single [`StartSequencer::poll`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PollOutcome {
    /// Timer is stopped; only sound releases were processed.
    Idle,
    /// Countdown in progress.
    Running { remaining_ms: i64 },
    /// The final entry fired and the timer was stopped during this poll.
    Completed,
}

/// Drives a [`SystemState`] and the two sound relays.
pub struct StartSequencer<H, B> {
    horn: H,
    beep: B,
    config: SequencerConfig,
}

impl<H, B> StartSequencer<H, B>
where
    H: Relay,
    B: Relay,
{
    /// Creates a sequencer with default sound durations.
    #[must_use]
    pub fn new(horn: H, beep: B) -> Self {
        Self::with_config(horn, beep, SequencerConfig::default())
    }

    #[must_use]
    pub fn with_config(horn: H, beep: B, config: SequencerConfig) -> Self {
        Self { horn, beep, config }
    }

    #[must_use]
    pub fn config(&self) -> SequencerConfig {
        self.config
    }

    #[must_use]
    pub fn horn(&self) -> &H {
        &self.horn
    }

    #[must_use]
    pub fn beep(&self) -> &B {
        &self.beep
    }

    /// Releases ownership of the relays.
    #[must_use]
    pub fn into_relays(self) -> (H, B) {
        (self.horn, self.beep)
    }

    /// Arms a new run: releases both relays and starts the countdown.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::NoScheduleAttached`] when the state has no
    /// schedule; relays are left untouched in that case.
    pub fn start<C, const N: usize>(
        &mut self,
        state: &mut SystemState<'_, C>,
        telemetry: &mut TelemetryRecorder<N>,
    ) -> Result<(), StateError>
    where
        C: MonotonicClock,
    {
        let was_on = [
            (SoundKind::Horn, state.is_horn_on()),
            (SoundKind::Beep, state.is_beep_on()),
        ];
        let held_for_ms = state.time_since_sound_start_ms();

        state.start_timer()?;
        self.horn.deactivate();
        self.beep.deactivate();

        let now = state.now_ms();
        for (kind, on) in was_on {
            if on {
                telemetry.record_sound_stopped(kind, None, held_for_ms, now);
            }
        }
        telemetry.record_timer(
            TelemetryEventKind::TimerStarted,
            state.time_remaining_ms().ok(),
            now,
        );
        Ok(())
    }

    /// Stops the countdown. A sound already playing runs to its configured length.
    pub fn stop<C, const N: usize>(
        &mut self,
        state: &mut SystemState<'_, C>,
        telemetry: &mut TelemetryRecorder<N>,
    ) where
        C: MonotonicClock,
    {
        state.stop_timer();
        telemetry.record_timer(
            TelemetryEventKind::TimerStopped,
            state.time_remaining_ms().ok(),
            state.now_ms(),
        );
    }

    /// Releases both relays immediately.
    pub fn silence<C, const N: usize>(
        &mut self,
        state: &mut SystemState<'_, C>,
        telemetry: &mut TelemetryRecorder<N>,
    ) where
        C: MonotonicClock,
    {
        for kind in [SoundKind::Horn, SoundKind::Beep] {
            if is_on(state, kind) {
                self.release(kind, state, telemetry);
            }
        }
    }

    /// Advances the sequence by one step.
    ///
    /// # Errors
    ///
    /// Propagates [`StateError`] when the timer is running but the state can
    /// no longer report time remaining.
    pub fn poll<C, const N: usize>(
        &mut self,
        state: &mut SystemState<'_, C>,
        telemetry: &mut TelemetryRecorder<N>,
    ) -> Result<PollOutcome, StateError>
    where
        C: MonotonicClock,
    {
        self.release_elapsed(state, telemetry);

        if !state.is_timer_running() {
            return Ok(PollOutcome::Idle);
        }

        let remaining_ms = state.time_remaining_ms()?;
        let schedule = state
            .schedule_mut()
            .ok_or(StateError::NoScheduleAttached)?;

        if let Some(kind) = take_due(schedule, remaining_ms) {
            self.fire(kind, remaining_ms, state, telemetry);
        }

        let exhausted = state.schedule().is_none_or(Schedule::is_exhausted);
        if exhausted && remaining_ms <= 0 {
            state.stop_timer();
            telemetry.record_timer(
                TelemetryEventKind::SequenceComplete,
                Some(remaining_ms),
                state.now_ms(),
            );
            return Ok(PollOutcome::Completed);
        }

        Ok(PollOutcome::Running { remaining_ms })
    }

    fn release_elapsed<C, const N: usize>(
        &mut self,
        state: &mut SystemState<'_, C>,
        telemetry: &mut TelemetryRecorder<N>,
    ) where
        C: MonotonicClock,
    {
        let Some(elapsed) = state.time_since_sound_start_ms() else {
            return;
        };

        for kind in [SoundKind::Horn, SoundKind::Beep] {
            if is_on(state, kind) && elapsed >= self.config.duration_ms(kind) {
                self.release(kind, state, telemetry);
            }
        }
    }

    fn fire<C, const N: usize>(
        &mut self,
        kind: SoundKind,
        remaining_ms: i64,
        state: &mut SystemState<'_, C>,
        telemetry: &mut TelemetryRecorder<N>,
    ) where
        C: MonotonicClock,
    {
        // Close out an output still held from the previous signal.
        if is_on(state, kind) {
            self.release(kind, state, telemetry);
        }
        match kind {
            SoundKind::Horn => {
                self.horn.activate();
                state.set_horn_on();
            }
            SoundKind::Beep => {
                self.beep.activate();
                state.set_beep_on();
            }
        }
        telemetry.record_sound_started(kind, Some(remaining_ms), state.now_ms());
    }

    fn release<C, const N: usize>(
        &mut self,
        kind: SoundKind,
        state: &mut SystemState<'_, C>,
        telemetry: &mut TelemetryRecorder<N>,
    ) where
        C: MonotonicClock,
    {
        match kind {
            SoundKind::Horn => {
                self.horn.deactivate();
                state.set_horn_off();
            }
            SoundKind::Beep => {
                self.beep.deactivate();
                state.set_beep_off();
            }
        }
        telemetry.record_sound_stopped(
            kind,
            state.time_remaining_ms().ok(),
            state.time_since_sound_start_ms(),
            state.now_ms(),
        );
    }
}

fn is_on<C>(state: &SystemState<'_, C>, kind: SoundKind) -> bool
where
    C: MonotonicClock,
{
    match kind {
        SoundKind::Horn => state.is_horn_on(),
        SoundKind::Beep => state.is_beep_on(),
    }
}

/// Consumes the pending entry when the countdown has reached it.
/// At most one entry is taken per call.
fn take_due(schedule: &mut Schedule<'_>, remaining_ms: i64) -> Option<SoundKind> {
    let entry = schedule.next_entry()?;
    if remaining_ms > i64::from(entry.trigger_time_ms) {
        return None;
    }
    schedule.advance().ok()?;
    Some(entry.sound)
}
