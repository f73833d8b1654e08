#![no_std]

// Countdown logic for the regatta starter.
//
// This crate stays portable across MCU firmware and host tooling by avoiding the
// Rust standard library. Hardware and time enter through the `Relay` and
// `MonotonicClock` traits; everything else is plain state.

pub mod clock;
pub mod console;
pub mod relay;
pub mod schedule;
pub mod sequencer;
pub mod state;
pub mod telemetry;

pub use clock::{ManualClock, MonotonicClock};
pub use relay::{NoopRelay, Relay};
pub use schedule::{Schedule, ScheduleEntry, ScheduleError, ScheduleTable, SoundKind};
pub use sequencer::{PollOutcome, SequencerConfig, StartSequencer};
pub use state::{StateError, SystemState, TimerState};
pub use telemetry::{TelemetryEventKind, TelemetryRecorder};
