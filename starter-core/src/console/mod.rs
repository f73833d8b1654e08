//! Operator console shared by the firmware buttons and the host emulator.
//!
//! [`grammar`] turns a text line into a [`ConsoleCommand`]; the firmware
//! builds the same values from button presses. [`CommandExecutor`] applies a
//! command to the sequencer and countdown state and reports what happened.

use core::fmt;

use crate::clock::MonotonicClock;
use crate::relay::Relay;
use crate::schedule::{ALL_SEQUENCES, ScheduleError, ScheduleTable, next_sequence};
use crate::sequencer::StartSequencer;
use crate::state::{StateError, SystemState};
use crate::telemetry::TelemetryRecorder;

pub mod grammar;
pub mod status;

pub use grammar::{ConsoleCommand, ParseError, parse_command};
pub use status::{Countdown, StatusSnapshot};

/// Help lines shown by the `help` command.
pub const HELP_TOPICS: &[(&str, &str)] = &[
    ("start", "start                 - arm the selected sequence and start counting down"),
    ("stop", "stop                  - stop the countdown (a sounding signal finishes)"),
    ("silence", "silence               - release both relays immediately"),
    ("status", "status                - show timer, relays and next signal"),
    ("list", "list                  - list built-in sequences"),
    ("select", "select <five|three|test> - choose the sequence for the next start"),
    ("next", "next                  - choose the following sequence"),
    ("help", "help                  - show this list"),
];

/// Successful command results.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CommandOutcome {
    /// The bound schedule was armed and the countdown started.
    Started {
        title: &'static str,
        length_ms: u32,
    },
    Stopped { remaining_ms: Option<i64> },
    Silenced,
    Status(StatusSnapshot),
    List {
        sequences: &'static [ScheduleTable],
        selected: Option<&'static ScheduleTable>,
    },
    Help(&'static [(&'static str, &'static str)]),
    Selected(&'static ScheduleTable),
}

/// Errors surfaced while executing a command.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CommandError {
    /// The sequence cannot change while a countdown is running.
    Busy,
    State(StateError),
    Schedule(ScheduleError),
}

impl From<StateError> for CommandError {
    fn from(error: StateError) -> Self {
        Self::State(error)
    }
}

impl From<ScheduleError> for CommandError {
    fn from(error: ScheduleError) -> Self {
        Self::Schedule(error)
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Busy => f.write_str("countdown running; stop it first"),
            CommandError::State(error) => error.fmt(f),
            CommandError::Schedule(error) => error.fmt(f),
        }
    }
}

/// Applies console commands, remembering which built-in sequence is selected.
#[derive(Copy, Clone, Debug, Default)]
pub struct CommandExecutor {
    selected: Option<&'static ScheduleTable>,
}

impl CommandExecutor {
    /// Creates an executor with nothing selected.
    #[must_use]
    pub const fn new() -> Self {
        Self { selected: None }
    }

    #[must_use]
    pub const fn selected(&self) -> Option<&'static ScheduleTable> {
        self.selected
    }

    /// Binds `table` to `state`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Busy`] while the timer runs, or the schedule
    /// construction error for an inconsistent table.
    pub fn select<C>(
        &mut self,
        table: &'static ScheduleTable,
        state: &mut SystemState<'static, C>,
    ) -> Result<CommandOutcome, CommandError>
    where
        C: MonotonicClock,
    {
        if state.is_timer_running() {
            return Err(CommandError::Busy);
        }
        state.set_schedule(table.schedule()?);
        self.selected = Some(table);
        Ok(CommandOutcome::Selected(table))
    }

    /// Executes a parsed command.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] when the command cannot be applied in the
    /// current state.
    pub fn execute<H, B, C, const N: usize>(
        &mut self,
        command: ConsoleCommand,
        sequencer: &mut StartSequencer<H, B>,
        state: &mut SystemState<'static, C>,
        telemetry: &mut TelemetryRecorder<N>,
    ) -> Result<CommandOutcome, CommandError>
    where
        H: Relay,
        B: Relay,
        C: MonotonicClock,
    {
        match command {
            ConsoleCommand::Start => {
                sequencer.start(state, telemetry)?;
                let schedule = state.schedule().ok_or(StateError::NoScheduleAttached)?;
                Ok(CommandOutcome::Started {
                    title: schedule.title(),
                    length_ms: schedule.total_duration_ms(),
                })
            }
            ConsoleCommand::Stop => {
                sequencer.stop(state, telemetry);
                Ok(CommandOutcome::Stopped {
                    remaining_ms: state.time_remaining_ms().ok(),
                })
            }
            ConsoleCommand::Silence => {
                sequencer.silence(state, telemetry);
                Ok(CommandOutcome::Silenced)
            }
            ConsoleCommand::Status => Ok(CommandOutcome::Status(StatusSnapshot::capture(state))),
            ConsoleCommand::List => Ok(CommandOutcome::List {
                sequences: &ALL_SEQUENCES,
                selected: self.selected,
            }),
            ConsoleCommand::Help => Ok(CommandOutcome::Help(HELP_TOPICS)),
            ConsoleCommand::Select(table) => self.select(table, state),
            ConsoleCommand::Next => {
                let table = self.selected.map_or(&ALL_SEQUENCES[0], next_sequence);
                self.select(table, state)
            }
        }
    }
}
