use std::fmt::Write as _;
use std::io;
use std::time::Instant;

use starter_core::console::{
    CommandError, CommandExecutor, CommandOutcome, Countdown, parse_command,
};
use starter_core::schedule::ScheduleTable;
use starter_core::telemetry::{EventId, TelemetryPayload, TelemetryRecord};
use starter_core::{MonotonicClock, Relay, StartSequencer, SystemState, TelemetryRecorder};

use crate::options::EmulatorOptions;

/// Milliseconds since the emulator started.
#[derive(Debug)]
pub struct HostClock {
    origin: Instant,
}

impl HostClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl MonotonicClock for HostClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Stand-in for a relay coil; transitions surface through telemetry.
#[derive(Debug, Default)]
pub struct TerminalRelay {
    energised: bool,
}

impl TerminalRelay {
    pub fn is_energised(&self) -> bool {
        self.energised
    }
}

impl Relay for TerminalRelay {
    fn activate(&mut self) {
        self.energised = true;
    }

    fn deactivate(&mut self) {
        self.energised = false;
    }
}

/// One emulated starter: the countdown state, the sequencer and the
/// operator console, driven by the terminal loop in `main`.
pub struct Session<C> {
    executor: CommandExecutor,
    sequencer: StartSequencer<TerminalRelay, TerminalRelay>,
    state: SystemState<'static, C>,
    telemetry: TelemetryRecorder,
    printed: EventId,
}

impl<C> Session<C>
where
    C: MonotonicClock,
{
    pub fn new(clock: C, options: &EmulatorOptions) -> io::Result<Self> {
        let mut session = Self {
            executor: CommandExecutor::new(),
            sequencer: StartSequencer::with_config(
                TerminalRelay::default(),
                TerminalRelay::default(),
                options.sequencer,
            ),
            state: SystemState::new(clock),
            telemetry: TelemetryRecorder::new(),
            printed: 0,
        };
        session
            .executor
            .select(options.schedule, &mut session.state)
            .map_err(|err| io::Error::other(err.to_string()))?;
        Ok(session)
    }

    /// Parses and executes one operator line.
    pub fn handle_line(&mut self, line: &str) -> Vec<String> {
        let mut lines = match parse_command(line) {
            Ok(command) => match self.executor.execute(
                command,
                &mut self.sequencer,
                &mut self.state,
                &mut self.telemetry,
            ) {
                Ok(outcome) => describe_outcome(&outcome),
                Err(err) => vec![describe_error(err)],
            },
            Err(err) => vec![format!("ERR syntax {err}")],
        };
        lines.extend(self.drain_telemetry());
        lines
    }

    /// Polls the sequencer once and returns any new log lines.
    pub fn tick(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Err(err) = self.sequencer.poll(&mut self.state, &mut self.telemetry) {
            lines.push(format!("ERR poll {err}"));
        }
        lines.extend(self.drain_telemetry());
        lines
    }

    /// Prompt prefix showing the countdown and which relays are energised.
    pub fn prompt(&self) -> String {
        let mut prompt = String::new();
        let remaining = self
            .state
            .time_remaining_ms()
            .ok()
            .filter(|_| self.state.is_timer_running());
        if let Some(remaining) = remaining {
            let _ = write!(prompt, "[T-{}] ", Countdown(remaining));
        }
        if self.sequencer.horn().is_energised() {
            prompt.push_str("HORN ");
        }
        if self.sequencer.beep().is_energised() {
            prompt.push_str("BEEP ");
        }
        prompt.push_str("> ");
        prompt
    }

    fn drain_telemetry(&mut self) -> Vec<String> {
        let lines = self
            .telemetry
            .since(self.printed)
            .map(describe_record)
            .collect();
        self.printed = self.telemetry.next_id();
        lines
    }
}

fn describe_outcome(outcome: &CommandOutcome) -> Vec<String> {
    match outcome {
        CommandOutcome::Started { title, length_ms } => vec![format!(
            "OK start {title} length={}",
            Countdown(i64::from(*length_ms))
        )],
        CommandOutcome::Stopped { remaining_ms } => match remaining_ms {
            Some(remaining) => vec![format!("OK stop remaining={}", Countdown(*remaining))],
            None => vec!["OK stop".to_string()],
        },
        CommandOutcome::Silenced => vec!["OK silence".to_string()],
        CommandOutcome::Status(snapshot) => vec![format!("OK {snapshot}")],
        CommandOutcome::List {
            sequences,
            selected,
        } => sequences
            .iter()
            .map(|table| describe_table(table, *selected == Some(table)))
            .collect(),
        CommandOutcome::Help(topics) => {
            topics.iter().map(|(_, line)| (*line).to_string()).collect()
        }
        CommandOutcome::Selected(table) => vec![format!(
            "OK select {} ({} signals)",
            table.title,
            table.entry_count()
        )],
    }
}

fn describe_table(table: &ScheduleTable, selected: bool) -> String {
    format!(
        "{} {:<6} {:<16} length={} signals={}",
        if selected { "*" } else { " " },
        table.tag,
        table.title,
        Countdown(i64::from(table.sequence_length_ms)),
        table.entry_count()
    )
}

fn describe_error(err: CommandError) -> String {
    match err {
        CommandError::Busy => format!("ERR busy {err}"),
        CommandError::State(inner) => format!("ERR state {inner}"),
        CommandError::Schedule(inner) => format!("ERR schedule {inner}"),
    }
}

fn describe_record(record: &TelemetryRecord) -> String {
    let mut line = format!("[{:>8}ms] {}", record.timestamp_ms, record.event);
    let (remaining_ms, held_for_ms) = match record.details {
        TelemetryPayload::None => (None, None),
        TelemetryPayload::Sound(sound) => (sound.remaining_ms, sound.held_for_ms),
        TelemetryPayload::Timer(timer) => (timer.remaining_ms, None),
    };
    if let Some(remaining) = remaining_ms {
        let _ = write!(line, " T-{}", Countdown(remaining));
    }
    if let Some(held) = held_for_ms {
        let _ = write!(line, " held={held}ms");
    }
    line
}
