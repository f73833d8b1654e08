//! Mirrors the core telemetry ring to the log sink.
//!
//! The countdown task records into a `starter_core` [`TelemetryRecorder`];
//! after every step it hands the recorder to [`TelemetryMirror::flush`],
//! which logs each record it has not seen yet through defmt on the MCU and
//! stdout on the host.

use starter_core::console::CommandOutcome;
use starter_core::telemetry::{EventId, TelemetryPayload, TelemetryRecord};
use starter_core::TelemetryRecorder;

/// Tracks which telemetry records have already been logged.
#[derive(Copy, Clone, Debug, Default)]
pub struct TelemetryMirror {
    next_unseen: EventId,
}

impl TelemetryMirror {
    pub const fn new() -> Self {
        Self { next_unseen: 0 }
    }

    /// Logs every record newer than the previous flush; returns how many were logged.
    pub fn flush<const N: usize>(&mut self, recorder: &TelemetryRecorder<N>) -> usize {
        let mut logged = 0;
        for record in recorder.since(self.next_unseen) {
            log_record(record);
            logged += 1;
        }
        self.next_unseen = recorder.next_id();
        logged
    }
}

/// Fields extracted from a record for logging.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct LogLine {
    id: EventId,
    code: u16,
    timestamp_ms: u64,
    remaining_ms: Option<i64>,
    held_for_ms: Option<u64>,
}

impl LogLine {
    fn from_record(record: &TelemetryRecord) -> Self {
        let (remaining_ms, held_for_ms) = match record.details {
            TelemetryPayload::None => (None, None),
            TelemetryPayload::Sound(sound) => (sound.remaining_ms, sound.held_for_ms),
            TelemetryPayload::Timer(timer) => (timer.remaining_ms, None),
        };
        Self {
            id: record.id,
            code: record.event.to_raw(),
            timestamp_ms: record.timestamp_ms,
            remaining_ms,
            held_for_ms,
        }
    }
}

fn log_record(record: &TelemetryRecord) {
    emit_log(&LogLine::from_record(record));
}

#[cfg(target_os = "none")]
fn emit_log(line: &LogLine) {
    match (line.remaining_ms, line.held_for_ms) {
        (Some(remaining), Some(held)) => defmt::info!(
            "telemetry #{} code={=u16:#x} t={}ms remaining={}ms held={}ms",
            line.id,
            line.code,
            line.timestamp_ms,
            remaining,
            held
        ),
        (Some(remaining), None) => defmt::info!(
            "telemetry #{} code={=u16:#x} t={}ms remaining={}ms",
            line.id,
            line.code,
            line.timestamp_ms,
            remaining
        ),
        (None, _) => defmt::info!(
            "telemetry #{} code={=u16:#x} t={}ms",
            line.id,
            line.code,
            line.timestamp_ms
        ),
    }
}

#[cfg(not(target_os = "none"))]
fn emit_log(line: &LogLine) {
    match (line.remaining_ms, line.held_for_ms) {
        (Some(remaining), Some(held)) => println!(
            "telemetry #{} code={:#x} t={}ms remaining={}ms held={}ms",
            line.id, line.code, line.timestamp_ms, remaining, held
        ),
        (Some(remaining), None) => println!(
            "telemetry #{} code={:#x} t={}ms remaining={}ms",
            line.id, line.code, line.timestamp_ms, remaining
        ),
        (None, _) => println!(
            "telemetry #{} code={:#x} t={}ms",
            line.id, line.code, line.timestamp_ms
        ),
    }
}

/// Logs the result of a button command.
pub fn log_outcome(button: &'static str, outcome: &CommandOutcome) {
    let title = match outcome {
        CommandOutcome::Started { title, .. } => Some(*title),
        CommandOutcome::Selected(table) => Some(table.title),
        _ => None,
    };
    emit_outcome(button, title);
}

#[cfg(target_os = "none")]
fn emit_outcome(button: &'static str, title: Option<&'static str>) {
    match title {
        Some(title) => defmt::info!("button {}: {}", button, title),
        None => defmt::info!("button {}: ok", button),
    }
}

#[cfg(not(target_os = "none"))]
fn emit_outcome(button: &'static str, title: Option<&'static str>) {
    match title {
        Some(title) => println!("button {button}: {title}"),
        None => println!("button {button}: ok"),
    }
}
