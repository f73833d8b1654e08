//! Status snapshot rendered by the console `status` command.

use core::fmt;

use crate::clock::MonotonicClock;
use crate::schedule::{Schedule, ScheduleEntry};
use crate::state::SystemState;

/// Countdown reading formatted as `m:ss`, with a leading `-` once overdue.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Countdown(pub i64);

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        // Round up so a run shows 0:01 until the final second has passed.
        let seconds = self.0.unsigned_abs().div_ceil(1_000);
        write!(f, "{sign}{}:{:02}", seconds / 60, seconds % 60)
    }
}

/// Point-in-time view of the starter, independent of any transport.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct StatusSnapshot {
    pub title: Option<&'static str>,
    pub running: bool,
    pub remaining_ms: Option<i64>,
    pub horn_on: bool,
    pub beep_on: bool,
    pub next: Option<ScheduleEntry>,
    pub pending: usize,
}

impl StatusSnapshot {
    /// Captures the current state.
    #[must_use]
    pub fn capture<C>(state: &SystemState<'static, C>) -> Self
    where
        C: MonotonicClock,
    {
        let schedule = state.schedule();
        Self {
            title: schedule.map(Schedule::title),
            running: state.is_timer_running(),
            remaining_ms: state
                .time_remaining_ms()
                .ok()
                .filter(|_| state.is_timer_running()),
            horn_on: state.is_horn_on(),
            beep_on: state.is_beep_on(),
            next: schedule.and_then(Schedule::next_entry),
            pending: schedule.map_or(0, Schedule::pending),
        }
    }
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sequence={}", self.title.unwrap_or("<none>"))?;
        write!(f, " timer={}", if self.running { "running" } else { "stopped" })?;
        if let Some(remaining) = self.remaining_ms {
            write!(f, " remaining={}", Countdown(remaining))?;
        }
        write!(f, " horn={}", on_off(self.horn_on))?;
        write!(f, " beep={}", on_off(self.beep_on))?;
        match self.next {
            Some(entry) => write!(
                f,
                " next={}@{} pending={}",
                entry.sound,
                Countdown(i64::from(entry.trigger_time_ms)),
                self.pending
            ),
            None => f.write_str(" next=none"),
        }
    }
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}
