//! Telemetry event catalog and ring buffer shared by firmware and host targets.
//!
//! The sequencer records every timer and relay transition here. Front ends
//! mirror new records to their own log sink (defmt on the MCU, the terminal
//! in the emulator) using [`TelemetryRecorder::since`]. Event kinds encode to
//! compact numeric codes so they can be logged without string formatting.

use core::fmt;

use heapless::{HistoryBuf, OldestOrdered};

use crate::schedule::SoundKind;

/// Identifier assigned to each recorded event.
pub type EventId = u32;

/// Total number of telemetry entries retained in memory.
pub const TELEMETRY_RING_CAPACITY: usize = 64;

/// Discriminated telemetry events.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TelemetryEventKind {
    TimerStarted,
    TimerStopped,
    SoundStarted(SoundKind),
    SoundStopped(SoundKind),
    SequenceComplete,
    Custom(u16),
}

impl fmt::Display for TelemetryEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryEventKind::TimerStarted => f.write_str("timer-started"),
            TelemetryEventKind::TimerStopped => f.write_str("timer-stopped"),
            TelemetryEventKind::SoundStarted(kind) => write!(f, "{kind}-on"),
            TelemetryEventKind::SoundStopped(kind) => write!(f, "{kind}-off"),
            TelemetryEventKind::SequenceComplete => f.write_str("sequence-complete"),
            TelemetryEventKind::Custom(code) => write!(f, "custom({code})"),
        }
    }
}

impl TelemetryEventKind {
    const TIMER_STARTED_CODE: u16 = 0x0001;
    const TIMER_STOPPED_CODE: u16 = 0x0002;
    const SEQUENCE_COMPLETE_CODE: u16 = 0x0003;
    const SOUND_STARTED_BASE: u16 = 0x0010;
    const SOUND_STOPPED_BASE: u16 = 0x0014;

    /// Encodes the event into a compact transport-friendly discriminant.
    #[must_use]
    pub const fn to_raw(self) -> u16 {
        match self {
            TelemetryEventKind::TimerStarted => Self::TIMER_STARTED_CODE,
            TelemetryEventKind::TimerStopped => Self::TIMER_STOPPED_CODE,
            TelemetryEventKind::SequenceComplete => Self::SEQUENCE_COMPLETE_CODE,
            TelemetryEventKind::SoundStarted(kind) => Self::SOUND_STARTED_BASE + sound_index(kind),
            TelemetryEventKind::SoundStopped(kind) => Self::SOUND_STOPPED_BASE + sound_index(kind),
            TelemetryEventKind::Custom(code) => code,
        }
    }

    /// Decodes a raw discriminant, falling back to [`TelemetryEventKind::Custom`].
    #[must_use]
    pub fn from_raw(code: u16) -> Self {
        match code {
            Self::TIMER_STARTED_CODE => TelemetryEventKind::TimerStarted,
            Self::TIMER_STOPPED_CODE => TelemetryEventKind::TimerStopped,
            Self::SEQUENCE_COMPLETE_CODE => TelemetryEventKind::SequenceComplete,
            value if (Self::SOUND_STARTED_BASE..Self::SOUND_STOPPED_BASE).contains(&value) => {
                sound_from_index(value - Self::SOUND_STARTED_BASE)
                    .map_or(TelemetryEventKind::Custom(value), TelemetryEventKind::SoundStarted)
            }
            value if (Self::SOUND_STOPPED_BASE..Self::SOUND_STOPPED_BASE + 4).contains(&value) => {
                sound_from_index(value - Self::SOUND_STOPPED_BASE)
                    .map_or(TelemetryEventKind::Custom(value), TelemetryEventKind::SoundStopped)
            }
            other => TelemetryEventKind::Custom(other),
        }
    }
}

/// Payloads carried alongside telemetry events.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TelemetryPayload {
    None,
    Sound(SoundTelemetry),
    Timer(TimerTelemetry),
}

impl TelemetryPayload {
    #[must_use]
    pub const fn none() -> Self {
        TelemetryPayload::None
    }
}

/// Relay transition payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SoundTelemetry {
    pub kind: SoundKind,
    /// Countdown time remaining when the transition happened, if a run was armed.
    pub remaining_ms: Option<i64>,
    /// How long the output was held; only set when it is released.
    pub held_for_ms: Option<u64>,
}

impl SoundTelemetry {
    #[must_use]
    pub const fn new(kind: SoundKind, remaining_ms: Option<i64>, held_for_ms: Option<u64>) -> Self {
        Self {
            kind,
            remaining_ms,
            held_for_ms,
        }
    }
}

/// Timer transition payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimerTelemetry {
    pub remaining_ms: Option<i64>,
}

impl TimerTelemetry {
    #[must_use]
    pub const fn new(remaining_ms: Option<i64>) -> Self {
        Self { remaining_ms }
    }
}

/// Telemetry record stored in the ring buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TelemetryRecord {
    pub id: EventId,
    pub timestamp_ms: u64,
    pub event: TelemetryEventKind,
    pub details: TelemetryPayload,
}

/// Telemetry ring buffer type alias.
pub type TelemetryRing<const CAPACITY: usize = TELEMETRY_RING_CAPACITY> =
    HistoryBuf<TelemetryRecord, CAPACITY>;

/// Records telemetry events into a fixed-size ring buffer.
pub struct TelemetryRecorder<const CAPACITY: usize = TELEMETRY_RING_CAPACITY> {
    ring: TelemetryRing<CAPACITY>,
    next_event_id: EventId,
}

impl<const CAPACITY: usize> TelemetryRecorder<CAPACITY> {
    /// Creates a new telemetry recorder with an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ring: HistoryBuf::new(),
            next_event_id: 0,
        }
    }

    /// Returns an iterator over the recorded telemetry in chronological order.
    #[must_use]
    pub fn oldest_first(&self) -> OldestOrdered<'_, TelemetryRecord> {
        self.ring.oldest_ordered()
    }

    /// Iterates records whose id is at or after `first_unseen`, oldest first.
    ///
    /// Front ends keep the id after the last record they printed and pass it
    /// back here; records already evicted from the ring are skipped.
    pub fn since(&self, first_unseen: EventId) -> impl Iterator<Item = &TelemetryRecord> + '_ {
        self.oldest_first()
            .filter(move |record| record.id >= first_unseen)
    }

    /// Id the next recorded event will receive.
    #[must_use]
    pub const fn next_id(&self) -> EventId {
        self.next_event_id
    }

    /// Returns the most recent telemetry record, if available.
    #[must_use]
    pub fn latest(&self) -> Option<&TelemetryRecord> {
        self.ring.recent()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Records a relay being energised.
    pub fn record_sound_started(
        &mut self,
        kind: SoundKind,
        remaining_ms: Option<i64>,
        timestamp_ms: u64,
    ) -> EventId {
        self.record(
            TelemetryEventKind::SoundStarted(kind),
            TelemetryPayload::Sound(SoundTelemetry::new(kind, remaining_ms, None)),
            timestamp_ms,
        )
    }

    /// Records a relay being released after `held_for_ms`.
    pub fn record_sound_stopped(
        &mut self,
        kind: SoundKind,
        remaining_ms: Option<i64>,
        held_for_ms: Option<u64>,
        timestamp_ms: u64,
    ) -> EventId {
        self.record(
            TelemetryEventKind::SoundStopped(kind),
            TelemetryPayload::Sound(SoundTelemetry::new(kind, remaining_ms, held_for_ms)),
            timestamp_ms,
        )
    }

    /// Records a timer transition (start, stop or completion).
    pub fn record_timer(
        &mut self,
        event: TelemetryEventKind,
        remaining_ms: Option<i64>,
        timestamp_ms: u64,
    ) -> EventId {
        self.record(
            event,
            TelemetryPayload::Timer(TimerTelemetry::new(remaining_ms)),
            timestamp_ms,
        )
    }

    /// Records an arbitrary telemetry event with the supplied payload.
    pub fn record(
        &mut self,
        event: TelemetryEventKind,
        payload: TelemetryPayload,
        timestamp_ms: u64,
    ) -> EventId {
        let id = self.next_event_id;
        self.next_event_id = self.next_event_id.wrapping_add(1);

        self.ring.write(TelemetryRecord {
            id,
            timestamp_ms,
            event,
            details: payload,
        });

        id
    }
}

impl<const CAPACITY: usize> Default for TelemetryRecorder<CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

const fn sound_index(kind: SoundKind) -> u16 {
    match kind {
        SoundKind::Horn => 0,
        SoundKind::Beep => 1,
    }
}

fn sound_from_index(index: u16) -> Option<SoundKind> {
    match index {
        0 => Some(SoundKind::Horn),
        1 => Some(SoundKind::Beep),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_codes_decode_to_known_events() {
        let fixtures = [
            (TelemetryEventKind::TimerStarted, 0x0001),
            (TelemetryEventKind::TimerStopped, 0x0002),
            (TelemetryEventKind::SequenceComplete, 0x0003),
            (TelemetryEventKind::SoundStarted(SoundKind::Horn), 0x0010),
            (TelemetryEventKind::SoundStarted(SoundKind::Beep), 0x0011),
            (TelemetryEventKind::SoundStopped(SoundKind::Horn), 0x0014),
            (TelemetryEventKind::SoundStopped(SoundKind::Beep), 0x0015),
        ];

        for (event, code) in fixtures {
            assert_eq!(event.to_raw(), code);
            assert_eq!(TelemetryEventKind::from_raw(code), event);
        }
    }

    #[test]
    fn unknown_codes_fall_back_to_custom() {
        assert_eq!(
            TelemetryEventKind::from_raw(0x0012),
            TelemetryEventKind::Custom(0x0012)
        );
        assert_eq!(
            TelemetryEventKind::from_raw(0xBEEF),
            TelemetryEventKind::Custom(0xBEEF)
        );
    }

    #[test]
    fn records_sound_hold_duration() {
        let mut recorder = TelemetryRecorder::<8>::new();

        let on = recorder.record_sound_started(SoundKind::Horn, Some(300_000), 3_000);
        let off =
            recorder.record_sound_stopped(SoundKind::Horn, Some(299_000), Some(1_000), 4_000);
        assert_eq!((on, off), (0, 1));

        let record = recorder.latest().copied().unwrap();
        assert_eq!(record.event, TelemetryEventKind::SoundStopped(SoundKind::Horn));
        assert_eq!(record.timestamp_ms, 4_000);
        match record.details {
            TelemetryPayload::Sound(details) => {
                assert_eq!(details.held_for_ms, Some(1_000));
                assert_eq!(details.remaining_ms, Some(299_000));
            }
            _ => panic!("expected sound payload"),
        }
    }

    #[test]
    fn since_skips_seen_and_evicted_records() {
        let mut recorder = TelemetryRecorder::<4>::new();
        for timestamp in 0..6 {
            recorder.record_timer(TelemetryEventKind::TimerStarted, None, timestamp);
        }

        assert_eq!(recorder.len(), 4);
        assert_eq!(recorder.next_id(), 6);

        let ids: heapless::Vec<EventId, 4> = recorder.since(0).map(|record| record.id).collect();
        assert_eq!(ids.as_slice(), &[2, 3, 4, 5]);

        let ids: heapless::Vec<EventId, 4> = recorder.since(5).map(|record| record.id).collect();
        assert_eq!(ids.as_slice(), &[5]);

        assert_eq!(recorder.since(6).count(), 0);
    }

    #[test]
    fn display_uses_sound_labels() {
        use core::fmt::Write as _;

        let mut text: heapless::String<16> = heapless::String::new();
        write!(text, "{}", TelemetryEventKind::SoundStarted(SoundKind::Beep)).unwrap();
        assert_eq!(text.as_str(), "beep-on");
    }
}
