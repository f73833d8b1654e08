//! Countdown schedule tables shared by firmware and host targets.
//!
//! A [`Schedule`] wraps two parallel tables (trigger times and sound kinds)
//! so they cannot drift apart. Once constructed, the only interactions are
//! reading the pending entry and moving the cursor one step toward the end
//! of the countdown. Everything here is `no_std` and allocation free; the
//! tables themselves are borrowed from the embedding application.

use core::fmt;

pub mod sequences;

pub use sequences::{
    ALL_SEQUENCES, FIVE_MINUTE, QUICK_TEST, THREE_MINUTE, five_minute, next_sequence,
    quick_test, sequence_by_name, three_minute,
};

/// Audible signal emitted when a schedule entry fires.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SoundKind {
    /// Start signal heard by the fleet.
    Horn,
    /// Race committee warning beep.
    Beep,
}

impl SoundKind {
    /// Short lowercase label used by logs and the console.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            SoundKind::Horn => "horn",
            SoundKind::Beep => "beep",
        }
    }
}

impl fmt::Display for SoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors reported by [`Schedule`] construction and cursor movement.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ScheduleError {
    /// The trigger and sound tables do not describe the same number of entries.
    LengthMismatch {
        trigger_times: usize,
        sound_kinds: usize,
    },
    /// Every entry has already fired; the cursor cannot move further.
    Exhausted,
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::LengthMismatch {
                trigger_times,
                sound_kinds,
            } => write!(
                f,
                "schedule tables differ in length ({trigger_times} trigger times, {sound_kinds} sound kinds)"
            ),
            ScheduleError::Exhausted => f.write_str("schedule exhausted"),
        }
    }
}

/// One row of a schedule: when to sound, and which output to use.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ScheduleEntry {
    /// Time remaining in the countdown (ms) at which the entry fires.
    pub trigger_time_ms: u32,
    pub sound: SoundKind,
}

/// Indexed view over a countdown table with a single forward-only cursor.
///
/// The cursor counts pending entries: [`Schedule::reset`] sets it to the
/// table length and every [`Schedule::advance`] consumes one entry. The
/// pending entry sits at `len - cursor`, so tables are written in firing
/// order, largest time-remaining first.
///
/// Not `Copy`, so the bound state holds the only implicit cursor; a detached
/// view has to be an explicit `clone()`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Schedule<'a> {
    trigger_times: &'a [u32],
    sound_kinds: &'a [SoundKind],
    sequence_length_ms: u32,
    title: &'a str,
    cursor: usize,
}

impl<'a> Schedule<'a> {
    /// Builds a schedule over borrowed tables and arms its cursor.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::LengthMismatch`] when the two tables are not
    /// the same length.
    pub fn new(
        trigger_times: &'a [u32],
        sound_kinds: &'a [SoundKind],
        sequence_length_ms: u32,
        title: &'a str,
    ) -> Result<Self, ScheduleError> {
        if trigger_times.len() != sound_kinds.len() {
            return Err(ScheduleError::LengthMismatch {
                trigger_times: trigger_times.len(),
                sound_kinds: sound_kinds.len(),
            });
        }

        Ok(Self {
            trigger_times,
            sound_kinds,
            sequence_length_ms,
            title,
            cursor: trigger_times.len(),
        })
    }

    /// Re-arms the cursor so every entry is pending again.
    pub fn reset(&mut self) {
        self.cursor = self.len();
    }

    /// Consumes the pending entry.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Exhausted`] once every entry has been consumed.
    pub fn advance(&mut self) -> Result<(), ScheduleError> {
        self.cursor = self.cursor.checked_sub(1).ok_or(ScheduleError::Exhausted)?;
        Ok(())
    }

    /// Time remaining (ms) at which the pending entry fires.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Exhausted`] when nothing is pending.
    pub fn next_trigger_time_ms(&self) -> Result<u32, ScheduleError> {
        self.pending_index()
            .map(|index| self.trigger_times[index])
            .ok_or(ScheduleError::Exhausted)
    }

    /// Sound emitted by the pending entry.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Exhausted`] when nothing is pending.
    pub fn next_sound_kind(&self) -> Result<SoundKind, ScheduleError> {
        self.pending_index()
            .map(|index| self.sound_kinds[index])
            .ok_or(ScheduleError::Exhausted)
    }

    /// Pending entry as a pair, if any.
    #[must_use]
    pub fn next_entry(&self) -> Option<ScheduleEntry> {
        self.pending_index().map(|index| self.entry_at(index))
    }

    /// Iterates every entry in firing order, independent of the cursor.
    pub fn entries(&self) -> impl Iterator<Item = ScheduleEntry> + '_ {
        (0..self.len()).map(|index| self.entry_at(index))
    }

    /// Total countdown length in milliseconds.
    #[must_use]
    pub const fn total_duration_ms(&self) -> u32 {
        self.sequence_length_ms
    }

    #[must_use]
    pub const fn title(&self) -> &'a str {
        self.title
    }

    /// Number of entries in the table.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.trigger_times.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.trigger_times.is_empty()
    }

    /// Raw cursor position; equals the number of pending entries.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of entries still to fire.
    #[must_use]
    pub const fn pending(&self) -> usize {
        self.cursor
    }

    /// Returns `true` once every entry has been consumed.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.cursor == 0
    }

    fn pending_index(&self) -> Option<usize> {
        if self.cursor == 0 {
            None
        } else {
            Some(self.len() - self.cursor)
        }
    }

    fn entry_at(&self, index: usize) -> ScheduleEntry {
        ScheduleEntry {
            trigger_time_ms: self.trigger_times[index],
            sound: self.sound_kinds[index],
        }
    }
}

/// Compile-time countdown description backed by `'static` tables.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ScheduleTable {
    /// Short tag used to pick the table from the console.
    pub tag: &'static str,
    pub title: &'static str,
    pub trigger_times: &'static [u32],
    pub sound_kinds: &'static [SoundKind],
    pub sequence_length_ms: u32,
}

impl ScheduleTable {
    pub const fn new(
        tag: &'static str,
        title: &'static str,
        trigger_times: &'static [u32],
        sound_kinds: &'static [SoundKind],
        sequence_length_ms: u32,
    ) -> Self {
        Self {
            tag,
            title,
            trigger_times,
            sound_kinds,
            sequence_length_ms,
        }
    }

    /// Checks the tables are parallel, in firing order, and within the sequence length.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        if self.trigger_times.len() != self.sound_kinds.len() {
            return false;
        }

        let mut index = 0;
        while index < self.trigger_times.len() {
            if self.trigger_times[index] > self.sequence_length_ms {
                return false;
            }
            if index > 0 && self.trigger_times[index] > self.trigger_times[index - 1] {
                return false;
            }
            index += 1;
        }
        true
    }

    /// Builds a fresh [`Schedule`] view over the table.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::LengthMismatch`] when the tables are not parallel.
    pub fn schedule(&self) -> Result<Schedule<'static>, ScheduleError> {
        Schedule::new(
            self.trigger_times,
            self.sound_kinds,
            self.sequence_length_ms,
            self.title,
        )
    }

    /// Number of entries described by the table.
    #[must_use]
    pub const fn entry_count(&self) -> usize {
        self.trigger_times.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMES: [u32; 3] = [10_000, 5_000, 0];
    const KINDS: [SoundKind; 3] = [SoundKind::Beep, SoundKind::Beep, SoundKind::Horn];

    fn fixture() -> Schedule<'static> {
        Schedule::new(&TIMES, &KINDS, 10_000, "Start Sequence").expect("tables are parallel")
    }

    #[test]
    fn construction_arms_cursor_at_table_length() {
        let schedule = fixture();
        assert_eq!(schedule.cursor(), 3);
        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule.total_duration_ms(), 10_000);
        assert_eq!(schedule.title(), "Start Sequence");
        assert_eq!(schedule.next_trigger_time_ms(), Ok(10_000));
        assert_eq!(schedule.next_sound_kind(), Ok(SoundKind::Beep));
    }

    #[test]
    fn mismatched_tables_are_rejected() {
        let error = Schedule::new(&TIMES, &KINDS[..2], 10_000, "broken")
            .expect_err("unequal tables must fail");
        assert_eq!(
            error,
            ScheduleError::LengthMismatch {
                trigger_times: 3,
                sound_kinds: 2,
            }
        );
    }

    #[test]
    fn advance_stops_at_exhaustion_without_underflow() {
        let mut schedule = fixture();
        for expected in [2, 1, 0] {
            schedule.advance().expect("entry should be pending");
            assert_eq!(schedule.cursor(), expected);
        }

        assert!(schedule.is_exhausted());
        assert_eq!(schedule.advance(), Err(ScheduleError::Exhausted));
        assert_eq!(schedule.cursor(), 0);
        assert_eq!(schedule.next_trigger_time_ms(), Err(ScheduleError::Exhausted));
        assert_eq!(schedule.next_sound_kind(), Err(ScheduleError::Exhausted));
        assert_eq!(schedule.next_entry(), None);
    }

    #[test]
    fn reset_rearms_without_touching_tables() {
        let mut schedule = fixture();
        schedule.advance().unwrap();
        schedule.advance().unwrap();
        schedule.reset();

        assert_eq!(schedule.cursor(), 3);
        let entries: heapless::Vec<ScheduleEntry, 3> = schedule.entries().collect();
        assert_eq!(entries[0].trigger_time_ms, 10_000);
        assert_eq!(entries[2].sound, SoundKind::Horn);
    }

    #[test]
    fn empty_schedule_is_exhausted_from_the_start() {
        let schedule = Schedule::new(&[], &[], 1_000, "empty").unwrap();
        assert!(schedule.is_empty());
        assert!(schedule.is_exhausted());
        assert_eq!(schedule.next_entry(), None);
    }

    #[test]
    fn table_consistency_checks_order_and_bounds() {
        const OUT_OF_ORDER: ScheduleTable = ScheduleTable::new(
            "bad",
            "Out of order",
            &[0, 5_000],
            &[SoundKind::Horn, SoundKind::Horn],
            5_000,
        );
        const TOO_LATE: ScheduleTable =
            ScheduleTable::new("late", "Too late", &[6_000], &[SoundKind::Horn], 5_000);
        const GOOD: ScheduleTable = ScheduleTable::new("good", "Good", &TIMES, &KINDS, 10_000);

        assert!(!OUT_OF_ORDER.is_consistent());
        assert!(!TOO_LATE.is_consistent());
        assert!(GOOD.is_consistent());
        assert_eq!(GOOD.schedule().unwrap().cursor(), GOOD.entry_count());
    }
}
