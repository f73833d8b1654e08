//! Built-in countdown tables.
//!
//! Each sequence sounds the horn on the racing-rules signal times and
//! precedes every horn with three committee beeps one second apart, so the
//! operator hears the signal coming. Tables are listed in firing order.

use super::SoundKind::{Beep as B, Horn as H};
use super::{ScheduleTable, SoundKind};

/// Lead-in before the first horn, covering the three warning beeps.
pub const LEAD_IN_MS: u32 = 3_000;

/// Warning signal of the five minute sequence.
pub const FIVE_MINUTE_WARNING_MS: u32 = 300_000;
/// Preparatory signal of the five minute sequence.
pub const FIVE_MINUTE_PREPARATORY_MS: u32 = 240_000;
/// One-minute signal shared by both racing sequences.
pub const ONE_MINUTE_MS: u32 = 60_000;
/// Warning signal of the three minute sequence.
pub const THREE_MINUTE_WARNING_MS: u32 = 180_000;
/// Two-minute signal of the three minute sequence.
pub const TWO_MINUTE_MS: u32 = 120_000;

const FIVE_MINUTE_TIMES: [u32; 16] = [
    303_000, 302_000, 301_000, FIVE_MINUTE_WARNING_MS, //
    243_000, 242_000, 241_000, FIVE_MINUTE_PREPARATORY_MS, //
    63_000, 62_000, 61_000, ONE_MINUTE_MS, //
    3_000, 2_000, 1_000, 0,
];

const THREE_MINUTE_TIMES: [u32; 16] = [
    183_000, 182_000, 181_000, THREE_MINUTE_WARNING_MS, //
    123_000, 122_000, 121_000, TWO_MINUTE_MS, //
    63_000, 62_000, 61_000, ONE_MINUTE_MS, //
    3_000, 2_000, 1_000, 0,
];

const RACING_SOUNDS: [SoundKind; 16] = [
    B, B, B, H, //
    B, B, B, H, //
    B, B, B, H, //
    B, B, B, H,
];

const QUICK_TEST_TIMES: [u32; 3] = [10_000, 5_000, 0];
const QUICK_TEST_SOUNDS: [SoundKind; 3] = [B, B, H];

/// Racing-rules 5-4-1-0 start.
pub const FIVE_MINUTE: ScheduleTable = ScheduleTable::new(
    "five",
    "5 Minute Start",
    &FIVE_MINUTE_TIMES,
    &RACING_SOUNDS,
    FIVE_MINUTE_WARNING_MS + LEAD_IN_MS,
);

/// Dinghy 3-2-1-0 start.
pub const THREE_MINUTE: ScheduleTable = ScheduleTable::new(
    "three",
    "3 Minute Start",
    &THREE_MINUTE_TIMES,
    &RACING_SOUNDS,
    THREE_MINUTE_WARNING_MS + LEAD_IN_MS,
);

/// Ten second bench sequence for checking the relays.
pub const QUICK_TEST: ScheduleTable = ScheduleTable::new(
    "test",
    "Start Sequence",
    &QUICK_TEST_TIMES,
    &QUICK_TEST_SOUNDS,
    10_000,
);

const SEQUENCES: [ScheduleTable; 3] = [FIVE_MINUTE, THREE_MINUTE, QUICK_TEST];

const _: () = {
    let mut index = 0;
    while index < SEQUENCES.len() {
        assert!(SEQUENCES[index].is_consistent());
        index += 1;
    }
};

/// Every built-in sequence, in the order the select button cycles through them.
pub static ALL_SEQUENCES: [ScheduleTable; 3] = SEQUENCES;

/// Returns the five minute table.
#[must_use]
pub const fn five_minute() -> &'static ScheduleTable {
    &FIVE_MINUTE
}

/// Returns the three minute table.
#[must_use]
pub const fn three_minute() -> &'static ScheduleTable {
    &THREE_MINUTE
}

/// Returns the bench test table.
#[must_use]
pub const fn quick_test() -> &'static ScheduleTable {
    &QUICK_TEST
}

/// Looks up a built-in sequence by its tag, ignoring ASCII case.
#[must_use]
pub fn sequence_by_name(tag: &str) -> Option<&'static ScheduleTable> {
    ALL_SEQUENCES
        .iter()
        .find(|table| table.tag.eq_ignore_ascii_case(tag))
}

/// Returns the sequence after `current`, wrapping to the first one.
#[must_use]
pub fn next_sequence(current: &ScheduleTable) -> &'static ScheduleTable {
    let position = ALL_SEQUENCES
        .iter()
        .position(|table| table.tag == current.tag)
        .map_or(0, |index| (index + 1) % ALL_SEQUENCES.len());
    &ALL_SEQUENCES[position]
}
