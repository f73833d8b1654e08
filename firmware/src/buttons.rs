//! Front-panel buttons.
//!
//! Each button is sampled on a fixed period and fed through a [`Debouncer`];
//! a confirmed press is sent to the countdown task over [`ButtonQueue`] and
//! turned into the same [`ConsoleCommand`] the emulator parses from text.

#[cfg(not(target_os = "none"))]
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
#[cfg(target_os = "none")]
use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
use embassy_sync::channel::Channel;
use starter_core::console::ConsoleCommand;

/// Sampling period for every button input.
pub const BUTTON_SAMPLE_MS: u64 = 5;

/// Consecutive agreeing samples needed to accept a level change (20 ms).
pub const STABLE_SAMPLES: u8 = 4;

/// Presses buffered between the button tasks and the countdown task.
pub const BUTTON_QUEUE_DEPTH: usize = 4;

#[cfg(target_os = "none")]
type ButtonMutex = ThreadModeRawMutex;
#[cfg(not(target_os = "none"))]
type ButtonMutex = NoopRawMutex;

/// Queue carrying debounced presses to the countdown task.
pub type ButtonQueue = Channel<ButtonMutex, Button, BUTTON_QUEUE_DEPTH>;

/// Physical buttons on the starter panel.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Button {
    Start,
    Stop,
    /// Cycles to the next built-in sequence.
    Select,
}

impl Button {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Button::Start => "start",
            Button::Stop => "stop",
            Button::Select => "select",
        }
    }

    /// Console command issued by a press.
    #[must_use]
    pub const fn command(self) -> ConsoleCommand {
        match self {
            Button::Start => ConsoleCommand::Start,
            Button::Stop => ConsoleCommand::Stop,
            Button::Select => ConsoleCommand::Next,
        }
    }
}

/// Debounced level change reported by [`Debouncer::update`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Edge {
    Pressed,
    Released,
}

/// Sample-count debouncer for one active-low input.
///
/// The reported level only changes after [`STABLE_SAMPLES`] consecutive
/// samples disagree with it; any bounce in between restarts the count.
#[derive(Copy, Clone, Debug, Default)]
pub struct Debouncer {
    pressed: bool,
    disagreeing: u8,
}

impl Debouncer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pressed: false,
            disagreeing: 0,
        }
    }

    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Feeds one sample; `pressed` is the raw (already inverted) contact state.
    pub fn update(&mut self, pressed: bool) -> Option<Edge> {
        if pressed == self.pressed {
            self.disagreeing = 0;
            return None;
        }

        self.disagreeing += 1;
        if self.disagreeing < STABLE_SAMPLES {
            return None;
        }

        self.disagreeing = 0;
        self.pressed = pressed;
        Some(if pressed { Edge::Pressed } else { Edge::Released })
    }
}
