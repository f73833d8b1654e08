//! Sound output collaborator.
//!
//! The countdown core holds no hardware knowledge; whatever switches the
//! horn or beeper (a GPIO relay on the MCU, the terminal in the emulator)
//! implements [`Relay`] and is handed to the sequencer.

/// Boolean output capable of switching a sound device.
pub trait Relay {
    /// Energises the output.
    fn activate(&mut self);

    /// Releases the output.
    fn deactivate(&mut self);
}

impl<R> Relay for &mut R
where
    R: Relay + ?Sized,
{
    fn activate(&mut self) {
        (**self).activate();
    }

    fn deactivate(&mut self) {
        (**self).deactivate();
    }
}

/// Relay that performs no hardware interaction.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopRelay;

impl NoopRelay {
    /// Creates a new no-op relay.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Relay for NoopRelay {
    fn activate(&mut self) {}

    fn deactivate(&mut self) {}
}
