//! Board bindings: relay outputs, button inputs and the time base.
//!
//! Pin map (STM32G0B1):
//!
//! | Signal | Pin | Mode                        |
//! |--------|-----|-----------------------------|
//! | Horn   | PA0 | push-pull, active high      |
//! | Beep   | PA1 | push-pull, active high      |
//! | Start  | PB3 | input, pull-up, active low  |
//! | Stop   | PB4 | input, pull-up, active low  |
//! | Select | PB5 | input, pull-up, active low  |

use embassy_stm32::gpio::Output;
use embassy_time::Instant;
use starter_core::{MonotonicClock, Relay};

/// Relay coil driven from a push-pull GPIO.
pub struct GpioRelay<'d> {
    output: Output<'d>,
}

impl<'d> GpioRelay<'d> {
    /// Wraps `output` and makes sure the coil starts released.
    pub fn new(mut output: Output<'d>) -> Self {
        output.set_low();
        Self { output }
    }
}

impl Relay for GpioRelay<'_> {
    fn activate(&mut self) {
        self.output.set_high();
    }

    fn deactivate(&mut self) {
        self.output.set_low();
    }
}

/// Milliseconds since boot from the embassy time driver.
#[derive(Copy, Clone, Debug, Default)]
pub struct EmbassyClock;

impl MonotonicClock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
