use embassy_futures::select::{Either, select};
use embassy_time::{Duration, Ticker};
use starter_core::console::CommandExecutor;
use starter_core::schedule::five_minute;
use starter_core::{StartSequencer, SystemState, TelemetryRecorder};

use super::BUTTON_QUEUE;
use crate::hw::{EmbassyClock, GpioRelay};
use crate::telemetry::{TelemetryMirror, log_outcome};

/// Sequencer poll period.
const POLL_PERIOD_MS: u64 = 10;

#[embassy_executor::task]
pub async fn run(horn: GpioRelay<'static>, beep: GpioRelay<'static>) -> ! {
    let mut state = SystemState::new(EmbassyClock);
    let mut sequencer = StartSequencer::new(horn, beep);
    let mut telemetry: TelemetryRecorder = TelemetryRecorder::new();
    let mut mirror = TelemetryMirror::new();
    let mut executor = CommandExecutor::new();

    match executor.select(five_minute(), &mut state) {
        Ok(outcome) => log_outcome("boot", &outcome),
        Err(err) => defmt::error!("boot: {}", defmt::Display2Format(&err)),
    }

    let mut ticker = Ticker::every(Duration::from_millis(POLL_PERIOD_MS));
    let receiver = BUTTON_QUEUE.receiver();

    loop {
        match select(receiver.receive(), ticker.next()).await {
            Either::First(button) => {
                match executor.execute(button.command(), &mut sequencer, &mut state, &mut telemetry)
                {
                    Ok(outcome) => log_outcome(button.label(), &outcome),
                    Err(err) => defmt::warn!(
                        "button {}: {}",
                        button.label(),
                        defmt::Display2Format(&err)
                    ),
                }
            }
            Either::Second(()) => {
                if let Err(err) = sequencer.poll(&mut state, &mut telemetry) {
                    defmt::warn!("sequencer: {}", defmt::Display2Format(&err));
                }
            }
        }

        mirror.flush(&telemetry);
    }
}
