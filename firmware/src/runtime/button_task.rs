use embassy_stm32::gpio::Input;
use embassy_time::{Duration, Ticker};

use super::BUTTON_QUEUE;
use crate::buttons::{BUTTON_SAMPLE_MS, Button, Debouncer, Edge};

#[embassy_executor::task(pool_size = 3)]
pub async fn run(input: Input<'static>, button: Button) -> ! {
    let mut debouncer = Debouncer::new();
    let mut ticker = Ticker::every(Duration::from_millis(BUTTON_SAMPLE_MS));

    loop {
        ticker.next().await;
        // Active low: the contact pulls the pin to ground.
        let pressed = debouncer.update(input.is_low()) == Some(Edge::Pressed);
        if pressed && BUTTON_QUEUE.try_send(button).is_err() {
            defmt::warn!("button {}: queue full, press dropped", button.label());
        }
    }
}
