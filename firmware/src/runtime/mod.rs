use cortex_m::interrupt;
use cortex_m::register::primask;
use critical_section::{self, RawRestoreState};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32 as hal;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};

use crate::buttons::{Button, ButtonQueue};
use crate::hw::GpioRelay;

mod button_task;
mod countdown_task;

critical_section::set_impl!(InterruptCriticalSection);

struct InterruptCriticalSection;

unsafe impl critical_section::Impl for InterruptCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        let primask = primask::read();
        interrupt::disable();
        primask.is_active()
    }

    unsafe fn release(restore_state: RawRestoreState) {
        if restore_state {
            unsafe {
                interrupt::enable();
            }
        }
    }
}

pub(super) static BUTTON_QUEUE: ButtonQueue = ButtonQueue::new();

#[embassy_executor::main]
pub async fn main(spawner: Spawner) {
    let config = hal::Config::default();
    let hal::Peripherals {
        PA0, PA1, PB3, PB4, PB5, ..
    } = hal::init(config);

    let horn = GpioRelay::new(Output::new(PA0, Level::Low, Speed::Low));
    let beep = GpioRelay::new(Output::new(PA1, Level::Low, Speed::Low));

    defmt::info!("regatta starter: boot");

    spawner
        .spawn(countdown_task::run(horn, beep))
        .expect("failed to spawn countdown task");

    for (pin, button) in [
        (Input::new(PB3, Pull::Up), Button::Start),
        (Input::new(PB4, Pull::Up), Button::Stop),
        (Input::new(PB5, Pull::Up), Button::Select),
    ] {
        spawner
            .spawn(button_task::run(pin, button))
            .expect("failed to spawn button task");
    }

    core::future::pending::<()>().await;
}
