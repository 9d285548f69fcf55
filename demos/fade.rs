#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]

//! Breathes an LED on PA0 by ramping a software PWM channel's duty up and
//! down from the main loop while the Timer2 interrupt runs the scheduler.

use panic_halt as _;
use avr_device::atmega128::TC2;
use avr_device::interrupt::{self, Mutex};
use core::cell::RefCell;

use atmega128_pwm::hal::{delay_ms, Port, Prescaler, Timer};
use atmega128_pwm::softpwm::SoftPwm;

static SOFT_PWM: Mutex<RefCell<SoftPwm<8>>> = Mutex::new(RefCell::new(SoftPwm::new()));

#[avr_device::interrupt(atmega128)]
fn TIMER2_OVF() {
    interrupt::free(|cs| {
        SOFT_PWM.borrow(cs).borrow_mut().tick();
    });
}

#[avr_device::entry]
fn main() -> ! {
    let mut tick_timer: Timer<TC2> = Timer::new();
    tick_timer.enable_overflow_interrupt();
    tick_timer.start(Prescaler::Div8);

    let (enable, level) = Port::A.split();
    let channel = interrupt::free(|cs| {
        SOFT_PWM.borrow(cs).borrow_mut().register(enable, level, 0).ok()
    });

    unsafe { interrupt::enable() };

    let mut duty: u8 = 0;
    let mut rising = true;

    loop {
        if let Some(channel) = channel {
            interrupt::free(|cs| {
                SOFT_PWM.borrow(cs).borrow_mut().set_duty(channel, duty);
            });
        }

        if rising {
            duty = duty.saturating_add(5);
            rising = duty < 255;
        } else {
            duty = duty.saturating_sub(5);
            rising = duty == 0;
        }

        delay_ms(20);
    }
}
