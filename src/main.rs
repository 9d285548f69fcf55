#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]

use panic_halt as _;
use avr_device::atmega128::{Peripherals, TC1, TC2, TC3};
use avr_device::interrupt::{self, Mutex};
use core::cell::RefCell;

use atmega128_pwm::config::SOFT_PWM_MAX_CHANNELS;
use atmega128_pwm::drivers::SerialConsole;
use atmega128_pwm::hal::{Port, Power, Prescaler, Pwm, PwmChannel, PwmFreq, PwmMode, Timer};
use atmega128_pwm::softpwm::SoftPwm;

// Shared between the tick interrupt and the main loop
static SOFT_PWM: Mutex<RefCell<SoftPwm<SOFT_PWM_MAX_CHANNELS>>> =
    Mutex::new(RefCell::new(SoftPwm::new()));

// Timer2 overflow drives the software PWM scheduler. Runs to completion,
// no blocking; must stay well inside one 256-clock tick period.
#[avr_device::interrupt(atmega128)]
fn TIMER2_OVF() {
    interrupt::free(|cs| {
        SOFT_PWM.borrow(cs).borrow_mut().tick();
    });
}

#[avr_device::entry]
fn main() -> ! {
    // Interrupts are still globally masked here
    let _dp = Peripherals::take().unwrap();

    let mut console = SerialConsole::new();
    let mut power = Power::new();

    // Six hardware PWM channels on the 16-bit timers
    let mut pwm1: Pwm<TC1> = Pwm::new();
    pwm1.configure(PwmFreq::Hz200, PwmMode::Fast);
    let mut pwm3: Pwm<TC3> = Pwm::new();
    pwm3.configure(PwmFreq::Hz200, PwmMode::Fast);

    // Timer2 free-running in normal mode is the soft PWM tick source
    let mut tick_timer: Timer<TC2> = Timer::new();
    tick_timer.enable_overflow_interrupt();
    tick_timer.start(Prescaler::Div8);

    // Register soft channels on PORTA 0-2 before interrupts go live, so
    // the tick handler never sees a half-appended entry. PORTA carries no
    // output compare pins, so there is no overlap with the hardware path.
    let (enable, level) = Port::A.split();
    interrupt::free(|cs| {
        let mut pwm = SOFT_PWM.borrow(cs).borrow_mut();
        for pin in [0u8, 1, 2] {
            pwm.register(enable, level, pin).ok();
        }
    });

    unsafe { interrupt::enable() };

    console.write_line("ATmega128 PWM v0.1.0");
    let registered = interrupt::free(|cs| SOFT_PWM.borrow(cs).borrow().len());
    console.debug("Soft channels", registered as u8);
    console.write_line("Ready...");

    loop {
        // Hardware PWM duty cycles
        pwm1.set_duty(PwmChannel::Timer1A, 50.0);
        pwm1.set_duty(PwmChannel::Timer1B, 25.0);
        pwm1.set_duty(PwmChannel::Timer1C, 78.0);
        pwm3.set_duty(PwmChannel::Timer3A, 39.0);
        pwm3.set_duty(PwmChannel::Timer3B, 58.0);
        pwm3.set_duty(PwmChannel::Timer3C, 31.0);

        // Software PWM duty cycles; the next tick (or at worst the one
        // after it) picks these up
        interrupt::free(|cs| {
            let mut pwm = SOFT_PWM.borrow(cs).borrow_mut();
            pwm.set_duty(0, 128);
            pwm.set_duty(1, 200);
            pwm.set_duty(2, 50);
        });

        // Idle until the next tick wakes us
        power.enter_idle_mode();
    }
}
