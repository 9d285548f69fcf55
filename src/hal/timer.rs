use avr_device::atmega128::{TC0, TC2};
use core::marker::PhantomData;

// TC0 and TC2 are the two 8-bit timers; their PAC register blocks carry the
// same tccr/tcnt/ocr/timsk fields at the same offsets, so TC2 access reuses
// the TC0 block type (same trick as the gpio port handles). Only the TOIE
// bit position in the shared TIMSK differs per timer.
pub trait TimerRegisterBlock {
    fn ptr() -> *mut avr_device::atmega128::tc0::RegisterBlock;
    const PRESCALER_MASK: u8;
    /// Overflow interrupt enable bit position in TIMSK.
    const TOIE_BIT: u8;
}

impl TimerRegisterBlock for TC0 {
    fn ptr() -> *mut avr_device::atmega128::tc0::RegisterBlock {
        TC0::ptr()
    }
    const PRESCALER_MASK: u8 = 0x07;
    const TOIE_BIT: u8 = 0;
}

impl TimerRegisterBlock for TC2 {
    fn ptr() -> *mut avr_device::atmega128::tc0::RegisterBlock {
        TC2::ptr() as *mut _
    }
    const PRESCALER_MASK: u8 = 0x07;
    const TOIE_BIT: u8 = 6;
}

#[derive(Clone, Copy)]
pub enum Prescaler {
    Stop = 0,
    Direct = 1,
    Div8 = 2,
    Div64 = 3,
    Div256 = 4,
    Div1024 = 5,
}

/// Free-running 8-bit timer in normal mode.
///
/// Timer2 with `Div8` is reserved for the software PWM tick: it overflows
/// every 256 timer clocks and its overflow interrupt drives the scheduler.
pub struct Timer<T> {
    _timer: PhantomData<T>,
}

impl<T: TimerRegisterBlock> Timer<T> {
    pub fn new() -> Self {
        unsafe {
            // Normal mode, counter cleared, prescaler stopped
            let p = T::ptr();
            (*p).tccr.write(|w| w.bits(0));
            (*p).tcnt.write(|w| w.bits(0));
        }
        Self { _timer: PhantomData }
    }

    pub fn start(&mut self, prescaler: Prescaler) {
        unsafe {
            let p = T::ptr();
            (*p).tccr.modify(|r, w| {
                w.bits((r.bits() & !T::PRESCALER_MASK) | (prescaler as u8 & T::PRESCALER_MASK))
            });
        }
    }

    pub fn stop(&mut self) {
        unsafe {
            let p = T::ptr();
            (*p).tccr.modify(|r, w| w.bits(r.bits() & !T::PRESCALER_MASK));
        }
    }

    pub fn set_counter(&mut self, value: u8) {
        unsafe {
            let p = T::ptr();
            (*p).tcnt.write(|w| w.bits(value));
        }
    }

    pub fn get_counter(&self) -> u8 {
        unsafe {
            let p = T::ptr();
            (*p).tcnt.read().bits()
        }
    }

    pub fn enable_overflow_interrupt(&mut self) {
        unsafe {
            let p = T::ptr();
            (*p).timsk.modify(|r, w| w.bits(r.bits() | (1 << T::TOIE_BIT)));
        }
    }

    pub fn disable_overflow_interrupt(&mut self) {
        unsafe {
            let p = T::ptr();
            (*p).timsk.modify(|r, w| w.bits(r.bits() & !(1 << T::TOIE_BIT)));
        }
    }
}

impl<T: TimerRegisterBlock> Default for Timer<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Millisecond delay using Timer0
pub fn delay_ms(ms: u16) {
    let mut timer = Timer::<TC0>::new();

    // Configure for 1ms ticks (16MHz/64 = 250kHz, 250 ticks = 1ms)
    timer.set_counter(0);
    timer.start(Prescaler::Div64);

    for _ in 0..ms {
        while timer.get_counter() < 250 {}
        timer.set_counter(0);
    }

    timer.stop();
}
