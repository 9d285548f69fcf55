//! Hardware PWM on the 16-bit timers.
//!
//! Timer1 (OC1A/B/C on PB5-PB7) and Timer3 (OC3A/B/C on PE3-PE5) give six
//! direct hardware PWM outputs. This is one-time mechanical register setup;
//! the software PWM engine never touches these timers or pins, and Timer2
//! (the soft PWM tick source) is left alone here.
#![no_std]

use avr_device::atmega128::{PORTB, PORTE, TC1, TC3};
use core::marker::PhantomData;

/// PWM frequency presets
#[derive(Clone, Copy)]
pub enum PwmFreq {
    Hz50 = 50,      // Typical for servos
    Hz200 = 200,    // Good for motors
    Hz400 = 400,    // Fast mode
    Hz1000 = 1000,  // Ultra fast (careful with this one)
}

/// PWM output compare channel
#[derive(Clone, Copy)]
pub enum PwmChannel {
    Timer1A,
    Timer1B,
    Timer1C,
    Timer3A,
    Timer3B,
    Timer3C,
}

/// PWM mode configuration
#[derive(Clone, Copy)]
pub enum PwmMode {
    Fast,           // Fast PWM mode
    PhaseCorrect,   // Phase correct PWM mode
    PhaseFreq,      // Phase and frequency correct PWM mode
}

/// Hardware PWM peripheral driver
pub struct Pwm<T> {
    _timer: PhantomData<T>,
    freq: PwmFreq,
    mode: PwmMode,

    // Cache configured values for dynamic updates
    period: u16,
    clock_select: u8,
}

macro_rules! impl_pwm_timer {
    ($TC:ident, $tccra:ident, $tccrb:ident, $icr:ident,
     $PORT:ident, $ddr:ident, $ddr_mask:expr,
     $($CH:ident => ($ocr:ident, $com:expr)),+) => {
        impl Pwm<$TC> {
            pub fn new() -> Self {
                Self {
                    _timer: PhantomData,
                    freq: PwmFreq::Hz50,
                    mode: PwmMode::Fast,
                    period: 0,
                    clock_select: 0,
                }
            }

            /// Configure PWM frequency and mode, and claim the OC pins
            /// as outputs.
            pub fn configure(&mut self, freq: PwmFreq, mode: PwmMode) {
                self.freq = freq;
                self.mode = mode;

                // Timer parameters for a 16MHz clock, prescale 8 (CS = 2)
                let (period, clock_select) = match freq {
                    PwmFreq::Hz50 => (40000, 2),   // 16MHz / (50Hz * 8) = 40000
                    PwmFreq::Hz200 => (10000, 2),  // 16MHz / (200Hz * 8) = 10000
                    PwmFreq::Hz400 => (5000, 2),   // 16MHz / (400Hz * 8) = 5000
                    PwmFreq::Hz1000 => (2000, 2),  // 16MHz / (1000Hz * 8) = 2000
                };
                self.period = period;
                self.clock_select = clock_select;

                unsafe {
                    // Output compare pins must drive before PWM starts
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() | $ddr_mask));

                    let p = $TC::ptr();

                    // Set PWM mode and prescaler, ICR as top
                    match mode {
                        PwmMode::Fast => {
                            (*p).$tccra.write(|w| w.bits(0x02));
                            (*p).$tccrb.write(|w| w.bits(0x18 | clock_select));
                        }
                        PwmMode::PhaseCorrect => {
                            (*p).$tccra.write(|w| w.bits(0x02));
                            (*p).$tccrb.write(|w| w.bits(0x10 | clock_select));
                        }
                        PwmMode::PhaseFreq => {
                            (*p).$tccra.write(|w| w.bits(0x02));
                            (*p).$tccrb.write(|w| w.bits(0x10 | clock_select));
                        }
                    }

                    // Set period
                    (*p).$icr.write(|w| w.bits(period));
                }
            }

            /// Set duty cycle for a channel (0-100%)
            pub fn set_duty(&mut self, channel: PwmChannel, duty: f32) {
                let duty = (duty.max(0.0).min(100.0) / 100.0) * self.period as f32;
                let duty = duty as u16;

                unsafe {
                    let p = $TC::ptr();
                    match channel {
                        $(
                            PwmChannel::$CH => {
                                (*p).$tccra.modify(|r, w| w.bits(r.bits() | $com));
                                (*p).$ocr.write(|w| w.bits(duty));
                            }
                        )+
                        _ => {} // Channel belongs to the other timer
                    }
                }
            }
        }

        impl Default for Pwm<$TC> {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

impl_pwm_timer!(TC1, tccr1a, tccr1b, icr1, PORTB, ddrb, 0xE0,
    Timer1A => (ocr1a, 0x80),
    Timer1B => (ocr1b, 0x20),
    Timer1C => (ocr1c, 0x08));

impl_pwm_timer!(TC3, tccr3a, tccr3b, icr3, PORTE, ddre, 0x38,
    Timer3A => (ocr3a, 0x80),
    Timer3B => (ocr3b, 0x20),
    Timer3C => (ocr3c, 0x08));
