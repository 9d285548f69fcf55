//! ATmega128 PWM firmware: six hardware PWM channels on Timer1/Timer3 plus
//! up to eight software PWM channels multiplexed over GPIO by the Timer2
//! overflow interrupt.
#![no_std]
#![feature(abi_avr_interrupt)]

pub mod config;
pub mod drivers;
pub mod hal;
pub mod softpwm;
pub mod testing;
