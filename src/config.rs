//! Configuration constants for ATmega128 PWM firmware
#![no_std]

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// UART baud rate
pub const UART_BAUD: u32 = 9600;

/// Maximum number of software PWM channels
pub const SOFT_PWM_MAX_CHANNELS: usize = 8;

/// Timer2 prescale for the software PWM tick.
/// 16MHz / 8 / 256 overflows = 7812 ticks/s, so one full 256-tick
/// software PWM period comes out at about 30.5Hz.
pub const SOFT_PWM_TICK_PRESCALE: u16 = 8;
