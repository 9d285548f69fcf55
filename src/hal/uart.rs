#![allow(clippy::missing_safety_doc)]

use crate::config::{CPU_FREQ_HZ, UART_BAUD};
use avr_device::atmega128::USART0;
use avr_device::interrupt::Mutex;
use core::cell::RefCell;
use core::convert::Infallible;
use embedded_hal::serial;

// Buffer size must be power of 2 for efficient masking
const BUFFER_SIZE: usize = 32;
const BUFFER_MASK: usize = BUFFER_SIZE - 1;

const UBRR: u16 = (CPU_FREQ_HZ / (16 * UART_BAUD) - 1) as u16;

pub struct Buffer {
    data: [u8; BUFFER_SIZE],
    write_idx: usize,
    read_idx: usize,
}

impl Buffer {
    const fn new() -> Self {
        Self {
            data: [0; BUFFER_SIZE],
            write_idx: 0,
            read_idx: 0,
        }
    }

    fn write(&mut self, byte: u8) -> bool {
        let next_write = (self.write_idx + 1) & BUFFER_MASK;
        if next_write != self.read_idx {
            self.data[self.write_idx] = byte;
            self.write_idx = next_write;
            true
        } else {
            false
        }
    }

    fn read(&mut self) -> Option<u8> {
        if self.read_idx != self.write_idx {
            let byte = self.data[self.read_idx];
            self.read_idx = (self.read_idx + 1) & BUFFER_MASK;
            Some(byte)
        } else {
            None
        }
    }

    fn is_empty(&self) -> bool {
        self.read_idx == self.write_idx
    }
}

// Global buffers for interrupt handlers
static TX_BUFFER: Mutex<RefCell<Buffer>> = Mutex::new(RefCell::new(Buffer::new()));
static RX_BUFFER: Mutex<RefCell<Buffer>> = Mutex::new(RefCell::new(Buffer::new()));

/// Interrupt-driven UART on USART0.
pub struct Uart {
    _private: (),
}

impl Uart {
    pub fn new() -> Self {
        unsafe {
            let p = USART0::ptr();

            // Set baud rate
            (*p).ubrr.write(|w| w.bits(UBRR));

            // Enable TX, RX and RX interrupt
            (*p).ucsr.modify(|_, w| {
                w.rxen().set_bit()
                 .txen().set_bit()
                 .rxcie().set_bit()
            });
        }

        Self { _private: () }
    }

    pub fn write_byte(&mut self, byte: u8) {
        nb::block!(serial::Write::write(self, byte)).ok();
    }

    pub fn read_byte(&mut self) -> Option<u8> {
        serial::Read::read(self).ok()
    }

    pub fn write_str(&mut self, s: &str) {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
    }

    /// Block until the TX ring has drained.
    pub fn flush(&mut self) {
        nb::block!(serial::Write::flush(self)).ok();
    }
}

impl serial::Write<u8> for Uart {
    type Error = Infallible;

    fn write(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        let queued = avr_device::interrupt::free(|cs| {
            TX_BUFFER.borrow(cs).borrow_mut().write(byte)
        });
        if !queued {
            return Err(nb::Error::WouldBlock);
        }
        unsafe {
            // Kick the transmitter; the UDRE interrupt drains the ring
            (*USART0::ptr()).ucsr.modify(|_, w| w.udrie().set_bit());
        }
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        let empty = avr_device::interrupt::free(|cs| {
            TX_BUFFER.borrow(cs).borrow().is_empty()
        });
        if empty {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}

impl serial::Read<u8> for Uart {
    type Error = Infallible;

    fn read(&mut self) -> nb::Result<u8, Infallible> {
        avr_device::interrupt::free(|cs| {
            RX_BUFFER.borrow(cs).borrow_mut().read()
        })
        .ok_or(nb::Error::WouldBlock)
    }
}

impl Default for Uart {
    fn default() -> Self {
        Self::new()
    }
}

// Interrupt handlers
#[avr_device::interrupt(atmega128)]
fn USART0_RX() {
    unsafe {
        let byte = (*USART0::ptr()).udr.read().bits();
        avr_device::interrupt::free(|cs| {
            RX_BUFFER.borrow(cs).borrow_mut().write(byte);
        });
    }
}

#[avr_device::interrupt(atmega128)]
fn USART0_UDRE() {
    avr_device::interrupt::free(|cs| {
        if let Some(byte) = TX_BUFFER.borrow(cs).borrow_mut().read() {
            unsafe {
                (*USART0::ptr()).udr.write(|w| w.bits(byte));
            }
        } else {
            // Buffer empty - disable TX interrupt
            unsafe {
                (*USART0::ptr()).ucsr.modify(|_, w| w.udrie().clear_bit());
            }
        }
    });
}
