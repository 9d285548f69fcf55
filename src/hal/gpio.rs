use avr_device::atmega128::{porta, PORTA, PORTB, PORTC, PORTD, PORTE, PORTF};

/// One of the six GPIO ports.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Port {
    /// Split a port into its direction-control and level-control handles.
    ///
    /// The handles are non-owning: they alias process-wide register state,
    /// so the same pins must not also be routed to a hardware PWM output
    /// compare unit.
    pub fn split(self) -> (OutputEnable, OutputLevel) {
        (OutputEnable(self), OutputLevel(self))
    }

    // All port register blocks share the PIN/DDR/PORT layout, so reuse
    // the PORTA block type for access (same trick as the USART driver).
    fn regs(self) -> *const porta::RegisterBlock {
        match self {
            Port::A => PORTA::ptr(),
            Port::B => PORTB::ptr() as *const _,
            Port::C => PORTC::ptr() as *const _,
            Port::D => PORTD::ptr() as *const _,
            Port::E => PORTE::ptr() as *const _,
            Port::F => PORTF::ptr() as *const _,
        }
    }
}

/// Handle to a port's data direction register (DDRx).
#[derive(Clone, Copy)]
pub struct OutputEnable(Port);

impl OutputEnable {
    /// Mark `pin` (0-7) as an output driver.
    pub fn enable(self, pin: u8) {
        let mask = 1u8 << (pin & 0x07);
        unsafe {
            (*self.0.regs()).ddra.modify(|r, w| w.bits(r.bits() | mask));
        }
    }

    /// Read back whether `pin` is configured as an output.
    pub fn is_output(self, pin: u8) -> bool {
        let mask = 1u8 << (pin & 0x07);
        unsafe { ((*self.0.regs()).ddra.read().bits() & mask) != 0 }
    }
}

/// Handle to a port's output level register (PORTx).
#[derive(Clone, Copy)]
pub struct OutputLevel(Port);

impl OutputLevel {
    /// Drive `pin` (0-7) high or low.
    #[inline]
    pub fn set(self, pin: u8, high: bool) {
        let mask = 1u8 << (pin & 0x07);
        unsafe {
            let p = self.0.regs();
            if high {
                (*p).porta.modify(|r, w| w.bits(r.bits() | mask));
            } else {
                (*p).porta.modify(|r, w| w.bits(r.bits() & !mask));
            }
        }
    }

    /// Read back the level currently latched for `pin`.
    #[inline]
    pub fn is_set(self, pin: u8) -> bool {
        let mask = 1u8 << (pin & 0x07);
        unsafe { ((*self.0.regs()).porta.read().bits() & mask) != 0 }
    }
}
