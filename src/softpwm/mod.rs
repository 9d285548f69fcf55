//! Software PWM engine
//!
//! Time-multiplexes up to `N` GPIO pins from a single Timer2 overflow
//! interrupt. Every registered channel is compared against one shared 8-bit
//! tick counter, so all channels run at the same period (256 ticks) and
//! their rising edges are phase-aligned at the counter wrap.
//!
//! Concurrency contract: `tick` runs in the interrupt context; `set_duty`
//! runs in the main loop and writes a single byte, so a tick may observe a
//! one-update-old duty at most once. `register` must only be called while
//! interrupts are still globally masked, before the tick source is live.
#![no_std]

use crate::hal::gpio::{OutputEnable, OutputLevel};

/// Index assigned to a channel at registration, in registration order.
pub type ChannelId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Registration attempted past the fixed capacity.
    RegistryFull,
    /// Channel index past the registered count.
    InvalidChannel,
}

/// One software PWM output.
///
/// The `OutputEnable` handle is consumed at registration (the direction bit
/// is set exactly once, before the pin is ever driven); only the level
/// handle is needed per tick.
#[derive(Clone, Copy)]
pub struct Channel {
    level: OutputLevel,
    pin: u8,
    duty: u8,
}

impl Channel {
    /// Bit position within the pin group (0-7).
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Current duty, out of 256.
    pub fn duty(&self) -> u8 {
        self.duty
    }
}

/// Channel registry plus the shared tick counter.
///
/// Fixed capacity `N`; registration order is channel index. Channels are
/// never removed once registered.
pub struct SoftPwm<const N: usize> {
    channels: [Option<Channel>; N],
    count: usize,
    counter: u8,
}

impl<const N: usize> SoftPwm<N> {
    pub const fn new() -> Self {
        Self {
            channels: [None; N],
            count: 0,
            counter: 0,
        }
    }

    /// Append a channel driving `pin` of the given pin group, duty 0.
    ///
    /// Immediately marks the pin as an output via the enable handle, so the
    /// pin is never driven before its direction is set. When the registry
    /// is full nothing happens at all; callers that only want the original
    /// best-effort behavior can ignore the result.
    pub fn register(
        &mut self,
        enable: OutputEnable,
        level: OutputLevel,
        pin: u8,
    ) -> Result<ChannelId, Error> {
        let index = self.count;
        if index >= N {
            return Err(Error::RegistryFull);
        }

        enable.enable(pin);
        self.channels[index] = Some(Channel {
            level,
            pin,
            duty: 0,
        });
        self.count += 1;
        Ok(index)
    }

    /// Overwrite a channel's duty. Out-of-range indices are ignored; the
    /// next tick picks the new value up (or, at worst, the one after it).
    pub fn set_duty(&mut self, channel: ChannelId, duty: u8) {
        let _ = self.try_set_duty(channel, duty);
    }

    /// Like [`set_duty`](Self::set_duty), but reports an out-of-range index
    /// for callers that want to hear about it.
    pub fn try_set_duty(&mut self, channel: ChannelId, duty: u8) -> Result<(), Error> {
        if channel >= self.count {
            return Err(Error::InvalidChannel);
        }
        if let Some(ch) = self.channels[channel].as_mut() {
            ch.duty = duty;
        }
        Ok(())
    }

    /// Advance the shared counter and refresh every output.
    ///
    /// Runs in the timer overflow interrupt. Never fails, never allocates,
    /// O(count); a channel is high exactly while `counter < duty`, which
    /// makes duty 0 permanently low and duty 255 high for 255 of 256 ticks
    /// (255 never reaches a full 100% - downstream code is tuned against
    /// that boundary, keep it).
    #[inline]
    pub fn tick(&mut self) {
        self.counter = self.counter.wrapping_add(1);
        for slot in self.channels[..self.count].iter() {
            if let Some(ch) = slot {
                ch.level.set(ch.pin, self.counter < ch.duty);
            }
        }
    }

    /// Registered channel count.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Fixed registry capacity.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Current value of the shared tick counter.
    pub fn counter(&self) -> u8 {
        self.counter
    }

    /// Look at a registered channel's state.
    pub fn channel(&self, channel: ChannelId) -> Option<&Channel> {
        if channel < self.count {
            self.channels[channel].as_ref()
        } else {
            None
        }
    }
}

impl<const N: usize> Default for SoftPwm<N> {
    fn default() -> Self {
        Self::new()
    }
}
