#![no_std]

use crate::drivers::SerialConsole;
use crate::hal::{Port, Uart};
use crate::softpwm::{Error, SoftPwm};
use embedded_hal::serial::Write;
use ufmt::uwriteln;

pub struct TestRunner {
    console: SerialConsole,
    total_tests: u32,
    passed_tests: u32,
    current_suite: &'static str,
}

pub trait TestCase {
    fn run(&self) -> TestResult;
    fn name(&self) -> &'static str;
}

#[derive(PartialEq)]
pub enum TestResult {
    Pass,
    Fail(TestError),
}

#[derive(PartialEq)]
pub enum TestError {
    AssertionFailed(&'static str),
    HardwareFault,
}

impl TestRunner {
    pub fn new() -> Self {
        Self {
            console: SerialConsole::new(),
            total_tests: 0,
            passed_tests: 0,
            current_suite: "",
        }
    }

    pub fn run_suite(&mut self, name: &'static str, tests: &[&dyn TestCase]) {
        self.current_suite = name;
        uwriteln!(&mut self.console, "\r\n=== Test Suite: {} ===", name).ok();

        for test in tests {
            self.total_tests += 1;
            self.console.write_str("Running ");
            self.console.write_str(test.name());
            self.console.write_str(": ");

            match test.run() {
                TestResult::Pass => {
                    self.passed_tests += 1;
                    self.console.write_line("PASS");
                }
                TestResult::Fail(TestError::AssertionFailed(msg)) => {
                    self.console.write_str("FAIL - ");
                    self.console.write_line(msg);
                }
                TestResult::Fail(TestError::HardwareFault) => {
                    self.console.write_line("FAIL - hardware fault");
                }
            }
        }

        self.print_summary();
    }

    fn print_summary(&mut self) {
        uwriteln!(
            &mut self.console,
            "\r\nPassed: {}/{} ({}%)",
            self.passed_tests,
            self.total_tests,
            (self.passed_tests * 100) / self.total_tests
        )
        .ok();
        self.console.flush();
    }
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn fail(msg: &'static str) -> TestResult {
    TestResult::Fail(TestError::AssertionFailed(msg))
}

/// Output must be high exactly while the shared counter is below the duty,
/// and the number of high ticks in a 256-tick cycle must equal the duty.
/// Covers both boundaries: duty 0 never drives high, duty 255 stays low for
/// exactly one tick per cycle.
pub struct DutyComparisonTest;
impl TestCase for DutyComparisonTest {
    fn name(&self) -> &'static str {
        "Duty comparison"
    }

    fn run(&self) -> TestResult {
        let (enable, level) = Port::A.split();

        for &duty in &[0u8, 1, 128, 255] {
            let mut pwm: SoftPwm<8> = SoftPwm::new();
            let ch = match pwm.register(enable, level, 4) {
                Ok(ch) => ch,
                Err(_) => return fail("registration rejected on empty registry"),
            };
            pwm.set_duty(ch, duty);

            let mut high_ticks: u16 = 0;
            for _ in 0..256u16 {
                pwm.tick();
                let high = level.is_set(4);
                if high != (pwm.counter() < duty) {
                    return fail("output must be high exactly while counter < duty");
                }
                if high {
                    high_ticks += 1;
                }
            }
            if high_ticks != duty as u16 {
                return fail("high ticks per 256-tick cycle must equal duty");
            }
        }

        TestResult::Pass
    }
}

/// Re-running a full cycle with an unchanged duty must reproduce the exact
/// same waveform, edge for edge.
pub struct WaveformReplayTest;
impl TestCase for WaveformReplayTest {
    fn name(&self) -> &'static str {
        "Waveform replay"
    }

    fn run(&self) -> TestResult {
        let (enable, level) = Port::A.split();
        let mut pwm: SoftPwm<8> = SoftPwm::new();
        let ch = match pwm.register(enable, level, 5) {
            Ok(ch) => ch,
            Err(_) => return fail("registration rejected on empty registry"),
        };
        pwm.set_duty(ch, 200);

        let mut cycles = [[0u32; 8]; 2];
        for cycle in cycles.iter_mut() {
            for t in 0..256usize {
                pwm.tick();
                if level.is_set(5) {
                    cycle[t / 32] |= 1 << (t % 32);
                }
            }
        }

        if cycles[0] != cycles[1] {
            return fail("waveform differs between identical cycles");
        }

        TestResult::Pass
    }
}

/// The 9th registration on a capacity-8 registry is rejected with no side
/// effects: count stays pinned at 8 and channels 0-7 keep their state.
pub struct RegistryCapacityTest;
impl TestCase for RegistryCapacityTest {
    fn name(&self) -> &'static str {
        "Registry capacity"
    }

    fn run(&self) -> TestResult {
        let (enable, level) = Port::C.split();
        let mut pwm: SoftPwm<8> = SoftPwm::new();

        for pin in 0..8u8 {
            match pwm.register(enable, level, pin) {
                Ok(ch) => pwm.set_duty(ch, pin.wrapping_mul(10)),
                Err(_) => return fail("registration rejected below capacity"),
            }
        }

        match pwm.register(enable, level, 0) {
            Err(Error::RegistryFull) => {}
            _ => return fail("registration past capacity must report RegistryFull"),
        }

        if pwm.len() != pwm.capacity() {
            return fail("count must stay pinned at capacity");
        }
        for i in 0..8usize {
            let ch = match pwm.channel(i) {
                Some(ch) => ch,
                None => return fail("registered channel disappeared"),
            };
            if ch.pin() != i as u8 || ch.duty() != (i as u8).wrapping_mul(10) {
                return fail("existing channel state changed by rejected registration");
            }
        }

        TestResult::Pass
    }
}

/// `set_duty` on an unregistered index is ignored and leaves every
/// registered channel's duty and waveform untouched.
pub struct UnregisteredIndexTest;
impl TestCase for UnregisteredIndexTest {
    fn name(&self) -> &'static str {
        "Unregistered index"
    }

    fn run(&self) -> TestResult {
        let (enable, level) = Port::C.split();
        let mut pwm: SoftPwm<8> = SoftPwm::new();

        let ch0 = pwm.register(enable, level, 0).unwrap_or(0);
        let ch1 = pwm.register(enable, level, 1).unwrap_or(0);
        pwm.set_duty(ch0, 10);
        pwm.set_duty(ch1, 20);

        pwm.set_duty(2, 99);
        match pwm.try_set_duty(7, 99) {
            Err(Error::InvalidChannel) => {}
            _ => return fail("out-of-range index must report InvalidChannel"),
        }

        let d0 = pwm.channel(ch0).map(|c| c.duty());
        let d1 = pwm.channel(ch1).map(|c| c.duty());
        if d0 != Some(10) || d1 != Some(20) {
            return fail("out-of-range set_duty changed a registered channel");
        }

        for _ in 0..256u16 {
            pwm.tick();
            let c = pwm.counter();
            if level.is_set(0) != (c < 10) || level.is_set(1) != (c < 20) {
                return fail("out-of-range set_duty affected the output waveform");
            }
        }

        TestResult::Pass
    }
}

/// Registration marks the pin as an output before it is ever driven, and a
/// rejected registration touches neither the registry nor the direction
/// register. Capacity 1 here, so the guard fires at `N` for any `N`.
pub struct RegistrationDirectionTest;
impl TestCase for RegistrationDirectionTest {
    fn name(&self) -> &'static str {
        "Registration direction"
    }

    fn run(&self) -> TestResult {
        let (enable, level) = Port::A.split();
        let mut pwm: SoftPwm<1> = SoftPwm::new();

        if pwm.register(enable, level, 6).is_err() {
            return fail("registration rejected on empty registry");
        }
        if !enable.is_output(6) {
            return fail("registration must configure the pin as an output");
        }

        match pwm.register(enable, level, 7) {
            Err(Error::RegistryFull) => {}
            _ => return fail("registration past capacity must report RegistryFull"),
        }
        if pwm.len() != 1 {
            return fail("rejected registration must not grow the registry");
        }
        if enable.is_output(7) {
            return fail("rejected registration must not touch the direction register");
        }

        TestResult::Pass
    }
}

/// Bytes queued through the serial write trait drain once the data-register
/// interrupt runs, so flush completes instead of blocking forever.
pub struct SerialDrainTest;
impl TestCase for SerialDrainTest {
    fn name(&self) -> &'static str {
        "Serial drain"
    }

    fn run(&self) -> TestResult {
        let mut uart = Uart::new();

        for &byte in b"ok\r\n" {
            if nb::block!(Write::write(&mut uart, byte)).is_err() {
                return TestResult::Fail(TestError::HardwareFault);
            }
        }
        match nb::block!(Write::flush(&mut uart)) {
            Ok(()) => TestResult::Pass,
            Err(_) => TestResult::Fail(TestError::HardwareFault),
        }
    }
}

/// Three channels registered with duties 128, 200 and 50 produce high times
/// of exactly 128, 200 and 50 ticks per cycle, all sharing the same phase.
pub struct ThreeChannelPhaseTest;
impl TestCase for ThreeChannelPhaseTest {
    fn name(&self) -> &'static str {
        "Three channel phase"
    }

    fn run(&self) -> TestResult {
        const DUTIES: [u8; 3] = [128, 200, 50];

        let (enable, level) = Port::A.split();
        let mut pwm: SoftPwm<8> = SoftPwm::new();
        for (pin, &duty) in DUTIES.iter().enumerate() {
            match pwm.register(enable, level, pin as u8) {
                Ok(ch) => pwm.set_duty(ch, duty),
                Err(_) => return fail("registration rejected below capacity"),
            }
        }

        let mut high_ticks = [0u16; 3];
        for _ in 0..256u16 {
            pwm.tick();
            let c = pwm.counter();
            for (i, &duty) in DUTIES.iter().enumerate() {
                if level.is_set(i as u8) != (c < duty) {
                    return fail("channels must share one counter phase");
                }
                if level.is_set(i as u8) {
                    high_ticks[i] += 1;
                }
            }
        }

        if high_ticks != [128, 200, 50] {
            return fail("per-channel high time must equal the duty exactly");
        }

        TestResult::Pass
    }
}
