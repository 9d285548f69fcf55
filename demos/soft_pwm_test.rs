#![no_std]
#![no_main]

use panic_halt as _;
use avr_device::interrupt;
use atmega128_pwm::testing::{
    DutyComparisonTest, RegistrationDirectionTest, RegistryCapacityTest, SerialDrainTest,
    TestRunner, ThreeChannelPhaseTest, UnregisteredIndexTest, WaveformReplayTest,
};

#[avr_device::entry]
fn main() -> ! {
    let mut runner = TestRunner::new();

    // Interrupts only serve the console here; Timer2 is never started, so
    // the suite ticks the engine by hand and samples the waveform
    // deterministically after every tick.
    unsafe { interrupt::enable() };

    runner.run_suite(
        "Soft PWM",
        &[
            &DutyComparisonTest,
            &WaveformReplayTest,
            &RegistryCapacityTest,
            &RegistrationDirectionTest,
            &UnregisteredIndexTest,
            &ThreeChannelPhaseTest,
            &SerialDrainTest,
        ],
    );

    loop {}
}
