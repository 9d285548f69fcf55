pub mod gpio;
pub mod power;
pub mod pwm;
pub mod timer;
pub mod uart;

// Re-export commonly used types
pub use gpio::{OutputEnable, OutputLevel, Port};
pub use power::{Power, SleepMode};
pub use pwm::{Pwm, PwmChannel, PwmFreq, PwmMode};
pub use timer::{delay_ms, Prescaler, Timer};
pub use uart::Uart;
