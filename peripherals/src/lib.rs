#![no_std]

pub mod dac;
pub mod logger;
pub mod pio;
pub mod uart;
pub mod video;

pub use dac::AudioDac;
pub use pio::Leds;
pub use uart::JtagUart;
pub use video::VideoOut;

/// Memory map of the FPGA system bus
pub mod system {
    /// System clock, feeds the DAC sample rate divider
    pub const CLK_FREQ: u32 = 50_000_000;

    pub const UART_BASE: usize = 0x2000_0000;
    pub const LED_BASE: usize = 0x2000_0010;
    pub const DAC_BASE: usize = 0x2000_0100;
    pub const VIDEO_BASE: usize = 0x2000_0200;
}
