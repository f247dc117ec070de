use core::convert::Infallible;

use peripherals::{system, AudioDac, JtagUart, Leds, VideoOut};
use player::{ClockDividers, Context, Dac, Serial, VideoGenerator, VideoStatus};

/// The demo board: every peripheral the player drives
pub struct Board {
    pub uart: JtagUart,
    pub dac: AudioDac,
    pub video: VideoOut,
    pub leds: Leds,
}

impl Board {
    /// Claim the peripherals at their system bus addresses.
    ///
    /// # Safety
    ///
    /// Call once, a second board would alias the same registers
    pub unsafe fn take() -> Self {
        Self {
            uart: JtagUart::new(system::UART_BASE),
            dac: AudioDac::new(system::DAC_BASE),
            video: VideoOut::new(system::VIDEO_BASE),
            leds: Leds::new(system::LED_BASE),
        }
    }
}

impl Serial for Board {
    fn read(&mut self) -> nb::Result<u8, Infallible> {
        self.uart.read().ok_or(nb::Error::WouldBlock)
    }

    fn write(&mut self, byte: u8) {
        self.uart.write(byte);
    }
}

impl Dac for Board {
    fn available(&mut self) -> u8 {
        self.dac.available()
    }

    fn set_clock_divider(&mut self, divider: u16) {
        self.dac.set_clock_divider(divider);
    }

    fn write_sample(&mut self, left: u16, right: u16) {
        self.dac.write_sample(left, right);
    }
}

impl VideoGenerator for Board {
    fn status(&mut self) -> VideoStatus {
        VideoStatus(self.video.status())
    }

    fn write_word(&mut self, word: u32) {
        self.video.write_word(word);
    }

    fn clear_fifo(&mut self) {
        self.video.clear_fifo();
    }

    fn set_clock(&mut self, dividers: ClockDividers) {
        self.video.set_clock(dividers.bits());
    }
}

impl Context for Board {
    fn set_leds(&mut self, value: u32) {
        self.leds.set(value);
    }
}
