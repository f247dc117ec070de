//! Capabilities of the platform that the `Player` is running on.
//!
//! Every hardware sink is polled, never interrupt driven. Implementors expose
//! the register-level operations the engines need and nothing more, so the
//! engines can be exercised against a simulated board on a host.

use core::convert::Infallible;

/// Bit carried by the video status word while the generator is in vertical sync
pub const VSYNC_BIT: u32 = 1 << 16;

/// Byte-level serial link used by the command console
pub trait Serial {
    /// Take the next received byte, if one is waiting
    ///
    /// Returns `WouldBlock` when nothing has been received yet
    fn read(&mut self) -> nb::Result<u8, Infallible>;
    /// Send one byte
    ///
    /// Implementations may wait for the transmitter to drain before returning
    fn write(&mut self, byte: u8);
}

/// Stereo DAC fed with unsigned 16-bit samples
pub trait Dac {
    /// Number of free sample slots in the DAC FIFO
    fn available(&mut self) -> u8;
    /// Program the sample clock as a divider of the system clock
    fn set_clock_divider(&mut self, divider: u16);
    /// Push one left/right sample pair
    fn write_sample(&mut self, left: u16, right: u16);
}

/// Decoded content of the video generator status register
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VideoStatus(pub u32);

impl VideoStatus {
    /// Words that can be pushed to the pixel FIFO without overflowing it
    pub fn available(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    pub fn vsync(self) -> bool {
        self.0 & VSYNC_BIT != 0
    }
}

/// Clock dividers of the video generator, each one a 4-bit field
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClockDividers {
    pub clock: u8,
    pub horizontal: u8,
    pub vertical: u8,
}

impl ClockDividers {
    /// Register layout: `clock[11:8] | horizontal[7:4] | vertical[3:0]`
    pub fn bits(self) -> u32 {
        (u32::from(self.clock & 0xF) << 8)
            | (u32::from(self.horizontal & 0xF) << 4)
            | u32::from(self.vertical & 0xF)
    }
}

/// Pixel FIFO video generator
pub trait VideoGenerator {
    fn status(&mut self) -> VideoStatus;
    /// Push 32 packed monochrome pixels
    fn write_word(&mut self, word: u32);
    fn clear_fifo(&mut self);
    fn set_clock(&mut self, dividers: ClockDividers);
}

/// Trait aggregating platform functionalities
pub trait Context: Serial + Dac + VideoGenerator {
    /// Show a value on the board LEDs
    ///
    /// Called by the scheduler as a liveness heartbeat
    fn set_leds(&mut self, _value: u32) {}
}

/// Adapter exposing a `Serial` as `core::fmt::Write`, so console messages
/// can be produced with `write!`.
pub struct SerialWriter<'a, S: Serial + ?Sized>(pub &'a mut S);

impl<'a, S: Serial + ?Sized> core::fmt::Write for SerialWriter<'a, S> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        s.bytes().for_each(|b| self.0.write(b));
        Ok(())
    }
}
